//! # Core Module
//!
//! Stateless building blocks shared by the engine and the workflows.
//!
//! - **Data Models** ([`models`]) - Atom samples, frames, trajectories and per-cell statistics
//! - **Geometry** ([`geometry`]) - Periodic wrapping and uniform cubic grid indexing
//! - **File I/O** ([`io`]) - Trajectory reader and statistics artifact codecs
//!
//! All floating-point input is single precision on disk; geometry and
//! accumulation are carried out in double precision.

pub mod geometry;
pub mod io;
pub mod models;
