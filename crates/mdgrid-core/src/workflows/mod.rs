//! # Workflows Module
//!
//! Top-level entry points of the library.
//!
//! - **Analysis Workflow** ([`analyze`]) - Streams a trajectory frame by frame,
//!   accumulates control-volume statistics on every configured grid, and writes
//!   one artifact per grid.

pub mod analyze;
