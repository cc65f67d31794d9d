//! # mdgrid Core Library
//!
//! Streams binary molecular-dynamics trajectories and reduces every frame to
//! control-volume statistics (mass density, momentum density and the kinetic
//! second-moment tensor) on one or more uniform cubic grids laid over a
//! periodic box.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Plain data models (`Frame`, `CellStats`), the
//!   periodic wrapping and grid geometry, and the binary/text I/O codecs.
//!
//! - **[`engine`]: The Logic Core.** Validated configuration, the per-frame
//!   `StatsAccumulator`, progress reporting and the unified error type.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that tie the reader,
//!   the accumulator and the serializers together, such as [`workflows::analyze`].

pub mod core;
pub mod engine;
pub mod workflows;
