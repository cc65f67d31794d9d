//! Periodic box geometry and grid discretization.
//!
//! Coordinates are first mapped into the canonical box domain `[0, L)` by
//! [`periodic`], then assigned to a cell of every configured grid by [`grid`].

pub mod grid;
pub mod periodic;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Invalid box edge length: {0} (must be finite and positive)")]
    InvalidBoxEdge(f64),
    #[error("Non-finite coordinate component: {0}")]
    NonFiniteCoordinate(f64),
    #[error(
        "Cell index {index} on axis {axis} is outside [0, {resolution}) for wrapped coordinate {coordinate}"
    )]
    IndexOutOfRange {
        axis: usize,
        index: i64,
        resolution: usize,
        coordinate: f64,
    },
}
