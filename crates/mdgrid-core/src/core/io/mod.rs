//! Input/output for binary trajectories and statistics artifacts.
//!
//! The trajectory reader streams frames out of either supported on-disk
//! layout. Statistics are written per grid through the [`traits::StatsFormat`]
//! trait, implemented by the binary and the tab-delimited text encoders.

pub mod stats_binary;
pub mod stats_text;
pub mod traits;
pub mod trajectory;
