//! Data structures for trajectory frames and the statistics derived from them.

pub mod frame;
pub mod stats;
