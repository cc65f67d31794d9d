//! # Engine Module
//!
//! Stateful machinery that turns frames into statistics.
//!
//! - **Configuration** ([`config`]) - Validated grid list, reader variant and output settings
//! - **Accumulation** ([`accumulator`]) - Per-frame binning and normalization of atom samples
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The unified error type of a run
//!
//! An accumulator owns its grid configuration; nothing here is global, so
//! independent runs can share a process.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod progress;
