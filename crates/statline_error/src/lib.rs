//! Error types for the Statline engine.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Only two conditions are meant to reach a user: [`ApiError`] (the remote
//! source failed) and [`StatsError`] (the data was fetched but nothing
//! qualified). A 404 is not an error; fetchers return `Ok(None)` for it.
//!
//! # Examples
//!
//! ```
//! use statline_error::{StatlineResult, StatsError};
//!
//! fn season_total() -> StatlineResult<f64> {
//!     Err(StatsError::unavailable("player 237 in the 2024 season"))?
//! }
//!
//! assert!(season_total().unwrap_err().is_stats_unavailable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod error;
mod stats;

pub use api::{ApiError, ApiErrorKind};
pub use config::ConfigError;
pub use error::{StatlineError, StatlineErrorKind, StatlineResult};
pub use stats::{StatsError, StatsErrorKind};
