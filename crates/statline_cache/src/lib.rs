//! Memoization of remote fetches with per-entry time-to-live.
//!
//! A [`TtlCache`] keys results by operation name plus ordered arguments and
//! serves them until their TTL elapses. Expired entries are treated as
//! absent and overwritten by the next successful fetch. Failed fetches are
//! never stored.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;
mod config;
mod key;

pub use cache::{CacheEntry, CacheStats, TtlCache};
pub use config::{CacheConfig, CacheConfigBuilder, TtlConfig, TtlConfigBuilder};
pub use key::CacheKey;
