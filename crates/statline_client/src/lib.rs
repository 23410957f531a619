//! Remote data access for Statline.
//!
//! [`Fetcher`] issues one logical query (with bounded rate-limit retry and a
//! request timeout) or walks a cursor-paginated list. [`StatsApi`] and
//! [`FeedApi`] put typed, cached league endpoints on top of it, and
//! [`parse`] turns provider JSON into core types.
//!
//! The network sits behind the [`Transport`] trait; [`HttpTransport`] is the
//! `reqwest` implementation.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod feed_api;
mod fetcher;
pub mod parse;
mod stats_api;
mod transport;

pub use config::{ApiConfig, ApiConfigBuilder, FetchConfig, FetchConfigBuilder};
pub use feed_api::FeedApi;
pub use fetcher::{Fetcher, Query, param};
pub use stats_api::{StatsApi, merge_rows};
pub use transport::{AuthScheme, HttpTransport, Transport, TransportResponse};
