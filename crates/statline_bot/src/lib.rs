//! Stats service, live poller and bot server.
//!
//! [`StatsService`] answers the bot's commands from cached endpoints.
//! [`LivePoller`] is an actor that polls daily games, drives the live
//! tracker and hands [`BotEvent`]s to a [`Presenter`]. [`BotServer`] wires
//! the poller to its poll and refresh schedules.

#![warn(missing_docs)]

mod config;
mod observability;
mod poller;
mod presenter;
mod server;
mod service;

pub use config::{
    ChannelConfig, LiveConfig, LiveConfigBuilder, LiveConfigBuilderError, StatlineConfig,
};
pub use observability::{ObservabilityConfig, init_observability};
pub use poller::{LivePoller, PollerMessage};
pub use presenter::{BotEvent, LogPresenter, Presenter, ScoreboardRow, user_message};
pub use server::BotServer;
pub use service::{MAX_SUGGESTIONS, PlayerProp, SeasonSummary, StatsService};
