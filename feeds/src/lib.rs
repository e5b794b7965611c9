//! Consumer-side wiring for the market-data client.
//!
//! The protocol adapter parses wire messages elsewhere and hands typed
//! events to the [`Router`]; from there each logical stream has its own
//! queue and poller, so book deltas never wait behind trade prints.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(dead_code)]
#![deny(unused)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod consumer;
pub mod manager;
pub mod router;

pub use config::FeedConfig;
pub use consumer::{RedrawSignal, redraw_channel, spawn_book_consumer, spawn_trade_consumer};
pub use manager::MarketFeed;
pub use router::{Router, SessionEvent};
