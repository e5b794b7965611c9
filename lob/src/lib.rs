//! Order book engine backed by two price-ranked maps, plus the trade tape.
//!
//! All state here is mutated by exactly one poller thread per instance and
//! read by a rendering thread, so every public operation is atomic under an
//! internal lock.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(dead_code)]
#![deny(unused)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod book;
pub mod tape;

pub use book::{BidAskRow, OrderBook};
pub use tape::{Trade, TradeTape};
