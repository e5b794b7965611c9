//! Common types for the market-data client: instruments, wire codes,
//! fixed-point tick conversion, and parsed feed events.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(dead_code)]
#![deny(unused)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod market;
pub mod ticks;
pub mod types;

pub use market::*;
pub use ticks::{from_ticks, to_ticks};
pub use types::*;
