//! Lock-free hand-off between the network-facing thread and consumers.
//!
//! Producers never wait for space and consumers never block on a dequeue;
//! idle consumers back off adaptively instead (spin, then capped
//! exponential sleep).

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(dead_code)]
#![deny(unused)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod backoff;
pub mod poller;
pub mod queue;

pub use backoff::Backoff;
pub use poller::{PollerHandle, spawn_poller};
pub use queue::{BusError, Receiver, Sender, StreamKind, unbounded};
