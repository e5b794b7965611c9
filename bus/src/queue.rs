//! Channel wrappers over crossbeam and the session-role tag.

use crossbeam::channel;

/// Errors from the queue layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusError {
    /// The other end of the queue is gone
    #[error("queue disconnected")]
    Disconnected,
    /// Session qualifier has no known stream mapping
    #[error("unknown session qualifier. value [{0}]")]
    UnknownQualifier(String),
}

/// Logical message class a wire session produces.
///
/// Resolved once at session setup from the session qualifier and carried as
/// a typed tag alongside the queue handle, so routing never re-inspects
/// strings per message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Order-book snapshots and deltas
    Price,
    /// Trade prints
    Trade,
    /// Order-entry traffic (no consumer in this client)
    Order,
}

impl StreamKind {
    /// Resolve a wire session qualifier.
    pub fn from_qualifier(qualifier: &str) -> Result<Self, BusError> {
        match qualifier {
            "PX" => Ok(Self::Price),
            "TX" => Ok(Self::Trade),
            "OX" => Ok(Self::Order),
            other => Err(BusError::UnknownQualifier(other.to_owned())),
        }
    }

    /// The session qualifier this kind maps from.
    #[must_use]
    pub const fn qualifier(self) -> &'static str {
        match self {
            Self::Price => "PX",
            Self::Trade => "TX",
            Self::Order => "OX",
        }
    }
}

/// Create an unbounded queue; the producer side never waits for space.
#[must_use]
pub fn unbounded<T: Send + 'static>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = channel::unbounded();
    (Sender { tx }, Receiver { rx })
}

/// Producer handle.
#[derive(Debug)]
pub struct Sender<T> {
    tx: channel::Sender<T>,
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T: Send + 'static> Sender<T> {
    /// Enqueue a message without blocking.
    pub fn send(&self, msg: T) -> Result<(), BusError> {
        self.tx.send(msg).map_err(|_| BusError::Disconnected)
    }
}

/// Consumer handle.
#[derive(Debug)]
pub struct Receiver<T> {
    rx: channel::Receiver<T>,
}

impl<T: Send + 'static> Receiver<T> {
    /// Dequeue without blocking; `None` means the queue is currently empty.
    pub fn try_recv(&self) -> Result<Option<T>, BusError> {
        match self.rx.try_recv() {
            Ok(msg) => Ok(Some(msg)),
            Err(channel::TryRecvError::Empty) => Ok(None),
            Err(channel::TryRecvError::Disconnected) => Err(BusError::Disconnected),
        }
    }

    /// Dequeue, blocking until a message arrives. Test and shutdown paths
    /// only; pollers use `try_recv`.
    pub fn recv(&self) -> Result<T, BusError> {
        self.rx.recv().map_err(|_| BusError::Disconnected)
    }

    /// Number of messages currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is currently empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
