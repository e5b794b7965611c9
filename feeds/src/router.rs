//! Routes parsed events onto the queue matching their session role.

use bus::{BusError, Sender, StreamKind};
use common::{MarketEvent, TradeRefresh};
use tracing::error;

/// A parsed event together with nothing else; the session role arrives as
/// a [`StreamKind`] resolved once at session setup.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Book snapshot or delta
    Market(MarketEvent),
    /// Trade print
    Trade(TradeRefresh),
}

/// Places events onto the per-stream queues.
///
/// A mismatch between session role and payload is a protocol anomaly:
/// logged and dropped, never fatal, mirroring how an unknown session is
/// handled at logon.
#[derive(Debug, Clone)]
pub struct Router {
    price_tx: Sender<MarketEvent>,
    trade_tx: Sender<TradeRefresh>,
}

impl Router {
    /// Create a router over the price and trade queues.
    #[must_use]
    pub const fn new(price_tx: Sender<MarketEvent>, trade_tx: Sender<TradeRefresh>) -> Self {
        Self { price_tx, trade_tx }
    }

    /// Enqueue an event from a session of the given role.
    ///
    /// Errors only when the target queue is gone; that is an ingestion
    /// integrity failure, not a bad message.
    pub fn route(&self, kind: StreamKind, event: SessionEvent) -> Result<(), BusError> {
        match (kind, event) {
            (StreamKind::Price, SessionEvent::Market(msg)) => self.price_tx.send(msg),
            (StreamKind::Trade, SessionEvent::Trade(msg)) => self.trade_tx.send(msg),
            (StreamKind::Order, _) => {
                error!("no consumer for order session traffic, dropping");
                Ok(())
            }
            (kind, _) => {
                error!("payload does not match session role, dropping. session [{kind:?}]");
                Ok(())
            }
        }
    }
}
