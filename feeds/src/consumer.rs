//! Book and trade consumers: one poller per stream, redraw after every
//! processed message.

use anyhow::Result;
use bus::{BusError, PollerHandle, Receiver, Sender, spawn_poller};
use common::{MarketEvent, Symbol, TradeRefresh, TradeSide, to_ticks};
use lob::{OrderBook, Trade, TradeTape};
use std::sync::Arc;
use tracing::error;

/// Fire-and-forget "redraw requested" notification.
///
/// One signal per processed message, no payload; the presentation layer
/// re-pulls state via the book and tape exports.
#[derive(Debug, Clone)]
pub struct RedrawSignal {
    tx: Sender<()>,
}

impl RedrawSignal {
    /// Request a redraw.
    pub fn notify(&self) -> Result<(), BusError> {
        self.tx.send(())
    }
}

/// Create the redraw signal and the receiver the renderer drains.
#[must_use]
pub fn redraw_channel() -> (RedrawSignal, Receiver<()>) {
    let (tx, rx) = bus::unbounded();
    (RedrawSignal { tx }, rx)
}

/// Spawn the poller that drains book events into the order book.
///
/// Each applied message triggers exactly one redraw notification.
pub fn spawn_book_consumer(
    name: &str,
    book: Arc<OrderBook>,
    rx: Receiver<MarketEvent>,
    clear_on_change: bool,
    redraw: RedrawSignal,
) -> Result<PollerHandle> {
    spawn_poller(name, rx, move |event| {
        match event {
            MarketEvent::Snapshot(msg) => book.apply_snapshot(&msg),
            MarketEvent::Increment(msg) => book.apply_increment(&msg, clear_on_change),
        }
        redraw.notify()?;
        Ok(())
    })
}

/// Spawn the poller that drains trade prints into the tape.
pub fn spawn_trade_consumer(
    name: &str,
    tape: Arc<TradeTape>,
    rx: Receiver<TradeRefresh>,
    redraw: RedrawSignal,
) -> Result<PollerHandle> {
    spawn_poller(name, rx, move |print| {
        if let Some(trade) = decode_trade(&print) {
            tape.push(trade);
        }
        redraw.notify()?;
        Ok(())
    })
}

/// Convert a wire trade print to tick representation.
///
/// Malformed prints are a protocol anomaly: logged and skipped.
fn decode_trade(print: &TradeRefresh) -> Option<Trade> {
    let symbol = match Symbol::from_wire(&print.symbol) {
        Ok(symbol) => symbol,
        Err(err) => {
            error!("skipping trade. {err}");
            return None;
        }
    };
    let side = match TradeSide::from_code(print.side_code) {
        Ok(side) => side,
        Err(err) => {
            error!("trade with no side, skipping. {err}");
            return None;
        }
    };
    if !print.price.is_finite() || print.price < 0.0 || !print.size.is_finite() || print.size < 0.0
    {
        error!(
            "malformed trade price/size, skipping. price [{}], size [{}]",
            print.price, print.size
        );
        return None;
    }
    Some(Trade::new(
        print.time.clone(),
        side,
        to_ticks(print.price, symbol.price_ticks_per_unit()),
        to_ticks(print.size, symbol.size_ticks_per_unit()),
        print.id,
    ))
}
