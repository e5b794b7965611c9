//! Wires the book, the tape, the queues and their pollers together.

use crate::config::FeedConfig;
use crate::consumer::{redraw_channel, spawn_book_consumer, spawn_trade_consumer};
use crate::router::Router;
use anyhow::Result;
use bus::{PollerHandle, Receiver};
use lob::{OrderBook, TradeTape};
use std::sync::Arc;
use tracing::{error, info};

/// One live market feed: order book, trade tape, and the consumer threads
/// draining their queues.
#[derive(Debug)]
pub struct MarketFeed {
    book: Arc<OrderBook>,
    tape: Arc<TradeTape>,
    router: Router,
    redraw_rx: Receiver<()>,
    workers: Vec<PollerHandle>,
}

impl MarketFeed {
    /// Start the consumers for one instrument.
    ///
    /// The returned feed owns the shared state; the protocol adapter feeds
    /// it through [`MarketFeed::router`], the renderer reads through
    /// [`MarketFeed::book`] / [`MarketFeed::tape`] after each redraw
    /// notification.
    pub fn start(config: &FeedConfig) -> Result<Self> {
        let (price_tx, price_rx) = bus::unbounded();
        let (trade_tx, trade_rx) = bus::unbounded();
        let (redraw, redraw_rx) = redraw_channel();

        let book = Arc::new(OrderBook::new(config.symbol));
        let tape = Arc::new(TradeTape::new(config.tape_capacity));

        let book_worker = spawn_book_consumer(
            &format!("{}-book", config.name),
            Arc::clone(&book),
            price_rx,
            config.clear_on_change(),
            redraw.clone(),
        )?;
        let trade_worker = spawn_trade_consumer(
            &format!("{}-trade", config.name),
            Arc::clone(&tape),
            trade_rx,
            redraw,
        )?;

        info!(
            "market feed started. name [{}], instrument [{}], depth [{}]",
            config.name, config.symbol, config.max_depth
        );
        Ok(Self {
            book,
            tape,
            router: Router::new(price_tx, trade_tx),
            redraw_rx,
            workers: vec![book_worker, trade_worker],
        })
    }

    /// The router the protocol adapter pushes events through.
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// The live order book.
    #[must_use]
    pub const fn book(&self) -> &Arc<OrderBook> {
        &self.book
    }

    /// The live trade tape.
    #[must_use]
    pub const fn tape(&self) -> &Arc<TradeTape> {
        &self.tape
    }

    /// Redraw notifications, one per processed message.
    #[must_use]
    pub const fn redraw(&self) -> &Receiver<()> {
        &self.redraw_rx
    }

    /// Stop all consumers and surface any deferred worker error.
    ///
    /// Stop requests go out to every worker before the first join, so a
    /// slow consumer cannot delay the others' shutdown. Every worker is
    /// joined even when an earlier one failed; the first error is returned
    /// and the rest are logged.
    pub fn stop(self) -> Result<()> {
        for worker in &self.workers {
            worker.stop();
        }
        info!("market feed stopping");
        let mut first_err = None;
        for worker in self.workers {
            if let Err(err) = worker.join() {
                error!("feed worker failed. error [{err:#}]");
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}
