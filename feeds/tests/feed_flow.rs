//! End-to-end flow: router -> queues -> consumers -> book/tape exports.

use anyhow::Result;
use bus::StreamKind;
use common::{
    IncrementEntry, IncrementalRefresh, MarketEvent, SnapshotEntry, SnapshotRefresh, Symbol,
    TradeRefresh, TradeSide,
};
use feeds::{FeedConfig, MarketFeed, SessionEvent};
use lob::BidAskRow;
use std::time::{Duration, Instant};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn wait_until(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    check()
}

fn snapshot_event() -> SessionEvent {
    SessionEvent::Market(MarketEvent::Snapshot(SnapshotRefresh::new(
        "BTCUSDT",
        vec![
            SnapshotEntry::new('0', 95.0, 10.0),
            SnapshotEntry::new('1', 96.0, 11.0),
        ],
    )))
}

#[test]
fn test_snapshot_then_increment_reaches_export() -> Result<()> {
    init_tracing();
    let feed = MarketFeed::start(&FeedConfig::new("flow", Symbol::BtcUsdt))?;

    feed.router().route(StreamKind::Price, snapshot_event())?;
    feed.router().route(
        StreamKind::Price,
        SessionEvent::Market(MarketEvent::Increment(IncrementalRefresh::new(vec![
            IncrementEntry::new(Some("BTCUSDT"), '0', '0', 95.0, Some(100.0)),
            IncrementEntry::new(None, '1', '2', 96.0, None),
        ]))),
    )?;

    // one redraw per processed message
    assert!(wait_until(Duration::from_secs(1), || {
        feed.redraw().len() == 2
    }));
    feed.redraw().recv()?;
    feed.redraw().recv()?;
    assert_eq!(
        feed.book().to_vector(),
        vec![BidAskRow::new(
            100 * 100_000,
            95 * 100,
            BidAskRow::SENTINEL,
            BidAskRow::SENTINEL
        )]
    );
    feed.stop()
}

#[test]
fn test_trade_prints_land_on_tape() -> Result<()> {
    init_tracing();
    let feed = MarketFeed::start(&FeedConfig::new("tape", Symbol::BtcUsdt))?;

    feed.router().route(
        StreamKind::Trade,
        SessionEvent::Trade(TradeRefresh::new(
            "BTCUSDT", "09:15:00", '2', 95.25, 2.0, 1001,
        )),
    )?;
    // an anomalous print is logged and skipped, but still counts as processed
    feed.router().route(
        StreamKind::Trade,
        SessionEvent::Trade(TradeRefresh::new("BTCUSDT", "09:15:01", 'x', 1.0, 1.0, 1002)),
    )?;

    assert!(wait_until(Duration::from_secs(1), || {
        feed.redraw().len() == 2
    }));
    let tape = feed.tape().to_vector();
    assert_eq!(tape.len(), 1);
    assert_eq!(tape[0].side, TradeSide::Sell);
    assert_eq!(tape[0].px, 9525);
    assert_eq!(tape[0].sz, 200_000);
    assert_eq!(tape[0].id, 1001);
    feed.stop()
}

#[test]
fn test_top_of_book_change_replaces_side() -> Result<()> {
    init_tracing();
    let mut config = FeedConfig::new("tob", Symbol::BtcUsdt);
    config.max_depth = 1;
    let feed = MarketFeed::start(&config)?;

    feed.router().route(StreamKind::Price, snapshot_event())?;
    feed.router().route(
        StreamKind::Price,
        SessionEvent::Market(MarketEvent::Increment(IncrementalRefresh::new(vec![
            IncrementEntry::new(Some("BTCUSDT"), '0', '1', 94.5, Some(3.0)),
        ]))),
    )?;

    assert!(wait_until(Duration::from_secs(1), || {
        feed.redraw().len() == 2
    }));
    let rows = feed.book().to_vector();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].bid_px, 9450);
    assert_eq!(rows[0].ask_px, 9600);
    feed.stop()
}

#[test]
fn test_misrouted_traffic_does_not_reach_consumers() -> Result<()> {
    init_tracing();
    let feed = MarketFeed::start(&FeedConfig::new("misroute", Symbol::BtcUsdt))?;

    // order-entry traffic and role mismatches are dropped at the router
    feed.router().route(StreamKind::Order, snapshot_event())?;
    feed.router().route(
        StreamKind::Price,
        SessionEvent::Trade(TradeRefresh::new("BTCUSDT", "t", '1', 1.0, 1.0, 1)),
    )?;

    std::thread::sleep(Duration::from_millis(20));
    assert!(feed.book().to_vector().is_empty());
    assert!(feed.tape().is_empty());
    assert!(feed.redraw().is_empty());
    feed.stop()
}
