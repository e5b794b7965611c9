//! Core order book: two sorted price-level maps under one lock.

use common::{
    IncrementalRefresh, Side, SnapshotRefresh, Symbol, UpdateAction, to_ticks,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info};

/// One display row: bid rank *i* zipped with ask rank *i*.
///
/// `SENTINEL` marks a missing side at that rank. No finite f64 input can
/// scale to `u64::MAX` (the mantissa tops out at 2^53), so the sentinel
/// cannot collide with a real market value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidAskRow {
    /// Bid size in ticks
    pub bid_sz: u64,
    /// Bid price in ticks
    pub bid_px: u64,
    /// Ask price in ticks
    pub ask_px: u64,
    /// Ask size in ticks
    pub ask_sz: u64,
}

impl BidAskRow {
    /// Reserved "no data" value for every field.
    pub const SENTINEL: u64 = u64::MAX;

    /// Create a fully populated row.
    #[must_use]
    pub const fn new(bid_sz: u64, bid_px: u64, ask_px: u64, ask_sz: u64) -> Self {
        Self {
            bid_sz,
            bid_px,
            ask_px,
            ask_sz,
        }
    }
}

impl Default for BidAskRow {
    fn default() -> Self {
        Self::new(
            Self::SENTINEL,
            Self::SENTINEL,
            Self::SENTINEL,
            Self::SENTINEL,
        )
    }
}

#[derive(Debug, Default)]
struct Levels {
    /// key = price ticks, value = size ticks; iterated in reverse for ranking
    bids: BTreeMap<u64, u64>,
    /// key = price ticks, value = size ticks
    asks: BTreeMap<u64, u64>,
}

/// Order book for a single tracked instrument.
///
/// Both sides live behind one exclusive lock; every public operation is
/// atomic under it, so a reader never observes a half-applied message. A
/// crossed book (best bid >= best ask) is a valid transient state because
/// deltas from the feed are not cross-side coordinated.
#[derive(Debug)]
pub struct OrderBook {
    symbol: Symbol,
    levels: Mutex<Levels>,
}

impl OrderBook {
    /// Create an empty book tracking `symbol`.
    #[must_use]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            levels: Mutex::new(Levels::default()),
        }
    }

    /// Create a pre-seeded book from raw tick levels.
    #[must_use]
    pub fn with_levels(
        symbol: Symbol,
        bids: impl IntoIterator<Item = (u64, u64)>,
        asks: impl IntoIterator<Item = (u64, u64)>,
    ) -> Self {
        Self {
            symbol,
            levels: Mutex::new(Levels {
                bids: bids.into_iter().collect(),
                asks: asks.into_iter().collect(),
            }),
        }
    }

    /// Instrument this book tracks.
    #[must_use]
    pub const fn symbol(&self) -> Symbol {
        self.symbol
    }

    /// Apply a full snapshot: clear both sides, then insert every entry.
    ///
    /// A snapshot is authoritative and never merged with prior state. A
    /// snapshot for the wrong instrument is rejected before anything is
    /// cleared, leaving the book untouched.
    pub fn apply_snapshot(&self, msg: &SnapshotRefresh) {
        info!("MD snapshot message. symbol [{}]", msg.symbol);
        let sym = match Symbol::from_wire(&msg.symbol) {
            Ok(sym) => sym,
            Err(err) => {
                error!("cannot resolve snapshot symbol, skipping. {err}");
                return;
            }
        };
        if sym != self.symbol {
            error!("wrong symbol, skipping snapshot. value [{sym}]");
            return;
        }

        let mut levels = self.lock();
        levels.bids.clear();
        levels.asks.clear();

        for entry in &msg.entries {
            let side = match Side::from_code(entry.side_code) {
                Ok(side) => side,
                Err(err) => {
                    error!("skipping snapshot entry. {err}");
                    continue;
                }
            };
            let Some(px) = encode(entry.price, sym.price_ticks_per_unit(), "price") else {
                continue;
            };
            let Some(sz) = encode(entry.size, sym.size_ticks_per_unit(), "size") else {
                continue;
            };
            match side {
                Side::Bid => levels.bids.insert(px, sz),
                Side::Ask => levels.asks.insert(px, sz),
            };
        }
    }

    /// Apply an incremental refresh entry by entry.
    ///
    /// One bad entry is logged and skipped; the rest of the batch still
    /// applies. The wire may omit the symbol on entries after the first, so
    /// the last resolved symbol carries forward within this call.
    ///
    /// `clear_on_change` is set when the feed runs at depth 1, where a
    /// CHANGE replaces the entire visible side rather than one level.
    pub fn apply_increment(&self, msg: &IncrementalRefresh, clear_on_change: bool) {
        let mut guard = self.lock();
        let levels = &mut *guard;
        let mut carried: Option<Symbol> = None;

        for entry in &msg.entries {
            if let Some(raw) = &entry.symbol {
                match Symbol::from_wire(raw) {
                    Ok(sym) => carried = Some(sym),
                    Err(err) => {
                        carried = None;
                        error!("skipping price increment. {err}");
                        continue;
                    }
                }
            }
            let Some(sym) = carried else {
                error!("missing symbol, skipping price increment");
                continue;
            };
            if sym != self.symbol {
                error!("wrong symbol, skipping price increment. value [{sym}]");
                continue;
            }

            let side = match Side::from_code(entry.side_code) {
                Ok(side) => side,
                Err(err) => {
                    error!("skipping price increment. {err}");
                    continue;
                }
            };
            let action = match UpdateAction::from_code(entry.action_code) {
                Ok(action) => action,
                Err(err) => {
                    error!("skipping price increment. {err}");
                    continue;
                }
            };
            let Some(px) = encode(entry.price, sym.price_ticks_per_unit(), "price") else {
                continue;
            };
            let side_map = match side {
                Side::Bid => &mut levels.bids,
                Side::Ask => &mut levels.asks,
            };

            match action {
                UpdateAction::Delete => {
                    // removing an absent level is a no-op, not an error
                    side_map.remove(&px);
                }
                UpdateAction::New | UpdateAction::Change => {
                    let Some(size) = entry.size else {
                        error!("missing size on {side} {action:?}, skipping price increment");
                        continue;
                    };
                    let Some(sz) = encode(size, sym.size_ticks_per_unit(), "size") else {
                        continue;
                    };
                    if action == UpdateAction::Change && clear_on_change {
                        side_map.clear();
                    }
                    side_map.insert(px, sz);
                }
            }
        }
    }

    /// Export a ranked copy of the book, best prices first.
    ///
    /// Row count is `max(#bids, #asks)`; the shorter side is padded with
    /// sentinel rows. The copy is decoupled from further mutation.
    #[must_use]
    pub fn to_vector(&self) -> Vec<BidAskRow> {
        let levels = self.lock();
        let row_count = levels.bids.len().max(levels.asks.len());
        let mut rows = Vec::with_capacity(row_count);

        let mut bids = levels.bids.iter().rev();
        let mut asks = levels.asks.iter();
        for _ in 0..row_count {
            let mut row = BidAskRow::default();
            if let Some((&px, &sz)) = bids.next() {
                row.bid_px = px;
                row.bid_sz = sz;
            }
            if let Some((&px, &sz)) = asks.next() {
                row.ask_px = px;
                row.ask_sz = sz;
            }
            rows.push(row);
        }
        rows
    }

    fn lock(&self) -> MutexGuard<'_, Levels> {
        // every critical section leaves the maps consistent, so a poisoned
        // lock still holds the last fully-applied message
        self.levels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Validate and convert one wire value to ticks.
///
/// Protocol prices and sizes are always non-negative; anything else is an
/// encoding anomaly to skip.
fn encode(value: f64, ticks_per_unit: u64, field: &str) -> Option<u64> {
    if !value.is_finite() || value < 0.0 {
        error!("malformed {field}, skipping entry. value [{value}]");
        return None;
    }
    Some(to_ticks(value, ticks_per_unit))
}
