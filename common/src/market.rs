//! Parsed feed events handed from the protocol adapter to consumers.
//!
//! Side and action stay as raw wire character codes here. The book engine
//! validates them entry by entry, so a single bad entry is logged and
//! skipped rather than poisoning the rest of its batch.

use serde::{Deserialize, Serialize};

/// A book event carried on the price queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MarketEvent {
    /// Full replacement of both sides
    Snapshot(SnapshotRefresh),
    /// Per-level deltas relative to current state
    Increment(IncrementalRefresh),
}

/// Full market-data snapshot for one instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRefresh {
    /// Wire symbol the snapshot belongs to
    pub symbol: String,
    /// Price levels for both sides
    pub entries: Vec<SnapshotEntry>,
}

impl SnapshotRefresh {
    /// Create a snapshot message.
    #[must_use]
    pub fn new(symbol: impl Into<String>, entries: Vec<SnapshotEntry>) -> Self {
        Self {
            symbol: symbol.into(),
            entries,
        }
    }
}

/// One price level inside a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// FIX `MDEntryType` code (bid/offer)
    pub side_code: char,
    /// Level price in market units
    pub price: f64,
    /// Level size in market units
    pub size: f64,
}

impl SnapshotEntry {
    /// Create a snapshot entry.
    #[must_use]
    pub const fn new(side_code: char, price: f64, size: f64) -> Self {
        Self {
            side_code,
            price,
            size,
        }
    }
}

/// Incremental market-data refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalRefresh {
    /// Per-level deltas, in wire order
    pub entries: Vec<IncrementEntry>,
}

impl IncrementalRefresh {
    /// Create an incremental message.
    #[must_use]
    pub const fn new(entries: Vec<IncrementEntry>) -> Self {
        Self { entries }
    }
}

/// One delta inside an incremental refresh.
///
/// The wire omits the symbol on entries after the first when unchanged;
/// `None` means "carried forward from the previous entry in this message".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementEntry {
    /// Wire symbol, absent when carried forward
    pub symbol: Option<String>,
    /// FIX `MDEntryType` code (bid/offer)
    pub side_code: char,
    /// FIX `MDUpdateAction` code (new/change/delete)
    pub action_code: char,
    /// Level price in market units
    pub price: f64,
    /// Level size in market units, absent on deletes
    pub size: Option<f64>,
}

impl IncrementEntry {
    /// Create an increment entry.
    #[must_use]
    pub fn new(
        symbol: Option<&str>,
        side_code: char,
        action_code: char,
        price: f64,
        size: Option<f64>,
    ) -> Self {
        Self {
            symbol: symbol.map(str::to_owned),
            side_code,
            action_code,
            price,
            size,
        }
    }
}

/// A trade print carried on the trade queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRefresh {
    /// Wire symbol the trade belongs to
    pub symbol: String,
    /// Venue transact time, already trimmed for display
    pub time: String,
    /// FIX `AggressorSide` code
    pub side_code: char,
    /// Trade price in market units
    pub price: f64,
    /// Trade size in market units
    pub size: f64,
    /// Venue trade identifier
    pub id: u64,
}

impl TradeRefresh {
    /// Create a trade print.
    #[must_use]
    pub fn new(
        symbol: impl Into<String>,
        time: impl Into<String>,
        side_code: char,
        price: f64,
        size: f64,
        id: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            time: time.into(),
            side_code,
            price,
            size,
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_event_serde() -> Result<(), Box<dyn std::error::Error>> {
        let event = MarketEvent::Snapshot(SnapshotRefresh::new(
            "BTCUSDT",
            vec![SnapshotEntry::new('0', 95.0, 10.0)],
        ));
        let encoded = bincode::serialize(&event)?;
        let decoded: MarketEvent = bincode::deserialize(&encoded)?;
        match decoded {
            MarketEvent::Snapshot(snap) => {
                assert_eq!(snap.symbol, "BTCUSDT");
                assert_eq!(snap.entries.len(), 1);
                assert_eq!(snap.entries[0].side_code, '0');
            }
            MarketEvent::Increment(_) => panic!("decoded wrong variant"),
        }
        Ok(())
    }

    #[test]
    fn test_increment_entry_carry_forward_shape() {
        let first = IncrementEntry::new(Some("BTCUSDT"), '0', '0', 95.0, Some(10.0));
        let second = IncrementEntry::new(None, '1', '2', 96.0, None);
        assert_eq!(first.symbol.as_deref(), Some("BTCUSDT"));
        assert!(second.symbol.is_none());
        assert!(second.size.is_none());
    }
}
