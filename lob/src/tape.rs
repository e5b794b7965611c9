//! Fixed-capacity trade tape.
//!
//! Trades never mutate the order book; they accumulate here, oldest entries
//! evicted on overflow, and are copied out for display.

use common::TradeSide;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One executed trade, already converted to ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Venue transact time, trimmed for display
    pub time: String,
    /// Aggressor side
    pub side: TradeSide,
    /// Trade price in ticks
    pub px: u64,
    /// Trade size in ticks
    pub sz: u64,
    /// Venue trade identifier
    pub id: u64,
}

impl Trade {
    /// Create a trade record.
    #[must_use]
    pub fn new(time: impl Into<String>, side: TradeSide, px: u64, sz: u64, id: u64) -> Self {
        Self {
            time: time.into(),
            side,
            px,
            sz,
            id,
        }
    }
}

/// Append-only ring of recent trades with a fixed capacity.
#[derive(Debug)]
pub struct TradeTape {
    capacity: usize,
    ring: Mutex<VecDeque<Trade>>,
}

impl TradeTape {
    /// Create a tape holding at most `capacity` trades.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            ring: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append a trade, evicting the oldest entry when full.
    pub fn push(&self, trade: Trade) {
        let mut ring = self.lock();
        if ring.len() == self.capacity {
            ring.pop_front();
        }
        ring.push_back(trade);
    }

    /// Copy out the tape contents, oldest first.
    #[must_use]
    pub fn to_vector(&self) -> Vec<Trade> {
        self.lock().iter().cloned().collect()
    }

    /// Number of trades currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the tape holds no trades.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Trade>> {
        self.ring.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(id: u64) -> Trade {
        Trade::new("09:15:00", TradeSide::Buy, 9500, 100, id)
    }

    #[test]
    fn test_push_and_copy_out() {
        let tape = TradeTape::new(4);
        assert!(tape.is_empty());
        tape.push(trade(1));
        tape.push(trade(2));
        let copy = tape.to_vector();
        assert_eq!(copy.len(), 2);
        assert_eq!(copy[0].id, 1);
        assert_eq!(copy[1].id, 2);
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let tape = TradeTape::new(3);
        for id in 1..=5 {
            tape.push(trade(id));
        }
        let ids: Vec<u64> = tape.to_vector().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 4, 5]);
        assert_eq!(tape.len(), 3);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let tape = TradeTape::new(0);
        tape.push(trade(1));
        tape.push(trade(2));
        assert_eq!(tape.to_vector().last().map(|t| t.id), Some(2));
        assert_eq!(tape.len(), 1);
    }
}
