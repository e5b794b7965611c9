//! Instrument and wire-code enums shared by the whole pipeline.
//!
//! Side and action codes arrive as raw FIX characters; the conversions here
//! return `Result` so that the book engine can treat an unknown code as a
//! per-entry anomaly instead of aborting the batch.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors produced while interpreting wire-level values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Symbol string has no known mapping
    #[error("unknown symbol. value [{0}]")]
    UnknownSymbol(String),
    /// MDEntryType code is neither bid nor offer
    #[error("unknown bid/offer entry type. value [{0}]")]
    UnknownSide(char),
    /// MDUpdateAction code has no known mapping
    #[error("unknown price action. value [{0}]")]
    UnknownAction(char),
    /// AggressorSide code has no known mapping
    #[error("unknown trade side. value [{0}]")]
    UnknownTradeSide(char),
}

/// Tracked trading instruments.
///
/// A closed enum rather than interned strings so the compiler catches a
/// missing arm when an instrument is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// BTC/USDT spot pair
    BtcUsdt,
    /// ETH/USDT spot pair
    EthUsdt,
}

impl Symbol {
    /// Resolve a wire symbol string.
    pub fn from_wire(symbol: &str) -> Result<Self, WireError> {
        match symbol {
            "BTCUSDT" => Ok(Self::BtcUsdt),
            "ETHUSDT" => Ok(Self::EthUsdt),
            other => Err(WireError::UnknownSymbol(other.to_owned())),
        }
    }

    /// The venue's symbol string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BtcUsdt => "BTCUSDT",
            Self::EthUsdt => "ETHUSDT",
        }
    }

    /// Price ticks per whole unit, the equivalent of `1 / tick_size`.
    #[must_use]
    pub const fn price_ticks_per_unit(self) -> u64 {
        match self {
            Self::BtcUsdt | Self::EthUsdt => 100,
        }
    }

    /// Size ticks per whole unit, the equivalent of `1 / lot_size`.
    #[must_use]
    pub const fn size_ticks_per_unit(self) -> u64 {
        match self {
            Self::BtcUsdt => 100_000,
            Self::EthUsdt => 10_000,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side of the book an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Buy side
    Bid,
    /// Sell side
    Ask,
}

impl Side {
    /// FIX `MDEntryType` code for the bid side.
    pub const BID_CODE: char = '0';
    /// FIX `MDEntryType` code for the offer side.
    pub const OFFER_CODE: char = '1';

    /// Resolve a FIX `MDEntryType` character.
    pub const fn from_code(code: char) -> Result<Self, WireError> {
        match code {
            Self::BID_CODE => Ok(Self::Bid),
            Self::OFFER_CODE => Ok(Self::Ask),
            other => Err(WireError::UnknownSide(other)),
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bid => f.write_str("BID"),
            Self::Ask => f.write_str("ASK"),
        }
    }
}

/// Aggressor side of a trade print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    /// Aggressor bought
    Buy,
    /// Aggressor sold
    Sell,
}

impl TradeSide {
    /// Resolve a FIX `AggressorSide` character.
    pub const fn from_code(code: char) -> Result<Self, WireError> {
        match code {
            '1' => Ok(Self::Buy),
            '2' => Ok(Self::Sell),
            other => Err(WireError::UnknownTradeSide(other)),
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => f.write_str("BUY"),
            Self::Sell => f.write_str("SELL"),
        }
    }
}

/// Action carried by an incremental book entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateAction {
    /// Insert a price level
    New,
    /// Replace a price level (or the visible side, at depth 1)
    Change,
    /// Remove a price level
    Delete,
}

impl UpdateAction {
    /// Resolve a FIX `MDUpdateAction` character.
    pub const fn from_code(code: char) -> Result<Self, WireError> {
        match code {
            '0' => Ok(Self::New),
            '1' => Ok(Self::Change),
            '2' => Ok(Self::Delete),
            other => Err(WireError::UnknownAction(other)),
        }
    }
}
