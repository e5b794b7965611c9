//! Feed configuration.

use common::Symbol;

/// Venue's maximum book depth subscription.
pub const MAX_DEPTH: u16 = 100;
/// Trades kept on the tape before eviction.
pub const DEFAULT_TAPE_CAPACITY: usize = 512;

/// Static configuration for one market feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Feed name, used as the worker thread prefix
    pub name: String,
    /// Instrument this feed tracks
    pub symbol: Symbol,
    /// Subscribed book depth; 1 means top-of-book only
    pub max_depth: u16,
    /// Trade tape capacity
    pub tape_capacity: usize,
}

impl FeedConfig {
    /// Create a config with default depth and tape capacity.
    #[must_use]
    pub fn new(name: impl Into<String>, symbol: Symbol) -> Self {
        Self {
            name: name.into(),
            symbol,
            max_depth: MAX_DEPTH,
            tape_capacity: DEFAULT_TAPE_CAPACITY,
        }
    }

    /// At depth 1 the venue sends CHANGE events that replace the whole
    /// visible side, so the book must clear that side before the upsert.
    #[must_use]
    pub const fn clear_on_change(&self) -> bool {
        self.max_depth == 1
    }
}
