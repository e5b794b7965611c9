//! Adaptive spin-then-sleep backoff for empty-queue polling.

use std::thread;
use std::time::Duration;

/// Yield this many times before the sleep phase starts.
const MIN_SPINS: u32 = 10;
/// First sleep once spinning is exhausted.
const INITIAL_SLEEP: Duration = Duration::from_micros(10);
/// Ceiling for the exponential sleep.
const MAX_SLEEP: Duration = Duration::from_millis(1);

/// Spin via cooperative yield for a bounded number of iterations, then
/// sleep with an exponentially increasing delay capped at 1ms.
///
/// Bounds wasted CPU while idle and latency during bursts, without a
/// blocking primitive coupling producer and consumer lifetimes. Reset on
/// every successful dequeue.
#[derive(Debug)]
pub struct Backoff {
    spins: u32,
    sleep: Duration,
}

impl Backoff {
    /// Fresh backoff in the spin phase.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            spins: 0,
            sleep: INITIAL_SLEEP,
        }
    }

    /// Wait once: a yield while spinning, otherwise a sleep that doubles up
    /// to the cap.
    pub fn snooze(&mut self) {
        if self.spins < MIN_SPINS {
            self.spins += 1;
            thread::yield_now();
        } else {
            thread::sleep(self.sleep);
            self.sleep = (self.sleep * 2).min(MAX_SLEEP);
        }
    }

    /// Return to the spin phase.
    pub const fn reset(&mut self) {
        self.spins = 0;
        self.sleep = INITIAL_SLEEP;
    }

    /// Whether the spin budget is exhausted and further waits will sleep.
    #[must_use]
    pub const fn is_sleeping(&self) -> bool {
        self.spins >= MIN_SPINS
    }

    /// The delay the next sleep-phase wait will use.
    #[must_use]
    pub const fn sleep_interval(&self) -> Duration {
        self.sleep
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
