use std::time::Duration;

use crate::error::FabricError;

/// Default wait between a submission being acknowledged and its transaction
/// being queryable.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(3);

/// How long to wait for a submitted transaction before (and while) looking it up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Wait once, then look the transaction up once.
    Fixed(Duration),
    /// Wait `interval`, look up, and repeat until the transaction reaches a
    /// terminal status or `max_attempts` lookups were made.
    Poll { interval: Duration, max_attempts: u32 },
}

impl Default for SettlePolicy {
    fn default() -> Self {
        SettlePolicy::Fixed(DEFAULT_SETTLE_DELAY)
    }
}

impl SettlePolicy {
    pub fn validate(&self) -> Result<(), FabricError> {
        match self {
            SettlePolicy::Poll { max_attempts: 0, .. } => {
                Err(FabricError::validation("poll policy needs at least one attempt"))
            },
            _ => Ok(()),
        }
    }

    /// Upper bound on time spent waiting, excluding the requests themselves.
    pub fn max_wait(&self) -> Duration {
        match self {
            SettlePolicy::Fixed(delay) => *delay,
            SettlePolicy::Poll { interval, max_attempts } => interval.saturating_mul(*max_attempts),
        }
    }
}
