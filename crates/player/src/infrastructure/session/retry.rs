//! Reconnect budget applied after the engine is lost.
//!
//! Runtime-agnostic: the session connection asks for the next delay and does
//! the waiting itself.

pub const BACKOFF_MULTIPLIER: f64 = 2.0;
pub const MAX_RETRY_DELAY_MS: u64 = 30_000;

/// How the session reconnects after an engine loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Automatic attempts per loss. `0` disables automatic reconnects.
    pub max_attempts: u32,
    /// Delay before the first attempt. `0` means immediately.
    pub initial_delay_ms: u64,
}

impl Default for ReconnectPolicy {
    /// One immediate attempt.
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay_ms: 0,
        }
    }
}

/// Exponential backoff state for one loss episode.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectBudget {
    policy: ReconnectPolicy,
    attempts: u32,
    delay_ms: u64,
}

impl ReconnectBudget {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
            delay_ms: policy.initial_delay_ms,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.policy);
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
    }

    /// Advance to the next attempt, updating the delay for the subsequent attempt.
    ///
    /// Returns the delay to wait *before* performing this attempt.
    pub fn next_delay_and_advance(&mut self) -> Option<u64> {
        if self.is_exhausted() {
            return None;
        }

        let current_delay = self.delay_ms;
        self.attempts += 1;
        self.delay_ms =
            ((self.delay_ms as f64) * BACKOFF_MULTIPLIER).min(MAX_RETRY_DELAY_MS as f64) as u64;
        Some(current_delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_allows_one_immediate_attempt() {
        let mut budget = ReconnectBudget::new(ReconnectPolicy::default());

        assert_eq!(budget.next_delay_and_advance(), Some(0));
        assert!(budget.is_exhausted());
        assert_eq!(budget.next_delay_and_advance(), None);
    }

    #[test]
    fn test_delays_grow_and_cap() {
        let mut budget = ReconnectBudget::new(ReconnectPolicy {
            max_attempts: 4,
            initial_delay_ms: 10_000,
        });

        assert_eq!(budget.next_delay_and_advance(), Some(10_000));
        assert_eq!(budget.next_delay_and_advance(), Some(20_000));
        assert_eq!(budget.next_delay_and_advance(), Some(30_000));
        assert_eq!(budget.next_delay_and_advance(), Some(30_000));
        assert_eq!(budget.next_delay_and_advance(), None);
    }

    #[test]
    fn test_reset_restores_budget() {
        let mut budget = ReconnectBudget::new(ReconnectPolicy::default());
        budget.next_delay_and_advance();
        budget.reset();

        assert_eq!(budget.attempts(), 0);
        assert!(!budget.is_exhausted());
    }

    #[test]
    fn test_zero_attempts_never_retries() {
        let mut budget = ReconnectBudget::new(ReconnectPolicy {
            max_attempts: 0,
            initial_delay_ms: 0,
        });
        assert_eq!(budget.next_delay_and_advance(), None);
    }
}
