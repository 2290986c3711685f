//! Resilient fetcher
//!
//! Bounded retry with a fixed delay between attempts. Transient failures are
//! retried; permanent ones (client errors, malformed payloads) return at once.

use crate::error::FetchError;
use crate::runtime::Sleeper;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Retry count and delay, fixed for the process lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    /// Delay between attempts
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Total attempts including the first one
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: Duration::from_secs(60),
        }
    }
}

/// Wraps fallible operations with the retry policy
#[derive(Clone)]
pub struct ResilientFetcher {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for ResilientFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientFetcher")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ResilientFetcher {
    pub fn new(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    /// Run `op` until it succeeds, fails permanently, or attempts run out
    ///
    /// `label` identifies the call in the per-attempt log lines.
    pub fn fetch<T, F>(&self, label: &str, mut op: F) -> Result<T, FetchError>
    where
        F: FnMut() -> Result<T, FetchError>,
    {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match op() {
                Ok(value) => {
                    if attempt > 1 {
                        log::info!("{}: succeeded on attempt {}", label, attempt);
                    }
                    return Ok(value);
                }
                Err(e) => e,
            };

            if !err.is_transient() {
                log::warn!("{}: attempt {} failed permanently: {}", label, attempt, err);
                return Err(err);
            }

            if attempt >= max_attempts {
                log::error!(
                    "{}: attempt {}/{} failed: {}; giving up",
                    label,
                    attempt,
                    max_attempts,
                    err
                );
                return Err(FetchError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            log::warn!(
                "{}: attempt {}/{} failed: {}; retrying in {:?}",
                label,
                attempt,
                max_attempts,
                err,
                self.policy.delay
            );
            self.sleeper.sleep(self.policy.delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RecordingSleeper;
    use std::cell::Cell;

    fn fetcher(retries: u32) -> (ResilientFetcher, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::default());
        let fetcher = ResilientFetcher::new(
            RetryPolicy::new(retries, Duration::from_secs(60)),
            sleeper.clone(),
        );
        (fetcher, sleeper)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.retries, 3);
        assert_eq!(policy.delay, Duration::from_secs(60));
        assert_eq!(policy.max_attempts(), 4);
    }

    #[test]
    fn test_debug_shows_policy() {
        let (fetcher, _) = fetcher(2);
        let debug = format!("{:?}", fetcher);
        assert!(debug.starts_with("ResilientFetcher"));
        assert!(debug.contains("retries: 2"));
    }

    #[test]
    fn test_always_failing_makes_four_attempts() {
        let (fetcher, sleeper) = fetcher(3);
        let calls = Cell::new(0);

        let result: Result<(), _> = fetcher.fetch("test", || {
            calls.set(calls.get() + 1);
            Err(FetchError::Transport("connection refused".into()))
        });

        assert_eq!(calls.get(), 4);
        assert_eq!(sleeper.sleeps(), vec![Duration::from_secs(60); 3]);
        match result {
            Err(FetchError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 4);
                assert!(matches!(*last, FetchError::Transport(_)));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_success_after_transient_failures() {
        let (fetcher, sleeper) = fetcher(3);
        let calls = Cell::new(0);

        let result = fetcher.fetch("test", || {
            calls.set(calls.get() + 1);
            if calls.get() < 3 {
                Err(FetchError::Status {
                    status: 502,
                    body: String::new(),
                })
            } else {
                Ok(42)
            }
        });

        assert_eq!(result, Ok(42));
        assert_eq!(calls.get(), 3);
        assert_eq!(sleeper.sleeps().len(), 2);
    }

    #[test]
    fn test_permanent_failure_is_not_retried() {
        let (fetcher, sleeper) = fetcher(3);
        let calls = Cell::new(0);

        let result: Result<(), _> = fetcher.fetch("test", || {
            calls.set(calls.get() + 1);
            Err(FetchError::Status {
                status: 401,
                body: "Unauthorized".into(),
            })
        });

        assert_eq!(calls.get(), 1);
        assert!(sleeper.sleeps().is_empty());
        assert!(matches!(result, Err(FetchError::Status { status: 401, .. })));
    }

    #[test]
    fn test_zero_retries_single_attempt() {
        let (fetcher, sleeper) = fetcher(0);
        let calls = Cell::new(0);

        let result: Result<(), _> = fetcher.fetch("test", || {
            calls.set(calls.get() + 1);
            Err(FetchError::Transport("timeout".into()))
        });

        assert_eq!(calls.get(), 1);
        assert!(sleeper.sleeps().is_empty());
        assert!(matches!(
            result,
            Err(FetchError::RetriesExhausted { attempts: 1, .. })
        ));
    }
}
