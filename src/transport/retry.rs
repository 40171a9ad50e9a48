//! Retry policy for the transport.
//!
//! Facade operations never retry on their own. A client built with the default
//! [`RetryStrategy::None`] sends every request exactly once; enabling a
//! strategy here is the only way to get retries.

use crate::Error;
use rand::Rng;
use std::time::Duration;

/// How long to wait between attempts, and how many attempts to make.
///
/// ```
/// use schematics::transport::RetryStrategy;
/// use std::time::Duration;
///
/// // 1s, 2s, 4s, capped at 30s, at most 4 retries.
/// let strategy = RetryStrategy::ExponentialBackoff {
///     initial_delay: Duration::from_secs(1),
///     max_delay: Duration::from_secs(30),
///     max_retries: 4,
///     jitter: false,
/// };
/// assert_eq!(strategy.delay_for_attempt(3), Some(Duration::from_secs(4)));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RetryStrategy {
    /// Send each request once.
    #[default]
    None,

    /// Double the wait after each failed attempt, up to `max_delay`.
    ExponentialBackoff {
        /// Wait before the first retry.
        initial_delay: Duration,
        /// Longest wait between two attempts.
        max_delay: Duration,
        /// Retries allowed after the first attempt.
        max_retries: usize,
        /// Scale each wait by a random factor in `[0.5, 1.0]`.
        jitter: bool,
    },

    /// Wait the same amount before every retry.
    Linear {
        /// Wait between attempts.
        delay: Duration,
        /// Retries allowed after the first attempt.
        max_retries: usize,
    },
}

impl RetryStrategy {
    /// The policy behind the `ENABLE_RETRIES`/`MAX_RETRIES`/`RETRY_INTERVAL`
    /// service properties: jittered exponential backoff from one second,
    /// capped at `max_interval`.
    pub fn with_limits(max_retries: usize, max_interval: Duration) -> Self {
        RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_secs(1).min(max_interval),
            max_delay: max_interval,
            max_retries,
            jitter: true,
        }
    }

    /// Returns the wait before retry number `attempt` (1 = first retry), or
    /// `None` once the retries are used up.
    pub fn delay_for_attempt(&self, attempt: usize) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::ExponentialBackoff {
                initial_delay,
                max_delay,
                max_retries,
                jitter,
            } => {
                if attempt == 0 || attempt > *max_retries {
                    return None;
                }

                let exponent = u32::try_from(attempt - 1).unwrap_or(u32::MAX);
                let factor = 2u32.saturating_pow(exponent);
                let delay = initial_delay.saturating_mul(factor).min(*max_delay);

                if *jitter {
                    Some(delay.mul_f64(rand::thread_rng().gen_range(0.5..=1.0)))
                } else {
                    Some(delay)
                }
            }
            RetryStrategy::Linear { delay, max_retries } => {
                (attempt > 0 && attempt <= *max_retries).then_some(*delay)
            }
        }
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> usize {
        match self {
            RetryStrategy::None => 0,
            RetryStrategy::ExponentialBackoff { max_retries, .. }
            | RetryStrategy::Linear { max_retries, .. } => *max_retries,
        }
    }
}

/// Decides whether a failed attempt is worth repeating.
///
/// ```
/// use schematics::Error;
/// use schematics::transport::RetryPredicate;
///
/// /// Only retry throttled requests.
/// struct OnlyThrottled;
///
/// impl RetryPredicate for OnlyThrottled {
///     fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
///         error.status().is_some_and(|s| s.as_u16() == 429)
///     }
/// }
/// ```
pub trait RetryPredicate: Send + Sync {
    /// `attempt` is the 1-indexed number of the attempt that just failed.
    fn should_retry(&self, error: &Error, attempt: usize) -> bool;
}

/// Retries whatever [`Error::is_retryable`] classifies as transient.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetryOnRetryable;

impl RetryPredicate for RetryOnRetryable {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        error.is_retryable()
    }
}

/// Retries only the listed status codes.
#[derive(Debug, Clone)]
pub struct RetryOnStatus(pub Vec<u16>);

impl RetryPredicate for RetryOnStatus {
    fn should_retry(&self, error: &Error, _attempt: usize) -> bool {
        matches!(error, Error::Api { status, .. } if self.0.contains(&status.as_u16()))
    }
}

/// Retries when any inner predicate agrees.
pub struct AnyOf(pub Vec<Box<dyn RetryPredicate>>);

impl RetryPredicate for AnyOf {
    fn should_retry(&self, error: &Error, attempt: usize) -> bool {
        self.0.iter().any(|p| p.should_retry(error, attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, StatusCode};

    fn api(status: u16) -> Error {
        Error::Api {
            status: StatusCode::from_u16(status).unwrap(),
            raw_response: String::new(),
            headers: HeaderMap::new(),
            body: None,
            rate_limit_info: None,
        }
    }

    #[test]
    fn test_exponential_backoff_delays() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_millis(500),
            max_retries: 4,
            jitter: false,
        };

        assert_eq!(strategy.delay_for_attempt(1), Some(Duration::from_millis(100)));
        assert_eq!(strategy.delay_for_attempt(2), Some(Duration::from_millis(200)));
        assert_eq!(strategy.delay_for_attempt(3), Some(Duration::from_millis(400)));
        assert_eq!(strategy.delay_for_attempt(4), Some(Duration::from_millis(500)));
        assert_eq!(strategy.delay_for_attempt(5), None);
    }

    #[test]
    fn test_jitter_stays_within_half_to_full_delay() {
        let strategy = RetryStrategy::ExponentialBackoff {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(1),
            max_retries: 1,
            jitter: true,
        };
        for _ in 0..20 {
            let delay = strategy.delay_for_attempt(1).unwrap();
            assert!(delay >= Duration::from_millis(50) && delay <= Duration::from_millis(100));
        }
    }

    #[test]
    fn test_linear_delays() {
        let strategy = RetryStrategy::Linear {
            delay: Duration::from_secs(1),
            max_retries: 2,
        };

        assert_eq!(strategy.delay_for_attempt(1), Some(Duration::from_secs(1)));
        assert_eq!(strategy.delay_for_attempt(2), Some(Duration::from_secs(1)));
        assert_eq!(strategy.delay_for_attempt(3), None);
        assert_eq!(strategy.max_retries(), 2);
    }

    #[test]
    fn test_no_retry_by_default() {
        let strategy = RetryStrategy::default();
        assert_eq!(strategy.delay_for_attempt(1), None);
        assert_eq!(strategy.max_retries(), 0);
    }

    #[test]
    fn test_limits_from_service_properties() {
        let strategy = RetryStrategy::with_limits(3, Duration::from_secs(20));
        assert_eq!(strategy.max_retries(), 3);
        assert!(strategy.delay_for_attempt(3).unwrap() <= Duration::from_secs(4));
        assert_eq!(strategy.delay_for_attempt(4), None);
    }

    #[test]
    fn test_predicates() {
        assert!(RetryOnRetryable.should_retry(&api(503), 1));
        assert!(!RetryOnRetryable.should_retry(&api(404), 1));

        let only_409 = RetryOnStatus(vec![409]);
        assert!(only_409.should_retry(&api(409), 1));
        assert!(!only_409.should_retry(&api(503), 1));

        let either = AnyOf(vec![Box::new(only_409), Box::new(RetryOnRetryable)]);
        assert!(either.should_retry(&api(409), 1));
        assert!(either.should_retry(&Error::Timeout, 1));
        assert!(!either.should_retry(&api(400), 1));
    }
}
