//! Server-requested backoff.
//!
//! When the service throttles a caller it answers `429` together with headers
//! saying how long to back off. [`RateLimitInfo`] reads those headers and
//! [`RateLimitConfig`] decides whether the transport honours them.

use http::HeaderMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Backoff hints extracted from a response's headers.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitInfo {
    /// Wait requested through `Retry-After`.
    pub retry_after: Option<Duration>,

    /// Window reset time from `X-RateLimit-Reset` or `RateLimit-Reset`.
    pub reset_at: Option<SystemTime>,

    /// Requests left in the current window.
    pub remaining: Option<u64>,
}

impl RateLimitInfo {
    /// Reads backoff hints from response headers.
    ///
    /// `Retry-After` is accepted as delay-seconds or as an HTTP date. Reset
    /// headers are Unix timestamps in seconds.
    ///
    /// ```
    /// use schematics::transport::RateLimitInfo;
    /// use http::HeaderMap;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("retry-after", "5".parse().unwrap());
    ///
    /// let info = RateLimitInfo::from_headers(&headers);
    /// assert!(info.is_rate_limited());
    /// ```
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            retry_after: header_str(headers, "retry-after").and_then(parse_retry_after),
            reset_at: header_str(headers, "x-ratelimit-reset")
                .or_else(|| header_str(headers, "ratelimit-reset"))
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| UNIX_EPOCH + Duration::from_secs(secs)),
            remaining: header_str(headers, "x-ratelimit-remaining").and_then(|v| v.parse().ok()),
        }
    }

    /// Returns the wait before the next attempt, never longer than `max_wait`.
    ///
    /// An explicit `Retry-After` wins over the reset timestamp.
    pub fn delay(&self, max_wait: Duration) -> Option<Duration> {
        if let Some(retry_after) = self.retry_after {
            return Some(retry_after.min(max_wait));
        }

        let until_reset = self.reset_at?.duration_since(SystemTime::now()).ok()?;
        Some(until_reset.min(max_wait))
    }

    /// Returns `true` when the headers signal an active limit.
    pub fn is_rate_limited(&self) -> bool {
        self.retry_after.is_some() || self.remaining == Some(0)
    }
}

/// Whether and how long the transport waits on server backoff hints.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Honour backoff headers on retryable failures.
    pub enabled: bool,

    /// Upper bound on a single server-requested wait. Defaults to 5 minutes.
    pub max_wait: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_wait: Duration::from_secs(300),
        }
    }
}

impl RateLimitConfig {
    /// A configuration that ignores backoff headers entirely.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Sets the cap on a single wait.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Extracts hints from `headers` when enabled and a limit is active.
    pub(crate) fn inspect(&self, headers: &HeaderMap) -> Option<RateLimitInfo> {
        if !self.enabled {
            return None;
        }
        let info = RateLimitInfo::from_headers(headers);
        info.is_rate_limited().then_some(info)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    if let Ok(seconds) = value.trim().parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }
    httpdate::parse_http_date(value)
        .ok()?
        .duration_since(SystemTime::now())
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn test_retry_after_seconds() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("60"));

        let info = RateLimitInfo::from_headers(&headers);
        assert_eq!(info.retry_after, Some(Duration::from_secs(60)));
        assert!(info.is_rate_limited());
    }

    #[test]
    fn test_retry_after_http_date() {
        let when = SystemTime::now() + Duration::from_secs(120);
        let mut headers = HeaderMap::new();
        headers.insert(
            "retry-after",
            HeaderValue::from_str(&httpdate::fmt_http_date(when)).unwrap(),
        );

        let delay = RateLimitInfo::from_headers(&headers)
            .delay(Duration::from_secs(300))
            .unwrap();
        assert!(delay > Duration::from_secs(100) && delay <= Duration::from_secs(120));
    }

    #[test]
    fn test_reset_timestamp_with_no_remaining() {
        let reset = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 2;
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-ratelimit-reset",
            HeaderValue::from_str(&reset.to_string()).unwrap(),
        );
        headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));

        let info = RateLimitInfo::from_headers(&headers);
        assert!(info.is_rate_limited());
        let delay = info.delay(Duration::from_secs(300)).unwrap();
        // Whole-second timestamps truncate the sub-second part.
        assert!(delay >= Duration::from_secs(1) && delay <= Duration::from_secs(3));
    }

    #[test]
    fn test_draft_reset_header() {
        let mut headers = HeaderMap::new();
        headers.insert("ratelimit-reset", HeaderValue::from_static("4102444800"));
        assert!(RateLimitInfo::from_headers(&headers).reset_at.is_some());
    }

    #[test]
    fn test_delay_capped_by_max_wait() {
        let info = RateLimitInfo {
            retry_after: Some(Duration::from_secs(600)),
            reset_at: None,
            remaining: Some(0),
        };
        assert_eq!(
            info.delay(Duration::from_secs(30)),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_disabled_config_ignores_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("1"));

        assert!(RateLimitConfig::default().inspect(&headers).is_some());
        assert!(RateLimitConfig::disabled().inspect(&headers).is_none());
        assert!(RateLimitConfig::default().inspect(&HeaderMap::new()).is_none());
    }
}
