//! The HTTP transport: connection pooling, TLS, timeouts, retries and
//! server-requested backoff.
//!
//! [`HttpTransport::execute`] sends an already-resolved request. Non-2xx
//! answers come back as [`Error::Api`] so the retry predicate can inspect them;
//! decoding successful bodies is left to the client.

pub mod retry;
pub mod throttle;

pub use retry::{AnyOf, RetryOnRetryable, RetryOnStatus, RetryPredicate, RetryStrategy};
pub use throttle::{RateLimitConfig, RateLimitInfo};

use crate::error::ApiErrorBody;
use crate::request::{Request, RequestBody};
use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use std::time::{Duration, Instant};
use url::Url;

/// User agent sent when the caller does not configure one.
pub const DEFAULT_USER_AGENT: &str = concat!("schematics-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// A successful exchange before its body is decoded.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
    /// Time from the first attempt until this response arrived.
    pub latency: Duration,
    /// Attempts made, including the successful one.
    pub attempts: usize,
}

/// Executes requests over a pooled `reqwest` client.
pub struct HttpTransport {
    http_client: reqwest::Client,
    retry_strategy: RetryStrategy,
    retry_predicate: Box<dyn RetryPredicate>,
    timeout: Option<Duration>,
    rate_limit_config: RateLimitConfig,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("retry_strategy", &self.retry_strategy)
            .field("timeout", &self.timeout)
            .field("rate_limit_config", &self.rate_limit_config)
            .finish()
    }
}

impl HttpTransport {
    /// Starts configuring a transport.
    pub fn builder() -> TransportBuilder {
        TransportBuilder::new()
    }

    /// The retry policy in force.
    pub fn retry_strategy(&self) -> &RetryStrategy {
        &self.retry_strategy
    }

    /// Sends `request` to `url` with `headers`, retrying as configured.
    pub async fn execute(
        &self,
        request: &Request,
        url: &Url,
        headers: &HeaderMap,
    ) -> Result<RawResponse> {
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.send_once(request, url, headers, attempt).await {
                Ok((status, headers, body)) => {
                    let latency = start_time.elapsed();
                    tracing::info!(
                        operation = request.operation,
                        status = status.as_u16(),
                        latency_ms = latency.as_millis(),
                        attempts = attempt,
                        "Received HTTP response"
                    );
                    return Ok(RawResponse {
                        status,
                        headers,
                        body,
                        latency,
                        attempts: attempt,
                    });
                }
                Err(e) => e,
            };

            tracing::warn!(
                error = %error,
                attempt = attempt,
                operation = request.operation,
                method = %request.method,
                "Request failed"
            );

            if !self.retry_predicate.should_retry(&error, attempt) {
                return Err(error);
            }

            let backoff = self.retry_strategy.delay_for_attempt(attempt);
            let server_wait = if self.rate_limit_config.enabled && backoff.is_some() {
                error.rate_limit_delay(self.rate_limit_config.max_wait)
            } else {
                None
            };

            match server_wait.or(backoff) {
                Some(delay) => {
                    tracing::info!(
                        delay_ms = delay.as_millis(),
                        attempt = attempt,
                        rate_limited = server_wait.is_some(),
                        "Retrying request after delay"
                    );
                    tokio::time::sleep(delay).await;
                }
                None if attempt == 1 => return Err(error),
                None => {
                    return Err(Error::MaxRetriesExceeded {
                        attempts: attempt,
                        last_error: Box::new(error),
                    });
                }
            }
        }
    }

    /// One attempt. Non-2xx answers become [`Error::Api`].
    async fn send_once(
        &self,
        request: &Request,
        url: &Url,
        headers: &HeaderMap,
        attempt: usize,
    ) -> Result<(StatusCode, HeaderMap, String)> {
        tracing::debug!(
            operation = request.operation,
            method = %request.method,
            url = %url,
            attempt = attempt,
            "Executing HTTP request"
        );

        let mut builder = self
            .http_client
            .request(request.method.clone(), url.clone())
            .headers(headers.clone());

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    let file = reqwest::multipart::Part::bytes(part.data.clone())
                        .file_name(part.file_name.clone())
                        .mime_str(&part.content_type)
                        .map_err(|e| {
                            Error::Configuration(format!("Invalid content type: {}", e))
                        })?;
                    form = form.part(part.field.clone(), file);
                }
                builder.multipart(form)
            }
        };

        let response = builder.send().await.map_err(map_send_error)?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let body = response.text().await.map_err(map_send_error)?;

        if status.is_success() {
            return Ok((status, response_headers, body));
        }

        if status.is_client_error() {
            tracing::error!(
                operation = request.operation,
                status = status.as_u16(),
                response = %body,
                "Client error (4xx)"
            );
        } else {
            tracing::warn!(
                operation = request.operation,
                status = status.as_u16(),
                response = %body,
                "Server error"
            );
        }

        Err(Error::Api {
            status,
            rate_limit_info: self.rate_limit_config.inspect(&response_headers),
            body: ApiErrorBody::parse(&body),
            raw_response: body,
            headers: response_headers,
        })
    }
}

fn map_send_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(error)
    }
}

/// Builder for [`HttpTransport`].
pub struct TransportBuilder {
    retry_strategy: RetryStrategy,
    retry_predicate: Option<Box<dyn RetryPredicate>>,
    timeout: Option<Duration>,
    rate_limit_config: RateLimitConfig,
    disable_ssl_verification: bool,
    user_agent: String,
}

impl TransportBuilder {
    /// A transport that sends each request once, with no timeout.
    pub fn new() -> Self {
        Self {
            retry_strategy: RetryStrategy::None,
            retry_predicate: None,
            timeout: None,
            rate_limit_config: RateLimitConfig::default(),
            disable_ssl_verification: false,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Sets the retry strategy for failed requests.
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.retry_strategy = strategy;
        self
    }

    /// Sets which failures are retried. Defaults to [`RetryOnRetryable`].
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.retry_predicate = Some(predicate);
        self
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets how server backoff headers are honoured.
    pub fn rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit_config = config;
        self
    }

    /// Accept invalid TLS certificates from the service.
    pub fn disable_ssl_verification(mut self, disable: bool) -> Self {
        self.disable_ssl_verification = disable;
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the underlying client cannot be built.
    pub fn build(self) -> Result<HttpTransport> {
        if self.disable_ssl_verification {
            tracing::warn!("TLS certificate verification is disabled");
        }

        let http_client = reqwest::Client::builder()
            .user_agent(self.user_agent)
            .danger_accept_invalid_certs(self.disable_ssl_verification)
            .build()
            .map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(HttpTransport {
            http_client,
            retry_strategy: self.retry_strategy,
            retry_predicate: self
                .retry_predicate
                .unwrap_or_else(|| Box::new(RetryOnRetryable)),
            timeout: self.timeout,
            rate_limit_config: self.rate_limit_config,
        })
    }
}

impl Default for TransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}
