//! The client core shared by every facade operation.
//!
//! [`Client`] owns the immutable configuration of a service connection: the
//! service URL, the authenticator, default headers and the transport. It
//! resolves a [`Request`], authenticates it, sends it and decodes the answer.

use crate::auth::Authenticator;
use crate::request::Request;
use crate::transport::{
    HttpTransport, RateLimitConfig, RawResponse, RetryPredicate, RetryStrategy, TransportBuilder,
};
use crate::{Error, Response, Result};
use http::header::ACCEPT;
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// A configured connection to the service.
///
/// Cloning is cheap: clones share one connection pool and configuration.
///
/// ```no_run
/// use schematics::{Client, auth::BearerTokenAuthenticator};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), schematics::Error> {
/// let client = Client::builder()
///     .service_url("https://schematics.cloud.ibm.com")?
///     .authenticator(Arc::new(BearerTokenAuthenticator::new("token")?))
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    transport: HttpTransport,
    service_url: Url,
    authenticator: Arc<dyn Authenticator>,
    default_headers: HeaderMap,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base URL every request path is resolved against.
    pub fn service_url(&self) -> &Url {
        &self.inner.service_url
    }

    /// The authenticator applied to every request.
    pub fn authenticator(&self) -> &Arc<dyn Authenticator> {
        &self.inner.authenticator
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &HttpTransport {
        &self.inner.transport
    }

    /// Sends `request` and decodes a JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Transport and API errors pass through unchanged. A 2xx body that does
    /// not decode yields [`Error::DeserializationFailed`] with the raw body.
    pub async fn call<T>(&self, request: Request) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let raw = self.send(&request).await?;

        match serde_json::from_str::<T>(&raw.body) {
            Ok(data) => Ok(into_response(data, raw)),
            Err(e) => {
                tracing::error!(
                    operation = request.operation,
                    error = %e,
                    raw_response = %raw.body,
                    "Failed to deserialize response"
                );
                Err(Error::DeserializationFailed {
                    raw_response: raw.body,
                    serde_error: e.to_string(),
                    status: raw.status,
                })
            }
        }
    }

    /// Sends `request` and returns the body as text.
    ///
    /// Bodies that are a single JSON string are unquoted; anything else is
    /// returned verbatim.
    pub async fn call_text(&self, request: Request) -> Result<Response<String>> {
        let raw = self.send(&request).await?;
        let text = serde_json::from_str::<String>(&raw.body).unwrap_or_else(|_| raw.body.clone());
        Ok(into_response(text, raw))
    }

    /// Sends `request` and ignores any body.
    pub async fn call_empty(&self, request: Request) -> Result<Response<()>> {
        let raw = self.send(&request).await?;
        Ok(into_response((), raw))
    }

    async fn send(&self, request: &Request) -> Result<RawResponse> {
        let url = request.resolve_url(&self.inner.service_url)?;

        let mut headers = self.inner.default_headers.clone();
        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }
        self.inner.authenticator.authenticate(&mut headers).await?;

        self.inner.transport.execute(request, &url, &headers).await
    }
}

fn into_response<T>(data: T, raw: RawResponse) -> Response<T> {
    Response::new(
        data,
        raw.body,
        raw.status,
        raw.headers,
        raw.latency,
        raw.attempts,
    )
}

/// Builder for [`Client`].
pub struct ClientBuilder {
    service_url: Option<Url>,
    authenticator: Option<Arc<dyn Authenticator>>,
    default_headers: HeaderMap,
    transport: TransportBuilder,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Self {
            service_url: None,
            authenticator: None,
            default_headers,
            transport: TransportBuilder::new(),
        }
    }

    /// Sets the service URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn service_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.service_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the authenticator.
    pub fn authenticator(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticator = Some(authenticator);
        self
    }

    /// Adds a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the retry strategy. Requests are sent once by default.
    pub fn retry_strategy(mut self, strategy: RetryStrategy) -> Self {
        self.transport = self.transport.retry_strategy(strategy);
        self
    }

    /// Sets which failures are retried when a strategy is enabled.
    pub fn retry_predicate(mut self, predicate: Box<dyn RetryPredicate>) -> Self {
        self.transport = self.transport.retry_predicate(predicate);
        self
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport = self.transport.timeout(timeout);
        self
    }

    /// Sets how server backoff headers are honoured during retries.
    pub fn rate_limit_config(mut self, config: RateLimitConfig) -> Self {
        self.transport = self.transport.rate_limit_config(config);
        self
    }

    /// Accept invalid TLS certificates from the service.
    pub fn disable_ssl_verification(mut self, disable: bool) -> Self {
        self.transport = self.transport.disable_ssl_verification(disable);
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.transport = self.transport.user_agent(user_agent);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the service URL or the
    /// authenticator is missing, or the transport cannot be built.
    pub fn build(self) -> Result<Client> {
        let service_url = self
            .service_url
            .ok_or_else(|| Error::Configuration("Service URL is required".to_string()))?;
        if service_url.cannot_be_a_base() {
            return Err(Error::Configuration(format!(
                "Service URL {} cannot carry a path",
                service_url
            )));
        }

        let authenticator = self
            .authenticator
            .ok_or_else(|| Error::Configuration("An authenticator is required".to_string()))?;

        tracing::debug!(
            service_url = %service_url,
            auth_type = %authenticator.auth_type(),
            "Building client"
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport: self.transport.build()?,
                service_url,
                authenticator,
                default_headers: self.default_headers,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
