//! Successful operation results.
//!
//! [`Response`] pairs the decoded value with what the transport saw: status,
//! headers, raw body, latency and the number of attempts.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A decoded success response.
///
/// Dereferences to the decoded value, so fields of the result can be read
/// directly off the response.
///
/// ```no_run
/// use schematics::{SchematicsV1, service::GetJobOptions};
///
/// # async fn example(service: SchematicsV1) -> Result<(), schematics::Error> {
/// let job = service.get_job(&GetJobOptions::new("job-id")).await?;
///
/// assert_eq!(job.status_code(), 200);
/// println!("job {:?} took {:?}", job.id, job.latency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded body. `()` for operations without one.
    pub data: T,

    /// The body exactly as received.
    pub raw_body: String,

    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from the first attempt until the response arrived.
    pub latency: Duration,

    /// Attempts the transport made; `1` unless retries are enabled.
    pub attempts: usize,
}

impl<T> Response<T> {
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Consumes the response, keeping only the decoded value.
    pub fn into_data(self) -> T {
        self.data
    }

    /// The numeric status code.
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Returns `true` if the transport needed more than one attempt.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name, if present and valid UTF-8.
    ///
    /// ```
    /// # use schematics::Response;
    /// # use http::{HeaderMap, HeaderValue, StatusCode};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("x-request-id", HeaderValue::from_static("req-42"));
    ///
    /// let response = Response::new((), String::new(), StatusCode::NO_CONTENT, headers, Duration::ZERO, 1);
    /// assert_eq!(response.header("x-request-id"), Some("req-42"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
