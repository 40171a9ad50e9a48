//! Error types for Schematics API calls.
//!
//! Every failure a facade method can produce is a variant of [`Error`]. The
//! variants fall into the four kinds a caller usually cares about:
//! configuration problems raised while building a client, validation problems
//! raised before any request is sent, transport failures, and non-2xx answers
//! from the service itself.

use crate::transport::throttle::RateLimitInfo;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};

/// The main error type for Schematics API calls.
///
/// # Examples
///
/// ```no_run
/// use schematics::{Error, SchematicsV1, service::GetWorkspaceOptions};
///
/// # async fn example(service: SchematicsV1) -> Result<(), Error> {
/// match service.get_workspace(&GetWorkspaceOptions::new("us-south.workspace.demo")).await {
///     Ok(response) => println!("workspace status: {:?}", response.data.status),
///     Err(Error::Api { status, body, .. }) if status.as_u16() == 404 => {
///         eprintln!("no such workspace: {:?}", body);
///     }
///     Err(Error::MissingParameter { parameter, .. }) => {
///         eprintln!("forgot to set {parameter}");
///     }
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS, TLS handshake).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request exceeded the transport timeout.
    #[error("Request timed out")]
    Timeout,

    /// The response body could not be decoded into the expected type.
    ///
    /// The raw body is preserved so the mismatch can be diagnosed.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The service answered with a non-2xx status code.
    #[error("API error {status}: {}", api_message(.body, .raw_response))]
    Api {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
        /// The decoded service error payload, when the body had one
        body: Option<ApiErrorBody>,
        /// Rate limit information parsed from headers
        rate_limit_info: Option<RateLimitInfo>,
    },

    /// A required operation parameter was missing or empty.
    ///
    /// Raised before any network call is made.
    #[error("{operation}: required parameter `{parameter}` is missing")]
    MissingParameter {
        /// The facade operation that rejected its options
        operation: &'static str,
        /// The name of the missing parameter
        parameter: &'static str,
    },

    /// Invalid client configuration: bad service properties, header values,
    /// unknown auth types or unresolved path templates.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The authenticator could not produce credentials.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// All retry attempts configured on the transport were used up.
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        /// The number of attempts made
        attempts: usize,
        /// The last error encountered
        last_error: Box<Error>,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// The error document the service returns with non-2xx responses.
///
/// Schematics answers either with the platform error envelope
/// (`errors`/`trace`/`status_code`) or with its own flat shape
/// (`requestid`/`messageid`/`message`). Both decode into this type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Individual errors reported by the service.
    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
    /// Correlation id of the failed request.
    pub trace: Option<String>,
    /// Status code echoed in the body.
    pub status_code: Option<u16>,
    /// Request id of the flat error shape.
    pub requestid: Option<String>,
    /// Message id of the flat error shape.
    pub messageid: Option<String>,
    /// Human-readable message of the flat error shape.
    pub message: Option<String>,
}

/// One entry of [`ApiErrorBody::errors`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorItem {
    pub code: Option<String>,
    pub message: Option<String>,
    pub more_info: Option<String>,
}

impl ApiErrorBody {
    /// Decodes an error body, returning `None` if it carries no recognisable field.
    pub fn parse(raw: &str) -> Option<Self> {
        let body: ApiErrorBody = serde_json::from_str(raw).ok()?;
        if body == ApiErrorBody::default() {
            return None;
        }
        Some(body)
    }

    /// Returns the most specific message in the body.
    pub fn message(&self) -> Option<&str> {
        self.errors
            .iter()
            .find_map(|e| e.message.as_deref())
            .or(self.message.as_deref())
    }
}

fn api_message<'a>(body: &'a Option<ApiErrorBody>, raw_response: &'a str) -> &'a str {
    body.as_ref()
        .and_then(ApiErrorBody::message)
        .unwrap_or(raw_response)
}

impl Error {
    /// Returns `true` if this error is potentially transient.
    ///
    /// Network errors, timeouts, 5xx and 429 answers are transient. Validation,
    /// configuration, authentication, 4xx and decoding failures are not.
    ///
    /// # Examples
    ///
    /// ```
    /// use schematics::Error;
    ///
    /// assert!(Error::Timeout.is_retryable());
    /// assert!(!Error::MissingParameter { operation: "get_job", parameter: "job_id" }.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Timeout => true,
            Error::Api { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Error::DeserializationFailed { .. }
            | Error::MissingParameter { .. }
            | Error::Configuration(_)
            | Error::Authentication(_)
            | Error::MaxRetriesExceeded { .. }
            | Error::SerializationFailed(_)
            | Error::InvalidUrl(_) => false,
        }
    }

    /// Returns `true` for errors raised before a request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingParameter { .. } | Error::SerializationFailed(_)
        )
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            Error::MaxRetriesExceeded { last_error, .. } => last_error.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Api { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns the decoded service error payload, if any.
    pub fn api_error_body(&self) -> Option<&ApiErrorBody> {
        match self {
            Error::Api { body, .. } => body.as_ref(),
            Error::MaxRetriesExceeded { last_error, .. } => last_error.api_error_body(),
            _ => None,
        }
    }

    /// Returns rate limit information if the service sent any.
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            Error::Api {
                rate_limit_info, ..
            } => rate_limit_info.as_ref(),
            _ => None,
        }
    }

    /// Returns the wait the service asked for, capped at `max_wait`.
    pub fn rate_limit_delay(&self, max_wait: std::time::Duration) -> Option<std::time::Duration> {
        self.rate_limit_info()?.delay(max_wait)
    }

    pub(crate) fn missing(operation: &'static str, parameter: &'static str) -> Self {
        tracing::debug!(operation, parameter, "Rejected options before sending");
        Error::MissingParameter {
            operation,
            parameter,
        }
    }
}

/// A specialized `Result` type for Schematics API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: StatusCode, raw: &str) -> Error {
        Error::Api {
            status,
            raw_response: raw.to_string(),
            headers: HeaderMap::new(),
            body: ApiErrorBody::parse(raw),
            rate_limit_info: None,
        }
    }

    #[test]
    fn test_platform_error_envelope_is_decoded() {
        let raw = r#"{"errors":[{"code":"not_found","message":"Workspace not found"}],"trace":"abc","status_code":404}"#;
        let body = ApiErrorBody::parse(raw).unwrap();
        assert_eq!(body.trace.as_deref(), Some("abc"));
        assert_eq!(body.status_code, Some(404));
        assert_eq!(body.message(), Some("Workspace not found"));
    }

    #[test]
    fn test_flat_error_shape_is_decoded() {
        let raw = r#"{"requestid":"r-1","messageid":"M1086","message":"Invalid refresh token"}"#;
        let body = ApiErrorBody::parse(raw).unwrap();
        assert_eq!(body.requestid.as_deref(), Some("r-1"));
        assert_eq!(body.message(), Some("Invalid refresh token"));
    }

    #[test]
    fn test_non_json_error_body_is_kept_raw() {
        assert!(ApiErrorBody::parse("upstream connect error").is_none());
        assert!(ApiErrorBody::parse(r#"{"unrelated":true}"#).is_none());

        let err = api_error(StatusCode::BAD_GATEWAY, "upstream connect error");
        assert_eq!(err.to_string(), "API error 502 Bad Gateway: upstream connect error");
    }

    #[test]
    fn test_display_prefers_decoded_message() {
        let err = api_error(
            StatusCode::NOT_FOUND,
            r#"{"errors":[{"message":"Job not found"}]}"#,
        );
        assert_eq!(err.to_string(), "API error 404 Not Found: Job not found");
    }

    #[test]
    fn test_retry_classification() {
        assert!(api_error(StatusCode::SERVICE_UNAVAILABLE, "").is_retryable());
        assert!(api_error(StatusCode::TOO_MANY_REQUESTS, "").is_retryable());
        assert!(!api_error(StatusCode::CONFLICT, "").is_retryable());
        assert!(!Error::Authentication("expired".into()).is_retryable());
    }

    #[test]
    fn test_missing_parameter_message() {
        let err = Error::missing("get_workspace", "w_id");
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "get_workspace: required parameter `w_id` is missing"
        );
    }

    #[test]
    fn test_status_looks_through_retries() {
        let err = Error::MaxRetriesExceeded {
            attempts: 3,
            last_error: Box::new(api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom")),
        };
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }
}
