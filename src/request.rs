//! Request descriptions produced from operation options.
//!
//! Every facade method turns its options into a [`Request`]: method, a path
//! template with named parameters, query pairs, headers and an optional body.
//! The client resolves the template against the service URL and hands the
//! result to the transport.

use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use url::Url;

/// A fully described call to one service operation.
#[derive(Debug, Clone)]
pub struct Request {
    /// Facade operation name, used in logs and errors.
    pub operation: &'static str,

    /// The HTTP method.
    pub method: Method,

    /// Path template relative to the service URL, e.g. `/v1/workspaces/{w_id}`.
    pub path: &'static str,

    /// Values substituted for `{name}` segments of [`Request::path`].
    pub path_params: Vec<(&'static str, String)>,

    /// Headers specific to this operation.
    pub headers: HeaderMap,

    /// Query pairs, in insertion order.
    pub query_params: Vec<(String, String)>,

    /// The request body.
    pub body: RequestBody,
}

/// Payload of a [`Request`].
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    /// A JSON document.
    Json(serde_json::Value),
    /// A `multipart/form-data` upload.
    Multipart(Vec<FilePart>),
}

/// One file of a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the service.
    pub file_name: String,
    /// MIME type of the part.
    pub content_type: String,
    /// File contents.
    pub data: Vec<u8>,
}

impl FilePart {
    /// A template archive in the `file` field, the form every upload
    /// operation expects.
    pub fn tar(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            field: "file".to_string(),
            file_name: file_name.into(),
            content_type: "application/octet-stream".to_string(),
            data: data.into(),
        }
    }

    /// Overrides the MIME type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

impl Request {
    /// Starts a request for `operation` with the given method and path template.
    pub fn new(operation: &'static str, method: Method, path: &'static str) -> Self {
        Self {
            operation,
            method,
            path,
            path_params: Vec::new(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Binds a `{name}` segment of the path template.
    pub fn path_param(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.path_params.push((name, value.into()));
        self
    }

    /// Adds a header.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn header(mut self, name: &str, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name)
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value for {}: {}", name, e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a header when `value` is set.
    pub fn header_opt(self, name: &str, value: Option<&str>) -> Result<Self> {
        match value {
            Some(value) => self.header(name, value),
            None => Ok(self),
        }
    }

    /// Adds a query pair.
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query_params.push((key.to_string(), value.to_string()));
        self
    }

    /// Adds a query pair when `value` is set.
    pub fn query_opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.query(key, value),
            None => self,
        }
    }

    /// Serializes `body` as the JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`] if `body` cannot be represented as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        let value =
            serde_json::to_value(body).map_err(|e| Error::SerializationFailed(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Attaches a file to a multipart payload.
    pub fn file(mut self, part: FilePart) -> Self {
        match &mut self.body {
            RequestBody::Multipart(parts) => parts.push(part),
            _ => self.body = RequestBody::Multipart(vec![part]),
        }
        self
    }

    /// Resolves the path template and query against `base`.
    ///
    /// Path parameter values are percent-encoded as single segments, so a
    /// value containing `/` cannot escape its position in the path. Any path
    /// already present on `base` is kept as a prefix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a template segment has no bound value
    /// or `base` cannot carry a path.
    pub fn resolve_url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                Error::Configuration(format!("Service URL {} cannot carry a path", base))
            })?;
            segments.pop_if_empty();

            for segment in self.path.split('/').filter(|s| !s.is_empty()) {
                match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                    Some(name) => {
                        let value = self
                            .path_params
                            .iter()
                            .find(|(param, _)| *param == name)
                            .map(|(_, value)| value.as_str())
                            .ok_or_else(|| {
                                Error::Configuration(format!(
                                    "{}: path parameter `{}` is not bound",
                                    self.operation, name
                                ))
                            })?;
                        segments.push(value);
                    }
                    None => {
                        segments.push(segment);
                    }
                }
            }
        }

        if !self.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query_params);
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://schematics.example.com").unwrap()
    }

    #[test]
    fn test_resolves_path_params_in_place() {
        let request = Request::new(
            "get_workspace_activity",
            Method::GET,
            "/v1/workspaces/{w_id}/actions/{activity_id}",
        )
        .path_param("activity_id", "act-1")
        .path_param("w_id", "ws-1");

        let url = request.resolve_url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://schematics.example.com/v1/workspaces/ws-1/actions/act-1"
        );
    }

    #[test]
    fn test_path_values_are_encoded_as_single_segments() {
        let request = Request::new("get_job", Method::GET, "/v2/jobs/{job_id}")
            .path_param("job_id", "a/b c");

        let url = request.resolve_url(&base()).unwrap();
        assert_eq!(url.path(), "/v2/jobs/a%2Fb%20c");
    }

    #[test]
    fn test_base_path_is_kept_as_prefix() {
        let base = Url::parse("https://gateway.example.com/schematics/").unwrap();
        let request = Request::new("get_schematics_version", Method::GET, "/v1/version");

        let url = request.resolve_url(&base).unwrap();
        assert_eq!(url.path(), "/schematics/v1/version");
    }

    #[test]
    fn test_unbound_parameter_is_a_configuration_error() {
        let request = Request::new("get_policy", Method::GET, "/v2/settings/policies/{policy_id}");
        match request.resolve_url(&base()) {
            Err(Error::Configuration(msg)) => assert!(msg.contains("policy_id")),
            other => panic!("expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_query_pairs_keep_order_and_skip_unset() {
        let request = Request::new("list_jobs", Method::GET, "/v2/jobs")
            .query("offset", 0)
            .query_opt("limit", Some(50))
            .query_opt::<String>("sort", None)
            .query("profile", "summary");

        let url = request.resolve_url(&base()).unwrap();
        assert_eq!(url.query(), Some("offset=0&limit=50&profile=summary"));
    }

    #[test]
    fn test_no_query_leaves_url_clean() {
        let url = Request::new("list_locations", Method::GET, "/v2/locations")
            .resolve_url(&base())
            .unwrap();
        assert_eq!(url.as_str(), "https://schematics.example.com/v2/locations");
    }

    #[test]
    fn test_headers_and_invalid_values() {
        let request = Request::new("create_job", Method::POST, "/v2/jobs")
            .header("refresh_token", "rt")
            .unwrap()
            .header_opt("X-Github-token", None)
            .unwrap();
        assert_eq!(request.headers.get("refresh_token").unwrap(), "rt");
        assert!(request.headers.get("x-github-token").is_none());

        let err = Request::new("create_job", Method::POST, "/v2/jobs")
            .header("refresh_token", "line\nbreak")
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_files_accumulate_into_one_multipart_body() {
        let request = Request::new("template_repo_upload", Method::PUT, "/upload")
            .file(FilePart::tar("a.tar", vec![1, 2]))
            .file(FilePart::tar("b.tar", vec![3]).with_content_type("application/x-tar"));

        match request.body {
            RequestBody::Multipart(parts) => {
                assert_eq!(parts.len(), 2);
                assert_eq!(parts[0].field, "file");
                assert_eq!(parts[1].content_type, "application/x-tar");
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }
}
