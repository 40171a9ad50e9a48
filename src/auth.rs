//! Authenticators that turn credentials into request headers.
//!
//! The client calls [`Authenticator::authenticate`] once per request, before
//! the transport sends it. Four schemes are provided:
//!
//! - [`NoAuthAuthenticator`] leaves requests untouched.
//! - [`BearerTokenAuthenticator`] sends a caller-managed access token.
//! - [`BasicAuthenticator`] sends a username and password.
//! - [`IamAuthenticator`] exchanges an API key for an access token and caches it.

use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine;
use http::header::{ACCEPT, AUTHORIZATION};
use http::{HeaderMap, HeaderValue};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use url::Url;

/// Token service used when no `AUTH_URL` is configured.
pub const DEFAULT_IAM_URL: &str = "https://iam.cloud.ibm.com";

const IAM_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";
const IAM_TOKEN_PATH: &str = "/identity/token";

/// Share of a token's lifetime after which it is refreshed.
const REFRESH_FRACTION: f64 = 0.8;

/// The authentication schemes understood by the `AUTH_TYPE` service property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthType {
    NoAuth,
    BearerToken,
    Basic,
    Iam,
}

impl AuthType {
    /// The canonical property spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::NoAuth => "noAuth",
            AuthType::BearerToken => "bearerToken",
            AuthType::Basic => "basic",
            AuthType::Iam => "iam",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "noauth" => Ok(AuthType::NoAuth),
            "bearertoken" => Ok(AuthType::BearerToken),
            "basic" => Ok(AuthType::Basic),
            "iam" => Ok(AuthType::Iam),
            other => Err(Error::Configuration(format!(
                "Unrecognized authentication type: {}",
                other
            ))),
        }
    }
}

/// Adds credentials to outgoing requests.
///
/// Implementations must be cheap to call concurrently; any caching they do is
/// their own business.
#[async_trait]
pub trait Authenticator: Send + Sync + fmt::Debug {
    /// The scheme this authenticator implements.
    fn auth_type(&self) -> AuthType;

    /// Inserts the credential headers for one request.
    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()>;
}

/// Sends requests without credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthAuthenticator;

#[async_trait]
impl Authenticator for NoAuthAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::NoAuth
    }

    async fn authenticate(&self, _headers: &mut HeaderMap) -> Result<()> {
        Ok(())
    }
}

/// Sends a fixed bearer token.
///
/// The caller is responsible for replacing the authenticator when the token
/// expires.
#[derive(Clone)]
pub struct BearerTokenAuthenticator {
    token: String,
}

impl BearerTokenAuthenticator {
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::Configuration(
                "The bearer token cannot be empty".to_string(),
            ));
        }
        Ok(Self { token })
    }
}

impl fmt::Debug for BearerTokenAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerTokenAuthenticator")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BearerTokenAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::BearerToken
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()> {
        headers.insert(AUTHORIZATION, bearer(&self.token)?);
        Ok(())
    }
}

/// Sends HTTP basic credentials.
#[derive(Clone)]
pub struct BasicAuthenticator {
    username: String,
    password: String,
}

impl BasicAuthenticator {
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if either value is empty or wrapped in
    /// braces or quotes, a common copy-paste mistake.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        check_credential("username", &username)?;
        check_credential("password", &password)?;
        Ok(Self { username, password })
    }
}

impl fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl Authenticator for BasicAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::Basic
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.username, self.password));
        let value = HeaderValue::try_from(format!("Basic {}", encoded))
            .map_err(|e| Error::Configuration(format!("Invalid basic credentials: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

/// Exchanges an API key for IAM access tokens.
///
/// Tokens are cached and reused until 80% of their lifetime has passed.
/// Concurrent requests that find the cache stale wait for a single exchange.
///
/// ```no_run
/// use schematics::auth::IamAuthenticator;
///
/// # fn example() -> Result<(), schematics::Error> {
/// let authenticator = IamAuthenticator::builder("my-api-key")
///     .url("https://iam.test.cloud.ibm.com")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct IamAuthenticator {
    apikey: String,
    token_url: Url,
    client_credentials: Option<(String, String)>,
    scope: Option<String>,
    http_client: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_after: Instant,
}

#[derive(Debug, Deserialize)]
struct IamTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
    /// Unix seconds.
    expiration: Option<u64>,
}

impl IamTokenResponse {
    /// Lifetime from `expires_in`, else from the absolute `expiration`.
    fn lifetime(&self, now: SystemTime) -> Duration {
        if let Some(secs) = self.expires_in {
            return Duration::from_secs(secs);
        }
        self.expiration
            .map(|at| UNIX_EPOCH + Duration::from_secs(at))
            .and_then(|at| at.duration_since(now).ok())
            .unwrap_or_default()
    }
}

impl fmt::Debug for IamAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamAuthenticator")
            .field("apikey", &"<redacted>")
            .field("token_url", &self.token_url.as_str())
            .field("scope", &self.scope)
            .finish()
    }
}

impl IamAuthenticator {
    /// Starts configuring an authenticator for `apikey`.
    pub fn builder(apikey: impl Into<String>) -> IamAuthenticatorBuilder {
        IamAuthenticatorBuilder {
            apikey: apikey.into(),
            url: None,
            client_credentials: None,
            scope: None,
            disable_ssl_verification: false,
        }
    }

    /// The endpoint tokens are requested from.
    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// Returns a valid access token, exchanging the API key when needed.
    pub async fn access_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_after {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken> {
        tracing::info!(url = %self.token_url, "Requesting IAM access token");

        let mut form = vec![
            ("grant_type", IAM_GRANT_TYPE),
            ("apikey", self.apikey.as_str()),
            ("response_type", "cloud_iam"),
        ];
        if let Some(scope) = &self.scope {
            form.push(("scope", scope.as_str()));
        }

        let mut request = self
            .http_client
            .post(self.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&form);
        if let Some((client_id, client_secret)) = &self.client_credentials {
            request = request.basic_auth(client_id, Some(client_secret));
        }

        let requested_at = Instant::now();
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout
            } else {
                Error::Network(e)
            }
        })?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "IAM token request rejected");
            return Err(Error::Authentication(format!(
                "IAM token request failed with status {}: {}",
                status, body
            )));
        }

        let token: IamTokenResponse = serde_json::from_str(&body).map_err(|e| {
            Error::Authentication(format!("Unreadable IAM token response: {}", e))
        })?;

        let lifetime = token.lifetime(SystemTime::now());
        Ok(CachedToken {
            access_token: token.access_token,
            refresh_after: requested_at + lifetime.mul_f64(REFRESH_FRACTION),
        })
    }
}

#[async_trait]
impl Authenticator for IamAuthenticator {
    fn auth_type(&self) -> AuthType {
        AuthType::Iam
    }

    async fn authenticate(&self, headers: &mut HeaderMap) -> Result<()> {
        let token = self.access_token().await?;
        headers.insert(AUTHORIZATION, bearer(&token)?);
        Ok(())
    }
}

/// Builder for [`IamAuthenticator`].
pub struct IamAuthenticatorBuilder {
    apikey: String,
    url: Option<Url>,
    client_credentials: Option<(String, String)>,
    scope: Option<String>,
    disable_ssl_verification: bool,
}

impl IamAuthenticatorBuilder {
    /// Sets the token service URL. Defaults to [`DEFAULT_IAM_URL`].
    ///
    /// A trailing `/identity/token` is accepted and not repeated.
    pub fn url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sends the given client id and secret as basic credentials on token requests.
    pub fn client_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_credentials = Some((client_id.into(), client_secret.into()));
        self
    }

    /// Requests tokens for a specific scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Accept invalid TLS certificates from the token service.
    pub fn disable_ssl_verification(mut self, disable: bool) -> Self {
        self.disable_ssl_verification = disable;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty or malformed API key.
    pub fn build(self) -> Result<IamAuthenticator> {
        check_credential("apikey", &self.apikey)?;

        let base = match self.url {
            Some(url) => url,
            None => Url::parse(DEFAULT_IAM_URL)?,
        };
        let trimmed = base.as_str().trim_end_matches('/');
        let token_url = if trimmed.ends_with(IAM_TOKEN_PATH) {
            Url::parse(trimmed)?
        } else {
            Url::parse(&format!("{}{}", trimmed, IAM_TOKEN_PATH))?
        };

        let http_client = reqwest::Client::builder()
            .danger_accept_invalid_certs(self.disable_ssl_verification)
            .build()
            .map_err(|e| {
                Error::Configuration(format!("Failed to build IAM HTTP client: {}", e))
            })?;

        Ok(IamAuthenticator {
            apikey: self.apikey,
            token_url,
            client_credentials: self.client_credentials,
            scope: self.scope,
            http_client,
            cached: Mutex::new(None),
        })
    }
}

fn bearer(token: &str) -> Result<HeaderValue> {
    let mut value = HeaderValue::try_from(format!("Bearer {}", token))
        .map_err(|e| Error::Authentication(format!("Token is not a valid header value: {}", e)))?;
    value.set_sensitive(true);
    Ok(value)
}

fn check_credential(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Configuration(format!("The {} cannot be empty", name)));
    }
    let wrapped = |c: char| matches!(c, '{' | '}' | '"');
    if value.starts_with(wrapped) || value.ends_with(wrapped) {
        return Err(Error::Configuration(format!(
            "The {} must not start or end with a brace or quote",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_type_parsing_is_case_insensitive() {
        assert_eq!("IAM".parse::<AuthType>().unwrap(), AuthType::Iam);
        assert_eq!("bearerToken".parse::<AuthType>().unwrap(), AuthType::BearerToken);
        assert_eq!("NOAUTH".parse::<AuthType>().unwrap(), AuthType::NoAuth);
        assert!("kerberos".parse::<AuthType>().is_err());
    }

    #[tokio::test]
    async fn test_bearer_header() {
        let auth = BearerTokenAuthenticator::new("tok").unwrap();
        let mut headers = HeaderMap::new();
        auth.authenticate(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer tok");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[tokio::test]
    async fn test_basic_header() {
        let auth = BasicAuthenticator::new("user", "pass").unwrap();
        let mut headers = HeaderMap::new();
        auth.authenticate(&mut headers).await.unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_token_lifetime_falls_back_to_expiration() {
        let now = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let token = |expires_in, expiration| IamTokenResponse {
            access_token: "tok".to_string(),
            expires_in,
            expiration,
        };

        assert_eq!(token(Some(3600), Some(1)).lifetime(now), Duration::from_secs(3600));
        assert_eq!(
            token(None, Some(1_700_001_200)).lifetime(now),
            Duration::from_secs(1200)
        );
        assert_eq!(token(None, Some(1_600_000_000)).lifetime(now), Duration::ZERO);
        assert_eq!(token(None, None).lifetime(now), Duration::ZERO);
    }

    #[test]
    fn test_credentials_are_checked() {
        assert!(BearerTokenAuthenticator::new("  ").is_err());
        assert!(BasicAuthenticator::new("{user}", "pass").is_err());
        assert!(IamAuthenticator::builder("\"key\"").build().is_err());
        assert!(IamAuthenticator::builder("").build().is_err());
    }

    #[test]
    fn test_token_url_normalisation() {
        let auth = IamAuthenticator::builder("key").build().unwrap();
        assert_eq!(
            auth.token_url().as_str(),
            "https://iam.cloud.ibm.com/identity/token"
        );

        let auth = IamAuthenticator::builder("key")
            .url("https://iam.test.cloud.ibm.com/identity/token/")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            auth.token_url().as_str(),
            "https://iam.test.cloud.ibm.com/identity/token"
        );
    }

    #[test]
    fn test_debug_output_redacts_secrets() {
        let auth = IamAuthenticator::builder("super-secret").build().unwrap();
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("super-secret"));

        let basic = BasicAuthenticator::new("user", "hunter2").unwrap();
        assert!(!format!("{:?}", basic).contains("hunter2"));
    }
}
