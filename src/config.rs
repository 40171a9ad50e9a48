//! External configuration: service properties from credential files and the
//! environment.
//!
//! Properties are `KEY=VALUE` pairs named `<SERVICE>_<PROPERTY>`, where
//! `<SERVICE>` is the upper-cased service name (`SCHEMATICS_URL`,
//! `SCHEMATICS_APIKEY`, ...). [`ServiceProperties::load`] reads them once,
//! from the first of these sources that defines any property for the service:
//!
//! 1. the file named by `IBM_CREDENTIALS_FILE`,
//! 2. `ibm-credentials.env` in the working directory,
//! 3. `ibm-credentials.env` in the home directory,
//! 4. the process environment.

use crate::auth::{
    AuthType, Authenticator, BasicAuthenticator, BearerTokenAuthenticator, IamAuthenticator,
    NoAuthAuthenticator,
};
use crate::transport::RetryStrategy;
use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming an explicit credentials file.
pub const CREDENTIALS_FILE_ENV: &str = "IBM_CREDENTIALS_FILE";

/// File name searched for in the working and home directories.
pub const DEFAULT_CREDENTIALS_FILE_NAME: &str = "ibm-credentials.env";

const DEFAULT_MAX_RETRIES: usize = 4;
const DEFAULT_RETRY_INTERVAL_SECS: u64 = 30;

/// The properties configured for one service.
///
/// Keys are stored without the service prefix, upper-cased: `URL`,
/// `AUTH_TYPE`, `APIKEY`, `AUTH_URL`, `BEARER_TOKEN`, `USERNAME`, `PASSWORD`,
/// `CLIENT_ID`, `CLIENT_SECRET`, `SCOPE`, `DISABLE_SSL`, `AUTH_DISABLE_SSL`,
/// `ENABLE_RETRIES`, `MAX_RETRIES`, `RETRY_INTERVAL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceProperties {
    service_name: String,
    values: HashMap<String, String>,
}

impl ServiceProperties {
    /// Loads the properties of `service_name` from the first source that has any.
    ///
    /// Returns empty properties when no source mentions the service.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `IBM_CREDENTIALS_FILE` names a file
    /// that cannot be read, or a credentials file is malformed.
    pub fn load(service_name: &str) -> Result<Self> {
        if let Ok(path) = std::env::var(CREDENTIALS_FILE_ENV) {
            let properties = Self::from_credentials_file(&path, service_name)?;
            if !properties.is_empty() {
                tracing::debug!(service = service_name, path = %path, "Loaded service properties from credentials file");
                return Ok(properties);
            }
        }

        for candidate in default_credential_files() {
            if !candidate.is_file() {
                continue;
            }
            let properties = Self::from_credentials_file(&candidate, service_name)?;
            if !properties.is_empty() {
                tracing::debug!(service = service_name, path = %candidate.display(), "Loaded service properties from credentials file");
                return Ok(properties);
            }
        }

        let properties = Self::from_env(service_name);
        if properties.is_empty() {
            tracing::debug!(service = service_name, "No service properties found");
        }
        Ok(properties)
    }

    /// Reads the properties of `service_name` from a `.env`-style file.
    pub fn from_credentials_file(path: impl AsRef<Path>, service_name: &str) -> Result<Self> {
        let path = path.as_ref();
        let entries = dotenvy::from_path_iter(path).map_err(|e| {
            Error::Configuration(format!(
                "Cannot read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut pairs = Vec::new();
        for entry in entries {
            let pair = entry.map_err(|e| {
                Error::Configuration(format!(
                    "Malformed credentials file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            pairs.push(pair);
        }
        Ok(Self::from_pairs(service_name, pairs))
    }

    /// Reads the properties of `service_name` from the process environment.
    pub fn from_env(service_name: &str) -> Self {
        Self::from_pairs(service_name, std::env::vars())
    }

    /// Keeps the pairs prefixed with the service name, stripping the prefix.
    pub fn from_pairs<I, K, V>(service_name: &str, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let prefix = format!("{}_", service_name.to_ascii_uppercase().replace('-', "_"));
        let values = pairs
            .into_iter()
            .filter_map(|(key, value)| {
                let property = key.as_ref().strip_prefix(&prefix)?;
                (!property.is_empty()).then(|| (property.to_ascii_uppercase(), value.into()))
            })
            .collect();

        Self {
            service_name: service_name.to_string(),
            values,
        }
    }

    /// The service these properties belong to.
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns a property by name, ignoring blank values.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.values
            .get(&property.to_ascii_uppercase())
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Returns `true` if no property is set for the service.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The configured service URL.
    pub fn url(&self) -> Option<&str> {
        self.get("URL")
    }

    /// Whether TLS verification against the service is disabled.
    pub fn disable_ssl(&self) -> bool {
        self.flag("DISABLE_SSL")
    }

    /// The effective authentication type.
    ///
    /// `AUTH_TYPE` wins; without it the scheme is inferred from the
    /// credentials present, API key first.
    pub fn auth_type(&self) -> Result<AuthType> {
        if let Some(auth_type) = self.get("AUTH_TYPE") {
            return auth_type.parse();
        }
        if self.get("APIKEY").is_some() {
            Ok(AuthType::Iam)
        } else if self.get("BEARER_TOKEN").is_some() {
            Ok(AuthType::BearerToken)
        } else if self.get("USERNAME").is_some() {
            Ok(AuthType::Basic)
        } else {
            Err(Error::Configuration(format!(
                "No authentication properties found for service '{}'",
                self.service_name
            )))
        }
    }

    /// The retry strategy requested through `ENABLE_RETRIES`, if any.
    ///
    /// `MAX_RETRIES` defaults to 4 and `RETRY_INTERVAL` (seconds) to 30.
    pub fn retry_strategy(&self) -> Result<Option<RetryStrategy>> {
        if !self.flag("ENABLE_RETRIES") {
            return Ok(None);
        }
        let max_retries = self.parse_or("MAX_RETRIES", DEFAULT_MAX_RETRIES)?;
        let interval = self.parse_or("RETRY_INTERVAL", DEFAULT_RETRY_INTERVAL_SECS)?;
        Ok(Some(RetryStrategy::with_limits(
            max_retries,
            Duration::from_secs(interval),
        )))
    }

    /// Builds the authenticator these properties describe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the auth type is unknown or its
    /// required credentials are missing.
    pub fn authenticator(&self) -> Result<Arc<dyn Authenticator>> {
        let auth_type = self.auth_type()?;
        tracing::debug!(service = %self.service_name, auth_type = %auth_type, "Creating authenticator from properties");

        let authenticator: Arc<dyn Authenticator> = match auth_type {
            AuthType::NoAuth => Arc::new(NoAuthAuthenticator),
            AuthType::BearerToken => {
                Arc::new(BearerTokenAuthenticator::new(self.require("BEARER_TOKEN")?)?)
            }
            AuthType::Basic => Arc::new(BasicAuthenticator::new(
                self.require("USERNAME")?,
                self.require("PASSWORD")?,
            )?),
            AuthType::Iam => {
                let mut builder = IamAuthenticator::builder(self.require("APIKEY")?)
                    .disable_ssl_verification(self.flag("AUTH_DISABLE_SSL"));
                if let Some(url) = self.get("AUTH_URL") {
                    builder = builder.url(url)?;
                }
                if let (Some(id), Some(secret)) = (self.get("CLIENT_ID"), self.get("CLIENT_SECRET")) {
                    builder = builder.client_credentials(id, secret);
                }
                if let Some(scope) = self.get("SCOPE") {
                    builder = builder.scope(scope);
                }
                Arc::new(builder.build()?)
            }
        };
        Ok(authenticator)
    }

    fn require(&self, property: &str) -> Result<&str> {
        self.get(property).ok_or_else(|| {
            Error::Configuration(format!(
                "Property {}_{} is required",
                self.service_name.to_ascii_uppercase(),
                property
            ))
        })
    }

    fn flag(&self, property: &str) -> bool {
        self.get(property)
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
    }

    fn parse_or<T: std::str::FromStr>(&self, property: &str, default: T) -> Result<T> {
        match self.get(property) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| {
                Error::Configuration(format!("Invalid value for {}: {}", property, raw))
            }),
        }
    }
}

fn default_credential_files() -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        files.push(cwd.join(DEFAULT_CREDENTIALS_FILE_NAME));
    }
    if let Some(home) = dirs::home_dir() {
        files.push(home.join(DEFAULT_CREDENTIALS_FILE_NAME));
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn props(pairs: &[(&str, &str)]) -> ServiceProperties {
        ServiceProperties::from_pairs(
            "schematics",
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())),
        )
    }

    #[test]
    fn test_prefix_is_stripped_and_foreign_keys_dropped() {
        let p = props(&[
            ("SCHEMATICS_URL", "https://schematics.example.com"),
            ("SCHEMATICS_APIKEY", "key"),
            ("OTHER_URL", "https://other.example.com"),
            ("SCHEMATICS_", "ignored"),
        ]);
        assert_eq!(p.url(), Some("https://schematics.example.com"));
        assert_eq!(p.get("apikey"), Some("key"));
        assert_eq!(p.values.len(), 2);
    }

    #[test]
    fn test_hyphenated_service_names() {
        let p = ServiceProperties::from_pairs("my-service", [("MY_SERVICE_URL", "https://x")]);
        assert_eq!(p.url(), Some("https://x"));
    }

    #[test]
    fn test_auth_type_inference() {
        assert_eq!(props(&[("SCHEMATICS_APIKEY", "k")]).auth_type().unwrap(), AuthType::Iam);
        assert_eq!(
            props(&[("SCHEMATICS_BEARER_TOKEN", "t")]).auth_type().unwrap(),
            AuthType::BearerToken
        );
        assert_eq!(
            props(&[("SCHEMATICS_AUTH_TYPE", "noauth"), ("SCHEMATICS_APIKEY", "k")])
                .auth_type()
                .unwrap(),
            AuthType::NoAuth
        );
        assert!(props(&[("SCHEMATICS_URL", "https://x")]).auth_type().is_err());
    }

    #[test]
    fn test_authenticators_from_properties() {
        let iam = props(&[
            ("SCHEMATICS_AUTH_TYPE", "iam"),
            ("SCHEMATICS_APIKEY", "key"),
            ("SCHEMATICS_AUTH_URL", "https://iam.test.cloud.ibm.com"),
        ])
        .authenticator()
        .unwrap();
        assert_eq!(iam.auth_type(), AuthType::Iam);

        let basic = props(&[("SCHEMATICS_USERNAME", "u"), ("SCHEMATICS_PASSWORD", "p")])
            .authenticator()
            .unwrap();
        assert_eq!(basic.auth_type(), AuthType::Basic);

        let err = props(&[("SCHEMATICS_AUTH_TYPE", "basic"), ("SCHEMATICS_USERNAME", "u")])
            .authenticator()
            .unwrap_err();
        assert!(err.to_string().contains("SCHEMATICS_PASSWORD"));
    }

    #[test]
    fn test_retry_properties() {
        assert_eq!(props(&[]).retry_strategy().unwrap(), None);

        let strategy = props(&[
            ("SCHEMATICS_ENABLE_RETRIES", "true"),
            ("SCHEMATICS_MAX_RETRIES", "2"),
            ("SCHEMATICS_RETRY_INTERVAL", "5"),
        ])
        .retry_strategy()
        .unwrap()
        .unwrap();
        assert_eq!(strategy.max_retries(), 2);

        assert!(props(&[
            ("SCHEMATICS_ENABLE_RETRIES", "1"),
            ("SCHEMATICS_MAX_RETRIES", "many"),
        ])
        .retry_strategy()
        .is_err());
    }

    #[test]
    fn test_credentials_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# schematics example config").unwrap();
        writeln!(file, "SCHEMATICS_URL=https://us.schematics.cloud.ibm.com").unwrap();
        writeln!(file, "SCHEMATICS_AUTH_TYPE=iam").unwrap();
        writeln!(file, "SCHEMATICS_APIKEY=\"abc123\"").unwrap();
        writeln!(file, "SCHEMATICS_DISABLE_SSL=true").unwrap();
        writeln!(file, "CATALOG_URL=https://catalog.example.com").unwrap();

        let p = ServiceProperties::from_credentials_file(file.path(), "schematics").unwrap();
        assert_eq!(p.service_name(), "schematics");
        assert_eq!(p.url(), Some("https://us.schematics.cloud.ibm.com"));
        assert_eq!(p.get("APIKEY"), Some("abc123"));
        assert!(p.disable_ssl());
        assert!(p.get("CATALOG_URL").is_none());
    }

    #[test]
    fn test_missing_credentials_file_is_an_error() {
        let err = ServiceProperties::from_credentials_file("/nonexistent/creds.env", "schematics")
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_load_falls_back_to_environment() {
        std::env::set_var("CONFIGLOADTEST_URL", "https://from-env.example.com");
        let p = ServiceProperties::load("configloadtest").unwrap();
        assert_eq!(p.url(), Some("https://from-env.example.com"));
        std::env::remove_var("CONFIGLOADTEST_URL");
    }
}
