//! The Schematics v1 facade.
//!
//! [`SchematicsV1`] exposes one async method per remote operation. Each method
//! takes an options value, validates it, turns it into a
//! [`Request`](crate::request::Request) and hands that to the shared
//! [`Client`]. Methods never retry, cache or batch: one
//! call is one logical request.
//!
//! ```no_run
//! use schematics::service::{ListWorkspacesOptions, SchematicsV1, SchematicsV1Options};
//!
//! # async fn example() -> Result<(), schematics::Error> {
//! let service = SchematicsV1::from_external_config(SchematicsV1Options::default())?;
//!
//! let mut options = ListWorkspacesOptions::new();
//! options.limit = Some(10);
//! let page = service.list_workspaces(&options).await?;
//! for workspace in page.data.workspaces.unwrap_or_default() {
//!     println!("{:?} {:?}", workspace.id, workspace.status);
//! }
//! # Ok(())
//! # }
//! ```

mod actions;
mod activities;
mod agent_data;
mod agents;
mod common;
mod inventories;
mod jobs;
mod resource_queries;
mod settings;
mod workspaces;

pub use actions::*;
pub use activities::*;
pub use agent_data::*;
pub use agents::*;
pub use common::*;
pub use inventories::*;
pub use jobs::*;
pub use resource_queries::*;
pub use settings::*;
pub use workspaces::*;

use crate::auth::Authenticator;
use crate::config::ServiceProperties;
use crate::{Client, Error, Result};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Service URL used when none is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://schematics.cloud.ibm.com";

/// Name under which the service's external configuration is looked up.
pub const DEFAULT_SERVICE_NAME: &str = "schematics";

const REGIONAL_ENDPOINTS: &[(&str, &str)] = &[
    ("us", "https://us.schematics.cloud.ibm.com"),
    ("us-south", "https://us-south.schematics.cloud.ibm.com"),
    ("us-east", "https://us-east.schematics.cloud.ibm.com"),
    ("eu", "https://eu.schematics.cloud.ibm.com"),
    ("eu-gb", "https://eu-gb.schematics.cloud.ibm.com"),
    ("eu-de", "https://eu-de.schematics.cloud.ibm.com"),
    ("ca-tor", "https://ca-tor.schematics.cloud.ibm.com"),
    ("private-us", "https://private-us.schematics.cloud.ibm.com"),
    ("private-us-south", "https://private-us-south.schematics.cloud.ibm.com"),
    ("private-us-east", "https://private-us-east.schematics.cloud.ibm.com"),
    ("private-eu", "https://private-eu.schematics.cloud.ibm.com"),
    ("private-eu-gb", "https://private-eu-gb.schematics.cloud.ibm.com"),
    ("private-eu-de", "https://private-eu-de.schematics.cloud.ibm.com"),
    ("private-ca-tor", "https://private-ca-tor.schematics.cloud.ibm.com"),
];

/// Construction options for [`SchematicsV1`].
#[derive(Debug, Clone, Default)]
pub struct SchematicsV1Options {
    /// Name used to look up external configuration. Defaults to `schematics`.
    pub service_name: Option<String>,

    /// Service URL. Overrides any configured URL.
    pub url: Option<String>,

    /// Authenticator. Overrides any configured credentials.
    pub authenticator: Option<Arc<dyn Authenticator>>,

    /// Per-attempt request timeout.
    pub timeout: Option<Duration>,
}

/// Client for the Schematics v1 API.
#[derive(Debug, Clone)]
pub struct SchematicsV1 {
    client: Client,
}

impl SchematicsV1 {
    /// Creates a service client from explicit options.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] without an authenticator, or
    /// [`Error::InvalidUrl`] for a malformed URL.
    pub fn new(options: SchematicsV1Options) -> Result<Self> {
        let authenticator = options.authenticator.ok_or_else(|| {
            Error::Configuration("An authenticator is required".to_string())
        })?;
        let url = options.url.as_deref().unwrap_or(DEFAULT_SERVICE_URL);

        let mut builder = Client::builder()
            .service_url(url)?
            .authenticator(authenticator);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self::from_client(builder.build()?))
    }

    /// Creates a service client from external configuration.
    ///
    /// Properties are read once, see [`ServiceProperties::load`]. Explicit
    /// values in `options` take precedence over configured ones.
    pub fn from_external_config(options: SchematicsV1Options) -> Result<Self> {
        let service_name = options
            .service_name
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVICE_NAME.to_string());
        let properties = ServiceProperties::load(&service_name)?;
        Self::from_properties(options, &properties)
    }

    /// Creates a service client from already loaded properties.
    pub fn from_properties(
        options: SchematicsV1Options,
        properties: &ServiceProperties,
    ) -> Result<Self> {
        let authenticator = match options.authenticator {
            Some(authenticator) => authenticator,
            None => properties.authenticator()?,
        };
        let url = options
            .url
            .as_deref()
            .or_else(|| properties.url())
            .unwrap_or(DEFAULT_SERVICE_URL);

        let mut builder = Client::builder()
            .service_url(url)?
            .authenticator(authenticator)
            .disable_ssl_verification(properties.disable_ssl());
        if let Some(strategy) = properties.retry_strategy()? {
            builder = builder.retry_strategy(strategy);
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        tracing::debug!(
            service = properties.service_name(),
            url = url,
            "Configured service from external properties"
        );
        Ok(Self::from_client(builder.build()?))
    }

    /// Wraps an already configured client.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// The underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The base URL requests are sent to.
    pub fn service_url(&self) -> &Url {
        self.client.service_url()
    }

    /// Returns the service URL of a geography or region, e.g. `us-south` or
    /// `private-eu-de`.
    ///
    /// ```
    /// use schematics::SchematicsV1;
    ///
    /// assert_eq!(
    ///     SchematicsV1::service_url_for_region("eu-de").unwrap(),
    ///     "https://eu-de.schematics.cloud.ibm.com"
    /// );
    /// assert!(SchematicsV1::service_url_for_region("mars-1").is_err());
    /// ```
    pub fn service_url_for_region(region: &str) -> Result<&'static str> {
        REGIONAL_ENDPOINTS
            .iter()
            .find(|(name, _)| *name == region)
            .map(|(_, url)| *url)
            .ok_or_else(|| Error::Configuration(format!("Service URL for region '{}' not found", region)))
    }
}

/// Fails with [`Error::MissingParameter`] when a required value is empty.
pub(crate) fn require(operation: &'static str, parameter: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::missing(operation, parameter));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::NoAuthAuthenticator;

    #[test]
    fn test_require() {
        assert!(require("get_job", "job_id", "abc").is_ok());
        let err = require("get_job", "job_id", "  ").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingParameter {
                operation: "get_job",
                parameter: "job_id"
            }
        ));
    }

    #[test]
    fn test_every_region_has_a_private_variant() {
        for (name, url) in REGIONAL_ENDPOINTS.iter().filter(|(n, _)| !n.starts_with("private-")) {
            let private = SchematicsV1::service_url_for_region(&format!("private-{}", name)).unwrap();
            assert_eq!(private, url.replace("https://", "https://private-"));
        }
    }

    #[test]
    fn test_new_requires_authenticator() {
        let err = SchematicsV1::new(SchematicsV1Options::default()).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));

        let service = SchematicsV1::new(SchematicsV1Options {
            authenticator: Some(Arc::new(NoAuthAuthenticator)),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(service.service_url().as_str(), "https://schematics.cloud.ibm.com/");
    }

    #[test]
    fn test_from_properties_uses_configured_url() {
        let properties = ServiceProperties::from_pairs(
            "schematics",
            [
                ("SCHEMATICS_URL", "https://us-east.schematics.cloud.ibm.com"),
                ("SCHEMATICS_AUTH_TYPE", "noAuth"),
                ("SCHEMATICS_ENABLE_RETRIES", "true"),
            ],
        );
        let service =
            SchematicsV1::from_properties(SchematicsV1Options::default(), &properties).unwrap();
        assert_eq!(service.service_url().host_str(), Some("us-east.schematics.cloud.ibm.com"));
        assert_eq!(service.client().transport().retry_strategy().max_retries(), 4);
    }
}
