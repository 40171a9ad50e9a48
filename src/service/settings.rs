//! Settings operations: KMS encryption settings and policies.

use super::{require, SchematicsV1};
use crate::models::{KmsDiscovery, KmsSettings, Policy, PolicyList};
use crate::request::Request;
use crate::{Response, Result};
use http::Method;

/// Options for [`SchematicsV1::get_kms_settings`].
#[derive(Debug, Clone, Default)]
pub struct GetKmsSettingsOptions {
    /// Location whose settings are read, e.g. `US`.
    pub location: String,
}

impl GetKmsSettingsOptions {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_kms_settings", "location", &self.location)
    }
}

/// Options for [`SchematicsV1::update_kms_settings`].
#[derive(Debug, Clone, Default)]
pub struct UpdateKmsSettingsOptions {
    pub settings: KmsSettings,
}

impl UpdateKmsSettingsOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::list_kms`].
#[derive(Debug, Clone, Default)]
pub struct ListKmsOptions {
    /// `byok` or `kyok`.
    pub encryption_scheme: String,
    pub location: String,
    pub resource_group: Option<String>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
}

impl ListKmsOptions {
    pub fn new(encryption_scheme: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            encryption_scheme: encryption_scheme.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("list_kms", "encryption_scheme", &self.encryption_scheme)?;
        require("list_kms", "location", &self.location)
    }
}

/// Options for [`SchematicsV1::list_policy`].
#[derive(Debug, Clone, Default)]
pub struct ListPolicyOptions {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub profile: Option<String>,
}

impl ListPolicyOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::create_policy`].
#[derive(Debug, Clone, Default)]
pub struct CreatePolicyOptions {
    pub policy: Policy,
}

impl CreatePolicyOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options naming one policy: used by [`SchematicsV1::get_policy`] and
/// [`SchematicsV1::delete_policy`].
#[derive(Debug, Clone, Default)]
pub struct PolicyIdOptions {
    pub policy_id: String,
    pub profile: Option<String>,
}

impl PolicyIdOptions {
    pub fn new(policy_id: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            profile: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("policy")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "policy_id", &self.policy_id)
    }
}

pub type GetPolicyOptions = PolicyIdOptions;
pub type DeletePolicyOptions = PolicyIdOptions;

/// Options for [`SchematicsV1::update_policy`].
#[derive(Debug, Clone, Default)]
pub struct UpdatePolicyOptions {
    pub policy_id: String,
    /// Fields to change.
    pub policy: Policy,
}

impl UpdatePolicyOptions {
    pub fn new(policy_id: impl Into<String>) -> Self {
        Self {
            policy_id: policy_id.into(),
            policy: Policy::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("update_policy", "policy_id", &self.policy_id)
    }
}

impl SchematicsV1 {
    /// Gets the KMS settings of a location.
    pub async fn get_kms_settings(
        &self,
        options: &GetKmsSettingsOptions,
    ) -> Result<Response<KmsSettings>> {
        options.validate()?;
        let request = Request::new("get_kms_settings", Method::GET, "/v2/settings/kms")
            .query("location", &options.location);
        self.client.call(request).await
    }

    pub async fn update_kms_settings(
        &self,
        options: &UpdateKmsSettingsOptions,
    ) -> Result<Response<KmsSettings>> {
        let request = Request::new("update_kms_settings", Method::PUT, "/v2/settings/kms")
            .json(&options.settings)?;
        self.client.call(request).await
    }

    /// Discovers the KMS instances usable for a location and scheme.
    pub async fn list_kms(&self, options: &ListKmsOptions) -> Result<Response<KmsDiscovery>> {
        options.validate()?;
        let request = Request::new("list_kms", Method::GET, "/v2/settings/kms_instances")
            .query("encryption_scheme", &options.encryption_scheme)
            .query("location", &options.location)
            .query_opt("resource_group", options.resource_group.as_deref())
            .query_opt("limit", options.limit)
            .query_opt("sort", options.sort.as_deref());
        self.client.call(request).await
    }

    pub async fn list_policy(&self, options: &ListPolicyOptions) -> Result<Response<PolicyList>> {
        let request = Request::new("list_policy", Method::GET, "/v2/settings/policies")
            .query_opt("offset", options.offset)
            .query_opt("limit", options.limit)
            .query_opt("sort", options.sort.as_deref())
            .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    /// Creates a policy. Answers `201 Created`.
    pub async fn create_policy(&self, options: &CreatePolicyOptions) -> Result<Response<Policy>> {
        let request = Request::new("create_policy", Method::POST, "/v2/settings/policies")
            .json(&options.policy)?;
        self.client.call(request).await
    }

    pub async fn get_policy(&self, options: &GetPolicyOptions) -> Result<Response<Policy>> {
        options.validate_for("get_policy")?;
        let request = Request::new(
            "get_policy",
            Method::GET,
            "/v2/settings/policies/{policy_id}",
        )
        .path_param("policy_id", &options.policy_id)
        .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    pub async fn update_policy(&self, options: &UpdatePolicyOptions) -> Result<Response<Policy>> {
        options.validate()?;
        let request = Request::new(
            "update_policy",
            Method::PATCH,
            "/v2/settings/policies/{policy_id}",
        )
        .path_param("policy_id", &options.policy_id)
        .json(&options.policy)?;
        self.client.call(request).await
    }

    /// Deletes a policy. Answers `204 No Content`.
    pub async fn delete_policy(&self, options: &DeletePolicyOptions) -> Result<Response<()>> {
        options.validate_for("delete_policy")?;
        let request = Request::new(
            "delete_policy",
            Method::DELETE,
            "/v2/settings/policies/{policy_id}",
        )
        .path_param("policy_id", &options.policy_id);
        self.client.call_empty(request).await
    }
}
