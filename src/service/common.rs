//! Locations, resource groups, version and template metadata.

use super::{require, SchematicsV1};
use crate::models::{
    ExternalSource, ResourceGroupResponse, SchematicsLocations, SchematicsLocationsList,
    TemplateMetaDataResponse, VersionResponse,
};
use crate::request::Request;
use crate::{Response, Result};
use http::Method;
use serde::Serialize;

/// Options for [`SchematicsV1::list_schematics_location`].
#[derive(Debug, Clone, Default)]
pub struct ListSchematicsLocationOptions {}

impl ListSchematicsLocationOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::list_locations`].
#[derive(Debug, Clone, Default)]
pub struct ListLocationsOptions {}

impl ListLocationsOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::list_resource_group`].
#[derive(Debug, Clone, Default)]
pub struct ListResourceGroupOptions {}

impl ListResourceGroupOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::get_schematics_version`].
#[derive(Debug, Clone, Default)]
pub struct GetSchematicsVersionOptions {}

impl GetSchematicsVersionOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::process_template_meta_data`].
#[derive(Debug, Clone, Serialize)]
pub struct ProcessTemplateMetaDataOptions {
    /// Template type, such as `terraform_v1.5`.
    pub template_type: String,

    /// Where the template is fetched from.
    pub source: ExternalSource,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,

    /// Token for private repositories, sent as `X-Github-token`.
    #[serde(skip)]
    pub x_github_token: Option<String>,
}

impl ProcessTemplateMetaDataOptions {
    pub fn new(template_type: impl Into<String>, source: ExternalSource) -> Self {
        Self {
            template_type: template_type.into(),
            source,
            region: None,
            source_type: None,
            x_github_token: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("process_template_meta_data", "template_type", &self.template_type)?;
        require("process_template_meta_data", "source", &self.source.source_type)
    }
}

impl SchematicsV1 {
    /// Lists the locations where workspaces and actions can be created.
    pub async fn list_schematics_location(
        &self,
        _options: &ListSchematicsLocationOptions,
    ) -> Result<Response<Vec<SchematicsLocations>>> {
        let request = Request::new("list_schematics_location", Method::GET, "/v1/locations");
        self.client.call(request).await
    }

    /// Lists the regions of the service.
    pub async fn list_locations(
        &self,
        _options: &ListLocationsOptions,
    ) -> Result<Response<SchematicsLocationsList>> {
        let request = Request::new("list_locations", Method::GET, "/v2/locations");
        self.client.call(request).await
    }

    /// Lists the resource groups of the account.
    pub async fn list_resource_group(
        &self,
        _options: &ListResourceGroupOptions,
    ) -> Result<Response<Vec<ResourceGroupResponse>>> {
        let request = Request::new("list_resource_group", Method::GET, "/v1/resource_groups");
        self.client.call(request).await
    }

    /// Gets the service's build and engine versions.
    pub async fn get_schematics_version(
        &self,
        _options: &GetSchematicsVersionOptions,
    ) -> Result<Response<VersionResponse>> {
        let request = Request::new("get_schematics_version", Method::GET, "/v1/version");
        self.client.call(request).await
    }

    /// Discovers the variables declared by a template.
    pub async fn process_template_meta_data(
        &self,
        options: &ProcessTemplateMetaDataOptions,
    ) -> Result<Response<TemplateMetaDataResponse>> {
        options.validate()?;
        let request = Request::new(
            "process_template_meta_data",
            Method::POST,
            "/v2/template_metadata_processor",
        )
        .header_opt("X-Github-token", options.x_github_token.as_deref())?
        .json(options)?;
        self.client.call(request).await
    }
}
