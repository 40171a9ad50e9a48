//! Resource query operations.

use super::{require, SchematicsV1};
use crate::models::{ResourceQueryRecord, ResourceQueryRecordList, ResourceQueryResponseRecord};
use crate::request::Request;
use crate::{Response, Result};
use http::Method;

/// Options for [`SchematicsV1::list_resource_query`].
#[derive(Debug, Clone, Default)]
pub struct ListResourceQueryOptions {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub profile: Option<String>,
}

impl ListResourceQueryOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::create_resource_query`].
#[derive(Debug, Clone, Default)]
pub struct CreateResourceQueryOptions {
    pub query: ResourceQueryRecord,
}

impl CreateResourceQueryOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options naming one resource query: used by
/// [`SchematicsV1::get_resources_query`] and
/// [`SchematicsV1::execute_resource_query`].
#[derive(Debug, Clone, Default)]
pub struct ResourceQueryIdOptions {
    pub query_id: String,
}

impl ResourceQueryIdOptions {
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("resources_query")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "query_id", &self.query_id)
    }
}

pub type GetResourcesQueryOptions = ResourceQueryIdOptions;
pub type ExecuteResourceQueryOptions = ResourceQueryIdOptions;

/// Options for [`SchematicsV1::replace_resources_query`].
#[derive(Debug, Clone, Default)]
pub struct ReplaceResourcesQueryOptions {
    pub query_id: String,
    pub query: ResourceQueryRecord,
}

impl ReplaceResourcesQueryOptions {
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            query: ResourceQueryRecord::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("replace_resources_query", "query_id", &self.query_id)
    }
}

/// Options for [`SchematicsV1::delete_resources_query`].
#[derive(Debug, Clone, Default)]
pub struct DeleteResourcesQueryOptions {
    pub query_id: String,
    pub force: Option<bool>,
    pub propagate: Option<bool>,
}

impl DeleteResourcesQueryOptions {
    pub fn new(query_id: impl Into<String>) -> Self {
        Self {
            query_id: query_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("delete_resources_query", "query_id", &self.query_id)
    }
}

impl SchematicsV1 {
    pub async fn list_resource_query(
        &self,
        options: &ListResourceQueryOptions,
    ) -> Result<Response<ResourceQueryRecordList>> {
        let request = Request::new("list_resource_query", Method::GET, "/v2/resources_query")
            .query_opt("offset", options.offset)
            .query_opt("limit", options.limit)
            .query_opt("sort", options.sort.as_deref())
            .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    /// Creates a resource query. The service answers `200 OK`.
    pub async fn create_resource_query(
        &self,
        options: &CreateResourceQueryOptions,
    ) -> Result<Response<ResourceQueryRecord>> {
        let request = Request::new("create_resource_query", Method::POST, "/v2/resources_query")
            .json(&options.query)?;
        self.client.call(request).await
    }

    pub async fn get_resources_query(
        &self,
        options: &GetResourcesQueryOptions,
    ) -> Result<Response<ResourceQueryRecord>> {
        options.validate_for("get_resources_query")?;
        let request = Request::new(
            "get_resources_query",
            Method::GET,
            "/v2/resources_query/{query_id}",
        )
        .path_param("query_id", &options.query_id);
        self.client.call(request).await
    }

    pub async fn replace_resources_query(
        &self,
        options: &ReplaceResourcesQueryOptions,
    ) -> Result<Response<ResourceQueryRecord>> {
        options.validate()?;
        let request = Request::new(
            "replace_resources_query",
            Method::PUT,
            "/v2/resources_query/{query_id}",
        )
        .path_param("query_id", &options.query_id)
        .json(&options.query)?;
        self.client.call(request).await
    }

    /// Runs a saved query and returns the resources it resolves to.
    pub async fn execute_resource_query(
        &self,
        options: &ExecuteResourceQueryOptions,
    ) -> Result<Response<ResourceQueryResponseRecord>> {
        options.validate_for("execute_resource_query")?;
        let request = Request::new(
            "execute_resource_query",
            Method::POST,
            "/v2/resources_query/{query_id}/execute",
        )
        .path_param("query_id", &options.query_id);
        self.client.call(request).await
    }

    /// Deletes a resource query. Answers `204 No Content`.
    pub async fn delete_resources_query(
        &self,
        options: &DeleteResourcesQueryOptions,
    ) -> Result<Response<()>> {
        options.validate()?;
        let request = Request::new(
            "delete_resources_query",
            Method::DELETE,
            "/v2/resources_query/{query_id}",
        )
        .path_param("query_id", &options.query_id)
        .query_opt("force", options.force)
        .query_opt("propagate", options.propagate);
        self.client.call_empty(request).await
    }
}
