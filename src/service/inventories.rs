//! Inventory operations.

use super::{require, SchematicsV1};
use crate::models::{InventoryResourceRecord, InventoryResourceRecordList};
use crate::request::Request;
use crate::{Response, Result};
use http::Method;

/// Options for [`SchematicsV1::list_inventories`].
#[derive(Debug, Clone, Default)]
pub struct ListInventoriesOptions {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub profile: Option<String>,
}

impl ListInventoriesOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::create_inventory`].
#[derive(Debug, Clone, Default)]
pub struct CreateInventoryOptions {
    pub inventory: InventoryResourceRecord,
}

impl CreateInventoryOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::get_inventory`].
#[derive(Debug, Clone, Default)]
pub struct GetInventoryOptions {
    pub inventory_id: String,
    pub profile: Option<String>,
}

impl GetInventoryOptions {
    pub fn new(inventory_id: impl Into<String>) -> Self {
        Self {
            inventory_id: inventory_id.into(),
            profile: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_inventory", "inventory_id", &self.inventory_id)
    }
}

/// Options for [`SchematicsV1::replace_inventory`] and
/// [`SchematicsV1::update_inventory`].
#[derive(Debug, Clone, Default)]
pub struct ReplaceInventoryOptions {
    pub inventory_id: String,
    pub inventory: InventoryResourceRecord,
}

impl ReplaceInventoryOptions {
    pub fn new(inventory_id: impl Into<String>) -> Self {
        Self {
            inventory_id: inventory_id.into(),
            inventory: InventoryResourceRecord::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("replace_inventory")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "inventory_id", &self.inventory_id)
    }
}

pub type UpdateInventoryOptions = ReplaceInventoryOptions;

/// Options for [`SchematicsV1::delete_inventory`].
#[derive(Debug, Clone, Default)]
pub struct DeleteInventoryOptions {
    pub inventory_id: String,
    pub force: Option<bool>,
    pub propagate: Option<bool>,
}

impl DeleteInventoryOptions {
    pub fn new(inventory_id: impl Into<String>) -> Self {
        Self {
            inventory_id: inventory_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("delete_inventory", "inventory_id", &self.inventory_id)
    }
}

impl SchematicsV1 {
    pub async fn list_inventories(
        &self,
        options: &ListInventoriesOptions,
    ) -> Result<Response<InventoryResourceRecordList>> {
        let request = Request::new("list_inventories", Method::GET, "/v2/inventories")
            .query_opt("offset", options.offset)
            .query_opt("limit", options.limit)
            .query_opt("sort", options.sort.as_deref())
            .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    /// Creates an inventory. The service answers `200 OK`.
    pub async fn create_inventory(
        &self,
        options: &CreateInventoryOptions,
    ) -> Result<Response<InventoryResourceRecord>> {
        let request = Request::new("create_inventory", Method::POST, "/v2/inventories")
            .json(&options.inventory)?;
        self.client.call(request).await
    }

    pub async fn get_inventory(
        &self,
        options: &GetInventoryOptions,
    ) -> Result<Response<InventoryResourceRecord>> {
        options.validate()?;
        let request = Request::new("get_inventory", Method::GET, "/v2/inventories/{inventory_id}")
            .path_param("inventory_id", &options.inventory_id)
            .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    pub async fn replace_inventory(
        &self,
        options: &ReplaceInventoryOptions,
    ) -> Result<Response<InventoryResourceRecord>> {
        self.write_inventory("replace_inventory", Method::PUT, options)
            .await
    }

    /// Changes only the inventory fields that are set.
    pub async fn update_inventory(
        &self,
        options: &UpdateInventoryOptions,
    ) -> Result<Response<InventoryResourceRecord>> {
        self.write_inventory("update_inventory", Method::PATCH, options)
            .await
    }

    /// Deletes an inventory. Answers `204 No Content`.
    pub async fn delete_inventory(&self, options: &DeleteInventoryOptions) -> Result<Response<()>> {
        options.validate()?;
        let request = Request::new(
            "delete_inventory",
            Method::DELETE,
            "/v2/inventories/{inventory_id}",
        )
        .path_param("inventory_id", &options.inventory_id)
        .query_opt("force", options.force)
        .query_opt("propagate", options.propagate);
        self.client.call_empty(request).await
    }

    async fn write_inventory(
        &self,
        operation: &'static str,
        method: Method,
        options: &ReplaceInventoryOptions,
    ) -> Result<Response<InventoryResourceRecord>> {
        options.validate_for(operation)?;
        let request = Request::new(operation, method, "/v2/inventories/{inventory_id}")
            .path_param("inventory_id", &options.inventory_id)
            .json(&options.inventory)?;
        self.client.call(request).await
    }
}
