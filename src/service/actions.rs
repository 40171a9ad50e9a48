//! Action operations.

use super::{require, SchematicsV1};
use crate::models::{Action, ActionList, TemplateRepoTarUploadResponse};
use crate::request::{FilePart, Request, RequestBody};
use crate::{Response, Result};
use http::Method;

/// Options for [`SchematicsV1::list_actions`].
#[derive(Debug, Clone, Default)]
pub struct ListActionsOptions {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    /// Field to sort by, e.g. `name` or `-updated_at`.
    pub sort: Option<String>,
    /// `ids` or `summary`.
    pub profile: Option<String>,
}

impl ListActionsOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::create_action`].
#[derive(Debug, Clone, Default)]
pub struct CreateActionOptions {
    /// The action to create. Unset fields are left out of the request.
    pub action: Action,
    /// Token for private repositories, sent as `X-Github-token`.
    pub x_github_token: Option<String>,
}

impl CreateActionOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::get_action`].
#[derive(Debug, Clone, Default)]
pub struct GetActionOptions {
    pub action_id: String,
    pub profile: Option<String>,
}

impl GetActionOptions {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            profile: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_action", "action_id", &self.action_id)
    }
}

/// Options for [`SchematicsV1::update_action`].
#[derive(Debug, Clone, Default)]
pub struct UpdateActionOptions {
    pub action_id: String,
    /// Fields to change.
    pub action: Action,
    pub x_github_token: Option<String>,
}

impl UpdateActionOptions {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("update_action", "action_id", &self.action_id)
    }
}

/// Options for [`SchematicsV1::delete_action`].
#[derive(Debug, Clone, Default)]
pub struct DeleteActionOptions {
    pub action_id: String,
    /// Delete even if the action is locked by a running job.
    pub force: Option<bool>,
    /// Also delete the jobs and inventories the action owns.
    pub propagate: Option<bool>,
}

impl DeleteActionOptions {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("delete_action", "action_id", &self.action_id)
    }
}

/// Options for [`SchematicsV1::upload_template_tar_action`].
#[derive(Debug, Clone, Default)]
pub struct UploadTemplateTarActionOptions {
    pub action_id: String,
    pub file: Option<FilePart>,
}

impl UploadTemplateTarActionOptions {
    pub fn new(action_id: impl Into<String>) -> Self {
        Self {
            action_id: action_id.into(),
            file: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("upload_template_tar_action", "action_id", &self.action_id)
    }
}

impl SchematicsV1 {
    pub async fn list_actions(&self, options: &ListActionsOptions) -> Result<Response<ActionList>> {
        let request = Request::new("list_actions", Method::GET, "/v2/actions")
            .query_opt("offset", options.offset)
            .query_opt("limit", options.limit)
            .query_opt("sort", options.sort.as_deref())
            .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    /// Creates an action. Answers `201 Created`.
    pub async fn create_action(&self, options: &CreateActionOptions) -> Result<Response<Action>> {
        let request = Request::new("create_action", Method::POST, "/v2/actions")
            .header_opt("X-Github-token", options.x_github_token.as_deref())?
            .json(&options.action)?;
        self.client.call(request).await
    }

    pub async fn get_action(&self, options: &GetActionOptions) -> Result<Response<Action>> {
        options.validate()?;
        let request = Request::new("get_action", Method::GET, "/v2/actions/{action_id}")
            .path_param("action_id", &options.action_id)
            .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    pub async fn update_action(&self, options: &UpdateActionOptions) -> Result<Response<Action>> {
        options.validate()?;
        let request = Request::new("update_action", Method::PATCH, "/v2/actions/{action_id}")
            .path_param("action_id", &options.action_id)
            .header_opt("X-Github-token", options.x_github_token.as_deref())?
            .json(&options.action)?;
        self.client.call(request).await
    }

    /// Deletes an action. Answers `204 No Content`.
    pub async fn delete_action(&self, options: &DeleteActionOptions) -> Result<Response<()>> {
        options.validate()?;
        let request = Request::new("delete_action", Method::DELETE, "/v2/actions/{action_id}")
            .path_param("action_id", &options.action_id)
            .query_opt("force", options.force)
            .query_opt("propagate", options.propagate);
        self.client.call_empty(request).await
    }

    /// Uploads a playbook archive for an action.
    pub async fn upload_template_tar_action(
        &self,
        options: &UploadTemplateTarActionOptions,
    ) -> Result<Response<TemplateRepoTarUploadResponse>> {
        options.validate()?;
        let mut request = Request::new(
            "upload_template_tar_action",
            Method::PUT,
            "/v2/actions/{action_id}/template_repo_upload",
        )
        .path_param("action_id", &options.action_id);
        request.body = RequestBody::Multipart(options.file.iter().cloned().collect());
        self.client.call(request).await
    }
}
