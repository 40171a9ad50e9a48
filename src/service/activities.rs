//! Workspace activities and the commands that start them.

use super::{require, SchematicsV1};
use crate::models::{
    TerraformCommand, WorkspaceActivities, WorkspaceActivity, WorkspaceActivityOptionsTemplate,
    WorkspaceActivityResult,
};
use crate::request::Request;
use crate::{Response, Result};
use http::Method;
use serde::Serialize;

/// Options for [`SchematicsV1::list_workspace_activities`].
#[derive(Debug, Clone, Default)]
pub struct ListWorkspaceActivitiesOptions {
    pub w_id: String,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ListWorkspaceActivitiesOptions {
    pub fn new(w_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("list_workspace_activities", "w_id", &self.w_id)
    }
}

/// Options naming one activity of a workspace.
///
/// Used by [`SchematicsV1::get_workspace_activity`] and
/// [`SchematicsV1::delete_workspace_activity`].
#[derive(Debug, Clone, Default)]
pub struct WorkspaceActivityOptions {
    pub w_id: String,
    pub activity_id: String,
}

impl WorkspaceActivityOptions {
    pub fn new(w_id: impl Into<String>, activity_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            activity_id: activity_id.into(),
        }
    }

    /// Checks the required fields, reporting failures against `workspace_activity`.
    ///
    /// The facade methods taking these options report their own operation
    /// name through [`Self::validate_for`].
    pub fn validate(&self) -> Result<()> {
        self.validate_for("workspace_activity")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "w_id", &self.w_id)?;
        require(operation, "activity_id", &self.activity_id)
    }
}

pub type GetWorkspaceActivityOptions = WorkspaceActivityOptions;
pub type DeleteWorkspaceActivityOptions = WorkspaceActivityOptions;

/// Options for [`SchematicsV1::run_workspace_commands`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunWorkspaceCommandsOptions {
    #[serde(skip)]
    pub w_id: String,
    /// IAM refresh token, sent as the `refresh_token` header.
    #[serde(skip)]
    pub refresh_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<TerraformCommand>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RunWorkspaceCommandsOptions {
    pub fn new(w_id: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            refresh_token: refresh_token.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("run_workspace_commands", "w_id", &self.w_id)?;
        require("run_workspace_commands", "refresh_token", &self.refresh_token)
    }
}

/// Options for [`SchematicsV1::apply_workspace_command`] and
/// [`SchematicsV1::destroy_workspace_command`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkspaceCommandOptions {
    #[serde(skip)]
    pub w_id: String,
    #[serde(skip)]
    pub refresh_token: String,
    /// Targets and variable overrides for this run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_options: Option<WorkspaceActivityOptionsTemplate>,
    /// Token for acting on behalf of another identity, sent as the
    /// `delegated_token` header.
    #[serde(skip)]
    pub delegated_token: Option<String>,
}

impl WorkspaceCommandOptions {
    pub fn new(w_id: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            refresh_token: refresh_token.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("workspace_command")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "w_id", &self.w_id)?;
        require(operation, "refresh_token", &self.refresh_token)
    }
}

pub type ApplyWorkspaceCommandOptions = WorkspaceCommandOptions;
pub type DestroyWorkspaceCommandOptions = WorkspaceCommandOptions;

/// Options for [`SchematicsV1::plan_workspace_command`] and
/// [`SchematicsV1::refresh_workspace_command`].
#[derive(Debug, Clone, Default)]
pub struct PlanWorkspaceCommandOptions {
    pub w_id: String,
    pub refresh_token: String,
    pub delegated_token: Option<String>,
}

impl PlanWorkspaceCommandOptions {
    pub fn new(w_id: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            refresh_token: refresh_token.into(),
            delegated_token: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("plan_workspace_command")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "w_id", &self.w_id)?;
        require(operation, "refresh_token", &self.refresh_token)
    }
}

pub type RefreshWorkspaceCommandOptions = PlanWorkspaceCommandOptions;

impl SchematicsV1 {
    pub async fn list_workspace_activities(
        &self,
        options: &ListWorkspaceActivitiesOptions,
    ) -> Result<Response<WorkspaceActivities>> {
        options.validate()?;
        let request = Request::new(
            "list_workspace_activities",
            Method::GET,
            "/v1/workspaces/{w_id}/actions",
        )
        .path_param("w_id", &options.w_id)
        .query_opt("offset", options.offset)
        .query_opt("limit", options.limit);
        self.client.call(request).await
    }

    pub async fn get_workspace_activity(
        &self,
        options: &GetWorkspaceActivityOptions,
    ) -> Result<Response<WorkspaceActivity>> {
        options.validate_for("get_workspace_activity")?;
        let request = Request::new(
            "get_workspace_activity",
            Method::GET,
            "/v1/workspaces/{w_id}/actions/{activity_id}",
        )
        .path_param("w_id", &options.w_id)
        .path_param("activity_id", &options.activity_id);
        self.client.call(request).await
    }

    /// Stops a running activity. Answers `202 Accepted`.
    pub async fn delete_workspace_activity(
        &self,
        options: &DeleteWorkspaceActivityOptions,
    ) -> Result<Response<WorkspaceActivityResult>> {
        options.validate_for("delete_workspace_activity")?;
        let request = Request::new(
            "delete_workspace_activity",
            Method::DELETE,
            "/v1/workspaces/{w_id}/actions/{activity_id}",
        )
        .path_param("w_id", &options.w_id)
        .path_param("activity_id", &options.activity_id);
        self.client.call(request).await
    }

    /// Runs a batch of Terraform commands against a workspace.
    pub async fn run_workspace_commands(
        &self,
        options: &RunWorkspaceCommandsOptions,
    ) -> Result<Response<WorkspaceActivityResult>> {
        options.validate()?;
        let request = Request::new(
            "run_workspace_commands",
            Method::PUT,
            "/v1/workspaces/{w_id}/commands",
        )
        .path_param("w_id", &options.w_id)
        .header("refresh_token", &options.refresh_token)?
        .json(options)?;
        self.client.call(request).await
    }

    /// Starts a `terraform apply`. Answers `202 Accepted`.
    pub async fn apply_workspace_command(
        &self,
        options: &ApplyWorkspaceCommandOptions,
    ) -> Result<Response<WorkspaceActivityResult>> {
        options.validate_for("apply_workspace_command")?;
        self.workspace_command(
            Request::new(
                "apply_workspace_command",
                Method::PUT,
                "/v1/workspaces/{w_id}/apply",
            ),
            options,
        )
        .await
    }

    /// Starts a `terraform destroy`. Answers `202 Accepted`.
    pub async fn destroy_workspace_command(
        &self,
        options: &DestroyWorkspaceCommandOptions,
    ) -> Result<Response<WorkspaceActivityResult>> {
        options.validate_for("destroy_workspace_command")?;
        self.workspace_command(
            Request::new(
                "destroy_workspace_command",
                Method::PUT,
                "/v1/workspaces/{w_id}/destroy",
            ),
            options,
        )
        .await
    }

    /// Starts a `terraform plan`. Answers `202 Accepted`.
    pub async fn plan_workspace_command(
        &self,
        options: &PlanWorkspaceCommandOptions,
    ) -> Result<Response<WorkspaceActivityResult>> {
        options.validate_for("plan_workspace_command")?;
        let request = Request::new(
            "plan_workspace_command",
            Method::POST,
            "/v1/workspaces/{w_id}/plan",
        )
        .path_param("w_id", &options.w_id)
        .header("refresh_token", &options.refresh_token)?
        .header_opt("delegated_token", options.delegated_token.as_deref())?;
        self.client.call(request).await
    }

    /// Starts a `terraform refresh`. Answers `202 Accepted`.
    pub async fn refresh_workspace_command(
        &self,
        options: &RefreshWorkspaceCommandOptions,
    ) -> Result<Response<WorkspaceActivityResult>> {
        options.validate_for("refresh_workspace_command")?;
        let request = Request::new(
            "refresh_workspace_command",
            Method::PUT,
            "/v1/workspaces/{w_id}/refresh",
        )
        .path_param("w_id", &options.w_id)
        .header("refresh_token", &options.refresh_token)?
        .header_opt("delegated_token", options.delegated_token.as_deref())?;
        self.client.call(request).await
    }

    async fn workspace_command(
        &self,
        request: Request,
        options: &WorkspaceCommandOptions,
    ) -> Result<Response<WorkspaceActivityResult>> {
        let mut request = request
            .path_param("w_id", &options.w_id)
            .header("refresh_token", &options.refresh_token)?
            .header_opt("delegated_token", options.delegated_token.as_deref())?;
        if options.action_options.is_some() {
            request = request.json(options)?;
        }
        self.client.call(request).await
    }
}
