//! Workspace operations: lifecycle, template data, inputs, outputs, state
//! and logs.

use super::{require, SchematicsV1};
use crate::models::{
    CatalogSource, LogStoreResponseList, OutputValuesInner, SharedTargetData,
    StateStoreResponseList, TemplateReadme, TemplateRepoRequest, TemplateRepoTarUploadResponse,
    TemplateResources, TemplateSourceDataRequest, TemplateStateStore, TemplateValues, UserValues,
    WorkspaceActivityLogs, WorkspaceResponse, WorkspaceResponseList, WorkspaceStatus,
    WorkspaceStatusMessage, WorkspaceTemplateValuesResponse, WorkspaceVariableRequest,
};
use crate::request::{FilePart, Request, RequestBody};
use crate::{Response, Result};
use http::Method;
use serde::Serialize;

/// Options for [`SchematicsV1::list_workspaces`].
#[derive(Debug, Clone, Default)]
pub struct ListWorkspacesOptions {
    /// Number of records to skip.
    pub offset: Option<i64>,
    /// Maximum number of records to return (1-2000).
    pub limit: Option<i64>,
}

impl ListWorkspacesOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::create_workspace`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateWorkspaceOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied_shareddata_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_ref: Option<CatalogSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Location (`us-south`, `eu-de`...) where the workspace data is kept.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_data: Option<SharedTargetData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_data: Option<Vec<TemplateSourceDataRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_repo: Option<TemplateRepoRequest>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_status: Option<WorkspaceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip)]
    pub x_github_token: Option<String>,
}

impl CreateWorkspaceOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::get_workspace`].
#[derive(Debug, Clone, Default)]
pub struct GetWorkspaceOptions {
    pub w_id: String,
}

impl GetWorkspaceOptions {
    pub fn new(w_id: impl Into<String>) -> Self {
        Self { w_id: w_id.into() }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_workspace", "w_id", &self.w_id)
    }
}

/// Options for [`SchematicsV1::replace_workspace`] and
/// [`SchematicsV1::update_workspace`].
///
/// Replace sends every field; update only changes the fields that are set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaceWorkspaceOptions {
    #[serde(skip)]
    pub w_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_ref: Option<CatalogSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shared_data: Option<SharedTargetData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_data: Option<Vec<TemplateSourceDataRequest>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_repo: Option<TemplateRepoRequest>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_status: Option<WorkspaceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_status_msg: Option<WorkspaceStatusMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip)]
    pub x_github_token: Option<String>,
}

impl ReplaceWorkspaceOptions {
    pub fn new(w_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("replace_workspace", "w_id", &self.w_id)
    }
}

/// Options for [`SchematicsV1::update_workspace`].
pub type UpdateWorkspaceOptions = ReplaceWorkspaceOptions;

/// Options for [`SchematicsV1::delete_workspace`].
#[derive(Debug, Clone, Default)]
pub struct DeleteWorkspaceOptions {
    pub w_id: String,
    /// IAM refresh token, sent as the `refresh_token` header.
    pub refresh_token: String,
    /// Also destroy the resources the workspace provisioned.
    pub destroy_resources: Option<String>,
}

impl DeleteWorkspaceOptions {
    pub fn new(w_id: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            refresh_token: refresh_token.into(),
            destroy_resources: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("delete_workspace", "refresh_token", &self.refresh_token)?;
        require("delete_workspace", "w_id", &self.w_id)
    }
}

/// Options for [`SchematicsV1::get_workspace_readme`].
#[derive(Debug, Clone, Default)]
pub struct GetWorkspaceReadmeOptions {
    pub w_id: String,
    /// Git reference (branch, tag or commit) to read the README from.
    pub ref_: Option<String>,
    /// `markdown` or `html`.
    pub formatted: Option<String>,
}

impl GetWorkspaceReadmeOptions {
    pub fn new(w_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_workspace_readme", "w_id", &self.w_id)
    }
}

/// Options for [`SchematicsV1::template_repo_upload`].
#[derive(Debug, Clone, Default)]
pub struct TemplateRepoUploadOptions {
    pub w_id: String,
    pub t_id: String,
    /// The template archive (`.tar`).
    pub file: Option<FilePart>,
}

impl TemplateRepoUploadOptions {
    pub fn new(w_id: impl Into<String>, t_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            t_id: t_id.into(),
            file: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("template_repo_upload", "w_id", &self.w_id)?;
        require("template_repo_upload", "t_id", &self.t_id)
    }
}

/// Path parameters naming one template of a workspace.
///
/// Options for [`SchematicsV1::get_workspace_inputs`],
/// [`SchematicsV1::get_workspace_input_metadata`] and
/// [`SchematicsV1::get_workspace_template_state`].
#[derive(Debug, Clone, Default)]
pub struct WorkspaceTemplateOptions {
    pub w_id: String,
    pub t_id: String,
}

impl WorkspaceTemplateOptions {
    pub fn new(w_id: impl Into<String>, t_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            t_id: t_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("workspace_template")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "w_id", &self.w_id)?;
        require(operation, "t_id", &self.t_id)
    }
}

pub type GetWorkspaceInputsOptions = WorkspaceTemplateOptions;
pub type GetWorkspaceInputMetadataOptions = WorkspaceTemplateOptions;
pub type GetWorkspaceTemplateStateOptions = WorkspaceTemplateOptions;

/// Options for [`SchematicsV1::replace_workspace_inputs`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaceWorkspaceInputsOptions {
    #[serde(skip)]
    pub w_id: String,
    #[serde(skip)]
    pub t_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_values: Option<Vec<serde_json::Value>>,
    /// Terraform variables as an HCL document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variablestore: Option<Vec<WorkspaceVariableRequest>>,
}

impl ReplaceWorkspaceInputsOptions {
    pub fn new(w_id: impl Into<String>, t_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            t_id: t_id.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("replace_workspace_inputs", "w_id", &self.w_id)?;
        require("replace_workspace_inputs", "t_id", &self.t_id)
    }
}

/// Options for the operations addressed by a workspace id alone:
/// [`SchematicsV1::get_all_workspace_inputs`],
/// [`SchematicsV1::get_workspace_outputs`],
/// [`SchematicsV1::get_workspace_resources`],
/// [`SchematicsV1::get_workspace_state`] and
/// [`SchematicsV1::get_workspace_log_urls`].
#[derive(Debug, Clone, Default)]
pub struct WorkspaceIdOptions {
    pub w_id: String,
}

impl WorkspaceIdOptions {
    pub fn new(w_id: impl Into<String>) -> Self {
        Self { w_id: w_id.into() }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("workspace")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "w_id", &self.w_id)
    }
}

pub type GetAllWorkspaceInputsOptions = WorkspaceIdOptions;
pub type GetWorkspaceOutputsOptions = WorkspaceIdOptions;
pub type GetWorkspaceResourcesOptions = WorkspaceIdOptions;
pub type GetWorkspaceStateOptions = WorkspaceIdOptions;
pub type GetWorkspaceLogUrlsOptions = WorkspaceIdOptions;

/// Options for [`SchematicsV1::get_workspace_activity_logs`].
#[derive(Debug, Clone, Default)]
pub struct GetWorkspaceActivityLogsOptions {
    pub w_id: String,
    pub activity_id: String,
}

impl GetWorkspaceActivityLogsOptions {
    pub fn new(w_id: impl Into<String>, activity_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            activity_id: activity_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_workspace_activity_logs", "w_id", &self.w_id)?;
        require("get_workspace_activity_logs", "activity_id", &self.activity_id)
    }
}

/// Which parts of a Terraform log to include.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Include the commands run.
    pub log_tf_cmd: Option<bool>,
    /// Prefix lines with the log source.
    pub log_tf_prefix: Option<bool>,
    /// Include `null_resource` output.
    pub log_tf_null_resource: Option<bool>,
    /// Include Ansible output.
    pub log_tf_ansible: Option<bool>,
}

impl LogFilter {
    fn apply(&self, request: Request) -> Request {
        request
            .query_opt("log_tf_cmd", self.log_tf_cmd)
            .query_opt("log_tf_prefix", self.log_tf_prefix)
            .query_opt("log_tf_null_resource", self.log_tf_null_resource)
            .query_opt("log_tf_ansible", self.log_tf_ansible)
    }
}

/// Options for [`SchematicsV1::get_template_logs`].
#[derive(Debug, Clone, Default)]
pub struct GetTemplateLogsOptions {
    pub w_id: String,
    pub t_id: String,
    pub filter: LogFilter,
}

impl GetTemplateLogsOptions {
    pub fn new(w_id: impl Into<String>, t_id: impl Into<String>) -> Self {
        Self {
            w_id: w_id.into(),
            t_id: t_id.into(),
            filter: LogFilter::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_template_logs", "w_id", &self.w_id)?;
        require("get_template_logs", "t_id", &self.t_id)
    }
}

/// Options for [`SchematicsV1::get_template_activity_log`].
#[derive(Debug, Clone, Default)]
pub struct GetTemplateActivityLogOptions {
    pub w_id: String,
    pub t_id: String,
    pub activity_id: String,
    pub filter: LogFilter,
}

impl GetTemplateActivityLogOptions {
    pub fn new(
        w_id: impl Into<String>,
        t_id: impl Into<String>,
        activity_id: impl Into<String>,
    ) -> Self {
        Self {
            w_id: w_id.into(),
            t_id: t_id.into(),
            activity_id: activity_id.into(),
            filter: LogFilter::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_template_activity_log", "w_id", &self.w_id)?;
        require("get_template_activity_log", "t_id", &self.t_id)?;
        require("get_template_activity_log", "activity_id", &self.activity_id)
    }
}

impl SchematicsV1 {
    /// Lists the workspaces of the account, one page at a time.
    pub async fn list_workspaces(
        &self,
        options: &ListWorkspacesOptions,
    ) -> Result<Response<WorkspaceResponseList>> {
        let request = Request::new("list_workspaces", Method::GET, "/v1/workspaces")
            .query_opt("offset", options.offset)
            .query_opt("limit", options.limit);
        self.client.call(request).await
    }

    /// Creates a workspace. Answers `201 Created`.
    pub async fn create_workspace(
        &self,
        options: &CreateWorkspaceOptions,
    ) -> Result<Response<WorkspaceResponse>> {
        let request = Request::new("create_workspace", Method::POST, "/v1/workspaces")
            .header_opt("X-Github-token", options.x_github_token.as_deref())?
            .json(options)?;
        self.client.call(request).await
    }

    pub async fn get_workspace(
        &self,
        options: &GetWorkspaceOptions,
    ) -> Result<Response<WorkspaceResponse>> {
        options.validate()?;
        let request = Request::new("get_workspace", Method::GET, "/v1/workspaces/{w_id}")
            .path_param("w_id", &options.w_id);
        self.client.call(request).await
    }

    /// Replaces a workspace definition.
    pub async fn replace_workspace(
        &self,
        options: &ReplaceWorkspaceOptions,
    ) -> Result<Response<WorkspaceResponse>> {
        options.validate()?;
        let request = Request::new("replace_workspace", Method::PUT, "/v1/workspaces/{w_id}")
            .path_param("w_id", &options.w_id)
            .header_opt("X-Github-token", options.x_github_token.as_deref())?
            .json(options)?;
        self.client.call(request).await
    }

    /// Updates the fields of a workspace that are set in `options`.
    pub async fn update_workspace(
        &self,
        options: &UpdateWorkspaceOptions,
    ) -> Result<Response<WorkspaceResponse>> {
        require("update_workspace", "w_id", &options.w_id)?;
        let request = Request::new("update_workspace", Method::PATCH, "/v1/workspaces/{w_id}")
            .path_param("w_id", &options.w_id)
            .header_opt("X-Github-token", options.x_github_token.as_deref())?
            .json(options)?;
        self.client.call(request).await
    }

    /// Deletes a workspace, optionally destroying its resources.
    ///
    /// The service answers with a plain status string.
    pub async fn delete_workspace(
        &self,
        options: &DeleteWorkspaceOptions,
    ) -> Result<Response<String>> {
        options.validate()?;
        let request = Request::new("delete_workspace", Method::DELETE, "/v1/workspaces/{w_id}")
            .path_param("w_id", &options.w_id)
            .header("refresh_token", &options.refresh_token)?
            .query_opt("destroy_resources", options.destroy_resources.as_deref());
        self.client.call_text(request).await
    }

    pub async fn get_workspace_readme(
        &self,
        options: &GetWorkspaceReadmeOptions,
    ) -> Result<Response<TemplateReadme>> {
        options.validate()?;
        let request = Request::new(
            "get_workspace_readme",
            Method::GET,
            "/v1/workspaces/{w_id}/templates/readme",
        )
        .path_param("w_id", &options.w_id)
        .query_opt("ref", options.ref_.as_deref())
        .query_opt("formatted", options.formatted.as_deref());
        self.client.call(request).await
    }

    /// Uploads a template archive for one template of a workspace.
    pub async fn template_repo_upload(
        &self,
        options: &TemplateRepoUploadOptions,
    ) -> Result<Response<TemplateRepoTarUploadResponse>> {
        options.validate()?;
        let mut request = Request::new(
            "template_repo_upload",
            Method::PUT,
            "/v1/workspaces/{w_id}/template_data/{t_id}/template_repo_upload",
        )
        .path_param("w_id", &options.w_id)
        .path_param("t_id", &options.t_id);
        request.body = RequestBody::Multipart(options.file.iter().cloned().collect());
        self.client.call(request).await
    }

    pub async fn get_workspace_inputs(
        &self,
        options: &GetWorkspaceInputsOptions,
    ) -> Result<Response<TemplateValues>> {
        options.validate_for("get_workspace_inputs")?;
        let request = Request::new(
            "get_workspace_inputs",
            Method::GET,
            "/v1/workspaces/{w_id}/template_data/{t_id}/values",
        )
        .path_param("w_id", &options.w_id)
        .path_param("t_id", &options.t_id);
        self.client.call(request).await
    }

    /// Replaces the input values of one template.
    pub async fn replace_workspace_inputs(
        &self,
        options: &ReplaceWorkspaceInputsOptions,
    ) -> Result<Response<UserValues>> {
        options.validate()?;
        let request = Request::new(
            "replace_workspace_inputs",
            Method::PUT,
            "/v1/workspaces/{w_id}/template_data/{t_id}/values",
        )
        .path_param("w_id", &options.w_id)
        .path_param("t_id", &options.t_id)
        .json(options)?;
        self.client.call(request).await
    }

    /// Gets the input values of every template of a workspace.
    pub async fn get_all_workspace_inputs(
        &self,
        options: &GetAllWorkspaceInputsOptions,
    ) -> Result<Response<WorkspaceTemplateValuesResponse>> {
        options.validate_for("get_all_workspace_inputs")?;
        let request = Request::new(
            "get_all_workspace_inputs",
            Method::GET,
            "/v1/workspaces/{w_id}/templates/values",
        )
        .path_param("w_id", &options.w_id);
        self.client.call(request).await
    }

    /// Gets the metadata of a template's input variables. The entries are
    /// free-form, so they are returned undecoded.
    pub async fn get_workspace_input_metadata(
        &self,
        options: &GetWorkspaceInputMetadataOptions,
    ) -> Result<Response<Vec<serde_json::Value>>> {
        options.validate_for("get_workspace_input_metadata")?;
        let request = Request::new(
            "get_workspace_input_metadata",
            Method::GET,
            "/v1/workspaces/{w_id}/template_data/{t_id}/values_metadata",
        )
        .path_param("w_id", &options.w_id)
        .path_param("t_id", &options.t_id);
        self.client.call(request).await
    }

    pub async fn get_workspace_outputs(
        &self,
        options: &GetWorkspaceOutputsOptions,
    ) -> Result<Response<Vec<OutputValuesInner>>> {
        options.validate_for("get_workspace_outputs")?;
        let request = Request::new(
            "get_workspace_outputs",
            Method::GET,
            "/v1/workspaces/{w_id}/output_values",
        )
        .path_param("w_id", &options.w_id);
        self.client.call(request).await
    }

    pub async fn get_workspace_resources(
        &self,
        options: &GetWorkspaceResourcesOptions,
    ) -> Result<Response<Vec<TemplateResources>>> {
        options.validate_for("get_workspace_resources")?;
        let request = Request::new(
            "get_workspace_resources",
            Method::GET,
            "/v1/workspaces/{w_id}/resources",
        )
        .path_param("w_id", &options.w_id);
        self.client.call(request).await
    }

    /// Gets the state file URLs of every template of a workspace.
    pub async fn get_workspace_state(
        &self,
        options: &GetWorkspaceStateOptions,
    ) -> Result<Response<StateStoreResponseList>> {
        options.validate_for("get_workspace_state")?;
        let request = Request::new(
            "get_workspace_state",
            Method::GET,
            "/v1/workspaces/{w_id}/state_stores",
        )
        .path_param("w_id", &options.w_id);
        self.client.call(request).await
    }

    /// Gets the Terraform state of one template.
    pub async fn get_workspace_template_state(
        &self,
        options: &GetWorkspaceTemplateStateOptions,
    ) -> Result<Response<TemplateStateStore>> {
        options.validate_for("get_workspace_template_state")?;
        let request = Request::new(
            "get_workspace_template_state",
            Method::GET,
            "/v1/workspaces/{w_id}/runtime_data/{t_id}/state_store",
        )
        .path_param("w_id", &options.w_id)
        .path_param("t_id", &options.t_id);
        self.client.call(request).await
    }

    pub async fn get_workspace_activity_logs(
        &self,
        options: &GetWorkspaceActivityLogsOptions,
    ) -> Result<Response<WorkspaceActivityLogs>> {
        options.validate()?;
        let request = Request::new(
            "get_workspace_activity_logs",
            Method::GET,
            "/v1/workspaces/{w_id}/actions/{activity_id}/logs",
        )
        .path_param("w_id", &options.w_id)
        .path_param("activity_id", &options.activity_id);
        self.client.call(request).await
    }

    pub async fn get_workspace_log_urls(
        &self,
        options: &GetWorkspaceLogUrlsOptions,
    ) -> Result<Response<LogStoreResponseList>> {
        options.validate_for("get_workspace_log_urls")?;
        let request = Request::new(
            "get_workspace_log_urls",
            Method::GET,
            "/v1/workspaces/{w_id}/log_stores",
        )
        .path_param("w_id", &options.w_id);
        self.client.call(request).await
    }

    /// Gets the latest Terraform log of a template as text.
    pub async fn get_template_logs(
        &self,
        options: &GetTemplateLogsOptions,
    ) -> Result<Response<String>> {
        options.validate()?;
        let request = Request::new(
            "get_template_logs",
            Method::GET,
            "/v1/workspaces/{w_id}/runtime_data/{t_id}/log_store",
        )
        .path_param("w_id", &options.w_id)
        .path_param("t_id", &options.t_id);
        self.client.call_text(options.filter.apply(request)).await
    }

    /// Gets the log of one template for one activity, as text.
    pub async fn get_template_activity_log(
        &self,
        options: &GetTemplateActivityLogOptions,
    ) -> Result<Response<String>> {
        options.validate()?;
        let request = Request::new(
            "get_template_activity_log",
            Method::GET,
            "/v1/workspaces/{w_id}/runtime_data/{t_id}/log_store/actions/{activity_id}",
        )
        .path_param("w_id", &options.w_id)
        .path_param("t_id", &options.t_id)
        .path_param("activity_id", &options.activity_id);
        self.client.call_text(options.filter.apply(request)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_path_and_header_fields_stay_out_of_the_body() {
        let mut options = ReplaceWorkspaceOptions::new("ws-1");
        options.description = Some("updated".to_string());
        options.type_ = Some(vec!["terraform_v1.5".to_string()]);
        options.x_github_token = Some("ghp_secret".to_string());

        let body = serde_json::to_value(&options).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"description": "updated", "type": ["terraform_v1.5"]})
        );
    }

    #[test]
    fn test_delete_workspace_validation_order() {
        let err = DeleteWorkspaceOptions::new("", "").validate().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingParameter {
                parameter: "refresh_token",
                ..
            }
        ));
    }

    #[test]
    fn test_template_options_name_the_failing_operation() {
        let err = WorkspaceTemplateOptions::new("ws-1", "")
            .validate_for("get_workspace_template_state")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::MissingParameter {
                operation: "get_workspace_template_state",
                parameter: "t_id"
            }
        ));
    }

    #[test]
    fn test_shared_options_validate_on_their_own() {
        let err = WorkspaceIdOptions::new(" ").validate().unwrap_err();
        assert!(matches!(
            err,
            Error::MissingParameter {
                operation: "workspace",
                parameter: "w_id"
            }
        ));
        assert!(WorkspaceIdOptions::new("ws-1").validate().is_ok());
    }
}
