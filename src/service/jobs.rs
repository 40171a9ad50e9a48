//! Job operations, including bulk workspace deletion jobs.

use super::{require, SchematicsV1};
use crate::models::{
    Job, JobFileData, JobFileType, JobList, JobLog, WorkspaceBulkDeleteResponse,
    WorkspaceJobResponse,
};
use crate::request::Request;
use crate::{Response, Result};
use http::Method;
use serde::Serialize;

/// Options for [`SchematicsV1::list_jobs`].
#[derive(Debug, Clone, Default)]
pub struct ListJobsOptions {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub profile: Option<String>,
    /// Kind of object to list jobs of: `workspace` or `action`.
    pub resource: Option<String>,
    pub resource_id: Option<String>,
    pub action_id: Option<String>,
    /// `all` to include jobs of every workspace and action.
    pub list: Option<String>,
}

impl ListJobsOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for [`SchematicsV1::create_job`].
#[derive(Debug, Clone, Default)]
pub struct CreateJobOptions {
    /// IAM refresh token, sent as the `refresh_token` header.
    pub refresh_token: String,
    /// The job to submit: command object, command name and inputs.
    pub job: Job,
}

impl CreateJobOptions {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            job: Job::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("create_job", "refresh_token", &self.refresh_token)
    }
}

/// Options for [`SchematicsV1::get_job`].
#[derive(Debug, Clone, Default)]
pub struct GetJobOptions {
    pub job_id: String,
    pub profile: Option<String>,
}

impl GetJobOptions {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            profile: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_job", "job_id", &self.job_id)
    }
}

/// Options for [`SchematicsV1::update_job`], which re-runs a job.
#[derive(Debug, Clone, Default)]
pub struct UpdateJobOptions {
    pub job_id: String,
    pub refresh_token: String,
    pub job: Job,
}

impl UpdateJobOptions {
    pub fn new(job_id: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            refresh_token: refresh_token.into(),
            job: Job::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("update_job", "job_id", &self.job_id)?;
        require("update_job", "refresh_token", &self.refresh_token)
    }
}

/// Options for [`SchematicsV1::delete_job`].
#[derive(Debug, Clone, Default)]
pub struct DeleteJobOptions {
    pub job_id: String,
    pub refresh_token: String,
    pub force: Option<bool>,
    pub propagate: Option<bool>,
}

impl DeleteJobOptions {
    pub fn new(job_id: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            refresh_token: refresh_token.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("delete_job", "job_id", &self.job_id)?;
        require("delete_job", "refresh_token", &self.refresh_token)
    }
}

/// Options for [`SchematicsV1::list_job_logs`].
#[derive(Debug, Clone, Default)]
pub struct ListJobLogsOptions {
    pub job_id: String,
}

impl ListJobLogsOptions {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("list_job_logs", "job_id", &self.job_id)
    }
}

/// Options for [`SchematicsV1::get_job_files`].
#[derive(Debug, Clone)]
pub struct GetJobFilesOptions {
    pub job_id: String,
    pub file_type: JobFileType,
}

impl GetJobFilesOptions {
    pub fn new(job_id: impl Into<String>, file_type: JobFileType) -> Self {
        Self {
            job_id: job_id.into(),
            file_type,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_job_files", "job_id", &self.job_id)
    }
}

/// Options for [`SchematicsV1::create_workspace_deletion_job`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateWorkspaceDeletionJobOptions {
    #[serde(skip)]
    pub refresh_token: String,
    /// Name of the deletion job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Ids of the workspaces to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspaces: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_workspaces: Option<bool>,
    #[serde(rename = "destroy_resources", skip_serializing_if = "Option::is_none")]
    pub new_destroy_resources: Option<bool>,
    /// Sent as the `destroy_resources` query parameter.
    #[serde(skip)]
    pub destroy_resources: Option<String>,
}

impl CreateWorkspaceDeletionJobOptions {
    pub fn new(refresh_token: impl Into<String>) -> Self {
        Self {
            refresh_token: refresh_token.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("create_workspace_deletion_job", "refresh_token", &self.refresh_token)
    }
}

/// Options for [`SchematicsV1::get_workspace_deletion_job_status`].
#[derive(Debug, Clone, Default)]
pub struct GetWorkspaceDeletionJobStatusOptions {
    pub wj_id: String,
}

impl GetWorkspaceDeletionJobStatusOptions {
    pub fn new(wj_id: impl Into<String>) -> Self {
        Self {
            wj_id: wj_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("get_workspace_deletion_job_status", "wj_id", &self.wj_id)
    }
}

impl SchematicsV1 {
    pub async fn list_jobs(&self, options: &ListJobsOptions) -> Result<Response<JobList>> {
        let request = Request::new("list_jobs", Method::GET, "/v2/jobs")
            .query_opt("offset", options.offset)
            .query_opt("limit", options.limit)
            .query_opt("sort", options.sort.as_deref())
            .query_opt("profile", options.profile.as_deref())
            .query_opt("resource", options.resource.as_deref())
            .query_opt("resource_id", options.resource_id.as_deref())
            .query_opt("action_id", options.action_id.as_deref())
            .query_opt("list", options.list.as_deref());
        self.client.call(request).await
    }

    /// Submits a job. Answers `201 Created`.
    pub async fn create_job(&self, options: &CreateJobOptions) -> Result<Response<Job>> {
        options.validate()?;
        let request = Request::new("create_job", Method::POST, "/v2/jobs")
            .header("refresh_token", &options.refresh_token)?
            .json(&options.job)?;
        self.client.call(request).await
    }

    pub async fn get_job(&self, options: &GetJobOptions) -> Result<Response<Job>> {
        options.validate()?;
        let request = Request::new("get_job", Method::GET, "/v2/jobs/{job_id}")
            .path_param("job_id", &options.job_id)
            .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    pub async fn update_job(&self, options: &UpdateJobOptions) -> Result<Response<Job>> {
        options.validate()?;
        let request = Request::new("update_job", Method::PUT, "/v2/jobs/{job_id}")
            .path_param("job_id", &options.job_id)
            .header("refresh_token", &options.refresh_token)?
            .json(&options.job)?;
        self.client.call(request).await
    }

    /// Stops and deletes a job. Answers `204 No Content`.
    pub async fn delete_job(&self, options: &DeleteJobOptions) -> Result<Response<()>> {
        options.validate()?;
        let request = Request::new("delete_job", Method::DELETE, "/v2/jobs/{job_id}")
            .path_param("job_id", &options.job_id)
            .header("refresh_token", &options.refresh_token)?
            .query_opt("force", options.force)
            .query_opt("propagate", options.propagate);
        self.client.call_empty(request).await
    }

    pub async fn list_job_logs(&self, options: &ListJobLogsOptions) -> Result<Response<JobLog>> {
        options.validate()?;
        let request = Request::new("list_job_logs", Method::GET, "/v2/jobs/{job_id}/logs")
            .path_param("job_id", &options.job_id);
        self.client.call(request).await
    }

    pub async fn get_job_files(
        &self,
        options: &GetJobFilesOptions,
    ) -> Result<Response<JobFileData>> {
        options.validate()?;
        let request = Request::new("get_job_files", Method::GET, "/v2/jobs/{job_id}/files")
            .path_param("job_id", &options.job_id)
            .query("file_type", options.file_type);
        self.client.call(request).await
    }

    /// Starts a job deleting several workspaces at once.
    pub async fn create_workspace_deletion_job(
        &self,
        options: &CreateWorkspaceDeletionJobOptions,
    ) -> Result<Response<WorkspaceBulkDeleteResponse>> {
        options.validate()?;
        let request = Request::new(
            "create_workspace_deletion_job",
            Method::POST,
            "/v1/workspace_jobs",
        )
        .header("refresh_token", &options.refresh_token)?
        .query_opt("destroy_resources", options.destroy_resources.as_deref())
        .json(options)?;
        self.client.call(request).await
    }

    pub async fn get_workspace_deletion_job_status(
        &self,
        options: &GetWorkspaceDeletionJobStatusOptions,
    ) -> Result<Response<WorkspaceJobResponse>> {
        options.validate()?;
        let request = Request::new(
            "get_workspace_deletion_job_status",
            Method::GET,
            "/v1/workspace_jobs/{wj_id}/status",
        )
        .path_param("wj_id", &options.wj_id);
        self.client.call(request).await
    }
}
