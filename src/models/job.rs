//! Job models: jobs run by actions and workspaces, their logs and files, and
//! bulk workspace deletion jobs.

use super::common::VariableData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A job: one execution of a command against a workspace, action or system.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// `workspace`, `action` or `system`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_parameter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<Vec<VariableData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Vec<VariableData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JobData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bastion: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_summary: Option<JobLogSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_store_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_store_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of jobs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<Vec<JobLite>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobLite {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets_ini: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_summary: Option<JobLogSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_in_queue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_in_queue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_job_status: Option<JobStatusWorkspace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_job_status: Option<JobStatusAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_job_status: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_job_status: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatusWorkspace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_status: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_status: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatusAction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bastion_status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bastion_status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets_status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets_status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Command-specific data; only the member for [`JobData::job_type`] is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_job_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_job_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_job_data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_job_data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobLogSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_start_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_analyzed_till: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_errors: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_download_job: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_job: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_job: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_job: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_job: Option<serde_json::Value>,
}

/// Log of a job. `details` holds the base64-encoded log text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobLog {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_summary: Option<JobLogSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A file produced or consumed by a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFileData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Vec<JobFileDataSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobFileDataSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceBulkDeleteResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

/// Progress of a bulk workspace deletion job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceJobResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_status: Option<WorkspaceJobStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceJobStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_progress: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_on: Option<DateTime<Utc>>,
}

/// Kinds of file a job can expose through `get_job_files`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobFileType {
    TemplateRepo,
    ReadmeFile,
    Log,
    StateFile,
    PlanJson,
}

impl JobFileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TemplateRepo => "template_repo",
            Self::ReadmeFile => "readme_file",
            Self::Log => "log",
            Self::StateFile => "state_file",
            Self::PlanJson => "plan_json",
        }
    }
}

impl fmt::Display for JobFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl JobLog {
    /// Decodes [`JobLog::details`] into text.
    ///
    /// Returns `None` when there are no details or they are not valid base64.
    pub fn decoded_details(&self) -> Option<String> {
        use base64::Engine as _;

        let raw = self.details.as_deref()?;
        let bytes = base64::engine::general_purpose::STANDARD.decode(raw).ok()?;
        Some(String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_file_type_wire_names() {
        assert_eq!(JobFileType::PlanJson.to_string(), "plan_json");
        assert_eq!(
            serde_json::to_string(&JobFileType::TemplateRepo).unwrap(),
            "\"template_repo\""
        );
    }

    #[test]
    fn test_decoded_details() {
        let log = JobLog {
            details: Some("UGxheSBzdGFydGVk".to_string()),
            ..Default::default()
        };
        assert_eq!(log.decoded_details().as_deref(), Some("Play started"));

        let garbled = JobLog {
            details: Some("not base64!".to_string()),
            ..Default::default()
        };
        assert_eq!(garbled.decoded_details(), None);
    }

    #[test]
    fn test_job_decodes_with_missing_fields() {
        let job: Job = serde_json::from_str(
            r#"{"id":"us-east.JOB.abc","command_object":"action","status":{"action_job_status":{"status_code":"job_finished"}},"submitted_at":"2021-03-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(job.id.as_deref(), Some("us-east.JOB.abc"));
        assert_eq!(
            job.status
                .and_then(|s| s.action_job_status)
                .and_then(|s| s.status_code)
                .as_deref(),
            Some("job_finished")
        );
        assert!(job.submitted_at.is_some());
    }
}
