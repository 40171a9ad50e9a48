//! Agent deployment models: agent data, supported versions and the recent
//! pre-requisite scanner, health check and deploy jobs.

use super::agent::{AgentSystemStatus, AgentUserState};
use super::common::VariableData;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An agent deployment record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentData {
    #[serde(default)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub resource_group: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub schematics_location: String,
    #[serde(default)]
    pub agent_location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_infrastructure: Option<AgentInfrastructure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_metadata: Option<Vec<AgentMetadataInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_inputs: Option<Vec<VariableData>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_state: Option<AgentUserState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_crn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_state: Option<AgentSystemStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_kpi: Option<AgentKpiData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_prs_job: Option<AgentDataRecentPrsJob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_deploy_job: Option<AgentDataRecentDeployJob>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_health_job: Option<AgentDataRecentHealthJob>,
}

/// One page of agent deployment records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDataList {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agents: Option<Vec<AgentData>>,
}

/// The cluster and object storage an agent is deployed on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentInfrastructure {
    /// `ibm_kubernetes`, `ibm_openshift` or `ibm_satellite`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infra_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_resource_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cos_instance_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cos_bucket_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cos_bucket_region: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMetadataInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentKpiData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_indicator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_indicator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_usage_indicator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_indicators: Option<Vec<serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infra_indicators: Option<Vec<serde_json::Value>>,
}

/// The latest pre-requisite scanner job of an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDataRecentPrsJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
}

/// The latest health check job of an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDataRecentHealthJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
}

/// The latest deploy job of an agent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentDataRecentDeployJob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_redeployed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentVersions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_agent_versions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_version: Option<String>,
}
