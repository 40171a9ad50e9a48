//! Agent deployment operations: agent data, supported versions, and the
//! pre-requisite scanner (PRS), health check and deploy jobs.

use super::{require, AgentIdOptions, ListAgentOptions, SchematicsV1};
use crate::models::{
    AgentData, AgentDataList, AgentDataRecentDeployJob, AgentDataRecentHealthJob,
    AgentDataRecentPrsJob, AgentInfrastructure, AgentVersions,
};
use crate::request::Request;
use crate::{Response, Result};
use http::Method;
use serde::de::DeserializeOwned;

pub type ListAgentDataOptions = ListAgentOptions;
pub type GetAgentDataOptions = AgentIdOptions;
pub type DeleteAgentDataOptions = AgentIdOptions;
pub type GetPrsAgentJobOptions = AgentIdOptions;
pub type GetHealthCheckAgentJobOptions = AgentIdOptions;
pub type GetDeployAgentJobOptions = AgentIdOptions;

/// Options for [`SchematicsV1::create_agent_data`].
#[derive(Debug, Clone, Default)]
pub struct CreateAgentDataOptions {
    pub agent: AgentData,
}

impl CreateAgentDataOptions {
    /// Agent data with the fields the service requires.
    pub fn new(
        name: impl Into<String>,
        resource_group: impl Into<String>,
        version: impl Into<String>,
        schematics_location: impl Into<String>,
        agent_location: impl Into<String>,
        agent_infrastructure: AgentInfrastructure,
    ) -> Self {
        Self {
            agent: AgentData {
                name: name.into(),
                resource_group: resource_group.into(),
                version: version.into(),
                schematics_location: schematics_location.into(),
                agent_location: agent_location.into(),
                agent_infrastructure: Some(agent_infrastructure),
                ..Default::default()
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_agent_data("create_agent_data", &self.agent)
    }
}

/// Options for [`SchematicsV1::update_agent_data`].
#[derive(Debug, Clone, Default)]
pub struct UpdateAgentDataOptions {
    pub agent_id: String,
    pub agent: AgentData,
}

impl UpdateAgentDataOptions {
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        resource_group: impl Into<String>,
        version: impl Into<String>,
        schematics_location: impl Into<String>,
        agent_location: impl Into<String>,
        agent_infrastructure: AgentInfrastructure,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent: CreateAgentDataOptions::new(
                name,
                resource_group,
                version,
                schematics_location,
                agent_location,
                agent_infrastructure,
            )
            .agent,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("update_agent_data", "agent_id", &self.agent_id)?;
        validate_agent_data("update_agent_data", &self.agent)
    }
}

fn validate_agent_data(operation: &'static str, agent: &AgentData) -> Result<()> {
    require(operation, "name", &agent.name)?;
    require(operation, "resource_group", &agent.resource_group)?;
    require(operation, "version", &agent.version)?;
    require(operation, "schematics_location", &agent.schematics_location)?;
    require(operation, "agent_location", &agent.agent_location)
}

/// Options for [`SchematicsV1::get_agent_versions`].
#[derive(Debug, Clone, Default)]
pub struct GetAgentVersionsOptions {}

impl GetAgentVersionsOptions {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Options for starting an agent job: [`SchematicsV1::prs_agent_job`],
/// [`SchematicsV1::health_check_agent_job`] and
/// [`SchematicsV1::deploy_agent_job`].
#[derive(Debug, Clone, Default)]
pub struct AgentJobOptions {
    pub agent_id: String,
    /// Start the job even if one is already running.
    pub force: Option<bool>,
}

impl AgentJobOptions {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            force: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("agent_job")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "agent_id", &self.agent_id)
    }
}

pub type PrsAgentJobOptions = AgentJobOptions;
pub type HealthCheckAgentJobOptions = AgentJobOptions;
pub type DeployAgentJobOptions = AgentJobOptions;

/// Options for [`SchematicsV1::delete_agent_resources`].
#[derive(Debug, Clone, Default)]
pub struct DeleteAgentResourcesOptions {
    pub agent_id: String,
    pub refresh_token: String,
}

impl DeleteAgentResourcesOptions {
    pub fn new(agent_id: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            refresh_token: refresh_token.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("delete_agent_resources", "agent_id", &self.agent_id)?;
        require("delete_agent_resources", "refresh_token", &self.refresh_token)
    }
}

impl SchematicsV1 {
    /// Lists agent deployment records.
    pub async fn list_agent_data(
        &self,
        options: &ListAgentDataOptions,
    ) -> Result<Response<AgentDataList>> {
        let request = options.apply(Request::new("list_agent_data", Method::GET, "/v2/agents"));
        self.client.call(request).await
    }

    /// Creates an agent deployment record. Answers `201 Created`.
    pub async fn create_agent_data(
        &self,
        options: &CreateAgentDataOptions,
    ) -> Result<Response<AgentData>> {
        options.validate()?;
        let request =
            Request::new("create_agent_data", Method::POST, "/v2/agents").json(&options.agent)?;
        self.client.call(request).await
    }

    pub async fn get_agent_data(
        &self,
        options: &GetAgentDataOptions,
    ) -> Result<Response<AgentData>> {
        options.validate_for("get_agent_data")?;
        let request = Request::new("get_agent_data", Method::GET, "/v2/agents/{agent_id}")
            .path_param("agent_id", &options.agent_id)
            .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    /// Replaces an agent deployment record. Answers `201 Created`.
    pub async fn update_agent_data(
        &self,
        options: &UpdateAgentDataOptions,
    ) -> Result<Response<AgentData>> {
        options.validate()?;
        let request = Request::new("update_agent_data", Method::PUT, "/v2/agents/{agent_id}")
            .path_param("agent_id", &options.agent_id)
            .json(&options.agent)?;
        self.client.call(request).await
    }

    /// Deletes an agent deployment record. Answers `204 No Content`.
    pub async fn delete_agent_data(
        &self,
        options: &DeleteAgentDataOptions,
    ) -> Result<Response<()>> {
        options.validate_for("delete_agent_data")?;
        let request = Request::new("delete_agent_data", Method::DELETE, "/v2/agents/{agent_id}")
            .path_param("agent_id", &options.agent_id);
        self.client.call_empty(request).await
    }

    pub async fn get_agent_versions(
        &self,
        _options: &GetAgentVersionsOptions,
    ) -> Result<Response<AgentVersions>> {
        let request = Request::new("get_agent_versions", Method::GET, "/v2/agents/versions");
        self.client.call(request).await
    }

    /// Gets the latest pre-requisite scanner job of an agent.
    pub async fn get_prs_agent_job(
        &self,
        options: &GetPrsAgentJobOptions,
    ) -> Result<Response<AgentDataRecentPrsJob>> {
        self.get_agent_job("get_prs_agent_job", "/v2/agents/{agent_id}/prs", options)
            .await
    }

    /// Runs the pre-requisite scanner. Answers `202 Accepted`.
    pub async fn prs_agent_job(
        &self,
        options: &PrsAgentJobOptions,
    ) -> Result<Response<AgentDataRecentPrsJob>> {
        self.start_agent_job("prs_agent_job", "/v2/agents/{agent_id}/prs", options)
            .await
    }

    pub async fn get_health_check_agent_job(
        &self,
        options: &GetHealthCheckAgentJobOptions,
    ) -> Result<Response<AgentDataRecentHealthJob>> {
        self.get_agent_job(
            "get_health_check_agent_job",
            "/v2/agents/{agent_id}/health",
            options,
        )
        .await
    }

    /// Runs a health check. Answers `202 Accepted`.
    pub async fn health_check_agent_job(
        &self,
        options: &HealthCheckAgentJobOptions,
    ) -> Result<Response<AgentDataRecentHealthJob>> {
        self.start_agent_job(
            "health_check_agent_job",
            "/v2/agents/{agent_id}/health",
            options,
        )
        .await
    }

    pub async fn get_deploy_agent_job(
        &self,
        options: &GetDeployAgentJobOptions,
    ) -> Result<Response<AgentDataRecentDeployJob>> {
        self.get_agent_job("get_deploy_agent_job", "/v2/agents/{agent_id}/deploy", options)
            .await
    }

    /// Deploys the agent to its cluster. Answers `202 Accepted`.
    pub async fn deploy_agent_job(
        &self,
        options: &DeployAgentJobOptions,
    ) -> Result<Response<AgentDataRecentDeployJob>> {
        self.start_agent_job("deploy_agent_job", "/v2/agents/{agent_id}/deploy", options)
            .await
    }

    /// Removes the resources an agent deployed. Answers `202 Accepted`.
    pub async fn delete_agent_resources(
        &self,
        options: &DeleteAgentResourcesOptions,
    ) -> Result<Response<()>> {
        options.validate()?;
        let request = Request::new(
            "delete_agent_resources",
            Method::DELETE,
            "/v2/agents/{agent_id}/resources",
        )
        .path_param("agent_id", &options.agent_id)
        .header("refresh_token", &options.refresh_token)?;
        self.client.call_empty(request).await
    }

    async fn get_agent_job<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &'static str,
        options: &AgentIdOptions,
    ) -> Result<Response<T>> {
        options.validate_for(operation)?;
        let request =
            Request::new(operation, Method::GET, path).path_param("agent_id", &options.agent_id);
        self.client.call(request).await
    }

    async fn start_agent_job<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &'static str,
        options: &AgentJobOptions,
    ) -> Result<Response<T>> {
        options.validate_for(operation)?;
        let request = Request::new(operation, Method::PUT, path)
            .path_param("agent_id", &options.agent_id)
            .query_opt("force", options.force);
        self.client.call(request).await
    }
}
