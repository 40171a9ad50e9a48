//! Agent registration operations.

use super::{require, SchematicsV1};
use crate::models::{Agent, AgentList};
use crate::request::Request;
use crate::{Response, Result};
use http::Method;

/// Options for [`SchematicsV1::list_agent`] and [`SchematicsV1::list_agent_data`].
#[derive(Debug, Clone, Default)]
pub struct ListAgentOptions {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub profile: Option<String>,
    /// `all` or a specific agent state.
    pub filter: Option<String>,
}

impl ListAgentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn apply(&self, request: Request) -> Request {
        request
            .query_opt("offset", self.offset)
            .query_opt("limit", self.limit)
            .query_opt("profile", self.profile.as_deref())
            .query_opt("filter", self.filter.as_deref())
    }
}

/// Options for [`SchematicsV1::register_agent`].
#[derive(Debug, Clone, Default)]
pub struct RegisterAgentOptions {
    pub agent: Agent,
}

impl RegisterAgentOptions {
    /// An agent with the fields the service requires.
    pub fn new(
        name: impl Into<String>,
        agent_location: impl Into<String>,
        location: impl Into<String>,
        profile_id: impl Into<String>,
    ) -> Self {
        Self {
            agent: Agent {
                name: name.into(),
                agent_location: agent_location.into(),
                location: location.into(),
                profile_id: profile_id.into(),
                ..Default::default()
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_registration("register_agent", &self.agent)
    }
}

/// Options naming one agent, used by [`SchematicsV1::get_agent`],
/// [`SchematicsV1::delete_agent`] and the agent data operations.
#[derive(Debug, Clone, Default)]
pub struct AgentIdOptions {
    pub agent_id: String,
    pub profile: Option<String>,
}

impl AgentIdOptions {
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            profile: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.validate_for("agent")
    }

    pub fn validate_for(&self, operation: &'static str) -> Result<()> {
        require(operation, "agent_id", &self.agent_id)
    }
}

pub type GetAgentOptions = AgentIdOptions;
pub type DeleteAgentOptions = AgentIdOptions;

/// Options for [`SchematicsV1::update_agent_registration`].
#[derive(Debug, Clone, Default)]
pub struct UpdateAgentRegistrationOptions {
    pub agent_id: String,
    pub agent: Agent,
}

impl UpdateAgentRegistrationOptions {
    pub fn new(
        agent_id: impl Into<String>,
        name: impl Into<String>,
        agent_location: impl Into<String>,
        location: impl Into<String>,
        profile_id: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent: RegisterAgentOptions::new(name, agent_location, location, profile_id).agent,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require("update_agent_registration", "agent_id", &self.agent_id)?;
        validate_registration("update_agent_registration", &self.agent)
    }
}

fn validate_registration(operation: &'static str, agent: &Agent) -> Result<()> {
    require(operation, "name", &agent.name)?;
    require(operation, "agent_location", &agent.agent_location)?;
    require(operation, "location", &agent.location)?;
    require(operation, "profile_id", &agent.profile_id)
}

impl SchematicsV1 {
    /// Lists registered agents.
    pub async fn list_agent(&self, options: &ListAgentOptions) -> Result<Response<AgentList>> {
        let request = options.apply(Request::new(
            "list_agent",
            Method::GET,
            "/v2/agent_registrations",
        ));
        self.client.call(request).await
    }

    /// Registers an agent. Answers `201 Created` with the assigned id.
    pub async fn register_agent(&self, options: &RegisterAgentOptions) -> Result<Response<Agent>> {
        options.validate()?;
        let request = Request::new("register_agent", Method::POST, "/v2/agent_registrations")
            .json(&options.agent)?;
        self.client.call(request).await
    }

    pub async fn get_agent(&self, options: &GetAgentOptions) -> Result<Response<Agent>> {
        options.validate_for("get_agent")?;
        let request = Request::new(
            "get_agent",
            Method::GET,
            "/v2/agent_registrations/{agent_id}",
        )
        .path_param("agent_id", &options.agent_id)
        .query_opt("profile", options.profile.as_deref());
        self.client.call(request).await
    }

    /// Replaces an agent registration. Answers `201 Created`.
    pub async fn update_agent_registration(
        &self,
        options: &UpdateAgentRegistrationOptions,
    ) -> Result<Response<Agent>> {
        options.validate()?;
        let request = Request::new(
            "update_agent_registration",
            Method::PUT,
            "/v2/agent_registrations/{agent_id}",
        )
        .path_param("agent_id", &options.agent_id)
        .json(&options.agent)?;
        self.client.call(request).await
    }

    /// Removes an agent registration. Answers `204 No Content`.
    pub async fn delete_agent(&self, options: &DeleteAgentOptions) -> Result<Response<()>> {
        options.validate_for("delete_agent")?;
        let request = Request::new(
            "delete_agent",
            Method::DELETE,
            "/v2/agent_registrations/{agent_id}",
        )
        .path_param("agent_id", &options.agent_id);
        self.client.call_empty(request).await
    }
}
