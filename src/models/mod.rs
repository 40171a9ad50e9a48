//! Request and response bodies of the service.
//!
//! Every attribute the service may omit is an `Option` and is left out of
//! request bodies when unset. Timestamps are UTC.

pub mod action;
pub mod agent;
pub mod agent_data;
pub mod common;
pub mod inventory;
pub mod job;
pub mod resource_query;
pub mod settings;
pub mod workspace;

pub use action::*;
pub use agent::*;
pub use agent_data::*;
pub use common::*;
pub use inventory::*;
pub use job::*;
pub use resource_query::*;
pub use settings::*;
pub use workspace::*;
