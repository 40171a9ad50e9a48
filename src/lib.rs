//! # Schematics - a typed client for the Schematics v1 REST API
//!
//! This crate maps every operation of the Schematics infrastructure-automation
//! service (workspaces, actions, jobs, inventories, resource queries, agents,
//! KMS settings and policies) to one async method on [`SchematicsV1`]. Each
//! call is one HTTP request: options in, typed [`Response`] or [`Error`] out.
//!
//! ## Quick Start
//!
//! ```no_run
//! use schematics::auth::IamAuthenticator;
//! use schematics::service::{GetWorkspaceOptions, ListWorkspacesOptions};
//! use schematics::{SchematicsV1, SchematicsV1Options};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), schematics::Error> {
//!     let authenticator = IamAuthenticator::builder("my-api-key").build()?;
//!     let service = SchematicsV1::new(SchematicsV1Options {
//!         url: Some(SchematicsV1::service_url_for_region("us-south")?.to_string()),
//!         authenticator: Some(Arc::new(authenticator)),
//!         ..Default::default()
//!     })?;
//!
//!     let page = service.list_workspaces(&ListWorkspacesOptions::new()).await?;
//!     println!("{} workspaces in {:?}", page.workspaces.as_ref().map_or(0, Vec::len), page.latency);
//!
//!     let workspace = service
//!         .get_workspace(&GetWorkspaceOptions::new("us-south.workspace.demo.1a2b3c"))
//!         .await?;
//!     println!("status: {:?}", workspace.data.status);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **One method per operation** - Options structs with `new(required...)` constructors, validated before any request is sent
//! - **External configuration** - Credentials files and `SCHEMATICS_*` environment variables via [`config::ServiceProperties`]
//! - **Authenticators** - IAM API key exchange with token caching, bearer token, basic and no-auth
//! - **Rich error handling** - Status, headers, raw body and the decoded service error on every API failure
//! - **Opt-in retries** - Exponential or linear backoff in the transport, honouring `Retry-After`
//! - **Pagination** - [`pager::Pager`] walks offset/limit list operations as pages or a stream
//! - **Structured logging** - `tracing` events per request, response and failure
//!
//! ## Error Handling
//!
//! ```no_run
//! use schematics::{Error, SchematicsV1, service::GetJobOptions};
//!
//! # async fn example(service: SchematicsV1) -> Result<(), Error> {
//! match service.get_job(&GetJobOptions::new("us-east.JOB.demo")).await {
//!     Ok(job) => println!("job status: {:?}", job.data.status),
//!     Err(Error::Api { status, raw_response, .. }) => {
//!         eprintln!("service answered {}: {}", status, raw_response);
//!     }
//!     Err(Error::MissingParameter { operation, parameter }) => {
//!         eprintln!("{operation} needs {parameter}");
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Retries
//!
//! Requests are sent once unless the client is built with a strategy:
//!
//! ```no_run
//! use schematics::{Client, RetryStrategy, SchematicsV1, auth::NoAuthAuthenticator};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), schematics::Error> {
//! let client = Client::builder()
//!     .service_url("https://schematics.cloud.ibm.com")?
//!     .authenticator(Arc::new(NoAuthAuthenticator))
//!     .retry_strategy(RetryStrategy::ExponentialBackoff {
//!         initial_delay: Duration::from_millis(200),
//!         max_delay: Duration::from_secs(30),
//!         max_retries: 4,
//!         jitter: true,
//!     })
//!     .build()?;
//! let service = SchematicsV1::from_client(client);
//! # Ok(())
//! # }
//! ```

pub mod auth;
mod client;
pub mod config;
mod error;
pub mod models;
pub mod pager;
pub mod request;
mod response;
pub mod service;
pub mod transport;

pub use client::{Client, ClientBuilder};
pub use error::{ApiErrorBody, ApiErrorItem, Error, Result};
pub use response::Response;
pub use service::{SchematicsV1, SchematicsV1Options};
pub use transport::{RetryPredicate, RetryStrategy};
