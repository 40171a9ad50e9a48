//! A read-only tour of a Schematics account.
//!
//! This demo shows how to:
//! - Build a service client from external configuration
//! - Call a few read-only operations
//! - Page through workspaces and stream jobs
//! - Inspect API errors
//!
//! Configure credentials through `SCHEMATICS_URL`, `SCHEMATICS_APIKEY` (or
//! another `SCHEMATICS_AUTH_TYPE`) or an `ibm-credentials.env` file, then run
//! with: `cargo run --example schematics_tour`

use futures::StreamExt;
use schematics::service::{
    GetSchematicsVersionOptions, GetWorkspaceOptions, ListJobsOptions, ListLocationsOptions,
    ListWorkspacesOptions,
};
use schematics::{Error, SchematicsV1, SchematicsV1Options};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("schematics=debug,schematics_tour=info")
        .init();

    let service = match SchematicsV1::from_external_config(SchematicsV1Options::default()) {
        Ok(service) => service,
        Err(Error::Configuration(message)) => {
            eprintln!("Schematics is not configured, skipping the tour: {}", message);
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    println!("Service URL: {}", service.service_url());

    println!("=== Version ===");
    let version = service
        .get_schematics_version(&GetSchematicsVersionOptions::new())
        .await?;
    println!(
        "Terraform {:?}, build {:?} ({:?})",
        version.terraform_version, version.buildno, version.latency
    );

    println!("\n=== Regions ===");
    let locations = service.list_locations(&ListLocationsOptions::new()).await?;
    for location in locations.into_data().locations.unwrap_or_default() {
        println!(
            "{:<12} {}",
            location.region.unwrap_or_default(),
            location.display_name.unwrap_or_default()
        );
    }

    println!("\n=== Workspaces ===");
    let options = ListWorkspacesOptions {
        limit: Some(10),
        ..Default::default()
    };
    let workspaces = service.workspaces_pager(&options).get_all().await?;
    println!("{} workspaces", workspaces.len());
    for workspace in workspaces.iter().take(5) {
        println!(
            "{} [{}]",
            workspace.name.as_deref().unwrap_or("<unnamed>"),
            workspace.status.as_deref().unwrap_or("UNKNOWN")
        );
    }

    println!("\n=== Recent jobs ===");
    let mut jobs = Box::pin(
        service
            .jobs_pager(&ListJobsOptions {
                limit: Some(20),
                ..Default::default()
            })
            .into_stream()
            .take(5),
    );
    while let Some(job) = jobs.next().await {
        let job = job?;
        println!(
            "{} {}",
            job.id.unwrap_or_default(),
            job.command_name.unwrap_or_default()
        );
    }

    println!("\n=== Error handling ===");
    match service
        .get_workspace(&GetWorkspaceOptions::new("us-south.workspace.does-not-exist"))
        .await
    {
        Ok(workspace) => println!("Unexpectedly found {:?}", workspace.id),
        Err(Error::Api { status, body, .. }) => {
            let message = body.as_ref().and_then(|b| b.message()).unwrap_or("no message");
            println!("API error {}: {}", status, message);
        }
        Err(e) => println!("Other error: {}", e),
    }

    match service.get_workspace(&GetWorkspaceOptions::new("")).await {
        Err(Error::MissingParameter {
            operation,
            parameter,
        }) => println!("{} rejected locally: {} is required", operation, parameter),
        other => println!("Unexpected result: {:?}", other.map(|r| r.status)),
    }

    Ok(())
}
