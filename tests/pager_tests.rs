//! Pagination over list operations.

use futures::StreamExt;
use schematics::auth::NoAuthAuthenticator;
use schematics::service::{
    ListAgentOptions, ListJobsOptions, ListWorkspaceActivitiesOptions, ListWorkspacesOptions,
};
use schematics::{Error, SchematicsV1, SchematicsV1Options};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn service(mock_server: &MockServer) -> SchematicsV1 {
    SchematicsV1::new(SchematicsV1Options {
        url: Some(mock_server.uri()),
        authenticator: Some(Arc::new(NoAuthAuthenticator)),
        ..Default::default()
    })
    .unwrap()
}

async fn mount_workspace_pages(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/workspaces"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3, "offset": 0, "limit": 2,
            "workspaces": [{ "id": "ws-1" }, { "id": "ws-2" }]
        })))
        .expect(1)
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/workspaces"))
        .and(query_param("offset", "2"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 3, "offset": 2, "limit": 2,
            "workspaces": [{ "id": "ws-3" }]
        })))
        .expect(1)
        .mount(mock_server)
        .await;
}

fn two_per_page() -> ListWorkspacesOptions {
    ListWorkspacesOptions {
        limit: Some(2),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_workspaces_pager_walks_every_page() {
    let mock_server = MockServer::start().await;
    mount_workspace_pages(&mock_server).await;

    let mut pager = service(&mock_server).workspaces_pager(&two_per_page());

    let first = pager.next_page().await.unwrap();
    assert_eq!(first.len(), 2);
    assert!(pager.has_next());
    assert_eq!(pager.offset(), 2);

    let second = pager.next_page().await.unwrap();
    assert_eq!(second[0].id.as_deref(), Some("ws-3"));
    assert!(!pager.has_next());

    assert!(pager.next_page().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_all_concatenates_pages() {
    let mock_server = MockServer::start().await;
    mount_workspace_pages(&mock_server).await;

    let all = service(&mock_server)
        .workspaces_pager(&two_per_page())
        .get_all()
        .await
        .unwrap();

    let ids: Vec<_> = all.iter().filter_map(|w| w.id.as_deref()).collect();
    assert_eq!(ids, vec!["ws-1", "ws-2", "ws-3"]);
}

#[tokio::test]
async fn test_stream_yields_items_in_order() {
    let mock_server = MockServer::start().await;
    mount_workspace_pages(&mock_server).await;

    let items: Vec<_> = service(&mock_server)
        .workspaces_pager(&two_per_page())
        .into_stream()
        .collect()
        .await;

    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|item| item.is_ok()));
}

#[tokio::test]
async fn test_pager_stops_on_empty_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/jobs"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jobs": [{ "id": "job-1" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v2/jobs"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jobs": [] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let jobs = service(&mock_server)
        .jobs_pager(&ListJobsOptions::new())
        .get_all()
        .await
        .unwrap();

    assert_eq!(jobs.len(), 1);
}

#[tokio::test]
async fn test_pager_error_keeps_position() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/agent_registrations"))
        .respond_with(ResponseTemplate::new(500).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut pager = service(&mock_server).agents_pager(&ListAgentOptions::new());
    let result = pager.next_page().await;

    match result {
        Err(Error::Api { status, .. }) => assert_eq!(status.as_u16(), 500),
        _ => panic!("Expected Api error, got {:?}", result),
    }
    assert!(pager.has_next());
    assert_eq!(pager.offset(), 0);
}

#[tokio::test]
async fn test_activities_pager_stops_when_service_ignores_offset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/workspaces/ws-1/actions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workspace_id": "ws-1",
            "actions": [{ "action_id": "act-1" }, { "action_id": "act-2" }]
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let activities = service(&mock_server)
        .workspace_activities_pager(&ListWorkspaceActivitiesOptions::new("ws-1"))
        .get_all()
        .await
        .unwrap();

    assert_eq!(activities.len(), 2);
}
