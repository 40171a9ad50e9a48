//! Offset/limit pagination over list operations.
//!
//! A [`Pager`] repeats a list call, advancing `offset` by the number of items
//! each page returned. It stops after an empty page, a page shorter than the
//! requested `limit`, or once the offset reaches the total the service
//! reports. Each page is an independent call.
//!
//! ```no_run
//! use futures::TryStreamExt;
//! use schematics::{SchematicsV1, service::ListJobsOptions};
//!
//! # async fn example(service: SchematicsV1) -> Result<(), schematics::Error> {
//! let mut options = ListJobsOptions::new();
//! options.limit = Some(50);
//!
//! let jobs: Vec<_> = service.jobs_pager(&options).into_stream().try_collect().await?;
//! println!("{} jobs", jobs.len());
//! # Ok(())
//! # }
//! ```

use crate::models::{
    ActionList, ActionLite, Agent, AgentData, AgentDataList, AgentList, InventoryResourceRecord,
    InventoryResourceRecordList, JobList, JobLite, PolicyList, PolicyLite, ResourceQueryRecord,
    ResourceQueryRecordList, WorkspaceActivities, WorkspaceActivity, WorkspaceResponse,
    WorkspaceResponseList,
};
use crate::service::{
    ListActionsOptions, ListAgentOptions, ListInventoriesOptions, ListJobsOptions,
    ListPolicyOptions, ListResourceQueryOptions, ListWorkspaceActivitiesOptions,
    ListWorkspacesOptions, SchematicsV1,
};
use crate::{Response, Result};
use futures::future::BoxFuture;
use futures::{FutureExt, Stream};
use std::collections::VecDeque;

/// One page of a list operation.
pub trait Page {
    type Item: Clone + PartialEq;

    /// Total number of records, when the service reports it.
    fn total_count(&self) -> Option<i64>;

    /// The records of this page.
    fn into_items(self) -> Vec<Self::Item>;
}

type FetchPage<P> =
    Box<dyn Fn(i64, Option<i64>) -> BoxFuture<'static, Result<Response<P>>> + Send + Sync>;

/// Walks the pages of one list operation.
pub struct Pager<P: Page> {
    fetch: FetchPage<P>,
    offset: i64,
    limit: Option<i64>,
    done: bool,
    /// Items of the last page, to notice a service that ignores `offset`.
    previous: Vec<P::Item>,
}

impl<P: Page> std::fmt::Debug for Pager<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pager")
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .field("done", &self.done)
            .finish()
    }
}

impl<P: Page> Pager<P> {
    pub(crate) fn new(offset: Option<i64>, limit: Option<i64>, fetch: FetchPage<P>) -> Self {
        Self {
            fetch,
            offset: offset.unwrap_or(0),
            limit,
            done: false,
            previous: Vec::new(),
        }
    }

    /// Returns `true` while another page may exist.
    pub fn has_next(&self) -> bool {
        !self.done
    }

    /// Offset the next page starts at.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Fetches the next page. Returns an empty vector once exhausted.
    ///
    /// A failed call leaves the pager where it was, so it can be retried.
    pub async fn next_page(&mut self) -> Result<Vec<P::Item>> {
        if self.done {
            return Ok(Vec::new());
        }

        let page = (self.fetch)(self.offset, self.limit).await?.data;
        let total = page.total_count();
        let items = page.into_items();
        let fetched = items.len() as i64;

        if fetched > 0 && items == self.previous {
            tracing::warn!(
                offset = self.offset,
                "Page repeats the previous one, stopping"
            );
            self.done = true;
            return Ok(Vec::new());
        }

        self.offset += fetched;
        self.done = fetched == 0
            || self.limit.is_some_and(|limit| fetched < limit)
            || total.is_some_and(|total| self.offset >= total);

        tracing::debug!(
            fetched = fetched,
            offset = self.offset,
            total = ?total,
            done = self.done,
            "Fetched page"
        );
        if !self.done {
            self.previous.clone_from(&items);
        }
        Ok(items)
    }

    /// Fetches every remaining page and concatenates the items.
    pub async fn get_all(mut self) -> Result<Vec<P::Item>> {
        let mut all = Vec::new();
        while self.has_next() {
            all.extend(self.next_page().await?);
        }
        Ok(all)
    }

    /// Streams the remaining items one by one, fetching pages on demand.
    ///
    /// The stream ends after yielding the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<P::Item>> {
        futures::stream::unfold(
            (self, VecDeque::new(), false),
            |(mut pager, mut buffer, failed)| async move {
                if failed {
                    return None;
                }
                loop {
                    if let Some(item) = buffer.pop_front() {
                        return Some((Ok(item), (pager, buffer, false)));
                    }
                    if !pager.has_next() {
                        return None;
                    }
                    match pager.next_page().await {
                        Ok(items) => buffer.extend(items),
                        Err(e) => return Some((Err(e), (pager, buffer, true))),
                    }
                }
            },
        )
    }
}

impl Page for WorkspaceResponseList {
    type Item = WorkspaceResponse;

    fn total_count(&self) -> Option<i64> {
        self.count
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.workspaces.unwrap_or_default()
    }
}

impl Page for WorkspaceActivities {
    type Item = WorkspaceActivity;

    fn total_count(&self) -> Option<i64> {
        None
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.actions.unwrap_or_default()
    }
}

impl Page for ActionList {
    type Item = ActionLite;

    fn total_count(&self) -> Option<i64> {
        self.total_count
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.actions.unwrap_or_default()
    }
}

impl Page for JobList {
    type Item = JobLite;

    fn total_count(&self) -> Option<i64> {
        self.total_count
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.jobs.unwrap_or_default()
    }
}

impl Page for InventoryResourceRecordList {
    type Item = InventoryResourceRecord;

    fn total_count(&self) -> Option<i64> {
        self.total_count
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.inventories.unwrap_or_default()
    }
}

impl Page for ResourceQueryRecordList {
    type Item = ResourceQueryRecord;

    fn total_count(&self) -> Option<i64> {
        self.total_count
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.resource_queries.unwrap_or_default()
    }
}

impl Page for AgentList {
    type Item = Agent;

    fn total_count(&self) -> Option<i64> {
        self.total_count
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.agents.unwrap_or_default()
    }
}

impl Page for AgentDataList {
    type Item = AgentData;

    fn total_count(&self) -> Option<i64> {
        self.total_count
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.agents.unwrap_or_default()
    }
}

impl Page for PolicyList {
    type Item = PolicyLite;

    fn total_count(&self) -> Option<i64> {
        self.total_count
    }

    fn into_items(self) -> Vec<Self::Item> {
        self.policies.unwrap_or_default()
    }
}

impl SchematicsV1 {
    /// Pages through [`SchematicsV1::list_workspaces`].
    pub fn workspaces_pager(&self, options: &ListWorkspacesOptions) -> Pager<WorkspaceResponseList> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_workspaces(&options).await }.boxed()
            }),
        )
    }

    /// Pages through [`SchematicsV1::list_workspace_activities`].
    pub fn workspace_activities_pager(
        &self,
        options: &ListWorkspaceActivitiesOptions,
    ) -> Pager<WorkspaceActivities> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_workspace_activities(&options).await }.boxed()
            }),
        )
    }

    /// Pages through [`SchematicsV1::list_actions`].
    pub fn actions_pager(&self, options: &ListActionsOptions) -> Pager<ActionList> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_actions(&options).await }.boxed()
            }),
        )
    }

    /// Pages through [`SchematicsV1::list_jobs`].
    pub fn jobs_pager(&self, options: &ListJobsOptions) -> Pager<JobList> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_jobs(&options).await }.boxed()
            }),
        )
    }

    /// Pages through [`SchematicsV1::list_inventories`].
    pub fn inventories_pager(
        &self,
        options: &ListInventoriesOptions,
    ) -> Pager<InventoryResourceRecordList> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_inventories(&options).await }.boxed()
            }),
        )
    }

    /// Pages through [`SchematicsV1::list_resource_query`].
    pub fn resource_queries_pager(
        &self,
        options: &ListResourceQueryOptions,
    ) -> Pager<ResourceQueryRecordList> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_resource_query(&options).await }.boxed()
            }),
        )
    }

    /// Pages through [`SchematicsV1::list_agent`].
    pub fn agents_pager(&self, options: &ListAgentOptions) -> Pager<AgentList> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_agent(&options).await }.boxed()
            }),
        )
    }

    /// Pages through [`SchematicsV1::list_agent_data`].
    pub fn agent_data_pager(&self, options: &ListAgentOptions) -> Pager<AgentDataList> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_agent_data(&options).await }.boxed()
            }),
        )
    }

    /// Pages through [`SchematicsV1::list_policy`].
    pub fn policies_pager(&self, options: &ListPolicyOptions) -> Pager<PolicyList> {
        let (service, options) = (self.clone(), options.clone());
        Pager::new(
            options.offset,
            options.limit,
            Box::new(move |offset, limit| {
                let service = service.clone();
                let mut options = options.clone();
                options.offset = Some(offset);
                options.limit = limit;
                async move { service.list_policy(&options).await }.boxed()
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use http::{HeaderMap, StatusCode};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn page(items: &[&str], total: Option<i64>) -> Response<PolicyList> {
        let policies = items
            .iter()
            .map(|id| PolicyLite {
                id: Some(id.to_string()),
                ..Default::default()
            })
            .collect();
        Response::new(
            PolicyList {
                total_count: total,
                policies: Some(policies),
                ..Default::default()
            },
            String::new(),
            StatusCode::OK,
            HeaderMap::new(),
            Duration::ZERO,
            1,
        )
    }

    /// A pager over fixed pages keyed by offset, recording the offsets asked for.
    fn scripted(
        pages: Vec<(i64, Vec<&'static str>)>,
        total: Option<i64>,
        limit: Option<i64>,
    ) -> (Pager<PolicyList>, Arc<Mutex<Vec<i64>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let pager = Pager::new(
            None,
            limit,
            Box::new(move |offset, _limit| {
                seen.lock().unwrap().push(offset);
                let items = pages
                    .iter()
                    .find(|(start, _)| *start == offset)
                    .map(|(_, items)| items.clone())
                    .unwrap_or_default();
                async move { Ok::<_, crate::Error>(page(&items, total)) }.boxed()
            }),
        );
        (pager, calls)
    }

    #[tokio::test]
    async fn test_stops_on_short_page() {
        let (pager, calls) = scripted(
            vec![(0, vec!["a", "b"]), (2, vec!["c"])],
            None,
            Some(2),
        );
        let all = pager.get_all().await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(*calls.lock().unwrap(), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_stops_at_reported_total() {
        let (pager, calls) = scripted(
            vec![(0, vec!["a", "b"]), (2, vec!["c", "d"])],
            Some(4),
            Some(2),
        );
        let ids: Vec<_> = pager
            .into_stream()
            .map_ok(|p| p.id.unwrap_or_default())
            .try_collect()
            .await
            .unwrap();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(*calls.lock().unwrap(), vec![0, 2]);
    }

    #[tokio::test]
    async fn test_without_limit_stops_on_empty_page() {
        let (mut pager, calls) = scripted(vec![(0, vec!["a", "b", "c"])], None, None);
        assert_eq!(pager.next_page().await.unwrap().len(), 3);
        assert!(pager.has_next());
        assert!(pager.next_page().await.unwrap().is_empty());
        assert!(!pager.has_next());
        assert!(pager.next_page().await.unwrap().is_empty());
        assert_eq!(*calls.lock().unwrap(), vec![0, 3]);
    }

    #[tokio::test]
    async fn test_stops_when_offset_is_ignored() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let seen = calls.clone();
        let pager: Pager<PolicyList> = Pager::new(
            None,
            None,
            Box::new(move |offset, _limit| {
                seen.lock().unwrap().push(offset);
                async move { Ok::<_, crate::Error>(page(&["a", "b"], None)) }.boxed()
            }),
        );

        let all = pager.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(*calls.lock().unwrap(), vec![0, 2]);
    }
}
