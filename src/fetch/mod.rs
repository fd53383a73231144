//! Concurrent listing of every resource type in scope
//!
//! One task per resource type pages through its collection; results land in
//! a shared accumulator once the walk for that type is complete. Forbidden
//! resource types are reported as diagnostics, every other failure is joined
//! into a single [`FetchErrors`] returned next to the objects that did arrive.

mod kube_client;

pub use kube_client::KubeResourceClient;

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::JoinSet;

use crate::discovery::ResourceDescriptor;
use crate::error::{FetchErrors, ListError, ResourceFetchError};
use crate::tree::Object;

/// Objects requested per list call
pub const PAGE_SIZE: u32 = 250;

/// Which namespaces a run looks at, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceScope {
    Namespace(String),
    All,
}

impl NamespaceScope {
    /// Namespace to put on namespaced requests; `None` lists across all of them
    pub fn namespace(&self) -> Option<&str> {
        match self {
            NamespaceScope::Namespace(ns) => Some(ns),
            NamespaceScope::All => None,
        }
    }

    /// Cluster-scoped types are only listed when every namespace is in scope
    pub fn includes(&self, resource: &ResourceDescriptor) -> bool {
        match self {
            NamespaceScope::Namespace(_) => resource.namespaced,
            NamespaceScope::All => true,
        }
    }
}

/// One page of a list response
#[derive(Debug, Default)]
pub struct ListPage {
    pub items: Vec<Object>,
    /// Empty when there are no further pages
    pub continue_token: String,
}

/// Read access to cluster objects of an arbitrary resource type
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn list_page(
        &self,
        resource: &ResourceDescriptor,
        namespace: Option<&str>,
        limit: u32,
        continue_token: &str,
    ) -> Result<ListPage, ListError>;

    async fn get(
        &self,
        resource: &ResourceDescriptor,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Object, ListError>;
}

/// Everything collected by [`fetch_all`]
#[derive(Debug, Default)]
pub struct FetchOutcome {
    pub objects: Vec<Object>,
    /// Resource types skipped because listing them was forbidden
    pub forbidden: Vec<String>,
    pub error: Option<FetchErrors>,
}

#[derive(Default)]
struct Accumulator {
    objects: Vec<Object>,
    forbidden: Vec<String>,
    failures: Vec<ResourceFetchError>,
}

/// List every in-scope resource type concurrently
///
/// Waits for every task before returning. Objects from resource types that
/// failed are dropped; objects from every other type are kept even when
/// `error` is set.
pub async fn fetch_all(
    client: Arc<dyn ResourceClient>,
    resources: &[ResourceDescriptor],
    scope: &NamespaceScope,
    page_size: u32,
) -> FetchOutcome {
    let start = Instant::now();
    let shared = Arc::new(Mutex::new(Accumulator::default()));
    let mut tasks = JoinSet::new();

    for resource in resources {
        if !scope.includes(resource) {
            tracing::trace!(resource = %resource, "cluster-scoped, skipping");
            continue;
        }
        let client = Arc::clone(&client);
        let shared = Arc::clone(&shared);
        let resource = resource.clone();
        let namespace = scope.namespace().map(str::to_string);
        tasks.spawn(async move {
            list_resource(
                client.as_ref(),
                &resource,
                namespace.as_deref(),
                page_size,
                &shared,
            )
            .await;
        });
    }

    tracing::debug!(tasks = tasks.len(), "listing resource types");

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "list task did not complete");
            lock(&shared).failures.push(ResourceFetchError {
                resource: "<task>".to_string(),
                source: ListError::Other(e.to_string()),
            });
        }
    }

    let acc = match Arc::try_unwrap(shared) {
        Ok(mutex) => mutex.into_inner().unwrap_or_else(|p| p.into_inner()),
        Err(shared) => std::mem::take(&mut *lock(&shared)),
    };

    tracing::info!(
        objects = acc.objects.len(),
        forbidden = acc.forbidden.len(),
        failed = acc.failures.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "fetched objects"
    );

    FetchOutcome {
        objects: acc.objects,
        forbidden: acc.forbidden,
        error: (!acc.failures.is_empty()).then(|| FetchErrors(acc.failures)),
    }
}

fn lock(shared: &Mutex<Accumulator>) -> std::sync::MutexGuard<'_, Accumulator> {
    shared.lock().expect("fetch accumulator lock poisoned")
}

async fn list_resource(
    client: &dyn ResourceClient,
    resource: &ResourceDescriptor,
    namespace: Option<&str>,
    page_size: u32,
    shared: &Mutex<Accumulator>,
) {
    let mut items = Vec::new();
    let mut token = String::new();
    let mut pages = 0usize;

    loop {
        match client.list_page(resource, namespace, page_size, &token).await {
            Ok(page) => {
                pages += 1;
                items.extend(page.items);
                if page.continue_token.is_empty() {
                    break;
                }
                token = page.continue_token;
            }
            Err(e) if e.is_forbidden() => {
                tracing::debug!(resource = %resource, error = %e, "list forbidden");
                lock(shared).forbidden.push(resource.to_string());
                return;
            }
            Err(e) => {
                tracing::debug!(resource = %resource, error = %e, "list failed");
                lock(shared).failures.push(ResourceFetchError {
                    resource: resource.to_string(),
                    source: e,
                });
                return;
            }
        }
    }

    tracing::trace!(resource = %resource, pages, objects = items.len(), "listed");
    lock(shared).objects.extend(items);
}
