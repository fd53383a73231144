//! Resource discovery
//!
//! Builds the catalog of every list-capable resource type the API server
//! advertises and resolves user-typed kind tokens (`deploy`, `svc`,
//! `kservice.v1.serving.knative.dev`, ...) against it.

mod catalog;
mod overrides;

pub use catalog::{MatchKind, Resolved, ResourceCatalog, api_names};

use async_trait::async_trait;
use futures::future::join_all;
use kube::Client;
use std::fmt;

use crate::error::{BoxError, CatalogError};

/// A parsed `group/version` string; the core group is empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersion {
    pub group: String,
    pub version: String,
}

impl GroupVersion {
    /// Parse the `groupVersion` field of a discovery document
    ///
    /// Accepts `v1` (core group), `apps/v1` and the empty string.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        if s.is_empty() {
            return Ok(Self {
                group: String::new(),
                version: String::new(),
            });
        }
        match s.split_once('/') {
            None => Ok(Self {
                group: String::new(),
                version: s.to_string(),
            }),
            Some((group, version)) if !version.contains('/') => Ok(Self {
                group: group.to_string(),
                version: version.to_string(),
            }),
            Some(_) => Err(CatalogError::InvalidGroupVersion(s.to_string())),
        }
    }
}

impl fmt::Display for GroupVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.version)
        } else {
            write!(f, "{}/{}", self.group, self.version)
        }
    }
}

/// One resource entry of a discovery document
#[derive(Debug, Clone, Default)]
pub struct ServerResource {
    /// Plural resource name, e.g. `deployments`
    pub name: String,
    pub singular_name: String,
    pub kind: String,
    pub short_names: Vec<String>,
    pub namespaced: bool,
    pub verbs: Vec<String>,
}

/// Resources served under one preferred group/version
#[derive(Debug, Clone, Default)]
pub struct ServerResourceGroup {
    pub group_version: String,
    pub resources: Vec<ServerResource>,
}

/// A group version whose resource list could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedGroup {
    pub group_version: String,
    pub error: String,
}

/// Outcome of one discovery pass
///
/// Unavailable group versions do not fail the pass; they are carried in
/// `failed` so callers can report the resource types that were left out.
#[derive(Debug, Clone, Default)]
pub struct PreferredResources {
    pub groups: Vec<ServerResourceGroup>,
    pub failed: Vec<FailedGroup>,
}

/// A concrete, queryable resource type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub group: String,
    pub version: String,
    /// Name used in request paths
    pub resource_name: String,
    pub kind: String,
    pub singular_name: String,
    pub plural_name: String,
    pub short_names: Vec<String>,
    pub namespaced: bool,
    pub supports_list: bool,
}

impl ResourceDescriptor {
    /// `apiVersion` as it appears on objects (`v1`, `apps/v1`)
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }

    /// Fully qualified name accepted back as a kind token: `resource.version.group`
    pub fn full_name(&self) -> String {
        [
            self.resource_name.as_str(),
            self.version.as_str(),
            self.group.as_str(),
        ]
        .join(".")
    }

    /// Convert into the kube-rs dynamic resource handle
    pub fn api_resource(&self) -> kube::core::ApiResource {
        kube::core::ApiResource {
            group: self.group.clone(),
            version: self.version.clone(),
            api_version: self.api_version(),
            kind: self.kind.clone(),
            plural: self.resource_name.clone(),
        }
    }
}

impl fmt::Display for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Resource={}", self.api_version(), self.resource_name)
    }
}

/// Source of the server's preferred resource lists
#[async_trait]
pub trait DiscoveryService: Send + Sync {
    async fn server_preferred_resources(&self) -> Result<PreferredResources, BoxError>;
}

/// Discovery backed by the API server's `/api` and `/apis` endpoints
pub struct KubeDiscovery {
    client: Client,
}

impl KubeDiscovery {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn group_resources(&self, group_version: &str) -> Result<ServerResourceGroup, BoxError> {
        let list = if group_version.contains('/') {
            self.client.list_api_group_resources(group_version).await?
        } else {
            self.client.list_core_api_resources(group_version).await?
        };
        Ok(ServerResourceGroup {
            group_version: list.group_version,
            resources: list
                .resources
                .into_iter()
                .map(|r| ServerResource {
                    name: r.name,
                    singular_name: r.singular_name,
                    kind: r.kind,
                    short_names: r.short_names.unwrap_or_default(),
                    namespaced: r.namespaced,
                    verbs: r.verbs,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl DiscoveryService for KubeDiscovery {
    async fn server_preferred_resources(&self) -> Result<PreferredResources, BoxError> {
        let core = self.client.list_core_api_versions().await?;
        let groups = self.client.list_api_groups().await?;

        let mut group_versions: Vec<String> = core.versions.into_iter().take(1).collect();
        for group in groups.groups {
            let preferred = group
                .preferred_version
                .map(|v| v.group_version)
                .or_else(|| group.versions.into_iter().next().map(|v| v.group_version));
            if let Some(gv) = preferred {
                group_versions.push(gv);
            }
        }
        tracing::debug!(count = group_versions.len(), "querying preferred group versions");

        let results = join_all(group_versions.iter().map(|gv| self.group_resources(gv))).await;

        let mut out = PreferredResources::default();
        for (gv, result) in group_versions.into_iter().zip(results) {
            match result {
                Ok(group) => out.groups.push(group),
                // Aggregated APIs (metrics.k8s.io and friends) are often unavailable
                Err(e) => {
                    tracing::warn!(group_version = %gv, error = %e, "skipping group version");
                    out.failed.push(FailedGroup {
                        group_version: gv,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(out)
    }
}
