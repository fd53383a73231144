//! Name lookup over discovered resource types

use std::collections::HashMap;
use std::time::Instant;

use super::overrides::find_override;
use super::{
    DiscoveryService, FailedGroup, GroupVersion, ResourceDescriptor, ServerResource,
    ServerResourceGroup,
};
use crate::error::CatalogError;

/// How a kind token was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// A built-in disambiguation rule picked the resource
    Override,
    /// Exactly one resource is registered under the token
    Unique,
}

/// Successful resolution of a kind token
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub descriptor: &'a ResourceDescriptor,
    pub matched: MatchKind,
}

/// All list-capable resource types, indexed by every name a user may type
///
/// Built once per invocation and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ResourceCatalog {
    list: Vec<ResourceDescriptor>,
    by_name: HashMap<String, Vec<usize>>,
    failed: Vec<FailedGroup>,
}

impl ResourceCatalog {
    /// Query discovery and build the catalog
    pub async fn discover(service: &dyn DiscoveryService) -> Result<Self, CatalogError> {
        let start = Instant::now();
        let discovered = service
            .server_preferred_resources()
            .await
            .map_err(CatalogError::Discovery)?;
        tracing::info!(
            groups = discovered.groups.len(),
            failed = discovered.failed.len(),
            elapsed = ?start.elapsed(),
            "queried api discovery"
        );
        let mut catalog = Self::build(&discovered.groups)?;
        catalog.failed = discovered.failed;
        Ok(catalog)
    }

    /// Build the catalog from discovery documents
    ///
    /// Resources without the `list` verb are skipped since ownership lookup
    /// needs to list every candidate type.
    pub fn build(groups: &[ServerResourceGroup]) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for group in groups {
            let gv = GroupVersion::parse(&group.group_version)?;
            tracing::trace!(
                group_version = %group.group_version,
                apis = group.resources.len(),
                "iterating over group"
            );

            for res in &group.resources {
                // Subresources (pods/log, deployments/scale) are never listable objects
                if res.name.contains('/') {
                    continue;
                }
                if !res.verbs.iter().any(|v| v == "list") {
                    tracing::trace!(api = %res.name, verbs = ?res.verbs, "api lacks list verb, skipping");
                    continue;
                }
                catalog.insert(descriptor_for(res, &gv));
            }
        }

        tracing::debug!(
            apis = catalog.list.len(),
            names = catalog.by_name.len(),
            "built resource catalog"
        );
        Ok(catalog)
    }

    fn insert(&mut self, descriptor: ResourceDescriptor) {
        let idx = self.list.len();
        let gv = GroupVersion {
            group: descriptor.group.clone(),
            version: descriptor.version.clone(),
        };
        for name in api_names(&descriptor, &gv) {
            let slot = self.by_name.entry(name.to_lowercase()).or_default();
            // singular == kind fallback may repeat a short name; register once
            if !slot.contains(&idx) {
                slot.push(idx);
            }
        }
        self.list.push(descriptor);
    }

    /// Every list-capable resource type, in discovery order
    pub fn resources(&self) -> &[ResourceDescriptor] {
        &self.list
    }

    /// Group versions discovery could not read; their types are absent
    pub fn failed_groups(&self) -> &[FailedGroup] {
        &self.failed
    }

    /// Case-insensitive generic lookup, without override rules
    pub fn lookup(&self, token: &str) -> Vec<&ResourceDescriptor> {
        self.by_name
            .get(&token.to_lowercase())
            .map(|ids| ids.iter().map(|&i| &self.list[i]).collect())
            .unwrap_or_default()
    }

    /// Resolve a user-typed kind token to exactly one resource type
    ///
    /// Override rules are consulted first, regardless of how many generic
    /// matches exist.
    pub fn resolve(&self, token: &str) -> Result<Resolved<'_>, CatalogError> {
        if let Some(descriptor) = find_override(self, token) {
            tracing::debug!(kind = %token, resource = %descriptor, "kind override found");
            return Ok(Resolved {
                descriptor,
                matched: MatchKind::Override,
            });
        }

        let matches = self.lookup(token);
        tracing::trace!(kind = %token, matches = matches.len(), "kind lookup");
        match matches.as_slice() {
            [] => Err(CatalogError::UnknownKind(token.to_string())),
            [only] => Ok(Resolved {
                descriptor: only,
                matched: MatchKind::Unique,
            }),
            many => Err(CatalogError::AmbiguousKind {
                kind: token.to_string(),
                candidates: many.iter().map(|d| d.full_name()).collect(),
            }),
        }
    }
}

fn descriptor_for(res: &ServerResource, gv: &GroupVersion) -> ResourceDescriptor {
    ResourceDescriptor {
        group: gv.group.clone(),
        version: gv.version.clone(),
        resource_name: res.name.clone(),
        kind: res.kind.clone(),
        singular_name: res.singular_name.clone(),
        plural_name: res.name.clone(),
        short_names: res.short_names.clone(),
        namespaced: res.namespaced,
        supports_list: true,
    }
}

/// Every name that may refer to a resource type
///
/// For the singular name, the plural name and each short name this yields
/// the bare form (`deployment`), the group form (`deployment.apps`) and the
/// version-group form (`deployment.v1.apps`). An empty singular name falls
/// back to the lower-cased kind.
pub fn api_names(descriptor: &ResourceDescriptor, gv: &GroupVersion) -> Vec<String> {
    let singular = if descriptor.singular_name.is_empty() {
        descriptor.kind.to_lowercase()
    } else {
        descriptor.singular_name.clone()
    };

    let mut names = vec![singular.clone()];
    if descriptor.plural_name != singular {
        names.push(descriptor.plural_name.clone());
    }
    names.extend(descriptor.short_names.iter().cloned());

    names
        .iter()
        .flat_map(|n| {
            [
                n.clone(),
                format!("{}.{}", n, gv.group),
                format!("{}.{}.{}", n, gv.version, gv.group),
            ]
        })
        .collect()
}
