//! In-memory cluster used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use kubetree::discovery::{
    DiscoveryService, FailedGroup, PreferredResources, ServerResource, ServerResourceGroup,
};
use kubetree::error::{BoxError, ListError};
use kubetree::fetch::{ListPage, ResourceClient};
use kubetree::{Object, ResourceDescriptor};
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub fn resource(
    name: &str,
    singular: &str,
    kind: &str,
    short: &[&str],
    namespaced: bool,
) -> ServerResource {
    ServerResource {
        name: name.to_string(),
        singular_name: singular.to_string(),
        kind: kind.to_string(),
        short_names: short.iter().map(|s| s.to_string()).collect(),
        namespaced,
        verbs: vec!["get".to_string(), "list".to_string(), "watch".to_string()],
    }
}

/// A discovery document resembling a small cluster with a few CRDs
pub fn cluster_groups() -> Vec<ServerResourceGroup> {
    vec![
        ServerResourceGroup {
            group_version: "v1".to_string(),
            resources: vec![
                resource("pods", "pod", "Pod", &["po"], true),
                resource("services", "service", "Service", &["svc"], true),
                resource("configmaps", "configmap", "ConfigMap", &["cm"], true),
                resource("namespaces", "namespace", "Namespace", &["ns"], false),
                ServerResource {
                    verbs: vec!["create".to_string()],
                    ..resource("bindings", "binding", "Binding", &[], true)
                },
            ],
        },
        ServerResourceGroup {
            group_version: "apps/v1".to_string(),
            resources: vec![
                resource("deployments", "deployment", "Deployment", &["deploy"], true),
                resource("replicasets", "replicaset", "ReplicaSet", &["rs"], true),
                resource("deployments/scale", "", "Scale", &[], true),
            ],
        },
        ServerResourceGroup {
            group_version: "serving.knative.dev/v1".to_string(),
            resources: vec![resource("services", "service", "Service", &["ksvc"], true)],
        },
        ServerResourceGroup {
            group_version: "a.example.io/v1".to_string(),
            resources: vec![resource("widgets", "widget", "Widget", &[], true)],
        },
        ServerResourceGroup {
            group_version: "b.example.io/v1alpha1".to_string(),
            resources: vec![resource("widgets", "widget", "Widget", &[], true)],
        },
    ]
}

pub struct FakeDiscovery {
    pub groups: Vec<ServerResourceGroup>,
    pub failed: Vec<FailedGroup>,
    pub fail: bool,
}

impl FakeDiscovery {
    pub fn new(groups: Vec<ServerResourceGroup>) -> Self {
        Self {
            groups,
            failed: Vec::new(),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            groups: Vec::new(),
            failed: Vec::new(),
            fail: true,
        }
    }

    /// Report `group_version` as unreachable, the way an aggregated API is
    pub fn with_unavailable_group(mut self, group_version: &str) -> Self {
        self.failed.push(FailedGroup {
            group_version: group_version.to_string(),
            error: "the server is currently unable to handle the request".to_string(),
        });
        self
    }
}

#[async_trait]
impl DiscoveryService for FakeDiscovery {
    async fn server_preferred_resources(&self) -> Result<PreferredResources, BoxError> {
        if self.fail {
            return Err("the server is currently unable to handle the request".into());
        }
        Ok(PreferredResources {
            groups: self.groups.clone(),
            failed: self.failed.clone(),
        })
    }
}

/// Object documents keyed by `resource.version.group`
#[derive(Default)]
pub struct FakeCluster {
    objects: HashMap<String, Vec<Value>>,
    forbidden: HashSet<String>,
    broken: HashSet<String>,
    pub requests: Mutex<Vec<String>>,
}

impl FakeCluster {
    pub fn with(mut self, full_name: &str, docs: Vec<Value>) -> Self {
        self.objects.entry(full_name.to_string()).or_default().extend(docs);
        self
    }

    pub fn forbid(mut self, full_name: &str) -> Self {
        self.forbidden.insert(full_name.to_string());
        self
    }

    pub fn break_listing(mut self, full_name: &str) -> Self {
        self.broken.insert(full_name.to_string());
        self
    }

    fn docs<'a>(
        &'a self,
        resource: &ResourceDescriptor,
        namespace: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Value> + 'a {
        self.objects
            .get(&resource.full_name())
            .into_iter()
            .flatten()
            .filter(move |doc| match namespace {
                Some(ns) => doc["metadata"]["namespace"].as_str() == Some(ns),
                None => true,
            })
    }
}

#[async_trait]
impl ResourceClient for FakeCluster {
    async fn list_page(
        &self,
        resource: &ResourceDescriptor,
        namespace: Option<&str>,
        limit: u32,
        continue_token: &str,
    ) -> Result<ListPage, ListError> {
        let full_name = resource.full_name();
        self.requests.lock().unwrap().push(full_name.clone());
        if self.forbidden.contains(&full_name) {
            return Err(ListError::Forbidden(format!(
                "{} is forbidden: cannot list resource",
                resource.resource_name
            )));
        }
        if self.broken.contains(&full_name) {
            return Err(ListError::Other("connection refused".to_string()));
        }

        let offset: usize = if continue_token.is_empty() {
            0
        } else {
            continue_token.parse().unwrap()
        };
        let all: Vec<&Value> = self.docs(resource, namespace).collect();
        let end = (offset + limit as usize).min(all.len());
        let items = all[offset..end]
            .iter()
            .map(|doc| Object::from_value((*doc).clone()).with_kind(&resource.kind))
            .collect();
        let continue_token = if end < all.len() {
            end.to_string()
        } else {
            String::new()
        };
        Ok(ListPage {
            items,
            continue_token,
        })
    }

    async fn get(
        &self,
        resource: &ResourceDescriptor,
        namespace: Option<&str>,
        name: &str,
    ) -> Result<Object, ListError> {
        self.docs(resource, namespace)
            .find(|doc| doc["metadata"]["name"].as_str() == Some(name))
            .map(|doc| Object::from_value(doc.clone()).with_kind(&resource.kind))
            .ok_or_else(|| ListError::NotFound(format!("{} {:?} not found", resource.resource_name, name)))
    }
}

/// Object document without `kind`, as list items arrive
pub fn doc(uid: &str, namespace: &str, name: &str, owners: &[&str]) -> Value {
    let refs: Vec<Value> = owners
        .iter()
        .map(|o| json!({"apiVersion": "v1", "kind": "Owner", "name": o, "uid": o, "controller": true}))
        .collect();
    json!({
        "metadata": {
            "uid": uid,
            "namespace": namespace,
            "name": name,
            "ownerReferences": refs
        }
    })
}

pub fn with_conditions(mut doc: Value, conditions: Value) -> Value {
    doc["status"] = json!({ "conditions": conditions });
    doc
}

/// A deployment with two replica sets and pods in `prod`, plus a stray pod
/// in `other` owned by the first replica set
pub fn web_cluster() -> FakeCluster {
    FakeCluster::default()
        .with(
            "deployments.v1.apps",
            vec![with_conditions(
                doc("d1", "prod", "web", &[]),
                json!([{"type": "Available", "status": "True", "reason": "MinimumReplicasAvailable"}]),
            )],
        )
        .with(
            "replicasets.v1.apps",
            vec![
                doc("r2", "prod", "web-7f9", &["d1"]),
                doc("r1", "prod", "web-5d8", &["d1"]),
            ],
        )
        .with(
            "pods.v1.",
            vec![
                with_conditions(
                    doc("p2", "prod", "web-5d8-def", &["r1"]),
                    json!([{"type": "Ready", "status": "False", "reason": "ContainersNotReady"}]),
                ),
                with_conditions(
                    doc("p1", "prod", "web-5d8-abc", &["r1"]),
                    json!([{"type": "Ready", "status": "True"}]),
                ),
                doc("p3", "other", "stray", &["r1"]),
            ],
        )
        .with("services.v1.", vec![doc("s1", "prod", "web", &[])])
        .with("services.v1.serving.knative.dev", vec![doc("k1", "prod", "web", &[])])
        .with("configmaps.v1.", vec![doc("c1", "prod", "settings", &[])])
}
