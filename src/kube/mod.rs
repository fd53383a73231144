//! Kubernetes client module
//!
//! Connects to the API server and works out, once per run, which namespace
//! the target lives in and which namespaces get listed.

use anyhow::{Context, Result};
use kube::config::KubeConfigOptions;
use kube::{Client, Config};

use crate::fetch::NamespaceScope;

/// Namespace used when neither flags nor kubeconfig name one
pub const FALLBACK_NAMESPACE: &str = "default";

/// A connected client plus the namespace its context selects
pub struct Connection {
    pub client: Client,
    pub default_namespace: String,
}

/// Initialize a Kubernetes client
///
/// Without an explicit context the default loading strategy applies:
/// 1. KUBECONFIG environment variable
/// 2. ~/.kube/config
/// 3. In-cluster config (if running in a pod)
pub async fn connect(context: Option<&str>) -> Result<Connection> {
    let config = match context {
        Some(ctx) => Config::from_kubeconfig(&KubeConfigOptions {
            context: Some(ctx.to_string()),
            ..Default::default()
        })
        .await
        .with_context(|| format!("Failed to load kubeconfig context {:?}", ctx))?,
        None => Config::infer()
            .await
            .context("Failed to infer Kubernetes configuration")?,
    };

    let default_namespace = if config.default_namespace.is_empty() {
        FALLBACK_NAMESPACE.to_string()
    } else {
        config.default_namespace.clone()
    };
    tracing::debug!(
        cluster = %config.cluster_url,
        namespace = %default_namespace,
        "loaded kubernetes config"
    );

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(Connection {
        client,
        default_namespace,
    })
}

/// Where the target object is fetched from and what gets listed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    pub target: String,
    pub scope: NamespaceScope,
}

/// Resolve namespaces from flags and the kubeconfig default
///
/// `explicit` is the namespace named on the command line, either through
/// `NAMESPACE/NAME` or `--namespace`.
pub fn resolve_namespaces(
    all_namespaces: bool,
    explicit: Option<&str>,
    default_namespace: &str,
) -> Namespaces {
    let target = explicit
        .filter(|ns| !ns.is_empty())
        .unwrap_or(default_namespace)
        .to_string();
    let scope = if all_namespaces {
        NamespaceScope::All
    } else {
        NamespaceScope::Namespace(target.clone())
    };
    Namespaces { target, scope }
}
