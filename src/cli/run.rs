//! One invocation from parsed arguments to printed tree

use anyhow::{Context, Result};
use std::io::{IsTerminal, Write};
use std::sync::Arc;

use super::args::{Args, split_kind_name};
use crate::config::{Config, ConfigLoader, parse_condition_types};
use crate::discovery::{DiscoveryService, KubeDiscovery, MatchKind, ResourceCatalog};
use crate::fetch::{KubeResourceClient, ResourceClient, fetch_all};
use crate::kube::{Namespaces, connect, resolve_namespaces};
use crate::status::ConditionStatusComputer;
use crate::tree::{OwnershipIndex, TreeRenderer};

pub const NO_OWNED_RESOURCES: &str = "No resources are owned by this object through ownerReferences.";

/// The object to draw a tree for
#[derive(Debug, Clone)]
pub struct TreeRequest {
    pub kind: String,
    pub name: String,
    pub namespaces: Namespaces,
}

/// Output settings resolved from config, environment and flags
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub condition_types: Vec<String>,
    pub page_size: u32,
    pub best_effort: bool,
    pub color: bool,
}

impl RenderOptions {
    pub fn from_config(config: &Config, color: bool) -> Self {
        Self {
            condition_types: config.condition_types.clone(),
            page_size: config.page_size,
            best_effort: config.best_effort,
            color,
        }
    }
}

/// Layer command line flags over the loaded configuration
fn apply_flags(mut config: Config, args: &Args) -> Config {
    if let Some(types) = args.condition_types.as_deref() {
        let types = parse_condition_types(types);
        if !types.is_empty() {
            config.condition_types = types;
        }
    }
    if let Some(color) = args.color {
        config.color = color;
    }
    if args.best_effort {
        config.best_effort = true;
    }
    config
}

/// Entry point used by the binary once logging is set up
pub async fn run(args: Args) -> Result<()> {
    let target = split_kind_name(&args.args)?;
    tracing::debug!(kind = %target.kind, namespace = ?target.namespace, name = %target.name, "parsed target");

    let config = apply_flags(ConfigLoader::load(args.config.as_deref())?, &args);
    let color = config.color.enabled(std::io::stdout().is_terminal());
    let options = RenderOptions::from_config(&config, color);

    let connection = connect(args.context.as_deref()).await?;
    let explicit_ns = target.namespace.as_deref().or(args.namespace.as_deref());
    let namespaces = resolve_namespaces(
        args.all_namespaces,
        explicit_ns,
        &connection.default_namespace,
    );

    let discovery = KubeDiscovery::new(connection.client.clone());
    let client: Arc<dyn ResourceClient> = Arc::new(KubeResourceClient::new(connection.client));
    let request = TreeRequest {
        kind: target.kind,
        name: target.name,
        namespaces,
    };

    // Not locked: fetch tasks log to stderr from worker threads
    show_tree(
        &discovery,
        client,
        &request,
        &options,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    )
    .await
}

/// Resolve, fetch, index and print
///
/// The tree, or the "nothing owned" message, goes to `out`; diagnostics about
/// skipped resource types go to `diag`.
pub async fn show_tree(
    discovery: &dyn DiscoveryService,
    client: Arc<dyn ResourceClient>,
    request: &TreeRequest,
    options: &RenderOptions,
    out: &mut dyn Write,
    diag: &mut dyn Write,
) -> Result<()> {
    let catalog = ResourceCatalog::discover(discovery).await?;
    for failed in catalog.failed_groups() {
        writeln!(
            diag,
            "Warning: discovery of {} failed, its resource types are skipped: {}",
            failed.group_version, failed.error
        )?;
    }

    let resolved = catalog.resolve(&request.kind)?;
    let resource = resolved.descriptor;
    match resolved.matched {
        MatchKind::Override => {
            tracing::info!(kind = %request.kind, resource = %resource, "kind override found")
        }
        MatchKind::Unique => tracing::debug!(kind = %request.kind, resource = %resource, "kind resolved"),
    }

    let namespace = resource
        .namespaced
        .then_some(request.namespaces.target.as_str());
    let target = client
        .get(resource, namespace, &request.name)
        .await
        .with_context(|| format!("failed to get {}/{}", request.kind, request.name))?;
    tracing::trace!(uid = %target.uid, object = %target.raw, "target object");

    let outcome = fetch_all(
        Arc::clone(&client),
        catalog.resources(),
        &request.namespaces.scope,
        options.page_size,
    )
    .await;

    for resource in &outcome.forbidden {
        writeln!(diag, "Warning: listing {} is forbidden, skipping", resource)?;
    }
    if let Some(err) = outcome.error {
        if !options.best_effort {
            return Err(anyhow::Error::new(err).context("error while querying api objects"));
        }
        writeln!(diag, "Warning: some resources could not be listed:\n{}", err)?;
    }

    let index = OwnershipIndex::build(outcome.objects);
    if !index.has_children(&target.uid) {
        writeln!(out, "{}", NO_OWNED_RESOURCES)?;
        return Ok(());
    }

    let root = index.get(&target.uid).unwrap_or(&target);
    let computer = ConditionStatusComputer;
    let table = TreeRenderer::new(&index, &options.condition_types, &computer).render(root, options.color);
    out.write_all(table.as_bytes())?;
    out.flush()?;
    Ok(())
}
