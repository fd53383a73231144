//! kubetree library
//!
//! Ownership trees of Kubernetes objects: resource discovery and kind
//! resolution, concurrent paginated listing, an owner → children index and
//! a table renderer with readiness and age columns. The `kubectl-tree`
//! binary is a thin wrapper around [`cli::run`].

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod kube;
pub mod status;
pub mod tree;

pub use discovery::{DiscoveryService, ResourceCatalog, ResourceDescriptor};
pub use error::{CatalogError, FetchErrors, ListError};
pub use fetch::{FetchOutcome, NamespaceScope, ResourceClient, fetch_all};
pub use tree::{Object, OwnershipIndex, TreeRenderer};
