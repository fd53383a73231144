//! Error taxonomy
//!
//! Typed errors raised by the catalog, fetcher and status layers. The binary
//! wraps these in `anyhow` with additional context before reporting them.

/// Boxed error used for failures coming from external collaborators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures while building or querying the resource catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to fetch api groups from kubernetes: {0}")]
    Discovery(#[source] BoxError),

    #[error("{0:?} cannot be parsed into groupversion")]
    InvalidGroupVersion(String),

    #[error("could not find api kind {0:?}")]
    UnknownKind(String),

    #[error(
        "ambiguous kind {kind:?}. use one of these as the KIND to disambiguate: [{}]",
        .candidates.join(", ")
    )]
    AmbiguousKind {
        kind: String,
        /// Fully qualified `resource.version.group` of every match
        candidates: Vec<String>,
    },
}

/// Failure of a single list or get request
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    /// The caller is not allowed to list this resource type
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl ListError {
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ListError::Forbidden(_))
    }
}

/// A list failure attributed to one resource type
#[derive(Debug, thiserror::Error)]
#[error("listing resources failed ({resource}): {source}")]
pub struct ResourceFetchError {
    pub resource: String,
    #[source]
    pub source: ListError,
}

/// Every non-forbidden failure collected during one fetch pass
#[derive(Debug, thiserror::Error)]
#[error("{}", join_failures(.0))]
pub struct FetchErrors(pub Vec<ResourceFetchError>);

impl FetchErrors {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join_failures(failures: &[ResourceFetchError]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// The status computation could not produce a verdict
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error("malformed status: {0}")]
    Malformed(String),
}

/// Invalid positional arguments
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ArgsError {
    #[error("accepts between 1 and 2 arg(s), received {0}")]
    Count(usize),

    #[error("specify the kubernetes object in KIND NAME or KIND/NAME form")]
    MissingName,

    #[error("arguments in KIND/NAME form may not have more than one slash")]
    TooManySlashes,

    #[error("object name in NAMESPACE/NAME form may not have more than one slash")]
    InvalidName,
}
