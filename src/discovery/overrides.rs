//! Hardcoded lookup preferences for well-known ambiguous kinds

use super::{ResourceCatalog, ResourceDescriptor};

struct KindOverride {
    /// Lower-cased tokens this rule applies to
    tokens: &'static [&'static str],
    /// Qualified names tried in order; the first one present wins
    preferred: &'static [&'static str],
}

const OVERRIDES: &[KindOverride] = &[
    // Knative also registers "Service"; prefer core v1 Service
    KindOverride {
        tokens: &["svc", "service", "services"],
        preferred: &["service.v1."],
    },
    // Older clusters serve Deployment from both apps and extensions
    KindOverride {
        tokens: &["deploy", "deployment", "deployments"],
        preferred: &["deployment.v1.apps", "deployment.v1beta1.extensions"],
    },
];

/// Apply the override table to a kind token
pub(super) fn find_override<'a>(
    catalog: &'a ResourceCatalog,
    token: &str,
) -> Option<&'a ResourceDescriptor> {
    let token = token.to_lowercase();
    let rule = OVERRIDES
        .iter()
        .find(|rule| rule.tokens.contains(&token.as_str()))?;

    rule.preferred
        .iter()
        .find_map(|name| catalog.lookup(name).into_iter().next())
}
