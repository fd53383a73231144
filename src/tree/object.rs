//! Point-in-time snapshot of a cluster object

use chrono::{DateTime, Utc};
use serde_json::Value;

/// An object fetched from the cluster
///
/// Only the metadata needed for indexing and rendering is extracted; the
/// full document is kept in `raw` for status extraction.
#[derive(Debug, Clone)]
pub struct Object {
    pub uid: String,
    pub kind: String,
    pub namespace: String,
    pub name: String,
    /// UIDs from `metadata.ownerReferences`; entries without a UID are dropped
    pub owner_uids: Vec<String>,
    pub creation_timestamp: Option<DateTime<Utc>>,
    pub raw: Value,
}

impl Object {
    /// Extract an object from its JSON representation
    ///
    /// Missing metadata fields default to empty values; an unparsable
    /// creation timestamp is treated as absent.
    pub fn from_value(raw: Value) -> Self {
        let metadata = raw.get("metadata");
        let meta_str = |key: &str| {
            metadata
                .and_then(|m| m.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string()
        };

        let owner_uids = metadata
            .and_then(|m| m.get("ownerReferences"))
            .and_then(|o| o.as_array())
            .map(|refs| {
                refs.iter()
                    .filter_map(|r| r.get("uid").and_then(|u| u.as_str()))
                    .filter(|uid| !uid.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let creation_timestamp = metadata
            .and_then(|m| m.get("creationTimestamp"))
            .and_then(|t| t.as_str())
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc));

        Self {
            uid: meta_str("uid"),
            kind: raw
                .get("kind")
                .and_then(|k| k.as_str())
                .unwrap_or_default()
                .to_string(),
            namespace: meta_str("namespace"),
            name: meta_str("name"),
            owner_uids,
            creation_timestamp,
            raw,
        }
    }

    /// Stamp the kind onto an object whose document omits it
    ///
    /// List responses carry the kind on the list, not on each item.
    pub fn with_kind(mut self, kind: &str) -> Self {
        if self.kind.is_empty() {
            self.kind = kind.to_string();
            if let Value::Object(map) = &mut self.raw {
                map.insert("kind".to_string(), Value::String(kind.to_string()));
            }
        }
        self
    }
}
