//! Ownership graph built from owner references

use std::collections::{HashMap, HashSet};

use super::Object;

/// Objects keyed by UID plus owner → children edges
///
/// Every child UID stored in `children` is a key of `by_uid`. Owners are not
/// required to be present: an owner outside the fetched scope simply has no
/// entry of its own.
#[derive(Debug, Default)]
pub struct OwnershipIndex {
    by_uid: HashMap<String, Object>,
    children: HashMap<String, HashSet<String>>,
}

impl OwnershipIndex {
    /// Index a fetched object set in a single pass
    ///
    /// An object with several owner references gets one edge per owner.
    pub fn build(objects: impl IntoIterator<Item = Object>) -> Self {
        let mut index = Self::default();
        for obj in objects {
            for owner in &obj.owner_uids {
                index
                    .children
                    .entry(owner.clone())
                    .or_default()
                    .insert(obj.uid.clone());
            }
            index.by_uid.insert(obj.uid.clone(), obj);
        }
        tracing::debug!(
            objects = index.by_uid.len(),
            owners = index.children.len(),
            "built ownership index"
        );
        index
    }

    pub fn get(&self, uid: &str) -> Option<&Object> {
        self.by_uid.get(uid)
    }

    /// Whether any indexed object lists `uid` as an owner
    pub fn has_children(&self, uid: &str) -> bool {
        self.children.get(uid).is_some_and(|c| !c.is_empty())
    }

    /// Objects owned by `uid`, sorted by kind, then name, then namespace
    pub fn children_of(&self, uid: &str) -> Vec<&Object> {
        let Some(child_ids) = self.children.get(uid) else {
            return Vec::new();
        };
        let mut out: Vec<&Object> = child_ids
            .iter()
            .filter_map(|id| self.by_uid.get(id))
            .collect();
        out.sort_by(|a, b| {
            a.kind
                .cmp(&b.kind)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.namespace.cmp(&b.namespace))
        });
        out
    }
}
