//! Readiness extraction from status conditions
//!
//! Status blocks are free-form: any level may be missing or hold an
//! unexpected type. Navigation goes through [`Field`], which makes every
//! step an explicit match instead of a chain of type assertions. Absence is
//! normal and never an error.

mod compute;

pub use compute::{ConditionStatusComputer, StatusComputer, Verdict};

use serde_json::Value;

use crate::tree::Object;

/// Result of one navigation step into a JSON document
#[derive(Debug, PartialEq)]
pub enum Field<'a, T: ?Sized = Value> {
    Absent,
    WrongShape,
    Present(&'a T),
}

impl<T: ?Sized> Clone for Field<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Field<'_, T> {}

impl<'a> Field<'a> {
    pub fn root(value: &'a Value) -> Self {
        Field::Present(value)
    }

    /// Step into a key of an object
    pub fn key(self, name: &str) -> Field<'a> {
        match self {
            Field::Present(Value::Object(map)) => match map.get(name) {
                Some(v) => Field::Present(v),
                None => Field::Absent,
            },
            Field::Present(_) | Field::WrongShape => Field::WrongShape,
            Field::Absent => Field::Absent,
        }
    }

    pub fn array(self) -> Field<'a, Vec<Value>> {
        match self {
            Field::Present(Value::Array(items)) => Field::Present(items),
            Field::Present(_) | Field::WrongShape => Field::WrongShape,
            Field::Absent => Field::Absent,
        }
    }

    pub fn str(self) -> Field<'a, str> {
        match self {
            Field::Present(Value::String(s)) => Field::Present(s.as_str()),
            Field::Present(_) | Field::WrongShape => Field::WrongShape,
            Field::Absent => Field::Absent,
        }
    }
}

impl<'a, T: ?Sized> Field<'a, T> {
    pub fn present(self) -> Option<&'a T> {
        match self {
            Field::Present(v) => Some(v),
            _ => None,
        }
    }
}

/// Ready column extracted from a matching condition
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectStatus {
    /// `True`, `False`, `Unknown` or empty
    pub ready: String,
    pub reason: String,
    pub verdict: Option<Verdict>,
}

/// Find the first condition whose type matches a candidate, in candidate order
///
/// Returns the empty status when `status`, `status.conditions` or any
/// condition entry is missing or malformed, or when no candidate matches.
pub fn extract(
    obj: &Object,
    condition_types: &[String],
    computer: &dyn StatusComputer,
) -> ObjectStatus {
    tracing::trace!(
        kind = %obj.kind,
        name = %obj.name,
        status = ?obj.raw.get("status"),
        "extracting status"
    );

    let conditions = match Field::root(&obj.raw).key("status").key("conditions").array() {
        Field::Present(c) => c,
        Field::Absent => return ObjectStatus::default(),
        Field::WrongShape => {
            tracing::debug!(kind = %obj.kind, name = %obj.name, "conditions have unexpected shape");
            return ObjectStatus::default();
        }
    };

    let mut typed = Vec::with_capacity(conditions.len());
    for cond in conditions {
        match Field::root(cond).key("type").str() {
            Field::Present(t) => typed.push((t, cond)),
            Field::Absent | Field::WrongShape => {
                tracing::debug!(kind = %obj.kind, name = %obj.name, "malformed condition entry");
                return ObjectStatus::default();
            }
        }
    }

    for wanted in condition_types {
        if let Some((_, cond)) = typed.iter().find(|(t, _)| *t == wanted.as_str()) {
            let text = |key: &str| {
                Field::root(cond)
                    .key(key)
                    .str()
                    .present()
                    .unwrap_or_default()
                    .to_string()
            };
            let verdict = match computer.compute(obj) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::debug!(kind = %obj.kind, name = %obj.name, error = %e, "no status verdict");
                    None
                }
            };
            return ObjectStatus {
                ready: text("status"),
                reason: text("reason"),
                verdict,
            };
        }
    }

    ObjectStatus::default()
}
