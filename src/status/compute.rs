//! Coarse lifecycle verdicts

use serde_json::Value;
use std::fmt;

use super::Field;
use crate::error::StatusError;
use crate::tree::Object;

/// Lifecycle verdict for an object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Current,
    InProgress,
    Failed,
    Terminating,
    Unknown,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Current => "Current",
            Verdict::InProgress => "InProgress",
            Verdict::Failed => "Failed",
            Verdict::Terminating => "Terminating",
            Verdict::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Turns an object's status into a [`Verdict`]
///
/// An error means "no verdict"; callers never treat it as fatal.
pub trait StatusComputer: Send + Sync {
    fn compute(&self, obj: &Object) -> Result<Verdict, StatusError>;
}

/// Generic verdicts from metadata and the standard condition types
///
/// Checks, in order: deletion in progress, an unobserved generation,
/// `Stalled`, `Reconciling` and finally `Ready`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConditionStatusComputer;

impl StatusComputer for ConditionStatusComputer {
    fn compute(&self, obj: &Object) -> Result<Verdict, StatusError> {
        let root = Field::root(&obj.raw);

        if root.key("metadata").key("deletionTimestamp").present().is_some() {
            return Ok(Verdict::Terminating);
        }

        let generation = root.key("metadata").key("generation").present().and_then(Value::as_i64);
        let observed = root
            .key("status")
            .key("observedGeneration")
            .present()
            .and_then(Value::as_i64);
        if let (Some(generation), Some(observed)) = (generation, observed) {
            if observed < generation {
                return Ok(Verdict::InProgress);
            }
        }

        let conditions = match root.key("status").key("conditions").array() {
            Field::Present(c) => c,
            Field::Absent => return Ok(Verdict::Current),
            Field::WrongShape => {
                return Err(StatusError::Malformed("status.conditions is not a list".to_string()));
            }
        };

        let condition = |wanted: &str| {
            conditions.iter().find_map(|c| {
                let cond = Field::root(c);
                (cond.key("type").str().present() == Some(wanted))
                    .then(|| cond.key("status").str().present().unwrap_or_default())
            })
        };

        if condition("Stalled") == Some("True") {
            return Ok(Verdict::Failed);
        }
        if condition("Reconciling") == Some("True") {
            return Ok(Verdict::InProgress);
        }
        Ok(match condition("Ready") {
            Some("False") => Verdict::InProgress,
            Some("Unknown") => Verdict::Unknown,
            _ => Verdict::Current,
        })
    }
}
