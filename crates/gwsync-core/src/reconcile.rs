//! Desired-vs-observed diff for one gateway.
//!
//! [`reconcile`] is a pure function: no I/O, deterministic, testable
//! without a platform. The resulting [`ReconciliationPlan`] always writes
//! the full desired attribute set and deletes only managed keys that are
//! no longer declared locally.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::desired::GatewayDesiredState;
use crate::snapshot::RemoteAttributeSnapshot;

/// The operations that converge one gateway's shared attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPlan {
    /// Managed keys present remotely but no longer declared.
    pub keys_to_delete: BTreeSet<String>,
    /// `active_connectors` plus every declared connector descriptor.
    pub attributes_to_write: Map<String, Value>,
}

/// Compute the plan that makes `observed` match `desired`.
///
/// Only `active_connectors` and descriptor-shaped remote keys are deletion
/// candidates; unrelated shared attributes are never touched.
pub fn reconcile(
    desired: &GatewayDesiredState,
    observed: &RemoteAttributeSnapshot,
) -> ReconciliationPlan {
    let attributes_to_write = desired.attributes();
    let keys_to_delete = observed
        .managed_keys()
        .into_iter()
        .filter(|key| !attributes_to_write.contains_key(*key))
        .map(str::to_owned)
        .collect();

    ReconciliationPlan {
        keys_to_delete,
        attributes_to_write,
    }
}

impl ReconciliationPlan {
    pub fn has_deletions(&self) -> bool {
        !self.keys_to_delete.is_empty()
    }

    /// Classify each key of the plan against what is stored remotely.
    ///
    /// Informational only: the write payload is the same whatever the
    /// classification says.
    pub fn summarize(&self, observed: &RemoteAttributeSnapshot) -> PlanSummary {
        let mut summary = PlanSummary {
            deleted: self.keys_to_delete.iter().cloned().collect(),
            ..PlanSummary::default()
        };

        for (key, value) in &self.attributes_to_write {
            let bucket = match observed.get(key) {
                None => &mut summary.created,
                Some(remote) if values_match(value, remote) => &mut summary.unchanged,
                Some(_) => &mut summary.updated,
            };
            bucket.push(key.clone());
        }

        summary
    }
}

/// Per-key classification of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub deleted: Vec<String>,
}

impl PlanSummary {
    /// Whether applying the plan would change anything remotely.
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

// Attributes saved as text come back as JSON strings.
fn values_match(desired: &Value, remote: &Value) -> bool {
    if desired == remote {
        return true;
    }
    match remote {
        Value::String(text) if !desired.is_string() => {
            serde_json::from_str::<Value>(text).is_ok_and(|parsed| &parsed == desired)
        }
        _ => false,
    }
}
