// ── Sync run report ──

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::reconcile::PlanSummary;

/// Result of one gateway pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GatewayOutcome {
    /// Plan applied.
    Synced {
        deleted: Vec<String>,
        written: Vec<String>,
        warnings: Vec<String>,
    },
    /// Dry run: plan computed, nothing written.
    Planned {
        summary: PlanSummary,
        warnings: Vec<String>,
    },
    /// Gateway intentionally left alone.
    Skipped { reason: String },
    /// At least one remote write phase failed.
    Failed {
        errors: Vec<String>,
        warnings: Vec<String>,
    },
}

impl GatewayOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Synced { .. } => "synced",
            Self::Planned { .. } => "planned",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Synced { warnings, .. }
            | Self::Planned { warnings, .. }
            | Self::Failed { warnings, .. } => warnings,
            Self::Skipped { .. } => &[],
        }
    }
}

/// One gateway's line in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GatewayReport {
    pub gateway: String,
    #[serde(flatten)]
    pub outcome: GatewayOutcome,
}

/// A change entry that named no gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedPath {
    pub path: String,
    pub reason: String,
}

/// Everything that happened during one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rejected_paths: Vec<RejectedPath>,
    pub gateways: Vec<GatewayReport>,
}

impl SyncReport {
    pub fn failed_count(&self) -> usize {
        self.gateways.iter().filter(|g| g.outcome.is_failure()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed_count() > 0
    }

    pub fn gateway(&self, name: &str) -> Option<&GatewayOutcome> {
        self.gateways
            .iter()
            .find(|g| g.gateway == name)
            .map(|g| &g.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn outcome_serializes_with_status_tag() {
        let report = GatewayReport {
            gateway: "gw1".into(),
            outcome: GatewayOutcome::Skipped {
                reason: "not registered".into(),
            },
        };
        assert_eq!(
            serde_json::to_value(&report).expect("serializable"),
            json!({ "gateway": "gw1", "status": "skipped", "reason": "not registered" })
        );
    }

    #[test]
    fn failures_are_counted() {
        let now = Utc::now();
        let report = SyncReport {
            started_at: now,
            finished_at: now,
            rejected_paths: Vec::new(),
            gateways: vec![
                GatewayReport {
                    gateway: "a".into(),
                    outcome: GatewayOutcome::Failed {
                        errors: vec!["boom".into()],
                        warnings: Vec::new(),
                    },
                },
                GatewayReport {
                    gateway: "b".into(),
                    outcome: GatewayOutcome::Skipped {
                        reason: "missing".into(),
                    },
                },
            ],
        };
        assert_eq!(report.failed_count(), 1);
        assert!(report.has_failures());
        assert_eq!(report.gateway("b").map(GatewayOutcome::label), Some("skipped"));
        assert!(report.gateway("c").is_none());
    }
}
