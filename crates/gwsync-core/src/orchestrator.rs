// ── Sync orchestration ──
//
// Drives one reconciliation pass per touched gateway: locate the local
// folder, load connectors, build desired state, resolve the device, read
// the snapshot, plan, then delete-then-upsert. Gateways are processed
// sequentially and independently.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{Instrument, error, info, info_span, warn};

use crate::desired::GatewayDesiredState;
use crate::error::CoreError;
use crate::loader::load_connectors;
use crate::platform::GatewayPlatform;
use crate::reconcile::reconcile;
use crate::report::{GatewayOutcome, GatewayReport, RejectedPath, SyncReport};
use crate::resolver::{FileChange, locate_gateway_dir, resolve_gateways};
use crate::snapshot::RemoteAttributeSnapshot;

pub struct SyncOrchestrator<P> {
    platform: P,
    config_root: PathBuf,
    dry_run: bool,
}

impl<P: GatewayPlatform> SyncOrchestrator<P> {
    pub fn new(platform: P, config_root: impl Into<PathBuf>) -> Self {
        Self {
            platform,
            config_root: config_root.into(),
            dry_run: false,
        }
    }

    /// Plan only; skip both remote write phases.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn config_root(&self) -> &Path {
        &self.config_root
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Resync every gateway touched by `changes`.
    pub async fn run(&self, changes: &[FileChange]) -> SyncReport {
        let started_at = Utc::now();
        let batch = resolve_gateways(changes);

        let rejected_paths = batch
            .rejected
            .iter()
            .map(|err| match err {
                CoreError::PathShape { path, reason } => RejectedPath {
                    path: path.display().to_string(),
                    reason: (*reason).to_owned(),
                },
                other => RejectedPath {
                    path: String::new(),
                    reason: other.to_string(),
                },
            })
            .collect();

        info!(
            changes = changes.len(),
            gateways = batch.gateways.len(),
            dry_run = self.dry_run,
            "starting sync"
        );

        let mut gateways = Vec::with_capacity(batch.gateways.len());
        for gateway in batch.gateways {
            let outcome = self
                .sync_gateway(&gateway)
                .instrument(info_span!("gateway", name = %gateway))
                .await;
            gateways.push(GatewayReport { gateway, outcome });
        }

        SyncReport {
            started_at,
            finished_at: Utc::now(),
            rejected_paths,
            gateways,
        }
    }

    /// Converge one gateway. Never fails: problems end up in the outcome.
    pub async fn sync_gateway(&self, gateway: &str) -> GatewayOutcome {
        let Some(gateway_dir) = locate_gateway_dir(&self.config_root, gateway) else {
            let err = CoreError::GatewayDirNotFound {
                gateway: gateway.to_owned(),
                root: self.config_root.clone(),
            };
            warn!("{err}; skipping");
            return GatewayOutcome::Skipped {
                reason: err.to_string(),
            };
        };

        let loaded = load_connectors(&gateway_dir);
        let warnings: Vec<String> = loaded.warnings.iter().map(ToString::to_string).collect();
        let desired = GatewayDesiredState::from_connectors(loaded.connectors);
        info!(
            dir = %gateway_dir.display(),
            connectors = desired.active_connectors().len(),
            skipped_files = warnings.len(),
            "loaded local definitions"
        );

        let device = match self.platform.resolve_device_id(gateway).await {
            Ok(device) => device,
            Err(err @ CoreError::GatewayNotFound { .. }) => {
                warn!("{err}; skipping");
                return GatewayOutcome::Skipped {
                    reason: err.to_string(),
                };
            }
            Err(err) => {
                error!("{err}");
                return GatewayOutcome::Failed {
                    errors: vec![err.to_string()],
                    warnings,
                };
            }
        };

        let observed = match self.platform.fetch_attributes(&device).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!("{err}; treating remote state as empty");
                RemoteAttributeSnapshot::empty()
            }
        };

        let plan = reconcile(&desired, &observed);

        if self.dry_run {
            let summary = plan.summarize(&observed);
            info!(
                create = summary.created.len(),
                update = summary.updated.len(),
                delete = summary.deleted.len(),
                "dry run, nothing written"
            );
            return GatewayOutcome::Planned { summary, warnings };
        }

        let mut errors = Vec::new();

        if plan.has_deletions() {
            match self
                .platform
                .delete_attributes(&device, &plan.keys_to_delete)
                .await
            {
                Ok(()) => info!(keys = ?plan.keys_to_delete, "deleted obsolete attributes"),
                Err(err) => {
                    error!("{err}");
                    errors.push(err.to_string());
                }
            }
        }

        match self
            .platform
            .upsert_attributes(&device, &plan.attributes_to_write)
            .await
        {
            Ok(()) => info!(
                keys = plan.attributes_to_write.len(),
                "wrote shared attributes"
            ),
            Err(err) => {
                error!("{err}");
                errors.push(err.to_string());
            }
        }

        if errors.is_empty() {
            GatewayOutcome::Synced {
                deleted: plan.keys_to_delete.into_iter().collect(),
                written: plan.attributes_to_write.keys().cloned().collect(),
                warnings,
            }
        } else {
            GatewayOutcome::Failed { errors, warnings }
        }
    }
}
