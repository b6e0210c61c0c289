//! Reconciliation engine for ThingsBoard IoT gateway connectors.
//!
//! Given the files that changed in a configuration repository, the engine
//! works out which gateways were touched, rebuilds each gateway's desired
//! connector set from its local `connectors/` folder, and converges the
//! gateway device's shared attributes to match:
//!
//! - [`resolver`] maps changed paths to gateway names.
//! - [`loader`] and [`desired`] turn a folder into a [`GatewayDesiredState`].
//! - [`reconcile()`] diffs it against a [`RemoteAttributeSnapshot`].
//! - [`SyncOrchestrator`] runs the pipeline against a [`GatewayPlatform`].

pub mod config;
pub mod connector;
pub mod desired;
pub mod error;
pub mod loader;
pub mod orchestrator;
pub mod platform;
pub mod reconcile;
pub mod report;
pub mod resolver;
pub mod snapshot;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Credentials, SyncConfig, TlsVerification};
pub use connector::{ConnectorDescriptor, ConnectorType, classify};
pub use desired::{ACTIVE_CONNECTORS_KEY, GatewayDesiredState};
pub use error::{CoreError, WritePhase};
pub use loader::{LoadedConnectors, load_connectors};
pub use orchestrator::SyncOrchestrator;
pub use platform::{GatewayDevice, GatewayPlatform, ThingsBoardPlatform};
pub use reconcile::{PlanSummary, ReconciliationPlan, reconcile};
pub use report::{GatewayOutcome, GatewayReport, RejectedPath, SyncReport};
pub use resolver::{ChangeStatus, FileChange, GatewayBatch, gateway_of, resolve_gateways};
pub use snapshot::RemoteAttributeSnapshot;
