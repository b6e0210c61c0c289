// ── Change-path to gateway resolution ──
//
// A changed connector file `.../<gateway>/connectors/<name>.<ext>` belongs
// to `<gateway>`. Change status is carried for logging only: every touched
// gateway is resynced in full.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::CoreError;

/// Git name-status letter of a changed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    TypeChanged,
    Other(String),
}

impl ChangeStatus {
    /// Parse `A`, `M`, `D`, `R100`, `C75`, `T`; anything else is kept verbatim.
    pub fn parse(status: &str) -> Self {
        match status.chars().next().map(|c| c.to_ascii_uppercase()) {
            Some('A') => Self::Added,
            Some('M') => Self::Modified,
            Some('D') => Self::Deleted,
            Some('R') => Self::Renamed,
            Some('C') => Self::Copied,
            Some('T') => Self::TypeChanged,
            _ => Self::Other(status.to_owned()),
        }
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => f.write_str("added"),
            Self::Modified => f.write_str("modified"),
            Self::Deleted => f.write_str("deleted"),
            Self::Renamed => f.write_str("renamed"),
            Self::Copied => f.write_str("copied"),
            Self::TypeChanged => f.write_str("type-changed"),
            Self::Other(raw) => write!(f, "other({raw})"),
        }
    }
}

/// One entry of a change batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub status: ChangeStatus,
    pub path: PathBuf,
}

impl FileChange {
    pub fn new(status: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            status: ChangeStatus::parse(status),
            path: path.into(),
        }
    }
}

/// Gateways touched by a batch, plus the entries that named no gateway.
#[derive(Debug, Default)]
pub struct GatewayBatch {
    pub gateways: BTreeSet<String>,
    pub rejected: Vec<CoreError>,
}

/// The gateway owning a connector file: the directory two levels up.
pub fn gateway_of(path: &Path) -> Result<String, CoreError> {
    let shape_error = |reason| CoreError::PathShape {
        path: path.to_path_buf(),
        reason,
    };

    let connectors_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| shape_error("no parent directory"))?;
    let gateway_dir = connectors_dir
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| shape_error("no grandparent directory"))?;

    gateway_dir
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| shape_error("grandparent directory has no usable name"))
}

/// Deduplicate a change batch into the set of gateways to resync.
pub fn resolve_gateways<'a>(changes: impl IntoIterator<Item = &'a FileChange>) -> GatewayBatch {
    let mut batch = GatewayBatch::default();

    for change in changes {
        match gateway_of(&change.path) {
            Ok(gateway) => {
                debug!(
                    status = %change.status,
                    path = %change.path.display(),
                    gateway = %gateway,
                    "change touches gateway"
                );
                batch.gateways.insert(gateway);
            }
            Err(err) => {
                warn!("{err}");
                batch.rejected.push(err);
            }
        }
    }

    batch
}

/// Find the local definition folder of `gateway` below `root`.
///
/// `<root>/<gateway>` wins when it exists; otherwise the first directory
/// named `<gateway>` in a sorted recursive walk. Hidden directories are
/// not descended into.
pub fn locate_gateway_dir(root: &Path, gateway: &str) -> Option<PathBuf> {
    let direct = root.join(gateway);
    if direct.is_dir() {
        return Some(direct);
    }

    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry))
        .filter_map(Result::ok)
        .find(|entry| entry.file_type().is_dir() && entry.file_name() == gateway)
        .map(walkdir::DirEntry::into_path)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.') && s != "." && s != "..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn gateway_is_grandparent_directory() {
        let path = Path::new("infra/thingsboard-gateway/site-a/gw1/connectors/m1.json");
        assert_eq!(gateway_of(path).ok().as_deref(), Some("gw1"));
        assert_eq!(
            gateway_of(Path::new("gw2/connectors/b1.yaml")).ok().as_deref(),
            Some("gw2")
        );
    }

    #[test]
    fn shallow_paths_are_rejected() {
        for raw in ["m1.json", "connectors/m1.json", "/m1.json"] {
            let result = gateway_of(Path::new(raw));
            assert!(
                matches!(result, Err(CoreError::PathShape { .. })),
                "{raw} should be rejected, got {result:?}"
            );
        }
    }

    #[test]
    fn batch_deduplicates_and_ignores_status() {
        let changes = [
            FileChange::new("A", "repo/gw1/connectors/m1.json"),
            FileChange::new("M", "repo/gw1/connectors/b1.json"),
            FileChange::new("D", "repo/gw2/connectors/old.json"),
            FileChange::new("R100", "repo/gw1/connectors/renamed.json"),
            FileChange::new("M", "README.md"),
        ];

        let batch = resolve_gateways(&changes);
        assert_eq!(
            batch.gateways,
            BTreeSet::from(["gw1".to_owned(), "gw2".to_owned()])
        );
        assert_eq!(batch.rejected.len(), 1);
    }

    #[test]
    fn status_letters_parse() {
        assert_eq!(ChangeStatus::parse("A"), ChangeStatus::Added);
        assert_eq!(ChangeStatus::parse("m"), ChangeStatus::Modified);
        assert_eq!(ChangeStatus::parse("R087"), ChangeStatus::Renamed);
        assert_eq!(ChangeStatus::parse("X"), ChangeStatus::Other("X".into()));
        assert_eq!(ChangeStatus::parse(""), ChangeStatus::Other(String::new()));
    }

    #[test]
    fn locates_direct_and_nested_gateway_dirs() {
        let root = TempDir::new().expect("tempdir");
        fs::create_dir_all(root.path().join("gw-direct/connectors")).expect("mkdir");
        fs::create_dir_all(root.path().join("site-b/gw-nested/connectors")).expect("mkdir");
        fs::create_dir_all(root.path().join(".git/gw-hidden")).expect("mkdir");

        assert_eq!(
            locate_gateway_dir(root.path(), "gw-direct"),
            Some(root.path().join("gw-direct"))
        );
        assert_eq!(
            locate_gateway_dir(root.path(), "gw-nested"),
            Some(root.path().join("site-b/gw-nested"))
        );
        assert_eq!(locate_gateway_dir(root.path(), "gw-hidden"), None);
        assert_eq!(locate_gateway_dir(root.path(), "missing"), None);
    }
}
