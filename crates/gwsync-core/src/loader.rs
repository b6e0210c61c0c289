// ── Connector file loading ──
//
// Reads `<gateway>/connectors/*.{json,yaml,yml,toml}` into descriptors.
// One file per connector; the file stem is the connector name. Bad files
// are skipped and reported, never fatal for the gateway.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::connector::ConnectorDescriptor;
use crate::desired::ACTIVE_CONNECTORS_KEY;
use crate::error::CoreError;

/// Subdirectory of a gateway folder holding connector files.
pub const CONNECTORS_DIR: &str = "connectors";

/// Connector file formats, keyed by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileFormat {
    Json,
    Yaml,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    fn parse(self, text: &str) -> Result<Value, String> {
        match self {
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            Self::Toml => toml::from_str(text).map_err(|e| e.to_string()),
        }
    }
}

/// Result of loading one gateway's connector directory.
#[derive(Debug, Default)]
pub struct LoadedConnectors {
    /// Successfully parsed connectors, keyed by name.
    pub connectors: BTreeMap<String, ConnectorDescriptor>,
    /// Files that were skipped, with the reason.
    pub warnings: Vec<CoreError>,
}

/// Load every connector definition below `gateway_dir/connectors`.
///
/// A missing `connectors` directory yields an empty result. Unreadable or
/// malformed files are skipped with a warning; the remaining files still load.
pub fn load_connectors(gateway_dir: &Path) -> LoadedConnectors {
    let connectors_dir = gateway_dir.join(CONNECTORS_DIR);
    let mut loaded = LoadedConnectors::default();

    let entries = match fs::read_dir(&connectors_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(dir = %connectors_dir.display(), "no connectors folder");
            return loaded;
        }
        Err(e) => {
            warn!(dir = %connectors_dir.display(), error = %e, "cannot list connectors folder");
            loaded.warnings.push(CoreError::ConfigParse {
                path: connectors_dir,
                reason: e.to_string(),
            });
            return loaded;
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && !is_hidden(path))
        .filter(|path| FileFormat::from_path(path).is_some())
        .collect();
    files.sort();

    for path in files {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_owned) else {
            skip(&mut loaded, path, "file name is not valid UTF-8");
            continue;
        };

        if let Err(reason) = check_connector_name(&name) {
            skip(&mut loaded, path, reason);
            continue;
        }

        if loaded.connectors.contains_key(&name) {
            let err = CoreError::DuplicateConnector { name, path };
            warn!("{err}");
            loaded.warnings.push(err);
            continue;
        }

        match read_definition(&path) {
            Ok(configuration) => {
                let descriptor = ConnectorDescriptor::new(name.clone(), configuration);
                debug!(
                    connector = %name,
                    kind = %descriptor.connector_type,
                    file = %path.display(),
                    "loaded connector"
                );
                loaded.connectors.insert(name, descriptor);
            }
            Err(err) => {
                warn!("{err}");
                loaded.warnings.push(err);
            }
        }
    }

    loaded
}

fn skip(loaded: &mut LoadedConnectors, path: PathBuf, reason: &str) {
    let err = CoreError::ConfigParse {
        path,
        reason: reason.to_owned(),
    };
    warn!("{err}");
    loaded.warnings.push(err);
}

/// Connector names become attribute keys. The active list owns one key,
/// and deletes address keys through a comma-separated list.
fn check_connector_name(name: &str) -> Result<(), &'static str> {
    if name == ACTIVE_CONNECTORS_KEY {
        Err("connector name is reserved for the active connector list")
    } else if name.contains(',') {
        Err("connector name must not contain ','")
    } else {
        Ok(())
    }
}

fn read_definition(path: &Path) -> Result<Value, CoreError> {
    let format = FileFormat::from_path(path).ok_or_else(|| CoreError::ConfigParse {
        path: path.to_path_buf(),
        reason: "unsupported file extension".into(),
    })?;
    let text = fs::read_to_string(path).map_err(|e| CoreError::ConfigParse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    format.parse(&text).map_err(|reason| CoreError::ConfigParse {
        path: path.to_path_buf(),
        reason,
    })
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connector::ConnectorType;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;

    fn gateway_with(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().expect("tempdir");
        let connectors = dir.path().join(CONNECTORS_DIR);
        fs::create_dir_all(&connectors).expect("mkdir");
        for (name, body) in files {
            fs::write(connectors.join(name), body).expect("write");
        }
        dir
    }

    #[test]
    fn missing_connectors_dir_is_empty() {
        let dir = TempDir::new().expect("tempdir");
        let loaded = load_connectors(dir.path());
        assert!(loaded.connectors.is_empty());
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn builds_descriptors_from_files() {
        let dir = gateway_with(&[
            ("modbus-line-1.json", r#"{"master": {"slaves": []}}"#),
            ("bacnet-zone.yaml", "general:\n  objectName: TB\n"),
            ("sensor.toml", "host = \"10.0.0.9\"\nport = 502\n"),
        ]);

        let loaded = load_connectors(dir.path());
        assert!(loaded.warnings.is_empty());
        assert_eq!(
            loaded.connectors.keys().cloned().collect::<Vec<_>>(),
            vec!["bacnet-zone", "modbus-line-1", "sensor"]
        );

        let modbus = &loaded.connectors["modbus-line-1"];
        assert_eq!(modbus.connector_type, ConnectorType::Modbus);
        assert_eq!(modbus.configuration_json, json!({ "master": { "slaves": [] } }));

        let bacnet = &loaded.connectors["bacnet-zone"];
        assert_eq!(bacnet.connector_type, ConnectorType::Bacnet);
        assert_eq!(bacnet.configuration_json, json!({ "general": { "objectName": "TB" } }));

        let sensor = &loaded.connectors["sensor"];
        assert_eq!(sensor.connector_type, ConnectorType::Custom);
        assert_eq!(sensor.configuration_json, json!({ "host": "10.0.0.9", "port": 502 }));
    }

    #[test]
    fn malformed_file_is_skipped_and_reported() {
        let dir = gateway_with(&[
            ("broken.json", "{ not json"),
            ("modbus-ok.json", r#"{"ok": true}"#),
        ]);

        let loaded = load_connectors(dir.path());
        assert_eq!(
            loaded.connectors.keys().cloned().collect::<Vec<_>>(),
            vec!["modbus-ok"]
        );
        assert_eq!(loaded.warnings.len(), 1);
        assert!(matches!(
            &loaded.warnings[0],
            CoreError::ConfigParse { path, .. } if path.ends_with("broken.json")
        ));
    }

    #[test]
    fn ignores_foreign_and_hidden_files() {
        let dir = gateway_with(&[
            ("README.md", "# docs"),
            (".draft.json", "{}"),
            ("m1.json", "{}"),
        ]);
        fs::create_dir_all(dir.path().join(CONNECTORS_DIR).join("nested.json")).expect("mkdir");

        let loaded = load_connectors(dir.path());
        assert_eq!(
            loaded.connectors.keys().cloned().collect::<Vec<_>>(),
            vec!["m1"]
        );
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn reserved_and_comma_names_are_skipped_and_reported() {
        let dir = gateway_with(&[
            ("active_connectors.json", r#"{"slaves": []}"#),
            ("a,firmware.yaml", "host: 10.0.0.1\n"),
            ("m1.json", "{}"),
        ]);

        let loaded = load_connectors(dir.path());
        assert_eq!(
            loaded.connectors.keys().cloned().collect::<Vec<_>>(),
            vec!["m1"]
        );
        let skipped: Vec<&PathBuf> = loaded
            .warnings
            .iter()
            .filter_map(|w| match w {
                CoreError::ConfigParse { path, .. } => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(skipped.len(), 2);
        assert!(skipped[0].ends_with("a,firmware.yaml"));
        assert!(skipped[1].ends_with("active_connectors.json"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_file_name_is_reported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = gateway_with(&[("m1.json", "{}")]);
        let odd = dir
            .path()
            .join(CONNECTORS_DIR)
            .join(OsStr::from_bytes(b"modbus-\xff.json"));
        fs::write(&odd, "{}").expect("write");

        let loaded = load_connectors(dir.path());
        assert_eq!(
            loaded.connectors.keys().cloned().collect::<Vec<_>>(),
            vec!["m1"]
        );
        assert!(matches!(
            &loaded.warnings[..],
            [CoreError::ConfigParse { reason, .. }] if reason.contains("UTF-8")
        ));
    }

    #[test]
    fn duplicate_stems_keep_the_first_file() {
        let dir = gateway_with(&[("m1.json", r#"{"from": "json"}"#), ("m1.yaml", "from: yaml\n")]);

        let loaded = load_connectors(dir.path());
        assert_eq!(loaded.connectors.len(), 1);
        assert_eq!(loaded.connectors["m1"].configuration_json, json!({ "from": "json" }));
        assert!(matches!(
            &loaded.warnings[..],
            [CoreError::DuplicateConnector { name, .. }] if name == "m1"
        ));
    }
}
