// ── Observed remote state ──

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use crate::connector::is_descriptor_shaped;
use crate::desired::ACTIVE_CONNECTORS_KEY;

/// The shared-scope attributes currently stored for one gateway.
///
/// Values are kept alongside keys so managed keys can be told apart from
/// unrelated attributes sharing the namespace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteAttributeSnapshot {
    attributes: BTreeMap<String, Value>,
}

impl RemoteAttributeSnapshot {
    pub fn new(attributes: BTreeMap<String, Value>) -> Self {
        Self { attributes }
    }

    /// A snapshot with no attributes (also the fallback when the read fails).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> BTreeSet<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Keys this system owns: `active_connectors` and descriptor-shaped values.
    pub fn managed_keys(&self) -> BTreeSet<&str> {
        self.attributes
            .iter()
            .filter(|(key, value)| key.as_str() == ACTIVE_CONNECTORS_KEY || is_descriptor_shaped(value))
            .map(|(key, _)| key.as_str())
            .collect()
    }
}

impl FromIterator<(String, Value)> for RemoteAttributeSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn managed_keys_skip_foreign_attributes() {
        let snapshot: RemoteAttributeSnapshot = [
            ("active_connectors".to_owned(), json!(["m1"])),
            ("m1".to_owned(), json!({ "name": "m1", "configurationJson": {} })),
            ("firmware".to_owned(), json!("1.2.3")),
            ("settings".to_owned(), json!({ "interval": 10 })),
        ]
        .into_iter()
        .collect();

        assert_eq!(snapshot.len(), 4);
        assert_eq!(
            snapshot.managed_keys(),
            BTreeSet::from(["active_connectors", "m1"])
        );
    }

    #[test]
    fn empty_snapshot_has_no_managed_keys() {
        let snapshot = RemoteAttributeSnapshot::empty();
        assert!(snapshot.is_empty());
        assert!(snapshot.managed_keys().is_empty());
        assert!(snapshot.keys().is_empty());
    }
}
