//! Core identifier types shared by the resolver, evaluator and page controller

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier of a preference (e.g. "os")
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct PrefId(pub String);

impl PrefId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrefId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a concrete preference option (e.g. "linux")
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct OptionId(pub String);

impl OptionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OptionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Opaque token correlating a condition with one content block on the page
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, From,
)]
#[serde(transparent)]
pub struct ContentRef(pub String);

impl ContentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ContentRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Preference id -> selected option id. Absent keys mean "use the default".
pub type SelectionState = BTreeMap<PrefId, OptionId>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_as_raw_string() {
        assert_eq!(PrefId::from("os").to_string(), "os");
        assert_eq!(OptionId::new("linux").to_string(), "linux");
        assert_eq!(ContentRef::from("block-1").as_str(), "block-1");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        let json = serde_json::to_string(&PrefId::from("os")).unwrap();
        assert_eq!(json, "\"os\"");

        let selection: SelectionState = serde_json::from_str(r#"{"os":"windows"}"#).unwrap();
        assert_eq!(
            selection.get(&PrefId::from("os")),
            Some(&OptionId::from("windows"))
        );
    }
}
