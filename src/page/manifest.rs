//! Page data emitted by the documentation build.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::dom::NodeSpec;
use crate::core::error::Result;
use crate::core::types::{ContentRef, SelectionState};
use crate::preferences::{PreferenceDefinition, PreferenceOption};

/// Everything the controller needs to initialize a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageData {
    /// Preference definitions in resolution order
    pub preferences: Vec<PreferenceDefinition>,
    /// Every option any preference can offer
    #[serde(default)]
    pub options: Vec<PreferenceOption>,
    /// Named option sets referenced by `{ set = ... }` sources
    #[serde(default)]
    pub option_sets: BTreeMap<String, Vec<String>>,
    /// Initial selection; absent keys use defaults
    #[serde(default)]
    pub selection: SelectionState,
    /// Compact-encoded condition per content reference
    #[serde(default)]
    pub conditions: BTreeMap<ContentRef, serde_json::Value>,
}

/// A page's data together with its rendered body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageManifest {
    pub data: PageData,
    pub body: NodeSpec,
}

impl PageManifest {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a manifest from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}
