//! Preference schema types for page data deserialization.
//!
//! The page generator emits preference definitions, the option catalog and
//! named option sets as JSON. Option lists and defaults may be templates
//! containing `{pref_id}` placeholders that are filled from earlier
//! preferences' selections during resolution.

use serde::{Deserialize, Serialize};

use crate::core::types::{OptionId, PrefId};

/// One concrete option a preference can take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceOption {
    pub id: OptionId,
    /// Human-readable label shown in the chooser
    pub label: String,
    /// Text substituted into placeholders elsewhere on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl PreferenceOption {
    pub fn new(id: impl Into<OptionId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: None,
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Text shown by placeholders: the value, or the label when unset
    pub fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.label)
    }
}

/// Where a preference's options come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionSource {
    /// Inline list of option id templates (e.g. `["{os}-stable", "{os}-beta"]`)
    Inline(Vec<String>),
    /// Name template of a shared option set (e.g. `{ set = "{os}_packages" }`)
    Set { set: String },
}

impl OptionSource {
    /// Every template string in the source
    pub fn templates(&self) -> Vec<&str> {
        match self {
            OptionSource::Inline(ids) => ids.iter().map(String::as_str).collect(),
            OptionSource::Set { set } => vec![set.as_str()],
        }
    }
}

/// Complete preference definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDefinition {
    pub id: PrefId,
    /// Human-readable name; falls back to the id when empty
    #[serde(default)]
    pub label: String,
    /// Ordered options, possibly templated
    pub options: OptionSource,
    /// Default option id template
    pub default: String,
}

impl PreferenceDefinition {
    pub fn new(id: impl Into<PrefId>, options: OptionSource, default: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            options,
            default: default.into(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            self.id.as_str()
        } else {
            &self.label
        }
    }
}
