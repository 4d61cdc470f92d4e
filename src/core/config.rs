//! Page controller configuration
//!
//! Every element id, attribute name and class name the controller relies on
//! is collected here. The defaults match the markup emitted by the page
//! generator; overrides can be loaded from TOML.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::Result;

/// Names the controller uses to find and mark up elements on the page
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // === CONTAINERS ===
    /// Id of the element whose children are replaced by the chooser markup
    pub chooser_container_id: String,

    /// Id of the element whose children are replaced by the navigation list
    pub nav_container_id: String,

    /// Id of the region scanned for headings when building navigation
    pub main_content_id: String,

    // === ATTRIBUTES ===
    /// Attribute tagging a content block with its content reference
    pub content_ref_attr: String,

    /// Attribute carrying the preference id on option controls
    pub pref_attr: String,

    /// Attribute carrying the option id on option controls
    pub option_attr: String,

    /// Attribute naming the preference whose value an element mirrors
    pub placeholder_attr: String,

    // === CLASSES ===
    /// Class toggled on content blocks whose condition is false
    pub hidden_class: String,

    /// Class marking the selected option control
    pub selected_class: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            chooser_container_id: "pref-chooser".to_string(),
            nav_container_id: "page-toc".to_string(),
            main_content_id: "main-content".to_string(),

            content_ref_attr: "data-content-ref".to_string(),
            pref_attr: "data-pref-id".to_string(),
            option_attr: "data-option-id".to_string(),
            placeholder_attr: "data-pref-placeholder".to_string(),

            hidden_class: "hidden".to_string(),
            selected_class: "selected".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let ids = [
            &self.chooser_container_id,
            &self.nav_container_id,
            &self.main_content_id,
        ];
        if ids.iter().any(|id| id.is_empty()) {
            return Err("Container ids must not be empty".into());
        }

        let attrs = [
            ("content_ref_attr", &self.content_ref_attr),
            ("pref_attr", &self.pref_attr),
            ("option_attr", &self.option_attr),
            ("placeholder_attr", &self.placeholder_attr),
        ];
        for (i, (name, attr)) in attrs.iter().enumerate() {
            if attr.is_empty() {
                return Err(format!("{} must not be empty", name));
            }
            if let Some((other, _)) = attrs[i + 1..].iter().find(|(_, a)| a == attr) {
                return Err(format!(
                    "{} and {} must differ (both are {})",
                    name, other, attr
                ));
            }
        }

        if self.hidden_class.is_empty() || self.selected_class.is_empty() {
            return Err("Class names must not be empty".into());
        }

        if self.hidden_class == self.selected_class {
            return Err(format!(
                "hidden_class and selected_class must differ (both are {})",
                self.hidden_class
            ));
        }

        Ok(())
    }
}
