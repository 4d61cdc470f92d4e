//! Option catalog: every option definition and named option set on a page.

use ahash::AHashMap;
use std::collections::BTreeMap;

use super::schema::PreferenceOption;
use crate::core::types::OptionId;

/// Lookup table for option definitions and option sets
#[derive(Debug, Clone, Default)]
pub struct OptionCatalog {
    /// Options indexed by id
    options: AHashMap<OptionId, PreferenceOption>,
    /// Named, ordered option lists (entries may be templates)
    sets: AHashMap<String, Vec<String>>,
}

impl OptionCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from page data
    pub fn from_parts(
        options: impl IntoIterator<Item = PreferenceOption>,
        sets: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let mut catalog = Self::new();
        for option in options {
            catalog.register(option);
        }
        for (name, ids) in sets {
            catalog.register_set(name, ids);
        }
        catalog
    }

    /// Register an option, replacing any previous definition with the same id
    pub fn register(&mut self, option: PreferenceOption) {
        self.options.insert(option.id.clone(), option);
    }

    /// Register a named option set
    pub fn register_set(&mut self, name: impl Into<String>, ids: Vec<String>) {
        self.sets.insert(name.into(), ids);
    }

    pub fn get(&self, id: &OptionId) -> Option<&PreferenceOption> {
        self.options.get(id)
    }

    pub fn contains(&self, id: &OptionId) -> bool {
        self.options.contains_key(id)
    }

    /// Ordered entries of a named set
    pub fn option_set(&self, name: &str) -> Option<&[String]> {
        self.sets.get(name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut sets = BTreeMap::new();
        sets.insert(
            "linux_packages".to_string(),
            vec!["deb".to_string(), "rpm".to_string()],
        );
        let catalog = OptionCatalog::from_parts(
            vec![
                PreferenceOption::new("deb", "Debian package"),
                PreferenceOption::new("rpm", "RPM package"),
            ],
            sets,
        );

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.get(&OptionId::from("deb")).map(|o| o.label.as_str()),
            Some("Debian package")
        );
        assert!(!catalog.contains(&OptionId::from("msi")));
        assert_eq!(
            catalog.option_set("linux_packages"),
            Some(&["deb".to_string(), "rpm".to_string()][..])
        );
        assert!(catalog.option_set("windows_packages").is_none());
    }
}
