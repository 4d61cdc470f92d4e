//! Cascading preference resolution.
//!
//! Definitions are resolved in declared order. Each preference's option
//! list is interpolated against the selections already resolved for the
//! preferences before it, so a change upstream can invalidate a selection
//! downstream; invalid selections fall back to the default.

use super::catalog::OptionCatalog;
use super::schema::{OptionSource, PreferenceDefinition};
use super::template::interpolate;
use crate::core::error::{PrefsError, Result};
use crate::core::types::{OptionId, PrefId, SelectionState};

/// A preference with its concrete options for the current selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPreference {
    pub id: PrefId,
    pub label: String,
    /// Concrete options, in declared order
    pub options: Vec<OptionId>,
    /// Always a member of `options`
    pub selected: OptionId,
    /// Interpolated default for this selection
    pub default: OptionId,
}

impl ResolvedPreference {
    pub fn is_default(&self) -> bool {
        self.selected == self.default
    }
}

/// Resolve every preference against a candidate selection
pub fn resolve(
    definitions: &[PreferenceDefinition],
    catalog: &OptionCatalog,
    selection: &SelectionState,
) -> Result<Vec<ResolvedPreference>> {
    let mut resolved_so_far = SelectionState::new();
    let mut resolved = Vec::with_capacity(definitions.len());

    for def in definitions {
        let options = concrete_options(def, catalog, &resolved_so_far)?;
        if options.is_empty() {
            return Err(PrefsError::EmptyOptions(def.id.clone()));
        }
        for option in &options {
            if !catalog.contains(option) {
                return Err(PrefsError::UnknownOption {
                    pref: def.id.clone(),
                    option: option.clone(),
                });
            }
        }

        let default = OptionId::new(interpolate(&def.id, &def.default, &resolved_so_far)?);
        if !options.contains(&default) {
            return Err(PrefsError::DefaultNotOffered {
                pref: def.id.clone(),
                default,
            });
        }

        let selected = match selection.get(&def.id) {
            Some(candidate) if options.contains(candidate) => candidate.clone(),
            Some(candidate) => {
                tracing::debug!(
                    "Corrected {} from {} to default {}",
                    def.id,
                    candidate,
                    default
                );
                default.clone()
            }
            None => default.clone(),
        };

        resolved_so_far.insert(def.id.clone(), selected.clone());
        resolved.push(ResolvedPreference {
            id: def.id.clone(),
            label: def.display_label().to_string(),
            options,
            selected,
            default,
        });
    }

    Ok(resolved)
}

/// The selection a resolution settled on, one entry per preference
pub fn resolved_selection(resolved: &[ResolvedPreference]) -> SelectionState {
    resolved
        .iter()
        .map(|p| (p.id.clone(), p.selected.clone()))
        .collect()
}

fn concrete_options(
    def: &PreferenceDefinition,
    catalog: &OptionCatalog,
    resolved: &SelectionState,
) -> Result<Vec<OptionId>> {
    let templates: Vec<String> = match &def.options {
        OptionSource::Inline(ids) => ids.clone(),
        OptionSource::Set { set } => {
            let name = interpolate(&def.id, set, resolved)?;
            match catalog.option_set(&name) {
                Some(ids) => ids.to_vec(),
                None => {
                    tracing::debug!("Option set {} for {} does not exist", name, def.id);
                    Vec::new()
                }
            }
        }
    };

    let mut options = Vec::with_capacity(templates.len());
    for template in &templates {
        let id = OptionId::new(interpolate(&def.id, template, resolved)?);
        if !options.contains(&id) {
            options.push(id);
        }
    }
    Ok(options)
}
