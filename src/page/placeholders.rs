//! Placeholder elements mirror a preference's selected option.

use super::dom::Document;
use crate::core::config::ControllerConfig;
use crate::core::error::{PrefsError, Result};
use crate::core::types::{PrefId, SelectionState};
use crate::preferences::OptionCatalog;

/// Write each placeholder's text from the current selection.
///
/// Returns the number of placeholders whose text changed.
pub fn sync_placeholders(
    doc: &mut Document,
    config: &ControllerConfig,
    catalog: &OptionCatalog,
    selection: &SelectionState,
) -> Result<usize> {
    let mut updated = 0;
    for node in doc.elements_with_attr(&config.placeholder_attr) {
        let pref = PrefId::new(doc.attr(node, &config.placeholder_attr).unwrap_or_default());
        let selected = selection
            .get(&pref)
            .ok_or_else(|| PrefsError::UnknownPreference(pref.clone()))?;
        let text = catalog
            .get(selected)
            .map_or(selected.as_str(), |o| o.display_value())
            .to_string();
        if doc.text_content(node) != text {
            doc.set_text(node, text);
            updated += 1;
        }
    }
    Ok(updated)
}
