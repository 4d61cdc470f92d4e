//! Chooser rendering and handler wiring.
//!
//! The chooser container is rebuilt from scratch on every change. Old
//! option controls are detached with the replaced markup, so the handler
//! table is rebuilt from the new controls each time.

use ahash::AHashMap;

use super::dom::{Document, NodeId, NodeSpec};
use crate::core::config::ControllerConfig;
use crate::core::error::{PrefsError, Result};
use crate::core::types::{OptionId, PrefId};
use crate::preferences::{OptionCatalog, ResolvedPreference};

/// The selection a click on an option control requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionHandler {
    pub pref: PrefId,
    pub option: OptionId,
}

/// Option controls currently wired for clicks
pub type HandlerTable = AHashMap<NodeId, OptionHandler>;

/// Build chooser markup for the resolved preferences
pub fn render_chooser(
    resolved: &[ResolvedPreference],
    catalog: &OptionCatalog,
    config: &ControllerConfig,
) -> Vec<NodeSpec> {
    resolved
        .iter()
        .map(|pref| {
            let label = NodeSpec::element("span")
                .class("pref-chooser__label")
                .child(NodeSpec::text(pref.label.as_str()));
            let controls = pref.options.iter().map(|option| {
                let text = catalog
                    .get(option)
                    .map_or(option.as_str(), |o| o.label.as_str());
                let control = NodeSpec::element("button")
                    .attr("type", "button")
                    .class("pref-chooser__option")
                    .attr(config.pref_attr.as_str(), pref.id.as_str())
                    .attr(config.option_attr.as_str(), option.as_str())
                    .child(NodeSpec::text(text));
                if *option == pref.selected {
                    control.class(&config.selected_class)
                } else {
                    control
                }
            });
            NodeSpec::element("div")
                .class("pref-chooser__group")
                .attr("data-pref-group", pref.id.as_str())
                .child(label)
                .children(controls)
        })
        .collect()
}

/// Replace the chooser container's markup and rewire its option controls
pub fn sync_chooser(
    doc: &mut Document,
    config: &ControllerConfig,
    catalog: &OptionCatalog,
    resolved: &[ResolvedPreference],
) -> Result<HandlerTable> {
    let container = doc
        .element_by_id(&config.chooser_container_id)
        .ok_or_else(|| PrefsError::MissingElement {
            role: "chooser",
            id: config.chooser_container_id.clone(),
        })?;

    let markup = render_chooser(resolved, catalog, config);
    doc.replace_children(container, &markup);
    Ok(wire_handlers(doc, config, container))
}

fn wire_handlers(doc: &Document, config: &ControllerConfig, container: NodeId) -> HandlerTable {
    let mut handlers = HandlerTable::new();
    for node in doc.descendants(container) {
        let pref = doc.attr(node, &config.pref_attr);
        let option = doc.attr(node, &config.option_attr);
        if let (Some(pref), Some(option)) = (pref, option) {
            tracing::trace!("Wired option control {}={}", pref, option);
            handlers.insert(
                node,
                OptionHandler {
                    pref: pref.into(),
                    option: option.into(),
                },
            );
        }
    }
    handlers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::PreferenceOption;
    use std::collections::BTreeMap;

    fn resolved_os(selected: &str) -> Vec<ResolvedPreference> {
        vec![ResolvedPreference {
            id: "os".into(),
            label: "Platform".to_string(),
            options: vec!["linux".into(), "windows".into()],
            selected: selected.into(),
            default: "linux".into(),
        }]
    }

    fn catalog() -> OptionCatalog {
        OptionCatalog::from_parts(
            vec![
                PreferenceOption::new("linux", "Linux"),
                PreferenceOption::new("windows", "Windows"),
            ],
            BTreeMap::new(),
        )
    }

    fn page() -> Document {
        Document::new(
            &NodeSpec::element("body")
                .child(NodeSpec::element("div").attr("id", "pref-chooser")),
        )
    }

    #[test]
    fn test_render_marks_selected_option() {
        let config = ControllerConfig::default();
        let mut doc = page();
        sync_chooser(&mut doc, &config, &catalog(), &resolved_os("windows")).unwrap();

        let container = doc.element_by_id("pref-chooser").unwrap();
        let html = doc.to_html(container);
        assert!(html.contains(
            "<button class=\"pref-chooser__option selected\" data-option-id=\"windows\" data-pref-id=\"os\" type=\"button\">Windows</button>"
        ));
        assert!(html.contains("<span class=\"pref-chooser__label\">Platform</span>"));
    }

    #[test]
    fn test_handlers_rewired_after_replacement() {
        let config = ControllerConfig::default();
        let mut doc = page();
        let first = sync_chooser(&mut doc, &config, &catalog(), &resolved_os("linux")).unwrap();
        let second = sync_chooser(&mut doc, &config, &catalog(), &resolved_os("windows")).unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        for node in first.keys() {
            assert!(!doc.is_attached(*node));
            assert!(!second.contains_key(node));
        }
        assert!(second
            .values()
            .any(|h| h.pref.as_str() == "os" && h.option.as_str() == "windows"));
    }

    #[test]
    fn test_missing_container_is_fatal() {
        let config = ControllerConfig::default();
        let mut doc = Document::new(&NodeSpec::element("body"));
        let err = sync_chooser(&mut doc, &config, &catalog(), &resolved_os("linux")).unwrap_err();
        assert!(matches!(err, PrefsError::MissingElement { role: "chooser", .. }));
    }
}
