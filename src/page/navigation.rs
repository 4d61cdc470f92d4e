//! In-page navigation built from the visible headings.
//!
//! Nesting follows the raw heading levels relative to the previous visible
//! heading: a jump from h2 to h4 opens two lists, and a drop closes as many
//! lists as levels dropped, never past the outermost one.

use super::dom::{Document, NodeId, NodeSpec};
use crate::core::config::ControllerConfig;
use crate::core::error::{PrefsError, Result};

/// A visible heading in reading order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavList {
    pub entries: Vec<NavEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    Item {
        heading: Heading,
        children: Option<NavList>,
    },
    /// A nested list opened by a level jump with no heading of its own
    List(NavList),
}

impl NavList {
    fn attach(&mut self, nested: NavList) {
        match self.entries.last_mut() {
            Some(NavEntry::Item { children, .. }) if children.is_none() => {
                *children = Some(nested);
            }
            _ => self.entries.push(NavEntry::List(nested)),
        }
    }

    /// Number of headings in the outline
    pub fn item_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                NavEntry::Item { children, .. } => {
                    1 + children.as_ref().map_or(0, NavList::item_count)
                }
                NavEntry::List(list) => list.item_count(),
            })
            .sum()
    }

    /// Heading texts at the outermost level
    pub fn top_level_texts(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|entry| match entry {
                NavEntry::Item { heading, .. } => Some(heading.text.as_str()),
                NavEntry::List(_) => None,
            })
            .collect()
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_hidden(doc: &Document, node: NodeId, hidden_class: &str) -> bool {
    doc.has_class(node, hidden_class) || doc.ancestors(node).any(|a| doc.has_class(a, hidden_class))
}

/// Headings in the main content region that are not hidden
pub fn visible_headings(doc: &Document, config: &ControllerConfig) -> Result<Vec<Heading>> {
    let main = doc
        .element_by_id(&config.main_content_id)
        .ok_or_else(|| PrefsError::MissingElement {
            role: "main content",
            id: config.main_content_id.clone(),
        })?;

    Ok(doc
        .descendants(main)
        .into_iter()
        .filter_map(|node| {
            let level = heading_level(doc.tag(node)?)?;
            if is_hidden(doc, node, &config.hidden_class) {
                return None;
            }
            Some(Heading {
                level,
                text: doc.text_content(node).trim().to_string(),
                anchor: doc.attr(node, "id").map(str::to_string),
            })
        })
        .collect())
}

/// Nest headings by level
pub fn build_outline(headings: &[Heading]) -> NavList {
    let mut stack: Vec<NavList> = vec![NavList::default()];
    let mut previous: Option<u8> = None;

    for heading in headings {
        if let Some(level) = previous {
            if heading.level > level {
                for _ in level..heading.level {
                    stack.push(NavList::default());
                }
            } else {
                for _ in heading.level..level {
                    if stack.len() == 1 {
                        break;
                    }
                    close_list(&mut stack);
                }
            }
        }
        if let Some(top) = stack.last_mut() {
            top.entries.push(NavEntry::Item {
                heading: heading.clone(),
                children: None,
            });
        }
        previous = Some(heading.level);
    }

    while stack.len() > 1 {
        close_list(&mut stack);
    }
    stack.pop().unwrap_or_default()
}

fn close_list(stack: &mut Vec<NavList>) {
    if let Some(list) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.attach(list);
        }
    }
}

/// Markup for an outline
pub fn render_outline(outline: &NavList) -> NodeSpec {
    let items = outline.entries.iter().map(|entry| match entry {
        NavEntry::Item { heading, children } => {
            let link = match &heading.anchor {
                Some(anchor) => NodeSpec::element("a").attr("href", format!("#{}", anchor)),
                None => NodeSpec::element("span"),
            }
            .child(NodeSpec::text(heading.text.as_str()));
            let item = NodeSpec::element("li").child(link);
            match children {
                Some(nested) => item.child(render_outline(nested)),
                None => item,
            }
        }
        NavEntry::List(nested) => NodeSpec::element("li").child(render_outline(nested)),
    });
    NodeSpec::element("ul").children(items)
}

/// Rebuild the navigation container from the visible headings.
///
/// Returns the number of headings listed.
pub fn sync_navigation(doc: &mut Document, config: &ControllerConfig) -> Result<usize> {
    let container = doc
        .element_by_id(&config.nav_container_id)
        .ok_or_else(|| PrefsError::MissingElement {
            role: "navigation",
            id: config.nav_container_id.clone(),
        })?;

    let outline = build_outline(&visible_headings(doc, config)?);
    let markup = if outline.entries.is_empty() {
        Vec::new()
    } else {
        vec![render_outline(&outline)]
    };
    doc.replace_children(container, &markup);
    Ok(outline.item_count())
}
