//! In-memory page document.
//!
//! An arena of element and text nodes standing in for the browser DOM.
//! Replacing a subtree detaches the old nodes; detached ids stay valid for
//! lookups but are no longer reachable from the root, so element lookups
//! and event dispatch ignore them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index of a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// Declarative node tree used to build and replace document content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text(String),
    Element {
        tag: String,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
}

impl NodeSpec {
    pub fn element(tag: impl Into<String>) -> Self {
        NodeSpec::Element {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeSpec::Text(text.into())
    }

    /// Set an attribute (no-op on text nodes)
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let NodeSpec::Element { attrs, .. } = &mut self {
            attrs.insert(name.into(), value.into());
        }
        self
    }

    /// Append a class (no-op on text nodes)
    pub fn class(mut self, class: &str) -> Self {
        if let NodeSpec::Element { attrs, .. } = &mut self {
            let entry = attrs.entry("class".to_string()).or_default();
            if !entry.split_whitespace().any(|c| c == class) {
                if !entry.is_empty() {
                    entry.push(' ');
                }
                entry.push_str(class);
            }
        }
        self
    }

    /// Append a child (no-op on text nodes)
    pub fn child(mut self, child: NodeSpec) -> Self {
        if let NodeSpec::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn children(self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        children.into_iter().fold(self, NodeSpec::child)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    Element {
        tag: String,
        attrs: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed element tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Document {
    /// Build a document whose root is `body`
    pub fn new(body: &NodeSpec) -> Self {
        let mut doc = Document {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.build(body, None);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn build(&mut self, spec: &NodeSpec, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let kind = match spec {
            NodeSpec::Text(text) => NodeKind::Text(text.clone()),
            NodeSpec::Element { tag, attrs, .. } => NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
                attrs: attrs.clone(),
            },
        };
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        if let NodeSpec::Element { children, .. } = spec {
            for child in children {
                let child_id = self.build(child, Some(id));
                self.nodes[id.0].children.push(child_id);
            }
        }
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.node(id).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    /// Lowercase tag name, or None for text nodes
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match &self.node(id)?.kind {
            NodeKind::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            NodeKind::Text(_) => None,
        }
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(NodeKind::Element { attrs, .. }) = self.nodes.get_mut(id.0).map(|n| &mut n.kind)
        {
            attrs.insert(name.to_string(), value.into());
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.attr(id, "class")
            .map_or(false, |list| list.split_whitespace().any(|c| c == class))
    }

    /// Add or remove `class`; returns true when the class list changed
    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) -> bool {
        if self.has_class(id, class) == on || !self.is_element(id) {
            return false;
        }
        let current = self.attr(id, "class").unwrap_or_default();
        let mut classes: Vec<&str> = current.split_whitespace().filter(|c| *c != class).collect();
        if on {
            classes.push(class);
        }
        let updated = classes.join(" ");
        self.set_attr(id, "class", updated);
        true
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// Parents of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// True when `id` is reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).any(|a| a == self.root)
    }

    /// Descendants of `id` in document order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// The attached element with the given `id` attribute
    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .find(|&n| self.attr(n, "id") == Some(element_id))
    }

    /// Attached elements carrying `name`, in document order
    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants(self.root))
            .filter(|&n| self.attr(n, name).is_some())
            .collect()
    }

    /// Concatenated text of `id` and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        std::iter::once(id)
            .chain(self.descendants(id))
            .filter_map(|n| match &self.node(n)?.kind {
                NodeKind::Text(text) => Some(text.as_str()),
                NodeKind::Element { .. } => None,
            })
            .collect()
    }

    /// Replace the children of `id` with freshly built nodes
    pub fn replace_children(&mut self, id: NodeId, specs: &[NodeSpec]) -> Vec<NodeId> {
        if !self.is_element(id) {
            return Vec::new();
        }
        let old = std::mem::take(&mut self.nodes[id.0].children);
        for child in old {
            self.nodes[child.0].parent = None;
        }
        let mut built = Vec::with_capacity(specs.len());
        for spec in specs {
            let child = self.build(spec, Some(id));
            self.nodes[id.0].children.push(child);
            built.push(child);
        }
        built
    }

    /// Replace the children of `id` with a single text node
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        self.replace_children(id, &[NodeSpec::Text(text.into())]);
    }

    /// Serialize `id` and its subtree as HTML
    pub fn to_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_html(id, &mut out);
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape(text, false)),
            NodeKind::Element { tag, attrs } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value, true));
                    out.push('"');
                }
                out.push('>');
                for &child in &node.children {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape(text: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(
            &NodeSpec::element("body").children([
                NodeSpec::element("div")
                    .attr("id", "chooser")
                    .child(NodeSpec::text("old")),
                NodeSpec::element("main")
                    .attr("id", "main")
                    .child(NodeSpec::element("H2").child(NodeSpec::text("Intro")))
                    .child(
                        NodeSpec::element("p")
                            .class("note")
                            .child(NodeSpec::text("a < b")),
                    ),
            ]),
        )
    }

    #[test]
    fn test_element_lookup_and_tags() {
        let doc = sample();
        let main = doc.element_by_id("main").unwrap();
        let heading = doc.children(main)[0];
        assert_eq!(doc.tag(heading), Some("h2"));
        assert_eq!(doc.text_content(heading), "Intro");
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn test_set_class_reports_changes() {
        let mut doc = sample();
        let main = doc.element_by_id("main").unwrap();
        let para = doc.children(main)[1];

        assert!(doc.has_class(para, "note"));
        assert!(doc.set_class(para, "hidden", true));
        assert!(!doc.set_class(para, "hidden", true));
        assert_eq!(doc.attr(para, "class"), Some("note hidden"));
        assert!(doc.set_class(para, "hidden", false));
        assert_eq!(doc.attr(para, "class"), Some("note"));
    }

    #[test]
    fn test_replace_children_detaches_old_nodes() {
        let mut doc = sample();
        let chooser = doc.element_by_id("chooser").unwrap();
        let old = doc.children(chooser)[0];

        let built = doc.replace_children(
            chooser,
            &[NodeSpec::element("button").attr("id", "fresh")],
        );

        assert_eq!(built.len(), 1);
        assert!(!doc.is_attached(old));
        assert!(doc.is_attached(built[0]));
        assert_eq!(doc.element_by_id("fresh"), Some(built[0]));
    }

    #[test]
    fn test_to_html_escapes_text() {
        let doc = sample();
        let main = doc.element_by_id("main").unwrap();
        assert_eq!(
            doc.to_html(main),
            "<main id=\"main\"><h2>Intro</h2><p class=\"note\">a &lt; b</p></main>"
        );
    }

    #[test]
    fn test_node_spec_from_json() {
        let spec: NodeSpec = serde_json::from_str(
            r#"{ "tag": "div", "attrs": { "id": "x" }, "children": ["hello", { "tag": "b" }] }"#,
        )
        .unwrap();
        let doc = Document::new(&spec);
        assert_eq!(doc.to_html(doc.root()), "<div id=\"x\">hello<b></b></div>");
    }
}
