use scraper::{ElementRef, Html};
use std::collections::HashMap;

/// Index of a node inside its [`Tree`].
pub type NodeId = usize;

const ROOT: NodeId = 0;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Per-node presentation state (focus, scroll offsets, running
    /// transitions). Never part of the markup, never compared.
    transient: HashMap<String, String>,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Node {
            kind,
            parent,
            children: Vec::new(),
            transient: HashMap::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    pub fn tag_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(name),
            NodeKind::Text(_) => None,
        }
    }

    pub fn attributes(&self) -> &[(String, String)] {
        match &self.kind {
            NodeKind::Element { attrs, .. } => attrs,
            NodeKind::Text(_) => &[],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    pub fn transient(&self, key: &str) -> Option<&str> {
        self.transient.get(key).map(String::as_str)
    }
}

/// A rendered container and everything below it.
///
/// Nodes live in an arena. Nodes detached by [`Tree::set_text_content`] stay
/// in the arena (unreachable from the root) until [`Tree::clear`] empties the
/// container.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// An empty container element.
    pub fn new(container: &str) -> Self {
        let root = Node::new(
            NodeKind::Element {
                name: container.to_string(),
                attrs: Vec::new(),
            },
            None,
        );
        Tree { nodes: vec![root] }
    }

    /// Parse markup into a detached tree.
    pub fn parse_fragment(markup: &str) -> Self {
        let mut tree = Tree::new("#document-fragment");
        tree.append_markup(ROOT, markup);
        tree
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].children.first().copied()
    }

    /// Whether `id` can be reached from the container.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == ROOT {
                return true;
            }
            match self.nodes[current].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Concatenated text of `id` and all of its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for &child in &self.nodes[id].children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace everything below `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        if let NodeKind::Text(existing) = &mut self.nodes[id].kind {
            *existing = text.to_string();
            return;
        }

        // a lone text child is overwritten in place
        if let [only] = self.nodes[id].children[..] {
            if let NodeKind::Text(existing) = &mut self.nodes[only].kind {
                if text.is_empty() {
                    self.nodes[only].parent = None;
                    self.nodes[id].children.clear();
                } else {
                    *existing = text.to_string();
                }
                return;
            }
        }

        for child in std::mem::take(&mut self.nodes[id].children) {
            self.nodes[child].parent = None;
        }
        if !text.is_empty() {
            self.push(id, NodeKind::Text(text.to_string()));
        }
    }

    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        self.nodes[id].attributes()
    }

    /// Set (or overwrite) one attribute. No-op on text nodes.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.nodes[id].kind {
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_string(), value.to_string())),
            }
        }
    }

    pub fn set_transient(&mut self, id: NodeId, key: &str, value: &str) {
        self.nodes[id]
            .transient
            .insert(key.to_string(), value.to_string());
    }

    /// All elements below `id` in document order, `id` itself excluded.
    pub fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            if node.is_element() {
                out.push(current);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First element below `id` (document order) matching `predicate`.
    pub fn find_first(&self, id: NodeId, predicate: impl Fn(&Node) -> bool) -> Option<NodeId> {
        self.descendant_elements(id)
            .into_iter()
            .find(|&el| predicate(&self.nodes[el]))
    }

    /// Deep structural and textual equality of `id` and `other_id`.
    /// Attribute order does not matter; transient state is ignored.
    pub fn is_equal_node(&self, id: NodeId, other: &Tree, other_id: NodeId) -> bool {
        let a = &self.nodes[id];
        let b = &other.nodes[other_id];
        let same_node = match (&a.kind, &b.kind) {
            (NodeKind::Text(x), NodeKind::Text(y)) => x == y,
            (
                NodeKind::Element { name: n1, attrs: a1 },
                NodeKind::Element { name: n2, attrs: a2 },
            ) => n1 == n2 && same_attributes(a1, a2),
            _ => false,
        };
        same_node
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(&b.children)
                .all(|(&x, &y)| self.is_equal_node(x, other, y))
    }

    /// Whether both containers hold equal content, ignoring the containers themselves.
    pub fn content_equals(&self, other: &Tree) -> bool {
        let a = &self.nodes[ROOT].children;
        let b = &other.nodes[ROOT].children;
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(&x, &y)| self.is_equal_node(x, other, y))
    }

    /// Remove all content from the container. The container node itself,
    /// and its transient state, survive.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[ROOT].children.clear();
    }

    /// Parse `markup` and insert it as the first children of the container.
    pub fn insert_markup(&mut self, markup: &str) {
        let before = self.nodes[ROOT].children.len();
        self.append_markup(ROOT, markup);
        let added = self.nodes[ROOT].children.len() - before;
        self.nodes[ROOT].children.rotate_right(added);
    }

    fn append_markup(&mut self, parent: NodeId, markup: &str) {
        let fragment = Html::parse_fragment(markup);
        self.graft(parent, fragment.root_element());
    }

    fn graft(&mut self, parent: NodeId, source: ElementRef<'_>) {
        for child in source.children() {
            match child.value() {
                scraper::Node::Element(el) => {
                    let attrs = el
                        .attrs()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect();
                    let id = self.push(
                        parent,
                        NodeKind::Element {
                            name: el.name().to_string(),
                            attrs,
                        },
                    );
                    if let Some(element) = ElementRef::wrap(child) {
                        self.graft(id, element);
                    }
                }
                scraper::Node::Text(text) => {
                    self.push(parent, NodeKind::Text(String::from(&**text)));
                }
                // comments, doctypes and processing instructions are not rendered
                _ => {}
            }
        }
    }

    fn push(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node::new(kind, Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// Serialized content of the container.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        for &child in &self.nodes[ROOT].children {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        match &node.kind {
            NodeKind::Text(text) => out.push_str(&escape(text)),
            NodeKind::Element { name, attrs } => {
                out.push('<');
                out.push_str(name);
                for (k, v) in attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape(v));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&name.as_str()) {
                    return;
                }
                for &child in &node.children {
                    self.write_html(child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
        }
    }

    /// Non-blank text of the container, one trimmed line per text node.
    pub fn text_lines(&self) -> Vec<String> {
        let mut stack: Vec<NodeId> = self.nodes[ROOT].children.iter().rev().copied().collect();
        let mut lines = Vec::new();
        while let Some(current) = stack.pop() {
            let node = &self.nodes[current];
            if let NodeKind::Text(text) = &node.kind {
                let line = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !line.is_empty() {
                    lines.push(line);
                }
            }
            stack.extend(node.children.iter().rev().copied());
        }
        lines
    }
}

pub fn same_attributes(a: &[(String, String)], b: &[(String, String)]) -> bool {
    a.len() == b.len() && a.iter().all(|pair| b.contains(pair))
}

/// Escape text for element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
