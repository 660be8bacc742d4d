// Document model - the element tree the augmenter operates on
//
// A small arena-backed tree: nodes live in a Vec and reference each other
// by NodeId. The host builds the tree (see the page module), hands it to
// the augmenter, and the TUI renders it. Detached nodes stay in the arena
// but are unreachable from the root, so document-order queries never see
// them.

use std::fmt;

/// Handle to a node in a `Document`. Only valid for the document that
/// created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Inline positioning mode, mirroring the handful of CSS position values
/// the augmenter cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Default flow layout. Elements with no inline position compute to this.
    #[default]
    Static,
    /// Positioned context - overlaid children are placed against this element
    Relative,
    /// Removed from flow entirely (used for off-screen staging elements)
    Fixed,
}

/// A single node: either an element or a run of text.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Text(String),
}

/// Element data: tag, classes, attributes, inline style, children.
#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    /// Inline position style. `None` means no inline position was set and
    /// the computed position falls back to `Position::Static`.
    pub position: Option<Position>,
    /// Inline horizontal offset in pixels (used to park staging elements
    /// off-screen). `None` means no offset.
    pub left_px: Option<i32>,
    pub children: Vec<NodeId>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            classes: Vec::new(),
            attrs: Vec::new(),
            position: None,
            left_px: None,
            children: Vec::new(),
        }
    }
}

/// The document: an arena of nodes plus a root element and an optional
/// selection.
///
/// The selection models "select the full contents of one element" - all the
/// legacy copy path needs. There is no multi-range selection.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    selection: Option<NodeId>,
}

impl Document {
    /// Create an empty document with a `body` root element.
    pub fn new() -> Self {
        let mut nodes = Vec::new();
        nodes.push(Node::Element(Element::new("body")));
        Self {
            nodes,
            root: NodeId(0),
            selection: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // ── Node creation and structure ─────────────────────────────────────

    /// Create a detached element. Attach it with `append_child`.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::Element(Element::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(Node::Text(text.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`. `parent` must be an
    /// element; appending to a text node is a caller bug.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.nodes[parent.0] {
            Node::Element(el) => el.children.push(child),
            Node::Text(_) => unreachable!("text nodes cannot have children"),
        }
    }

    /// Detach `child` from `parent`. The node stays in the arena but is no
    /// longer reachable from the root. Clears the selection if it pointed
    /// into the removed subtree.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Node::Element(el) = &mut self.nodes[parent.0] {
            el.children.retain(|&c| c != child);
        }
        if let Some(sel) = self.selection {
            if sel == child || self.is_descendant_of(sel, child) {
                self.selection = None;
            }
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0] {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0] {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0] {
            Node::Element(el) => &el.children,
            Node::Text(_) => &[],
        }
    }

    // ── Classes and attributes ──────────────────────────────────────────

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        if let Some(el) = self.element_mut(id) {
            el.classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .map(|el| el.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(id) {
            if let Some(pair) = el.attrs.iter_mut().find(|(n, _)| n == name) {
                pair.1 = value.to_string();
            } else {
                el.attrs.push((name.to_string(), value.to_string()));
            }
        }
    }

    #[allow(dead_code)]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?
            .attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    // ── Inline style ────────────────────────────────────────────────────

    /// Computed position: the inline position if set, otherwise static.
    pub fn computed_position(&self, id: NodeId) -> Position {
        self.element(id)
            .and_then(|el| el.position)
            .unwrap_or_default()
    }

    pub fn set_position(&mut self, id: NodeId, position: Position) {
        if let Some(el) = self.element_mut(id) {
            el.position = Some(position);
        }
    }

    pub fn set_left_px(&mut self, id: NodeId, left: i32) {
        if let Some(el) = self.element_mut(id) {
            el.left_px = Some(left);
        }
    }

    /// Whether an element is parked off-screen: fixed-position with a
    /// negative horizontal offset. Renderers skip these.
    pub fn is_offscreen(&self, id: NodeId) -> bool {
        self.element(id)
            .map(|el| el.position == Some(Position::Fixed) && el.left_px.unwrap_or(0) < 0)
            .unwrap_or(false)
    }

    // ── Document-order queries (from the root; detached nodes excluded) ─

    /// All elements with the given tag, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.walk(self.root, &mut |doc, id| {
            if doc.tag(id) == Some(tag) {
                out.push(id);
            }
        });
        out
    }

    /// First descendant of `id` (excluding `id` itself) with the given tag.
    pub fn descendant_by_tag(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.find_descendant(id, &|doc, n| doc.tag(n) == Some(tag))
    }

    /// First descendant of `id` (excluding `id` itself) carrying the class.
    pub fn descendant_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.find_descendant(id, &|doc, n| doc.has_class(n, class))
    }

    fn find_descendant(
        &self,
        id: NodeId,
        pred: &dyn Fn(&Document, NodeId) -> bool,
    ) -> Option<NodeId> {
        for &child in self.children(id) {
            if pred(self, child) {
                return Some(child);
            }
            if let Some(found) = self.find_descendant(child, pred) {
                return Some(found);
            }
        }
        None
    }

    fn walk(&self, id: NodeId, visit: &mut dyn FnMut(&Document, NodeId)) {
        visit(self, id);
        for &child in self.children(id) {
            self.walk(child, visit);
        }
    }

    fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.find_descendant(ancestor, &|_, n| n == id).is_some()
    }

    // ── Text ────────────────────────────────────────────────────────────

    /// The visible text of a subtree: every descendant text node
    /// concatenated in document order. Markup contributes nothing - an
    /// `em` element wrapping the word "value" yields exactly `value`.
    pub fn visible_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0] {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                for &child in &el.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Replace an element's children with a single text node. Used for
    /// control labels.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        let text_node = self.create_text(text);
        if let Some(el) = self.element_mut(id) {
            el.children.clear();
            el.children.push(text_node);
        }
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Select the full contents of an element.
    pub fn select_contents(&mut self, id: NodeId) {
        self.selection = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Text covered by the current selection, if any.
    pub fn selected_text(&self) -> Option<String> {
        self.selection.map(|id| self.visible_text(id))
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("selection", &self.selection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre_with_code(doc: &mut Document, code_text: &str) -> (NodeId, NodeId) {
        let pre = doc.create_element("pre");
        let code = doc.create_element("code");
        let text = doc.create_text(code_text);
        doc.append_child(code, text);
        doc.append_child(pre, code);
        let root = doc.root();
        doc.append_child(root, pre);
        (pre, code)
    }

    #[test]
    fn visible_text_excludes_markup() {
        let mut doc = Document::new();
        let (_, code) = pre_with_code(&mut doc, "let x = ");
        // <code>let x = <em>value</em>;</code>
        let em = doc.create_element("em");
        let em_text = doc.create_text("value");
        doc.append_child(em, em_text);
        doc.append_child(code, em);
        let tail = doc.create_text(";");
        doc.append_child(code, tail);

        assert_eq!(doc.visible_text(code), "let x = value;");
    }

    #[test]
    fn elements_by_tag_is_document_order() {
        let mut doc = Document::new();
        let (first, _) = pre_with_code(&mut doc, "a");
        let (second, _) = pre_with_code(&mut doc, "b");
        assert_eq!(doc.elements_by_tag("pre"), vec![first, second]);
    }

    #[test]
    fn detached_nodes_are_invisible_to_queries() {
        let mut doc = Document::new();
        let (pre, _) = pre_with_code(&mut doc, "a");
        let root = doc.root();
        doc.remove_child(root, pre);
        assert!(doc.elements_by_tag("pre").is_empty());
        assert!(doc.elements_by_tag("code").is_empty());
    }

    #[test]
    fn removing_selected_subtree_clears_selection() {
        let mut doc = Document::new();
        let (pre, code) = pre_with_code(&mut doc, "a");
        doc.select_contents(code);
        assert_eq!(doc.selected_text().as_deref(), Some("a"));
        let root = doc.root();
        doc.remove_child(root, pre);
        assert!(doc.selected_text().is_none());
    }

    #[test]
    fn computed_position_defaults_to_static() {
        let mut doc = Document::new();
        let (pre, _) = pre_with_code(&mut doc, "a");
        assert_eq!(doc.computed_position(pre), Position::Static);
        doc.set_position(pre, Position::Relative);
        assert_eq!(doc.computed_position(pre), Position::Relative);
    }

    #[test]
    fn offscreen_detection_requires_fixed_and_negative_offset() {
        let mut doc = Document::new();
        let el = doc.create_element("textarea");
        assert!(!doc.is_offscreen(el));
        doc.set_position(el, Position::Fixed);
        assert!(!doc.is_offscreen(el));
        doc.set_left_px(el, -9999);
        assert!(doc.is_offscreen(el));
    }

    #[test]
    fn set_text_replaces_children() {
        let mut doc = Document::new();
        let btn = doc.create_element("button");
        doc.set_text(btn, "Copy");
        assert_eq!(doc.visible_text(btn), "Copy");
        doc.set_text(btn, "Copied!");
        assert_eq!(doc.visible_text(btn), "Copied!");
        assert_eq!(doc.children(btn).len(), 1);
    }
}
