use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::warn;

use crate::style::{StyleDeclarations, default_display, default_value, parse_style_attribute};

/// Handle of one element node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(NodeId);

/// Identity of one listener attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

impl ListenerId {
    /// Generate a new unique listener ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Mutable HTML element tree with style and listener side tables.
///
/// Structure and selector matching come from `scraper`; everything the
/// toolkit mutates (inline styles, listeners, focus) lives in side tables
/// keyed by node id. Removed nodes stay in the arena but are marked dead so
/// their handles stop resolving.
pub struct Document {
    html: Html,
    inline_styles: HashMap<NodeId, StyleDeclarations>,
    natural_sizes: HashMap<NodeId, (f64, f64)>,
    listeners: HashMap<NodeId, Vec<(String, ListenerId)>>,
    removed: HashSet<NodeId>,
    focused: Option<NodeId>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.html.tree.root().descendants().count())
            .field("styled", &self.inline_styles.len())
            .field("listeners", &self.total_listener_count())
            .field("removed", &self.removed.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::parse("")
    }
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!(selector, error = ?err, "invalid selector");
            None
        }
    }
}

impl Document {
    /// Parse a full HTML document.
    pub fn parse(html: &str) -> Self {
        let mut document = Self {
            html: Html::parse_document(html),
            inline_styles: HashMap::new(),
            natural_sizes: HashMap::new(),
            listeners: HashMap::new(),
            removed: HashSet::new(),
            focused: None,
        };
        let root = document.html.tree.root().id();
        document.index_inline_styles(root);
        document
    }

    fn index_inline_styles(&mut self, root: NodeId) {
        let Some(node) = self.html.tree.get(root) else {
            return;
        };
        let parsed: Vec<(NodeId, StyleDeclarations)> = node
            .descendants()
            .filter_map(|n| {
                let style = n.value().as_element()?.attr("style")?;
                Some((n.id(), parse_style_attribute(style)))
            })
            .collect();
        self.inline_styles.extend(parsed);
    }

    fn element_ref(&self, element: ElementId) -> Option<ElementRef<'_>> {
        if self.removed.contains(&element.0) {
            return None;
        }
        self.html.tree.get(element.0).and_then(ElementRef::wrap)
    }

    /// The `<html>` element.
    pub fn root(&self) -> ElementId {
        ElementId(self.html.root_element().id())
    }

    pub fn body(&self) -> Option<ElementId> {
        self.query_one("body")
    }

    /// True when the handle names a live element, attached or not.
    pub fn exists(&self, element: ElementId) -> bool {
        self.element_ref(element).is_some()
    }

    /// True when the element is reachable from the document root.
    pub fn is_connected(&self, element: ElementId) -> bool {
        let Some(node) = self.element_ref(element) else {
            return false;
        };
        let root = self.html.tree.root().id();
        node.ancestors().any(|ancestor| ancestor.id() == root)
    }

    pub fn query_one(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// All matching elements in document order, starting at `<html>`.
    pub fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        let root = self.html.root_element();
        let mut found = Vec::new();
        if selector.matches(&root) {
            found.push(ElementId(root.id()));
        }
        found.extend(root.select(&selector).map(|el| ElementId(el.id())));
        found
    }

    /// Matching descendants of `scope`, excluding `scope` itself.
    pub fn query_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        let Some(scope) = self.element_ref(scope) else {
            return Vec::new();
        };
        let Some(selector) = parse_selector(selector) else {
            return Vec::new();
        };
        scope
            .select(&selector)
            .map(|el| ElementId(el.id()))
            .collect()
    }

    pub fn matches(&self, element: ElementId, selector: &str) -> bool {
        let Some(el) = self.element_ref(element) else {
            return false;
        };
        parse_selector(selector).is_some_and(|selector| selector.matches(&el))
    }

    /// Nearest inclusive ancestor matching `selector`.
    pub fn closest(&self, element: ElementId, selector: &str) -> Option<ElementId> {
        let el = self.element_ref(element)?;
        let selector = parse_selector(selector)?;
        std::iter::once(*el)
            .chain(el.ancestors())
            .filter_map(ElementRef::wrap)
            .find(|candidate| selector.matches(candidate))
            .map(|candidate| ElementId(candidate.id()))
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        let el = self.element_ref(element)?;
        el.parent()
            .filter(|parent| parent.value().is_element())
            .map(|parent| ElementId(parent.id()))
    }

    /// Element children in document order; text and comment nodes are skipped.
    pub fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.element_ref(element)
            .map(|el| {
                el.children()
                    .filter(|child| child.value().is_element())
                    .map(|child| ElementId(child.id()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Element descendants in document order, excluding `element`.
    pub fn descendants(&self, element: ElementId) -> Vec<ElementId> {
        self.element_ref(element)
            .map(|el| {
                el.descendants()
                    .skip(1)
                    .filter(|node| node.value().is_element())
                    .map(|node| ElementId(node.id()))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn tag_name(&self, element: ElementId) -> Option<&str> {
        self.element_ref(element).map(|el| el.value().name())
    }

    pub fn attr(&self, element: ElementId, name: &str) -> Option<&str> {
        self.element_ref(element)?.value().attr(name)
    }

    pub fn text(&self, element: ElementId) -> String {
        self.element_ref(element)
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    // ========================================================================
    // Styles
    // ========================================================================

    pub fn inline_style(&self, element: ElementId, name: &str) -> Option<&str> {
        self.inline_styles.get(&element.0)?.get(name.trim())
    }

    /// Computed value of a style property, `""` for dead handles.
    pub fn computed_style(&self, element: ElementId, name: &str) -> String {
        let name = name.trim();
        let Some(el) = self.element_ref(element) else {
            return String::new();
        };
        if let Some(value) = self.inline_style(element, name) {
            return value.to_string();
        }
        let display = self.display_of(el);
        if name == "display" {
            return display;
        }
        let natural = self
            .natural_sizes
            .get(&element.0)
            .copied()
            .unwrap_or((0.0, 0.0));
        default_value(name, display != "none", natural)
    }

    fn display_of(&self, el: ElementRef<'_>) -> String {
        match self.inline_style(ElementId(el.id()), "display") {
            Some(display) => display.to_string(),
            None => default_display(el.value().name(), el.value().attr("hidden").is_some())
                .to_string(),
        }
    }

    /// Write an inline declaration; an empty value clears it.
    pub fn set_style(&mut self, element: ElementId, name: &str, value: &str) {
        if !self.exists(element) {
            return;
        }
        let styles = self.inline_styles.entry(element.0).or_default();
        styles.set(name, value);
        if styles.is_empty() {
            self.inline_styles.remove(&element.0);
        }
    }

    /// Size the element reports for `width`/`height` when displayed and not
    /// sized inline. The document has no layout engine, so hosts provide it.
    pub fn set_natural_size(&mut self, element: ElementId, width: f64, height: f64) {
        if self.exists(element) {
            self.natural_sizes.insert(element.0, (width, height));
        }
    }

    // ========================================================================
    // Tree mutation
    // ========================================================================

    /// Create a detached element from a markup fragment. Only the first
    /// top-level element of the fragment is kept.
    pub fn create_element(&mut self, markup: &str) -> Option<ElementId> {
        let fragment = Html::parse_fragment(markup);
        let source = fragment
            .root_element()
            .children()
            .find(|child| child.value().is_element())?;
        let id = self.import_subtree(source);
        self.index_inline_styles(id);
        Some(ElementId(id))
    }

    fn import_subtree(&mut self, source: NodeRef<'_, Node>) -> NodeId {
        let id = self.html.tree.orphan(source.value().clone()).id();
        self.import_children(source, id);
        id
    }

    fn import_children(&mut self, source: NodeRef<'_, Node>, parent: NodeId) {
        for child in source.children() {
            let child_id = match self.html.tree.get_mut(parent) {
                Some(mut node) => node.append(child.value().clone()).id(),
                None => return,
            };
            self.import_children(child, child_id);
        }
    }

    /// Append `child` as the last child of `parent`, detaching it from its
    /// current position first. Refuses to create a cycle.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) -> bool {
        if !self.exists(parent) || !self.exists(child) || self.is_inclusive_ancestor(child, parent)
        {
            return false;
        }
        match self.html.tree.get_mut(parent.0) {
            Some(mut node) => {
                node.append_id(child.0);
                true
            }
            None => false,
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: ElementId, node: ElementId) -> bool {
        self.html.tree.get(node.0).is_some_and(|n| {
            n.id() == ancestor.0 || n.ancestors().any(|a| a.id() == ancestor.0)
        })
    }

    /// Detach an element from its parent, keeping it alive.
    pub fn detach(&mut self, element: ElementId) {
        if !self.exists(element) {
            return;
        }
        if let Some(mut node) = self.html.tree.get_mut(element.0) {
            node.detach();
        }
    }

    /// Detach an element and kill its handle and every descendant handle,
    /// dropping their side-table entries.
    pub fn remove_element(&mut self, element: ElementId) {
        if !self.exists(element) {
            return;
        }
        let mut subtree = self.descendants(element);
        subtree.push(element);
        self.detach(element);
        for id in subtree {
            self.inline_styles.remove(&id.0);
            self.natural_sizes.remove(&id.0);
            self.listeners.remove(&id.0);
            if self.focused == Some(id.0) {
                self.focused = None;
            }
            self.removed.insert(id.0);
        }
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Attach a listener. Attaching the same listener twice for the same
    /// event is ignored, as in the DOM.
    pub fn add_listener(&mut self, element: ElementId, event: &str, listener: ListenerId) -> bool {
        if !self.exists(element) {
            return false;
        }
        let entries = self.listeners.entry(element.0).or_default();
        if entries
            .iter()
            .any(|(name, id)| name == event && *id == listener)
        {
            return false;
        }
        entries.push((event.to_string(), listener));
        true
    }

    pub fn remove_listener(&mut self, element: ElementId, event: &str, listener: ListenerId) -> bool {
        let Some(entries) = self.listeners.get_mut(&element.0) else {
            return false;
        };
        let Some(pos) = entries
            .iter()
            .position(|(name, id)| name == event && *id == listener)
        else {
            return false;
        };
        entries.remove(pos);
        if entries.is_empty() {
            self.listeners.remove(&element.0);
        }
        true
    }

    /// Listeners for `event` in attachment order.
    pub fn listeners(&self, element: ElementId, event: &str) -> Vec<ListenerId> {
        self.listeners
            .get(&element.0)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(name, _)| name == event)
                    .map(|(_, id)| *id)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_listener(&self, element: ElementId, event: &str, listener: ListenerId) -> bool {
        self.listeners.get(&element.0).is_some_and(|entries| {
            entries
                .iter()
                .any(|(name, id)| name == event && *id == listener)
        })
    }

    pub fn listener_count(&self, element: ElementId) -> usize {
        self.listeners.get(&element.0).map_or(0, Vec::len)
    }

    pub fn total_listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Target first, then its element ancestors when the event bubbles.
    pub fn propagation_path(&self, target: ElementId, bubbles: bool) -> Vec<ElementId> {
        let Some(el) = self.element_ref(target) else {
            return Vec::new();
        };
        let mut path = vec![target];
        if bubbles {
            path.extend(
                el.ancestors()
                    .filter(|node| node.value().is_element())
                    .map(|node| ElementId(node.id())),
            );
        }
        path
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus(&mut self, element: ElementId) {
        if self.exists(element) {
            self.focused = Some(element.0);
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused.map(ElementId)
    }
}
