//! Selection inputs and resolved selections.

use uiq_dom::ElementId;

/// What a caller may select from, resolved once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionInput {
    /// CSS selector, or markup when the trimmed text starts with `<`.
    Selector(String),
    Handles(Vec<ElementId>),
    Single(ElementId),
}

impl From<&str> for SelectionInput {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for SelectionInput {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<ElementId> for SelectionInput {
    fn from(element: ElementId) -> Self {
        Self::Single(element)
    }
}

impl From<Vec<ElementId>> for SelectionInput {
    fn from(elements: Vec<ElementId>) -> Self {
        Self::Handles(elements)
    }
}

impl From<&[ElementId]> for SelectionInput {
    fn from(elements: &[ElementId]) -> Self {
        Self::Handles(elements.to_vec())
    }
}

/// Ordered set of live element handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    nodes: Vec<ElementId>,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_nodes(nodes: Vec<ElementId>) -> Self {
        let mut unique = Vec::with_capacity(nodes.len());
        for node in nodes {
            if !unique.contains(&node) {
                unique.push(node);
            }
        }
        Self { nodes: unique }
    }

    /// The element single-element operations act on.
    pub fn first(&self) -> Option<ElementId> {
        self.nodes.first().copied()
    }

    pub fn get(&self, index: usize) -> Option<ElementId> {
        self.nodes.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[ElementId] {
        &self.nodes
    }
}

impl IntoIterator for Selection {
    type Item = ElementId;
    type IntoIter = std::vec::IntoIter<ElementId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Anything that may name one element. `None` and empty selections name
/// nothing, which turns every operation into a no-op.
pub trait AsHandle {
    fn handle(&self) -> Option<ElementId>;
}

impl AsHandle for ElementId {
    fn handle(&self) -> Option<ElementId> {
        Some(*self)
    }
}

impl AsHandle for Option<ElementId> {
    fn handle(&self) -> Option<ElementId> {
        *self
    }
}

impl AsHandle for Selection {
    fn handle(&self) -> Option<ElementId> {
        self.first()
    }
}

impl<T: AsHandle + ?Sized> AsHandle for &T {
    fn handle(&self) -> Option<ElementId> {
        (**self).handle()
    }
}
