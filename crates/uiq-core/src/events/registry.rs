//! Side table of event bindings, keyed by element.

use std::collections::HashMap;
use std::rc::Rc;

use uiq_dom::{ElementId, ListenerId};

use super::binding::{EventBinding, Listener};
use crate::host::Host;

/// Ordered bindings per element. Insertion order is dispatch order.
pub struct EventRegistry<H: Host> {
    bindings: HashMap<ElementId, Vec<EventBinding<H>>>,
}

impl<H: Host> Default for EventRegistry<H> {
    fn default() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }
}

impl<H: Host> EventRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, element: ElementId, binding: EventBinding<H>) {
        self.bindings.entry(element).or_default().push(binding);
    }

    pub fn bindings(&self, element: ElementId) -> &[EventBinding<H>] {
        self.bindings.get(&element).map_or(&[], Vec::as_slice)
    }

    /// Wrapper registered on `element` under `id`.
    pub fn listener(&self, element: ElementId, id: ListenerId) -> Option<Rc<Listener<H>>> {
        self.bindings(element)
            .iter()
            .find(|binding| binding.listener.id() == id)
            .map(|binding| Rc::clone(&binding.listener))
    }

    /// Remove and return every binding of `element`.
    pub fn take_all(&mut self, element: ElementId) -> Vec<EventBinding<H>> {
        self.bindings.remove(&element).unwrap_or_default()
    }

    /// Remove and return the bindings of `element` matching `filter`. The
    /// entry is rebuilt from the survivors, or dropped when none survive.
    pub fn take_matching(
        &mut self,
        element: ElementId,
        mut filter: impl FnMut(&EventBinding<H>) -> bool,
    ) -> Vec<EventBinding<H>> {
        let Some(current) = self.bindings.remove(&element) else {
            return Vec::new();
        };
        let (removed, kept): (Vec<_>, Vec<_>) = current.into_iter().partition(|b| filter(b));
        if !kept.is_empty() {
            self.bindings.insert(element, kept);
        }
        removed
    }

    pub fn len(&self, element: ElementId) -> usize {
        self.bindings(element).len()
    }

    /// Bindings across all elements.
    pub fn total(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
