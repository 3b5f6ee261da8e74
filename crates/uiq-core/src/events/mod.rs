//! Event delegation registry.
//!
//! Bindings live in a side table owned by [`Ui`]; for every binding exactly
//! one listener id is attached on the host under the binding's event name.
//! Removing a binding always detaches its listener in the same call, so the
//! host never holds a listener the registry has forgotten.

mod alias;
mod binding;
mod registry;

pub use alias::{normalize_event_name, split_event_names};
pub use binding::{EventBinding, HandlerRef, Listener};
pub use registry::EventRegistry;

use tracing::debug;
use uiq_dom::{ElementId, Event};

use crate::host::Host;
use crate::runtime::Ui;
use crate::selection::AsHandle;

impl<H: Host> Ui<H> {
    /// Bind `handler` for each space-separated name in `event_names`.
    ///
    /// With a `selector` the binding is delegated: it fires only for events
    /// whose target, or an ancestor of it up to the bound element, matches
    /// the selector, and the handler's context is that match.
    pub fn bind(
        &mut self,
        target: impl AsHandle,
        event_names: &str,
        selector: Option<&str>,
        handler: &HandlerRef<H>,
    ) {
        let Some(element) = self.live(target) else {
            return;
        };
        for name in split_event_names(event_names) {
            let binding = EventBinding::new(element, name, selector, handler);
            let listener = binding.listener.id();
            self.host.attach_listener(element, name, listener);
            debug!(?element, event = name, selector, listener = listener.0, "bound");
            self.registry.push(element, binding);
        }
    }

    /// Wrap `handler`, bind it directly, and return it for later unbinding.
    pub fn on(
        &mut self,
        target: impl AsHandle,
        event_names: &str,
        handler: impl Fn(&mut Ui<H>, &Event, ElementId) + 'static,
    ) -> HandlerRef<H> {
        let handler = HandlerRef::new(handler);
        self.bind(target, event_names, None, &handler);
        handler
    }

    /// Delegated form of [`Ui::on`].
    pub fn delegate(
        &mut self,
        target: impl AsHandle,
        event_names: &str,
        selector: &str,
        handler: impl Fn(&mut Ui<H>, &Event, ElementId) + 'static,
    ) -> HandlerRef<H> {
        let handler = HandlerRef::new(handler);
        self.bind(target, event_names, Some(selector), &handler);
        handler
    }

    /// Remove bindings and detach their listeners. Returns how many were
    /// removed.
    ///
    /// Filters apply in this order:
    /// 1. no event name: every binding on the element and on all of its
    ///    descendants, depth first;
    /// 2. event name and handler: bindings with that name and handler;
    /// 3. event name and selector: bindings with that name and selector;
    /// 4. event name only: every binding with that name.
    ///
    /// Names are split and normalized the same way [`Ui::bind`] does it. A
    /// blank name names no event and removes nothing.
    pub fn unbind(
        &mut self,
        target: impl AsHandle,
        event_name: Option<&str>,
        selector: Option<&str>,
        handler: Option<&HandlerRef<H>>,
    ) -> usize {
        let Some(element) = target.handle() else {
            return 0;
        };
        let Some(names) = event_name else {
            return self.unbind_subtree(element);
        };

        let mut removed = 0;
        for name in split_event_names(names) {
            let dropped = self.registry.take_matching(element, |binding| {
                binding.event_name == name
                    && match (handler, selector) {
                        (Some(handler), _) => binding.handler.ptr_eq(handler),
                        (None, Some(selector)) => binding.selector.as_deref() == Some(selector),
                        (None, None) => true,
                    }
            });
            removed += self.detach_bindings(element, dropped);
        }
        if removed > 0 {
            debug!(?element, event = names, selector, removed, "unbound");
        }
        removed
    }

    fn unbind_subtree(&mut self, element: ElementId) -> usize {
        let own = self.registry.take_all(element);
        let mut removed = self.detach_bindings(element, own);
        for child in self.host.children(element) {
            removed += self.unbind_subtree(child);
        }
        removed
    }

    fn detach_bindings(&mut self, element: ElementId, bindings: Vec<EventBinding<H>>) -> usize {
        for binding in &bindings {
            self.host
                .detach_listener(element, &binding.event_name, binding.listener.id());
        }
        bindings.len()
    }

    /// Bindings registered on the element, in dispatch order.
    pub fn bindings(&self, target: impl AsHandle) -> &[EventBinding<H>] {
        match target.handle() {
            Some(element) => self.registry.bindings(element),
            None => &[],
        }
    }

    /// Bindings across every element.
    pub fn binding_count(&self) -> usize {
        self.registry.total()
    }

    /// Dispatch a synthetic `event_name` event at the element. Returns the
    /// number of handlers invoked.
    ///
    /// Triggered events always bubble, `focus` and `blur` included. Build an
    /// [`Event`] and call [`Ui::dispatch`] for host-native bubbling.
    pub fn trigger(&mut self, target: impl AsHandle, event_name: &str, detail: Option<&str>) -> usize {
        let Some(element) = self.live(target) else {
            return 0;
        };
        let mut event = Event::new(event_name, element, self.host.now()).with_bubbles(true);
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        self.dispatch(&event)
    }

    pub fn click(&mut self, target: impl AsHandle) -> usize {
        self.trigger(target, "click", None)
    }

    /// Deliver `event` along its propagation path.
    ///
    /// Listeners are snapshotted per element, but each one is re-checked
    /// before it runs: a listener detached by an earlier handler does not
    /// fire. Stopping propagation finishes the current element first.
    pub fn dispatch(&mut self, event: &Event) -> usize {
        let path = self.host.propagation_path(event.target(), event.bubbles());
        let mut invoked = 0;
        for node in path {
            event.set_current_target(node);
            for id in self.host.listeners(node, event.name()) {
                if !self.host.is_attached(node, event.name(), id) {
                    continue;
                }
                let Some(listener) = self.registry.listener(node, id) else {
                    continue;
                };
                if listener.dispatch(self, event) {
                    invoked += 1;
                }
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
        invoked
    }
}
