use std::fmt;
use std::rc::Rc;

use uiq_dom::{ElementId, Event, ListenerId};

use crate::host::Host;
use crate::runtime::Ui;

type HandlerFn<H> = dyn Fn(&mut Ui<H>, &Event, ElementId);

/// Shared user handler. Clones compare equal by identity, which is what
/// handler-based unbinding matches on.
pub struct HandlerRef<H: Host>(Rc<HandlerFn<H>>);

impl<H: Host> HandlerRef<H> {
    /// Wrap a handler. It receives the runtime, the event, and the context
    /// element: the bound element, or the delegated match.
    pub fn new(handler: impl Fn(&mut Ui<H>, &Event, ElementId) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn call(&self, ui: &mut Ui<H>, event: &Event, context: ElementId) {
        (self.0)(ui, event, context)
    }
}

impl<H: Host> Clone for HandlerRef<H> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<H: Host> fmt::Debug for HandlerRef<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerRef({:p})", Rc::as_ptr(&self.0))
    }
}

/// Dispatch wrapper attached to the host on behalf of one binding.
///
/// Its id is the only value the host ever sees. The wrapper resolves the
/// context element and calls the user handler.
pub struct Listener<H: Host> {
    id: ListenerId,
    element: ElementId,
    selector: Option<String>,
    handler: HandlerRef<H>,
}

impl<H: Host> Listener<H> {
    pub(crate) fn new(element: ElementId, selector: Option<String>, handler: HandlerRef<H>) -> Self {
        Self {
            id: ListenerId::new(),
            element,
            selector,
            handler,
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Element the handler runs for, or `None` when a delegated binding has
    /// no match between the event target and the current target.
    pub fn resolve_context(&self, host: &H, event: &Event) -> Option<ElementId> {
        let Some(selector) = self.selector.as_deref() else {
            return Some(self.element);
        };
        let boundary = event.current_target();
        let mut candidate = Some(event.target());
        while let Some(node) = candidate {
            if host.matches(node, selector) {
                return Some(node);
            }
            if node == boundary {
                return None;
            }
            candidate = host.parent(node);
        }
        None
    }

    /// Run the wrapper. Returns whether the user handler was invoked.
    pub(crate) fn dispatch(&self, ui: &mut Ui<H>, event: &Event) -> bool {
        match self.resolve_context(ui.host(), event) {
            Some(context) => {
                self.handler.call(ui, event, context);
                true
            }
            None => false,
        }
    }
}

/// One entry of an element's registry.
pub struct EventBinding<H: Host> {
    pub event_name: String,
    pub selector: Option<String>,
    pub handler: HandlerRef<H>,
    pub listener: Rc<Listener<H>>,
}

impl<H: Host> EventBinding<H> {
    pub(crate) fn new(
        element: ElementId,
        event_name: &str,
        selector: Option<&str>,
        handler: &HandlerRef<H>,
    ) -> Self {
        let selector = selector.map(str::to_string);
        Self {
            event_name: event_name.to_string(),
            listener: Rc::new(Listener::new(element, selector.clone(), handler.clone())),
            selector,
            handler: handler.clone(),
        }
    }

    pub fn is_delegated(&self) -> bool {
        self.selector.is_some()
    }
}

impl<H: Host> fmt::Debug for EventBinding<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBinding")
            .field("event_name", &self.event_name)
            .field("selector", &self.selector)
            .field("listener", &self.listener.id())
            .finish()
    }
}
