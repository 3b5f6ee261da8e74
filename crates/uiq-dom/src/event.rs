//! Event object delivered to listeners.

use std::cell::Cell;

use crate::document::ElementId;

/// Event names that do not bubble when dispatched.
const NON_BUBBLING: &[&str] = &[
    "blur", "focus", "load", "mouseenter", "mouseleave", "resize", "scroll", "unload",
];

/// A dispatched event.
///
/// `current_target` and the propagation flags change while the event travels
/// the propagation path, so they sit behind `Cell`s and listeners only ever
/// see a shared reference.
#[derive(Debug, Clone)]
pub struct Event {
    name: String,
    target: ElementId,
    current_target: Cell<ElementId>,
    bubbles: bool,
    detail: Option<String>,
    time_stamp_ms: u64,
    propagation_stopped: Cell<bool>,
    default_prevented: Cell<bool>,
}

impl Event {
    pub fn new(name: &str, target: ElementId, time_stamp_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            target,
            current_target: Cell::new(target),
            bubbles: !NON_BUBBLING.contains(&name),
            detail: None,
            time_stamp_ms,
            propagation_stopped: Cell::new(false),
            default_prevented: Cell::new(false),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element the event was originally dispatched to.
    pub fn target(&self) -> ElementId {
        self.target
    }

    /// The element whose listeners are currently running.
    pub fn current_target(&self) -> ElementId {
        self.current_target.get()
    }

    pub fn set_current_target(&self, element: ElementId) {
        self.current_target.set(element);
    }

    pub fn bubbles(&self) -> bool {
        self.bubbles
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    pub fn time_stamp_ms(&self) -> u64 {
        self.time_stamp_ms
    }

    pub fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}
