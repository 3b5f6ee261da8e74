//! Host seam: the element tree, listener mechanism and scheduler the core
//! runs on.

use uiq_dom::{Document, ElementId, ListenerId, TimerHandle, TimerQueue};

use crate::animation::AnimationId;

/// Work queued on the host scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    /// Advance one animation by one tick.
    AnimationTick {
        element: ElementId,
        animation: AnimationId,
    },
}

/// Primitives the core consumes from the host platform.
///
/// Every method must tolerate dead handles: lookups return nothing and
/// mutations do nothing.
pub trait Host: 'static {
    fn query_one(&self, selector: &str) -> Option<ElementId>;
    fn query_all(&self, selector: &str) -> Vec<ElementId>;
    fn query_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId>;
    /// Build a detached element from a markup fragment.
    fn create_element(&mut self, markup: &str) -> Option<ElementId>;
    fn contains(&self, element: ElementId) -> bool;
    fn parent(&self, element: ElementId) -> Option<ElementId>;
    fn children(&self, element: ElementId) -> Vec<ElementId>;
    fn matches(&self, element: ElementId, selector: &str) -> bool;
    fn remove_element(&mut self, element: ElementId);
    fn focus(&mut self, element: ElementId);

    /// Computed value of a style property.
    fn style(&self, element: ElementId, name: &str) -> String;
    /// Inline write; an empty value clears the override.
    fn set_style(&mut self, element: ElementId, name: &str, value: &str);

    fn attach_listener(&mut self, element: ElementId, event: &str, listener: ListenerId);
    fn detach_listener(&mut self, element: ElementId, event: &str, listener: ListenerId) -> bool;
    fn is_attached(&self, element: ElementId, event: &str, listener: ListenerId) -> bool;
    /// Listeners for `event` on `element`, in attachment order.
    fn listeners(&self, element: ElementId, event: &str) -> Vec<ListenerId>;
    fn propagation_path(&self, target: ElementId, bubbles: bool) -> Vec<ElementId>;

    fn now(&self) -> u64;
    fn schedule_after(&mut self, delay_ms: u64, task: TimerTask) -> TimerHandle;
    fn cancel_timer(&mut self, handle: TimerHandle);
    fn next_due_at(&self) -> Option<u64>;
    /// Pop the earliest task due at or before `until`, moving the clock.
    fn next_due(&mut self, until: u64) -> Option<TimerTask>;
    fn advance_clock(&mut self, to_ms: u64);
}

/// In-memory host: a parsed [`Document`] plus a virtual-clock timer queue.
#[derive(Debug, Default)]
pub struct MemoryHost {
    document: Document,
    timers: TimerQueue<TimerTask>,
}

impl MemoryHost {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            timers: TimerQueue::new(),
        }
    }

    pub fn parse(html: &str) -> Self {
        Self::new(Document::parse(html))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}

impl Host for MemoryHost {
    fn query_one(&self, selector: &str) -> Option<ElementId> {
        self.document.query_one(selector)
    }

    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        self.document.query_all(selector)
    }

    fn query_within(&self, scope: ElementId, selector: &str) -> Vec<ElementId> {
        self.document.query_within(scope, selector)
    }

    fn create_element(&mut self, markup: &str) -> Option<ElementId> {
        self.document.create_element(markup)
    }

    fn contains(&self, element: ElementId) -> bool {
        self.document.exists(element)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.document.parent(element)
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.document.children(element)
    }

    fn matches(&self, element: ElementId, selector: &str) -> bool {
        self.document.matches(element, selector)
    }

    fn remove_element(&mut self, element: ElementId) {
        self.document.remove_element(element);
    }

    fn focus(&mut self, element: ElementId) {
        self.document.focus(element);
    }

    fn style(&self, element: ElementId, name: &str) -> String {
        self.document.computed_style(element, name)
    }

    fn set_style(&mut self, element: ElementId, name: &str, value: &str) {
        self.document.set_style(element, name, value);
    }

    fn attach_listener(&mut self, element: ElementId, event: &str, listener: ListenerId) {
        self.document.add_listener(element, event, listener);
    }

    fn detach_listener(&mut self, element: ElementId, event: &str, listener: ListenerId) -> bool {
        self.document.remove_listener(element, event, listener)
    }

    fn is_attached(&self, element: ElementId, event: &str, listener: ListenerId) -> bool {
        self.document.has_listener(element, event, listener)
    }

    fn listeners(&self, element: ElementId, event: &str) -> Vec<ListenerId> {
        self.document.listeners(element, event)
    }

    fn propagation_path(&self, target: ElementId, bubbles: bool) -> Vec<ElementId> {
        self.document.propagation_path(target, bubbles)
    }

    fn now(&self) -> u64 {
        self.timers.now()
    }

    fn schedule_after(&mut self, delay_ms: u64, task: TimerTask) -> TimerHandle {
        self.timers.schedule_after(delay_ms, task)
    }

    fn cancel_timer(&mut self, handle: TimerHandle) {
        self.timers.cancel(handle);
    }

    fn next_due_at(&self) -> Option<u64> {
        self.timers.next_due_at()
    }

    fn next_due(&mut self, until: u64) -> Option<TimerTask> {
        self.timers.pop_due(until).map(|(_, task)| task)
    }

    fn advance_clock(&mut self, to_ms: u64) {
        self.timers.advance_clock(to_ms);
    }
}
