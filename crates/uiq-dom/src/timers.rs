//! Deterministic virtual-clock timer queue.
//!
//! Timers are ordered by due time, then by scheduling order, so two timers due
//! at the same instant run in the order they were scheduled. The clock only
//! moves when the owner pops a due timer or advances it explicitly.

use std::collections::{BTreeMap, HashMap};

/// Cancellable handle of one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: u64,
    next_order: u64,
    queue: BTreeMap<(u64, u64), T>,
    due_by_order: HashMap<u64, u64>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            now_ms,
            next_order: 1,
            queue: BTreeMap::new(),
            due_by_order: HashMap::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    /// Schedule `task` to become due `delay_ms` after the current time.
    pub fn schedule_after(&mut self, delay_ms: u64, task: T) -> TimerHandle {
        let order = self.next_order;
        self.next_order += 1;
        let due_at = self.now_ms.saturating_add(delay_ms);
        self.queue.insert((due_at, order), task);
        self.due_by_order.insert(order, due_at);
        TimerHandle(order)
    }

    /// Cancel a pending timer. Returns false when it already ran or was
    /// cancelled before.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_order.remove(&handle.0) {
            Some(due_at) => self.queue.remove(&(due_at, handle.0)).is_some(),
            None => false,
        }
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_by_order.contains_key(&handle.0)
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn next_due_at(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due_at, _)| *due_at)
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time.
    pub fn pop_due(&mut self, until: u64) -> Option<(TimerHandle, T)> {
        let (&(due_at, order), _) = self.queue.iter().next()?;
        if due_at > until {
            return None;
        }
        let task = self.queue.remove(&(due_at, order))?;
        self.due_by_order.remove(&order);
        self.now_ms = self.now_ms.max(due_at);
        Some((TimerHandle(order), task))
    }

    /// Move the clock forward. The clock never goes backwards.
    pub fn advance_clock(&mut self, to_ms: u64) {
        self.now_ms = self.now_ms.max(to_ms);
    }
}
