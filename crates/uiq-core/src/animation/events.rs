//! Animation lifecycle events.
//!
//! The engine records a [`AnimationEvent`] whenever an animation starts,
//! completes or is cancelled. Drain them with `Ui::drain_animation_events`
//! after driving the clock. The queue holds at most a configured number of
//! records and evicts the oldest once full.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use uiq_dom::ElementId;

use super::state::AnimationId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationEvent {
    Started {
        animation_id: AnimationId,
        #[serde(skip)]
        element: Option<ElementId>,
        at_ms: u64,
    },
    Completed {
        animation_id: AnimationId,
        #[serde(skip)]
        element: Option<ElementId>,
        at_ms: u64,
    },
    /// Stopped explicitly, replaced by a newer animation, or disposed.
    Cancelled {
        animation_id: AnimationId,
        #[serde(skip)]
        element: Option<ElementId>,
        at_ms: u64,
    },
}

impl AnimationEvent {
    pub fn animation_id(&self) -> AnimationId {
        match self {
            Self::Started { animation_id, .. }
            | Self::Completed { animation_id, .. }
            | Self::Cancelled { animation_id, .. } => *animation_id,
        }
    }

    /// Element the animation ran on. Not preserved across serialization.
    pub fn element(&self) -> Option<ElementId> {
        match self {
            Self::Started { element, .. }
            | Self::Completed { element, .. }
            | Self::Cancelled { element, .. } => *element,
        }
    }

    pub fn at_ms(&self) -> u64 {
        match self {
            Self::Started { at_ms, .. }
            | Self::Completed { at_ms, .. }
            | Self::Cancelled { at_ms, .. } => *at_ms,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

/// Default number of undrained records kept.
pub const DEFAULT_EVENT_CAPACITY: usize = 1024;

/// Bounded FIFO of lifecycle events.
#[derive(Debug)]
pub struct AnimationEventQueue {
    events: VecDeque<AnimationEvent>,
    capacity: usize,
    evicted: u64,
}

impl Default for AnimationEventQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }
}

impl AnimationEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue keeping at most `capacity` records. Zero records nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
            evicted: 0,
        }
    }

    /// Append `event`, evicting the oldest record when full.
    pub fn push(&mut self, event: AnimationEvent) {
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        while self.events.len() >= self.capacity {
            self.events.pop_front();
            self.evicted += 1;
        }
        self.events.push_back(event);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records dropped without ever being drained.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = AnimationEvent> + '_ {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
