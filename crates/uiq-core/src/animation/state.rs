//! Per-element animation state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uiq_dom::{ElementId, TimerHandle};

use super::easing::Easing;
use super::property::AnimationProperty;
use crate::host::Host;
use crate::runtime::Ui;

/// Unique identifier for one `animate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where an animation is in its lifecycle. An element with no state is
/// `Idle`; `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationPhase {
    #[default]
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl AnimationPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// Cancellation handle returned by `animate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationHandle {
    pub element: ElementId,
    pub id: AnimationId,
}

/// Completion callback. Runs once, after the final tick.
pub type CompleteCallback<H> = Box<dyn FnOnce(&mut Ui<H>, ElementId)>;

/// Box a completion closure for `animate` and the transitions.
pub fn on_complete<H: Host>(
    callback: impl FnOnce(&mut Ui<H>, ElementId) + 'static,
) -> Option<CompleteCallback<H>> {
    Some(Box::new(callback))
}

/// The in-flight animation of one element.
pub(crate) struct AnimationState<H: Host> {
    pub id: AnimationId,
    pub properties: Vec<AnimationProperty>,
    pub step: Option<Box<dyn FnMut(f64)>>,
    pub complete: Option<CompleteCallback<H>>,
    pub easing: Easing,
    pub start_ms: u64,
    pub duration_ms: f64,
    pub timer: Option<TimerHandle>,
}

impl<H: Host> AnimationState<H> {
    /// Linear progress at `now`, clamped to `[0, 1]`. A zero duration is
    /// already finished.
    pub fn progress_at(&self, now: u64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start_ms) as f64;
        (elapsed / self.duration_ms).clamp(0.0, 1.0)
    }
}

impl<H: Host> fmt::Debug for AnimationState<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationState")
            .field("id", &self.id)
            .field("properties", &self.properties)
            .field("easing", &self.easing)
            .field("start_ms", &self.start_ms)
            .field("duration_ms", &self.duration_ms)
            .field("timer", &self.timer)
            .finish()
    }
}
