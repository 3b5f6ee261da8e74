//! Style animation engine.
//!
//! At most one animation runs per element. Each one samples the computed
//! start values once, then ticks on the host scheduler: every tick writes
//! `start + (end - start) * easing(progress)` plus the unit for each
//! property, where progress is elapsed time over duration.
//!
//! # Lifecycle
//!
//! ```text
//! Idle ──animate──▶ Running ──progress reaches 1──▶ Completed
//!                      │
//!                      └──stop / cancel / animate / remove──▶ Cancelled
//! ```

pub mod easing;
mod engine;
pub mod events;
pub mod property;
pub mod state;
mod transitions;

pub use easing::Easing;
pub use events::{AnimationEvent, AnimationEventQueue};
pub use property::{AnimationProperty, StyleMap, StyleValue, is_animatable};
pub use state::{AnimationHandle, AnimationId, AnimationPhase, CompleteCallback, on_complete};

pub(crate) use state::AnimationState;
