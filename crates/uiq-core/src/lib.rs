//! Core of uiquery: delegated events and style animation over a host tree.
//!
//! # Architecture
//!
//! ```text
//! Ui<H: Host>
//!   ├── EventRegistry   (element → ordered bindings, listeners attached on H)
//!   ├── Animations      (element → at most one running AnimationState)
//!   ├── Data bag        (element → key/value strings)
//!   └── Extensions      (element → named behaviours)
//! ```
//!
//! All per-element state lives in side tables owned by [`Ui`]; the host only
//! ever sees listener ids, style writes and timer tasks.

pub mod animation;
pub mod error;
pub mod events;
pub mod extension;
pub mod host;
pub mod runtime;
pub mod selection;

pub use animation::{
    AnimationEvent, AnimationHandle, AnimationId, AnimationPhase, AnimationProperty,
    CompleteCallback, Easing, StyleMap, StyleValue, on_complete,
};
pub use error::{Result, UiError};
pub use events::{EventBinding, HandlerRef, Listener};
pub use host::{Host, MemoryHost, TimerTask};
pub use runtime::Ui;
pub use selection::{AsHandle, Selection, SelectionInput};
pub use uiq_dom::{Document, ElementId, Event, ListenerId, TimerHandle};
