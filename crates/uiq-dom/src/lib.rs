//! In-memory host element tree for uiquery.
//!
//! This crate provides:
//! - **Document**: an HTML tree parsed with `scraper`, addressed by [`ElementId`]
//! - **Styles**: inline style side table with a small computed-style fallback
//! - **Listeners**: per-element listener table keyed by [`ListenerId`]
//! - **Events**: the event object handed to listeners during dispatch
//! - **Timers**: a deterministic virtual-clock timer queue

pub mod document;
pub mod event;
pub mod style;
pub mod timers;

pub use document::{Document, ElementId, ListenerId};
pub use event::Event;
pub use style::{StyleDeclarations, parse_style_attribute};
pub use timers::{TimerHandle, TimerQueue};
