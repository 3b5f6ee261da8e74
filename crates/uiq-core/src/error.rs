//! Error types for caller-contract violations.
//!
//! Absent elements, unknown easing names, unknown style keys and unbinds that
//! match nothing are not errors; they degrade silently.

use thiserror::Error;

/// Result type for uiquery operations.
pub type Result<T> = std::result::Result<T, UiError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UiError {
    /// Duration is negative, NaN or infinite.
    #[error("invalid animation duration: {0}ms")]
    InvalidDuration(f64),

    /// Target value has no leading number.
    #[error("non-numeric target `{value}` for style property `{property}`")]
    NonNumericTarget { property: String, value: String },

    /// Style map shape the engine cannot interpret.
    #[error("malformed style map: {0}")]
    MalformedStyleMap(String),

    /// A single timer run executed more timers than allowed.
    #[error("timer loop exceeded {limit} steps")]
    TimerStepLimit { limit: usize },
}
