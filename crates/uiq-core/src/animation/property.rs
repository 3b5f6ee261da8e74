//! Style maps and the properties the engine interpolates.

use std::fmt;

use crate::error::{Result, UiError};

/// Target value in a [`StyleMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum StyleValue {
    Number(f64),
    /// Number with an optional unit suffix, such as `"50%"` or `"12px"`.
    Text(String),
}

impl StyleValue {
    fn as_text(&self) -> String {
        match self {
            Self::Number(value) => format_number(*value),
            Self::Text(text) => text.clone(),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for StyleValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

type StepFn = Box<dyn FnMut(f64)>;

/// Ordered target styles plus an optional per-tick step callback.
///
/// The step callback has its own slot, so it can never be confused with a
/// style property. Passing a plain value under the `step` key is rejected
/// when the map is animated.
#[derive(Default)]
pub struct StyleMap {
    entries: Vec<(String, StyleValue)>,
    step: Option<StepFn>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`StyleMap::set`].
    pub fn with(mut self, name: &str, value: impl Into<StyleValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Insert or replace a target. Replacing keeps the original position.
    pub fn set(&mut self, name: &str, value: impl Into<StyleValue>) {
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    /// Called with linear progress after every tick.
    pub fn on_step(mut self, step: impl FnMut(f64) + 'static) -> Self {
        self.step = Some(Box::new(step));
        self
    }

    pub fn get(&self, name: &str) -> Option<&StyleValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_step(&self) -> bool {
        self.step.is_some()
    }

    pub(crate) fn into_parts(self) -> (Vec<(String, StyleValue)>, Option<StepFn>) {
        (self.entries, self.step)
    }
}

impl fmt::Debug for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleMap")
            .field("entries", &self.entries)
            .field("step", &self.step.is_some())
            .finish()
    }
}

/// How the unit of an animated property is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnitRule {
    Pixels,
    Unitless,
    FromTarget,
}

fn unit_rule(name: &str) -> Option<UnitRule> {
    match name {
        "margin-left" | "margin-top" | "margin-right" | "margin-bottom" | "padding-left"
        | "padding-top" | "padding-right" | "padding-bottom" => Some(UnitRule::Pixels),
        "opacity" => Some(UnitRule::Unitless),
        "left" | "top" | "right" | "bottom" | "width" | "height" | "font-size"
        | "line-height" => Some(UnitRule::FromTarget),
        _ => None,
    }
}

/// Whether the engine interpolates `name`.
pub fn is_animatable(name: &str) -> bool {
    unit_rule(name).is_some()
}

/// Split `text` into its leading decimal number and the remaining suffix.
///
/// Accepts leading whitespace, a sign, a fractional part and an exponent,
/// the same prefix a float-parsing routine would consume. Returns `None`
/// when no digits lead the text.
pub fn parse_leading_number(text: &str) -> Option<(f64, &str)> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    let value = trimmed[..end].parse::<f64>().ok()?;
    Some((value, &trimmed[end..]))
}

/// Format a written style number: integral values without a fraction, and
/// never `-0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// One interpolated property of a running animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationProperty {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub unit: String,
}

impl AnimationProperty {
    /// Build a property from the caller's target, starting at 0 until
    /// [`AnimationProperty::sample_start`] runs. Returns `Ok(None)` for keys
    /// the engine does not animate.
    pub fn resolve(name: &str, target: &StyleValue) -> Result<Option<Self>> {
        let Some(rule) = unit_rule(name) else {
            return Ok(None);
        };
        let target_text = target.as_text();
        let (end, suffix) = match target {
            StyleValue::Number(value) if value.is_finite() => (*value, ""),
            StyleValue::Number(_) => return Err(non_numeric(name, &target_text)),
            StyleValue::Text(text) => parse_leading_number(text)
                .filter(|(value, _)| value.is_finite())
                .ok_or_else(|| non_numeric(name, text))?,
        };
        let unit = match rule {
            UnitRule::Pixels => "px",
            UnitRule::Unitless => "",
            UnitRule::FromTarget => suffix.trim(),
        };
        Ok(Some(Self {
            name: name.to_string(),
            start: 0.0,
            end,
            unit: unit.to_string(),
        }))
    }

    /// Take the start from a computed value; no leading number means 0.
    pub fn sample_start(&mut self, current: &str) {
        self.start = parse_leading_number(current)
            .map(|(value, _)| value)
            .filter(|value| value.is_finite())
            .unwrap_or(0.0);
    }

    pub fn value_at(&self, eased: f64) -> f64 {
        self.start + (self.end - self.start) * eased
    }

    /// Style text written for eased progress `eased`.
    pub fn format_at(&self, eased: f64) -> String {
        format!("{}{}", format_number(self.value_at(eased)), self.unit)
    }
}

fn non_numeric(property: &str, value: &str) -> UiError {
    UiError::NonNumericTarget {
        property: property.to_string(),
        value: value.to_string(),
    }
}
