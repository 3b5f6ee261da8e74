//! Fade and slide helpers built on [`Ui::animate`].
//!
//! Fades always run linearly. Slides use the configured slide easing, which
//! defaults to linear. Every helper clears the inline overrides it
//! introduced once the animation completes, and the caller's callback runs
//! after that cleanup.

use uiq_dom::ElementId;

use super::engine::validate_duration;
use super::property::{StyleMap, format_number, parse_leading_number};
use super::state::{AnimationHandle, CompleteCallback, on_complete};
use crate::error::Result;
use crate::host::Host;
use crate::runtime::Ui;
use crate::selection::AsHandle;

fn finish<H: Host>(ui: &mut Ui<H>, element: ElementId, callback: Option<CompleteCallback<H>>) {
    if let Some(callback) = callback {
        callback(ui, element);
    }
}

impl<H: Host> Ui<H> {
    /// Show the element with `display: block` and fade opacity from 0 to 1.
    pub fn fade_in(
        &mut self,
        target: impl AsHandle,
        duration_ms: f64,
        complete: Option<CompleteCallback<H>>,
    ) -> Result<Option<AnimationHandle>> {
        validate_duration(duration_ms)?;
        let Some(element) = self.live(target) else {
            return Ok(None);
        };
        self.host.set_style(element, "display", "block");
        self.host.set_style(element, "opacity", "0");
        self.animate(
            element,
            StyleMap::new().with("opacity", 1),
            duration_ms,
            "linear",
            on_complete(move |ui: &mut Ui<H>, el| {
                ui.host.set_style(el, "opacity", "");
                finish(ui, el, complete);
            }),
        )
    }

    /// Fade opacity from 1 to 0, then hide with `display: none`.
    pub fn fade_out(
        &mut self,
        target: impl AsHandle,
        duration_ms: f64,
        complete: Option<CompleteCallback<H>>,
    ) -> Result<Option<AnimationHandle>> {
        validate_duration(duration_ms)?;
        let Some(element) = self.live(target) else {
            return Ok(None);
        };
        self.host.set_style(element, "opacity", "1");
        self.animate(
            element,
            StyleMap::new().with("opacity", 0),
            duration_ms,
            "linear",
            on_complete(move |ui: &mut Ui<H>, el| {
                ui.host.set_style(el, "display", "none");
                ui.host.set_style(el, "opacity", "");
                finish(ui, el, complete);
            }),
        )
    }

    /// Animate opacity from its current value to `opacity`. The override is
    /// left in place.
    pub fn fade_to(
        &mut self,
        target: impl AsHandle,
        duration_ms: f64,
        opacity: f64,
        complete: Option<CompleteCallback<H>>,
    ) -> Result<Option<AnimationHandle>> {
        self.animate(
            target,
            StyleMap::new().with("opacity", opacity),
            duration_ms,
            "linear",
            complete,
        )
    }

    /// Reveal a hidden element by growing its height from 0 to its natural
    /// height. An element that is already displayed only runs the callback.
    pub fn slide_down(
        &mut self,
        target: impl AsHandle,
        duration_ms: f64,
        complete: Option<CompleteCallback<H>>,
    ) -> Result<Option<AnimationHandle>> {
        validate_duration(duration_ms)?;
        let Some(element) = self.live(target) else {
            return Ok(None);
        };
        if self.host.style(element, "display") != "none" {
            finish(self, element, complete);
            return Ok(None);
        }

        self.host.set_style(element, "display", "block");
        self.host.set_style(element, "visibility", "hidden");
        self.host.set_style(element, "overflow", "hidden");
        let height = self.measured_height(element);
        self.host.set_style(element, "visibility", "");
        self.host.set_style(element, "height", "0px");

        let easing = self.settings.slide_easing.name();
        self.animate(
            element,
            StyleMap::new().with("height", format!("{}px", format_number(height))),
            duration_ms,
            easing,
            on_complete(move |ui: &mut Ui<H>, el| {
                ui.host.set_style(el, "height", "");
                ui.host.set_style(el, "overflow", "");
                finish(ui, el, complete);
            }),
        )
    }

    /// Collapse a displayed element to zero height, then hide it. An element
    /// that is already hidden only runs the callback.
    pub fn slide_up(
        &mut self,
        target: impl AsHandle,
        duration_ms: f64,
        complete: Option<CompleteCallback<H>>,
    ) -> Result<Option<AnimationHandle>> {
        validate_duration(duration_ms)?;
        let Some(element) = self.live(target) else {
            return Ok(None);
        };
        if self.host.style(element, "display") == "none" {
            finish(self, element, complete);
            return Ok(None);
        }

        let height = self.measured_height(element);
        self.host
            .set_style(element, "height", &format!("{}px", format_number(height)));
        self.host.set_style(element, "overflow", "hidden");

        let easing = self.settings.slide_easing.name();
        self.animate(
            element,
            StyleMap::new().with("height", "0px"),
            duration_ms,
            easing,
            on_complete(move |ui: &mut Ui<H>, el| {
                ui.host.set_style(el, "display", "none");
                ui.host.set_style(el, "height", "");
                ui.host.set_style(el, "overflow", "");
                finish(ui, el, complete);
            }),
        )
    }

    /// [`Ui::slide_down`] when hidden, [`Ui::slide_up`] otherwise.
    pub fn slide_toggle(
        &mut self,
        target: impl AsHandle,
        duration_ms: f64,
        complete: Option<CompleteCallback<H>>,
    ) -> Result<Option<AnimationHandle>> {
        let Some(element) = self.live(target) else {
            return Ok(None);
        };
        if self.host.style(element, "display") == "none" {
            self.slide_down(element, duration_ms, complete)
        } else {
            self.slide_up(element, duration_ms, complete)
        }
    }

    fn measured_height(&self, element: ElementId) -> f64 {
        parse_leading_number(&self.host.style(element, "height"))
            .map_or(0.0, |(height, _)| height)
    }
}
