//! `animate`, `stop` and the tick that drives them.

use tracing::{debug, trace};
use uiq_dom::ElementId;

use super::easing::Easing;
use super::events::AnimationEvent;
use super::property::{AnimationProperty, StyleMap};
use super::state::{AnimationHandle, AnimationId, AnimationPhase, AnimationState, CompleteCallback};
use crate::error::{Result, UiError};
use crate::host::{Host, TimerTask};
use crate::runtime::Ui;
use crate::selection::AsHandle;

pub(crate) fn validate_duration(duration_ms: f64) -> Result<()> {
    if duration_ms.is_finite() && duration_ms >= 0.0 {
        Ok(())
    } else {
        Err(UiError::InvalidDuration(duration_ms))
    }
}

impl<H: Host> Ui<H> {
    /// Animate the numeric style properties in `styles` from their computed
    /// values to the given targets over `duration_ms`.
    ///
    /// Any animation already running on the element is cancelled first. The
    /// first tick runs before this returns; later ticks run on the host
    /// scheduler every tick interval. `easing` names a curve from
    /// [`Easing`]; unknown names animate linearly.
    ///
    /// Returns `Ok(None)` when `target` names no live element.
    ///
    /// # Errors
    ///
    /// [`UiError::InvalidDuration`] for negative or non-finite durations,
    /// [`UiError::MalformedStyleMap`] when `step` is given as a style value,
    /// and [`UiError::NonNumericTarget`] when a target has no leading number.
    /// Nothing is changed when an error is returned.
    pub fn animate(
        &mut self,
        target: impl AsHandle,
        styles: StyleMap,
        duration_ms: f64,
        easing: &str,
        complete: Option<CompleteCallback<H>>,
    ) -> Result<Option<AnimationHandle>> {
        validate_duration(duration_ms)?;
        let (entries, step) = styles.into_parts();
        if entries.iter().any(|(name, _)| name == "step") {
            return Err(UiError::MalformedStyleMap(
                "`step` must be registered with StyleMap::on_step".to_string(),
            ));
        }
        let mut properties = Vec::with_capacity(entries.len());
        for (name, value) in &entries {
            if let Some(property) = AnimationProperty::resolve(name, value)? {
                properties.push(property);
            }
        }

        let Some(element) = self.live(target) else {
            return Ok(None);
        };

        self.stop_element(element);
        for property in &mut properties {
            property.sample_start(&self.host.style(element, &property.name));
        }

        let id = AnimationId::new();
        let start_ms = self.host.now();
        let easing = Easing::from_name(easing);
        debug!(
            ?element,
            animation = id.0,
            duration_ms,
            easing = easing.name(),
            properties = properties.len(),
            "animation started"
        );
        self.animations.insert(
            element,
            AnimationState {
                id,
                properties,
                step,
                complete,
                easing,
                start_ms,
                duration_ms,
                timer: None,
            },
        );
        self.outcomes.remove(&element);
        self.animation_events.push(AnimationEvent::Started {
            animation_id: id,
            element: Some(element),
            at_ms: start_ms,
        });

        self.run_tick(element, id);
        Ok(Some(AnimationHandle { element, id }))
    }

    /// Cancel the element's animation, if any. Styles keep the last written
    /// values and the completion callback never runs.
    pub fn stop(&mut self, target: impl AsHandle) {
        if let Some(element) = target.handle() {
            self.stop_element(element);
        }
    }

    /// Cancel the animation `handle` names. A handle whose animation already
    /// finished or was replaced does nothing. Returns whether it cancelled.
    pub fn cancel(&mut self, handle: AnimationHandle) -> bool {
        let current = self
            .animations
            .get(&handle.element)
            .is_some_and(|state| state.id == handle.id);
        current && self.stop_element(handle.element)
    }

    pub fn is_animating(&self, target: impl AsHandle) -> bool {
        target
            .handle()
            .is_some_and(|element| self.animations.contains_key(&element))
    }

    /// Phase of the element's most recent animation.
    pub fn animation_phase(&self, target: impl AsHandle) -> AnimationPhase {
        let Some(element) = target.handle() else {
            return AnimationPhase::Idle;
        };
        if self.animations.contains_key(&element) {
            return AnimationPhase::Running;
        }
        self.outcomes
            .get(&element)
            .copied()
            .unwrap_or(AnimationPhase::Idle)
    }

    pub(crate) fn stop_element(&mut self, element: ElementId) -> bool {
        let Some(state) = self.animations.remove(&element) else {
            return false;
        };
        if let Some(timer) = state.timer {
            self.host.cancel_timer(timer);
        }
        let at_ms = self.host.now();
        debug!(?element, animation = state.id.0, "animation cancelled");
        self.outcomes.insert(element, AnimationPhase::Cancelled);
        self.animation_events.push(AnimationEvent::Cancelled {
            animation_id: state.id,
            element: Some(element),
            at_ms,
        });
        true
    }

    /// One step of animation `id` on `element`. Ticks for an animation that
    /// is no longer current are dropped.
    pub(crate) fn run_tick(&mut self, element: ElementId, id: AnimationId) {
        let now = self.host.now();
        let tick_interval_ms = self.settings.tick_interval_ms;
        let Some(state) = self.animations.get_mut(&element) else {
            trace!(?element, animation = id.0, "tick for idle element dropped");
            return;
        };
        if state.id != id {
            trace!(?element, animation = id.0, "stale tick dropped");
            return;
        }
        state.timer = None;
        if !self.host.contains(element) {
            self.stop_element(element);
            return;
        }

        let progress = state.progress_at(now);
        let eased = state.easing.evaluate(progress);
        for property in &state.properties {
            self.host
                .set_style(element, &property.name, &property.format_at(eased));
        }
        if let Some(step) = state.step.as_mut() {
            step(progress);
        }
        trace!(?element, animation = id.0, progress, eased, "tick");

        if progress < 1.0 {
            let timer = self.host.schedule_after(
                tick_interval_ms,
                TimerTask::AnimationTick {
                    element,
                    animation: id,
                },
            );
            state.timer = Some(timer);
            return;
        }

        let Some(finished) = self.animations.remove(&element) else {
            return;
        };
        debug!(?element, animation = id.0, "animation completed");
        self.outcomes.insert(element, AnimationPhase::Completed);
        self.animation_events.push(AnimationEvent::Completed {
            animation_id: id,
            element: Some(element),
            at_ms: now,
        });
        if let Some(complete) = finished.complete {
            complete(self, element);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::animation::on_complete;
    use crate::host::MemoryHost;

    fn ui_with_box() -> (Ui, ElementId) {
        let mut ui = Ui::parse(r#"<div id="box" style="left: 0px"></div>"#);
        let element = ui.find("#box").unwrap();
        ui.host_mut()
            .document_mut()
            .set_natural_size(element, 200.0, 80.0);
        (ui, element)
    }

    fn counter() -> (Rc<Cell<u32>>, Option<CompleteCallback<MemoryHost>>) {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        (count, on_complete(move |_, _| seen.set(seen.get() + 1)))
    }

    #[test]
    fn opacity_scenario() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        let (done, callback) = counter();

        ui.animate(el, StyleMap::new().with("opacity", 0), 100.0, "linear", callback)?;
        assert_eq!(ui.host().style(el, "opacity"), "1");

        ui.advance_time(50)?;
        assert_eq!(ui.host().style(el, "opacity"), "0.5");
        assert_eq!(done.get(), 0);

        ui.advance_time(50)?;
        assert_eq!(ui.host().style(el, "opacity"), "0");
        assert_eq!(done.get(), 1);
        assert_eq!(ui.animation_phase(el), AnimationPhase::Completed);

        ui.advance_time(500)?;
        assert_eq!(done.get(), 1);
        assert_eq!(ui.host().pending_timers(), 0);
        Ok(())
    }

    #[test]
    fn linear_progress_is_monotonic() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        let samples = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&samples);
        let map = StyleMap::new()
            .with("left", "100px")
            .on_step(move |p| sink.borrow_mut().push(p));
        ui.animate(el, map, 95.0, "linear", None)?;

        let mut written = Vec::new();
        for _ in 0..12 {
            let value = ui.host().style(el, "left");
            written.push(value.trim_end_matches("px").parse::<f64>()?);
            ui.advance_time(10)?;
        }
        assert!(written.windows(2).all(|w| w[0] <= w[1]), "{written:?}");
        assert_eq!(ui.host().style(el, "left"), "100px");

        let progress = samples.borrow();
        assert_eq!(progress.first(), Some(&0.0));
        assert_eq!(progress.last(), Some(&1.0));
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn restart_replaces_trajectory() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        let (first_done, first) = counter();
        let (second_done, second) = counter();

        ui.animate(el, StyleMap::new().with("left", "100px"), 100.0, "linear", first)?;
        ui.advance_time(30)?;
        ui.animate(el, StyleMap::new().with("left", "0px"), 60.0, "linear", second)?;
        assert_eq!(ui.host().pending_timers(), 1);
        assert_eq!(ui.host().style(el, "left"), "30px");

        ui.advance_time(30)?;
        assert_eq!(ui.host().style(el, "left"), "15px");
        ui.advance_time(100)?;
        assert_eq!(ui.host().style(el, "left"), "0px");
        assert_eq!(first_done.get(), 0);
        assert_eq!(second_done.get(), 1);
        Ok(())
    }

    #[test]
    fn stop_prevents_further_ticks() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        let (done, callback) = counter();
        ui.animate(el, StyleMap::new().with("width", "400px"), 100.0, "linear", callback)?;
        ui.advance_time(50)?;
        ui.stop(el);
        let frozen = ui.host().style(el, "width");
        ui.advance_time(200)?;
        assert_eq!(ui.host().style(el, "width"), frozen);
        assert_eq!(done.get(), 0);
        assert_eq!(ui.animation_phase(el), AnimationPhase::Cancelled);

        ui.stop(el);
        Ok(())
    }

    #[test]
    fn stale_handle_cannot_cancel_newer_animation() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        let old = ui
            .animate(el, StyleMap::new().with("opacity", 0), 100.0, "linear", None)?
            .unwrap();
        let new = ui
            .animate(el, StyleMap::new().with("opacity", 1), 100.0, "linear", None)?
            .unwrap();
        assert!(!ui.cancel(old));
        assert!(ui.is_animating(el));
        assert!(ui.cancel(new));
        assert!(!ui.is_animating(el));
        Ok(())
    }

    #[test]
    fn zero_duration_completes_synchronously() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        let (done, callback) = counter();
        ui.animate(el, StyleMap::new().with("margin-top", 12), 0.0, "easeInQuad", callback)?;
        assert_eq!(ui.host().style(el, "margin-top"), "12px");
        assert_eq!(done.get(), 1);
        assert_eq!(ui.host().pending_timers(), 0);
        Ok(())
    }

    #[test]
    fn unit_comes_from_target_text() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        ui.animate(el, StyleMap::new().with("width", "50%"), 10.0, "linear", None)?;
        ui.advance_time(10)?;
        assert_eq!(ui.host().style(el, "width"), "50%");
        Ok(())
    }

    #[test]
    fn unknown_keys_and_easing_degrade() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        let map = StyleMap::new().with("color", "red").with("top", "40px");
        ui.animate(el, map, 100.0, "no-such-curve", None)?;
        ui.advance_time(50)?;
        assert_eq!(ui.host().style(el, "top"), "20px");
        assert_eq!(ui.host().style(el, "color"), "");
        Ok(())
    }

    #[test]
    fn caller_errors_leave_state_untouched() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        ui.animate(el, StyleMap::new().with("left", "80px"), 100.0, "linear", None)?;

        let err = ui
            .animate(el, StyleMap::new().with("left", "auto"), 100.0, "linear", None)
            .unwrap_err();
        assert!(matches!(err, UiError::NonNumericTarget { .. }));

        let err = ui
            .animate(el, StyleMap::new().with("opacity", 0), -5.0, "linear", None)
            .unwrap_err();
        assert_eq!(err, UiError::InvalidDuration(-5.0));

        let err = ui
            .animate(el, StyleMap::new().with("step", 1), 100.0, "linear", None)
            .unwrap_err();
        assert!(matches!(err, UiError::MalformedStyleMap(_)));

        assert!(ui.is_animating(el));
        Ok(())
    }

    #[test]
    fn missing_element_is_a_no_op() -> anyhow::Result<()> {
        let (mut ui, _) = ui_with_box();
        let missing = ui.find("#nope");
        let handle = ui.animate(missing, StyleMap::new().with("opacity", 0), 10.0, "linear", None)?;
        assert!(handle.is_none());
        ui.stop(missing);
        assert_eq!(ui.animation_phase(missing), AnimationPhase::Idle);
        Ok(())
    }

    #[test]
    fn lifecycle_events_are_recorded() -> anyhow::Result<()> {
        let (mut ui, el) = ui_with_box();
        ui.animate(el, StyleMap::new().with("opacity", 0), 20.0, "linear", None)?;
        ui.animate(el, StyleMap::new().with("opacity", 1), 20.0, "linear", None)?;
        ui.advance_time(20)?;
        let kinds: Vec<_> = ui
            .drain_animation_events()
            .into_iter()
            .map(|event| match event {
                AnimationEvent::Started { .. } => "started",
                AnimationEvent::Completed { .. } => "completed",
                AnimationEvent::Cancelled { .. } => "cancelled",
            })
            .collect();
        assert_eq!(kinds, ["started", "cancelled", "started", "completed"]);
        Ok(())
    }
}
