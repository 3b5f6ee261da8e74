//! The toolkit runtime.
//!
//! [`Ui`] owns the host and every per-element side table: event bindings,
//! running animations, the data bag and extensions. State for an element is
//! dropped when the element is disposed through [`Ui::remove`].

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, trace};
use uiq_config::{AnimationConfig, UiqConfig};
use uiq_dom::ElementId;

use crate::animation::{
    AnimationEvent, AnimationEventQueue, AnimationPhase, AnimationState, Easing,
};
use crate::error::{Result, UiError};
use crate::events::EventRegistry;
use crate::extension::ExtensionRegistry;
use crate::host::{Host, MemoryHost, TimerTask};
use crate::selection::{AsHandle, Selection, SelectionInput};

/// Engine settings resolved from [`AnimationConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Settings {
    pub tick_interval_ms: u64,
    pub slide_easing: Easing,
    pub max_timer_steps: usize,
    pub max_lifecycle_events: usize,
}

impl From<&AnimationConfig> for Settings {
    fn from(config: &AnimationConfig) -> Self {
        Self {
            tick_interval_ms: config.tick_interval_ms.max(1),
            slide_easing: Easing::from_name(&config.slide_easing),
            max_timer_steps: config.max_timer_steps,
            max_lifecycle_events: config.max_lifecycle_events,
        }
    }
}

pub struct Ui<H: Host = MemoryHost> {
    pub(crate) host: H,
    pub(crate) settings: Settings,
    pub(crate) registry: EventRegistry<H>,
    pub(crate) animations: HashMap<ElementId, AnimationState<H>>,
    pub(crate) outcomes: HashMap<ElementId, AnimationPhase>,
    pub(crate) animation_events: AnimationEventQueue,
    pub(crate) extensions: ExtensionRegistry<H>,
    data: HashMap<ElementId, BTreeMap<String, String>>,
}

impl Ui<MemoryHost> {
    /// Runtime over an in-memory document parsed from `html`.
    pub fn parse(html: &str) -> Self {
        Self::new(MemoryHost::parse(html))
    }
}

impl<H: Host> Ui<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, &UiqConfig::default())
    }

    pub fn with_config(host: H, config: &UiqConfig) -> Self {
        let settings = Settings::from(&config.animation);
        debug!(
            tick_interval_ms = settings.tick_interval_ms,
            slide_easing = settings.slide_easing.name(),
            max_timer_steps = settings.max_timer_steps,
            "runtime created"
        );
        Self {
            host,
            settings,
            registry: EventRegistry::new(),
            animations: HashMap::new(),
            outcomes: HashMap::new(),
            animation_events: AnimationEventQueue::with_capacity(settings.max_lifecycle_events),
            extensions: ExtensionRegistry::default(),
            data: HashMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.settings.tick_interval_ms
    }

    pub fn slide_easing(&self) -> Easing {
        self.settings.slide_easing
    }

    /// The handle `target` names, if it is still a live element.
    pub(crate) fn live(&self, target: impl AsHandle) -> Option<ElementId> {
        target.handle().filter(|element| self.host.contains(*element))
    }

    // ========================================================================
    // Selection
    // ========================================================================

    /// Resolve a selector, markup, or existing handles into a selection.
    ///
    /// Text starting with `<` (after trimming) is parsed as markup and
    /// yields one new detached element. Dead handles are dropped.
    pub fn query(&mut self, input: impl Into<SelectionInput>) -> Selection {
        match input.into() {
            SelectionInput::Selector(text) => {
                let text = text.trim();
                if text.starts_with('<') {
                    let created = self.host.create_element(text);
                    Selection::from_nodes(created.into_iter().collect())
                } else {
                    Selection::from_nodes(self.host.query_all(text))
                }
            }
            SelectionInput::Handles(handles) => Selection::from_nodes(
                handles
                    .into_iter()
                    .filter(|element| self.host.contains(*element))
                    .collect(),
            ),
            SelectionInput::Single(element) => {
                Selection::from_nodes(self.live(element).into_iter().collect())
            }
        }
    }

    /// First element matching `selector`.
    pub fn find(&self, selector: &str) -> Option<ElementId> {
        self.host.query_one(selector)
    }

    /// Descendants of `scope` matching `selector`.
    pub fn find_within(&self, scope: impl AsHandle, selector: &str) -> Selection {
        match self.live(scope) {
            Some(scope) => Selection::from_nodes(self.host.query_within(scope, selector)),
            None => Selection::empty(),
        }
    }

    // ========================================================================
    // Timers
    // ========================================================================

    /// Move the clock forward by `delta_ms`, running every timer that falls
    /// due on the way. Returns how many ran.
    pub fn advance_time(&mut self, delta_ms: u64) -> Result<usize> {
        let until = self.host.now().saturating_add(delta_ms);
        self.advance_time_to(until)
    }

    /// Run timers due at or before `until_ms`, then leave the clock there.
    ///
    /// # Errors
    ///
    /// [`UiError::TimerStepLimit`] once more timers than the configured
    /// limit would run in this call. Timers that already ran stay applied.
    pub fn advance_time_to(&mut self, until_ms: u64) -> Result<usize> {
        let mut steps = 0;
        self.run_timers(until_ms, &mut steps)?;
        self.host.advance_clock(until_ms);
        trace!(now = until_ms, steps, "clock advanced");
        Ok(steps)
    }

    /// Run the timers already due without moving the clock.
    pub fn run_due_timers(&mut self) -> Result<usize> {
        let now = self.host.now();
        self.advance_time_to(now)
    }

    /// Run timers until none are pending.
    ///
    /// # Errors
    ///
    /// [`UiError::TimerStepLimit`] when the whole run needs more timers than
    /// the configured limit, e.g. a completion callback that keeps
    /// restarting its own animation.
    pub fn run_until_idle(&mut self) -> Result<usize> {
        let mut steps = 0;
        while let Some(due) = self.host.next_due_at() {
            self.run_timers(due, &mut steps)?;
            self.host.advance_clock(due);
        }
        trace!(now = self.host.now(), steps, "timers idle");
        Ok(steps)
    }

    /// Run timers due at or before `until_ms`, counting into `steps`.
    fn run_timers(&mut self, until_ms: u64, steps: &mut usize) -> Result<()> {
        let limit = self.settings.max_timer_steps;
        while self.host.next_due_at().is_some_and(|due| due <= until_ms) {
            if *steps >= limit {
                return Err(UiError::TimerStepLimit { limit });
            }
            let Some(task) = self.host.next_due(until_ms) else {
                break;
            };
            self.run_timer(task);
            *steps += 1;
        }
        Ok(())
    }

    fn run_timer(&mut self, task: TimerTask) {
        match task {
            TimerTask::AnimationTick { element, animation } => self.run_tick(element, animation),
        }
    }

    /// Lifecycle events recorded since the last drain.
    pub fn drain_animation_events(&mut self) -> Vec<AnimationEvent> {
        self.animation_events.drain().collect()
    }

    // ========================================================================
    // Disposal
    // ========================================================================

    /// Dispose of an element and its subtree: unbind every binding, cancel
    /// animations, drop data and extensions, then remove it from the host.
    pub fn remove(&mut self, target: impl AsHandle) {
        let Some(element) = self.live(target) else {
            return;
        };
        let unbound = self.unbind(element, None, None, None);
        let mut subtree = Vec::new();
        self.collect_subtree(element, &mut subtree);
        for &node in &subtree {
            self.stop_element(node);
            self.outcomes.remove(&node);
            self.data.remove(&node);
            self.extensions.remove_element(node);
        }
        self.host.remove_element(element);
        debug!(?element, nodes = subtree.len(), unbound, "element removed");
    }

    fn collect_subtree(&self, element: ElementId, out: &mut Vec<ElementId>) {
        out.push(element);
        for child in self.host.children(element) {
            self.collect_subtree(child, out);
        }
    }

    // ========================================================================
    // Data bag
    // ========================================================================

    pub fn set_data(&mut self, target: impl AsHandle, key: &str, value: impl Into<String>) {
        if let Some(element) = self.live(target) {
            self.data
                .entry(element)
                .or_default()
                .insert(key.to_string(), value.into());
        }
    }

    pub fn data(&self, target: impl AsHandle, key: &str) -> Option<&str> {
        let element = target.handle()?;
        self.data.get(&element)?.get(key).map(String::as_str)
    }

    /// Remove one key, or the element's whole bag when `key` is `None`.
    pub fn remove_data(&mut self, target: impl AsHandle, key: Option<&str>) {
        let Some(element) = target.handle() else {
            return;
        };
        match key {
            Some(key) => {
                if let Some(bag) = self.data.get_mut(&element) {
                    bag.remove(key);
                    if bag.is_empty() {
                        self.data.remove(&element);
                    }
                }
            }
            None => {
                self.data.remove(&element);
            }
        }
    }

    // ========================================================================
    // Focus
    // ========================================================================

    pub fn focus(&mut self, target: impl AsHandle) {
        if let Some(element) = self.live(target) {
            self.host.focus(element);
        }
    }
}

impl<H: Host + std::fmt::Debug> std::fmt::Debug for Ui<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ui")
            .field("host", &self.host)
            .field("settings", &self.settings)
            .field("bindings", &self.registry.total())
            .field("animations", &self.animations.len())
            .field("extensions", &self.extensions.len())
            .field("data", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{StyleMap, on_complete};
    use crate::events::HandlerRef;

    const PAGE: &str = r#"
        <section id="panel">
            <ul id="menu"><li class="entry" id="a">A</li><li class="entry" id="b">B</li></ul>
        </section>
        <footer id="foot"></footer>
    "#;

    #[test]
    fn query_resolves_every_input_form() {
        let mut ui = Ui::parse(PAGE);
        let entries = ui.query(".entry");
        assert_eq!(entries.len(), 2);

        let a = entries.first().unwrap();
        assert_eq!(ui.query(a).as_slice(), &[a]);
        assert_eq!(ui.query(vec![a, a]).len(), 1);
        assert!(ui.query("#nothing").is_empty());
        assert!(ui.query("p[").is_empty());

        let created = ui.query("  <p class=\"note\">hi</p>");
        assert_eq!(created.len(), 1);
        assert!(ui.host().matches(created.first().unwrap(), "p.note"));
        assert_eq!(ui.find_within(ui.find("#menu"), "li").len(), 2);
    }

    #[test]
    fn advance_time_runs_timers_in_order() -> anyhow::Result<()> {
        let mut ui = Ui::parse(PAGE);
        let foot = ui.find("#foot");
        ui.animate(foot, StyleMap::new().with("left", "30px"), 30.0, "linear", None)?;
        assert_eq!(ui.advance_time(25)?, 2);
        assert_eq!(ui.host().now(), 25);
        assert_eq!(ui.run_until_idle()?, 1);
        assert_eq!(ui.host().now(), 30);
        assert_eq!(ui.run_due_timers()?, 0);
        Ok(())
    }

    #[test]
    fn step_limit_is_reported() -> anyhow::Result<()> {
        let mut config = UiqConfig::default();
        config.animation.max_timer_steps = 3;
        let mut ui = Ui::with_config(MemoryHost::parse(PAGE), &config);
        let foot = ui.find("#foot");
        ui.animate(foot, StyleMap::new().with("top", "10px"), 1000.0, "linear", None)?;
        let err = ui.advance_time(1000).unwrap_err();
        assert_eq!(err, UiError::TimerStepLimit { limit: 3 });
        assert_eq!(ui.host().style(foot.unwrap(), "top"), "0.3px");
        Ok(())
    }

    #[test]
    fn run_until_idle_shares_one_step_budget() -> anyhow::Result<()> {
        let mut config = UiqConfig::default();
        config.animation.max_timer_steps = 5;
        let mut ui = Ui::with_config(MemoryHost::parse(PAGE), &config);
        let foot = ui.find("#foot");
        ui.animate(foot, StyleMap::new().with("left", "100px"), 100.0, "linear", None)?;
        assert_eq!(
            ui.run_until_idle().unwrap_err(),
            UiError::TimerStepLimit { limit: 5 }
        );
        assert_eq!(ui.host().now(), 50);
        assert_eq!(ui.host().style(foot.unwrap(), "left"), "50px");
        Ok(())
    }

    #[test]
    fn self_restarting_animation_hits_step_limit() -> anyhow::Result<()> {
        fn pulse(ui: &mut Ui, element: ElementId) {
            let target = if ui.host().style(element, "opacity") == "0" { 1 } else { 0 };
            let _ = ui.animate(
                element,
                StyleMap::new().with("opacity", target),
                20.0,
                "linear",
                on_complete(pulse),
            );
        }

        let mut config = UiqConfig::default();
        config.animation.max_timer_steps = 50;
        let mut ui = Ui::with_config(MemoryHost::parse(PAGE), &config);
        let foot = ui.find("#foot").unwrap();
        pulse(&mut ui, foot);
        assert_eq!(
            ui.run_until_idle().unwrap_err(),
            UiError::TimerStepLimit { limit: 50 }
        );
        assert!(ui.is_animating(foot));
        Ok(())
    }

    #[test]
    fn undrained_lifecycle_events_are_bounded() -> anyhow::Result<()> {
        let mut config = UiqConfig::default();
        config.animation.max_lifecycle_events = 8;
        let mut ui = Ui::with_config(MemoryHost::parse(PAGE), &config);
        let foot = ui.find("#foot");
        for _ in 0..1000 {
            ui.animate(foot, StyleMap::new().with("opacity", 0), 0.0, "linear", None)?;
        }
        let events = ui.drain_animation_events();
        assert_eq!(events.len(), 8);
        assert!(events.last().is_some_and(AnimationEvent::is_completed));
        Ok(())
    }

    #[test]
    fn configured_tick_interval_is_used() -> anyhow::Result<()> {
        let mut config = UiqConfig::default();
        config.animation.tick_interval_ms = 25;
        config.animation.slide_easing = "easeInQuad".into();
        let mut ui = Ui::with_config(MemoryHost::parse(PAGE), &config);
        assert_eq!(ui.slide_easing(), Easing::EaseInQuad);

        let foot = ui.find("#foot");
        ui.animate(foot, StyleMap::new().with("left", "100px"), 100.0, "linear", None)?;
        assert_eq!(ui.advance_time(100)?, 4);
        Ok(())
    }

    #[test]
    fn remove_disposes_subtree_state() -> anyhow::Result<()> {
        let mut ui = Ui::parse(PAGE);
        let panel = ui.find("#panel").unwrap();
        let a = ui.find("#a").unwrap();
        let foot = ui.find("#foot").unwrap();
        let noop = HandlerRef::new(|_, _, _| {});

        ui.bind(panel, "click", Some(".entry"), &noop);
        ui.bind(a, "keyup", None, &noop);
        ui.bind(foot, "click", None, &noop);
        ui.animate(a, StyleMap::new().with("opacity", 0), 100.0, "linear", None)?;
        ui.set_data(a, "role", "first");
        ui.extend(a, "noop", |_, _| {});

        ui.remove(panel);

        assert!(!ui.host().contains(panel));
        assert!(!ui.host().contains(a));
        assert!(!ui.is_animating(a));
        assert_eq!(ui.data(a, "role"), None);
        assert!(!ui.has_extension(a, "noop"));
        assert_eq!(ui.binding_count(), 1);
        assert_eq!(ui.host().document().total_listener_count(), 1);
        assert_eq!(ui.host().pending_timers(), 0);

        ui.bind(a, "click", None, &noop);
        assert_eq!(ui.binding_count(), 1);
        Ok(())
    }

    #[test]
    fn data_bag_round_trip() {
        let mut ui = Ui::parse(PAGE);
        let a = ui.find("#a");
        ui.set_data(a, "id", "42");
        ui.set_data(a, "kind", "row");
        assert_eq!(ui.data(a, "id"), Some("42"));
        ui.remove_data(a, Some("id"));
        assert_eq!(ui.data(a, "id"), None);
        assert_eq!(ui.data(a, "kind"), Some("row"));
        ui.remove_data(a, None);
        assert_eq!(ui.data(a, "kind"), None);
    }

    #[test]
    fn focus_reaches_host() {
        let mut ui = Ui::parse(PAGE);
        let b = ui.find("#b");
        ui.focus(b);
        assert_eq!(ui.host().document().focused(), b);
    }
}
