use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::{Context, Result};
use uiq_core::{
    AnimationPhase, ElementId, Easing, HandlerRef, Host, MemoryHost, StyleMap, Ui, on_complete,
};

const PAGE: &str = r#"
<main id="app">
  <ul id="list">
    <li class="item" id="first"><span id="text"><em id="grandchild">one</em></span></li>
    <li class="item" id="second">two</li>
  </ul>
  <div id="box"></div>
</main>
"#;

fn handle(ui: &Ui, selector: &str) -> Result<ElementId> {
    ui.find(selector).with_context(|| format!("missing {selector}"))
}

/// Every registry binding is attached on the host and nothing else is.
fn assert_registry_mirrors_host(ui: &Ui<MemoryHost>) {
    let document = ui.host().document();
    let mut attached = 0;
    for element in ui.host().query_all("*") {
        for binding in ui.bindings(element) {
            assert!(document.has_listener(element, &binding.event_name, binding.listener.id()));
            attached += 1;
        }
        assert_eq!(document.listener_count(element), ui.bindings(element).len());
    }
    assert_eq!(attached, document.total_listener_count());
}

#[test]
fn opacity_fades_linearly_and_completes_once() -> Result<()> {
    let mut ui = Ui::parse(PAGE);
    let el = handle(&ui, "#box")?;
    let completions = Rc::new(Cell::new(0));
    let counter = Rc::clone(&completions);

    ui.animate(
        el,
        StyleMap::new().with("opacity", 0),
        100.0,
        "linear",
        on_complete(move |_, _| counter.set(counter.get() + 1)),
    )?;
    assert_eq!(ui.host().style(el, "opacity"), "1");
    ui.advance_time(50)?;
    assert_eq!(ui.host().style(el, "opacity"), "0.5");
    ui.advance_time(50)?;
    assert_eq!(ui.host().style(el, "opacity"), "0");
    ui.advance_time(1000)?;
    assert_eq!(completions.get(), 1);
    Ok(())
}

#[test]
fn delegated_click_on_grandchild_uses_matching_parent() -> Result<()> {
    let mut ui = Ui::parse(PAGE);
    let list = handle(&ui, "#list")?;
    let contexts = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&contexts);
    ui.delegate(list, "click", ".item", move |_, _, context| sink.borrow_mut().push(context));

    let target = handle(&ui, "#text")?;
    assert_eq!(ui.click(target), 1);
    assert_eq!(*contexts.borrow(), vec![handle(&ui, "#first")?]);

    assert_eq!(ui.click(handle(&ui, "#grandchild")?), 1);
    assert_eq!(contexts.borrow().len(), 2);
    Ok(())
}

#[test]
fn restart_keeps_one_timer_and_drops_first_callback() -> Result<()> {
    let mut ui = Ui::parse(PAGE);
    let el = handle(&ui, "#box")?;
    let first = Rc::new(Cell::new(false));
    let second = Rc::new(Cell::new(false));
    let (f, s) = (Rc::clone(&first), Rc::clone(&second));

    ui.animate(el, StyleMap::new().with("left", "100px"), 200.0, "linear", on_complete(move |_, _| f.set(true)))?;
    ui.advance_time(40)?;
    ui.animate(el, StyleMap::new().with("left", "300px"), 100.0, "easeInQuad", on_complete(move |_, _| s.set(true)))?;
    assert_eq!(ui.host().pending_timers(), 1);

    ui.advance_time(50)?;
    let expected = 20.0 + (300.0 - 20.0) * Easing::EaseInQuad.evaluate(0.5);
    assert_eq!(ui.host().style(el, "left"), format!("{expected}px"));

    ui.run_until_idle()?;
    assert_eq!(ui.host().style(el, "left"), "300px");
    assert!(!first.get());
    assert!(second.get());
    Ok(())
}

#[test]
fn linear_samples_never_decrease() -> Result<()> {
    let mut ui = Ui::parse(PAGE);
    let el = handle(&ui, "#box")?;
    let done = Rc::new(Cell::new(0));
    let counter = Rc::clone(&done);
    ui.animate(
        el,
        StyleMap::new().with("margin-left", 100),
        137.0,
        "linear",
        on_complete(move |_, _| counter.set(counter.get() + 1)),
    )?;

    let mut previous = f64::MIN;
    for _ in 0..30 {
        let text = ui.host().style(el, "margin-left");
        let value: f64 = text.trim_end_matches("px").parse()?;
        assert!(value >= previous, "{value} after {previous}");
        previous = value;
        ui.advance_time(7)?;
    }
    assert_eq!(ui.host().style(el, "margin-left"), "100px");
    assert_eq!(done.get(), 1);
    Ok(())
}

#[test]
fn subtree_unbind_leaves_no_listeners() -> Result<()> {
    let mut ui = Ui::parse(PAGE);
    let noop = HandlerRef::new(|_, _, _| {});
    for selector in ["#app", "#list", "#first", "#text", "#grandchild", "#second", "#box"] {
        ui.bind(ui.find(selector), "click mouseenter", Some(".item"), &noop);
    }
    assert_registry_mirrors_host(&ui);

    let removed = ui.unbind(handle(&ui, "#list")?, None, None, None);
    assert_eq!(removed, 10);
    for selector in ["#list", "#first", "#text", "#grandchild", "#second"] {
        assert_eq!(ui.host().document().listener_count(handle(&ui, selector)?), 0);
    }
    assert_eq!(ui.binding_count(), 4);
    assert_registry_mirrors_host(&ui);
    Ok(())
}

#[test]
fn bind_unbind_sequences_keep_registry_and_host_in_step() -> Result<()> {
    let mut ui = Ui::parse(PAGE);
    let list = handle(&ui, "#list")?;
    let a = HandlerRef::new(|_, _, _| {});
    let b = HandlerRef::new(|_, _, _| {});

    ui.bind(list, "click keyup", None, &a);
    ui.bind(list, "click", Some(".item"), &b);
    ui.bind(list, "mouseleave", Some(".item"), &a);
    assert_registry_mirrors_host(&ui);

    ui.unbind(list, Some("click"), None, Some(&b));
    assert_registry_mirrors_host(&ui);
    ui.unbind(list, Some("mouseleave"), Some(".item"), None);
    assert_registry_mirrors_host(&ui);
    ui.unbind(list, Some("keyup click"), None, None);
    assert_registry_mirrors_host(&ui);
    assert!(ui.bindings(list).is_empty());
    Ok(())
}

#[test]
fn removal_disposes_everything() -> Result<()> {
    let mut ui = Ui::parse(PAGE);
    let app = handle(&ui, "#app")?;
    let el = handle(&ui, "#box")?;
    ui.on(handle(&ui, "#second")?, "click", |_, _, _| {});
    ui.animate(el, StyleMap::new().with("top", "10px"), 100.0, "linear", None)?;
    ui.set_data(el, "state", "busy");

    ui.remove(app);
    assert_eq!(ui.binding_count(), 0);
    assert_eq!(ui.host().document().total_listener_count(), 0);
    assert_eq!(ui.host().pending_timers(), 0);
    assert_eq!(ui.data(el, "state"), None);
    assert_eq!(ui.animation_phase(el), AnimationPhase::Idle);
    assert!(ui.find("#box").is_none());
    Ok(())
}
