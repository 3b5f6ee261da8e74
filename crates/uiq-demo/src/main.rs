use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use uiq_config::UiqConfig;
use uiq_core::{AnimationEvent, Host, MemoryHost, StyleMap, Ui, on_complete};

const DEMO_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <body>
    <nav id="menu">
      <a class="item" id="home"><span class="label">Home</span></a>
      <a class="item" id="docs"><span class="label">Docs</span></a>
      <a class="muted" id="about"><span class="label">About</span></a>
    </nav>
    <div id="box" style="opacity: 1; left: 0px"></div>
    <div id="panel" hidden><p>Details</p></div>
  </body>
</html>
"#;

fn main() -> Result<()> {
    let config = UiqConfig::load();
    init_logging(&config);

    let document_path = std::env::args().nth(1).map(PathBuf::from).or(config.demo.document.clone());
    let html = match &document_path {
        Some(path) => read_document(path)?,
        None => DEMO_PAGE.to_string(),
    };
    log::info!(
        "uiq-demo: document={} tick={}ms slide_easing={}",
        document_path
            .as_deref()
            .map_or("<built-in>".to_string(), |p| p.display().to_string()),
        config.animation.tick_interval_ms,
        config.animation.slide_easing
    );

    let mut ui = Ui::with_config(MemoryHost::parse(&html), &config);
    let duration_ms = config.demo.duration_ms;

    delegation(&mut ui);
    animation(&mut ui, duration_ms)?;
    slide(&mut ui, duration_ms)?;

    for event in ui.drain_animation_events() {
        let kind = match event {
            AnimationEvent::Started { .. } => "started",
            AnimationEvent::Completed { .. } => "completed",
            AnimationEvent::Cancelled { .. } => "cancelled",
        };
        println!("event  #{:<3} {kind:<9} at {}ms", event.animation_id().0, event.at_ms());
    }
    Ok(())
}

/// `RUST_LOG` wins; otherwise the configured filter applies.
fn init_logging(config: &UiqConfig) {
    let env = env_logger::Env::default().default_filter_or(config.logging.filter.as_str());
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn read_document(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn delegation(ui: &mut Ui) {
    let Some(menu) = ui.find("#menu") else {
        log::warn!("uiq-demo: no #menu in document, skipping delegation");
        return;
    };
    let clicks = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&clicks);
    ui.delegate(menu, "click", ".item", move |ui, _, item| {
        let label = ui.host().document().text(item).trim().to_string();
        sink.borrow_mut().push(label);
    });

    for selector in ["#home .label", "#docs .label", "#about .label"] {
        let invoked = ui.query(selector).first().map_or(0, |target| ui.click(target));
        println!("click  {selector:<14} -> {invoked} handler(s)");
    }
    println!("menu   delegated matches: {:?}", clicks.borrow());

    let removed = ui.unbind(menu, None, None, None);
    println!("unbind #menu subtree removed {removed} binding(s)");
}

fn animation(ui: &mut Ui, duration_ms: f64) -> Result<()> {
    let Some(target) = ui.find("#box") else {
        return Ok(());
    };
    let finished = Rc::new(RefCell::new(false));
    let flag = Rc::clone(&finished);
    ui.animate(
        target,
        StyleMap::new().with("opacity", 0).with("left", "120px"),
        duration_ms,
        "easeInOutQuad",
        on_complete(move |_, _| *flag.borrow_mut() = true),
    )?;

    let step = (duration_ms / 4.0).max(1.0) as u64;
    for _ in 0..5 {
        println!(
            "box    t={:>4}ms opacity={:<20} left={}",
            ui.host().now(),
            ui.host().style(target, "opacity"),
            ui.host().style(target, "left")
        );
        ui.advance_time(step)?;
    }
    ui.run_until_idle()?;
    println!("box    completed={}", finished.borrow());
    Ok(())
}

fn slide(ui: &mut Ui, duration_ms: f64) -> Result<()> {
    let Some(panel) = ui.find("#panel") else {
        return Ok(());
    };
    ui.host_mut().document_mut().set_natural_size(panel, 320.0, 180.0);
    for _ in 0..2 {
        ui.slide_toggle(panel, duration_ms, None)?;
        ui.advance_time((duration_ms / 2.0) as u64)?;
        println!("panel  mid-slide height={}", ui.host().style(panel, "height"));
        ui.run_until_idle()?;
        println!("panel  display={}", ui.host().style(panel, "display"));
    }
    Ok(())
}
