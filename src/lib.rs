//! uiquery: delegated event binding and timer-driven style animation over an
//! element tree.
//!
//! ```
//! use uiquery::{Host, StyleMap, Ui};
//!
//! let mut ui = Ui::parse(r#"<ul id="menu"><li class="item"><b>One</b></li></ul>"#);
//! let menu = ui.find("#menu");
//! ui.delegate(menu, "click", ".item", |ui, _, item| {
//!     ui.host_mut().set_style(item, "opacity", "0.5");
//! });
//! ui.click(ui.find("b"));
//!
//! ui.animate(menu, StyleMap::new().with("left", "100px"), 100.0, "easeOutQuad", None)
//!     .unwrap();
//! ui.advance_time(100).unwrap();
//! assert_eq!(ui.host().style(menu.unwrap(), "left"), "100px");
//! ```

pub use uiq_config::{AnimationConfig, CONFIG_FILE_NAME, DemoConfig, LoggingConfig, UiqConfig};
pub use uiq_core::*;
pub use uiq_dom::{StyleDeclarations, TimerQueue, parse_style_attribute};

pub mod dom {
    //! The in-memory host tree.
    pub use uiq_dom::*;
}
