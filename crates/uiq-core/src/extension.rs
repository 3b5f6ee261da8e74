//! Named per-element behaviours.
//!
//! An element's extensions are a map from name to callable, looked up by key
//! and invoked with the runtime. Registering a name again replaces it.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use tracing::debug;
use uiq_dom::ElementId;

use crate::host::Host;
use crate::runtime::Ui;
use crate::selection::AsHandle;

/// Callable registered under a name.
pub type Extension<H> = Rc<dyn Fn(&mut Ui<H>, ElementId)>;

pub struct ExtensionRegistry<H: Host> {
    entries: HashMap<ElementId, BTreeMap<String, Extension<H>>>,
}

impl<H: Host> Default for ExtensionRegistry<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H: Host> ExtensionRegistry<H> {
    pub fn insert(&mut self, element: ElementId, name: &str, extension: Extension<H>) {
        self.entries
            .entry(element)
            .or_default()
            .insert(name.to_string(), extension);
    }

    pub fn get(&self, element: ElementId, name: &str) -> Option<Extension<H>> {
        self.entries.get(&element)?.get(name).cloned()
    }

    pub fn names(&self, element: ElementId) -> Vec<&str> {
        self.entries
            .get(&element)
            .map(|named| named.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn remove_element(&mut self, element: ElementId) {
        self.entries.remove(&element);
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H: Host> Ui<H> {
    /// Register `extension` on the element under `name`.
    pub fn extend(
        &mut self,
        target: impl AsHandle,
        name: &str,
        extension: impl Fn(&mut Ui<H>, ElementId) + 'static,
    ) {
        let Some(element) = self.live(target) else {
            return;
        };
        debug!(?element, name, "extension registered");
        self.extensions.insert(element, name, Rc::new(extension));
    }

    pub fn has_extension(&self, target: impl AsHandle, name: &str) -> bool {
        target
            .handle()
            .is_some_and(|element| self.extensions.get(element, name).is_some())
    }

    /// Names registered on the element, sorted.
    pub fn extension_names(&self, target: impl AsHandle) -> Vec<&str> {
        target
            .handle()
            .map(|element| self.extensions.names(element))
            .unwrap_or_default()
    }

    /// Invoke the extension registered under `name`. Returns `false` when
    /// there is none.
    pub fn call_extension(&mut self, target: impl AsHandle, name: &str) -> bool {
        let Some(element) = self.live(target) else {
            return false;
        };
        let Some(extension) = self.extensions.get(element, name) else {
            return false;
        };
        extension(self, element);
        true
    }
}

#[cfg(test)]
mod tests {
    use crate::animation::StyleMap;
    use crate::host::Host;
    use crate::runtime::Ui;

    #[test]
    fn extensions_are_scoped_per_element() -> anyhow::Result<()> {
        let mut ui = Ui::parse(r#"<button id="ok"></button><button id="cancel"></button>"#);
        let ok = ui.find("#ok").unwrap();
        let cancel = ui.find("#cancel").unwrap();

        ui.extend(ok, "pulse", |ui, el| {
            let _ = ui.animate(el, StyleMap::new().with("opacity", 0.5), 0.0, "linear", None);
        });
        ui.extend(ok, "hide", |ui, el| ui.host_mut().set_style(el, "display", "none"));

        assert!(ui.has_extension(ok, "pulse"));
        assert!(!ui.has_extension(cancel, "pulse"));
        assert_eq!(ui.extension_names(ok), ["hide", "pulse"]);

        assert!(ui.call_extension(ok, "pulse"));
        assert_eq!(ui.host().style(ok, "opacity"), "0.5");
        assert!(!ui.call_extension(cancel, "pulse"));
        Ok(())
    }

    #[test]
    fn registering_again_replaces() {
        let mut ui = Ui::parse(r#"<div id="a"></div>"#);
        let a = ui.find("#a").unwrap();
        ui.extend(a, "mark", |ui, el| ui.host_mut().set_style(el, "left", "1px"));
        ui.extend(a, "mark", |ui, el| ui.host_mut().set_style(el, "left", "2px"));
        assert!(ui.call_extension(a, "mark"));
        assert_eq!(ui.host().style(a, "left"), "2px");
    }
}
