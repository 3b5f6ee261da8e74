//! Event name normalization.
//!
//! `mouseenter`/`mouseleave` are rewritten to their bubbling counterparts so
//! they can be delegated. The rewritten events fire on every crossing of a
//! descendant boundary, which the originals do not; callers relying on the
//! non-bubbling semantics get the bubbling ones instead.

const EVENT_ALIASES: &[(&str, &str)] = &[("mouseenter", "mouseover"), ("mouseleave", "mouseout")];

/// Canonical name for `name`. Unknown names pass through verbatim.
pub fn normalize_event_name(name: &str) -> &str {
    EVENT_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, canonical)| canonical)
}

/// Split a space-separated list and normalize every entry.
pub fn split_event_names(names: &str) -> impl Iterator<Item = &str> {
    names.split_whitespace().map(normalize_event_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_enter_and_leave() {
        assert_eq!(normalize_event_name("mouseenter"), "mouseover");
        assert_eq!(normalize_event_name("mouseleave"), "mouseout");
        assert_eq!(normalize_event_name("click"), "click");
        assert_eq!(normalize_event_name("my-custom"), "my-custom");
    }

    #[test]
    fn splits_and_normalizes() {
        let names: Vec<_> = split_event_names("  click mouseenter\tkeyup ").collect();
        assert_eq!(names, vec!["click", "mouseover", "keyup"]);
        assert_eq!(split_event_names("   ").count(), 0);
    }
}
