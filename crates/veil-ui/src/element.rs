use std::collections::{BTreeMap, BTreeSet};

use veil_engine::coords::Rect;

/// Layout display mode of an element.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Display {
    #[default]
    Block,
    Inline,
    Other,
}

// ── Element trait ─────────────────────────────────────────────────────────

/// The visual element a spoiler is bound to.
///
/// The controller only reads layout and writes presentation attributes; it
/// never creates or destroys the element. Markers are boolean flags (class
/// names on a DOM node), properties are string key/value pairs (custom style
/// properties such as `--t`).
pub trait Element {
    fn add_marker(&mut self, marker: &str);
    fn remove_marker(&mut self, marker: &str);
    fn has_marker(&self, marker: &str) -> bool;

    fn set_property(&mut self, name: &str, value: &str);
    fn remove_property(&mut self, name: &str);
    fn property(&self, name: &str) -> Option<&str>;

    fn display(&self) -> Display;

    /// Layout boxes, one per line fragment for inline content.
    fn fragments(&self) -> Vec<Rect>;
}

impl<E: Element + ?Sized> Element for &mut E {
    fn add_marker(&mut self, marker: &str) { (**self).add_marker(marker) }
    fn remove_marker(&mut self, marker: &str) { (**self).remove_marker(marker) }
    fn has_marker(&self, marker: &str) -> bool { (**self).has_marker(marker) }
    fn set_property(&mut self, name: &str, value: &str) { (**self).set_property(name, value) }
    fn remove_property(&mut self, name: &str) { (**self).remove_property(name) }
    fn property(&self, name: &str) -> Option<&str> { (**self).property(name) }
    fn display(&self) -> Display { (**self).display() }
    fn fragments(&self) -> Vec<Rect> { (**self).fragments() }
}

// ── MemoryElement ─────────────────────────────────────────────────────────

/// In-memory element.
///
/// Counts every write that actually changed state, so callers can check that
/// redundant operations leave the element untouched.
#[derive(Debug, Clone, Default)]
pub struct MemoryElement {
    display: Display,
    fragments: Vec<Rect>,
    markers: BTreeSet<String>,
    properties: BTreeMap<String, String>,
    mutations: u64,
}

impl MemoryElement {
    pub fn new(display: Display) -> Self {
        Self { display, ..Self::default() }
    }

    pub fn fragment(mut self, rect: Rect) -> Self {
        self.fragments.push(rect);
        self
    }

    pub fn set_display(&mut self, display: Display) {
        self.display = display;
    }

    /// Replaces the layout boxes, e.g. after the host re-laid the element out.
    pub fn set_fragments(&mut self, fragments: Vec<Rect>) {
        self.fragments = fragments;
    }

    #[inline]
    pub fn mutations(&self) -> u64 {
        self.mutations
    }
}

impl Element for MemoryElement {
    fn add_marker(&mut self, marker: &str) {
        if self.markers.insert(marker.to_string()) {
            self.mutations += 1;
        }
    }

    fn remove_marker(&mut self, marker: &str) {
        if self.markers.remove(marker) {
            self.mutations += 1;
        }
    }

    fn has_marker(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    fn set_property(&mut self, name: &str, value: &str) {
        if self.properties.get(name).map(String::as_str) != Some(value) {
            self.properties.insert(name.to_string(), value.to_string());
            self.mutations += 1;
        }
    }

    fn remove_property(&mut self, name: &str) {
        if self.properties.remove(name).is_some() {
            self.mutations += 1;
        }
    }

    fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    fn display(&self) -> Display {
        self.display
    }

    fn fragments(&self) -> Vec<Rect> {
        self.fragments.clone()
    }
}
