use std::collections::BTreeMap;

use crate::charts::ChartConfig;

/// Stable handle to an element of a [`Page`](super::Page).
///
/// Handles are never reused, so a handle to a removed element simply stops
/// resolving.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

/// One element of the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub(crate) node: NodeId,
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// `data-*` attributes, keyed without the `data-` prefix.
    pub data: BTreeMap<String, String>,
    pub text: String,
    /// Inline style declarations, keyed by CSS property name.
    pub style: BTreeMap<String, String>,
    /// Chart drawn onto this element, if it is a canvas that has been drawn.
    pub chart: Option<ChartConfig>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }

    /// Add every whitespace-separated class in `classes`.
    pub fn with_classes(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class unless it is already present.
    pub fn add_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
    }

    /// The `class` attribute value.
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    /// A `data-*` attribute, treating an empty value as absent.
    pub fn dataset(&self, key: &str) -> Option<&str> {
        self.data
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.style.insert(property.to_string(), value.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes_are_deduplicated() {
        let el = Element::new("div").with_classes("card card  shadow").with_class("shadow");
        assert_eq!(el.class_name(), "card shadow");
    }

    #[test]
    fn empty_data_attribute_reads_as_absent() {
        let el = Element::new("span")
            .with_data("value", "")
            .with_data("width", "40%");
        assert_eq!(el.dataset("value"), None);
        assert_eq!(el.dataset("width"), Some("40%"));
        assert_eq!(el.dataset("color"), None);
    }

    #[test]
    fn inline_style_roundtrip() {
        let mut el = Element::new("div");
        el.set_style("width", "75%");
        assert_eq!(el.style("width"), Some("75%"));
        assert_eq!(el.style("border"), None);
    }
}
