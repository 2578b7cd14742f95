//! Acquisition-independent view of the page under test
//!
//! Checks only ever see a [`DomSnapshot`]. In the browser it is captured from
//! the popup window; in tests and the native runner it is built by hand or
//! loaded from JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::security::ScriptRef;

/// Computed style properties captured for every element
pub const STYLE_PROPERTIES: [&str; 7] = [
    "background",
    "min-height",
    "padding",
    "border-radius",
    "position",
    "display",
    "scroll-behavior",
];

/// The computed `background` of an element with no background at all
pub const TRANSPARENT_BACKGROUND: &str =
    "rgba(0, 0, 0, 0) none repeat scroll 0% 0% / auto padding-box border-box";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Lowercase tag name
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub computed_style: BTreeMap<String, String>,
    /// Descendant of `#contact-form`
    #[serde(default)]
    pub in_contact_form: bool,
}

impl ElementSnapshot {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.computed_style.insert(property.into(), value.into());
        self
    }

    pub fn in_form(mut self) -> Self {
        self.in_contact_form = true;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Computed style value, empty when not captured
    pub fn style(&self, property: &str) -> &str {
        self.computed_style
            .get(property)
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomSnapshot {
    #[serde(default)]
    pub has_doctype: bool,
    #[serde(default)]
    pub title: String,
    /// `content` of `<meta name="viewport">`
    #[serde(default)]
    pub meta_viewport: Option<String>,
    /// Body elements in document order
    #[serde(default)]
    pub elements: Vec<ElementSnapshot>,
    /// Resolved hrefs of `<link rel="stylesheet">`
    #[serde(default)]
    pub stylesheets: Vec<String>,
    #[serde(default)]
    pub scripts: Vec<ScriptRef>,
    /// Computed style of the `<html>` element
    #[serde(default)]
    pub root_style: BTreeMap<String, String>,
    /// Source of the site stylesheet, `None` if it could not be fetched
    #[serde(default)]
    pub stylesheet_text: Option<String>,
    /// Whether clicking `.nav-toggle` opened `.nav-menu`, if it was tried
    #[serde(default)]
    pub nav_toggle_activates: Option<bool>,
}

impl DomSnapshot {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn by_id(&self, id: &str) -> Option<&ElementSnapshot> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }

    pub fn with_class<'a, 'c>(&'a self, class: &'c str) -> impl Iterator<Item = &'a ElementSnapshot> {
        self.elements.iter().filter(move |e| e.has_class(class))
    }

    pub fn first_with_class(&self, class: &str) -> Option<&ElementSnapshot> {
        self.with_class(class).next()
    }

    pub fn has_contact_form(&self) -> bool {
        self.by_id("contact-form").is_some()
    }

    /// `input` and `textarea` elements inside the contact form
    pub fn contact_form_fields(&self) -> impl Iterator<Item = &ElementSnapshot> {
        self.elements
            .iter()
            .filter(|e| e.in_contact_form && matches!(e.tag.as_str(), "input" | "textarea"))
    }

    /// Contact form descendants carrying `required`
    pub fn contact_form_required(&self) -> impl Iterator<Item = &ElementSnapshot> {
        self.elements
            .iter()
            .filter(|e| e.in_contact_form && e.attributes.contains_key("required"))
    }

    pub fn contact_form_submit_button(&self) -> Option<&ElementSnapshot> {
        self.elements
            .iter()
            .find(|e| e.in_contact_form && e.tag == "button" && e.attr("type") == Some("submit"))
    }

    pub fn root_style(&self, property: &str) -> &str {
        self.root_style
            .get(property)
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queries() {
        let snap = DomSnapshot {
            elements: vec![
                ElementSnapshot::new("form").with_id("contact-form"),
                ElementSnapshot::new("input").with_attr("required", "").in_form(),
                ElementSnapshot::new("textarea").in_form(),
                ElementSnapshot::new("button").with_attr("type", "submit").in_form(),
                ElementSnapshot::new("a").with_class("btn"),
            ],
            ..Default::default()
        };
        assert!(snap.has_contact_form());
        assert_eq!(snap.contact_form_fields().count(), 2);
        assert_eq!(snap.contact_form_required().count(), 1);
        assert!(snap.contact_form_submit_button().is_some());
        assert_eq!(snap.with_class("btn").count(), 1);
        assert_eq!(snap.root_style("scroll-behavior"), "");
    }

    #[test]
    fn test_from_json_defaults() {
        let snap = DomSnapshot::from_json(
            r#"{"title": "Folio", "elements": [{"tag": "section", "id": "home"}]}"#,
        )
        .unwrap();
        assert_eq!(snap.title, "Folio");
        assert!(!snap.has_doctype);
        assert!(snap.by_id("home").is_some());
        assert!(snap.stylesheet_text.is_none());
    }
}
