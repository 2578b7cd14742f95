//! The fixed, ordered list of page checks
//!
//! Each check is a plain function from a snapshot to an outcome. None of
//! them depends on another's result.

use fancy_regex::Regex;
use std::sync::OnceLock;

use super::error::HarnessError;
use super::record::{Category, CheckOutcome};
use super::snapshot::{DomSnapshot, TRANSPARENT_BACKGROUND};

pub type CheckFn = fn(&DomSnapshot) -> Result<CheckOutcome, HarnessError>;

/// Section ids every page must have, in display order
pub const ESSENTIAL_SECTIONS: [&str; 5] = ["home", "about", "services", "portfolio", "contact"];

/// Minimum `.nav-link` count for a complete navbar
const MIN_NAV_LINKS: usize = 4;
/// Hero must be taller than this (px)
const HERO_MIN_HEIGHT_PX: i64 = 500;
/// Contact form needs at least this many inputs
const MIN_FORM_FIELDS: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub category: Category,
    pub run: CheckFn,
}

impl Check {
    pub const fn new(name: &'static str, category: Category, run: CheckFn) -> Self {
        Self {
            name,
            category,
            run,
        }
    }
}

/// Every check, in run order
pub fn standard_checks() -> Vec<Check> {
    vec![
        Check::new("HTML Document Structure", Category::Html, document_structure),
        Check::new("Navigation Elements", Category::Html, navigation_elements),
        Check::new("Essential Sections", Category::Html, essential_sections),
        Check::new("External Stylesheets", Category::Css, external_stylesheets),
        Check::new("Hero Section Styling", Category::Css, hero_styling),
        Check::new("Button Styling", Category::Css, button_styling),
        Check::new("External Scripts", Category::Js, external_scripts),
        Check::new("Mobile Navigation Toggle", Category::Js, mobile_nav_toggle),
        Check::new("Smooth Scrolling", Category::Js, smooth_scrolling),
        Check::new("Viewport Meta Tag", Category::Responsive, viewport_meta),
        Check::new("CSS Media Queries", Category::Responsive, media_queries),
        Check::new("Mobile Menu Responsiveness", Category::Responsive, mobile_menu_responsive),
        Check::new("Navigation Links", Category::Navigation, navigation_links),
        Check::new("Fixed Navigation", Category::Navigation, fixed_navigation),
        Check::new("Contact Form Existence", Category::Form, contact_form_exists),
        Check::new("Required Field Validation", Category::Form, required_fields),
        Check::new("Form Submit Handler", Category::Form, submit_handler),
    ]
}

/// `parseInt`-style leading integer, `None` if there are no digits
fn leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn media_query_pattern() -> Result<&'static Regex, HarnessError> {
    static CELL: OnceLock<Result<Regex, String>> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"@media[^{]+\{").map_err(|e| e.to_string()))
        .as_ref()
        .map_err(|e| HarnessError::Pattern(e.clone()))
}

pub fn document_structure(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    if doc.has_doctype && !doc.title.is_empty() && doc.meta_viewport.is_some() {
        Ok(CheckOutcome::pass(
            "HTML structure is valid with proper DOCTYPE, title, and viewport meta tag",
        ))
    } else {
        Ok(CheckOutcome::fail("Missing required HTML elements"))
    }
}

pub fn navigation_elements(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let navbar = doc.first_with_class("navbar");
    let links = doc.with_class("nav-link").count();
    let toggle = doc.first_with_class("nav-toggle");

    if navbar.is_some() && links >= MIN_NAV_LINKS && toggle.is_some() {
        Ok(CheckOutcome::pass(format!(
            "Found navbar with {} navigation links and mobile toggle",
            links
        )))
    } else {
        Ok(CheckOutcome::fail("Navigation elements missing or incomplete"))
    }
}

pub fn essential_sections(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let missing: Vec<&str> = ESSENTIAL_SECTIONS
        .iter()
        .copied()
        .filter(|id| doc.by_id(id).is_none())
        .collect();

    if missing.is_empty() {
        Ok(CheckOutcome::pass(format!(
            "All required sections found ({})",
            ESSENTIAL_SECTIONS.join(", ")
        )))
    } else {
        Ok(CheckOutcome::fail(format!(
            "Missing sections: {}",
            missing.join(", ")
        )))
    }
}

pub fn external_stylesheets(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let has_local = doc.stylesheets.iter().any(|h| h.contains("style.css"));
    let has_fonts = doc
        .stylesheets
        .iter()
        .any(|h| h.contains("fonts.googleapis.com"));

    if has_local && has_fonts {
        Ok(CheckOutcome::pass("Local CSS and Google Fonts properly loaded"))
    } else {
        Ok(CheckOutcome::warning("Some stylesheets may be missing"))
    }
}

pub fn hero_styling(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let Some(hero) = doc.first_with_class("hero") else {
        return Ok(CheckOutcome::fail("Hero section not found"));
    };

    let has_background = hero.style("background") != TRANSPARENT_BACKGROUND;
    let tall_enough = leading_int(hero.style("min-height")).is_some_and(|h| h > HERO_MIN_HEIGHT_PX);

    if has_background && tall_enough {
        Ok(CheckOutcome::pass(
            "Hero section has proper background and minimum height",
        ))
    } else {
        Ok(CheckOutcome::warning(
            "Hero section styling may need improvements",
        ))
    }
}

pub fn button_styling(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let total = doc.with_class("btn").count();
    if total == 0 {
        return Ok(CheckOutcome::fail("No buttons found"));
    }

    let styled = doc
        .with_class("btn")
        .filter(|b| b.style("padding") != "0px" && b.style("border-radius") != "0px")
        .count();

    if styled == total {
        Ok(CheckOutcome::pass(format!(
            "All {} buttons are properly styled",
            total
        )))
    } else {
        Ok(CheckOutcome::warning(format!(
            "{}/{} buttons are properly styled",
            styled, total
        )))
    }
}

pub fn external_scripts(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    if doc.scripts.iter().any(|s| s.src.contains("script.js")) {
        Ok(CheckOutcome::pass("Main JavaScript file is properly loaded"))
    } else {
        Ok(CheckOutcome::fail("Main JavaScript file not found"))
    }
}

pub fn mobile_nav_toggle(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    if doc.first_with_class("nav-toggle").is_none() || doc.first_with_class("nav-menu").is_none() {
        return Ok(CheckOutcome::fail("Navigation elements not found"));
    }

    match doc.nav_toggle_activates {
        Some(false) => Ok(CheckOutcome::warning(
            "Navigation menu did not open when the toggle was clicked",
        )),
        _ => Ok(CheckOutcome::pass(
            "Mobile navigation toggle functionality works",
        )),
    }
}

pub fn smooth_scrolling(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let internal_links = doc
        .with_class("nav-link")
        .filter(|l| l.attr("href").is_some_and(|h| h.starts_with('#')))
        .count();

    if internal_links == 0 {
        return Ok(CheckOutcome::fail("No internal navigation links found"));
    }

    if doc.root_style("scroll-behavior") == "smooth" {
        Ok(CheckOutcome::pass("Smooth scrolling is enabled"))
    } else {
        Ok(CheckOutcome::warning(
            "Smooth scrolling may not be working properly",
        ))
    }
}

pub fn viewport_meta(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    match doc.meta_viewport.as_deref() {
        Some(content) if content.contains("width=device-width") => {
            Ok(CheckOutcome::pass("Proper viewport meta tag found"))
        }
        _ => Ok(CheckOutcome::fail("Viewport meta tag missing or incorrect")),
    }
}

pub fn media_queries(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let Some(css) = doc.stylesheet_text.as_deref() else {
        return Ok(CheckOutcome::fail("Could not fetch CSS file"));
    };

    let mut count = 0;
    for found in media_query_pattern()?.find_iter(css) {
        found?;
        count += 1;
    }

    if count > 0 {
        Ok(CheckOutcome::pass(format!(
            "Found {} media queries for responsive design",
            count
        )))
    } else {
        Ok(CheckOutcome::warning("No media queries found in CSS"))
    }
}

pub fn mobile_menu_responsive(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    if doc.first_with_class("nav-toggle").is_some() {
        Ok(CheckOutcome::pass(
            "Mobile navigation toggle is properly configured",
        ))
    } else {
        Ok(CheckOutcome::fail("Mobile navigation toggle not found"))
    }
}

pub fn navigation_links(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let total = doc.with_class("nav-link").count();
    let valid = doc
        .with_class("nav-link")
        .filter_map(|l| l.attr("href"))
        .filter_map(|h| h.strip_prefix('#'))
        .filter(|id| doc.by_id(id).is_some())
        .count();

    if total > 0 && valid == total {
        Ok(CheckOutcome::pass(format!(
            "All {} navigation links point to valid sections",
            total
        )))
    } else {
        Ok(CheckOutcome::fail(format!(
            "{}/{} navigation links are valid",
            valid, total
        )))
    }
}

pub fn fixed_navigation(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    let Some(navbar) = doc.first_with_class("navbar") else {
        return Ok(CheckOutcome::fail("Navigation bar not found"));
    };

    if navbar.style("position") == "fixed" {
        Ok(CheckOutcome::pass("Navigation bar is properly fixed to top"))
    } else {
        Ok(CheckOutcome::warning("Navigation bar is not fixed positioned"))
    }
}

pub fn contact_form_exists(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    if !doc.has_contact_form() {
        return Ok(CheckOutcome::fail("Contact form not found"));
    }

    let fields = doc.contact_form_fields().count();
    if fields >= MIN_FORM_FIELDS {
        Ok(CheckOutcome::pass(format!(
            "Contact form found with {} input fields",
            fields
        )))
    } else {
        Ok(CheckOutcome::warning(
            "Contact form has insufficient input fields",
        ))
    }
}

pub fn required_fields(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    if !doc.has_contact_form() {
        return Ok(CheckOutcome::fail("Contact form not found"));
    }

    let required = doc.contact_form_required().count();
    if required > 0 {
        Ok(CheckOutcome::pass(format!(
            "{} required fields found with proper validation",
            required
        )))
    } else {
        Ok(CheckOutcome::warning("No required field validation found"))
    }
}

pub fn submit_handler(doc: &DomSnapshot) -> Result<CheckOutcome, HarnessError> {
    if !doc.has_contact_form() {
        return Ok(CheckOutcome::fail("Contact form not found"));
    }

    if doc.contact_form_submit_button().is_some() {
        Ok(CheckOutcome::pass("Form submit button found and configured"))
    } else {
        Ok(CheckOutcome::warning("Form submit button not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::record::TestStatus;
    use crate::harness::snapshot::ElementSnapshot;

    fn sections(ids: &[&str]) -> DomSnapshot {
        DomSnapshot {
            elements: ids
                .iter()
                .map(|id| ElementSnapshot::new("section").with_id(*id))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_essential_sections_missing_contact() {
        let doc = sections(&["home", "about", "services", "portfolio"]);
        let outcome = essential_sections(&doc).unwrap();
        assert_eq!(outcome.status, TestStatus::Fail);
        assert_eq!(outcome.message, "Missing sections: contact");
    }

    #[test]
    fn test_essential_sections_all_present() {
        let doc = sections(&ESSENTIAL_SECTIONS);
        let outcome = essential_sections(&doc).unwrap();
        assert_eq!(outcome.status, TestStatus::Pass);
    }

    #[test]
    fn test_essential_sections_lists_every_gap() {
        let doc = sections(&["home", "services"]);
        let outcome = essential_sections(&doc).unwrap();
        assert_eq!(outcome.message, "Missing sections: about, portfolio, contact");
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("600px"), Some(600));
        assert_eq!(leading_int("100vh"), Some(100));
        assert_eq!(leading_int("-5px"), Some(-5));
        assert_eq!(leading_int("auto"), None);
        assert_eq!(leading_int(""), None);
    }

    #[test]
    fn test_hero_styling() {
        let mut doc = DomSnapshot::default();
        assert_eq!(hero_styling(&doc).unwrap().status, TestStatus::Fail);

        doc.elements.push(
            ElementSnapshot::new("section")
                .with_class("hero")
                .with_style("background", TRANSPARENT_BACKGROUND)
                .with_style("min-height", "700px"),
        );
        assert_eq!(hero_styling(&doc).unwrap().status, TestStatus::Warning);

        doc.elements[0]
            .computed_style
            .insert("background".into(), "rgb(99, 102, 241)".into());
        assert_eq!(hero_styling(&doc).unwrap().status, TestStatus::Pass);
    }

    #[test]
    fn test_button_styling_partial() {
        let doc = DomSnapshot {
            elements: vec![
                ElementSnapshot::new("a")
                    .with_class("btn")
                    .with_style("padding", "12px 30px")
                    .with_style("border-radius", "50px"),
                ElementSnapshot::new("a")
                    .with_class("btn")
                    .with_style("padding", "0px")
                    .with_style("border-radius", "50px"),
            ],
            ..Default::default()
        };
        let outcome = button_styling(&doc).unwrap();
        assert_eq!(outcome.status, TestStatus::Warning);
        assert_eq!(outcome.message, "1/2 buttons are properly styled");
    }

    #[test]
    fn test_media_queries() {
        let mut doc = DomSnapshot::default();
        assert_eq!(media_queries(&doc).unwrap().message, "Could not fetch CSS file");

        doc.stylesheet_text = Some("body { margin: 0 }".into());
        assert_eq!(media_queries(&doc).unwrap().status, TestStatus::Warning);

        doc.stylesheet_text = Some(
            "@media (max-width: 768px) { .a {} }\n@media screen and (max-width: 480px) { .b {} }"
                .into(),
        );
        let outcome = media_queries(&doc).unwrap();
        assert_eq!(outcome.status, TestStatus::Pass);
        assert_eq!(outcome.message, "Found 2 media queries for responsive design");
    }

    #[test]
    fn test_navigation_links_counts_dangling() {
        let doc = DomSnapshot {
            elements: vec![
                ElementSnapshot::new("section").with_id("home"),
                ElementSnapshot::new("a").with_class("nav-link").with_attr("href", "#home"),
                ElementSnapshot::new("a").with_class("nav-link").with_attr("href", "#blog"),
                ElementSnapshot::new("a").with_class("nav-link").with_attr("href", "/cv.pdf"),
            ],
            ..Default::default()
        };
        let outcome = navigation_links(&doc).unwrap();
        assert_eq!(outcome.status, TestStatus::Fail);
        assert_eq!(outcome.message, "1/3 navigation links are valid");
    }

    #[test]
    fn test_nav_toggle_observed_failure_warns() {
        let mut doc = DomSnapshot {
            elements: vec![
                ElementSnapshot::new("div").with_class("nav-toggle"),
                ElementSnapshot::new("ul").with_class("nav-menu"),
            ],
            ..Default::default()
        };
        assert_eq!(mobile_nav_toggle(&doc).unwrap().status, TestStatus::Pass);
        doc.nav_toggle_activates = Some(false);
        assert_eq!(mobile_nav_toggle(&doc).unwrap().status, TestStatus::Warning);
    }

    #[test]
    fn test_form_checks_without_form() {
        let doc = DomSnapshot::default();
        for check in [contact_form_exists, required_fields, submit_handler] {
            let outcome = check(&doc).unwrap();
            assert_eq!(outcome.status, TestStatus::Fail);
            assert_eq!(outcome.message, "Contact form not found");
        }
    }

    #[test]
    fn test_standard_checks_order() {
        let checks = standard_checks();
        assert_eq!(checks.len(), 17);
        assert_eq!(checks[0].name, "HTML Document Structure");
        assert_eq!(checks[2].name, "Essential Sections");
        assert_eq!(checks[16].name, "Form Submit Handler");
    }
}
