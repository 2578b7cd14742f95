//! Navigation and scroll-driven cosmetics
//!
//! Pure geometry; the browser bindings read offsets from the DOM and apply
//! the results.

use crate::consts::{
    NAV_SECTION_LEAD_PX, NAVBAR_SCROLLED_THRESHOLD_PX, SCROLL_INDICATOR_HIDE_PX, STAGGER_STEP_SECS,
};

/// Elements that fade in when they scroll into view
pub const REVEAL_SELECTOR: &str =
    ".service-card, .portfolio-item, .skill-item, .contact-item, .about-text";
/// Added up front to every reveal target
pub const REVEAL_HIDDEN_CLASS: &str = "fade-in";
/// Added once the target intersects the viewport
pub const REVEAL_SHOWN_CLASS: &str = "show";
pub const REVEAL_THRESHOLD: f64 = 0.1;
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";
/// Groups that get a per-index animation delay, each counted from zero
pub const STAGGERED_SELECTORS: [&str; 2] = [".service-card", ".portfolio-item"];

/// Id of the section the nav should highlight.
///
/// `sections` are `(id, offset_top)` in document order; the last one whose
/// top minus the lead has been scrolled past wins.
pub fn active_section<'a>(sections: &[(&'a str, f64)], scroll_y: f64) -> Option<&'a str> {
    sections
        .iter()
        .filter(|(_, top)| scroll_y >= top - NAV_SECTION_LEAD_PX)
        .map(|(id, _)| *id)
        .last()
}

/// Whether a nav link's `href` points at `current`
pub fn link_is_active(href: &str, current: Option<&str>) -> bool {
    match (href.strip_prefix('#'), current) {
        (Some(target), Some(current)) => target == current,
        _ => false,
    }
}

/// Scroll position that puts a section just below the fixed navbar
pub fn scroll_target(section_top: f64, navbar_height: f64) -> f64 {
    section_top - navbar_height
}

/// In-page anchor target id, if `href` is one
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Mobile menu open/closed state and the hamburger icon that goes with it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavToggle {
    open: bool,
}

impl NavToggle {
    pub const MENU_ACTIVE_CLASS: &'static str = "active";
    pub const ICON_CLOSED: &'static str = "fa-bars";
    pub const ICON_OPEN: &'static str = "fa-times";

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Sync from the menu's current class list
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    pub fn menu_active(&self) -> bool {
        self.open
    }

    /// Icon class to add
    pub fn icon_class(&self) -> &'static str {
        if self.open { Self::ICON_OPEN } else { Self::ICON_CLOSED }
    }

    /// Icon class to remove
    pub fn stale_icon_class(&self) -> &'static str {
        if self.open { Self::ICON_CLOSED } else { Self::ICON_OPEN }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavbarStyle {
    pub background: &'static str,
    pub box_shadow: &'static str,
}

/// Navbar goes more opaque and gains a shadow once the page scrolls
pub fn navbar_style(scroll_y: f64) -> NavbarStyle {
    if scroll_y > NAVBAR_SCROLLED_THRESHOLD_PX {
        NavbarStyle {
            background: "rgba(255, 255, 255, 0.98)",
            box_shadow: "0 2px 20px rgba(0, 0, 0, 0.1)",
        }
    } else {
        NavbarStyle {
            background: "rgba(255, 255, 255, 0.95)",
            box_shadow: "none",
        }
    }
}

pub fn scroll_indicator_opacity(scroll_y: f64) -> &'static str {
    if scroll_y > SCROLL_INDICATOR_HIDE_PX { "0" } else { "1" }
}

/// Width of the top progress bar, in percent
pub fn scroll_progress_percent(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let scrollable = scroll_height - client_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    (scroll_top / scrollable * 100.0).clamp(0.0, 100.0)
}

/// `animation-delay` for the `index`th item of a staggered group
pub fn stagger_delay(index: usize) -> String {
    let secs = index as f64 * STAGGER_STEP_SECS;
    let secs = (secs * 1000.0).round() / 1000.0;
    format!("{}s", secs)
}

/// Hero avatar offset in px for a pointer at (`x`, `y`) in a `w`×`h` window
pub fn parallax_offset(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    if width <= 0.0 || height <= 0.0 {
        return (0.0, 0.0);
    }
    ((x / width - 0.5) * 20.0, (y / height - 0.5) * 20.0)
}

/// Successive prefixes of a string, one more character each step
#[derive(Debug, Clone)]
pub struct TypingEffect {
    text: String,
    shown: usize,
}

impl TypingEffect {
    pub const STEP_MS: u32 = 100;
    pub const START_DELAY_MS: u32 = 1000;

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown: 0,
        }
    }
}

impl Iterator for TypingEffect {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let rest = &self.text[self.shown..];
        let ch = rest.chars().next()?;
        self.shown += ch.len_utf8();
        Some(self.text[..self.shown].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECTIONS: [(&str, f64); 5] = [
        ("home", 0.0),
        ("about", 800.0),
        ("services", 1600.0),
        ("portfolio", 2400.0),
        ("contact", 3200.0),
    ];

    #[test]
    fn test_active_section_uses_lead() {
        assert_eq!(active_section(&SECTIONS, 0.0), Some("home"));
        assert_eq!(active_section(&SECTIONS, 599.0), Some("home"));
        assert_eq!(active_section(&SECTIONS, 600.0), Some("about"));
        assert_eq!(active_section(&SECTIONS, 5000.0), Some("contact"));
        assert_eq!(active_section(&[("late", 500.0)], 0.0), None);
    }

    #[test]
    fn test_link_is_active() {
        assert!(link_is_active("#about", Some("about")));
        assert!(!link_is_active("#about", Some("home")));
        assert!(!link_is_active("about", Some("about")));
        assert!(!link_is_active("#about", None));
    }

    #[test]
    fn test_scroll_target_and_anchor() {
        assert_eq!(scroll_target(800.0, 70.0), 730.0);
        assert_eq!(anchor_target("#contact"), Some("contact"));
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("https://x"), None);
    }

    #[test]
    fn test_nav_toggle_icons() {
        let mut t = NavToggle::default();
        assert_eq!(t.icon_class(), "fa-bars");
        t.toggle();
        assert!(t.menu_active());
        assert_eq!(t.icon_class(), "fa-times");
        assert_eq!(t.stale_icon_class(), "fa-bars");
        t.close();
        assert!(!t.menu_active());
    }

    #[test]
    fn test_navbar_and_indicator() {
        assert_eq!(navbar_style(50.0).box_shadow, "none");
        assert_eq!(navbar_style(51.0).background, "rgba(255, 255, 255, 0.98)");
        assert_eq!(scroll_indicator_opacity(100.0), "1");
        assert_eq!(scroll_indicator_opacity(101.0), "0");
    }

    #[test]
    fn test_progress() {
        assert_eq!(scroll_progress_percent(0.0, 1000.0, 1000.0), 0.0);
        assert_eq!(scroll_progress_percent(500.0, 2000.0, 1000.0), 50.0);
    }

    #[test]
    fn test_stagger_delay() {
        assert_eq!(stagger_delay(0), "0s");
        assert_eq!(stagger_delay(1), "0.2s");
        assert_eq!(stagger_delay(3), "0.6s");
    }

    #[test]
    fn test_parallax_centered() {
        assert_eq!(parallax_offset(600.0, 400.0, 1200.0, 800.0), (0.0, 0.0));
        assert_eq!(parallax_offset(0.0, 800.0, 1200.0, 800.0), (-10.0, 10.0));
    }

    #[test]
    fn test_typing_effect_multibyte() {
        let steps: Vec<_> = TypingEffect::new("hé!").collect();
        assert_eq!(steps, vec!["h", "hé", "hé!"]);
    }

    proptest! {
        #[test]
        fn prop_active_section_monotonic(a in 0.0f64..5000.0, b in 0.0f64..5000.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let idx = |y| active_section(&SECTIONS, y)
                .and_then(|id| SECTIONS.iter().position(|(s, _)| *s == id));
            prop_assert!(idx(lo) <= idx(hi));
        }
    }
}
