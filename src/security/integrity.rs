//! Console-level page hygiene checks
//!
//! None of these block anything; they decide what to warn about.

use serde::{Deserialize, Serialize};

use crate::consts::DEVTOOLS_THRESHOLD_PX;

/// A `<script src>` reference on the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptRef {
    pub src: String,
    #[serde(default)]
    pub integrity: Option<String>,
}

impl ScriptRef {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            integrity: None,
        }
    }
}

/// URL to redirect to when the page was served over plain http from a
/// non-local host
pub fn https_redirect(protocol: &str, hostname: &str, href: &str) -> Option<String> {
    if protocol == "https:" || hostname == "localhost" || hostname == "127.0.0.1" {
        return None;
    }
    let rest = href.strip_prefix(protocol).unwrap_or(href);
    Some(format!("https:{}", rest))
}

/// CDN scripts loaded without a subresource integrity hash
pub fn unverified_cdn_scripts(scripts: &[ScriptRef]) -> Vec<&str> {
    scripts
        .iter()
        .filter(|s| s.src.contains("cdnjs.cloudflare.com"))
        .filter(|s| s.integrity.as_deref().is_none_or(str::is_empty))
        .map(|s| s.src.as_str())
        .collect()
}

/// Resource fetched over http by a page served over https
pub fn is_mixed_content(resource_url: &str, page_protocol: &str) -> bool {
    page_protocol == "https:" && resource_url.starts_with("http:")
}

/// Rough "docked developer tools" guess from window chrome size
pub fn devtools_open(outer_width: f64, inner_width: f64, outer_height: f64, inner_height: f64) -> bool {
    outer_height - inner_height > DEVTOOLS_THRESHOLD_PX
        || outer_width - inner_width > DEVTOOLS_THRESHOLD_PX
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_redirect() {
        assert_eq!(
            https_redirect("http:", "example.com", "http://example.com/#about"),
            Some("https://example.com/#about".to_string())
        );
        assert_eq!(https_redirect("http:", "localhost", "http://localhost:8000/"), None);
        assert_eq!(https_redirect("http:", "127.0.0.1", "http://127.0.0.1/"), None);
        assert_eq!(https_redirect("https:", "example.com", "https://example.com/"), None);
    }

    #[test]
    fn test_unverified_cdn_scripts() {
        let scripts = vec![
            ScriptRef::new("https://cdnjs.cloudflare.com/ajax/libs/x.js"),
            ScriptRef {
                src: "https://cdnjs.cloudflare.com/ajax/libs/y.js".into(),
                integrity: Some("sha384-abc".into()),
            },
            ScriptRef::new("script.js"),
        ];
        assert_eq!(
            unverified_cdn_scripts(&scripts),
            vec!["https://cdnjs.cloudflare.com/ajax/libs/x.js"]
        );
    }

    #[test]
    fn test_mixed_content() {
        assert!(is_mixed_content("http://cdn.example/a.png", "https:"));
        assert!(!is_mixed_content("https://cdn.example/a.png", "https:"));
        assert!(!is_mixed_content("http://cdn.example/a.png", "http:"));
    }

    #[test]
    fn test_devtools_heuristic() {
        assert!(!devtools_open(1200.0, 1200.0, 800.0, 700.0));
        assert!(devtools_open(1200.0, 900.0, 800.0, 700.0));
        assert!(devtools_open(1200.0, 1200.0, 800.0, 500.0));
    }
}
