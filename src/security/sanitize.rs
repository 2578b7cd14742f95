//! Regex stripping for free-text inputs
//!
//! This is a best-effort filter applied while the user types. It is not a
//! substitute for escaping on output and must not be treated as a security
//! boundary: anything it misses reaches the form untouched.

use fancy_regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;

/// Stripped from input values, applied in order
const STRIP_PATTERNS: [&str; 5] = [
    r"(?i)<script\b[^<]*(?:(?!</script>)<[^<]*)*</script>",
    r"(?i)<iframe\b[^<]*(?:(?!</iframe>)<[^<]*)*</iframe>",
    r"(?i)javascript:",
    r"(?i)on[A-Za-z0-9_]+\s*=",
    r"(?i)data:text/html",
];

/// Rejected outright at submit time
const SUSPICIOUS_PATTERNS: [&str; 6] = [
    r"(?i)<script",
    r"(?i)javascript:",
    r"(?i)on[A-Za-z0-9_]+\s*=",
    r"(?i)<iframe",
    r"(?i)eval\(",
    r"(?i)document\.write",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("static sanitizer pattern"))
        .collect()
}

fn strip_patterns() -> &'static [Regex] {
    static CELL: OnceLock<Vec<Regex>> = OnceLock::new();
    CELL.get_or_init(|| compile(&STRIP_PATTERNS))
}

fn suspicious_patterns() -> &'static [Regex] {
    static CELL: OnceLock<Vec<Regex>> = OnceLock::new();
    CELL.get_or_init(|| compile(&SUSPICIOUS_PATTERNS))
}

/// One pass over every strip pattern. `None` if nothing changed.
fn strip_once(text: &str) -> Option<String> {
    let mut out: Option<String> = None;
    for re in strip_patterns() {
        let src = out.as_deref().unwrap_or(text);
        let replaced = match re.try_replacen(src, 0, "") {
            Ok(result) if result != src => Some(result.into_owned()),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Sanitizer pattern failed: {}", e);
                None
            }
        };
        if replaced.is_some() {
            out = replaced;
        }
    }
    out
}

/// Strip the known-dangerous fragments from `input`.
///
/// Passes repeat until nothing changes, so fragments that only line up after
/// an inner removal (`javajavascript:script:`) are removed too and the result
/// is stable under re-sanitizing.
pub fn sanitize(input: &str) -> Cow<'_, str> {
    let mut current = Cow::Borrowed(input);
    while let Some(next) = strip_once(&current) {
        current = Cow::Owned(next);
    }
    current
}

/// Whether `text` contains anything the submit validator refuses
pub fn contains_suspicious(text: &str) -> bool {
    suspicious_patterns()
        .iter()
        // A pattern that errors out counts as a hit
        .any(|re| re.is_match(text).unwrap_or(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_script_block() {
        assert_eq!(sanitize("<script>alert(1)</script>hello"), "hello");
        assert_eq!(sanitize("a<SCRIPT src=x>bad()</Script>b"), "ab");
    }

    #[test]
    fn test_strips_iframe_block() {
        assert_eq!(sanitize("x<iframe src=\"evil\"></iframe>y"), "xy");
    }

    #[test]
    fn test_strips_event_handler_prefix() {
        assert_eq!(sanitize("onclick=alert(1)"), "alert(1)");
        assert_eq!(sanitize("onmouseover  = go()"), " go()");
    }

    #[test]
    fn test_strips_uri_schemes() {
        assert_eq!(sanitize("JavaScript:void(0)"), "void(0)");
        assert_eq!(sanitize("data:text/html,<b>"), ",<b>");
    }

    #[test]
    fn test_nested_payload_reaches_fixed_point() {
        assert_eq!(sanitize("javajavascript:script:x"), "x");
    }

    #[test]
    fn test_clean_input_is_borrowed() {
        assert!(matches!(sanitize("Hello there"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_suspicious_detection() {
        assert!(contains_suspicious("try eval(x)"));
        assert!(contains_suspicious("document.write('x')"));
        assert!(contains_suspicious("<IFRAME"));
        assert!(!contains_suspicious("Jane jane@example.com Hello, I need a website"));
    }

    #[test]
    fn test_handler_pattern_is_ascii_only() {
        assert_eq!(sanitize("condição=ok"), "condição=ok");
        assert!(!contains_suspicious("condição=ok"));
        assert_eq!(sanitize("ONLOAD=x"), "x");
    }

    proptest! {
        #[test]
        fn prop_sanitize_is_idempotent(s in ".{0,64}") {
            let once = sanitize(&s).into_owned();
            let twice = sanitize(&once).into_owned();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_sanitize_idempotent_on_fragments(
            parts in proptest::collection::vec(
                prop_oneof![
                    Just("<script>"), Just("</script>"), Just("java"), Just("script:"),
                    Just("on"), Just("load"), Just("="), Just("data:text/html"),
                    Just("<iframe>"), Just("</iframe>"), Just("x"), Just(" "),
                ],
                0..12,
            )
        ) {
            let s: String = parts.concat();
            let once = sanitize(&s).into_owned();
            prop_assert_eq!(sanitize(&once).into_owned(), once);
        }
    }
}
