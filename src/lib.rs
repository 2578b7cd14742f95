//! Folio Site - client-side behavior for a static portfolio page
//!
//! Core modules:
//! - `security`: session token, rate limiter, input sanitizer, hygiene checks
//! - `form`: contact form submission pipeline
//! - `nav`: navigation and scroll-driven cosmetics
//! - `notify`: transient notifications
//! - `harness`: DOM smoke-test checks over page snapshots
//! - `platform`: browser bindings (wasm32 only)

pub mod form;
pub mod harness;
pub mod nav;
pub mod notify;
pub mod platform;
pub mod security;
pub mod settings;

pub use form::{ContactSubmission, SubmitEnv, SubmitRejection};
pub use harness::{DomSnapshot, Harness};
pub use security::SessionState;
pub use settings::Settings;

/// Site behavior constants
pub mod consts {
    use std::ops::RangeInclusive;

    /// A section counts as current this far before its top reaches the viewport
    pub const NAV_SECTION_LEAD_PX: f64 = 200.0;
    /// Navbar switches to its scrolled look past this offset
    pub const NAVBAR_SCROLLED_THRESHOLD_PX: f64 = 50.0;
    /// Hero scroll hint fades out past this offset
    pub const SCROLL_INDICATOR_HIDE_PX: f64 = 100.0;

    /// Accepted submissions allowed per window
    pub const MAX_SUBMISSIONS_PER_WINDOW: u32 = 5;
    /// Minimum gap between accepted submissions
    pub const MIN_SUBMISSION_INTERVAL_MS: u64 = 30_000;
    /// Rate-limit window length (1 hour)
    pub const RATE_WINDOW_MS: u64 = 3_600_000;

    /// Simulated send time
    pub const SUBMIT_DELAY_MS: u32 = 2_000;
    pub const NOTIFICATION_LIFETIME_MS: u32 = 5_000;
    pub const SECURITY_WARNING_LIFETIME_MS: u32 = 5_000;
    /// Paste handler waits for the pasted text to land in the field
    pub const PASTE_SANITIZE_DELAY_MS: u32 = 10;

    /// Animation delay step between staggered cards
    pub const STAGGER_STEP_SECS: f64 = 0.2;

    /// Allowed name length, in characters
    pub const NAME_LEN: RangeInclusive<usize> = 2..=100;
    /// Allowed message length, in characters
    pub const MESSAGE_LEN: RangeInclusive<usize> = 10..=1000;

    /// Window chrome larger than this suggests docked devtools
    pub const DEVTOOLS_THRESHOLD_PX: f64 = 160.0;
}
