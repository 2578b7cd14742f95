//! Site settings
//!
//! Feature toggles for the page effects and the harness target, read from
//! LocalStorage at start-up.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Page effects ===
    /// Thin progress bar along the top edge
    pub scroll_progress: bool,
    /// Hero avatar follows the pointer
    pub parallax: bool,
    /// Type out the hero title on load
    pub typing_effect: bool,
    /// Lift buttons on hover
    pub button_hover: bool,
    /// Redirect plain-http visits on non-local hosts
    pub enforce_https: bool,

    // === Harness ===
    /// Page the harness opens and inspects
    pub harness_target_url: String,
    /// Stylesheet path, relative to the target, scanned for media queries
    pub harness_stylesheet_path: String,
    /// Pause between checks so the log stays readable
    pub harness_step_delay_ms: u32,
    /// Wait after the popup reports ready
    pub harness_settle_delay_ms: u32,
    /// How often to poll the popup's readyState
    pub harness_poll_interval_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scroll_progress: true,
            parallax: true,
            typing_effect: false,
            button_hover: true,
            enforce_https: true,

            harness_target_url: "http://localhost:8000".to_string(),
            harness_stylesheet_path: "style.css".to_string(),
            harness_step_delay_ms: 200,
            harness_settle_delay_ms: 2000,
            harness_poll_interval_ms: 100,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "folio_site_settings";

    /// Absolute URL of the stylesheet the harness fetches
    pub fn stylesheet_url(&self) -> String {
        format!(
            "{}/{}",
            self.harness_target_url.trim_end_matches('/'),
            self.harness_stylesheet_path.trim_start_matches('/')
        )
    }

    /// Parse stored JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
                log::warn!("Ignoring malformed settings in LocalStorage");
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
