//! Browser platform layer
//!
//! Handles the wasm32-only side of things:
//! - DOM event wiring for the portfolio page
//! - Popup-window snapshot acquisition and the harness page UI
//! - sessionStorage for the form token
//!
//! Native builds get none of this; the pure modules carry the logic.

#[cfg(target_arch = "wasm32")]
pub mod dom;
#[cfg(target_arch = "wasm32")]
pub mod events;
#[cfg(target_arch = "wasm32")]
pub mod harness_page;
#[cfg(target_arch = "wasm32")]
pub mod page;
#[cfg(target_arch = "wasm32")]
pub mod popup;
#[cfg(target_arch = "wasm32")]
pub mod storage;
