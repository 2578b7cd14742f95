//! Client-side security affordances
//!
//! Everything here runs in the visitor's browser and can be bypassed by
//! anyone who controls that browser. It exists to deter casual bots and to
//! surface console warnings, nothing more.

pub mod integrity;
pub mod rate_limit;
pub mod sanitize;
pub mod session;

pub use integrity::{ScriptRef, devtools_open, https_redirect, is_mixed_content, unverified_cdn_scripts};
pub use rate_limit::RateLimiter;
pub use sanitize::{contains_suspicious, sanitize};
pub use session::{MemoryTokenStore, SessionState, TOKEN_KEY, TokenStore};
