//! Per-tab session state: the stamped form token and the rate limiter
//!
//! The token is a client-side affordance only. Anything that can read the
//! page can read the token, so it is not a CSRF defense.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use std::collections::HashMap;

use super::rate_limit::RateLimiter;

/// Storage key the token is kept under
pub const TOKEN_KEY: &str = "csrf_token";

/// Number of random base-36 characters in a token
const TOKEN_RANDOM_LEN: usize = 13;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Key-value store scoped to the browser tab
pub trait TokenStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for tests and native runs
#[derive(Debug, Default, Clone)]
pub struct MemoryTokenStore {
    values: HashMap<String, String>,
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Everything the page handlers used to keep in globals
pub struct SessionState<S: TokenStore> {
    store: S,
    rng: Pcg32,
    pub rate_limiter: RateLimiter,
}

impl<S: TokenStore> SessionState<S> {
    pub fn new(store: S, seed: u64, now_ms: u64) -> Self {
        Self {
            store,
            rng: Pcg32::seed_from_u64(seed),
            rate_limiter: RateLimiter::new(now_ms),
        }
    }

    /// Generate a fresh token, store it, and return it for stamping
    pub fn issue_token(&mut self, now_ms: u64) -> String {
        let mut token = String::with_capacity(32);
        token.push_str("csrf_");
        for _ in 0..TOKEN_RANDOM_LEN {
            let idx = self.rng.random_range(0..BASE36.len());
            token.push(BASE36[idx] as char);
        }
        token.push_str(&to_base36(now_ms));

        self.store.set(TOKEN_KEY, &token);
        log::info!("Form token generated");
        token
    }

    /// Token most recently written to the store
    pub fn stored_token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    /// Echoed token must be present and equal to the stored one
    pub fn verify_token(&self, echoed: Option<&str>) -> bool {
        match (echoed, self.stored_token()) {
            (Some(echoed), Some(stored)) => !echoed.is_empty() && echoed == stored,
            _ => false,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Lowercase base-36 rendering, matching `Number.prototype.toString(36)`
pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
