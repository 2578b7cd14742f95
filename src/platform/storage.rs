//! sessionStorage-backed token store

use web_sys::Storage;

use crate::security::TokenStore;

/// Falls back to a no-op store when sessionStorage is unavailable
/// (sandboxed iframes, disabled storage)
pub struct SessionStorageStore {
    storage: Option<Storage>,
}

impl SessionStorageStore {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.session_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("sessionStorage unavailable, form tokens will not verify");
        }
        Self { storage }
    }
}

impl TokenStore for SessionStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.set_item(key, value);
        }
    }
}
