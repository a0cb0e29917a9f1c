//! # Browser localStorage credential storage
//!
//! [`LocalStorage`] is the [`CredentialStorage`] used on the web platform. It
//! keeps the encoded credential under one key of `window.localStorage`, so a
//! page reload restores the session.
//!
//! The storage object is looked up on every call rather than cached: `Storage`
//! handles are not `Clone`, and the lookup is a cheap property read. A browser
//! that refuses access (privacy mode, disabled storage) surfaces as
//! [`SessionError::Storage`], which the credential store logs and absorbs.

use web_sys::Storage;

use super::CredentialStorage;
use crate::SessionError;

/// `window.localStorage`-backed storage for the web platform.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    key: String,
}

impl LocalStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage(&self) -> Result<Storage, SessionError> {
        let window = web_sys::window()
            .ok_or_else(|| SessionError::Storage("no window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| SessionError::Storage(format!("{e:?}")))?
            .ok_or_else(|| SessionError::Storage("localStorage unavailable".to_string()))
    }
}

impl CredentialStorage for LocalStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        self.storage()?
            .get_item(&self.key)
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }

    fn save(&self, raw: &str) -> Result<(), SessionError> {
        self.storage()?
            .set_item(&self.key, raw)
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }

    fn remove(&self) -> Result<(), SessionError> {
        self.storage()?
            .remove_item(&self.key)
            .map_err(|e| SessionError::Storage(format!("{e:?}")))
    }
}
