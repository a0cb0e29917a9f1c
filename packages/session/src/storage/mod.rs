//! # Durable credential storage
//!
//! The [`CredentialStorage`] trait is the only thing the
//! [`CredentialStore`](crate::CredentialStore) knows about persistence: one raw
//! string under one key. Encoding and validation stay in the store, so every
//! backend is a dumb slot.
//!
//! | Backend | Platform | Location |
//! |---------|----------|----------|
//! | [`MemoryStorage`] | any | process memory (tests, desktop fallback) |
//! | [`FileStorage`] | native | `<data_dir>/campus-portal/<key>.json` |
//! | [`LocalStorage`] | wasm32 + `web` | `window.localStorage[<key>]` |
//!
//! Calls are synchronous: both the browser's localStorage and a single small
//! file are cheap enough to touch on the event-loop thread.

mod memory;
pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local::LocalStorage;

use crate::SessionError;

/// A single persisted slot holding the encoded credential.
pub trait CredentialStorage {
    /// The stored value, or `None` when nothing has been saved.
    fn load(&self) -> Result<Option<String>, SessionError>;
    fn save(&self, raw: &str) -> Result<(), SessionError>;
    /// Removing an empty slot succeeds.
    fn remove(&self) -> Result<(), SessionError>;
}

impl<S: CredentialStorage + ?Sized> CredentialStorage for Box<S> {
    fn load(&self) -> Result<Option<String>, SessionError> {
        (**self).load()
    }

    fn save(&self, raw: &str) -> Result<(), SessionError> {
        (**self).save(raw)
    }

    fn remove(&self) -> Result<(), SessionError> {
        (**self).remove()
    }
}
