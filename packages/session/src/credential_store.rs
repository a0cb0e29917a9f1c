//! # CredentialStore: the single source of truth for identity
//!
//! Holds the current [`Credential`] in memory, mirrors it to a
//! [`CredentialStorage`] backend, and tells subscribers whenever it changes.
//!
//! ## Guarantees
//!
//! - A stored credential is never partial. [`set`](CredentialStore::set)
//!   rejects a token without a user id (or the reverse) and leaves the current
//!   state untouched. A credential with neither is treated as a logout.
//! - Updates are synchronous. By the time `set` or `clear` returns, every
//!   subscriber has seen the new state, before any I/O for the new identity can
//!   start.
//! - [`clear`](CredentialStore::clear) is idempotent. Only the call that
//!   actually removes a credential touches storage and notifies subscribers.
//! - Restoring fails open. Unreadable, malformed, or partial persisted data is
//!   discarded and the store starts logged out.
//!
//! Persistence errors after a successful validation are logged and absorbed:
//! the in-memory session stays usable even when the browser refuses storage.

use std::cell::RefCell;
use std::rc::Rc;

use api::UserId;

use crate::listeners::{Listeners, Subscription};
use crate::storage::CredentialStorage;
use crate::{Credential, SessionError};

/// Shared handle to the process-wide credential. Clones share state.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Rc<StoreInner>,
}

struct StoreInner {
    storage: Box<dyn CredentialStorage>,
    current: RefCell<Option<Credential>>,
    listeners: Listeners<Option<Credential>>,
}

impl CredentialStore {
    /// Open the store, restoring whatever `storage` holds.
    pub fn restore(storage: impl CredentialStorage + 'static) -> Self {
        let current = restore_from(&storage);
        Self {
            inner: Rc::new(StoreInner {
                storage: Box::new(storage),
                current: RefCell::new(current),
                listeners: Listeners::new(),
            }),
        }
    }

    /// The current credential, if logged in.
    pub fn get(&self) -> Option<Credential> {
        self.inner.current.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .current
            .borrow()
            .as_ref()
            .and_then(|c| c.token().map(str::to_string))
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.inner.current.borrow().as_ref().and_then(|c| c.user_id)
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.current.borrow().is_some()
    }

    /// Replace the current credential.
    pub fn set(&self, credential: Credential) -> Result<(), SessionError> {
        if !credential.check_identity()? {
            self.clear();
            return Ok(());
        }

        match serde_json::to_string(&credential) {
            Ok(raw) => {
                if let Err(e) = self.inner.storage.save(&raw) {
                    tracing::warn!("Failed to persist credential: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to encode credential: {}", e),
        }

        *self.inner.current.borrow_mut() = Some(credential.clone());
        tracing::debug!("credential set for user {:?}", credential.user_id);
        self.inner.listeners.notify(&Some(credential));
        Ok(())
    }

    /// Drop the credential. Returns `false` when there was nothing to clear.
    pub fn clear(&self) -> bool {
        let previous = self.inner.current.borrow_mut().take();
        let Some(previous) = previous else {
            return false;
        };

        if let Err(e) = self.inner.storage.remove() {
            tracing::warn!("Failed to remove persisted credential: {}", e);
        }
        tracing::debug!("credential cleared for user {:?}", previous.user_id);
        self.inner.listeners.notify(&None);
        true
    }

    /// Call `listener` with the new state after every `set` and effective `clear`.
    pub fn subscribe(&self, listener: impl Fn(&Option<Credential>) + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("user_id", &self.user_id())
            .finish()
    }
}

fn restore_from(storage: &dyn CredentialStorage) -> Option<Credential> {
    let raw = match storage.load() {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read persisted credential: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<Credential>(&raw) {
        Ok(credential) if credential.is_authenticated() => Some(credential),
        Ok(_) => {
            tracing::warn!("Discarding persisted credential without a complete identity");
            let _ = storage.remove();
            None
        }
        Err(e) => {
            tracing::warn!("Discarding malformed persisted credential: {}", e);
            let _ = storage.remove();
            None
        }
    }
}
