use std::cell::RefCell;
use std::rc::Rc;

use super::CredentialStorage;
use crate::SessionError;

/// In-memory storage for testing and desktop fallback.
///
/// Clones share the same slot, so a test can keep one clone to inspect what
/// the store persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `raw`, as if left behind by a previous run.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(raw.into()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl CredentialStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        Ok(self.slot.borrow().clone())
    }

    fn save(&self, raw: &str) -> Result<(), SessionError> {
        *self.slot.borrow_mut() = Some(raw.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), SessionError> {
        self.slot.borrow_mut().take();
        Ok(())
    }
}
