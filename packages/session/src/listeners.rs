//! Listener registry shared by the credential store, the sync engine and the
//! session context.
//!
//! Everything runs on one event-loop thread, so listeners are plain `Rc`
//! closures. `notify` snapshots the listener list before calling out, which
//! lets a listener subscribe, unsubscribe or trigger another notification
//! without tripping a `RefCell` borrow.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Entries<T> = RefCell<Vec<(u64, Rc<dyn Fn(&T)>)>>;

pub struct Listeners<T: 'static> {
    entries: Rc<Entries<T>>,
    next_id: Cell<u64>,
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            entries: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }
}

impl<T: 'static> Listeners<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, Rc::new(listener)));

        let entries: Weak<Entries<T>> = Rc::downgrade(&self.entries);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(entries) = entries.upgrade() {
                    entries.borrow_mut().retain(|(entry_id, _)| *entry_id != id);
                }
            })),
        }
    }

    pub fn notify(&self, value: &T) {
        let snapshot: Vec<Rc<dyn Fn(&T)>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(value);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a listener registered. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
