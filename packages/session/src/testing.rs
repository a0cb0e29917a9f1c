//! Test doubles: a scripted backend and a storage that counts its writes.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use api::{ApiError, LoginResponse, NotificationItem, PortalApi, ProfileRecord, UserId};

use crate::storage::{CredentialStorage, MemoryStorage};
use crate::{Credential, SessionError};

struct Scripted<T> {
    delay: Duration,
    result: Result<T, ApiError>,
}

#[derive(Default)]
struct Script {
    notifications: RefCell<VecDeque<Scripted<Vec<NotificationItem>>>>,
    profiles: RefCell<HashMap<UserId, (Duration, Result<ProfileRecord, ApiError>)>>,
    logins: RefCell<VecDeque<Result<LoginResponse, ApiError>>>,
    notification_calls: Cell<u32>,
    profile_calls: Cell<u32>,
}

/// [`PortalApi`] that replays queued responses, each after its own delay.
///
/// Notification responses are consumed in call order; an empty queue answers
/// with an empty list. Profiles not set answer 404. Logins not queued answer
/// 401. Clones share the script.
#[derive(Clone, Default)]
pub struct ScriptedApi {
    script: Rc<Script>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_notifications(&self, delay: Duration, result: Result<Vec<NotificationItem>, ApiError>) {
        self.script
            .notifications
            .borrow_mut()
            .push_back(Scripted { delay, result });
    }

    /// Queue a successful response with `unread` unread items.
    pub fn push_unread(&self, delay: Duration, unread: u32) {
        self.push_notifications(delay, Ok(items(unread, 1)));
    }

    pub fn set_profile(&self, user_id: UserId, result: Result<ProfileRecord, ApiError>) {
        self.set_profile_after(user_id, Duration::ZERO, result);
    }

    /// Like [`set_profile`](Self::set_profile), answering only after `delay`.
    pub fn set_profile_after(&self, user_id: UserId, delay: Duration, result: Result<ProfileRecord, ApiError>) {
        self.script.profiles.borrow_mut().insert(user_id, (delay, result));
    }

    pub fn push_login(&self, result: Result<LoginResponse, ApiError>) {
        self.script.logins.borrow_mut().push_back(result);
    }

    pub fn notification_calls(&self) -> u32 {
        self.script.notification_calls.get()
    }

    pub fn profile_calls(&self) -> u32 {
        self.script.profile_calls.get()
    }
}

/// `unread` unread items followed by `read` read ones.
pub fn items(unread: u32, read: u32) -> Vec<NotificationItem> {
    (0..unread + read)
        .map(|i| NotificationItem {
            id: i64::from(i),
            is_read: i >= unread,
            title: Some(format!("Notice {i}")),
            message: None,
            created_at: None,
        })
        .collect()
}

impl PortalApi for ScriptedApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        let next = self.script.logins.borrow_mut().pop_front();
        next.unwrap_or(Err(ApiError::Unauthorized))
    }

    async fn list_notifications(&self, _token: &str) -> Result<Vec<NotificationItem>, ApiError> {
        let calls = &self.script.notification_calls;
        calls.set(calls.get() + 1);

        let next = self.script.notifications.borrow_mut().pop_front();
        let Some(scripted) = next else {
            return Ok(Vec::new());
        };
        if !scripted.delay.is_zero() {
            crate::time::sleep(scripted.delay).await;
        }
        scripted.result
    }

    async fn fetch_profile(&self, _token: &str, user_id: UserId) -> Result<ProfileRecord, ApiError> {
        let calls = &self.script.profile_calls;
        calls.set(calls.get() + 1);

        let scripted = self.script.profiles.borrow().get(&user_id).cloned();
        let Some((delay, result)) = scripted else {
            return Err(ApiError::Status { status: 404 });
        };
        if !delay.is_zero() {
            crate::time::sleep(delay).await;
        }
        result
    }
}

/// [`MemoryStorage`] wrapper that counts saves and removals.
#[derive(Clone, Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    saves: Rc<Cell<u32>>,
    removes: Rc<Cell<u32>>,
}

impl CountingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-loaded with `credential`, as if persisted by an earlier run.
    pub fn with_credential(credential: &Credential) -> Self {
        let raw = serde_json::to_string(credential).unwrap_or_default();
        Self {
            inner: MemoryStorage::with_raw(raw),
            ..Self::default()
        }
    }

    pub fn saves(&self) -> u32 {
        self.saves.get()
    }

    pub fn removes(&self) -> u32 {
        self.removes.get()
    }

    pub fn raw(&self) -> Option<String> {
        self.inner.raw()
    }
}

impl CredentialStorage for CountingStorage {
    fn load(&self) -> Result<Option<String>, SessionError> {
        self.inner.load()
    }

    fn save(&self, raw: &str) -> Result<(), SessionError> {
        self.saves.set(self.saves.get() + 1);
        self.inner.save(raw)
    }

    fn remove(&self) -> Result<(), SessionError> {
        self.removes.set(self.removes.get() + 1);
        self.inner.remove()
    }
}
