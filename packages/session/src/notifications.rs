//! # NotificationSyncEngine: the shared unread count
//!
//! Every mounted screen keeps the notification badge fresh by starting its own
//! poll loop. All loops write one process-wide unread count. The engine's job is
//! to let them do that without the badge ever showing a count that no longer
//! belongs to the session.
//!
//! ## Poll handles
//!
//! [`NotificationSyncEngine::start`] returns a [`PollHandle`] and a [`PollTask`].
//! The caller spawns the task on its local executor and keeps the handle for as
//! long as the screen is mounted. Dropping or [`stop`](PollHandle::stop)ping
//! the handle ends that loop only; other screens keep polling.
//!
//! ```text
//!            credential set / refresh_now / tick
//!   Idle ────────────────────────────────────────▶ Polling
//!    ▲  no credential at tick                        │
//!    └───────────────────────────────────────────────┤
//!                                                    │ stop(), drop, logout
//!                                                    ▼
//!                                                 Stopped
//! ```
//!
//! A loop polls once when it starts, then on every interval tick. Ticks do not
//! wait for the previous request: slow responses overlap with newer ones.
//!
//! ## Writing the count
//!
//! A completed poll writes `count = items where !is_read`. A failed poll writes
//! `0` so an unreachable service never leaves an old badge up; the next tick is
//! the only retry. Whichever poll *completes* last wins, across all handles.
//!
//! Before a result is written, two checks run on the event-loop thread:
//!
//! 1. the handle that issued it is still live, and
//! 2. the session still holds the token it was issued with.
//!
//! A response that arrives after logout, after unmount, or after a switch to
//! another user is dropped on the floor. On logout the count is also reset to
//! `0`, so nothing from the old session is visible afterwards.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use api::{count_unread, ApiError, PortalApi, UserId};
use futures::future::LocalBoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Notify;

use crate::listeners::{Listeners, Subscription};
use crate::{time, CredentialStore};

/// Future that drives one handle's poll loop. Spawn it on a local executor.
pub type PollTask = LocalBoxFuture<'static, ()>;

type PollFetch = LocalBoxFuture<'static, (String, Result<u32, ApiError>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Waiting for a credential.
    Idle,
    Polling,
    /// Terminal; results still in flight are discarded.
    Stopped,
}

/// Process-wide owner of the unread count. Clones share state.
pub struct NotificationSyncEngine<A> {
    inner: Rc<EngineInner<A>>,
}

impl<A> Clone for NotificationSyncEngine<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct EngineInner<A> {
    api: Rc<A>,
    credentials: CredentialStore,
    interval: Option<Duration>,
    /// User the current count belongs to.
    identity: Cell<Option<UserId>>,
    unread: Cell<u32>,
    completed: Cell<u64>,
    handles: RefCell<Vec<Rc<HandleState>>>,
    next_handle: Cell<u64>,
    listeners: Listeners<u32>,
    on_unauthorized: RefCell<Option<Rc<dyn Fn()>>>,
    credential_subscription: RefCell<Option<Subscription>>,
}

struct HandleState {
    id: u64,
    state: Cell<PollState>,
    wake: Notify,
}

impl HandleState {
    fn is_stopped(&self) -> bool {
        self.state.get() == PollState::Stopped
    }

    fn stop(&self) {
        if !self.is_stopped() {
            self.state.set(PollState::Stopped);
            self.wake.notify_one();
        }
    }
}

impl<A: PortalApi + 'static> NotificationSyncEngine<A> {
    /// Create an engine that polls every `interval` (`None`: only on start and
    /// on explicit refresh). The engine follows `credentials`: handles wake up
    /// when a credential appears and stop when it is cleared.
    pub fn new(api: Rc<A>, credentials: CredentialStore, interval: Option<Duration>) -> Self {
        let inner = Rc::new(EngineInner {
            api,
            credentials: credentials.clone(),
            interval,
            identity: Cell::new(credentials.user_id()),
            unread: Cell::new(0),
            completed: Cell::new(0),
            handles: RefCell::new(Vec::new()),
            next_handle: Cell::new(0),
            listeners: Listeners::new(),
            on_unauthorized: RefCell::new(None),
            credential_subscription: RefCell::new(None),
        });

        let weak: Weak<EngineInner<A>> = Rc::downgrade(&inner);
        let subscription = credentials.subscribe(move |credential| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            match credential {
                Some(c) => {
                    // A different user never sees the previous user's count
                    if inner.identity.replace(c.user_id) != c.user_id {
                        inner.publish(0);
                    }
                    inner.wake_all();
                }
                None => {
                    inner.identity.set(None);
                    inner.stop_all();
                    inner.publish(0);
                }
            }
        });
        *inner.credential_subscription.borrow_mut() = Some(subscription);

        Self { inner }
    }

    /// Register a new poll loop.
    pub fn start(&self) -> (PollHandle, PollTask) {
        let id = self.inner.next_handle.get();
        self.inner.next_handle.set(id + 1);

        let state = Rc::new(HandleState {
            id,
            state: Cell::new(PollState::Idle),
            wake: Notify::new(),
        });
        {
            let mut handles = self.inner.handles.borrow_mut();
            handles.retain(|h| !h.is_stopped());
            handles.push(Rc::clone(&state));
        }
        tracing::debug!("poll handle {} started", id);

        let task = Box::pin(run_poll_loop(Rc::clone(&self.inner), Rc::clone(&state)));
        (PollHandle { state }, task)
    }

    /// The unread count from the most recently completed poll.
    pub fn unread_count(&self) -> u32 {
        self.inner.unread.get()
    }

    /// Number of poll results that were written to the count.
    pub fn completed_polls(&self) -> u64 {
        self.inner.completed.get()
    }

    /// Handles that have not been stopped.
    pub fn live_handles(&self) -> usize {
        self.inner
            .handles
            .borrow()
            .iter()
            .filter(|h| !h.is_stopped())
            .count()
    }

    /// Stop every handle. Used by logout.
    pub fn stop_all(&self) {
        self.inner.stop_all();
    }

    /// Call `listener` whenever the unread count changes.
    pub fn subscribe(&self, listener: impl Fn(&u32) + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    /// Called after a poll is rejected with 401. The count is already zeroed.
    pub(crate) fn set_unauthorized_hook(&self, hook: impl Fn() + 'static) {
        *self.inner.on_unauthorized.borrow_mut() = Some(Rc::new(hook));
    }
}

impl<A: PortalApi + 'static> EngineInner<A> {
    fn stop_all(&self) {
        let handles: Vec<Rc<HandleState>> = self.handles.borrow_mut().drain(..).collect();
        if !handles.is_empty() {
            tracing::debug!("stopping {} poll handle(s)", handles.len());
        }
        for handle in handles {
            handle.stop();
        }
    }

    fn wake_all(&self) {
        for handle in self.handles.borrow().iter().filter(|h| !h.is_stopped()) {
            handle.wake.notify_one();
        }
    }

    fn next_tick(&self) -> LocalBoxFuture<'static, ()> {
        match self.interval {
            Some(interval) => time::sleep(interval),
            None => time::never(),
        }
    }

    fn issue(&self, handle: &HandleState, in_flight: &mut FuturesUnordered<PollFetch>) {
        let Some(token) = self.credentials.token() else {
            handle.state.set(PollState::Idle);
            return;
        };
        handle.state.set(PollState::Polling);
        tracing::debug!("poll handle {} fetching notifications", handle.id);

        let api = Rc::clone(&self.api);
        in_flight.push(Box::pin(async move {
            let result = api
                .list_notifications(&token)
                .await
                .map(|items| count_unread(&items));
            (token, result)
        }));
    }

    fn complete(&self, handle: &HandleState, token: &str, result: Result<u32, ApiError>) {
        if handle.is_stopped() {
            tracing::debug!("poll handle {} stopped; discarding late result", handle.id);
            return;
        }
        if self.credentials.token().as_deref() != Some(token) {
            tracing::debug!("poll handle {} result belongs to a previous session; discarding", handle.id);
            return;
        }

        let mut unauthorized = false;
        let count = match result {
            Ok(count) => count,
            Err(e) => {
                unauthorized = e.is_unauthorized();
                tracing::warn!("Notification poll failed: {}", e);
                0
            }
        };

        self.completed.set(self.completed.get() + 1);
        self.publish(count);

        if unauthorized {
            let hook = self.on_unauthorized.borrow().clone();
            if let Some(hook) = hook {
                hook();
            }
        }
    }

    fn publish(&self, count: u32) {
        if self.unread.replace(count) != count {
            self.listeners.notify(&count);
        }
    }
}

async fn run_poll_loop<A: PortalApi + 'static>(engine: Rc<EngineInner<A>>, handle: Rc<HandleState>) {
    let mut in_flight: FuturesUnordered<PollFetch> = FuturesUnordered::new();
    // First poll right away, then on the interval.
    let mut tick = time::sleep(Duration::ZERO);

    while !handle.is_stopped() {
        tokio::select! {
            biased;
            Some((token, result)) = in_flight.next(), if !in_flight.is_empty() => {
                engine.complete(&handle, &token, result);
            }
            _ = handle.wake.notified() => {
                if !handle.is_stopped() {
                    engine.issue(&handle, &mut in_flight);
                }
            }
            _ = &mut tick => {
                tick = engine.next_tick();
                engine.issue(&handle, &mut in_flight);
            }
        }
    }

    if !in_flight.is_empty() {
        tracing::debug!(
            "poll handle {} exited with {} request(s) in flight",
            handle.id,
            in_flight.len()
        );
    }
}

/// One screen's poll loop. Dropping the handle stops the loop.
pub struct PollHandle {
    state: Rc<HandleState>,
}

impl PollHandle {
    pub fn id(&self) -> u64 {
        self.state.id
    }

    pub fn state(&self) -> PollState {
        self.state.state.get()
    }

    pub fn is_live(&self) -> bool {
        !self.state.is_stopped()
    }

    /// Poll now instead of waiting for the next tick.
    pub fn refresh_now(&self) {
        if self.is_live() {
            self.state.wake.notify_one();
        }
    }

    /// Stop this loop only. Idempotent.
    pub fn stop(&self) {
        if self.is_live() {
            tracing::debug!("poll handle {} stopped", self.state.id);
        }
        self.state.stop();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for PollHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollHandle")
            .field("id", &self.id())
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::ScriptedApi;
    use crate::{Credential, Role};
    use tokio::task::{spawn_local, LocalSet};
    use tokio::time::sleep;

    const MINUTE: Duration = Duration::from_secs(60);

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    fn logged_in() -> CredentialStore {
        let store = CredentialStore::restore(MemoryStorage::new());
        store
            .set(Credential::new("tok-1", 1, Role::Student, "Kemi"))
            .unwrap();
        store
    }

    fn engine(api: &ScriptedApi, store: &CredentialStore) -> NotificationSyncEngine<ScriptedApi> {
        NotificationSyncEngine::new(Rc::new(api.clone()), store.clone(), Some(MINUTE))
    }

    fn record_counts(engine: &NotificationSyncEngine<ScriptedApi>) -> (Rc<RefCell<Vec<u32>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let sub = engine.subscribe(move |count| sink.borrow_mut().push(*count));
        (seen, sub)
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_completion_wins() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);
                let (seen, _sub) = record_counts(&engine);

                // A: issued t=0, completes t=5 with 3 unread
                api.push_unread(secs(5), 3);
                // B: issued t=1, completes t=3 with 1 unread
                api.push_unread(secs(2), 1);

                let (handle_a, task_a) = engine.start();
                spawn_local(task_a);
                sleep(secs(1)).await;
                let (handle_b, task_b) = engine.start();
                spawn_local(task_b);

                sleep(millis(2500)).await; // t=3.5
                assert_eq!(engine.unread_count(), 1);

                sleep(secs(2)).await; // t=5.5
                assert_eq!(engine.unread_count(), 3);
                assert_eq!(*seen.borrow(), vec![1, 3]);
                assert_eq!(engine.completed_polls(), 2);

                drop((handle_a, handle_b));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_after_clear_is_discarded() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);
                let (seen, _sub) = record_counts(&engine);

                api.push_unread(secs(5), 4);
                let (handle, task) = engine.start();
                spawn_local(task);

                sleep(secs(2)).await;
                assert_eq!(handle.state(), PollState::Polling);
                store.clear();
                assert_eq!(handle.state(), PollState::Stopped);

                sleep(secs(10)).await;
                assert_eq!(engine.unread_count(), 0);
                assert!(seen.borrow().iter().all(|&c| c == 0));
                assert_eq!(engine.completed_polls(), 0);
            })
            .await;
    }

    #[test]
    fn test_complete_checks_handle_is_live() {
        let store = logged_in();
        let api = ScriptedApi::new();
        let engine = engine(&api, &store);
        let (handle, _task) = engine.start();

        engine.inner.complete(&handle.state, "tok-1", Ok(5));
        assert_eq!(engine.unread_count(), 5);

        handle.stop();
        engine.inner.complete(&handle.state, "tok-1", Ok(9));
        assert_eq!(engine.unread_count(), 5);
    }

    #[test]
    fn test_complete_checks_token_still_current() {
        let store = logged_in();
        let api = ScriptedApi::new();
        let engine = engine(&api, &store);
        let (handle, _task) = engine.start();

        store
            .set(Credential::new("tok-2", 2, Role::Teacher, "Bola"))
            .unwrap();
        engine.inner.complete(&handle.state, "tok-1", Ok(8));
        assert_eq!(engine.unread_count(), 0);

        engine.inner.complete(&handle.state, "tok-2", Ok(2));
        assert_eq!(engine.unread_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_user_resets_count_before_first_poll() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);

                api.push_unread(Duration::ZERO, 5);
                let (_handle, task) = engine.start();
                spawn_local(task);
                sleep(secs(1)).await;
                assert_eq!(engine.unread_count(), 5);

                // Same user with a refreshed token keeps the count
                api.push_unread(secs(10), 5);
                store
                    .set(Credential::new("tok-1b", 1, Role::Student, "Kemi"))
                    .unwrap();
                assert_eq!(engine.unread_count(), 5);
                sleep(millis(100)).await;

                // The new user's first poll is slow
                api.push_unread(secs(10), 2);
                store
                    .set(Credential::new("tok-2", 2, Role::Teacher, "Bola"))
                    .unwrap();
                assert_eq!(engine.unread_count(), 0);

                sleep(secs(2)).await;
                assert_eq!(engine.unread_count(), 0);

                // The refreshed-token poll lands first but belongs to user 1
                sleep(secs(10)).await;
                assert_eq!(engine.unread_count(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopping_one_handle_leaves_others_running() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);

                let (handle_a, task_a) = engine.start();
                let (handle_b, task_b) = engine.start();
                spawn_local(task_a);
                spawn_local(task_b);
                sleep(secs(1)).await;
                assert_eq!(api.notification_calls(), 2);

                handle_a.stop();
                assert_eq!(engine.live_handles(), 1);

                api.push_unread(Duration::ZERO, 6);
                sleep(MINUTE).await; // t=61: only B ticks
                assert_eq!(api.notification_calls(), 3);
                assert_eq!(engine.unread_count(), 6);
                assert!(handle_b.is_live());
                assert!(!handle_a.is_live());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_do_not_wait_for_slow_polls() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);

                // First poll hangs for 90s; the 60s tick must still fire
                api.push_unread(secs(90), 2);
                api.push_unread(secs(1), 5);
                let (_handle, task) = engine.start();
                spawn_local(task);

                sleep(secs(62)).await;
                assert_eq!(api.notification_calls(), 2);
                assert_eq!(engine.unread_count(), 5);

                sleep(secs(30)).await; // t=92: slow poll lands last and wins
                assert_eq!(engine.unread_count(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_resets_to_zero() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);

                api.push_unread(Duration::ZERO, 3);
                api.push_notifications(Duration::ZERO, Err(ApiError::Status { status: 502 }));
                let (_handle, task) = engine.start();
                spawn_local(task);

                sleep(secs(1)).await;
                assert_eq!(engine.unread_count(), 3);

                sleep(MINUTE).await;
                assert_eq!(engine.unread_count(), 0);
                assert!(store.is_authenticated());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_until_credential_appears() {
        LocalSet::new()
            .run_until(async {
                let store = CredentialStore::restore(MemoryStorage::new());
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);

                let (handle, task) = engine.start();
                spawn_local(task);
                sleep(secs(1)).await;
                assert_eq!(handle.state(), PollState::Idle);
                assert_eq!(api.notification_calls(), 0);

                api.push_unread(Duration::ZERO, 2);
                store
                    .set(Credential::new("tok-1", 1, Role::Student, "Kemi"))
                    .unwrap();
                sleep(secs(1)).await;
                assert_eq!(handle.state(), PollState::Polling);
                assert_eq!(engine.unread_count(), 2);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_now_polls_immediately() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);

                api.push_unread(Duration::ZERO, 4);
                api.push_unread(Duration::ZERO, 1);
                let (handle, task) = engine.start();
                spawn_local(task);
                sleep(secs(1)).await;
                assert_eq!(engine.unread_count(), 4);

                handle.refresh_now();
                sleep(secs(1)).await;
                assert_eq!(api.notification_calls(), 2);
                assert_eq!(engine.unread_count(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_interval_polls_only_on_start() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = NotificationSyncEngine::new(Rc::new(api.clone()), store.clone(), None);

                let (_handle, task) = engine.start();
                spawn_local(task);
                sleep(secs(600)).await;
                assert_eq!(api.notification_calls(), 1);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_unauthorized_runs_hook() {
        LocalSet::new()
            .run_until(async {
                let store = logged_in();
                let api = ScriptedApi::new();
                let engine = engine(&api, &store);
                let fired = Rc::new(Cell::new(0));
                let counter = fired.clone();
                engine.set_unauthorized_hook(move || counter.set(counter.get() + 1));

                api.push_notifications(Duration::ZERO, Err(ApiError::Unauthorized));
                let (_handle, task) = engine.start();
                spawn_local(task);
                sleep(secs(1)).await;

                assert_eq!(fired.get(), 1);
                assert_eq!(engine.unread_count(), 0);
            })
            .await;
    }
}
