//! # SessionContext: one object every screen shares
//!
//! Composes the credential store, profile resolver and notification engine
//! behind a single cloneable handle, and exposes what a screen needs as a
//! [`SessionSnapshot`].
//!
//! ## Lifecycle
//!
//! | Event | What happens |
//! |-------|--------------|
//! | start | [`SessionContext::new`] restores the persisted credential. The host then spawns [`hydrate_profile`](SessionContext::hydrate_profile). |
//! | screen mounts | The screen calls [`start_polling`](SessionContext::start_polling) and spawns the returned task. |
//! | login | [`login`](SessionContext::login) stores the new credential (waking idle poll loops) and hydrates the profile. |
//! | logout | [`logout`](SessionContext::logout) stops every poll loop, clears the credential, drops the profile, and reports where to navigate. |
//! | 401 from a poll or profile lookup | Same teardown as logout, without navigation. |
//!
//! Logout is idempotent: only the call that actually ends a session has side
//! effects and returns a redirect; later calls report
//! [`LogoutOutcome::AlreadyLoggedOut`].
//!
//! Subscribers registered with [`subscribe`](SessionContext::subscribe) receive
//! a fresh snapshot after every change to the credential, profile, or unread
//! count.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use api::{ApiError, PortalApi};

use crate::avatar::{fallback_avatar_url, resolve_avatar_url};
use crate::listeners::{Listeners, Subscription};
use crate::notifications::{NotificationSyncEngine, PollHandle, PollTask};
use crate::profile::{Profile, ProfileResolver};
use crate::routes::{route_for_credential, PUBLIC_ROOT};
use crate::storage::CredentialStorage;
use crate::{Credential, CredentialStore, PortalConfig, SessionError};

/// What a screen reads from the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub credential: Option<Credential>,
    pub profile: Option<Profile>,
    pub unread_count: u32,
    /// Stage-one avatar URL; see [`crate::avatar`].
    pub avatar_url: String,
    pub default_route: &'static str,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Profile name, then credential name, then `"User"`.
    pub fn display_name(&self) -> String {
        if let Some(profile) = &self.profile {
            return profile.display_name().to_string();
        }
        match &self.credential {
            Some(c) if !c.full_name.trim().is_empty() => c.full_name.trim().to_string(),
            _ => "User".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// A session was ended; navigate to `redirect`.
    LoggedOut { redirect: &'static str },
    /// Nothing to do; another caller already logged out.
    AlreadyLoggedOut,
}

/// Where logout sends the user.
pub const LOGOUT_REDIRECT: &str = PUBLIC_ROOT;

/// Process-wide session. Clones share state.
pub struct SessionContext<A> {
    inner: Rc<ContextInner<A>>,
}

impl<A> Clone for SessionContext<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<A> PartialEq for SessionContext<A> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

struct ContextInner<A> {
    config: PortalConfig,
    api: Rc<A>,
    credentials: CredentialStore,
    profiles: ProfileResolver<A>,
    notifications: NotificationSyncEngine<A>,
    /// Profile shown for the current identity, fallback included.
    profile: RefCell<Option<Profile>>,
    listeners: Listeners<SessionSnapshot>,
    subscriptions: RefCell<Vec<Subscription>>,
}

impl<A: PortalApi + 'static> SessionContext<A> {
    /// Build the session and restore any persisted credential from `storage`.
    pub fn new(config: PortalConfig, api: A, storage: impl CredentialStorage + 'static) -> Self {
        let api = Rc::new(api);
        let credentials = CredentialStore::restore(storage);
        let profiles = ProfileResolver::new(Rc::clone(&api), credentials.clone());
        let notifications = NotificationSyncEngine::new(
            Rc::clone(&api),
            credentials.clone(),
            config.notifications.poll_interval(),
        );

        if let Some(credential) = credentials.get() {
            tracing::info!(
                "Restored session for user {:?} ({})",
                credential.user_id,
                credential.role
            );
        }

        let inner = Rc::new(ContextInner {
            config,
            api,
            credentials,
            profiles,
            notifications,
            profile: RefCell::new(None),
            listeners: Listeners::new(),
            subscriptions: RefCell::new(Vec::new()),
        });

        let weak = Rc::downgrade(&inner);
        let on_credential = inner.credentials.subscribe({
            let weak = Weak::clone(&weak);
            move |credential| {
                if let Some(inner) = weak.upgrade() {
                    inner.credential_changed(credential.as_ref());
                }
            }
        });
        let on_unread = inner.notifications.subscribe({
            let weak = Weak::clone(&weak);
            move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.emit();
                }
            }
        });
        inner.notifications.set_unauthorized_hook(move || {
            if let Some(inner) = weak.upgrade() {
                inner.credential_rejected();
            }
        });
        inner
            .subscriptions
            .borrow_mut()
            .extend([on_credential, on_unread]);

        Self { inner }
    }

    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    pub fn profiles(&self) -> &ProfileResolver<A> {
        &self.inner.profiles
    }

    pub fn notifications(&self) -> &NotificationSyncEngine<A> {
        &self.inner.notifications
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshot()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.credentials.is_authenticated()
    }

    /// URL to swap in when the snapshot's avatar fails to load.
    pub fn fallback_avatar_url(&self) -> String {
        fallback_avatar_url(&self.inner.config.assets)
    }

    /// Call `listener` with a fresh snapshot after every session change.
    pub fn subscribe(&self, listener: impl Fn(&SessionSnapshot) + 'static) -> Subscription {
        self.inner.listeners.subscribe(listener)
    }

    /// Start a poll loop for the calling screen.
    pub fn start_polling(&self) -> (PollHandle, PollTask) {
        self.inner.notifications.start()
    }

    /// Resolve the current user's profile into the snapshot.
    ///
    /// Returns `None` when logged out, when the identity changed while the
    /// lookup was in flight, or when the backend rejected the credential.
    pub async fn hydrate_profile(&self) -> Option<Profile> {
        let user_id = self.inner.credentials.user_id()?;
        let token = self.inner.credentials.token();
        let (profile, error) = self.inner.profiles.resolve_reporting(user_id).await;

        // Only the session that issued the lookup may act on its outcome
        if self.inner.credentials.token() != token {
            tracing::debug!("identity changed while resolving user {}; dropping result", user_id);
            return None;
        }
        if matches!(error, Some(ApiError::Unauthorized)) {
            self.inner.credential_rejected();
            return None;
        }

        *self.inner.profile.borrow_mut() = Some(profile.clone());
        self.inner.emit();
        Some(profile)
    }

    /// Log in with email and password, then hydrate the profile.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionSnapshot, SessionError> {
        let response = self.inner.api.login(email, password).await?;
        let credential = Credential::from_login(response);
        self.inner.credentials.set(credential.clone())?;
        tracing::info!(
            "Logged in user {:?} ({})",
            credential.user_id,
            credential.role
        );

        self.hydrate_profile().await;
        Ok(self.snapshot())
    }

    /// End the session. Safe to call any number of times.
    pub fn logout(&self) -> LogoutOutcome {
        if !self.inner.credentials.is_authenticated() {
            tracing::debug!("logout requested with no active session");
            return LogoutOutcome::AlreadyLoggedOut;
        }
        let user_id = self.inner.credentials.user_id();
        self.inner.teardown();
        tracing::info!("Logged out user {:?}", user_id);
        LogoutOutcome::LoggedOut {
            redirect: route_for_credential(None),
        }
    }
}

impl<A: PortalApi + 'static> ContextInner<A> {
    fn snapshot(&self) -> SessionSnapshot {
        let credential = self.credentials.get();
        let profile = self.profile.borrow().clone();
        SessionSnapshot {
            avatar_url: resolve_avatar_url(profile.as_ref(), &self.config.assets),
            default_route: route_for_credential(credential.as_ref()),
            unread_count: self.notifications.unread_count(),
            credential,
            profile,
        }
    }

    fn emit(&self) {
        let snapshot = self.snapshot();
        self.listeners.notify(&snapshot);
    }

    fn credential_changed(&self, credential: Option<&Credential>) {
        let stale = {
            let profile = self.profile.borrow();
            match (profile.as_ref(), credential) {
                (Some(p), Some(c)) => c.user_id != Some(p.id),
                (Some(_), None) => true,
                (None, _) => false,
            }
        };
        if stale || credential.is_none() {
            self.profiles.invalidate();
            self.profile.borrow_mut().take();
        }
        self.emit();
    }

    /// Ordered teardown shared by logout and credential rejection.
    fn teardown(&self) {
        self.notifications.stop_all();
        self.credentials.clear();
        self.profiles.invalidate();
        self.profile.borrow_mut().take();
        self.emit();
    }

    fn credential_rejected(&self) {
        if self.credentials.is_authenticated() {
            tracing::warn!("Backend rejected the session credential; logging out");
            self.teardown();
        }
    }
}

impl<A> std::fmt::Debug for SessionContext<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("credentials", &self.inner.credentials)
            .finish()
    }
}
