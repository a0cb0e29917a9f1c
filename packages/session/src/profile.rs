//! # Profile resolution
//!
//! [`ProfileResolver`] turns a user id into a display [`Profile`] via
//! `GET /profiles/{id}`. It never fails: when the lookup does not succeed the
//! caller gets a synthesized profile built from what the current credential
//! already says about that user, with no avatar.
//!
//! ## Cache
//!
//! A single slot keyed by user id. Asking for a different user empties the slot
//! before the request goes out, so one user's profile is never served for
//! another. Only successful lookups are cached; a fallback is retried on the
//! next resolve. [`invalidate`](ProfileResolver::invalidate) bumps a generation
//! counter so a lookup that was in flight when the session changed does not
//! repopulate the slot when it lands.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use api::{ApiError, PortalApi, ProfileRecord, UserId};
use serde::{Deserialize, Serialize};

use crate::{Credential, CredentialStore, Role};

/// Display-oriented user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub full_name: String,
    pub role: Role,
    pub avatar_path: Option<String>,
}

impl Profile {
    pub fn from_record(record: ProfileRecord) -> Self {
        Self {
            id: record.id,
            full_name: record.full_name,
            role: Role::parse(&record.role),
            avatar_path: record.avatar_path.filter(|p| !p.trim().is_empty()),
        }
    }

    /// Profile synthesized from the credential when the backend lookup fails.
    /// Name and role are only borrowed when the credential is for `user_id`.
    pub fn fallback(user_id: UserId, credential: Option<&Credential>) -> Self {
        match credential.filter(|c| c.user_id == Some(user_id)) {
            Some(c) => Self {
                id: user_id,
                full_name: c.full_name.clone(),
                role: c.role.clone(),
                avatar_path: None,
            },
            None => Self {
                id: user_id,
                full_name: String::new(),
                role: Role::Unknown(String::new()),
                avatar_path: None,
            },
        }
    }

    /// Full name, or `"User"` when the name is blank.
    pub fn display_name(&self) -> &str {
        let name = self.full_name.trim();
        if name.is_empty() {
            "User"
        } else {
            name
        }
    }

    /// Up to two uppercase initials, e.g. `"AO"` for "Ada Obi".
    pub fn initials(&self) -> String {
        self.display_name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Memoizing, failure-absorbing profile lookup.
pub struct ProfileResolver<A> {
    api: Rc<A>,
    credentials: CredentialStore,
    cache: RefCell<Option<Profile>>,
    generation: Cell<u64>,
}

impl<A: PortalApi> ProfileResolver<A> {
    pub fn new(api: Rc<A>, credentials: CredentialStore) -> Self {
        Self {
            api,
            credentials,
            cache: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// The cached profile, if any.
    pub fn cached(&self) -> Option<Profile> {
        self.cache.borrow().clone()
    }

    /// Empty the cache and orphan any lookup in flight.
    pub fn invalidate(&self) {
        self.generation.set(self.generation.get() + 1);
        self.cache.borrow_mut().take();
    }

    /// Resolve `user_id` to a profile. Never fails.
    pub async fn resolve(&self, user_id: UserId) -> Profile {
        self.resolve_reporting(user_id).await.0
    }

    /// Like [`resolve`](Self::resolve), but also hands back the absorbed error
    /// so the session can react to a rejected credential.
    pub(crate) async fn resolve_reporting(&self, user_id: UserId) -> (Profile, Option<ApiError>) {
        let cached = self.cached();
        match cached {
            Some(profile) if profile.id == user_id => {
                tracing::debug!("profile cache hit for user {}", user_id);
                return (profile, None);
            }
            Some(_) => self.invalidate(),
            None => {}
        }

        let Some(token) = self.credentials.token() else {
            tracing::debug!("no credential; using fallback profile for user {}", user_id);
            return (Profile::fallback(user_id, None), None);
        };

        let generation = self.generation.get();
        match self.api.fetch_profile(&token, user_id).await {
            Ok(record) => {
                let profile = Profile {
                    id: user_id,
                    ..Profile::from_record(record)
                };
                if self.generation.get() == generation {
                    *self.cache.borrow_mut() = Some(profile.clone());
                } else {
                    tracing::debug!("session changed during profile lookup for user {}; not caching", user_id);
                }
                (profile, None)
            }
            Err(e) => {
                tracing::warn!("Profile lookup for user {} failed: {}", user_id, e);
                let fallback = Profile::fallback(user_id, self.credentials.get().as_ref());
                (fallback, Some(e))
            }
        }
    }
}
