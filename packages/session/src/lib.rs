//! # Session crate: identity, profile and notification sync for the portal
//!
//! Every portal screen (admin, teacher, student, donor) shares one
//! [`SessionContext`]. It owns the credential, derives the landing route and
//! display profile from it, and keeps a process-wide unread-notification count
//! fresh while screens come and go.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`credential`] | [`Credential`] and the closed [`Role`] enum |
//! | [`credential_store`] | [`CredentialStore`]: validated, persisted, observable identity |
//! | [`storage`] | [`CredentialStorage`] backends: memory, file (native), localStorage (web) |
//! | [`profile`] | [`Profile`] and [`ProfileResolver`]: cached lookup with credential fallback |
//! | [`avatar`] | [`resolve_avatar_url`] / [`fallback_avatar_url`]: two-stage avatar fallback |
//! | [`routes`] | [`default_route_for`]: role → landing route |
//! | [`notifications`] | [`NotificationSyncEngine`] and [`PollHandle`]: concurrent polling into one unread count |
//! | [`context`] | [`SessionContext`]: composition, login/logout lifecycle, [`SessionSnapshot`] |
//! | [`config`] | [`PortalConfig`], loaded from `portal.toml` |
//!
//! ## Threading
//!
//! The layer is built for a single-threaded event loop (the browser, or a
//! Dioxus desktop/mobile UI thread). Shared state lives in `Rc`/`RefCell`,
//! poll loops are `!Send` futures to be spawned on a local executor, and no
//! `RefCell` borrow is ever held across an `.await`. Native sleeps use Tokio,
//! WASM sleeps use `gloo-timers`.

pub mod avatar;
pub mod config;
pub mod context;
pub mod credential;
pub mod credential_store;
mod error;
mod listeners;
pub mod notifications;
pub mod profile;
pub mod routes;
pub mod storage;
mod time;

#[cfg(test)]
mod testing;

pub use avatar::{fallback_avatar_url, resolve_avatar_url};
pub use config::PortalConfig;
pub use context::{LogoutOutcome, SessionContext, SessionSnapshot, LOGOUT_REDIRECT};
pub use credential::{Credential, Role};
pub use credential_store::CredentialStore;
pub use error::SessionError;
pub use listeners::Subscription;
pub use notifications::{NotificationSyncEngine, PollHandle, PollState, PollTask};
pub use profile::{Profile, ProfileResolver};
pub use routes::{default_route_for, default_route_for_name, route_for_credential, PUBLIC_ROOT};
pub use storage::{CredentialStorage, MemoryStorage};

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use storage::LocalStorage;
