//! This crate contains all shared UI for the portal: the session provider,
//! its hooks, and the header widgets every screen renders.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod factory;
pub use factory::{make_session, PortalSession};

mod provider;
pub use provider::{use_notification_poll, use_portal_session, use_session, SessionProvider};

mod auth;
pub use auth::{login_error_message, LoginForm, LogoutButton};

mod avatar;
pub use avatar::{avatar_src, Avatar};

mod notification_badge;
pub use notification_badge::{badge_label, NotificationBadge};

mod navbar;
pub use navbar::Navbar;
