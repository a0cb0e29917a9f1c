//! # API crate: client side of the portal REST backend
//!
//! The portal backend is an external service; this crate only describes the
//! slice of it the session layer consumes and provides one HTTP client for it.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Wire types: [`NotificationItem`], [`ProfileRecord`], [`LoginRequest`], [`LoginResponse`] |
//! | `client` | [`HttpPortalApi`], the `reqwest` implementation of [`PortalApi`] |
//! | `error` | [`ApiError`], shared by every implementation |
//!
//! ## The [`PortalApi`] trait
//!
//! Three async calls, written as `impl Future` returns so implementations can be
//! plain `async fn`s. The session layer is generic over this trait, which is how
//! its tests swap in a scripted backend with controllable latency.

use std::future::Future;

mod client;
mod error;
pub mod models;

pub use client::HttpPortalApi;
pub use error::ApiError;
pub use models::{
    count_unread, LoginRequest, LoginResponse, LoginUser, NotificationItem, ProfileRecord, UserId,
};

/// Async interface to the portal backend.
pub trait PortalApi {
    /// Exchange email and password for a bearer token and user record.
    fn login(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>>;

    /// List the caller's notifications.
    fn list_notifications(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<NotificationItem>, ApiError>>;

    /// Look up the display profile of `user_id`.
    fn fetch_profile(
        &self,
        token: &str,
        user_id: UserId,
    ) -> impl Future<Output = Result<ProfileRecord, ApiError>>;
}
