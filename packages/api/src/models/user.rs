//! # User-facing records returned by the portal backend
//!
//! Two shapes cross the wire for a user:
//!
//! ## [`ProfileRecord`]
//!
//! The body of `GET /profiles/{user_id}`. It carries the display fields the
//! portal header needs: `full_name`, the raw `role` string, and an optional
//! `avatar_path` that is either server-relative (`/media/avatars/42.png`) or
//! absolute.
//!
//! ## [`LoginResponse`]
//!
//! The body of a successful `POST /auth/login`: an opaque bearer `token` and the
//! authenticated [`LoginUser`]. The session layer turns this into its own
//! credential type; nothing in this crate interprets the token.
//!
//! Role strings are passed through untouched (`"admin"`, `"teacher"`,
//! `"student"`, `"donor"`). Mapping them onto a closed set is the session
//! layer's job.

use serde::{Deserialize, Serialize};

/// Numeric primary key of a portal user.
pub type UserId = i64;

/// Display profile as served by `GET /profiles/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRecord {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub avatar_path: Option<String>,
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// User attributes returned alongside a fresh token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginUser {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    pub role: String,
    /// Class or section for students ("10-B"); absent for every other role.
    #[serde(default)]
    pub class_group: Option<String>,
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}
