//! # `reqwest`-backed [`PortalApi`]
//!
//! [`HttpPortalApi`] talks JSON over HTTP to the portal backend. Every call is a
//! single request with no retries: the notification poller treats the next tick
//! as its only retry, and profile lookups degrade to a fallback instead.
//!
//! | Call | Request |
//! |------|---------|
//! | [`login`](PortalApi::login) | `POST {base}/auth/login` with a JSON [`LoginRequest`] |
//! | [`list_notifications`](PortalApi::list_notifications) | `GET {base}/notifications` with `Authorization: Bearer <token>` |
//! | [`fetch_profile`](PortalApi::fetch_profile) | `GET {base}/profiles/{user_id}` with `Authorization: Bearer <token>` |
//!
//! Status handling is shared: 2xx bodies are decoded, 401 becomes
//! [`ApiError::Unauthorized`], anything else becomes [`ApiError::Status`].

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, NotificationItem, ProfileRecord, UserId};
use crate::PortalApi;

/// HTTP client for the portal REST backend.
#[derive(Debug, Clone)]
pub struct HttpPortalApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPortalApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join `path` onto the base URL with exactly one slash between them.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        if let Some(err) = ApiError::from_status(status) {
            tracing::debug!("portal backend answered {}", status);
            return Err(err);
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn get_authorized<T: DeserializeOwned>(&self, path: &str, token: &str) -> Result<T, ApiError> {
        let request = self.client.get(self.url(path)).bearer_auth(token);
        self.send(request).await
    }
}

impl PortalApi for HttpPortalApi {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let request = self.client.post(self.url("auth/login")).json(&body);
        self.send(request).await
    }

    async fn list_notifications(&self, token: &str) -> Result<Vec<NotificationItem>, ApiError> {
        self.get_authorized("notifications", token).await
    }

    async fn fetch_profile(&self, token: &str, user_id: UserId) -> Result<ProfileRecord, ApiError> {
        self.get_authorized(&format!("profiles/{user_id}"), token).await
    }
}
