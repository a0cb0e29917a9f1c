//! Login form and logout button.

use api::ApiError;
use dioxus::prelude::*;
use session::{LogoutOutcome, SessionError};

use crate::icons::FaRightFromBracket;
use crate::provider::use_portal_session;
use crate::Icon;

/// User-facing text for a failed login.
pub fn login_error_message(error: &SessionError) -> String {
    match error {
        SessionError::Api(ApiError::Unauthorized) => "Incorrect email or password.".to_string(),
        SessionError::Api(ApiError::Network(_)) => "Could not reach the server. Try again.".to_string(),
        SessionError::Api(ApiError::Status { status }) if *status >= 500 => {
            "The server had a problem. Try again later.".to_string()
        }
        _ => "Login failed.".to_string(),
    }
}

/// Email + password form. Calls `on_logged_in` with the role's landing route.
#[component]
pub fn LoginForm(on_logged_in: EventHandler<String>) -> Element {
    let session = use_portal_session();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut loading = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);

    let onsubmit = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        async move {
            loading.set(true);
            error.set(None);
            match session.login(email().trim(), &password()).await {
                Ok(snapshot) => {
                    password.set(String::new());
                    on_logged_in.call(snapshot.default_route.to_string());
                }
                Err(e) => {
                    tracing::error!("Login failed: {}", e);
                    error.set(Some(login_error_message(&e)));
                }
            }
            loading.set(false);
        }
    };

    rsx! {
        form {
            class: "login-form",
            onsubmit: onsubmit,

            label { r#for: "login-email", "Email" }
            input {
                id: "login-email",
                r#type: "email",
                value: "{email}",
                oninput: move |e| email.set(e.value()),
            }

            label { r#for: "login-password", "Password" }
            input {
                id: "login-password",
                r#type: "password",
                value: "{password}",
                oninput: move |e| password.set(e.value()),
            }

            if let Some(message) = error() {
                p { class: "login-error", "{message}" }
            }

            button {
                r#type: "submit",
                class: "login-btn",
                disabled: loading(),
                if loading() { "Signing in..." } else { "Sign in" }
            }
        }
    }
}

/// Button to log out the current user after confirmation.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    on_logged_out: EventHandler<String>,
) -> Element {
    let session = use_portal_session();

    let onclick = move |_| {
        if !confirm_logout() {
            return;
        }
        match session.logout() {
            LogoutOutcome::LoggedOut { redirect } => on_logged_out.call(redirect.to_string()),
            LogoutOutcome::AlreadyLoggedOut => tracing::debug!("logout clicked with no active session"),
        }
    };

    rsx! {
        button {
            class: "{class}",
            title: "{label}",
            onclick: onclick,
            Icon { icon: FaRightFromBracket, width: 14, height: 14 }
            span { "{label}" }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn confirm_logout() -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message("Are you sure you want to log out?").ok())
        .unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn confirm_logout() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_error_message() {
        assert_eq!(
            login_error_message(&SessionError::Api(ApiError::Unauthorized)),
            "Incorrect email or password."
        );
        assert_eq!(
            login_error_message(&SessionError::Api(ApiError::Network("refused".into()))),
            "Could not reach the server. Try again."
        );
        assert_eq!(
            login_error_message(&SessionError::Api(ApiError::Status { status: 503 })),
            "The server had a problem. Try again later."
        );
        assert_eq!(
            login_error_message(&SessionError::Api(ApiError::Status { status: 422 })),
            "Login failed."
        );
    }
}
