//! Avatar image with runtime fallback.
//!
//! The snapshot's `avatar_url` is the profile image or the silhouette
//! placeholder. If the browser fails to load it, the component swaps to the
//! session's static fallback image. The failure is remembered per URL, so a
//! new avatar gets a fresh attempt.

use dioxus::prelude::*;

use crate::provider::{use_portal_session, use_session};

/// Image to show for `avatar_url`: the fallback once that exact URL has failed.
pub fn avatar_src(avatar_url: &str, failed_url: Option<&str>, fallback: &str) -> String {
    if failed_url == Some(avatar_url) {
        fallback.to_string()
    } else {
        avatar_url.to_string()
    }
}

#[component]
pub fn Avatar(
    #[props(default = 36)] size: u32,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let state = use_session()();
    let fallback = use_portal_session().fallback_avatar_url();
    let mut failed_url = use_signal(|| Option::<String>::None);

    let url = state.avatar_url.clone();
    let src = avatar_src(&url, failed_url().as_deref(), &fallback);
    let alt = state
        .profile
        .as_ref()
        .map(|p| p.initials())
        .unwrap_or_else(|| "User".to_string());

    rsx! {
        img {
            class: "avatar {class}",
            src: "{src}",
            alt: "{alt}",
            width: "{size}",
            height: "{size}",
            onerror: move |_| {
                tracing::debug!("avatar {} failed to load; using fallback", url);
                failed_url.set(Some(url.clone()));
            },
        }
    }
}
