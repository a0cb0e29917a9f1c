use dioxus::prelude::*;

use crate::provider::use_session;
use crate::{Avatar, LogoutButton, NotificationBadge};

/// Portal header: avatar, name and role, unread badge, logout.
#[component]
pub fn Navbar(
    on_logged_out: EventHandler<String>,
    children: Element,
) -> Element {
    let state = use_session()();
    let name = state.display_name();
    let role = state
        .credential
        .as_ref()
        .map(|c| c.role.to_string())
        .unwrap_or_default();

    rsx! {
        div {
            class: "navbar",
            {children}
            div {
                class: "navbar-user",
                NotificationBadge {}
                Avatar { size: 32 }
                span { class: "navbar-user-name", "{name}" }
                if !role.is_empty() {
                    span { class: "navbar-user-role", "{role}" }
                }
                LogoutButton { class: "navbar-logout", on_logged_out: on_logged_out }
            }
        }
    }
}
