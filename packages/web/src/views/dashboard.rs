//! Role dashboards. Each one mounts its own notification poll for as long as
//! it is on screen.

use dioxus::prelude::*;
use session::Role;
use ui::{use_notification_poll, use_session, Navbar};

use crate::{go_to, Route};

#[component]
pub fn AdminDashboard() -> Element {
    rsx! { Dashboard { role: Role::Admin, title: "Administration" } }
}

#[component]
pub fn TeacherDashboard() -> Element {
    rsx! { Dashboard { role: Role::Teacher, title: "Teaching" } }
}

#[component]
pub fn StudentDashboard() -> Element {
    rsx! { Dashboard { role: Role::Student, title: "My classes" } }
}

#[component]
pub fn DonorDashboard() -> Element {
    rsx! { Dashboard { role: Role::Donor, title: "Sponsorships" } }
}

/// Shared dashboard shell. Sends anonymous visitors to `/login` and users of
/// another role to their own dashboard.
#[component]
fn Dashboard(role: Role, title: String) -> Element {
    let poll = use_notification_poll();
    let state = use_session()();
    let nav = use_navigator();

    match state.credential.as_ref() {
        None => {
            nav.replace(Route::Login {});
        }
        Some(credential) if credential.role != role => go_to(nav, state.default_route),
        Some(_) => {}
    }

    let name = state.display_name();
    let unread = match state.unread_count {
        0 => "You're all caught up.".to_string(),
        1 => "You have 1 unread notification.".to_string(),
        n => format!("You have {n} unread notifications."),
    };
    let refresh = move |_| poll.refresh_now();

    rsx! {
        div {
            class: "dashboard",
            Navbar {
                on_logged_out: move |route: String| go_to(nav, &route),
                h2 { class: "navbar-title", "{title}" }
            }
            main {
                class: "dashboard-content",
                h1 { "Welcome, {name}" }
                p { class: "dashboard-unread", "{unread}" }
                button { class: "dashboard-refresh", onclick: refresh, "Check now" }
            }
        }
    }
}
