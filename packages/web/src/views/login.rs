//! Login page view.

use dioxus::prelude::*;
use ui::{use_session, LoginForm};

use crate::go_to;

/// Login page component.
#[component]
pub fn Login() -> Element {
    let state = use_session()();
    let nav = use_navigator();

    // If already logged in, redirect to the role's dashboard
    if state.is_authenticated() {
        go_to(nav, state.default_route);
    }

    rsx! {
        div {
            class: "login-container",
            h1 { "Campus Portal" }
            p { class: "login-subtitle", "Sign in with your school account" }
            LoginForm {
                on_logged_in: move |route: String| go_to(nav, &route),
            }
        }
    }
}
