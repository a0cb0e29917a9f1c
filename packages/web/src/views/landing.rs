//! Public root. Signed-in users are sent on to their role's dashboard.

use dioxus::prelude::*;
use ui::use_session;

use crate::{go_to, Route};

#[component]
pub fn Landing() -> Element {
    let state = use_session()();
    let nav = use_navigator();

    if state.is_authenticated() && state.default_route != session::PUBLIC_ROOT {
        go_to(nav, state.default_route);
    }

    rsx! {
        div {
            class: "landing",
            h1 { "Campus Portal" }
            p { "Sign in to see your dashboard and notifications." }
            if state.is_authenticated() {
                p {
                    class: "landing-warning",
                    "Your account has no portal role. Contact an administrator."
                }
            } else {
                Link { class: "landing-login", to: Route::Login {}, "Sign in" }
            }
        }
    }
}
