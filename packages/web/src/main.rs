use dioxus::prelude::*;

use session::PortalConfig;
use ui::SessionProvider;
use views::{AdminDashboard, DonorDashboard, Landing, Login, StudentDashboard, TeacherDashboard};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Landing {},
    #[route("/login")]
    Login {},
    #[route("/admin/dashboard")]
    AdminDashboard {},
    #[route("/teacher/dashboard")]
    TeacherDashboard {},
    #[route("/student/dashboard")]
    StudentDashboard {},
    #[route("/donor/dashboard")]
    DonorDashboard {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    init_logging();
    dioxus::launch(App);
}

#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("logging already initialized: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    // Fails only if a subscriber is already installed.
    let _ = dioxus::logger::init(tracing::Level::INFO);
}

/// Built-in `portal.toml`; a malformed file falls back to defaults.
fn load_config() -> PortalConfig {
    match PortalConfig::from_toml(include_str!("../portal.toml")) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid {}: {}; using defaults", PortalConfig::filename(), e);
            PortalConfig::default()
        }
    }
}

/// Navigate to a path produced by the session layer (landing or logout routes).
fn go_to(nav: Navigator, path: &str) {
    match path.parse::<Route>() {
        Ok(route) => {
            nav.replace(route);
        }
        Err(e) => {
            tracing::warn!("No route for {}: {}", path, e);
            nav.replace(Route::Landing {});
        }
    }
}

#[component]
fn App() -> Element {
    let config = use_hook(load_config);

    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        SessionProvider {
            config,
            Router::<Route> {}
        }
    }
}
