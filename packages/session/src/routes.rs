//! Role-based landing routes.

use crate::{Credential, Role};

/// Public landing page; also where logout sends the user.
pub const PUBLIC_ROOT: &str = "/";

/// Default landing route for `role`.
pub fn default_route_for(role: &Role) -> &'static str {
    match role {
        Role::Admin => "/admin/dashboard",
        Role::Teacher => "/teacher/dashboard",
        Role::Student => "/student/dashboard",
        Role::Donor => "/donor/dashboard",
        Role::Unknown(_) => PUBLIC_ROOT,
    }
}

/// Same as [`default_route_for`] for a raw backend role string.
pub fn default_route_for_name(role: &str) -> &'static str {
    default_route_for(&Role::parse(role))
}

/// Landing route for the current session; anonymous users get the public root.
pub fn route_for_credential(credential: Option<&Credential>) -> &'static str {
    match credential {
        Some(c) if c.is_authenticated() => default_route_for(&c.role),
        _ => PUBLIC_ROOT,
    }
}
