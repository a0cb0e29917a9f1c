//! Unread-notification badge for the portal header.

use dioxus::prelude::*;

use crate::icons::FaBell;
use crate::provider::use_session;
use crate::Icon;

/// Badge text for `count`, or `None` when there is nothing unread.
pub fn badge_label(count: u32) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".to_string()),
    }
}

/// Bell with the shared unread count.
///
/// Reads the count only; the screen hosting the badge decides whether to poll
/// (see [`crate::use_notification_poll`]).
#[component]
pub fn NotificationBadge() -> Element {
    let session = use_session();
    let count = session().unread_count;
    let label = badge_label(count);
    let title = match count {
        0 => "No unread notifications".to_string(),
        1 => "1 unread notification".to_string(),
        n => format!("{n} unread notifications"),
    };

    rsx! {
        span {
            class: "notification-bell",
            title: "{title}",
            Icon { icon: FaBell, width: 16, height: 16 }
            if let Some(label) = label {
                span { class: "notification-bell__count", "{label}" }
            }
        }
    }
}
