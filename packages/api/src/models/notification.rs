use serde::{Deserialize, Serialize};

/// One entry from `GET /notifications`.
///
/// Only `id` and `is_read` matter to the session layer; the remaining fields
/// are kept so notification screens can reuse the same type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationItem {
    pub id: i64,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Number of items with `is_read == false`.
pub fn count_unread(items: &[NotificationItem]) -> u32 {
    let unread = items.iter().filter(|item| !item.is_read).count();
    u32::try_from(unread).unwrap_or(u32::MAX)
}
