//! Wire models exchanged with the portal backend.

mod notification;
mod user;

pub use notification::{count_unread, NotificationItem};
pub use user::{LoginRequest, LoginResponse, LoginUser, ProfileRecord, UserId};
