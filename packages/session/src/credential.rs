//! # Credential and role
//!
//! [`Credential`] is the identity bundle held for the length of a session. Its
//! token and user id are optional only so that partial data coming from disk or
//! from a caller can be represented and rejected; a credential that the
//! [`CredentialStore`](crate::CredentialStore) accepts always has both or
//! neither.
//!
//! [`Role`] is the closed set of portal roles. Backend role strings are parsed
//! once, at the edge, and everything downstream matches on the enum. Strings
//! outside the set land in [`Role::Unknown`] so they still have a (public)
//! landing route instead of silently falling through.

use std::fmt;

use api::{LoginResponse, UserId};
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Portal roles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Teacher,
    Student,
    /// Sponsors and donors share one role.
    Donor,
    /// Any role string the portal does not know.
    Unknown(String),
}

impl Role {
    /// Parse a backend role string. Case and surrounding whitespace are ignored.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Self::Admin,
            "teacher" => Self::Teacher,
            "student" => Self::Student,
            "donor" | "sponsor" => Self::Donor,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Donor => "donor",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated identity bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Opaque bearer token.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub role: Role,
    #[serde(default)]
    pub full_name: String,
    /// Students only.
    #[serde(default)]
    pub class_group: Option<String>,
}

impl Credential {
    /// A fully authenticated credential.
    pub fn new(token: impl Into<String>, user_id: UserId, role: Role, full_name: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user_id: Some(user_id),
            role,
            full_name: full_name.into(),
            class_group: None,
        }
    }

    pub fn with_class_group(mut self, class_group: impl Into<String>) -> Self {
        self.class_group = Some(class_group.into());
        self
    }

    /// Build a credential from a successful login.
    pub fn from_login(response: LoginResponse) -> Self {
        Self {
            token: Some(response.token),
            user_id: Some(response.user.id),
            role: Role::parse(&response.user.role),
            full_name: response.user.full_name,
            class_group: response.user.class_group,
        }
    }

    /// The bearer token, treating an empty string as absent.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    /// `Ok(true)` when token and user id are both present, `Ok(false)` when both
    /// are absent, and an error for anything in between.
    pub fn check_identity(&self) -> Result<bool, SessionError> {
        match (self.token(), self.user_id) {
            (Some(_), Some(_)) => Ok(true),
            (None, None) => Ok(false),
            (Some(_), None) => Err(SessionError::InvalidCredential("token present without user id")),
            (None, Some(_)) => Err(SessionError::InvalidCredential("user id present without token")),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.check_identity(), Ok(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::LoginUser;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse(" Teacher "), Role::Teacher);
        assert_eq!(Role::parse("STUDENT"), Role::Student);
        assert_eq!(Role::parse("sponsor"), Role::Donor);
        assert_eq!(Role::parse("janitor"), Role::Unknown("janitor".to_string()));
        assert!(!Role::parse("").is_known());
    }

    #[test]
    fn test_role_serde_as_string() {
        let json = serde_json::to_string(&Role::Donor).unwrap();
        assert_eq!(json, "\"donor\"");
        let role: Role = serde_json::from_str("\"parent\"").unwrap();
        assert_eq!(role, Role::Unknown("parent".to_string()));
    }

    #[test]
    fn test_check_identity() {
        let full = Credential::new("tok", 1, Role::Admin, "Root");
        assert!(full.check_identity().unwrap());

        let mut no_user = full.clone();
        no_user.user_id = None;
        assert!(matches!(no_user.check_identity(), Err(SessionError::InvalidCredential(_))));

        let mut no_token = full.clone();
        no_token.token = None;
        assert!(no_token.check_identity().is_err());

        let mut empty_token = full.clone();
        empty_token.token = Some(String::new());
        assert!(empty_token.check_identity().is_err());

        let mut anonymous = full;
        anonymous.token = None;
        anonymous.user_id = None;
        assert!(!anonymous.check_identity().unwrap());
    }

    #[test]
    fn test_from_login() {
        let credential = Credential::from_login(LoginResponse {
            token: "t-1".to_string(),
            user: LoginUser {
                id: 12,
                full_name: "Kemi Ade".to_string(),
                role: "student".to_string(),
                class_group: Some("10-B".to_string()),
            },
        });
        assert!(credential.is_authenticated());
        assert_eq!(credential.role, Role::Student);
        assert_eq!(credential.class_group.as_deref(), Some("10-B"));
    }
}
