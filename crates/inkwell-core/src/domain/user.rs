use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::PasswordHash;
use crate::error::DomainError;

/// Image reference used until a user uploads a profile picture.
pub const DEFAULT_PROFILE_IMAGE: &str = "default.png";

pub const USERNAME_MIN_LEN: usize = 2;
pub const USERNAME_MAX_LEN: usize = 20;
pub const ABOUT_ME_MAX_LEN: usize = 140;

/// Access role of a user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Moderator,
    #[default]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Moderator => "moderator",
            Role::User => "user",
        }
    }

    /// Admins and moderators may edit or delete any post.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Role::Admin | Role::Moderator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "moderator" => Ok(Role::Moderator),
            "user" => Ok(Role::User),
            other => Err(DomainError::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

/// User entity - a registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub image_file: String,
    pub about_me: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub role: Role,
}

impl User {
    pub fn validate_username(username: &str) -> Result<(), DomainError> {
        let len = username.chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
            return Err(DomainError::Validation(format!(
                "Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters long"
            )));
        }
        Ok(())
    }

    /// Syntax check shared with the request DTOs (`#[validate(email)]`).
    pub fn validate_email(email: &str) -> Result<(), DomainError> {
        if email.validate_email() {
            Ok(())
        } else {
            Err(DomainError::Validation("Invalid email address".to_string()))
        }
    }

    pub fn validate_about_me(about_me: Option<&str>) -> Result<(), DomainError> {
        match about_me {
            Some(text) if text.chars().count() > ABOUT_ME_MAX_LEN => Err(DomainError::Validation(
                format!("About me must be at most {ABOUT_ME_MAX_LEN} characters long"),
            )),
            _ => Ok(()),
        }
    }
}

/// Mask an email address for logging: `reader@example.com` becomes `r***@example.com`.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

/// A user that has not been persisted yet; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: PasswordHash,
    pub image_file: String,
    pub about_me: Option<String>,
    pub last_seen: DateTime<Utc>,
    pub role: Role,
}

impl NewUser {
    /// Create a plain `user` account with the default picture.
    pub fn new(username: String, email: String, password_hash: PasswordHash) -> Self {
        Self {
            username,
            email,
            password_hash,
            image_file: DEFAULT_PROFILE_IMAGE.to_string(),
            about_me: None,
            last_seen: Utc::now(),
            role: Role::default(),
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}
