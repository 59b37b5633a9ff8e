//! Services - the operations of the site, sequenced over the ports.
//!
//! Each service is constructed once at startup with the ports it needs and shared
//! behind an `Arc`.

mod admin;
mod content;
mod credentials;
mod session;

pub use admin::{UserAdmin, UserChanges};
pub use content::{ContentStore, PAGE_SIZE};
pub use credentials::{AccountUpdate, AccountUpdateOutcome, CredentialStore};
pub use session::{Session, SessionConfig, SessionManager};

use crate::error::{DomainError, RepoError};

/// Map a repository `NotFound` onto the entity that was addressed.
pub(crate) fn missing(entity_type: &'static str, id: i32) -> impl FnOnce(RepoError) -> DomainError {
    move |err| match err {
        RepoError::NotFound => DomainError::not_found(entity_type, id),
        other => other.into(),
    }
}
