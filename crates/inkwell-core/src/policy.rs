//! Authorization policy.
//!
//! A single pure predicate, [`can_perform`], decides every action. Services call
//! [`authorize`] at the entry of each mutating operation, before touching a store.

use crate::domain::{Role, User};
use crate::error::DomainError;

/// The actor behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated { id: i32, role: Role },
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Principal::Authenticated {
            id: user.id,
            role: user.role,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::Authenticated { .. })
    }

    pub fn id(&self) -> Option<i32> {
        match self {
            Principal::Authenticated { id, .. } => Some(*id),
            Principal::Anonymous => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create, update, delete or list any user.
    ManageUsers,
    CreatePost,
    EditPost,
    DeletePost,
    CreateComment,
    DeleteComment,
    ViewPost,
    ViewHome,
    UpdateOwnAccount,
}

/// What an action targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Site,
    User { id: i32 },
    Post { id: i32 },
    Comment { id: i32, author_id: i32 },
}

/// Decide whether `principal` may perform `action` on `resource`.
///
/// Post authorship grants nothing: only admins and moderators edit or delete posts.
pub fn can_perform(principal: &Principal, action: Action, resource: Resource) -> bool {
    let (id, role) = match (action, principal) {
        (Action::ViewPost | Action::ViewHome, _) => return true,
        (_, Principal::Anonymous) => return false,
        (_, Principal::Authenticated { id, role }) => (*id, *role),
    };

    match (action, resource) {
        (Action::ManageUsers, _) => role == Role::Admin,
        (Action::EditPost | Action::DeletePost, Resource::Post { .. }) => role.is_elevated(),
        (Action::CreatePost | Action::CreateComment, _) => true,
        (Action::DeleteComment, Resource::Comment { author_id, .. }) => {
            role.is_elevated() || author_id == id
        }
        (Action::UpdateOwnAccount, Resource::User { id: target }) => target == id,
        _ => false,
    }
}

/// [`can_perform`] as a `Result`: anonymous callers get `Unauthenticated`,
/// everyone else `Forbidden`.
pub fn authorize(
    principal: &Principal,
    action: Action,
    resource: Resource,
) -> Result<(), DomainError> {
    if can_perform(principal, action, resource) {
        return Ok(());
    }

    tracing::debug!(?principal, ?action, ?resource, "Authorization denied");
    if principal.is_authenticated() {
        Err(DomainError::Forbidden)
    } else {
        Err(DomainError::Unauthenticated)
    }
}
