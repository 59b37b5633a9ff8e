use std::sync::Arc;

use crate::domain::{Role, User};
use crate::error::DomainError;
use crate::policy::{Action, Principal, Resource, authorize};
use crate::ports::UserRepository;

use super::{CredentialStore, missing};

/// Fields an admin may change on any account. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub about_me: Option<String>,
    pub role: Option<Role>,
}

/// Admin-only management of user accounts.
pub struct UserAdmin {
    users: Arc<dyn UserRepository>,
    credentials: Arc<CredentialStore>,
}

impl UserAdmin {
    pub fn new(users: Arc<dyn UserRepository>, credentials: Arc<CredentialStore>) -> Self {
        Self { users, credentials }
    }

    pub async fn list_users(&self, principal: &Principal) -> Result<Vec<User>, DomainError> {
        authorize(principal, Action::ManageUsers, Resource::Site)?;
        Ok(self.users.list_all().await?)
    }

    pub async fn get_user(&self, principal: &Principal, id: i32) -> Result<User, DomainError> {
        authorize(principal, Action::ManageUsers, Resource::User { id })?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("User", id))
    }

    /// Create an account with any role. Same uniqueness rules as registration.
    pub async fn create_user(
        &self,
        principal: &Principal,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, DomainError> {
        authorize(principal, Action::ManageUsers, Resource::Site)?;
        self.credentials
            .create_user(username, email, password, role)
            .await
    }

    pub async fn update_user(
        &self,
        principal: &Principal,
        id: i32,
        changes: UserChanges,
    ) -> Result<User, DomainError> {
        let mut user = self.get_user(principal, id).await?;

        if let Some(username) = &changes.username {
            User::validate_username(username)?;
        }
        if let Some(email) = &changes.email {
            User::validate_email(email)?;
        }
        User::validate_about_me(changes.about_me.as_deref())?;

        let new_username = changes.username.filter(|u| *u != user.username);
        let new_email = changes.email.filter(|e| *e != user.email);
        self.credentials
            .ensure_available(new_username.as_deref(), new_email.as_deref())
            .await?;

        if let Some(username) = new_username {
            user.username = username;
        }
        if let Some(email) = new_email {
            user.email = email;
        }
        if let Some(about_me) = changes.about_me {
            user.about_me = Some(about_me).filter(|text| !text.is_empty());
        }
        if let Some(role) = changes.role {
            user.role = role;
        }

        let user = self.users.update(user).await.map_err(missing("User", id))?;
        tracing::info!(user_id = id, role = %user.role, "User updated by admin");
        Ok(user)
    }

    /// Delete an account. Posts and comments it authored are left in place.
    pub async fn delete_user(&self, principal: &Principal, id: i32) -> Result<(), DomainError> {
        authorize(principal, Action::ManageUsers, Resource::User { id })?;
        self.users.delete(id).await.map_err(missing("User", id))?;
        tracing::info!(user_id = id, "User deleted by admin");
        Ok(())
    }
}
