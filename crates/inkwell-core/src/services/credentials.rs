use std::sync::Arc;

use crate::domain::{NewUser, PasswordHash, Role, User, mask_email};
use crate::error::DomainError;
use crate::policy::{Action, Principal, Resource, authorize};
use crate::ports::{ImageKind, ImageStore, ImageUpload, PasswordService, UserRepository};

use super::missing;

/// Requested changes to one's own account.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub username: String,
    pub email: String,
    pub about_me: Option<String>,
    pub picture: Option<ImageUpload>,
    /// Current password; empty or absent leaves the password alone.
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AccountUpdateOutcome {
    pub user: User,
    pub password_changed: bool,
    /// The old password did not match. Every other change was still saved.
    pub password_rejected: bool,
}

/// Holds user records and the password hashing capability.
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
    images: Arc<dyn ImageStore>,
}

impl CredentialStore {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: Arc<dyn PasswordService>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            users,
            passwords,
            images,
        }
    }

    /// Self-registration: always creates a plain `user`.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        raw_password: &str,
    ) -> Result<User, DomainError> {
        self.create_user(username, email, raw_password, Role::User)
            .await
    }

    pub(crate) async fn create_user(
        &self,
        username: &str,
        email: &str,
        raw_password: &str,
        role: Role,
    ) -> Result<User, DomainError> {
        User::validate_username(username)?;
        User::validate_email(email)?;
        if raw_password.is_empty() {
            return Err(DomainError::Validation("Password is required".to_string()));
        }

        self.ensure_available(Some(username), Some(email)).await?;

        let password_hash = self.passwords.hash(raw_password)?;
        let new_user = NewUser::new(username.to_string(), email.to_string(), password_hash)
            .with_role(role);
        let user = self.users.insert(new_user).await?;

        tracing::info!(user_id = user.id, role = %user.role, "User account created");
        Ok(user)
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    pub async fn verify(&self, email: &str, raw_password: &str) -> Result<User, DomainError> {
        let user = self.users.find_by_email(email).await?;

        match user {
            Some(user) if user.password_hash.verify(self.passwords.as_ref(), raw_password) => {
                Ok(user)
            }
            _ => {
                tracing::debug!(user_email = %mask_email(email), "Credential check failed");
                Err(DomainError::InvalidCredentials)
            }
        }
    }

    /// Replace the password when `old_raw` matches. No `old_raw` is a no-op.
    pub async fn change_password(
        &self,
        user: &User,
        old_raw: Option<&str>,
        new_raw: &str,
    ) -> Result<User, DomainError> {
        match self.replacement_hash(user, old_raw, Some(new_raw))? {
            None => Ok(user.clone()),
            Some(hash) => {
                let mut updated = user.clone();
                updated.password_hash = hash;
                let saved = self
                    .users
                    .update(updated)
                    .await
                    .map_err(missing("User", user.id))?;
                tracing::info!(user_id = user.id, "Password changed");
                Ok(saved)
            }
        }
    }

    /// Apply profile changes and, if requested, a password change.
    ///
    /// A wrong old password rejects only the password: the profile changes commit.
    pub async fn update_account(
        &self,
        principal: &Principal,
        user: &User,
        update: AccountUpdate,
    ) -> Result<AccountUpdateOutcome, DomainError> {
        authorize(principal, Action::UpdateOwnAccount, Resource::User { id: user.id })?;

        User::validate_username(&update.username)?;
        User::validate_email(&update.email)?;
        User::validate_about_me(update.about_me.as_deref())?;

        let username_changed = update.username != user.username;
        let email_changed = update.email != user.email;
        self.ensure_available(
            username_changed.then_some(update.username.as_str()),
            email_changed.then_some(update.email.as_str()),
        )
        .await?;

        let mut updated = user.clone();
        if let Some(picture) = update.picture {
            updated.image_file = self
                .images
                .store(ImageKind::ProfilePicture, &user.username, picture)
                .await?;
        }
        updated.username = update.username;
        updated.email = update.email;
        updated.about_me = update.about_me.filter(|text| !text.is_empty());

        let (password_changed, password_rejected) = match self.replacement_hash(
            user,
            update.old_password.as_deref(),
            update.new_password.as_deref(),
        ) {
            Ok(Some(hash)) => {
                updated.password_hash = hash;
                (true, false)
            }
            Ok(None) => (false, false),
            Err(DomainError::WrongOldPassword) => {
                tracing::info!(user_id = user.id, "Password change rejected: wrong old password");
                (false, true)
            }
            Err(e) => return Err(e),
        };

        let user = self
            .users
            .update(updated)
            .await
            .map_err(missing("User", user.id))?;

        tracing::info!(user_id = user.id, password_changed, "Account updated");
        Ok(AccountUpdateOutcome {
            user,
            password_changed,
            password_rejected,
        })
    }

    /// Fail with the matching duplicate error if a username or email is taken.
    /// Username is checked first.
    pub(crate) async fn ensure_available(
        &self,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<(), DomainError> {
        if let Some(username) = username {
            if self.users.find_by_username(username).await?.is_some() {
                return Err(DomainError::DuplicateUsername);
            }
        }
        if let Some(email) = email {
            if self.users.find_by_email(email).await?.is_some() {
                return Err(DomainError::DuplicateEmail);
            }
        }
        Ok(())
    }

    fn replacement_hash(
        &self,
        user: &User,
        old_raw: Option<&str>,
        new_raw: Option<&str>,
    ) -> Result<Option<PasswordHash>, DomainError> {
        let Some(old_raw) = old_raw.filter(|raw| !raw.is_empty()) else {
            return Ok(None);
        };
        if !user.password_hash.verify(self.passwords.as_ref(), old_raw) {
            return Err(DomainError::WrongOldPassword);
        }

        let new_raw = new_raw.filter(|raw| !raw.is_empty()).ok_or_else(|| {
            DomainError::Validation("New password is required".to_string())
        })?;
        Ok(Some(self.passwords.hash(new_raw)?))
    }
}
