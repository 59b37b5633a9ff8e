//! Argon2 password hashing implementation.

use argon2::{
    Argon2, Params,
    password_hash::{
        PasswordHash as EncodedHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};

use inkwell_core::domain::PasswordHash;
use inkwell_core::ports::{AuthError, PasswordService};

/// Argon2id password service with a fresh random salt per hash.
pub struct Argon2PasswordService {
    argon2: Argon2<'static>,
}

impl Argon2PasswordService {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Use explicit cost parameters instead of the library defaults.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService for Argon2PasswordService {
    fn hash(&self, password: &str) -> Result<PasswordHash, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| PasswordHash::from_encoded(h.to_string()))
            .map_err(|e| AuthError::HashingError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, AuthError> {
        let parsed_hash = EncodedHash::new(hash.encoded())
            .map_err(|e| AuthError::HashingError(e.to_string()))?;

        Ok(self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }
}
