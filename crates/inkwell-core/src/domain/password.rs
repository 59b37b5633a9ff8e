use std::fmt;

use crate::ports::PasswordService;

/// Opaque, salted one-way password digest.
///
/// The encoded form only leaves this type through [`PasswordHash::encoded`], which exists
/// for persistence adapters. `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a digest previously produced by a [`PasswordService`].
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded digest, for storage only.
    pub fn encoded(&self) -> &str {
        &self.0
    }

    /// Check a raw password against this digest. A malformed digest never matches.
    pub fn verify(&self, hasher: &dyn PasswordService, raw: &str) -> bool {
        match hasher.verify(raw, self) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash could not be parsed");
                false
            }
        }
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let hash = PasswordHash::from_encoded("$argon2id$v=19$secret");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
