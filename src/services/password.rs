use bcrypt::{hash, verify, DEFAULT_COST};

use crate::errors::Result;

/// A stored password value. Rows written before the hashing migration hold
/// the raw password; everything written by this service is a bcrypt digest.
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    Hashed(String),
    Legacy(String),
}

impl Credential {
    /// Classifies a stored value by the bcrypt marker prefix.
    pub fn from_stored(stored: &str) -> Self {
        if stored.starts_with("$2b$") || stored.starts_with("$2a$") {
            Credential::Hashed(stored.to_string())
        } else {
            Credential::Legacy(stored.to_string())
        }
    }

    /// Checks a submitted password against the stored value. The legacy
    /// branch is plain equality; such accounts are flagged for migration.
    pub fn verify(&self, plaintext: &str) -> bool {
        match self {
            Credential::Hashed(digest) => verify(plaintext, digest).unwrap_or(false),
            Credential::Legacy(stored) => {
                let matched = stored == plaintext;
                if matched {
                    tracing::warn!("account authenticated against a plaintext-stored password; needs migration");
                }
                matched
            }
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Credential::Legacy(_))
    }
}

/// Salted bcrypt digest; the same input hashes differently on every call.
pub fn hash_password(plaintext: &str) -> Result<String> {
    Ok(hash(plaintext, DEFAULT_COST)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let digest = hash_password("Secur3!").unwrap();
        let credential = Credential::from_stored(&digest);
        assert!(!credential.is_legacy());
        assert!(credential.verify("Secur3!"));
        assert!(!credential.verify("wrong"));
    }

    #[test]
    fn digests_are_salted() {
        let first = hash_password("Secur3!").unwrap();
        let second = hash_password("Secur3!").unwrap();
        assert_ne!(first, second);
        assert!(Credential::from_stored(&second).verify("Secur3!"));
    }

    #[test]
    fn legacy_plaintext_value_compares_directly() {
        let credential = Credential::from_stored("OldPass1");
        assert!(credential.is_legacy());
        assert!(credential.verify("OldPass1"));
        assert!(!credential.verify("OldPass2"));
    }
}
