//! Salted password digests.
//!
//! Stored form: `sha256$<salt hex>$<digest hex>` where the digest is
//! `SHA-256(salt || password)`.

use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SCHEME: &str = "sha256";
const SALT_LEN: usize = 16;

/// Raised when a stored digest does not follow the expected layout.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored password digest is malformed")]
pub struct MalformedDigest;

/// A salted password digest ready for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash `password` under a fresh random salt.
    pub fn hash(password: &str) -> Self {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(password, &salt)
    }

    fn with_salt(password: &str, salt: &[u8]) -> Self {
        let digest = salted_digest(salt, password);
        Self(format!(
            "{SCHEME}${}${}",
            hex::encode(salt),
            hex::encode(digest)
        ))
    }

    /// Wrap a digest loaded from storage, checking its layout.
    pub fn from_stored(stored: impl Into<String>) -> Result<Self, MalformedDigest> {
        let stored = stored.into();
        split(&stored)?;
        Ok(Self(stored))
    }

    /// Whether `password` produces this digest.
    pub fn verify(&self, password: &str) -> bool {
        let Ok((salt, expected)) = split(&self.0) else {
            return false;
        };
        let actual = salted_digest(&salt, password);
        actual.as_slice().ct_eq(expected.as_slice()).into()
    }

    /// Stored text form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn split(stored: &str) -> Result<(Vec<u8>, Vec<u8>), MalformedDigest> {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(salt), Some(digest), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(MalformedDigest);
    };
    if scheme != SCHEME {
        return Err(MalformedDigest);
    }
    let salt = hex::decode(salt).map_err(|_| MalformedDigest)?;
    let digest = hex::decode(digest).map_err(|_| MalformedDigest)?;
    if salt.is_empty() || digest.len() != 32 {
        return Err(MalformedDigest);
    }
    Ok((salt, digest))
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}
