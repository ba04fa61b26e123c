//! AES-256-GCM sealing of login credentials before they leave this process.
//!
//! Output layout is `base64(nonce (12 bytes) || ciphertext || tag (16 bytes))`,
//! which is what the upstream login endpoint expects inside `{"encrypted": ...}`.
//! There is deliberately no decrypt here: only the upstream opens these payloads.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use base64ct::{Base64, Encoding};
use rand::{RngCore, rngs::OsRng};
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use thiserror::Error;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    #[error("login encryption key is not set")]
    MissingKey,
    #[error("login encryption key is not valid base64")]
    KeyEncoding,
    #[error("login encryption key must be exactly 32 bytes (AES-256), got {0}")]
    KeyLength(usize),
    #[error("failed to encrypt login payload")]
    Encrypt,
}

/// Process-wide credential cipher. Cheap to clone, safe to share.
#[derive(Clone)]
pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl CredentialCipher {
    /// Build a cipher from raw key bytes.
    ///
    /// # Errors
    /// Returns [`CipherError::KeyLength`] unless the key is exactly 32 bytes.
    pub fn from_key_bytes(key: &[u8]) -> Result<Self, CipherError> {
        if key.len() != KEY_LEN {
            return Err(CipherError::KeyLength(key.len()));
        }
        let cipher =
            Aes256Gcm::new_from_slice(key).map_err(|_| CipherError::KeyLength(key.len()))?;
        Ok(Self { cipher })
    }

    /// Build a cipher from a base64-encoded key, e.g. `openssl rand -base64 32`.
    ///
    /// # Errors
    /// Returns an error if the key is empty, not base64, or not 32 bytes long.
    pub fn from_base64_key(key_b64: &SecretString) -> Result<Self, CipherError> {
        let trimmed = key_b64.expose_secret().trim();
        if trimmed.is_empty() {
            return Err(CipherError::MissingKey);
        }
        let key = Base64::decode_vec(trimmed).map_err(|_| CipherError::KeyEncoding)?;
        Self::from_key_bytes(&key)
    }

    /// Seal `plaintext` under a fresh random nonce.
    ///
    /// # Errors
    /// Returns [`CipherError::Encrypt`] if the AEAD rejects the input.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        // aes-gcm appends the 16 byte tag to the ciphertext.
        let sealed = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::Encrypt)?;

        let mut combined = Vec::with_capacity(NONCE_LEN + sealed.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&sealed);

        Ok(Base64::encode_string(&combined))
    }
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCipher")
            .field("algorithm", &"AES-256-GCM")
            .field("key", &"***")
            .finish()
    }
}
