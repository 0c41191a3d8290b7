//! AES-256-GCM encryption of stored passwords.
//!
//! # Wire Format
//!
//! Stored values are the standard base64 encoding of
//! `nonce (12 bytes) || ciphertext || tag (16 bytes)`.

use std::fmt;
use std::sync::Arc;

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::service::{Result, ServiceError};

/// Size of an AES-256 key in bytes.
pub const KEY_SIZE: usize = 32;

/// Size of the AES-GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Reasons a stored password cannot be decrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CipherError {
    #[error("stored password is not valid base64")]
    Encoding,
    #[error("stored password is shorter than nonce and tag")]
    CiphertextTooShort,
    #[error("stored password failed authentication")]
    DecryptionFailed,
    #[error("random nonce generation failed")]
    EncryptionFailed,
}

/// Symmetric cipher for the `auth.password` column.
///
/// Cheap to clone; the key schedule is shared.
#[derive(Clone)]
pub struct PasswordCipher {
    cipher: Arc<Aes256Gcm>,
}

impl PasswordCipher {
    /// Creates a cipher from raw key bytes.
    pub fn new(key: &[u8; KEY_SIZE]) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key);
        Self {
            cipher: Arc::new(Aes256Gcm::new(key)),
        }
    }

    /// Creates a cipher from a base64 encoded 32-byte key.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
            ServiceError::config("ENCRYPTION_KEY is not valid base64").with_source(e)
        })?;

        let key: [u8; KEY_SIZE] = bytes.as_slice().try_into().map_err(|_| {
            ServiceError::config(format!(
                "ENCRYPTION_KEY must decode to {KEY_SIZE} bytes, got {}",
                bytes.len()
            ))
        })?;

        Ok(Self::new(&key))
    }

    /// Creates a cipher with a freshly generated random key.
    pub fn generate() -> Self {
        let key = Aes256Gcm::generate_key(&mut OsRng);
        Self {
            cipher: Arc::new(Aes256Gcm::new(&key)),
        }
    }

    /// Encrypts a plaintext password into its stored form.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailed)?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(sealed))
    }

    /// Decrypts a stored password.
    pub fn decrypt(&self, stored: &str) -> Result<Vec<u8>, CipherError> {
        let sealed = STANDARD
            .decode(stored.trim())
            .map_err(|_| CipherError::Encoding)?;

        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CipherError::CiphertextTooShort);
        }

        let (nonce, ciphertext) = sealed.split_at(NONCE_SIZE);
        self.cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CipherError::DecryptionFailed)
    }
}

impl fmt::Debug for PasswordCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordCipher").finish_non_exhaustive()
    }
}

/// Compares two byte strings in time independent of where they differ.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_decrypt_roundtrip() {
        let cipher = PasswordCipher::generate();
        let stored = cipher.encrypt("hunter2").unwrap();

        assert_eq!(cipher.decrypt(&stored).unwrap(), b"hunter2");
    }

    #[test]
    fn encrypt_decrypt_empty() {
        let cipher = PasswordCipher::generate();
        let stored = cipher.encrypt("").unwrap();

        assert!(cipher.decrypt(&stored).unwrap().is_empty());
    }

    #[test]
    fn ciphertext_size() {
        let cipher = PasswordCipher::generate();
        let stored = cipher.encrypt("test").unwrap();
        let sealed = STANDARD.decode(stored).unwrap();

        assert_eq!(sealed.len(), NONCE_SIZE + 4 + TAG_SIZE);
    }

    #[test]
    fn decrypt_wrong_key() {
        let stored = PasswordCipher::generate().encrypt("secret").unwrap();
        let other = PasswordCipher::generate();

        assert_eq!(other.decrypt(&stored), Err(CipherError::DecryptionFailed));
    }

    #[test]
    fn decrypt_corrupted_data() {
        let cipher = PasswordCipher::generate();
        let stored = cipher.encrypt("secret data").unwrap();
        let mut sealed = STANDARD.decode(stored).unwrap();
        sealed[NONCE_SIZE + 2] ^= 0xFF;

        let corrupted = STANDARD.encode(sealed);
        assert_eq!(cipher.decrypt(&corrupted), Err(CipherError::DecryptionFailed));
    }

    #[test]
    fn decrypt_truncated_data() {
        let cipher = PasswordCipher::generate();
        let short = STANDARD.encode([0u8; NONCE_SIZE + TAG_SIZE - 1]);

        assert_eq!(cipher.decrypt(&short), Err(CipherError::CiphertextTooShort));
        assert_eq!(cipher.decrypt("not base64!"), Err(CipherError::Encoding));
    }

    #[test]
    fn same_plaintext_different_ciphertexts() {
        let cipher = PasswordCipher::generate();
        let first = cipher.encrypt("same").unwrap();
        let second = cipher.encrypt("same").unwrap();

        assert_ne!(first, second);
        assert_eq!(cipher.decrypt(&first).unwrap(), b"same");
        assert_eq!(cipher.decrypt(&second).unwrap(), b"same");
    }

    #[test]
    fn key_from_base64() {
        let encoded = STANDARD.encode([7u8; KEY_SIZE]);
        let cipher = PasswordCipher::from_base64(&encoded).unwrap();
        let stored = cipher.encrypt("pw").unwrap();

        let again = PasswordCipher::from_base64(&encoded).unwrap();
        assert_eq!(again.decrypt(&stored).unwrap(), b"pw");

        assert!(PasswordCipher::from_base64(&STANDARD.encode([1u8; 16])).is_err());
        assert!(PasswordCipher::from_base64("%%%").is_err());
    }

    #[test]
    fn constant_time_comparison() {
        assert!(constant_time_eq(b"password", b"password"));
        assert!(!constant_time_eq(b"password", b"passwore"));
        assert!(!constant_time_eq(b"pass", b"password"));
        assert!(!constant_time_eq(b"", b"x"));
        assert!(constant_time_eq(b"", b""));
    }
}
