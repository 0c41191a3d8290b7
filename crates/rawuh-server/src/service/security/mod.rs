//! Credential protection.

mod password_cipher;

pub use password_cipher::{CipherError, KEY_SIZE, PasswordCipher, constant_time_eq};
