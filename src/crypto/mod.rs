//! Per-document encryption at rest.
//!
//! Key derivation: scrypt(password = document id, salt = upload timestamp)
//! with N=16384, r=8, p=1 -> 192-bit AES key. The key is never stored.
//! Encryption: AES-192-GCM with a random 12-byte nonce.
//! Wire format: nonce (12 bytes) || ciphertext (includes 16-byte GCM tag)

pub mod cipher;
pub mod kdf;

use thiserror::Error;

pub use cipher::{decrypt, encrypt, NONCE_SIZE, TAG_SIZE};
pub use kdf::{derive_key, DocumentKey, KEY_SIZE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),
    #[error("Encryption failed")]
    Encryption,
    #[error("message authentication failed")]
    Authentication,
    #[error("Ciphertext too short ({0} bytes)")]
    TooShort(usize),
}

pub type CryptoResult<T> = Result<T, CryptoError>;
