use aes::Aes192;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{AesGcm, Nonce};
use rand::Rng;

use crate::crypto::kdf::DocumentKey;
use crate::crypto::{CryptoError, CryptoResult};

type Aes192Gcm = AesGcm<Aes192, U12>;

pub const NONCE_SIZE: usize = 12;
pub const TAG_SIZE: usize = 16;

fn cipher_for(key: &DocumentKey) -> CryptoResult<Aes192Gcm> {
    Aes192Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))
}

/// Encrypt rendered content.
///
/// Returns `nonce (12 bytes) || ciphertext (includes 16-byte GCM tag)`.
pub fn encrypt(plaintext: &[u8], key: &DocumentKey) -> CryptoResult<Vec<u8>> {
    let cipher = cipher_for(key)?;
    let nonce_bytes: [u8; NONCE_SIZE] = rand::rng().random();
    let nonce = Nonce::<U12>::from_slice(&nonce_bytes);
    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| CryptoError::Encryption)?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce_bytes);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

/// Decrypt `nonce || ciphertext`.
///
/// A wrong key or any tampering yields [`CryptoError::Authentication`].
pub fn decrypt(encrypted: &[u8], key: &DocumentKey) -> CryptoResult<Vec<u8>> {
    if encrypted.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::TooShort(encrypted.len()));
    }
    let cipher = cipher_for(key)?;
    let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);
    cipher
        .decrypt(Nonce::<U12>::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| CryptoError::Authentication)
}
