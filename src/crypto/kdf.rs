use chrono::{DateTime, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{CryptoError, CryptoResult};
use crate::types::identifiers::DocumentId;
use crate::types::timestamp::format_timestamp;

/// Derived key length (AES-192).
pub const KEY_SIZE: usize = 24;

/// log2(N) for N = 16384.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

/// Content key for a single document. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct DocumentKey([u8; KEY_SIZE]);

impl DocumentKey {
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DocumentKey(..)")
    }
}

/// Derive the content key for `(id, upload)`.
///
/// The salt is the upload time in storage format, so the stored timestamp
/// string must reproduce exactly the value used here.
pub fn derive_key(id: &DocumentId, upload: &DateTime<Utc>) -> CryptoResult<DocumentKey> {
    let params = scrypt::Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_SIZE)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    let salt = format_timestamp(upload);
    let mut key = [0u8; KEY_SIZE];
    scrypt::scrypt(id.as_str().as_bytes(), salt.as_bytes(), &params, &mut key)
        .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;

    Ok(DocumentKey(key))
}
