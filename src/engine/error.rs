use thiserror::Error;

use crate::crypto::CryptoError;
use crate::document::NormalizeError;
use crate::naming::WordListError;
use crate::render::SpamDetected;
use crate::store::StoreError;
use crate::types::timestamp::TimestampError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("file contains 0x00 bytes")]
    BinaryContent,
    #[error("document is too large ({size} bytes, maximum {max})")]
    TooLarge { size: usize, max: usize },
    #[error("spam: {0}")]
    Spam(#[from] SpamDetected),
    #[error("document not found")]
    NotFound,
    #[error("the document has expired")]
    Expired,
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Timestamp(#[from] TimestampError),
    #[error("Stored content is not valid UTF-8")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("Word list error: {0}")]
    WordList(#[from] WordListError),
    #[error("Failed to start view recorder: {0}")]
    Io(#[from] std::io::Error),
}

impl From<NormalizeError> for EngineError {
    fn from(err: NormalizeError) -> Self {
        match err {
            NormalizeError::BinaryContent => EngineError::BinaryContent,
        }
    }
}

impl EngineError {
    /// The submission itself was refused (binary, oversized or spam).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::BinaryContent | EngineError::TooLarge { .. } | EngineError::Spam(_)
        )
    }
}
