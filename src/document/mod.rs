pub mod document;
pub mod normalize;

pub use crate::types::identifiers::{DocumentId, HashedKey};
pub use document::Document;
pub use normalize::{normalize_content, NormalizeError};
