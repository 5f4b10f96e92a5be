pub mod identifiers;
pub mod timestamp;

pub use identifiers::{DocumentId, HashedKey};
pub use timestamp::{ExpirationPolicy, TimestampError, STORAGE_FORMAT};
