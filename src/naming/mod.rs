//! Human-memorable document identifiers.
//!
//! Identifiers double as key-derivation passwords, so every random draw comes
//! from the operating system's CSPRNG and a persistently failing source is
//! fatal rather than degraded.

pub mod generator;
pub mod words;

pub use generator::{EntropyError, NameGenerator, MAX_DRAW_ATTEMPTS};
pub use words::{WordList, WordListError};
