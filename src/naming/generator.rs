use rand::rngs::OsRng;
use rand::TryRngCore;
use thiserror::Error;

use crate::naming::words::WordList;
use crate::types::identifiers::DocumentId;

const CHARACTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Total random draws per name.
const DRAWS: usize = 6;
/// Leading draws taken from the word list, when one is loaded.
const WORD_DRAWS: usize = 2;
/// Leading draws that get a `-` separator, when a word list is loaded.
const SEPARATED_DRAWS: usize = 3;

/// Attempts per draw before the randomness source is considered broken.
pub const MAX_DRAW_ATTEMPTS: usize = 10;

#[derive(Debug, Error)]
#[error("randomness source failed {attempts} consecutive draws: {last_error}")]
pub struct EntropyError {
    pub attempts: usize,
    pub last_error: String,
}

/// Produces names like `cornflake-peddling-bp0q`, or `bp0qz7` without a word list.
///
/// The word list is fixed at construction and never mutated.
#[derive(Debug, Clone, Default)]
pub struct NameGenerator {
    words: Option<WordList>,
}

impl NameGenerator {
    pub fn new(words: Option<WordList>) -> Self {
        Self { words }
    }

    pub fn with_words(words: WordList) -> Self {
        Self { words: Some(words) }
    }

    pub fn words(&self) -> Option<&WordList> {
        self.words.as_ref()
    }

    /// Generate a name from the OS randomness source.
    ///
    /// Aborts the process if the source keeps failing: every identifier is
    /// key material, so there is no safe degraded output.
    pub fn generate_name(&self) -> String {
        match self.generate_name_with(&mut OsRng) {
            Ok(name) => name,
            Err(err) => {
                tracing::error!("{err}; the system randomness source is unusable, aborting");
                std::process::abort()
            }
        }
    }

    /// Generate a name from `rng`, failing after [`MAX_DRAW_ATTEMPTS`]
    /// consecutive errors on any single draw.
    pub fn generate_name_with<R: TryRngCore>(&self, rng: &mut R) -> Result<String, EntropyError> {
        let words = self.words.as_ref();
        let mut name = String::new();

        for i in 0..DRAWS {
            if i < SEPARATED_DRAWS && words.is_some() {
                name.push('-');
            }

            match words {
                Some(list) if i < WORD_DRAWS => {
                    let index = draw_index(rng, list.len())?;
                    // draw_index stays below len
                    name.push_str(list.get(index).unwrap_or_default());
                }
                _ => {
                    let index = draw_index(rng, CHARACTERS.len())?;
                    name.push(char::from(CHARACTERS[index]));
                }
            }
        }

        Ok(name.trim_start_matches('-').to_string())
    }

    /// Generate names until `exists` reports one that is not taken.
    ///
    /// Collisions are rare but possible; each one is logged and retried.
    pub fn generate_safe_name<E, F>(&self, mut exists: F) -> Result<DocumentId, E>
    where
        F: FnMut(&DocumentId) -> Result<bool, E>,
    {
        loop {
            let candidate = DocumentId::new(self.generate_name());
            if !exists(&candidate)? {
                return Ok(candidate);
            }
            tracing::debug!("Generated name collided with an existing document, retrying");
        }
    }
}

fn draw_index<R: TryRngCore>(rng: &mut R, len: usize) -> Result<usize, EntropyError> {
    let mut last_error = String::new();
    for _ in 0..MAX_DRAW_ATTEMPTS {
        match uniform_index(rng, len) {
            Ok(index) => return Ok(index),
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(EntropyError {
        attempts: MAX_DRAW_ATTEMPTS,
        last_error,
    })
}

/// Unbiased index in `0..len` by rejection sampling.
fn uniform_index<R: TryRngCore>(rng: &mut R, len: usize) -> Result<usize, R::Error> {
    let len = len as u64;
    let zone = u64::MAX - (u64::MAX % len);
    loop {
        let value = rng.try_next_u64()?;
        if value < zone {
            return Ok((value % len) as usize);
        }
    }
}
