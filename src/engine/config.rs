//! Engine configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Largest accepted document after normalization (1 MiB).
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid engine config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// # Example
///
/// ```toml
/// max_document_size = 1048576
/// allow_legacy_plaintext = true
/// words_file = "/etc/snippets/words.txt"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum normalized content size in bytes.
    #[serde(default = "default_max_document_size")]
    pub max_document_size: usize,
    /// Serve records that fail authentication but look like unencrypted text.
    #[serde(default = "default_allow_legacy_plaintext")]
    pub allow_legacy_plaintext: bool,
    /// Word list for generated names; names are purely alphanumeric without one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words_file: Option<PathBuf>,
}

fn default_max_document_size() -> usize {
    DEFAULT_MAX_DOCUMENT_SIZE
}

fn default_allow_legacy_plaintext() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_document_size: default_max_document_size(),
            allow_legacy_plaintext: default_allow_legacy_plaintext(),
            words_file: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Commented template with every default spelled out.
    pub fn default_toml() -> &'static str {
        r#"# Snippet engine configuration

# Maximum document size in bytes after line-ending normalization (default: 1 MiB)
max_document_size = 1048576

# Serve documents stored before encryption at rest was introduced.
# Only records that fail authentication, contain no NUL byte and are valid
# UTF-8 qualify.
allow_legacy_plaintext = true

# Newline-delimited word list used for document names. Lines starting with
# '#' are ignored. Without it, names are six random alphanumerics.
# words_file = "./words.txt"
"#
    }
}
