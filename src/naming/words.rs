use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("file doesn't contain any words")]
    Empty,
}

/// Words used for the leading segments of generated names. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

impl WordList {
    /// Parse newline-delimited words.
    ///
    /// Words are trimmed and lowercased; blank lines and lines starting with
    /// `#` are skipped.
    pub fn parse(source: &str) -> Result<Self, WordListError> {
        let words: Vec<String> = source
            .split('\n')
            .map(|line| line.trim().to_lowercase())
            .filter(|word| !word.is_empty() && !word.starts_with('#'))
            .collect();

        if words.is_empty() {
            return Err(WordListError::Empty);
        }

        Ok(WordList { words })
    }

    pub fn load(path: &Path) -> Result<Self, WordListError> {
        let content = std::fs::read_to_string(path)?;
        let list = Self::parse(&content)?;
        tracing::debug!("{} words loaded from {}", list.len(), path.display());
        Ok(list)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blanks_are_dropped() {
        let list = WordList::parse("# header\n\n  Apple \r\nbanana\n#cherry\n   \n").unwrap();
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["apple", "banana"]);
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(matches!(
            WordList::parse("# only a comment\n\n"),
            Err(WordListError::Empty)
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = WordList::load(&dir.path().join("nope.txt"));
        assert!(matches!(result, Err(WordListError::Io(_))));
    }
}
