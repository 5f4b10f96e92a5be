use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("file contains 0x00 bytes")]
    BinaryContent,
}

/// Canonicalize submitted text before it is rendered.
///
/// - `\r\n` and lone `\r` become `\n`
/// - leading and trailing newlines are dropped
/// - exactly one trailing `\n` is appended
///
/// Text containing a NUL byte is treated as binary and rejected.
pub fn normalize_content(raw: &str) -> Result<String, NormalizeError> {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    let mut normalized = unified.trim_matches('\n').to_string();
    normalized.push('\n');

    if normalized.contains('\0') {
        return Err(NormalizeError::BinaryContent);
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_line_endings() {
        assert_eq!(normalize_content("line1\r\nline2\r").unwrap(), "line1\nline2\n");
        assert_eq!(normalize_content("a\rb\r\nc\nd").unwrap(), "a\nb\nc\nd\n");
    }

    #[test]
    fn surrounding_newlines_collapse() {
        assert_eq!(normalize_content("\n\n\nbody\n\n").unwrap(), "body\n");
        assert_eq!(normalize_content("").unwrap(), "\n");
    }

    #[test]
    fn inner_blank_lines_survive() {
        assert_eq!(normalize_content("a\n\n\nb").unwrap(), "a\n\n\nb\n");
    }

    #[test]
    fn other_whitespace_is_kept() {
        assert_eq!(normalize_content("  indented\t\n").unwrap(), "  indented\t\n");
    }

    #[test]
    fn nul_byte_rejected() {
        assert_eq!(
            normalize_content("abc\0def"),
            Err(NormalizeError::BinaryContent)
        );
    }
}
