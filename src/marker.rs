use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Number of leading bytes inspected by the header check.
pub const HEADER_PEEK_LEN: usize = 10;

/// Byte sequence expected somewhere in a file's leading bytes.
///
/// Acts as a lightweight format signature: files whose header does not
/// contain the sequence are treated as foreign to the dataset and purged
/// by curation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct MarkerRule(Vec<u8>);

impl MarkerRule {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether `header` contains the marker as a contiguous sub-sequence.
    ///
    /// An empty marker matches everything.
    pub fn matches(&self, header: &[u8]) -> bool {
        if self.0.is_empty() {
            return true;
        }
        header.windows(self.0.len()).any(|window| window == self.0)
    }
}

impl Default for MarkerRule {
    /// JFIF signature carried by the stock image datasets this tool curates.
    fn default() -> Self {
        Self(b".JFIF".to_vec())
    }
}

impl From<String> for MarkerRule {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl From<&str> for MarkerRule {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// Peek the first [`HEADER_PEEK_LEN`] bytes of `path` without consuming a
/// read position.
///
/// The handle is closed when the function returns, on every exit path.
pub fn peek_header(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut reader = BufReader::with_capacity(HEADER_PEEK_LEN, file);
    let header = reader.fill_buf()?;
    Ok(header.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_marker_bytes() {
        assert_eq!(MarkerRule::default().as_bytes(), b".JFIF");
    }

    #[test]
    fn test_matches_subsequence() {
        let marker = MarkerRule::default();
        assert!(marker.matches(b"abc.JFIF\x00\x01"));
        assert!(marker.matches(b".JFIF"));
        assert!(!marker.matches(b"\x89PNG\r\n\x1a\n\x00\x00"));
        assert!(!marker.matches(b".JFI"));
        assert!(!marker.matches(b""));
    }

    #[test]
    fn test_empty_marker_matches_everything() {
        let marker = MarkerRule::new(Vec::new());
        assert!(marker.matches(b""));
        assert!(marker.matches(b"anything"));
    }

    #[test]
    fn test_peek_header_caps_at_peek_len() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("long.bin");
        fs::write(&path, b"0123456789ABCDEF").unwrap();

        let header = peek_header(&path).unwrap();
        assert_eq!(header, b"0123456789");
    }

    #[test]
    fn test_peek_header_short_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("short.bin");
        fs::write(&path, b"abc").unwrap();

        let header = peek_header(&path).unwrap();
        assert_eq!(header, b"abc");
    }

    #[test]
    fn test_peek_header_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(peek_header(&temp_dir.path().join("nope.bin")).is_err());
    }
}
