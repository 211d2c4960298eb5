use anyhow::{Context, Result};
use std::io::{BufRead, Read};
use thiserror::Error;

const MAX_LINE_SIZE: usize = 64 * 1024; // 64KB

/// Why a line of input was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("Input line exceeds maximum allowed size ({max_kb} KB); line skipped")]
    TooLong { max_kb: usize },
    #[error("Input line is not valid UTF-8; line skipped")]
    InvalidUtf8,
}

/// One line read from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Text(String),
    /// The line was consumed but cannot be used; reading may continue.
    Rejected(LineError),
}

/// Reads chat input one line at a time from a non-interactive source.
pub struct LineReader<R> {
    source: R,
}

impl<R: BufRead> LineReader<R> {
    pub const fn new(source: R) -> Self {
        Self { source }
    }

    /// Returns the next line without its line ending, or `None` at end of input.
    ///
    /// Only a failing source is an error. An over-long or non-UTF-8 line is
    /// returned as [`InputLine::Rejected`] and fully consumed.
    pub fn next_line(&mut self) -> Result<Option<InputLine>> {
        let mut buffer = Vec::new();
        let bytes_read = self
            .source
            .by_ref()
            .take(MAX_LINE_SIZE as u64 + 1)
            .read_until(b'\n', &mut buffer)
            .context("Failed to read from stdin")?;

        if bytes_read == 0 {
            return Ok(None);
        }

        if buffer.len() > MAX_LINE_SIZE && buffer.last() != Some(&b'\n') {
            self.source
                .skip_until(b'\n')
                .context("Failed to read from stdin")?;
            return Ok(Some(InputLine::Rejected(LineError::TooLong {
                max_kb: MAX_LINE_SIZE / 1024,
            })));
        }

        let Ok(line) = String::from_utf8(buffer) else {
            return Ok(Some(InputLine::Rejected(LineError::InvalidUtf8)));
        };
        Ok(Some(InputLine::Text(
            line.trim_end_matches(['\n', '\r']).to_string(),
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn text(line: &str) -> Option<InputLine> {
        Some(InputLine::Text(line.to_string()))
    }

    #[test]
    fn test_reads_lines_until_eof() {
        let mut reader = LineReader::new(Cursor::new("/status\r\nhello\nquit"));

        assert_eq!(reader.next_line().unwrap(), text("/status"));
        assert_eq!(reader.next_line().unwrap(), text("hello"));
        assert_eq!(reader.next_line().unwrap(), text("quit"));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn test_blank_lines_are_returned() {
        let mut reader = LineReader::new(Cursor::new("\n\n"));
        assert_eq!(reader.next_line().unwrap(), text(""));
        assert_eq!(reader.next_line().unwrap(), text(""));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn test_unicode_line() {
        let mut reader = LineReader::new(Cursor::new("こんにちは世界！🌍\n"));
        assert_eq!(reader.next_line().unwrap(), text("こんにちは世界！🌍"));
    }

    #[test]
    fn test_line_at_max_size() {
        let content = format!("{}\n", "x".repeat(MAX_LINE_SIZE));
        let mut reader = LineReader::new(Cursor::new(content));
        match reader.next_line().unwrap() {
            Some(InputLine::Text(line)) => assert_eq!(line.len(), MAX_LINE_SIZE),
            other => panic!("Expected a text line, got {other:?}"),
        }
    }

    #[test]
    fn test_over_long_line_is_skipped() {
        let content = format!("{}\n/status\n", "x".repeat(MAX_LINE_SIZE + 10));
        let mut reader = LineReader::new(Cursor::new(content));

        assert_eq!(
            reader.next_line().unwrap(),
            Some(InputLine::Rejected(LineError::TooLong { max_kb: 64 }))
        );
        assert_eq!(reader.next_line().unwrap(), text("/status"));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn test_over_long_last_line() {
        let content = "x".repeat(MAX_LINE_SIZE + 10);
        let mut reader = LineReader::new(Cursor::new(content));

        let rejected = reader.next_line().unwrap();
        assert!(matches!(rejected, Some(InputLine::Rejected(LineError::TooLong { .. }))));
        assert_eq!(reader.next_line().unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let mut reader = LineReader::new(Cursor::new(b"\xff\xfe\n/status\n".to_vec()));

        assert_eq!(
            reader.next_line().unwrap(),
            Some(InputLine::Rejected(LineError::InvalidUtf8))
        );
        assert_eq!(reader.next_line().unwrap(), text("/status"));
    }
}
