//! Accumulating output buffer with tail-only prompt detection.
//!
//! Only the last `search_depth` bytes are inspected when checking for the
//! prompt, so a long banner or command output does not make every check
//! rescan everything received so far.

use bytes::BytesMut;
use vte::{Parser, Perform};

/// Buffer for accumulating shell output within one prompt wait.
#[derive(Debug)]
pub struct PromptBuffer {
    /// The accumulated raw output.
    buffer: BytesMut,

    /// How many bytes from the end are inspected for the prompt.
    search_depth: usize,
}

impl PromptBuffer {
    /// Create a new buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
        }
    }

    /// Append raw bytes received from the shell.
    pub fn extend(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Check whether the visible output ends with `marker`, ignoring trailing
    /// whitespace and terminal escape sequences.
    pub fn ends_with_prompt(&self, marker: char) -> bool {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        let visible = visible_text(&self.buffer[start..]);
        visible.trim_end().ends_with(marker)
    }

    /// Get a reference to the raw buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the buffer contents as a string (lossy UTF-8 conversion).
    pub fn as_str_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    /// Consume the buffer, returning its contents as a string.
    pub fn into_string(self) -> String {
        self.as_str_lossy().into_owned()
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the search depth setting.
    pub fn search_depth(&self) -> usize {
        self.search_depth
    }
}

impl Default for PromptBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}

/// Collects the printable text out of a VT100 byte stream.
#[derive(Default)]
struct TextCollector {
    text: String,
}

impl Perform for TextCollector {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\n' | b'\r' | b'\t') {
            self.text.push(byte as char);
        }
    }
}

/// Strip escape sequences and control bytes, keeping printable text.
fn visible_text(data: &[u8]) -> String {
    let mut parser: Parser = Parser::new();
    let mut collector = TextCollector::default();
    parser.advance(&mut collector, data);
    collector.text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_extend() {
        let mut buffer = PromptBuffer::new(100);
        buffer.extend(b"Hello, ");
        buffer.extend(b"world!");
        assert_eq!(buffer.as_slice(), b"Hello, world!");
        assert_eq!(buffer.len(), 13);
    }

    #[test]
    fn test_empty_never_matches() {
        let buffer = PromptBuffer::default();
        assert!(buffer.is_empty());
        assert!(!buffer.ends_with_prompt('>'));
    }

    #[test]
    fn test_trailing_whitespace_ignored() {
        let mut buffer = PromptBuffer::default();
        buffer.extend(b"Last login: today\r\nadmin@PA-VM> \r\n");
        assert!(buffer.ends_with_prompt('>'));
        assert!(!buffer.ends_with_prompt('#'));
    }

    #[test]
    fn test_marker_must_be_last() {
        let mut buffer = PromptBuffer::default();
        buffer.extend(b"admin@PA-VM> request certificate");
        assert!(!buffer.ends_with_prompt('>'));
    }

    #[test]
    fn test_escape_sequences_ignored_for_detection() {
        let mut buffer = PromptBuffer::default();
        buffer.extend(b"\x1b[1madmin@PA-VM>\x1b[0m \x1b[K");
        assert!(buffer.ends_with_prompt('>'));
        // Raw bytes are kept untouched
        assert!(buffer.as_str_lossy().starts_with("\x1b[1m"));
    }

    #[test]
    fn test_only_tail_is_searched() {
        let mut buffer = PromptBuffer::new(10);
        buffer.extend(b"admin@PA-VM>");
        buffer.extend(&[b'x'; 100]);
        assert!(!buffer.ends_with_prompt('>'));
        buffer.extend(b"\nfw> ");
        assert!(buffer.ends_with_prompt('>'));
    }

    #[test]
    fn test_into_string() {
        let mut buffer = PromptBuffer::new(100);
        buffer.extend(b"admin@host> ");
        assert_eq!(buffer.into_string(), "admin@host> ");
    }
}
