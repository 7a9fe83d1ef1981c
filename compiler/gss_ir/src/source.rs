//! Immutable source code model.
//!
//! A [`SourceCode`] pairs a file name with its full text and is never
//! mutated after creation. Locations ([`crate::SourceCodeLocation`]) and
//! diagnostics hold `Arc<SourceCode>` handles into it.

use std::fmt;
use std::sync::Arc;

/// An immutable source file: name plus full contents.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct SourceCode {
    file_name: String,
    contents: String,
}

impl SourceCode {
    /// Create a new source file and wrap it for sharing.
    pub fn new(file_name: impl Into<String>, contents: impl Into<String>) -> Arc<Self> {
        Arc::new(SourceCode {
            file_name: file_name.into(),
            contents: contents.into(),
        })
    }

    /// The file name this source was read from.
    #[inline]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The full source text.
    #[inline]
    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Length of the source text in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Check if the source is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// The text of a 1-based line, without its trailing newline.
    ///
    /// Returns `None` if the line number is out of range.
    pub fn line_text(&self, line_number: u32) -> Option<&str> {
        if line_number == 0 {
            return None;
        }
        self.contents
            .split('\n')
            .nth(line_number as usize - 1)
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
    }

    /// Convert a byte offset into a 1-based (line, column) pair.
    pub fn line_and_column(&self, offset: usize) -> (u32, u32) {
        let mut line = 1u32;
        let mut column = 1u32;
        for (idx, ch) in self.contents.char_indices() {
            if idx >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl fmt::Debug for SourceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SourceCode({}, {} bytes)", self.file_name, self.contents.len())
    }
}
