//! Byte spans tied to their backing source file.

use std::fmt;

use crate::source_file::{Position, SourceFile};

/// A half-open byte range `[start, end)` within a [`SourceFile`], plus a
/// reference to that file.
///
/// A span without a file reference is *invalid*; invalid spans are used as
/// placeholders before real tokens are seen. Two spans are equal iff they
/// cover the same byte range of the same file (file identity, not file
/// contents).
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceSpan<'src> {
    start: usize,
    end: usize,
    source: Option<&'src SourceFile>,
}

impl<'src> SourceSpan<'src> {
    /// Creates a span over `start..end` of `source`.
    pub fn new(start: usize, end: usize, source: &'src SourceFile) -> Self {
        debug_assert!(start <= end && end <= source.len());
        Self {
            start,
            end,
            source: Some(source),
        }
    }

    /// An invalid placeholder span with no file reference.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Whether this span has a file reference.
    pub fn valid(&self) -> bool {
        self.source.is_some()
    }

    /// Start byte offset.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End byte offset (exclusive).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The text the span covers; empty for invalid spans.
    pub fn data(&self) -> &'src str {
        match self.source {
            Some(file) => &file.data()[self.start..self.end],
            None => "",
        }
    }

    /// The backing file, if the span is valid.
    pub fn source_file(&self) -> Option<&'src SourceFile> {
        self.source
    }

    /// The 1-based position of the span's first byte.
    pub fn position(&self) -> Option<Position> {
        self.source
            .map(|file| file.line_containing(self.start).0)
    }

    /// The position plus the text of the line containing the span's first
    /// byte, without the trailing newline.
    pub fn source_line(&self) -> Option<(Position, &'src str)> {
        self.source.map(|file| file.line_containing(self.start))
    }

    /// `filename:line:column` for diagnostics; `<unknown>` for invalid spans.
    pub fn position_str(&self) -> String {
        match (self.source, self.position()) {
            (Some(file), Some(position)) => {
                format!("{}:{}:{}", file.filename(), position.line, position.column)
            }
            _ => String::from("<unknown>"),
        }
    }
}

impl PartialEq for SourceSpan<'_> {
    fn eq(&self, other: &Self) -> bool {
        let same_file = match (self.source, other.source) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_file && self.start == other.start && self.end == other.end
    }
}

impl Eq for SourceSpan<'_> {}

impl fmt::Display for SourceSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data())
    }
}
