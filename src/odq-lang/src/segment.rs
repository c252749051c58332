//! Source-text spans used for values and error locations.

use std::fmt;
use std::sync::Arc;

/// An immutable view of a span within a source string.
///
/// Segments share ownership of the source text, so they stay valid after
/// the compile call that produced them returns. Every token and every
/// located error carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    source: Arc<str>,
    start: usize,
    len: usize,
}

impl Segment {
    /// Creates a segment over `source[start..start + len]`.
    ///
    /// # Panics
    ///
    /// Panics if the span does not lie on char boundaries within `source`.
    pub fn new(source: Arc<str>, start: usize, len: usize) -> Self {
        assert!(
            source.get(start..start + len).is_some(),
            "segment {}..{} out of bounds for source of length {}",
            start,
            start + len,
            source.len()
        );
        Segment { source, start, len }
    }

    /// Creates a zero-width segment at `at`, marking a position rather than
    /// a run of text.
    pub fn zero_width(source: Arc<str>, at: usize) -> Self {
        Segment::new(source, at, 0)
    }

    /// The smallest segment covering both `self` and `other`.
    ///
    /// # Panics
    ///
    /// Panics if the two segments view different source strings.
    pub fn encompass(&self, other: &Segment) -> Segment {
        assert!(
            Arc::ptr_eq(&self.source, &other.source),
            "cannot encompass segments of different sources"
        );
        let start = self.start.min(other.start);
        let end = self.end().max(other.end());
        Segment::new(self.source.clone(), start, end - start)
    }

    /// The text this segment denotes.
    pub fn text(&self) -> &str {
        &self.source[self.start..self.start + self.len]
    }

    /// The full source string this segment views.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Shared handle to the source string.
    pub fn source_arc(&self) -> Arc<str> {
        self.source.clone()
    }

    /// Byte offset where the segment starts.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Byte offset one past the segment's last byte.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Length of the segment in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the segment is zero-width.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Renders the full source with this segment bracketed, e.g.
    /// `1 + [+] 5`. Used by diagnostics and tests.
    pub fn highlight(&self) -> String {
        self.highlight_with("[", "]")
    }

    /// [`highlight`](Self::highlight) with caller-chosen markers.
    pub fn highlight_with(&self, open: &str, close: &str) -> String {
        let mut out = String::with_capacity(self.source.len() + open.len() + close.len());
        out.push_str(&self.source[..self.start]);
        out.push_str(open);
        out.push_str(self.text());
        out.push_str(close);
        out.push_str(&self.source[self.end()..]);
        out
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}
