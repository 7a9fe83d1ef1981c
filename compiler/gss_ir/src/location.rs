//! Source location spans.
//!
//! A [`SourceCodeLocation`] is bound to one [`SourceCode`] and records its
//! begin and end as full (character index, line, column) points so that
//! diagnostics never have to recompute positions. A distinguished unknown
//! sentinel marks synthesized nodes.

use std::fmt;
use std::sync::Arc;

use crate::source::SourceCode;

/// Error when constructing or merging a [`SourceCodeLocation`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// Begin character index is after the end character index.
    #[error("invalid span: begin index {begin} is after end index {end}")]
    InvalidSpan { begin: u32, end: u32 },
    /// Locations from different source files cannot be merged.
    #[error("cannot merge locations from different files: {left} and {right}")]
    CrossFile { left: String, right: String },
    /// The left location must begin strictly before the right one.
    #[error("cannot merge out-of-order locations: {left} does not precede {right}")]
    OutOfOrder { left: u32, right: u32 },
    /// Merging requires at least one known location.
    #[error("cannot merge an empty or all-unknown location set")]
    NothingToMerge,
}

/// A point in a source file.
///
/// `char_index` is a byte offset into the UTF-8 contents; `line` and
/// `index_in_line` are 1-based.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct SourcePoint {
    pub char_index: u32,
    pub line: u32,
    pub index_in_line: u32,
}

impl SourcePoint {
    /// Create a new source point.
    #[inline]
    pub const fn new(char_index: u32, line: u32, index_in_line: u32) -> Self {
        SourcePoint {
            char_index,
            line,
            index_in_line,
        }
    }
}

/// A span over one source file, or the unknown sentinel.
///
/// Invariant: `begin.char_index <= end.char_index`, enforced at
/// construction.
#[derive(Clone)]
pub struct SourceCodeLocation {
    /// `None` marks the unknown sentinel.
    source: Option<Arc<SourceCode>>,
    begin: SourcePoint,
    end: SourcePoint,
}

impl SourceCodeLocation {
    /// Create a location over `source`, validating span ordering.
    pub fn new(
        source: Arc<SourceCode>,
        begin: SourcePoint,
        end: SourcePoint,
    ) -> Result<Self, LocationError> {
        if begin.char_index > end.char_index {
            return Err(LocationError::InvalidSpan {
                begin: begin.char_index,
                end: end.char_index,
            });
        }
        Ok(SourceCodeLocation {
            source: Some(source),
            begin,
            end,
        })
    }

    /// The unknown sentinel, used for synthesized nodes.
    pub fn unknown() -> Self {
        SourceCodeLocation {
            source: None,
            begin: SourcePoint::default(),
            end: SourcePoint::default(),
        }
    }

    /// Check whether this is the unknown sentinel.
    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.source.is_none()
    }

    /// The source this location points into, unless unknown.
    #[inline]
    pub fn source(&self) -> Option<&Arc<SourceCode>> {
        self.source.as_ref()
    }

    /// Begin point of the span.
    #[inline]
    pub fn begin(&self) -> SourcePoint {
        self.begin
    }

    /// End point of the span (exclusive).
    #[inline]
    pub fn end(&self) -> SourcePoint {
        self.end
    }

    /// The source text covered by this span.
    ///
    /// Returns the empty string for the unknown sentinel.
    pub fn matched_text(&self) -> &str {
        match &self.source {
            Some(source) => {
                &source.contents()[self.begin.char_index as usize..self.end.char_index as usize]
            }
            None => "",
        }
    }

    /// Merge two locations from the same source.
    ///
    /// `a` must begin strictly before `b`; the result spans `a.begin` to
    /// `b.end`. Merging across files or out of order fails.
    pub fn merge(a: &Self, b: &Self) -> Result<Self, LocationError> {
        let (left, right) = match (&a.source, &b.source) {
            (Some(left), Some(right)) => (left, right),
            _ => return Err(LocationError::NothingToMerge),
        };
        if !Arc::ptr_eq(left, right) && left.file_name() != right.file_name() {
            return Err(LocationError::CrossFile {
                left: left.file_name().to_string(),
                right: right.file_name().to_string(),
            });
        }
        if a.begin.char_index >= b.begin.char_index {
            return Err(LocationError::OutOfOrder {
                left: a.begin.char_index,
                right: b.begin.char_index,
            });
        }
        SourceCodeLocation::new(Arc::clone(left), a.begin, b.end)
    }

    /// Merge a whole set of locations into one covering span.
    ///
    /// Sorts by begin index and folds [`Self::merge`] across the set.
    /// Unknown locations are ignored; more than one distinct file fails
    /// with [`LocationError::CrossFile`].
    pub fn merge_all<'a, I>(locations: I) -> Result<Self, LocationError>
    where
        I: IntoIterator<Item = &'a SourceCodeLocation>,
    {
        let mut known: Vec<&SourceCodeLocation> =
            locations.into_iter().filter(|l| !l.is_unknown()).collect();
        if known.is_empty() {
            return Err(LocationError::NothingToMerge);
        }
        known.sort_by_key(|l| l.begin.char_index);

        let mut merged = known[0].clone();
        for next in &known[1..] {
            // Spans produced by the parser can nest; fold keeps the
            // minimum begin and maximum end rather than requiring strict
            // pairwise ordering after the first element.
            let (left, right) = match (&merged.source, &next.source) {
                (Some(left), Some(right)) => (left, right),
                _ => return Err(LocationError::NothingToMerge),
            };
            if !Arc::ptr_eq(left, right) && left.file_name() != right.file_name() {
                return Err(LocationError::CrossFile {
                    left: left.file_name().to_string(),
                    right: right.file_name().to_string(),
                });
            }
            let end = if next.end.char_index > merged.end.char_index {
                next.end
            } else {
                merged.end
            };
            merged = SourceCodeLocation::new(Arc::clone(left), merged.begin, end)?;
        }
        Ok(merged)
    }
}

impl PartialEq for SourceCodeLocation {
    fn eq(&self, other: &Self) -> bool {
        let same_source = match (&self.source, &other.source) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b) || a.file_name() == b.file_name(),
            _ => false,
        };
        same_source && self.begin == other.begin && self.end == other.end
    }
}

impl Eq for SourceCodeLocation {}

impl fmt::Debug for SourceCodeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(
                f,
                "{}:{}..{}",
                source.file_name(),
                self.begin.char_index,
                self.end.char_index
            ),
            None => write!(f, "<unknown>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(src: &Arc<SourceCode>, offset: u32) -> SourcePoint {
        let (line, column) = src.line_and_column(offset as usize);
        SourcePoint::new(offset, line, column)
    }

    fn loc(src: &Arc<SourceCode>, begin: u32, end: u32) -> SourceCodeLocation {
        let Ok(location) =
            SourceCodeLocation::new(Arc::clone(src), point(src, begin), point(src, end))
        else {
            panic!("expected valid location {begin}..{end}");
        };
        location
    }

    #[test]
    fn test_invalid_span_rejected() {
        let src = SourceCode::new("a.gss", "abcdef");
        let result =
            SourceCodeLocation::new(Arc::clone(&src), point(&src, 4), point(&src, 2));
        assert!(matches!(result, Err(LocationError::InvalidSpan { .. })));
    }

    #[test]
    fn test_matched_text() {
        let src = SourceCode::new("a.gss", ".foo { color: red }");
        assert_eq!(loc(&src, 0, 4).matched_text(), ".foo");
        assert_eq!(loc(&src, 7, 12).matched_text(), "color");
    }

    #[test]
    fn test_merge_spans_begin_to_end() {
        let src = SourceCode::new("a.gss", "abc def ghi");
        let a = loc(&src, 0, 3);
        let b = loc(&src, 4, 7);
        let Ok(merged) = SourceCodeLocation::merge(&a, &b) else {
            panic!("expected merge to succeed");
        };
        assert_eq!(merged.begin(), a.begin());
        assert_eq!(merged.end(), b.end());
        assert_eq!(merged.matched_text(), "abc def");
    }

    #[test]
    fn test_merge_out_of_order_fails() {
        let src = SourceCode::new("a.gss", "abc def");
        let a = loc(&src, 4, 7);
        let b = loc(&src, 0, 3);
        assert!(matches!(
            SourceCodeLocation::merge(&a, &b),
            Err(LocationError::OutOfOrder { .. })
        ));
        // Equal begin indices are also out of order: "strictly before".
        let c = loc(&src, 0, 2);
        let d = loc(&src, 0, 3);
        assert!(matches!(
            SourceCodeLocation::merge(&c, &d),
            Err(LocationError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn test_merge_cross_file_fails() {
        let src_a = SourceCode::new("a.gss", "abc");
        let src_b = SourceCode::new("b.gss", "def");
        let a = loc(&src_a, 0, 3);
        let b = loc(&src_b, 0, 3);
        assert!(matches!(
            SourceCodeLocation::merge(&a, &b),
            Err(LocationError::CrossFile { .. })
        ));
    }

    #[test]
    fn test_merge_all_sorts_and_folds() {
        let src = SourceCode::new("a.gss", "abc def ghi");
        let locations = [loc(&src, 8, 11), loc(&src, 0, 3), loc(&src, 4, 7)];
        let Ok(merged) = SourceCodeLocation::merge_all(&locations) else {
            panic!("expected merge_all to succeed");
        };
        assert_eq!(merged.begin().char_index, 0);
        assert_eq!(merged.end().char_index, 11);
        assert_eq!(merged.matched_text(), "abc def ghi");
    }

    #[test]
    fn test_merge_all_rejects_multiple_files() {
        let src_a = SourceCode::new("a.gss", "abc");
        let src_b = SourceCode::new("b.gss", "def");
        let locations = [loc(&src_a, 0, 3), loc(&src_b, 0, 3)];
        assert!(matches!(
            SourceCodeLocation::merge_all(&locations),
            Err(LocationError::CrossFile { .. })
        ));
    }

    #[test]
    fn test_unknown_sentinel() {
        let unknown = SourceCodeLocation::unknown();
        assert!(unknown.is_unknown());
        assert_eq!(unknown.matched_text(), "");
        assert!(matches!(
            SourceCodeLocation::merge_all(&[unknown]),
            Err(LocationError::NothingToMerge)
        ));
    }
}
