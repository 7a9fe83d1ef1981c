//! Comments attached to tree nodes.
//!
//! The external parser hands comments to the node they precede; passes
//! preserve them across deep copies and splices so the printer can emit
//! them next to the rewritten constructs.

use std::fmt;
use std::sync::Arc;

use crate::location::SourceCodeLocation;

/// A source comment attached to a node.
#[derive(Clone, PartialEq)]
pub struct Comment {
    /// The comment text, including its `/* */` delimiters.
    pub text: Arc<str>,
    /// Where the comment appeared, or unknown for synthesized comments.
    pub location: SourceCodeLocation,
}

impl Comment {
    /// Create a new comment.
    pub fn new(text: impl Into<Arc<str>>, location: SourceCodeLocation) -> Self {
        Comment {
            text: text.into(),
            location,
        }
    }

    /// Create a comment with no source location.
    pub fn synthetic(text: impl Into<Arc<str>>) -> Self {
        Comment::new(text, SourceCodeLocation::unknown())
    }
}

impl fmt::Debug for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Comment({:?} @ {:?})", self.text, self.location)
    }
}
