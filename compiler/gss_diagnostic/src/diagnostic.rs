//! Core diagnostic types.
//!
//! A [`GssError`] is one structured diagnostic: what class of problem,
//! a human message, and where in the source it happened. Errors never
//! unwind through the compiler — they are handed to an
//! [`crate::ErrorManager`] and surfaced together at the end.

use std::fmt;

use gss_ir::SourceCodeLocation;

/// The class of a diagnostic.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    /// Produced by the external parser (recoverable parse errors are
    /// recorded here when error-recovery mode is on).
    Syntax,
    /// Produced by passes: undefined constant, duplicate mixin name,
    /// invalid component nesting and friends.
    Semantic,
    /// An internal inconsistency worth reporting but not panicking over.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Syntax => write!(f, "syntax"),
            ErrorKind::Semantic => write!(f, "semantic"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

/// One diagnostic: kind, message, source location.
#[derive(Clone, PartialEq, Debug)]
pub struct GssError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: SourceCodeLocation,
}

impl GssError {
    /// Create a diagnostic.
    pub fn new(kind: ErrorKind, message: impl Into<String>, location: SourceCodeLocation) -> Self {
        GssError {
            kind,
            message: message.into(),
            location,
        }
    }

    /// Create a syntax diagnostic.
    pub fn syntax(message: impl Into<String>, location: SourceCodeLocation) -> Self {
        GssError::new(ErrorKind::Syntax, message, location)
    }

    /// Create a semantic diagnostic.
    pub fn semantic(message: impl Into<String>, location: SourceCodeLocation) -> Self {
        GssError::new(ErrorKind::Semantic, message, location)
    }

    /// Create an internal diagnostic.
    pub fn internal(message: impl Into<String>, location: SourceCodeLocation) -> Self {
        GssError::new(ErrorKind::Internal, message, location)
    }

    /// The 1-based (line, column) of the diagnostic, or (1, 1) for
    /// unknown locations.
    pub fn line_and_column(&self) -> (u32, u32) {
        if self.location.is_unknown() {
            (1, 1)
        } else {
            let begin = self.location.begin();
            (begin.line, begin.index_in_line)
        }
    }
}

impl fmt::Display for GssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error: {}", self.kind, self.message)
    }
}
