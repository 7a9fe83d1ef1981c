//! GSS Subst - deterministic identifier renaming.
//!
//! A [`SubstitutionMap`] renames original identifiers (CSS class and id
//! names) to output identifiers for minification and obfuscation. Every
//! map is a pure function per compilation: `get` is memoized, so repeated
//! calls with the same key return the identical interned result.
//!
//! Maps compose: [`SplittingSubstitutionMap`] and
//! [`RecordingSubstitutionMap`] wrap a delegate, so a typical production
//! stack is recording → splitting → minimal.

mod identity;
mod minimal;
mod prefixing;
mod recording;
mod simple;
mod splitting;

use std::sync::Arc;

pub use identity::IdentitySubstitutionMap;
pub use minimal::{to_short_string, MinimalSubstitutionMap, CONTINUATION_CHARS, START_CHARS};
pub use prefixing::PrefixingSubstitutionMap;
pub use recording::RecordingSubstitutionMap;
pub use simple::SimpleSubstitutionMap;
pub use splitting::SplittingSubstitutionMap;

/// A renaming function from original identifier to output identifier.
///
/// Implementations memoize: within one map instance, equal keys always
/// produce the identical `Arc<str>`.
pub trait SubstitutionMap {
    /// Rename `key`.
    fn get(&mut self, key: &Arc<str>) -> Arc<str>;
}
