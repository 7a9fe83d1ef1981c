//! Audit-logging wrapper.
//!
//! Downstream code generation (renaming maps shipped to JavaScript,
//! source-map emission) needs the full original-to-renamed mapping in a
//! stable order. This wrapper observes a delegate and logs the pairs it
//! produces for keys matching a predicate.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::SubstitutionMap;

/// Wraps a delegate and records `(original, renamed)` pairs for keys
/// matching the predicate, in first-request order.
///
/// Non-matching keys are still renamed and returned, just not logged.
pub struct RecordingSubstitutionMap<D> {
    delegate: D,
    predicate: Box<dyn Fn(&str) -> bool>,
    mappings: Vec<(Arc<str>, Arc<str>)>,
    recorded: FxHashSet<Arc<str>>,
}

impl<D: SubstitutionMap> RecordingSubstitutionMap<D> {
    pub fn new(delegate: D, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        RecordingSubstitutionMap {
            delegate,
            predicate: Box::new(predicate),
            mappings: Vec::new(),
            recorded: FxHashSet::default(),
        }
    }

    /// The recorded `(original, renamed)` pairs, in first-request order.
    pub fn mappings(&self) -> &[(Arc<str>, Arc<str>)] {
        &self.mappings
    }
}

impl<D: SubstitutionMap> SubstitutionMap for RecordingSubstitutionMap<D> {
    fn get(&mut self, key: &Arc<str>) -> Arc<str> {
        let renamed = self.delegate.get(key);
        if (self.predicate)(key) && self.recorded.insert(Arc::clone(key)) {
            self.mappings.push((Arc::clone(key), Arc::clone(&renamed)));
        }
        renamed
    }
}
