//! Compound-name renaming.
//!
//! CSS class names are often dash-delimited compounds (`nav-item-active`)
//! whose parts recur across many names. Renaming each part independently
//! keeps the total renamed alphabet small and lets source maps track
//! parts instead of whole names.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::SubstitutionMap;

/// Splits keys on `-`, renames each part through the delegate, and
/// rejoins with `-`.
///
/// Keys with no dash are returned as the identical input reference
/// without touching the delegate.
pub struct SplittingSubstitutionMap<D> {
    delegate: D,
    renamings: FxHashMap<Arc<str>, Arc<str>>,
}

impl<D: SubstitutionMap> SplittingSubstitutionMap<D> {
    pub fn new(delegate: D) -> Self {
        SplittingSubstitutionMap {
            delegate,
            renamings: FxHashMap::default(),
        }
    }

    /// The wrapped delegate map.
    pub fn delegate(&self) -> &D {
        &self.delegate
    }
}

impl<D: SubstitutionMap> SubstitutionMap for SplittingSubstitutionMap<D> {
    fn get(&mut self, key: &Arc<str>) -> Arc<str> {
        if !key.contains('-') {
            return Arc::clone(key);
        }
        if let Some(renamed) = self.renamings.get(key) {
            return Arc::clone(renamed);
        }
        let parts: Vec<Arc<str>> = key
            .split('-')
            .map(|part| self.delegate.get(&Arc::from(part)))
            .collect();
        let mut joined = String::with_capacity(key.len());
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                joined.push('-');
            }
            joined.push_str(part);
        }
        let renamed: Arc<str> = Arc::from(joined);
        self.renamings.insert(Arc::clone(key), Arc::clone(&renamed));
        renamed
    }
}
