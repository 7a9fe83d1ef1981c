//! Namespace-prefix renaming.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::SubstitutionMap;

/// Delegates, then prepends a fixed prefix to the delegate's result.
///
/// Lets several independently compiled stylesheets share a page without
/// their renamed identifiers colliding.
pub struct PrefixingSubstitutionMap<D> {
    prefix: String,
    delegate: D,
    renamings: FxHashMap<Arc<str>, Arc<str>>,
}

impl<D: SubstitutionMap> PrefixingSubstitutionMap<D> {
    pub fn new(prefix: impl Into<String>, delegate: D) -> Self {
        PrefixingSubstitutionMap {
            prefix: prefix.into(),
            delegate,
            renamings: FxHashMap::default(),
        }
    }
}

impl<D: SubstitutionMap> SubstitutionMap for PrefixingSubstitutionMap<D> {
    fn get(&mut self, key: &Arc<str>) -> Arc<str> {
        if let Some(renamed) = self.renamings.get(key) {
            return Arc::clone(renamed);
        }
        let delegated = self.delegate.get(key);
        let renamed: Arc<str> = Arc::from(format!("{}{delegated}", self.prefix));
        self.renamings.insert(Arc::clone(key), Arc::clone(&renamed));
        renamed
    }
}
