//! Marker-suffix renaming, mostly for tests and debugging output.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::SubstitutionMap;

/// Appends a trailing underscore to every key.
///
/// The output stays readable, which makes renamed stylesheets easy to
/// diff against their source.
#[derive(Default)]
pub struct SimpleSubstitutionMap {
    renamings: FxHashMap<Arc<str>, Arc<str>>,
}

impl SimpleSubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubstitutionMap for SimpleSubstitutionMap {
    fn get(&mut self, key: &Arc<str>) -> Arc<str> {
        if let Some(renamed) = self.renamings.get(key) {
            return Arc::clone(renamed);
        }
        let renamed: Arc<str> = Arc::from(format!("{key}_"));
        self.renamings.insert(Arc::clone(key), Arc::clone(&renamed));
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_appends_underscore() {
        let mut map = SimpleSubstitutionMap::new();
        assert_eq!(&*map.get(&Arc::from("CSS_FOO")), "CSS_FOO_");
    }

    #[test]
    fn test_memoized() {
        let mut map = SimpleSubstitutionMap::new();
        let first = map.get(&Arc::from("a"));
        let second = map.get(&Arc::from("a"));
        assert!(Arc::ptr_eq(&first, &second));
    }
}
