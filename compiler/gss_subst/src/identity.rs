//! The do-nothing map.

use std::sync::Arc;

use crate::SubstitutionMap;

/// Returns every key unchanged. Used when renaming is disabled.
#[derive(Default)]
pub struct IdentitySubstitutionMap {
    empty: Option<Arc<str>>,
}

impl IdentitySubstitutionMap {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubstitutionMap for IdentitySubstitutionMap {
    fn get(&mut self, key: &Arc<str>) -> Arc<str> {
        if key.is_empty() {
            // All empty keys share one interned allocation.
            return Arc::clone(self.empty.get_or_insert_with(|| Arc::from("")));
        }
        Arc::clone(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_same_reference() {
        let mut map = IdentitySubstitutionMap::new();
        let key: Arc<str> = Arc::from("CSS_FOO");
        let renamed = map.get(&key);
        assert!(Arc::ptr_eq(&key, &renamed));
    }

    #[test]
    fn test_empty_keys_share_one_allocation() {
        let mut map = IdentitySubstitutionMap::new();
        let a: Arc<str> = Arc::from("");
        let b: Arc<str> = Arc::from("");
        let ra = map.get(&a);
        let rb = map.get(&b);
        assert!(Arc::ptr_eq(&ra, &rb));
        assert_eq!(&*ra, "");
    }
}
