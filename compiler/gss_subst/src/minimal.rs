//! Shortest-name renaming.
//!
//! Keys are assigned the shortest strings still available, enumerated in
//! a fixed canonical order so the assignment is deterministic across
//! runs. The alphabet is two-tiered: the first character comes from
//! [`START_CHARS`] (a valid CSS identifier start), every later character
//! from the larger [`CONTINUATION_CHARS`] set.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::SubstitutionMap;

/// Characters allowed as the first character of a renamed identifier.
pub const START_CHARS: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Characters allowed after the first character.
pub const CONTINUATION_CHARS: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_";

/// The `n`-th string in the canonical shortest-first enumeration.
///
/// All length-1 strings come first (52 of them), then all length-2
/// strings (52 * 64), and so on: tier `L` holds exactly
/// `|START_CHARS| * |CONTINUATION_CHARS|^(L-1)` strings. Within a tier,
/// strings are ordered by start character, then by continuation
/// characters treated as big-endian base-64 digits.
pub fn to_short_string(n: u64) -> String {
    let start_len = START_CHARS.len() as u64;
    let cont_len = CONTINUATION_CHARS.len() as u64;

    let mut remaining = n;
    let mut length = 1u32;
    let mut tier_size = start_len;
    while remaining >= tier_size {
        remaining -= tier_size;
        length += 1;
        tier_size = start_len * cont_len.pow(length - 1);
    }

    let suffix_count = cont_len.pow(length - 1);
    let mut out = String::with_capacity(length as usize);
    out.push(START_CHARS[(remaining / suffix_count) as usize] as char);

    let mut suffix_index = remaining % suffix_count;
    let mut digits = [0u8; 16];
    let digit_count = (length - 1) as usize;
    for digit in digits.iter_mut().take(digit_count) {
        *digit = CONTINUATION_CHARS[(suffix_index % cont_len) as usize];
        suffix_index /= cont_len;
    }
    for digit in digits[..digit_count].iter().rev() {
        out.push(*digit as char);
    }
    out
}

/// Renames keys to the shortest strings not yet taken.
///
/// The allocator index only ever advances, so two distinct keys can
/// never receive the same output. Generated strings found in the
/// blacklist are skipped entirely: they are not assigned to any key and
/// do not consume a key's turn in the enumeration.
pub struct MinimalSubstitutionMap {
    renamings: FxHashMap<Arc<str>, Arc<str>>,
    next_index: u64,
    blacklist: FxHashSet<String>,
}

impl MinimalSubstitutionMap {
    pub fn new() -> Self {
        Self::with_blacklist(FxHashSet::default())
    }

    /// Create a map that never emits any string in `blacklist`.
    ///
    /// Used to keep renamed output clear of identifiers that external
    /// stylesheets or scripts already depend on.
    pub fn with_blacklist(blacklist: FxHashSet<String>) -> Self {
        MinimalSubstitutionMap {
            renamings: FxHashMap::default(),
            next_index: 0,
            blacklist,
        }
    }

    fn next_available(&mut self) -> String {
        loop {
            let candidate = to_short_string(self.next_index);
            self.next_index += 1;
            if !self.blacklist.contains(&candidate) {
                return candidate;
            }
        }
    }
}

impl Default for MinimalSubstitutionMap {
    fn default() -> Self {
        Self::new()
    }
}

impl SubstitutionMap for MinimalSubstitutionMap {
    fn get(&mut self, key: &Arc<str>) -> Arc<str> {
        if let Some(renamed) = self.renamings.get(key) {
            return Arc::clone(renamed);
        }
        let renamed: Arc<str> = Arc::from(self.next_available());
        self.renamings.insert(Arc::clone(key), Arc::clone(&renamed));
        renamed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_enumeration_boundaries() {
        assert_eq!(to_short_string(0), "a");
        assert_eq!(to_short_string(25), "z");
        assert_eq!(to_short_string(26), "A");
        assert_eq!(to_short_string(51), "Z");
        // First length-2 string.
        assert_eq!(to_short_string(52), "aa");
        assert_eq!(to_short_string(52 + 63), "a_");
        assert_eq!(to_short_string(52 + 64), "ba");
        // First length-3 string.
        assert_eq!(to_short_string(52 + 52 * 64), "aaa");
    }

    #[test]
    fn test_enumeration_is_exhaustive_per_tier() {
        // Lengths 1 and 2: 52 + 52*64 strings, all distinct, each tier
        // exactly full.
        let total = 52 + 52 * 64;
        let mut seen = FxHashSet::default();
        let mut by_length = [0usize; 3];
        for n in 0..total {
            let s = to_short_string(n as u64);
            assert!(s.len() == 1 || s.len() == 2, "unexpected length: {s:?}");
            by_length[s.len()] += 1;
            assert!(seen.insert(s), "duplicate at ordinal {n}");
        }
        assert_eq!(by_length[1], 52);
        assert_eq!(by_length[2], 52 * 64);
    }

    #[test]
    fn test_get_is_idempotent() {
        let mut map = MinimalSubstitutionMap::new();
        let first = map.get(&Arc::from("header"));
        map.get(&Arc::from("footer"));
        let again = map.get(&Arc::from("header"));
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_distinct_keys_get_distinct_names() {
        let mut map = MinimalSubstitutionMap::new();
        let mut outputs = FxHashSet::default();
        for i in 0..200 {
            let renamed = map.get(&Arc::from(format!("key{i}")));
            assert!(outputs.insert(renamed.to_string()));
        }
    }

    #[test]
    fn test_blacklisted_names_are_skipped() {
        let blacklist: FxHashSet<String> =
            ["a".to_string(), "b".to_string(), "d".to_string()].into_iter().collect();
        let mut map = MinimalSubstitutionMap::with_blacklist(blacklist);
        assert_eq!(&*map.get(&Arc::from("one")), "c");
        assert_eq!(&*map.get(&Arc::from("two")), "e");
    }
}
