//! The per-call back-reference dictionary.
//!
//! [`Dictionary`] maps the full serialized text of a top-level element to the
//! slot where it first appeared. The encoder builds one at the start of each
//! call and drops it on return; nothing is shared between calls.
//!
//! It wraps [`IndexMap`], keeping entries in slot order.

use indexmap::map::Entry;
use indexmap::IndexMap;

/// Map from serialized text to first-occurrence slot.
///
/// # Examples
///
/// ```rust
/// use serde_backref::dict::Dictionary;
///
/// let mut dict = Dictionary::new();
/// assert!(dict.insert("23".to_string(), 2));
/// assert!(!dict.insert("23".to_string(), 4));
/// assert_eq!(dict.get("23"), Some(2));
/// assert_eq!(dict.len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Dictionary(IndexMap<String, usize>);

impl Dictionary {
    /// Creates an empty `Dictionary`.
    pub fn new() -> Self {
        Dictionary(IndexMap::new())
    }

    /// Creates an empty `Dictionary` sized for `capacity` distinct entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Dictionary(IndexMap::with_capacity(capacity))
    }

    /// Records `text` at `slot` and returns `true`, unless `text` is already
    /// present, in which case the existing slot is kept and `false` is returned.
    pub fn insert(&mut self, text: String, slot: usize) -> bool {
        match self.0.entry(text) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(slot);
                true
            }
        }
    }

    /// Returns the first slot holding `text`, if any.
    pub fn get(&self, text: &str) -> Option<usize> {
        self.0.get(text).copied()
    }

    /// Returns the number of distinct entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins() {
        let mut dict = Dictionary::new();
        assert!(dict.insert("1".to_string(), 0));
        assert!(!dict.insert("1".to_string(), 1));
        assert!(!dict.insert("1".to_string(), 5));
        assert_eq!(dict.get("1"), Some(0));
    }

    #[test]
    fn test_distinct_entries() {
        let mut dict = Dictionary::with_capacity(3);
        assert!(dict.is_empty());
        dict.insert("\"b\"".to_string(), 0);
        dict.insert("\"a\"".to_string(), 1);
        dict.insert("\"b\"".to_string(), 2);
        dict.insert("[1]".to_string(), 3);

        assert_eq!(dict.len(), 3);
        assert_eq!(dict.get("\"b\""), Some(0));
        assert_eq!(dict.get("[1]"), Some(3));
        assert_eq!(dict.get("[2]"), None);
    }
}
