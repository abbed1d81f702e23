//! Insertion-ordered `column -> slot` mapping used by mapping-style markers.

use crate::fragment::Slot;
use indexmap::IndexMap;

/// An ordered mapping from column name to slot.
///
/// Iteration follows insertion order, which is the order columns and
/// placeholders appear in `VALUES`, `SET` and `WHERE` expansions. Setting an
/// existing key replaces its value and keeps its original position.
///
/// # Example
/// ```ignore
/// use sqlfrag::Fields;
///
/// let row = Fields::new().field("name", "alice").field("age", 30);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Fields {
    entries: IndexMap<String, Slot>,
}

impl Fields {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field (consuming version, for chaining).
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Slot>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Slot>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&Slot> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(name, slot)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Slot>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

impl<K, V> From<Vec<(K, V)>> for Fields
where
    K: Into<String>,
    V: Into<Slot>,
{
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Fields
where
    K: Into<String>,
    V: Into<Slot>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn keeps_insertion_order() {
        let fields = Fields::new().field("b", 1).field("a", 2).field("c", 3);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);
    }

    #[test]
    fn replacing_keeps_position() {
        let fields = Fields::new().field("a", 1).field("b", 2).field("a", 9);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(matches!(fields.get("a"), Some(Slot::Value(Value::Int(9)))));
    }

    #[test]
    fn collects_from_pairs() {
        let fields = Fields::from([("x", 1), ("y", 2)]);
        assert_eq!(fields.len(), 2);
        assert!(!fields.is_empty());
        assert!(Fields::new().is_empty());
    }
}
