//! Raw route-value storage.
//!
//! This module provides the `(name, value)` bag a host hands to the binding
//! engine after matching a request path, using a small-vector optimization
//! to avoid heap allocations for common cases (1-4 values).

use smallvec::SmallVec;

/// Maximum number of values stored inline (stack allocated).
const INLINE_VALUES: usize = 4;

/// Raw route or query values supplied by the host for one request.
///
/// Values are stored as `(name, value)` string pairs in insertion order.
/// Lookups are case-insensitive, matching the name-correlation contract used
/// throughout Courier (a route value `id` satisfies a field `Id`).
///
/// # Example
///
/// ```rust
/// use courier_route::RouteValues;
///
/// let mut values = RouteValues::new();
/// values.push("customerId", "123");
/// values.push("action", "view");
///
/// assert_eq!(values.get("customerid"), Some("123"));
/// assert_eq!(values.get("Action"), Some("view"));
/// assert_eq!(values.get("unknown"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteValues {
    /// Storage for `(name, value)` pairs.
    inner: SmallVec<[(String, String); INLINE_VALUES]>,
}

impl RouteValues {
    /// Creates a new empty value set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a value set with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: SmallVec::with_capacity(capacity),
        }
    }

    /// Adds a value to the set.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.push((name.into(), value.into()));
    }

    /// Returns the value for a name, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns an iterator over the values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Clears all values, retaining allocated capacity.
    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<'a> IntoIterator for &'a RouteValues {
    type Item = (&'a str, &'a str);
    type IntoIter = std::iter::Map<
        std::slice::Iter<'a, (String, String)>,
        fn(&'a (String, String)) -> (&'a str, &'a str),
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for RouteValues {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RouteValues {
    fn from(pairs: [(&str, &str); N]) -> Self {
        pairs
            .into_iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_new() {
        let values = RouteValues::new();
        assert!(values.is_empty());
        assert_eq!(values.len(), 0);
    }

    #[test]
    fn test_push_and_get() {
        let mut values = RouteValues::new();
        values.push("id", "123");
        values.push("name", "alice");

        assert_eq!(values.get("id"), Some("123"));
        assert_eq!(values.get("name"), Some("alice"));
        assert_eq!(values.get("unknown"), None);
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let mut values = RouteValues::new();
        values.push("CustomerId", "42");

        assert_eq!(values.get("customerid"), Some("42"));
        assert_eq!(values.get("CUSTOMERID"), Some("42"));
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut values = RouteValues::new();
        values.push("a", "1");
        values.push("b", "2");

        let pairs: Vec<_> = values.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_clear() {
        let mut values = RouteValues::new();
        values.push("a", "1");
        values.clear();
        assert!(values.is_empty());
    }

    #[test]
    fn test_from_iterator() {
        let values: RouteValues = vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]
        .into_iter()
        .collect();

        assert_eq!(values.len(), 2);
        assert_eq!(values.get("b"), Some("2"));
    }

    #[test]
    fn test_from_pairs() {
        let values = RouteValues::from([("id", "7"), ("name", "x")]);
        assert_eq!(values.get("Id"), Some("7"));
    }

    #[test]
    fn test_spills_past_inline_capacity() {
        let mut values = RouteValues::new();
        for i in 0..10 {
            values.push(format!("key{i}"), format!("value{i}"));
        }

        assert_eq!(values.len(), 10);
        assert_eq!(values.get("key5"), Some("value5"));
    }
}
