//! Assertions over collected pipeline output.
//!
//! Without a `sort_by_key` the order of collected elements is unspecified, so
//! most tests want one of the order-insensitive forms here.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Assert equal length and equal elements position by position.
///
/// # Panics
///
/// Panics on the first difference, showing both collections.
///
/// ```
/// use shopflow::testing::assert_collections_equal;
///
/// assert_collections_equal(&[1, 2, 3], &[1, 2, 3]);
/// ```
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a, e,
            "mismatch at index {i}:\n  expected: {expected:?}\n  actual:   {actual:?}"
        );
    }
}

/// Assert that both collections hold the same multiset of elements.
///
/// Duplicates count: `[1, 1, 2]` and `[1, 2, 2]` differ.
///
/// # Panics
///
/// Panics listing the elements whose multiplicities differ.
///
/// ```
/// use shopflow::testing::assert_collections_unordered_equal;
///
/// assert_collections_unordered_equal(&[3, 1, 2, 1], &[1, 1, 2, 3]);
/// ```
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    fn counts<T: Eq + Hash>(items: &[T]) -> HashMap<&T, usize> {
        let mut m: HashMap<&T, usize> = HashMap::new();
        for item in items {
            *m.entry(item).or_default() += 1;
        }
        m
    }

    let (a, e) = (counts(actual), counts(expected));
    if a != e {
        let mut diff: Vec<(&T, usize, usize)> = e
            .iter()
            .map(|(k, n)| (*k, *n, a.get(k).copied().unwrap_or(0)))
            .filter(|(_, want, got)| want != got)
            .collect();
        diff.extend(a.iter().filter(|(k, _)| !e.contains_key(*k)).map(|(k, n)| (*k, 0, *n)));
        panic!(
            "multiset mismatch (element, expected count, actual count): {diff:?}\n  expected: {expected:?}\n  actual:   {actual:?}"
        );
    }
}

/// Assert that two keyed collections match once both are sorted by key.
///
/// Keys are expected to be unique, as after a combine.
///
/// # Panics
///
/// Panics on the first differing pair.
///
/// ```
/// use shopflow::testing::assert_kv_collections_equal;
///
/// assert_kv_collections_equal(vec![("b", 2), ("a", 1)], vec![("a", 1), ("b", 2)]);
/// ```
pub fn assert_kv_collections_equal<K, V>(mut actual: Vec<(K, V)>, mut expected: Vec<(K, V)>)
where
    K: Debug + Ord,
    V: Debug + PartialEq,
{
    actual.sort_by(|a, b| a.0.cmp(&b.0));
    expected.sort_by(|a, b| a.0.cmp(&b.0));
    assert_collections_equal(&actual, &expected);
}

/// Assert that two grouped collections have the same keys and, per key, the same
/// multiset of values.
///
/// # Panics
///
/// Panics on the first key whose group differs.
///
/// ```
/// use shopflow::testing::assert_grouped_kv_equal;
///
/// assert_grouped_kv_equal(vec![("a", vec![1, 2]), ("b", vec![3])], vec![("b", vec![3]), ("a", vec![2, 1])]);
/// ```
pub fn assert_grouped_kv_equal<K, V>(mut actual: Vec<(K, Vec<V>)>, mut expected: Vec<(K, Vec<V>)>)
where
    K: Debug + Ord,
    V: Debug + Eq + Hash,
{
    actual.sort_by(|a, b| a.0.cmp(&b.0));
    expected.sort_by(|a, b| a.0.cmp(&b.0));
    let ka: Vec<&K> = actual.iter().map(|(k, _)| k).collect();
    let ke: Vec<&K> = expected.iter().map(|(k, _)| k).collect();
    assert_eq!(ka, ke, "group keys differ");
    for ((k, av), (_, ev)) in actual.iter().zip(&expected) {
        let hint = format!("group {k:?}");
        assert_eq!(av.len(), ev.len(), "{hint}: size mismatch, expected {ev:?}, got {av:?}");
        assert_collections_unordered_equal(av, ev);
    }
}

/// Assert that two keyed float collections match by key within `tolerance`.
///
/// # Panics
///
/// Panics when keys differ or any value is further than `tolerance` from its
/// expected value.
///
/// ```
/// use shopflow::testing::assert_kv_close;
///
/// assert_kv_close(vec![("a", 0.1 + 0.2)], vec![("a", 0.3)], 1e-9);
/// ```
pub fn assert_kv_close<K: Debug + Ord>(mut actual: Vec<(K, f64)>, mut expected: Vec<(K, f64)>, tolerance: f64) {
    actual.sort_by(|a, b| a.0.cmp(&b.0));
    expected.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
    for ((ak, av), (ek, ev)) in actual.iter().zip(&expected) {
        assert_eq!(ak, ek, "key mismatch:\n  expected: {expected:?}\n  actual:   {actual:?}");
        assert!(
            (av - ev).abs() <= tolerance,
            "value for {ak:?} is {av}, expected {ev} (tolerance {tolerance})"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "multiset mismatch")]
    fn unordered_counts_duplicates() {
        assert_collections_unordered_equal(&[1, 1, 2], &[1, 2, 2]);
    }

    #[test]
    #[should_panic(expected = "mismatch at index 1")]
    fn ordered_reports_position() {
        assert_collections_equal(&[1, 3], &[1, 2]);
    }

    #[test]
    fn unordered_accepts_permutations_with_duplicates() {
        assert_collections_unordered_equal(&["b", "a", "b"], &["b", "b", "a"]);
    }

    #[test]
    fn grouped_ignores_key_and_value_order() {
        assert_grouped_kv_equal(
            vec![("b", vec![3]), ("a", vec![2, 1, 2])],
            vec![("a", vec![1, 2, 2]), ("b", vec![3])],
        );
    }

    #[test]
    #[should_panic(expected = "group keys differ")]
    fn grouped_reports_missing_key() {
        assert_grouped_kv_equal(vec![("a", vec![1])], vec![("a", vec![1]), ("b", vec![2])]);
    }

    #[test]
    #[should_panic(expected = "is 1.5, expected 1")]
    fn close_rejects_far_values() {
        assert_kv_close(vec![("a", 1.5)], vec![("a", 1.0)], 0.1);
    }
}
