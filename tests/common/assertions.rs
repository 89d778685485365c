//! Domain-specific assertion macros for ontofacet harnesses.
//!
//! These wrap `pretty_assertions` so a failing id comparison shows a diff of
//! the sorted id lists instead of two opaque sets.

/// Assert that a `MatchSet` holds exactly the given ids.
///
/// ```rust
/// assert_ids!(engine.match_ids(&request).await?, ["R1", "R3"]);
/// ```
#[macro_export]
macro_rules! assert_ids {
    ($set:expr, [$($id:expr),* $(,)?]) => {{
        let actual: Vec<String> = $set.iter().map(|s| s.to_string()).collect();
        let mut expected: Vec<String> = vec![$($id.to_string()),*];
        expected.sort();
        pretty_assertions::assert_eq!(actual, expected);
    }};
}

/// Assert that every id of the first set is in the second.
#[macro_export]
macro_rules! assert_subset {
    ($small:expr, $large:expr) => {{
        let small: &ontofacet::MatchSet = &$small;
        let large: &ontofacet::MatchSet = &$large;
        if !small.is_subset(large) {
            let extra: Vec<&str> = small.iter().filter(|id| !large.contains(id)).collect();
            panic!(
                "assert_subset! failed: {} ids not in the larger set: {:?}",
                extra.len(),
                extra
            );
        }
    }};
}

/// Assert that hydrated records carry exactly the given ids, in order.
#[macro_export]
macro_rules! assert_record_ids {
    ($records:expr, [$($id:expr),* $(,)?]) => {{
        let actual: Vec<&str> = $records.iter().map(|r| r.id.as_str()).collect();
        let expected: Vec<&str> = vec![$($id),*];
        pretty_assertions::assert_eq!(actual, expected);
    }};
}
