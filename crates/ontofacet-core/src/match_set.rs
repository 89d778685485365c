//! Record-id sets and the constraint value threaded through combination.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A duplicate-free set of record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchSet(BTreeSet<String>);

impl MatchSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        self.0.insert(id.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn union(mut self, other: MatchSet) -> MatchSet {
        if self.0.len() < other.0.len() {
            return other.union(self);
        }
        self.0.extend(other.0);
        self
    }

    pub fn intersection(mut self, other: &MatchSet) -> MatchSet {
        self.0.retain(|id| other.0.contains(id));
        self
    }

    pub fn is_subset(&self, other: &MatchSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Ids in ascending order.
    pub fn into_vec(self) -> Vec<String> {
        self.0.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for MatchSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for MatchSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for MatchSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// What one group contributes to the cross-group intersection.
///
/// `Unconstrained` is the universal set: the group was not requested.
/// `Matched` with an empty set means the group was requested and matched
/// nothing, which empties the whole result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Unconstrained,
    Matched(MatchSet),
}

impl Constraint {
    pub fn is_unconstrained(&self) -> bool {
        matches!(self, Constraint::Unconstrained)
    }

    /// True if the group was requested and matched nothing.
    pub fn is_empty_match(&self) -> bool {
        matches!(self, Constraint::Matched(set) if set.is_empty())
    }

    pub fn intersect(self, other: Constraint) -> Constraint {
        match (self, other) {
            (Constraint::Unconstrained, c) | (c, Constraint::Unconstrained) => c,
            (Constraint::Matched(a), Constraint::Matched(b)) => {
                let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
                Constraint::Matched(small.intersection(&large))
            }
        }
    }

    pub fn union(self, other: Constraint) -> Constraint {
        match (self, other) {
            (Constraint::Unconstrained, _) | (_, Constraint::Unconstrained) => {
                Constraint::Unconstrained
            }
            (Constraint::Matched(a), Constraint::Matched(b)) => Constraint::Matched(a.union(b)),
        }
    }

    /// The matched ids. An unconstrained value yields the empty set: no
    /// filter was given, so nothing is selected for hydration.
    pub fn into_match_set(self) -> MatchSet {
        match self {
            Constraint::Unconstrained => MatchSet::new(),
            Constraint::Matched(set) => set,
        }
    }
}

impl From<MatchSet> for Constraint {
    fn from(set: MatchSet) -> Self {
        Constraint::Matched(set)
    }
}
