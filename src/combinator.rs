//! Match combinator: intersects per-group constraints in a fixed order.
//!
//! Groups are the four facet categories followed by the free-text query.
//! An unrequested group is [`Constraint::Unconstrained`] and is skipped; a
//! requested group that matched nothing empties the result.

use ontofacet_core::{Constraint, FacetCategory, MatchSet};
use std::fmt;

/// One independently resolved group of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Branch {
    Facet(FacetCategory),
    Text,
}

impl Branch {
    /// Every branch in combination order.
    pub const ALL: [Branch; 5] = [
        Branch::Facet(FacetCategory::CellTypes),
        Branch::Facet(FacetCategory::Diseases),
        Branch::Facet(FacetCategory::Tissues),
        Branch::Facet(FacetCategory::Organism),
        Branch::Text,
    ];

    /// Position in [`Branch::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Branch::Facet(category) => *category as usize,
            Branch::Text => FacetCategory::ALL.len(),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Branch::Facet(category) => write!(f, "{category}"),
            Branch::Text => write!(f, "query"),
        }
    }
}

/// Intersect facet constraints (in category order) and then the text
/// constraint.
pub fn combine<I>(facets: I, text: Constraint) -> Constraint
where
    I: IntoIterator<Item = Constraint>,
{
    facets
        .into_iter()
        .chain(std::iter::once(text))
        .fold(Constraint::Unconstrained, Constraint::intersect)
}

/// Fan-in buffer: collects branch results as they arrive in any order.
///
/// The final value is always combined in [`Branch::ALL`] order; the running
/// intersection only answers whether the outcome is already known to be
/// empty.
#[derive(Debug, Clone)]
pub struct Combination {
    slots: [Constraint; 5],
    running: Constraint,
}

impl Default for Combination {
    fn default() -> Self {
        Self::new()
    }
}

impl Combination {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Constraint::Unconstrained),
            running: Constraint::Unconstrained,
        }
    }

    /// Store a branch result. Each branch is recorded at most once.
    pub fn record(&mut self, branch: Branch, constraint: Constraint) {
        let running = std::mem::replace(&mut self.running, Constraint::Unconstrained);
        self.running = running.intersect(constraint.clone());
        self.slots[branch.index()] = constraint;
    }

    /// True once the branches recorded so far share no id; the final result
    /// is then empty whatever the others return.
    pub fn is_decided_empty(&self) -> bool {
        self.running.is_empty_match()
    }

    pub fn finish(self) -> Constraint {
        let [celltypes, diseases, tissues, organism, text] = self.slots;
        combine([celltypes, diseases, tissues, organism], text)
    }

    /// The final id set. A request with no constraint at all selects
    /// nothing.
    pub fn into_match_set(self) -> MatchSet {
        self.finish().into_match_set()
    }
}
