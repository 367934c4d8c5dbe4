//! Pairwise feature correspondences between views.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::features::DescriberType;
use crate::scene::IndexT;

/// A pair of view ids.
pub type Pair = (IndexT, IndexT);

/// A correspondence between feature `i` of one view and feature `j` of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndMatch {
    /// Feature index in the first view.
    pub i: IndexT,
    /// Feature index in the second view.
    pub j: IndexT,
}

impl IndMatch {
    /// Create a correspondence.
    pub fn new(i: IndexT, j: IndexT) -> Self {
        Self { i, j }
    }

    /// Return the same correspondence seen from the other view.
    #[inline]
    pub fn swapped(&self) -> Self {
        Self {
            i: self.j,
            j: self.i,
        }
    }
}

/// Correspondences of one view pair, keyed by describer type.
pub type MatchesPerDescType = BTreeMap<DescriberType, Vec<IndMatch>>;

/// Correspondences between view pairs.
///
/// Each pair is stored once, under `(min, max)` view ordering. Accessors taking
/// two view ids orient the returned matches from the first view to the second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairwiseMatches {
    data: BTreeMap<Pair, MatchesPerDescType>,
}

impl PairwiseMatches {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a correspondence from `view_a` to `view_b`.
    ///
    /// Self-pairs are not stored.
    pub fn add_match(
        &mut self,
        view_a: IndexT,
        view_b: IndexT,
        desc_type: DescriberType,
        m: IndMatch,
    ) {
        if view_a == view_b {
            log::warn!("Ignoring match between view {view_a} and itself");
            return;
        }
        let (pair, m) = if view_a < view_b {
            ((view_a, view_b), m)
        } else {
            ((view_b, view_a), m.swapped())
        };
        self.data
            .entry(pair)
            .or_default()
            .entry(desc_type)
            .or_default()
            .push(m);
    }

    /// Get the matches from `view_a` to `view_b` for one describer type.
    ///
    /// Returns an empty list when the pair holds no such matches.
    pub fn matches(
        &self,
        view_a: IndexT,
        view_b: IndexT,
        desc_type: DescriberType,
    ) -> Vec<IndMatch> {
        let swap = view_a > view_b;
        let pair = if swap { (view_b, view_a) } else { (view_a, view_b) };
        self.data
            .get(&pair)
            .and_then(|per_desc| per_desc.get(&desc_type))
            .map(|matches| {
                matches
                    .iter()
                    .map(|m| if swap { m.swapped() } else { *m })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the stored matches of a canonical `(min, max)` pair.
    pub fn get(&self, pair: &Pair) -> Option<&MatchesPerDescType> {
        self.data.get(pair)
    }

    /// Iterate over the stored pairs in canonical ordering.
    pub fn iter(&self) -> impl Iterator<Item = (&Pair, &MatchesPerDescType)> {
        self.data.iter()
    }

    /// Iterate over the canonical pairs holding matches.
    pub fn pairs(&self) -> impl Iterator<Item = Pair> + '_ {
        self.data.keys().copied()
    }

    /// Total number of correspondences over every pair and describer type.
    pub fn num_matches(&self) -> usize {
        self.data
            .values()
            .flat_map(|per_desc| per_desc.values())
            .map(Vec::len)
            .sum()
    }

    /// Number of view pairs holding matches.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if no pair holds matches.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
