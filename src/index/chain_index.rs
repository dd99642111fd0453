use geo_types::Rect;
use rstar::{RTree, RTreeObject, AABB};

use crate::index::monotone_chain::{build_chains, MonotoneChain};
use crate::noding::SegmentChain;
use crate::utils::{envelope_expand, envelope_intersects};

/// Default number of segments at which recursive overlap bisection stops.
pub const DEFAULT_LEAF_SIZE: usize = 1;

/// A packed bounding-box tree over the monotone chains of a set of segment
/// chains. Immutable once built, so it can be shared across threads and
/// queried repeatedly.
#[derive(Debug)]
pub struct MonotoneChainIndex {
    tree: RTree<MonotoneChain>,
    tolerance: f64,
    leaf_size: usize,
}

impl MonotoneChainIndex {
    pub fn build<S: SegmentChain>(chains: &[S], tolerance: f64) -> Self {
        Self::build_filtered(chains, None, tolerance)
    }

    /// Builds the index keeping only monotone chains whose envelope meets
    /// `filter` (expanded by the tolerance).
    pub fn build_filtered<S: SegmentChain>(chains: &[S], filter: Option<&Rect<f64>>, tolerance: f64) -> Self {
        let filter = filter.map(|env| envelope_expand(env, tolerance));
        let mut next_id = 0;
        let mut monotone = Vec::new();
        for (chain_id, chain) in chains.iter().enumerate() {
            for mc in build_chains(chain.coords(), chain_id, tolerance, &mut next_id) {
                if filter.as_ref().map_or(true, |f| envelope_intersects(f, &mc.envelope())) {
                    monotone.push(mc);
                }
            }
        }
        Self {
            tree: RTree::bulk_load(monotone),
            tolerance,
            leaf_size: DEFAULT_LEAF_SIZE,
        }
    }

    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size.max(1);
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn chains(&self) -> impl Iterator<Item = &MonotoneChain> {
        self.tree.iter()
    }

    /// Monotone chains whose (tolerance-expanded) envelope meets `env`.
    pub fn query(&self, env: &Rect<f64>) -> impl Iterator<Item = &MonotoneChain> {
        let aabb = AABB::from_corners([env.min().x, env.min().y], [env.max().x, env.max().y]);
        self.tree.locate_in_envelope_intersecting(&aabb)
    }

    /// Monotone chains overlapping `mc`, which need not belong to this index.
    pub fn query_chain<'a>(&'a self, mc: &MonotoneChain) -> impl Iterator<Item = &'a MonotoneChain> {
        let aabb = mc.envelope_aabb();
        self.tree.locate_in_envelope_intersecting(&aabb)
    }

    /// Unordered pairs of distinct monotone chains with overlapping envelopes.
    pub fn overlapping_pairs(&self) -> impl Iterator<Item = (&MonotoneChain, &MonotoneChain)> {
        self.tree
            .intersection_candidates_with_other_tree(&self.tree)
            .filter(|(a, b)| a.id < b.id)
    }
}

impl MonotoneChain {
    fn envelope_aabb(&self) -> AABB<[f64; 2]> {
        RTreeObject::envelope(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noding::SegmentString;
    use geo_types::Coord;

    fn ss(pts: &[(f64, f64)]) -> SegmentString {
        SegmentString::new(pts.iter().map(|&(x, y)| Coord { x, y }).collect(), 0)
    }

    #[test]
    fn test_overlapping_pairs_are_unique() {
        let chains = vec![
            ss(&[(0.0, 0.0), (10.0, 10.0)]),
            ss(&[(0.0, 10.0), (10.0, 0.0)]),
            ss(&[(20.0, 20.0), (30.0, 30.0)]),
        ];
        let index = MonotoneChainIndex::build(&chains, 0.0);
        assert_eq!(index.len(), 3);
        let pairs: Vec<_> = index.overlapping_pairs().map(|(a, b)| (a.chain_id, b.chain_id)).collect();
        assert_eq!(pairs.len(), 1);
        let (a, b) = pairs[0];
        assert_eq!(a.min(b), 0);
        assert_eq!(a.max(b), 1);
    }

    #[test]
    fn test_tolerance_expands_query() {
        let chains = vec![ss(&[(0.0, 0.0), (10.0, 0.0)]), ss(&[(0.0, 0.5), (10.0, 0.5)])];
        assert_eq!(MonotoneChainIndex::build(&chains, 0.0).overlapping_pairs().count(), 0);
        assert_eq!(MonotoneChainIndex::build(&chains, 1.0).overlapping_pairs().count(), 1);
    }

    #[test]
    fn test_filtered_build_drops_distant_chains() {
        let chains = vec![ss(&[(0.0, 0.0), (1.0, 1.0)]), ss(&[(50.0, 50.0), (60.0, 60.0)])];
        let filter = Rect::new(Coord { x: -1.0, y: -1.0 }, Coord { x: 2.0, y: 2.0 });
        let index = MonotoneChainIndex::build_filtered(&chains, Some(&filter), 0.0);
        assert_eq!(index.len(), 1);
        let hits: Vec<_> = index.query(&filter).map(|mc| mc.chain_id).collect();
        assert_eq!(hits, vec![0]);
    }
}
