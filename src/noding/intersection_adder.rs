use geo_types::Coord;

use crate::algorithm::SegmentIntersection;
use crate::noding::segment_string::NodedSegmentString;
use crate::noding::{ChainSegment, SegmentChain, SegmentIntersector};

/// A node discovered during traversal, waiting to be applied to its chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingNode {
    pub chain_id: usize,
    pub segment_index: usize,
    pub coord: Coord<f64>,
}

/// Computes the intersections between candidate segment pairs and records
/// them as nodes on both chains, keeping intersection statistics.
///
/// Chains are read-only while an index is being traversed, so discovered
/// nodes are buffered and applied afterwards with [`IntersectionAdder::apply_nodes`].
#[derive(Debug, Default)]
pub struct IntersectionAdder {
    pending: Vec<PendingNode>,
    pub num_tests: usize,
    pub num_intersections: usize,
    pub num_interior_intersections: usize,
    pub num_proper_intersections: usize,
    has_proper: bool,
    has_interior: bool,
}

impl IntersectionAdder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_proper_intersection(&self) -> bool {
        self.has_proper
    }

    pub fn has_interior_intersection(&self) -> bool {
        self.has_interior
    }

    pub fn pending_nodes(&self) -> &[PendingNode] {
        &self.pending
    }

    /// Adds all buffered nodes to their chains.
    pub fn apply_nodes(&mut self, chains: &mut [NodedSegmentString]) {
        for node in self.pending.drain(..) {
            chains[node.chain_id].add_intersection(node.coord, node.segment_index);
        }
    }

    /// An intersection between adjacent segments of one chain at their shared
    /// vertex is trivial. For a closed chain the first and last segments are
    /// adjacent too.
    fn is_trivial_intersection<S: SegmentChain>(
        li: &SegmentIntersection,
        a: &ChainSegment<'_, S>,
        b: &ChainSegment<'_, S>,
    ) -> bool {
        if a.chain_id != b.chain_id || li.count() != 1 {
            return false;
        }
        if a.index.abs_diff(b.index) == 1 {
            return true;
        }
        if a.chain.is_closed() {
            let max_segment_index = a.chain.len() - 2;
            if (a.index == 0 && b.index == max_segment_index) || (b.index == 0 && a.index == max_segment_index) {
                return true;
            }
        }
        false
    }

    fn push_nodes(&mut self, li: &SegmentIntersection, chain_id: usize, segment_index: usize) {
        for pt in li.points() {
            self.pending.push(PendingNode {
                chain_id,
                segment_index,
                coord: *pt,
            });
        }
    }
}

impl<S: SegmentChain> SegmentIntersector<S> for IntersectionAdder {
    fn process_intersections(&mut self, a: ChainSegment<'_, S>, b: ChainSegment<'_, S>) {
        if a.is_same_segment(&b) {
            return;
        }
        self.num_tests += 1;
        let Some(li) = SegmentIntersection::compute(a.p0(), a.p1(), b.p0(), b.p1()) else {
            return;
        };
        self.num_intersections += 1;
        if li.is_interior_intersection() {
            self.num_interior_intersections += 1;
            self.has_interior = true;
        }
        if Self::is_trivial_intersection(&li, &a, &b) {
            return;
        }
        self.push_nodes(&li, a.chain_id, a.index);
        self.push_nodes(&li, b.chain_id, b.index);
        if li.is_proper() {
            self.num_proper_intersections += 1;
            self.has_proper = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noding::process_all_pairs;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_adjacent_segments_are_trivial() {
        let chains = vec![NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)], 0)];
        let mut adder = IntersectionAdder::new();
        process_all_pairs(&chains, &mut adder);
        assert_eq!(adder.num_intersections, 1);
        assert!(adder.pending_nodes().is_empty());
    }

    #[test]
    fn test_closed_ring_wraparound_is_trivial() {
        let ring = vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0), c(0.0, 0.0)];
        let chains = vec![NodedSegmentString::new(ring, 0)];
        let mut adder = IntersectionAdder::new();
        process_all_pairs(&chains, &mut adder);
        assert!(adder.pending_nodes().is_empty());
        assert!(!adder.has_interior_intersection());
    }

    #[test]
    fn test_crossing_records_nodes_on_both_chains() {
        let mut chains = vec![
            NodedSegmentString::new(vec![c(0.0, 0.0), c(10.0, 10.0)], 0),
            NodedSegmentString::new(vec![c(0.0, 10.0), c(10.0, 0.0)], 1),
        ];
        let mut adder = IntersectionAdder::new();
        process_all_pairs(&chains, &mut adder);
        assert!(adder.has_proper_intersection());
        assert_eq!(adder.num_interior_intersections, 1);
        adder.apply_nodes(&mut chains);
        assert_eq!(chains[0].node_list().len(), 1);
        assert_eq!(chains[1].node_list().len(), 1);
    }
}
