use geo_types::Rect;

use crate::algorithm::SegmentIntersection;
use crate::index::{process_chain_overlaps, MonotoneChainIndex};
use crate::noding::{ChainSegment, SegmentChain, SegmentIntersector};
use crate::relate::segment_string::RelateSegmentString;
use crate::relate::topology::TopologyComputer;

/// Turns segment intersections between the edges of two geometries into
/// node sections on a [`TopologyComputer`].
pub struct EdgeSegmentIntersector<'t, 'a> {
    topology: &'t mut TopologyComputer<'a>,
}

impl<'t, 'a> EdgeSegmentIntersector<'t, 'a> {
    pub fn new(topology: &'t mut TopologyComputer<'a>) -> Self {
        Self { topology }
    }

    fn add_intersections(
        &mut self,
        ssa: &RelateSegmentString,
        seg_a: usize,
        ssb: &RelateSegmentString,
        seg_b: usize,
    ) {
        let coords_a = ssa.coords();
        let coords_b = ssb.coords();
        let Some(isect) =
            SegmentIntersection::compute(coords_a[seg_a], coords_a[seg_a + 1], coords_b[seg_b], coords_b[seg_b + 1])
        else {
            return;
        };
        let is_proper = isect.is_proper();
        for &pt in isect.points() {
            // a vertex intersection is reported by one segment of each chain only
            if is_proper || (ssa.is_containing_segment(seg_a, pt) && ssb.is_containing_segment(seg_b, pt)) {
                let nsa = ssa.create_node_section(seg_a, pt);
                let nsb = ssb.create_node_section(seg_b, pt);
                self.topology.add_intersection(nsa, nsb);
            }
        }
    }
}

impl SegmentIntersector<RelateSegmentString> for EdgeSegmentIntersector<'_, '_> {
    fn process_intersections(
        &mut self,
        a: ChainSegment<'_, RelateSegmentString>,
        b: ChainSegment<'_, RelateSegmentString>,
    ) {
        if std::ptr::eq(a.chain, b.chain) && a.index == b.index {
            return;
        }
        // keep A sections first so self-noding and A/B pairs are handled alike
        if b.chain.is_a() && !a.chain.is_a() {
            self.add_intersections(b.chain, b.index, a.chain, a.index);
        } else {
            self.add_intersections(a.chain, a.index, b.chain, b.index);
        }
    }

    fn is_done(&self) -> bool {
        self.topology.is_result_known()
    }
}

/// Intersects the edges of both geometries, including the edges of each
/// geometry with themselves, using one monotone chain index over all of
/// them.
pub struct EdgeSetIntersector {
    edges: Vec<RelateSegmentString>,
    index: MonotoneChainIndex,
}

impl EdgeSetIntersector {
    pub fn new(
        edges_a: Vec<RelateSegmentString>,
        edges_b: Vec<RelateSegmentString>,
        envelope: Option<&Rect<f64>>,
    ) -> Self {
        let mut edges = edges_a;
        edges.extend(edges_b);
        let index = MonotoneChainIndex::build_filtered(&edges, envelope, 0.0);
        Self { edges, index }
    }

    pub fn process(&self, intersector: &mut EdgeSegmentIntersector<'_, '_>) {
        for (mc_a, mc_b) in self.index.overlapping_pairs() {
            if !process_chain_overlaps(
                mc_a,
                &self.edges,
                mc_b,
                &self.edges,
                self.index.tolerance(),
                self.index.leaf_size(),
                intersector,
            ) {
                return;
            }
        }
    }
}
