use geo_types::Coord;

use crate::noding::SegmentChain;
use crate::relate::matrix::Dimension;
use crate::relate::node_section::NodeSection;

/// A line or ring of one input geometry, prepared for edge intersection.
///
/// Repeated points are removed. Rings are oriented with the polygon
/// interior on the right.
#[derive(Clone, Debug)]
pub struct RelateSegmentString {
    coords: Vec<Coord<f64>>,
    is_a: bool,
    dim: Dimension,
    id: usize,
    ring_id: usize,
    polygonal: Option<usize>,
}

impl RelateSegmentString {
    pub fn line(coords: Vec<Coord<f64>>, is_a: bool, id: usize) -> Self {
        Self::create(coords, is_a, Dimension::Line, id, 0, None)
    }

    pub fn ring(coords: Vec<Coord<f64>>, is_a: bool, id: usize, ring_id: usize, polygonal: usize) -> Self {
        Self::create(coords, is_a, Dimension::Area, id, ring_id, Some(polygonal))
    }

    fn create(
        mut coords: Vec<Coord<f64>>,
        is_a: bool,
        dim: Dimension,
        id: usize,
        ring_id: usize,
        polygonal: Option<usize>,
    ) -> Self {
        coords.dedup();
        Self {
            coords,
            is_a,
            dim,
            id,
            ring_id,
            polygonal,
        }
    }

    pub fn is_a(&self) -> bool {
        self.is_a
    }

    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Tests whether an intersection at `pt` should be handled for the
    /// segment starting at `seg_index`.
    ///
    /// A vertex is owned by the segment it starts, except the final vertex
    /// of an open chain which is owned by the last segment. This reports
    /// each vertex intersection exactly once.
    pub fn is_containing_segment(&self, seg_index: usize, pt: Coord<f64>) -> bool {
        if pt == self.coords[seg_index] {
            return true;
        }
        if pt == self.coords[seg_index + 1] {
            let is_final_segment = seg_index + 2 == self.coords.len();
            return !self.is_closed() && is_final_segment;
        }
        true
    }

    pub fn create_node_section(&self, seg_index: usize, pt: Coord<f64>) -> NodeSection {
        let is_node_at_vertex = pt == self.coords[seg_index] || pt == self.coords[seg_index + 1];
        NodeSection::new(
            self.is_a,
            self.dim,
            self.id,
            self.ring_id,
            self.polygonal,
            is_node_at_vertex,
            self.prev_vertex(seg_index, pt),
            pt,
            self.next_vertex(seg_index, pt),
        )
    }

    fn prev_vertex(&self, seg_index: usize, pt: Coord<f64>) -> Option<Coord<f64>> {
        let seg_start = self.coords[seg_index];
        if seg_start != pt {
            return Some(seg_start);
        }
        if seg_index > 0 {
            return Some(self.coords[seg_index - 1]);
        }
        if self.is_closed() {
            return Some(self.coords[self.coords.len() - 2]);
        }
        None
    }

    fn next_vertex(&self, seg_index: usize, pt: Coord<f64>) -> Option<Coord<f64>> {
        let seg_end = self.coords[seg_index + 1];
        if seg_end != pt {
            return Some(seg_end);
        }
        if seg_index + 2 < self.coords.len() {
            return Some(self.coords[seg_index + 2]);
        }
        if self.is_closed() {
            return Some(self.coords[1]);
        }
        None
    }
}

impl SegmentChain for RelateSegmentString {
    fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }
}
