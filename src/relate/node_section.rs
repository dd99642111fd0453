use std::cmp::Ordering;

use geo_types::Coord;
use smallvec::SmallVec;

use crate::algorithm::compare_angle;
use crate::relate::converter::PolygonNodeConverter;
use crate::relate::matrix::Dimension;
use crate::relate::node::RelateNode;

/// How one element of an input geometry passes through a node.
///
/// `v0` and `v1` are the vertices before and after the node along the
/// element. Either may be absent at the end of an open line. Area sections
/// follow rings oriented with the interior on the right (shells CW, holes
/// CCW).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeSection {
    is_a: bool,
    dim: Dimension,
    id: usize,
    ring_id: usize,
    polygonal: Option<usize>,
    is_node_at_vertex: bool,
    v0: Option<Coord<f64>>,
    node_pt: Coord<f64>,
    v1: Option<Coord<f64>>,
}

impl NodeSection {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        is_a: bool,
        dim: Dimension,
        id: usize,
        ring_id: usize,
        polygonal: Option<usize>,
        is_node_at_vertex: bool,
        v0: Option<Coord<f64>>,
        node_pt: Coord<f64>,
        v1: Option<Coord<f64>>,
    ) -> Self {
        Self {
            is_a,
            dim,
            id,
            ring_id,
            polygonal,
            is_node_at_vertex,
            v0,
            node_pt,
            v1,
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

    pub fn ring_id(&self) -> usize {
        self.ring_id
    }

    /// Index of the polygonal element the section's ring belongs to.
    pub fn polygonal(&self) -> Option<usize> {
        self.polygonal
    }

    pub fn is_node_at_vertex(&self) -> bool {
        self.is_node_at_vertex
    }

    pub fn node_pt(&self) -> Coord<f64> {
        self.node_pt
    }

    pub fn vertex(&self, i: usize) -> Option<Coord<f64>> {
        if i == 0 {
            self.v0
        } else {
            self.v1
        }
    }

    pub fn is_area(&self) -> bool {
        self.dim == Dimension::Area
    }

    pub fn is_shell(&self) -> bool {
        self.ring_id == 0
    }

    pub fn is_same_geometry(&self, other: &NodeSection) -> bool {
        self.is_a == other.is_a
    }

    pub fn is_same_polygon(&self, other: &NodeSection) -> bool {
        self.is_a == other.is_a && self.id == other.id
    }

    pub fn is_area_area(a: &NodeSection, b: &NodeSection) -> bool {
        a.is_area() && b.is_area()
    }

    /// True if the node lies in the interior of both sections' segments.
    pub fn is_proper(a: &NodeSection, b: &NodeSection) -> bool {
        !a.is_node_at_vertex && !b.is_node_at_vertex
    }

    /// Orders sections by the angle of their incoming edge around the node.
    pub fn compare_edge_angle(&self, other: &NodeSection) -> Ordering {
        match (self.v0, other.v0) {
            (Some(p), Some(q)) => compare_angle(self.node_pt, p, q),
            (p, q) => p.is_some().cmp(&q.is_some()),
        }
    }
}

fn compare_opt_coord(a: Option<Coord<f64>>, b: Option<Coord<f64>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(p), Some(q)) => p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y)),
    }
}

impl Eq for NodeSection {}

impl PartialOrd for NodeSection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A sections sort first, then by dimension, element, ring and vertices.
impl Ord for NodeSection {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .is_a
            .cmp(&self.is_a)
            .then(self.dim.cmp(&other.dim))
            .then(self.id.cmp(&other.id))
            .then(self.ring_id.cmp(&other.ring_id))
            .then_with(|| compare_opt_coord(self.v0, other.v0))
            .then_with(|| compare_opt_coord(self.v1, other.v1))
    }
}

/// All sections incident on one node.
#[derive(Clone, Debug)]
pub struct NodeSections {
    node_pt: Coord<f64>,
    sections: SmallVec<[NodeSection; 4]>,
}

impl NodeSections {
    pub fn new(node_pt: Coord<f64>) -> Self {
        Self {
            node_pt,
            sections: SmallVec::new(),
        }
    }

    pub fn coordinate(&self) -> Coord<f64> {
        self.node_pt
    }

    pub fn add(&mut self, section: NodeSection) {
        self.sections.push(section);
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// True if both input geometries have a section at the node.
    pub fn has_interaction_ab(&self) -> bool {
        let mut is_a = false;
        let mut is_b = false;
        for ns in &self.sections {
            if ns.is_a {
                is_a = true;
            } else {
                is_b = true;
            }
            if is_a && is_b {
                return true;
            }
        }
        false
    }

    /// The polygonal element of the given geometry found at the node, if any.
    pub fn polygonal(&self, is_a: bool) -> Option<usize> {
        self.sections
            .iter()
            .filter(|ns| ns.is_a == is_a)
            .find_map(|ns| ns.polygonal)
    }

    /// Builds the node topology. Sections of one polygon meeting at the node
    /// are first rewritten so that each wedge lies wholly inside the polygon.
    pub fn create_node(&mut self) -> RelateNode {
        self.sections.sort();
        let mut node = RelateNode::new(self.node_pt);
        let mut i = 0;
        while i < self.sections.len() {
            let ns = self.sections[i];
            let group = self.polygon_group_len(i);
            if ns.is_area() && group > 1 {
                let converted = PolygonNodeConverter::convert(&self.sections[i..i + group]);
                for section in &converted {
                    node.add_edges(section);
                }
                i += group;
            } else {
                node.add_edges(&ns);
                i += 1;
            }
        }
        node
    }

    fn polygon_group_len(&self, start: usize) -> usize {
        let first = &self.sections[start];
        self.sections[start..]
            .iter()
            .take_while(|ns| first.is_same_polygon(ns))
            .count()
    }
}
