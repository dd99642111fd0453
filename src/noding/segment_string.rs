use geo_types::{Coord, LineString};

use crate::algorithm::SegmentIntersection;
use crate::noding::node_list::{segment_octant, NodeList};
use crate::noding::SegmentChain;

/// An ordered sequence of coordinates with an opaque caller-defined context tag.
///
/// The context is carried unchanged onto every substring a noder produces,
/// so callers can map output chains back to their source (e.g. an index
/// into their own arena).
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentString {
    pub coords: Vec<Coord<f64>>,
    pub context: usize,
}

impl SegmentString {
    pub fn new(coords: Vec<Coord<f64>>, context: usize) -> Self {
        Self { coords, context }
    }

    pub fn to_line_string(&self) -> LineString<f64> {
        LineString::new(self.coords.clone())
    }
}

impl From<LineString<f64>> for SegmentString {
    fn from(ls: LineString<f64>) -> Self {
        Self::new(ls.0, 0)
    }
}

impl SegmentChain for SegmentString {
    fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }
}

/// A segment string which accumulates the nodes discovered on it during noding.
#[derive(Clone, Debug)]
pub struct NodedSegmentString {
    coords: Vec<Coord<f64>>,
    context: usize,
    nodes: NodeList,
}

impl NodedSegmentString {
    pub fn new(coords: Vec<Coord<f64>>, context: usize) -> Self {
        Self {
            coords,
            context,
            nodes: NodeList::new(),
        }
    }

    pub fn context(&self) -> usize {
        self.context
    }

    pub fn node_list(&self) -> &NodeList {
        &self.nodes
    }

    /// Adds every intersection point of `li` as a node on segment `segment_index`.
    pub fn add_intersections(&mut self, li: &SegmentIntersection, segment_index: usize) {
        for pt in li.points() {
            self.add_intersection(*pt, segment_index);
        }
    }

    /// Adds a node for `pt` on segment `segment_index`.
    ///
    /// A point equal to the start vertex of the next segment is recorded
    /// against that segment instead, so each vertex has a single owner.
    pub fn add_intersection(&mut self, pt: Coord<f64>, segment_index: usize) {
        let mut normalized = segment_index;
        let next = segment_index + 1;
        if next < self.coords.len() && pt == self.coords[next] {
            normalized = next;
        }
        let octant = segment_octant(&self.coords, normalized);
        let is_interior = pt != self.coords[normalized];
        self.nodes.add(pt, normalized, octant, is_interior);
    }

    /// Consumes the node list, returning the split substrings in order.
    pub fn into_split_edges(self) -> Vec<SegmentString> {
        let context = self.context;
        self.nodes
            .into_split_edges(&self.coords)
            .into_iter()
            .map(|pts| SegmentString::new(pts, context))
            .collect()
    }
}

impl From<SegmentString> for NodedSegmentString {
    fn from(ss: SegmentString) -> Self {
        Self::new(ss.coords, ss.context)
    }
}

impl SegmentChain for NodedSegmentString {
    fn coords(&self) -> &[Coord<f64>] {
        &self.coords
    }
}

/// Splits every noded chain at its nodes.
pub fn noded_substrings(chains: Vec<NodedSegmentString>) -> Vec<SegmentString> {
    let mut out = Vec::with_capacity(chains.len());
    for chain in chains {
        out.extend(chain.into_split_edges());
    }
    out
}
