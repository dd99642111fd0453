use std::cmp::Ordering;
use std::collections::BTreeSet;

use geo_types::Coord;

use crate::algorithm::octant::octant_of;

/// An intersection point on a chain, owned by the segment it lies on.
#[derive(Clone, Copy, Debug)]
pub struct SegmentNode {
    pub coord: Coord<f64>,
    pub segment_index: usize,
    segment_octant: u8,
    is_interior: bool,
}

impl SegmentNode {
    pub fn new(coord: Coord<f64>, segment_index: usize, segment_octant: u8, is_interior: bool) -> Self {
        Self {
            coord,
            segment_index,
            segment_octant,
            is_interior,
        }
    }

    /// True if the node lies strictly inside its segment rather than on its start vertex.
    pub fn is_interior(&self) -> bool {
        self.is_interior
    }
}

impl Ord for SegmentNode {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.segment_index.cmp(&other.segment_index) {
            Ordering::Equal => {}
            ord => return ord,
        }
        if self.coord == other.coord {
            return Ordering::Equal;
        }
        // a non-interior node is the segment start, which comes first even
        // when roundoff puts an interior node behind it
        if !self.is_interior {
            return Ordering::Less;
        }
        if !other.is_interior {
            return Ordering::Greater;
        }
        compare_along_segment(self.segment_octant, self.coord, other.coord)
    }
}

impl PartialOrd for SegmentNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SegmentNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SegmentNode {}

fn relative_sign(x0: f64, x1: f64) -> i8 {
    if x0 < x1 {
        -1
    } else if x0 > x1 {
        1
    } else {
        0
    }
}

fn compare_value(c0: i8, c1: i8) -> Ordering {
    if c0 != 0 {
        return c0.cmp(&0);
    }
    c1.cmp(&0)
}

/// Orders two points lying on a segment of the given octant in the
/// segment's direction of travel. Only the relative sign of the ordinates
/// is used, so the result is stable under intersection roundoff.
pub fn compare_along_segment(octant: u8, p0: Coord<f64>, p1: Coord<f64>) -> Ordering {
    if p0 == p1 {
        return Ordering::Equal;
    }
    let x = relative_sign(p0.x, p1.x);
    let y = relative_sign(p0.y, p1.y);
    match octant {
        0 => compare_value(x, y),
        1 => compare_value(y, x),
        2 => compare_value(y, -x),
        3 => compare_value(-x, y),
        4 => compare_value(-x, -y),
        5 => compare_value(-y, -x),
        6 => compare_value(-y, x),
        _ => compare_value(x, -y),
    }
}

pub(crate) fn segment_octant(coords: &[Coord<f64>], index: usize) -> u8 {
    if index + 1 >= coords.len() {
        return 0;
    }
    octant_of(coords[index], coords[index + 1]).unwrap_or(0)
}

/// The ordered set of nodes on one chain.
///
/// Duplicate insertions (same segment, same coordinate) collapse to the
/// first node inserted.
#[derive(Clone, Debug, Default)]
pub struct NodeList {
    nodes: BTreeSet<SegmentNode>,
}

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, coord: Coord<f64>, segment_index: usize, segment_octant: u8, is_interior: bool) {
        self.nodes
            .insert(SegmentNode::new(coord, segment_index, segment_octant, is_interior));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentNode> {
        self.nodes.iter()
    }

    fn add_vertex_node(&mut self, coords: &[Coord<f64>], index: usize) {
        let octant = segment_octant(coords, index);
        self.add(coords[index], index, octant, false);
    }

    fn add_endpoints(&mut self, coords: &[Coord<f64>]) {
        let max_segment_index = coords.len() - 1;
        self.add_vertex_node(coords, 0);
        self.add_vertex_node(coords, max_segment_index);
    }

    /// Vertices sandwiched between two equal inserted nodes (a-b-a via nodes).
    fn collapses_from_inserted_nodes(&self) -> Vec<usize> {
        let mut collapsed = Vec::new();
        let mut iter = self.nodes.iter();
        let Some(mut prev) = iter.next() else {
            return collapsed;
        };
        for node in iter {
            if let Some(index) = find_collapse_index(prev, node) {
                collapsed.push(index);
            }
            prev = node;
        }
        collapsed
    }

    fn add_collapsed_nodes(&mut self, coords: &[Coord<f64>]) {
        let mut collapsed = self.collapses_from_inserted_nodes();
        collapsed.extend(collapses_from_existing_vertices(coords));
        for index in collapsed {
            self.add_vertex_node(coords, index);
        }
    }

    /// Consumes the list and emits one coordinate run per consecutive node pair.
    ///
    /// The chain's first and last vertices are always nodes, and collapse
    /// patterns are forced to be nodes so no output run doubles back on itself.
    pub fn into_split_edges(mut self, coords: &[Coord<f64>]) -> Vec<Vec<Coord<f64>>> {
        if coords.len() < 2 {
            return Vec::new();
        }
        self.add_endpoints(coords);
        self.add_collapsed_nodes(coords);

        let mut edges = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut iter = self.nodes.iter();
        let Some(mut prev) = iter.next() else {
            return edges;
        };
        for node in iter {
            edges.push(split_edge_points(coords, prev, node));
            prev = node;
        }
        edges
    }
}

fn collapses_from_existing_vertices(coords: &[Coord<f64>]) -> Vec<usize> {
    if coords.len() < 3 {
        return Vec::new();
    }
    (0..coords.len() - 2)
        .filter(|&i| coords[i] == coords[i + 2])
        .map(|i| i + 1)
        .collect()
}

fn find_collapse_index(n0: &SegmentNode, n1: &SegmentNode) -> Option<usize> {
    if n0.coord != n1.coord {
        return None;
    }
    let mut vertices_between = n1.segment_index as isize - n0.segment_index as isize;
    if !n1.is_interior() {
        vertices_between -= 1;
    }
    if vertices_between == 1 {
        return Some(n0.segment_index + 1);
    }
    None
}

fn split_edge_points(coords: &[Coord<f64>], n0: &SegmentNode, n1: &SegmentNode) -> Vec<Coord<f64>> {
    if n0.segment_index == n1.segment_index {
        return vec![n0.coord, n1.coord];
    }
    let last_seg_start = coords[n1.segment_index];
    // the final vertex is the node itself unless it coincides with the segment start
    let use_node_pt = n1.is_interior() || n1.coord != last_seg_start;

    let mut pts = Vec::with_capacity(n1.segment_index - n0.segment_index + 2);
    pts.push(n0.coord);
    pts.extend_from_slice(&coords[n0.segment_index + 1..=n1.segment_index]);
    if use_node_pt {
        pts.push(n1.coord);
    }
    pts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_nodes_sort_along_segment() {
        let coords = vec![c(10.0, 10.0), c(0.0, 0.0)];
        let mut list = NodeList::new();
        let oct = segment_octant(&coords, 0);
        list.add(c(2.0, 2.0), 0, oct, true);
        list.add(c(7.0, 7.0), 0, oct, true);
        list.add(c(5.0, 5.0), 0, oct, true);
        list.add(c(5.0, 5.0), 0, oct, true);

        let order: Vec<_> = list.iter().map(|n| n.coord).collect();
        assert_eq!(order, vec![c(7.0, 7.0), c(5.0, 5.0), c(2.0, 2.0)]);
    }

    #[test]
    fn test_segment_start_sorts_before_interior_node() {
        let coords = vec![c(0.0, 0.0), c(10.0, 0.0)];
        let mut list = NodeList::new();
        // an intersection computed just behind the start vertex
        list.add(c(-1e-9, 0.0), 0, segment_octant(&coords, 0), true);
        let edges = list.into_split_edges(&coords);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0], vec![c(0.0, 0.0), c(-1e-9, 0.0)]);
        assert_eq!(edges[1], vec![c(-1e-9, 0.0), c(10.0, 0.0)]);
    }

    #[test]
    fn test_split_edges_without_nodes() {
        let coords = vec![c(0.0, 0.0), c(5.0, 0.0), c(10.0, 0.0)];
        let edges = NodeList::new().into_split_edges(&coords);
        assert_eq!(edges, vec![coords.clone()]);
    }

    #[test]
    fn test_split_edges_at_interior_node() {
        let coords = vec![c(0.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)];
        let mut list = NodeList::new();
        list.add(c(4.0, 0.0), 0, segment_octant(&coords, 0), true);
        let edges = list.into_split_edges(&coords);
        assert_eq!(
            edges,
            vec![vec![c(0.0, 0.0), c(4.0, 0.0)], vec![c(4.0, 0.0), c(10.0, 0.0), c(10.0, 10.0)]]
        );
    }

    #[test]
    fn test_existing_vertex_collapse_is_split() {
        // a-b-a: (5,5) -> (10,0) -> (5,5)
        let coords = vec![c(0.0, 0.0), c(5.0, 5.0), c(10.0, 0.0), c(5.0, 5.0), c(0.0, 0.0)];
        let edges = NodeList::new().into_split_edges(&coords);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0], vec![c(0.0, 0.0), c(5.0, 5.0), c(10.0, 0.0)]);
        assert_eq!(edges[1], vec![c(10.0, 0.0), c(5.0, 5.0), c(0.0, 0.0)]);
    }

    #[test]
    fn test_inserted_node_collapse_is_split() {
        // node at (5,0) on segment 0 and again on segment 1 sandwiches vertex 1
        let coords = vec![c(0.0, 0.0), c(10.0, 0.0), c(0.0, 0.0)];
        let mut list = NodeList::new();
        list.add(c(5.0, 0.0), 0, segment_octant(&coords, 0), true);
        list.add(c(5.0, 0.0), 1, segment_octant(&coords, 1), true);
        let edges = list.into_split_edges(&coords);
        assert!(edges.iter().all(|e| e.len() == 2));
        assert!(edges.iter().any(|e| *e == vec![c(5.0, 0.0), c(10.0, 0.0)]));
        assert!(edges.iter().any(|e| *e == vec![c(10.0, 0.0), c(5.0, 0.0)]));
    }
}
