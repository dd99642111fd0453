//! Topology of the edges incident on a single node.

use std::cmp::Ordering;

use geo_types::Coord;

use crate::algorithm::compare_angle;
use crate::relate::matrix::{Dimension, Location};
use crate::relate::node_section::NodeSection;

/// A side of an edge, or the edge itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    On,
    Left,
    Right,
}

/// Labels of one input geometry on an edge. `None` means not yet known.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct EdgeLabel {
    dim: Option<Dimension>,
    left: Option<Location>,
    right: Option<Location>,
    on: Option<Location>,
}

impl EdgeLabel {
    fn area(is_forward: bool) -> Self {
        let (left, right) = side_locations(is_forward);
        Self {
            dim: Some(Dimension::Area),
            left: Some(left),
            right: Some(right),
            on: Some(Location::Boundary),
        }
    }

    fn line() -> Self {
        Self {
            dim: Some(Dimension::Line),
            left: Some(Location::Exterior),
            right: Some(Location::Exterior),
            on: Some(Location::Interior),
        }
    }

    fn get(&self, pos: Position) -> Option<Location> {
        match pos {
            Position::On => self.on,
            Position::Left => self.left,
            Position::Right => self.right,
        }
    }

    fn slot(&mut self, pos: Position) -> &mut Option<Location> {
        match pos {
            Position::On => &mut self.on,
            Position::Left => &mut self.left,
            Position::Right => &mut self.right,
        }
    }
}

/// Left/right locations of an area edge. Rings keep the interior on the
/// right when traversed forward.
fn side_locations(is_forward: bool) -> (Location, Location) {
    if is_forward {
        (Location::Exterior, Location::Interior)
    } else {
        (Location::Interior, Location::Exterior)
    }
}

/// A ray leaving a node towards `dir_pt`, labelled for both inputs.
#[derive(Clone, Debug)]
pub struct RelateEdge {
    node_pt: Coord<f64>,
    dir_pt: Coord<f64>,
    a: EdgeLabel,
    b: EdgeLabel,
}

impl RelateEdge {
    fn new(node_pt: Coord<f64>, dir_pt: Coord<f64>, is_a: bool, dim: Dimension, is_forward: bool) -> Self {
        let label = if dim == Dimension::Area {
            EdgeLabel::area(is_forward)
        } else {
            EdgeLabel::line()
        };
        let mut edge = Self {
            node_pt,
            dir_pt,
            a: EdgeLabel::default(),
            b: EdgeLabel::default(),
        };
        *edge.label_mut(is_a) = label;
        edge
    }

    pub fn dir_pt(&self) -> Coord<f64> {
        self.dir_pt
    }

    fn label(&self, is_a: bool) -> &EdgeLabel {
        if is_a {
            &self.a
        } else {
            &self.b
        }
    }

    fn label_mut(&mut self, is_a: bool) -> &mut EdgeLabel {
        if is_a {
            &mut self.a
        } else {
            &mut self.b
        }
    }

    pub fn compare_to_edge(&self, dir_pt: Coord<f64>) -> Ordering {
        compare_angle(self.node_pt, self.dir_pt, dir_pt)
    }

    pub fn dimension(&self, is_a: bool) -> Option<Dimension> {
        self.label(is_a).dim
    }

    pub fn location(&self, is_a: bool, pos: Position) -> Option<Location> {
        self.label(is_a).get(pos)
    }

    pub fn is_interior(&self, is_a: bool, pos: Position) -> bool {
        self.location(is_a, pos) == Some(Location::Interior)
    }

    pub fn is_known(&self, is_a: bool) -> bool {
        self.label(is_a).dim.is_some()
    }

    /// Folds in another element running along this edge.
    ///
    /// An area boundary upgrades a line, and an interior side is never
    /// overwritten.
    fn merge(&mut self, is_a: bool, dim: Dimension, is_forward: bool) {
        let (loc_edge, loc_left, loc_right) = if dim == Dimension::Area {
            let (left, right) = side_locations(is_forward);
            (Location::Boundary, left, right)
        } else {
            (Location::Interior, Location::Exterior, Location::Exterior)
        };
        let label = self.label_mut(is_a);
        if label.dim.is_none() {
            *label = EdgeLabel {
                dim: Some(dim),
                left: Some(loc_left),
                right: Some(loc_right),
                on: Some(loc_edge),
            };
            return;
        }
        if loc_edge == Location::Boundary && label.dim == Some(Dimension::Line) {
            label.dim = Some(Dimension::Area);
            label.on = Some(Location::Boundary);
        }
        for (pos, loc) in [(Position::Left, loc_left), (Position::Right, loc_right)] {
            let slot = label.slot(pos);
            if *slot != Some(Location::Interior) {
                *slot = Some(loc);
            }
        }
    }

    pub fn set_area_interior(&mut self, is_a: bool) {
        let label = self.label_mut(is_a);
        label.left = Some(Location::Interior);
        label.right = Some(Location::Interior);
        label.on = Some(Location::Interior);
    }

    pub fn set_unknown_locations(&mut self, is_a: bool, loc: Option<Location>) {
        let label = self.label_mut(is_a);
        for pos in [Position::Left, Position::Right, Position::On] {
            let slot = label.slot(pos);
            if slot.is_none() {
                *slot = loc;
            }
        }
    }
}

/// The edges around a node, kept in CCW order of their direction.
#[derive(Clone, Debug)]
pub struct RelateNode {
    node_pt: Coord<f64>,
    edges: Vec<RelateEdge>,
}

impl RelateNode {
    pub fn new(node_pt: Coord<f64>) -> Self {
        Self {
            node_pt,
            edges: Vec::new(),
        }
    }

    pub fn coordinate(&self) -> Coord<f64> {
        self.node_pt
    }

    pub fn edges(&self) -> &[RelateEdge] {
        &self.edges
    }

    pub fn add_edges(&mut self, ns: &NodeSection) {
        match ns.dimension() {
            Dimension::Line => {
                self.add_edge(ns.is_a(), ns.vertex(0), Dimension::Line, false);
                self.add_edge(ns.is_a(), ns.vertex(1), Dimension::Line, false);
            }
            Dimension::Area => {
                // entering edge has the interior on its left, exiting edge on its right
                self.add_edge(ns.is_a(), ns.vertex(0), Dimension::Area, false);
                self.add_edge(ns.is_a(), ns.vertex(1), Dimension::Area, true);
                let (Some(index0), Some(index1)) = (self.index_of(ns.vertex(0)), self.index_of(ns.vertex(1))) else {
                    return;
                };
                self.update_edges_in_area(ns.is_a(), index0, index1);
                self.update_if_area_prev(ns.is_a(), index0);
                self.update_if_area_next(ns.is_a(), index1);
            }
            _ => {}
        }
    }

    fn index_of(&self, dir_pt: Option<Coord<f64>>) -> Option<usize> {
        let dir_pt = dir_pt.filter(|p| *p != self.node_pt)?;
        self.edges
            .iter()
            .position(|e| e.compare_to_edge(dir_pt) == Ordering::Equal)
    }

    fn update_edges_in_area(&mut self, is_a: bool, index_from: usize, index_to: usize) {
        let mut index = self.next_index(index_from);
        while index != index_to {
            self.edges[index].set_area_interior(is_a);
            index = self.next_index(index);
        }
    }

    fn update_if_area_prev(&mut self, is_a: bool, index: usize) {
        let prev = self.prev_index(index);
        if self.edges[prev].is_interior(is_a, Position::Left) {
            self.edges[index].set_area_interior(is_a);
        }
    }

    fn update_if_area_next(&mut self, is_a: bool, index: usize) {
        let next = self.next_index(index);
        if self.edges[next].is_interior(is_a, Position::Right) {
            self.edges[index].set_area_interior(is_a);
        }
    }

    fn add_edge(&mut self, is_a: bool, dir_pt: Option<Coord<f64>>, dim: Dimension, is_forward: bool) {
        let Some(dir_pt) = dir_pt else {
            return;
        };
        if dir_pt == self.node_pt {
            return;
        }
        let mut insert_index = self.edges.len();
        for (i, e) in self.edges.iter_mut().enumerate() {
            match e.compare_to_edge(dir_pt) {
                Ordering::Equal => {
                    e.merge(is_a, dim, is_forward);
                    return;
                }
                Ordering::Greater => {
                    insert_index = i;
                    break;
                }
                Ordering::Less => {}
            }
        }
        self.edges
            .insert(insert_index, RelateEdge::new(self.node_pt, dir_pt, is_a, dim, is_forward));
    }

    /// Labels every edge for both inputs. A geometry whose area covers the
    /// node without an edge through it marks all sides interior; otherwise
    /// side locations propagate CCW from the first labelled edge.
    pub fn finish(&mut self, is_area_interior_a: bool, is_area_interior_b: bool) {
        self.finish_node(true, is_area_interior_a);
        self.finish_node(false, is_area_interior_b);
    }

    fn finish_node(&mut self, is_a: bool, is_area_interior: bool) {
        if is_area_interior {
            for e in &mut self.edges {
                e.set_area_interior(is_a);
            }
            return;
        }
        match self.edges.iter().position(|e| e.is_known(is_a)) {
            Some(start) => self.propagate_side_locations(is_a, start),
            None => log::trace!("node {:?} has no edges of geometry {}", self.node_pt, if is_a { 'A' } else { 'B' }),
        }
    }

    fn propagate_side_locations(&mut self, is_a: bool, start: usize) {
        let mut curr_loc = self.edges[start].location(is_a, Position::Left);
        let mut index = self.next_index(start);
        while index != start {
            let e = &mut self.edges[index];
            e.set_unknown_locations(is_a, curr_loc);
            curr_loc = e.location(is_a, Position::Left);
            index = self.next_index(index);
        }
    }

    pub fn has_exterior_edge(&self, is_a: bool) -> bool {
        self.edges.iter().any(|e| {
            e.location(is_a, Position::Left) == Some(Location::Exterior)
                || e.location(is_a, Position::Right) == Some(Location::Exterior)
        })
    }

    fn prev_index(&self, index: usize) -> usize {
        if index > 0 {
            index - 1
        } else {
            self.edges.len() - 1
        }
    }

    fn next_index(&self, index: usize) -> usize {
        if index + 1 >= self.edges.len() {
            0
        } else {
            index + 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn line(is_a: bool, v0: Option<Coord<f64>>, v1: Option<Coord<f64>>) -> NodeSection {
        NodeSection::new(is_a, Dimension::Line, 0, 0, None, true, v0, c(0.0, 0.0), v1)
    }

    fn area(is_a: bool, v0: Coord<f64>, v1: Coord<f64>) -> NodeSection {
        NodeSection::new(is_a, Dimension::Area, 0, 0, Some(0), true, Some(v0), c(0.0, 0.0), Some(v1))
    }

    #[test]
    fn test_edges_sorted_ccw() {
        let mut node = RelateNode::new(c(0.0, 0.0));
        node.add_edges(&line(true, Some(c(0.0, -1.0)), Some(c(0.0, 1.0))));
        node.add_edges(&line(false, Some(c(-1.0, 0.0)), Some(c(1.0, 0.0))));
        let dirs: Vec<_> = node.edges().iter().map(RelateEdge::dir_pt).collect();
        assert_eq!(dirs, vec![c(1.0, 0.0), c(0.0, 1.0), c(-1.0, 0.0), c(0.0, -1.0)]);
    }

    #[test]
    fn test_collinear_edges_merge() {
        let mut node = RelateNode::new(c(0.0, 0.0));
        node.add_edges(&line(true, None, Some(c(2.0, 0.0))));
        node.add_edges(&line(false, None, Some(c(5.0, 0.0))));
        assert_eq!(node.edges().len(), 1);
        let e = &node.edges()[0];
        assert_eq!(e.location(true, Position::On), Some(Location::Interior));
        assert_eq!(e.location(false, Position::On), Some(Location::Interior));
    }

    #[test]
    fn test_area_boundary_upgrades_line() {
        let mut node = RelateNode::new(c(0.0, 0.0));
        node.add_edges(&line(true, None, Some(c(1.0, 0.0))));
        node.add_edges(&area(true, c(0.0, 1.0), c(1.0, 0.0)));
        let e = node.edges().iter().find(|e| e.dir_pt() == c(1.0, 0.0)).unwrap();
        assert_eq!(e.dimension(true), Some(Dimension::Area));
        assert_eq!(e.location(true, Position::On), Some(Location::Boundary));
    }

    #[test]
    fn test_line_inside_area_corner() {
        // A: CW square corner at the origin with interior in the first quadrant.
        // B: a line leaving the node into that interior.
        let mut node = RelateNode::new(c(0.0, 0.0));
        node.add_edges(&area(true, c(1.0, 0.0), c(0.0, 1.0)));
        node.add_edges(&line(false, None, Some(c(1.0, 1.0))));
        node.finish(false, false);

        let diag = node.edges().iter().find(|e| e.dir_pt() == c(1.0, 1.0)).unwrap();
        assert_eq!(diag.location(true, Position::On), Some(Location::Interior));
        assert_eq!(diag.location(false, Position::On), Some(Location::Interior));
        let x_axis = node.edges().iter().find(|e| e.dir_pt() == c(1.0, 0.0)).unwrap();
        assert_eq!(x_axis.location(false, Position::On), Some(Location::Exterior));
        assert!(node.has_exterior_edge(true));
    }

    #[test]
    fn test_finish_inside_area() {
        let mut node = RelateNode::new(c(0.0, 0.0));
        node.add_edges(&line(false, Some(c(-1.0, 0.0)), Some(c(1.0, 0.0))));
        node.finish(true, false);
        assert!(!node.has_exterior_edge(true));
        assert!(node.has_exterior_edge(false));
    }
}
