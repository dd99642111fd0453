use std::collections::BTreeMap;

use geo_types::Coord;

use crate::algorithm::is_crossing;
use crate::relate::geometry::RelateGeometry;
use crate::relate::matrix::{Dimension, Location};
use crate::relate::node::{Position, RelateNode};
use crate::relate::node_section::{NodeSection, NodeSections};
use crate::relate::predicate::TopologyPredicate;
use crate::utils::CoordKey;

/// Accumulates topological evidence about two geometries into a predicate.
///
/// Every update only raises matrix entries, so the predicate may become
/// known at any point and further work can be skipped.
pub struct TopologyComputer<'a> {
    predicate: &'a mut dyn TopologyPredicate,
    geom_a: &'a RelateGeometry,
    geom_b: &'a RelateGeometry,
    node_map: BTreeMap<CoordKey, NodeSections>,
}

impl<'a> TopologyComputer<'a> {
    pub fn new(
        predicate: &'a mut dyn TopologyPredicate,
        geom_a: &'a RelateGeometry,
        geom_b: &'a RelateGeometry,
    ) -> Self {
        let mut computer = Self {
            predicate,
            geom_a,
            geom_b,
            node_map: BTreeMap::new(),
        };
        computer.init_exterior_dims();
        computer
    }

    /// Entries implied by the dimensions alone, before any point is examined.
    fn init_exterior_dims(&mut self) {
        use Dimension::*;
        use Location::*;
        let dim_a = self.geom_a.dimension_real();
        let dim_b = self.geom_b.dimension_real();
        match (dim_a, dim_b) {
            // the exterior of a point meets the interior of a line
            (Point, Line) => self.update_dim(Exterior, Interior, Line),
            (Line, Point) => self.update_dim(Interior, Exterior, Line),
            // the interior and boundary of an area meet the exterior of a point
            (Point, Area) => {
                self.update_dim(Exterior, Interior, Area);
                self.update_dim(Exterior, Boundary, Line);
            }
            (Area, Point) => {
                self.update_dim(Interior, Exterior, Area);
                self.update_dim(Boundary, Exterior, Line);
            }
            (Line, Area) => self.update_dim(Exterior, Interior, Area),
            (Area, Line) => self.update_dim(Interior, Exterior, Area),
            (Empty, Empty) => {}
            (_, Empty) => self.init_exterior_empty(true),
            (Empty, _) => self.init_exterior_empty(false),
            _ => {}
        }
    }

    fn init_exterior_empty(&mut self, non_empty_is_a: bool) {
        use Location::*;
        match self.dimension(non_empty_is_a) {
            Dimension::Point => self.update_dim_ab(non_empty_is_a, Interior, Exterior, Dimension::Point),
            Dimension::Line => {
                if self.geometry(non_empty_is_a).has_boundary() {
                    self.update_dim_ab(non_empty_is_a, Boundary, Exterior, Dimension::Point);
                }
                self.update_dim_ab(non_empty_is_a, Interior, Exterior, Dimension::Line);
            }
            Dimension::Area => {
                self.update_dim_ab(non_empty_is_a, Boundary, Exterior, Dimension::Line);
                self.update_dim_ab(non_empty_is_a, Interior, Exterior, Dimension::Area);
            }
            Dimension::Empty => {}
        }
    }

    fn geometry(&self, is_a: bool) -> &'a RelateGeometry {
        if is_a {
            self.geom_a
        } else {
            self.geom_b
        }
    }

    pub fn dimension(&self, is_a: bool) -> Dimension {
        self.geometry(is_a).dimension()
    }

    pub fn is_area_area(&self) -> bool {
        self.dimension(true) == Dimension::Area && self.dimension(false) == Dimension::Area
    }

    pub fn is_self_noding_required(&self) -> bool {
        self.predicate.require_self_noding()
            && (self.geom_a.is_self_noding_required() || self.geom_b.is_self_noding_required())
    }

    pub fn is_exterior_check_required(&self, is_a: bool) -> bool {
        self.predicate.require_exterior_check(is_a)
    }

    pub fn is_result_known(&self) -> bool {
        self.predicate.is_known()
    }

    pub fn result(&self) -> bool {
        self.predicate.value()
    }

    pub fn finish(&mut self) {
        self.predicate.finish();
    }

    fn update_dim(&mut self, loc_a: Location, loc_b: Location, dim: Dimension) {
        self.predicate.update_dimension(loc_a, loc_b, dim);
    }

    /// Updates an entry given as (source, target) locations, where the
    /// source is A if `is_ab` and B otherwise.
    fn update_dim_ab(&mut self, is_ab: bool, loc_source: Location, loc_target: Location, dim: Dimension) {
        if is_ab {
            self.update_dim(loc_source, loc_target, dim);
        } else {
            self.update_dim(loc_target, loc_source, dim);
        }
    }

    /// Records an intersection of an A section with a B section, or of two
    /// sections of the same geometry found during self-noding.
    pub fn add_intersection(&mut self, a: NodeSection, b: NodeSection) {
        if !a.is_same_geometry(&b) {
            self.update_intersection_ab(&a, &b);
        }
        let sections = self
            .node_map
            .entry(CoordKey::from(a.node_pt()))
            .or_insert_with(|| NodeSections::new(a.node_pt()));
        sections.add(a);
        sections.add(b);
    }

    fn update_intersection_ab(&mut self, a: &NodeSection, b: &NodeSection) {
        if NodeSection::is_area_area(a, b) {
            self.update_area_area_cross(a, b);
        }
        let pt = a.node_pt();
        let loc_a = self.geom_a.locate_node(pt, a.polygonal());
        let loc_b = self.geom_b.locate_node(pt, b.polygonal());
        self.update_dim(loc_a, loc_b, Dimension::Point);
    }

    fn update_area_area_cross(&mut self, a: &NodeSection, b: &NodeSection) {
        let crossing = match (a.vertex(0), a.vertex(1), b.vertex(0), b.vertex(1)) {
            (Some(a0), Some(a1), Some(b0), Some(b1)) => is_crossing(a.node_pt(), a0, a1, b0, b1),
            _ => false,
        };
        if NodeSection::is_proper(a, b) || crossing {
            self.update_dim(Location::Interior, Location::Interior, Dimension::Area);
        }
    }

    pub fn add_point_on_point_interior(&mut self) {
        self.update_dim(Location::Interior, Location::Interior, Dimension::Point);
    }

    pub fn add_point_on_point_exterior(&mut self, is_a: bool) {
        self.update_dim_ab(is_a, Location::Interior, Location::Exterior, Dimension::Point);
    }

    pub fn add_point_on_geometry(&mut self, is_a: bool, loc_target: Location, dim_target: Dimension) {
        self.update_dim_ab(is_a, Location::Interior, loc_target, Dimension::Point);
        if self.geometry(!is_a).is_empty() {
            return;
        }
        // a point meeting an area means the area extends past the point
        if dim_target == Dimension::Area {
            self.update_dim_ab(is_a, Location::Exterior, Location::Interior, Dimension::Area);
            self.update_dim_ab(is_a, Location::Exterior, Location::Boundary, Dimension::Line);
        }
    }

    pub fn add_line_end_on_geometry(
        &mut self,
        is_line_a: bool,
        loc_line_end: Location,
        loc_target: Location,
        dim_target: Dimension,
    ) {
        self.update_dim_ab(is_line_a, loc_line_end, loc_target, Dimension::Point);
        if self.geometry(!is_line_a).is_empty() {
            return;
        }
        match dim_target {
            // some of the line interior near the end lies outside the target line
            Dimension::Line if loc_target == Location::Exterior => {
                self.update_dim_ab(is_line_a, Location::Interior, Location::Exterior, Dimension::Line);
            }
            Dimension::Area if loc_target != Location::Boundary => {
                self.update_dim_ab(is_line_a, Location::Interior, loc_target, Dimension::Line);
                self.update_dim_ab(is_line_a, Location::Exterior, loc_target, Dimension::Area);
            }
            _ => {}
        }
    }

    pub fn add_area_vertex(&mut self, is_area_a: bool, loc_area: Location, loc_target: Location, dim_target: Dimension) {
        use Location::*;
        if loc_target == Exterior {
            self.update_dim_ab(is_area_a, Interior, Exterior, Dimension::Area);
            // a vertex on the boundary sees the area exterior nearby
            if loc_area == Boundary {
                self.update_dim_ab(is_area_a, Boundary, Exterior, Dimension::Line);
                self.update_dim_ab(is_area_a, Exterior, Exterior, Dimension::Area);
            }
            return;
        }
        match dim_target {
            Dimension::Point => self.add_area_vertex_on_point(is_area_a, loc_area),
            Dimension::Line => self.add_area_vertex_on_line(is_area_a, loc_area, loc_target),
            Dimension::Area => self.add_area_vertex_on_area(is_area_a, loc_area, loc_target),
            Dimension::Empty => {}
        }
    }

    fn add_area_vertex_on_point(&mut self, is_area_a: bool, loc_area: Location) {
        use Location::*;
        self.update_dim_ab(is_area_a, loc_area, Interior, Dimension::Point);
        self.update_dim_ab(is_area_a, Interior, Exterior, Dimension::Area);
        if loc_area == Boundary {
            self.update_dim_ab(is_area_a, Boundary, Exterior, Dimension::Line);
            self.update_dim_ab(is_area_a, Exterior, Exterior, Dimension::Area);
        }
    }

    /// Only the intersection at the vertex is known; whether the line runs
    /// along the boundary or through the interior is settled by node
    /// evaluation.
    fn add_area_vertex_on_line(&mut self, is_area_a: bool, loc_area: Location, loc_target: Location) {
        self.update_dim_ab(is_area_a, loc_area, loc_target, Dimension::Point);
        if loc_area == Location::Interior {
            self.update_dim_ab(is_area_a, Location::Interior, Location::Exterior, Dimension::Area);
        }
    }

    fn add_area_vertex_on_area(&mut self, is_area_a: bool, loc_area: Location, loc_target: Location) {
        use Location::*;
        if loc_target == Boundary {
            if loc_area == Boundary {
                self.update_dim_ab(is_area_a, Boundary, Boundary, Dimension::Point);
            } else {
                self.update_dim_ab(is_area_a, Interior, Interior, Dimension::Area);
                self.update_dim_ab(is_area_a, Interior, Boundary, Dimension::Line);
                self.update_dim_ab(is_area_a, Interior, Exterior, Dimension::Area);
            }
            return;
        }
        self.update_dim_ab(is_area_a, Interior, loc_target, Dimension::Area);
        if loc_area == Boundary {
            self.update_dim_ab(is_area_a, Boundary, loc_target, Dimension::Line);
            self.update_dim_ab(is_area_a, Exterior, loc_target, Dimension::Area);
        }
    }

    /// Evaluates the topology at every node where both geometries meet.
    pub fn evaluate_nodes(&mut self) {
        let node_map = std::mem::take(&mut self.node_map);
        for (_, mut sections) in node_map {
            if !sections.has_interaction_ab() {
                continue;
            }
            self.evaluate_node(&mut sections);
            if self.is_result_known() {
                log::trace!("result known at node {:?}", sections.coordinate());
                return;
            }
        }
    }

    fn evaluate_node(&mut self, sections: &mut NodeSections) {
        let p: Coord<f64> = sections.coordinate();
        let mut node = sections.create_node();
        let is_area_interior_a = self.geom_a.is_node_in_area(p, sections.polygonal(true));
        let is_area_interior_b = self.geom_b.is_node_in_area(p, sections.polygonal(false));
        node.finish(is_area_interior_a, is_area_interior_b);
        self.evaluate_node_edges(&node);
    }

    fn evaluate_node_edges(&mut self, node: &RelateNode) {
        let is_area_area = self.is_area_area();
        for e in node.edges() {
            if is_area_area {
                for pos in [Position::Left, Position::Right] {
                    if let (Some(loc_a), Some(loc_b)) = (e.location(true, pos), e.location(false, pos)) {
                        self.update_dim(loc_a, loc_b, Dimension::Area);
                    }
                }
            }
            if let (Some(loc_a), Some(loc_b)) = (e.location(true, Position::On), e.location(false, Position::On)) {
                self.update_dim(loc_a, loc_b, Dimension::Line);
            }
        }
    }
}
