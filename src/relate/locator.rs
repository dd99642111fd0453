use std::collections::HashSet;
use std::sync::OnceLock;

use geo::algorithm::coordinate_position::{CoordPos, CoordinatePosition};
use geo::{BoundingRect, Intersects};
use geo_types::{Coord, LineString, Rect};

use crate::relate::adjacent::AdjacentEdgeLocator;
use crate::relate::dimension_location::DimensionLocation;
use crate::relate::geometry::GeometryElements;
use crate::relate::linear_boundary::{BoundaryNodeRule, LinearBoundary};
use crate::relate::matrix::Location;
use crate::utils::{envelope_covers_coord, CoordKey};

/// Locates points against a geometry of any type, including collections
/// mixing dimensions.
///
/// A point on several elements takes the location on the element of
/// highest dimension. Polygons of a collection are treated as a union, so
/// a point on an edge shared by two polygons is interior.
#[derive(Debug)]
pub struct RelatePointLocator {
    elements: GeometryElements,
    is_polygonal: bool,
    points: HashSet<CoordKey>,
    line_envelopes: Vec<Option<Rect<f64>>>,
    line_boundary: LinearBoundary,
    polygon_envelopes: Vec<Option<Rect<f64>>>,
    adjacent: OnceLock<AdjacentEdgeLocator>,
}

impl RelatePointLocator {
    pub(crate) fn new(elements: GeometryElements, is_polygonal: bool, rule: BoundaryNodeRule) -> Self {
        let points = elements.points.iter().copied().map(CoordKey::from).collect();
        let line_envelopes = elements.lines.iter().map(|l| l.bounding_rect()).collect();
        let line_boundary = LinearBoundary::new(&elements.lines, rule);
        let polygon_envelopes = elements.polygons.iter().map(|p| p.bounding_rect()).collect();
        Self {
            elements,
            is_polygonal,
            points,
            line_envelopes,
            line_boundary,
            polygon_envelopes,
            adjacent: OnceLock::new(),
        }
    }

    pub(crate) fn elements(&self) -> &GeometryElements {
        &self.elements
    }

    pub(crate) fn set_boundary_node_rule(&mut self, rule: BoundaryNodeRule) {
        self.line_boundary = LinearBoundary::new(&self.elements.lines, rule);
    }

    pub fn has_boundary(&self) -> bool {
        self.line_boundary.has_boundary()
    }

    pub fn locate(&self, p: Coord<f64>) -> Location {
        self.locate_with_dim(p).location()
    }

    pub fn locate_with_dim(&self, p: Coord<f64>) -> DimensionLocation {
        self.locate_impl(p, false, None)
    }

    /// Locates a node of the geometry's own linework. `parent_polygonal` is
    /// the polygonal element whose boundary the node lies on, if known.
    pub fn locate_node(&self, p: Coord<f64>, parent_polygonal: Option<usize>) -> Location {
        self.locate_node_with_dim(p, parent_polygonal).location()
    }

    pub fn locate_node_with_dim(&self, p: Coord<f64>, parent_polygonal: Option<usize>) -> DimensionLocation {
        self.locate_impl(p, true, parent_polygonal)
    }

    /// Locates an endpoint of one of the geometry's lines. A line end inside
    /// an area of the same collection takes the area location.
    pub fn locate_line_end_with_dim(&self, p: Coord<f64>) -> DimensionLocation {
        if !self.elements.polygons.is_empty() {
            let loc = self.locate_on_polygons(p, false, None);
            if loc != Location::Exterior {
                return DimensionLocation::area(loc);
            }
        }
        if self.line_boundary.is_boundary(p) {
            DimensionLocation::LineBoundary
        } else {
            DimensionLocation::LineInterior
        }
    }

    fn locate_impl(&self, p: Coord<f64>, is_node: bool, parent_polygonal: Option<usize>) -> DimensionLocation {
        if self.elements.is_empty() {
            return DimensionLocation::Exterior;
        }
        // nodes of a polygonal geometry always lie on its boundary
        if is_node && self.is_polygonal {
            return DimensionLocation::AreaBoundary;
        }
        if !self.elements.polygons.is_empty() {
            let loc = self.locate_on_polygons(p, is_node, parent_polygonal);
            if loc != Location::Exterior {
                return DimensionLocation::area(loc);
            }
        }
        if !self.elements.lines.is_empty() {
            let loc = self.locate_on_lines(p, is_node);
            if loc != Location::Exterior {
                return DimensionLocation::line(loc);
            }
        }
        if self.points.contains(&CoordKey::from(p)) {
            return DimensionLocation::PointInterior;
        }
        DimensionLocation::Exterior
    }

    fn locate_on_lines(&self, p: Coord<f64>, is_node: bool) -> Location {
        if self.line_boundary.is_boundary(p) {
            return Location::Boundary;
        }
        if is_node {
            return Location::Interior;
        }
        let on_line = self
            .elements
            .lines
            .iter()
            .zip(&self.line_envelopes)
            .any(|(line, env)| env.is_some_and(|env| envelope_covers_coord(&env, p)) && is_on_line(p, line));
        if on_line {
            Location::Interior
        } else {
            Location::Exterior
        }
    }

    fn locate_on_polygons(&self, p: Coord<f64>, is_node: bool, parent_polygonal: Option<usize>) -> Location {
        let mut num_boundary = 0;
        for (index, group) in self.elements.polygonals.iter().enumerate() {
            match self.locate_on_polygonal(p, is_node, parent_polygonal, index, group) {
                Location::Interior => return Location::Interior,
                Location::Boundary => num_boundary += 1,
                Location::Exterior => {}
            }
        }
        match num_boundary {
            0 => Location::Exterior,
            1 => Location::Boundary,
            _ => self
                .adjacent
                .get_or_init(|| AdjacentEdgeLocator::new(&self.elements.polygons))
                .locate(p),
        }
    }

    fn locate_on_polygonal(
        &self,
        p: Coord<f64>,
        is_node: bool,
        parent_polygonal: Option<usize>,
        index: usize,
        group: &[usize],
    ) -> Location {
        if is_node && parent_polygonal == Some(index) {
            return Location::Boundary;
        }
        let mut loc = Location::Exterior;
        for &i in group {
            let Some(env) = self.polygon_envelopes[i] else {
                continue;
            };
            if !envelope_covers_coord(&env, p) {
                continue;
            }
            match self.elements.polygons[i].coordinate_position(&p) {
                CoordPos::Inside => return Location::Interior,
                CoordPos::OnBoundary => loc = Location::Boundary,
                CoordPos::Outside => {}
            }
        }
        loc
    }
}

fn is_on_line(p: Coord<f64>, line: &LineString<f64>) -> bool {
    if line.0.len() == 1 {
        return line.0[0] == p;
    }
    line.lines().any(|segment| segment.intersects(&p))
}
