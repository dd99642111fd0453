use std::collections::HashSet;
use std::sync::OnceLock;

use geo::{BoundingRect, Winding};
use geo_types::{Coord, Geometry, LineString, Polygon, Rect};

use crate::noding::SegmentChain;
use crate::relate::dimension_location::DimensionLocation;
use crate::relate::linear_boundary::BoundaryNodeRule;
use crate::relate::locator::RelatePointLocator;
use crate::relate::matrix::{Dimension, Location};
use crate::relate::segment_string::RelateSegmentString;
use crate::utils::{envelope_intersects, CoordKey};

/// The non-empty atomic elements of a geometry.
///
/// `polygonals` groups polygon indices by the polygonal element they came
/// from: each `Polygon` is its own group, a `MultiPolygon` is one group.
#[derive(Clone, Debug, Default)]
pub(crate) struct GeometryElements {
    pub points: Vec<Coord<f64>>,
    pub lines: Vec<LineString<f64>>,
    pub polygons: Vec<Polygon<f64>>,
    pub polygonals: Vec<Vec<usize>>,
}

impl GeometryElements {
    pub fn from_geometry(geom: &Geometry<f64>) -> Self {
        let mut elements = Self::default();
        elements.add(geom);
        elements
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty() && self.lines.is_empty() && self.polygons.is_empty()
    }

    fn add(&mut self, geom: &Geometry<f64>) {
        match geom {
            Geometry::Point(p) => self.points.push(p.0),
            Geometry::MultiPoint(mp) => self.points.extend(mp.iter().map(|p| p.0)),
            Geometry::Line(l) => self.lines.push(LineString::new(vec![l.start, l.end])),
            Geometry::LineString(ls) => self.add_line(ls),
            Geometry::MultiLineString(mls) => mls.iter().for_each(|ls| self.add_line(ls)),
            Geometry::Polygon(p) => self.add_polygonal(std::slice::from_ref(p)),
            Geometry::MultiPolygon(mp) => self.add_polygonal(&mp.0),
            Geometry::Rect(r) => self.add_polygonal(&[r.to_polygon()]),
            Geometry::Triangle(t) => self.add_polygonal(&[t.to_polygon()]),
            Geometry::GeometryCollection(gc) => gc.iter().for_each(|g| self.add(g)),
        }
    }

    fn add_line(&mut self, ls: &LineString<f64>) {
        if !ls.0.is_empty() {
            self.lines.push(ls.clone());
        }
    }

    fn add_polygonal(&mut self, polys: &[Polygon<f64>]) {
        let mut group = Vec::new();
        for p in polys.iter().filter(|p| !p.exterior().0.is_empty()) {
            group.push(self.polygons.len());
            self.polygons.push(p.clone());
        }
        if !group.is_empty() {
            self.polygonals.push(group);
        }
    }
}

/// Orients ring coordinates clockwise or counter-clockwise.
pub(crate) fn orient_ring(coords: &[Coord<f64>], require_cw: bool) -> Vec<Coord<f64>> {
    let mut ring = LineString::new(coords.to_vec());
    if require_cw == ring.is_ccw() {
        ring.0.reverse();
    }
    ring.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GeometryKind {
    Puntal,
    Lineal,
    Polygonal,
    Collection { len: usize },
}

impl GeometryKind {
    fn of(geom: &Geometry<f64>) -> Self {
        match geom {
            Geometry::Point(_) | Geometry::MultiPoint(_) => GeometryKind::Puntal,
            Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => GeometryKind::Lineal,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_) | Geometry::Rect(_) | Geometry::Triangle(_) => {
                GeometryKind::Polygonal
            }
            Geometry::GeometryCollection(gc) => GeometryKind::Collection { len: gc.len() },
        }
    }
}

/// One input of a relate computation, with the derived facts the
/// evaluation needs: dimensions, envelope, and point location.
#[derive(Debug)]
pub struct RelateGeometry {
    kind: GeometryKind,
    locator: RelatePointLocator,
    envelope: Option<Rect<f64>>,
    dim: Dimension,
    is_line_zero_len: bool,
    is_prepared: bool,
    unique_points: OnceLock<HashSet<CoordKey>>,
}

impl RelateGeometry {
    pub fn new(geom: &Geometry<f64>, rule: BoundaryNodeRule) -> Self {
        Self::build(geom, false, rule)
    }

    /// A geometry that will be related to many others. Its edges are
    /// indexed in full once rather than clipped per evaluation.
    pub fn prepared(geom: &Geometry<f64>, rule: BoundaryNodeRule) -> Self {
        Self::build(geom, true, rule)
    }

    fn build(geom: &Geometry<f64>, is_prepared: bool, rule: BoundaryNodeRule) -> Self {
        let kind = GeometryKind::of(geom);
        let elements = GeometryElements::from_geometry(geom);
        let dim = if !elements.polygons.is_empty() {
            Dimension::Area
        } else if !elements.lines.is_empty() {
            Dimension::Line
        } else if !elements.points.is_empty() {
            Dimension::Point
        } else {
            Dimension::Empty
        };
        let is_line_zero_len = elements.lines.iter().all(is_zero_length);
        let envelope = geom.bounding_rect();
        let locator = RelatePointLocator::new(elements, kind == GeometryKind::Polygonal, rule);
        Self {
            kind,
            locator,
            envelope,
            dim,
            is_line_zero_len,
            is_prepared,
            unique_points: OnceLock::new(),
        }
    }

    pub(crate) fn set_boundary_node_rule(&mut self, rule: BoundaryNodeRule) {
        self.locator.set_boundary_node_rule(rule);
    }

    fn elements(&self) -> &GeometryElements {
        self.locator.elements()
    }

    pub fn is_prepared(&self) -> bool {
        self.is_prepared
    }

    pub fn envelope(&self) -> Option<&Rect<f64>> {
        self.envelope.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.dim == Dimension::Empty
    }

    /// The highest dimension of any non-empty element.
    pub fn dimension(&self) -> Dimension {
        self.dim
    }

    /// The dimension of the point set. Linear geometry made only of
    /// zero-length lines has dimension point.
    pub fn dimension_real(&self) -> Dimension {
        if self.dim == Dimension::Line && self.is_line_zero_len {
            return Dimension::Point;
        }
        self.dim
    }

    pub fn has_dimension(&self, dim: Dimension) -> bool {
        let elements = self.elements();
        match dim {
            Dimension::Point => !elements.points.is_empty(),
            Dimension::Line => !elements.lines.is_empty(),
            Dimension::Area => !elements.polygons.is_empty(),
            Dimension::Empty => false,
        }
    }

    pub fn has_edges(&self) -> bool {
        self.has_dimension(Dimension::Line) || self.has_dimension(Dimension::Area)
    }

    pub fn has_boundary(&self) -> bool {
        self.locator.has_boundary()
    }

    pub fn is_polygonal(&self) -> bool {
        self.kind == GeometryKind::Polygonal
    }

    /// Whether the geometry's own edges may cross each other. Polygonal
    /// inputs are assumed valid.
    pub fn is_self_noding_required(&self) -> bool {
        match self.kind {
            GeometryKind::Puntal | GeometryKind::Polygonal => false,
            GeometryKind::Lineal => true,
            GeometryKind::Collection { len } => !(self.has_dimension(Dimension::Area) && len == 1),
        }
    }

    pub fn lines(&self) -> &[LineString<f64>] {
        &self.elements().lines
    }

    pub fn polygons(&self) -> &[Polygon<f64>] {
        &self.elements().polygons
    }

    /// The distinct points of a geometry of real dimension point.
    pub fn unique_points(&self) -> &HashSet<CoordKey> {
        self.unique_points.get_or_init(|| {
            let elements = self.elements();
            let line_starts = elements.lines.iter().filter_map(|l| l.0.first().copied());
            elements
                .points
                .iter()
                .copied()
                .chain(line_starts)
                .map(CoordKey::from)
                .collect()
        })
    }

    /// Points not covered by a line or area of the same collection.
    pub fn effective_points(&self) -> Vec<Coord<f64>> {
        let points = &self.elements().points;
        if self.dimension_real() <= Dimension::Point {
            return points.clone();
        }
        points
            .iter()
            .copied()
            .filter(|&p| self.locate_with_dim(p).dimension() == Dimension::Point)
            .collect()
    }

    pub fn locate_with_dim(&self, p: Coord<f64>) -> DimensionLocation {
        self.locator.locate_with_dim(p)
    }

    pub fn locate_node(&self, p: Coord<f64>, parent_polygonal: Option<usize>) -> Location {
        self.locator.locate_node(p, parent_polygonal)
    }

    pub fn is_node_in_area(&self, p: Coord<f64>, parent_polygonal: Option<usize>) -> bool {
        self.locator.locate_node_with_dim(p, parent_polygonal) == DimensionLocation::AreaInterior
    }

    pub fn locate_line_end_with_dim(&self, p: Coord<f64>) -> DimensionLocation {
        self.locator.locate_line_end_with_dim(p)
    }

    /// Locates a ring vertex. The vertex lies on its own polygon's boundary,
    /// so no parent polygonal is needed.
    pub fn locate_area_vertex(&self, p: Coord<f64>) -> Location {
        self.locate_node(p, None)
    }

    /// Extracts the lines and oriented rings meeting `envelope` (all of them
    /// when `None`) as segment strings tagged with their element.
    pub fn extract_segment_strings(&self, is_a: bool, envelope: Option<&Rect<f64>>) -> Vec<RelateSegmentString> {
        let elements = self.elements();
        let meets = |env: Option<Rect<f64>>| match (envelope, env) {
            (None, _) => true,
            (Some(filter), Some(env)) => envelope_intersects(filter, &env),
            (Some(_), None) => false,
        };

        let mut out = Vec::new();
        for (id, line) in elements.lines.iter().enumerate() {
            if !meets(line.bounding_rect()) {
                continue;
            }
            let ss = RelateSegmentString::line(line.0.clone(), is_a, id);
            if ss.coords().len() >= 2 {
                out.push(ss);
            }
        }

        let first_polygon_id = elements.lines.len();
        for (polygonal, group) in elements.polygonals.iter().enumerate() {
            for &j in group {
                let poly = &elements.polygons[j];
                if !meets(poly.bounding_rect()) {
                    continue;
                }
                let rings = std::iter::once(poly.exterior()).chain(poly.interiors());
                for (ring_id, ring) in rings.enumerate() {
                    if ring.0.is_empty() || !meets(ring.bounding_rect()) {
                        continue;
                    }
                    let coords = orient_ring(&ring.0, ring_id == 0);
                    let ss = RelateSegmentString::ring(coords, is_a, first_polygon_id + j, ring_id, polygonal);
                    if ss.coords().len() >= 2 {
                        out.push(ss);
                    }
                }
            }
        }
        out
    }
}

fn is_zero_length(line: &LineString<f64>) -> bool {
    line.0.windows(2).all(|w| w[0] == w[1])
}
