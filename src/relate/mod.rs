//! Topological relationships between geometries using the DE-9IM model.
//!
//! [`RelateNG`] evaluates a [`TopologyPredicate`] against a pair of
//! geometries. Evidence about the relationship is gathered incrementally:
//! points are located first, then line ends and area vertices, and only
//! then are edges intersected and the resulting nodes analysed. Each step
//! is skipped once the predicate value is known.
//!
//! A geometry which is related to many others can be prepared, in which
//! case its point locator and edge index are built once and reused.
//!
//! ```
//! use geo_types::{polygon, point, Geometry};
//! use geo_relate_ng::relate::{self, RelateNG};
//!
//! let square: Geometry<f64> = polygon![
//!     (x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0), (x: 0.0, y: 0.0)
//! ].into();
//! let rel = RelateNG::prepare(&square);
//! assert!(rel.evaluate(&point!(x: 5.0, y: 5.0).into(), &mut relate::predicate::contains()));
//! assert_eq!(rel.evaluate_matrix(&point!(x: 10.0, y: 5.0).into()).to_string(), "FF20F1FF2");
//! ```

use std::sync::OnceLock;

use geo::BoundingRect;
use geo_types::{Coord, Geometry, LineString};

use crate::error::Result;
use crate::noding::MutualIntersector;
use crate::relate::predicate::{env_covers, env_intersects};
use crate::utils::{envelope_intersection, envelope_intersects, parallel};

pub mod adjacent;
pub mod converter;
pub mod dimension_location;
pub mod edge_intersector;
pub mod geometry;
pub mod linear_boundary;
pub mod locator;
pub mod matrix;
pub mod node;
pub mod node_section;
pub mod pattern_matcher;
pub mod predicate;
pub mod segment_string;
pub mod topology;

pub use dimension_location::DimensionLocation;
pub use edge_intersector::{EdgeSegmentIntersector, EdgeSetIntersector};
pub use geometry::RelateGeometry;
pub use linear_boundary::{BoundaryNodeRule, LinearBoundary};
pub use locator::RelatePointLocator;
pub use matrix::{Dimension, IntersectionMatrix, Location, Pattern, PatternCell};
pub use pattern_matcher::{PatternMatcher, RelateMatrixPredicate};
pub use predicate::{ImPredicate, ImPredicateKind, TopologyPredicate, TriState};
pub use segment_string::RelateSegmentString;
pub use topology::TopologyComputer;

/// Evaluates topological predicates between a fixed geometry A and any
/// number of geometries B.
#[derive(Debug)]
pub struct RelateNG {
    geom_a: RelateGeometry,
    rule: BoundaryNodeRule,
    edge_mutual_int: OnceLock<MutualIntersector<RelateSegmentString>>,
}

impl RelateNG {
    /// Relates `a` to other geometries without caching any index.
    pub fn new(a: &Geometry<f64>) -> Self {
        Self::build(RelateGeometry::new(a, BoundaryNodeRule::default()))
    }

    /// Relates `a` to many geometries, reusing its locator and edge index.
    pub fn prepare(a: &Geometry<f64>) -> Self {
        Self::build(RelateGeometry::prepared(a, BoundaryNodeRule::default()))
    }

    fn build(geom_a: RelateGeometry) -> Self {
        Self {
            geom_a,
            rule: BoundaryNodeRule::default(),
            edge_mutual_int: OnceLock::new(),
        }
    }

    /// Sets the rule deciding which line endpoints are boundary points.
    pub fn with_boundary_node_rule(mut self, rule: BoundaryNodeRule) -> Self {
        self.rule = rule;
        self.geom_a.set_boundary_node_rule(rule);
        self
    }

    pub fn boundary_node_rule(&self) -> BoundaryNodeRule {
        self.rule
    }

    pub fn geometry(&self) -> &RelateGeometry {
        &self.geom_a
    }

    /// Computes the full intersection matrix of A and `b`.
    pub fn evaluate_matrix(&self, b: &Geometry<f64>) -> IntersectionMatrix {
        let mut predicate = RelateMatrixPredicate::new();
        self.evaluate(b, &mut predicate);
        predicate.into_matrix()
    }

    /// Tests whether the matrix of A and `b` matches a DE-9IM pattern.
    pub fn evaluate_pattern(&self, b: &Geometry<f64>, pattern: &str) -> Result<bool> {
        let mut predicate = PatternMatcher::matches(pattern)?;
        Ok(self.evaluate(b, &mut predicate))
    }

    /// Evaluates a fresh predicate from `make_predicate` against each of
    /// `geoms`, in parallel when the `parallel` feature is enabled.
    pub fn evaluate_all<P, F>(&self, geoms: &[Geometry<f64>], make_predicate: F) -> Vec<bool>
    where
        P: TopologyPredicate,
        F: Fn() -> P + Sync + Send,
    {
        // build the shared edge index up front rather than racing for it
        if self.geom_a.is_prepared() && self.geom_a.has_edges() {
            self.mutual_intersector();
        }
        parallel::map(geoms, |b| {
            let mut predicate = make_predicate();
            self.evaluate(b, &mut predicate)
        })
    }

    /// Evaluates `predicate` for A and `b`, returning its value.
    pub fn evaluate(&self, b: &Geometry<f64>, predicate: &mut dyn TopologyPredicate) -> bool {
        if !self.has_required_envelope_interaction(b, predicate) {
            log::debug!("{}: envelopes rule out the relationship", predicate.name());
            return false;
        }

        let geom_b = RelateGeometry::new(b, self.rule);

        if self.geom_a.is_empty() && geom_b.is_empty() {
            predicate.init_dimensions(Dimension::Empty, Dimension::Empty);
            predicate.init_envelopes(None, None);
            return finish_value(predicate);
        }

        let dim_a = self.geom_a.dimension_real();
        let dim_b = geom_b.dimension_real();
        predicate.init_dimensions(dim_a, dim_b);
        if predicate.is_known() {
            log::debug!("{}: decided by dimensions {:?}/{:?}", predicate.name(), dim_a, dim_b);
            return finish_value(predicate);
        }

        predicate.init_envelopes(self.geom_a.envelope(), geom_b.envelope());
        if predicate.is_known() {
            log::debug!("{}: decided by envelopes", predicate.name());
            return finish_value(predicate);
        }

        let mut topo = TopologyComputer::new(predicate, &self.geom_a, &geom_b);

        if dim_a == Dimension::Point && dim_b == Dimension::Point {
            self.compute_point_point(&geom_b, &mut topo);
            topo.finish();
            return topo.result();
        }

        // B is usually the smaller geometry, and A may have a cached locator
        if compute_at_points(&geom_b, false, &self.geom_a, &mut topo) {
            return topo.result();
        }
        if compute_at_points(&self.geom_a, true, &geom_b, &mut topo) {
            return topo.result();
        }

        if self.geom_a.has_edges() && geom_b.has_edges() {
            self.compute_at_edges(&geom_b, &mut topo);
        }

        topo.finish();
        topo.result()
    }

    fn has_required_envelope_interaction(&self, b: &Geometry<f64>, predicate: &dyn TopologyPredicate) -> bool {
        let env_a = self.geom_a.envelope();
        let env_b = b.bounding_rect();
        if predicate.require_covers(true) {
            return env_covers(env_a, env_b.as_ref());
        }
        if predicate.require_covers(false) {
            return env_covers(env_b.as_ref(), env_a);
        }
        !predicate.require_interaction() || env_intersects(env_a, env_b.as_ref())
    }

    fn compute_point_point(&self, geom_b: &RelateGeometry, topo: &mut TopologyComputer<'_>) {
        let pts_a = self.geom_a.unique_points();
        let mut num_b_in_a = 0;
        for pt in geom_b.unique_points() {
            if pts_a.contains(pt) {
                num_b_in_a += 1;
                topo.add_point_on_point_interior();
            } else {
                topo.add_point_on_point_exterior(false);
            }
            if topo.is_result_known() {
                return;
            }
        }
        // some point of A is not in B
        if num_b_in_a < pts_a.len() {
            topo.add_point_on_point_exterior(true);
        }
    }

    fn compute_at_edges(&self, geom_b: &RelateGeometry, topo: &mut TopologyComputer<'_>) {
        let Some(env_int) = self
            .geom_a
            .envelope()
            .zip(geom_b.envelope())
            .and_then(|(a, b)| envelope_intersection(a, b))
        else {
            return;
        };

        let edges_b = geom_b.extract_segment_strings(false, Some(&env_int));
        let self_noding = topo.is_self_noding_required();
        {
            let mut intersector = EdgeSegmentIntersector::new(topo);
            if self_noding {
                let edges_a = self.geom_a.extract_segment_strings(true, Some(&env_int));
                EdgeSetIntersector::new(edges_a, edges_b, Some(&env_int)).process(&mut intersector);
            } else if self.geom_a.is_prepared() {
                self.mutual_intersector().process(&edges_b, &mut intersector);
            } else {
                let edges_a = self.geom_a.extract_segment_strings(true, Some(&env_int));
                MutualIntersector::new(edges_a).process(&edges_b, &mut intersector);
            }
        }

        if topo.is_result_known() {
            return;
        }
        topo.evaluate_nodes();
    }

    fn mutual_intersector(&self) -> &MutualIntersector<RelateSegmentString> {
        self.edge_mutual_int
            .get_or_init(|| MutualIntersector::new(self.geom_a.extract_segment_strings(true, None)))
    }
}

fn finish_value(predicate: &mut dyn TopologyPredicate) -> bool {
    predicate.finish();
    predicate.value()
}

/// The element dimension of a located point, or the declared dimension of
/// the target geometry when the point is in its exterior.
fn target_dimension(loc: DimensionLocation, target: &RelateGeometry) -> Dimension {
    loc.dimension_or(target.dimension())
}

/// Locates the points, line ends and area vertices of `geom` against
/// `target`. Returns true if the result became known.
fn compute_at_points(
    geom: &RelateGeometry,
    is_a: bool,
    target: &RelateGeometry,
    topo: &mut TopologyComputer<'_>,
) -> bool {
    if compute_points(geom, is_a, target, topo) {
        return true;
    }
    // points not on the target only matter for areas or exterior checks
    let check_disjoint_points = target.has_dimension(Dimension::Area) || topo.is_exterior_check_required(is_a);
    if !check_disjoint_points {
        return false;
    }
    if compute_line_ends(geom, is_a, target, topo) {
        return true;
    }
    compute_area_vertices(geom, is_a, target, topo)
}

fn compute_points(geom: &RelateGeometry, is_a: bool, target: &RelateGeometry, topo: &mut TopologyComputer<'_>) -> bool {
    if !geom.has_dimension(Dimension::Point) {
        return false;
    }
    for pt in geom.effective_points() {
        let loc = target.locate_with_dim(pt);
        topo.add_point_on_geometry(is_a, loc.location(), target_dimension(loc, target));
        if topo.is_result_known() {
            return true;
        }
    }
    false
}

fn compute_line_ends(
    geom: &RelateGeometry,
    is_a: bool,
    target: &RelateGeometry,
    topo: &mut TopologyComputer<'_>,
) -> bool {
    if !geom.has_dimension(Dimension::Line) {
        return false;
    }
    let mut has_exterior_intersection = false;
    for line in geom.lines() {
        let (Some(&start), Some(&end)) = (line.0.first(), line.0.last()) else {
            continue;
        };
        // once the exterior is known to be hit, lines away from the target add nothing
        if has_exterior_intersection && !is_near_target(line, target) {
            continue;
        }
        has_exterior_intersection |= compute_line_end(geom, is_a, start, target, topo);
        if topo.is_result_known() {
            return true;
        }
        if !line.is_closed() {
            has_exterior_intersection |= compute_line_end(geom, is_a, end, target, topo);
            if topo.is_result_known() {
                return true;
            }
        }
    }
    false
}

/// Returns true if the line end lies in the target exterior.
fn compute_line_end(
    geom: &RelateGeometry,
    is_a: bool,
    pt: Coord<f64>,
    target: &RelateGeometry,
    topo: &mut TopologyComputer<'_>,
) -> bool {
    let loc_line_end = geom.locate_line_end_with_dim(pt);
    // ends inside an area of the same collection are not line ends
    if loc_line_end.dimension_or(geom.dimension()) != Dimension::Line {
        return false;
    }
    let loc_target = target.locate_with_dim(pt);
    topo.add_line_end_on_geometry(
        is_a,
        loc_line_end.location(),
        loc_target.location(),
        target_dimension(loc_target, target),
    );
    loc_target.location() == Location::Exterior
}

fn compute_area_vertices(
    geom: &RelateGeometry,
    is_a: bool,
    target: &RelateGeometry,
    topo: &mut TopologyComputer<'_>,
) -> bool {
    if !geom.has_dimension(Dimension::Area) {
        return false;
    }
    // point targets are handled from the other side
    if target.dimension() < Dimension::Line {
        return false;
    }
    let mut has_exterior_intersection = false;
    for poly in geom.polygons() {
        if poly.exterior().0.is_empty() {
            continue;
        }
        if has_exterior_intersection && !is_near_target(poly.exterior(), target) {
            continue;
        }
        for ring in std::iter::once(poly.exterior()).chain(poly.interiors()) {
            let Some(&pt) = ring.0.first() else {
                continue;
            };
            let loc_area = geom.locate_area_vertex(pt);
            let loc_target = target.locate_with_dim(pt);
            topo.add_area_vertex(is_a, loc_area, loc_target.location(), target_dimension(loc_target, target));
            has_exterior_intersection |= loc_target.location() == Location::Exterior;
            if topo.is_result_known() {
                return true;
            }
        }
    }
    false
}

fn is_near_target(line: &LineString<f64>, target: &RelateGeometry) -> bool {
    match (line.bounding_rect(), target.envelope()) {
        (Some(env), Some(target_env)) => envelope_intersects(&env, target_env),
        _ => false,
    }
}

/// Computes the DE-9IM matrix of two geometries.
pub fn relate(a: &Geometry<f64>, b: &Geometry<f64>) -> IntersectionMatrix {
    RelateNG::new(a).evaluate_matrix(b)
}

/// Tests whether the DE-9IM matrix of two geometries matches `pattern`.
pub fn relate_pattern(a: &Geometry<f64>, b: &Geometry<f64>, pattern: &str) -> Result<bool> {
    RelateNG::new(a).evaluate_pattern(b, pattern)
}

/// Evaluates `predicate` for two geometries.
pub fn relate_with(a: &Geometry<f64>, b: &Geometry<f64>, predicate: &mut dyn TopologyPredicate) -> bool {
    RelateNG::new(a).evaluate(b, predicate)
}

/// Computes the DE-9IM matrix of two geometries using `rule` for the
/// boundaries of lines.
pub fn relate_with_rule(a: &Geometry<f64>, b: &Geometry<f64>, rule: BoundaryNodeRule) -> IntersectionMatrix {
    RelateNG::new(a).with_boundary_node_rule(rule).evaluate_matrix(b)
}
