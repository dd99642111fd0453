//! Topological predicates evaluated incrementally over a DE-9IM matrix.
//!
//! A predicate receives, in order: the real dimensions of the inputs, their
//! envelopes, then a stream of matrix updates. At any step it may become
//! known, at which point evaluation stops. [`TopologyPredicate::finish`] is
//! called once all evidence has been supplied.

use geo_types::Rect;

use crate::relate::matrix::{Dimension, IntersectionMatrix, Location};
use crate::utils::{envelope_covers, envelope_intersects};

/// The value of a predicate during evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TriState {
    #[default]
    Unknown,
    True,
    False,
}

impl TriState {
    pub fn is_known(self) -> bool {
        self != TriState::Unknown
    }

    /// Sets the value unless one is already known.
    pub fn set(&mut self, value: bool) {
        if self.is_known() {
            return;
        }
        *self = if value { TriState::True } else { TriState::False };
    }

    pub fn set_if(&mut self, value: bool, condition: bool) {
        if condition {
            self.set(value);
        }
    }

    /// Sets the value to false if `condition` does not hold.
    pub fn require(&mut self, condition: bool) {
        if !condition {
            self.set(false);
        }
    }

    pub fn value(self) -> bool {
        self == TriState::True
    }
}

pub trait TopologyPredicate {
    fn name(&self) -> &str;

    /// Whether self-intersections of each input must be noded.
    fn require_self_noding(&self) -> bool {
        true
    }

    /// Whether the predicate can only be true if the inputs interact.
    fn require_interaction(&self) -> bool {
        true
    }

    /// Whether the predicate requires the given input to cover the other.
    fn require_covers(&self, _is_source_a: bool) -> bool {
        false
    }

    /// Whether the exterior of the other input must be checked against the
    /// given input's points.
    fn require_exterior_check(&self, _is_source_a: bool) -> bool {
        true
    }

    fn init_dimensions(&mut self, _dim_a: Dimension, _dim_b: Dimension) {}

    /// Envelopes are `None` for empty geometries.
    fn init_envelopes(&mut self, _env_a: Option<&Rect<f64>>, _env_b: Option<&Rect<f64>>) {}

    /// Records that `loc_a` of A meets `loc_b` of B in a set of dimension `dim`.
    fn update_dimension(&mut self, loc_a: Location, loc_b: Location, dim: Dimension);

    fn finish(&mut self);

    fn is_known(&self) -> bool;

    fn value(&self) -> bool;
}

impl<P: TopologyPredicate + ?Sized> TopologyPredicate for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn require_self_noding(&self) -> bool {
        (**self).require_self_noding()
    }
    fn require_interaction(&self) -> bool {
        (**self).require_interaction()
    }
    fn require_covers(&self, is_source_a: bool) -> bool {
        (**self).require_covers(is_source_a)
    }
    fn require_exterior_check(&self, is_source_a: bool) -> bool {
        (**self).require_exterior_check(is_source_a)
    }
    fn init_dimensions(&mut self, dim_a: Dimension, dim_b: Dimension) {
        (**self).init_dimensions(dim_a, dim_b)
    }
    fn init_envelopes(&mut self, env_a: Option<&Rect<f64>>, env_b: Option<&Rect<f64>>) {
        (**self).init_envelopes(env_a, env_b)
    }
    fn update_dimension(&mut self, loc_a: Location, loc_b: Location, dim: Dimension) {
        (**self).update_dimension(loc_a, loc_b, dim)
    }
    fn finish(&mut self) {
        (**self).finish()
    }
    fn is_known(&self) -> bool {
        (**self).is_known()
    }
    fn value(&self) -> bool {
        (**self).value()
    }
}

pub(crate) fn env_intersects(a: Option<&Rect<f64>>, b: Option<&Rect<f64>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => envelope_intersects(a, b),
        _ => false,
    }
}

pub(crate) fn env_covers(a: Option<&Rect<f64>>, b: Option<&Rect<f64>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => envelope_covers(a, b),
        _ => false,
    }
}

fn env_equals(a: Option<&Rect<f64>>, b: Option<&Rect<f64>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        (None, None) => true,
        _ => false,
    }
}

/// True if two locations are both on a geometry (not exterior).
pub fn is_intersection(loc_a: Location, loc_b: Location) -> bool {
    loc_a != Location::Exterior && loc_b != Location::Exterior
}

/// Covering is only possible if the covering input has dimension at least
/// that of the covered one. A point may be covered by a zero-length line.
fn is_dims_compatible_with_covers(dim0: Dimension, dim1: Dimension) -> bool {
    if dim0 == Dimension::Point && dim1 == Dimension::Line {
        return true;
    }
    dim0 >= dim1
}

#[derive(Clone, Debug, Default)]
pub struct IntersectsPredicate {
    value: TriState,
}

impl TopologyPredicate for IntersectsPredicate {
    fn name(&self) -> &str {
        "intersects"
    }

    fn require_self_noding(&self) -> bool {
        false
    }

    fn require_exterior_check(&self, _is_source_a: bool) -> bool {
        false
    }

    fn init_envelopes(&mut self, env_a: Option<&Rect<f64>>, env_b: Option<&Rect<f64>>) {
        self.value.require(env_intersects(env_a, env_b));
    }

    fn update_dimension(&mut self, loc_a: Location, loc_b: Location, _dim: Dimension) {
        self.value.set_if(true, is_intersection(loc_a, loc_b));
    }

    fn finish(&mut self) {
        self.value.set(false);
    }

    fn is_known(&self) -> bool {
        self.value.is_known()
    }

    fn value(&self) -> bool {
        self.value.value()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DisjointPredicate {
    value: TriState,
}

impl TopologyPredicate for DisjointPredicate {
    fn name(&self) -> &str {
        "disjoint"
    }

    fn require_self_noding(&self) -> bool {
        false
    }

    fn require_interaction(&self) -> bool {
        false
    }

    fn require_exterior_check(&self, _is_source_a: bool) -> bool {
        false
    }

    fn init_envelopes(&mut self, env_a: Option<&Rect<f64>>, env_b: Option<&Rect<f64>>) {
        self.value.set_if(true, !env_intersects(env_a, env_b));
    }

    fn update_dimension(&mut self, loc_a: Location, loc_b: Location, _dim: Dimension) {
        self.value.set_if(false, is_intersection(loc_a, loc_b));
    }

    fn finish(&mut self) {
        self.value.set(true);
    }

    fn is_known(&self) -> bool {
        self.value.is_known()
    }

    fn value(&self) -> bool {
        self.value.value()
    }
}

/// The named predicates evaluated from the matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImPredicateKind {
    Contains,
    Within,
    Covers,
    CoveredBy,
    Crosses,
    Equals,
    Overlaps,
    Touches,
}

/// Shared state of predicates that build up the matrix and evaluate it.
#[derive(Clone, Debug)]
pub(crate) struct MatrixState {
    pub dim_a: Dimension,
    pub dim_b: Dimension,
    pub matrix: IntersectionMatrix,
    pub value: TriState,
}

impl Default for MatrixState {
    fn default() -> Self {
        let mut matrix = IntersectionMatrix::new();
        // the exteriors of two bounded geometries always meet in an area
        matrix.set(Location::Exterior, Location::Exterior, Dimension::Area);
        Self {
            dim_a: Dimension::Empty,
            dim_b: Dimension::Empty,
            matrix,
            value: TriState::Unknown,
        }
    }
}

impl MatrixState {
    pub fn is_intersects(&self, a: Location, b: Location) -> bool {
        self.matrix.get(a, b) >= Dimension::Point
    }

    /// Records `dim` if it raises the entry. Returns whether it did.
    pub fn raise(&mut self, a: Location, b: Location, dim: Dimension) -> bool {
        if dim > self.matrix.get(a, b) {
            self.matrix.set(a, b, dim);
            return true;
        }
        false
    }

    /// True if the exterior of the given input meets the other input.
    pub fn intersects_exterior_of(&self, is_a: bool) -> bool {
        use Location::*;
        if is_a {
            self.is_intersects(Exterior, Interior) || self.is_intersects(Exterior, Boundary)
        } else {
            self.is_intersects(Interior, Exterior) || self.is_intersects(Boundary, Exterior)
        }
    }
}

/// A named predicate computed from the DE-9IM matrix, short-circuiting as
/// soon as the matrix determines its value.
#[derive(Clone, Debug)]
pub struct ImPredicate {
    kind: ImPredicateKind,
    state: MatrixState,
}

impl ImPredicate {
    pub fn new(kind: ImPredicateKind) -> Self {
        Self {
            kind,
            state: MatrixState::default(),
        }
    }

    pub fn kind(&self) -> ImPredicateKind {
        self.kind
    }

    pub fn matrix(&self) -> &IntersectionMatrix {
        &self.state.matrix
    }

    /// True once no further matrix update can change the predicate value.
    fn is_determined(&self) -> bool {
        use ImPredicateKind::*;
        use Location::*;
        let s = &self.state;
        match self.kind {
            Contains | Covers => s.intersects_exterior_of(true),
            Within | CoveredBy => s.intersects_exterior_of(false),
            Crosses => {
                if s.dim_a == Dimension::Line && s.dim_b == Dimension::Line {
                    // lines can only cross at points
                    s.matrix.get(Interior, Interior) > Dimension::Point
                } else if s.dim_a < s.dim_b {
                    s.is_intersects(Interior, Interior) && s.is_intersects(Interior, Exterior)
                } else if s.dim_a > s.dim_b {
                    s.is_intersects(Interior, Interior) && s.is_intersects(Exterior, Interior)
                } else {
                    false
                }
            }
            Equals => s.intersects_exterior_of(true) || s.intersects_exterior_of(false),
            Overlaps => {
                let required_interior = if s.dim_a == Dimension::Line && s.dim_b == Dimension::Line {
                    s.matrix.get(Interior, Interior) == Dimension::Line
                } else {
                    s.is_intersects(Interior, Interior)
                };
                required_interior && s.is_intersects(Interior, Exterior) && s.is_intersects(Exterior, Interior)
            }
            Touches => s.is_intersects(Interior, Interior),
        }
    }

    fn value_im(&self) -> bool {
        use ImPredicateKind::*;
        let m = &self.state.matrix;
        let (dim_a, dim_b) = (self.state.dim_a, self.state.dim_b);
        match self.kind {
            Contains => m.is_contains(),
            Within => m.is_within(),
            Covers => m.is_covers(),
            CoveredBy => m.is_covered_by(),
            Crosses => m.is_crosses(dim_a, dim_b),
            Equals => (dim_a == Dimension::Empty && dim_b == Dimension::Empty) || m.is_equals(dim_a, dim_b),
            Overlaps => m.is_overlaps(dim_a, dim_b),
            Touches => m.is_touches(dim_a, dim_b),
        }
    }
}

impl TopologyPredicate for ImPredicate {
    fn name(&self) -> &str {
        match self.kind {
            ImPredicateKind::Contains => "contains",
            ImPredicateKind::Within => "within",
            ImPredicateKind::Covers => "covers",
            ImPredicateKind::CoveredBy => "coveredBy",
            ImPredicateKind::Crosses => "crosses",
            ImPredicateKind::Equals => "equals",
            ImPredicateKind::Overlaps => "overlaps",
            ImPredicateKind::Touches => "touches",
        }
    }

    fn require_interaction(&self) -> bool {
        // two empty geometries are equal
        self.kind != ImPredicateKind::Equals
    }

    fn require_covers(&self, is_source_a: bool) -> bool {
        match self.kind {
            ImPredicateKind::Contains | ImPredicateKind::Covers => is_source_a,
            ImPredicateKind::Within | ImPredicateKind::CoveredBy => !is_source_a,
            _ => false,
        }
    }

    fn require_exterior_check(&self, is_source_a: bool) -> bool {
        match self.kind {
            // only B need be checked against the exterior of A
            ImPredicateKind::Contains | ImPredicateKind::Covers => !is_source_a,
            ImPredicateKind::Within | ImPredicateKind::CoveredBy => is_source_a,
            _ => true,
        }
    }

    fn init_dimensions(&mut self, dim_a: Dimension, dim_b: Dimension) {
        self.state.dim_a = dim_a;
        self.state.dim_b = dim_b;
        let value = &mut self.state.value;
        match self.kind {
            ImPredicateKind::Contains | ImPredicateKind::Covers => {
                value.require(is_dims_compatible_with_covers(dim_a, dim_b))
            }
            ImPredicateKind::Within | ImPredicateKind::CoveredBy => {
                value.require(is_dims_compatible_with_covers(dim_b, dim_a))
            }
            ImPredicateKind::Crosses => {
                let both_points_or_areas = (dim_a == Dimension::Point && dim_b == Dimension::Point)
                    || (dim_a == Dimension::Area && dim_b == Dimension::Area);
                value.require(!both_points_or_areas);
            }
            ImPredicateKind::Equals | ImPredicateKind::Overlaps => value.require(dim_a == dim_b),
            ImPredicateKind::Touches => {
                value.require(!(dim_a == Dimension::Point && dim_b == Dimension::Point));
            }
        }
    }

    fn init_envelopes(&mut self, env_a: Option<&Rect<f64>>, env_b: Option<&Rect<f64>>) {
        let value = &mut self.state.value;
        match self.kind {
            ImPredicateKind::Contains | ImPredicateKind::Covers => value.require(env_covers(env_a, env_b)),
            ImPredicateKind::Within | ImPredicateKind::CoveredBy => value.require(env_covers(env_b, env_a)),
            ImPredicateKind::Equals => {
                value.set_if(true, env_a.is_none() && env_b.is_none());
                value.require(env_equals(env_a, env_b));
            }
            _ => value.require(env_intersects(env_a, env_b)),
        }
    }

    fn update_dimension(&mut self, loc_a: Location, loc_b: Location, dim: Dimension) {
        if self.state.raise(loc_a, loc_b, dim) && self.is_determined() {
            let v = self.value_im();
            self.state.value.set(v);
        }
    }

    fn finish(&mut self) {
        let v = self.value_im();
        self.state.value.set(v);
    }

    fn is_known(&self) -> bool {
        self.state.value.is_known()
    }

    fn value(&self) -> bool {
        self.state.value.value()
    }
}

pub fn intersects() -> IntersectsPredicate {
    IntersectsPredicate::default()
}

pub fn disjoint() -> DisjointPredicate {
    DisjointPredicate::default()
}

pub fn contains() -> ImPredicate {
    ImPredicate::new(ImPredicateKind::Contains)
}

pub fn within() -> ImPredicate {
    ImPredicate::new(ImPredicateKind::Within)
}

pub fn covers() -> ImPredicate {
    ImPredicate::new(ImPredicateKind::Covers)
}

pub fn covered_by() -> ImPredicate {
    ImPredicate::new(ImPredicateKind::CoveredBy)
}

pub fn crosses() -> ImPredicate {
    ImPredicate::new(ImPredicateKind::Crosses)
}

pub fn equals_topo() -> ImPredicate {
    ImPredicate::new(ImPredicateKind::Equals)
}

pub fn overlaps() -> ImPredicate {
    ImPredicate::new(ImPredicateKind::Overlaps)
}

pub fn touches() -> ImPredicate {
    ImPredicate::new(ImPredicateKind::Touches)
}
