use geo_types::Rect;

use crate::error::Result;
use crate::relate::matrix::{Dimension, IntersectionMatrix, Location, Pattern, PatternCell};
use crate::relate::predicate::{env_intersects, MatrixState, TopologyPredicate};

/// Evaluates whether the matrix matches a DE-9IM pattern such as `T*F**FFF*`.
///
/// Evaluation stops as soon as an entry exceeds what its cell allows, or
/// every constrained cell is already satisfied in a way no later update
/// can undo.
#[derive(Clone, Debug)]
pub struct PatternMatcher {
    pattern: Pattern,
    state: MatrixState,
}

impl PatternMatcher {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            state: MatrixState::default(),
        }
    }

    /// Parses `pattern`, failing on a malformed pattern string.
    pub fn matches(pattern: &str) -> Result<Self> {
        Ok(Self::new(pattern.parse()?))
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn matrix(&self) -> &IntersectionMatrix {
        &self.state.matrix
    }

    /// Entries only ever increase, so a cell is violated for good once its
    /// value exceeds the largest value it permits.
    fn is_violated(cell: PatternCell, dim: Dimension) -> bool {
        match cell {
            PatternCell::Empty => dim != Dimension::Empty,
            PatternCell::Exactly(required) => dim > required,
            PatternCell::NonEmpty | PatternCell::Any => false,
        }
    }

    fn is_settled(cell: PatternCell, dim: Dimension) -> bool {
        match cell {
            PatternCell::Any => true,
            PatternCell::NonEmpty => dim.is_non_empty(),
            // no entry can exceed an area
            PatternCell::Exactly(Dimension::Area) => dim == Dimension::Area,
            PatternCell::Exactly(_) | PatternCell::Empty => false,
        }
    }

    fn evaluate_early(&self) -> Option<bool> {
        let mut all_settled = true;
        for a in Location::ALL {
            for b in Location::ALL {
                let cell = self.pattern.get(a, b);
                let dim = self.state.matrix.get(a, b);
                if Self::is_violated(cell, dim) {
                    return Some(false);
                }
                all_settled &= Self::is_settled(cell, dim);
            }
        }
        all_settled.then_some(true)
    }
}

impl TopologyPredicate for PatternMatcher {
    fn name(&self) -> &str {
        "relate"
    }

    fn require_interaction(&self) -> bool {
        self.pattern.requires_interaction()
    }

    fn init_dimensions(&mut self, dim_a: Dimension, dim_b: Dimension) {
        self.state.dim_a = dim_a;
        self.state.dim_b = dim_b;
    }

    fn init_envelopes(&mut self, env_a: Option<&Rect<f64>>, env_b: Option<&Rect<f64>>) {
        if self.require_interaction() {
            self.state.value.require(env_intersects(env_a, env_b));
        }
    }

    fn update_dimension(&mut self, loc_a: Location, loc_b: Location, dim: Dimension) {
        if self.state.raise(loc_a, loc_b, dim) {
            if let Some(v) = self.evaluate_early() {
                self.state.value.set(v);
            }
        }
    }

    fn finish(&mut self) {
        let v = self.state.matrix.matches(&self.pattern);
        self.state.value.set(v);
    }

    fn is_known(&self) -> bool {
        self.state.value.is_known()
    }

    fn value(&self) -> bool {
        self.state.value.value()
    }
}

/// Computes the full DE-9IM matrix. Never short-circuits.
#[derive(Clone, Debug, Default)]
pub struct RelateMatrixPredicate {
    state: MatrixState,
}

impl RelateMatrixPredicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn matrix(&self) -> &IntersectionMatrix {
        &self.state.matrix
    }

    pub fn into_matrix(self) -> IntersectionMatrix {
        self.state.matrix
    }
}

impl TopologyPredicate for RelateMatrixPredicate {
    fn name(&self) -> &str {
        "relateMatrix"
    }

    fn require_interaction(&self) -> bool {
        false
    }

    fn init_dimensions(&mut self, dim_a: Dimension, dim_b: Dimension) {
        self.state.dim_a = dim_a;
        self.state.dim_b = dim_b;
    }

    fn update_dimension(&mut self, loc_a: Location, loc_b: Location, dim: Dimension) {
        self.state.raise(loc_a, loc_b, dim);
    }

    fn finish(&mut self) {}

    fn is_known(&self) -> bool {
        false
    }

    fn value(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Location::*;

    #[test]
    fn test_violation_stops_early() {
        let mut m = PatternMatcher::matches("T*F**FFF*").unwrap();
        m.update_dimension(Interior, Interior, Dimension::Area);
        assert!(!m.is_known());
        m.update_dimension(Interior, Exterior, Dimension::Area);
        assert!(m.is_known());
        assert!(!m.value());
    }

    #[test]
    fn test_exact_dimension_exceeded() {
        let mut m = PatternMatcher::matches("1********").unwrap();
        m.update_dimension(Interior, Interior, Dimension::Point);
        assert!(!m.is_known());
        m.update_dimension(Interior, Interior, Dimension::Line);
        assert!(!m.is_known());
        m.update_dimension(Interior, Interior, Dimension::Area);
        assert!(m.is_known() && !m.value());
    }

    #[test]
    fn test_settled_pattern_resolves_true_early() {
        let mut m = PatternMatcher::matches("T********").unwrap();
        m.update_dimension(Interior, Interior, Dimension::Point);
        assert!(m.is_known() && m.value());
    }

    #[test]
    fn test_finish_evaluates_remaining_cells() {
        let mut m = PatternMatcher::matches("FF*FF****").unwrap();
        assert!(!m.require_interaction());
        m.update_dimension(Interior, Exterior, Dimension::Area);
        m.finish();
        assert!(m.value());
    }

    #[test]
    fn test_exterior_cell_starts_as_area() {
        let mut m = PatternMatcher::matches("********2").unwrap();
        m.finish();
        assert!(m.value());
    }

    #[test]
    fn test_matrix_predicate_accumulates() {
        let mut p = RelateMatrixPredicate::new();
        p.update_dimension(Interior, Interior, Dimension::Line);
        p.update_dimension(Interior, Interior, Dimension::Point);
        p.update_dimension(Boundary, Exterior, Dimension::Point);
        p.finish();
        assert!(!p.is_known());
        assert_eq!(p.into_matrix().to_string(), "1FFFF0FF2");
    }
}
