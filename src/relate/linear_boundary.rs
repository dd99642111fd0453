use std::collections::HashMap;

use geo_types::{Coord, LineString};

use crate::utils::CoordKey;

/// Decides which endpoints of linear geometry form its boundary, given how
/// many line ends meet at a point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoundaryNodeRule {
    /// OGC rule: a point is on the boundary if an odd number of ends meet there.
    #[default]
    Mod2,
    /// Every line end is a boundary point.
    EndPoint,
    /// Points where more than one line end meets are boundary points.
    MultivalentEndPoint,
    /// Points where exactly one line end meets are boundary points.
    MonovalentEndPoint,
}

impl BoundaryNodeRule {
    pub fn is_in_boundary(self, degree: usize) -> bool {
        match self {
            BoundaryNodeRule::Mod2 => degree % 2 == 1,
            BoundaryNodeRule::EndPoint => degree > 0,
            BoundaryNodeRule::MultivalentEndPoint => degree > 1,
            BoundaryNodeRule::MonovalentEndPoint => degree == 1,
        }
    }
}

/// Boundary points of a set of lines under a boundary node rule.
#[derive(Clone, Debug)]
pub struct LinearBoundary {
    vertex_degree: HashMap<CoordKey, usize>,
    has_boundary: bool,
    rule: BoundaryNodeRule,
}

impl LinearBoundary {
    pub fn new<'a>(lines: impl IntoIterator<Item = &'a LineString<f64>>, rule: BoundaryNodeRule) -> Self {
        let mut vertex_degree: HashMap<CoordKey, usize> = HashMap::new();
        for line in lines {
            // a closed line adds two ends at its start point
            if line.0.is_empty() {
                continue;
            }
            for end in [line.0[0], line.0[line.0.len() - 1]] {
                *vertex_degree.entry(CoordKey::from(end)).or_insert(0) += 1;
            }
        }
        let has_boundary = vertex_degree.values().any(|&degree| rule.is_in_boundary(degree));
        Self {
            vertex_degree,
            has_boundary,
            rule,
        }
    }

    pub fn has_boundary(&self) -> bool {
        self.has_boundary
    }

    pub fn is_boundary(&self, pt: Coord<f64>) -> bool {
        self.vertex_degree
            .get(&CoordKey::from(pt))
            .is_some_and(|&degree| self.rule.is_in_boundary(degree))
    }
}
