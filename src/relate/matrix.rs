use std::fmt;
use std::str::FromStr;

use crate::error::{RelateError, Result};

/// Topological location of a point relative to a geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Interior,
    Boundary,
    Exterior,
}

impl Location {
    pub const ALL: [Location; 3] = [Location::Interior, Location::Boundary, Location::Exterior];

    pub fn index(self) -> usize {
        match self {
            Location::Interior => 0,
            Location::Boundary => 1,
            Location::Exterior => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Location::Interior => 'i',
            Location::Boundary => 'b',
            Location::Exterior => 'e',
        }
    }
}

/// Dimension of a point set. Ordered so that values only grow as more
/// topology is discovered: `Empty < Point < Line < Area`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Dimension {
    #[default]
    Empty,
    Point,
    Line,
    Area,
}

impl Dimension {
    pub fn symbol(self) -> char {
        match self {
            Dimension::Empty => 'F',
            Dimension::Point => '0',
            Dimension::Line => '1',
            Dimension::Area => '2',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'F' | 'f' => Some(Dimension::Empty),
            '0' => Some(Dimension::Point),
            '1' => Some(Dimension::Line),
            '2' => Some(Dimension::Area),
            _ => None,
        }
    }

    pub fn is_non_empty(self) -> bool {
        self != Dimension::Empty
    }
}

/// A DE-9IM matrix: the dimension of the intersection of each of the
/// interior, boundary and exterior of geometry A with those of geometry B.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IntersectionMatrix {
    cells: [[Dimension; 3]; 3],
}

impl IntersectionMatrix {
    /// A matrix with every entry empty.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: Location, b: Location) -> Dimension {
        self.cells[a.index()][b.index()]
    }

    pub fn set(&mut self, a: Location, b: Location, dim: Dimension) {
        self.cells[a.index()][b.index()] = dim;
    }

    /// Raises an entry to `dim`. Never lowers it.
    pub fn set_at_least(&mut self, a: Location, b: Location, dim: Dimension) {
        let cell = &mut self.cells[a.index()][b.index()];
        if *cell < dim {
            *cell = dim;
        }
    }

    pub fn is_true(&self, a: Location, b: Location) -> bool {
        self.get(a, b).is_non_empty()
    }

    /// The matrix with the roles of A and B swapped.
    pub fn transpose(&self) -> Self {
        let mut t = Self::new();
        for a in Location::ALL {
            for b in Location::ALL {
                t.set(b, a, self.get(a, b));
            }
        }
        t
    }

    pub fn matches(&self, pattern: &Pattern) -> bool {
        Location::ALL
            .iter()
            .all(|&a| Location::ALL.iter().all(|&b| pattern.get(a, b).matches(self.get(a, b))))
    }

    /// Parses `pattern` and tests it against this matrix.
    pub fn matches_str(&self, pattern: &str) -> Result<bool> {
        Ok(self.matches(&pattern.parse()?))
    }

    pub fn is_disjoint(&self) -> bool {
        use Location::*;
        !self.is_true(Interior, Interior)
            && !self.is_true(Interior, Boundary)
            && !self.is_true(Boundary, Interior)
            && !self.is_true(Boundary, Boundary)
    }

    pub fn is_intersects(&self) -> bool {
        !self.is_disjoint()
    }

    pub fn is_contains(&self) -> bool {
        use Location::*;
        self.is_true(Interior, Interior) && !self.is_true(Exterior, Interior) && !self.is_true(Exterior, Boundary)
    }

    pub fn is_within(&self) -> bool {
        use Location::*;
        self.is_true(Interior, Interior) && !self.is_true(Interior, Exterior) && !self.is_true(Boundary, Exterior)
    }

    pub fn is_covers(&self) -> bool {
        use Location::*;
        let has_point_in_common = self.is_true(Interior, Interior)
            || self.is_true(Interior, Boundary)
            || self.is_true(Boundary, Interior)
            || self.is_true(Boundary, Boundary);
        has_point_in_common && !self.is_true(Exterior, Interior) && !self.is_true(Exterior, Boundary)
    }

    pub fn is_covered_by(&self) -> bool {
        use Location::*;
        let has_point_in_common = self.is_true(Interior, Interior)
            || self.is_true(Interior, Boundary)
            || self.is_true(Boundary, Interior)
            || self.is_true(Boundary, Boundary);
        has_point_in_common && !self.is_true(Interior, Exterior) && !self.is_true(Boundary, Exterior)
    }

    /// Touches needs the dimensions of the inputs, since it is undefined for two puntal geometries.
    pub fn is_touches(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::*;
        if dim_a > dim_b {
            return self.transpose().is_touches(dim_b, dim_a);
        }
        let applicable = matches!(
            (dim_a, dim_b),
            (Dimension::Area, Dimension::Area)
                | (Dimension::Line, Dimension::Line)
                | (Dimension::Line, Dimension::Area)
                | (Dimension::Point, Dimension::Area)
                | (Dimension::Point, Dimension::Line)
        );
        applicable
            && !self.is_true(Interior, Interior)
            && (self.is_true(Interior, Boundary) || self.is_true(Boundary, Interior) || self.is_true(Boundary, Boundary))
    }

    pub fn is_crosses(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::*;
        use Location::*;
        match (dim_a, dim_b) {
            (Point, Line) | (Point, Area) | (Line, Area) => {
                self.is_true(Interior, Interior) && self.is_true(Interior, Exterior)
            }
            (Line, Point) | (Area, Point) | (Area, Line) => {
                self.is_true(Interior, Interior) && self.is_true(Exterior, Interior)
            }
            (Line, Line) => self.get(Interior, Interior) == Point,
            _ => false,
        }
    }

    pub fn is_overlaps(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Dimension::*;
        use Location::*;
        match (dim_a, dim_b) {
            (Point, Point) | (Area, Area) => {
                self.is_true(Interior, Interior) && self.is_true(Interior, Exterior) && self.is_true(Exterior, Interior)
            }
            (Line, Line) => {
                self.get(Interior, Interior) == Line
                    && self.is_true(Interior, Exterior)
                    && self.is_true(Exterior, Interior)
            }
            _ => false,
        }
    }

    /// Topological equality. Geometries of different dimension are never equal.
    pub fn is_equals(&self, dim_a: Dimension, dim_b: Dimension) -> bool {
        use Location::*;
        if dim_a != dim_b {
            return false;
        }
        self.is_true(Interior, Interior)
            && !self.is_true(Interior, Exterior)
            && !self.is_true(Boundary, Exterior)
            && !self.is_true(Exterior, Interior)
            && !self.is_true(Exterior, Boundary)
    }
}

impl fmt::Display for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for a in Location::ALL {
            for b in Location::ALL {
                write!(f, "{}", self.get(a, b).symbol())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for IntersectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntersectionMatrix({self})")
    }
}

impl FromStr for IntersectionMatrix {
    type Err = RelateError;

    /// Parses a fully specified matrix such as `"212101212"`.
    fn from_str(s: &str) -> Result<Self> {
        let chars = pattern_chars(s)?;
        let mut m = Self::new();
        for (i, c) in chars.into_iter().enumerate() {
            let dim = Dimension::from_symbol(c).ok_or_else(|| RelateError::InvalidPattern {
                pattern: s.to_string(),
                reason: format!("'{c}' is not a matrix dimension"),
            })?;
            m.cells[i / 3][i % 3] = dim;
        }
        Ok(m)
    }
}

/// One entry of a DE-9IM pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PatternCell {
    /// `F`: the intersection must be empty.
    Empty,
    /// `0`, `1` or `2`: the intersection must have exactly this dimension.
    Exactly(Dimension),
    /// `T`: the intersection must be non-empty.
    NonEmpty,
    /// `*`: anything.
    Any,
}

impl PatternCell {
    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            'F' | 'f' => Some(PatternCell::Empty),
            'T' | 't' => Some(PatternCell::NonEmpty),
            '*' => Some(PatternCell::Any),
            '0' => Some(PatternCell::Exactly(Dimension::Point)),
            '1' => Some(PatternCell::Exactly(Dimension::Line)),
            '2' => Some(PatternCell::Exactly(Dimension::Area)),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            PatternCell::Empty => 'F',
            PatternCell::Exactly(d) => d.symbol(),
            PatternCell::NonEmpty => 'T',
            PatternCell::Any => '*',
        }
    }

    pub fn matches(self, dim: Dimension) -> bool {
        match self {
            PatternCell::Empty => dim == Dimension::Empty,
            PatternCell::Exactly(d) => dim == d,
            PatternCell::NonEmpty => dim.is_non_empty(),
            PatternCell::Any => true,
        }
    }

    /// True if the cell constrains the geometries to share a point.
    pub fn requires_interaction(self) -> bool {
        matches!(self, PatternCell::NonEmpty | PatternCell::Exactly(_))
    }
}

/// A DE-9IM pattern such as `"T*F**FFF*"`, in row-major A×B order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pattern {
    cells: [[PatternCell; 3]; 3],
}

impl Pattern {
    pub fn get(&self, a: Location, b: Location) -> PatternCell {
        self.cells[a.index()][b.index()]
    }

    /// True if the pattern requires some interior or boundary of A to meet
    /// some interior or boundary of B.
    pub fn requires_interaction(&self) -> bool {
        use Location::*;
        [(Interior, Interior), (Interior, Boundary), (Boundary, Interior), (Boundary, Boundary)]
            .iter()
            .any(|&(a, b)| self.get(a, b).requires_interaction())
    }
}

fn pattern_chars(s: &str) -> Result<Vec<char>> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() != 9 {
        return Err(RelateError::InvalidPattern {
            pattern: s.to_string(),
            reason: format!("expected 9 characters, found {}", chars.len()),
        });
    }
    Ok(chars)
}

impl FromStr for Pattern {
    type Err = RelateError;

    fn from_str(s: &str) -> Result<Self> {
        let chars = pattern_chars(s)?;
        let mut cells = [[PatternCell::Any; 3]; 3];
        for (i, c) in chars.into_iter().enumerate() {
            cells[i / 3][i % 3] = PatternCell::from_symbol(c).ok_or_else(|| RelateError::InvalidPattern {
                pattern: s.to_string(),
                reason: format!("'{c}' is not one of 0, 1, 2, T, F, *"),
            })?;
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({self})")
    }
}

#[cfg(test)]
#[path = "matrix_tests.rs"]
mod tests;
