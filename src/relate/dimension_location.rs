use crate::relate::matrix::{Dimension, Location};

/// A location together with the dimension of the element it was found on,
/// as produced by point location in mixed-dimension geometries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DimensionLocation {
    Exterior,
    PointInterior,
    LineInterior,
    LineBoundary,
    AreaInterior,
    AreaBoundary,
}

impl DimensionLocation {
    pub fn area(loc: Location) -> Self {
        match loc {
            Location::Interior => DimensionLocation::AreaInterior,
            Location::Boundary => DimensionLocation::AreaBoundary,
            Location::Exterior => DimensionLocation::Exterior,
        }
    }

    pub fn line(loc: Location) -> Self {
        match loc {
            Location::Interior => DimensionLocation::LineInterior,
            Location::Boundary => DimensionLocation::LineBoundary,
            Location::Exterior => DimensionLocation::Exterior,
        }
    }

    pub fn point(loc: Location) -> Self {
        match loc {
            Location::Interior => DimensionLocation::PointInterior,
            _ => DimensionLocation::Exterior,
        }
    }

    pub fn location(self) -> Location {
        match self {
            DimensionLocation::PointInterior | DimensionLocation::LineInterior | DimensionLocation::AreaInterior => {
                Location::Interior
            }
            DimensionLocation::LineBoundary | DimensionLocation::AreaBoundary => Location::Boundary,
            DimensionLocation::Exterior => Location::Exterior,
        }
    }

    pub fn dimension(self) -> Dimension {
        match self {
            DimensionLocation::PointInterior => Dimension::Point,
            DimensionLocation::LineInterior | DimensionLocation::LineBoundary => Dimension::Line,
            DimensionLocation::AreaInterior | DimensionLocation::AreaBoundary => Dimension::Area,
            DimensionLocation::Exterior => Dimension::Empty,
        }
    }

    /// The element dimension, or `exterior_dim` for an exterior location.
    pub fn dimension_or(self, exterior_dim: Dimension) -> Dimension {
        match self {
            DimensionLocation::Exterior => exterior_dim,
            _ => self.dimension(),
        }
    }
}
