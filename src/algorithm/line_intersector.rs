use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo_types::{Coord, Line};

/// Classified intersection of two segments.
///
/// Wraps `geo`'s robust segment intersection and exposes the queries the
/// noding and relate code need: the intersection points (one, or two for a
/// collinear overlap), properness, and whether a point lies strictly inside
/// one of the input segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentIntersection {
    points: [Coord<f64>; 2],
    count: usize,
    is_proper: bool,
    inputs: [Line<f64>; 2],
}

impl SegmentIntersection {
    /// Computes the intersection of segment `p0-p1` with `q0-q1`.
    /// Returns `None` when the segments are disjoint.
    pub fn compute(p0: Coord<f64>, p1: Coord<f64>, q0: Coord<f64>, q1: Coord<f64>) -> Option<Self> {
        let a = Line::new(p0, p1);
        let b = Line::new(q0, q1);
        let res = line_intersection(a, b)?;
        let inputs = [a, b];
        Some(match res {
            LineIntersection::SinglePoint { intersection, is_proper } => Self {
                points: [intersection, intersection],
                count: 1,
                is_proper,
                inputs,
            },
            LineIntersection::Collinear { intersection } => {
                if intersection.start == intersection.end {
                    Self {
                        points: [intersection.start, intersection.start],
                        count: 1,
                        is_proper: false,
                        inputs,
                    }
                } else {
                    Self {
                        points: [intersection.start, intersection.end],
                        count: 2,
                        is_proper: false,
                        inputs,
                    }
                }
            }
        })
    }

    pub fn points(&self) -> &[Coord<f64>] {
        &self.points[..self.count]
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_collinear(&self) -> bool {
        self.count == 2
    }

    /// An intersection strictly inside both segments.
    pub fn is_proper(&self) -> bool {
        self.is_proper
    }

    /// True if some intersection point is not an endpoint of the given input segment.
    pub fn is_interior_on(&self, input: usize) -> bool {
        let seg = self.inputs[input];
        self.points().iter().any(|p| *p != seg.start && *p != seg.end)
    }

    /// True if some intersection point is interior to either input segment.
    pub fn is_interior_intersection(&self) -> bool {
        self.is_interior_on(0) || self.is_interior_on(1)
    }

    pub fn input(&self, index: usize) -> Line<f64> {
        self.inputs[index]
    }
}
