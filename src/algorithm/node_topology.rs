//! Angular relationships between edges incident on a common node.
//!
//! Edges are compared by the direction of the ray from the node to a
//! second point. Angles increase CCW starting from the positive X axis,
//! computed exactly via quadrant + robust orientation.

use std::cmp::Ordering;

use geo::kernels::{Kernel, Orientation, RobustKernel};
use geo_types::Coord;

use crate::algorithm::octant::quadrant;

fn quadrant_from(origin: Coord<f64>, p: Coord<f64>) -> u8 {
    quadrant(p.x - origin.x, p.y - origin.y).unwrap_or(0)
}

/// Compares the angles of the rays `origin-p` and `origin-q`.
pub fn compare_angle(origin: Coord<f64>, p: Coord<f64>, q: Coord<f64>) -> Ordering {
    let quadrant_p = quadrant_from(origin, p);
    let quadrant_q = quadrant_from(origin, q);
    match quadrant_p.cmp(&quadrant_q) {
        Ordering::Equal => {}
        ord => return ord,
    }
    match RobustKernel::orient2d(origin, q, p) {
        Orientation::CounterClockwise => Ordering::Greater,
        Orientation::Clockwise => Ordering::Less,
        Orientation::Collinear => Ordering::Equal,
    }
}

/// Tests if the angle of `origin-p` is strictly greater than that of `origin-q`.
pub fn is_angle_greater(origin: Coord<f64>, p: Coord<f64>, q: Coord<f64>) -> bool {
    compare_angle(origin, p, q) == Ordering::Greater
}

/// Tests if `p` lies strictly between `e0` and `e1` in angle
/// (`e0` having the smaller angle).
pub fn is_between(origin: Coord<f64>, p: Coord<f64>, e0: Coord<f64>, e1: Coord<f64>) -> bool {
    if !is_angle_greater(origin, p, e0) {
        return false;
    }
    !is_angle_greater(origin, p, e1)
}

/// Position of `p` relative to the angular range `e0..e1`:
/// `Some(Greater)` if inside, `Some(Less)` if outside, `None` if collinear with either bound.
fn compare_between(origin: Coord<f64>, p: Coord<f64>, e0: Coord<f64>, e1: Coord<f64>) -> Option<Ordering> {
    let comp0 = compare_angle(origin, p, e0);
    if comp0 == Ordering::Equal {
        return None;
    }
    let comp1 = compare_angle(origin, p, e1);
    if comp1 == Ordering::Equal {
        return None;
    }
    if comp0 == Ordering::Greater && comp1 == Ordering::Less {
        return Some(Ordering::Greater);
    }
    Some(Ordering::Less)
}

/// Tests whether two polygon boundary wedges `a0-node-a1` and `b0-node-b1` cross at
/// the node. Collinear edges are reported as not crossing.
pub fn is_crossing(node: Coord<f64>, a0: Coord<f64>, a1: Coord<f64>, b0: Coord<f64>, b1: Coord<f64>) -> bool {
    let (a_lo, a_hi) = if is_angle_greater(node, a0, a1) { (a1, a0) } else { (a0, a1) };
    let Some(comp0) = compare_between(node, b0, a_lo, a_hi) else {
        return false;
    };
    let Some(comp1) = compare_between(node, b1, a_lo, a_hi) else {
        return false;
    };
    comp0 != comp1
}
