use geo_types::Coord;

/// Octant of a direction vector, numbered CCW from the positive X axis:
///
/// ```text
///    \2|1/
///   3 \|/ 0
///   ---+---
///   4 /|\ 7
///    /5|6\
/// ```
///
/// Returns `None` for the zero vector.
pub fn octant(dx: f64, dy: f64) -> Option<u8> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let adx = dx.abs();
    let ady = dy.abs();
    let oct = if dx >= 0.0 {
        if dy >= 0.0 {
            if adx >= ady { 0 } else { 1 }
        } else if adx >= ady {
            7
        } else {
            6
        }
    } else if dy >= 0.0 {
        if adx >= ady { 3 } else { 2 }
    } else if adx >= ady {
        4
    } else {
        5
    };
    Some(oct)
}

pub fn octant_of(p0: Coord<f64>, p1: Coord<f64>) -> Option<u8> {
    octant(p1.x - p0.x, p1.y - p0.y)
}

/// Quadrant of a direction vector: 0 = NE, 1 = NW, 2 = SW, 3 = SE.
/// Returns `None` for the zero vector.
pub fn quadrant(dx: f64, dy: f64) -> Option<u8> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    Some(if dx >= 0.0 {
        if dy >= 0.0 { 0 } else { 3 }
    } else if dy >= 0.0 {
        1
    } else {
        2
    })
}
