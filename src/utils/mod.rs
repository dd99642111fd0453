use geo_types::{Coord, Rect};

pub mod parallel;

/// Hashable key for exact 2D coordinate equality.
/// `-0.0` and `0.0` map to the same key, matching `==` on `f64`.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub struct CoordKey(u64, u64);

impl From<Coord<f64>> for CoordKey {
    fn from(c: Coord<f64>) -> Self {
        CoordKey(canonical_bits(c.x), canonical_bits(c.y))
    }
}

fn canonical_bits(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else {
        f.to_bits()
    }
}

/// Envelope of a coordinate slice, `None` when empty.
pub fn envelope_of(coords: &[Coord<f64>]) -> Option<Rect<f64>> {
    let first = coords.first()?;
    let mut min = *first;
    let mut max = *first;
    for c in &coords[1..] {
        min.x = min.x.min(c.x);
        min.y = min.y.min(c.y);
        max.x = max.x.max(c.x);
        max.y = max.y.max(c.y);
    }
    Some(Rect::new(min, max))
}

pub fn envelope_intersects(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    !(a.min().x > b.max().x || a.max().x < b.min().x || a.min().y > b.max().y || a.max().y < b.min().y)
}

/// Tests whether `a` covers `b` (closed containment).
pub fn envelope_covers(a: &Rect<f64>, b: &Rect<f64>) -> bool {
    b.min().x >= a.min().x && b.max().x <= a.max().x && b.min().y >= a.min().y && b.max().y <= a.max().y
}

pub fn envelope_covers_coord(env: &Rect<f64>, c: Coord<f64>) -> bool {
    c.x >= env.min().x && c.x <= env.max().x && c.y >= env.min().y && c.y <= env.max().y
}

pub fn envelope_intersection(a: &Rect<f64>, b: &Rect<f64>) -> Option<Rect<f64>> {
    if !envelope_intersects(a, b) {
        return None;
    }
    Some(Rect::new(
        Coord { x: a.min().x.max(b.min().x), y: a.min().y.max(b.min().y) },
        Coord { x: a.max().x.min(b.max().x), y: a.max().y.min(b.max().y) },
    ))
}

pub fn envelope_expand(env: &Rect<f64>, distance: f64) -> Rect<f64> {
    if distance == 0.0 {
        return *env;
    }
    Rect::new(
        Coord { x: env.min().x - distance, y: env.min().y - distance },
        Coord { x: env.max().x + distance, y: env.max().y + distance },
    )
}

/// Envelope intersection test for two segments given by endpoints.
#[inline]
pub fn segment_envelopes_intersect(p1: Coord<f64>, p2: Coord<f64>, q1: Coord<f64>, q2: Coord<f64>) -> bool {
    let min_q = q1.x.min(q2.x);
    let max_q = q1.x.max(q2.x);
    let min_p = p1.x.min(p2.x);
    let max_p = p1.x.max(p2.x);
    if min_p > max_q || max_p < min_q {
        return false;
    }
    let min_q = q1.y.min(q2.y);
    let max_q = q1.y.max(q2.y);
    let min_p = p1.y.min(p2.y);
    let max_p = p1.y.max(p2.y);
    !(min_p > max_q || max_p < min_q)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_key_signed_zero() {
        let a = CoordKey::from(Coord { x: 0.0, y: -0.0 });
        let b = CoordKey::from(Coord { x: -0.0, y: 0.0 });
        assert_eq!(a, b);
    }

    #[test]
    fn test_envelope_ops() {
        let a = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 10.0, y: 10.0 });
        let b = Rect::new(Coord { x: 5.0, y: 5.0 }, Coord { x: 15.0, y: 15.0 });
        let c = Rect::new(Coord { x: 2.0, y: 2.0 }, Coord { x: 3.0, y: 3.0 });

        assert!(envelope_intersects(&a, &b));
        assert!(envelope_covers(&a, &c));
        assert!(!envelope_covers(&a, &b));

        let i = envelope_intersection(&a, &b).unwrap();
        assert_eq!(i.min(), Coord { x: 5.0, y: 5.0 });
        assert_eq!(i.max(), Coord { x: 10.0, y: 10.0 });

        let far = Rect::new(Coord { x: 20.0, y: 20.0 }, Coord { x: 30.0, y: 30.0 });
        assert!(envelope_intersection(&a, &far).is_none());
        assert!(envelope_intersects(&envelope_expand(&b, 5.0), &far));
    }
}
