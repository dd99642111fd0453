use geo::Relate;
use geo_relate_ng::{predicate, relate, relate_with};
use geo_types::{Geometry, LineString, Point, Rect};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Rectangles, points and axis-parallel lines on a small integer grid, so
/// shared edges, touching corners and collinear overlaps are common.
fn random_geometry(rng: &mut StdRng) -> Geometry<f64> {
    let x = rng.gen_range(0..8) as f64;
    let y = rng.gen_range(0..8) as f64;
    let w = rng.gen_range(1..5) as f64;
    let h = rng.gen_range(1..5) as f64;
    match rng.gen_range(0..4) {
        0 => Point::new(x, y).into(),
        1 => LineString::from(vec![(x, y), (x + w, y)]).into(),
        2 => LineString::from(vec![(x, y), (x, y + h), (x + w, y + h)]).into(),
        _ => Rect::new((x, y), (x + w, y + h)).to_polygon().into(),
    }
}

#[test]
fn test_matrix_agrees_with_geo_relate() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..400 {
        let a = random_geometry(&mut rng);
        let b = random_geometry(&mut rng);
        let ours = relate(&a, &b);
        let theirs = a.relate(&b);
        assert!(
            theirs.matches(&ours.to_string()).unwrap(),
            "matrix {} disagrees with geo for {:?} / {:?}",
            ours,
            a,
            b
        );
    }
}

#[test]
fn test_short_circuit_agrees_with_full_matrix() {
    let mut rng = StdRng::seed_from_u64(99);
    for _ in 0..400 {
        let a = random_geometry(&mut rng);
        let b = random_geometry(&mut rng);
        let im = relate(&a, &b);
        assert_eq!(relate_with(&a, &b, &mut predicate::intersects()), im.is_intersects(), "{:?} / {:?}", a, b);
        assert_eq!(relate_with(&a, &b, &mut predicate::contains()), im.is_contains(), "{:?} / {:?}", a, b);
        assert_eq!(relate_with(&a, &b, &mut predicate::covered_by()), im.is_covered_by(), "{:?} / {:?}", a, b);
        assert_eq!(relate(&b, &a), im.transpose());
    }
}
