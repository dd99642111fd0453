use geo_relate_ng::predicate;
use geo_relate_ng::relate::{RelateGeometry, RelateNG};
use geo_relate_ng::{relate, relate_pattern, relate_with, relate_with_rule, BoundaryNodeRule, Dimension, Location};
use geo_types::{line_string, point, polygon, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint};

fn square(x0: f64, y0: f64, size: f64) -> Geometry<f64> {
    polygon![
        (x: x0, y: y0),
        (x: x0 + size, y: y0),
        (x: x0 + size, y: y0 + size),
        (x: x0, y: y0 + size),
        (x: x0, y: y0),
    ]
    .into()
}

fn empty() -> Geometry<f64> {
    Geometry::MultiPoint(MultiPoint::new(vec![]))
}

#[test]
fn test_point_on_line() {
    let pt: Geometry<f64> = point!(x: 5.0, y: 5.0).into();
    let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 10.0)].into();

    assert!(relate_with(&pt, &line, &mut predicate::intersects()));
    assert!(!relate_with(&pt, &line, &mut predicate::disjoint()));
    assert!(relate_with(&pt, &line, &mut predicate::within()));
    assert_eq!(relate(&pt, &line).to_string(), "0FFFFF102");
}

#[test]
fn test_squares_sharing_an_edge() {
    let a = square(0.0, 0.0, 1.0);
    let b = square(1.0, 0.0, 1.0);

    assert!(relate_with(&a, &b, &mut predicate::touches()));
    assert!(!relate_with(&a, &b, &mut predicate::overlaps()));
    assert!(!relate_with(&a, &b, &mut predicate::contains()));
    assert!(relate_with(&a, &b, &mut predicate::intersects()));
    assert_eq!(relate(&a, &b).to_string(), "FF2F11212");
}

#[test]
fn test_overlapping_squares() {
    let a = square(0.0, 0.0, 2.0);
    let b = square(1.0, 1.0, 2.0);

    assert!(relate_with(&a, &b, &mut predicate::overlaps()));
    assert!(!relate_with(&a, &b, &mut predicate::touches()));
    assert!(relate_pattern(&a, &b, "T********").unwrap());
    assert_eq!(relate(&a, &b).to_string(), "212101212");
}

#[test]
fn test_crossing_lines() {
    let a: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 10.0)].into();
    let b: Geometry<f64> = line_string![(x: 0.0, y: 10.0), (x: 10.0, y: 0.0)].into();

    assert!(relate_with(&a, &b, &mut predicate::crosses()));
    assert!(!relate_with(&a, &b, &mut predicate::touches()));
    assert_eq!(relate(&a, &b).to_string(), "0F1FF0102");
}

#[test]
fn test_polygon_contains_point_and_line() {
    let poly = square(0.0, 0.0, 10.0);
    let pt: Geometry<f64> = point!(x: 5.0, y: 5.0).into();
    let line: Geometry<f64> = line_string![(x: 2.0, y: 2.0), (x: 8.0, y: 8.0)].into();

    assert!(relate_with(&poly, &pt, &mut predicate::contains()));
    assert!(relate_with(&pt, &poly, &mut predicate::within()));
    assert!(relate_with(&poly, &line, &mut predicate::contains()));
    assert!(relate_with(&poly, &line, &mut predicate::covers()));
    assert_eq!(relate(&pt, &poly).to_string(), "0FFFFF212");
}

#[test]
fn test_point_on_polygon_boundary() {
    let poly = square(0.0, 0.0, 10.0);
    let pt: Geometry<f64> = point!(x: 10.0, y: 5.0).into();

    assert!(!relate_with(&poly, &pt, &mut predicate::contains()));
    assert!(relate_with(&poly, &pt, &mut predicate::covers()));
    assert!(relate_with(&poly, &pt, &mut predicate::touches()));
}

#[test]
fn test_hole_touching_shell() {
    // the hole meets the shell at (0, 5)
    let poly: Geometry<f64> = geo_types::Polygon::new(
        LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
        vec![LineString::from(vec![(0.0, 5.0), (5.0, 3.0), (5.0, 7.0), (0.0, 5.0)])],
    )
    .into();

    let geom = RelateGeometry::new(&poly, BoundaryNodeRule::Mod2);
    assert_eq!(geom.locate_with_dim(geo_types::coord! { x: 0.0, y: 5.0 }).location(), Location::Boundary);
    assert_eq!(geom.locate_with_dim(geo_types::coord! { x: 3.0, y: 5.0 }).location(), Location::Exterior);

    // a line passing through the touch point only meets the boundary
    let line: Geometry<f64> = line_string![(x: -1.0, y: 5.0), (x: 1.0, y: 5.0)].into();
    let im = relate(&line, &poly);
    assert_eq!(im.get(Location::Interior, Location::Interior), Dimension::Empty);
    assert!(relate_with(&line, &poly, &mut predicate::touches()));

    assert!(relate_with(&poly, &point!(x: 8.0, y: 5.0).into(), &mut predicate::contains()));
    assert!(relate_with(&poly, &point!(x: 3.0, y: 5.0).into(), &mut predicate::disjoint()));
    assert!(relate_with(&poly, &poly, &mut predicate::equals_topo()));
}

#[test]
fn test_adjacent_polygons_in_collection() {
    let gc = Geometry::GeometryCollection(GeometryCollection::new_from(vec![
        square(0.0, 0.0, 1.0),
        square(1.0, 0.0, 1.0),
    ]));
    let on_shared_edge: Geometry<f64> = point!(x: 1.0, y: 0.5).into();

    assert!(relate_with(&gc, &on_shared_edge, &mut predicate::contains()));
    assert!(!relate_with(&gc, &on_shared_edge, &mut predicate::touches()));
    assert!(relate_with(&gc, &point!(x: 1.0, y: 0.0).into(), &mut predicate::touches()));
}

#[test]
fn test_collection_points_covered_by_area() {
    let gc = Geometry::GeometryCollection(GeometryCollection::new_from(vec![
        square(0.0, 0.0, 10.0),
        point!(x: 5.0, y: 5.0).into(),
    ]));
    let target = square(-1.0, -1.0, 12.0);
    assert!(relate_with(&target, &gc, &mut predicate::contains()));
    assert!(relate_with(&gc, &target, &mut predicate::within()));
}

#[test]
fn test_empty_inputs() {
    let pt: Geometry<f64> = point!(x: 1.0, y: 1.0).into();

    assert!(relate_with(&empty(), &empty(), &mut predicate::equals_topo()));
    assert!(!relate_with(&empty(), &empty(), &mut predicate::intersects()));
    assert!(relate_with(&empty(), &pt, &mut predicate::disjoint()));
    assert!(!relate_with(&empty(), &pt, &mut predicate::intersects()));
    assert!(!relate_with(&pt, &empty(), &mut predicate::contains()));
    assert!(!relate_with(&pt, &empty(), &mut predicate::equals_topo()));

    assert_eq!(relate(&empty(), &empty()).to_string(), "FFFFFFFF2");
    assert_eq!(relate(&pt, &empty()).to_string(), "FF0FFFFF2");
    assert_eq!(relate(&empty(), &square(0.0, 0.0, 1.0)).to_string(), "FFFFFF212");
}

#[test]
fn test_boundary_node_rule() {
    let pt: Geometry<f64> = point!(x: 1.0, y: 0.0).into();
    let lines = Geometry::MultiLineString(MultiLineString::new(vec![
        line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0)],
        line_string![(x: 1.0, y: 0.0), (x: 2.0, y: 0.0)],
    ]));

    let mod2 = relate(&pt, &lines);
    assert_eq!(mod2.get(Location::Interior, Location::Interior), Dimension::Point);
    assert_eq!(mod2.get(Location::Interior, Location::Boundary), Dimension::Empty);

    let endpoint = relate_with_rule(&pt, &lines, BoundaryNodeRule::EndPoint);
    assert_eq!(endpoint.get(Location::Interior, Location::Interior), Dimension::Empty);
    assert_eq!(endpoint.get(Location::Interior, Location::Boundary), Dimension::Point);
}

#[test]
fn test_closed_line_start_under_boundary_rules() {
    let ring: Geometry<f64> =
        line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)].into();
    let pt: Geometry<f64> = point!(x: 0.0, y: 0.0).into();

    let mod2 = relate(&ring, &pt);
    assert_eq!(mod2.get(Location::Interior, Location::Interior), Dimension::Point);
    assert_eq!(mod2.get(Location::Boundary, Location::Interior), Dimension::Empty);

    let endpoint = relate_with_rule(&ring, &pt, BoundaryNodeRule::EndPoint);
    assert_eq!(endpoint.get(Location::Boundary, Location::Interior), Dimension::Point);
    assert_eq!(endpoint.get(Location::Interior, Location::Interior), Dimension::Empty);

    let multi = relate_with_rule(&ring, &pt, BoundaryNodeRule::MultivalentEndPoint);
    assert_eq!(multi.get(Location::Boundary, Location::Interior), Dimension::Point);

    let mono = relate_with_rule(&ring, &pt, BoundaryNodeRule::MonovalentEndPoint);
    assert_eq!(mono.get(Location::Interior, Location::Interior), Dimension::Point);
}

#[test]
fn test_invalid_pattern_rejected() {
    let a = square(0.0, 0.0, 1.0);
    assert!(relate_pattern(&a, &a, "T*F").is_err());
    assert!(relate_pattern(&a, &a, "T*F**FFFX").is_err());
}

#[test]
fn test_prepared_matches_unprepared() {
    let a: Geometry<f64> = geo_types::Polygon::new(
        LineString::from(vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0), (0.0, 0.0)]),
        vec![LineString::from(vec![(3.0, 3.0), (3.0, 7.0), (7.0, 7.0), (7.0, 3.0), (3.0, 3.0)])],
    )
    .into();
    let targets = sample_geometries();
    let prepared = RelateNG::prepare(&a);
    for b in &targets {
        assert_eq!(prepared.evaluate_matrix(b), relate(&a, b), "target {:?}", b);
    }

    let all = prepared.evaluate_all(&targets, predicate::intersects);
    let expected: Vec<bool> = targets.iter().map(|b| relate(&a, b).is_intersects()).collect();
    assert_eq!(all, expected);
}

fn sample_geometries() -> Vec<Geometry<f64>> {
    vec![
        square(0.0, 0.0, 10.0),
        square(2.0, 2.0, 2.0),
        square(4.0, 4.0, 2.0),
        square(8.0, 8.0, 5.0),
        square(10.0, 0.0, 3.0),
        square(20.0, 20.0, 1.0),
        point!(x: 5.0, y: 5.0).into(),
        point!(x: 1.0, y: 1.0).into(),
        point!(x: 10.0, y: 3.0).into(),
        line_string![(x: -5.0, y: 5.0), (x: 15.0, y: 5.0)].into(),
        line_string![(x: 1.0, y: 1.0), (x: 2.0, y: 2.0)].into(),
        line_string![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0)].into(),
        line_string![(x: 0.0, y: 10.0), (x: 5.0, y: 10.0), (x: 5.0, y: 12.0)].into(),
        Geometry::MultiPoint(MultiPoint::from(vec![(1.0, 1.0), (5.0, 5.0), (20.0, 20.0)])),
    ]
}

#[test]
fn test_predicate_symmetry() {
    let geoms = sample_geometries();
    for a in &geoms {
        for b in &geoms {
            assert_eq!(
                relate_with(a, b, &mut predicate::contains()),
                relate_with(b, a, &mut predicate::within()),
                "contains/within {:?} {:?}",
                a,
                b
            );
            assert_eq!(
                relate_with(a, b, &mut predicate::covers()),
                relate_with(b, a, &mut predicate::covered_by()),
                "covers/coveredBy {:?} {:?}",
                a,
                b
            );
            let intersects = relate_with(a, b, &mut predicate::intersects());
            assert_eq!(intersects, relate_with(b, a, &mut predicate::intersects()));
            assert_eq!(!intersects, relate_with(a, b, &mut predicate::disjoint()));
            assert_eq!(relate(a, b).transpose(), relate(b, a));
        }
    }
}

#[test]
fn test_named_predicates_match_matrix() {
    let geoms = sample_geometries();
    for a in &geoms {
        let dim_a = RelateGeometry::new(a, BoundaryNodeRule::Mod2).dimension();
        for b in &geoms {
            let dim_b = RelateGeometry::new(b, BoundaryNodeRule::Mod2).dimension();
            let im = relate(a, b);
            let ctx = format!("{:?} {:?} {}", a, b, im);
            assert_eq!(relate_with(a, b, &mut predicate::intersects()), im.is_intersects(), "{}", ctx);
            assert_eq!(relate_with(a, b, &mut predicate::contains()), im.is_contains(), "{}", ctx);
            assert_eq!(relate_with(a, b, &mut predicate::within()), im.is_within(), "{}", ctx);
            assert_eq!(relate_with(a, b, &mut predicate::covers()), im.is_covers(), "{}", ctx);
            assert_eq!(relate_with(a, b, &mut predicate::covered_by()), im.is_covered_by(), "{}", ctx);
            assert_eq!(relate_with(a, b, &mut predicate::touches()), im.is_touches(dim_a, dim_b), "{}", ctx);
            assert_eq!(relate_with(a, b, &mut predicate::crosses()), im.is_crosses(dim_a, dim_b), "{}", ctx);
            assert_eq!(relate_with(a, b, &mut predicate::overlaps()), im.is_overlaps(dim_a, dim_b), "{}", ctx);
            assert_eq!(relate_with(a, b, &mut predicate::equals_topo()), im.is_equals(dim_a, dim_b), "{}", ctx);
            assert!(relate_pattern(a, b, &im.to_string()).unwrap(), "{}", ctx);
        }
    }
}
