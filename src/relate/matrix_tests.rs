use super::*;
use Location::*;

fn im(s: &str) -> IntersectionMatrix {
    s.parse().unwrap()
}

#[test]
fn test_display_round_trips() {
    let m = im("FF2F11212");
    assert_eq!(m.to_string(), "FF2F11212");
    assert_eq!(m.get(Interior, Exterior), Dimension::Area);
    assert_eq!(m.get(Boundary, Boundary), Dimension::Line);
}

#[test]
fn test_set_at_least_never_lowers() {
    let mut m = IntersectionMatrix::new();
    m.set_at_least(Interior, Interior, Dimension::Line);
    m.set_at_least(Interior, Interior, Dimension::Point);
    assert_eq!(m.get(Interior, Interior), Dimension::Line);
    m.set_at_least(Interior, Interior, Dimension::Area);
    assert_eq!(m.get(Interior, Interior), Dimension::Area);
}

#[test]
fn test_transpose() {
    let m = im("102FF1FF2");
    assert_eq!(m.transpose().to_string(), "1FF0FF212");
    assert_eq!(m.transpose().transpose(), m);
}

#[test]
fn test_pattern_matching() {
    let m = im("212101212");
    assert!(m.matches_str("T*T***T**").unwrap());
    assert!(m.matches_str("2********").unwrap());
    assert!(!m.matches_str("1********").unwrap());
    assert!(!m.matches_str("F********").unwrap());
    assert!(m.matches_str("*********").unwrap());
    assert!(m.matches_str("t*t***t**").unwrap());
}

#[test]
fn test_bad_patterns_rejected() {
    assert!(matches!(
        "T*F**FFF".parse::<Pattern>(),
        Err(RelateError::InvalidPattern { .. })
    ));
    assert!(matches!(
        "T*F**FFFX".parse::<Pattern>(),
        Err(RelateError::InvalidPattern { .. })
    ));
    assert!("T*F**FFF*".parse::<Pattern>().is_ok());
    assert!("T********".parse::<IntersectionMatrix>().is_err());
}

#[test]
fn test_named_tests_for_touching_squares() {
    // two unit squares sharing an edge
    let m = im("FF2F11212");
    assert!(m.is_touches(Dimension::Area, Dimension::Area));
    assert!(!m.is_overlaps(Dimension::Area, Dimension::Area));
    assert!(!m.is_contains());
    assert!(m.is_intersects());
}

#[test]
fn test_named_tests_for_nested_squares() {
    let m = im("212FF1FF2");
    assert!(m.is_contains());
    assert!(m.is_covers());
    assert!(!m.is_within());
    assert!(m.transpose().is_within());
    assert!(m.transpose().is_covered_by());
}

#[test]
fn test_line_crossing() {
    let m = im("0F1FF0102");
    assert!(m.is_crosses(Dimension::Line, Dimension::Line));
    assert!(!m.is_overlaps(Dimension::Line, Dimension::Line));
    assert!(!m.is_crosses(Dimension::Area, Dimension::Area));
}

#[test]
fn test_requires_interaction() {
    assert!("T********".parse::<Pattern>().unwrap().requires_interaction());
    assert!("***1*****".parse::<Pattern>().unwrap().requires_interaction());
    assert!(!"FF*FF****".parse::<Pattern>().unwrap().requires_interaction());
    assert!(!"**T******".parse::<Pattern>().unwrap().requires_interaction());
}
