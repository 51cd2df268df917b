use super::*;

#[test]
fn load_diag_is_corner_order_independent() {
    let mut a = Bounds::NONE;
    a.load_diag(2.0, 2.0, 0.0, 0.0);
    let mut b = Bounds::NONE;
    b.load_diag(0.0, 0.0, 2.0, 2.0);
    assert_eq!(a, b);
    assert_eq!(a, Bounds::new(0.0, 0.0, 2.0, 2.0));
}

#[test]
fn union_covers_both() {
    let mut a = Bounds::new(0.0, 0.0, 2.0, 2.0);
    let b = Bounds::new(5.0, 4.0, 1.0, 1.0);
    a.add(&b);
    assert_eq!(a, Bounds::new(0.0, 0.0, 6.0, 5.0));
    assert_eq!(a.max_x(), 6.0);
    assert_eq!(a.max_y(), 5.0);
}

#[test]
fn none_is_union_identity() {
    let b = Bounds::new(1.0, 2.0, 3.0, 4.0);

    // NONE ∪ b == b
    let mut lhs = Bounds::NONE;
    lhs.add(&b);
    assert_eq!(lhs, b);

    // b ∪ NONE is a no-op
    let mut rhs = b;
    rhs.add(&Bounds::NONE);
    assert_eq!(rhs, b);
}

#[test]
fn add_point_extends() {
    let mut b = Bounds::new(0.0, 0.0, 1.0, 1.0);
    b.add_point(Point::new(3.0, -1.0));
    assert_eq!(b, Bounds::new(0.0, -1.0, 3.0, 2.0));

    // a point inside changes nothing
    b.add_point(Point::new(1.0, 0.0));
    assert_eq!(b, Bounds::new(0.0, -1.0, 3.0, 2.0));
}

#[test]
#[should_panic(expected = "requires existing bounds")]
fn add_point_on_none_panics() {
    let mut b = Bounds::NONE;
    b.add_point(Point::new(1.0, 1.0));
}

#[test]
fn to_points_is_clockwise_from_top_left() {
    let b = Bounds::new(1.0, 2.0, 10.0, 20.0);
    let pts = b.to_points();
    assert_eq!(pts[0], Point::new(1.0, 2.0));
    assert_eq!(pts[1], Point::new(11.0, 2.0));
    assert_eq!(pts[2], Point::new(11.0, 22.0));
    assert_eq!(pts[3], Point::new(1.0, 22.0));
}

#[test]
fn sentinel_does_not_exist() {
    assert!(!Bounds::NONE.exists());
    assert!(Bounds::new(0.0, 0.0, 0.0, 0.0).exists());
    assert!(Bounds::NONE.to_rect().is_none());
}

#[test]
fn kurbo_rect_roundtrip() {
    let b = Bounds::new(1.0, 2.0, 3.0, 4.0);
    let r = b.to_rect().unwrap();
    assert_eq!(Bounds::from(r), b);
}
