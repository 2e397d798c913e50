use super::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn a_horizontal_line_inserts_no_segment() {
    let mut approximator = SegmentApproximator::new(1, 1.0);
    approximator.insert_line(FloatPoint::new(0.0, 5.0), FloatPoint::new(10.0, 5.0));
    assert!(approximator.segments().is_empty());
}

#[test]
fn insert_line_scales_into_supersampled_space() {
    let mut approximator = SegmentApproximator::new(4, 1.0);
    approximator.insert_line(FloatPoint::new(1.0, 1.0), FloatPoint::new(1.0, 2.0));
    let segments = approximator.segments();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].from.y, 4.0);
    assert_eq!(segments[0].to.y, 8.0);
    assert_eq!(segments[0].from.x, 4.0);
}

#[test]
fn a_flat_quadratic_curve_is_not_subdivided() {
    let mut approximator = SegmentApproximator::new(4, 1.0);
    // Collinear control point: the curve is a straight line in disguise, so
    // the flatness test should accept it on the first try.
    approximator.insert_quad_curve(FloatPoint::new(0.0, 0.0), FloatPoint::new(5.0, 0.2), FloatPoint::new(10.0, 0.4));
    let segments = approximator.segments();
    assert_eq!(segments.len(), 1);
}

#[test]
fn a_sharply_curved_quadratic_is_subdivided_into_several_lines() {
    let mut approximator = SegmentApproximator::new(16, 1.0);
    approximator.insert_quad_curve(FloatPoint::new(0.0, 0.0), FloatPoint::new(0.0, 20.0), FloatPoint::new(20.0, 20.0));
    let segments = approximator.segments();
    assert!(segments.len() > 1, "a sharp curve should flatten into multiple segments, got {}", segments.len());
}

#[test]
fn a_sharply_curved_cubic_is_subdivided_into_several_lines() {
    let mut approximator = SegmentApproximator::new(16, 1.0);
    approximator.insert_bezier_curve(
        FloatPoint::new(0.0, 0.0),
        FloatPoint::new(0.0, 20.0),
        FloatPoint::new(20.0, 0.0),
        FloatPoint::new(20.0, 20.0),
    );
    let segments = approximator.segments();
    assert!(segments.len() > 1);
}

#[test]
fn a_full_circle_arc_approximates_within_tolerance_of_the_analytic_bounding_box() {
    let mut approximator = SegmentApproximator::new(16, 1.0);
    let center = FloatPoint::new(0.0, 0.0);
    let radius = (10.0, 10.0);
    let start = FloatPoint::new(10.0, 0.0);
    approximator.insert_arc(
        start,
        center,
        radius,
        0.0,
        std::f64::consts::PI * 2.0,
        false,
        start,
        &AffineTransform::identity(),
        &AffineTransform::identity(),
    );
    let bbox = approximator.bounding_box();
    let scale = approximator.antialias_level() as f64;
    assert!((bbox.min_x / scale - (-10.0)).abs() < 0.5);
    assert!((bbox.max_x / scale - 10.0).abs() < 0.5);
}

#[test]
fn segments_are_split_at_every_adjacent_bucket_boundary() {
    let mut approximator = SegmentApproximator::new(1, 1.0);
    // A single long segment spanning y=[0, 5): every intermediate bucket key
    // it registers as its own bottomY should still cut the segment if a
    // later insertion creates an intervening key.
    approximator.insert_line(FloatPoint::new(0.0, 0.0), FloatPoint::new(0.0, 5.0));
    approximator.insert_line(FloatPoint::new(5.0, 2.0), FloatPoint::new(5.0, 3.0));
    let segments = approximator.segments();
    // The long segment must have been split at y=2 and y=3 so every piece's
    // top/bottom match an existing bucket key.
    let long_pieces: Vec<_> = segments.iter().filter(|s| s.from.x == 0.0).collect();
    assert!(long_pieces.len() >= 3, "expected the long edge split at y=2 and y=3, got {} pieces", long_pieces.len());
}

#[test]
fn self_intersecting_segments_are_split_at_their_crossing_point() {
    init_logging();
    let mut approximator = SegmentApproximator::new(1, 1.0);
    approximator.insert_line(FloatPoint::new(0.0, 0.0), FloatPoint::new(10.0, 10.0));
    approximator.insert_line(FloatPoint::new(10.0, 0.0), FloatPoint::new(0.0, 10.0));
    let segments = approximator.segments();
    // Four pieces total: each diagonal split in two at y=5.
    assert_eq!(segments.len(), 4);
    assert!(segments.iter().all(|s| s.to.y - s.from.y <= 5.0));
}
