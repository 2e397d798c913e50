use super::*;
use gepard_geom::FloatPoint;

fn tessellate(path: &PathData, fill_rule: FillRule) -> Vec<Trapezoid> {
    let mut tessellator = TrapezoidTessellator::new(fill_rule, 16);
    tessellator.trapezoid_list(path, &AffineTransform::identity())
}

#[test]
fn a_single_axis_aligned_rectangle_yields_one_trapezoid() {
    let mut path = PathData::new();
    path.move_to(FloatPoint::new(10.0, 10.0));
    path.line_to(FloatPoint::new(20.0, 10.0));
    path.line_to(FloatPoint::new(20.0, 30.0));
    path.line_to(FloatPoint::new(10.0, 30.0));
    path.close_subpath();

    let trapezoids = tessellate(&path, FillRule::NonZero);
    assert_eq!(trapezoids.len(), 1);
    let t = &trapezoids[0];
    assert!((t.top_y - 10.0).abs() < 1e-9);
    assert!((t.bottom_y - 30.0).abs() < 1e-9);
    assert!((t.top_left_x - 10.0).abs() < 1e-9);
    assert!((t.top_right_x - 20.0).abs() < 1e-9);
    assert!((t.bottom_left_x - 10.0).abs() < 1e-9);
    assert!((t.bottom_right_x - 20.0).abs() < 1e-9);
}

#[test]
fn a_triangle_merges_into_one_trapezoid_after_the_vertical_merge_pass() {
    let mut path = PathData::new();
    path.move_to(FloatPoint::new(0.0, 0.0));
    path.line_to(FloatPoint::new(10.0, 0.0));
    path.line_to(FloatPoint::new(5.0, 10.0));
    path.close_subpath();

    let trapezoids = tessellate(&path, FillRule::NonZero);
    assert_eq!(trapezoids.len(), 1);
    let t = &trapezoids[0];
    assert!((t.top_y - 0.0).abs() < 1e-9);
    assert!((t.bottom_y - 10.0).abs() < 1e-9);
    assert!((t.top_left_x - 0.0).abs() < 1e-9);
    assert!((t.top_right_x - 10.0).abs() < 1e-9);
    assert!((t.bottom_left_x - 5.0).abs() < 1e-9);
    assert!((t.bottom_right_x - 5.0).abs() < 1e-9);
}

#[test]
fn an_evenodd_bowtie_yields_two_lobes_with_no_trapezoid_crossing_the_waist() {
    let mut path = PathData::new();
    path.move_to(FloatPoint::new(0.0, 0.0));
    path.line_to(FloatPoint::new(10.0, 10.0));
    path.line_to(FloatPoint::new(10.0, 0.0));
    path.line_to(FloatPoint::new(0.0, 10.0));
    path.close_subpath();

    let trapezoids = tessellate(&path, FillRule::EvenOdd);
    assert!(!trapezoids.is_empty());
    // No trapezoid straddles the waist at y=5: every one is either entirely
    // above or entirely below it.
    for t in &trapezoids {
        assert!(t.bottom_y <= 5.0 + 1e-9 || t.top_y >= 5.0 - 1e-9);
    }
}

#[test]
fn an_empty_path_yields_zero_trapezoids() {
    let path = PathData::new();
    assert!(tessellate(&path, FillRule::NonZero).is_empty());
}

#[test]
fn a_single_move_to_yields_zero_trapezoids() {
    let mut path = PathData::new();
    path.move_to(FloatPoint::new(5.0, 5.0));
    assert!(tessellate(&path, FillRule::NonZero).is_empty());
}

#[test]
fn a_full_circle_via_arc_produces_a_bounding_box_matching_the_radius() {
    let mut path = PathData::new();
    path.move_to(FloatPoint::new(10.0, 0.0));
    path.arc(FloatPoint::new(0.0, 0.0), (10.0, 10.0), 0.0, std::f64::consts::PI * 2.0, false);
    path.close_subpath();

    let mut tessellator = TrapezoidTessellator::new(FillRule::NonZero, 16);
    let trapezoids = tessellator.trapezoid_list(&path, &AffineTransform::identity());
    assert!(!trapezoids.is_empty());

    let bbox = tessellator.bounding_box();
    assert!((bbox.min_x - (-10.0)).abs() < 0.1);
    assert!((bbox.max_x - 10.0).abs() < 0.1);
    assert!((bbox.min_y - (-10.0)).abs() < 0.1);
    assert!((bbox.max_y - 10.0).abs() < 0.1);
}

#[test]
fn trapezoid_geometry_invariants_hold_for_every_emitted_trapezoid() {
    let mut path = PathData::new();
    path.move_to(FloatPoint::new(0.0, 0.0));
    path.quadratic_curve_to(FloatPoint::new(50.0, 100.0), FloatPoint::new(100.0, 0.0));
    path.close_subpath();

    for t in tessellate(&path, FillRule::NonZero) {
        assert!(t.top_y < t.bottom_y);
        assert!(t.top_left_x <= t.top_right_x);
        assert!(t.bottom_left_x <= t.bottom_right_x);
    }
}

#[test]
fn vertical_merge_never_leaves_two_adjacent_trapezoids_with_matching_x_and_slope() {
    let mut path = PathData::new();
    path.move_to(FloatPoint::new(0.0, 0.0));
    path.line_to(FloatPoint::new(10.0, 0.0));
    path.line_to(FloatPoint::new(10.0, 20.0));
    path.line_to(FloatPoint::new(0.0, 20.0));
    path.close_subpath();

    let trapezoids = tessellate(&path, FillRule::NonZero);
    for i in 0..trapezoids.len() {
        for j in 0..trapezoids.len() {
            if i == j {
                continue;
            }
            let (a, b) = (&trapezoids[i], &trapezoids[j]);
            let shares_boundary = a.bottom_y == b.top_y;
            let matches_geometry = a.bottom_left_x == b.top_left_x && a.bottom_right_x == b.top_right_x;
            let matches_slope = a.left_slope == b.left_slope && a.right_slope == b.right_slope;
            assert!(!(shares_boundary && matches_geometry && matches_slope), "trapezoids {:?} and {:?} should have merged", a, b);
        }
    }
}

#[test]
fn is_mergeable_into_requires_a_shared_boundary_and_matching_edges() {
    let top = Trapezoid {
        top_y: 0.0,
        top_left_x: 0.0,
        top_right_x: 10.0,
        bottom_y: 5.0,
        bottom_left_x: 1.0,
        bottom_right_x: 9.0,
        left_id: 1,
        right_id: 2,
        left_slope: 0.2,
        right_slope: -0.2,
    };
    let bottom = Trapezoid {
        top_y: 5.0,
        top_left_x: 1.0,
        top_right_x: 9.0,
        bottom_y: 10.0,
        bottom_left_x: 2.0,
        bottom_right_x: 8.0,
        left_id: 1,
        right_id: 2,
        left_slope: 0.2,
        right_slope: -0.2,
    };
    assert!(top.is_mergeable_into(&bottom));

    let mut different_ids = bottom;
    different_ids.left_id = 99;
    different_ids.left_slope = 0.9;
    assert!(!top.is_mergeable_into(&different_ids));
}
