use crate::approximate::SegmentApproximator;
use crate::segment::Segment;
use gepard_geom::{AffineTransform, BoundingBox};
use gepard_path::{PathData, PathElement};

/// Which edge-crossing rule decides what is "inside" a self-intersecting
/// or multi-subpath fill.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

/// One row-aligned quadrilateral of the tessellated fill, in supersampled
/// scanlines until [`TrapezoidTessellator::trapezoid_list`] divides by the
/// anti-alias level to produce pixel-space output.
///
/// Invariant: `top_y < bottom_y`, `top_left_x <= top_right_x`,
/// `bottom_left_x <= bottom_right_x`. `left_id`/`right_id` of `0` marks a
/// trapezoid retired by vertical merge; callers never observe one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Trapezoid {
    pub top_y: f64,
    pub top_left_x: f64,
    pub top_right_x: f64,
    pub bottom_y: f64,
    pub bottom_left_x: f64,
    pub bottom_right_x: f64,
    pub left_id: u32,
    pub right_id: u32,
    pub left_slope: f64,
    pub right_slope: f64,
}

impl Default for Trapezoid {
    fn default() -> Self {
        Trapezoid {
            top_y: 0.0,
            top_left_x: 0.0,
            top_right_x: 0.0,
            bottom_y: 0.0,
            bottom_left_x: 0.0,
            bottom_right_x: 0.0,
            left_id: 0,
            right_id: 0,
            left_slope: 0.0,
            right_slope: 0.0,
        }
    }
}

impl Trapezoid {
    /// Whether `self`, stacked directly above `other` (`self.bottom_y ==
    /// other.top_y`), shares its bottom edge with `other`'s top edge
    /// closely enough to merge into one taller trapezoid: either the same
    /// pair of source edges, or edges with matching inverse slopes.
    pub fn is_mergeable_into(&self, other: &Trapezoid) -> bool {
        debug_assert_eq!(self.bottom_y, other.top_y);
        if self.bottom_left_x == other.top_left_x && self.bottom_right_x == other.top_right_x {
            if self.left_id == other.left_id && self.right_id == other.right_id {
                return true;
            }
            if self.left_slope == other.left_slope && self.right_slope == other.right_slope {
                return true;
            }
        }
        false
    }
}

impl PartialOrd for Trapezoid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(
            self.top_y
                .partial_cmp(&other.top_y)?
                .then(self.top_left_x.partial_cmp(&other.top_left_x)?)
                .then(self.bottom_left_x.partial_cmp(&other.bottom_left_x)?),
        )
    }
}

/// Kills floating-point noise below roughly 50 bits of mantissa, matching
/// the reference's `fixPrecision`: without it, segments that should share
/// an x after scanline splitting can differ in the last few ULPs and defeat
/// vertical merge.
fn fix_precision(f: f64) -> f64 {
    const PRECISION: f64 = (1u64 << 50) as f64;
    (f * PRECISION).floor() / PRECISION
}

/// Walks a path through a [`SegmentApproximator`] and reduces the resulting
/// segment list to a sorted, vertically-merged trapezoid list.
pub struct TrapezoidTessellator {
    fill_rule: FillRule,
    antialiasing_level: i32,
    bounding_box: BoundingBox,
}

impl TrapezoidTessellator {
    pub fn new(fill_rule: FillRule, antialiasing_level: i32) -> Self {
        TrapezoidTessellator { fill_rule, antialiasing_level, bounding_box: BoundingBox::new() }
    }

    pub fn fill_rule(&self) -> FillRule {
        self.fill_rule
    }

    pub fn antialiasing_level(&self) -> i32 {
        self.antialiasing_level
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    /// Produces the tessellated trapezoid list for `path` under `transform`.
    /// An empty path, or one with only a single `MoveTo`, yields an empty
    /// list.
    pub fn trapezoid_list(&mut self, path: &PathData, transform: &AffineTransform) -> Vec<Trapezoid> {
        let elements: Vec<PathElement> = path.iter().copied().collect();
        if elements.len() < 2 {
            return Vec::new();
        }
        debug_assert!(matches!(elements[0], PathElement::MoveTo { .. }));

        let mut approximator = SegmentApproximator::new(self.antialiasing_level, 1.0);
        let mut from = elements[0].to();
        let mut last_move_to = from;

        for element in &elements[1..] {
            let to = element.to();
            match element {
                PathElement::MoveTo { .. } => {
                    approximator.insert_line(transform.apply(from), transform.apply(last_move_to));
                    last_move_to = to;
                }
                PathElement::LineTo { .. } => {
                    approximator.insert_line(transform.apply(from), transform.apply(to));
                }
                PathElement::CloseSubpath { .. } => {
                    approximator.insert_line(transform.apply(from), transform.apply(last_move_to));
                    last_move_to = to;
                }
                PathElement::QuadraticCurveTo { control, .. } => {
                    approximator.insert_quad_curve(transform.apply(from), transform.apply(*control), transform.apply(to));
                }
                PathElement::BezierCurveTo { c1, c2, .. } => {
                    approximator.insert_bezier_curve(
                        transform.apply(from),
                        transform.apply(*c1),
                        transform.apply(*c2),
                        transform.apply(to),
                    );
                }
                PathElement::Arc { center, radius, start_angle, end_angle, counter_clockwise, to: arc_to, transform: arc_transform } => {
                    approximator.insert_arc(
                        transform.apply(from),
                        *center,
                        *radius,
                        *start_angle,
                        *end_angle,
                        *counter_clockwise,
                        *arc_to,
                        arc_transform,
                        transform,
                    );
                }
            }
            from = to;
        }
        approximator.insert_line(transform.apply(from), transform.apply(last_move_to));

        let segment_list = approximator.segments();
        let mut trapezoids = self.emit_trapezoids(&segment_list);
        self.bounding_box = divide_bounding_box(approximator.bounding_box(), self.antialiasing_level);

        trapezoids.sort_by(|a, b| a.partial_cmp(b).expect("trapezoid coordinates are never NaN"));
        vertical_merge(&mut trapezoids)
    }

    fn emit_trapezoids(&self, segments: &[Segment]) -> Vec<Trapezoid> {
        let denom = self.antialiasing_level as f64;
        let mut trapezoids = Vec::new();
        let mut trapezoid = Trapezoid::default();
        let mut fill = 0i32;
        let mut is_in_fill = false;

        for segment in segments {
            if segment.from.y == segment.to.y {
                continue;
            }
            match self.fill_rule {
                FillRule::EvenOdd => fill = if fill == 0 { 1 } else { 0 },
                FillRule::NonZero => fill += segment.direction.signed(),
            }

            if fill != 0 {
                if !is_in_fill {
                    trapezoid.top_y = fix_precision(segment.top_y() as f64 / denom);
                    trapezoid.bottom_y = fix_precision(segment.bottom_y() as f64 / denom);
                    trapezoid.top_left_x = fix_precision(segment.from.x) / denom;
                    trapezoid.bottom_left_x = fix_precision(segment.to.x) / denom;
                    trapezoid.left_id = segment.id;
                    trapezoid.left_slope = segment.real_slope;
                    if trapezoid.top_y != trapezoid.bottom_y {
                        is_in_fill = true;
                    }
                }
            } else {
                trapezoid.top_right_x = fix_precision(segment.from.x) / denom;
                trapezoid.bottom_right_x = fix_precision(segment.to.x) / denom;
                trapezoid.right_id = segment.id;
                trapezoid.right_slope = segment.real_slope;
                if trapezoid.top_y != trapezoid.bottom_y {
                    trapezoids.push(trapezoid);
                }
                is_in_fill = false;
            }
        }

        trapezoids
    }
}

fn divide_bounding_box(bbox: BoundingBox, antialiasing_level: i32) -> BoundingBox {
    let level = antialiasing_level as f64;
    let mut divided = BoundingBox::new();
    if bbox.is_empty() {
        return divided;
    }
    divided.stretch_x(fix_precision(bbox.min_x) / level);
    divided.stretch_x(fix_precision(bbox.max_x) / level);
    divided.stretch_y(fix_precision(bbox.min_y) / level);
    divided.stretch_y(fix_precision(bbox.max_y) / level);
    divided
}

fn vertical_merge(trapezoids: &mut [Trapezoid]) -> Vec<Trapezoid> {
    let mut output = Vec::with_capacity(trapezoids.len());

    for i in 0..trapezoids.len() {
        let bottom_y = trapezoids[i].bottom_y;

        for j in (i + 1)..trapezoids.len() {
            if trapezoids[j].top_y > bottom_y {
                break;
            }
            if trapezoids[j].top_y == trapezoids[i].bottom_y {
                debug_assert!(trapezoids[i].left_id != 0 && trapezoids[i].right_id != 0);
                let current = trapezoids[i];
                if current.is_mergeable_into(&trapezoids[j]) {
                    trapezoids[j].top_y = current.top_y;
                    trapezoids[j].top_left_x = current.top_left_x;
                    trapezoids[j].top_right_x = current.top_right_x;
                    trapezoids[i].left_id = 0;
                    trapezoids[i].right_id = 0;
                    break;
                }
            }
        }

        if trapezoids[i].left_id != 0 {
            output.push(trapezoids[i]);
        }
    }

    output
}

#[cfg(test)]
#[path = "trapezoid_tests.rs"]
mod trapezoid_tests;
