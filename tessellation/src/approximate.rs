use crate::segment::Segment;
use gepard_geom::{AffineTransform, BoundingBox, FloatPoint};
use std::collections::BTreeMap;
use std::f64::consts::PI;

/// Anti-aliasing level used when the caller does not request one.
pub const DEFAULT_ANTIALIAS_LEVEL: i32 = 16;

/// Maximum number of pending curve halves kept on the explicit flattening
/// stack before the rare deep-subdivision case falls back to a direct
/// recursive call. Mirrors the reference's fixed-size `buffer` of
/// `kNumberOfParts * 2 (+1)` points, just expressed as a bound on stack
/// depth instead of a pointer into a flat array.
const MAX_FLATTEN_STACK: usize = 32;

/// Flattens path geometry (lines, curves, arcs) into [`Segment`]s bucketed
/// by integer top-scanline, in supersampled space, and produces the final
/// sorted segment list a [`crate::trapezoid::TrapezoidTessellator`] sweeps.
///
/// One instance is used for exactly one tessellation call; `next_id` resets
/// with it; segment ids are unique only within that scope.
pub struct SegmentApproximator {
    aa_level: i32,
    tolerance: f64,
    segments: BTreeMap<i64, Vec<Segment>>,
    bounding_box: BoundingBox,
    next_id: u32,
}

impl SegmentApproximator {
    /// `factor` scales the flatness tolerance; `factor <= 0.0` uses `1.0`
    /// (one device pixel), matching the reference's `kTolerance` default.
    pub fn new(antialias_level: i32, factor: f64) -> Self {
        let aa_level = if antialias_level > 0 { antialias_level } else { DEFAULT_ANTIALIAS_LEVEL };
        let factor = if factor > 0.0 { factor } else { 1.0 };
        SegmentApproximator {
            aa_level,
            tolerance: factor / aa_level as f64,
            segments: BTreeMap::new(),
            bounding_box: BoundingBox::new(),
            next_id: 0,
        }
    }

    pub fn antialias_level(&self) -> i32 {
        self.aa_level
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_segment(&mut self, from: FloatPoint, to: FloatPoint) {
        if from.y == to.y {
            return;
        }
        let id = self.next_id();
        let segment = Segment::new(from, to, id, None);

        self.bounding_box.stretch(segment.from);
        self.bounding_box.stretch(segment.to);

        let top_y = segment.top_y();
        let bottom_y = segment.bottom_y();
        self.segments.entry(top_y).or_default().push(segment);
        self.segments.entry(bottom_y).or_default();
    }

    /// Scales both endpoints into supersampled space (`x * A`, `floor(y * A)`)
    /// before inserting. All other `insert_*` entry points funnel through
    /// `insert_line` eventually, so this is the only place that scale
    /// happens.
    pub fn insert_line(&mut self, from: FloatPoint, to: FloatPoint) {
        log::trace!("insert line: {:?} -> {:?}", from, to);
        let scale = self.aa_level as f64;
        self.insert_segment(
            FloatPoint::new(from.x * scale, (from.y * scale).floor()),
            FloatPoint::new(to.x * scale, (to.y * scale).floor()),
        );
    }

    fn quad_is_flat(&self, p0: FloatPoint, p1: FloatPoint, p2: FloatPoint) -> bool {
        let dt = ((p2.x - p0.x) * (p0.y - p1.y) - (p0.x - p1.x) * (p2.y - p0.y)).abs();
        if dt > self.tolerance {
            return false;
        }
        let (min_x, max_x) = bounds(p0.x, p2.x, self.tolerance);
        let (min_y, max_y) = bounds(p0.y, p2.y, self.tolerance);
        !(p1.x < min_x || p1.x > max_x || p1.y < min_y || p1.y > max_y)
    }

    pub fn insert_quad_curve(&mut self, from: FloatPoint, control: FloatPoint, to: FloatPoint) {
        let mut stack: Vec<(FloatPoint, FloatPoint, FloatPoint)> = Vec::with_capacity(MAX_FLATTEN_STACK);
        stack.push((from, control, to));

        while let Some((a, b, c)) = stack.pop() {
            if self.quad_is_flat(a, b, c) {
                self.insert_line(a, c);
                continue;
            }

            let ab = (a + b) / 2.0;
            let bc = (b + c) / 2.0;
            let mid = (ab + bc) / 2.0;

            if stack.len() + 2 > MAX_FLATTEN_STACK {
                // Rare deep case: flatten the first half directly rather
                // than growing the stack further.
                self.insert_quad_curve(a, ab, mid);
                stack.push((mid, bc, c));
            } else {
                stack.push((a, ab, mid));
                stack.push((mid, bc, c));
            }
        }
    }

    fn cubic_is_flat(&self, p0: FloatPoint, p1: FloatPoint, p2: FloatPoint, p3: FloatPoint) -> bool {
        let dt1 = ((p3.x - p0.x) * (p0.y - p1.y) - (p0.x - p1.x) * (p3.y - p0.y)).abs();
        let dt2 = ((p3.x - p0.x) * (p0.y - p2.y) - (p0.x - p2.x) * (p3.y - p0.y)).abs();
        if dt1 > self.tolerance || dt2 > self.tolerance {
            return false;
        }
        let (min_x, max_x) = bounds(p0.x, p3.x, self.tolerance);
        let (min_y, max_y) = bounds(p0.y, p3.y, self.tolerance);
        !(p1.x < min_x || p1.x > max_x || p1.y < min_y || p1.y > max_y
            || p2.x < min_x || p2.x > max_x || p2.y < min_y || p2.y > max_y)
    }

    pub fn insert_bezier_curve(&mut self, from: FloatPoint, control1: FloatPoint, control2: FloatPoint, to: FloatPoint) {
        let mut stack: Vec<(FloatPoint, FloatPoint, FloatPoint, FloatPoint)> = Vec::with_capacity(MAX_FLATTEN_STACK);
        stack.push((from, control1, control2, to));

        while let Some((a, b, c, d)) = stack.pop() {
            if self.cubic_is_flat(a, b, c, d) {
                self.insert_line(a, d);
                continue;
            }

            let ab = (a + b) / 2.0;
            let bc = (b + c) / 2.0;
            let cd = (c + d) / 2.0;
            let abbc = (ab + bc) / 2.0;
            let bccd = (bc + cd) / 2.0;
            let mid = (abbc + bccd) / 2.0;

            if stack.len() + 2 > MAX_FLATTEN_STACK {
                self.insert_bezier_curve(a, ab, abbc, mid);
                stack.push((mid, bccd, cd, d));
            } else {
                stack.push((a, ab, abbc, mid));
                stack.push((mid, bccd, cd, d));
            }
        }
    }

    fn calculate_arc_segments(&self, angle: f64, radius: f64) -> i32 {
        let epsilon = self.tolerance / radius;
        let mut i = 1;
        let mut angle_segment;
        loop {
            angle_segment = PI / i as f64;
            i += 1;
            let error = (2.0 / 27.0) * (angle_segment / 4.0).sin().powi(6) / (angle_segment / 4.0).cos().powi(2);
            if error <= epsilon {
                break;
            }
        }
        (angle.abs() / angle_segment).ceil() as i32
    }

    fn arc_to_curve(&self, start_angle: f64, end_angle: f64) -> [FloatPoint; 3] {
        let (sin_start, cos_start) = (start_angle.sin(), start_angle.cos());
        let (sin_end, cos_end) = (end_angle.sin(), end_angle.cos());
        let height = (4.0 / 3.0) * ((end_angle - start_angle) / 4.0).tan();

        [
            FloatPoint::new(cos_start - height * sin_start, sin_start + height * cos_start),
            FloatPoint::new(cos_end + height * sin_end, sin_end - height * cos_end),
            FloatPoint::new(cos_end, sin_end),
        ]
    }

    /// Flattens one `Arc` path element. `arc_transform` is the element's own
    /// per-arc transform (composed lazily rather than pre-flattened), and
    /// `global_transform` is the tessellator's current transform.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_arc(
        &mut self,
        last_end_point: FloatPoint,
        center: FloatPoint,
        radius: (f64, f64),
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
        arc_to: FloatPoint,
        arc_transform: &AffineTransform,
        global_transform: &AffineTransform,
    ) {
        let axes_transform = AffineTransform::new(radius.0, 0.0, 0.0, radius.1, center.x, center.y);
        let combined = global_transform.compose(&arc_transform.compose(&axes_transform));

        let mut start_angle = start_angle;
        let mut start_point = combined.apply(FloatPoint::new(start_angle.cos(), start_angle.sin()));
        self.insert_line(last_end_point, start_point);

        debug_assert!(start_angle != end_angle);

        let delta_angle = if counter_clockwise { start_angle - end_angle } else { end_angle - start_angle };
        let segments = self.calculate_arc_segments(delta_angle, radius.0.max(radius.1) * 2.0);
        let mut step = delta_angle / segments as f64;
        if counter_clockwise {
            step = -step;
        }

        for i in 0..segments {
            let sub_end = if i == segments - 1 { end_angle } else { start_angle + step };
            let bezier = self.arc_to_curve(start_angle, sub_end);
            let p0 = combined.apply(bezier[0]);
            let p1 = combined.apply(bezier[1]);
            let p2 = if i == segments - 1 { global_transform.apply(arc_to) } else { combined.apply(bezier[2]) };
            self.insert_bezier_curve(start_point, p0, p1, p2);
            start_point = p2;
            start_angle += step;
        }
    }

    fn split_segments(&mut self) {
        let keys: Vec<i64> = self.segments.keys().copied().collect();
        for window in keys.windows(2) {
            let (y1, y2) = (window[0], window[1]);
            let split_y = y2 as f64;

            let mut continuations = Vec::new();
            for segment in self.segments.get_mut(&y1).unwrap().iter_mut() {
                if segment.is_on_segment(split_y) {
                    continuations.push(segment.split(split_y));
                }
            }
            if continuations.is_empty() {
                continue;
            }
            self.segments.get_mut(&y2).unwrap().splice(0..0, continuations);
        }
    }

    /// Produces the flat, sorted segment list consumed by the trapezoid
    /// tessellator. Runs the four-phase finalize: scanline split,
    /// intersection discovery, a second scanline split, and coincident-pair
    /// repair, then concatenates every bucket in key order.
    pub fn segments(&mut self) -> Vec<Segment> {
        self.split_segments();

        let mut intersection_ys = std::collections::BTreeSet::new();
        for list in self.segments.values_mut() {
            list.sort_by(|a, b| a.partial_cmp(b).expect("segment endpoints are never NaN"));
            for i in 0..list.len() {
                for j in (i + 1)..list.len() {
                    if let Some(y) = list[i].intersection_y(&list[j]) {
                        let floor_y = y.floor();
                        intersection_ys.insert(floor_y as i64);
                        if floor_y != y {
                            intersection_ys.insert(floor_y as i64 + 1);
                        }
                    }
                }
            }
        }

        for y in intersection_ys {
            self.segments.entry(y).or_default();
        }

        self.split_segments();

        let mut output = Vec::new();
        let keys: Vec<i64> = self.segments.keys().copied().collect();
        let mut key_index = 0;
        // A bucket whose repair pass performs a merge is re-swept in place;
        // bounded so a pathological input cannot loop forever.
        const MAX_REPAIR_PASSES: usize = 64;

        while key_index < keys.len() {
            let key = keys[key_index];
            let list = self.segments.get_mut(&key).unwrap();
            list.sort_by(|a, b| a.partial_cmp(b).expect("segment endpoints are never NaN"));

            let mut needs_sorting = false;
            for pass in 0..MAX_REPAIR_PASSES {
                needs_sorting = repair_coincident_pairs(list);
                if !needs_sorting {
                    break;
                }
                list.sort_by(|a, b| a.partial_cmp(b).expect("segment endpoints are never NaN"));
                if pass == MAX_REPAIR_PASSES - 1 {
                    log::warn!("coincident-pair repair did not converge after {} passes at scanline {}", MAX_REPAIR_PASSES, key);
                }
            }

            output.append(list);
            key_index += 1;
        }

        output
    }
}

fn bounds(a: f64, b: f64, tolerance: f64) -> (f64, f64) {
    if a < b {
        (a - tolerance, b + tolerance)
    } else {
        (b - tolerance, a + tolerance)
    }
}

/// One pass of phase-4 repair: for every bucket whose segments all span a
/// single scanline, pulls matching top/bottom x's together to eliminate
/// slivers from near-intersections. Returns whether a merge that requires
/// re-sorting the bucket occurred.
fn repair_coincident_pairs(list: &mut [Segment]) -> bool {
    let mut needs_sorting = false;
    for i in 0..list.len() {
        if list[i].to.y - list[i].from.y != 1.0 {
            continue;
        }
        for j in i..list.len() {
            debug_assert_eq!(list[i].from.y, list[j].from.y);
            debug_assert_eq!(list[i].to.y, list[j].to.y);
            if list[j].to.x < list[i].to.x {
                if list[j].from.x - list[i].from.x < list[i].to.x - list[j].to.x {
                    list[j].from.x = list[i].from.x;
                    needs_sorting = true;
                } else {
                    list[j].to.x = list[i].to.x;
                }
            }
        }
    }
    needs_sorting
}

#[cfg(test)]
#[path = "approximate_tests.rs"]
mod approximate_tests;
