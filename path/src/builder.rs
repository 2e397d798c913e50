use crate::arena::{Arena, ElementId};
use crate::element::{Iter, Node, PathElement};
use gepard_geom::{AffineTransform, FloatPoint};
use std::f64::consts::PI;

const TWO_PI: f64 = 2.0 * PI;

/// The accumulated sequence of drawing commands for one path, plus the
/// subpath/close bookkeeping needed to build it incrementally.
///
/// Builder methods never fail: invalid or degenerate input (a `NaN`
/// coordinate, a zero-radius arc, a repeated point) is silently coerced
/// into the closest well-formed path, matching the reference's
/// `PathData`. The only failure mode is allocator exhaustion, which aborts
/// the process rather than returning an error.
#[derive(Default)]
pub struct PathData {
    arena: Arena<Node>,
    first: Option<ElementId>,
    last: Option<ElementId>,
    last_move_to: Option<ElementId>,
}

impl PathData {
    pub fn new() -> Self {
        PathData::default()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter { arena: &self.arena, current: self.first }
    }

    fn last_to(&self) -> Option<FloatPoint> {
        self.last.map(|id| self.arena.get(id).element.to())
    }

    fn push(&mut self, element: PathElement) -> ElementId {
        log::trace!("push path element: {:?}", element);
        let id = self.arena.alloc(Node { element, next: None });
        if let Some(last) = self.last {
            self.arena.get_mut(last).next = Some(id);
        } else {
            self.first = Some(id);
        }
        self.last = Some(id);
        id
    }

    pub fn move_to(&mut self, to: FloatPoint) {
        if let Some(last) = self.last {
            if self.arena.get(last).element.is_move_to() {
                self.arena.get_mut(last).element.set_to(to);
                self.last_move_to = Some(last);
                return;
            }
        }
        let id = self.push(PathElement::MoveTo { to });
        self.last_move_to = Some(id);
    }

    pub fn line_to(&mut self, to: FloatPoint) {
        if self.last.is_none() {
            self.move_to(to);
            return;
        }
        if self.last_to() == Some(to) {
            return;
        }
        self.push(PathElement::LineTo { to });
    }

    pub fn quadratic_curve_to(&mut self, control: FloatPoint, to: FloatPoint) {
        if self.last.is_none() {
            self.move_to(to);
            return;
        }
        self.push(PathElement::QuadraticCurveTo { control, to });
    }

    pub fn bezier_curve_to(&mut self, c1: FloatPoint, c2: FloatPoint, to: FloatPoint) {
        if self.last.is_none() {
            self.move_to(to);
            return;
        }
        self.push(PathElement::BezierCurveTo { c1, c2, to });
    }

    pub fn arc(
        &mut self,
        center: FloatPoint,
        radius: (f64, f64),
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    ) {
        let start = FloatPoint::new(center.x + start_angle.cos() * radius.0, center.y + start_angle.sin() * radius.1);

        if self.last.is_none() {
            self.move_to(center);
            return;
        }

        if radius.0 == 0.0 || radius.1 == 0.0 || start_angle == end_angle {
            log::debug!("degenerate arc (zero radius or zero sweep): emitting line instead");
            self.line_to(start);
            return;
        }

        if self.last_to() != Some(start) {
            self.line_to(start);
        }

        let (start_angle, end_angle) = normalize_arc_angles(start_angle, end_angle, counter_clockwise);

        let to = FloatPoint::new(center.x + end_angle.cos() * radius.0, center.y + end_angle.sin() * radius.1);

        self.push(PathElement::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            counter_clockwise,
            to,
            transform: AffineTransform::identity(),
        });
    }

    pub fn arc_to(&mut self, control: FloatPoint, end: FloatPoint, radius: f64) {
        if self.last.is_none() {
            self.move_to(control);
            return;
        }

        let start = self.last_to().unwrap();

        if start == control || control == end || radius == 0.0 {
            self.line_to(control);
            return;
        }

        let delta1 = start - control;
        let delta2 = end - control;
        let delta1_length = delta1.length();
        let delta2_length = delta2.length();

        debug_assert!(delta1_length > 0.0 && delta2_length > 0.0);
        let cos_phi = delta1.dot(&delta2) / (delta1_length * delta2_length);

        // All three points are on the same straight line (HTML5, 4.8.11.1.8).
        if cos_phi.abs() >= 0.9999 {
            self.line_to(control);
            return;
        }

        let tangent = radius / (cos_phi.acos() / 2.0).tan();
        let delta1_factor = tangent / delta1_length;
        let arc_start = FloatPoint::new(control.x + delta1_factor * delta1.x, control.y + delta1_factor * delta1.y);

        let mut ortho_start = FloatPoint::new(delta1.y, -delta1.x);
        let ortho_start_length = ortho_start.length();
        debug_assert!(ortho_start_length > 0.0);
        let radius_factor = radius / ortho_start_length;

        let cos_alpha = (ortho_start.x * delta2.x + ortho_start.y * delta2.y) / (ortho_start_length * delta2_length);
        if cos_alpha < 0.0 {
            ortho_start = -ortho_start;
        }

        let center = FloatPoint::new(arc_start.x + radius_factor * ortho_start.x, arc_start.y + radius_factor * ortho_start.y);

        ortho_start = -ortho_start;
        let mut start_angle = (ortho_start.x / ortho_start_length).acos();
        if ortho_start.y < 0.0 {
            start_angle = TWO_PI - start_angle;
        }

        let delta2_factor = tangent / delta2_length;
        let arc_end = FloatPoint::new(control.x + delta2_factor * delta2.x, control.y + delta2_factor * delta2.y);
        let ortho_end = arc_end - center;
        let ortho_end_length = ortho_end.length();
        let mut end_angle = (ortho_end.x / ortho_end_length).acos();
        if ortho_end.y < 0.0 {
            end_angle = TWO_PI - end_angle;
        }

        let mut counter_clockwise = false;
        if start_angle > end_angle && (start_angle - end_angle) < PI {
            counter_clockwise = true;
        }
        if start_angle < end_angle && (end_angle - start_angle) > PI {
            counter_clockwise = true;
        }

        self.arc(center, (radius, radius), start_angle, end_angle, counter_clockwise);
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.move_to(FloatPoint::new(x, y));
        self.line_to(FloatPoint::new(x + w, y));
        self.line_to(FloatPoint::new(x + w, y + h));
        self.line_to(FloatPoint::new(x, y + h));
        self.close_subpath();
    }

    pub fn close_subpath(&mut self) {
        let last = match self.last {
            Some(id) => id,
            None => return,
        };
        if self.arena.get(last).element.is_close_subpath() {
            return;
        }
        if self.arena.get(last).element.is_move_to() {
            let to = self.arena.get(last).element.to();
            self.line_to(to);
        }
        let last_move_to = self.last_move_to.expect("a non-empty path always has a last MoveTo");
        let to = self.arena.get(last_move_to).element.to();
        self.push(PathElement::CloseSubpath { to });
    }

    pub fn apply_transform(&mut self, transform: &AffineTransform) {
        let mut current = self.first;
        while let Some(id) = current {
            let node = self.arena.get_mut(id);
            match &mut node.element {
                PathElement::MoveTo { to }
                | PathElement::LineTo { to }
                | PathElement::CloseSubpath { to } => {
                    *to = transform.apply(*to);
                }
                PathElement::QuadraticCurveTo { control, to } => {
                    *to = transform.apply(*to);
                    *control = transform.apply(*control);
                }
                PathElement::BezierCurveTo { c1, c2, to } => {
                    *to = transform.apply(*to);
                    *c1 = transform.apply(*c1);
                    *c2 = transform.apply(*c2);
                }
                PathElement::Arc { to, transform: arc_transform, .. } => {
                    *to = transform.apply(*to);
                    *arc_transform = arc_transform.compose(transform);
                }
            }
            current = node.next;
        }
    }
}

fn normalize_arc_angles(start_angle: f64, end_angle: f64, counter_clockwise: bool) -> (f64, f64) {
    if counter_clockwise && start_angle - end_angle >= TWO_PI {
        let start = start_angle % TWO_PI;
        return (start, start - TWO_PI);
    }
    if !counter_clockwise && end_angle - start_angle >= TWO_PI {
        let start = start_angle % TWO_PI;
        return (start, start + TWO_PI);
    }

    let equal = start_angle == end_angle;

    let mut start = start_angle % TWO_PI;
    if start < 0.0 {
        start += TWO_PI;
    }
    let mut end = end_angle % TWO_PI;
    if end < 0.0 {
        end += TWO_PI;
    }

    if !counter_clockwise {
        if start > end || (start == end && !equal) {
            end += TWO_PI;
        }
        debug_assert!((0.0..=TWO_PI).contains(&start));
        debug_assert!(start <= end && end - start <= TWO_PI);
    } else {
        if start < end || (start == end && !equal) {
            end -= TWO_PI;
        }
        debug_assert!((0.0..=TWO_PI).contains(&start));
        debug_assert!(end <= start && start - end <= TWO_PI);
    }

    (start, end)
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod builder_tests;
