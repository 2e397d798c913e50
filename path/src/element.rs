use crate::arena::ElementId;
use gepard_geom::{AffineTransform, FloatPoint};

/// One command in a path's element chain.
///
/// `to` is always the element's terminal point; for `Arc` it is the
/// precomputed endpoint `center + (cos endAngle * rx, sin endAngle * ry)`,
/// matching the reference `ArcElement` constructor so consumers never need
/// to re-derive it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathElement {
    MoveTo {
        to: FloatPoint,
    },
    LineTo {
        to: FloatPoint,
    },
    QuadraticCurveTo {
        control: FloatPoint,
        to: FloatPoint,
    },
    BezierCurveTo {
        c1: FloatPoint,
        c2: FloatPoint,
        to: FloatPoint,
    },
    Arc {
        center: FloatPoint,
        radius: (f64, f64),
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
        to: FloatPoint,
        /// Composes with the tessellator's global transform at
        /// approximation time; never pre-flattened into `center`/`radius`.
        transform: AffineTransform,
    },
    CloseSubpath {
        to: FloatPoint,
    },
}

impl PathElement {
    pub fn to(&self) -> FloatPoint {
        match *self {
            PathElement::MoveTo { to }
            | PathElement::LineTo { to }
            | PathElement::QuadraticCurveTo { to, .. }
            | PathElement::BezierCurveTo { to, .. }
            | PathElement::Arc { to, .. }
            | PathElement::CloseSubpath { to } => to,
        }
    }

    pub fn set_to(&mut self, new_to: FloatPoint) {
        match self {
            PathElement::MoveTo { to }
            | PathElement::LineTo { to }
            | PathElement::QuadraticCurveTo { to, .. }
            | PathElement::BezierCurveTo { to, .. }
            | PathElement::Arc { to, .. }
            | PathElement::CloseSubpath { to } => *to = new_to,
        }
    }

    pub fn is_move_to(&self) -> bool {
        matches!(self, PathElement::MoveTo { .. })
    }

    pub fn is_close_subpath(&self) -> bool {
        matches!(self, PathElement::CloseSubpath { .. })
    }
}

pub(crate) struct Node {
    pub element: PathElement,
    pub next: Option<ElementId>,
}

/// An in-order, read-only walk over a path's elements.
pub struct Iter<'a> {
    pub(crate) arena: &'a crate::arena::Arena<Node>,
    pub(crate) current: Option<ElementId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a PathElement;

    fn next(&mut self) -> Option<&'a PathElement> {
        let id = self.current?;
        let node = self.arena.get(id);
        self.current = node.next;
        Some(&node.element)
    }
}
