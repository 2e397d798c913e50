//! Segment approximation and trapezoid tessellation for the gepard
//! rasterizer.
//!
//! This crate is reexported in [gepard](https://docs.rs/gepard/). It turns
//! the element chain produced by `gepard_path` into a merged, fill-rule-aware
//! trapezoid list, plus the narrow interface ([`backend::Backend`]) a GPU or
//! software rasterizer consumes that list through.

mod approximate;
pub mod backend;
mod error;
#[cfg(feature = "parallel")]
pub mod job_runner;
mod segment;
mod trapezoid;

pub use crate::approximate::{SegmentApproximator, DEFAULT_ANTIALIAS_LEVEL};
pub use crate::error::TessellationError;
pub use crate::segment::{Direction, Segment};
pub use crate::trapezoid::{FillRule, Trapezoid, TrapezoidTessellator};

use gepard_geom::{AffineTransform, BoundingBox};
use gepard_path::PathData;

/// Tessellates `path` under `transform` with `fill_rule`, returning the
/// merged trapezoid list and its pixel-space bounding box. This is the
/// `fill(rule)` command surface of §6: the drawing-context wrapper calls this
/// and hands the result to a [`backend::Backend`].
pub fn tessellate(path: &PathData, fill_rule: FillRule, transform: &AffineTransform, antialiasing_level: i32) -> (Vec<Trapezoid>, BoundingBox) {
    let mut tessellator = TrapezoidTessellator::new(fill_rule, antialiasing_level);
    let trapezoids = tessellator.trapezoid_list(path, transform);
    (trapezoids, tessellator.bounding_box())
}
