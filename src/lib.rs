//! Gepard — a 2D vector-graphics path rasterization core.
//!
//! This is the thin aggregator over the three published crates, mirroring
//! the way `lyon`'s meta-crate reexports `lyon_geom`, `lyon_path` and
//! `lyon_tessellation`:
//!
//! * [`gepard_geom`] — points, affine transforms, bounding boxes, color.
//! * [`gepard_path`] — the region allocator, path elements, the Canvas-style
//!   builder.
//! * [`gepard_tessellation`] — the segment approximator, the trapezoid
//!   tessellator, and the backend interface a GPU/software rasterizer
//!   implements.
//!
//! ```
//! use gepard::geom::FloatPoint;
//! use gepard::path::PathData;
//! use gepard::tessellation::{tessellate, FillRule};
//! use gepard_geom::AffineTransform;
//!
//! let mut path = PathData::new();
//! path.move_to(FloatPoint::new(10.0, 10.0));
//! path.line_to(FloatPoint::new(20.0, 10.0));
//! path.line_to(FloatPoint::new(20.0, 30.0));
//! path.line_to(FloatPoint::new(10.0, 30.0));
//! path.close_subpath();
//!
//! let (trapezoids, _bounds) = tessellate(&path, FillRule::NonZero, &AffineTransform::identity(), 16);
//! assert_eq!(trapezoids.len(), 1);
//! ```
//!
//! The out-of-scope collaborators this core hands its output to — shader
//! compilation, swapchain presentation, image codecs, the public drawing-API
//! wrapper, stroke-to-fill expansion — live outside this workspace; see
//! `SPEC_FULL.md` §1.

pub use gepard_geom as geom;
pub use gepard_path as path;
pub use gepard_tessellation as tessellation;

pub use gepard_geom::{AffineTransform, BoundingBox, Color, FloatPoint};
pub use gepard_path::{PathData, PathElement};
pub use gepard_tessellation::{tessellate, FillRule, Trapezoid, TrapezoidTessellator};
