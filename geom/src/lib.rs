//! Geometry primitives shared by the rest of the gepard rasterizer.
//!
//! This crate is reexported in [gepard](https://docs.rs/gepard/).
//!
//! It has no opinion about paths or tessellation; it only provides the
//! point, bounding box, affine transform and color types those crates build
//! on top of.

mod bbox;
mod color;
mod point;
mod transform;

pub use crate::bbox::BoundingBox;
pub use crate::color::Color;
pub use crate::point::FloatPoint;
pub use crate::transform::AffineTransform;
