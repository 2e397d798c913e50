//! Path model for the gepard rasterizer: an append-only element chain plus
//! the Canvas-style builder used to construct it incrementally.
//!
//! This crate is reexported in [gepard](https://docs.rs/gepard/). It knows
//! nothing about scanlines or trapezoids; `gepard_tessellation` walks the
//! element chain this crate produces.

mod arena;
mod builder;
mod element;

pub use crate::builder::PathData;
pub use crate::element::{Iter, PathElement};
