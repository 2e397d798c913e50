//! The narrow interface between the rasterization core and a concrete GPU or
//! software backend (§4.4).
//!
//! The core never holds a concrete backend type, only `&mut dyn Backend`,
//! the same seam `lyon_tessellation::geometry_builder::GeometryBuilder`
//! draws between a tessellator and whatever vertex/index buffers a caller
//! wants to fill. Swapping a GPU backend for a software fallback requires no
//! change to [`crate::TrapezoidTessellator`] or [`crate::tessellate`].

use crate::trapezoid::Trapezoid;
use gepard_geom::{AffineTransform, Color};

/// A rectangular pixel region, used for both `readback` and `upload`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// How a textured quad's source pixels combine with what is already on the
/// surface. The core never interprets this itself; it only threads it
/// through to the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlendMode {
    SourceOver,
    Copy,
}

/// One packed RGBA pixel, matching [`Color::to_abgr_u32`]'s byte order.
pub type Pixel = u32;

/// The operations a backend must accept from the core. The core provides no
/// callbacks to the backend (§5): every call here is a one-shot submission
/// that the backend is free to batch, defer to a GPU queue, or execute
/// synchronously against a software framebuffer.
pub trait Backend {
    /// Draws the union of `trapezoids` with `fill_color` under source-over
    /// blending, clipped to `surface_size`.
    fn fill_trapezoids(&mut self, trapezoids: &[Trapezoid], fill_color: Color, surface_size: (u32, u32));

    /// Blits `src_rect` of `texture` into `dst_quad`, already expressed in
    /// surface space by the caller's current transform.
    fn draw_textured_quad(&mut self, texture: TextureId, src_rect: PixelRect, dst_quad: [gepard_geom::FloatPoint; 4], blend_mode: BlendMode);

    /// Reads pixels back from the surface, for `getImageData`-style access.
    fn readback(&mut self, rect: PixelRect) -> Vec<Pixel>;

    /// Writes `pixels` into the surface, for `putImageData`-style access.
    fn upload(&mut self, pixels: &[Pixel], rect: PixelRect);
}

/// Opaque handle to a backend-owned texture. The core never inspects its
/// contents; it only threads the handle through `draw_textured_quad`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// The four-vertex, eight-float-attribute layout a shader unpacks per
/// trapezoid (§6), factored out so a backend can build its vertex buffer
/// without re-deriving the layout. Grounded on the vertex-attribute
/// unpacking the reference's GLES2 fill-path vertex shader performs.
///
/// Each of the four vertices shares the same per-trapezoid attribute pair
/// `(bottomLeftX, bottomRightX, topLeftX, topRightX)` /
/// `(bottomY, topY, vertexIndex, pad)`; only `vertexIndex` differs, selecting
/// which corner of the bounding quad that vertex covers.
pub fn trapezoid_vertices(trapezoid: &Trapezoid) -> [[f32; 8]; 4] {
    const VERTEX_INDICES: [f32; 4] = [0.0, 1.0, 3.0, 4.0];
    let mut vertices = [[0.0f32; 8]; 4];
    for (vertex, &index) in vertices.iter_mut().zip(VERTEX_INDICES.iter()) {
        *vertex = [
            trapezoid.bottom_left_x as f32,
            trapezoid.bottom_right_x as f32,
            trapezoid.top_left_x as f32,
            trapezoid.top_right_x as f32,
            trapezoid.bottom_y as f32,
            trapezoid.top_y as f32,
            index,
            0.0,
        ];
    }
    vertices
}

/// Applies `transform` to the four corners of `surface_size`, producing the
/// destination quad `draw_textured_quad` expects for a full-surface blit
/// (e.g. the final swapchain composite).
pub fn full_surface_quad(transform: &AffineTransform, surface_size: (u32, u32)) -> [gepard_geom::FloatPoint; 4] {
    use gepard_geom::FloatPoint;
    let (w, h) = (surface_size.0 as f64, surface_size.1 as f64);
    [
        transform.apply(FloatPoint::new(0.0, 0.0)),
        transform.apply(FloatPoint::new(w, 0.0)),
        transform.apply(FloatPoint::new(w, h)),
        transform.apply(FloatPoint::new(0.0, h)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trapezoid_vertices_share_attributes_except_vertex_index() {
        let trapezoid = Trapezoid {
            top_y: 1.0,
            top_left_x: 2.0,
            top_right_x: 3.0,
            bottom_y: 4.0,
            bottom_left_x: 5.0,
            bottom_right_x: 6.0,
            left_id: 1,
            right_id: 2,
            left_slope: 0.0,
            right_slope: 0.0,
        };
        let vertices = trapezoid_vertices(&trapezoid);
        let indices: Vec<f32> = vertices.iter().map(|v| v[6]).collect();
        assert_eq!(indices, vec![0.0, 1.0, 3.0, 4.0]);
        for vertex in &vertices {
            assert_eq!(vertex[0..6], [5.0, 6.0, 2.0, 3.0, 4.0, 1.0]);
        }
    }

    #[test]
    fn full_surface_quad_covers_the_identity_surface() {
        let quad = full_surface_quad(&AffineTransform::identity(), (100, 50));
        assert_eq!(quad[0], gepard_geom::FloatPoint::new(0.0, 0.0));
        assert_eq!(quad[2], gepard_geom::FloatPoint::new(100.0, 50.0));
    }
}
