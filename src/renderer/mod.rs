//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It produces a list of [`DrawCall`]s and hands them to a type that
//! implements [`Renderer`].
//!
//! * Wall stripes and sprites carry a depth and go through the z-test, so
//!   the queue may be in any order.
//! * Map primitives ([`DrawCall::Line`], [`DrawCall::Rect`]) land in the
//!   overhead-map half of the frame and never touch the depth buffer.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::{
    config::ViewMetrics,
    engine::RayHit,
    world::{TextureId, TextureSource},
};

pub mod minimap;
pub mod software;

pub use software::Software;

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// One ray's wall column: `width` screen columns starting at frame-space `x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallStripe {
    pub x: i32,
    pub width: i32,
    pub hit: RayHit,
}

/// Screen rectangle of a billboard, frame-space, already lifted by its
/// vertical offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteQuad {
    pub texture: TextureId,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub depth: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    Stripe(WallStripe),
    Sprite(SpriteQuad),
    Line {
        from: (i32, i32),
        to: (i32, i32),
        color: Rgba,
    },
    Rect {
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        color: Rgba,
    },
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate for `metrics`, flush the depth buffer and paint the
    /// sky/floor backdrop.  Must run before anything else in a frame.
    fn begin_frame(&mut self, metrics: &ViewMetrics);

    /// Rasterise one textured wall column (z-tested).
    fn draw_stripe(&mut self, stripe: &WallStripe, textures: &dyn TextureSource);

    /// Rasterise one billboard (z-tested, alpha-clipped).
    fn draw_sprite(&mut self, quad: &SpriteQuad, textures: &dyn TextureSource);

    /// Bresenham line in the overhead-map area.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba);

    /// Solid rectangle in the overhead-map area.
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba);

    /// Replace the viewport with a grey-scale picture of the depth buffer
    /// when the frame is finished.
    fn set_depth_view(&mut self, on: bool);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        metrics: &ViewMetrics,
        calls: &[DrawCall],
        textures: &dyn TextureSource,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(metrics);
        for c in calls {
            match c {
                DrawCall::Stripe(s) => self.draw_stripe(s, textures),
                DrawCall::Sprite(q) => self.draw_sprite(q, textures),
                DrawCall::Line { from, to, color } => {
                    self.draw_line(from.0, from.1, to.0, to.1, *color)
                }
                DrawCall::Rect { x, y, w, h, color } => self.fill_rect(*x, *y, *w, *h, *color),
            }
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
