//! ---------------------------------------------------------------------------
//! Depth-buffered software (CPU) compositor
//!
//! * Owns the whole window frame in **0xAARRGGBB**: the overhead map on the
//!   left, the 3-D viewport on the right starting at `x_offset`.
//! * Every viewport primitive takes frame-space coordinates and subtracts
//!   `x_offset` before bounds-checking.
//! * A write with depth `d` lands iff `d` is strictly less than what the
//!   depth buffer holds; colour and depth are always written together.
//!   Draw order therefore never matters.
//! ---------------------------------------------------------------------------

use std::collections::HashSet;

use crate::{
    config::ViewMetrics,
    renderer::{Renderer, Rgba, SpriteQuad, WallStripe},
    world::{Texture, TextureError, TextureId, TextureSource},
};

/// Clear colour of the overhead-map half.
const MAP_CLEAR: Rgba = 0xFF_20_20_20;

#[derive(Default)]
pub struct Software {
    /* full window, row-major, `frame_w` wide */
    frame: Vec<Rgba>,
    /* viewport only, row-major, `metrics.width` wide */
    depth: Vec<f64>,
    /* resampled wall column, reused across stripes */
    stripe: Vec<Rgba>,
    metrics: ViewMetrics,
    frame_w: usize,
    depth_view: bool,
    /* textures already reported as missing */
    missing: HashSet<TextureId>,
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, metrics: &ViewMetrics) {
        let frame_w = metrics.x_offset.max(0) as usize + metrics.width;
        // (re)allocate if the layout changed
        if frame_w != self.frame_w || metrics.height != self.metrics.height {
            self.frame_w = frame_w;
            self.frame.resize(frame_w * metrics.height, 0);
        }
        if metrics.width * metrics.height != self.depth.len() {
            self.depth.resize(metrics.width * metrics.height, 0.0);
        }
        self.metrics = *metrics;

        self.flush_depth();
        self.frame.fill(MAP_CLEAR);

        let (x, w, h) = (metrics.x_offset, metrics.width as i32, metrics.height as i32);
        self.fill_backdrop(x, 0, w, h / 2, metrics.sky);
        self.fill_backdrop(x, h / 2, w, h - h / 2, metrics.floor);
    }

    fn draw_stripe(&mut self, stripe: &WallStripe, textures: &dyn TextureSource) {
        let hit = &stripe.hit;
        if !hit.is_hit() {
            return;
        }
        let m = self.metrics;
        let dist = hit.perpendicular_distance();

        // near-zero distances saturate the cast and are clamped here
        let height = ((m.wall_scale / dist) as i32).min(m.max_stripe);
        if height < 0 {
            return;
        }

        let mut column = std::mem::take(&mut self.stripe);
        match textures.texture_stripe(hit.texture, hit.u, height, hit.shaded, &mut column) {
            Ok(()) => {
                let y0 = m.height as i32 / 2 - height / 2;
                for dx in 0..stripe.width {
                    for (dy, &c) in column.iter().enumerate() {
                        self.draw_pixel(stripe.x + dx, y0 + dy as i32, c, dist);
                    }
                }
            }
            Err(e) => self.report_missing(hit.texture, &e),
        }
        self.stripe = column;
    }

    fn draw_sprite(&mut self, quad: &SpriteQuad, textures: &dyn TextureSource) {
        let max = self.metrics.max_stripe;
        if quad.w <= 0 || quad.h <= 0 || quad.w > max || quad.h > max {
            return;
        }
        match textures.texture(quad.texture) {
            Ok(tex) => self.draw_image(tex, quad.x, quad.y, quad.w, quad.h, quad.depth),
            Err(e) => self.report_missing(quad.texture, &e),
        }
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: Rgba) {
        let mut x0 = x0;
        let mut y0 = y0;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.map_pixel(x0, y0, col);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, col: Rgba) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.map_pixel(xx, yy, col);
            }
        }
    }

    fn set_depth_view(&mut self, on: bool) {
        self.depth_view = on;
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        if self.depth_view {
            self.paint_depth_view();
        }
        submit(&self.frame, self.frame_w, self.metrics.height);
    }
}

/*──────────────────────── drawing primitives ─────────────────────────*/
impl Software {
    /// Reset every depth cell to the far sentinel.
    pub fn flush_depth(&mut self) {
        self.depth.fill(self.metrics.far);
    }

    /// Viewport index of frame-space `(x, y)`, `None` outside the viewport.
    #[inline(always)]
    fn viewport_index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        let vx = x - self.metrics.x_offset;
        if vx < 0 || vx >= self.metrics.width as i32 || y < 0 || y >= self.metrics.height as i32 {
            return None;
        }
        let (vx, y, x) = (vx as usize, y as usize, x as usize);
        Some((y * self.frame_w + x, y * self.metrics.width + vx))
    }

    /// Z-tested write; returns whether the pixel was taken.
    ///
    /// NaN depths never pass.
    #[inline]
    pub fn draw_pixel(&mut self, x: i32, y: i32, color: Rgba, depth: f64) -> bool {
        let Some((fi, di)) = self.viewport_index(x, y) else {
            return false;
        };
        if !(depth < self.depth[di]) {
            return false;
        }
        self.frame[fi] = color;
        self.depth[di] = depth;
        true
    }

    /// Unconditional write that leaves the depth buffer alone, so anything
    /// with a finite depth can still cover it.
    #[inline]
    pub fn draw_backdrop_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some((fi, _)) = self.viewport_index(x, y) {
            self.frame[fi] = color;
        }
    }

    pub fn fill_rect_at(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba, depth: f64) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.draw_pixel(xx, yy, color, depth);
            }
        }
    }

    pub fn fill_backdrop(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.draw_backdrop_pixel(xx, yy, color);
            }
        }
    }

    /// Nearest-neighbour blit of `tex` into the `w × h` rectangle at
    /// `(x, y)`.  Texels with alpha at or below the clip are skipped.
    pub fn draw_image(&mut self, tex: &Texture, x: i32, y: i32, w: i32, h: i32, depth: f64) {
        if w <= 0 || h <= 0 || tex.w == 0 || tex.h == 0 {
            return;
        }
        let step_x = (tex.w - 1) as f64 / w as f64;
        let step_y = (tex.h - 1) as f64 / h as f64;
        let clip = self.metrics.alpha_clip as u32;

        // only the columns that can land in the viewport
        let first = (self.metrics.x_offset - x).clamp(0, w);
        let last = (self.metrics.x_offset + self.metrics.width as i32 - x).clamp(0, w);

        for j in 0..h {
            let sy = (j as f64 * step_y) as usize;
            for i in first..last {
                let c = tex.texel((i as f64 * step_x) as usize, sy);
                if c >> 24 > clip {
                    self.draw_pixel(x + i, y + j, c, depth);
                }
            }
        }
    }

    /// Overhead-map write: frame-space, clipped to the map half.
    #[inline]
    fn map_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if x < 0 || x >= self.metrics.x_offset || y < 0 || y >= self.metrics.height as i32 {
            return;
        }
        self.frame[y as usize * self.frame_w + x as usize] = color;
    }

    fn paint_depth_view(&mut self) {
        let far = self.metrics.far;
        let (w, off) = (self.metrics.width, self.metrics.x_offset.max(0) as usize);
        for (di, &d) in self.depth.iter().enumerate() {
            let (y, vx) = (di / w, di % w);
            let g = ((d / far).clamp(0.0, 1.0) * 255.0) as u32;
            self.frame[y * self.frame_w + off + vx] = 0xFF00_0000 | g << 16 | g << 8 | g;
        }
    }

    fn report_missing(&mut self, id: TextureId, err: &TextureError) {
        if self.missing.insert(id) {
            log::warn!("skipping draws with texture {id}: {err}");
        }
    }

    /*──────────────────────────── read-back ─────────────────────────────*/

    /// Frame-space colour at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.frame_w {
            return None;
        }
        self.frame.get(y * self.frame_w + x).copied()
    }

    /// Depth of frame-space `(x, y)`, `None` outside the viewport.
    pub fn depth_at(&self, x: i32, y: i32) -> Option<f64> {
        self.viewport_index(x, y).map(|(_, di)| self.depth[di])
    }

    pub fn frame_size(&self) -> (usize, usize) {
        (self.frame_w, self.metrics.height)
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
