//! Start-up options and the per-world viewport metrics derived from them.

use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::{renderer::Rgba, world::World};

pub const SKY_COLOR: Rgba = 0xFF_73_B8_F0;
pub const FLOOR_COLOR: Rgba = 0xFF_1A_73_33;

/// Source pixels with alpha at or below this are treated as transparent
/// (0.2 of full opacity).
pub const ALPHA_CLIP: u8 = 51;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(author, version, about)]
pub struct Config {
    /// Width of the 3-D viewport in pixels (the overhead map gets the same)
    #[arg(long, default_value_t = 600)]
    pub viewport_width: usize,

    /// Height of the window in pixels
    #[arg(long, default_value_t = 600)]
    pub viewport_height: usize,

    /// Rays cast per frame; 0 casts one ray per viewport column
    #[arg(long, default_value_t = 0)]
    pub rays: usize,

    /// Horizontal field of view in degrees, strictly between 0 and 180
    #[arg(long, default_value_t = 70.0, value_parser = parse_fov)]
    pub fov: f64,

    /// Simulation updates per second
    #[arg(long, default_value_t = 200.0, value_parser = parse_rate)]
    pub ups: f64,

    /// Frames per second cap
    #[arg(long, default_value_t = 120.0, value_parser = parse_rate)]
    pub fps: f64,

    /// Walking speed in cells per second
    #[arg(long, default_value_t = 3.0)]
    pub walk_speed: f64,

    /// Turning speed in radians per second
    #[arg(long, default_value_t = 2.5)]
    pub turn_speed: f64,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value_t = LevelFilter::Info, value_parser = parse_level)]
    pub log_level: LevelFilter,
}

fn parse_fov(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if v > 0.0 && v < 180.0 {
        Ok(v)
    } else {
        Err(format!("fov must be in (0, 180), got {v}"))
    }
}

/// Rates feed `1 / rate` into a `Duration`, so they must be finite and positive.
fn parse_rate(s: &str) -> Result<f64, String> {
    let v: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(format!("rate must be a finite number above 0, got {v}"))
    }
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse().map_err(|_| format!("unknown log level `{s}`"))
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["gridcaster"])
    }
}

impl Config {
    /// Rays per frame, never more than there are columns.
    pub fn ray_count(&self) -> usize {
        match self.rays {
            0 => self.viewport_width,
            n => n.min(self.viewport_width),
        }
        .max(1)
    }

    /// Screen columns painted by each ray.
    pub fn column_width(&self) -> usize {
        (self.viewport_width / self.ray_count()).max(1)
    }

    pub fn fov_radians(&self) -> f64 {
        self.fov.to_radians()
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.ups)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps)
    }

    /// Full window: overhead map on the left, viewport on the right.
    pub fn window_size(&self) -> (usize, usize) {
        (self.viewport_width * 2, self.viewport_height)
    }
}

/// Read-only numbers the compositor needs, decoupled from any scene type.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewMetrics {
    pub width: usize,
    pub height: usize,
    /// Frame-space x of the viewport's first column.
    pub x_offset: i32,
    /// Depth written by `flush_depth`; nothing at or beyond it is drawn.
    pub far: f64,
    /// Wall column height = `wall_scale / corrected_distance`.
    pub wall_scale: f64,
    /// Upper bound for a wall column (and sprite side) in pixels.
    pub max_stripe: i32,
    pub alpha_clip: u8,
    pub sky: Rgba,
    pub floor: Rgba,
}

impl ViewMetrics {
    pub fn new(width: usize, height: usize, world: &World) -> Self {
        Self {
            width,
            height,
            x_offset: width as i32,
            far: world.cell_resolution(),
            wall_scale: height as f64 / 20.0 * world.height() as f64,
            max_stripe: 4 * height as i32,
            alpha_clip: ALPHA_CLIP,
            sky: SKY_COLOR,
            floor: FLOOR_COLOR,
        }
    }

    pub fn for_config(cfg: &Config, world: &World) -> Self {
        Self::new(cfg.viewport_width, cfg.viewport_height, world)
    }
}
