//! Per-column ray casting: a DDA walk through the wall grid, then an exact
//! test against every polygon wall.

use crate::{
    math::{Vec2, wrap_angle},
    world::{EMPTY, TextureId, World, wall_texture},
};

/// Rays give up after this many world units.
pub const MAX_RAY_LENGTH: f64 = 100.0;

/// What stopped the ray.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitSource {
    None,
    Grid,
    Poly,
}

/// Resolved result for one column, rebuilt every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Euclidean distance from the origin, `-1` when nothing was hit.
    pub distance: f64,
    /// Grid cell holding the hit point.
    pub cell: (i32, i32),
    pub point: Vec2,
    pub texture: TextureId,
    /// Horizontal texture coordinate in `[0,1]`.
    pub u: f64,
    /// Grid walls crossed while stepping along y are drawn darker.
    pub shaded: bool,
    pub source: HitSource,
    /// Angle the ray was cast at.
    pub ray_angle: f64,
    /// Viewer rotation at cast time.
    pub view_angle: f64,
}

impl RayHit {
    pub const MISS: Self = Self {
        distance: -1.0,
        cell: (-1, -1),
        point: Vec2::ZERO,
        texture: 0,
        u: 0.0,
        shaded: false,
        source: HitSource::None,
        ray_angle: 0.0,
        view_angle: 0.0,
    };

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.distance >= 0.0
    }

    /// Distance to the view plane rather than to the eye; removes the
    /// fish-eye bulge of raw per-column distances.
    #[inline]
    pub fn perpendicular_distance(&self) -> f64 {
        self.distance * wrap_angle(self.view_angle - self.ray_angle).cos()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RayCaster {
    pub max_length: f64,
}

impl Default for RayCaster {
    fn default() -> Self {
        Self {
            max_length: MAX_RAY_LENGTH,
        }
    }
}

impl RayCaster {
    /// Cast one ray from `origin` along the unit vector `dir`.
    ///
    /// `ray_angle` and `view_angle` only travel with the result (they feed
    /// [`RayHit::perpendicular_distance`]); they may be unwrapped.
    pub fn cast_column(
        &self,
        world: &World,
        origin: Vec2,
        dir: Vec2,
        ray_angle: f64,
        view_angle: f64,
    ) -> RayHit {
        let mut hit = self.cast_grid(world, origin, dir);
        self.cast_polys(world, origin, dir, &mut hit);
        hit.ray_angle = ray_angle;
        hit.view_angle = view_angle;
        hit
    }

    /*──────────────────────────── grid phase ────────────────────────────*/

    fn cast_grid(&self, world: &World, origin: Vec2, dir: Vec2) -> RayHit {
        // distance the ray travels per unit of x and of y
        let unit = Vec2::new(
            (1.0 + (dir.y / dir.x).powi(2)).sqrt(),
            (1.0 + (dir.x / dir.y).powi(2)).sqrt(),
        );

        let mut map_x = origin.x.floor() as i32;
        let mut map_y = origin.y.floor() as i32;

        // An axis the ray never advances along gets an infinite first
        // boundary, otherwise 0 * inf would poison the comparison with NaN.
        let first = |frac: f64, unit: f64| {
            if unit.is_finite() {
                frac * unit
            } else {
                f64::INFINITY
            }
        };
        let (step_x, mut len_x) = if dir.x < 0.0 {
            (-1, first(origin.x - map_x as f64, unit.x))
        } else {
            (1, first(map_x as f64 + 1.0 - origin.x, unit.x))
        };
        let (step_y, mut len_y) = if dir.y < 0.0 {
            (-1, first(origin.y - map_y as f64, unit.y))
        } else {
            (1, first(map_y as f64 + 1.0 - origin.y, unit.y))
        };

        let mut dist = 0.0;
        let mut stepped_y = false;
        loop {
            if len_x < len_y {
                map_x += step_x;
                dist = len_x;
                len_x += unit.x;
                stepped_y = false;
            } else {
                map_y += step_y;
                dist = len_y;
                len_y += unit.y;
                stepped_y = true;
            }

            // `!(a <= b)` also stops on NaN
            if !(dist <= self.max_length) {
                return RayHit::MISS;
            }
            // out-of-range cells read as empty; the ray keeps marching
            let cell = world.cell_wall(map_x, map_y);
            if cell != EMPTY {
                let point = origin + dir * dist;
                // fraction along the axis the ray did *not* step on
                let along = if stepped_y { point.x } else { point.y };
                return RayHit {
                    distance: dist,
                    cell: (map_x, map_y),
                    point,
                    texture: wall_texture(cell).unwrap_or_default(),
                    u: along.fract().abs(),
                    shaded: stepped_y,
                    source: HitSource::Grid,
                    ..RayHit::MISS
                };
            }
        }
    }

    /*─────────────────────────── polygon phase ──────────────────────────*/

    /// Let the closest polygon wall override `hit` when it is at least as
    /// near.  With no grid hit any polygon within reach counts.
    fn cast_polys(&self, world: &World, origin: Vec2, dir: Vec2, hit: &mut RayHit) {
        let mut limit = if hit.is_hit() {
            hit.distance
        } else {
            self.max_length
        };

        for wall in world.poly_walls() {
            let Some(ph) = wall.intersect(origin, dir, self.max_length) else {
                continue;
            };
            if ph.distance > limit {
                continue;
            }
            limit = ph.distance;
            *hit = RayHit {
                distance: ph.distance,
                cell: (ph.point.x.floor() as i32, ph.point.y.floor() as i32),
                point: ph.point,
                texture: wall.texture(),
                u: wall.texture_u(ph.point, ph.segment),
                shaded: false,
                source: HitSource::Poly,
                ..RayHit::MISS
            };
        }
    }
}
