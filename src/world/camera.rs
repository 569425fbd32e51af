use crate::math::{Vec2, from_angle, wrap_angle};

/// Player view-point in grid space.
///
/// * Only **yaw** is simulated; there is no pitch.
/// * One grid cell is one world unit; y grows "down" the map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    /// radians, 0 = +X, growing towards +Y
    pub rotation: f64,
    /// horizontal field of view, radians
    pub fov: f64,
}

impl Camera {
    pub fn new(pos: Vec2, rotation: f64, fov: f64) -> Self {
        Self { pos, rotation, fov }
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit vector pointing where the camera looks.
    #[inline(always)]
    pub fn forward(&self) -> Vec2 {
        from_angle(self.rotation)
    }

    /// Angle of the left-most ray of the per-frame fan.
    #[inline]
    pub fn first_ray_angle(&self) -> f64 {
        self.rotation - self.fov * 0.5
    }

    /// Angular spacing between neighbouring rays.
    #[inline]
    pub fn ray_step(&self, rays: usize) -> f64 {
        self.fov / rays.max(1) as f64
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `distance` along the facing direction.
    pub fn step(&mut self, distance: f64) {
        self.pos += self.forward() * distance;
    }

    /// Rotate (positive = towards +Y), wrapped into `[0, 2π)`.
    pub fn turn(&mut self, delta: f64) {
        self.rotation = wrap_angle(self.rotation + delta);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
