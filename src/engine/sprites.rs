use crate::{
    config::ViewMetrics,
    math::{Vec2, from_angle, side, unit_angle_between},
    world::Camera,
};

/// Where (and whether) a billboard lands on screen this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Projection {
    /// Frame-space top-left corner.
    pub screen_pos: Vec2,
    pub screen_size: Vec2,
    /// Euclidean distance to the camera; doubles as the sprite's depth.
    pub distance: f64,
    pub visible: bool,
}

/// Camera-relative billboard placement for one frame.
pub struct SpriteProjector<'a> {
    camera: &'a Camera,
    metrics: &'a ViewMetrics,
}

impl<'a> SpriteProjector<'a> {
    pub fn new(camera: &'a Camera, metrics: &'a ViewMetrics) -> Self {
        Self { camera, metrics }
    }

    /// Project an entity standing at `pos` whose sprite measures `size`
    /// pixels at a distance of one map-cell resolution.
    ///
    /// Visible iff the entity is on the inner side of the left frustum edge
    /// and within half the field of view of the forward axis.  An entity
    /// on the camera itself is never visible.
    pub fn project(&self, pos: Vec2, size: Vec2) -> Projection {
        let m = self.metrics;
        let to_entity = pos - self.camera.pos;
        let distance = to_entity.length();
        if !(distance > 0.0) {
            return Projection {
                distance,
                ..Projection::default()
            };
        }
        let dir = to_entity / distance;

        let half_fov = self.camera.fov * 0.5;
        let forward = self.camera.forward();
        let left_edge = from_angle(self.camera.rotation - half_fov);
        let angle = unit_angle_between(forward, dir);
        let visible = side(left_edge, dir) <= 0.0 && angle <= half_fov;

        // signed offset from the view axis, negative towards the left edge
        let offset = if side(forward, dir) > 0.0 { -angle } else { angle };
        let fraction = (offset + half_fov) / self.camera.fov;

        let screen_size = size * m.far / distance;
        let screen_pos = Vec2::new(
            m.x_offset as f64 + m.width as f64 * fraction - screen_size.x * 0.5,
            m.height as f64 * 0.5 - screen_size.y * 0.5 + screen_size.y / 10.0,
        );

        Projection {
            screen_pos,
            screen_size,
            distance,
            visible,
        }
    }
}
