//! Overhead debug map for the left half of the frame.
//!
//! Pure draw-call producer: the compositor rasterises the lines and
//! rectangles, so the map never touches the depth buffer.

use crate::{
    config::ViewMetrics,
    engine::RayHit,
    math::Vec2,
    renderer::{DrawCall, Rgba},
    world::{Camera, EMPTY, World},
};

const GRID_LINE: Rgba = 0xFF_80_80_80;
const WALL: Rgba = 0xFF_00_00_00;
const FLOOR: Rgba = 0xFF_FF_FF_FF;
const ENTITY: Rgba = 0xFF_00_FF_FF;
const PLAYER: Rgba = 0xFF_FF_00_00;
const RAY: Rgba = 0xFF_00_C0_00;

/// World → map-pixel transform: one cell is `cell` pixels square.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MapLayout {
    pub cell: i32,
}

impl MapLayout {
    /// Largest whole-pixel cell that fits the whole grid into the map area.
    pub fn fit(world: &World, metrics: &ViewMetrics) -> Self {
        let by_w = metrics.x_offset.max(0) as usize / world.width().max(1);
        let by_h = metrics.height / world.height().max(1);
        Self {
            cell: by_w.min(by_h).max(1) as i32,
        }
    }

    #[inline]
    pub fn to_screen(&self, p: Vec2) -> (i32, i32) {
        let s = self.cell as f64;
        ((p.x * s) as i32, (p.y * s) as i32)
    }
}

/// Queue the whole map; `rays` adds one line per hit when given.
pub fn overhead_map(
    world: &World,
    camera: &Camera,
    rays: Option<&[RayHit]>,
    metrics: &ViewMetrics,
    out: &mut Vec<DrawCall>,
) {
    let layout = MapLayout::fit(world, metrics);
    let s = layout.cell;

    // grey backing shows through the 1 px gaps between cells
    out.push(DrawCall::Rect {
        x: 0,
        y: 0,
        w: world.width() as i32 * s,
        h: world.height() as i32 * s,
        color: GRID_LINE,
    });
    let inner = (s - 1).max(1);
    for y in 0..world.height() as i32 {
        for x in 0..world.width() as i32 {
            let color = if world.cell_wall(x, y) == EMPTY { FLOOR } else { WALL };
            out.push(DrawCall::Rect {
                x: x * s,
                y: y * s,
                w: inner,
                h: inner,
                color,
            });
        }
    }

    for wall in world.poly_walls() {
        for (a, b) in wall.segments() {
            out.push(DrawCall::Line {
                from: layout.to_screen(a),
                to: layout.to_screen(b),
                color: WALL,
            });
        }
    }

    for e in world.entities() {
        let (x, y) = layout.to_screen(e.position);
        out.push(DrawCall::Rect {
            x: x - 2,
            y: y - 2,
            w: 4,
            h: 4,
            color: ENTITY,
        });
    }

    let eye = layout.to_screen(camera.pos);
    if let Some(hits) = rays {
        for hit in hits.iter().filter(|h| h.is_hit()) {
            out.push(DrawCall::Line {
                from: eye,
                to: layout.to_screen(hit.point),
                color: RAY,
            });
        }
    }

    out.push(DrawCall::Rect {
        x: eye.0 - 3,
        y: eye.1 - 3,
        w: 6,
        h: 6,
        color: PLAYER,
    });
    out.push(DrawCall::Line {
        from: eye,
        to: layout.to_screen(camera.pos + camera.forward()),
        color: PLAYER,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::HitSource,
        world::{Grid, PolyWall, TextureBank},
    };

    fn world() -> World {
        let mut w = World::new(
            "m",
            Grid::from_wall_rows(3, 2, &[1, 0, 0, 0, 0, 1]).unwrap(),
            TextureBank::new(),
        );
        w.add_poly_wall(PolyWall::new(
            [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 0.0)],
            0,
            true,
            0.0,
        ));
        w
    }

    fn metrics() -> ViewMetrics {
        ViewMetrics {
            width: 100,
            height: 60,
            x_offset: 100,
            ..ViewMetrics::default()
        }
    }

    #[test]
    fn layout_fits_the_smaller_side() {
        assert_eq!(MapLayout::fit(&world(), &metrics()).cell, 30);
        let l = MapLayout { cell: 10 };
        assert_eq!(l.to_screen(Vec2::new(1.5, 2.25)), (15, 22));
    }

    #[test]
    fn cells_walls_and_player_are_queued() {
        let w = world();
        let cam = Camera::new(Vec2::new(1.5, 1.5), 0.0, 1.0);
        let mut out = Vec::new();
        overhead_map(&w, &cam, None, &metrics(), &mut out);

        // backing + 6 cells + 2 poly segments + player box + facing line
        assert_eq!(out.len(), 1 + 6 + 2 + 2);
        assert_eq!(
            out[1],
            DrawCall::Rect { x: 0, y: 0, w: 29, h: 29, color: WALL }
        );
        assert_eq!(
            out[2],
            DrawCall::Rect { x: 30, y: 0, w: 29, h: 29, color: FLOOR }
        );
        assert_eq!(
            out.last(),
            Some(&DrawCall::Line { from: (45, 45), to: (75, 45), color: PLAYER })
        );
    }

    #[test]
    fn rays_only_for_hits() {
        let w = world();
        let cam = Camera::new(Vec2::new(1.5, 1.5), 0.0, 1.0);
        let hit = RayHit {
            distance: 1.0,
            point: Vec2::new(2.0, 1.5),
            source: HitSource::Grid,
            ..RayHit::MISS
        };
        let mut out = Vec::new();
        overhead_map(&w, &cam, Some(&[hit, RayHit::MISS][..]), &metrics(), &mut out);
        let rays = out
            .iter()
            .filter(|c| matches!(c, DrawCall::Line { color: RAY, .. }))
            .count();
        assert_eq!(rays, 1);
    }
}
