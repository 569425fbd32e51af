//! Free-standing walls that are not locked to the cell grid.
//!
//! A wall is an open polyline: segment *i* joins vertex *i* and *i + 1*.
//! Rays are tested against every segment and the closest hit wins.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{math::Vec2, world::texture::TextureId};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PolyWallError {
    #[error("a polygon wall needs at least 2 points, got {0}")]
    TooFewPoints(usize),
}

/// Closest ray/wall intersection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolyHit {
    /// Vertex indices of the segment that was hit, e.g. `[0, 1]`.
    pub segment: [usize; 2],
    /// Parameter along the segment, strictly inside `(0, 1)`.
    pub t: f64,
    pub point: Vec2,
    /// Euclidean distance from the ray origin.
    pub distance: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PolyWall {
    points: SmallVec<[Vec2; 4]>,
    texture: TextureId,
    tile: bool,
    tex_offset: f64,
}

impl PolyWall {
    /// Fails with [`PolyWallError::TooFewPoints`] for fewer than two points;
    /// such a wall is never stored.
    pub fn new(
        points: impl IntoIterator<Item = Vec2>,
        texture: TextureId,
        tile: bool,
        tex_offset: f64,
    ) -> Result<Self, PolyWallError> {
        let points: SmallVec<[Vec2; 4]> = points.into_iter().collect();
        if points.len() < 2 {
            return Err(PolyWallError::TooFewPoints(points.len()));
        }
        Ok(Self {
            points,
            texture,
            tile,
            tex_offset,
        })
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    #[inline]
    pub fn texture(&self) -> TextureId {
        self.texture
    }

    /// Consecutive vertex pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }

    /// Intersect the ray `origin + u * dir * reach` (u > 0) with every
    /// segment and keep the closest hit.
    ///
    /// Parallel segments (zero determinant) are skipped; segment endpoints
    /// (`t` = 0 or 1) and hits behind the origin never count.  Later
    /// segments win ties.
    pub fn intersect(&self, origin: Vec2, dir: Vec2, reach: f64) -> Option<PolyHit> {
        let (x3, y3) = (origin.x, origin.y);
        let x4 = x3 + dir.x * reach;
        let y4 = y3 + dir.y * reach;

        let mut best: Option<PolyHit> = None;
        for (i, (a, b)) in self.segments().enumerate() {
            let (x1, y1, x2, y2) = (a.x, a.y, b.x, b.y);

            let den = (x1 - x2) * (y3 - y4) - (y1 - y2) * (x3 - x4);
            if den == 0.0 {
                continue;
            }

            let t = ((x1 - x3) * (y3 - y4) - (y1 - y3) * (x3 - x4)) / den;
            let u = -((x1 - x2) * (y1 - y3) - (y1 - y2) * (x1 - x3)) / den;
            if !(t > 0.0 && t < 1.0 && u > 0.0) {
                continue;
            }

            let point = a + (b - a) * t;
            let distance = point.distance(origin);
            if best.is_none_or(|h| distance <= h.distance) {
                best = Some(PolyHit {
                    segment: [i, i + 1],
                    t,
                    point,
                    distance,
                });
            }
        }
        best
    }

    /// Horizontal texture coordinate of `point` on `segment`.
    ///
    /// Tiling walls repeat the texture once per world unit; stretched walls
    /// map the whole segment onto `[0,1]`.  The offset is added before the
    /// result is folded back into `[0,1]`.
    pub fn texture_u(&self, point: Vec2, segment: [usize; 2]) -> f64 {
        let start = self.points[segment[0]];
        let end = self.points[segment[1]];
        let along = start.distance(point);

        let mut u = if self.tile {
            along
        } else {
            along / start.distance(end)
        };
        u += self.tex_offset;

        if u > 1.0 || u < -1.0 {
            u = u.fract();
        }
        u.abs()
    }

    /// Vertex list in readable form.
    pub fn debug_info(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| format!("({},{})", p.x, p.y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REACH: f64 = 100.0;

    fn vertical_wall(tile: bool, offset: f64) -> PolyWall {
        PolyWall::new([Vec2::new(2.0, 0.0), Vec2::new(2.0, 2.0)], 3, tile, offset).unwrap()
    }

    #[test]
    fn construction_needs_two_points() {
        assert_eq!(
            PolyWall::new([], 0, true, 0.0),
            Err(PolyWallError::TooFewPoints(0))
        );
        assert_eq!(
            PolyWall::new([Vec2::ONE], 0, true, 0.0),
            Err(PolyWallError::TooFewPoints(1))
        );
        assert!(PolyWall::new([Vec2::ZERO, Vec2::ONE], 0, true, 0.0).is_ok());
    }

    #[test]
    fn ray_through_midpoint() {
        let wall = vertical_wall(false, 0.0);
        let hit = wall
            .intersect(Vec2::new(0.0, 1.0), Vec2::X, REACH)
            .expect("should hit");
        assert_eq!(hit.segment, [0, 1]);
        assert!((hit.t - 0.5).abs() < 1e-12);
        assert!((hit.point - Vec2::new(2.0, 1.0)).length() < 1e-12);
        assert!((hit.distance - 2.0).abs() < 1e-12);
    }

    #[test]
    fn misses_behind_parallel_and_endpoints() {
        let wall = vertical_wall(true, 0.0);
        // pointing away
        assert!(wall.intersect(Vec2::new(0.0, 1.0), -Vec2::X, REACH).is_none());
        // parallel to the wall
        assert!(wall.intersect(Vec2::new(0.0, 1.0), Vec2::Y, REACH).is_none());
        // exactly through the endpoint (t == 0)
        assert!(wall.intersect(Vec2::new(0.0, 0.0), Vec2::X, REACH).is_none());
        // past the end of the segment
        assert!(wall.intersect(Vec2::new(0.0, 3.0), Vec2::X, REACH).is_none());
    }

    #[test]
    fn closest_segment_wins() {
        // zig-zag: the ray crosses segment 1-2 first, then 2-3
        let wall = PolyWall::new(
            [
                Vec2::new(0.0, -5.0),
                Vec2::new(1.0, -1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(4.0, -1.0),
                Vec2::new(4.0, 1.0),
            ],
            0,
            true,
            0.0,
        )
        .unwrap();
        let hit = wall.intersect(Vec2::ZERO, Vec2::X, REACH).unwrap();
        assert_eq!(hit.segment, [1, 2]);
        assert!((hit.distance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stretched_u_is_fraction_of_segment() {
        let wall = vertical_wall(false, 0.0);
        assert!((wall.texture_u(Vec2::new(2.0, 0.5), [0, 1]) - 0.25).abs() < 1e-12);
        assert!((wall.texture_u(Vec2::new(2.0, 1.5), [0, 1]) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn tiled_u_wraps_per_unit() {
        let wall = vertical_wall(true, 0.0);
        assert!((wall.texture_u(Vec2::new(2.0, 0.25), [0, 1]) - 0.25).abs() < 1e-12);
        assert!((wall.texture_u(Vec2::new(2.0, 1.25), [0, 1]) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn offset_is_applied_before_wrapping() {
        let wall = vertical_wall(true, 0.5);
        assert!((wall.texture_u(Vec2::new(2.0, 0.75), [0, 1]) - 0.25).abs() < 1e-12);
        let wall = vertical_wall(false, -1.75);
        let u = wall.texture_u(Vec2::new(2.0, 0.5), [0, 1]);
        assert!((u - 0.5).abs() < 1e-12, "u = {u}");
        assert!((0.0..=1.0).contains(&u));
    }

    #[test]
    fn debug_info_lists_vertices() {
        let wall = vertical_wall(true, 0.0);
        assert_eq!(wall.debug_info(), vec!["(2,0)", "(2,2)"]);
    }
}
