//! Built-in world with procedurally generated textures.

use crate::{
    math::Vec2,
    renderer::Rgba,
    world::{
        Animation, Animator, Cell, Entity, Grid, PolyWall, SpriteRenderer, Texture, TextureBank,
        World, WorldError, WorldSource,
    },
};

#[rustfmt::skip]
const MAP: [&str; 16] = [
    "################",
    "#..............#",
    "#..............#",
    "#...####.......#",
    "#......#...SS..#",
    "#......#...S...#",
    "#..............#",
    "#..==..........#",
    "#..............#",
    "#.....#####....#",
    "#..............#",
    "#..............#",
    "#.........S....#",
    "#....====......#",
    "#..............#",
    "################",
];

const TRANSPARENT: Rgba = 0x00_00_00_00;

/// A bordered 16×16 room with interior walls, three polygon walls and two
/// billboards.
#[derive(Clone, Copy, Debug, Default)]
pub struct DemoWorld;

impl WorldSource for DemoWorld {
    fn load(&self) -> Result<World, WorldError> {
        let mut bank = TextureBank::new();
        // wall codes 1.. map onto the first three ids
        bank.insert("BRICK", brick())?;
        bank.insert("STONE", Texture::default())?;
        bank.insert("STRIPES", stripes())?;
        let planks = bank.insert("PLANKS", planks())?;
        let lamp = bank.insert("LAMP", lamp())?;
        let mut orb_frames = Vec::new();
        for (i, (radius, color)) in [(5, 0xFF_FF_40_40), (6, 0xFF_FF_80_40), (7, 0xFF_FF_C0_40)]
            .into_iter()
            .enumerate()
        {
            orb_frames.push(bank.insert(format!("ORB{i}"), disc(16, radius, color))?);
        }

        let walls = parse_map(&MAP);
        let grid = Grid::from_wall_rows(MAP[0].len(), MAP.len(), &walls)?;
        let mut world = World::new("demo", grid, bank)
            .with_player_start(Vec2::new(2.5, 2.5), 0.0);

        world.add_poly_wall(PolyWall::new(
            [
                Vec2::new(9.0, 1.5),
                Vec2::new(10.0, 2.5),
                Vec2::new(11.0, 1.5),
                Vec2::new(12.0, 2.5),
            ],
            planks,
            true,
            0.0,
        ));
        world.add_poly_wall(PolyWall::new(
            [Vec2::new(11.0, 6.5), Vec2::new(13.5, 8.5)],
            planks,
            false,
            0.0,
        ));
        world.add_poly_wall(PolyWall::new(
            [Vec2::new(2.0, 10.5), Vec2::new(2.0, 12.0), Vec2::new(4.5, 12.0)],
            planks,
            true,
            0.5,
        ));

        world.add_entity(Entity::new(
            "lamp",
            Vec2::new(6.5, 2.5),
            SpriteRenderer::still(lamp, Vec2::new(8.0, 16.0), 0),
        ));
        let pulse = Animation {
            name: "pulse".into(),
            frames: orb_frames,
            frame_time: 0.15,
        };
        world.add_entity(Entity::new(
            "orb",
            Vec2::new(8.5, 6.5),
            SpriteRenderer::animated(Animator::new(vec![pulse]), Vec2::new(6.0, 6.0), 20),
        ));

        Ok(world)
    }
}

/// `#` brick, `S` stone, `=` stripes, anything else empty.
fn parse_map(rows: &[&str]) -> Vec<Cell> {
    rows.iter()
        .flat_map(|row| row.bytes())
        .map(|b| match b {
            b'#' => 1,
            b'S' => 2,
            b'=' => 3,
            _ => 0,
        })
        .collect()
}

/*──────────────────────── procedural textures ────────────────────────*/

fn brick() -> Texture {
    const BRICK: Rgba = 0xFF_A0_40_30;
    const MORTAR: Rgba = 0xFF_C8_C0_B0;
    let (w, h) = (16, 16);
    let mut px = vec![BRICK; w * h];
    for y in 0..h {
        let course = y / 4;
        let shift = if course % 2 == 0 { 0 } else { 4 };
        for x in 0..w {
            if y % 4 == 3 || (x + shift) % 8 == 7 {
                px[y * w + x] = MORTAR;
            }
        }
    }
    Texture::new(w, h, px)
}

fn stripes() -> Texture {
    const BANDS: [Rgba; 4] = [0xFF_30_60_C0, 0xFF_F0_F0_F0, 0xFF_C0_30_30, 0xFF_F0_F0_F0];
    let (w, h) = (16, 16);
    let px = (0..w * h).map(|i| BANDS[(i % w) / 4]).collect();
    Texture::new(w, h, px)
}

fn planks() -> Texture {
    let (w, h) = (16, 16);
    let px = (0..w * h)
        .map(|i| {
            let (x, y) = (i % w, i / w);
            let shade = 0x60 + (x as u32 * 6) + if y % 8 == 0 { 0 } else { 0x10 };
            0xFF00_0000 | shade << 16 | (shade * 3 / 4) << 8 | shade / 3
        })
        .collect();
    Texture::new(w, h, px)
}

/// Filled circle on a transparent square.
fn disc(size: usize, radius: usize, color: Rgba) -> Texture {
    let c = size as f64 / 2.0 - 0.5;
    let r2 = (radius * radius) as f64;
    let px = (0..size * size)
        .map(|i| {
            let dx = (i % size) as f64 - c;
            let dy = (i / size) as f64 - c;
            if dx * dx + dy * dy <= r2 { color } else { TRANSPARENT }
        })
        .collect();
    Texture::new(size, size, px)
}

/// Yellow globe on a grey post.
fn lamp() -> Texture {
    const POST: Rgba = 0xFF_60_60_60;
    let mut tex = disc(16, 4, 0xFF_FF_F0_80);
    // globe sits in the upper half
    tex.pixels.rotate_left(16 * 4);
    for y in 8..16 {
        for x in 7..9 {
            tex.pixels[y * 16 + x] = POST;
        }
    }
    tex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{EMPTY, TextureSource};

    #[test]
    fn demo_world_loads() {
        let world = DemoWorld.load().unwrap();
        assert_eq!((world.width(), world.height()), (16, 16));
        assert_eq!(world.poly_walls().len(), 3);
        assert_eq!(world.entities().len(), 2);
        assert_eq!(world.cell_resolution(), 16.0);
        assert!(!world.blocked(world.player_start_pos()));
    }

    #[test]
    fn border_is_solid() {
        let world = DemoWorld.load().unwrap();
        for i in 0..16 {
            assert_ne!(world.cell_wall(i, 0), EMPTY);
            assert_ne!(world.cell_wall(i, 15), EMPTY);
            assert_ne!(world.cell_wall(0, i), EMPTY);
            assert_ne!(world.cell_wall(15, i), EMPTY);
        }
        assert_eq!(world.cell_wall(11, 4), 2);
        assert_eq!(world.cell_wall(3, 7), 3);
    }

    #[test]
    fn entities_and_poly_walls_stand_in_open_cells() {
        let world = DemoWorld.load().unwrap();
        for e in world.entities() {
            assert!(!world.blocked(e.position), "{}", e.name);
        }
        for wall in world.poly_walls() {
            for &p in wall.points() {
                assert!(!world.blocked(p), "{p:?}");
            }
        }
    }

    #[test]
    fn every_referenced_texture_exists() {
        let world = DemoWorld.load().unwrap();
        let bank = world.textures();
        for code in 1..=3 {
            assert!(bank.texture(code - 1).is_ok());
        }
        for wall in world.poly_walls() {
            assert!(bank.texture(wall.texture()).is_ok());
        }
        for e in world.entities() {
            assert!(bank.texture(e.sprite.texture().unwrap()).is_ok());
        }
    }

    #[test]
    fn sprite_backgrounds_are_transparent() {
        let lamp = lamp();
        assert_eq!(lamp.texel(0, 0), TRANSPARENT);
        assert_eq!(lamp.texel(7, 15), 0xFF_60_60_60);
        let orb = disc(16, 5, 0xFF_FF_00_00);
        assert_eq!(orb.texel(0, 0), TRANSPARENT);
        assert_eq!(orb.texel(8, 8), 0xFF_FF_00_00);
    }
}
