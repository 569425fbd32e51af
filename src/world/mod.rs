mod camera;
mod demo;
mod entity;
mod grid;
mod poly_wall;
mod texture;

use thiserror::Error;

use crate::math::Vec2;

pub use camera::Camera;
pub use demo::DemoWorld;
pub use entity::{AnimatedSprite, Animation, Animator, Entity, SpriteKind, SpriteRenderer, StaticSprite};
pub use grid::{Cell, EMPTY, Grid, GridError, wall_texture};
pub use poly_wall::{PolyHit, PolyWall, PolyWallError};
pub use texture::{Texture, TextureBank, TextureError, TextureId, TextureSource, darken};

/// Why a world could not be produced.  The live world is never touched
/// when this comes back from a reload.
#[derive(Error, Debug)]
pub enum WorldError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error("world source failed: {0}")]
    Source(String),
}

/// The loader boundary: something that can build a complete [`World`].
pub trait WorldSource {
    fn load(&self) -> Result<World, WorldError>;
}

/// Runtime snapshot of one map (read-only while a frame is drawn).
#[derive(Debug)]
pub struct World {
    pub name: String,
    grid: Grid,
    poly_walls: Vec<PolyWall>,
    entities: Vec<Entity>,
    player_start: Vec2,
    start_rotation: f64,
    textures: TextureBank,
}

impl World {
    pub fn new(name: impl Into<String>, grid: Grid, textures: TextureBank) -> Self {
        let player_start = Vec2::new(grid.width() as f64 * 0.5, grid.height() as f64 * 0.5);
        Self {
            name: name.into(),
            grid,
            poly_walls: Vec::new(),
            entities: Vec::new(),
            player_start,
            start_rotation: 0.0,
            textures,
        }
    }

    pub fn with_player_start(mut self, pos: Vec2, rotation: f64) -> Self {
        self.player_start = pos;
        self.start_rotation = rotation;
        self
    }

    /// Store a polygon wall; one that failed construction is logged and left
    /// out of the render set.
    pub fn add_poly_wall(&mut self, wall: Result<PolyWall, PolyWallError>) -> bool {
        match wall {
            Ok(w) => {
                self.poly_walls.push(w);
                true
            }
            Err(err) => {
                log::warn!(
                    "skipping polygon wall #{} in `{}`: {err}",
                    self.poly_walls.len(),
                    self.name
                );
                false
            }
        }
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /*──────────────────────── query surface ───────────────────────*/

    #[inline]
    pub fn cell_wall(&self, x: i32, y: i32) -> Cell {
        self.grid.wall(x, y)
    }

    #[inline]
    pub fn cell_floor(&self, x: i32, y: i32) -> Cell {
        self.grid.floor(x, y)
    }

    #[inline]
    pub fn cell_roof(&self, x: i32, y: i32) -> Cell {
        self.grid.roof(x, y)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn poly_walls(&self) -> &[PolyWall] {
        &self.poly_walls
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    pub fn player_start_pos(&self) -> Vec2 {
        self.player_start
    }

    pub fn player_start_rotation(&self) -> f64 {
        self.start_rotation
    }

    pub fn textures(&self) -> &TextureBank {
        &self.textures
    }

    /// Far plane / depth sentinel: the map cell resolution.
    pub fn cell_resolution(&self) -> f64 {
        self.grid.cell_resolution()
    }

    /// True when `pos` stands inside a wall cell.
    pub fn blocked(&self, pos: Vec2) -> bool {
        self.cell_wall(pos.x.floor() as i32, pos.y.floor() as i32) != EMPTY
    }
}
