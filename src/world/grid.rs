use thiserror::Error;

use crate::world::texture::TextureId;

/// Raw cell code.  `0` = empty, anything else = occupied.
pub type Cell = i32;

pub const EMPTY: Cell = 0;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    #[error("grid must be at least 1×1, got {width}×{height}")]
    Empty { width: usize, height: usize },

    #[error("{layer} layer holds {got} cells, expected {expected}")]
    LayerSize {
        layer: &'static str,
        got: usize,
        expected: usize,
    },
}

/// Three parallel cell layers sharing one `width × height` shape.
///
/// Storage is column-major (`x * height + y`) so a ray stepping along one
/// axis touches neighbouring cells; the public API is coordinate based.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: usize,
    height: usize,
    walls: Vec<Cell>,
    floors: Vec<Cell>,
    roofs: Vec<Cell>,
}

impl Grid {
    /// Build a grid from three layers given in **row-major** order
    /// (`y * width + x`), the order a text map is written in.
    pub fn from_rows(
        width: usize,
        height: usize,
        walls: &[Cell],
        floors: &[Cell],
        roofs: &[Cell],
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::Empty { width, height });
        }
        let expected = width * height;
        for (layer, data) in [("wall", walls), ("floor", floors), ("roof", roofs)] {
            if data.len() != expected {
                return Err(GridError::LayerSize {
                    layer,
                    got: data.len(),
                    expected,
                });
            }
        }

        let transpose = |rows: &[Cell]| -> Vec<Cell> {
            let mut cols = vec![EMPTY; expected];
            for y in 0..height {
                for x in 0..width {
                    cols[x * height + y] = rows[y * width + x];
                }
            }
            cols
        };

        Ok(Self {
            width,
            height,
            walls: transpose(walls),
            floors: transpose(floors),
            roofs: transpose(roofs),
        })
    }

    /// Walls only; floor and roof layers are all empty.
    pub fn from_wall_rows(width: usize, height: usize, walls: &[Cell]) -> Result<Self, GridError> {
        let blank = vec![EMPTY; walls.len()];
        Self::from_rows(width, height, walls, &blank, &blank)
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(x as usize * self.height + y as usize)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Wall code at `(x, y)`, 0 when out of range.
    #[inline]
    pub fn wall(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(EMPTY, |i| self.walls[i])
    }

    #[inline]
    pub fn floor(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(EMPTY, |i| self.floors[i])
    }

    #[inline]
    pub fn roof(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(EMPTY, |i| self.roofs[i])
    }

    /// "Map cell resolution": average side length, used as the far plane.
    pub fn cell_resolution(&self) -> f64 {
        ((self.width + self.height) / 2) as f64
    }
}

/// Texture id carried by a wall code (`v - 1`), `None` for empty cells.
#[inline]
pub fn wall_texture(cell: Cell) -> Option<TextureId> {
    (cell != EMPTY).then(|| (cell - 1) as TextureId)
}
