// Format-agnostic repository of textures handed over by the asset loader.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

use crate::renderer::Rgba;

/// Runtime handle for a texture in this bank.
///
/// Wall cells store `id + 1` (0 means "no wall"), so id 0 is the first
/// texture the loader inserted.
pub type TextureId = u16;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
}

impl Texture {
    /// Shape is checked when the texture enters a [`TextureBank`].
    pub fn new(w: usize, h: usize, pixels: Vec<Rgba>) -> Self {
        Self { w, h, pixels }
    }

    /// Texel at `(x, y)`; callers keep coordinates inside the image.
    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.w + x]
    }
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Rgba = 0xFF_A0_A0_A0;
        const DARK: Rgba = 0xFF_50_50_50;
        let mut pix = vec![0; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture::new(8, 8, pix)
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Zero-sized image, or pixel count does not match `w * h`.
    #[error("texture `{name}` is {w}×{h} but has {len} pixels")]
    BadShape {
        name: String,
        w: usize,
        h: usize,
        len: usize,
    },

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),
}

/// Read side of the texture cache as the compositor sees it.
pub trait TextureSource {
    /// Borrow a whole image (sprites are drawn from these).
    fn texture(&self, id: TextureId) -> Result<&Texture, TextureError>;

    /// Resample one vertical column of texture `id` at horizontal coordinate
    /// `u ∈ [0,1]` into `dest_height` pixels, written to `out`.
    ///
    /// * negative `dest_height` leaves `out` empty;
    /// * `u` outside `[0,1]` is logged and yields a zero-filled column;
    /// * `shaded` darkens every pixel (the second grid-wall orientation).
    ///
    /// The caller clamps `dest_height` to its own maximum beforehand.
    fn texture_stripe(
        &self,
        id: TextureId,
        u: f64,
        dest_height: i32,
        shaded: bool,
        out: &mut Vec<Rgba>,
    ) -> Result<(), TextureError>;
}

/// Scale RGB by 0.7 and keep alpha, like a classic "darker" colour helper.
#[inline]
pub fn darken(c: Rgba) -> Rgba {
    const FACTOR: u32 = 7; // tenths
    let a = c & 0xFF00_0000;
    let r = ((c >> 16) & 0xFF) * FACTOR / 10;
    let g = ((c >> 8) & 0xFF) * FACTOR / 10;
    let b = (c & 0xFF) * FACTOR / 10;
    a | (r << 16) | (g << 8) | b
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about file formats; that's the loader's job.
/// * Stores exactly one copy of every name.
///
/// **Thread-safety:** the bank is only read during a frame; a reload builds
/// a new bank instead of mutating the live one.
#[derive(Debug, Default)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    /// * Fails if the image is empty or its pixel count is off (`BadShape`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.w == 0 || tex.h == 0 || tex.pixels.len() != tex.w * tex.h {
            return Err(TextureError::BadShape {
                name,
                w: tex.w,
                h: tex.h,
                len: tex.pixels.len(),
            });
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

impl TextureSource for TextureBank {
    fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    fn texture_stripe(
        &self,
        id: TextureId,
        u: f64,
        dest_height: i32,
        shaded: bool,
        out: &mut Vec<Rgba>,
    ) -> Result<(), TextureError> {
        out.clear();
        let tex = self.texture(id)?;
        if dest_height < 0 {
            return Ok(());
        }
        let height = dest_height as usize;

        if !(0.0..=1.0).contains(&u) {
            log::error!("texture u {u} outside [0,1] for texture {id}");
            out.resize(height, 0);
            return Ok(());
        }

        let step_v = tex.h as f64 / height.max(1) as f64;
        let x = (u * (tex.w - 1) as f64) as usize;
        let mut v = 0.0;
        out.reserve(height);
        for _ in 0..height {
            let y = (v as usize).min(tex.h - 1);
            let c = tex.texel(x, y);
            out.push(if shaded { darken(c) } else { c });
            v += step_v;
        }
        Ok(())
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
