//! Per-frame scene work: ray casting, billboard projection, and the
//! [`Engine`] that ties them to a world, a camera and a renderer.

#[allow(clippy::module_inception)]
mod engine;
mod raycast;
mod sprites;

pub use engine::{Diagnostics, Engine, ViewFlags};
pub use raycast::{HitSource, MAX_RAY_LENGTH, RayCaster, RayHit};
pub use sprites::{Projection, SpriteProjector};
