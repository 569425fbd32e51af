//! Grid + polygon-wall raycaster.
//!
//! A fixed-rate scheduler ([`sim`]) drives the player update and the frame
//! build.  Each frame the [`engine`] casts one ray per column into the
//! [`world`], projects billboard entities, and queues [`renderer::DrawCall`]s
//! for a depth-buffered compositor.

pub mod config;
pub mod engine;
pub mod math;
pub mod renderer;
pub mod sim;
pub mod world;
