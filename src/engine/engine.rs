use std::time::Instant;

use bitflags::bitflags;

use crate::{
    config::{Config, ViewMetrics},
    engine::{RayCaster, RayHit, SpriteProjector},
    math::from_angle,
    renderer::{DrawCall, Renderer, RendererExt, Rgba, WallStripe, minimap},
    sim::{Action, Controls, Input, InputCmd, Timing, player_input},
    world::{Camera, World, WorldError, WorldSource},
};

bitflags! {
    /// Debug views toggled at runtime.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ViewFlags: u8 {
        /// Show the depth buffer instead of colours.
        const DEPTH_VIEW = 1 << 0;
        /// Draw every ray on the overhead map.
        const MAP_RAYS = 1 << 1;
    }
}

/// Read-only counters for an external overlay.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Diagnostics {
    pub fps: u32,
    pub ups: u32,
    /// seconds
    pub delta_time: f64,
    /// nanoseconds, running mean
    pub avg_ray_time: f64,
}

pub struct Engine<R: Renderer> {
    pub renderer: R,
    pub camera: Camera,
    pub flags: ViewFlags,
    world: World,
    config: Config,
    metrics: ViewMetrics,
    caster: RayCaster,
    hits: Vec<RayHit>,
    calls: Vec<DrawCall>,
    avg_ray_time: f64,
}

impl<R: Renderer> Engine<R> {
    pub fn new(renderer: R, world: World, config: Config) -> Self {
        let metrics = ViewMetrics::for_config(&config, &world);
        let camera = Self::spawn_camera(&world, &config);
        Self {
            renderer,
            camera,
            flags: ViewFlags::default(),
            world,
            config,
            metrics,
            caster: RayCaster::default(),
            hits: Vec::new(),
            calls: Vec::new(),
            avg_ray_time: 0.0,
        }
    }

    fn spawn_camera(world: &World, config: &Config) -> Camera {
        Camera::new(
            world.player_start_pos(),
            world.player_start_rotation(),
            config.fov_radians(),
        )
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn metrics(&self) -> &ViewMetrics {
        &self.metrics
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Hits of the last frame, one per ray, left to right.
    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    /// Draw queue of the last frame.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /*──────────────────────────── update phase ──────────────────────────*/

    /// Advance the player and every animation by `dt` seconds.
    pub fn update(&mut self, input: &impl Input, dt: f64) {
        if input.was_pressed(Action::ToggleDepthView) {
            self.flags.toggle(ViewFlags::DEPTH_VIEW);
        }
        if input.was_pressed(Action::ToggleRayMap) {
            self.flags.toggle(ViewFlags::MAP_RAYS);
        }

        let controls = Controls {
            walk_speed: self.config.walk_speed,
            turn_speed: self.config.turn_speed,
        };
        player_input(&mut self.camera, &self.world, InputCmd::read(input), controls, dt);

        for e in self.world.entities_mut() {
            e.sprite.advance(dt);
        }
    }

    /*──────────────────────────── draw phase ────────────────────────────*/

    /// Cast the per-frame fan of rays from the camera.
    pub fn cast_rays(&mut self) {
        self.hits.clear();
        let rays = self.config.ray_count();
        let first = self.camera.first_ray_angle();
        let step = self.camera.ray_step(rays);

        for i in 0..rays {
            let angle = first + step * i as f64;
            let t0 = Instant::now();
            let hit = self.caster.cast_column(
                &self.world,
                self.camera.pos,
                from_angle(angle),
                angle,
                self.camera.rotation,
            );
            let ns = t0.elapsed().as_nanos() as f64;
            self.avg_ray_time = (self.avg_ray_time + ns) / 2.0;
            self.hits.push(hit);
        }
    }

    /// Rebuild the draw queue: wall stripes, visible sprites, overhead map.
    pub fn build_frame(&mut self) {
        self.cast_rays();
        self.calls.clear();

        let col = self.config.column_width() as i32;
        for (i, hit) in self.hits.iter().enumerate() {
            if hit.is_hit() {
                self.calls.push(DrawCall::Stripe(WallStripe {
                    x: self.metrics.x_offset + i as i32 * col,
                    width: col,
                    hit: *hit,
                }));
            }
        }

        let projector = SpriteProjector::new(&self.camera, &self.metrics);
        for e in self.world.entities() {
            let p = projector.project(e.position, e.sprite.size);
            e.sprite.render(&p, &mut self.calls);
        }

        let rays = self
            .flags
            .contains(ViewFlags::MAP_RAYS)
            .then_some(self.hits.as_slice());
        minimap::overhead_map(&self.world, &self.camera, rays, &self.metrics, &mut self.calls);
    }

    /// Build, composite and hand the finished frame to `submit`.
    pub fn render_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.build_frame();
        self.renderer
            .set_depth_view(self.flags.contains(ViewFlags::DEPTH_VIEW));
        self.renderer
            .draw_frame(&self.metrics, &self.calls, self.world.textures(), submit);
    }

    /*──────────────────────────── world swap ────────────────────────────*/

    /// Swap in a whole new world between frames; the camera respawns at its
    /// start.
    pub fn replace_world(&mut self, world: World) {
        log::info!("switching world `{}` -> `{}`", self.world.name, world.name);
        self.metrics = ViewMetrics::for_config(&self.config, &world);
        self.camera = Self::spawn_camera(&world, &self.config);
        self.world = world;
        self.hits.clear();
        self.calls.clear();
    }

    /// Load from `source` and swap on success.  On failure the active world
    /// stays untouched and the error goes back to the caller.
    pub fn reload(&mut self, source: &dyn WorldSource) -> Result<(), WorldError> {
        match source.load() {
            Ok(world) => {
                self.replace_world(world);
                Ok(())
            }
            Err(e) => {
                log::error!("reload failed, keeping `{}`: {e}", self.world.name);
                Err(e)
            }
        }
    }

    /*──────────────────────────── diagnostics ───────────────────────────*/

    pub fn diagnostics(&self, timing: &Timing) -> Diagnostics {
        Diagnostics {
            fps: timing.fps,
            ups: timing.ups,
            delta_time: timing.delta_time,
            avg_ray_time: self.avg_ray_time,
        }
    }

    /// Overlay text: every entity with its current projection, then every
    /// polygon wall.
    pub fn debug_lines(&self) -> Vec<String> {
        let projector = SpriteProjector::new(&self.camera, &self.metrics);
        let mut out = Vec::new();
        for e in self.world.entities() {
            out.push(format!("- {} -", e.name));
            out.extend(e.debug_info(&projector.project(e.position, e.sprite.size)));
        }
        for (i, wall) in self.world.poly_walls().iter().enumerate() {
            out.push(format!("- PolyWall {i} -"));
            out.extend(wall.debug_info());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::Vec2,
        renderer::Software,
        world::{
            Animation, Animator, Entity, Grid, PolyWall, SpriteRenderer, Texture, TextureBank,
        },
    };
    use clap::Parser;
    use std::{cell::Cell, collections::HashSet};

    struct Keys {
        held: HashSet<Action>,
    }

    impl Input for Keys {
        fn is_key_down(&self, action: Action) -> bool {
            self.held.contains(&action)
        }
    }

    fn keys(actions: &[Action]) -> Keys {
        Keys {
            held: actions.iter().copied().collect(),
        }
    }

    fn config(args: &[&str]) -> Config {
        Config::parse_from(std::iter::once("test").chain(args.iter().copied()))
    }

    /// 5×5 bordered room, player in the middle facing +X, one lamp ahead.
    fn room(name: &str) -> World {
        #[rustfmt::skip]
        let cells = [
            1, 1, 1, 1, 1,
            1, 0, 0, 0, 1,
            1, 0, 0, 0, 1,
            1, 0, 0, 0, 1,
            1, 1, 1, 1, 1,
        ];
        let mut bank = TextureBank::new();
        bank.insert("WALL", Texture::new(2, 2, vec![0xFF_88_88_88; 4]))
            .unwrap();
        bank.insert("LAMP", Texture::new(2, 2, vec![0xFF_FF_FF_00; 4]))
            .unwrap();
        let mut w = World::new(name, Grid::from_wall_rows(5, 5, &cells).unwrap(), bank)
            .with_player_start(Vec2::new(2.5, 2.5), 0.0);
        let blink = Animation {
            name: "blink".into(),
            frames: vec![1, 0],
            frame_time: 0.1,
        };
        w.add_entity(Entity::new(
            "lamp",
            Vec2::new(3.5, 2.5),
            SpriteRenderer::animated(Animator::new(vec![blink]), Vec2::new(4.0, 4.0), 0),
        ));
        w
    }

    fn engine(args: &[&str]) -> Engine<Software> {
        let mut all = vec!["--viewport-width", "40", "--viewport-height", "30"];
        all.extend_from_slice(args);
        Engine::new(Software::default(), room("room"), config(&all))
    }

    #[test]
    fn camera_spawns_at_world_start() {
        let e = engine(&[]);
        assert_eq!(e.camera.pos, Vec2::new(2.5, 2.5));
        assert!((e.camera.fov - 70f64.to_radians()).abs() < 1e-12);
        assert_eq!(e.metrics().x_offset, 40);
    }

    #[test]
    fn one_stripe_per_ray_at_column_offsets() {
        let mut e = engine(&["--rays", "10"]);
        e.build_frame();
        assert_eq!(e.hits().len(), 10);
        let stripes: Vec<_> = e
            .calls()
            .iter()
            .filter_map(|c| match c {
                DrawCall::Stripe(s) => Some((s.x, s.width)),
                _ => None,
            })
            .collect();
        let expected: Vec<_> = (0..10).map(|i| (40 + i * 4, 4)).collect();
        assert_eq!(stripes, expected);
    }

    #[test]
    fn centre_ray_hits_the_far_wall() {
        let mut e = engine(&["--rays", "2", "--fov", "90"]);
        e.cast_rays();
        // rays at -45° and 0°
        let centre = e.hits()[1];
        assert!((centre.distance - 1.5).abs() < 1e-9);
        assert_eq!(centre.cell, (4, 2));
        assert!((e.hits()[0].perpendicular_distance() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn visible_entity_is_queued_and_hidden_is_not() {
        let mut e = engine(&[]);
        e.build_frame();
        let sprites = e
            .calls()
            .iter()
            .filter(|c| matches!(c, DrawCall::Sprite(_)))
            .count();
        assert_eq!(sprites, 1);

        e.camera.rotation = std::f64::consts::PI;
        e.build_frame();
        assert!(!e.calls().iter().any(|c| matches!(c, DrawCall::Sprite(_))));
    }

    #[test]
    fn update_moves_toggles_and_animates() {
        let mut e = engine(&["--walk-speed", "1"]);
        e.update(&keys(&[Action::Forward, Action::ToggleDepthView]), 0.5);
        assert!((e.camera.pos.x - 3.0).abs() < 1e-12);
        assert!(e.flags.contains(ViewFlags::DEPTH_VIEW));
        assert_eq!(e.world().entities()[0].sprite.texture(), Some(0));

        e.update(&keys(&[Action::ToggleDepthView, Action::ToggleRayMap]), 0.0);
        assert_eq!(e.flags, ViewFlags::MAP_RAYS);
    }

    #[test]
    fn ray_map_adds_green_lines() {
        let mut e = engine(&["--rays", "5"]);
        e.build_frame();
        let plain = e.calls().len();
        e.flags.insert(ViewFlags::MAP_RAYS);
        e.build_frame();
        assert_eq!(e.calls().len(), plain + 5);
    }

    #[test]
    fn render_frame_submits_full_window() {
        let mut e = engine(&[]);
        let size = Cell::new((0, 0));
        e.render_frame(|fb, w, h| {
            assert_eq!(fb.len(), w * h);
            size.set((w, h));
        });
        assert_eq!(size.get(), (80, 30));
        // off-centre column: wall between sky and floor
        assert_eq!(e.renderer.pixel(45, 15), Some(0xFF_88_88_88));
        assert_eq!(e.renderer.pixel(45, 2), Some(crate::config::SKY_COLOR));
        // the lamp stands in front of the far wall and wins the depth test
        assert_eq!(e.renderer.pixel(60, 15), Some(0xFF_FF_FF_00));
    }

    struct Fixed {
        fail: bool,
    }

    impl WorldSource for Fixed {
        fn load(&self) -> Result<World, WorldError> {
            if self.fail {
                return Err(WorldError::Source("map file vanished".into()));
            }
            let mut w = room("reloaded").with_player_start(Vec2::new(1.5, 1.5), 1.0);
            w.add_poly_wall(PolyWall::new([Vec2::ZERO, Vec2::ONE], 0, true, 0.0));
            Ok(w)
        }
    }

    #[test]
    fn failed_reload_keeps_the_world() {
        let mut e = engine(&[]);
        e.camera.pos = Vec2::new(1.2, 1.2);
        let err = e.reload(&Fixed { fail: true });
        assert!(err.is_err());
        assert_eq!(e.world().name, "room");
        assert_eq!(e.camera.pos, Vec2::new(1.2, 1.2));
    }

    #[test]
    fn reload_swaps_and_respawns() {
        let mut e = engine(&[]);
        e.reload(&Fixed { fail: false }).unwrap();
        assert_eq!(e.world().name, "reloaded");
        assert_eq!(e.camera.pos, Vec2::new(1.5, 1.5));
        assert_eq!(e.camera.rotation, 1.0);
        assert!(e.calls().is_empty());
    }

    #[test]
    fn diagnostics_mirror_timing() {
        let mut e = engine(&["--rays", "4"]);
        e.cast_rays();
        let mut timing = Timing::new(0.005);
        timing.fps = 60;
        timing.ups = 200;
        let d = e.diagnostics(&timing);
        assert_eq!((d.fps, d.ups), (60, 200));
        assert!(d.avg_ray_time >= 0.0);
    }

    #[test]
    fn debug_lines_cover_entities_and_walls() {
        let mut e = engine(&[]);
        e.reload(&Fixed { fail: false }).unwrap();
        let lines = e.debug_lines();
        assert_eq!(lines[0], "- lamp -");
        assert!(lines.contains(&"Sprite Renderer: ANIMATED".to_string()));
        assert!(lines.contains(&"- PolyWall 0 -".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("(1,1)"));
    }
}
