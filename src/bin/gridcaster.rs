//! Interactive viewer for the built-in demo world.
//!
//! ```bash
//! cargo run --release -- --fov 80 --rays 300
//! ```
//!
//! W/S or ↑/↓ walk, A/D or ←/→ turn, 4 toggles rays on the map, 7 toggles
//! the depth view, 8 reloads the world, Esc quits.

use clap::Parser;
use log::LevelFilter::Off;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use gridcaster::{
    config::Config,
    engine::Engine,
    renderer::Software,
    sim::{Action, Game, Input, Scheduler, SystemClock, Timing},
    world::{DemoWorld, WorldSource},
};

fn keys(action: Action) -> &'static [Key] {
    match action {
        Action::Forward => &[Key::W, Key::Up],
        Action::Backward => &[Key::S, Key::Down],
        Action::TurnLeft => &[Key::A, Key::Left],
        Action::TurnRight => &[Key::D, Key::Right],
        Action::ToggleRayMap => &[Key::Key4],
        Action::ToggleDepthView => &[Key::Key7],
        Action::Reload => &[Key::Key8],
        Action::Quit => &[Key::Escape],
    }
}

/// Held keys come straight from the window; presses are latched once per
/// presented frame so several updates between two frames see them once.
struct WindowInput<'a> {
    window: &'a Window,
    pressed: &'a [Key],
}

impl Input for WindowInput<'_> {
    fn is_key_down(&self, action: Action) -> bool {
        keys(action).iter().any(|&k| self.window.is_key_down(k))
    }

    fn was_pressed(&self, action: Action) -> bool {
        keys(action).iter().any(|k| self.pressed.contains(k))
    }
}

struct App {
    engine: Engine<Software>,
    window: Window,
    pressed: Vec<Key>,
    source: DemoWorld,
    shown: (u32, u32),
}

impl Game for App {
    fn update(&mut self, timing: &mut Timing) {
        let input = WindowInput {
            window: &self.window,
            pressed: &self.pressed,
        };
        if !self.window.is_open() || input.is_key_down(Action::Quit) {
            timing.running = false;
            return;
        }
        if input.was_pressed(Action::Reload) {
            // the engine already logged the failure; the current world stays
            if let Err(e) = self.engine.reload(&self.source) {
                log::debug!("reload skipped: {e}");
            }
        }
        self.engine.update(&input, timing.update_dt);
        self.pressed.clear();
    }

    fn draw(&mut self, timing: &Timing) {
        let window = &mut self.window;
        let mut presented = Ok(());
        self.engine
            .render_frame(|fb, w, h| presented = window.update_with_buffer(fb, w, h));
        if let Err(e) = presented {
            log::error!("could not present frame: {e}");
        }
        self.pressed
            .extend(window.get_keys_pressed(KeyRepeat::No));

        // the overlay lives in the title bar
        let d = self.engine.diagnostics(timing);
        if (d.fps, d.ups) != self.shown {
            self.shown = (d.fps, d.ups);
            window.set_title(&format!(
                "gridcaster | {} fps | {} ups | {:.1} ms | {:.0} ns/ray",
                d.fps,
                d.ups,
                d.delta_time * 1000.0,
                d.avg_ray_time
            ));
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = Config::parse();

    simplelog::TermLogger::init(
        cfg.log_level,
        simplelog::ConfigBuilder::new()
            .set_target_level(Off)
            .set_location_level(Off)
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let source = DemoWorld;
    let world = source.load()?;
    log::info!("loaded world `{}` ({}×{})", world.name, world.width(), world.height());

    let (w, h) = cfg.window_size();
    let window = Window::new("gridcaster", w, h, WindowOptions::default())?;

    let mut scheduler = Scheduler::new(
        SystemClock::new(),
        cfg.update_interval(),
        cfg.frame_interval(),
    );
    let mut app = App {
        engine: Engine::new(Software::default(), world, cfg),
        window,
        pressed: Vec::new(),
        source,
        shown: (u32::MAX, u32::MAX),
    };
    scheduler.run(&mut app);
    Ok(())
}
