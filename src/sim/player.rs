use crate::world::{Camera, World};

/// Everything the update phase may ask the input device about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    ToggleDepthView,
    ToggleRayMap,
    Reload,
    Quit,
}

/// Query-only view of the input device.
pub trait Input {
    /// Held right now.
    fn is_key_down(&self, action: Action) -> bool;

    /// Went down since the previous query (edge-triggered).  Devices without
    /// edge tracking fall back to the held state.
    fn was_pressed(&self, action: Action) -> bool {
        self.is_key_down(action)
    }
}

/// One update's worth of movement intent, each axis in `-1 ..= 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f64,
    /// positive = towards +Y (right on screen)
    pub turn: f64,
}

impl InputCmd {
    pub fn read(input: &impl Input) -> Self {
        let mut cmd = Self::default();
        if input.is_key_down(Action::Forward) {
            cmd.forward += 1.0;
        }
        if input.is_key_down(Action::Backward) {
            cmd.forward -= 1.0;
        }
        if input.is_key_down(Action::TurnLeft) {
            cmd.turn -= 1.0;
        }
        if input.is_key_down(Action::TurnRight) {
            cmd.turn += 1.0;
        }
        cmd
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Controls {
    /// cells per second
    pub walk_speed: f64,
    /// radians per second
    pub turn_speed: f64,
}

/// Turn, then walk; a step that ends inside a wall cell is undone.
pub fn player_input(camera: &mut Camera, world: &World, cmd: InputCmd, controls: Controls, dt: f64) {
    /* 1. turn */
    if cmd.turn != 0.0 {
        camera.turn(cmd.turn * controls.turn_speed * dt);
    }

    /* 2. walk with collision revert */
    if cmd.forward != 0.0 {
        let before = camera.pos;
        camera.step(cmd.forward * controls.walk_speed * dt);
        if world.blocked(camera.pos) {
            camera.pos = before;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::Vec2,
        world::{Grid, TextureBank},
    };
    use std::collections::HashSet;

    struct Held(HashSet<Action>);

    impl Input for Held {
        fn is_key_down(&self, action: Action) -> bool {
            self.0.contains(&action)
        }
    }

    fn held(actions: &[Action]) -> Held {
        Held(actions.iter().copied().collect())
    }

    fn corridor() -> World {
        // 4×1 open corridor with a wall at x = 3
        World::new(
            "c",
            Grid::from_wall_rows(4, 1, &[0, 0, 0, 1]).unwrap(),
            TextureBank::new(),
        )
    }

    const CONTROLS: Controls = Controls {
        walk_speed: 2.0,
        turn_speed: 1.0,
    };

    #[test]
    fn opposite_keys_cancel() {
        let cmd = InputCmd::read(&held(&[Action::Forward, Action::Backward, Action::TurnRight]));
        assert_eq!(cmd, InputCmd { forward: 0.0, turn: 1.0 });
    }

    #[test]
    fn walks_along_facing() {
        let world = corridor();
        let mut cam = Camera::new(Vec2::new(0.5, 0.5), 0.0, 1.0);
        let cmd = InputCmd::read(&held(&[Action::Forward]));
        player_input(&mut cam, &world, cmd, CONTROLS, 0.5);
        assert!((cam.pos - Vec2::new(1.5, 0.5)).length() < 1e-12);
    }

    #[test]
    fn step_into_wall_is_reverted() {
        let world = corridor();
        let mut cam = Camera::new(Vec2::new(2.5, 0.5), 0.0, 1.0);
        player_input(&mut cam, &world, InputCmd { forward: 1.0, turn: 0.0 }, CONTROLS, 0.5);
        assert_eq!(cam.pos, Vec2::new(2.5, 0.5));
        player_input(&mut cam, &world, InputCmd { forward: -1.0, turn: 0.0 }, CONTROLS, 0.5);
        assert!((cam.pos - Vec2::new(1.5, 0.5)).length() < 1e-12);
    }

    #[test]
    fn turning_left_wraps() {
        let world = corridor();
        let mut cam = Camera::new(Vec2::new(0.5, 0.5), 0.0, 1.0);
        let cmd = InputCmd::read(&held(&[Action::TurnLeft]));
        player_input(&mut cam, &world, cmd, CONTROLS, 0.25);
        assert!((cam.rotation - (std::f64::consts::TAU - 0.25)).abs() < 1e-12);
    }

    #[test]
    fn was_pressed_defaults_to_held() {
        let input = held(&[Action::Reload]);
        assert!(input.was_pressed(Action::Reload));
        assert!(!input.was_pressed(Action::Quit));
    }
}
