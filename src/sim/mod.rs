mod player;
mod tic;

pub use player::{Action, Controls, Input, InputCmd, player_input};
pub use tic::{Clock, Fired, Game, ManualClock, Scheduler, SystemClock, Timing};
