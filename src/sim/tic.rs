//! Fixed-rate scheduler.
//!
//! Two accumulators run off one monotonic [`Clock`]: one paces the
//! simulation update, the other the frame build.  Each [`Scheduler::tick`]
//! fires each phase at most once, so the cadences stay independent of each
//! other and of loop jitter.

use std::time::{Duration, Instant};

const SECOND: Duration = Duration::from_secs(1);

/// Monotonic time since some fixed start.
pub trait Clock {
    fn now(&mut self) -> Duration;

    /// Give the CPU back until roughly `d` has passed.
    fn idle(&mut self, _d: Duration) {}
}

/// Wall clock backed by [`Instant`].
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> Duration {
        self.start.elapsed()
    }

    fn idle(&mut self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Deterministic clock for tests: every `now()` moves time forward by
/// `step`.
#[derive(Clone, Debug)]
pub struct ManualClock {
    pub now: Duration,
    pub step: Duration,
}

impl ManualClock {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            step,
        }
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> Duration {
        self.now += self.step;
        self.now
    }
}

/// Loop state shared with the update and draw phases.
///
/// Lives exactly as long as its [`Scheduler`]; the phases get it passed in
/// instead of reaching for globals.
#[derive(Clone, Debug, PartialEq)]
pub struct Timing {
    /// Clearing this ends [`Scheduler::run`].
    pub running: bool,
    /// Frames / updates counted during the last full second.
    pub fps: u32,
    pub ups: u32,
    /// Seconds between the last two frames.
    pub delta_time: f64,
    /// Fixed simulation step in seconds.
    pub update_dt: f64,
    pub update_acc: f64,
    pub frame_acc: f64,
    frames: u32,
    updates: u32,
    second: Duration,
    last_frame: Option<Duration>,
}

impl Timing {
    pub fn new(update_dt: f64) -> Self {
        Self {
            running: true,
            fps: 0,
            ups: 0,
            delta_time: 0.0,
            update_dt,
            update_acc: 0.0,
            frame_acc: 0.0,
            frames: 0,
            updates: 0,
            second: Duration::ZERO,
            last_frame: None,
        }
    }
}

/// The two phases the scheduler drives.
pub trait Game {
    /// Advance the simulation by `timing.update_dt`.
    fn update(&mut self, timing: &mut Timing);

    /// Produce one frame; reads state only.
    fn draw(&mut self, timing: &Timing);
}

/// Which phases one tick ran.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fired {
    pub update: bool,
    pub draw: bool,
}

pub struct Scheduler<C: Clock> {
    clock: C,
    update_interval: Duration,
    frame_interval: Duration,
    previous: Duration,
    timing: Timing,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(mut clock: C, update_interval: Duration, frame_interval: Duration) -> Self {
        let previous = clock.now();
        Self {
            clock,
            update_interval,
            frame_interval,
            previous,
            timing: Timing::new(update_interval.as_secs_f64()),
        }
    }

    #[inline]
    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    #[inline]
    pub fn timing_mut(&mut self) -> &mut Timing {
        &mut self.timing
    }

    /// One pass of the loop body.
    pub fn tick(&mut self, game: &mut impl Game) -> Fired {
        let now = self.clock.now();
        let elapsed = now.saturating_sub(self.previous);
        self.previous = now;

        let t = &mut self.timing;
        t.update_acc += elapsed.as_secs_f64() / self.update_interval.as_secs_f64();
        t.frame_acc += elapsed.as_secs_f64() / self.frame_interval.as_secs_f64();

        let mut fired = Fired::default();
        if t.update_acc >= 1.0 {
            game.update(t);
            t.update_acc -= 1.0;
            t.updates += 1;
            fired.update = true;
        }
        if t.frame_acc >= 1.0 {
            if let Some(last) = t.last_frame {
                t.delta_time = now.saturating_sub(last).as_secs_f64();
            }
            t.last_frame = Some(now);
            game.draw(t);
            t.frame_acc -= 1.0;
            t.frames += 1;
            fired.draw = true;
        }

        t.second += elapsed;
        if t.second >= SECOND {
            t.second -= SECOND;
            t.fps = t.frames;
            t.ups = t.updates;
            t.frames = 0;
            t.updates = 0;
            log::debug!("{} fps, {} ups", t.fps, t.ups);
        }
        fired
    }

    /// Tick until `running` is cleared, idling whenever neither phase is
    /// due.
    pub fn run(&mut self, game: &mut impl Game) {
        while self.timing.running {
            let fired = self.tick(game);
            if fired == Fired::default() {
                let t = &self.timing;
                let wait = self
                    .update_interval
                    .mul_f64((1.0 - t.update_acc).max(0.0))
                    .min(self.frame_interval.mul_f64((1.0 - t.frame_acc).max(0.0)));
                self.clock.idle(wait);
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
