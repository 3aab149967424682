use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::engine::canvas::Canvas;
use crate::engine::driver::{DriverState, LoopDriver};
use crate::engine::input::Input;
use crate::engine::{Cue, Game, Phase, TickOutcome};

/// Result of advancing a session by one poll.
#[derive(Debug, Default)]
pub struct Advance {
    pub ticked: bool,
    pub ended: Option<u32>,
    pub cues: Vec<Cue>,
}

/// One game owned by one loop driver.
pub struct Session<G: Game> {
    pub game: G,
    driver: LoopDriver,
    active: bool,
}

impl<G: Game> Session<G> {
    pub fn new(game: G) -> Self {
        let driver = LoopDriver::new(game.cadence());
        Self { game, driver, active: false }
    }

    pub fn driver(&self) -> &LoopDriver {
        &self.driver
    }

    /// The session's view became visible.
    pub fn activate(&mut self, now: Instant) {
        self.active = true;
        info!(game = self.game.title(), "session activated");
        self.sync(now);
    }

    /// The session's view was hidden; ticking stops, state is kept.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.driver.pause();
        debug!(game = self.game.title(), "session paused");
    }

    pub fn handle_input(&mut self, input: Input, now: Instant) {
        let restart = match input {
            Input::Reset => true,
            Input::Confirm => self.game.phase() == Phase::Ended,
            _ => false,
        };
        if restart {
            self.reset(now);
            return;
        }
        self.game.handle_input(input);
        self.sync(now);
    }

    pub fn reset(&mut self, now: Instant) {
        self.game.reset();
        self.driver.set_cadence(self.game.cadence(), now);
        let keep_running = self.active && self.game.wants_ticks();
        self.driver.reset(now, keep_running);
        info!(game = self.game.title(), keep_running, "session reset");
    }

    pub fn poll(&mut self, now: Instant) -> Advance {
        let Some(tick) = self.driver.poll(now) else {
            return Advance::default();
        };
        let outcome = self.game.update(tick.dt);
        self.driver.set_cadence(self.game.cadence(), now);
        self.sync(now);

        let ended = match outcome {
            TickOutcome::Ended { score } => Some(score),
            TickOutcome::Continue => None,
        };
        Advance { ticked: true, ended, cues: self.game.take_cues() }
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.driver.time_until_next(now)
    }

    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.game.render(canvas);
    }

    fn sync(&mut self, now: Instant) {
        if self.active && self.game.wants_ticks() {
            if self.driver.state() != DriverState::Running {
                self.driver.resume(now);
            }
        } else {
            self.driver.pause();
        }
    }
}
