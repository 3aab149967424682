pub mod canvas;
pub mod driver;
pub mod geom;
pub mod input;
pub mod schedule;

use std::time::Duration;

use canvas::Canvas;
use driver::Cadence;
use input::Input;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    Ended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    /// The round reached its terminal condition on this tick.
    Ended { score: u32 },
}

/// Fire-and-forget sound triggers raised by an update step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    WallHit,
    PaddleHit,
    Score,
}

/// Text labels written by the update step and read only by the UI.
#[derive(Clone, Debug, Default)]
pub struct Hud {
    fields: Vec<(&'static str, String)>,
    /// One-shot user-visible message, e.g. a rejected action.
    pub notice: Option<String>,
}

impl Hud {
    pub fn set(&mut self, label: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(l, _)| *l == label) {
            Some(field) => field.1 = value,
            None => self.fields.push((label, value)),
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(l, _)| *l == label)
            .map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }
}

/// One game: pure state transitions plus a read-only render pass.
pub trait Game {
    fn title(&self) -> &'static str;
    /// Logical canvas size in pixels.
    fn canvas_size(&self) -> (f32, f32);
    fn cadence(&self) -> Cadence;
    fn phase(&self) -> Phase;

    /// Whether the loop driver should keep ticking in the current phase.
    fn wants_ticks(&self) -> bool {
        self.phase() == Phase::Running
    }

    /// Records intent. Must not touch score, lives or currency.
    fn handle_input(&mut self, input: Input);
    fn update(&mut self, dt: Duration) -> TickOutcome;
    fn render(&self, canvas: &mut dyn Canvas);
    /// Reinitialises the round. Whether the loop keeps running afterwards
    /// follows from [`Game::wants_ticks`].
    fn reset(&mut self);
    fn score(&self) -> u32;
    fn hud(&self) -> &Hud;
    fn take_cues(&mut self) -> Vec<Cue>;
    /// Key hints for the help bar.
    fn controls(&self) -> &'static [(&'static str, &'static str)];
}
