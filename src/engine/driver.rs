//! Tick scheduling for a single game session.
//!
//! The driver never sleeps or spawns anything itself. The host asks how long
//! it may block ([`LoopDriver::time_until_next`]) and then calls
//! [`LoopDriver::poll`] with the current time. At most one tick is pending at
//! any moment, and pausing or resetting drops it on the spot.

use std::time::{Duration, Instant};

/// Nominal display refresh interval (~60 Hz).
pub const DISPLAY_FRAME: Duration = Duration::from_millis(16);
/// Upper bound on the `dt` reported under [`Cadence::Display`].
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cadence {
    /// As fast as the display refreshes; `dt` is the measured elapsed time.
    Display,
    /// Constant interval; `dt` always equals the interval.
    Fixed(Duration),
}

impl Cadence {
    pub fn interval(&self) -> Duration {
        match self {
            Cadence::Display => DISPLAY_FRAME,
            Cadence::Fixed(d) => *d,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Stopped,
    Running,
    Paused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// 1-based sequence number since the last reset.
    pub seq: u64,
    pub dt: Duration,
}

pub struct LoopDriver {
    cadence: Cadence,
    state: DriverState,
    due: Option<Instant>,
    last_tick: Option<Instant>,
    ticks: u64,
}

impl LoopDriver {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            state: DriverState::Stopped,
            due: None,
            last_tick: None,
            ticks: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    /// Whether a tick is currently scheduled.
    pub fn has_pending(&self) -> bool {
        self.due.is_some()
    }

    pub fn start(&mut self, now: Instant) {
        if self.state == DriverState::Running {
            return;
        }
        self.state = DriverState::Running;
        // Measure the first dt from here so paused time never leaks into it.
        self.last_tick = Some(now);
        self.due = Some(now + self.cadence.interval());
    }

    pub fn pause(&mut self) {
        if self.state == DriverState::Running {
            self.state = DriverState::Paused;
        }
        self.due = None;
    }

    pub fn resume(&mut self, now: Instant) {
        self.start(now);
    }

    pub fn reset(&mut self, now: Instant, keep_running: bool) {
        self.due = None;
        self.last_tick = None;
        self.ticks = 0;
        self.state = DriverState::Stopped;
        if keep_running {
            self.start(now);
        }
    }

    pub fn set_cadence(&mut self, cadence: Cadence, now: Instant) {
        if cadence == self.cadence {
            return;
        }
        self.cadence = cadence;
        if self.due.is_some() {
            let base = self.last_tick.unwrap_or(now);
            self.due = Some((base + cadence.interval()).max(now));
        }
    }

    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }

    /// Consumes the pending tick if it is due and schedules its successor.
    pub fn poll(&mut self, now: Instant) -> Option<Tick> {
        let due = self.due?;
        if now < due {
            return None;
        }
        let interval = self.cadence.interval();
        let dt = match self.cadence {
            Cadence::Fixed(d) => d,
            Cadence::Display => {
                let last = self.last_tick.unwrap_or(now);
                now.saturating_duration_since(last).min(MAX_FRAME_DELTA)
            }
        };
        self.last_tick = Some(now);
        self.ticks += 1;

        let mut next = due + interval;
        if next <= now {
            // Fell behind: skip ahead instead of firing a burst of ticks.
            next = now + interval;
        }
        self.due = Some(next);

        Some(Tick { seq: self.ticks, dt })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn nothing_fires_before_start() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Fixed(ms(120)));
        assert_eq!(d.poll(t0 + ms(500)), None);
        assert_eq!(d.time_until_next(t0), None);
    }

    #[test]
    fn fixed_cadence_reports_constant_dt() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Fixed(ms(120)));
        d.start(t0);
        assert_eq!(d.poll(t0 + ms(100)), None);
        let tick = d.poll(t0 + ms(130)).unwrap();
        assert_eq!(tick.dt, ms(120));
        assert_eq!(tick.seq, 1);
        assert_eq!(d.time_until_next(t0 + ms(130)), Some(ms(110)));
    }

    #[test]
    fn display_cadence_measures_elapsed_time() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Display);
        d.start(t0);
        assert_eq!(d.poll(t0 + ms(20)).unwrap().dt, ms(20));
        assert_eq!(d.poll(t0 + ms(37)).unwrap().dt, ms(17));
    }

    #[test]
    fn display_dt_is_clamped_after_a_stall() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Display);
        d.start(t0);
        assert_eq!(d.poll(t0 + ms(5000)).unwrap().dt, MAX_FRAME_DELTA);
    }

    #[test]
    fn one_poll_yields_at_most_one_tick() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Fixed(ms(10)));
        d.start(t0);
        assert!(d.poll(t0 + ms(1000)).is_some());
        assert_eq!(d.poll(t0 + ms(1000)), None);
        assert_eq!(d.time_until_next(t0 + ms(1000)), Some(ms(10)));
    }

    #[test]
    fn pause_drops_the_pending_tick() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Fixed(ms(50)));
        d.start(t0);
        d.pause();
        assert!(!d.has_pending());
        assert_eq!(d.poll(t0 + ms(1000)), None);
        assert_eq!(d.state(), DriverState::Paused);
    }

    #[test]
    fn resume_does_not_count_paused_time() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Display);
        d.start(t0);
        d.poll(t0 + ms(16)).unwrap();
        d.pause();
        d.resume(t0 + ms(10_000));
        let tick = d.poll(t0 + ms(10_016)).unwrap();
        assert_eq!(tick.dt, ms(16));
        assert_eq!(tick.seq, 2);
    }

    #[test]
    fn reset_clears_counter_and_optionally_restarts() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Fixed(ms(10)));
        d.start(t0);
        d.poll(t0 + ms(10)).unwrap();
        d.reset(t0 + ms(15), false);
        assert_eq!(d.state(), DriverState::Stopped);
        assert_eq!(d.poll(t0 + ms(100)), None);

        d.reset(t0 + ms(100), true);
        assert!(d.is_running());
        assert_eq!(d.poll(t0 + ms(110)).unwrap().seq, 1);
    }

    #[test]
    fn set_cadence_reschedules_from_last_tick() {
        let t0 = Instant::now();
        let mut d = LoopDriver::new(Cadence::Fixed(ms(120)));
        d.start(t0);
        d.poll(t0 + ms(120)).unwrap();
        d.set_cadence(Cadence::Fixed(ms(102)), t0 + ms(121));
        assert_eq!(d.time_until_next(t0 + ms(121)), Some(ms(101)));
        assert_eq!(d.poll(t0 + ms(222)).unwrap().dt, ms(102));
    }
}
