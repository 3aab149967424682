use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use ratatui::style::Color;
use tracing::info;

use crate::engine::canvas::Canvas;
use crate::engine::driver::Cadence;
use crate::engine::input::{Direction, Input};
use crate::engine::{Cue, Game, Hud, Phase, TickOutcome};

pub const GRID: i32 = 20;
pub const CELL: f32 = 20.0;
pub const WIDTH: f32 = GRID as f32 * CELL;
pub const BASE_INTERVAL: Duration = Duration::from_millis(120);
pub const MIN_INTERVAL: Duration = Duration::from_millis(30);
const SPEED_FACTOR: f64 = 0.85;
/// Food items per speed level.
pub const ITEMS_PER_LEVEL: u32 = 15;
const BASE_POINTS: u32 = 10;
const TIER_BONUS: u32 = 5;

const START: Cell = Cell { x: 10, y: 10 };
const FIRST_FOOD: Cell = Cell { x: 15, y: 15 };

const BG: Color = Color::Rgb(31, 41, 55);
const BODY: Color = Color::Rgb(16, 185, 129);
const FOOD: Color = Color::Rgb(239, 68, 68);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    fn in_bounds(self) -> bool {
        (0..GRID).contains(&self.x) && (0..GRID).contains(&self.y)
    }
}

/// Points awarded for the `n`th food item (1-based).
pub fn points_for(n: u32) -> u32 {
    BASE_POINTS + (n / ITEMS_PER_LEVEL) * TIER_BONUS
}

pub struct Snake {
    body: VecDeque<Cell>,
    food: Cell,
    // Direction moved on the last tick; `queued` applies on the next one.
    heading: Option<Direction>,
    queued: Option<Direction>,
    score: u32,
    high_score: u32,
    eaten: u32,
    interval: Duration,
    phase: Phase,
    rng: StdRng,
    hud: Hud,
}

impl Snake {
    pub fn new(seed: u64, high_score: u32) -> Self {
        let mut s = Self {
            body: VecDeque::from([START]),
            food: FIRST_FOOD,
            heading: None,
            queued: None,
            score: 0,
            high_score,
            eaten: 0,
            interval: BASE_INTERVAL,
            phase: Phase::NotStarted,
            rng: StdRng::seed_from_u64(seed),
            hud: Hud::default(),
        };
        s.refresh_hud();
        s
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn body(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }

    pub fn food(&self) -> Cell {
        self.food
    }

    pub fn eaten(&self) -> u32 {
        self.eaten
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn set_high_score(&mut self, high_score: u32) {
        self.high_score = high_score;
        self.refresh_hud();
    }

    /// Speed in percent of the starting speed.
    pub fn speed_percent(&self) -> u32 {
        (BASE_INTERVAL.as_secs_f64() / self.interval.as_secs_f64() * 100.0).round() as u32
    }

    fn accepts(&self, dir: Direction) -> bool {
        match self.heading {
            Some(heading) => dir != heading.opposite(),
            None => true,
        }
    }

    fn place_food(&mut self) -> bool {
        let free: Vec<Cell> = (0..GRID)
            .flat_map(|y| (0..GRID).map(move |x| Cell::new(x, y)))
            .filter(|c| !self.body.contains(c))
            .collect();
        match free.choose(&mut self.rng) {
            Some(&cell) => {
                self.food = cell;
                true
            }
            None => false,
        }
    }

    fn eat(&mut self) {
        self.eaten += 1;
        self.score += points_for(self.eaten);
        if self.eaten % ITEMS_PER_LEVEL == 0 {
            self.interval = self.interval.mul_f64(SPEED_FACTOR).max(MIN_INTERVAL);
            info!(interval_ms = self.interval.as_millis() as u64, "snake speed up");
        }
    }

    fn end_round(&mut self) -> TickOutcome {
        self.phase = Phase::Ended;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
        info!(score = self.score, eaten = self.eaten, "snake round over");
        self.refresh_hud();
        TickOutcome::Ended { score: self.score }
    }

    fn refresh_hud(&mut self) {
        self.hud.set("Score", self.score.to_string());
        self.hud.set("High Score", self.high_score.to_string());
        self.hud.set("Speed", format!("{}%", self.speed_percent()));
    }
}

impl Game for Snake {
    fn title(&self) -> &'static str {
        "Snake"
    }

    fn canvas_size(&self) -> (f32, f32) {
        (WIDTH, WIDTH)
    }

    fn cadence(&self) -> Cadence {
        Cadence::Fixed(self.interval)
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn wants_ticks(&self) -> bool {
        self.phase != Phase::Ended
    }

    fn handle_input(&mut self, input: Input) {
        let Input::Arrow(dir) = input else { return };
        if self.phase == Phase::Ended || !self.accepts(dir) {
            return;
        }
        self.queued = Some(dir);
        if self.phase == Phase::NotStarted {
            self.phase = Phase::Running;
        }
    }

    fn update(&mut self, _dt: Duration) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Continue;
        }
        if let Some(dir) = self.queued.take() {
            self.heading = Some(dir);
        }
        let Some(dir) = self.heading else {
            return TickOutcome::Continue;
        };

        // Collision check
        let head = self.head().step(dir);
        if !head.in_bounds() || self.body.contains(&head) {
            return self.end_round();
        }

        // Move, growing if food was eaten
        self.body.push_front(head);
        if head == self.food {
            self.eat();
            if !self.place_food() {
                // Board is full.
                return self.end_round();
            }
        } else {
            self.body.pop_back();
        }
        self.refresh_hud();
        TickOutcome::Continue
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BG);

        // Snake body
        for seg in &self.body {
            canvas.fill_rect(seg.x as f32 * CELL, seg.y as f32 * CELL, CELL - 2.0, CELL - 2.0, BODY);
        }
        // Food
        canvas.fill_rect(
            self.food.x as f32 * CELL,
            self.food.y as f32 * CELL,
            CELL - 2.0,
            CELL - 2.0,
            FOOD,
        );
        // Overlay
        match self.phase {
            Phase::NotStarted => {
                canvas.text(110.0, 160.0, "Press an arrow key", Color::White);
            }
            Phase::Ended => {
                canvas.text(110.0, 160.0, &format!("Game Over! Score: {}", self.score), FOOD);
                canvas.text(110.0, 200.0, "Enter to restart", Color::White);
            }
            _ => {}
        }
    }

    fn reset(&mut self) {
        self.body = VecDeque::from([START]);
        self.food = FIRST_FOOD;
        self.heading = None;
        self.queued = None;
        self.score = 0;
        self.eaten = 0;
        self.interval = BASE_INTERVAL;
        self.phase = Phase::NotStarted;
        self.refresh_hud();
    }

    fn score(&self) -> u32 {
        self.score
    }

    fn hud(&self) -> &Hud {
        &self.hud
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        Vec::new()
    }

    fn controls(&self) -> &'static [(&'static str, &'static str)] {
        &[("←↑↓→", "Steer"), ("Enter", "Restart"), ("R", "Reset"), ("Esc", "Menu")]
    }
}
