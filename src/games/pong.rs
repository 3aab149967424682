use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::Color;
use tracing::debug;

use crate::engine::canvas::Canvas;
use crate::engine::driver::Cadence;
use crate::engine::geom::{circle_hits_rect, clamp_span, Rect, Vec2};
use crate::engine::input::{Direction, Input};
use crate::engine::{Cue, Game, Hud, Phase, TickOutcome};

pub const WIDTH: f32 = 800.0;
pub const HEIGHT: f32 = 400.0;
const PADDLE_W: f32 = 12.0;
const PADDLE_H: f32 = 80.0;
const PADDLE_INSET: f32 = 20.0;
const BALL_RADIUS: f32 = 10.0;
const KEY_STEP: f32 = 24.0;
const AI_SPEED: f32 = 5.0;
const AI_DEAD_ZONE: f32 = 8.0;
/// Speed multiplier applied on every paddle hit.
const SPEED_UP: f32 = 1.05;
/// A rally never gets faster than this multiple of its serve speed.
pub const MAX_RALLY_GROWTH: f32 = 2.0;
/// Minimum share of the ball's speed that stays horizontal after a hit.
const MIN_HORIZONTAL: f32 = 0.5;
const FRAMES_PER_SEC: f32 = 60.0;

const BG: Color = Color::Rgb(34, 34, 34);
const ACCENT: Color = Color::Rgb(0, 255, 153);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    Normal,
    Hard,
    Insane,
}

impl Difficulty {
    pub fn factor(self) -> f32 {
        match self {
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.5,
            Difficulty::Insane => 2.0,
        }
    }

    fn next(self) -> Difficulty {
        match self {
            Difficulty::Normal => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Insane,
            Difficulty::Insane => Difficulty::Normal,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
            Difficulty::Insane => "Insane",
        }
    }
}

#[derive(Default)]
struct FpsMeter {
    frames: u32,
    elapsed: Duration,
    fps: u32,
}

impl FpsMeter {
    fn record(&mut self, dt: Duration) {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed >= Duration::from_secs(1) {
            self.fps = (self.frames as f32 / self.elapsed.as_secs_f32()).round() as u32;
            self.frames = 0;
            self.elapsed = Duration::ZERO;
        }
    }
}

pub struct Pong {
    left: Rect,
    right: Rect,
    ball: Vec2,
    vel: Vec2,
    serve_speed: f32,
    left_score: u32,
    right_score: u32,
    phase: Phase,
    difficulty: Difficulty,
    // Desired left paddle top, from pointer or keys.
    paddle_target: Option<f32>,
    rng: StdRng,
    fps: FpsMeter,
    hud: Hud,
    cues: Vec<Cue>,
}

impl Pong {
    pub fn new(seed: u64) -> Self {
        let top = HEIGHT / 2.0 - PADDLE_H / 2.0;
        let mut p = Self {
            left: Rect::new(PADDLE_INSET, top, PADDLE_W, PADDLE_H),
            right: Rect::new(WIDTH - PADDLE_INSET - PADDLE_W, top, PADDLE_W, PADDLE_H),
            ball: Vec2::new(WIDTH / 2.0, HEIGHT / 2.0),
            vel: Vec2::ZERO,
            serve_speed: 0.0,
            left_score: 0,
            right_score: 0,
            phase: Phase::Paused,
            difficulty: Difficulty::Normal,
            paddle_target: None,
            rng: StdRng::seed_from_u64(seed),
            fps: FpsMeter::default(),
            hud: Hud::default(),
            cues: Vec::new(),
        };
        p.serve();
        p.refresh_hud();
        p
    }

    pub fn scores(&self) -> (u32, u32) {
        (self.left_score, self.right_score)
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn serve(&mut self) {
        let d = self.difficulty.factor();
        let sx: f32 = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let sy: f32 = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.ball = Vec2::new(WIDTH / 2.0, HEIGHT / 2.0);
        self.vel = Vec2::new(
            sx * self.rng.gen_range(4.0f32..6.0) * d,
            sy * self.rng.gen_range(2.0f32..5.0) * d,
        );
        self.serve_speed = self.vel.length();
    }

    fn ai_speed(&self) -> f32 {
        AI_SPEED * self.difficulty.factor()
    }

    // Horizontal reversed, vertical nudged by where the ball struck.
    fn bounce_off(&mut self, paddle: Rect) {
        let before = self.vel.length();
        let half = paddle.h / 2.0;
        let impact = (((self.ball.y - paddle.y) - half) / half).clamp(-1.0, 1.0);

        let mut dir = Vec2::new(-self.vel.x, self.vel.y + impact * 2.0);
        let len = dir.length();
        dir = dir * (1.0 / len);
        if dir.x.abs() < MIN_HORIZONTAL {
            let vertical = (1.0 - MIN_HORIZONTAL * MIN_HORIZONTAL).sqrt();
            dir = Vec2::new(
                MIN_HORIZONTAL * dir.x.signum(),
                vertical * if dir.y < 0.0 { -1.0 } else { 1.0 },
            );
        }

        let cap = self.serve_speed * MAX_RALLY_GROWTH;
        let speed = (before * SPEED_UP).min(cap);
        self.vel = dir * speed;
        self.cues.push(Cue::PaddleHit);
    }

    fn move_ball(&mut self, frames: f32) {
        // Sub-steps no longer than the radius, so a fast ball cannot skip a paddle.
        let travel = self.vel.length() * frames;
        let steps = (travel / BALL_RADIUS).ceil().max(1.0) as u32;
        let step = frames / steps as f32;
        for _ in 0..steps {
            self.ball += self.vel * step;
            if self.settle_ball() {
                break;
            }
        }
    }

    /// Returns `true` when a point was scored and the ball re-served.
    fn settle_ball(&mut self) -> bool {
        // Wall collisions
        if self.ball.y - BALL_RADIUS < 0.0 {
            self.ball.y = BALL_RADIUS;
            self.vel.y = self.vel.y.abs();
            self.cues.push(Cue::WallHit);
        } else if self.ball.y + BALL_RADIUS > HEIGHT {
            self.ball.y = HEIGHT - BALL_RADIUS;
            self.vel.y = -self.vel.y.abs();
            self.cues.push(Cue::WallHit);
        }

        // Paddle collisions
        if self.vel.x < 0.0 && circle_hits_rect(self.ball, BALL_RADIUS, &self.left) {
            self.ball.x = self.left.right() + BALL_RADIUS;
            self.bounce_off(self.left);
        } else if self.vel.x > 0.0 && circle_hits_rect(self.ball, BALL_RADIUS, &self.right) {
            self.ball.x = self.right.x - BALL_RADIUS;
            self.bounce_off(self.right);
        }

        // Scoring
        if self.ball.x < 0.0 {
            self.right_score += 1;
            self.cues.push(Cue::Score);
            debug!(left = self.left_score, right = self.right_score, "point to right");
        } else if self.ball.x > WIDTH {
            self.left_score += 1;
            self.cues.push(Cue::Score);
            debug!(left = self.left_score, right = self.right_score, "point to left");
        } else {
            return false;
        }
        self.serve();
        true
    }

    fn move_ai(&mut self, frames: f32) {
        let center = self.right.center_y();
        let step = self.ai_speed() * frames;
        if center < self.ball.y - AI_DEAD_ZONE {
            self.right.y += step;
        } else if center > self.ball.y + AI_DEAD_ZONE {
            self.right.y -= step;
        }
        self.right.y = clamp_span(self.right.y, PADDLE_H, HEIGHT);
    }

    fn refresh_hud(&mut self) {
        self.hud.set("Player", self.left_score.to_string());
        self.hud.set("CPU", self.right_score.to_string());
        self.hud.set(
            "Status",
            if self.phase == Phase::Running { "Playing" } else { "Paused" },
        );
        self.hud.set("Difficulty", self.difficulty.label());
        self.hud.set("FPS", self.fps.fps.to_string());
    }
}

impl Game for Pong {
    fn title(&self) -> &'static str {
        "Pong"
    }

    fn canvas_size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn cadence(&self) -> Cadence {
        Cadence::Display
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn handle_input(&mut self, input: Input) {
        match input {
            Input::Toggle => {
                self.phase = match self.phase {
                    Phase::Running => Phase::Paused,
                    _ => Phase::Running,
                };
                self.refresh_hud();
            }
            Input::Cycle => {
                self.difficulty = self.difficulty.next();
                self.refresh_hud();
            }
            _ if self.phase != Phase::Running => {}
            Input::Pointer(p) => {
                self.paddle_target = Some(clamp_span(p.y - PADDLE_H / 2.0, PADDLE_H, HEIGHT));
            }
            Input::Arrow(dir @ (Direction::Up | Direction::Down)) => {
                let from = self.paddle_target.unwrap_or(self.left.y);
                let step = if dir == Direction::Up { -KEY_STEP } else { KEY_STEP };
                self.paddle_target = Some(clamp_span(from + step, PADDLE_H, HEIGHT));
            }
            _ => {}
        }
    }

    fn update(&mut self, dt: Duration) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Continue;
        }
        self.fps.record(dt);
        let frames = dt.as_secs_f32() * FRAMES_PER_SEC;

        if let Some(y) = self.paddle_target.take() {
            self.left.y = y;
        }
        self.move_ball(frames);
        self.move_ai(frames);
        self.refresh_hud();
        TickOutcome::Continue
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        canvas.clear(BG);

        // Center line
        let mut y = 10.0;
        while y < HEIGHT {
            canvas.fill_rect(WIDTH / 2.0 - 2.0, y, 4.0, 15.0, ACCENT);
            y += 30.0;
        }
        // Paddles and ball
        for paddle in [&self.left, &self.right] {
            canvas.fill_rect(paddle.x, paddle.y, paddle.w, paddle.h, Color::White);
        }
        canvas.fill_circle(self.ball.x, self.ball.y, BALL_RADIUS, Color::White);
        // Scores
        canvas.text(WIDTH / 2.0 - 70.0, 60.0, &self.left_score.to_string(), ACCENT);
        canvas.text(WIDTH / 2.0 + 40.0, 60.0, &self.right_score.to_string(), ACCENT);
        canvas.text(10.0, 30.0, &format!("FPS: {}", self.fps.fps), ACCENT);
        if self.phase != Phase::Running {
            canvas.text(WIDTH / 2.0 - 60.0, HEIGHT / 2.0 + 60.0, "SPACE to play", ACCENT);
        }
    }

    fn reset(&mut self) {
        self.left_score = 0;
        self.right_score = 0;
        self.paddle_target = None;
        self.cues.clear();
        self.serve();
        self.refresh_hud();
    }

    fn score(&self) -> u32 {
        self.left_score
    }

    fn hud(&self) -> &Hud {
        &self.hud
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    fn controls(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("Mouse/↑↓", "Paddle"),
            ("Space", "Play/Pause"),
            ("D", "Difficulty"),
            ("R", "Reset"),
            ("Esc", "Menu"),
        ]
    }
}
