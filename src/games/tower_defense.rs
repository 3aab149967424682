use std::time::Duration;

use ratatui::style::Color;
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::canvas::Canvas;
use crate::engine::driver::Cadence;
use crate::engine::geom::Vec2;
use crate::engine::input::{Direction, Input};
use crate::engine::schedule::Schedule;
use crate::engine::{Cue, Game, Hud, Phase, TickOutcome};

pub const TILE: f32 = 50.0;
pub const COLS: i32 = 16;
pub const ROWS: i32 = 12;
pub const WIDTH: f32 = COLS as f32 * TILE;
pub const HEIGHT: f32 = ROWS as f32 * TILE;

pub const START_LIVES: u32 = 20;
pub const START_MONEY: u32 = 300;
pub const KILL_REWARD: u32 = 5;
pub const SPAWN_GAP: Duration = Duration::from_millis(500);
const PROJECTILE_SPEED: f32 = 480.0;
const PROJECTILE_RADIUS: f32 = 5.0;
const ENEMY_SIZE: f32 = 15.0;

// 1 = path, 0 = buildable
const MAP: [[u8; COLS as usize]; ROWS as usize] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 1, 1, 1, 1, 1, 1],
    [0, 0, 1, 1, 1, 1, 1, 1, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0],
    [0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Enemy route in tile coordinates.
pub const WAYPOINTS: [(i32, i32); 10] = [
    (0, 2),
    (7, 2),
    (7, 4),
    (5, 4),
    (5, 5),
    (2, 5),
    (2, 8),
    (10, 8),
    (10, 4),
    (15, 4),
];

const PATH_TILE: Color = Color::Rgb(74, 85, 104);
const GROUND_TILE: Color = Color::Rgb(45, 55, 72);
const CURSOR: Color = Color::Rgb(255, 220, 80);

pub fn tile_center(col: i32, row: i32) -> Vec2 {
    Vec2::new(col as f32 * TILE + TILE / 2.0, row as f32 * TILE + TILE / 2.0)
}

fn waypoint(i: usize) -> Vec2 {
    let (c, r) = WAYPOINTS[i];
    tile_center(c, r)
}

fn cell_of(p: Vec2) -> (i32, i32) {
    ((p.x / TILE).floor() as i32, (p.y / TILE).floor() as i32)
}

pub fn is_path(col: i32, row: i32) -> bool {
    MAP[row as usize][col as usize] == 1
}

fn in_map(col: i32, row: i32) -> bool {
    (0..COLS).contains(&col) && (0..ROWS).contains(&row)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TowerKind {
    Turret,
    Cannon,
}

impl TowerKind {
    pub fn cost(self) -> u32 {
        match self {
            TowerKind::Turret => 50,
            TowerKind::Cannon => 100,
        }
    }

    pub fn range(self) -> f32 {
        match self {
            TowerKind::Turret => 150.0,
            TowerKind::Cannon => 200.0,
        }
    }

    pub fn damage(self) -> i32 {
        match self {
            TowerKind::Turret => 10,
            TowerKind::Cannon => 35,
        }
    }

    pub fn fire_every(self) -> Duration {
        match self {
            TowerKind::Turret => Duration::from_millis(500),
            TowerKind::Cannon => Duration::from_millis(1500),
        }
    }

    fn label(self) -> &'static str {
        match self {
            TowerKind::Turret => "Turret",
            TowerKind::Cannon => "Cannon",
        }
    }

    fn color(self) -> Color {
        match self {
            TowerKind::Turret => Color::Rgb(52, 211, 153),
            TowerKind::Cannon => Color::Rgb(167, 139, 250),
        }
    }

    fn projectile_color(self) -> Color {
        match self {
            TowerKind::Turret => Color::Rgb(110, 231, 183),
            TowerKind::Cannon => Color::Rgb(196, 181, 253),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EnemyId(u64);

#[derive(Clone, Debug)]
pub struct Tower {
    pub kind: TowerKind,
    pub cell: (i32, i32),
    pub pos: Vec2,
    cooldown: Duration,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: Vec2,
    pub health: i32,
    pub max_health: i32,
    /// Pixels per second.
    pub speed: f32,
    next: usize, // waypoint being approached
}

impl Enemy {
    // true once the final waypoint is reached
    fn advance(&mut self, dt: f32) -> bool {
        if self.next >= WAYPOINTS.len() {
            return true;
        }
        if self.pos.step_toward(waypoint(self.next), self.speed * dt) {
            self.next += 1;
        }
        self.next >= WAYPOINTS.len()
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vec2,
    pub target: EnemyId,
    pub damage: i32,
    color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TdState {
    Idle,
    WaveInProgress,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("Not enough money!")]
    InsufficientFunds { cost: u32, money: u32 },
    #[error("That tile is off the map")]
    OutOfBounds,
    #[error("Can't build on the path")]
    OnPath,
    #[error("There is already a tower there")]
    Occupied,
}

struct Spawn {
    health: i32,
    speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Command {
    Select(TowerKind),
    Place(Vec2),
    CancelSelection,
    StartWave,
}

/// Nearest enemy strictly inside `range` of `from`; ties go to the earlier spawn.
pub fn select_target(from: Vec2, range: f32, enemies: &[Enemy]) -> Option<EnemyId> {
    let mut best: Option<(f32, EnemyId)> = None;
    for enemy in enemies {
        let d = from.distance(enemy.pos);
        if d >= range {
            continue;
        }
        if best.map_or(true, |(bd, _)| d < bd) {
            best = Some((d, enemy.id));
        }
    }
    best.map(|(_, id)| id)
}

pub struct TowerDefense {
    lives: u32,
    money: u32,
    wave: u32,
    towers: Vec<Tower>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    next_enemy_id: u64,
    spawns: Schedule<Spawn>,
    state: TdState,
    selected: Option<TowerKind>,
    cursor: (i32, i32),
    commands: Vec<Command>,
    hud: Hud,
}

impl TowerDefense {
    pub fn new() -> Self {
        let mut td = Self {
            lives: START_LIVES,
            money: START_MONEY,
            wave: 0,
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            next_enemy_id: 0,
            spawns: Schedule::new(),
            state: TdState::Idle,
            selected: None,
            cursor: (COLS / 2, ROWS - 2),
            commands: Vec::new(),
            hud: Hud::default(),
        };
        td.refresh_hud();
        td
    }

    pub fn state(&self) -> TdState {
        self.state
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn money(&self) -> u32 {
        self.money
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn pending_spawns(&self) -> usize {
        self.spawns.len()
    }

    pub fn selected(&self) -> Option<TowerKind> {
        self.selected
    }

    fn try_place(&mut self, kind: TowerKind, col: i32, row: i32) -> Result<(), PlacementError> {
        let cost = kind.cost();
        if self.money < cost {
            return Err(PlacementError::InsufficientFunds { cost, money: self.money });
        }
        if !in_map(col, row) {
            return Err(PlacementError::OutOfBounds);
        }
        if is_path(col, row) {
            return Err(PlacementError::OnPath);
        }
        if self.towers.iter().any(|t| t.cell == (col, row)) {
            return Err(PlacementError::Occupied);
        }
        self.money -= cost;
        self.towers.push(Tower {
            kind,
            cell: (col, row),
            pos: tile_center(col, row),
            cooldown: Duration::ZERO,
        });
        Ok(())
    }

    fn start_wave(&mut self) {
        if self.state != TdState::Idle {
            return;
        }
        self.wave += 1;
        self.state = TdState::WaveInProgress;
        let n = self.wave;
        let count = n * 5;
        let health = 80 + 20 * n as i32;
        let speed = (1.0 + 0.1 * n as f32) * 60.0;
        for i in 0..count {
            self.spawns.push_after(SPAWN_GAP * i, Spawn { health, speed });
        }
        info!(wave = n, count, health, "wave started");
    }

    fn spawn(&mut self, s: Spawn) {
        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;
        self.enemies.push(Enemy {
            id,
            pos: waypoint(0),
            health: s.health,
            max_health: s.health,
            speed: s.speed,
            next: 1,
        });
    }

    fn apply_commands(&mut self) {
        for cmd in std::mem::take(&mut self.commands) {
            match cmd {
                Command::Select(kind) => {
                    if self.money < kind.cost() {
                        self.selected = None;
                        self.hud.notice = Some("Not enough money!".to_string());
                    } else {
                        self.selected = Some(kind);
                        self.hud.notice = Some(format!("Placing {}: pick a tile", kind.label()));
                    }
                }
                Command::Place(p) => {
                    let Some(kind) = self.selected.take() else { continue };
                    let (col, row) = cell_of(p);
                    match self.try_place(kind, col, row) {
                        Ok(()) => {
                            debug!(?kind, col, row, money = self.money, "tower placed");
                            self.hud.notice = None;
                        }
                        Err(e) => {
                            debug!(?kind, col, row, error = %e, "placement rejected");
                            self.hud.notice = Some(e.to_string());
                        }
                    }
                }
                Command::CancelSelection => {
                    self.selected = None;
                    self.hud.notice = None;
                }
                Command::StartWave => self.start_wave(),
            }
        }
    }

    fn fire_towers(&mut self, dt: Duration) {
        for tower in &mut self.towers {
            tower.cooldown = tower.cooldown.saturating_sub(dt);
            if !tower.cooldown.is_zero() {
                continue;
            }
            if let Some(target) = select_target(tower.pos, tower.kind.range(), &self.enemies) {
                self.projectiles.push(Projectile {
                    pos: tower.pos,
                    target,
                    damage: tower.kind.damage(),
                    color: tower.kind.projectile_color(),
                });
                tower.cooldown = tower.kind.fire_every();
            }
        }
    }

    fn move_enemies(&mut self, dt: f32) {
        let mut leaked = 0;
        self.enemies.retain_mut(|e| {
            if e.advance(dt) {
                leaked += 1;
                false
            } else {
                true
            }
        });
        if leaked > 0 {
            self.lives = self.lives.saturating_sub(leaked);
            debug!(leaked, lives = self.lives, "enemies reached the exit");
        }
    }

    fn move_projectiles(&mut self, dt: f32) {
        let step = PROJECTILE_SPEED * dt;
        let enemies = &mut self.enemies;
        let mut kills = 0;
        self.projectiles.retain_mut(|p| {
            let Some(idx) = enemies.iter().position(|e| e.id == p.target) else {
                return false;
            };
            if !p.pos.step_toward(enemies[idx].pos, step) {
                return true;
            }
            enemies[idx].health -= p.damage;
            if enemies[idx].health <= 0 {
                enemies.remove(idx);
                kills += 1;
            }
            false
        });
        self.money += kills * KILL_REWARD;
    }

    fn refresh_hud(&mut self) {
        self.hud.set("Lives", self.lives.to_string());
        self.hud.set("Money", self.money.to_string());
        self.hud.set("Wave", self.wave.to_string());
        self.hud.set(
            "Building",
            self.selected.map_or("-", |k| k.label()),
        );
    }
}

impl Default for TowerDefense {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TowerDefense {
    fn title(&self) -> &'static str {
        "Tower Defense"
    }

    fn canvas_size(&self) -> (f32, f32) {
        (WIDTH, HEIGHT)
    }

    fn cadence(&self) -> Cadence {
        Cadence::Display
    }

    fn phase(&self) -> Phase {
        match self.state {
            TdState::Idle => Phase::NotStarted,
            TdState::WaveInProgress => Phase::Running,
            TdState::Ended => Phase::Ended,
        }
    }

    fn wants_ticks(&self) -> bool {
        self.state != TdState::Ended
    }

    fn handle_input(&mut self, input: Input) {
        if self.state == TdState::Ended {
            return;
        }
        match input {
            Input::Select(1) => self.commands.push(Command::Select(TowerKind::Turret)),
            Input::Select(2) => self.commands.push(Command::Select(TowerKind::Cannon)),
            Input::Toggle => self.commands.push(Command::StartWave),
            Input::Cancel => self.commands.push(Command::CancelSelection),
            Input::Click(p) => {
                let (col, row) = cell_of(p);
                if in_map(col, row) {
                    self.cursor = (col, row);
                }
                self.commands.push(Command::Place(p));
            }
            Input::Pointer(p) => {
                let (col, row) = cell_of(p);
                if in_map(col, row) {
                    self.cursor = (col, row);
                }
            }
            Input::Arrow(dir) => {
                let (dx, dy) = dir.delta();
                self.cursor = (
                    (self.cursor.0 + dx).clamp(0, COLS - 1),
                    (self.cursor.1 + dy).clamp(0, ROWS - 1),
                );
            }
            Input::Confirm => {
                let (col, row) = self.cursor;
                self.commands.push(Command::Place(tile_center(col, row)));
            }
            _ => {}
        }
    }

    fn update(&mut self, dt: Duration) -> TickOutcome {
        if self.state == TdState::Ended {
            return TickOutcome::Continue;
        }
        self.apply_commands();

        // Spawn
        for s in self.spawns.advance(dt) {
            self.spawn(s);
        }

        // Towers fire, then everything moves
        let secs = dt.as_secs_f32();
        self.fire_towers(dt);
        self.move_enemies(secs);
        self.move_projectiles(secs);

        // Wave clear
        if self.state == TdState::WaveInProgress && self.spawns.is_empty() && self.enemies.is_empty() {
            let bonus = 100 + self.wave * 10;
            self.money += bonus;
            self.state = TdState::Idle;
            info!(wave = self.wave, bonus, "wave cleared");
        }

        // Defeat
        if self.lives == 0 {
            self.state = TdState::Ended;
            self.spawns.clear();
            self.selected = None;
            info!(wave = self.wave, "defeat");
            self.refresh_hud();
            return TickOutcome::Ended { score: self.wave };
        }
        self.refresh_hud();
        TickOutcome::Continue
    }

    fn render(&self, canvas: &mut dyn Canvas) {
        // Map tiles
        for row in 0..ROWS {
            for col in 0..COLS {
                let color = if is_path(col, row) { PATH_TILE } else { GROUND_TILE };
                canvas.fill_rect(col as f32 * TILE, row as f32 * TILE, TILE, TILE, color);
            }
        }

        // Towers
        for tower in &self.towers {
            canvas.fill_circle(tower.pos.x, tower.pos.y, TILE / 3.0, tower.kind.color());
            canvas.fill_rect(tower.pos.x - 5.0, tower.pos.y - 5.0, 10.0, 10.0, Color::White);
        }

        // Enemies with health bars
        for enemy in &self.enemies {
            canvas.fill_circle(enemy.pos.x, enemy.pos.y, ENEMY_SIZE, Color::Red);
            let bar_y = enemy.pos.y - ENEMY_SIZE - 10.0;
            let full = ENEMY_SIZE * 2.0;
            let frac = (enemy.health as f32 / enemy.max_health as f32).clamp(0.0, 1.0);
            canvas.fill_rect(enemy.pos.x - ENEMY_SIZE, bar_y, full, 5.0, Color::Black);
            canvas.fill_rect(enemy.pos.x - ENEMY_SIZE, bar_y, full * frac, 5.0, Color::LightGreen);
        }

        // Projectiles
        for p in &self.projectiles {
            canvas.fill_circle(p.pos.x, p.pos.y, PROJECTILE_RADIUS, p.color);
        }

        // Placement cursor
        if self.selected.is_some() {
            let (col, row) = self.cursor;
            let (x, y) = (col as f32 * TILE, row as f32 * TILE);
            canvas.fill_rect(x, y, TILE, 3.0, CURSOR);
            canvas.fill_rect(x, y + TILE - 3.0, TILE, 3.0, CURSOR);
            canvas.fill_rect(x, y, 3.0, TILE, CURSOR);
            canvas.fill_rect(x + TILE - 3.0, y, 3.0, TILE, CURSOR);
        }

        if self.state == TdState::Ended {
            canvas.text(WIDTH / 2.0 - 40.0, HEIGHT / 2.0, "DEFEAT!", Color::Red);
            canvas.text(WIDTH / 2.0 - 80.0, HEIGHT / 2.0 + 40.0, "Enter to restart", Color::White);
        }
    }

    fn reset(&mut self) {
        self.spawns.clear();
        self.lives = START_LIVES;
        self.money = START_MONEY;
        self.wave = 0;
        self.towers.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.state = TdState::Idle;
        self.selected = None;
        self.commands.clear();
        self.hud.notice = None;
        self.refresh_hud();
    }

    fn score(&self) -> u32 {
        self.wave
    }

    fn hud(&self) -> &Hud {
        &self.hud
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        Vec::new()
    }

    fn controls(&self) -> &'static [(&'static str, &'static str)] {
        &[
            ("1/2", "Turret/Cannon"),
            ("Click/Enter", "Place"),
            ("←↑↓→", "Cursor"),
            ("Space", "Start wave"),
            ("Bksp", "Cancel"),
            ("R", "Reset"),
            ("Esc", "Menu"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::canvas::Recorder;

    const FRAME: Duration = Duration::from_micros(16_667);

    fn enemy_at(td: &mut TowerDefense, pos: Vec2, health: i32) -> EnemyId {
        td.spawn(Spawn { health, speed: 0.0 });
        let e = td.enemies.last_mut().unwrap();
        e.pos = pos;
        e.id
    }

    fn place(td: &mut TowerDefense, kind: TowerKind, col: i32, row: i32) {
        td.handle_input(Input::Select(if kind == TowerKind::Turret { 1 } else { 2 }));
        td.handle_input(Input::Click(tile_center(col, row)));
        td.update(FRAME);
    }

    #[test]
    fn waypoints_lie_on_path_tiles() {
        for (c, r) in WAYPOINTS {
            assert!(is_path(c, r), "({c}, {r})");
        }
    }

    #[test]
    fn placing_a_turret_costs_fifty() {
        let mut td = TowerDefense::new();
        place(&mut td, TowerKind::Turret, 3, 0);
        assert_eq!(td.towers().len(), 1);
        assert_eq!(td.money(), START_MONEY - 50);
        assert_eq!(td.towers()[0].pos, tile_center(3, 0));
        assert_eq!(td.selected(), None);
    }

    #[test]
    fn placement_rejections_keep_money() {
        let mut td = TowerDefense::new();
        assert_eq!(td.try_place(TowerKind::Turret, 0, 2), Err(PlacementError::OnPath));
        assert_eq!(td.try_place(TowerKind::Turret, 16, 0), Err(PlacementError::OutOfBounds));
        assert_eq!(td.try_place(TowerKind::Turret, -1, 3), Err(PlacementError::OutOfBounds));
        td.try_place(TowerKind::Turret, 1, 1).unwrap();
        assert_eq!(td.try_place(TowerKind::Cannon, 1, 1), Err(PlacementError::Occupied));
        assert_eq!(td.money(), START_MONEY - 50);
    }

    #[test]
    fn rejected_click_sets_a_notice_and_clears_selection() {
        let mut td = TowerDefense::new();
        td.handle_input(Input::Select(1));
        td.handle_input(Input::Click(tile_center(4, 2)));
        td.update(FRAME);
        assert!(td.towers().is_empty());
        assert_eq!(td.hud().notice.as_deref(), Some("Can't build on the path"));
        assert_eq!(td.selected(), None);
    }

    #[test]
    fn selection_needs_enough_money() {
        let mut td = TowerDefense::new();
        td.money = 60;
        td.handle_input(Input::Select(2));
        td.update(FRAME);
        assert_eq!(td.selected(), None);
        assert_eq!(td.hud().notice.as_deref(), Some("Not enough money!"));
    }

    #[test]
    fn funds_checked_again_at_placement() {
        let mut td = TowerDefense::new();
        td.money = 40;
        assert_eq!(
            td.try_place(TowerKind::Turret, 1, 1),
            Err(PlacementError::InsufficientFunds { cost: 50, money: 40 })
        );
    }

    #[test]
    fn click_without_selection_does_nothing() {
        let mut td = TowerDefense::new();
        td.handle_input(Input::Click(tile_center(1, 1)));
        td.update(FRAME);
        assert!(td.towers().is_empty());
        assert_eq!(td.money(), START_MONEY);
    }

    #[test]
    fn keyboard_cursor_places_towers() {
        let mut td = TowerDefense::new();
        td.handle_input(Input::Select(1));
        td.handle_input(Input::Arrow(Direction::Right));
        td.handle_input(Input::Confirm);
        td.update(FRAME);
        let (c, r) = (COLS / 2 + 1, ROWS - 2);
        assert_eq!(td.towers()[0].cell, (c, r));
    }

    #[test]
    fn cursor_is_clamped_to_map() {
        let mut td = TowerDefense::new();
        for _ in 0..40 {
            td.handle_input(Input::Arrow(Direction::Left));
            td.handle_input(Input::Arrow(Direction::Down));
        }
        assert_eq!(td.cursor, (0, ROWS - 1));
    }

    #[test]
    fn wave_spawns_staggered_enemies() {
        let mut td = TowerDefense::new();
        td.handle_input(Input::Toggle);
        td.update(FRAME);
        assert_eq!(td.state(), TdState::WaveInProgress);
        assert_eq!(td.wave(), 1);
        assert_eq!(td.enemies().len(), 1);
        assert_eq!(td.pending_spawns(), 4);
        assert_eq!(td.enemies()[0].health, 100);

        td.update(Duration::from_millis(500));
        assert_eq!(td.enemies().len(), 2);
        td.update(Duration::from_millis(1500));
        assert_eq!(td.enemies().len(), 5);
        assert_eq!(td.pending_spawns(), 0);
    }

    #[test]
    fn second_wave_start_is_ignored_while_running() {
        let mut td = TowerDefense::new();
        td.handle_input(Input::Toggle);
        td.update(FRAME);
        td.handle_input(Input::Toggle);
        td.update(FRAME);
        assert_eq!(td.wave(), 1);
    }

    #[test]
    fn tower_holds_fire_without_enemy_in_range() {
        let mut td = TowerDefense::new();
        td.try_place(TowerKind::Turret, 0, 0).unwrap();
        enemy_at(&mut td, Vec2::new(700.0, 500.0), 100);
        for _ in 0..120 {
            td.update(FRAME);
        }
        assert!(td.projectiles().is_empty());
    }

    #[test]
    fn tower_targets_nearest_enemy_in_range() {
        let mut td = TowerDefense::new();
        td.try_place(TowerKind::Turret, 5, 7).unwrap();
        let origin = tile_center(5, 7);
        enemy_at(&mut td, origin + Vec2::new(120.0, 0.0), 100);
        let near = enemy_at(&mut td, origin + Vec2::new(0.0, 60.0), 100);
        enemy_at(&mut td, origin + Vec2::new(-140.0, 0.0), 100);
        td.update(FRAME);
        assert_eq!(td.projectiles().len(), 1);
        assert_eq!(td.projectiles()[0].target, near);
    }

    #[test]
    fn ties_go_to_earliest_spawn() {
        let mut td = TowerDefense::new();
        let origin = Vec2::new(400.0, 300.0);
        let first = enemy_at(&mut td, origin + Vec2::new(50.0, 0.0), 10);
        enemy_at(&mut td, origin + Vec2::new(-50.0, 0.0), 10);
        assert_eq!(select_target(origin, 150.0, td.enemies()), Some(first));
    }

    #[test]
    fn range_is_exclusive() {
        let mut td = TowerDefense::new();
        let origin = Vec2::new(400.0, 300.0);
        enemy_at(&mut td, origin + Vec2::new(150.0, 0.0), 10);
        assert_eq!(select_target(origin, 150.0, td.enemies()), None);
    }

    #[test]
    fn tower_respects_cooldown() {
        let mut td = TowerDefense::new();
        td.try_place(TowerKind::Cannon, 5, 7).unwrap();
        enemy_at(&mut td, tile_center(5, 7) + Vec2::new(190.0, 0.0), 10_000);
        td.update(FRAME);
        assert_eq!(td.projectiles().len(), 1);

        // The first shell lands well before the 1.5 s reload finishes.
        for _ in 0..60 {
            td.update(FRAME);
        }
        assert!(td.projectiles().is_empty());
        assert_eq!(td.enemies()[0].health, 10_000 - 35);

        for _ in 0..35 {
            td.update(FRAME);
        }
        assert_eq!(td.projectiles().len(), 1);
        assert_eq!(td.enemies()[0].health, 10_000 - 35);
    }

    #[test]
    fn projectile_hits_once_and_is_removed() {
        let mut td = TowerDefense::new();
        let target = enemy_at(&mut td, Vec2::new(400.0, 300.0), 100);
        td.projectiles.push(Projectile {
            pos: Vec2::new(404.0, 300.0),
            target,
            damage: 35,
            color: Color::White,
        });
        td.update(FRAME);
        assert!(td.projectiles().is_empty());
        assert_eq!(td.enemies()[0].health, 65);
    }

    #[test]
    fn orphaned_projectile_is_discarded_without_damage() {
        let mut td = TowerDefense::new();
        let doomed = enemy_at(&mut td, Vec2::new(100.0, 100.0), 10);
        enemy_at(&mut td, Vec2::new(104.0, 100.0), 50);
        td.projectiles.push(Projectile {
            pos: Vec2::new(102.0, 100.0),
            target: doomed,
            damage: 10,
            color: Color::White,
        });
        td.enemies.retain(|e| e.id != doomed);
        td.update(FRAME);
        assert!(td.projectiles().is_empty());
        assert_eq!(td.enemies()[0].health, 50);
    }

    #[test]
    fn kill_pays_reward() {
        let mut td = TowerDefense::new();
        let target = enemy_at(&mut td, Vec2::new(400.0, 300.0), 10);
        td.projectiles.push(Projectile {
            pos: Vec2::new(401.0, 300.0),
            target,
            damage: 10,
            color: Color::White,
        });
        td.update(FRAME);
        assert!(td.enemies().is_empty());
        assert_eq!(td.money(), START_MONEY + KILL_REWARD);
    }

    #[test]
    fn enemy_follows_every_waypoint_then_costs_a_life() {
        let mut td = TowerDefense::new();
        td.spawn(Spawn { health: 100, speed: 120.0 });
        let mut visited = vec![0usize];
        let mut lives_lost_at = None;
        for i in 0..10_000 {
            td.update(FRAME);
            let Some(e) = td.enemies().first() else {
                lives_lost_at = Some(i);
                break;
            };
            assert!((0.0..=WIDTH).contains(&e.pos.x) && (0.0..=HEIGHT).contains(&e.pos.y));
            if let Some(w) = (0..WAYPOINTS.len()).find(|&w| waypoint(w) == e.pos) {
                if visited.last() != Some(&w) {
                    visited.push(w);
                }
            }
        }
        assert!(lives_lost_at.is_some());
        assert_eq!(visited, (0..WAYPOINTS.len() - 1).collect::<Vec<_>>());
        assert_eq!(td.lives(), START_LIVES - 1);
    }

    #[test]
    fn zero_lives_ends_game_and_cancels_spawns() {
        let mut td = TowerDefense::new();
        td.handle_input(Input::Toggle);
        td.update(FRAME);
        td.lives = 1;
        td.enemies[0].pos = waypoint(WAYPOINTS.len() - 1);
        td.enemies[0].next = WAYPOINTS.len() - 1;
        let outcome = td.update(FRAME);
        assert_eq!(outcome, TickOutcome::Ended { score: 1 });
        assert_eq!(td.state(), TdState::Ended);
        assert_eq!(td.lives(), 0);
        assert_eq!(td.pending_spawns(), 0);
        assert!(!td.wants_ticks());
    }

    #[test]
    fn ended_game_ignores_input() {
        let mut td = TowerDefense::new();
        td.state = TdState::Ended;
        td.handle_input(Input::Select(1));
        td.handle_input(Input::Toggle);
        assert!(td.commands.is_empty());
    }

    #[test]
    fn cleared_wave_pays_bonus_and_returns_to_idle() {
        let mut td = TowerDefense::new();
        td.handle_input(Input::Toggle);
        td.update(FRAME);
        td.spawns.clear();
        td.enemies.clear();
        td.update(FRAME);
        assert_eq!(td.state(), TdState::Idle);
        assert_eq!(td.money(), START_MONEY + 110);
    }

    #[test]
    fn wave_does_not_end_before_all_spawns_arrive() {
        let mut td = TowerDefense::new();
        td.handle_input(Input::Toggle);
        td.update(FRAME);
        td.enemies.clear();
        td.update(FRAME);
        assert_eq!(td.state(), TdState::WaveInProgress);
    }

    #[test]
    fn reset_cancels_pending_spawns() {
        let mut td = TowerDefense::new();
        place(&mut td, TowerKind::Turret, 1, 1);
        td.handle_input(Input::Toggle);
        td.update(FRAME);
        td.reset();
        assert_eq!(td.pending_spawns(), 0);
        for _ in 0..300 {
            td.update(FRAME);
        }
        assert!(td.enemies().is_empty());
        assert!(td.towers().is_empty());
        assert_eq!(td.money(), START_MONEY);
        assert_eq!(td.state(), TdState::Idle);
    }

    #[test]
    fn render_draws_map_and_actors() {
        let mut td = TowerDefense::new();
        td.try_place(TowerKind::Turret, 1, 1).unwrap();
        enemy_at(&mut td, Vec2::new(100.0, 100.0), 50);
        let mut canvas = Recorder::new(WIDTH, HEIGHT);
        td.render(&mut canvas);
        assert_eq!(canvas.circles().count(), 2);
        assert!(canvas.calls.len() >= (COLS * ROWS) as usize);
        assert_eq!(td.money(), START_MONEY - 50);
    }
}
