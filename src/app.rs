use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::{info, warn};

use crate::audio::{AudioSink, Bell, Silent};
use crate::config::Config;
use crate::engine::input::Input;
use crate::event::translate_key;
use crate::games::pong::Pong;
use crate::games::snake::Snake;
use crate::games::tower_defense::TowerDefense;
use crate::scores::HighScore;
use crate::session::{Advance, Session};
use crate::ui::raster::Viewport;

const GAME_COUNT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tab {
    Home,
    Pong,
    Snake,
    TowerDefense,
}

impl Tab {
    pub fn all() -> &'static [Tab] {
        &[Tab::Home, Tab::Pong, Tab::Snake, Tab::TowerDefense]
    }

    pub fn title(&self) -> &str {
        match self {
            Tab::Home => " Home ",
            Tab::Pong => " Pong ",
            Tab::Snake => " Snake ",
            Tab::TowerDefense => " Tower Defense ",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Home => 0,
            Tab::Pong => 1,
            Tab::Snake => 2,
            Tab::TowerDefense => 3,
        }
    }

    fn game(n: usize) -> Tab {
        match n {
            0 => Tab::Pong,
            1 => Tab::Snake,
            _ => Tab::TowerDefense,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub current_tab: Tab,
    pub selected_game: usize, // 0-2 for home screen game selection
    pub pong: Session<Pong>,
    pub snake: Session<Snake>,
    pub tower_defense: Session<TowerDefense>,
    pub high_score: HighScore,
    /// Where the active game's canvas was last drawn.
    pub viewport: Option<Viewport>,
    /// Last persistence problem, shown in the home footer.
    pub status: Option<String>,
    audio: Box<dyn AudioSink>,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let audio: Box<dyn AudioSink> = if config.sound {
            Box::new(Bell::stdout())
        } else {
            Box::new(Silent)
        };
        let seed = config.seed_or_random();
        info!(seed, "starting minicade");
        Self::with_parts(seed, HighScore::load(&config.scores_path), audio)
    }

    pub fn with_parts(seed: u64, high_score: HighScore, audio: Box<dyn AudioSink>) -> Self {
        Self {
            should_quit: false,
            current_tab: Tab::Home,
            selected_game: 0,
            pong: Session::new(Pong::new(seed)),
            snake: Session::new(Snake::new(seed.wrapping_add(1), high_score.best())),
            tower_defense: Session::new(TowerDefense::new()),
            high_score,
            viewport: None,
            status: None,
            audio,
        }
    }

    pub fn on_tick(&mut self, now: Instant) {
        let advance = match self.current_tab {
            Tab::Home => return,
            Tab::Pong => self.pong.poll(now),
            Tab::Snake => self.snake.poll(now),
            Tab::TowerDefense => self.tower_defense.poll(now),
        };
        self.settle(advance);
    }

    /// How long the host may wait before the active game needs a tick.
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        match self.current_tab {
            Tab::Home => None,
            Tab::Pong => self.pong.time_until_next(now),
            Tab::Snake => self.snake.time_until_next(now),
            Tab::TowerDefense => self.tower_defense.time_until_next(now),
        }
    }

    fn settle(&mut self, advance: Advance) {
        for cue in advance.cues {
            self.audio.play(cue);
        }
        let Some(score) = advance.ended else { return };
        info!(tab = ?self.current_tab, score, "round ended");
        if self.current_tab == Tab::Snake {
            match self.high_score.submit(score) {
                Ok(_) => self.status = None,
                Err(err) => {
                    warn!(error = %err, "could not save high score");
                    self.status = Some(err.to_string());
                }
            }
            self.snake.game.set_high_score(self.high_score.best());
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) {
        // Ctrl+C always quits
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Global keys
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                if matches!(self.current_tab, Tab::Home) {
                    self.should_quit = true;
                    return;
                }
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.prev_tab(now);
                } else {
                    self.next_tab(now);
                }
                return;
            }
            KeyCode::BackTab => {
                self.prev_tab(now);
                return;
            }
            KeyCode::Esc => {
                if !matches!(self.current_tab, Tab::Home) {
                    self.switch_to(Tab::Home, now);
                    return;
                }
            }
            _ => {}
        }

        // Home screen shortcuts and navigation
        if matches!(self.current_tab, Tab::Home) {
            match key.code {
                KeyCode::Char(c @ '1'..='3') => {
                    self.selected_game = c as usize - '1' as usize;
                    self.switch_to(Tab::game(self.selected_game), now);
                }
                KeyCode::Right | KeyCode::Down => {
                    self.selected_game = (self.selected_game + 1) % GAME_COUNT;
                }
                KeyCode::Left | KeyCode::Up => {
                    self.selected_game = (self.selected_game + GAME_COUNT - 1) % GAME_COUNT;
                }
                KeyCode::Enter => self.switch_to(Tab::game(self.selected_game), now),
                _ => {}
            }
            return;
        }

        if let Some(input) = translate_key(key) {
            self.forward(input, now);
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let Some(viewport) = self.viewport else { return };
        let Some(pos) = viewport.to_logical(mouse.column, mouse.row) else { return };
        let input = match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => Input::Pointer(pos),
            MouseEventKind::Down(MouseButton::Left) => Input::Click(pos),
            _ => return,
        };
        self.forward(input, now);
    }

    fn forward(&mut self, input: Input, now: Instant) {
        match self.current_tab {
            Tab::Home => {}
            Tab::Pong => self.pong.handle_input(input, now),
            Tab::Snake => self.snake.handle_input(input, now),
            Tab::TowerDefense => self.tower_defense.handle_input(input, now),
        }
    }

    /// Hidden games stop ticking; the newly shown one picks up where it left off.
    pub fn switch_to(&mut self, tab: Tab, now: Instant) {
        if tab == self.current_tab {
            return;
        }
        match self.current_tab {
            Tab::Home => {}
            Tab::Pong => self.pong.deactivate(),
            Tab::Snake => self.snake.deactivate(),
            Tab::TowerDefense => self.tower_defense.deactivate(),
        }
        self.current_tab = tab;
        self.viewport = None;
        match tab {
            Tab::Home => {}
            Tab::Pong => self.pong.activate(now),
            Tab::Snake => self.snake.activate(now),
            Tab::TowerDefense => self.tower_defense.activate(now),
        }
    }

    fn next_tab(&mut self, now: Instant) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + 1) % tabs.len()], now);
    }

    fn prev_tab(&mut self, now: Instant) {
        let tabs = Tab::all();
        let idx = self.current_tab.index();
        self.switch_to(tabs[(idx + tabs.len() - 1) % tabs.len()], now);
    }
}
