pub mod game;
pub mod home;
pub mod raster;
pub mod tabs;

use ratatui::prelude::*;

use crate::app::{App, Tab};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(0),   // Content
        ])
        .split(frame.area());

    tabs::render_tabs(frame, app, chunks[0]);

    let viewport = match app.current_tab {
        Tab::Home => {
            home::render_home(frame, chunks[1], app);
            None
        }
        Tab::Pong => Some(game::render_game(frame, chunks[1], &app.pong.game, Color::Rgb(220, 220, 220))),
        Tab::Snake => Some(game::render_game(frame, chunks[1], &app.snake.game, Color::Rgb(16, 185, 129))),
        Tab::TowerDefense => Some(game::render_game(
            frame,
            chunks[1],
            &app.tower_defense.game,
            Color::Rgb(255, 160, 60),
        )),
    };
    app.viewport = viewport;
}
