use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::App;
use crate::engine::Game;

const BANNER: &str = r#"
 ╔═══════════════════════════════════════════════════════════════╗
 ║  ███╗   ███╗██╗███╗   ██╗██╗ ██████╗ █████╗ ██████╗ ███████╗  ║
 ║  ████╗ ████║██║████╗  ██║██║██╔════╝██╔══██╗██╔══██╗██╔════╝  ║
 ║  ██╔████╔██║██║██╔██╗ ██║██║██║     ███████║██║  ██║█████╗    ║
 ║  ██║╚██╔╝██║██║██║╚██╗██║██║██║     ██╔══██║██║  ██║██╔══╝    ║
 ║  ██║ ╚═╝ ██║██║██║ ╚████║██║╚██████╗██║  ██║██████╔╝███████╗  ║
 ║  ╚═╝     ╚═╝╚═╝╚═╝  ╚═══╝╚═╝ ╚═════╝╚═╝  ╚═╝╚═════╝ ╚══════╝  ║
 ╚═══════════════════════════════════════════════════════════════╝"#;

struct GameTile {
    key: &'static str,
    name: &'static str,
    desc: &'static str,
    color: Color,
    border_color: Color,
}

const GAME_TILES: [GameTile; 3] = [
    GameTile { key: "1", name: "Pong", desc: "Out-rally the\ncomputer paddle", color: Color::Rgb(220, 220, 220), border_color: Color::Rgb(110, 110, 110) },
    GameTile { key: "2", name: "Snake", desc: "Eat, grow and\ndodge yourself", color: Color::Rgb(16, 185, 129), border_color: Color::Rgb(8, 92, 64) },
    GameTile { key: "3", name: "Tower Defense", desc: "Build towers,\nhold the path", color: Color::Rgb(255, 160, 60), border_color: Color::Rgb(140, 80, 30) },
];

fn render_game_tile(frame: &mut Frame, area: Rect, tile: &GameTile, selected: bool) {
    let border_color = if selected { Color::Rgb(255, 220, 80) } else { tile.border_color };
    let border_type = if selected { BorderType::Double } else { BorderType::Rounded };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 { return; }

    let name_color = if selected { Color::Rgb(255, 255, 255) } else { tile.color };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("[{}] ", tile.key), Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD)),
        Span::styled(tile.name, Style::default().fg(name_color).add_modifier(Modifier::BOLD)),
    ])];

    let desc_color = if selected { Color::Rgb(180, 180, 200) } else { Color::Rgb(120, 120, 140) };
    for desc_line in tile.desc.split('\n') {
        lines.push(Line::from(Span::styled(desc_line, Style::default().fg(desc_color))));
    }

    if selected {
        lines.push(Line::from(Span::styled(
            "▶ Enter to play",
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

fn key_line(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("    {key:<17}"), Style::default().fg(Color::Rgb(80, 200, 255))),
        Span::styled(action.to_string(), Style::default().fg(Color::Rgb(140, 140, 140))),
    ])
}

fn game_controls(app: &App) -> Vec<Line<'static>> {
    let controls = match app.selected_game {
        0 => app.pong.game.controls(),
        1 => app.snake.game.controls(),
        _ => app.tower_defense.game.controls(),
    };
    let mut lines = vec![Line::from("")];
    lines.extend(controls.iter().map(|(key, action)| key_line(key, action)));
    lines
}

pub fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Banner
            Constraint::Length(7),  // Game tiles
            Constraint::Min(8),     // Controls area
            Constraint::Length(2),  // Footer
        ])
        .split(area);

    let banner = Paragraph::new(BANNER)
        .style(Style::default().fg(Color::Rgb(80, 200, 255)))
        .alignment(Alignment::Center);
    frame.render_widget(banner, chunks[0]);

    let games_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .title(" Games: ←→ Select, Enter to Play ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD));
    let games_inner = games_block.inner(chunks[1]);
    frame.render_widget(games_block, chunks[1]);

    let tile_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(games_inner);
    for (i, tile) in GAME_TILES.iter().enumerate() {
        render_game_tile(frame, tile_cols[i], tile, app.selected_game == i);
    }

    let ctrl_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[2]);

    let navigation = Paragraph::new(vec![
        Line::from(""),
        key_line("Tab / Shift+Tab", "Switch tabs"),
        key_line("1-3", "Launch game"),
        key_line("← →", "Select game"),
        key_line("Enter", "Play selected"),
        key_line("Esc", "Return to Home"),
        key_line("q / Ctrl+C", "Quit"),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
            .title(" Navigation ")
            .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(navigation, ctrl_cols[0]);

    let tile = &GAME_TILES[app.selected_game.min(GAME_TILES.len() - 1)];
    let game_ctrl = Paragraph::new(game_controls(app)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(tile.border_color))
            .title(format!(" {} Controls ", tile.name))
            .title_style(Style::default().fg(tile.color).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(game_ctrl, ctrl_cols[1]);

    let mut footer = vec![
        Span::styled("Snake high score: ", Style::default().fg(Color::Rgb(100, 100, 130))),
        Span::styled(
            app.high_score.best().to_string(),
            Style::default().fg(Color::Rgb(255, 220, 80)).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(status) = &app.status {
        footer.push(Span::styled("  │  ", Style::default().fg(Color::Rgb(40, 40, 60))));
        footer.push(Span::styled(status.clone(), Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)).alignment(Alignment::Center), chunks[3]);
}
