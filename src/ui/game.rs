use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::engine::{Game, Phase};

use super::raster::{CellCanvas, Viewport};

/// Draws one game view and returns where its canvas landed.
pub fn render_game(frame: &mut Frame, area: Rect, game: &dyn Game, accent: Color) -> Viewport {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .title(format!(" {} ", game.title()))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(status_line(game)), chunks[0]);

    let logical = game.canvas_size();
    let viewport = Viewport::fit(chunks[1], logical);
    let mut canvas = CellCanvas::new(&viewport, logical);
    game.render(&mut canvas);
    frame.render_widget(Paragraph::new(canvas.into_lines()), viewport.area);

    frame.render_widget(Paragraph::new(help_line(game)), chunks[2]);
    viewport
}

fn status_line(game: &dyn Game) -> Line<'static> {
    let hud = game.hud();
    let mut spans = vec![Span::raw(" ")];
    for (i, (label, value)) in hud.fields().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(format!("{label}: "), Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            value.clone(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(notice) = &hud.notice {
        spans.push(Span::styled("  ", Style::default()));
        spans.push(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

fn help_line(game: &dyn Game) -> Line<'static> {
    let mut spans = Vec::new();
    if game.phase() == Phase::Ended {
        spans.push(Span::styled(
            " GAME OVER ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    for (key, action) in game.controls() {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(Color::Rgb(80, 200, 255)).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(format!("{action} "), Style::default().fg(Color::Gray)));
    }
    Line::from(spans)
}
