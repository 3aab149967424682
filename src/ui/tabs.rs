use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Tab};
use crate::engine::{Game, Phase};
use crate::session::Session;

const SELECTED: Color = Color::Rgb(255, 220, 80);
const DIM: Color = Color::Rgb(120, 120, 140);

// Running with a stopped driver means the tab is hidden and the round held.
fn marker(phase: Phase, ticking: bool) -> Option<(&'static str, Color)> {
    match phase {
        Phase::NotStarted => None,
        Phase::Running if ticking => Some(("▶", Color::Rgb(16, 185, 129))),
        Phase::Running | Phase::Paused => Some(("⏸", Color::Rgb(80, 200, 255))),
        Phase::Ended => Some(("■", Color::Rgb(220, 60, 60))),
    }
}

fn session_marker<G: Game>(session: &Session<G>) -> Option<(&'static str, Color)> {
    marker(session.game.phase(), session.driver().is_running())
}

fn tab_line(tab: Tab, app: &App) -> Line<'static> {
    let style = if tab == app.current_tab {
        Style::default().fg(SELECTED).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DIM)
    };
    let status = match tab {
        Tab::Home => None,
        Tab::Pong => session_marker(&app.pong),
        Tab::Snake => session_marker(&app.snake),
        Tab::TowerDefense => session_marker(&app.tower_defense),
    };

    let mut spans = vec![Span::styled(tab.title().to_string(), style)];
    if let Some((symbol, color)) = status {
        spans.push(Span::styled(format!("{symbol} "), Style::default().fg(color)));
    }
    Line::from(spans)
}

pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::all().iter().map(|t| tab_line(*t, app)).collect();

    let best = Line::from(vec![
        Span::styled(" Best ", Style::default().fg(DIM)),
        Span::styled(
            format!("{} ", app.high_score.best()),
            Style::default().fg(SELECTED).add_modifier(Modifier::BOLD),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(60, 150, 200)))
        .border_type(BorderType::Rounded)
        .title(" Minicade ")
        .title_style(Style::default().fg(Color::Rgb(200, 120, 255)).add_modifier(Modifier::BOLD))
        .title(best.right_aligned());

    let tabs = Tabs::new(titles)
        .block(block)
        .select(app.current_tab.index())
        .highlight_style(Style::default().fg(SELECTED).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(Color::Rgb(60, 60, 80))));

    frame.render_widget(tabs, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::audio::Silent;
    use crate::engine::input::Input;
    use crate::scores::HighScore;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn markers_follow_phase_and_driver() {
        assert_eq!(marker(Phase::NotStarted, false), None);
        assert_eq!(marker(Phase::Running, true).map(|m| m.0), Some("▶"));
        assert_eq!(marker(Phase::Running, false).map(|m| m.0), Some("⏸"));
        assert_eq!(marker(Phase::Paused, false).map(|m| m.0), Some("⏸"));
        assert_eq!(marker(Phase::Ended, false).map(|m| m.0), Some("■"));
    }

    #[test]
    fn hidden_running_game_shows_as_held() {
        let t0 = Instant::now();
        let path = std::env::temp_dir().join(format!("minicade-tabs-{}.scores", std::process::id()));
        let mut app = App::with_parts(3, HighScore::load(path), Box::new(Silent));
        app.switch_to(Tab::Pong, t0);
        app.pong.handle_input(Input::Toggle, t0);
        let playing: String = tab_line(Tab::Pong, &app).spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(playing, " Pong ▶ ");

        app.switch_to(Tab::Home, t0);
        let held: String = tab_line(Tab::Pong, &app).spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(held, " Pong ⏸ ");
        assert_eq!(tab_line(Tab::Snake, &app).spans.len(), 1);

        let mut terminal = Terminal::new(TestBackend::new(60, 3)).unwrap();
        terminal.draw(|f| render_tabs(f, &app, f.area())).unwrap();
        let top: String = (0..60u16).map(|x| terminal.backend().buffer()[(x, 0)].symbol().to_string()).collect();
        assert!(top.contains("Minicade"));
        assert!(top.contains("Best 0"));
    }
}
