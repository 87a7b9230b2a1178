// UI module for rendering the viewer.
// History trail, city list, world map, weather panel and status bar.

mod breadcrumb;
mod list;
mod map;
mod panel;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Focus};
use crate::state::ConsoleLevel;

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // History trail
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    breadcrumb::draw_history(frame, &app.session, chunks[0]);
    draw_content(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);
}

/// List on the left, map in the middle, weather on the right.
fn draw_content(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Min(20),
            Constraint::Length(36),
        ])
        .split(area);

    list::render_city_list(
        frame,
        app.session.list(),
        app.focus == Focus::List,
        columns[0],
    );
    map::render_map(
        frame,
        &app.session,
        app.map_cursor.filter(|_| app.focus == Focus::Map),
        app.focus == Focus::Map,
        columns[1],
    );
    panel::render_weather_panel(frame, &app.session, columns[2]);
}

/// Draw the status bar with keybinding hints and the latest console message.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = match app.focus {
        Focus::List => vec![
            Span::raw(" ↑↓ "),
            Span::styled("City", Style::default().fg(Color::DarkGray)),
        ],
        Focus::Map => vec![
            Span::raw(" ←→ "),
            Span::styled("Marker", Style::default().fg(Color::DarkGray)),
            Span::raw("  ↵ "),
            Span::styled("Click", Style::default().fg(Color::DarkGray)),
        ],
    };
    spans.extend([
        Span::raw("  x "),
        Span::styled("None", Style::default().fg(Color::DarkGray)),
        Span::raw("  Tab "),
        Span::styled("Focus", Style::default().fg(Color::DarkGray)),
        Span::raw("  b/f "),
        Span::styled("Back/Fwd", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ]);

    if app.console.errors_total > 0 {
        spans.push(Span::styled(
            format!("  errors: {}", app.console.errors_total),
            Style::default().fg(Color::Red),
        ));
    }

    if let Some(message) = app.console.latest() {
        let color = match message.level {
            ConsoleLevel::Error => Color::Red,
            ConsoleLevel::Warn => Color::Yellow,
            ConsoleLevel::Info => Color::Cyan,
        };
        spans.push(Span::styled(
            format!("  {}", message.message),
            Style::default().fg(color),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
