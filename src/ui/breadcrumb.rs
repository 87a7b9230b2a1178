// History trail rendering.
// Shows every history entry with the current one highlighted.

use ratatui::{prelude::*, widgets::*};

use crate::state::{HistoryEntry, SelectionSynchronizer};

/// Label for a history entry: the city name at its list index.
fn entry_label(session: &SelectionSynchronizer, entry: &HistoryEntry) -> String {
    entry
        .index
        .and_then(|i| session.list().options().get(i))
        .map(|option| option.label.clone())
        .unwrap_or_else(|| "No city".to_string())
}

/// Render the history trail, with the current URL on the right.
pub fn draw_history(frame: &mut Frame, session: &SelectionSynchronizer, area: Rect) {
    let history = session.history();
    let mut spans = vec![Span::styled(" ", Style::default())];

    for (i, entry) in history.entries().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }

        let style = if i == history.cursor() {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if i > history.cursor() {
            // Forward entries
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        spans.push(Span::styled(entry_label(session, entry), style));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    let url = Line::from(Span::styled(
        history.current().url.clone(),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(
        Paragraph::new(url).alignment(Alignment::Right),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );
}
