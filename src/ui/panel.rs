// Weather panel rendering.

use ratatui::{prelude::*, widgets::*};

use crate::state::SelectionSynchronizer;

use super::list::{focus_block, render_empty};

/// Render the four weather fields for the selected city.
pub fn render_weather_panel(frame: &mut Frame, session: &SelectionSynchronizer, area: Rect) {
    let title = match session.selected_city() {
        Some(city) => format!("Weather: {}", city.query()),
        None => "Weather".to_string(),
    };
    let block = focus_block(&title, false);

    let panel = session.panel();
    if panel.is_empty() && session.pending().is_none() {
        render_empty(frame, area, "Select a city", block);
        return;
    }

    let mut lines: Vec<Line> = panel
        .fields()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{:<12}", label), Style::default().fg(Color::DarkGray)),
                Span::raw(value.to_string()),
            ])
        })
        .collect();

    // Previous content stays visible until the lookup lands.
    if session.pending().is_some() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "Loading...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
