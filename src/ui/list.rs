// City list rendering.
// Mirrors the list control: options in display order, the selection highlighted.

use ratatui::{prelude::*, widgets::*};

use crate::state::CityList;

/// Block with a border that lights up when focused.
pub fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(format!(" {} ", title))
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str, block: Block) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(block);
    frame.render_widget(text, area);
}

/// Render the city list.
pub fn render_city_list(frame: &mut Frame, list: &CityList, focused: bool, area: Rect) {
    let block = focus_block("Cities", focused);
    if list.is_empty() {
        render_empty(frame, area, "No cities", block);
        return;
    }

    let items: Vec<ListItem> = list
        .options()
        .iter()
        .map(|option| ListItem::new(option.label.clone()))
        .collect();

    let widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(list.selected_index());
    frame.render_stateful_widget(widget, area, &mut state);
}
