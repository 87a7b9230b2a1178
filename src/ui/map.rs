// World map rendering.
// Braille canvas with one point per city marker, framed by the session viewport.

use ratatui::{
    prelude::*,
    symbols,
    widgets::canvas::{Canvas, Map, MapResolution, Points},
};

use crate::provider::CityId;
use crate::state::{Highlight, SelectionSynchronizer, Viewport};

use super::list::focus_block;

/// Render the map with every marker, the selected one on top.
pub fn render_map(
    frame: &mut Frame,
    session: &SelectionSynchronizer,
    cursor: Option<CityId>,
    focused: bool,
    area: Rect,
) {
    let viewport = session.viewport();
    let ([west, east], [south, north]) = viewport.bounds();
    let title = match (viewport, session.selected_city()) {
        (Viewport::City { zoom, .. }, Some(city)) => format!("Map: {} (zoom {})", city.name, zoom),
        _ => "Map: World".to_string(),
    };

    let normal: Vec<(f64, f64)> = session
        .markers()
        .iter()
        .filter(|marker| marker.highlight == Highlight::Normal)
        .map(|marker| (marker.coord.lon, marker.coord.lat))
        .collect();
    let selected: Vec<(f64, f64)> = session
        .markers()
        .highlighted()
        .map(|marker| (marker.coord.lon, marker.coord.lat))
        .collect();
    let cursor_label = cursor
        .and_then(|id| session.markers().get(id))
        .map(|marker| (marker.coord.lon, marker.coord.lat, format!("[{}]", marker.title)));
    let resolution = match viewport {
        Viewport::World => MapResolution::Low,
        Viewport::City { .. } => MapResolution::High,
    };

    let canvas = Canvas::default()
        .block(focus_block(&title, focused))
        .marker(symbols::Marker::Braille)
        .x_bounds([west, east])
        .y_bounds([south, north])
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: Color::DarkGray,
                resolution,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &normal,
                color: Color::Blue,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &selected,
                color: Color::Red,
            });
            if let Some((x, y, label)) = &cursor_label {
                ctx.print(
                    *x,
                    *y,
                    Span::styled(label.clone(), Style::default().fg(Color::Yellow)),
                );
            }
        });

    frame.render_widget(canvas, area);
}
