// Viewer app state and main event loop.
// Turns keys into selection events, runs weather lookups on the runtime and feeds results back.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::ViewerClient;
use crate::error::Result;
use crate::provider::{CityId, WeatherReport};
use crate::state::{Console, SelectionEvent, SelectionSynchronizer, WeatherRequest};
use crate::ui;

/// Which surface receives arrow keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    List,
    Map,
}

impl Focus {
    pub fn toggle(&self) -> Self {
        match self {
            Focus::List => Focus::Map,
            Focus::Map => Focus::List,
        }
    }
}

/// Outcome of a spawned lookup.
struct LookupResult {
    request: WeatherRequest,
    result: Result<WeatherReport>,
}

/// Main application state.
pub struct App {
    /// Selection state and every view derived from it.
    pub session: SelectionSynchronizer,
    /// Surface receiving arrow keys.
    pub focus: Focus,
    /// Marker under the map cursor.
    pub map_cursor: Option<CityId>,
    /// Diagnostic messages for the status bar.
    pub console: Console,
    /// Whether the app should exit.
    pub should_quit: bool,
    client: ViewerClient,
    runtime: Handle,
    results_tx: UnboundedSender<LookupResult>,
    results_rx: UnboundedReceiver<LookupResult>,
}

impl App {
    pub fn new(session: SelectionSynchronizer, client: ViewerClient, runtime: Handle) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            session,
            focus: Focus::default(),
            map_cursor: None,
            console: Console::default(),
            should_quit: false,
            client,
            runtime,
            results_tx,
            results_rx,
        };
        app.collect_notices();
        app
    }

    /// Move the session's messages into the console.
    fn collect_notices(&mut self) {
        for message in self.session.take_notices() {
            self.console.push(message);
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
            self.drain_results();
        }
        Ok(())
    }

    /// Start the lookup for `request`, if any. The result arrives through the channel.
    pub fn dispatch(&mut self, request: Option<WeatherRequest>) {
        let Some(request) = request else {
            return;
        };

        let client = self.client.clone();
        let tx = self.results_tx.clone();
        self.runtime.spawn(async move {
            let result = client.weather(request.city_id).await;
            // The receiver is gone only after the app quit.
            let _ = tx.send(LookupResult { request, result });
        });
    }

    /// Apply every lookup that finished since the last tick.
    fn drain_results(&mut self) {
        while let Ok(LookupResult { request, result }) = self.results_rx.try_recv() {
            self.session.complete(request, result);
        }
        self.collect_notices();
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        let request = match (code, self.focus) {
            (KeyCode::Char('q'), _) => {
                self.should_quit = true;
                None
            }
            (KeyCode::Tab | KeyCode::BackTab, _) => {
                self.focus = self.focus.toggle();
                if self.focus == Focus::Map && self.map_cursor.is_none() {
                    self.map_cursor = self
                        .session
                        .selected()
                        .or_else(|| self.session.markers().west_to_east().first().copied());
                }
                None
            }
            (KeyCode::Char('b') | KeyCode::Backspace, _) => self.session.back(),
            (KeyCode::Char('f'), _) => self.session.forward(),
            (KeyCode::Char('x'), _) => self.session.select_index(None),
            (KeyCode::Down | KeyCode::Char('j'), Focus::List) => {
                let next = self.session.list().next_index();
                self.session.select_index(next)
            }
            (KeyCode::Up | KeyCode::Char('k'), Focus::List) => {
                let prev = self.session.list().prev_index();
                self.session.select_index(prev)
            }
            (KeyCode::Right | KeyCode::Char('l'), Focus::Map) => {
                self.move_map_cursor(1);
                None
            }
            (KeyCode::Left | KeyCode::Char('h'), Focus::Map) => {
                self.move_map_cursor(-1);
                None
            }
            (KeyCode::Enter, Focus::Map) => match self.map_cursor {
                Some(city_id) => self.session.handle(SelectionEvent::MarkerClicked(city_id)),
                None => None,
            },
            _ => None,
        };
        self.collect_notices();
        self.dispatch(request);
    }

    /// Move the map cursor east (`step > 0`) or west, wrapping around.
    fn move_map_cursor(&mut self, step: isize) {
        let order = self.session.markers().west_to_east();
        if order.is_empty() {
            return;
        }
        let len = order.len() as isize;
        let position = self
            .map_cursor
            .and_then(|id| order.iter().position(|&other| other == id))
            .map(|i| i as isize);
        let next = match position {
            Some(i) => (i + step).rem_euclid(len),
            None => 0,
        };
        self.map_cursor = Some(order[next as usize]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{City, Coord};
    use crate::state::{BootstrapSlot, ConsoleLevel, SessionConfig};

    fn city(id: CityId, name: &str, lon: f64) -> City {
        City {
            id,
            name: name.to_string(),
            country: "XX".to_string(),
            coord: Coord { lat: 10.0, lon },
        }
    }

    fn app() -> App {
        let mut session = SelectionSynchronizer::new(SessionConfig::default());
        let _ = session.load(
            vec![city(1, "Alpha", 50.0), city(2, "Bravo", -20.0), city(3, "Charlie", 5.0)],
            &mut BootstrapSlot::empty(),
        );
        // Lookups target a closed port and fail in the background.
        let client = ViewerClient::new("http://127.0.0.1:9").unwrap();
        App::new(session, client, Handle::current())
    }

    #[tokio::test]
    async fn test_list_keys_select_cities() {
        let mut app = app();
        app.handle_key(KeyCode::Down);
        assert_eq!(app.session.selected(), Some(1));
        app.handle_key(KeyCode::Down);
        assert_eq!(app.session.selected(), Some(2));
        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.session.selected(), None);
        app.handle_key(KeyCode::Char('b'));
        assert_eq!(app.session.selected(), Some(2));
    }

    #[tokio::test]
    async fn test_map_cursor_and_click() {
        let mut app = app();
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus, Focus::Map);
        assert_eq!(app.map_cursor, Some(2)); // westernmost

        app.handle_key(KeyCode::Right);
        assert_eq!(app.map_cursor, Some(3));
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Left);
        assert_eq!(app.map_cursor, Some(1)); // wrapped to the east

        app.handle_key(KeyCode::Enter);
        assert_eq!(app.session.selected(), Some(1));
        assert_eq!(app.session.list().value(), Some(1));

        // Arrow keys do not move the list while the map has focus.
        app.handle_key(KeyCode::Down);
        assert_eq!(app.session.selected(), Some(1));
    }

    #[tokio::test]
    async fn test_session_messages_reach_console() {
        let mut app = app();
        assert_eq!(
            app.console.latest().map(|m| m.message.as_str()),
            Some("Loaded 3 cities")
        );

        app.handle_key(KeyCode::Tab);
        app.map_cursor = Some(999);
        app.handle_key(KeyCode::Enter);
        let latest = app.console.latest().unwrap();
        assert_eq!(latest.level, ConsoleLevel::Warn);
        assert!(latest.message.contains("999"));
    }

    #[tokio::test]
    async fn test_quit() {
        let mut app = app();
        app.handle_key(KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
