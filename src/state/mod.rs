// Client-side session state.
// City list, markers, viewport, history and weather panel, kept in sync by one synchronizer.

pub mod bootstrap;
pub mod cities;
pub mod console;
pub mod markers;
pub mod navigation;
pub mod panel;
pub mod selection;

pub use bootstrap::{BOOTSTRAP_COOKIE, BootstrapSlot, bootstrap_cookie};
pub use cities::{CityList, CityOption, CityRegistry};
pub use console::{Console, ConsoleLevel, ConsoleMessage};
pub use markers::{Highlight, Marker, MarkerSet, Viewport};
pub use navigation::{HistoryEntry, HistoryStack};
pub use panel::WeatherPanel;
pub use selection::{SelectionEvent, SelectionSynchronizer, SessionConfig, WeatherRequest};
