// Selection synchronizer.
// One transition function keeps the city list, map markers, viewport, history
// and weather panel consistent with the selected city.

use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::cache::TimedCache;
use crate::config::ViewerConfig;
use crate::error::{Result, WeatherError};
use crate::provider::{City, CityId, WeatherReport};

use super::bootstrap::BootstrapSlot;
use super::cities::{CityList, CityRegistry};
use super::console::ConsoleMessage;
use super::markers::{Highlight, MarkerSet, Viewport};
use super::navigation::{HistoryEntry, HistoryStack};
use super::panel::WeatherPanel;

/// Per-session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Server base URL, used for history entry URLs.
    pub base_url: String,
    /// Zoom level for the city close-up.
    pub city_zoom: u8,
    /// Expiration window of the client-side weather cache.
    pub cache_ttl: Duration,
}

impl SessionConfig {
    pub fn from_viewer(config: &ViewerConfig) -> Self {
        Self {
            base_url: config.server_url.trim_end_matches('/').to_string(),
            city_zoom: config.city_zoom,
            cache_ttl: config.cache_ttl(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_viewer(&ViewerConfig::default())
    }
}

/// Inputs that can change the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The list control's selection changed.
    ListChanged,
    /// The marker for a city was clicked.
    MarkerClicked(CityId),
    /// Back/forward navigation landed on an entry with this list index.
    HistoryPopped(Option<usize>),
}

/// An outbound weather lookup. The city id is the token a response is
/// matched against before it may be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct WeatherRequest {
    pub city_id: CityId,
}

/// Owns the selected city and every view that reflects it.
///
/// Does no I/O: transitions that need weather data return a
/// [`WeatherRequest`], and the caller reports the outcome through
/// [`SelectionSynchronizer::complete`].
#[derive(Debug)]
pub struct SelectionSynchronizer {
    config: SessionConfig,
    registry: CityRegistry,
    list: CityList,
    markers: MarkerSet,
    viewport: Viewport,
    history: HistoryStack,
    panel: WeatherPanel,
    weather: TimedCache<CityId, WeatherReport>,
    selected: Option<CityId>,
    pending: Option<CityId>,
    /// Messages for the viewer console, collected with `take_notices`.
    notices: Vec<ConsoleMessage>,
}

impl SelectionSynchronizer {
    pub fn new(config: SessionConfig) -> Self {
        let history = HistoryStack::new(HistoryEntry::none(config.base_url.clone()));
        Self {
            config,
            registry: CityRegistry::default(),
            list: CityList::new(),
            markers: MarkerSet::default(),
            viewport: Viewport::World,
            history,
            panel: WeatherPanel::new(),
            weather: TimedCache::new(),
            selected: None,
            pending: None,
            notices: Vec::new(),
        }
    }

    /// Startup: sort cities, place markers, fill the list with nothing
    /// selected, then consume the deep-link payload if there is one.
    /// Without a payload the current history entry becomes the "no city" entry.
    pub fn load(&mut self, cities: Vec<City>, bootstrap: &mut BootstrapSlot) -> Option<WeatherRequest> {
        self.registry = CityRegistry::from_cities(cities);
        self.markers = MarkerSet::from_cities(self.registry.cities());
        self.list.set_options(self.registry.cities());
        self.selected = None;
        self.pending = None;
        self.viewport = Viewport::World;
        info!(count = self.registry.len(), "cities loaded");
        self.notices
            .push(ConsoleMessage::info(format!("Loaded {} cities", self.registry.len())));

        if let Some(payload) = bootstrap.take() {
            match self.consume_bootstrap(&payload) {
                Ok(request) => return request,
                Err(err) => {
                    warn!(error = %err, "ignoring deep-link payload");
                    self.notices
                        .push(ConsoleMessage::warn(format!("Ignoring deep link: {}", err)));
                }
            }
        }

        self.history
            .replace(HistoryEntry::none(self.config.base_url.clone()));
        None
    }

    /// Cache the deep-linked weather and select its city as if the user had.
    /// A payload for a city outside the registry is cached but selects nothing.
    fn consume_bootstrap(&mut self, payload: &str) -> Result<Option<WeatherRequest>> {
        let report: WeatherReport = serde_json::from_str(payload).map_err(WeatherError::malformed)?;
        let city_id = report
            .id
            .ok_or_else(|| WeatherError::MalformedResponse("deep-link payload has no id".to_string()))?;

        self.weather.put(city_id, report);
        if self.registry.get(city_id).is_none() {
            return Err(WeatherError::UnknownCity(city_id));
        }

        info!(city_id, "opening deep link");
        self.list.set_value(city_id);
        Ok(self.handle(SelectionEvent::ListChanged))
    }

    /// The user picked a list entry (`None` for "no city").
    /// Picking the entry that is already selected does nothing.
    pub fn select_index(&mut self, index: Option<usize>) -> Option<WeatherRequest> {
        let previous = self.list.selected_index();
        self.list.set_selected_index(index);
        if self.list.selected_index() == previous {
            return None;
        }
        self.handle(SelectionEvent::ListChanged)
    }

    /// Browser back button.
    pub fn back(&mut self) -> Option<WeatherRequest> {
        let index = self.history.back()?.index;
        self.handle(SelectionEvent::HistoryPopped(index))
    }

    /// Browser forward button.
    pub fn forward(&mut self) -> Option<WeatherRequest> {
        let index = self.history.forward()?.index;
        self.handle(SelectionEvent::HistoryPopped(index))
    }

    /// Apply one input. Marker clicks and history moves only update the list
    /// and then replay the list-change transition.
    pub fn handle(&mut self, event: SelectionEvent) -> Option<WeatherRequest> {
        match event {
            SelectionEvent::ListChanged => self.apply_list_change(),
            SelectionEvent::MarkerClicked(city_id) => {
                if self.registry.get(city_id).is_none() {
                    warn!(city_id, "click on unknown marker");
                    self.notices
                        .push(ConsoleMessage::warn(format!("No city with id {}", city_id)));
                    return None;
                }
                if self.list.value() == Some(city_id) {
                    return None;
                }
                self.list.set_value(city_id);
                self.apply_list_change()
            }
            SelectionEvent::HistoryPopped(index) => {
                if self.list.selected_index() == index {
                    return None;
                }
                self.list.set_selected_index(index);
                self.apply_list_change()
            }
        }
    }

    fn apply_list_change(&mut self) -> Option<WeatherRequest> {
        if let Some(previous) = self.selected {
            self.markers.set_highlight(previous, Highlight::Normal);
        }

        self.selected = self.list.value();
        let index = self.list.selected_index();

        // Back/forward lands on an entry that already matches, so it never pushes.
        if self.history.current().index != index {
            let url = self.url_for(self.selected);
            self.history.push(HistoryEntry::new(index, url));
        }

        match self.selected.and_then(|id| self.registry.get(id)) {
            Some(city) => {
                self.markers.set_highlight(city.id, Highlight::Selected);
                self.viewport = Viewport::City {
                    center: city.coord,
                    zoom: self.config.city_zoom,
                };
            }
            None => self.viewport = Viewport::World,
        }

        self.update_weather()
    }

    /// Render from the cache if fresh, otherwise ask for a lookup.
    fn update_weather(&mut self) -> Option<WeatherRequest> {
        let Some(city_id) = self.selected else {
            self.panel.render(None);
            self.pending = None;
            return None;
        };

        if let Some(report) = self.weather.get_fresh(&city_id, self.config.cache_ttl) {
            debug!(city_id, "weather cache hit");
            self.panel.render(Some(report));
            self.pending = None;
            return None;
        }

        debug!(city_id, "weather cache miss");
        self.pending = Some(city_id);
        Some(WeatherRequest { city_id })
    }

    /// Report the outcome of a lookup. A successful payload is always cached,
    /// but rendered only if its city is still selected. Returns whether the
    /// panel was updated.
    pub fn complete(&mut self, request: WeatherRequest, result: Result<WeatherReport>) -> bool {
        let city_id = request.city_id;
        match result {
            Ok(report) => {
                let current = self.selected == Some(city_id);
                if current {
                    self.panel.render(Some(&report));
                    self.pending = None;
                } else {
                    debug!(city_id, selected = ?self.selected, "discarding weather for abandoned selection");
                }
                self.weather.put(city_id, report);
                current
            }
            Err(err) => {
                error!(city_id, error = %err, "weather lookup failed");
                self.notices.push(ConsoleMessage::error(format!(
                    "Weather for city {}: {}",
                    city_id, err
                )));
                if self.pending == Some(city_id) {
                    self.pending = None;
                }
                false
            }
        }
    }

    fn url_for(&self, city_id: Option<CityId>) -> String {
        match city_id.and_then(|id| self.registry.get(id)) {
            Some(city) => format!(
                "{}/weather?city={}",
                self.config.base_url,
                urlencoding::encode(&city.query())
            ),
            None => self.config.base_url.clone(),
        }
    }

    pub fn selected(&self) -> Option<CityId> {
        self.selected
    }

    pub fn selected_city(&self) -> Option<&City> {
        self.selected.and_then(|id| self.registry.get(id))
    }

    /// City whose lookup is in flight, if it is still the selection.
    pub fn pending(&self) -> Option<CityId> {
        self.pending
    }

    pub fn registry(&self) -> &CityRegistry {
        &self.registry
    }

    pub fn list(&self) -> &CityList {
        &self.list
    }

    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn panel(&self) -> &WeatherPanel {
        &self.panel
    }

    /// Console messages produced since the last call.
    pub fn take_notices(&mut self) -> Vec<ConsoleMessage> {
        std::mem::take(&mut self.notices)
    }
}
