// City registry and list control state.
// The registry owns the loaded cities; the list mirrors a single-select dropdown.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::provider::{City, CityId};

/// Cities keyed by id, kept in display order (case-insensitive by name).
#[derive(Debug, Clone, Default)]
pub struct CityRegistry {
    cities: Vec<City>,
    by_id: HashMap<CityId, usize>,
}

impl CityRegistry {
    /// Build a registry, sorting cities case-insensitively by name.
    pub fn from_cities(mut cities: Vec<City>) -> Self {
        cities.sort_by_cached_key(|city| city.name.to_lowercase());
        let by_id = cities
            .iter()
            .enumerate()
            .map(|(index, city)| (city.id, index))
            .collect();
        Self { cities, by_id }
    }

    /// Read a JSON array of cities from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let cities: Vec<City> = serde_json::from_str(&contents)?;
        Ok(Self::from_cities(cities))
    }

    pub fn get(&self, id: CityId) -> Option<&City> {
        self.by_id.get(&id).map(|&index| &self.cities[index])
    }

    /// Cities in display order.
    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

/// One entry of the list control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityOption {
    pub id: CityId,
    pub label: String,
}

/// Single-select list of cities.
///
/// `None` as the selected index is the "no city" sentinel.
#[derive(Debug, Clone, Default)]
pub struct CityList {
    options: Vec<CityOption>,
    selected: Option<usize>,
}

impl CityList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options and clear the selection.
    pub fn set_options(&mut self, cities: &[City]) {
        self.options = cities
            .iter()
            .map(|city| CityOption {
                id: city.id,
                label: city.name.clone(),
            })
            .collect();
        self.selected = None;
    }

    pub fn options(&self) -> &[CityOption] {
        &self.options
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Get the currently selected index.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Select by index. Out-of-range indices select nothing.
    pub fn set_selected_index(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.options.len());
    }

    /// The selected city id.
    pub fn value(&self) -> Option<CityId> {
        self.selected
            .and_then(|i| self.options.get(i))
            .map(|option| option.id)
    }

    /// Select the option with the given id. Unknown ids select nothing.
    pub fn set_value(&mut self, id: CityId) {
        self.selected = self.options.iter().position(|option| option.id == id);
    }

    /// Index the next option would have after moving down one entry.
    pub fn next_index(&self) -> Option<usize> {
        if self.options.is_empty() {
            return None;
        }
        Some(match self.selected {
            Some(i) if i >= self.options.len() - 1 => i, // Stay at end
            Some(i) => i + 1,
            None => 0,
        })
    }

    /// Index the previous option would have after moving up one entry.
    pub fn prev_index(&self) -> Option<usize> {
        if self.options.is_empty() {
            return None;
        }
        Some(match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        })
    }
}
