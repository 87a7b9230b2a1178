// Map marker and viewport state.
// One marker per city; the viewport is either the whole world or a city close-up.

use std::collections::HashMap;

use crate::provider::{City, CityId, Coord};

/// Marker icon state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Selected,
}

/// A map pin bound to one city.
#[derive(Debug, Clone)]
pub struct Marker {
    pub city_id: CityId,
    pub title: String,
    pub coord: Coord,
    pub highlight: Highlight,
}

/// All markers for the session, created once at load.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    by_city: HashMap<CityId, usize>,
}

impl MarkerSet {
    /// Place one normal marker per city.
    pub fn from_cities(cities: &[City]) -> Self {
        let markers: Vec<Marker> = cities
            .iter()
            .map(|city| Marker {
                city_id: city.id,
                title: city.name.clone(),
                coord: city.coord,
                highlight: Highlight::Normal,
            })
            .collect();
        let by_city = markers
            .iter()
            .enumerate()
            .map(|(index, marker)| (marker.city_id, index))
            .collect();
        Self { markers, by_city }
    }

    pub fn get(&self, city_id: CityId) -> Option<&Marker> {
        self.by_city.get(&city_id).map(|&index| &self.markers[index])
    }

    /// Set the icon of the marker for `city_id`. Unknown ids are ignored.
    pub fn set_highlight(&mut self, city_id: CityId, highlight: Highlight) {
        if let Some(&index) = self.by_city.get(&city_id) {
            self.markers[index].highlight = highlight;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    /// Markers currently showing the selected icon.
    pub fn highlighted(&self) -> impl Iterator<Item = &Marker> {
        self.markers
            .iter()
            .filter(|marker| marker.highlight == Highlight::Selected)
    }

    /// City ids ordered west to east, for cycling a cursor across the map.
    pub fn west_to_east(&self) -> Vec<CityId> {
        let mut markers: Vec<&Marker> = self.markers.iter().collect();
        markers.sort_by(|a, b| a.coord.lon.total_cmp(&b.coord.lon));
        markers.into_iter().map(|marker| marker.city_id).collect()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// What the map is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Viewport {
    /// Fit the whole world.
    #[default]
    World,
    /// Centered on a city at a fixed zoom level.
    City { center: Coord, zoom: u8 },
}

impl Viewport {
    /// Visible longitude and latitude ranges.
    /// Each zoom level halves the visible span.
    pub fn bounds(&self) -> ([f64; 2], [f64; 2]) {
        match self {
            Viewport::World => ([-180.0, 180.0], [-90.0, 90.0]),
            Viewport::City { center, zoom } => {
                let half_lon = 180.0 / 2f64.powi(i32::from(*zoom) / 2);
                let half_lat = half_lon / 2.0;
                (
                    [center.lon - half_lon, center.lon + half_lon],
                    [center.lat - half_lat, center.lat + half_lat],
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(id: CityId, lon: f64) -> City {
        City {
            id,
            name: format!("City {}", id),
            country: "XX".to_string(),
            coord: Coord { lat: 0.0, lon },
        }
    }

    #[test]
    fn test_markers_start_normal() {
        let markers = MarkerSet::from_cities(&[city(1, 0.0), city(2, 10.0)]);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers.highlighted().count(), 0);
    }

    #[test]
    fn test_set_highlight() {
        let mut markers = MarkerSet::from_cities(&[city(1, 0.0), city(2, 10.0)]);
        markers.set_highlight(2, Highlight::Selected);
        let ids: Vec<CityId> = markers.highlighted().map(|m| m.city_id).collect();
        assert_eq!(ids, [2]);

        markers.set_highlight(2, Highlight::Normal);
        markers.set_highlight(42, Highlight::Selected);
        assert_eq!(markers.highlighted().count(), 0);
    }

    #[test]
    fn test_west_to_east() {
        let markers = MarkerSet::from_cities(&[city(1, 30.0), city(2, -70.0), city(3, 2.0)]);
        assert_eq!(markers.west_to_east(), [2, 3, 1]);
    }

    #[test]
    fn test_viewport_bounds() {
        assert_eq!(Viewport::World.bounds(), ([-180.0, 180.0], [-90.0, 90.0]));

        let view = Viewport::City {
            center: Coord { lat: 48.0, lon: 2.0 },
            zoom: 10,
        };
        let (x, y) = view.bounds();
        assert_eq!(x, [2.0 - 5.625, 2.0 + 5.625]);
        assert_eq!(y, [48.0 - 2.8125, 48.0 + 2.8125]);
    }
}
