// Weather panel state.
// Four display fields filled from a weather report, or cleared.

use crate::provider::WeatherReport;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherPanel {
    pub description: String,
    pub wind: String,
    pub temperature: String,
    pub humidity: String,
}

impl WeatherPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the fields from `report`, or clear them all when absent.
    /// Values are interpolated as-is, without unit conversion.
    pub fn render(&mut self, report: Option<&WeatherReport>) {
        match report {
            Some(data) => {
                self.description = data.description().to_string();
                self.wind = format!("speed {}, {} degrees", data.wind.speed, data.wind.deg);
                self.temperature = data.main.temp.to_string();
                self.humidity = format!("{}%", data.main.humidity);
            }
            None => *self = Self::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Label/value pairs in display order.
    pub fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("Description", self.description.as_str()),
            ("Wind", self.wind.as_str()),
            ("Temperature", self.temperature.as_str()),
            ("Humidity", self.humidity.as_str()),
        ]
    }
}
