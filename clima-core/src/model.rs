use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Display unit preference. Both unit variants are always present in the
/// snapshot, so switching units never triggers a refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

/// Resolved location identity as reported by the provider, not the raw
/// user input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions. Temperatures carry both unit variants so the display
/// layer never performs unit math. Wind speed is canonically km/h.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition: String,
    pub condition_code: String,
    pub humidity: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub feelslike_c: f64,
    pub feelslike_f: f64,
    pub uv: f64,
    pub pressure_mb: f64,
    pub precip_mm: f64,
    /// Provider-local observation time.
    pub last_updated: NaiveDateTime,
    pub is_day: bool,
}

/// One day of the 7-day forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub maxtemp_c: f64,
    pub maxtemp_f: f64,
    pub mintemp_c: f64,
    pub mintemp_f: f64,
    pub condition: String,
    pub condition_code: String,
    pub chance_of_rain: f64,
}

/// One hour of the current day's hourly forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HourlyEntry {
    /// Provider-local hour.
    pub time: NaiveDateTime,
    pub temp_c: f64,
    pub temp_f: f64,
    pub condition_code: String,
    pub chance_of_rain: f64,
}

/// Normalized, provider-agnostic view of "weather right now plus forecasts"
/// for one location.
///
/// Invariants upheld by normalization:
/// - `daily` holds exactly 7 entries in chronological order, first entry is
///   the request day;
/// - `hourly` holds only the first forecast day's hours, in order;
/// - every `condition_code` is a non-empty key for [`crate::conditions::lookup`]
///   (unmapped codes resolve to the catalog default, never to an absent entry).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: Location,
    pub current: CurrentConditions,
    pub daily: Vec<DailyEntry>,
    pub hourly: Vec<HourlyEntry>,
}
