use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    model::{CurrentConditions, DailyEntry, HourlyEntry, Location, WeatherSnapshot},
    provider::{LocationQuery, ProviderError},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Days requested from the forecast endpoint; the snapshot carries exactly
/// this many daily entries.
const FORECAST_DAYS: usize = 7;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timestamp layout used by WeatherAPI for `last_updated` and hourly `time`.
const WA_DATETIME_FMT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point the provider at a different endpoint. Used by tests to target
    /// a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_forecast(
        &self,
        query: &LocationQuery,
    ) -> Result<WaForecastResponse, ProviderError> {
        let url = format!("{}/forecast.json", self.base_url);
        let q = query.as_query();

        debug!(%q, days = FORECAST_DAYS, "requesting forecast from WeatherAPI");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", q.as_str()),
                ("days", "7"),
                ("aqi", "no"),
                ("alerts", "no"),
            ])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| ProviderError::Shape(e.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn forecast(&self, query: &LocationQuery) -> Result<WeatherSnapshot, ProviderError> {
        let raw = self.fetch_forecast(query).await?;
        normalize(raw)
    }
}

// Raw payload mapping. Every consumed field is required: a payload missing
// one of them is a shape failure, not a snapshot with holes.

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    code: i64,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    temp_f: f64,
    condition: WaCondition,
    humidity: u8,
    wind_kph: f64,
    wind_dir: String,
    feelslike_c: f64,
    feelslike_f: f64,
    uv: f64,
    pressure_mb: f64,
    precip_mm: f64,
    last_updated: String,
    is_day: u8,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    maxtemp_f: f64,
    mintemp_c: f64,
    mintemp_f: f64,
    condition: WaCondition,
    daily_chance_of_rain: f64,
}

#[derive(Debug, Deserialize)]
struct WaHour {
    time: String,
    temp_c: f64,
    temp_f: f64,
    condition: WaCondition,
    chance_of_rain: f64,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
    hour: Vec<WaHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    current: WaCurrent,
    forecast: WaForecast,
}

/// Turn a raw WeatherAPI payload into the provider-agnostic snapshot.
///
/// Upholds the snapshot invariants: exactly [`FORECAST_DAYS`] daily entries
/// in chronological order, hourly entries from the first forecast day only,
/// condition codes coerced to their string form.
fn normalize(raw: WaForecastResponse) -> Result<WeatherSnapshot, ProviderError> {
    let location = Location {
        name: raw.location.name,
        country: raw.location.country,
        lat: raw.location.lat,
        lon: raw.location.lon,
    };

    let last_updated = parse_datetime(&raw.current.last_updated)?;

    let current = CurrentConditions {
        temp_c: raw.current.temp_c,
        temp_f: raw.current.temp_f,
        condition: raw.current.condition.text,
        condition_code: raw.current.condition.code.to_string(),
        humidity: raw.current.humidity,
        wind_kph: raw.current.wind_kph,
        wind_dir: raw.current.wind_dir,
        feelslike_c: raw.current.feelslike_c,
        feelslike_f: raw.current.feelslike_f,
        uv: raw.current.uv,
        pressure_mb: raw.current.pressure_mb,
        precip_mm: raw.current.precip_mm,
        last_updated,
        is_day: raw.current.is_day != 0,
    };

    let mut daily = Vec::with_capacity(raw.forecast.forecastday.len());
    let mut hourly = Vec::new();

    for (i, day) in raw.forecast.forecastday.into_iter().enumerate() {
        let date = parse_date(&day.date)?;

        // Only the request day's hours feed the hourly chart.
        if i == 0 {
            hourly.reserve(day.hour.len());
            for hour in day.hour {
                hourly.push(HourlyEntry {
                    time: parse_datetime(&hour.time)?,
                    temp_c: hour.temp_c,
                    temp_f: hour.temp_f,
                    condition_code: hour.condition.code.to_string(),
                    chance_of_rain: hour.chance_of_rain,
                });
            }
        }

        daily.push(DailyEntry {
            date,
            maxtemp_c: day.day.maxtemp_c,
            maxtemp_f: day.day.maxtemp_f,
            mintemp_c: day.day.mintemp_c,
            mintemp_f: day.day.mintemp_f,
            condition: day.day.condition.text,
            condition_code: day.day.condition.code.to_string(),
            chance_of_rain: day.day.daily_chance_of_rain,
        });
    }

    daily.sort_by_key(|entry| entry.date);

    if daily.len() < FORECAST_DAYS {
        return Err(ProviderError::Shape(format!(
            "expected {FORECAST_DAYS} forecast days, got {}",
            daily.len()
        )));
    }
    daily.truncate(FORECAST_DAYS);

    Ok(WeatherSnapshot { location, current, daily, hourly })
}

fn parse_datetime(s: &str) -> Result<NaiveDateTime, ProviderError> {
    NaiveDateTime::parse_from_str(s, WA_DATETIME_FMT)
        .map_err(|e| ProviderError::Shape(format!("invalid timestamp '{s}': {e}")))
}

fn parse_date(s: &str) -> Result<NaiveDate, ProviderError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| ProviderError::Shape(format!("invalid date '{s}': {e}")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    // Cut must land on a char boundary; error bodies are not always ASCII.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
