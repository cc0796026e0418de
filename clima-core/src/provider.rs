use crate::{Config, model::WeatherSnapshot, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};
use thiserror::Error;

pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::WeatherApi]
    }
}

impl Default for ProviderId {
    fn default() -> Self {
        ProviderId::WeatherApi
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: weatherapi."
            )),
        }
    }
}

/// What the caller wants a forecast for. Rendered into the provider's
/// location query parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Name(String),
    Coordinates { lat: f64, lon: f64 },
}

impl LocationQuery {
    /// Provider query string: the place name verbatim, or `"lat,lon"`.
    pub fn as_query(&self) -> String {
        match self {
            LocationQuery::Name(name) => name.clone(),
            LocationQuery::Coordinates { lat, lon } => format!("{lat},{lon}"),
        }
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_query())
    }
}

/// Failure modes of a forecast request. The state core collapses all of
/// these into one user-facing message; the distinction exists for logging
/// and for tests.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network-level failure: DNS, connect, timeout, broken transfer.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Provider answered with a non-2xx status.
    #[error("provider rejected request with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Payload did not match the expected shape.
    #[error("malformed provider payload: {0}")]
    Shape(String),
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch and normalize a 7-day forecast for the queried location.
    async fn forecast(&self, query: &LocationQuery) -> Result<WeatherSnapshot, ProviderError>;
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `clima configure` and enter your API key."
        )
    })?;

    let boxed: Box<dyn WeatherProvider> = match id {
        ProviderId::WeatherApi => Box::new(WeatherApiProvider::new(api_key.to_owned())),
    };

    Ok(boxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_id_as_str_roundtrip() {
        for id in ProviderId::all() {
            let s = id.as_str();
            let parsed = ProviderId::try_from(s).expect("roundtrip should succeed");
            assert_eq!(*id, parsed);
        }
    }

    #[test]
    fn unknown_provider_error() {
        let err = ProviderId::try_from("doesnotexist").unwrap_err();
        assert!(err.to_string().contains("Unknown provider"));
    }

    #[test]
    fn coordinates_render_as_comma_pair() {
        let query = LocationQuery::Coordinates { lat: 35.69, lon: 139.69 };
        assert_eq!(query.as_query(), "35.69,139.69");
    }

    #[test]
    fn name_renders_verbatim() {
        let query = LocationQuery::Name("Buenos Aires".to_string());
        assert_eq!(query.as_query(), "Buenos Aires");
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(ProviderId::WeatherApi, &cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured for provider"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "KEY".to_string());

        let provider = provider_from_config(ProviderId::WeatherApi, &cfg);
        assert!(provider.is_ok());
    }
}
