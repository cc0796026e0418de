//! Core library for the `clima` weather dashboard.
//!
//! This crate defines:
//! - The normalized weather data model and its provider-facing client
//! - The weather state core (fetch lifecycle, unit/provider preferences)
//! - The favorites store
//! - The condition catalog and display formatting helpers
//!
//! It is used by `clima-cli`, but can also be reused by other frontends.

pub mod conditions;
pub mod config;
pub mod favorites;
pub mod format;
pub mod model;
pub mod provider;
pub mod store;

pub use config::{Config, Preferences, ProviderConfig};
pub use favorites::{FavoritePlace, FavoritesStore};
pub use model::{UnitSystem, WeatherSnapshot};
pub use provider::{LocationQuery, ProviderId, WeatherProvider};
pub use store::{WeatherState, WeatherStore};
