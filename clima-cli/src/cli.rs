use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use clima_core::{
    Config, FavoritesStore, UnitSystem, WeatherStore,
    provider::provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "clima", version, about = "Weather dashboard CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI credentials interactively.
    Configure,

    /// Show current conditions and forecasts for a place name.
    Show {
        /// Place name, e.g. "Tokyo" or "Buenos Aires".
        place: String,

        /// Print the raw snapshot as JSON instead of formatted output.
        #[arg(long)]
        json: bool,
    },

    /// Show weather for an explicit coordinate pair.
    Coords {
        latitude: f64,
        longitude: f64,

        /// Print the raw snapshot as JSON instead of formatted output.
        #[arg(long)]
        json: bool,
    },

    /// Set the display unit preference.
    Units {
        /// "metric" or "imperial".
        units: String,
    },

    /// Manage saved places.
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesCommand {
    /// Save a place.
    Add { name: String },

    /// Remove a saved place.
    Remove { name: String },

    /// List saved places in the order they were added.
    List,

    /// Fetch weather for a saved place.
    Show { name: String },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { place, json } => {
                let store = build_store()?;
                store.fetch_by_name(&place).await;
                finish_fetch(&store, json)
            }
            Command::Coords { latitude, longitude, json } => {
                let store = build_store()?;
                store.fetch_by_coordinates(latitude, longitude).await;
                finish_fetch(&store, json)
            }
            Command::Units { units } => {
                let units = UnitSystem::try_from(units.as_str())?;
                set_units_preference(&Config::default_path()?, units)?;
                println!("Units set to {units}.");
                Ok(())
            }
            Command::Favorites { command } => favorites(command).await,
        }
    }
}

/// Assemble the state core from persisted config and the configured
/// provider.
fn build_store() -> anyhow::Result<WeatherStore> {
    let config_path = Config::default_path()?;
    let config = Config::load_from(&config_path);
    let provider = provider_from_config(config.preferences.provider_id(), &config)?;

    Ok(WeatherStore::new(Arc::from(provider), &config, Some(config_path)))
}

/// Render the published state after a fetch, or fail with its error.
fn finish_fetch(store: &WeatherStore, json: bool) -> anyhow::Result<()> {
    let state = store.state();

    if let Some(error) = &state.error {
        bail!("{error}");
    }

    let Some(weather) = &state.weather else {
        bail!("No weather data was returned");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(weather)?);
    } else {
        render::snapshot(weather, state.units);
    }
    Ok(())
}

/// Persist the unit preference. A pure preference write: needs no provider
/// and works before any API key is configured.
fn set_units_preference(config_path: &std::path::Path, units: UnitSystem) -> anyhow::Result<()> {
    let mut config = Config::load_from(config_path);
    config.preferences.units = units;
    config.save_to(config_path)
}

fn configure() -> anyhow::Result<()> {
    let config_path = Config::default_path()?;
    let mut config = Config::load_from(&config_path);

    let api_key = inquire::Password::new("WeatherAPI key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.upsert_provider_api_key(config.preferences.provider_id(), api_key.trim().to_string());
    config.save_to(&config_path)?;

    println!("Saved credentials to {}.", config_path.display());
    Ok(())
}

async fn favorites(command: FavoritesCommand) -> anyhow::Result<()> {
    match command {
        FavoritesCommand::Add { name } => {
            let mut store = FavoritesStore::load(Config::favorites_path()?);
            store.add(&name)?;
            println!("Saved favorites: {}", store.list().len());
        }
        FavoritesCommand::Remove { name } => {
            let mut store = FavoritesStore::load(Config::favorites_path()?);
            store.remove(&name)?;
            println!("Saved favorites: {}", store.list().len());
        }
        FavoritesCommand::List => {
            let store = FavoritesStore::load(Config::favorites_path()?);
            if store.list().is_empty() {
                println!("No favorites saved yet.");
            }
            for place in store.list() {
                match &place.country {
                    Some(country) => println!("{}, {country}", place.name),
                    None => println!("{}", place.name),
                }
            }
        }
        FavoritesCommand::Show { name } => {
            // Selecting a favorite is just a fetch-by-name into the core.
            let store = build_store()?;
            store.fetch_by_name(&name).await;
            finish_fetch(&store, false)?;
        }
    }

    Ok(())
}
