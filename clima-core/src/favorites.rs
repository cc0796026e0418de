//! Persisted list of saved places.
//!
//! Favorites are stored as an ordered JSON array so insertion order survives
//! restarts. All mutation goes through [`FavoritesStore`], which re-persists
//! after every change.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::warn;

/// A user-saved place. Names are unique case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoritePlace {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug)]
pub struct FavoritesStore {
    path: PathBuf,
    places: Vec<FavoritePlace>,
}

impl FavoritesStore {
    /// Open the store backed by `path`. A missing file starts empty; a
    /// corrupt file is discarded and removed rather than surfaced as an
    /// error.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let places = if path.exists() {
            match fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|s| serde_json::from_str(&s).map_err(anyhow::Error::from))
            {
                Ok(places) => places,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt favorites, starting empty");
                    let _ = fs::remove_file(&path);
                    Vec::new()
                }
            }
        } else {
            Vec::new()
        };

        Self { path, places }
    }

    /// Append a place unless the trimmed name is empty or already present
    /// case-insensitively. A rejected add is a silent no-op.
    pub fn add(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() || self.contains(name) {
            return Ok(());
        }

        self.places.push(FavoritePlace { name: name.to_string(), country: None });
        self.persist()
    }

    /// Remove the entry whose name matches exactly. Persists even when the
    /// result is an empty list.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let before = self.places.len();
        self.places.retain(|place| place.name != name);

        if self.places.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Read-only view in insertion order.
    pub fn list(&self) -> &[FavoritePlace] {
        &self.places
    }

    fn contains(&self, name: &str) -> bool {
        self.places.iter().any(|place| place.name.eq_ignore_ascii_case(name))
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create favorites directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(&self.places).context("Failed to serialize favorites")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write favorites file: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FavoritesStore {
        FavoritesStore::load(dir.path().join("favorites.json"))
    }

    #[test]
    fn starts_empty_without_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(store_in(&dir).list().is_empty());
    }

    #[test]
    fn add_trims_and_appends_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add("  Tokyo  ").unwrap();
        store.add("Paris").unwrap();

        let names: Vec<&str> = store.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Tokyo", "Paris"]);
    }

    #[test]
    fn add_rejects_case_insensitive_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add("Paris").unwrap();
        store.add("paris").unwrap();
        store.add("PARIS").unwrap();

        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0].name, "Paris");
    }

    #[test]
    fn add_empty_name_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add("").unwrap();
        store.add("   ").unwrap();

        assert!(store.list().is_empty());
        assert!(!dir.path().join("favorites.json").exists());
    }

    #[test]
    fn remove_is_exact_match_and_persists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);

        store.add("Paris").unwrap();
        store.remove("paris").unwrap();
        assert_eq!(store.list().len(), 1);

        store.remove("Paris").unwrap();
        assert!(store.list().is_empty());

        // persisted empty list survives a reload
        assert!(store_in(&dir).list().is_empty());
        assert!(dir.path().join("favorites.json").exists());
    }

    #[test]
    fn persistence_roundtrip_across_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = store_in(&dir);
        store.add("Tokyo").unwrap();
        store.add("Lima").unwrap();
        drop(store);

        let reloaded = store_in(&dir);
        let names: Vec<&str> = reloaded.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Tokyo", "Lima"]);
    }

    #[test]
    fn corrupt_file_is_cleared_and_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.json");
        fs::write(&path, "][ not json").unwrap();

        let store = FavoritesStore::load(&path);
        assert!(store.list().is_empty());
        assert!(!path.exists());
    }
}
