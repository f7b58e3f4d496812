//! Persistent surface identifier to material mapping.

use crate::error::{Result, RoomFxError};
use crate::scene::SurfaceMaterial;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// On-disk form of the catalog: two index-aligned sequences.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedCatalog {
    pub identifiers: Vec<String>,
    pub materials: Vec<SurfaceMaterial>,
}

/// Mapping from surface identifier to acoustic surface material.
///
/// Entries are only added or overwritten; the catalog shrinks only through [`clear`].
///
/// [`clear`]: SurfaceMaterialCatalog::clear
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceMaterialCatalog {
    entries: HashMap<String, SurfaceMaterial>,
}

impl SurfaceMaterialCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, identifier: &str) -> Option<SurfaceMaterial> {
        self.entries.get(identifier).copied()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Sets the material of `identifier`, returning the previous one.
    pub fn set(
        &mut self,
        identifier: impl Into<String>,
        material: SurfaceMaterial,
    ) -> Option<SurfaceMaterial> {
        self.entries.insert(identifier.into(), material)
    }

    /// Inserts the default material for `identifier` if it has no entry yet.
    /// Returns true if an entry was added.
    pub fn insert_default_if_absent(&mut self, identifier: &str) -> bool {
        if self.entries.contains_key(identifier) {
            return false;
        }
        self.entries
            .insert(identifier.to_string(), SurfaceMaterial::default());
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, SurfaceMaterial)> {
        self.entries.iter().map(|(id, &material)| (id.as_str(), material))
    }

    /// Converts to the persisted form, identifiers sorted.
    pub fn to_persisted(&self) -> PersistedCatalog {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        let (identifiers, materials) = pairs
            .into_iter()
            .map(|(id, material)| (id.to_string(), material))
            .unzip();
        PersistedCatalog {
            identifiers,
            materials,
        }
    }

    /// Rebuilds a catalog from its persisted form.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCatalog` if the sequences differ in length or an identifier repeats.
    pub fn from_persisted(persisted: &PersistedCatalog) -> Result<Self> {
        if persisted.identifiers.len() != persisted.materials.len() {
            return Err(RoomFxError::InvalidCatalog(format!(
                "{} identifiers but {} materials",
                persisted.identifiers.len(),
                persisted.materials.len()
            )));
        }

        let mut seen = HashSet::with_capacity(persisted.identifiers.len());
        for id in &persisted.identifiers {
            if !seen.insert(id.as_str()) {
                return Err(RoomFxError::InvalidCatalog(format!(
                    "duplicate identifier '{}'",
                    id
                )));
            }
        }

        let entries = persisted
            .identifiers
            .iter()
            .cloned()
            .zip(persisted.materials.iter().copied())
            .collect();
        Ok(Self { entries })
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.to_persisted())?;
        std::fs::write(&path, json)?;
        log::info!(
            "Saved {} surface material entries to {:?}",
            self.len(),
            path.as_ref()
        );
        Ok(())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let persisted: PersistedCatalog = serde_json::from_str(&content)?;
        let catalog = Self::from_persisted(&persisted)?;
        log::info!(
            "Loaded {} surface material entries from {:?}",
            catalog.len(),
            path.as_ref()
        );
        Ok(catalog)
    }
}
