use crate::error::{Result, RoomFxError};
use crate::regions::region::AcousticRegion;
use std::collections::BTreeMap;

/// Lightweight, type-safe handle for acoustic regions.
///
/// Returned when adding a region to the world and never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(u64);

impl std::fmt::Display for RegionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RegionId({})", self.0)
    }
}

#[derive(Debug, Clone)]
struct RegionEntry {
    region: AcousticRegion,
    enabled: bool,
}

/// Owns every acoustic region of the scene, enabled or not.
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    regions: BTreeMap<RegionId, RegionEntry>,
    next_id: u64,
}

impl RegionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region and returns its handle. New regions start enabled.
    pub fn insert(&mut self, region: impl Into<AcousticRegion>) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.regions.insert(
            id,
            RegionEntry {
                region: region.into(),
                enabled: true,
            },
        );
        id
    }

    pub fn remove(&mut self, id: RegionId) -> Option<AcousticRegion> {
        self.regions.remove(&id).map(|entry| entry.region)
    }

    pub fn get(&self, id: RegionId) -> Option<&AcousticRegion> {
        self.regions.get(&id).map(|entry| &entry.region)
    }

    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut AcousticRegion> {
        self.regions.get_mut(&id).map(|entry| &mut entry.region)
    }

    pub fn is_enabled(&self, id: RegionId) -> bool {
        self.regions.get(&id).is_some_and(|entry| entry.enabled)
    }

    pub fn set_enabled(&mut self, id: RegionId, enabled: bool) -> Result<()> {
        let entry = self
            .regions
            .get_mut(&id)
            .ok_or(RoomFxError::UnknownRegion(id))?;
        entry.enabled = enabled;
        Ok(())
    }

    /// Handles of enabled regions, in handle order.
    pub fn enabled_ids(&self) -> Vec<RegionId> {
        self.regions
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &AcousticRegion)> {
        self.regions.iter().map(|(&id, entry)| (id, &entry.region))
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
