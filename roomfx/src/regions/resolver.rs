//! Active-region arbitration.
//!
//! The resolver keeps enabled regions that contain the listener in the order they
//! started containing it. The last one wins. Nested or overlapping regions therefore
//! resolve to whichever the listener entered most recently, without any priority field.

use crate::engine::RoomEffectsSink;
use crate::math::{Aabb, Vec3};
use crate::regions::payload::{ProbePayload, RoomPayload};
use crate::regions::region::{AcousticRegion, ProbeShape, ReverbProbe, Room};
use crate::regions::set::{RegionId, RegionSet};
use crate::scene::OcclusionQuery;

/// Result of one resolution pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Disabled,
    Room(RegionId),
    ReverbProbe(RegionId),
}

impl Resolution {
    pub fn region(&self) -> Option<RegionId> {
        match self {
            Self::Room(id) | Self::ReverbProbe(id) => Some(*id),
            Self::Disabled => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegionResolver {
    candidates: Vec<RegionId>,
    bounds: Aabb,
}

impl RegionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates in activation order; the last one is active.
    pub fn candidates(&self) -> &[RegionId] {
        &self.candidates
    }

    pub fn active(&self) -> Option<RegionId> {
        self.candidates.last().copied()
    }

    pub fn is_candidate(&self, id: RegionId) -> bool {
        self.candidates.contains(&id)
    }

    /// Records whether `id` currently contains the listener, then resolves.
    ///
    /// Appends `id` when it becomes contained and drops it when it stops; an already
    /// listed region keeps its place.
    pub fn set_candidate_active(
        &mut self,
        id: RegionId,
        is_contained: bool,
        regions: &RegionSet,
        sink: &mut dyn RoomEffectsSink,
    ) -> Resolution {
        let position = self.candidates.iter().position(|&c| c == id);
        match (is_contained, position) {
            (true, None) => self.candidates.push(id),
            (false, Some(index)) => {
                self.candidates.remove(index);
            }
            _ => {}
        }
        self.resolve(regions, sink)
    }

    /// Drops `id` from the candidates unconditionally, then resolves.
    pub fn remove_candidate(
        &mut self,
        id: RegionId,
        regions: &RegionSet,
        sink: &mut dyn RoomEffectsSink,
    ) -> Resolution {
        self.candidates.retain(|&c| c != id);
        self.resolve(regions, sink)
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
    }

    /// Pushes the last candidate's parameters to `sink`, or disables room effects if
    /// there is none.
    pub fn resolve(&mut self, regions: &RegionSet, sink: &mut dyn RoomEffectsSink) -> Resolution {
        while let Some(&id) = self.candidates.last() {
            match regions.get(id) {
                Some(AcousticRegion::Room(room)) => {
                    sink.apply_room_parameters(id, &RoomPayload::from_room(room));
                    return Resolution::Room(id);
                }
                Some(AcousticRegion::ReverbProbe(probe)) => {
                    sink.apply_reverb_probe_parameters(id, &ProbePayload::from_probe(probe));
                    return Resolution::ReverbProbe(id);
                }
                None => {
                    log::warn!("Dropping candidate {} which is no longer registered", id);
                    self.candidates.pop();
                }
            }
        }
        sink.disable_room_effects();
        Resolution::Disabled
    }

    /// Containment test dispatching on the region kind.
    pub fn is_listener_inside(
        &mut self,
        region: &AcousticRegion,
        listener: Option<Vec3>,
        occlusion: &dyn OcclusionQuery,
    ) -> bool {
        match region {
            AcousticRegion::Room(room) => self.is_listener_inside_room(room, listener),
            AcousticRegion::ReverbProbe(probe) => {
                self.is_listener_inside_probe(probe, listener, occlusion)
            }
        }
    }

    /// Tests the listener against the room box in the room's rotated, unscaled frame.
    pub fn is_listener_inside_room(&mut self, room: &Room, listener: Option<Vec3>) -> bool {
        let Some(listener) = listener else {
            return false;
        };
        let local = room.transform.inverse_transform_unscaled(listener);
        self.bounds.set_center_size(Vec3::ZERO, room.world_size());
        self.bounds.contains(local)
    }

    /// Tests the listener against the probe's application region and, for probes that
    /// only apply when visible, requires the probe position to be unoccluded.
    pub fn is_listener_inside_probe(
        &mut self,
        probe: &ReverbProbe,
        listener: Option<Vec3>,
        occlusion: &dyn OcclusionQuery,
    ) -> bool {
        let Some(listener) = listener else {
            return false;
        };

        let inside_shape = match probe.world_shape() {
            ProbeShape::Sphere { radius } => {
                listener.distance(probe.transform.position) <= radius
            }
            ProbeShape::Box { size } => {
                let local = probe.transform.inverse_transform_unscaled(listener);
                self.bounds.set_center_size(Vec3::ZERO, size);
                self.bounds.contains(local)
            }
        };

        if !inside_shape {
            return false;
        }
        if !probe.only_apply_when_visible {
            return true;
        }
        occlusion.compute_occlusion_intensity(probe.transform.position) <= 0.0
    }
}
