//! Event types for roomfx

use crate::regions::RegionId;
use crate::scene::ObjectId;

#[derive(Debug, Clone, PartialEq)]
pub enum RoomFxEvent {
    ActiveRegionChanged {
        previous: Option<RegionId>,
        current: RegionId,
    },
    RoomEffectsDisabled {
        previous: RegionId,
    },
    GeometryRebuilt {
        generation: u64,
        identifiers: usize,
        meshes: usize,
        included: usize,
    },
    MeshSkipped {
        object: ObjectId,
        reason: String,
    },
    ProbeBaked {
        region: RegionId,
    },
    ProbeBakeFailed {
        region: RegionId,
        error: String,
    },
}

impl RoomFxEvent {
    pub fn region(&self) -> Option<RegionId> {
        match self {
            Self::ActiveRegionChanged { current, .. } => Some(*current),
            Self::RoomEffectsDisabled { previous } => Some(*previous),
            Self::ProbeBaked { region } | Self::ProbeBakeFailed { region, .. } => Some(*region),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::MeshSkipped { .. } | Self::ProbeBakeFailed { .. }
        )
    }
}
