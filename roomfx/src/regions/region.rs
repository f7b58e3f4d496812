//! Acoustic regions: designer-authored rooms and baked reverb probes.

use crate::math::{Quat, Transform, Vec3};
use crate::scene::WallMaterials;

/// Number of frequency bands of baked RT60 values.
pub const NUM_RT60_BANDS: usize = 9;

/// Reverb adjustments shared by rooms and probes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbModifiers {
    /// Reverb gain in decibels
    pub gain_db: f32,
    /// Balance of low and high frequency decay, `-1.0..=1.0`
    pub brightness: f32,
    /// Multiplier applied to decay times
    pub time: f32,
    /// Multiplier applied to early reflection strength
    pub reflectivity: f32,
}

impl Default for ReverbModifiers {
    fn default() -> Self {
        Self {
            gain_db: 0.0,
            brightness: 0.0,
            time: 1.0,
            reflectivity: 1.0,
        }
    }
}

/// Shoebox room, axis-aligned in its own frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub transform: Transform,
    /// Authored size before world scale
    pub size: Vec3,
    pub walls: WallMaterials,
    pub modifiers: ReverbModifiers,
}

impl Room {
    pub fn new(transform: Transform, size: Vec3) -> Self {
        Self {
            transform,
            size,
            walls: WallMaterials::default(),
            modifiers: ReverbModifiers::default(),
        }
    }

    pub fn with_walls(mut self, walls: WallMaterials) -> Self {
        self.walls = walls;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ReverbModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Size after applying the world scale.
    pub fn world_size(&self) -> Vec3 {
        self.size * self.transform.lossy_scale
    }
}

/// Region in which a reverb probe's baked parameters apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeShape {
    Sphere { radius: f32 },
    Box { size: Vec3 },
}

impl Default for ProbeShape {
    fn default() -> Self {
        Self::Sphere { radius: 1.0 }
    }
}

/// Room-shaped approximation of the geometry around a probe, written by baking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProxyRoom {
    pub position: Vec3,
    pub rotation: Quat,
    pub size: Vec3,
    pub walls: WallMaterials,
}

impl Default for ProxyRoom {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            size: Vec3::ZERO,
            walls: WallMaterials::default(),
        }
    }
}

/// Sample point with precomputed reverb and a region where it applies.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverbProbe {
    pub transform: Transform,
    pub shape: ProbeShape,
    /// Only apply while the probe position is visible from the listener
    pub only_apply_when_visible: bool,
    /// Baked decay times per band, in seconds
    pub rt60s: [f32; NUM_RT60_BANDS],
    pub proxy_room: ProxyRoom,
    pub modifiers: ReverbModifiers,
}

impl ReverbProbe {
    pub fn new(transform: Transform, shape: ProbeShape) -> Self {
        Self {
            transform,
            shape,
            only_apply_when_visible: false,
            rt60s: [0.0; NUM_RT60_BANDS],
            proxy_room: ProxyRoom::default(),
            modifiers: ReverbModifiers::default(),
        }
    }

    pub fn only_apply_when_visible(mut self, enabled: bool) -> Self {
        self.only_apply_when_visible = enabled;
        self
    }

    pub fn with_modifiers(mut self, modifiers: ReverbModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Application region after world scale. Spheres take the largest scale component
    /// so they stay spherical under non-uniform scale.
    pub fn world_shape(&self) -> ProbeShape {
        match self.shape {
            ProbeShape::Sphere { radius } => ProbeShape::Sphere {
                radius: radius * self.transform.max_scale(),
            },
            ProbeShape::Box { size } => ProbeShape::Box {
                size: size * self.transform.lossy_scale,
            },
        }
    }

    /// Returns true once baking has produced decay times.
    pub fn is_baked(&self) -> bool {
        self.rt60s.iter().any(|&t| t > 0.0)
    }
}

/// Either kind of acoustic region.
#[derive(Debug, Clone, PartialEq)]
pub enum AcousticRegion {
    Room(Room),
    ReverbProbe(ReverbProbe),
}

impl AcousticRegion {
    pub fn transform(&self) -> &Transform {
        match self {
            Self::Room(room) => &room.transform,
            Self::ReverbProbe(probe) => &probe.transform,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform().position
    }

    pub fn as_reverb_probe(&self) -> Option<&ReverbProbe> {
        match self {
            Self::ReverbProbe(probe) => Some(probe),
            Self::Room(_) => None,
        }
    }
}

impl From<Room> for AcousticRegion {
    fn from(room: Room) -> Self {
        Self::Room(room)
    }
}

impl From<ReverbProbe> for AcousticRegion {
    fn from(probe: ReverbProbe) -> Self {
        Self::ReverbProbe(probe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_world_size() {
        let room = Room::new(
            Transform::IDENTITY.with_scale(Vec3::new(2.0, 1.0, 0.5)),
            Vec3::splat(4.0),
        );
        assert_eq!(room.world_size(), Vec3::new(8.0, 4.0, 2.0));
    }

    #[test]
    fn test_probe_sphere_uses_largest_scale() {
        let probe = ReverbProbe::new(
            Transform::IDENTITY.with_scale(Vec3::new(1.0, 3.0, 2.0)),
            ProbeShape::Sphere { radius: 2.0 },
        );
        assert_eq!(probe.world_shape(), ProbeShape::Sphere { radius: 6.0 });
        assert!(!probe.is_baked());
    }

    #[test]
    fn test_probe_box_scales_per_axis() {
        let probe = ReverbProbe::new(
            Transform::IDENTITY.with_scale(Vec3::new(2.0, 1.0, 0.5)),
            ProbeShape::Box {
                size: Vec3::new(1.0, 2.0, 4.0),
            },
        );
        assert_eq!(
            probe.world_shape(),
            ProbeShape::Box {
                size: Vec3::new(2.0, 2.0, 2.0)
            }
        );
    }
}
