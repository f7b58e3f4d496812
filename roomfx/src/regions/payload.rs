//! Parameter payloads pushed to the audio engine for the active region.

use crate::math::{Quat, Vec3, amplitude_from_db};
use crate::regions::region::{NUM_RT60_BANDS, ReverbProbe, Room};
use crate::scene::WallMaterials;

/// Room effect parameters computed from a [`Room`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoomPayload {
    pub position: Vec3,
    pub rotation: Quat,
    /// Room size after world scale
    pub dimensions: Vec3,
    pub walls: WallMaterials,
    pub reflection_scalar: f32,
    /// Linear amplitude
    pub reverb_gain: f32,
    pub reverb_brightness: f32,
    pub reverb_time: f32,
}

impl RoomPayload {
    pub fn from_room(room: &Room) -> Self {
        Self {
            position: room.transform.position,
            rotation: room.transform.rotation,
            dimensions: room.world_size(),
            walls: room.walls,
            reflection_scalar: room.modifiers.reflectivity,
            reverb_gain: amplitude_from_db(room.modifiers.gain_db),
            reverb_brightness: room.modifiers.brightness,
            reverb_time: room.modifiers.time,
        }
    }
}

/// Room effect parameters computed from a baked [`ReverbProbe`].
///
/// Early reflections come from the proxy room; late reverb from the baked RT60s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbePayload {
    pub proxy_position: Vec3,
    pub proxy_rotation: Quat,
    pub proxy_dimensions: Vec3,
    pub proxy_walls: WallMaterials,
    /// Baked RT60s scaled by the time modifier
    pub rt60s: [f32; NUM_RT60_BANDS],
    pub reflection_scalar: f32,
    /// Linear amplitude
    pub reverb_gain: f32,
    pub reverb_brightness: f32,
}

impl ProbePayload {
    pub fn from_probe(probe: &ReverbProbe) -> Self {
        let time = probe.modifiers.time;
        Self {
            proxy_position: probe.proxy_room.position,
            proxy_rotation: probe.proxy_room.rotation,
            proxy_dimensions: probe.proxy_room.size,
            proxy_walls: probe.proxy_room.walls,
            rt60s: probe.rt60s.map(|t| t * time),
            reflection_scalar: probe.modifiers.reflectivity,
            reverb_gain: amplitude_from_db(probe.modifiers.gain_db),
            reverb_brightness: probe.modifiers.brightness,
        }
    }
}
