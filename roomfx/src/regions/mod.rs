//! Acoustic regions and active-region resolution.
//!
//! Rooms and reverb probes live in a [`RegionSet`]. Each update, the
//! [`RegionResolver`] tests the listener against every enabled region and pushes the
//! parameters of the most recently entered one to the audio engine.

pub mod payload;
pub mod region;
pub mod resolver;
pub mod set;

pub use payload::{ProbePayload, RoomPayload};
pub use region::{
    AcousticRegion, NUM_RT60_BANDS, ProbeShape, ProxyRoom, ReverbModifiers, ReverbProbe, Room,
};
pub use resolver::{RegionResolver, Resolution};
pub use set::{RegionId, RegionSet};
