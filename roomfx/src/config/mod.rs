//! Configuration for roomfx

mod world_desc;

pub use world_desc::{LayerMask, RoomFxDesc};
