//! # roomfx
//!
//! Room effects for spatial audio: decides which acoustic region the listener is in and
//! aggregates the scene geometry that reverb is baked from.
//!
//! roomfx provides a world-driven API where the main thread owns the acoustic regions
//! and the material mapping, and pushes the active region's reverb parameters to an
//! audio engine running elsewhere.
//!
//! ## Quick Start
//!
//! ```no_run
//! use roomfx::*;
//!
//! // Forward room effect parameters to the audio thread
//! let (sink, commands) = CommandSink::channel();
//! let mut world = RoomFxWorld::new(RoomFxDesc::default(), sink)?;
//!
//! // A 6 x 3 x 8 metre room at the origin
//! let room = world.add_room(Room::new(Transform::IDENTITY, Vec3::new(6.0, 3.0, 8.0)));
//!
//! // Update the listener as your camera/player moves, then tick
//! world.set_listener_pose(Pose::from_position(Vec3::new(1.0, 1.5, 0.0)));
//! world.update(&scene::NoOcclusion);
//! assert_eq!(world.active_region(), Some(room));
//!
//! // On the audio thread
//! for command in commands.try_iter() {
//!     println!("{:?}", command);
//! }
//! # Ok::<(), RoomFxError>(())
//! ```
//!
//! ## Key Components
//!
//! - **[`RoomFxWorld`]**: Owns regions, listener and material mapping on the main thread
//! - **[`RegionResolver`]**: Picks the most recently entered region containing the listener
//! - **[`MaterialMapper`]**: Maps surface identifiers to materials and builds acoustic meshes
//! - **[`RoomEffectsSink`]**: Receives the active region's parameters, see [`CommandSink`]
//! - **[`ReverbComputer`]**: Trait for baking reverb probes from the included geometry
//! - **[`RayTracer`]**: Trait for implementing ray tracing for probe visibility
//! - **[`RoomFxEvent`]**: Events queued by the world (region changes, rebuilds, bakes)

pub mod bake;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod mapping;
pub mod math;
pub mod regions;
pub mod scene;
pub mod world;

pub use bake::{BakeReport, BakeRequest, ReverbBakeResult, ReverbComputer};
pub use config::{LayerMask, RoomFxDesc};
pub use engine::{CommandSink, NullSink, RoomEffectsSink, RoomFxCommand};
pub use error::{Result, RoomFxError};
pub use events::RoomFxEvent;
pub use mapping::{InclusionFilter, MaterialMapper, RebuildSummary, SurfaceMaterialCatalog};
pub use math::{Pose, Quat, Transform, Vec3};
pub use regions::{
    AcousticRegion, ProbeShape, RegionId, RegionResolver, Resolution, ReverbProbe, Room,
};
pub use scene::{AcousticMesh, OcclusionQuery, RayTracer, SceneSnapshot, SurfaceMaterial};
pub use world::{ListenerQuery, RoomFxListener, RoomFxWorld};
