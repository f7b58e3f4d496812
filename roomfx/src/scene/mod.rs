//! Scene-side types: surface materials, snapshot inputs, acoustic meshes and occlusion.
//!
//! # Overview
//!
//! 1. **SceneSnapshot** - Renderable and terrain surfaces scanned from the host scene
//! 2. **AcousticMesh** - World-space triangle geometry with one [`SurfaceMaterial`] per submesh
//! 3. **OcclusionQuery** / **RayTracer** - Visibility checks used by reverb probes
//!
//! # Example
//!
//! ```
//! use roomfx::math::Transform;
//! use roomfx::scene::{AcousticMesh, SceneObject, SurfaceMaterial, unit_cube};
//!
//! let object = SceneObject::new(1, "crate");
//! let mut mesh = AcousticMesh::from_mesh(&object, &Transform::IDENTITY, &unit_cube(1))?;
//! mesh.set_material_for_all(SurfaceMaterial::PlywoodPanel);
//! assert_eq!(mesh.triangle_count(), 12);
//! # Ok::<(), roomfx::RoomFxError>(())
//! ```

pub mod acoustic_mesh;
pub mod material;
pub mod ray_tracer;
pub mod snapshot;

pub use acoustic_mesh::AcousticMesh;
pub use material::{SurfaceMaterial, WallMaterials};
pub use ray_tracer::{NoOcclusion, OcclusionQuery, RayHit, RayTracedOcclusion, RayTracer};
pub use snapshot::{
    MeshData, MeshTopology, ObjectId, RenderableSurface, SceneObject, SceneSnapshot, SubMesh,
    TerrainData, TerrainSurface, VisualMaterial, unit_cube,
};
