//! Scene snapshot inputs.
//!
//! A snapshot is produced by whatever scans the host scene (renderers, terrains) and is
//! handed to the material mapper on every geometry change. Nothing here is retained
//! across rebuilds except what the mapper copies into acoustic meshes.

use crate::math::{Transform, Vec3};

/// Opaque handle of a scene object owning geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.0)
    }
}

/// Scene object properties relevant to inclusion filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    /// Layer index (0..32)
    pub layer: u8,
    pub is_static: bool,
    /// Whether the object is active in the scene hierarchy
    pub active: bool,
}

impl SceneObject {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ObjectId(id),
            name: name.into(),
            layer: 0,
            is_static: true,
            active: true,
        }
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

/// A shared visual material, identified by a stable surface identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisualMaterial {
    pub id: String,
    pub name: String,
}

impl VisualMaterial {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Shared terrain data, identified by a stable surface identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TerrainData {
    pub id: String,
    pub name: String,
}

impl TerrainData {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Primitive topology of a submesh. Only triangles are usable for acoustics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshTopology {
    Triangles,
    Quads,
    Lines,
    LineStrip,
    Points,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubMesh {
    pub topology: MeshTopology,
    pub indices: Vec<u32>,
}

impl SubMesh {
    pub fn triangles(indices: Vec<u32>) -> Self {
        Self {
            topology: MeshTopology::Triangles,
            indices,
        }
    }
}

/// Raw mesh data in object space.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<Vec3>,
    pub submeshes: Vec<SubMesh>,
}

/// One renderable object: a mesh plus one shared visual material per submesh.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableSurface {
    pub object: SceneObject,
    pub transform: Transform,
    pub mesh: MeshData,
    pub materials: Vec<VisualMaterial>,
}

/// One terrain: a generated mesh plus the shared terrain data it was generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainSurface {
    pub object: SceneObject,
    pub transform: Transform,
    pub mesh: MeshData,
    pub terrain_data: TerrainData,
}

/// Everything the material mapper reads from the scene in one rebuild.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneSnapshot {
    pub renderables: Vec<RenderableSurface>,
    pub terrains: Vec<TerrainSurface>,
}

impl SceneSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_renderable(mut self, surface: RenderableSurface) -> Self {
        self.renderables.push(surface);
        self
    }

    pub fn with_terrain(mut self, surface: TerrainSurface) -> Self {
        self.terrains.push(surface);
        self
    }
}

/// Axis-aligned unit cube centred on the origin, one triangle submesh per face pair.
///
/// Handy for tests and demos: faces are grouped into `submesh_count` submeshes
/// (clamped to 1..=6), with leftover faces in the last one.
pub fn unit_cube(submesh_count: usize) -> MeshData {
    let vertices = vec![
        Vec3::new(-0.5, -0.5, -0.5),
        Vec3::new(0.5, -0.5, -0.5),
        Vec3::new(0.5, 0.5, -0.5),
        Vec3::new(-0.5, 0.5, -0.5),
        Vec3::new(-0.5, -0.5, 0.5),
        Vec3::new(0.5, -0.5, 0.5),
        Vec3::new(0.5, 0.5, 0.5),
        Vec3::new(-0.5, 0.5, 0.5),
    ];
    let faces: [[u32; 6]; 6] = [
        [0, 2, 1, 0, 3, 2],
        [4, 5, 6, 4, 6, 7],
        [0, 1, 5, 0, 5, 4],
        [3, 7, 6, 3, 6, 2],
        [0, 4, 7, 0, 7, 3],
        [1, 2, 6, 1, 6, 5],
    ];

    let count = submesh_count.clamp(1, 6);
    let mut submeshes = vec![SubMesh::triangles(Vec::new()); count];
    for (face_index, face) in faces.iter().enumerate() {
        let target = face_index.min(count - 1);
        submeshes[target].indices.extend_from_slice(face);
    }

    MeshData {
        vertices,
        submeshes,
    }
}
