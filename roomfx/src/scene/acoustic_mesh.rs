//! Acoustic geometry derived from one renderable surface or terrain.

use crate::error::{Result, RoomFxError};
use crate::math::{Transform, Vec3};
use crate::scene::material::SurfaceMaterial;
use crate::scene::snapshot::{MeshData, MeshTopology, ObjectId, SceneObject};
use std::collections::BTreeMap;

/// Contiguous run of triangle indices that came from one submesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SubMeshRange {
    submesh: usize,
    /// Offset into the triangle index buffer
    start: usize,
    /// Number of indices (always a multiple of 3)
    count: usize,
}

/// Triangle geometry in world space with one surface material per submesh.
///
/// Built fresh on every geometry rebuild and never carried over to the next one.
/// Non-triangle submeshes are dropped during construction; material assignment only
/// accepts submesh indices that survived.
#[derive(Debug, Clone)]
pub struct AcousticMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
    ranges: Vec<SubMeshRange>,
    materials: BTreeMap<usize, SurfaceMaterial>,
    owner: SceneObject,
    included: bool,
}

impl AcousticMesh {
    /// Builds an acoustic mesh from object-space mesh data.
    ///
    /// Vertices are baked into world space with `transform`.
    ///
    /// # Errors
    ///
    /// - `InvalidMesh` if a triangle submesh has an index count that is not a multiple
    ///   of 3 or references a vertex out of range, or if the mesh has no submeshes.
    /// - `UnsupportedTopology` if no submesh uses triangle topology.
    pub fn from_mesh(owner: &SceneObject, transform: &Transform, mesh: &MeshData) -> Result<Self> {
        if mesh.submeshes.is_empty() {
            return Err(RoomFxError::InvalidMesh(format!(
                "'{}' has no submeshes",
                owner.name
            )));
        }

        let vertex_count = mesh.vertices.len();
        let mut triangles = Vec::new();
        let mut ranges = Vec::with_capacity(mesh.submeshes.len());

        for (submesh_index, submesh) in mesh.submeshes.iter().enumerate() {
            if submesh.topology != MeshTopology::Triangles {
                log::warn!(
                    "Skipping submesh {} of '{}': {:?} topology is not supported",
                    submesh_index,
                    owner.name,
                    submesh.topology
                );
                continue;
            }

            if submesh.indices.len() % 3 != 0 {
                return Err(RoomFxError::InvalidMesh(format!(
                    "submesh {} of '{}' has {} indices, not a multiple of 3",
                    submesh_index,
                    owner.name,
                    submesh.indices.len()
                )));
            }

            if let Some(&bad) = submesh
                .indices
                .iter()
                .find(|&&index| index as usize >= vertex_count)
            {
                return Err(RoomFxError::InvalidMesh(format!(
                    "submesh {} of '{}' references vertex {} but only {} exist",
                    submesh_index, owner.name, bad, vertex_count
                )));
            }

            ranges.push(SubMeshRange {
                submesh: submesh_index,
                start: triangles.len(),
                count: submesh.indices.len(),
            });
            triangles.extend_from_slice(&submesh.indices);
        }

        if ranges.is_empty() {
            return Err(RoomFxError::UnsupportedTopology(format!(
                "'{}' has no triangle submeshes",
                owner.name
            )));
        }

        let vertices = mesh
            .vertices
            .iter()
            .map(|&v| transform.transform_point(v))
            .collect();
        let materials = ranges
            .iter()
            .map(|range| (range.submesh, SurfaceMaterial::default()))
            .collect();

        Ok(Self {
            vertices,
            triangles,
            ranges,
            materials,
            owner: owner.clone(),
            included: false,
        })
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangle_indices(&self) -> &[u32] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn owner(&self) -> &SceneObject {
        &self.owner
    }

    pub fn owner_id(&self) -> ObjectId {
        self.owner.id
    }

    /// Whether the mesh passed inclusion filtering in the last rebuild.
    pub fn is_included(&self) -> bool {
        self.included
    }

    pub(crate) fn set_included(&mut self, included: bool) {
        self.included = included;
    }

    /// Returns true if `submesh` was kept at construction time.
    pub fn has_submesh(&self, submesh: usize) -> bool {
        self.materials.contains_key(&submesh)
    }

    pub fn material(&self, submesh: usize) -> Option<SurfaceMaterial> {
        self.materials.get(&submesh).copied()
    }

    /// Iterates over `(submesh, material)` for every kept submesh.
    pub fn materials(&self) -> impl Iterator<Item = (usize, SurfaceMaterial)> + '_ {
        self.materials.iter().map(|(&submesh, &material)| (submesh, material))
    }

    /// Assigns a material to one submesh. Returns false if the submesh was not kept.
    pub fn set_material(&mut self, submesh: usize, material: SurfaceMaterial) -> bool {
        match self.materials.get_mut(&submesh) {
            Some(slot) => {
                *slot = material;
                true
            }
            None => false,
        }
    }

    /// Assigns one material to every submesh.
    pub fn set_material_for_all(&mut self, material: SurfaceMaterial) {
        for slot in self.materials.values_mut() {
            *slot = material;
        }
    }

    /// Material of every triangle, in triangle order.
    pub fn triangle_materials(&self) -> Vec<SurfaceMaterial> {
        let mut result = Vec::with_capacity(self.triangle_count());
        for range in &self.ranges {
            let material = self.material(range.submesh).unwrap_or_default();
            result.extend(std::iter::repeat_n(material, range.count / 3));
        }
        result
    }
}
