//! Transient surface identifier to geometry index.
//!
//! Acoustic meshes live in a per-generation arena and entries refer to them by
//! [`MeshId`]. An index is built in full and then swapped in by the mapper; it is never
//! patched across rebuilds.

use crate::mapping::catalog::SurfaceMaterialCatalog;
use crate::scene::{AcousticMesh, TerrainData, VisualMaterial};
use std::collections::{BTreeMap, HashSet};

/// Position of a mesh in the arena of one index generation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(usize);

impl MeshId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// What one surface identifier aggregates.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEntry {
    /// Shared visual material: one `(mesh, submesh)` pair per submesh using it.
    Visual {
        material: VisualMaterial,
        submeshes: Vec<(MeshId, usize)>,
    },
    /// Shared terrain data: the material covers each mesh as a whole.
    Terrain {
        terrain: TerrainData,
        meshes: Vec<MeshId>,
    },
}

impl SurfaceEntry {
    pub fn is_terrain(&self) -> bool {
        matches!(self, Self::Terrain { .. })
    }

    /// Distinct meshes registered under this entry, in first-registration order.
    pub fn mesh_ids(&self) -> Vec<MeshId> {
        let mut ids: Vec<MeshId> = match self {
            Self::Visual { submeshes, .. } => submeshes.iter().map(|(id, _)| *id).collect(),
            Self::Terrain { meshes, .. } => meshes.clone(),
        };
        let mut seen = HashSet::new();
        ids.retain(|id| seen.insert(*id));
        ids
    }
}

/// Returned when an identifier is already registered as the other surface kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindConflict;

#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    generation: u64,
    meshes: Vec<AcousticMesh>,
    entries: BTreeMap<String, SurfaceEntry>,
}

impl GeometryIndex {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            meshes: Vec::new(),
            entries: BTreeMap::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entry(&self, identifier: &str) -> Option<&SurfaceEntry> {
        self.entries.get(identifier)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&AcousticMesh> {
        self.meshes.get(id.0)
    }

    /// All meshes in build order: renderables first, then terrains.
    pub fn meshes(&self) -> &[AcousticMesh] {
        &self.meshes
    }

    pub(crate) fn meshes_mut(&mut self) -> &mut [AcousticMesh] {
        &mut self.meshes
    }

    /// Representative visual material of `identifier`, if it is a visual entry.
    pub fn visual_material(&self, identifier: &str) -> Option<&VisualMaterial> {
        match self.entries.get(identifier)? {
            SurfaceEntry::Visual { material, .. } => Some(material),
            SurfaceEntry::Terrain { .. } => None,
        }
    }

    /// Representative terrain data of `identifier`, if it is a terrain entry.
    pub fn terrain_data(&self, identifier: &str) -> Option<&TerrainData> {
        match self.entries.get(identifier)? {
            SurfaceEntry::Terrain { terrain, .. } => Some(terrain),
            SurfaceEntry::Visual { .. } => None,
        }
    }

    /// Meshes registered under `identifier`, each once.
    pub fn meshes_for(&self, identifier: &str) -> Vec<&AcousticMesh> {
        self.entries
            .get(identifier)
            .map(|entry| {
                entry
                    .mesh_ids()
                    .into_iter()
                    .filter_map(|id| self.mesh(id))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn is_kind(&self, identifier: &str, terrain: bool) -> bool {
        self.entries
            .get(identifier)
            .is_some_and(|entry| entry.is_terrain() == terrain)
    }

    /// Adds a renderable's mesh and registers each `(submesh, material)` slot.
    ///
    /// Nothing is added if any slot's identifier is already a terrain entry.
    pub(crate) fn add_visual_mesh(
        &mut self,
        mesh: AcousticMesh,
        slots: &[(usize, &VisualMaterial)],
    ) -> Result<MeshId, KindConflict> {
        if slots.iter().any(|(_, material)| self.is_kind(&material.id, true)) {
            return Err(KindConflict);
        }

        let id = self.push_mesh(mesh);
        for &(submesh, material) in slots {
            let entry = self
                .entries
                .entry(material.id.clone())
                .or_insert_with(|| SurfaceEntry::Visual {
                    material: material.clone(),
                    submeshes: Vec::new(),
                });
            if let SurfaceEntry::Visual { submeshes, .. } = entry {
                submeshes.push((id, submesh));
            }
        }
        Ok(id)
    }

    /// Adds a terrain mesh under its terrain-data identifier.
    ///
    /// Nothing is added if the identifier is already a visual entry.
    pub(crate) fn add_terrain_mesh(
        &mut self,
        terrain: &TerrainData,
        mesh: AcousticMesh,
    ) -> Result<MeshId, KindConflict> {
        if self.is_kind(&terrain.id, false) {
            return Err(KindConflict);
        }

        let id = self.push_mesh(mesh);
        let entry = self
            .entries
            .entry(terrain.id.clone())
            .or_insert_with(|| SurfaceEntry::Terrain {
                terrain: terrain.clone(),
                meshes: Vec::new(),
            });
        if let SurfaceEntry::Terrain { meshes, .. } = entry {
            meshes.push(id);
        }
        Ok(id)
    }

    fn push_mesh(&mut self, mesh: AcousticMesh) -> MeshId {
        self.meshes.push(mesh);
        MeshId(self.meshes.len() - 1)
    }

    /// Pushes the catalog material of every identifier onto its registered geometry.
    ///
    /// Identifiers missing from the catalog get the default entry first.
    pub(crate) fn apply_catalog(&mut self, catalog: &mut SurfaceMaterialCatalog) {
        for (identifier, entry) in &self.entries {
            if catalog.insert_default_if_absent(identifier) {
                log::warn!(
                    "Surface '{}' had no catalog entry when applying materials, inserted default",
                    identifier
                );
            }
            let material = catalog.get(identifier).unwrap_or_default();

            match entry {
                SurfaceEntry::Visual { submeshes, .. } => {
                    for &(mesh_id, submesh) in submeshes {
                        let applied = self
                            .meshes
                            .get_mut(mesh_id.0)
                            .map(|mesh| mesh.set_material(submesh, material))
                            .unwrap_or(false);
                        if !applied {
                            log::warn!(
                                "Data integrity: surface '{}' lists missing submesh {} of mesh {}",
                                identifier,
                                submesh,
                                mesh_id.0
                            );
                        }
                    }
                }
                SurfaceEntry::Terrain { meshes, .. } => {
                    for &mesh_id in meshes {
                        match self.meshes.get_mut(mesh_id.0) {
                            Some(mesh) => mesh.set_material_for_all(material),
                            None => log::warn!(
                                "Data integrity: terrain '{}' lists missing mesh {}",
                                identifier,
                                mesh_id.0
                            ),
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;
    use crate::scene::{SceneObject, SurfaceMaterial, unit_cube};

    fn cube_mesh(id: u64, submeshes: usize) -> AcousticMesh {
        AcousticMesh::from_mesh(
            &SceneObject::new(id, format!("cube{}", id)),
            &Transform::IDENTITY,
            &unit_cube(submeshes),
        )
        .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let mut index = GeometryIndex::new(3);
        let brick = VisualMaterial::new("brick-guid", "Brick");
        let ground = TerrainData::new("ground-guid", "Ground");

        let a = index
            .add_visual_mesh(cube_mesh(1, 2), &[(0, &brick), (1, &brick)])
            .unwrap();
        index.add_terrain_mesh(&ground, cube_mesh(2, 1)).unwrap();

        assert_eq!(index.generation(), 3);
        assert_eq!(index.len(), 2);
        assert_eq!(index.mesh_count(), 2);
        assert_eq!(index.visual_material("brick-guid"), Some(&brick));
        assert_eq!(index.terrain_data("ground-guid"), Some(&ground));
        assert_eq!(index.visual_material("ground-guid"), None);
        assert_eq!(index.terrain_data("missing"), None);
        assert_eq!(index.meshes_for("brick-guid").len(), 1);
        assert_eq!(
            index.entry("brick-guid").map(SurfaceEntry::mesh_ids),
            Some(vec![a])
        );
    }

    #[test]
    fn test_mesh_ids_are_distinct_when_interleaved() {
        let mut index = GeometryIndex::new(0);
        let brick = VisualMaterial::new("brick", "Brick");
        let glass = VisualMaterial::new("glass", "Glass");
        let a = index
            .add_visual_mesh(cube_mesh(1, 3), &[(0, &brick), (1, &glass), (2, &brick)])
            .unwrap();
        let b = index.add_visual_mesh(cube_mesh(2, 1), &[(0, &brick)]).unwrap();

        // Pairs for "brick" are (a, 0), (a, 2), (b, 0); a appears once.
        let entry = index.entry("brick").unwrap();
        assert_eq!(entry.mesh_ids(), vec![a, b]);
        assert_eq!(index.meshes_for("brick").len(), 2);
    }

    #[test]
    fn test_identifier_kind_conflict() {
        let mut index = GeometryIndex::new(0);
        let shared = VisualMaterial::new("shared", "Shared");
        index.add_visual_mesh(cube_mesh(1, 1), &[(0, &shared)]).unwrap();
        assert_eq!(
            index.add_terrain_mesh(&TerrainData::new("shared", "Shared"), cube_mesh(2, 1)),
            Err(KindConflict)
        );
        assert_eq!(index.mesh_count(), 1);
        assert!(!index.entry("shared").unwrap().is_terrain());

        index
            .add_terrain_mesh(&TerrainData::new("field", "Field"), cube_mesh(3, 1))
            .unwrap();
        let field = VisualMaterial::new("field", "Field");
        assert_eq!(
            index.add_visual_mesh(cube_mesh(4, 1), &[(0, &field)]),
            Err(KindConflict)
        );
        assert_eq!(index.mesh_count(), 2);
    }

    #[test]
    fn test_apply_catalog() {
        let mut index = GeometryIndex::new(0);
        let plaster = VisualMaterial::new("plaster", "Plaster");
        let wall = index.add_visual_mesh(cube_mesh(1, 2), &[(1, &plaster)]).unwrap();
        let ground = index
            .add_terrain_mesh(&TerrainData::new("field", "Field"), cube_mesh(2, 3))
            .unwrap();

        let mut catalog = SurfaceMaterialCatalog::new();
        catalog.set("plaster", SurfaceMaterial::PlasterSmooth);
        index.apply_catalog(&mut catalog);

        let wall = index.mesh(wall).unwrap();
        assert_eq!(wall.material(0), Some(SurfaceMaterial::Transparent));
        assert_eq!(wall.material(1), Some(SurfaceMaterial::PlasterSmooth));

        // Missing identifiers are defaulted into the catalog.
        assert_eq!(catalog.get("field"), Some(SurfaceMaterial::Transparent));
        let ground = index.mesh(ground).unwrap();
        assert!(ground.materials().all(|(_, m)| m == SurfaceMaterial::Transparent));
    }
}
