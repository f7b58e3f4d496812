use crate::mapping::catalog::SurfaceMaterialCatalog;
use crate::mapping::filter::InclusionFilter;
use crate::mapping::geometry_index::{GeometryIndex, KindConflict};
use crate::scene::{
    AcousticMesh, ObjectId, RenderableSurface, SceneObject, SceneSnapshot, TerrainData,
    TerrainSurface, VisualMaterial,
};

/// A surface left out of a rebuild, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSurface {
    pub object: ObjectId,
    pub name: String,
    pub reason: String,
}

impl SkippedSurface {
    fn new(object: &SceneObject, reason: String) -> Self {
        Self {
            object: object.id,
            name: object.name.clone(),
            reason,
        }
    }
}

/// Outcome of one [`MaterialMapper::apply_material_mapping`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RebuildSummary {
    pub generation: u64,
    pub identifiers: usize,
    pub meshes: usize,
    pub included: usize,
    /// Inactive surfaces and renderables without materials, left out without error
    pub ignored: usize,
    /// Surfaces that could not be added
    pub skipped: Vec<SkippedSurface>,
}

/// Maps surface identifiers to acoustic materials and aggregates the scene's acoustic
/// geometry.
///
/// The catalog persists across rebuilds; the geometry index is replaced wholesale by
/// every call to [`apply_material_mapping`](Self::apply_material_mapping). Catalog edits
/// take effect at the next rebuild.
#[derive(Debug, Clone)]
pub struct MaterialMapper {
    catalog: SurfaceMaterialCatalog,
    index: GeometryIndex,
    filter: InclusionFilter,
    next_generation: u64,
}

impl MaterialMapper {
    pub fn new(filter: InclusionFilter) -> Self {
        Self::with_catalog(SurfaceMaterialCatalog::new(), filter)
    }

    pub fn with_catalog(catalog: SurfaceMaterialCatalog, filter: InclusionFilter) -> Self {
        let mut mapper = Self {
            catalog,
            index: GeometryIndex::new(0),
            filter,
            next_generation: 0,
        };
        mapper.initialize();
        mapper
    }

    /// Drops the current geometry index. The catalog is kept. Safe to call repeatedly.
    pub fn initialize(&mut self) {
        self.index = GeometryIndex::new(self.bump_generation());
    }

    pub fn catalog(&self) -> &SurfaceMaterialCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut SurfaceMaterialCatalog {
        &mut self.catalog
    }

    pub fn geometry(&self) -> &GeometryIndex {
        &self.index
    }

    pub fn filter(&self) -> InclusionFilter {
        self.filter
    }

    /// Replaces the inclusion rules. Takes effect at the next filter pass or rebuild.
    pub fn set_filter(&mut self, filter: InclusionFilter) {
        self.filter = filter;
    }

    /// Rebuilds the geometry index from `snapshot`, applies the catalog and the
    /// inclusion filter, then swaps the result in.
    ///
    /// Surfaces that cannot be turned into acoustic meshes are logged, reported in the
    /// summary and skipped; the rebuild always completes.
    pub fn apply_material_mapping(&mut self, snapshot: &SceneSnapshot) -> RebuildSummary {
        let generation = self.bump_generation();
        let mut index = GeometryIndex::new(generation);
        let mut skipped = Vec::new();

        let mut ignored = 0;

        for surface in &snapshot.renderables {
            match self.add_renderable(&mut index, surface) {
                Ok(true) => {}
                Ok(false) => ignored += 1,
                Err(reason) => skipped.push(SkippedSurface::new(&surface.object, reason)),
            }
        }

        for surface in &snapshot.terrains {
            match self.add_terrain(&mut index, surface) {
                Ok(true) => {}
                Ok(false) => ignored += 1,
                Err(reason) => skipped.push(SkippedSurface::new(&surface.object, reason)),
            }
        }

        index.apply_catalog(&mut self.catalog);
        Self::filter_meshes(&self.filter, index.meshes_mut());

        self.index = index;

        let summary = RebuildSummary {
            generation,
            identifiers: self.index.len(),
            meshes: self.index.mesh_count(),
            included: self.included_count(),
            ignored,
            skipped,
        };
        log::info!(
            "Rebuilt acoustic geometry (generation {}): {} identifiers, {} meshes, {} included, \
             {} ignored, {} skipped",
            summary.generation,
            summary.identifiers,
            summary.meshes,
            summary.included,
            summary.ignored,
            summary.skipped.len()
        );
        summary
    }

    /// Re-evaluates the inclusion filter on the current meshes.
    pub fn apply_inclusion_filter(&mut self) {
        Self::filter_meshes(&self.filter, self.index.meshes_mut());
    }

    /// Meshes that passed inclusion filtering, renderables first, then terrains.
    ///
    /// This is the geometry handed to reverb computation.
    pub fn included_acoustic_meshes(&self) -> Vec<&AcousticMesh> {
        self.index
            .meshes()
            .iter()
            .filter(|mesh| mesh.is_included())
            .collect()
    }

    /// Representative visual material of `identifier` in the current index.
    pub fn visual_material(&self, identifier: &str) -> Option<&VisualMaterial> {
        self.index.visual_material(identifier)
    }

    /// Representative terrain data of `identifier` in the current index.
    pub fn terrain_data(&self, identifier: &str) -> Option<&TerrainData> {
        self.index.terrain_data(identifier)
    }

    fn included_count(&self) -> usize {
        self.index.meshes().iter().filter(|m| m.is_included()).count()
    }

    fn bump_generation(&mut self) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        generation
    }

    fn filter_meshes(filter: &InclusionFilter, meshes: &mut [AcousticMesh]) {
        for mesh in meshes {
            let included = filter.includes(mesh.owner());
            mesh.set_included(included);
        }
    }

    /// Adds one renderable to `index`. `Ok(false)` means the surface was filtered out
    /// (inactive or without materials); `Err` means it could not be added.
    fn add_renderable(
        &mut self,
        index: &mut GeometryIndex,
        surface: &RenderableSurface,
    ) -> Result<bool, String> {
        let object = &surface.object;
        if surface.materials.is_empty() {
            log::debug!("Ignoring '{}': no materials", object.name);
            return Ok(false);
        }
        if !object.active {
            log::debug!("Ignoring '{}': inactive", object.name);
            return Ok(false);
        }

        let mesh = AcousticMesh::from_mesh(object, &surface.transform, &surface.mesh)
            .map_err(|e| {
                log::error!("Failed to build acoustic mesh for '{}': {}", object.name, e);
                e.to_string()
            })?;

        let mut slots = Vec::with_capacity(surface.materials.len());
        for (submesh, material) in surface.materials.iter().enumerate() {
            if mesh.has_submesh(submesh) {
                slots.push((submesh, material));
            } else {
                log::warn!(
                    "Material slot {} of '{}' has no triangle submesh, ignoring '{}'",
                    submesh,
                    object.name,
                    material.id
                );
            }
        }

        if slots.is_empty() {
            log::warn!("Skipping '{}': no usable material slots", object.name);
            return Err("no usable material slots".to_string());
        }

        if let Err(KindConflict) = index.add_visual_mesh(mesh, &slots) {
            log::warn!(
                "Skipping '{}': one of its identifiers is already used by terrain data",
                object.name
            );
            return Err("identifier used by terrain data".to_string());
        }
        for (_, material) in slots {
            if self.catalog.insert_default_if_absent(&material.id) {
                log::debug!("Added default catalog entry for '{}'", material.id);
            }
        }
        Ok(true)
    }

    /// Adds one terrain to `index`, with the same outcomes as
    /// [`add_renderable`](Self::add_renderable).
    fn add_terrain(
        &mut self,
        index: &mut GeometryIndex,
        surface: &TerrainSurface,
    ) -> Result<bool, String> {
        let object = &surface.object;
        let terrain = &surface.terrain_data;
        if !object.active {
            log::debug!("Ignoring terrain '{}': inactive", object.name);
            return Ok(false);
        }

        let mesh = AcousticMesh::from_mesh(object, &surface.transform, &surface.mesh)
            .map_err(|e| {
                log::error!(
                    "Failed to build acoustic mesh for terrain '{}': {}",
                    object.name,
                    e
                );
                e.to_string()
            })?;

        // Renderables are indexed first, so the visual side owns a shared identifier.
        if let Err(KindConflict) = index.add_terrain_mesh(terrain, mesh) {
            log::warn!(
                "Terrain identifier '{}' on '{}' is already used by a visual material, ignoring",
                terrain.id,
                object.name
            );
            return Err(format!("identifier '{}' used by a visual material", terrain.id));
        }
        if self.catalog.insert_default_if_absent(&terrain.id) {
            log::debug!("Added default catalog entry for '{}'", terrain.id);
        }
        Ok(true)
    }
}

impl Default for MaterialMapper {
    fn default() -> Self {
        Self::new(InclusionFilter::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayerMask;
    use crate::math::Transform;
    use crate::scene::{
        MeshData, MeshTopology, SceneObject, SubMesh, SurfaceMaterial, unit_cube,
    };

    fn renderable(id: u64, materials: &[&str]) -> RenderableSurface {
        RenderableSurface {
            object: SceneObject::new(id, format!("renderable{}", id)),
            transform: Transform::IDENTITY,
            mesh: unit_cube(materials.len().max(1)),
            materials: materials
                .iter()
                .map(|m| VisualMaterial::new(*m, m.to_uppercase()))
                .collect(),
        }
    }

    fn terrain(id: u64, data: &str) -> TerrainSurface {
        TerrainSurface {
            object: SceneObject::new(id, format!("terrain{}", id)),
            transform: Transform::IDENTITY,
            mesh: unit_cube(1),
            terrain_data: TerrainData::new(data, data.to_uppercase()),
        }
    }

    fn scene() -> SceneSnapshot {
        SceneSnapshot::new()
            .with_renderable(renderable(1, &["brick", "glass"]))
            .with_renderable(renderable(2, &["brick"]))
            .with_terrain(terrain(3, "meadow"))
    }

    #[test]
    fn test_rebuild_builds_both_sides() {
        let mut mapper = MaterialMapper::default();
        let summary = mapper.apply_material_mapping(&scene());

        assert_eq!(summary.identifiers, 3);
        assert_eq!(summary.meshes, 3);
        assert_eq!(summary.included, 3);
        assert!(summary.skipped.is_empty());

        assert_eq!(mapper.geometry().meshes_for("brick").len(), 2);
        assert_eq!(
            mapper.visual_material("glass").map(|m| m.name.as_str()),
            Some("GLASS")
        );
        assert_eq!(
            mapper.terrain_data("meadow").map(|t| t.name.as_str()),
            Some("MEADOW")
        );
        assert!(mapper.visual_material("meadow").is_none());
        assert!(mapper.terrain_data("unknown").is_none());
    }

    #[test]
    fn test_catalog_is_superset_after_rebuild() {
        let mut catalog = SurfaceMaterialCatalog::new();
        catalog.set("unused", SurfaceMaterial::Marble);
        catalog.set("brick", SurfaceMaterial::BrickBare);
        let mut mapper = MaterialMapper::with_catalog(catalog, InclusionFilter::default());

        mapper.apply_material_mapping(&scene());

        for identifier in mapper.geometry().identifiers() {
            assert!(mapper.catalog().contains(identifier), "{}", identifier);
        }
        assert_eq!(mapper.catalog().get("unused"), Some(SurfaceMaterial::Marble));
        assert_eq!(mapper.catalog().get("brick"), Some(SurfaceMaterial::BrickBare));
        assert_eq!(mapper.catalog().get("glass"), Some(SurfaceMaterial::Transparent));
        assert_eq!(mapper.catalog().len(), 4);

        mapper.apply_material_mapping(&SceneSnapshot::new());
        assert_eq!(mapper.catalog().len(), 4);
        assert!(mapper.geometry().is_empty());
    }

    #[test]
    fn test_mapping_roundtrip() {
        let mut mapper = MaterialMapper::default();
        mapper.apply_material_mapping(&scene());

        mapper.catalog_mut().set("brick", SurfaceMaterial::BrickPainted);
        mapper.catalog_mut().set("meadow", SurfaceMaterial::Grass);

        // Not reflected until the next rebuild.
        let first = mapper.geometry().meshes_for("brick")[0];
        assert_eq!(first.material(0), Some(SurfaceMaterial::Transparent));

        mapper.apply_material_mapping(&scene());

        let geometry = mapper.geometry();
        if let Some(crate::mapping::SurfaceEntry::Visual { submeshes, .. }) =
            geometry.entry("brick")
        {
            assert_eq!(submeshes.len(), 2);
            for &(mesh_id, submesh) in submeshes {
                let mesh = geometry.mesh(mesh_id).unwrap();
                assert_eq!(mesh.material(submesh), Some(SurfaceMaterial::BrickPainted));
            }
        } else {
            panic!("brick should be a visual entry");
        }

        let glass_owner = geometry.meshes_for("glass")[0];
        assert_eq!(glass_owner.material(1), Some(SurfaceMaterial::Transparent));

        for mesh in geometry.meshes_for("meadow") {
            assert!(mesh.materials().all(|(_, m)| m == SurfaceMaterial::Grass));
        }
    }

    #[test]
    fn test_filtered_surfaces_are_ignored_and_broken_ones_skipped() {
        let mut inactive = renderable(10, &["brick"]);
        inactive.object = inactive.object.with_active(false);

        let no_materials = renderable(11, &[]);

        let mut broken = renderable(12, &["lines"]);
        broken.mesh = MeshData {
            vertices: vec![crate::math::Vec3::ZERO, crate::math::Vec3::X],
            submeshes: vec![SubMesh {
                topology: MeshTopology::LineStrip,
                indices: vec![0, 1],
            }],
        };

        let mut inactive_terrain = terrain(14, "meadow");
        inactive_terrain.object = inactive_terrain.object.with_active(false);

        let snapshot = SceneSnapshot::new()
            .with_renderable(inactive)
            .with_renderable(no_materials)
            .with_renderable(broken)
            .with_renderable(renderable(13, &["wood"]))
            .with_terrain(inactive_terrain);

        let mut mapper = MaterialMapper::default();
        let summary = mapper.apply_material_mapping(&snapshot);

        assert_eq!(summary.meshes, 1);
        assert_eq!(summary.ignored, 3);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].object, ObjectId(12));
        assert!(!mapper.catalog().contains("lines"));
        assert!(!mapper.catalog().contains("meadow"));
        assert!(mapper.catalog().contains("wood"));
    }

    #[test]
    fn test_extra_material_slots_are_ignored() {
        let mut surface = renderable(1, &["a", "b"]);
        surface.mesh = unit_cube(1);
        let mut mapper = MaterialMapper::default();
        mapper.apply_material_mapping(&SceneSnapshot::new().with_renderable(surface));

        assert!(mapper.visual_material("a").is_some());
        assert!(mapper.visual_material("b").is_none());
        assert!(!mapper.catalog().contains("b"));
    }

    #[test]
    fn test_terrain_identifier_conflict_is_skipped() {
        let snapshot = SceneSnapshot::new()
            .with_renderable(renderable(1, &["shared"]))
            .with_terrain(terrain(2, "shared"));
        let mut mapper = MaterialMapper::default();
        let summary = mapper.apply_material_mapping(&snapshot);

        assert_eq!(summary.meshes, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert!(mapper.visual_material("shared").is_some());
        assert!(mapper.terrain_data("shared").is_none());
    }

    #[test]
    fn test_inclusion_filter() {
        let mut dynamic = renderable(1, &["brick"]);
        dynamic.object = dynamic.object.with_static(false);
        let mut other_layer = renderable(2, &["brick"]);
        other_layer.object = other_layer.object.with_layer(4);
        let snapshot = SceneSnapshot::new()
            .with_renderable(dynamic)
            .with_renderable(other_layer)
            .with_renderable(renderable(3, &["brick"]));

        let filter = InclusionFilter::new(LayerMask::from_layers(&[0]), false);
        let mut mapper = MaterialMapper::new(filter);
        mapper.apply_material_mapping(&snapshot);

        let included: Vec<_> = mapper
            .included_acoustic_meshes()
            .iter()
            .map(|m| m.owner_id())
            .collect();
        assert_eq!(included, vec![ObjectId(3)]);

        mapper.apply_inclusion_filter();
        let again: Vec<_> = mapper
            .included_acoustic_meshes()
            .iter()
            .map(|m| m.owner_id())
            .collect();
        assert_eq!(again, included);

        mapper.set_filter(InclusionFilter::new(LayerMask::ALL, true));
        mapper.apply_inclusion_filter();
        assert_eq!(mapper.included_acoustic_meshes().len(), 3);
    }

    #[test]
    fn test_initialize_is_idempotent_and_keeps_catalog() {
        let mut mapper = MaterialMapper::default();
        mapper.apply_material_mapping(&scene());
        let before = mapper.catalog().clone();

        mapper.initialize();
        mapper.initialize();

        assert!(mapper.geometry().is_empty());
        assert_eq!(mapper.geometry().mesh_count(), 0);
        assert!(mapper.included_acoustic_meshes().is_empty());
        assert_eq!(mapper.catalog(), &before);
    }

    #[test]
    fn test_generations_increase() {
        let mut mapper = MaterialMapper::default();
        let first = mapper.apply_material_mapping(&scene()).generation;
        let second = mapper.apply_material_mapping(&scene()).generation;
        assert!(second > first);
        assert_eq!(mapper.geometry().generation(), second);
    }
}
