use roomfx::bake::{BakeRequest, ReverbBakeResult, ReverbComputer};
use roomfx::math::{Quat, Vec3};
use roomfx::regions::{NUM_RT60_BANDS, ProxyRoom};
use roomfx::scene::{AcousticMesh, SurfaceMaterial, WallMaterials};
use std::collections::HashMap;

/// Fits a shoebox around the geometry near a probe and estimates decay with Sabine's formula.
pub struct ShoeboxFitter {
    /// Geometry farther than this from the probe is ignored
    pub search_radius: f32,
}

impl ShoeboxFitter {
    pub fn new(search_radius: f32) -> Self {
        Self { search_radius }
    }
}

impl ReverbComputer for ShoeboxFitter {
    fn compute_reverb(
        &mut self,
        request: &BakeRequest,
        meshes: &[&AcousticMesh],
    ) -> anyhow::Result<ReverbBakeResult> {
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        let mut area_by_material: HashMap<SurfaceMaterial, f32> = HashMap::new();

        for mesh in meshes {
            let vertices = mesh.vertices();
            let materials = mesh.triangle_materials();
            for (triangle, material) in mesh.triangle_indices().chunks_exact(3).zip(materials) {
                let [a, b, c] = [0, 1, 2].map(|i| vertices[triangle[i] as usize]);
                let centroid = (a + b + c) / 3.0;
                if centroid.distance(request.sample_position) > self.search_radius {
                    continue;
                }
                min = min.min(a).min(b).min(c);
                max = max.max(a).max(b).max(c);
                if !material.is_transparent() {
                    let area = 0.5 * (b - a).cross(c - a).length();
                    *area_by_material.entry(material).or_default() += area;
                }
            }
        }

        if area_by_material.is_empty() {
            anyhow::bail!("no reflecting geometry within {} m", self.search_radius);
        }

        let size = (max - min).max(Vec3::splat(1.0));
        let volume = size.x * size.y * size.z;
        let mut rt60s = [0.0; NUM_RT60_BANDS];
        for (band, rt60) in rt60s.iter_mut().enumerate() {
            let absorption: f32 = area_by_material
                .iter()
                .map(|(&material, &area)| area * absorption_coefficient(material, band))
                .sum();
            *rt60 = 0.161 * volume / absorption.max(f32::EPSILON);
        }

        let dominant = area_by_material
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&material, _)| material)
            .unwrap_or_default();

        Ok(ReverbBakeResult {
            rt60s,
            proxy_room: ProxyRoom {
                position: (min + max) * 0.5,
                rotation: Quat::IDENTITY,
                size,
                walls: WallMaterials::uniform(dominant),
            },
        })
    }
}

/// Rough absorption per material, rising towards high bands for soft materials.
fn absorption_coefficient(material: SurfaceMaterial, band: usize) -> f32 {
    use SurfaceMaterial::*;
    let (low, high) = match material {
        Transparent => (0.0, 0.0),
        AcousticCeilingTiles | FiberGlassInsulation => (0.5, 0.9),
        CurtainHeavy => (0.1, 0.6),
        Grass => (0.1, 0.4),
        PlywoodPanel | WoodPanel | WoodCeiling => (0.25, 0.1),
        Sheetrock => (0.3, 0.05),
        GlassThin => (0.3, 0.04),
        GlassThick => (0.2, 0.03),
        ParquetOnConcrete | LinoleumOnConcrete => (0.04, 0.07),
        _ => (0.02, 0.05),
    };
    let t = band as f32 / (NUM_RT60_BANDS - 1) as f32;
    low + (high - low) * t
}
