//! Occlusion queries for reverb probe visibility.
//!
//! The visibility test of a reverb probe only needs one number: how occluded the probe
//! position is from the listener. Hosts either implement [`OcclusionQuery`] directly or
//! implement [`RayTracer`] over their own scene and wrap it in [`RayTracedOcclusion`].

use crate::math::Vec3;
use crate::scene::material::SurfaceMaterial;

/// Collaborator answering "how occluded is `target` from the listener?".
///
/// Returns an intensity `>= 0.0`, where `0.0` means fully visible.
pub trait OcclusionQuery {
    fn compute_occlusion_intensity(&self, target: Vec3) -> f32;
}

/// Query that never reports occlusion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcclusion;

impl OcclusionQuery for NoOcclusion {
    fn compute_occlusion_intensity(&self, _target: Vec3) -> f32 {
        0.0
    }
}

/// Result of a ray intersection test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Whether the ray hit any geometry
    pub hit: bool,

    /// Distance from ray origin to hit point
    ///
    /// Only meaningful if `hit` is true
    pub distance: f32,

    /// Index of the hit surface's [`SurfaceMaterial`]
    ///
    /// Only meaningful if `hit` is true
    pub material_index: u8,

    /// Surface normal at the hit point (normalized)
    ///
    /// Only meaningful if `hit` is true
    pub normal: Vec3,
}

impl RayHit {
    /// Creates a miss result (no hit)
    pub fn miss() -> Self {
        Self {
            hit: false,
            distance: 0.0,
            material_index: 0,
            normal: Vec3::ZERO,
        }
    }

    /// Creates a hit result
    pub fn new(distance: f32, material: SurfaceMaterial, normal: Vec3) -> Self {
        Self {
            hit: true,
            distance,
            material_index: material.index(),
            normal,
        }
    }

    pub fn material(&self) -> Option<SurfaceMaterial> {
        if self.hit {
            SurfaceMaterial::from_index(self.material_index)
        } else {
            None
        }
    }
}

impl Default for RayHit {
    fn default() -> Self {
        Self::miss()
    }
}

/// Host-provided ray intersection against scene geometry.
///
/// # Notes
///
/// - If multiple surfaces are hit, return the **closest** hit
/// - `direction` is normalized
pub trait RayTracer {
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> RayHit;
}

/// Most transparent surfaces a single query steps through before giving up.
const MAX_TRANSPARENT_HITS: usize = 16;

/// Binary occlusion from ray casts between the listener and the target.
///
/// Intensity is `1.0` when an opaque surface is hit strictly before the target, `0.0`
/// otherwise. Transparent hits are stepped over by casting again just past them, so a
/// transparent pane never hides a wall behind it.
pub struct RayTracedOcclusion<'a, T: RayTracer + ?Sized> {
    tracer: &'a T,
    listener: Vec3,
}

impl<'a, T: RayTracer + ?Sized> RayTracedOcclusion<'a, T> {
    pub fn new(tracer: &'a T, listener: Vec3) -> Self {
        Self { tracer, listener }
    }
}

impl<T: RayTracer + ?Sized> OcclusionQuery for RayTracedOcclusion<'_, T> {
    fn compute_occlusion_intensity(&self, target: Vec3) -> f32 {
        const STEP: f32 = 1e-3;

        let offset = target - self.listener;
        let distance = offset.length();
        if distance <= f32::EPSILON {
            return 0.0;
        }
        let direction = offset / distance;

        let mut travelled = 0.0;
        for _ in 0..=MAX_TRANSPARENT_HITS {
            let remaining = distance - travelled;
            if remaining <= 0.0 {
                return 0.0;
            }
            let origin = self.listener + direction * travelled;
            let hit = self.tracer.cast_ray(origin, direction, remaining);
            if !hit.hit || hit.distance >= remaining {
                return 0.0;
            }
            if hit.material() != Some(SurfaceMaterial::Transparent) {
                return 1.0;
            }
            travelled += hit.distance + STEP;
        }

        log::warn!(
            "Gave up after {} transparent hits towards {}, treating target as occluded",
            MAX_TRANSPARENT_HITS,
            target
        );
        1.0
    }
}
