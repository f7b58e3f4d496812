//! Math types for roomfx

pub use glam::{Quat, Vec3};

/// Position and orientation of an object, without scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// World transform of a scene object.
///
/// `lossy_scale` is the accumulated world scale of the object. Once a rotated parent is
/// non-uniformly scaled the true world scale is a skew, which cannot be represented by a
/// single vector; the per-axis approximation is what region sizes are scaled by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub lossy_scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        lossy_scale: Vec3::ONE,
    };

    pub fn new(position: Vec3, rotation: Quat, lossy_scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            lossy_scale,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, lossy_scale: Vec3) -> Self {
        self.lossy_scale = lossy_scale;
        self
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Maps a point from object space to world space (scale, then rotate, then translate).
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (point * self.lossy_scale)
    }

    /// Maps a world point into the object's rotated frame, leaving scale untouched.
    pub fn inverse_transform_unscaled(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.position)
    }

    /// Largest of the three scale components.
    pub fn max_scale(&self) -> f32 {
        self.lossy_scale.max_element()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Self = Self {
        min: Vec3::ZERO,
        max: Vec3::ZERO,
    };

    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size.abs() * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn set_center_size(&mut self, center: Vec3, size: Vec3) {
        *self = Self::from_center_size(center, size);
    }

    /// Inclusive on all faces.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Converts a decibel value to a linear amplitude multiplier.
pub fn amplitude_from_db(db: f32) -> f32 {
    10.0_f32.powf(0.05 * db)
}
