//! Acoustic surface materials.
//!
//! Every surface that takes part in reverb computation or in a shoebox room boundary is
//! tagged with one of the categories below. The audio engine owns the absorption curves
//! behind each category; this crate only routes the tags.

use serde::{Deserialize, Serialize};

/// Acoustic surface material category.
///
/// `Transparent` is the default and means the surface has no acoustic effect.
///
/// # Example
///
/// ```
/// use roomfx::scene::SurfaceMaterial;
///
/// let floor = SurfaceMaterial::ParquetOnConcrete;
/// assert_eq!(SurfaceMaterial::from_index(floor.index()), Some(floor));
/// assert_eq!(SurfaceMaterial::default(), SurfaceMaterial::Transparent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SurfaceMaterial {
    #[default]
    Transparent,
    AcousticCeilingTiles,
    BrickBare,
    BrickPainted,
    ConcreteBlockCoarse,
    ConcreteBlockPainted,
    CurtainHeavy,
    FiberGlassInsulation,
    GlassThin,
    GlassThick,
    Grass,
    LinoleumOnConcrete,
    Marble,
    Metal,
    ParquetOnConcrete,
    PlasterRough,
    PlasterSmooth,
    PlywoodPanel,
    PolishedConcreteOrTile,
    Sheetrock,
    WaterOrIceSurface,
    WoodCeiling,
    WoodPanel,
}

impl SurfaceMaterial {
    /// All categories, ordered by their stable index.
    pub const ALL: [Self; 23] = [
        Self::Transparent,
        Self::AcousticCeilingTiles,
        Self::BrickBare,
        Self::BrickPainted,
        Self::ConcreteBlockCoarse,
        Self::ConcreteBlockPainted,
        Self::CurtainHeavy,
        Self::FiberGlassInsulation,
        Self::GlassThin,
        Self::GlassThick,
        Self::Grass,
        Self::LinoleumOnConcrete,
        Self::Marble,
        Self::Metal,
        Self::ParquetOnConcrete,
        Self::PlasterRough,
        Self::PlasterSmooth,
        Self::PlywoodPanel,
        Self::PolishedConcreteOrTile,
        Self::Sheetrock,
        Self::WaterOrIceSurface,
        Self::WoodCeiling,
        Self::WoodPanel,
    ];

    /// Stable index of the category, used as the material index in ray hits.
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Self::Transparent => "Transparent",
            Self::AcousticCeilingTiles => "Acoustic Ceiling Tiles",
            Self::BrickBare => "Brick Bare",
            Self::BrickPainted => "Brick Painted",
            Self::ConcreteBlockCoarse => "Concrete Block Coarse",
            Self::ConcreteBlockPainted => "Concrete Block Painted",
            Self::CurtainHeavy => "Curtain Heavy",
            Self::FiberGlassInsulation => "Fiber Glass Insulation",
            Self::GlassThin => "Glass Thin",
            Self::GlassThick => "Glass Thick",
            Self::Grass => "Grass",
            Self::LinoleumOnConcrete => "Linoleum On Concrete",
            Self::Marble => "Marble",
            Self::Metal => "Metal",
            Self::ParquetOnConcrete => "Parquet On Concrete",
            Self::PlasterRough => "Plaster Rough",
            Self::PlasterSmooth => "Plaster Smooth",
            Self::PlywoodPanel => "Plywood Panel",
            Self::PolishedConcreteOrTile => "Polished Concrete Or Tile",
            Self::Sheetrock => "Sheetrock",
            Self::WaterOrIceSurface => "Water Or Ice Surface",
            Self::WoodCeiling => "Wood Ceiling",
            Self::WoodPanel => "Wood Panel",
        }
    }

    /// Returns true if the surface has no acoustic effect.
    pub fn is_transparent(self) -> bool {
        self == Self::Transparent
    }
}

impl std::fmt::Display for SurfaceMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Materials of the six walls of a shoebox room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WallMaterials {
    pub left: SurfaceMaterial,
    pub right: SurfaceMaterial,
    pub bottom: SurfaceMaterial,
    pub top: SurfaceMaterial,
    pub front: SurfaceMaterial,
    pub back: SurfaceMaterial,
}

impl WallMaterials {
    pub fn uniform(material: SurfaceMaterial) -> Self {
        Self {
            left: material,
            right: material,
            bottom: material,
            top: material,
            front: material,
            back: material,
        }
    }

    /// Walls in engine order: left, right, bottom, top, front, back.
    pub fn as_array(&self) -> [SurfaceMaterial; 6] {
        [
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.front,
            self.back,
        ]
    }
}
