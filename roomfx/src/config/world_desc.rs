use std::path::PathBuf;

/// Bit set of scene layers (0..32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: Self = Self(u32::MAX);
    pub const NONE: Self = Self(0);

    pub fn from_layers(layers: &[u8]) -> Self {
        layers
            .iter()
            .fold(Self::NONE, |mask, &layer| mask.with_layer(layer))
    }

    /// Returns true if `layer` is a member of the mask. Layers outside 0..32 never are.
    pub fn contains(&self, layer: u8) -> bool {
        layer < 32 && (self.0 & (1 << layer)) != 0
    }

    pub fn with_layer(self, layer: u8) -> Self {
        if layer < 32 {
            Self(self.0 | (1 << layer))
        } else {
            log::warn!("Ignoring layer {} outside the 32-layer range", layer);
            self
        }
    }

    pub fn without_layer(self, layer: u8) -> Self {
        if layer < 32 {
            Self(self.0 & !(1 << layer))
        } else {
            self
        }
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Configuration descriptor for a roomfx world
#[derive(Debug, Clone)]
pub struct RoomFxDesc {
    /// Layers whose geometry participates in reverb computation
    pub reverb_layer_mask: LayerMask,
    /// Whether non-static objects participate in reverb computation (static objects always do)
    pub include_non_static: bool,
    /// Optional path of the persisted surface-material catalog.
    /// Loaded on world creation if the file exists, and used by `RoomFxWorld::save_catalog`.
    pub catalog_path: Option<PathBuf>,
}

impl Default for RoomFxDesc {
    fn default() -> Self {
        Self {
            reverb_layer_mask: LayerMask::ALL,
            include_non_static: true,
            catalog_path: None,
        }
    }
}

impl RoomFxDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reverb_layer_mask(mut self, mask: LayerMask) -> Self {
        self.reverb_layer_mask = mask;
        self
    }

    pub fn include_non_static(mut self, include: bool) -> Self {
        self.include_non_static = include;
        self
    }

    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }
}
