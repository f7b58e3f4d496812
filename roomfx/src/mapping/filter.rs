use crate::config::{LayerMask, RoomFxDesc};
use crate::scene::SceneObject;

/// Decides which objects' geometry takes part in reverb computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InclusionFilter {
    pub layer_mask: LayerMask,
    pub include_non_static: bool,
}

impl InclusionFilter {
    pub fn new(layer_mask: LayerMask, include_non_static: bool) -> Self {
        Self {
            layer_mask,
            include_non_static,
        }
    }

    pub fn from_desc(desc: &RoomFxDesc) -> Self {
        Self::new(desc.reverb_layer_mask, desc.include_non_static)
    }

    pub fn includes(&self, object: &SceneObject) -> bool {
        self.layer_mask.contains(object.layer) && (self.include_non_static || object.is_static)
    }
}

impl Default for InclusionFilter {
    fn default() -> Self {
        Self::from_desc(&RoomFxDesc::default())
    }
}
