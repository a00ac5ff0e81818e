//! Transient authoring-tool state exposed by scenes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{MaterialId, ObjectId};

/// Object interaction mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    Object,
    EditGpencil,
    PaintGpencil,
    SculptGpencil,
    WeightGpencil,
    VertexGpencil,
}

impl fmt::Display for InteractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Object => "OBJECT",
            Self::EditGpencil => "EDIT_GPENCIL",
            Self::PaintGpencil => "PAINT_GPENCIL",
            Self::SculptGpencil => "SCULPT_GPENCIL",
            Self::WeightGpencil => "WEIGHT_GPENCIL",
            Self::VertexGpencil => "VERTEX_GPENCIL",
        };
        f.write_str(name)
    }
}

/// A scene's active object when it uses the tracked paint facilities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintObject {
    pub object: ObjectId,
    pub mode: InteractionMode,
    pub active_material: Option<MaterialId>,
}
