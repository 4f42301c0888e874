use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{FlipbookError, FlipbookResult};

/// How the surface is sized and which parts are drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameType {
    /// Surface keeps the face's reference size; no translation.
    #[default]
    Default,
    /// Only the last slot (the face) is drawn; surface fitted to it.
    FaceOnly,
    /// Surface fitted to the frame's full span.
    Expand,
}

/// Per-frame drawing options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrameConfig {
    /// Draw parts translucent with outlines and `slot:name` labels.
    pub debug: bool,
    /// Framing mode.
    pub frame_type: FrameType,
}

/// Everything the viewer front end hands to an [`Individual`](crate::Individual).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Drawing options.
    #[serde(flatten)]
    pub frame: FrameConfig,
    /// Loop animated expressions while the pointer hovers the surface.
    pub loop_on_hover: bool,
}

impl ViewerConfig {
    /// Read a viewer config from a JSON file, e.g. `{"debug": true, "frameType": "expand"}`.
    pub fn from_json_file(path: &Path) -> FlipbookResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config '{}'", path.display()))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| FlipbookError::parse(path.display().to_string(), e))
    }
}
