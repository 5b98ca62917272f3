use serde::{Deserialize, Serialize};

use crate::camera::viewport::{CropAnchor, ViewportCrop};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Instance appearance and frame pacing.
pub struct DisplayOptions {
    /// Circumradius of each tetrahedron instance, in world units.
    pub instance_size: f32,
    /// Clear color (linear RGB).
    pub background: [f32; 3],
    /// Frame cap for the viewer. 0 = unlimited (vsync only).
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            instance_size: 0.006,
            background: [0.0, 0.0, 0.0],
            target_fps: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Sub-window crop and surface scale of the render surface.
pub struct ViewportOptions {
    /// Fraction of each view dimension kept. 1 disables cropping.
    pub crop: f32,
    /// Where the crop window sits.
    pub anchor: CropAnchor,
    /// Drawing-surface scale relative to the window.
    pub scale: f32,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            crop: 0.75,
            anchor: CropAnchor::Left,
            scale: 1.0,
        }
    }
}

impl ViewportOptions {
    /// The crop these options describe.
    #[must_use]
    pub fn crop(&self) -> ViewportCrop {
        ViewportCrop {
            fraction: self.crop,
            anchor: self.anchor,
            scale: self.scale,
        }
    }
}
