use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One shape to load.
pub struct ShapeOptions {
    /// Name used by sections and morph requests.
    pub name: String,
    /// Coordinate file, relative to `asset_root` unless absolute.
    pub path: PathBuf,
    /// Linear RGB display color.
    #[serde(default = "white")]
    pub color: [f32; 3],
}

impl ShapeOptions {
    /// Shape `name` read from `path`, drawn white.
    #[must_use]
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            color: white(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A page section and the shape shown while it is in view.
pub struct SectionOptions {
    /// Section id.
    pub id: String,
    /// Shape name.
    pub shape: String,
}

impl SectionOptions {
    /// Section `id` showing `shape`.
    #[must_use]
    pub fn new(id: impl Into<String>, shape: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            shape: shape.into(),
        }
    }
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

pub(super) fn default_shapes() -> Vec<ShapeOptions> {
    vec![
        ShapeOptions::new("teapot", "coordinates_teapot.txt"),
        ShapeOptions::new("brain", "coordinates_brain.txt"),
        ShapeOptions::new("lightbulb", "coordinates_lightbulb.txt"),
    ]
}

pub(super) fn default_sections() -> Vec<SectionOptions> {
    vec![
        SectionOptions::new("Section1", "teapot"),
        SectionOptions::new("Section2", "brain"),
        SectionOptions::new("Section3", "lightbulb"),
    ]
}
