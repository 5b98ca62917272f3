//! Centralized scene, morph and display options with TOML support.
//!
//! All tweakable settings (shapes, page sections, morph timings, camera
//! orbit, viewport crop, display) are consolidated here. Every sub-struct
//! uses `#[serde(default)]` so partial TOML files work.

mod camera;
mod display;
mod morph;
mod scene;

use std::path::{Path, PathBuf};

pub use camera::CameraOptions;
pub use display::{DisplayOptions, ViewportOptions};
use glam::Vec3;
pub use morph::MorphOptions;
pub use scene::{SectionOptions, ShapeOptions};
use serde::{Deserialize, Serialize};

use crate::error::MorphError;
use crate::shape::ShapeSpec;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Options {
    /// Directory shape paths are resolved against.
    pub asset_root: PathBuf,
    /// Shape shown before any section is entered.
    pub default_shape: String,
    /// Visible fraction at which a section counts as entered.
    pub visibility_threshold: f32,
    /// Morph timings.
    pub morph: MorphOptions,
    /// Camera projection and orbit.
    pub camera: CameraOptions,
    /// Render-surface crop and scale.
    pub viewport: ViewportOptions,
    /// Instance appearance and pacing.
    pub display: DisplayOptions,
    /// Shapes to load.
    pub shapes: Vec<ShapeOptions>,
    /// Page sections in page order.
    pub sections: Vec<SectionOptions>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("models"),
            default_shape: "teapot".to_owned(),
            visibility_threshold: 0.5,
            morph: MorphOptions::default(),
            camera: CameraOptions::default(),
            viewport: ViewportOptions::default(),
            display: DisplayOptions::default(),
            shapes: scene::default_shapes(),
            sections: scene::default_sections(),
        }
    }
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::Io`] if the file cannot be read and
    /// [`MorphError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, MorphError> {
        let content = std::fs::read_to_string(path).map_err(MorphError::Io)?;
        toml::from_str(&content)
            .map_err(|e| MorphError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::OptionsParse`] if serialization fails and
    /// [`MorphError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), MorphError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MorphError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(MorphError::Io)?;
        }
        std::fs::write(path, content).map_err(MorphError::Io)
    }

    /// Check cross-references between sections, shapes and the default
    /// shape.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::OptionsParse`] describing the first problem.
    pub fn validate(&self) -> Result<(), MorphError> {
        let defined = |name: &str| self.shapes.iter().any(|s| s.name == name);
        for (i, shape) in self.shapes.iter().enumerate() {
            if self.shapes[..i].iter().any(|s| s.name == shape.name) {
                return Err(MorphError::OptionsParse(format!(
                    "shape {:?} is defined twice",
                    shape.name
                )));
            }
        }
        if !defined(&self.default_shape) {
            return Err(MorphError::OptionsParse(format!(
                "default shape {:?} is not defined",
                self.default_shape
            )));
        }
        if let Some(section) =
            self.sections.iter().find(|section| !defined(&section.shape))
        {
            return Err(MorphError::OptionsParse(format!(
                "section {:?} shows undefined shape {:?}",
                section.id, section.shape
            )));
        }
        if !(self.visibility_threshold > 0.0 && self.visibility_threshold <= 1.0)
        {
            return Err(MorphError::OptionsParse(format!(
                "visibility threshold {} is outside (0, 1]",
                self.visibility_threshold
            )));
        }
        Ok(())
    }

    /// Shapes to load, with paths resolved against `asset_root`.
    #[must_use]
    pub fn shape_specs(&self) -> Vec<ShapeSpec> {
        self.shapes
            .iter()
            .map(|shape| ShapeSpec {
                name: shape.name.clone(),
                path: self.asset_root.join(&shape.path),
                color: Vec3::from_array(shape.color),
            })
            .collect()
    }

    /// `(section id, shape name)` pairs in page order.
    pub fn section_shapes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .iter()
            .map(|section| (section.id.as_str(), section.shape.as_str()))
    }
}
