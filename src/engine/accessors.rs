//! Accessor methods for MorphEngine

use super::{MorphEngine, Shapes};
use crate::animation::{MorphRunner, SectionTrigger};
use crate::camera::orbit::OrbitCamera;
use crate::renderer::{InstanceHandle, InstanceRenderer};
use crate::shape::ShapeStore;

impl<R: InstanceRenderer> MorphEngine<R> {
    /// The renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the renderer, e.g. to resize its surface.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// The orbit camera.
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Section trigger and displayed-shape state.
    pub fn trigger(&self) -> &SectionTrigger {
        &self.trigger
    }

    /// Name of the shape the last completed directed morph ended on.
    pub fn displayed_shape(&self) -> &str {
        self.trigger.displayed()
    }

    /// The instance set currently attached to the scene.
    pub fn displayed_set(&self) -> Option<InstanceHandle> {
        self.displayed
    }

    /// The running morph, if any.
    pub fn active_morph(&self) -> Option<&MorphRunner> {
        self.active.as_ref().map(|active| &active.runner)
    }

    /// Whether a morph is running.
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Loaded shapes, once loading has finished.
    pub fn shapes(&self) -> Option<&ShapeStore> {
        match &self.shapes {
            Shapes::Ready(store) => Some(store),
            Shapes::Loading(_) | Shapes::Failed => None,
        }
    }

    /// Whether shape loading failed.
    pub fn load_failed(&self) -> bool {
        matches!(self.shapes, Shapes::Failed)
    }
}
