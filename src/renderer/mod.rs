//! Instance renderers driven by the morph engine.
//!
//! The engine only ever writes to a renderer: it creates instance sets,
//! overwrites per-instance positions and the shared color, commits, attaches
//! or detaches sets, and asks for one render per frame. It never reads
//! renderer state back.
//!
//! - [`headless::HeadlessRenderer`] keeps everything in memory and records
//!   what each frame showed (tests, headless runs with bounded history).
//! - [`gpu::GpuInstanceRenderer`] draws instanced tetrahedra with wgpu.

pub mod gpu;
pub mod headless;
pub(crate) mod pipeline_util;

use std::fmt;

use glam::Vec3;

use crate::camera::core::Camera;
use crate::error::MorphError;

/// Opaque id of one instance set inside a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(u64);

impl InstanceHandle {
    /// Handle with the given raw id. Renderers mint these.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Raw id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Write-only instanced-primitive renderer.
///
/// Per-index writes and color changes are staged until
/// [`commit`](Self::commit); a render only ever shows committed data, so a
/// frame never exposes a half-updated instance set.
pub trait InstanceRenderer {
    /// Create a new, detached instance set with one primitive per position.
    fn create_instance_set(
        &mut self,
        positions: &[Vec3],
        color: Vec3,
    ) -> InstanceHandle;

    /// Stage the translation of instance `index`.
    fn set_instance_transform(
        &mut self,
        handle: InstanceHandle,
        index: usize,
        position: Vec3,
    );

    /// Stage the shared color of the set.
    fn set_color(&mut self, handle: InstanceHandle, color: Vec3);

    /// Publish every staged write of this set for the next render.
    fn commit(&mut self, handle: InstanceHandle);

    /// Add the set to the scene.
    fn attach(&mut self, handle: InstanceHandle);

    /// Remove the set from the scene and release it. The handle is dead
    /// afterwards.
    fn detach(&mut self, handle: InstanceHandle);

    /// Draw every attached set from `camera`.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::Render`] if the frame could not be presented.
    fn render(&mut self, camera: &Camera) -> Result<(), MorphError>;
}
