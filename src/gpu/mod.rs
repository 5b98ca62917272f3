//! GPU resource management utilities.
//!
//! Provides wgpu device/surface initialization, growable storage buffers and
//! the depth attachment.

/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth texture sized to the surface.
pub mod texture;
