//! Camera system for the morph scene.
//!
//! Provides the projection camera, the per-frame orbit, and viewport
//! cropping.

/// Core camera struct and GPU uniform types.
pub mod core;
/// Circular orbit advanced once per frame.
pub mod orbit;
/// Crop sub-window and surface scale.
pub mod viewport;
