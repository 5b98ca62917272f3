//! Viewport cropping and scaling.
//!
//! The scene can be framed through a sub-window of the full drawing surface
//! (e.g. the left three quarters, vertically centered) and the surface
//! itself can be upscaled. Cropping shifts and narrows the projection
//! frustum; it does not change the camera pose.

use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Horizontal placement of the crop window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropAnchor {
    /// Flush with the left edge, vertically centered.
    #[default]
    Left,
    /// Centered on both axes.
    Center,
}

/// A sub-rectangle of the full view, in full-view pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOffset {
    /// Full view width.
    pub full_width: f32,
    /// Full view height.
    pub full_height: f32,
    /// Left edge of the sub-window.
    pub x: f32,
    /// Top edge of the sub-window.
    pub y: f32,
    /// Sub-window width.
    pub width: f32,
    /// Sub-window height.
    pub height: f32,
}

/// Crop fraction, anchor and surface scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportCrop {
    /// Fraction of each full-view dimension kept, in (0, 1]. 1 disables
    /// cropping.
    pub fraction: f32,
    /// Where the crop window sits.
    pub anchor: CropAnchor,
    /// Drawing-surface scale relative to the window (1.4 = 40% upscale).
    pub scale: f32,
}

impl Default for ViewportCrop {
    fn default() -> Self {
        Self::NONE
    }
}

impl ViewportCrop {
    /// No crop, no scale.
    pub const NONE: ViewportCrop = ViewportCrop {
        fraction: 1.0,
        anchor: CropAnchor::Left,
        scale: 1.0,
    };

    /// Sub-window for a full view of `width × height`, `None` when the crop
    /// keeps the whole view.
    #[must_use]
    pub fn view_offset(&self, width: f32, height: f32) -> Option<ViewOffset> {
        let fraction = self.fraction.clamp(f32::EPSILON, 1.0);
        if fraction >= 1.0 {
            return None;
        }
        let margin = (1.0 - fraction) / 2.0;
        let x = match self.anchor {
            CropAnchor::Left => 0.0,
            CropAnchor::Center => width * margin,
        };
        Some(ViewOffset {
            full_width: width,
            full_height: height,
            x,
            y: height * margin,
            width: width * fraction,
            height: height * fraction,
        })
    }

    /// Drawing-surface size for a window of `width × height`.
    #[must_use]
    pub fn surface_size(&self, width: u32, height: u32) -> (u32, u32) {
        let scale = if self.scale > 0.0 { self.scale } else { 1.0 };
        (
            ((width as f32 * scale).round() as u32).max(1),
            ((height as f32 * scale).round() as u32).max(1),
        )
    }
}

/// Right-handed perspective projection with [0, 1] depth, optionally
/// restricted to the sub-window `view`.
///
/// Without a view this equals [`Mat4::perspective_rh`]. With one, the
/// frustum is the full frustum's slice that the sub-window covers.
#[must_use]
pub fn perspective_with_offset(
    fovy_radians: f32,
    aspect: f32,
    znear: f32,
    zfar: f32,
    view: Option<&ViewOffset>,
) -> Mat4 {
    let mut top = znear * (0.5 * fovy_radians).tan();
    let mut height = 2.0 * top;
    let mut width = aspect * height;
    let mut left = -0.5 * width;

    if let Some(view) = view {
        left += view.x * width / view.full_width;
        top -= view.y * height / view.full_height;
        width *= view.width / view.full_width;
        height *= view.height / view.full_height;
    }

    frustum_rh(left, left + width, top - height, top, znear, zfar)
}

/// Off-center right-handed frustum with [0, 1] depth (wgpu convention).
fn frustum_rh(
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    znear: f32,
    zfar: f32,
) -> Mat4 {
    let rw = 1.0 / (right - left);
    let rh = 1.0 / (top - bottom);
    let depth = zfar / (znear - zfar);
    Mat4::from_cols_array(&[
        2.0 * znear * rw,
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 * znear * rh,
        0.0,
        0.0,
        (right + left) * rw,
        (top + bottom) * rh,
        depth,
        -1.0,
        0.0,
        0.0,
        depth * znear,
        0.0,
    ])
}
