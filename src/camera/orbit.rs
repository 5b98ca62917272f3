//! Circular camera orbit around the origin.
//!
//! The orbit advances once per frame, whether or not a morph is running.
//! The eye moves on a circle in the XY plane with +Z up and always looks at
//! the origin; the optional "breathing" variant bobs the look-at target
//! along Z with a small sine.

use glam::Vec3;

use super::core::Camera;
use super::viewport::ViewportCrop;
use crate::options::CameraOptions;

/// Camera on a fixed circular path.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Accumulated angle in radians. Never wrapped; the trig functions do it.
    angle: f64,
    radius: f32,
    /// Radians added per frame.
    angular_speed: f64,
    breathing_amplitude: f32,
    breathing_frequency: f32,
    crop: ViewportCrop,
    camera: Camera,
}

impl OrbitCamera {
    /// Orbit configured from options, for a `width × height` view.
    #[must_use]
    pub fn new(
        options: &CameraOptions,
        crop: ViewportCrop,
        width: u32,
        height: u32,
    ) -> Self {
        let camera = Camera {
            eye: Vec3::new(options.radius, 0.0, 0.0),
            target: Vec3::ZERO,
            up: Vec3::Z,
            aspect: 1.0,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
            view: None,
        };
        let mut orbit = Self {
            angle: 0.0,
            radius: options.radius,
            angular_speed: f64::from(options.angular_speed),
            breathing_amplitude: options.breathing_amplitude,
            breathing_frequency: options.breathing_frequency,
            crop,
            camera,
        };
        orbit.resize(width, height);
        orbit
    }

    /// Recompute aspect and crop sub-window for a new view size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        self.camera.aspect = width / height;
        self.camera.view = self.crop.view_offset(width, height);
    }

    /// Place the camera for the current angle, then step the angle.
    pub fn advance(&mut self) -> &Camera {
        let (sin, cos) = self.angle.sin_cos();
        self.camera.eye = Vec3::new(
            self.radius * cos as f32,
            self.radius * sin as f32,
            0.0,
        );
        self.camera.up = Vec3::Z;
        self.camera.target = self.breathing_target();
        self.angle += self.angular_speed;
        &self.camera
    }

    /// The camera as of the last [`advance`](Self::advance).
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Angle the next [`advance`](Self::advance) will place the camera at.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    fn breathing_target(&self) -> Vec3 {
        if self.breathing_amplitude == 0.0 {
            return Vec3::ZERO;
        }
        let phase = self.angle as f32 * self.breathing_frequency;
        Vec3::new(0.0, 0.0, self.breathing_amplitude * phase.sin())
    }
}
