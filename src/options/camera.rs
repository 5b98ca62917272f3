use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Camera projection and orbit parameters.
pub struct CameraOptions {
    /// Orbit radius around the origin.
    pub radius: f32,
    /// Radians the orbit advances per frame.
    pub angular_speed: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
    /// Height of the look-at target's Z bob. 0 disables breathing.
    pub breathing_amplitude: f32,
    /// Bob cycles per radian of orbit.
    pub breathing_frequency: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            radius: 3.0,
            angular_speed: 0.006,
            fovy: 75.0,
            znear: 1.0,
            zfar: 1000.0,
            breathing_amplitude: 0.0,
            breathing_frequency: 2.0,
        }
    }
}
