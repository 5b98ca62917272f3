//! Interpolation helpers shared by the morph runner.

use glam::Vec3;
use web_time::Duration;

/// Linear interpolation between two Vec3 values (positions or RGB colors).
#[inline]
#[must_use]
pub fn lerp_vec3(t: f32, start: Vec3, end: Vec3) -> Vec3 {
    start + (end - start) * t
}

/// Elapsed time as a fraction of `duration`, clamped to [0, 1].
///
/// A zero duration is complete immediately.
#[must_use]
pub fn normalized_time(elapsed: Duration, duration: Duration) -> f32 {
    if duration.is_zero() {
        1.0
    } else {
        (elapsed.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}
