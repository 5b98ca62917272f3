//! Easing functions for morph interpolation.
//!
//! Maps normalized time in [0, 1] to normalized progress. The damped
//! oscillation curve overshoots on purpose, so only its endpoints are fixed.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Easing function variants for morph curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Cubic ease-in-out: `4t³` for the first half,
    /// `1 - (-2t + 2)³ / 2` for the second.
    CubicInOut,
    /// Exponentially damped sine, `2^(-k·t)·sin((10t - 0.75)·2π/3) + 1`.
    /// Overshoots above 1 and settles back, giving a bounce.
    DampedOscillation {
        /// Damping constant `k`; larger values settle faster.
        damping: f32,
    },
}

impl EasingFunction {
    /// Damping constant of the standard elastic ease-out.
    pub const DEFAULT_DAMPING: f32 = 10.0;

    /// Default easing function for directed morphs.
    pub const DEFAULT: EasingFunction = EasingFunction::CubicInOut;

    /// Damped oscillation with the standard damping constant.
    #[must_use]
    pub const fn bounce() -> Self {
        Self::DampedOscillation {
            damping: Self::DEFAULT_DAMPING,
        }
    }

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0]. Both endpoints are returned exactly:
    /// `evaluate(0.0) == 0.0` and `evaluate(1.0) == 1.0`.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            EasingFunction::DampedOscillation { damping } => {
                if t == 0.0 {
                    0.0
                } else if t == 1.0 {
                    1.0
                } else {
                    let c = (2.0 * PI) / 3.0;
                    (-damping * t).exp2() * ((10.0 * t - 0.75) * c).sin() + 1.0
                }
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for easing in [
            EasingFunction::Linear,
            EasingFunction::CubicInOut,
            EasingFunction::bounce(),
            EasingFunction::DampedOscillation { damping: 4.0 },
        ] {
            assert_eq!(easing.evaluate(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.evaluate(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_cubic_in_out_midpoint() {
        assert_eq!(EasingFunction::CubicInOut.evaluate(0.5), 0.5);
        assert_eq!(EasingFunction::CubicInOut.evaluate(0.25), 0.0625);
    }

    #[test]
    fn test_cubic_in_out_is_monotonic() {
        let easing = EasingFunction::CubicInOut;
        let mut prev = easing.evaluate(0.0);
        for i in 1..=1000 {
            let value = easing.evaluate(i as f32 / 1000.0);
            assert!(value >= prev, "decreased at step {i}");
            prev = value;
        }
    }

    #[test]
    fn test_cubic_in_out_is_symmetric() {
        let easing = EasingFunction::CubicInOut;
        for t in [0.1_f32, 0.2, 0.3, 0.4] {
            let sum = easing.evaluate(t) + easing.evaluate(1.0 - t);
            assert!((sum - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_damped_oscillation_overshoots() {
        // Only the endpoints are pinned; in between the curve leaves [0, 1].
        let easing = EasingFunction::bounce();
        let overshoots = (1..100)
            .map(|i| easing.evaluate(i as f32 / 100.0))
            .any(|v| v > 1.0);
        assert!(overshoots);
    }

    #[test]
    fn test_input_clamping() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(-0.5), 0.0);
        assert_eq!(linear.evaluate(1.5), 1.0);

        let cubic = EasingFunction::CubicInOut;
        assert_eq!(cubic.evaluate(-0.5), 0.0);
        assert_eq!(cubic.evaluate(1.5), 1.0);
    }

    #[test]
    fn test_default_is_cubic_in_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::CubicInOut);
    }
}
