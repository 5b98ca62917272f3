use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::animation::{BounceColor, Transition};
use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Morph timings and the bounce's look.
pub struct MorphOptions {
    /// Duration of a directed morph in milliseconds.
    pub directed_ms: u64,
    /// Duration of a re-entry bounce in milliseconds.
    pub bounce_ms: u64,
    /// Damping constant of the bounce's oscillation.
    pub damping: f32,
    /// Easing of directed morphs.
    pub directed_easing: EasingFunction,
    /// Color the bounce passes through at its noise waypoint.
    pub bounce_color: BounceColor,
    /// Seed for noise clouds. Unset draws a fresh seed per run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise_seed: Option<u64>,
}

impl Default for MorphOptions {
    fn default() -> Self {
        Self {
            directed_ms: 1200,
            bounce_ms: 3000,
            damping: EasingFunction::DEFAULT_DAMPING,
            directed_easing: EasingFunction::CubicInOut,
            bounce_color: BounceColor::Hold,
            noise_seed: None,
        }
    }
}

impl MorphOptions {
    /// Transition used for directed morphs.
    #[must_use]
    pub fn directed(&self) -> Transition {
        Transition::directed(Duration::from_millis(self.directed_ms))
            .with_easing(self.directed_easing)
    }

    /// Transition used for bounces.
    #[must_use]
    pub fn bounce(&self) -> Transition {
        Transition::bounce(Duration::from_millis(self.bounce_ms), self.damping)
    }
}
