//! Transition describes how to morph from the displayed shape to a target.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::util::easing::EasingFunction;

/// The two kinds of morph the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// `X → Y` once; `Y` becomes the displayed shape on completion.
    Directed,
    /// `X → noise → X`; the displayed shape does not change.
    Bounce,
}

/// Color target of the noise waypoint in a bounce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BounceColor {
    /// Keep the shape's own color for the whole bounce.
    #[default]
    Hold,
    /// Blend toward a random color at the noise waypoint and back.
    Random,
}

/// Describes how to morph: kind, duration and easing curve.
///
/// Consumers construct transitions via preset constructors:
/// [`directed()`](Self::directed) and [`bounce()`](Self::bounce).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Directed or bounce.
    pub kind: TransitionKind,
    /// Total morph duration.
    pub duration: Duration,
    /// Curve mapping normalized time to progress.
    pub easing: EasingFunction,
}

impl Transition {
    /// Default directed morph duration.
    pub const DIRECTED_DURATION: Duration = Duration::from_millis(1200);
    /// Default bounce duration.
    pub const BOUNCE_DURATION: Duration = Duration::from_millis(3000);

    /// Directed morph with cubic ease-in-out.
    #[must_use]
    pub fn directed(duration: Duration) -> Self {
        Self {
            kind: TransitionKind::Directed,
            duration,
            easing: EasingFunction::CubicInOut,
        }
    }

    /// Re-entry bounce with damped-oscillation easing.
    #[must_use]
    pub fn bounce(duration: Duration, damping: f32) -> Self {
        Self {
            kind: TransitionKind::Bounce,
            duration,
            easing: EasingFunction::DampedOscillation { damping },
        }
    }

    /// Override the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Debug name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.kind {
            TransitionKind::Directed => "directed",
            TransitionKind::Bounce => "bounce",
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::directed(Self::DIRECTED_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directed_transition() {
        let t = Transition::directed(Duration::from_millis(900));
        assert_eq!(t.name(), "directed");
        assert_eq!(t.easing, EasingFunction::CubicInOut);
        assert_eq!(t.duration, Duration::from_millis(900));
    }

    #[test]
    fn test_bounce_transition() {
        let t = Transition::bounce(Transition::BOUNCE_DURATION, 10.0);
        assert_eq!(t.name(), "bounce");
        assert_eq!(t.kind, TransitionKind::Bounce);
        assert_eq!(
            t.easing,
            EasingFunction::DampedOscillation { damping: 10.0 }
        );
    }

    #[test]
    fn test_default_is_directed() {
        let t = Transition::default();
        assert_eq!(t.kind, TransitionKind::Directed);
        assert_eq!(t.duration, Duration::from_millis(1200));
    }

    #[test]
    fn test_with_easing() {
        let t = Transition::default().with_easing(EasingFunction::Linear);
        assert_eq!(t.easing, EasingFunction::Linear);
    }
}
