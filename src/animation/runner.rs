//! Morph runner executes a single shape morph.

use std::sync::Arc;

use glam::Vec3;
use web_time::Instant;

use super::interpolation::{lerp_vec3, normalized_time};
use super::scheduler::MorphId;
use super::transition::Transition;
use crate::error::MorphError;
use crate::renderer::{InstanceHandle, InstanceRenderer};
use crate::shape::Shape;

/// Lifecycle of a [`MorphRunner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphPhase {
    /// Created; no frame has been seen yet.
    Pending,
    /// Started at the first tick's frame timestamp.
    Running {
        /// Timestamp of the first tick (progress 0).
        started: Instant,
    },
    /// Elapsed time passed the duration; the end state was written.
    Completed,
    /// Superseded by a newer morph.
    Cancelled,
}

/// Result of one successful tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MorphTick {
    /// A frame was written at this eased progress; tick again next frame.
    Running {
        /// Eased progress used for positions and color alike.
        progress: f32,
    },
    /// The exact end state was written; the morph is over.
    Completed,
}

/// Positions and color of a morph at one progress value.
#[derive(Debug, Clone, PartialEq)]
pub struct MorphFrame {
    /// Per-instance positions.
    pub positions: Vec<Vec3>,
    /// Shared color.
    pub color: Vec3,
}

/// Intermediate point cloud a bounce passes through.
#[derive(Debug, Clone)]
struct Waypoint {
    positions: Vec<Vec3>,
    color: Vec3,
}

/// One leg of the morph: interpolate `from → to` with local parameter `t`.
struct Leg<'a> {
    from: &'a [Vec3],
    to: &'a [Vec3],
    from_color: Vec3,
    to_color: Vec3,
    t: f32,
}

/// Executes a single morph from a start shape to an end shape.
///
/// The runner holds:
/// - The transition (kind, duration, easing)
/// - Start and end shapes, plus the noise waypoint for a bounce
/// - Its generation id and lifecycle phase
///
/// Positions and color are always driven by the same eased progress.
pub struct MorphRunner {
    id: MorphId,
    transition: Transition,
    start: Arc<Shape>,
    end: Arc<Shape>,
    via: Option<Waypoint>,
    phase: MorphPhase,
}

impl MorphRunner {
    /// Morph `start → end` once.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::ShapeMismatch`] if the shapes have different
    /// instance counts.
    pub fn directed(
        id: MorphId,
        transition: Transition,
        start: Arc<Shape>,
        end: Arc<Shape>,
    ) -> Result<Self, MorphError> {
        start.check_compatible(&end)?;
        Ok(Self {
            id,
            transition,
            start,
            end,
            via: None,
            phase: MorphPhase::Pending,
        })
    }

    /// Morph `shape → noise → shape`. First half of progress goes out to the
    /// noise cloud, second half comes back.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::ShapeMismatch`] if `noise` does not have one
    /// position per instance of `shape`.
    pub fn bounce(
        id: MorphId,
        transition: Transition,
        shape: Arc<Shape>,
        noise: Vec<Vec3>,
        noise_color: Vec3,
    ) -> Result<Self, MorphError> {
        if noise.len() != shape.len() {
            return Err(MorphError::ShapeMismatch {
                start: shape.name.clone(),
                end: "noise".to_owned(),
                start_len: shape.len(),
                end_len: noise.len(),
            });
        }
        Ok(Self {
            id,
            transition,
            start: Arc::clone(&shape),
            end: shape,
            via: Some(Waypoint {
                positions: noise,
                color: noise_color,
            }),
            phase: MorphPhase::Pending,
        })
    }

    /// Generation id.
    pub fn id(&self) -> MorphId {
        self.id
    }

    /// The transition being run.
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> MorphPhase {
        self.phase
    }

    /// Shape the morph starts from.
    pub fn start_shape(&self) -> &Arc<Shape> {
        &self.start
    }

    /// Shape the morph ends on.
    pub fn end_shape(&self) -> &Arc<Shape> {
        &self.end
    }

    /// Whether this is a bounce through a noise cloud.
    pub fn is_bounce(&self) -> bool {
        self.via.is_some()
    }

    /// Whether the runner reached a terminal phase.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, MorphPhase::Completed | MorphPhase::Cancelled)
    }

    /// Mark the runner superseded. Later ticks are rejected as stale.
    pub fn cancel(&mut self) {
        if !self.is_finished() {
            self.phase = MorphPhase::Cancelled;
        }
    }

    /// Interpolated position of instance `index` at eased `progress`.
    pub fn position_at(&self, index: usize, progress: f32) -> Option<Vec3> {
        let leg = self.leg(progress);
        let from = leg.from.get(index)?;
        let to = leg.to.get(index)?;
        Some(lerp_vec3(leg.t, *from, *to))
    }

    /// Interpolated color at eased `progress`.
    pub fn color_at(&self, progress: f32) -> Vec3 {
        let leg = self.leg(progress);
        lerp_vec3(leg.t, leg.from_color, leg.to_color)
    }

    /// Every position and the color at eased `progress`.
    pub fn sample(&self, progress: f32) -> MorphFrame {
        let leg = self.leg(progress);
        MorphFrame {
            positions: leg
                .from
                .iter()
                .zip(leg.to)
                .map(|(from, to)| lerp_vec3(leg.t, *from, *to))
                .collect(),
            color: lerp_vec3(leg.t, leg.from_color, leg.to_color),
        }
    }

    /// Advance to frame timestamp `now` and write the frame to `renderer`.
    ///
    /// The first tick records `now` as the start, so the first written frame
    /// is always progress 0. While `elapsed <= duration` the eased frame is
    /// written; past the duration the exact end shape and color are written
    /// and the runner completes.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::StaleTick`] if the runner was cancelled or has
    /// already completed. Nothing is written in that case.
    pub fn tick<R: InstanceRenderer + ?Sized>(
        &mut self,
        now: Instant,
        renderer: &mut R,
        handle: InstanceHandle,
    ) -> Result<MorphTick, MorphError> {
        let started = match self.phase {
            MorphPhase::Completed | MorphPhase::Cancelled => {
                return Err(MorphError::StaleTick(self.id));
            }
            MorphPhase::Pending => {
                self.phase = MorphPhase::Running { started: now };
                now
            }
            MorphPhase::Running { started } => started,
        };

        let elapsed = now.saturating_duration_since(started);
        if elapsed <= self.transition.duration {
            let raw_t = normalized_time(elapsed, self.transition.duration);
            let progress = self.transition.easing.evaluate(raw_t);
            self.write_frame(renderer, handle, progress);
            Ok(MorphTick::Running { progress })
        } else {
            self.write_end(renderer, handle);
            self.phase = MorphPhase::Completed;
            Ok(MorphTick::Completed)
        }
    }

    fn leg(&self, progress: f32) -> Leg<'_> {
        match &self.via {
            None => Leg {
                from: &self.start.positions,
                to: &self.end.positions,
                from_color: self.start.color,
                to_color: self.end.color,
                t: progress,
            },
            Some(via) if progress < 0.5 => Leg {
                from: &self.start.positions,
                to: &via.positions,
                from_color: self.start.color,
                to_color: via.color,
                t: 2.0 * progress,
            },
            Some(via) => Leg {
                from: &via.positions,
                to: &self.end.positions,
                from_color: via.color,
                to_color: self.end.color,
                t: 2.0 * (progress - 0.5),
            },
        }
    }

    fn write_frame<R: InstanceRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        handle: InstanceHandle,
        progress: f32,
    ) {
        let leg = self.leg(progress);
        for (i, (from, to)) in leg.from.iter().zip(leg.to).enumerate() {
            renderer.set_instance_transform(
                handle,
                i,
                lerp_vec3(leg.t, *from, *to),
            );
        }
        renderer.set_color(handle, lerp_vec3(leg.t, leg.from_color, leg.to_color));
        renderer.commit(handle);
    }

    fn write_end<R: InstanceRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        handle: InstanceHandle,
    ) {
        for (i, position) in self.end.positions.iter().enumerate() {
            renderer.set_instance_transform(handle, i, *position);
        }
        renderer.set_color(handle, self.end.color);
        renderer.commit(handle);
    }
}

impl std::fmt::Debug for MorphRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MorphRunner")
            .field("id", &self.id)
            .field("name", &self.transition.name())
            .field("start", &self.start.name)
            .field("end", &self.end.name)
            .field("instances", &self.start.len())
            .field("duration", &self.transition.duration)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}
