//! Animation system for shape morphs.
//!
//! A [`MorphRunner`] drives one morph, the [`TickScheduler`] decides which
//! runner is ticked on the next frame, and the [`SectionTrigger`] turns page
//! visibility into [`MorphRequest`]s.

pub(crate) mod interpolation;
mod runner;
mod scheduler;
pub mod transition;
mod trigger;

pub use runner::{MorphFrame, MorphPhase, MorphRunner, MorphTick};
pub use scheduler::{MorphId, TickScheduler};
pub use transition::{BounceColor, Transition, TransitionKind};
pub use trigger::{MorphRequest, SectionTrigger};
