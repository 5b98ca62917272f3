//! Morph methods for MorphEngine

use glam::Vec3;
use rand::Rng;
use web_time::Instant;

use super::{ActiveMorph, MorphEngine, Shapes};
use crate::animation::{
    BounceColor, MorphId, MorphRequest, MorphRunner, MorphTick,
};
use crate::error::MorphError;
use crate::renderer::InstanceRenderer;
use crate::shape::noise_positions;

/// What a due tick did, decided while the active morph is borrowed.
enum TickOutcome {
    Continue,
    Completed,
    Dropped,
}

impl<R: InstanceRenderer> MorphEngine<R> {
    /// Start the morph `request` describes, superseding any running morph.
    ///
    /// Before shapes have loaded the request is kept and started on the
    /// first frame after they resolve (`Ok(None)`); a later request replaces
    /// it. After a failed load requests are dropped.
    ///
    /// The new instance set is created and attached before the previous
    /// morph's tick is withdrawn and its set detached, so no frame is drawn
    /// with an empty scene.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::UnknownShape`] or [`MorphError::ShapeMismatch`]
    /// if the morph cannot be built. The running morph and displayed set are
    /// left untouched in that case.
    pub fn request(
        &mut self,
        request: MorphRequest,
    ) -> Result<Option<MorphId>, MorphError> {
        match self.shapes {
            Shapes::Loading(_) => {
                log::debug!("shapes still loading, deferring {request:?}");
                self.pending = Some(request);
                return Ok(None);
            }
            Shapes::Failed => {
                log::debug!("shapes failed to load, dropping {request:?}");
                return Ok(None);
            }
            Shapes::Ready(_) => {}
        }
        let runner = self.build_runner(&request)?;

        let id = runner.id();
        let start = runner.start_shape();
        let handle = self
            .renderer
            .create_instance_set(&start.positions, start.color);
        self.renderer.attach(handle);

        if let Some(mut previous) = self.active.take() {
            let _ = self.scheduler.cancel(previous.runner.id());
            previous.runner.cancel();
            log::debug!("morph {} superseded by {id}", previous.runner.id());
        }
        if let Some(old) = self.displayed.replace(handle) {
            self.renderer.detach(old);
        }

        log::info!(
            "morph {id}: {} {} -> {} over {:?}",
            runner.transition().name(),
            request.source(),
            request.target(),
            runner.transition().duration,
        );
        self.scheduler.request(id);
        self.active = Some(ActiveMorph {
            runner,
            request,
            handle,
        });
        self.next_id = id.next();
        Ok(Some(id))
    }

    fn build_runner(
        &mut self,
        request: &MorphRequest,
    ) -> Result<MorphRunner, MorphError> {
        let Shapes::Ready(store) = &self.shapes else {
            return Err(MorphError::UnknownShape(request.source().to_owned()));
        };
        let id = self.next_id;
        match request {
            MorphRequest::Directed { from, to } => MorphRunner::directed(
                id,
                self.morph.directed(),
                store.require(from)?,
                store.require(to)?,
            ),
            MorphRequest::Bounce { shape } => {
                let shape = store.require(shape)?;
                let noise = noise_positions(&shape, &mut self.rng);
                let noise_color = match self.morph.bounce_color {
                    BounceColor::Hold => shape.color,
                    BounceColor::Random => Vec3::new(
                        self.rng.random(),
                        self.rng.random(),
                        self.rng.random(),
                    ),
                };
                MorphRunner::bounce(
                    id,
                    self.morph.bounce(),
                    shape,
                    noise,
                    noise_color,
                )
            }
        }
    }

    /// Run this frame's due ticks. Ticks whose morph was superseded are
    /// dropped without touching the renderer.
    pub(super) fn tick_morphs(&mut self, now: Instant) {
        for id in self.scheduler.take_due() {
            let outcome = match self.active.as_mut() {
                Some(active) if active.runner.id() == id => {
                    match active.runner.tick(now, &mut self.renderer, active.handle)
                    {
                        Ok(MorphTick::Running { .. }) => TickOutcome::Continue,
                        Ok(MorphTick::Completed) => TickOutcome::Completed,
                        Err(MorphError::StaleTick(stale)) => {
                            log::trace!("dropping stale tick for morph {stale}");
                            TickOutcome::Dropped
                        }
                        Err(e) => {
                            log::warn!("morph {id} tick failed: {e}");
                            TickOutcome::Dropped
                        }
                    }
                }
                _ => {
                    log::trace!("dropping stale tick for morph {id}");
                    TickOutcome::Dropped
                }
            };

            match outcome {
                TickOutcome::Continue => self.scheduler.request(id),
                TickOutcome::Completed => self.complete_active(),
                TickOutcome::Dropped => {}
            }
        }
    }

    fn complete_active(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.trigger.record_completion(&active.request);
        log::info!(
            "morph {} complete, displaying {}",
            active.runner.id(),
            self.trigger.displayed()
        );
    }

    /// Withdraw the running morph, if any. Its set stays attached.
    pub(super) fn cancel_active(&mut self) {
        if let Some(mut active) = self.active.take() {
            let _ = self.scheduler.cancel(active.runner.id());
            active.runner.cancel();
        }
        self.scheduler.clear();
    }
}
