//! Visibility handling for MorphEngine

use super::MorphEngine;
use crate::animation::MorphId;
use crate::page::{VisibilityEvent, VisibilitySource};
use crate::renderer::InstanceRenderer;

impl<R: InstanceRenderer> MorphEngine<R> {
    /// Observe every configured section on `source`.
    pub fn start(&mut self, source: &mut dyn VisibilitySource) {
        for section in self.trigger.section_ids() {
            source.observe(section, self.visibility_threshold);
        }
        log::info!(
            "observing {} sections at threshold {}",
            self.trigger.section_ids().count(),
            self.visibility_threshold
        );
    }

    /// Stop observing `source`, cancel the running morph and clear the
    /// scene.
    pub fn stop(&mut self, source: &mut dyn VisibilitySource) {
        for section in self.trigger.section_ids() {
            source.unobserve(section);
        }
        self.cancel_active();
        self.pending = None;
        if let Some(handle) = self.displayed.take() {
            self.renderer.detach(handle);
        }
    }

    /// Feed a batch of visibility events, delivered together.
    ///
    /// Only entering events for mapped sections count, and the last one
    /// wins. Returns the id of the morph started, if any. Refused requests
    /// are logged.
    pub fn handle_visibility(
        &mut self,
        events: &[VisibilityEvent],
    ) -> Option<MorphId> {
        let request = self.trigger.resolve(events)?;
        match self.request(request) {
            Ok(id) => id,
            Err(e) => {
                log::warn!("morph refused: {e}");
                None
            }
        }
    }
}
