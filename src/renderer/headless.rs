//! In-memory [`InstanceRenderer`] that records recent frames.
//!
//! Keeps staged and committed copies of each instance set the way a GPU
//! renderer keeps CPU staging data and uploaded buffers, and snapshots which
//! sets were attached at each render. Writes to a dead handle are counted
//! instead of applied.

use glam::Vec3;
use rustc_hash::FxHashMap;

use super::{InstanceHandle, InstanceRenderer};
use crate::camera::core::Camera;
use crate::error::MorphError;

/// One instance set's staged and committed data.
#[derive(Debug, Clone)]
struct HeadlessSet {
    staged_positions: Vec<Vec3>,
    staged_color: Vec3,
    positions: Vec<Vec3>,
    color: Vec3,
    writes: usize,
}

/// What one `render` call showed.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameRecord {
    /// Attached sets, in attach order.
    pub attached: Vec<InstanceHandle>,
    /// Camera eye position.
    pub eye: Vec3,
    /// Camera look-at target.
    pub target: Vec3,
}

/// Renderer that keeps instance data in memory.
///
/// Frame history is bounded: at least the last
/// [`FRAME_HISTORY`](Self::FRAME_HISTORY) frames are kept, older ones are
/// dropped in batches.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    sets: FxHashMap<InstanceHandle, HeadlessSet>,
    attached: Vec<InstanceHandle>,
    frames: Vec<FrameRecord>,
    frame_count: usize,
    next_handle: u64,
    rejected_writes: usize,
}

impl HeadlessRenderer {
    /// Minimum number of recent frames kept in [`frames`](Self::frames).
    pub const FRAME_HISTORY: usize = 4096;

    /// Empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed positions of a live set.
    #[must_use]
    pub fn committed_positions(&self, handle: InstanceHandle) -> Option<&[Vec3]> {
        self.sets.get(&handle).map(|set| set.positions.as_slice())
    }

    /// Committed color of a live set.
    #[must_use]
    pub fn committed_color(&self, handle: InstanceHandle) -> Option<Vec3> {
        self.sets.get(&handle).map(|set| set.color)
    }

    /// Number of accepted writes (transform or color) to a set. Zero once the
    /// set is released.
    #[must_use]
    pub fn write_count(&self, handle: InstanceHandle) -> usize {
        self.sets.get(&handle).map_or(0, |set| set.writes)
    }

    /// Writes and commits aimed at released or unknown handles.
    #[must_use]
    pub fn rejected_writes(&self) -> usize {
        self.rejected_writes
    }

    /// Currently attached sets, in attach order.
    #[must_use]
    pub fn attached(&self) -> &[InstanceHandle] {
        &self.attached
    }

    /// Number of live (created, not yet detached) sets.
    #[must_use]
    pub fn live_sets(&self) -> usize {
        self.sets.len()
    }

    /// Recent frames, oldest first. Holds every frame until more than
    /// `2 * FRAME_HISTORY` have been rendered.
    #[must_use]
    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    /// Total number of render calls, including trimmed frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// The most recent frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&FrameRecord> {
        self.frames.last()
    }

    fn live_set(&mut self, handle: InstanceHandle) -> Option<&mut HeadlessSet> {
        let set = self.sets.get_mut(&handle);
        if set.is_none() {
            self.rejected_writes += 1;
            log::trace!("write to released instance set {handle}");
        }
        set
    }
}

impl InstanceRenderer for HeadlessRenderer {
    fn create_instance_set(
        &mut self,
        positions: &[Vec3],
        color: Vec3,
    ) -> InstanceHandle {
        self.next_handle += 1;
        let handle = InstanceHandle::from_raw(self.next_handle);
        let _ = self.sets.insert(
            handle,
            HeadlessSet {
                staged_positions: positions.to_vec(),
                staged_color: color,
                positions: positions.to_vec(),
                color,
                writes: 0,
            },
        );
        handle
    }

    fn set_instance_transform(
        &mut self,
        handle: InstanceHandle,
        index: usize,
        position: Vec3,
    ) {
        if let Some(set) = self.live_set(handle) {
            if let Some(slot) = set.staged_positions.get_mut(index) {
                *slot = position;
                set.writes += 1;
            }
        }
    }

    fn set_color(&mut self, handle: InstanceHandle, color: Vec3) {
        if let Some(set) = self.live_set(handle) {
            set.staged_color = color;
            set.writes += 1;
        }
    }

    fn commit(&mut self, handle: InstanceHandle) {
        if let Some(set) = self.live_set(handle) {
            set.positions.clone_from(&set.staged_positions);
            set.color = set.staged_color;
        }
    }

    fn attach(&mut self, handle: InstanceHandle) {
        if self.sets.contains_key(&handle) && !self.attached.contains(&handle) {
            self.attached.push(handle);
        }
    }

    fn detach(&mut self, handle: InstanceHandle) {
        self.attached.retain(|attached| *attached != handle);
        let _ = self.sets.remove(&handle);
    }

    fn render(&mut self, camera: &Camera) -> Result<(), MorphError> {
        if self.frames.len() >= 2 * Self::FRAME_HISTORY {
            let _ = self.frames.drain(..Self::FRAME_HISTORY);
        }
        self.frame_count += 1;
        self.frames.push(FrameRecord {
            attached: self.attached.clone(),
            eye: camera.eye,
            target: camera.target,
        });
        Ok(())
    }
}
