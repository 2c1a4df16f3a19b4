//! State shared between the input/compositing thread and the render worker.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::queue::{PointQueue, StrokeEvent};
use crate::raster::Raster;
use crate::surface::SurfaceSize;

/// Everything both threads touch.
///
/// The raster is the only resource written by the worker and read by the
/// compositor; both sides go through [`Shared::lock_raster`]. The rest are
/// the queue and small flags.
///
/// Interactions are numbered. A stroke is open while the newest interaction
/// number is ahead of the highest settled one; settling only ever moves
/// forward, so a worker finishing stroke `n` cannot close stroke `n + 1`.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub queue: PointQueue,
    pub surface: SurfaceSize,
    raster: Mutex<Option<Raster>>,
    /// An interaction is in progress (touch down, not yet lifted)
    drawing: AtomicBool,
    /// Number of the most recently started interaction
    began: AtomicU64,
    /// Highest interaction number whose stroke was committed or discarded
    settled: AtomicU64,
    /// Number of strokes in the path history
    committed: AtomicUsize,
    /// A drain pass is queued on the worker and has not started yet
    pass_queued: AtomicBool,
}

impl Shared {
    /// Lock the raster. A poisoned lock still guards a valid pixel buffer,
    /// so the guard is recovered rather than propagated.
    pub fn lock_raster(&self) -> MutexGuard<'_, Option<Raster>> {
        self.raster.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a new interaction and mark its boundary in the queue
    pub fn begin_interaction(&self) -> u64 {
        let epoch = self.began.fetch_add(1, Ordering::AcqRel) + 1;
        self.drawing.store(true, Ordering::Release);
        self.queue.push_event(StrokeEvent::Begin(epoch));
        epoch
    }

    /// End the current interaction and mark its boundary in the queue
    pub fn end_interaction(&self) {
        self.drawing.store(false, Ordering::Release);
        self.queue.push_event(StrokeEvent::End(self.epoch()));
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing.load(Ordering::Acquire)
    }

    /// Number of the most recently started interaction
    pub fn epoch(&self) -> u64 {
        self.began.load(Ordering::Acquire)
    }

    /// Mark the stroke of interaction `epoch`, and every earlier one, as
    /// no longer open
    pub fn settle(&self, epoch: u64) {
        self.settled.fetch_max(epoch, Ordering::AcqRel);
    }

    /// Mark every interaction started so far as no longer open
    pub fn settle_all(&self) {
        self.settle(self.epoch());
    }

    pub fn is_stroke_open(&self) -> bool {
        self.epoch() > self.settled.load(Ordering::Acquire)
    }

    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::Acquire)
    }

    pub fn set_committed(&self, count: usize) {
        self.committed.store(count, Ordering::Release);
    }

    /// True if a stroke is open or any stroke has been committed
    pub fn has_ink(&self) -> bool {
        self.is_stroke_open() || self.committed() > 0
    }

    /// Events are waiting in the queue
    pub fn needs_pass(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Mark a pass as queued. Returns false if one already was.
    pub fn try_queue_pass(&self) -> bool {
        !self.pass_queued.swap(true, Ordering::AcqRel)
    }

    pub fn pass_started(&self) {
        self.pass_queued.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_flags() {
        let shared = Shared::default();
        assert!(!shared.has_ink());
        assert!(!shared.needs_pass());

        let epoch = shared.begin_interaction();
        assert_eq!(epoch, 1);
        assert!(shared.is_drawing());
        assert!(shared.has_ink());
        assert_eq!(shared.queue.pop(), Some(StrokeEvent::Begin(1)));
        assert!(!shared.needs_pass());

        shared.end_interaction();
        assert!(!shared.is_drawing());
        assert_eq!(shared.queue.pop(), Some(StrokeEvent::End(1)));

        shared.settle(epoch);
        assert!(!shared.has_ink());

        shared.set_committed(1);
        assert!(shared.has_ink());
    }

    #[test]
    fn test_settling_old_stroke_keeps_new_one_open() {
        let shared = Shared::default();
        let first = shared.begin_interaction();
        shared.end_interaction();
        let second = shared.begin_interaction();

        // Worker finishes the first stroke after the second began
        shared.settle(first);
        assert!(shared.is_stroke_open());
        assert!(shared.has_ink());

        shared.settle(second);
        assert!(!shared.is_stroke_open());
        // Settling never moves backwards
        shared.settle(first);
        assert!(!shared.is_stroke_open());
    }

    #[test]
    fn test_pass_queued_once() {
        let shared = Shared::default();
        assert!(shared.try_queue_pass());
        assert!(!shared.try_queue_pass());
        shared.pass_started();
        assert!(shared.try_queue_pass());
    }
}
