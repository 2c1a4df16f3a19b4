//! Unbounded point queue between the input thread and the render worker.
//!
//! Stroke boundaries travel through the queue alongside the samples, so the
//! consumer sees every interaction start, end and clear in the same order
//! the input produced them.

use crossbeam_channel::{Receiver, Sender, TryRecvError};

use crate::point::VelocityPoint;

/// One entry of the point queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokeEvent {
    /// Interaction with the given epoch started
    Begin(u64),
    /// Position sample of the current interaction
    Sample(VelocityPoint),
    /// Interaction with the given epoch ended
    End(u64),
    /// Everything drawn so far is erased
    Clear,
}

impl StrokeEvent {
    pub fn sample(&self) -> Option<VelocityPoint> {
        match self {
            Self::Sample(point) => Some(*point),
            _ => None,
        }
    }
}

/// FIFO of pending stroke events.
///
/// Any number of threads may push while one consumer pops. The queue never
/// blocks: an empty queue is reported immediately. Only one consumer drains
/// at a time; that is the render scheduler's job, not the queue's.
#[derive(Debug, Clone)]
pub struct PointQueue {
    tx: Sender<StrokeEvent>,
    rx: Receiver<StrokeEvent>,
}

impl Default for PointQueue {
    fn default() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }
}

impl PointQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample to the back of the queue
    pub fn push(&self, point: VelocityPoint) {
        self.push_event(StrokeEvent::Sample(point));
    }

    pub fn push_event(&self, event: StrokeEvent) {
        // Both halves live in `self`, so the channel cannot be disconnected.
        let _ = self.tx.send(event);
    }

    /// Take the next event in FIFO order, or `None` if the queue is empty
    pub fn pop(&self) -> Option<StrokeEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Discard everything queued. Returns how many events were dropped.
    pub fn clear(&self) -> usize {
        self.rx.try_iter().count()
    }
}
