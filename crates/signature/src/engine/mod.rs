//! Stroke rendering engine
//!
//! This module provides the engine that owns all drawing state:
//! - The open stroke and its sliding window (live segmentation)
//! - Width continuity between arcs of the same stroke
//! - The path history of committed strokes
//! - Raster allocation, decoration, replay and rescale
//!
//! The engine is driven from a single thread at a time (the render worker,
//! or the pad itself while no worker runs). The only state it shares with
//! the compositing side is the raster, guarded by [`Shared::lock_raster`].

mod surface_ops;

use std::sync::Arc;

use signature_config::{DisplayConfig, PadStyle};
use tracing::{debug, info};

use crate::arc::ArcRasterizer;
use crate::decoration::Decorations;
use crate::history::PathHistory;
use crate::point::Stroke;
use crate::queue::StrokeEvent;
use crate::segment::Triple;
use crate::shared::Shared;
use crate::width::{StrokeContext, WidthModel};

/// What one drain pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Samples taken off the queue and drawn
    pub pulled: usize,
    /// Samples taken off the queue and thrown away
    pub discarded: usize,
    /// Triples emitted by the sliding window, in order
    pub triples: Vec<Triple>,
    /// Strokes moved into the history during the pass
    pub committed: usize,
}

/// Owner of the open stroke, path history and raster contents
pub struct StrokeEngine {
    pub(crate) shared: Arc<Shared>,
    pub(crate) rasterizer: ArcRasterizer,
    pub(crate) decorations: Decorations,
    pub(crate) retain_on_resize: bool,
    /// Committed strokes
    pub(crate) history: PathHistory,
    /// Stroke currently receiving points
    pub(crate) open: Option<Stroke>,
    /// Window and carried width of the open stroke
    pub(crate) context: StrokeContext,
    /// Interaction the open stroke belongs to
    pub(crate) epoch: u64,
    /// Boundary event read while filling the window, handled next
    pub(crate) lookahead: Option<StrokeEvent>,
    /// Saved dimensions of restored strokes still waiting for a drawable surface
    pub(crate) pending_restore: Option<(u32, u32)>,
}

impl std::fmt::Debug for StrokeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeEngine")
            .field("committed", &self.history.len())
            .field("open_points", &self.open.as_ref().map(Vec::len))
            .field("epoch", &self.epoch)
            .field("pending_restore", &self.pending_restore)
            .finish()
    }
}

impl StrokeEngine {
    pub(crate) fn new(
        shared: Arc<Shared>,
        style: &PadStyle,
        display: &DisplayConfig,
        decorations: Decorations,
    ) -> Self {
        Self {
            shared,
            rasterizer: ArcRasterizer::new(WidthModel::new(*display), style.signature_color),
            decorations,
            retain_on_resize: style.retain_on_resize,
            history: PathHistory::new(),
            open: None,
            context: StrokeContext::new(),
            epoch: 0,
            lookahead: None,
            pending_restore: None,
        }
    }

    /// Committed strokes
    pub fn history(&self) -> &PathHistory {
        &self.history
    }

    /// Points of the stroke currently being drawn
    pub fn open_stroke(&self) -> Option<&Stroke> {
        self.open.as_ref()
    }

    /// Drain the point queue to empty.
    ///
    /// Events are handled in queue order: samples run through the sliding
    /// window and each emitted triple is drawn onto the raster, a begin
    /// marker starts a fresh stroke, an end marker commits it and a clear
    /// marker erases everything drawn before it.
    pub fn drain_pass(&mut self) -> PassReport {
        self.shared.pass_started();
        let report = self.process_queue(true);
        debug!(
            "StrokeEngine::drain_pass: pulled {} points, {} arcs, {} committed",
            report.pulled,
            report.triples.len(),
            report.committed
        );
        report
    }

    /// Empty the queue without drawing. Samples are dropped; stroke
    /// boundaries and clears are still honored.
    pub fn discard_pending(&mut self) -> PassReport {
        let report = self.process_queue(false);
        if report.discarded > 0 {
            debug!(
                "StrokeEngine::discard_pending: dropped {} queued points",
                report.discarded
            );
        }
        report
    }

    fn process_queue(&mut self, draw: bool) -> PassReport {
        let shared = Arc::clone(&self.shared);
        let mut report = PassReport::default();

        while let Some(event) = self.lookahead.take().or_else(|| shared.queue.pop()) {
            match event {
                StrokeEvent::Begin(epoch) => report.committed += self.begin_stroke(epoch),
                StrokeEvent::End(epoch) => report.committed += self.end_stroke(epoch),
                StrokeEvent::Clear => self.clear(),
                StrokeEvent::Sample(_) if !draw => report.discarded += 1,
                StrokeEvent::Sample(_) => {
                    self.lookahead = Some(event);
                    if let Some(triple) = self.step_window(&shared, &mut report.pulled) {
                        self.draw_live(&triple);
                        report.triples.push(triple);
                    }
                }
            }
        }

        report
    }

    /// One fill/shift iteration of the window. Pulls stop at the next
    /// boundary event, which stays in the lookahead.
    fn step_window(&mut self, shared: &Shared, pulled: &mut usize) -> Option<Triple> {
        if self.open.is_none() {
            debug!("StrokeEngine: samples without a begin marker, opening stroke");
            self.context.reset();
            self.epoch = shared.epoch();
        }

        let lookahead = &mut self.lookahead;
        let stroke = self.open.get_or_insert_with(Vec::new);
        self.context.window.step(|| {
            match lookahead.take().or_else(|| shared.queue.pop()) {
                Some(StrokeEvent::Sample(point)) => {
                    stroke.push(point);
                    *pulled += 1;
                    Some(point)
                }
                other => {
                    *lookahead = other;
                    None
                }
            }
        })
    }

    /// Open a fresh stroke for interaction `epoch`. A stroke left open by an
    /// earlier interaction is committed first. Returns the number of strokes
    /// committed.
    fn begin_stroke(&mut self, epoch: u64) -> usize {
        let committed = match self.open.take() {
            Some(stale) => {
                let committed = self.commit_stroke(stale);
                self.shared.settle(self.epoch);
                committed
            }
            None => 0,
        };
        self.epoch = epoch;
        self.context.reset();
        self.open = Some(Vec::new());
        debug!("StrokeEngine: began stroke for interaction {}", epoch);
        committed
    }

    /// Commit the open stroke of interaction `epoch` and reset the window
    fn end_stroke(&mut self, epoch: u64) -> usize {
        let committed = match self.open.take() {
            Some(stroke) => self.commit_stroke(stroke),
            None => 0,
        };
        self.context.reset();
        self.shared.settle(epoch);
        committed
    }

    /// Draw a live triple with the open stroke's carried width
    fn draw_live(&mut self, triple: &Triple) {
        if !self.sync_surface() {
            debug!("StrokeEngine::draw_live: surface not drawable, arc skipped");
            return;
        }

        let mut raster = self.shared.lock_raster();
        if let Some(raster) = raster.as_mut() {
            self.rasterizer
                .draw(raster, triple, &mut self.context.carried_radius);
        }
    }

    fn commit_stroke(&mut self, stroke: Stroke) -> usize {
        if stroke.is_empty() {
            debug!("StrokeEngine: dropped empty stroke");
            return 0;
        }

        info!(
            "StrokeEngine: committed stroke {} ({} points)",
            self.history.len(),
            stroke.len()
        );
        self.history.commit(stroke);
        self.shared.set_committed(self.history.len());
        1
    }
}
