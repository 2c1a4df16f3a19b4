//! Signature pad facade
//!
//! [`SignaturePad`] is what a host embeds. It wires the input handle, the
//! render worker and the compositing side together:
//!
//! - Input goes through [`PadInput`], a cheap clonable handle that only
//!   touches the point queue and interaction flags
//! - While active, a background [`RenderScheduler`] owns the stroke engine
//!   and all rasterization
//! - Frame composition reads the raster under its lock and schedules a drain
//!   pass when work is waiting
//!
//! While inactive the engine lives on the pad itself and host calls such as
//! [`SignaturePad::clear`] are applied directly.

use std::sync::Arc;

use image::RgbaImage;
use signature_config::{DisplayConfig, PadStyle};
use tracing::{debug, info, warn};

use crate::decoration::{Decorations, LabelPainter};
use crate::engine::StrokeEngine;
use crate::point::VelocityPoint;
use crate::queue::StrokeEvent;
use crate::raster::{Raster, to_rgba8};
use crate::scheduler::{RenderJob, RenderScheduler, SchedulerError};
use crate::shared::Shared;
use crate::state::PadState;

/// Input collaborator handle.
///
/// Safe to call from the input thread while the render worker drains.
#[derive(Debug, Clone)]
pub struct PadInput {
    shared: Arc<Shared>,
}

impl PadInput {
    /// Touch down: a new stroke begins.
    pub fn on_interaction_start(&self) {
        self.shared.begin_interaction();
        debug!("PadInput: interaction started");
    }

    /// One position sample with its velocity estimate
    pub fn on_sample(&self, x: f32, y: f32, velocity: f32) {
        self.shared.queue.push(VelocityPoint::new(x, y, velocity));
    }

    /// Historical sub-samples delivered with one event, oldest first. They
    /// share the event's velocity estimate.
    pub fn on_samples(&self, positions: &[(f32, f32)], velocity: f32) {
        for &(x, y) in positions {
            self.on_sample(x, y, velocity);
        }
    }

    /// Touch up. Does not cancel a pass in flight.
    pub fn on_interaction_end(&self) {
        self.shared.end_interaction();
        debug!("PadInput: interaction ended");
    }
}

/// Incremental signature capture surface
pub struct SignaturePad {
    shared: Arc<Shared>,
    style: PadStyle,
    display: DisplayConfig,
    decorations: Decorations,
    /// Engine while no worker runs
    engine: Option<StrokeEngine>,
    scheduler: Option<RenderScheduler>,
}

impl std::fmt::Debug for SignaturePad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignaturePad")
            .field("active", &self.is_active())
            .field("surface", &self.shared.surface.raw())
            .field("has_ink", &self.has_ink())
            .finish()
    }
}

impl SignaturePad {
    /// Create an inactive pad. `style` and `display` are read once here.
    pub fn new(style: PadStyle, display: DisplayConfig) -> Self {
        let shared = Arc::new(Shared::default());
        let decorations = Decorations::new(&style, &display);
        let engine = StrokeEngine::new(
            Arc::clone(&shared),
            &style,
            &display,
            decorations.clone(),
        );
        Self {
            shared,
            style,
            display,
            decorations,
            engine: Some(engine),
            scheduler: None,
        }
    }

    /// Render the caption with `painter`.
    pub fn with_label_painter(mut self, painter: Arc<dyn LabelPainter>) -> Self {
        self.decorations = self.decorations.clone().with_label_painter(painter);
        if let Some(engine) = self.engine.as_mut() {
            engine.decorations = self.decorations.clone();
        }
        self
    }

    fn new_engine(&self) -> StrokeEngine {
        StrokeEngine::new(
            Arc::clone(&self.shared),
            &self.style,
            &self.display,
            self.decorations.clone(),
        )
    }

    /// Handle for the input collaborator
    pub fn input(&self) -> PadInput {
        PadInput {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn on_interaction_start(&self) {
        self.input().on_interaction_start();
    }

    pub fn on_sample(&self, x: f32, y: f32, velocity: f32) {
        self.input().on_sample(x, y, velocity);
    }

    pub fn on_samples(&self, positions: &[(f32, f32)], velocity: f32) {
        self.input().on_samples(positions, velocity);
    }

    pub fn on_interaction_end(&self) {
        self.input().on_interaction_end();
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_some()
    }

    /// Start the render worker. Does nothing if it already runs.
    pub fn activate(&mut self) -> Result<(), SchedulerError> {
        if self.scheduler.is_some() {
            return Ok(());
        }

        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => self.new_engine(),
        };
        let scheduler = match RenderScheduler::spawn(engine) {
            Ok(scheduler) => scheduler,
            Err(err) => {
                warn!("SignaturePad::activate: {}", err);
                self.reset_after_loss();
                return Err(err);
            }
        };

        if let Err(err) = scheduler.post(RenderJob::SyncSurface) {
            warn!("SignaturePad::activate: {}", err);
        }
        self.scheduler = Some(scheduler);
        info!("SignaturePad: activated");
        Ok(())
    }

    /// Stop the render worker. Points not yet drained are discarded; clears,
    /// restores and stroke boundaries posted before still take effect.
    pub fn deactivate(&mut self) -> Result<(), SchedulerError> {
        let Some(scheduler) = self.scheduler.take() else {
            return Ok(());
        };

        match scheduler.stop() {
            Ok(mut engine) => {
                engine.discard_pending();
                self.engine = Some(engine);
                self.shared.pass_started();
                info!("SignaturePad: deactivated");
                Ok(())
            }
            Err(err) => {
                warn!("SignaturePad::deactivate: {}, drawing state lost", err);
                self.reset_after_loss();
                Err(err)
            }
        }
    }

    /// The engine is gone; start over with an empty one.
    fn reset_after_loss(&mut self) {
        *self.shared.lock_raster() = None;
        self.shared.queue.clear();
        if self.shared.is_drawing() {
            self.shared
                .queue
                .push_event(StrokeEvent::Begin(self.shared.epoch()));
        } else {
            self.shared.settle_all();
        }
        self.shared.set_committed(0);
        self.shared.pass_started();
        self.engine = Some(self.new_engine());
    }

    /// Report the host surface size. Any change reallocates the raster and
    /// rescales the signature; zero in either dimension suspends drawing.
    pub fn set_surface_size(&mut self, width: u32, height: u32) {
        if self.shared.surface.raw() == (width, height) {
            return;
        }
        self.shared.surface.set(width, height);
        debug!("SignaturePad: surface size {}x{}", width, height);

        if let Some(scheduler) = &self.scheduler {
            if let Err(err) = scheduler.post(RenderJob::SyncSurface) {
                warn!("SignaturePad::set_surface_size: {}", err);
            }
        } else if let Some(engine) = self.engine.as_mut() {
            engine.sync_surface();
        }
    }

    /// Frame composition.
    ///
    /// Schedules a drain pass when stroke events are queued, then hands the
    /// raster to `compose` under its lock. `compose` receives None while no raster is allocated.
    pub fn on_frame<R>(&self, compose: impl FnOnce(Option<&Raster>) -> R) -> R {
        self.schedule_pass();
        let raster = self.shared.lock_raster();
        compose(raster.as_ref())
    }

    fn schedule_pass(&self) {
        let Some(scheduler) = &self.scheduler else {
            return;
        };
        if self.shared.needs_pass() && self.shared.try_queue_pass() {
            if let Err(err) = scheduler.post(RenderJob::Pass) {
                warn!("SignaturePad: failed to schedule pass: {}", err);
                self.shared.pass_started();
            }
        }
    }

    /// Process everything queued so far and wait for it to finish.
    ///
    /// Runs the pass on the worker when active, on the calling thread
    /// otherwise.
    pub fn flush(&mut self) -> Result<(), SchedulerError> {
        if let Some(scheduler) = &self.scheduler {
            self.schedule_pass();
            return scheduler.wait_idle();
        }
        if let Some(engine) = self.engine.as_mut() {
            engine.drain_pass();
        }
        Ok(())
    }

    /// The background fill with the current ink drawn over it, at the
    /// current surface size.
    ///
    /// Always a new image; repeated calls without new input are identical.
    /// Right after a resize the worker may not have replayed yet; the last
    /// raster is then shown unscaled on the new canvas.
    pub fn snapshot(&self) -> RgbaImage {
        let background = self.style.background_color;
        let (width, height) = self.shared.surface.raw();
        match self.shared.lock_raster().as_ref() {
            Some(raster) => raster.composite_over(background, width, height),
            None => RgbaImage::from_pixel(width, height, to_rgba8(background)),
        }
    }

    /// Erase the signature. Queued points are discarded. An interaction in
    /// progress keeps drawing onto the cleared pad.
    pub fn clear(&mut self) {
        let dropped = self.shared.queue.clear();
        debug!("SignaturePad::clear: discarded {} queued events", dropped);

        self.shared.queue.push_event(StrokeEvent::Clear);
        if self.shared.is_drawing() {
            self.shared
                .queue
                .push_event(StrokeEvent::Begin(self.shared.epoch()));
        } else {
            self.shared.settle_all();
        }
        self.shared.set_committed(0);

        // Handled ahead of any restore posted after this
        if let Some(scheduler) = &self.scheduler {
            if let Err(err) = scheduler.post(RenderJob::Pass) {
                warn!("SignaturePad::clear: {}", err);
            }
        } else if let Some(engine) = self.engine.as_mut() {
            engine.drain_pass();
        }
    }

    /// True once anything has been drawn since the last clear
    pub fn has_ink(&self) -> bool {
        self.shared.has_ink()
    }

    /// Snapshot the committed strokes and surface size. None when the pad
    /// does not retain its signature across resizes.
    pub fn save_state(&self) -> Option<PadState> {
        if let Some(scheduler) = &self.scheduler {
            return scheduler.save_state().unwrap_or_else(|err| {
                warn!("SignaturePad::save_state: {}", err);
                None
            });
        }
        self.engine.as_ref().and_then(StrokeEngine::save_state)
    }

    /// Re-seed the history from a saved state. The strokes are rescaled from
    /// the saved size once the surface size is known.
    pub fn restore_state(&mut self, state: PadState) {
        if let Some(scheduler) = &self.scheduler {
            if let Err(err) = scheduler.post(RenderJob::Restore(state)) {
                warn!("SignaturePad::restore_state: {}", err);
            }
        } else if let Some(engine) = self.engine.as_mut() {
            engine.restore(state);
        }
    }
}

impl Drop for SignaturePad {
    fn drop(&mut self) {
        let _ = self.deactivate();
    }
}
