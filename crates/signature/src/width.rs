//! Velocity-to-width model and the per-stroke continuity context.

use signature_config::DisplayConfig;

use crate::constants::{
    DEFAULT_CARRIED_WIDTH, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH, VELOCITY_EXPONENT,
};
use crate::segment::SlidingWindow;

/// Maps a speed estimate to a stroke radius in device pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct WidthModel {
    display: DisplayConfig,
}

impl WidthModel {
    pub fn new(display: DisplayConfig) -> Self {
        Self { display }
    }

    /// `|velocity|^-0.375` clamped to `[1.0, 4.5]`, then scaled by density.
    ///
    /// Fast motion thins the line; a resting touch clamps to the maximum
    /// rather than diverging. A NaN velocity is treated as resting.
    pub fn radius(&self, velocity: f32) -> f32 {
        let raw = velocity.abs().powf(VELOCITY_EXPONENT);
        let clamped = if raw.is_nan() {
            MAX_STROKE_WIDTH
        } else {
            raw.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
        };
        self.display.to_device_units(clamped)
    }

    /// Smallest radius the model can produce
    pub fn min_radius(&self) -> f32 {
        self.display.to_device_units(MIN_STROKE_WIDTH)
    }

    /// Largest radius the model can produce
    pub fn max_radius(&self) -> f32 {
        self.display.to_device_units(MAX_STROKE_WIDTH)
    }
}

/// Carried state for the stroke currently being drawn.
///
/// Holds the live sliding window and the radius the previous arc ended on,
/// so consecutive arcs of one stroke join without a width jump. A fresh
/// context is used for every stroke, live or replayed.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeContext {
    pub window: SlidingWindow,
    pub carried_radius: f32,
}

impl Default for StrokeContext {
    fn default() -> Self {
        Self {
            window: SlidingWindow::new(),
            carried_radius: DEFAULT_CARRIED_WIDTH,
        }
    }
}

impl StrokeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the window and restore the default carried radius
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
