//! Signature pad - incremental stroke rendering
//!
//! This crate turns a stream of velocity-tagged touch samples into ink on a
//! persistent raster:
//! - [`queue::PointQueue`] - Lock-free handoff of samples and stroke boundaries
//! - [`segment`] - Sliding-window segmentation into point triples
//! - [`width::WidthModel`] - Velocity-dependent stroke width
//! - [`curve::ArcCurve`] - Cubic fit sampled at unit arc length
//! - [`arc::ArcRasterizer`] - Variable-radius disc stamping
//! - [`raster::Raster`] - Persistent RGBA raster that accumulates the ink
//! - [`history::PathHistory`] - Committed strokes, replayed on resize
//! - [`engine::StrokeEngine`] - Drain passes, commit, rescale and restore
//! - [`scheduler::RenderScheduler`] - Background render worker
//! - [`pad::SignaturePad`] - Host-facing facade

pub mod arc;
pub mod constants;
pub mod curve;
pub mod decoration;
pub mod engine;
pub mod history;
pub mod pad;
pub mod point;
pub mod queue;
pub mod raster;
pub mod scheduler;
pub mod segment;
mod shared;
pub mod state;
pub mod surface;
pub mod width;

pub use arc::*;
pub use constants::*;
pub use curve::*;
pub use decoration::*;
pub use engine::*;
pub use history::*;
pub use pad::*;
pub use point::*;
pub use queue::*;
pub use raster::*;
pub use scheduler::*;
pub use segment::*;
pub use state::*;
pub use surface::*;
pub use width::*;

pub use signature_config::{DisplayConfig, LabelStyle, PadStyle, UnderlineStyle};
