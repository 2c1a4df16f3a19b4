/// Exponent applied to |velocity| by the width model. Negative so faster
/// motion gives a thinner line.
pub const VELOCITY_EXPONENT: f32 = -0.375;

/// Lower bound of the width model in density-independent units.
pub const MIN_STROKE_WIDTH: f32 = 1.0;

/// Upper bound of the width model in density-independent units.
/// Near-zero velocities clamp here instead of diverging.
pub const MAX_STROKE_WIDTH: f32 = 4.5;

/// Carried width at the start of every stroke (device pixels).
pub const DEFAULT_CARRIED_WIDTH: f32 = 1.0;

/// Schema version of the persisted pad state.
pub const PAD_STATE_VERSION: u32 = 1;

/// Label baseline, as a fraction of the surface height.
pub const LABEL_BASELINE_FRACTION: f32 = 0.93;

/// Underline position before the label offset, as a fraction of the height.
pub const UNDERLINE_Y_FRACTION: f32 = 0.9;

/// Horizontal inset of the underline on each side, as a fraction of the width.
pub const UNDERLINE_INSET_FRACTION: f32 = 0.1;

/// Number of straight pieces a curve is flattened into per pixel of its
/// control polygon length before arc-length sampling.
pub const FLATTEN_SEGMENTS_PER_PIXEL: f32 = 2.0;

/// Cap on flattening pieces for a single curve.
pub const MAX_FLATTEN_SEGMENTS: usize = 4096;
