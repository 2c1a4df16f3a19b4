//! Shared configuration for the signature pad
//!
//! This crate provides the single source of truth for the styling options
//! consumed once when a pad is created (colors, underline, label, retain
//! behavior) and for the display density used to convert density-independent
//! magnitudes into device pixels.

use serde::{Deserialize, Serialize};

/// Default background fill (opaque white)
pub const DEFAULT_BACKGROUND_COLOR: u32 = 0xffff_ffff;

/// Default ink color
pub const DEFAULT_SIGNATURE_COLOR: u32 = 0xff2d_2d2d;

/// Default underline color
pub const DEFAULT_UNDERLINE_COLOR: u32 = 0xff4d_4d4d;

/// Default underline thickness in device pixels
pub const DEFAULT_UNDERLINE_THICKNESS: f32 = 2.0;

/// Default label color
pub const DEFAULT_LABEL_COLOR: u32 = 0xff4d_4d4d;

/// Default label text size in density-independent units
pub const DEFAULT_LABEL_TEXT_SIZE: f32 = 15.0;

/// Default pixel density (1.0 = one device pixel per unit)
pub const DEFAULT_DENSITY: f32 = 1.0;

/// Convert a packed `0xAARRGGBB` color into RGBA components in `0.0..=1.0`.
pub fn rgba_from_argb(argb: u32) -> [f32; 4] {
    let channel = |shift: u32| ((argb >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), channel(24)]
}

/// Baseline rule drawn under the signature area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnderlineStyle {
    /// Whether the rule is drawn at all
    pub enabled: bool,
    /// RGBA color
    pub color: [f32; 4],
    /// Line thickness in device pixels
    pub thickness: f32,
}

impl Default for UnderlineStyle {
    fn default() -> Self {
        Self {
            enabled: true,
            color: rgba_from_argb(DEFAULT_UNDERLINE_COLOR),
            thickness: DEFAULT_UNDERLINE_THICKNESS,
        }
    }
}

/// Caption drawn centered beneath the rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    pub text: String,
    /// RGBA color
    pub color: [f32; 4],
    /// Text size in density-independent units
    pub size: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: rgba_from_argb(DEFAULT_LABEL_COLOR),
            size: DEFAULT_LABEL_TEXT_SIZE,
        }
    }
}

impl LabelStyle {
    /// Create a label with default color and size
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Visual styling for a signature pad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PadStyle {
    /// Fill drawn behind the ink on every composed frame
    pub background_color: [f32; 4],
    /// Ink color
    pub signature_color: [f32; 4],
    pub underline: UnderlineStyle,
    /// Optional caption; `None` draws no label
    pub label: Option<LabelStyle>,
    /// Rescale and replay the signature when the surface is resized.
    /// When disabled a resize clears the pad and state is never persisted.
    pub retain_on_resize: bool,
}

impl Default for PadStyle {
    fn default() -> Self {
        Self {
            background_color: rgba_from_argb(DEFAULT_BACKGROUND_COLOR),
            signature_color: rgba_from_argb(DEFAULT_SIGNATURE_COLOR),
            underline: UnderlineStyle::default(),
            label: None,
            retain_on_resize: true,
        }
    }
}

/// Display metrics of the host surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Device pixels per density-independent unit
    pub density: f32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
        }
    }
}

impl DisplayConfig {
    /// Create a display config with the given density.
    /// Non-finite or non-positive densities fall back to the default.
    pub fn new(density: f32) -> Self {
        let density = if density.is_finite() && density > 0.0 {
            density
        } else {
            DEFAULT_DENSITY
        };
        Self { density }
    }

    /// Convert a density-independent magnitude to device pixels
    #[inline]
    pub fn to_device_units(&self, value: f32) -> f32 {
        value * self.density
    }
}
