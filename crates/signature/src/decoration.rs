//! Fixed decorative pass re-applied to every freshly allocated raster:
//! the baseline rule and the caption beneath it.

use std::fmt;
use std::sync::Arc;

use signature_config::{DisplayConfig, LabelStyle, PadStyle, UnderlineStyle};
use tracing::debug;

use crate::constants::{LABEL_BASELINE_FRACTION, UNDERLINE_INSET_FRACTION, UNDERLINE_Y_FRACTION};
use crate::raster::Raster;

/// Glyph rasterization supplied by the host.
///
/// The pad only knows where the caption goes; turning text into pixels is
/// left to whoever owns the fonts.
pub trait LabelPainter: Send + Sync {
    /// Bounds `(width, height)` of `text` at `size` device pixels
    fn measure(&self, text: &str, size: f32) -> (f32, f32);

    /// Paint `text` with its left edge at `x` and its baseline at `baseline`
    fn paint(
        &self,
        raster: &mut Raster,
        text: &str,
        x: f32,
        baseline: f32,
        size: f32,
        color: [f32; 4],
    );
}

/// Resolved decoration settings
#[derive(Clone)]
pub struct Decorations {
    underline: UnderlineStyle,
    label: Option<LabelStyle>,
    /// Label text size converted to device pixels
    label_size: f32,
    painter: Option<Arc<dyn LabelPainter>>,
}

impl fmt::Debug for Decorations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decorations")
            .field("underline", &self.underline)
            .field("label", &self.label)
            .field("label_size", &self.label_size)
            .field("has_painter", &self.painter.is_some())
            .finish()
    }
}

impl Decorations {
    pub fn new(style: &PadStyle, display: &DisplayConfig) -> Self {
        let label_size = style
            .label
            .as_ref()
            .map(|label| display.to_device_units(label.size))
            .unwrap_or(0.0);
        Self {
            underline: style.underline.clone(),
            label: style.label.clone(),
            label_size,
            painter: None,
        }
    }

    /// Use `painter` to measure and draw the caption
    pub fn with_label_painter(mut self, painter: Arc<dyn LabelPainter>) -> Self {
        self.painter = Some(painter);
        self
    }

    /// Height the caption occupies. Without a painter the text size stands
    /// in for the measured bounds.
    fn label_bounds(&self, label: &LabelStyle) -> (f32, f32) {
        match &self.painter {
            Some(painter) => painter.measure(&label.text, self.label_size),
            None => (0.0, self.label_size),
        }
    }

    /// Paint the caption and baseline rule onto `raster`
    pub fn apply(&self, raster: &mut Raster) {
        let width = raster.width as f32;
        let height = raster.height as f32;

        let mut label_height = 0.0;
        if let Some(label) = &self.label {
            let (text_width, text_height) = self.label_bounds(label);
            label_height = text_height;

            match &self.painter {
                Some(painter) => {
                    let x = ((width - text_width) / 2.0).floor();
                    let baseline = height * LABEL_BASELINE_FRACTION;
                    painter.paint(raster, &label.text, x, baseline, self.label_size, label.color);
                }
                None => debug!("Decorations::apply: no label painter, caption skipped"),
            }
        }

        if self.underline.enabled {
            let y = height * UNDERLINE_Y_FRACTION - label_height;
            let half = self.underline.thickness / 2.0;
            raster.fill_rect(
                width * UNDERLINE_INSET_FRACTION,
                y - half,
                width * (1.0 - UNDERLINE_INSET_FRACTION),
                y + half,
                self.underline.color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    const RULE: [f32; 4] = [0.3, 0.3, 0.3, 1.0];

    fn style(label: Option<LabelStyle>) -> PadStyle {
        PadStyle {
            underline: UnderlineStyle {
                enabled: true,
                color: RULE,
                thickness: 2.0,
            },
            label,
            ..Default::default()
        }
    }

    /// Records paint calls and reports fixed bounds
    #[derive(Default)]
    struct RecordingPainter {
        calls: Mutex<Vec<(String, f32, f32, f32)>>,
    }

    impl LabelPainter for RecordingPainter {
        fn measure(&self, _text: &str, _size: f32) -> (f32, f32) {
            (40.0, 10.0)
        }

        fn paint(
            &self,
            _raster: &mut Raster,
            text: &str,
            x: f32,
            baseline: f32,
            size: f32,
            _color: [f32; 4],
        ) {
            self.calls
                .lock()
                .unwrap()
                .push((text.to_string(), x, baseline, size));
        }
    }

    #[test]
    fn test_underline_position() {
        let decorations = Decorations::new(&style(None), &DisplayConfig::default());
        let mut raster = Raster::new(100, 100);
        decorations.apply(&mut raster);

        // Rule at y = 90, from x = 10 to x = 90
        assert_eq!(raster.get_pixel(10, 89), Some(RULE));
        assert_eq!(raster.get_pixel(50, 90), Some(RULE));
        assert_eq!(raster.get_pixel(89, 90), Some(RULE));
        assert_eq!(raster.get_pixel(5, 90), Some([0.0; 4]));
        assert_eq!(raster.get_pixel(95, 90), Some([0.0; 4]));
        assert_eq!(raster.get_pixel(50, 50), Some([0.0; 4]));
    }

    #[test]
    fn test_disabled_underline() {
        let mut pad_style = style(None);
        pad_style.underline.enabled = false;
        let decorations = Decorations::new(&pad_style, &DisplayConfig::default());
        let mut raster = Raster::new(100, 100);
        decorations.apply(&mut raster);
        assert!(!raster.has_coverage());
    }

    #[test]
    fn test_label_lifts_underline_and_is_centered() {
        let painter = Arc::new(RecordingPainter::default());
        let decorations = Decorations::new(
            &style(Some(LabelStyle::new("Sign here"))),
            &DisplayConfig::new(2.0),
        )
        .with_label_painter(painter.clone());

        let mut raster = Raster::new(100, 100);
        decorations.apply(&mut raster);

        let calls = painter.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (text, x, baseline, size) = &calls[0];
        assert_eq!(text, "Sign here");
        assert_eq!(*x, 30.0);
        assert!((baseline - 93.0).abs() < 1e-3);
        assert_eq!(*size, 30.0);

        // Rule lifted by the 10 px label height: y = 80
        assert_eq!(raster.get_pixel(50, 80), Some(RULE));
        assert_eq!(raster.get_pixel(50, 90), Some([0.0; 4]));
    }

    #[test]
    fn test_label_without_painter_reserves_text_size() {
        let decorations = Decorations::new(
            &style(Some(LabelStyle::new("Sign here"))),
            &DisplayConfig::default(),
        );
        let mut raster = Raster::new(200, 200);
        decorations.apply(&mut raster);

        // 0.9 * 200 - 15 = 165
        assert_eq!(raster.get_pixel(100, 165), Some(RULE));
        assert_eq!(raster.get_pixel(100, 180), Some([0.0; 4]));
    }
}
