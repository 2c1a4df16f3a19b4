//! Curve fit through a triple and unit arc-length sampling.

use glam::Vec2;

use crate::constants::{FLATTEN_SEGMENTS_PER_PIXEL, MAX_FLATTEN_SEGMENTS};
use crate::segment::Triple;

const LENGTH_SLACK: f32 = 1e-3;

/// Cubic Bezier fitted through a triple.
///
/// Trailing and leading are the end points and the middle sample is used for
/// both control points, which bends the curve toward it much like a
/// quadratic through the three samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcCurve {
    pub start: Vec2,
    pub control1: Vec2,
    pub control2: Vec2,
    pub end: Vec2,
}

impl ArcCurve {
    pub fn from_triple(triple: &Triple) -> Self {
        let middle = triple.middle.position();
        Self {
            start: triple.trailing.position(),
            control1: middle,
            control2: middle,
            end: triple.leading.position(),
        }
    }

    /// Point on the curve at parameter `t` in `0..=1`
    pub fn eval(&self, t: f32) -> Vec2 {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let c = 3.0 * mt * t * t;
        let d = t * t * t;
        self.start * a + self.control1 * b + self.control2 * c + self.end * d
    }

    /// Length of the control polygon, an upper bound on the arc length
    fn hull_length(&self) -> f32 {
        self.start.distance(self.control1)
            + self.control1.distance(self.control2)
            + self.control2.distance(self.end)
    }

    /// Approximate the curve by a polyline fine enough for pixel sampling
    pub fn flatten(&self) -> Vec<Vec2> {
        let segments = ((self.hull_length() * FLATTEN_SEGMENTS_PER_PIXEL).ceil() as usize)
            .clamp(1, MAX_FLATTEN_SEGMENTS);
        (0..=segments)
            .map(|i| self.eval(i as f32 / segments as f32))
            .collect()
    }

    /// Approximate arc length
    pub fn length(&self) -> f32 {
        polyline_length(&self.flatten())
    }

    /// Points on the curve at arc-length distances `0, 1, 2, ...` strictly
    /// below the curve length. A zero-length curve yields no samples.
    pub fn sample_unit_length(&self) -> Vec<Vec2> {
        let polyline = self.flatten();
        let length = polyline_length(&polyline);
        if length <= 0.0 || !length.is_finite() {
            return Vec::new();
        }

        // Integer distances strictly below the length, with slack for the
        // rounding of the flattened sum
        let count = (length - LENGTH_SLACK).ceil().max(0.0) as usize;
        let mut samples = Vec::with_capacity(count);
        let mut segment = 0;
        let mut segment_start = 0.0;

        for i in 0..count {
            let distance = i as f32;
            // Advance to the piece containing `distance`
            while segment + 1 < polyline.len() - 1 {
                let piece = polyline[segment].distance(polyline[segment + 1]);
                if segment_start + piece >= distance {
                    break;
                }
                segment_start += piece;
                segment += 1;
            }

            let from = polyline[segment];
            let to = polyline[segment + 1];
            let piece = from.distance(to);
            let t = if piece > 0.0 {
                ((distance - segment_start) / piece).clamp(0.0, 1.0)
            } else {
                0.0
            };
            samples.push(from.lerp(to, t));
        }

        samples
    }
}

fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}
