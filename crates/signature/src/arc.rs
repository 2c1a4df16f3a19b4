//! Arc rasterizer: stamps variable-radius discs along the curve of a triple.

use tracing::trace;

use crate::curve::ArcCurve;
use crate::raster::Raster;
use crate::segment::Triple;
use crate::width::WidthModel;

/// Draws triples onto a raster with a velocity-dependent width.
#[derive(Debug, Clone, Copy)]
pub struct ArcRasterizer {
    width: WidthModel,
    color: [f32; 4],
}

impl ArcRasterizer {
    pub fn new(width: WidthModel, color: [f32; 4]) -> Self {
        Self { width, color }
    }

    /// Draw one triple, starting from `carried` and leaving it at the end
    /// width for the next triple of the same stroke.
    ///
    /// The width ramps linearly from `carried` to the leading point's width
    /// over the unit-spaced samples. Each disc uses half of the running width
    /// plus the step. Returns the number of discs stamped.
    pub fn draw(&self, raster: &mut Raster, triple: &Triple, carried: &mut f32) -> usize {
        let samples = ArcCurve::from_triple(triple).sample_unit_length();
        let end = self.width.radius(triple.leading.velocity);

        if !samples.is_empty() {
            let step = (end - *carried) / samples.len() as f32;
            let mut running = *carried;
            for sample in &samples {
                raster.fill_disc(sample.x, sample.y, (running + step) / 2.0, self.color);
                running += step;
            }
        }

        trace!(
            "ArcRasterizer::draw: {} discs, width {:.2} -> {:.2}",
            samples.len(),
            *carried,
            end
        );
        *carried = end;
        samples.len()
    }
}
