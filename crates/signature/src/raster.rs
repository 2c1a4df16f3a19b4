//! Off-screen RGBA raster that accumulates the ink

use image::{Rgba, RgbaImage};
use tracing::trace;

/// An RGBA CPU raster sized to the host surface.
/// Stores pixels as [f32; 4] in `0.0..=1.0`, transparent until painted.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Raster dimensions in device pixels
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl Raster {
    /// Create a new raster with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
        }
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        Some(self.pixels[index])
    }

    /// Blend a color onto an existing pixel using alpha compositing
    /// Formula: out = src * alpha + dst * (1 - alpha)
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.pixels[index] = blend(color, self.pixels[index]);
    }

    /// Whether any pixel has non-zero alpha
    pub fn has_coverage(&self) -> bool {
        self.pixels.iter().any(|p| p[3] > 0.0)
    }

    /// Stamp a filled disc.
    ///
    /// Every pixel the disc overlaps is painted with `color`; there is no
    /// edge falloff. Returns the bounding box of the affected region
    /// (x, y, width, height), or None if the disc misses the raster.
    pub fn fill_disc(
        &mut self,
        center_x: f32,
        center_y: f32,
        radius: f32,
        color: [f32; 4],
    ) -> Option<(u32, u32, u32, u32)> {
        if !(radius > 0.0) || !center_x.is_finite() || !center_y.is_finite() {
            return None;
        }

        let (x_min, x_max) = span(center_x - radius, center_x + radius, self.width);
        let (y_min, y_max) = span(center_y - radius, center_y + radius, self.height);
        if x_min >= x_max || y_min >= y_max {
            return None;
        }

        let radius_sq = radius * radius;
        for py in y_min..y_max {
            for px in x_min..x_max {
                // Nearest point of the pixel square to the center
                let nx = center_x.clamp(px as f32, px as f32 + 1.0);
                let ny = center_y.clamp(py as f32, py as f32 + 1.0);
                let dx = nx - center_x;
                let dy = ny - center_y;
                if dx * dx + dy * dy <= radius_sq {
                    self.blend_pixel(px, py, color);
                }
            }
        }

        trace!(
            "Raster::fill_disc: center=({:.1}, {:.1}), radius={:.2}",
            center_x, center_y, radius
        );
        Some((x_min, y_min, x_max - x_min, y_max - y_min))
    }

    /// Fill the pixels whose centers fall inside `[x0, x1) x [y0, y1)`.
    /// A non-empty rectangle always covers at least one row and column.
    pub fn fill_rect(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: [f32; 4]) {
        if !(x1 > x0) || !(y1 > y0) {
            return;
        }
        let (x_min, x_max) = center_span(x0, x1, self.width);
        let (y_min, y_max) = center_span(y0, y1, self.height);
        for py in y_min..y_max {
            for px in x_min..x_max {
                self.blend_pixel(px, py, color);
            }
        }
    }

    /// Composite the raster over an opaque background into a `width` x
    /// `height` 8-bit image. Pixels outside the raster show the background.
    pub fn composite_over(&self, background: [f32; 4], width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| match self.get_pixel(x, y) {
            Some(pixel) => to_rgba8(blend(pixel, background)),
            None => to_rgba8(background),
        })
    }

    /// Get raw pixel data for GPU upload
    /// Returns the pixel data as a byte slice suitable for texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }
}

#[inline]
fn blend(src: [f32; 4], dst: [f32; 4]) -> [f32; 4] {
    let src_alpha = src[3];
    let inv_src_alpha = 1.0 - src_alpha;
    [
        src[0] * src_alpha + dst[0] * inv_src_alpha,
        src[1] * src_alpha + dst[1] * inv_src_alpha,
        src[2] * src_alpha + dst[2] * inv_src_alpha,
        src_alpha + dst[3] * inv_src_alpha,
    ]
}

#[inline]
pub(crate) fn to_rgba8(color: [f32; 4]) -> Rgba<u8> {
    Rgba(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}

/// Pixel range `[min, max)` touched by the interval `[lo, hi]`
fn span(lo: f32, hi: f32, limit: u32) -> (u32, u32) {
    let min = (lo.floor().max(0.0) as u32).min(limit);
    let max = ((hi.floor() + 1.0).max(0.0) as u32).min(limit);
    (min, max)
}

/// Pixel range `[min, max)` whose centers lie in `[lo, hi)`
fn center_span(lo: f32, hi: f32, limit: u32) -> (u32, u32) {
    let min = (lo - 0.5).ceil().max(0.0);
    let max = (hi - 0.5).ceil().max(min + 1.0);
    ((min as u32).min(limit), (max as u32).min(limit))
}
