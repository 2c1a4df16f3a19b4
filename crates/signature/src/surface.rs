//! Last observed host surface dimensions, shared between threads.

use std::sync::atomic::{AtomicU64, Ordering};

/// Width and height packed into one atomic so readers never see a torn pair.
#[derive(Debug, Default)]
pub struct SurfaceSize {
    packed: AtomicU64,
}

impl SurfaceSize {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the dimensions reported by the host
    pub fn set(&self, width: u32, height: u32) {
        let packed = ((width as u64) << 32) | height as u64;
        self.packed.store(packed, Ordering::Release);
    }

    /// Raw dimensions, `(0, 0)` before the first observation
    pub fn raw(&self) -> (u32, u32) {
        let packed = self.packed.load(Ordering::Acquire);
        ((packed >> 32) as u32, packed as u32)
    }

    /// Dimensions if both are positive; a zero-sized surface is not drawable
    pub fn drawable(&self) -> Option<(u32, u32)> {
        match self.raw() {
            (0, _) | (_, 0) => None,
            size => Some(size),
        }
    }
}
