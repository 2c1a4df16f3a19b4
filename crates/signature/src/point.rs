use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A single touch sample with the speed estimate supplied by the input side.
///
/// Serialized as a `[x, y, velocity]` array so persisted strokes stay a plain
/// list of triples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct VelocityPoint {
    /// Surface-local x in device pixels
    pub x: f32,
    /// Surface-local y in device pixels
    pub y: f32,
    /// Scalar speed estimate; never recomputed here
    pub velocity: f32,
}

impl VelocityPoint {
    pub fn new(x: f32, y: f32, velocity: f32) -> Self {
        Self { x, y, velocity }
    }

    /// Position as a vector
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Multiply the position by `scale`. Velocity is untouched.
    #[inline]
    pub fn scale(&mut self, scale: f32) {
        self.x *= scale;
        self.y *= scale;
    }
}

impl From<[f32; 3]> for VelocityPoint {
    fn from([x, y, velocity]: [f32; 3]) -> Self {
        Self { x, y, velocity }
    }
}

impl From<VelocityPoint> for [f32; 3] {
    fn from(point: VelocityPoint) -> Self {
        [point.x, point.y, point.velocity]
    }
}

/// An ordered run of samples from one touch-down to touch-up.
pub type Stroke = Vec<VelocityPoint>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_leaves_velocity() {
        let mut point = VelocityPoint::new(10.0, 20.0, 0.5);
        point.scale(1.5);
        assert_eq!(point, VelocityPoint::new(15.0, 30.0, 0.5));
    }

    #[test]
    fn test_serializes_as_array() {
        let point = VelocityPoint::new(1.0, 2.5, -0.25);
        let json = serde_json::to_string(&point).unwrap();
        assert_eq!(json, "[1.0,2.5,-0.25]");

        let back: VelocityPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }
}
