//! Append-only record of committed strokes, replayed on resize and restore.

use crate::point::Stroke;

/// Committed strokes in commit order.
///
/// Owned by the render worker. Strokes are immutable once committed; the only
/// in-place change is a uniform rescale of every point when the surface is
/// resized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathHistory {
    strokes: Vec<Stroke>,
}

impl PathHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a history from previously saved strokes
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self { strokes }
    }

    /// Append a finished stroke.
    pub fn commit(&mut self, stroke: Stroke) {
        self.strokes.push(stroke);
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Total number of points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Vec::len).sum()
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    /// Multiply every point position by `scale`.
    pub fn rescale(&mut self, scale: f32) {
        for point in self.strokes.iter_mut().flatten() {
            point.scale(scale);
        }
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::VelocityPoint;

    fn stroke(points: &[(f32, f32)]) -> Stroke {
        points
            .iter()
            .map(|&(x, y)| VelocityPoint::new(x, y, 0.5))
            .collect()
    }

    #[test]
    fn test_commit_preserves_order() {
        let mut history = PathHistory::new();
        history.commit(stroke(&[(0.0, 0.0), (1.0, 1.0)]));
        history.commit(stroke(&[(5.0, 5.0)]));

        assert_eq!(history.len(), 2);
        assert_eq!(history.point_count(), 3);
        assert_eq!(history.strokes()[1][0].x, 5.0);
    }

    #[test]
    fn test_rescale_round_trip() {
        let original = PathHistory::from_strokes(vec![
            stroke(&[(3.0, 7.0), (11.5, 13.25)]),
            stroke(&[(101.0, 57.0), (0.0, 0.0), (33.3, 66.6)]),
        ]);

        let mut history = original.clone();
        history.rescale(1.7);
        assert!((history.strokes()[0][0].x - 5.1).abs() < 1e-4);
        history.rescale(1.0 / 1.7);

        for (a, b) in history.iter().flatten().zip(original.iter().flatten()) {
            assert!((a.x - b.x).abs() < 1e-3);
            assert!((a.y - b.y).abs() < 1e-3);
            assert_eq!(a.velocity, b.velocity);
        }
    }

    #[test]
    fn test_clear() {
        let mut history = PathHistory::from_strokes(vec![stroke(&[(1.0, 1.0)])]);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.point_count(), 0);
    }
}
