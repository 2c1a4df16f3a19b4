//! Stroke segmentation into point triples for curve fitting.
//!
//! Two schemes exist and are deliberately kept apart:
//! - live drawing slides a three-slot window over the incoming samples and
//!   emits overlapping triples that share their end points
//!   ([`SlidingWindow`], [`overlapping_triples`])
//! - committed strokes are replayed in non-overlapping steps of two
//!   ([`stepped_triples`])
//!
//! The curvature at segment joins therefore differs between the first draw
//! and a replay of the same stroke.

use crate::point::VelocityPoint;

/// Three consecutive samples fed to the curve fit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triple {
    pub trailing: VelocityPoint,
    pub middle: VelocityPoint,
    pub leading: VelocityPoint,
}

impl Triple {
    pub fn new(trailing: VelocityPoint, middle: VelocityPoint, leading: VelocityPoint) -> Self {
        Self {
            trailing,
            middle,
            leading,
        }
    }
}

/// Trailing/middle/leading slots of the live segmenter.
///
/// Each call to [`SlidingWindow::step`] runs one fill/shift iteration:
/// empty slots are filled in order from the source, and when every slot was
/// already full the window slides so the leading point becomes the next
/// trailing point. A triple is emitted only on iterations that pulled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlidingWindow {
    trailing: Option<VelocityPoint>,
    middle: Option<VelocityPoint>,
    leading: Option<VelocityPoint>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty all three slots
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.trailing.is_none() && self.middle.is_none() && self.leading.is_none()
    }

    /// Number of occupied slots
    pub fn filled(&self) -> usize {
        [self.trailing, self.middle, self.leading]
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Run one fill/shift iteration.
    ///
    /// `pull` is asked for a point once per empty slot, in slot order. A pull
    /// that comes back empty still counts as a pull and leaves the slot empty.
    pub fn step(&mut self, mut pull: impl FnMut() -> Option<VelocityPoint>) -> Option<Triple> {
        let mut pulled = false;
        for slot in [&mut self.trailing, &mut self.middle, &mut self.leading] {
            if slot.is_none() {
                *slot = pull();
                pulled = true;
            }
        }

        if !pulled {
            self.trailing = self.leading;
            self.middle = None;
            self.leading = None;
            return None;
        }

        match (self.trailing, self.middle, self.leading) {
            (Some(trailing), Some(middle), Some(leading)) => {
                Some(Triple::new(trailing, middle, leading))
            }
            _ => None,
        }
    }
}

/// Triples the live window emits when fed `points` in order.
///
/// The first triple covers points 0..=2 and each further triple starts at the
/// previous one's leading point, so `n >= 3` points yield `(n - 1) / 2`
/// triples and fewer than three yield none.
pub fn overlapping_triples(points: &[VelocityPoint]) -> Vec<Triple> {
    let mut window = SlidingWindow::new();
    let mut source = points.iter().copied().peekable();
    let mut triples = Vec::new();

    while source.peek().is_some() {
        if let Some(triple) = window.step(|| source.next()) {
            triples.push(triple);
        }
    }

    triples
}

/// Non-overlapping triples used when compositing a committed stroke.
///
/// Points are grouped as `(i-2, i-1, i)` for `i = 2, 4, 6, ...`. A two-point
/// stroke becomes the single degenerate triple `(p0, p0, p1)`; shorter
/// strokes produce nothing.
pub fn stepped_triples(points: &[VelocityPoint]) -> Vec<Triple> {
    match points {
        [] | [_] => Vec::new(),
        [first, second] => vec![Triple::new(*first, *first, *second)],
        _ => (2..points.len())
            .step_by(2)
            .map(|i| Triple::new(points[i - 2], points[i - 1], points[i]))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<VelocityPoint> {
        (0..n)
            .map(|i| VelocityPoint::new(i as f32 * 10.0, 0.0, 1.0))
            .collect()
    }

    #[test]
    fn test_overlapping_count() {
        for n in 3..40 {
            assert_eq!(overlapping_triples(&line(n)).len(), (n - 1) / 2, "n = {}", n);
        }
    }

    #[test]
    fn test_overlapping_continuity() {
        let triples = overlapping_triples(&line(15));
        for pair in triples.windows(2) {
            assert_eq!(pair[1].trailing, pair[0].leading);
        }
    }

    #[test]
    fn test_short_strokes_emit_nothing_live() {
        assert!(overlapping_triples(&[]).is_empty());
        assert!(overlapping_triples(&line(1)).is_empty());
        assert!(overlapping_triples(&line(2)).is_empty());
    }

    #[test]
    fn test_five_point_triples() {
        let points = [
            VelocityPoint::new(0.0, 0.0, 0.1),
            VelocityPoint::new(10.0, 0.0, 0.2),
            VelocityPoint::new(10.0, 10.0, 0.3),
            VelocityPoint::new(20.0, 10.0, 0.4),
            VelocityPoint::new(20.0, 20.0, 0.5),
        ];
        let triples = overlapping_triples(&points);
        assert_eq!(
            triples,
            vec![
                Triple::new(points[0], points[1], points[2]),
                Triple::new(points[2], points[3], points[4]),
            ]
        );
    }

    #[test]
    fn test_window_incremental_matches_batch() {
        // One point available per pass, as when samples trickle in
        let points = line(9);
        let mut window = SlidingWindow::new();
        let mut pending = std::collections::VecDeque::new();
        let mut triples = Vec::new();

        for point in &points {
            pending.push_back(*point);
            while !pending.is_empty() {
                if let Some(triple) = window.step(|| pending.pop_front()) {
                    triples.push(triple);
                }
            }
        }

        assert_eq!(triples, overlapping_triples(&points));
    }

    #[test]
    fn test_window_slides_when_full() {
        let points = line(3);
        let mut iter = points.iter().copied();
        let mut window = SlidingWindow::new();

        assert!(window.step(|| iter.next()).is_some());
        assert_eq!(window.filled(), 3);

        // Nothing pulled: the leading point becomes trailing
        let slid = window.step(|| -> Option<VelocityPoint> { panic!("full window must not pull") });
        assert!(slid.is_none());
        assert_eq!(window.filled(), 1);

        window.reset();
        assert!(window.is_empty());
    }

    #[test]
    fn test_stepped_triples() {
        assert!(stepped_triples(&[]).is_empty());
        assert!(stepped_triples(&line(1)).is_empty());

        let two = line(2);
        assert_eq!(stepped_triples(&two), vec![Triple::new(two[0], two[0], two[1])]);

        let five = line(5);
        assert_eq!(
            stepped_triples(&five),
            vec![
                Triple::new(five[0], five[1], five[2]),
                Triple::new(five[2], five[3], five[4]),
            ]
        );

        // Even lengths drop the final point
        assert_eq!(stepped_triples(&line(4)).len(), 1);
        assert_eq!(stepped_triples(&line(6)).len(), 2);
    }
}
