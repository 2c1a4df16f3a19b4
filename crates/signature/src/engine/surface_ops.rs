//! Raster lifecycle for the stroke engine: allocation, resize, replay,
//! clear and restore.

use tracing::{debug, info};

use crate::constants::DEFAULT_CARRIED_WIDTH;
use crate::history::PathHistory;
use crate::raster::Raster;
use crate::segment::stepped_triples;
use crate::state::PadState;

use super::StrokeEngine;

/// Uniform factor that fits a drawing made at `previous` into `current`.
/// None when the previous size is unknown (zero in either dimension).
pub(crate) fn rescale_factor(previous: (u32, u32), current: (u32, u32)) -> Option<f32> {
    if previous.0 == 0 || previous.1 == 0 {
        return None;
    }
    let width_scale = current.0 as f32 / previous.0 as f32;
    let height_scale = current.1 as f32 / previous.1 as f32;
    Some(width_scale.min(height_scale))
}

impl StrokeEngine {
    /// Make the raster match the current surface size.
    ///
    /// Allocates lazily once the surface is drawable and reallocates when its
    /// size changed or restored strokes are pending. A new raster is
    /// decorated and the history replayed into it; on a size change the
    /// history is first rescaled (or dropped when retention is off).
    /// Returns whether a raster is available for drawing.
    pub fn sync_surface(&mut self) -> bool {
        let Some(size) = self.shared.surface.drawable() else {
            return false;
        };

        let current = self.shared.lock_raster().as_ref().map(Raster::dimensions);
        if current == Some(size) && self.pending_restore.is_none() {
            return true;
        }

        let previous = self.pending_restore.take().or(current);
        if let Some(previous) = previous.filter(|&previous| previous != size) {
            if self.retain_on_resize {
                match rescale_factor(previous, size) {
                    Some(scale) => {
                        info!(
                            "StrokeEngine: rescaling {} strokes by {:.3} ({:?} -> {:?})",
                            self.history.len(),
                            scale,
                            previous,
                            size
                        );
                        self.history.rescale(scale);
                    }
                    None => debug!("StrokeEngine: no previous size, replaying unscaled"),
                }
            } else {
                info!("StrokeEngine: surface resized without retention, clearing");
                self.history.clear();
                self.shared.set_committed(0);
            }
        }

        let mut raster = Raster::new(size.0, size.1);
        self.decorations.apply(&mut raster);
        self.replay_into(&mut raster);
        debug!(
            "StrokeEngine: allocated {}x{} raster, replayed {} strokes",
            size.0,
            size.1,
            self.history.len()
        );

        *self.shared.lock_raster() = Some(raster);
        true
    }

    /// Draw every committed stroke in commit order using the stepped
    /// segmentation. Each stroke starts from the default carried width.
    fn replay_into(&self, raster: &mut Raster) {
        for stroke in self.history.iter() {
            let mut carried = DEFAULT_CARRIED_WIDTH;
            for triple in stepped_triples(stroke) {
                self.rasterizer.draw(raster, &triple, &mut carried);
            }
        }
    }

    /// Discard the history, open stroke and window, and start over on an
    /// empty decorated raster.
    pub fn clear(&mut self) {
        self.history.clear();
        self.open = None;
        self.context.reset();
        self.pending_restore = None;
        self.shared.set_committed(0);

        *self.shared.lock_raster() = None;
        self.sync_surface();
        info!("StrokeEngine: cleared");
    }

    /// Snapshot the history for persistence. None when retention is off.
    pub fn save_state(&self) -> Option<PadState> {
        if !self.retain_on_resize {
            return None;
        }
        let (width, height) = self.shared.surface.raw();
        Some(PadState::new(self.history.strokes().to_vec(), width, height))
    }

    /// Replace the history with saved strokes and schedule a rescale from
    /// the saved size. Applied at once if the surface is already drawable,
    /// otherwise on the next observation of a valid size. Ignored when
    /// retention is off.
    pub fn restore(&mut self, state: PadState) {
        if !self.retain_on_resize {
            debug!("StrokeEngine::restore: retention disabled, state ignored");
            return;
        }

        info!(
            "StrokeEngine: restoring {} strokes saved at {}x{}",
            state.strokes.len(),
            state.width,
            state.height
        );
        self.history = PathHistory::from_strokes(state.strokes);
        self.shared.set_committed(self.history.len());
        self.pending_restore = Some((state.width, state.height));
        self.sync_surface();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use signature_config::{DisplayConfig, PadStyle};

    use crate::decoration::Decorations;
    use crate::point::VelocityPoint;
    use crate::shared::Shared;

    const INK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    fn engine(width: u32, height: u32, retain: bool) -> StrokeEngine {
        let shared = Arc::new(Shared::default());
        shared.surface.set(width, height);
        let style = PadStyle {
            signature_color: INK,
            retain_on_resize: retain,
            ..Default::default()
        };
        let display = DisplayConfig::default();
        StrokeEngine::new(
            Arc::clone(&shared),
            &style,
            &display,
            Decorations::new(&style, &display),
        )
    }

    fn draw_stroke(engine: &mut StrokeEngine, points: &[(f32, f32)]) {
        engine.shared.begin_interaction();
        for &(x, y) in points {
            engine.shared.queue.push(VelocityPoint::new(x, y, 0.2));
        }
        engine.shared.end_interaction();
        engine.drain_pass();
    }

    fn raster_pixel(engine: &StrokeEngine, x: u32, y: u32) -> Option<[f32; 4]> {
        engine
            .shared
            .lock_raster()
            .as_ref()
            .and_then(|raster| raster.get_pixel(x, y))
    }

    #[test]
    fn test_rescale_factor() {
        assert_eq!(rescale_factor((100, 100), (200, 300)), Some(2.0));
        assert_eq!(rescale_factor((200, 100), (100, 100)), Some(0.5));
        assert_eq!(rescale_factor((0, 100), (100, 100)), None);
        assert_eq!(rescale_factor((100, 0), (100, 100)), None);
    }

    #[test]
    fn test_lazy_allocation_is_decorated() {
        let mut engine = engine(100, 100, true);
        assert!(engine.shared.lock_raster().is_none());
        assert!(engine.sync_surface());

        let rule = PadStyle::default().underline.color;
        assert_eq!(raster_pixel(&engine, 50, 90), Some(rule));
    }

    #[test]
    fn test_resize_round_trip() {
        let mut engine = engine(100, 100, true);
        draw_stroke(
            &mut engine,
            &[(10.0, 10.0), (30.0, 10.0), (30.0, 30.0), (50.0, 40.0), (60.0, 60.0)],
        );
        let original = engine.history().clone();

        engine.shared.surface.set(250, 200);
        assert!(engine.sync_surface());
        let first = engine.history().strokes()[0][0];
        assert!((first.x - 20.0).abs() < 1e-4);
        assert_eq!(
            engine.shared.lock_raster().as_ref().map(Raster::dimensions),
            Some((250, 200))
        );

        // Both axes shrink by half, undoing the first rescale
        engine.shared.surface.set(125, 100);
        assert!(engine.sync_surface());

        for (a, b) in engine.history().iter().flatten().zip(original.iter().flatten()) {
            assert!((a.x - b.x).abs() < 1e-3);
            assert!((a.y - b.y).abs() < 1e-3);
            assert_eq!(a.velocity, b.velocity);
        }
    }

    #[test]
    fn test_resize_replays_stroke_at_new_scale() {
        let mut engine = engine(100, 100, true);
        draw_stroke(&mut engine, &[(10.0, 20.0), (20.0, 20.0), (30.0, 20.0)]);
        assert_eq!(raster_pixel(&engine, 20, 20), Some(INK));

        engine.shared.surface.set(200, 200);
        engine.sync_surface();
        assert_eq!(raster_pixel(&engine, 40, 40), Some(INK));
        assert_eq!(raster_pixel(&engine, 20, 20), Some([0.0; 4]));
    }

    #[test]
    fn test_resize_without_retention_clears() {
        let mut engine = engine(100, 100, false);
        draw_stroke(&mut engine, &[(10.0, 20.0), (20.0, 20.0), (30.0, 20.0)]);
        assert_eq!(engine.history().len(), 1);
        assert!(engine.shared.has_ink());

        engine.shared.surface.set(120, 80);
        engine.sync_surface();
        assert!(engine.history().is_empty());
        assert!(!engine.shared.has_ink());
        assert!(engine.save_state().is_none());
    }

    #[test]
    fn test_clear() {
        let mut engine = engine(100, 100, true);
        draw_stroke(&mut engine, &[(10.0, 20.0), (20.0, 20.0), (30.0, 20.0)]);
        engine.clear();

        assert!(engine.history().is_empty());
        assert!(engine.open_stroke().is_none());
        assert!(!engine.shared.has_ink());
        assert_eq!(raster_pixel(&engine, 20, 20), Some([0.0; 4]));
        // Decoration survives the clear
        let rule = PadStyle::default().underline.color;
        assert_eq!(raster_pixel(&engine, 50, 90), Some(rule));
    }

    #[test]
    fn test_restore_rescales_from_saved_size() {
        let mut source = engine(100, 100, true);
        draw_stroke(&mut source, &[(10.0, 20.0), (20.0, 20.0), (30.0, 20.0)]);
        let state = source.save_state().unwrap();
        assert_eq!((state.width, state.height), (100, 100));

        // Recreated at a size not yet known
        let mut restored = engine(0, 0, true);
        restored.restore(state);
        assert_eq!(restored.history().len(), 1);
        assert!(restored.shared.has_ink());
        assert_eq!(restored.history().strokes()[0][0].x, 10.0);

        restored.shared.surface.set(300, 200);
        restored.sync_surface();
        assert!((restored.history().strokes()[0][0].x - 20.0).abs() < 1e-4);
        assert_eq!(raster_pixel(&restored, 40, 40), Some(INK));
    }

    #[test]
    fn test_restore_same_size_replays_unscaled() {
        let state = PadState::new(
            vec![vec![
                VelocityPoint::new(10.0, 20.0, 0.2),
                VelocityPoint::new(30.0, 20.0, 0.2),
            ]],
            100,
            100,
        );
        let mut engine = engine(100, 100, true);
        engine.restore(state);

        assert_eq!(engine.history().strokes()[0][1].x, 30.0);
        // Two-point stroke replays as one degenerate arc
        assert_eq!(raster_pixel(&engine, 20, 20), Some(INK));
    }

    #[test]
    fn test_restore_degenerate_strokes_render_nothing() {
        let state = PadState::new(
            vec![vec![], vec![VelocityPoint::new(20.0, 20.0, 0.2)]],
            100,
            100,
        );
        let mut engine = engine(100, 100, true);
        engine.restore(state);

        assert_eq!(engine.history().len(), 2);
        assert_eq!(raster_pixel(&engine, 20, 20), Some([0.0; 4]));
    }

    #[test]
    fn test_restore_ignored_without_retention() {
        let mut engine = engine(100, 100, false);
        engine.restore(PadState::new(
            vec![vec![
                VelocityPoint::new(10.0, 20.0, 0.2),
                VelocityPoint::new(30.0, 20.0, 0.2),
            ]],
            100,
            100,
        ));
        assert!(engine.history().is_empty());
        assert!(!engine.shared.has_ink());
    }

    #[test]
    fn test_restore_with_unknown_saved_size_replays_unscaled() {
        let state = PadState::new(
            vec![vec![
                VelocityPoint::new(10.0, 20.0, 0.2),
                VelocityPoint::new(20.0, 20.0, 0.2),
                VelocityPoint::new(30.0, 20.0, 0.2),
            ]],
            0,
            0,
        );
        let mut engine = engine(150, 150, true);
        engine.restore(state);
        assert_eq!(engine.history().strokes()[0][2].x, 30.0);
        assert_eq!(raster_pixel(&engine, 20, 20), Some(INK));
    }
}
