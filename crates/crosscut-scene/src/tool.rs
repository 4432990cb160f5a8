use crate::scene::Scene;

/// Common lifecycle for interactive editing aids. `start` and `stop` are
/// idempotent: implementations keep a started latch and repeated calls in
/// the same state are no-ops. `clear` releases scene objects and resets
/// visual state to hidden.
pub trait Tool {
    fn start(&mut self, scene: &mut Scene);
    fn stop(&mut self, scene: &mut Scene);
    fn clear(&mut self, scene: &mut Scene);
    fn set_visible(&mut self, scene: &mut Scene, visible: bool);

    fn dispose(&mut self, scene: &mut Scene) {
        self.stop(scene);
        self.clear(scene);
    }
}
