use cgmath::Point3;
use crosscut_geometry::{ClipSet, extract_world_geometry};
use crosscut_pick::pick_scene;
use crosscut_scene::{
    Camera, CanvasSize, ObserverId, PointerEvent, PointerEventKind, Scene, SnapMarker, Tool,
};
use tracing::warn;

pub const DEFAULT_SNAP_TOLERANCE_PX: f64 = 8.0;

/// Current snap target and the visibility of its screen marker.
#[derive(Clone, Copy, Debug, Default)]
pub struct SnapState {
    point: Option<Point3<f64>>,
    visible: bool,
}

impl SnapState {
    pub fn point(&self) -> Option<Point3<f64>> {
        self.point
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

/// Locks the pointer onto the screen-nearest vertex of the picked triangle.
/// Driven by pointer-move events; every other pointer event kind is
/// ignored. Owns its overlay marker collaborator.
pub struct SnapController {
    tolerance_px: f64,
    marker: Box<dyn SnapMarker>,
    state: SnapState,
    observer: Option<ObserverId>,
}

impl SnapController {
    pub fn new(marker: Box<dyn SnapMarker>) -> Self {
        Self::with_tolerance(marker, DEFAULT_SNAP_TOLERANCE_PX)
    }

    pub fn with_tolerance(marker: Box<dyn SnapMarker>, tolerance_px: f64) -> Self {
        Self {
            tolerance_px,
            marker,
            state: SnapState::default(),
            observer: None,
        }
    }

    pub fn start(&mut self, scene: &mut Scene) {
        if self.observer.is_some() {
            return;
        }
        self.observer = Some(scene.pointer_observers_mut().add());
    }

    pub fn stop(&mut self, scene: &mut Scene) {
        if let Some(id) = self.observer.take() {
            scene.pointer_observers_mut().remove(id);
        }
    }

    pub fn is_started(&self) -> bool {
        self.observer.is_some()
    }

    pub fn snap_point(&self) -> Option<Point3<f64>> {
        self.state.point
    }

    pub fn state(&self) -> SnapState {
        self.state
    }

    /// Recomputes the snap from one pointer event against the given clip
    /// snapshot. A miss clears the snap immediately, no debounce.
    pub fn on_pointer(&mut self, scene: &Scene, event: &PointerEvent, clip: &ClipSet) {
        if self.observer.is_none() || event.kind != PointerEventKind::Move {
            return;
        }

        let result = pick_scene(scene, (event.x, event.y), clip, None);
        let Some(hit) = result.hit else {
            self.set_snap(None);
            return;
        };
        let Some(mesh) = scene.mesh(hit.mesh) else {
            self.set_snap(None);
            return;
        };

        let geometry = match extract_world_geometry(&mesh.data, &mesh.world_matrix()) {
            Ok(geometry) => geometry,
            Err(err) => {
                warn!(%err, mesh = %mesh.name, "snap geometry extraction failed");
                self.set_snap(None);
                return;
            }
        };
        let Some(vertices) = geometry.triangle(hit.face_index) else {
            self.set_snap(None);
            return;
        };

        let canvas = scene.canvas();
        let Some(hit_px) = project_to_pixels(&scene.camera, canvas, hit.point) else {
            self.set_snap(None);
            return;
        };

        let candidates = vertices.map(|vertex| {
            let px = project_to_pixels(&scene.camera, canvas, vertex);
            (vertex, px)
        });
        self.set_snap(select_snap(hit_px, &candidates, self.tolerance_px));
    }

    pub fn clear(&mut self, _scene: &mut Scene) {
        self.set_snap(None);
    }

    pub fn set_visible(&mut self, _scene: &mut Scene, visible: bool) {
        match (visible, self.state.point) {
            (true, Some(point)) => {
                self.marker.place(point);
                self.state.visible = true;
            }
            _ => {
                self.marker.hide();
                self.state.visible = false;
            }
        }
    }

    fn set_snap(&mut self, point: Option<Point3<f64>>) {
        match point {
            Some(point) => {
                self.marker.place(point);
                self.state = SnapState {
                    point: Some(point),
                    visible: true,
                };
            }
            None => {
                self.marker.hide();
                self.state = SnapState::default();
            }
        }
    }
}

impl Tool for SnapController {
    fn start(&mut self, scene: &mut Scene) {
        SnapController::start(self, scene);
    }

    fn stop(&mut self, scene: &mut Scene) {
        SnapController::stop(self, scene);
    }

    fn clear(&mut self, scene: &mut Scene) {
        SnapController::clear(self, scene);
    }

    fn set_visible(&mut self, scene: &mut Scene, visible: bool) {
        SnapController::set_visible(self, scene, visible);
    }
}

fn project_to_pixels(
    camera: &Camera,
    canvas: CanvasSize,
    point: Point3<f64>,
) -> Option<(f64, f64)> {
    let (x, y) = camera.project(point)?;
    Some((x * canvas.width, y * canvas.height))
}

/// Scans all three vertices and remembers the overall minimum pixel
/// distance; the snap target is the globally nearest vertex, and only if
/// its distance is under tolerance. A vertex under tolerance that is not
/// the minimum so far never wins.
fn select_snap(
    hit_px: (f64, f64),
    candidates: &[(Point3<f64>, Option<(f64, f64)>); 3],
    tolerance_px: f64,
) -> Option<Point3<f64>> {
    let mut min_distance = f64::MAX;
    let mut snapped = None;

    for (vertex, projected) in candidates {
        let Some((x, y)) = projected else {
            continue;
        };
        let distance = ((hit_px.0 - x).powi(2) + (hit_px.1 - y).powi(2)).sqrt();
        if distance < min_distance {
            min_distance = distance;
            if distance < tolerance_px {
                snapped = Some(*vertex);
            }
        }
    }

    snapped
}
