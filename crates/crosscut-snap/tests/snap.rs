use std::cell::RefCell;
use std::rc::Rc;

use cgmath::{InnerSpace, Point3, Vector3};
use crosscut_clip::{ClipController, ClipVolume};
use crosscut_geometry::{ClipSet, MeshData, Plane};
use crosscut_scene::{
    Camera, CanvasSize, GizmoHandle, PointerEvent, PointerEventKind, RecordingMarker, Scene,
    SceneMesh,
};
use crosscut_snap::SnapController;

type SharedMarker = Rc<RefCell<RecordingMarker>>;

fn snap_scene() -> Scene {
    let camera = Camera {
        position: Point3::new(0.0, 0.0, 10.0),
        target: Point3::new(0.0, 0.0, 0.0),
        ..Camera::new(1.0)
    };
    let mut scene = Scene::new(camera, CanvasSize::new(600.0, 600.0));
    let triangle = MeshData::new(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(4.0, 0.0, 0.0),
            Point3::new(0.0, 4.0, 0.0),
        ],
        vec![[0, 1, 2]],
    )
    .unwrap();
    scene.add_mesh(SceneMesh::new("triangle", triangle));
    scene
}

fn controller() -> (SnapController, SharedMarker) {
    let marker: SharedMarker = Rc::new(RefCell::new(RecordingMarker::default()));
    (SnapController::new(Box::new(marker.clone())), marker)
}

// Pixel just inside the triangle, a little over a pixel away from the
// projection of the corner vertex at the origin.
const NEAR_CORNER: (f64, f64) = (301.0, 299.0);

#[test]
fn pointer_near_vertex_snaps_to_it() {
    let mut scene = snap_scene();
    let (mut snapper, marker) = controller();
    snapper.start(&mut scene);

    snapper.on_pointer(
        &scene,
        &PointerEvent::moved(NEAR_CORNER.0, NEAR_CORNER.1),
        &ClipSet::empty(),
    );

    let point = snapper.snap_point().expect("should snap to corner vertex");
    assert!((point - Point3::new(0.0, 0.0, 0.0)).magnitude() < 1.0e-9);
    assert!(snapper.state().is_visible());
    assert!(marker.borrow().visible);
    assert_eq!(marker.borrow().position, Some(point));
}

#[test]
fn pointer_far_from_all_vertices_clears_snap() {
    let mut scene = snap_scene();
    let (mut snapper, marker) = controller();
    snapper.start(&mut scene);

    snapper.on_pointer(
        &scene,
        &PointerEvent::moved(NEAR_CORNER.0, NEAR_CORNER.1),
        &ClipSet::empty(),
    );
    assert!(snapper.snap_point().is_some());

    // Still on the triangle, but all three vertices project well over the
    // 8 px tolerance away.
    snapper.on_pointer(&scene, &PointerEvent::moved(390.0, 240.0), &ClipSet::empty());
    assert!(snapper.snap_point().is_none());
    assert!(!marker.borrow().visible);
}

#[test]
fn pick_miss_clears_snap_immediately() {
    let mut scene = snap_scene();
    let (mut snapper, marker) = controller();
    snapper.start(&mut scene);

    snapper.on_pointer(
        &scene,
        &PointerEvent::moved(NEAR_CORNER.0, NEAR_CORNER.1),
        &ClipSet::empty(),
    );
    snapper.on_pointer(&scene, &PointerEvent::moved(10.0, 10.0), &ClipSet::empty());

    assert!(snapper.snap_point().is_none());
    assert!(!snapper.state().is_visible());
    assert!(marker.borrow().position.is_none());
}

#[test]
fn only_pointer_move_events_drive_snapping() {
    let mut scene = snap_scene();
    let (mut snapper, _marker) = controller();
    snapper.start(&mut scene);

    snapper.on_pointer(
        &scene,
        &PointerEvent::moved(NEAR_CORNER.0, NEAR_CORNER.1),
        &ClipSet::empty(),
    );
    let snapped = snapper.snap_point();
    assert!(snapped.is_some());

    // A non-move event at a miss location leaves the snap untouched.
    let down = PointerEvent {
        kind: PointerEventKind::Down,
        x: 10.0,
        y: 10.0,
    };
    snapper.on_pointer(&scene, &down, &ClipSet::empty());
    assert_eq!(snapper.snap_point(), snapped);
}

#[test]
fn events_before_start_are_ignored() {
    let scene = snap_scene();
    let (mut snapper, _marker) = controller();

    snapper.on_pointer(
        &scene,
        &PointerEvent::moved(NEAR_CORNER.0, NEAR_CORNER.1),
        &ClipSet::empty(),
    );
    assert!(snapper.snap_point().is_none());
}

#[test]
fn start_and_stop_manage_one_observer() {
    let mut scene = snap_scene();
    let (mut snapper, _marker) = controller();

    snapper.start(&mut scene);
    snapper.start(&mut scene);
    assert_eq!(scene.pointer_observers().len(), 1);

    snapper.stop(&mut scene);
    snapper.stop(&mut scene);
    assert!(scene.pointer_observers().is_empty());
}

#[test]
fn clipped_away_surface_gives_no_snap() {
    let mut scene = snap_scene();
    let (mut snapper, _marker) = controller();
    snapper.start(&mut scene);

    // Everything with x < 1 is clipped away, including the hit region.
    let clip = ClipSet::new(vec![
        Plane::from_point_normal(Point3::new(1.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0))
            .unwrap(),
    ]);
    snapper.on_pointer(
        &scene,
        &PointerEvent::moved(NEAR_CORNER.0, NEAR_CORNER.1),
        &clip,
    );
    assert!(snapper.snap_point().is_none());
}

#[test]
fn snapping_through_clip_controller_pipeline() {
    let mut scene = snap_scene();
    let mut clipper =
        ClipController::new(&mut scene, Box::new(GizmoHandle::default()), None).unwrap();
    let (mut snapper, _marker) = controller();

    clipper.start(&mut scene);
    snapper.start(&mut scene);

    // Volume fitted to the scene: nothing is clipped, snap succeeds.
    clipper.pre_render(&mut scene);
    snapper.on_pointer(
        &scene,
        &PointerEvent::moved(NEAR_CORNER.0, NEAR_CORNER.1),
        clipper.clip_set(),
    );
    assert!(snapper.snap_point().is_some());
    clipper.post_render(&mut scene);

    // Move the volume far away: the whole triangle is clipped out.
    clipper.volume_mut().transform.position = Vector3::new(50.0, 50.0, 50.0);
    clipper.pre_render(&mut scene);
    assert_eq!(clipper.volume().derive_planes().unwrap().len(), 6);
    snapper.on_pointer(
        &scene,
        &PointerEvent::moved(NEAR_CORNER.0, NEAR_CORNER.1),
        clipper.clip_set(),
    );
    assert!(snapper.snap_point().is_none());
    clipper.post_render(&mut scene);
}
