pub mod camera;
pub mod gizmo;
pub mod hooks;
pub mod overlay;
pub mod scene;
pub mod tool;

pub use camera::Camera;
pub use gizmo::{BoxGizmo, GizmoHandle};
pub use hooks::{
    HookId, HookRegistry, ObserverId, ObserverRegistry, PointerEvent, PointerEventKind,
    RenderStage,
};
pub use overlay::{NullMarker, RecordingMarker, SnapMarker};
pub use scene::{CanvasSize, Extent, MeshFilter, Scene, SceneMesh};
pub use tool::Tool;
