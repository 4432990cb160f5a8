use cgmath::{EuclideanSpace, Matrix4, Point3, Transform as _, Vector3};
use crosscut_base::Guid;
use crosscut_geometry::{ClipSet, MeshData, Transform};

use crate::camera::Camera;
use crate::hooks::{HookRegistry, ObserverRegistry};

pub type MeshFilter = dyn Fn(&SceneMesh) -> bool;

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Combined world-space bounds over a mesh subset.
#[derive(Clone, Copy, Debug)]
pub struct Extent {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl Extent {
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        self.min + self.size() * 0.5
    }
}

#[derive(Clone, Debug)]
pub struct SceneMesh {
    id: Guid,
    pub name: String,
    pub data: MeshData,
    pub transform: Transform,
    pub pickable: bool,
    pub visible: bool,
    /// Material opacity in [0, 1].
    pub alpha: f64,
}

impl SceneMesh {
    pub fn new(name: impl Into<String>, data: MeshData) -> Self {
        Self {
            id: Guid::new(),
            name: name.into(),
            data,
            transform: Transform::default(),
            pickable: true,
            visible: true,
            alpha: 1.0,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_pickable(mut self, pickable: bool) -> Self {
        self.pickable = pickable;
        self
    }

    pub fn id(&self) -> Guid {
        self.id
    }

    pub fn world_matrix(&self) -> Matrix4<f64> {
        self.transform.matrix()
    }
}

/// In-memory scene graph: meshes, the active camera, canvas dimensions, the
/// clip planes currently installed for rasterization, and the hook/observer
/// subscription registries.
pub struct Scene {
    meshes: Vec<SceneMesh>,
    pub camera: Camera,
    canvas: CanvasSize,
    active_clip: ClipSet,
    hooks: HookRegistry,
    pointer_observers: ObserverRegistry,
}

impl Scene {
    pub fn new(camera: Camera, canvas: CanvasSize) -> Self {
        Self {
            meshes: Vec::new(),
            camera,
            canvas,
            active_clip: ClipSet::empty(),
            hooks: HookRegistry::default(),
            pointer_observers: ObserverRegistry::default(),
        }
    }

    pub fn add_mesh(&mut self, mesh: SceneMesh) -> Guid {
        let id = mesh.id();
        self.meshes.push(mesh);
        id
    }

    /// Removes the mesh and any hooks still bound to it.
    pub fn remove_mesh(&mut self, id: Guid) -> bool {
        let before = self.meshes.len();
        self.meshes.retain(|mesh| mesh.id() != id);
        if self.meshes.len() != before {
            self.hooks.detach_mesh(id);
            true
        } else {
            false
        }
    }

    pub fn mesh(&self, id: Guid) -> Option<&SceneMesh> {
        self.meshes.iter().find(|mesh| mesh.id() == id)
    }

    pub fn mesh_mut(&mut self, id: Guid) -> Option<&mut SceneMesh> {
        self.meshes.iter_mut().find(|mesh| mesh.id() == id)
    }

    pub fn meshes(&self) -> &[SceneMesh] {
        &self.meshes
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// World bounds over meshes passing the filter, from their transformed
    /// vertex positions. `None` when nothing qualifies.
    pub fn world_extent(&self, filter: Option<&MeshFilter>) -> Option<Extent> {
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        let mut any = false;

        for mesh in &self.meshes {
            if mesh.data.is_empty() {
                continue;
            }
            if let Some(filter) = filter {
                if !filter(mesh) {
                    continue;
                }
            }
            let world = mesh.world_matrix();
            for local in mesh.data.positions() {
                let point = world.transform_point(*local);
                min = Point3::new(min.x.min(point.x), min.y.min(point.y), min.z.min(point.z));
                max = Point3::new(max.x.max(point.x), max.y.max(point.y), max.z.max(point.z));
                any = true;
            }
        }

        any.then_some(Extent { min, max })
    }

    pub fn active_clip(&self) -> &ClipSet {
        &self.active_clip
    }

    pub fn set_active_clip(&mut self, clip: ClipSet) {
        self.active_clip = clip;
    }

    pub fn clear_active_clip(&mut self) {
        self.active_clip = ClipSet::empty();
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    pub fn pointer_observers(&self) -> &ObserverRegistry {
        &self.pointer_observers
    }

    pub fn pointer_observers_mut(&mut self) -> &mut ObserverRegistry {
        &mut self.pointer_observers
    }
}
