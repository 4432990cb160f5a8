use crosscut_base::Guid;
use crosscut_geometry::ClipSet;
use crosscut_scene::{BoxGizmo, MeshFilter, RenderStage, Scene, SceneMesh, Tool};
use crosscut_scene::hooks::HookId;
use tracing::{debug, warn};

use crate::volume::{BoxVolume, ClipVolume};
use crate::{Error, Result};

const VOLUME_MESH_NAME: &str = "clip-box";
const DEFAULT_VOLUME_ALPHA: f64 = 0.2;

/// Drives the section-box aid: owns the box volume, its auxiliary scene
/// mesh and gizmo binding, and the active clip set. The host render loop
/// calls `pre_render` before any pick or draw of a frame and `post_render`
/// after all draw calls.
pub struct ClipController {
    volume: BoxVolume,
    volume_mesh: Guid,
    gizmo: Box<dyn BoxGizmo>,
    filter: Option<Box<MeshFilter>>,
    clip: ClipSet,
    hooks: Vec<HookId>,
    started: bool,
}

impl ClipController {
    /// Sizes the box volume to the world extent of the filtered meshes and
    /// adds its translucent auxiliary mesh to the scene, gizmo detached and
    /// disabled until `start`.
    pub fn new(
        scene: &mut Scene,
        mut gizmo: Box<dyn BoxGizmo>,
        filter: Option<Box<MeshFilter>>,
    ) -> Result<Self> {
        let extent = scene
            .world_extent(filter.as_deref())
            .ok_or(Error::EmptyScene)?;
        let volume = BoxVolume::fit_to_extent(&extent);

        let mesh = SceneMesh::new(VOLUME_MESH_NAME, volume.data().clone())
            .with_transform(volume.transform)
            .with_alpha(DEFAULT_VOLUME_ALPHA)
            .with_pickable(false);
        let volume_mesh = scene.add_mesh(mesh);

        gizmo.attach(volume_mesh);
        gizmo.set_enabled(false);

        Ok(Self {
            volume,
            volume_mesh,
            gizmo,
            filter,
            clip: ClipSet::empty(),
            hooks: Vec::new(),
            started: false,
        })
    }

    pub fn start(&mut self, scene: &mut Scene) {
        if self.started {
            return;
        }
        self.gizmo.set_enabled(true);

        let targets: Vec<Guid> = scene
            .meshes()
            .iter()
            .filter(|mesh| self.is_clippable(mesh))
            .map(|mesh| mesh.id())
            .collect();
        for id in targets {
            self.hooks
                .push(scene.hooks_mut().attach(id, RenderStage::BeforeRender));
            self.hooks
                .push(scene.hooks_mut().attach(id, RenderStage::AfterRender));
        }

        self.started = true;
        debug!(hooks = self.hooks.len(), "clipping started");
    }

    pub fn stop(&mut self, scene: &mut Scene) {
        if !self.started {
            return;
        }
        self.gizmo.set_enabled(false);
        self.detach_hooks(scene);
        self.clip = ClipSet::empty();
        scene.clear_active_clip();
        self.started = false;
        debug!("clipping stopped");
    }

    /// Recomputes the six planes from the volume's current transform and
    /// installs them atomically. On a degenerate volume the previous clip
    /// set stays authoritative; derivation failures never cross the render
    /// loop boundary.
    pub fn pre_render(&mut self, scene: &mut Scene) {
        if !self.started {
            return;
        }
        if let Some(mesh) = scene.mesh_mut(self.volume_mesh) {
            mesh.transform = self.volume.transform;
        }
        match self.volume.derive_planes() {
            Ok(set) => {
                self.clip = set.clone();
                scene.set_active_clip(set);
            }
            Err(err) => {
                warn!(%err, "clip plane derivation failed, keeping previous clip set");
                scene.set_active_clip(self.clip.clone());
            }
        }
    }

    /// Clears the scene's active clip so it cannot leak into render passes
    /// outside the clipped meshes, such as gizmo drawing.
    pub fn post_render(&mut self, scene: &mut Scene) {
        if !self.started {
            return;
        }
        scene.clear_active_clip();
    }

    /// Releases scene objects: detaches any remaining hooks and removes the
    /// auxiliary volume mesh.
    pub fn clear(&mut self, scene: &mut Scene) {
        self.detach_hooks(scene);
        scene.remove_mesh(self.volume_mesh);
    }

    pub fn set_visible(&mut self, scene: &mut Scene, visible: bool) {
        if let Some(mesh) = scene.mesh_mut(self.volume_mesh) {
            mesh.visible = visible;
        }
    }

    /// Opacity of the clip volume's visual material, clamped to [0, 1].
    pub fn set_volume_opacity(&mut self, scene: &mut Scene, value: f64) {
        let value = value.clamp(0.0, 1.0);
        if let Some(mesh) = scene.mesh_mut(self.volume_mesh) {
            mesh.alpha = value;
        }
    }

    pub fn clip_set(&self) -> &ClipSet {
        &self.clip
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn volume(&self) -> &BoxVolume {
        &self.volume
    }

    /// The gizmo writes manipulated transforms back through this.
    pub fn volume_mut(&mut self) -> &mut BoxVolume {
        &mut self.volume
    }

    pub fn volume_mesh_id(&self) -> Guid {
        self.volume_mesh
    }

    pub fn gizmo(&self) -> &dyn BoxGizmo {
        self.gizmo.as_ref()
    }

    fn is_clippable(&self, mesh: &SceneMesh) -> bool {
        if mesh.id() == self.volume_mesh {
            return false;
        }
        match &self.filter {
            Some(filter) => filter(mesh),
            None => true,
        }
    }

    fn detach_hooks(&mut self, scene: &mut Scene) {
        for hook in self.hooks.drain(..) {
            scene.hooks_mut().detach(hook);
        }
    }
}

impl Tool for ClipController {
    fn start(&mut self, scene: &mut Scene) {
        ClipController::start(self, scene);
    }

    fn stop(&mut self, scene: &mut Scene) {
        ClipController::stop(self, scene);
    }

    fn clear(&mut self, scene: &mut Scene) {
        ClipController::clear(self, scene);
    }

    fn set_visible(&mut self, scene: &mut Scene, visible: bool) {
        ClipController::set_visible(self, scene, visible);
    }
}
