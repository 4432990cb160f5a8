use crosscut_base::Guid;

/// Oriented bounding-box manipulation widget. The host binds it to a mesh
/// and writes the manipulated transform (free rotation, non-uniform scale)
/// back into that mesh's transform.
pub trait BoxGizmo {
    fn attach(&mut self, mesh: Guid);
    fn detach(&mut self);
    fn set_enabled(&mut self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

/// Plain gizmo state holder for tests and headless hosts.
#[derive(Debug, Default)]
pub struct GizmoHandle {
    attached: Option<Guid>,
    enabled: bool,
}

impl GizmoHandle {
    pub fn attached(&self) -> Option<Guid> {
        self.attached
    }
}

impl BoxGizmo for GizmoHandle {
    fn attach(&mut self, mesh: Guid) {
        self.attached = Some(mesh);
    }

    fn detach(&mut self) {
        self.attached = None;
        self.enabled = false;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
