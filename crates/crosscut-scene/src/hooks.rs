use crosscut_base::Guid;

/// Stage a per-mesh render hook is bound to. Before-render hooks run ahead
/// of any pick or draw in the frame; after-render hooks run once all draw
/// calls finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStage {
    BeforeRender,
    AfterRender,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HookId(Guid);

#[derive(Clone, Copy, Debug)]
struct HookEntry {
    id: HookId,
    mesh: Guid,
    stage: RenderStage,
}

/// Subscription records for per-mesh render hooks. Entries carry no
/// callbacks; the host render loop asks the owning controller to run its
/// stage explicitly, which keeps frame ordering structural.
#[derive(Debug, Default)]
pub struct HookRegistry {
    entries: Vec<HookEntry>,
}

impl HookRegistry {
    pub fn attach(&mut self, mesh: Guid, stage: RenderStage) -> HookId {
        let id = HookId(Guid::new());
        self.entries.push(HookEntry { id, mesh, stage });
        id
    }

    pub fn detach(&mut self, id: HookId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn detach_mesh(&mut self, mesh: Guid) {
        self.entries.retain(|entry| entry.mesh != mesh);
    }

    pub fn count_for(&self, mesh: Guid, stage: RenderStage) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.mesh == mesh && entry.stage == stage)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    Move,
    Down,
    Up,
}

/// Pointer event in canvas pixel coordinates.
#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerEventKind::Move,
            x,
            y,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObserverId(Guid);

/// Pointer-observer subscriptions, same record-only shape as `HookRegistry`.
#[derive(Debug, Default)]
pub struct ObserverRegistry {
    ids: Vec<ObserverId>,
}

impl ObserverRegistry {
    pub fn add(&mut self) -> ObserverId {
        let id = ObserverId(Guid::new());
        self.ids.push(id);
        id
    }

    pub fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|existing| *existing != id);
        self.ids.len() != before
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
