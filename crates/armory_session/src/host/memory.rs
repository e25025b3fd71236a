//! MemoryHost — in-memory scene graph
//!
//! Реализация `SceneHost` без движка: headless binary + тесты.
//! Хранит actors, иерархию, attachments, bindings и счётчики вызовов
//! (attach/detach/bind), чтобы сценарии могли проверить что именно
//! core повторил при reconciliation.
//!
//! `MemoryHost` — cheap clone handle (Arc), один граф на все клоны:
//! сессия пишет, тест читает через `inspect`.

use bevy::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{
    ActorId, ActorSpec, Appearance, ClickBinding, ClickEvent, ColliderSpec, GridCell, MaterialId,
    MaterialSpec, MeshId, Placement, SceneHost, UserId,
};
use crate::template::{AttachPoint, Dimensions};

/// Actor в in-memory графе
#[derive(Clone, Debug)]
pub struct ActorNode {
    pub id: ActorId,
    pub name: Option<String>,
    pub parent: Option<ActorId>,
    /// Library resource (None для пустых actors)
    pub resource_id: Option<String>,
    pub placement: Placement,
    pub appearance: Option<Appearance>,
    pub collider: Option<ColliderSpec>,
    pub binding: Option<ClickBinding>,
    pub alive: bool,
    pub attach_count: u32,
    pub detach_count: u32,
    pub bind_count: u32,
}

impl ActorNode {
    pub fn attached_to(&self) -> Option<(UserId, AttachPoint)> {
        match self.placement {
            Placement::Attached { user, point } => Some((user, point)),
            Placement::Local(_) => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    next_id: u64,
    actors: BTreeMap<ActorId, ActorNode>,
    meshes: HashMap<String, (MeshId, Dimensions)>,
    materials: HashMap<String, (MaterialId, MaterialSpec)>,
    layouts: HashMap<ActorId, Vec<GridCell>>,
}

impl SceneGraph {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert(&mut self, resource_id: Option<&str>, spec: ActorSpec) -> ActorId {
        let id = ActorId(self.next_id());
        let attach_count = matches!(spec.placement, Placement::Attached { .. }) as u32;

        self.actors.insert(
            id,
            ActorNode {
                id,
                name: spec.name,
                parent: spec.parent,
                resource_id: resource_id.map(str::to_string),
                placement: spec.placement,
                appearance: spec.appearance,
                collider: spec.collider,
                binding: None,
                alive: true,
                attach_count,
                detach_count: 0,
                bind_count: 0,
            },
        );
        id
    }

    fn live_mut(&mut self, id: ActorId) -> Option<&mut ActorNode> {
        self.actors.get_mut(&id).filter(|node| node.alive)
    }

    pub fn actor(&self, id: ActorId) -> Option<&ActorNode> {
        self.actors.get(&id)
    }

    pub fn is_alive(&self, id: ActorId) -> bool {
        self.actors.get(&id).is_some_and(|node| node.alive)
    }

    pub fn live_actors(&self) -> impl Iterator<Item = &ActorNode> {
        self.actors.values().filter(|node| node.alive)
    }

    pub fn live_count(&self) -> usize {
        self.live_actors().count()
    }

    pub fn children_of(&self, id: ActorId) -> Vec<ActorId> {
        self.live_actors()
            .filter(|node| node.parent == Some(id))
            .map(|node| node.id)
            .collect()
    }

    /// Живые actors созданные из library resource
    pub fn live_with_resource(&self, resource_id: &str) -> Vec<ActorId> {
        self.live_actors()
            .filter(|node| node.resource_id.as_deref() == Some(resource_id))
            .map(|node| node.id)
            .collect()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn layout(&self, anchor: ActorId) -> Option<&[GridCell]> {
        self.layouts.get(&anchor).map(Vec::as_slice)
    }

    /// Клик пользователя: только живой и bound actor отвечает
    pub fn click(&self, actor: ActorId, user: UserId) -> Option<ClickEvent> {
        let node = self.actors.get(&actor).filter(|node| node.alive)?;
        let binding = node.binding.clone()?;
        Some(ClickEvent { binding, user })
    }

    fn destroy_recursive(&mut self, id: ActorId) {
        let Some(node) = self.live_mut(id) else {
            return;
        };
        node.alive = false;

        for child in self.children_of(id) {
            self.destroy_recursive(child);
        }
    }
}

/// Shared handle на in-memory граф
#[derive(Clone, Default)]
pub struct MemoryHost {
    graph: Arc<Mutex<SceneGraph>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SceneGraph> {
        self.graph.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read-only доступ к графу
    pub fn inspect<R>(&self, f: impl FnOnce(&SceneGraph) -> R) -> R {
        f(&self.lock())
    }
}

impl SceneHost for MemoryHost {
    fn create_actor(&mut self, spec: ActorSpec) -> ActorId {
        self.lock().insert(None, spec)
    }

    fn create_from_library(&mut self, resource_id: &str, spec: ActorSpec) -> ActorId {
        self.lock().insert(Some(resource_id), spec)
    }

    fn destroy(&mut self, actor: ActorId) {
        self.lock().destroy_recursive(actor);
    }

    fn attach(&mut self, actor: ActorId, user: UserId, point: AttachPoint) {
        if let Some(node) = self.lock().live_mut(actor) {
            node.placement = Placement::Attached { user, point };
            node.attach_count += 1;
        }
    }

    fn detach(&mut self, actor: ActorId) {
        if let Some(node) = self.lock().live_mut(actor) {
            node.placement = Placement::Local(Transform::IDENTITY);
            node.detach_count += 1;
        }
    }

    fn find_mesh(&self, name: &str) -> Option<MeshId> {
        self.lock().meshes.get(name).map(|(id, _)| *id)
    }

    fn create_box_mesh(&mut self, name: &str, dimensions: Dimensions) -> MeshId {
        let mut graph = self.lock();
        let id = MeshId(graph.next_id());
        graph.meshes.insert(name.to_string(), (id, dimensions));
        id
    }

    fn find_material(&self, name: &str) -> Option<MaterialId> {
        self.lock().materials.get(name).map(|(id, _)| *id)
    }

    fn create_material(&mut self, name: &str, spec: MaterialSpec) -> MaterialId {
        let mut graph = self.lock();
        let id = MaterialId(graph.next_id());
        graph.materials.insert(name.to_string(), (id, spec));
        id
    }

    fn bind_click(&mut self, actor: ActorId, binding: ClickBinding) {
        if let Some(node) = self.lock().live_mut(actor) {
            node.binding = Some(binding);
            node.bind_count += 1;
        }
    }

    fn layout_row(&mut self, anchor: ActorId, cells: &[GridCell]) {
        self.lock().layouts.insert(anchor, cells.to_vec());
    }
}
