//! Host engine capability surface
//!
//! # Архитектура
//!
//! Session core НЕ владеет scene graph — им владеет внешний движок
//! (rendering + physics + replication клиентам). Core видит его через
//! `SceneHost` trait:
//! - actors: create / create_from_library / destroy (каскадно на детей)
//! - attachment: attach / detach к named point пользователя
//! - asset caches: mesh/material lookup-by-name + create
//! - click behavior: `bind_click` (повторный bind заменяет старый)
//! - menu grid geometry: `layout_row`
//!
//! Все операции синхронные и надёжные: ошибки движка для core неустранимы,
//! поэтому trait не возвращает `Result`.
//!
//! Клики движок доставляет обратно как `ClickEvent` (ECS event) с тем
//! `ClickBinding`, который core повесил на actor.

use bevy::prelude::*;
use std::fmt;

use crate::template::{AttachPoint, Dimensions};

pub mod memory;


pub use memory::{ActorNode, MemoryHost, SceneGraph};

// ============================================================================
// Handles
// ============================================================================

/// Actor handle (выдаётся движком)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u64);

/// User identity в сессии
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

// ============================================================================
// Actor description
// ============================================================================

/// Где живёт actor
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Local transform относительно parent (или мира)
    Local(Transform),
    /// Привязан к named point на аватаре пользователя
    Attached { user: UserId, point: AttachPoint },
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Local(Transform::IDENTITY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    pub mesh: MeshId,
    pub material: MaterialId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColliderShape {
    Box,
    /// Форма по mesh actor'а
    Auto,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CollisionLayer {
    #[default]
    Default,
    /// Кликабельно, но без физического взаимодействия
    Hologram,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColliderSpec {
    pub shape: ColliderShape,
    pub layer: CollisionLayer,
}

impl ColliderSpec {
    pub const fn hologram(shape: ColliderShape) -> Self {
        Self {
            shape,
            layer: CollisionLayer::Hologram,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActorSpec {
    pub name: Option<String>,
    pub parent: Option<ActorId>,
    pub placement: Placement,
    pub appearance: Option<Appearance>,
    pub collider: Option<ColliderSpec>,
}

impl ActorSpec {
    pub fn child_of(parent: ActorId, local: Transform) -> Self {
        Self {
            parent: Some(parent),
            placement: Placement::Local(local),
            ..Default::default()
        }
    }
}

/// Material описание (asset cache)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialSpec {
    /// RGBA, linear
    pub color: [f32; 4],
    pub alpha_blend: bool,
}

impl MaterialSpec {
    /// Полностью прозрачный (для trigger / collider volumes)
    pub const INVISIBLE: Self = Self {
        color: [1.0, 0.0, 0.0, 0.0],
        alpha_blend: true,
    };
}

// ============================================================================
// Click behavior
// ============================================================================

/// Что означает клик по actor'у. Хранится движком per-actor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClickBinding {
    /// Ячейка меню → toggle equip шаблона
    MenuCell { template: String },
    /// Trigger volume prop'а, идентифицируется anchor'ом instance
    Trigger { anchor: ActorId },
}

/// Клик пользователя по bound actor'у (host → core)
#[derive(Event, Clone, Debug, PartialEq)]
pub struct ClickEvent {
    pub binding: ClickBinding,
    pub user: UserId,
}

/// Ячейка single-row grid (геометрию считает движок)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    pub column: usize,
    pub width: f32,
    pub height: f32,
    pub contents: ActorId,
}

// ============================================================================
// SceneHost
// ============================================================================

/// Capability surface внешнего движка
pub trait SceneHost: Send + Sync + 'static {
    fn create_actor(&mut self, spec: ActorSpec) -> ActorId;

    /// Actor из library resource (модель, bullet)
    fn create_from_library(&mut self, resource_id: &str, spec: ActorSpec) -> ActorId;

    /// Уничтожает actor и всех его детей
    fn destroy(&mut self, actor: ActorId);

    fn attach(&mut self, actor: ActorId, user: UserId, point: AttachPoint);

    fn detach(&mut self, actor: ActorId);

    fn find_mesh(&self, name: &str) -> Option<MeshId>;

    fn create_box_mesh(&mut self, name: &str, dimensions: Dimensions) -> MeshId;

    fn find_material(&self, name: &str) -> Option<MaterialId>;

    fn create_material(&mut self, name: &str, spec: MaterialSpec) -> MaterialId;

    /// Повторный bind того же actor'а заменяет binding
    fn bind_click(&mut self, actor: ActorId, binding: ClickBinding);

    fn layout_row(&mut self, anchor: ActorId, cells: &[GridCell]);
}

// ============================================================================
// Cache helpers (lookup miss → create, не ошибка)
// ============================================================================

pub const INVISIBLE_MATERIAL: &str = "invisible";

/// Box mesh по каноническому ключу размеров
pub fn box_mesh(host: &mut dyn SceneHost, dimensions: Dimensions) -> MeshId {
    let key = dimensions.cache_key();
    match host.find_mesh(&key) {
        Some(mesh) => mesh,
        None => host.create_box_mesh(&key, dimensions),
    }
}

pub fn invisible_material(host: &mut dyn SceneHost) -> MaterialId {
    match host.find_material(INVISIBLE_MATERIAL) {
        Some(material) => material,
        None => host.create_material(INVISIBLE_MATERIAL, MaterialSpec::INVISIBLE),
    }
}

/// Resource: движок сессии
#[derive(Resource)]
pub struct Scene {
    host: Box<dyn SceneHost>,
}

impl Scene {
    pub fn new(host: impl SceneHost) -> Self {
        Self {
            host: Box::new(host),
        }
    }

    pub fn host(&mut self) -> &mut dyn SceneHost {
        self.host.as_mut()
    }
}
