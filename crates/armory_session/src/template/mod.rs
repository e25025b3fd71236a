//! Prop templates — неизменяемые описания props
//!
//! # Архитектура
//!
//! **PropTemplate** — статический blueprint (visual + collider + trigger + bullet):
//! - Загружается один раз при старте сессии (built-in defaults или remote JSON)
//! - Хранится в `TemplateSet` resource (порядок = порядок в источнике)
//! - `attach_point` — единственный дискриминатор:
//!   - есть → attachable (ячейка меню, equip на пользователя)
//!   - нет → world-spawned singleton (один instance на сессию)
//!
//! # JSON
//!
//! ```json
//! [{
//!   "name": "revolver",
//!   "attachPoint": "left-hand",
//!   "dimensions": { "width": 0.04, "height": 0.1, "depth": 0.25 },
//!   "model": { "resourceId": "artifact:...", "transform": { "position": { "x": 0.04 } } },
//!   "bullet": { "resourceId": "artifact:...", "transform": {}, "ttl": 10 }
//! }]
//! ```

use bevy::math::EulerRot;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

mod defaults;
mod error;
mod source;


pub use defaults::default_templates;
pub use error::TemplateError;
pub use source::{HttpTemplateFetcher, TemplateFetcher};

// ============================================================================
// Geometry primitives (wire form)
// ============================================================================

/// Vector в engine-native единицах (отсутствующие компоненты = 0)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3Like {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Vector3Like {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Partial local transform; rotation — Euler углы в градусах
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformLike {
    #[serde(default)]
    pub position: Vector3Like,
    #[serde(default)]
    pub rotation: Vector3Like,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Vector3Like>,
}

impl TransformLike {
    pub const fn at(position: Vector3Like) -> Self {
        Self {
            position,
            rotation: Vector3Like::new(0.0, 0.0, 0.0),
            scale: None,
        }
    }

    pub fn to_transform(&self) -> Transform {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        );

        Transform {
            translation: self.position.to_vec3(),
            rotation,
            scale: self.scale.map(Vector3Like::to_vec3).unwrap_or(Vec3::ONE),
        }
    }

    /// Menu preview показывает модель без roll (rotation.z = 0)
    pub fn without_roll(mut self) -> Self {
        self.rotation.z = 0.0;
        self
    }
}

/// Box dimensions (collider / trigger volume)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self { width, height, depth }
    }

    /// Канонический ключ geometry cache: одинаковые размеры → один mesh
    pub fn cache_key(&self) -> String {
        format!("{},{},{}", self.width, self.height, self.depth)
    }
}

/// Named attach point на аватаре пользователя
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AttachPoint {
    Camera,
    Head,
    Neck,
    Hips,
    CenterEye,
    SpineTop,
    SpineMiddle,
    SpineBottom,
    LeftEye,
    RightEye,
    LeftUpperArm,
    RightUpperArm,
    LeftLowerArm,
    RightLowerArm,
    LeftHand,
    #[default]
    RightHand,
    LeftUpperLeg,
    RightUpperLeg,
    LeftLowerLeg,
    RightLowerLeg,
    LeftFoot,
    RightFoot,
}

// ============================================================================
// PropTemplate
// ============================================================================

/// Visual model (library resource)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelSpec {
    pub resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformLike>,
}

/// Invisible trigger volume (кликабельная часть prop)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub dimensions: Dimensions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformLike>,
}

impl Default for TriggerSpec {
    /// Общий trigger для шаблонов без своего: маленький куб у спускового крючка
    fn default() -> Self {
        Self {
            dimensions: Dimensions::new(0.04, 0.04, 0.04),
            transform: Some(TransformLike::at(Vector3Like::new(0.06, -0.035, 0.14))),
        }
    }
}

/// Ephemeral sub-object, создаётся на каждую активацию trigger
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulletSpec {
    pub resource_id: String,
    #[serde(default)]
    pub transform: TransformLike,
    /// Time-to-live в секундах
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<f32>,
}

impl BulletSpec {
    /// ttl шаблона, иначе `fallback` (отсутствует / 0 / мусор / не влезает в Duration)
    pub fn ttl_or(&self, fallback: Duration) -> Duration {
        match self.ttl {
            Some(secs) if secs > 0.0 => Duration::try_from_secs_f32(secs).unwrap_or(fallback),
            _ => fallback,
        }
    }
}

/// Static prop template (blueprint)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropTemplate {
    /// Unique в пределах TemplateSet
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attach_point: Option<AttachPoint>,
    /// Anchor transform для world-spawned шаблонов
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformLike>,
    /// Collider ячейки меню (None → `DEFAULT_CELL_DIMENSIONS`)
    #[serde(default, alias = "colliderDimensions", skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    pub model: ModelSpec,
    #[serde(default)]
    pub trigger: TriggerSpec,
    pub bullet: BulletSpec,
}

impl PropTemplate {
    pub fn is_attachable(&self) -> bool {
        self.attach_point.is_some()
    }
}

// ============================================================================
// TemplateSet
// ============================================================================

/// Загруженный набор шаблонов (resource, владелец — SessionController)
#[derive(Resource, Clone, Debug, Default)]
pub struct TemplateSet {
    templates: Vec<Arc<PropTemplate>>,
}

impl TemplateSet {
    /// Собрать набор; имена обязаны быть уникальными
    pub fn new(templates: Vec<PropTemplate>) -> Result<Self, TemplateError> {
        let mut seen = std::collections::HashSet::new();
        for template in &templates {
            if !seen.insert(template.name.as_str()) {
                return Err(TemplateError::DuplicateName(template.name.clone()));
            }
        }

        Ok(Self {
            templates: templates.into_iter().map(Arc::new).collect(),
        })
    }

    /// Built-in набор (используется когда url не задан)
    pub fn defaults() -> Self {
        Self {
            templates: default_templates().into_iter().map(Arc::new).collect(),
        }
    }

    /// JSON array of templates
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let templates: Vec<PropTemplate> = serde_json::from_str(json)?;
        Self::new(templates)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<PropTemplate>> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<PropTemplate>> {
        self.templates.iter()
    }

    /// Шаблоны для меню (с attach point), в исходном порядке
    pub fn attachable(&self) -> impl Iterator<Item = &Arc<PropTemplate>> {
        self.templates.iter().filter(|t| t.is_attachable())
    }

    /// World-spawned singletons (без attach point)
    pub fn world_spawned(&self) -> impl Iterator<Item = &Arc<PropTemplate>> {
        self.templates.iter().filter(|t| !t.is_attachable())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
