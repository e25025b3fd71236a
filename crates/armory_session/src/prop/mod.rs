//! PropInstance — один живой prop (equipped или world-spawned)
//!
//! # Lifecycle
//!
//! ```text
//! create ──► (activate)* ──► (reattach)* ──► remove
//! ```
//!
//! Instance владеет только своими handles (anchor, trigger) и никогда
//! не лезет в registries сессии. `remove` поглощает instance — после
//! него переиспользовать нечего.
//!
//! # Actor tree
//!
//! ```text
//! anchor (attached к user ИЛИ local transform)
//!  ├─ model   (library resource)
//!  ├─ trigger (invisible box, hologram collider, click → Trigger{anchor})
//!  └─ bullet* (ephemeral, уничтожаются по ttl)
//! ```

use std::sync::Arc;
use std::time::Duration;

use crate::host::{
    box_mesh, invisible_material, ActorId, ActorSpec, Appearance, ClickBinding, ColliderShape,
    ColliderSpec, Placement, SceneHost, UserId,
};
use crate::logger;
use crate::template::{AttachPoint, PropTemplate};

#[cfg(test)]
mod prop_tests;

/// Чей prop: владелец решает кто может активировать trigger
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropKind {
    /// Equipped пользователем — стреляет только владелец
    Owned(UserId),
    /// World-spawned — общий для всей сессии
    Shared,
}

impl PropKind {
    pub fn owner(&self) -> Option<UserId> {
        match self {
            PropKind::Owned(user) => Some(*user),
            PropKind::Shared => None,
        }
    }

    pub fn permits(&self, user: UserId) -> bool {
        match self {
            PropKind::Owned(owner) => *owner == user,
            PropKind::Shared => true,
        }
    }
}

/// Ephemeral sub-object, созданный активацией (владеет им таймер)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EphemeralSpawn {
    pub actor: ActorId,
    pub ttl: Duration,
}

#[derive(Debug)]
pub struct PropInstance {
    template: Arc<PropTemplate>,
    kind: PropKind,
    anchor: ActorId,
    trigger: Option<ActorId>,
}

impl PropInstance {
    /// Anchor + model + trigger, trigger сразу кликабелен
    pub fn create(host: &mut dyn SceneHost, template: Arc<PropTemplate>, kind: PropKind) -> Self {
        let placement = match (kind, template.attach_point) {
            (PropKind::Owned(user), Some(point)) => Placement::Attached { user, point },
            _ => Placement::Local(
                template
                    .transform
                    .unwrap_or_default()
                    .to_transform(),
            ),
        };

        let anchor = host.create_actor(ActorSpec {
            name: Some(template.name.clone()),
            placement,
            ..Default::default()
        });

        host.create_from_library(
            &template.model.resource_id,
            ActorSpec::child_of(anchor, template.model.transform.unwrap_or_default().to_transform()),
        );

        let mesh = box_mesh(host, template.trigger.dimensions);
        let material = invisible_material(host);
        let trigger = host.create_actor(ActorSpec {
            name: Some("trigger".into()),
            parent: Some(anchor),
            placement: Placement::Local(
                template
                    .trigger
                    .transform
                    .unwrap_or_default()
                    .to_transform(),
            ),
            appearance: Some(Appearance { mesh, material }),
            collider: Some(ColliderSpec::hologram(ColliderShape::Auto)),
        });

        let instance = Self {
            template,
            kind,
            anchor,
            trigger: Some(trigger),
        };
        instance.bind_trigger(host);

        logger::log(&format!(
            "🔫 Created prop '{}' ({:?}) anchor {:?}",
            instance.template.name, instance.kind, instance.anchor
        ));

        instance
    }

    pub fn template(&self) -> &Arc<PropTemplate> {
        &self.template
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn kind(&self) -> PropKind {
        self.kind
    }

    pub fn anchor(&self) -> ActorId {
        self.anchor
    }

    pub fn trigger(&self) -> Option<ActorId> {
        self.trigger
    }

    /// Trigger activation → bullet (или None если активировал не владелец)
    ///
    /// Каждая активация независима: свой actor, свой ttl.
    pub fn activate(
        &self,
        host: &mut dyn SceneHost,
        user: UserId,
        default_ttl: Duration,
    ) -> Option<EphemeralSpawn> {
        if !self.kind.permits(user) {
            logger::log(&format!(
                "Ignored trigger on '{}' by {} (owner {:?})",
                self.template.name,
                user,
                self.kind.owner()
            ));
            return None;
        }

        let bullet = &self.template.bullet;
        let actor = host.create_from_library(
            &bullet.resource_id,
            ActorSpec::child_of(self.anchor, bullet.transform.to_transform()),
        );

        Some(EphemeralSpawn {
            actor,
            ttl: bullet.ttl_or(default_ttl),
        })
    }

    /// Повторить attachment для клиентов, подключившихся позже
    ///
    /// Shared instance никогда не двигается → no-op.
    pub fn reattach(&self, host: &mut dyn SceneHost) {
        let PropKind::Owned(user) = self.kind else {
            return;
        };

        let point = self.template.attach_point.unwrap_or(AttachPoint::RightHand);
        host.detach(self.anchor);
        host.attach(self.anchor, user, point);

        self.bind_trigger(host);
    }

    /// Re-bind click на trigger (idempotent: binding заменяется)
    pub fn bind_trigger(&self, host: &mut dyn SceneHost) {
        if let Some(trigger) = self.trigger {
            host.bind_click(trigger, ClickBinding::Trigger { anchor: self.anchor });
        }
    }

    /// Уничтожить trigger и anchor (каскадно: model + живые bullets)
    pub fn remove(self, host: &mut dyn SceneHost) {
        if let Some(trigger) = self.trigger {
            host.destroy(trigger);
        }
        host.destroy(self.anchor);

        logger::log(&format!(
            "🗑️ Removed prop '{}' ({:?})",
            self.template.name, self.kind
        ));
    }
}
