//! Ephemeral sub-objects (bullets)
//!
//! Одна ECS entity на bullet: `Ephemeral { actor, timer }`.
//! Таймеры независимые — быстрые повторные активации не отменяют друг друга.
//! Если anchor уже уничтожен (unequip / leave), destroy bullet'а — no-op в движке.

use bevy::prelude::*;

use crate::host::{ActorId, Scene};
use crate::prop::EphemeralSpawn;

#[derive(Component, Debug)]
pub struct Ephemeral {
    pub actor: ActorId,
    pub timer: Timer,
}

impl From<EphemeralSpawn> for Ephemeral {
    fn from(spawn: EphemeralSpawn) -> Self {
        Self {
            actor: spawn.actor,
            timer: Timer::new(spawn.ttl, TimerMode::Once),
        }
    }
}

/// System: tick ttl → destroy actor + despawn entity
pub fn expire_ephemerals(
    mut commands: Commands,
    mut ephemerals: Query<(Entity, &mut Ephemeral)>,
    mut scene: ResMut<Scene>,
    time: Res<Time>,
) {
    for (entity, mut ephemeral) in ephemerals.iter_mut() {
        if !ephemeral.timer.tick(time.delta()).finished() {
            continue;
        }

        scene.host().destroy(ephemeral.actor);
        commands.entity(entity).despawn();

        crate::logger::log(&format!("💨 Ephemeral {:?} expired", ephemeral.actor));
    }
}
