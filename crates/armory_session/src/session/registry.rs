//! Instance registries — эксклюзивное состояние SessionController
//!
//! Снаружи только чтение; мутации `pub(crate)` и идут через controller.
//! BTreeMap → детерминированный порядок reconciliation.

use bevy::prelude::*;
use std::collections::BTreeMap;

use crate::host::{ActorId, UserId};
use crate::prop::PropInstance;

/// user → equipped instance (не больше одного на пользователя)
#[derive(Resource, Debug, Default)]
pub struct EquippedRegistry {
    by_user: BTreeMap<UserId, PropInstance>,
}

impl EquippedRegistry {
    pub fn get(&self, user: UserId) -> Option<&PropInstance> {
        self.by_user.get(&user)
    }

    pub fn contains(&self, user: UserId) -> bool {
        self.by_user.contains_key(&user)
    }

    pub fn len(&self) -> usize {
        self.by_user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_user.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UserId, &PropInstance)> {
        self.by_user.iter().map(|(user, prop)| (*user, prop))
    }

    pub fn find_by_anchor(&self, anchor: ActorId) -> Option<&PropInstance> {
        self.by_user.values().find(|prop| prop.anchor() == anchor)
    }

    /// Занятый слот → instance возвращается обратно
    pub(crate) fn insert(&mut self, user: UserId, prop: PropInstance) -> Result<(), PropInstance> {
        if self.by_user.contains_key(&user) {
            return Err(prop);
        }
        self.by_user.insert(user, prop);
        Ok(())
    }

    pub(crate) fn take(&mut self, user: UserId) -> Option<PropInstance> {
        self.by_user.remove(&user)
    }
}

/// template name → world-spawned instance (singleton per name)
#[derive(Resource, Debug, Default)]
pub struct SpawnedRegistry {
    by_name: BTreeMap<String, PropInstance>,
}

impl SpawnedRegistry {
    pub fn get(&self, name: &str) -> Option<&PropInstance> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropInstance)> {
        self.by_name.iter().map(|(name, prop)| (name.as_str(), prop))
    }

    pub fn find_by_anchor(&self, anchor: ActorId) -> Option<&PropInstance> {
        self.by_name.values().find(|prop| prop.anchor() == anchor)
    }

    pub(crate) fn insert(&mut self, prop: PropInstance) -> Result<(), PropInstance> {
        if self.by_name.contains_key(prop.name()) {
            return Err(prop);
        }
        self.by_name.insert(prop.name().to_string(), prop);
        Ok(())
    }
}
