//! Tests for PropInstance lifecycle.

use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::host::{ClickBinding, MemoryHost, Placement};
use crate::template::{AttachPoint, TemplateSet};

const DEFAULT_TTL: Duration = Duration::from_secs(5);

fn template(name: &str) -> Arc<PropTemplate> {
    TemplateSet::defaults()
        .get(name)
        .cloned()
        .expect("default template")
}

#[test]
fn test_create_owned_attaches_to_user() {
    let mut host = MemoryHost::new();
    let user = UserId(1);
    let prop = PropInstance::create(&mut host, template("revolver"), PropKind::Owned(user));

    host.inspect(|graph| {
        let anchor = graph.actor(prop.anchor()).expect("anchor");
        assert_eq!(anchor.attached_to(), Some((user, AttachPoint::LeftHand)));

        let children = graph.children_of(prop.anchor());
        assert_eq!(children.len(), 2, "model + trigger");

        let trigger = graph.actor(prop.trigger().expect("trigger")).expect("trigger node");
        assert_eq!(trigger.name.as_deref(), Some("trigger"));
        assert_eq!(trigger.binding, Some(ClickBinding::Trigger { anchor: prop.anchor() }));
        assert!(trigger.collider.is_some());
    });
}

#[test]
fn test_create_shared_uses_template_transform() {
    let mut host = MemoryHost::new();
    let prop = PropInstance::create(&mut host, template("confetti"), PropKind::Shared);

    host.inspect(|graph| {
        let anchor = graph.actor(prop.anchor()).expect("anchor");
        let Placement::Local(transform) = anchor.placement else {
            panic!("shared prop must not be attached");
        };
        assert_eq!(transform.translation.x, -1.0);
    });
}

#[test]
fn test_shared_geometry_cache() {
    let mut host = MemoryHost::new();
    let revolver = template("revolver");

    let a = PropInstance::create(&mut host, revolver.clone(), PropKind::Owned(UserId(1)));
    let b = PropInstance::create(&mut host, revolver, PropKind::Owned(UserId(2)));

    host.inspect(|graph| {
        let mesh_a = graph.actor(a.trigger().expect("a")).and_then(|n| n.appearance).map(|x| x.mesh);
        let mesh_b = graph.actor(b.trigger().expect("b")).and_then(|n| n.appearance).map(|x| x.mesh);
        assert_eq!(mesh_a, mesh_b);
        assert_eq!(graph.mesh_count(), 1);
    });
}

#[test]
fn test_activation_ownership() {
    let mut host = MemoryHost::new();
    let owner = UserId(1);
    let stranger = UserId(2);
    let prop = PropInstance::create(&mut host, template("revolver"), PropKind::Owned(owner));

    assert!(prop.activate(&mut host, stranger, DEFAULT_TTL).is_none());

    let spawn = prop.activate(&mut host, owner, DEFAULT_TTL).expect("owner fires");
    assert_eq!(spawn.ttl, Duration::from_secs(10));

    host.inspect(|graph| {
        let bullet = graph.actor(spawn.actor).expect("bullet");
        assert_eq!(bullet.parent, Some(prop.anchor()));
        assert_eq!(bullet.resource_id.as_deref(), Some("artifact:2044161675061363483"));
    });
}

#[test]
fn test_activation_with_oversized_ttl_uses_default() {
    let mut host = MemoryHost::new();
    let owner = UserId(1);
    let templates = TemplateSet::from_json(
        r#"[{ "name": "cannon", "attachPoint": "right-hand",
        "model": { "resourceId": "artifact:cannon" },
        "bullet": { "resourceId": "artifact:ball", "ttl": 1e20 } }]"#,
    )
    .expect("valid json");
    let cannon = templates.get("cannon").cloned().expect("cannon");

    let prop = PropInstance::create(&mut host, cannon, PropKind::Owned(owner));
    assert_eq!(prop.kind(), PropKind::Owned(owner));
    assert_eq!(prop.template().bullet.resource_id, "artifact:ball");

    let spawn = prop.activate(&mut host, owner, DEFAULT_TTL).expect("owner fires");
    assert_eq!(spawn.ttl, DEFAULT_TTL);
    assert!(host.inspect(|graph| graph.is_alive(spawn.actor)));
}

#[test]
fn test_shared_accepts_anyone_and_rapid_fire_is_independent() {
    let mut host = MemoryHost::new();
    let prop = PropInstance::create(&mut host, template("confetti"), PropKind::Shared);

    let first = prop.activate(&mut host, UserId(1), DEFAULT_TTL).expect("first");
    let second = prop.activate(&mut host, UserId(2), DEFAULT_TTL).expect("second");

    assert_ne!(first.actor, second.actor);
    host.inspect(|graph| {
        assert!(graph.is_alive(first.actor));
        assert!(graph.is_alive(second.actor));
    });
}

#[test]
fn test_reattach_owned_detaches_then_attaches() {
    let mut host = MemoryHost::new();
    let user = UserId(3);
    let prop = PropInstance::create(&mut host, template("revolver"), PropKind::Owned(user));

    prop.reattach(&mut host);

    host.inspect(|graph| {
        let anchor = graph.actor(prop.anchor()).expect("anchor");
        assert_eq!(anchor.detach_count, 1);
        assert_eq!(anchor.attach_count, 2);
        assert_eq!(anchor.attached_to(), Some((user, AttachPoint::LeftHand)));

        let trigger = graph.actor(prop.trigger().expect("trigger")).expect("trigger node");
        assert_eq!(trigger.bind_count, 2);
    });
}

#[test]
fn test_reattach_shared_is_noop() {
    let mut host = MemoryHost::new();
    let prop = PropInstance::create(&mut host, template("confetti"), PropKind::Shared);

    prop.reattach(&mut host);

    host.inspect(|graph| {
        let anchor = graph.actor(prop.anchor()).expect("anchor");
        assert_eq!(anchor.detach_count, 0);
        assert_eq!(anchor.attach_count, 0);
    });
}

#[test]
fn test_remove_destroys_tree() {
    let mut host = MemoryHost::new();
    let user = UserId(1);
    let prop = PropInstance::create(&mut host, template("revolver"), PropKind::Owned(user));
    let bullet = prop.activate(&mut host, user, DEFAULT_TTL).expect("bullet");
    let anchor = prop.anchor();

    prop.remove(&mut host);

    host.inspect(|graph| {
        assert!(!graph.is_alive(anchor));
        assert!(!graph.is_alive(bullet.actor));
        assert_eq!(graph.live_count(), 0);
    });
}
