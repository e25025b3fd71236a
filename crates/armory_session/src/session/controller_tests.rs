//! Tests for SessionController transitions (driven through SessionPlugin).

use std::time::Duration;

use bevy::time::TimeUpdateStrategy;

use super::*;
use crate::host::{MemoryHost, Scene, UserId};
use crate::menu::MenuLayout;

const ALICE: UserId = UserId(1);
const BOB: UserId = UserId(2);

#[derive(Resource, Default)]
struct Reconciles(Vec<ReconcileCompleted>);

fn collect_reconciles(mut events: EventReader<ReconcileCompleted>, mut log: ResMut<Reconciles>) {
    log.0.extend(events.read().cloned());
}

fn create_test_app(host: &MemoryHost) -> App {
    let mut app = crate::create_headless_app();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)))
        .insert_resource(Scene::new(host.clone()))
        .add_plugins(SessionPlugin)
        .init_resource::<Reconciles>()
        .add_systems(PostUpdate, collect_reconciles);
    app
}

fn started_app(host: &MemoryHost) -> App {
    let mut app = create_test_app(host);
    app.world_mut().send_event(SessionStarted);
    app.update();
    app
}

fn toggle(app: &mut App, user: UserId, template: &str) {
    app.world_mut().send_event(ToggleEquipIntent {
        user,
        template: template.to_string(),
    });
    app.update();
}

#[test]
fn test_start_without_url_uses_defaults() {
    let host = MemoryHost::new();
    let app = started_app(&host);

    assert_eq!(*app.world().resource::<SessionPhase>(), SessionPhase::Running);

    let menu = app.world().resource::<MenuLayout>();
    let names: Vec<&str> = menu.cells().iter().map(|cell| cell.template.as_str()).collect();
    assert_eq!(names, vec!["revolver"]);

    let spawned = app.world().resource::<SpawnedRegistry>();
    assert_eq!(spawned.len(), 1);
    assert!(spawned.contains("confetti"));

    host.inspect(|graph| {
        let anchor = menu.anchor().expect("menu anchor");
        let layout = graph.layout(anchor).expect("menu layout");
        assert_eq!(layout.len(), 1);
        assert_eq!(layout[0].width, 0.04);
    });
}

#[test]
fn test_repeated_start_keeps_single_world_prop() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);
    let confetti_before = host.inspect(|graph| graph.live_with_resource("artifact:2044223538646221085").len());

    app.world_mut().send_event(SessionStarted);
    app.update();

    assert_eq!(app.world().resource::<SpawnedRegistry>().len(), 1);
    assert_eq!(app.world().resource::<MenuLayout>().cells().len(), 1);
    host.inspect(|graph| {
        assert_eq!(graph.live_with_resource("artifact:2044223538646221085").len(), confetti_before);
    });
}

#[test]
fn test_toggle_equips_then_unequips() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);

    toggle(&mut app, ALICE, "revolver");
    let anchor = {
        let equipped = app.world().resource::<EquippedRegistry>();
        let prop = equipped.get(ALICE).expect("alice holds revolver");
        assert_eq!(prop.name(), "revolver");
        prop.anchor()
    };
    assert!(host.inspect(|graph| graph.is_alive(anchor)));

    toggle(&mut app, ALICE, "revolver");
    assert!(app.world().resource::<EquippedRegistry>().is_empty());
    assert!(!host.inspect(|graph| graph.is_alive(anchor)));
}

#[test]
fn test_selecting_other_cell_while_equipped_unequips() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);

    toggle(&mut app, ALICE, "revolver");
    toggle(&mut app, ALICE, "confetti");

    // swap = два клика
    assert!(!app.world().resource::<EquippedRegistry>().contains(ALICE));
}

#[test]
fn test_unknown_template_is_ignored() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);
    let live_before = host.inspect(|graph| graph.live_count());

    toggle(&mut app, ALICE, "bazooka");

    assert!(app.world().resource::<EquippedRegistry>().is_empty());
    assert_eq!(host.inspect(|graph| graph.live_count()), live_before);
}

#[test]
fn test_users_hold_independent_props() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);

    toggle(&mut app, ALICE, "revolver");
    toggle(&mut app, BOB, "revolver");

    let equipped = app.world().resource::<EquippedRegistry>();
    assert_eq!(equipped.len(), 2);
    let alice = equipped.get(ALICE).expect("alice").anchor();
    let bob = equipped.get(BOB).expect("bob").anchor();
    assert_ne!(alice, bob);
}

#[test]
fn test_leave_removes_equipped_prop() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);
    toggle(&mut app, ALICE, "revolver");
    let anchor = app.world().resource::<EquippedRegistry>().get(ALICE).expect("equipped").anchor();

    app.world_mut().send_event(UserLeft { user: ALICE });
    app.update();

    assert!(app.world().resource::<EquippedRegistry>().is_empty());
    assert!(!host.inspect(|graph| graph.is_alive(anchor)));

    // повторный leave — no-op
    app.world_mut().send_event(UserLeft { user: ALICE });
    app.update();
    assert_eq!(app.world().resource::<SpawnedRegistry>().len(), 1);
}

#[test]
fn test_joins_coalesce_into_one_reconcile() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);

    app.world_mut().send_event(UserJoined { user: ALICE });
    app.update();
    app.world_mut().send_event(UserJoined { user: BOB });
    for _ in 0..4 {
        app.update();
    }
    assert!(app.world().resource::<Reconciles>().0.is_empty());
    assert!(app.world().resource::<PendingSync>().is_pending());

    for _ in 0..10 {
        app.update();
    }

    let reconciles = &app.world().resource::<Reconciles>().0;
    assert_eq!(reconciles.len(), 1);
    assert_eq!(reconciles[0], ReconcileCompleted { equipped: 0, spawned: 1 });
    assert!(!app.world().resource::<PendingSync>().is_pending());
}

#[test]
fn test_reconcile_reattaches_and_rebinds() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);
    toggle(&mut app, ALICE, "revolver");

    let revolver = app.world().resource::<EquippedRegistry>().get(ALICE).expect("equipped").anchor();
    let (confetti_anchor, confetti_trigger) = app
        .world()
        .resource::<SpawnedRegistry>()
        .get("confetti")
        .map(|prop| (prop.anchor(), prop.trigger().expect("trigger")))
        .expect("spawned");
    let cell = app.world().resource::<MenuLayout>().cell("revolver").expect("cell").collider;

    app.world_mut().send_event(UserJoined { user: BOB });
    for _ in 0..15 {
        app.update();
    }

    host.inspect(|graph| {
        let anchor = graph.actor(revolver).expect("revolver");
        assert_eq!(anchor.detach_count, 1);
        assert_eq!(anchor.attach_count, 2);
        assert!(anchor.attached_to().is_some_and(|(user, _)| user == ALICE));

        // shared prop не двигается, но trigger перепривязан
        let shared = graph.actor(confetti_anchor).expect("confetti");
        assert_eq!(shared.attach_count, 0);
        assert_eq!(shared.detach_count, 0);
        assert_eq!(graph.actor(confetti_trigger).expect("trigger").bind_count, 2);

        assert_eq!(graph.actor(cell).expect("cell").bind_count, 2);
    });

    let reconciles = &app.world().resource::<Reconciles>().0;
    assert_eq!(reconciles.as_slice(), &[ReconcileCompleted { equipped: 1, spawned: 1 }]);
}

#[test]
fn test_reconcile_sees_state_at_fire_time() {
    let host = MemoryHost::new();
    let mut app = started_app(&host);

    app.world_mut().send_event(UserJoined { user: BOB });
    app.update();
    toggle(&mut app, ALICE, "revolver");
    for _ in 0..15 {
        app.update();
    }

    let reconciles = &app.world().resource::<Reconciles>().0;
    assert_eq!(reconciles.as_slice(), &[ReconcileCompleted { equipped: 1, spawned: 1 }]);
}
