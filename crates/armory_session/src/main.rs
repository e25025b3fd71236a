//! Headless сессия Armory
//!
//! Прогоняет сценарий (join → equip → trigger → leave) на in-memory движке.
//! Первый аргумент — url remote template set (иначе built-in templates).

use std::time::Duration;

use armory_session::host::ActorId;
use armory_session::menu::MenuLayout;
use armory_session::session::{EquippedRegistry, SessionPhase, SpawnedRegistry, URL_PARAM};
use armory_session::{create_session_app, MemoryHost, SessionConfig, SessionStarted, UserId, UserJoined, UserLeft};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

const TICK: Duration = Duration::from_millis(100);

fn click(app: &mut App, host: &MemoryHost, actor: ActorId, user: UserId) {
    if let Some(event) = host.inspect(|graph| graph.click(actor, user)) {
        app.world_mut().send_event(event);
    }
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn main() {
    let url = std::env::args().nth(1).unwrap_or_default();
    let config = SessionConfig::from_params([(URL_PARAM, url.as_str())]);
    println!("Starting Armory headless session (source: {:?})", config.source_url);

    let host = MemoryHost::new();
    let mut app = create_session_app(config, host.clone());
    app.insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

    app.world_mut().send_event(SessionStarted);
    for _ in 0..600 {
        app.update();
        if *app.world().resource::<SessionPhase>() != SessionPhase::Loading {
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    let phase = *app.world().resource::<SessionPhase>();
    if phase != SessionPhase::Running {
        eprintln!("Session did not start: {:?}", phase);
        std::process::exit(1);
    }

    let alice = UserId(1);
    let bob = UserId(2);
    app.world_mut().send_event(UserJoined { user: alice });
    app.world_mut().send_event(UserJoined { user: bob });
    run(&mut app, 15);

    // Alice выбирает первую ячейку меню
    let first_cell = app
        .world()
        .resource::<MenuLayout>()
        .cells()
        .first()
        .map(|cell| cell.collider);
    if let Some(collider) = first_cell {
        click(&mut app, &host, collider, alice);
        app.update();
    }

    // Alice и Bob жмут trigger её prop'а (сработает только у владельца)
    let trigger = app
        .world()
        .resource::<EquippedRegistry>()
        .get(alice)
        .and_then(|prop| prop.trigger());
    if let Some(trigger) = trigger {
        click(&mut app, &host, trigger, alice);
        click(&mut app, &host, trigger, bob);
        app.update();
    }

    // Bob жмёт world-spawned props (shared)
    let shared_triggers: Vec<ActorId> = app
        .world()
        .resource::<SpawnedRegistry>()
        .iter()
        .filter_map(|(_, prop)| prop.trigger())
        .collect();
    for trigger in shared_triggers {
        click(&mut app, &host, trigger, bob);
    }
    app.update();

    // Прогоняем 200 тиков (20 sec) — bullets истекают
    for tick in 0..200 {
        app.update();

        if tick % 50 == 0 {
            let live = host.inspect(|graph| graph.live_count());
            println!("Tick {}: {} live actors", tick, live);
        }
    }

    app.world_mut().send_event(UserLeft { user: alice });
    app.update();

    let equipped = app.world().resource::<EquippedRegistry>().len();
    let spawned = app.world().resource::<SpawnedRegistry>().len();
    let live = host.inspect(|graph| graph.live_count());
    println!(
        "Session complete! equipped: {}, spawned: {}, live actors: {}",
        equipped, spawned, live
    );
}
