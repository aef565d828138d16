//! Aiming integration test
//!
//! Полный headless App (SimulationPlugin), фиксированный шаг времени.
//!
//! Проверяем:
//! - Throttling: 4 frame'а по 1/120 → ровно один solve pass
//! - Detach: clear event на каждую override'нутую кость
//! - Remote actor целится по AimTargetChanged
//! - Wander и FrameRateReport в том же App

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use armrig_simulation::*;

/// Что увидели observers (собирается после SimulationSet::Mirror)
#[derive(Resource, Default)]
struct Observed {
    overrides: Vec<BoneOverrideEvent>,
    clears: Vec<BoneClearOverrideEvent>,
    behavior: Vec<BehaviorEvent>,
}

fn observe(
    mut observed: ResMut<Observed>,
    mut overrides: EventReader<BoneOverrideEvent>,
    mut clears: EventReader<BoneClearOverrideEvent>,
    mut behavior: EventReader<BehaviorEvent>,
) {
    observed.overrides.extend(overrides.read().copied());
    observed.clears.extend(clears.read().copied());
    observed.behavior.extend(behavior.read().copied());
}

#[derive(Resource, Default)]
struct Reports(Vec<u32>);

fn collect_reports(mut reports: ResMut<Reports>, mut events: EventReader<FrameRateReport>) {
    reports.0.extend(events.read().map(|r| r.average_fps));
}

/// Helper: App с фиксированным frame time
fn create_aiming_app(seed: u64, frame: f32) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(frame)))
        .init_resource::<Observed>()
        .init_resource::<Reports>()
        .add_systems(Update, observe.after(SimulationSet::Mirror))
        .add_systems(Last, collect_reports);
    app
}

fn spawn_aiming_actor(app: &mut App, position: Vec3, local: bool) -> Entity {
    let mut entity = app.world_mut().spawn((
        Transform::from_translation(position),
        Skeleton::with_arms(Vec3::new(0.0, -10.0, 0.0), Vec3::new(0.0, -10.0, 0.0)),
        Behavior::aiming(),
    ));
    if local {
        entity.insert(LocalPlayer);
    }
    entity.id()
}

fn controller(app: &App, entity: Entity) -> AimingController {
    app.world()
        .get::<Behavior>(entity)
        .and_then(Behavior::as_aiming)
        .cloned()
        .expect("aiming behavior")
}

/// Прогоняем frames до первого solve pass (warm-up + activation)
fn run_until_first_solve(app: &mut App) {
    for _ in 0..16 {
        app.update();
        if !app.world().resource::<Observed>().overrides.is_empty() {
            app.world_mut().resource_mut::<Observed>().overrides.clear();
            return;
        }
    }
    panic!("no solve pass within 16 frames");
}

#[test]
fn test_four_frames_at_120hz_one_solve() {
    let mut app = create_aiming_app(42, 1.0 / 120.0);
    let player = spawn_aiming_actor(&mut app, Vec3::ZERO, true);
    app.world_mut().resource_mut::<AimInput>().cursor_world = Vec3::new(30.0, 10.0, 0.0);

    run_until_first_solve(&mut app);

    for _ in 0..3 {
        app.update();
    }
    assert!(app.world().resource::<Observed>().overrides.is_empty());

    app.update();

    let observed = app.world().resource::<Observed>();
    assert_eq!(observed.overrides.len(), 4, "one solve pass = 4 joints");
    assert!(observed.overrides.iter().all(|e| e.entity == player));
    assert!(controller(&app, player).accumulated().abs() < 1e-6);
}

#[test]
fn test_detach_clears_every_joint() {
    let mut app = create_aiming_app(42, 1.0 / 30.0);
    let player = spawn_aiming_actor(&mut app, Vec3::ZERO, true);
    app.world_mut().resource_mut::<AimInput>().cursor_world = Vec3::new(-20.0, 0.0, 0.0);

    run_until_first_solve(&mut app);
    assert_eq!(app.world().get::<BoneOverrides>(player).unwrap().len(), 4);

    app.world_mut().send_event(DetachAimingIntent { entity: player });
    app.update();

    let observed = app.world().resource::<Observed>();
    assert_eq!(observed.clears.len(), 4);
    assert!(observed.clears.iter().all(|e| e.entity == player));
    assert!(app.world().get::<BoneOverrides>(player).unwrap().is_empty());
    assert!(controller(&app, player).is_detached());

    // После detach больше ничего не пишется
    app.world_mut().resource_mut::<Observed>().overrides.clear();
    for _ in 0..10 {
        app.update();
    }
    assert!(app.world().resource::<Observed>().overrides.is_empty());
    assert!(app.world().get::<BoneOverrides>(player).unwrap().is_empty());
}

#[test]
fn test_remote_actor_aims_at_pushed_target() {
    let mut app = create_aiming_app(42, 1.0 / 30.0);
    let player = spawn_aiming_actor(&mut app, Vec3::ZERO, true);
    let remote = spawn_aiming_actor(&mut app, Vec3::new(100.0, 0.0, 0.0), false);

    app.world_mut().send_event(AimTargetChanged {
        entity: remote,
        target: Vec3::new(100.0, 50.0, 0.0),
    });

    for _ in 0..5 {
        app.update();
    }

    let remote_controller = controller(&app, remote);
    assert_eq!(remote_controller.target(), Vec3::new(100.0, 50.0, 0.0));
    assert_eq!(remote_controller.direction(), Vec2::Y);
    assert_eq!(app.world().get::<BoneOverrides>(remote).unwrap().len(), 4);

    // Broadcast только от local player
    let observed = app.world().resource::<Observed>();
    assert!(!observed.overrides.is_empty());
    assert!(observed.overrides.iter().all(|e| e.entity == player));
}

#[test]
fn test_wanderer_moves_and_reports_transitions() {
    let mut app = create_aiming_app(7, 1.0 / 60.0);
    let wanderer = app
        .world_mut()
        .spawn((Transform::default(), Behavior::wander(), MovementSpeed::default()))
        .id();

    // 10 секунд: минимум одна пауза (≤ 4 сек) + шаг
    for _ in 0..600 {
        app.update();
    }

    let position = app.world().get::<Transform>(wanderer).unwrap().translation;
    assert_ne!(position, Vec3::ZERO);
    assert_eq!(position.z, 0.0);

    // Target всегда выбран после первого frame'а
    let wander = app
        .world()
        .get::<Behavior>(wanderer)
        .and_then(Behavior::as_wander)
        .cloned()
        .expect("wander behavior");
    assert!(wander.target().is_some());

    let observed = app.world().resource::<Observed>();
    assert_eq!(
        observed.behavior.first().map(|e| e.transition),
        Some(WanderTransition::Started)
    );
    // Последний transition совпадает с текущим состоянием
    let last_started = observed.behavior.last().map(|e| e.transition) == Some(WanderTransition::Started);
    assert_eq!(last_started, wander.is_moving());
    assert!(observed.behavior.iter().all(|e| e.entity == wanderer));
}

#[test]
fn test_frame_rate_reports() {
    let mut app = create_aiming_app(42, 1.0 / 60.0);

    for _ in 0..120 {
        app.update();
    }

    let reports = &app.world().resource::<Reports>().0;
    // 2 секунды при каденсе 0.25 → ~8 отчётов
    assert!(reports.len() >= 6, "reports = {:?}", reports);
    let last = *reports.last().unwrap();
    assert!((58..=62).contains(&last), "average fps = {}", last);
}
