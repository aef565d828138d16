//! Тесты детерминизма
//!
//! Wander берёт случайность только из DeterministicRng, а шаг времени
//! фиксирован → одинаковый seed даёт идентичные траектории.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use armrig_simulation::{create_headless_app, world_snapshot, Behavior, MovementSpeed, SimulationPlugin, Skeleton};

const ENTITY_COUNT: usize = 20;
const TICK_COUNT: usize = 600;

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let snapshot1 = run_simulation(SEED);
    let snapshot2 = run_simulation(SEED);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;

    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}

#[test]
fn test_different_seeds_diverge() {
    assert_ne!(run_simulation(1), run_simulation(2));
}

/// Запускает симуляцию и возвращает snapshot позиций
fn run_simulation(seed: u64) -> Vec<u8> {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(1.0 / 60.0)));

    // Wander'ы + один aiming актор (не трогает RNG, но живёт в том же frame)
    for i in 0..ENTITY_COUNT {
        app.world_mut().spawn((
            Transform::from_xyz(i as f32 * 10.0, 0.0, 0.0),
            Behavior::wander(),
            MovementSpeed::default(),
        ));
    }
    app.world_mut().spawn((
        Transform::default(),
        Skeleton::with_arms(Vec3::new(0.0, -10.0, 0.0), Vec3::new(0.0, -10.0, 0.0)),
        Behavior::aiming(),
    ));

    for _ in 0..TICK_COUNT {
        app.update();
    }

    world_snapshot::<Transform>(app.world_mut())
}
