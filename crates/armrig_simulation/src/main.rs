//! Headless симуляция ArmRig
//!
//! Local player целится курсором по кругу, рядом бродит NPC.
//! В конце detach'им aiming и смотрим, что overrides очищены.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use armrig_simulation::logger::{init_logger, log, log_info};
use armrig_simulation::*;

fn main() {
    let seed = 42;
    init_logger();
    log_info(&format!("Starting ArmRig headless simulation (seed: {})", seed));

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(1.0 / 60.0)));

    let player = app
        .world_mut()
        .spawn((
            Transform::default(),
            Skeleton::with_arms(Vec3::new(0.0, -10.0, 0.0), Vec3::new(0.0, -10.0, 0.0)),
            Behavior::aiming(),
            LocalPlayer,
        ))
        .id();

    let wanderer = app
        .world_mut()
        .spawn((Transform::default(), Behavior::wander(), MovementSpeed::default()))
        .id();

    // 600 тиков = 10 секунд при 60 Hz
    for tick in 0..600 {
        let angle = tick as f32 * 0.02;
        app.world_mut().resource_mut::<AimInput>().cursor_world = Vec3::new(angle.cos(), angle.sin(), 0.0) * 50.0;

        app.update();

        if tick % 100 == 0 {
            let world = app.world();
            let overridden = world.get::<BoneOverrides>(player).map_or(0, BoneOverrides::len);
            let position = world.get::<Transform>(wanderer).map(|t| t.translation).unwrap_or_default();
            let walking = world
                .get::<Behavior>(wanderer)
                .and_then(Behavior::as_wander)
                .is_some_and(|w| w.is_moving());
            log(&format!(
                "Tick {}: player bones overridden = {}, wanderer at ({:.1}, {:.1}) walking = {}",
                tick, overridden, position.x, position.y, walking
            ));
        }
    }

    app.world_mut().send_event(DetachAimingIntent { entity: player });
    app.update();

    let remaining = app.world().get::<BoneOverrides>(player).map_or(0, BoneOverrides::len);
    log_info(&format!("Simulation complete! Overrides left after detach: {}", remaining));
}
