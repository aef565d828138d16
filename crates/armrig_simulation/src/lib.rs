//! ArmRig Simulation Core
//!
//! ECS-симуляция на Bevy 0.16: аналитический 2-bone IK рук + aiming behavior.
//!
//! Разделение ответственности:
//! - ECS = решения (куда смотрят руки, какие кости override'нуты, wander)
//! - Host (editor/renderer/network) = skeleton assets, сборка pose, transport

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod aiming;
pub mod behavior;
pub mod components;
pub mod ik;
pub mod input;
pub mod logger;
pub mod metrics;
pub mod skeleton;

// Re-exports для удобства
pub use aiming::{
    AimTargetChanged, AimingConfig, AimingController, AimingError, AimingPlugin, AimingState, BoneClearOverrideEvent,
    BoneOverrideEvent, DetachAimingIntent, ManualBoneOverrideIntent, RemotePoseEvent,
};
pub use behavior::{Behavior, BehaviorEvent, BehaviorPlugin, WanderBehavior, WanderConfig, WanderTransition};
pub use components::*;
pub use input::AimInput;
pub use logger::*;
pub use metrics::{FrameMetrics, FrameRateReport, MetricsPlugin};
pub use skeleton::{BoneId, BoneOverrides, Skeleton};

/// Фазы frame'а (Update schedule), выполняются строго по порядку
///
/// - Prepare: активация контроллеров, внешние targets
/// - Behave: update_behaviors (solve pass, wander)
/// - Mirror: detach, remote poses, manual overrides
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    Prepare,
    Behave,
    Mirror,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (SimulationSet::Prepare, SimulationSet::Behave, SimulationSet::Mirror).chain(),
        );

        // Seed мог поставить create_headless_app
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.init_resource::<AimInput>()
            .add_plugins((AimingPlugin, BehaviorPlugin, MetricsPlugin::default()));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Подсистемы не добавляются: caller добавляет SimulationPlugin (или свои).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug формат достаточен: сравниваем байты двух прогонов
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
