//! Behavior module — per-entity поведение (tagged union)
//!
//! Один компонент Behavior на актора, варианты:
//! - Aiming: руки следят за target (IK)
//! - Wander: NPC бродит между случайными точками
//!
//! Dispatch — явный match в update_behaviors (без trait objects).

use bevy::prelude::*;

pub mod systems;
pub mod wander;

pub use systems::*;
pub use wander::{WanderBehavior, WanderConfig, WanderTransition};

use crate::aiming::{AimingConfig, AimingController};
use crate::SimulationSet;

/// Поведение актора
#[derive(Component, Debug, Clone, PartialEq)]
pub enum Behavior {
    /// Руки направлены на target (LocalPlayer → курсор, остальные → AimTargetChanged)
    Aiming(AimingController),

    /// Случайное блуждание
    Wander(WanderBehavior),
}

impl Behavior {
    pub fn aiming() -> Self {
        Self::Aiming(AimingController::new(AimingConfig::default()))
    }

    pub fn aiming_with(config: AimingConfig) -> Self {
        Self::Aiming(AimingController::new(config))
    }

    pub fn wander() -> Self {
        Self::Wander(WanderBehavior::new(WanderConfig::default()))
    }

    /// Имя варианта (для логов и animation layer)
    pub fn name(&self) -> &'static str {
        match self {
            Behavior::Aiming(_) => "aiming",
            Behavior::Wander(_) => "wander",
        }
    }

    pub fn as_aiming(&self) -> Option<&AimingController> {
        match self {
            Behavior::Aiming(controller) => Some(controller),
            _ => None,
        }
    }

    pub fn as_aiming_mut(&mut self) -> Option<&mut AimingController> {
        match self {
            Behavior::Aiming(controller) => Some(controller),
            _ => None,
        }
    }

    pub fn as_wander(&self) -> Option<&WanderBehavior> {
        match self {
            Behavior::Wander(wander) => Some(wander),
            _ => None,
        }
    }
}

/// Event: behavior сменил фазу (animation layer включает/выключает анимации)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BehaviorEvent {
    pub entity: Entity,
    pub transition: WanderTransition,
}

/// Behavior Plugin
///
/// Регистрирует update_behaviors в SimulationSet::Behave (Update schedule).
/// Aiming сам throttl'ит solve до своего периода, поэтому Update, а не FixedUpdate.
pub struct BehaviorPlugin;

impl Plugin for BehaviorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BehaviorEvent>()
            .add_systems(Update, update_behaviors.in_set(SimulationSet::Behave));
    }
}
