//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - player: local control marker (LocalPlayer)
//! - movement: скорость перемещения (MovementSpeed)
//!
//! Skeleton/BoneOverrides живут в crate::skeleton (host boundary),
//! AimingController — в crate::aiming, Behavior — в crate::behavior.

pub mod movement;
pub mod player;

// Re-exports для удобного импорта
pub use movement::*;
pub use player::*;
