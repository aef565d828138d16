//! Player aim input
//!
//! Host (input reader + screen → world translator) пишет позицию курсора
//! в AimInput каждый frame. ECS только читает.

use bevy::prelude::*;

/// Aim input локального игрока
///
/// # Coordinate System
/// Тот же space, что и Transform акторов (world coords).
/// IK работает в плоскости XY: `z` игнорируется aiming логикой.
///
/// # Примечание
/// Только для LocalPlayer! Remote акторы получают target через AimTargetChanged.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct AimInput {
    /// Курсор в world coords (результат screen → world translation)
    pub cursor_world: Vec3,
}

impl AimInput {
    pub fn new(cursor_world: Vec3) -> Self {
        Self { cursor_world }
    }
}
