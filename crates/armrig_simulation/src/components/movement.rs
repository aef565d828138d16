//! Movement компоненты

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Скорость движения актора (units/сек)
///
/// Используется Wander behavior для шага к следующей точке.
#[derive(Component, Clone, Copy, Debug, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 48.0 } // Пиксельные units: ~полтора "шага" за секунду
    }
}

impl MovementSpeed {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }
}
