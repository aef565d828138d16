//! Wander behavior — NPC бродит между случайными точками
//!
//! Цикл:
//! 1. Дошли до target → Stopped event, ждём 1..4 сек
//! 2. Выбираем новый target: случайный offset ±(32..96) по x и y
//! 3. Идём к target со скоростью MovementSpeed (Started event в начале шага)

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Параметры wander
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WanderConfig {
    /// Минимальная пауза между переходами (секунды)
    pub min_wait: f32,
    /// Случайная добавка к паузе: [0, extra_wait)
    pub extra_wait: f32,
    /// Минимальный сдвиг по каждой оси (units)
    pub min_offset: f32,
    /// Случайная добавка к сдвигу (по модулю): [0, extra_offset)
    pub extra_offset: f32,
    /// Ближе этого — считаем, что дошли
    pub arrival_epsilon: f32,
}

impl Default for WanderConfig {
    fn default() -> Self {
        Self {
            min_wait: 1.0,
            extra_wait: 3.0,
            min_offset: 32.0,
            extra_offset: 64.0,
            arrival_epsilon: 0.01,
        }
    }
}

/// Переход wander'а, который интересен animation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WanderTransition {
    /// Начали идти (walk animation on)
    Started,
    /// Дошли до точки (walk animation off)
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct WanderBehavior {
    config: WanderConfig,
    /// None до первого update (target = текущая позиция)
    target: Option<Vec3>,
    wait_time: f32,
    moving: bool,
}

impl WanderBehavior {
    pub fn new(config: WanderConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    pub fn wait_time(&self) -> f32 {
        self.wait_time
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Один шаг wander'а
    ///
    /// Двигает `position` (z не трогаем — планарный мир).
    pub fn update(
        &mut self,
        position: &mut Vec3,
        speed: f32,
        delta: f32,
        rng: &mut impl Rng,
    ) -> Option<WanderTransition> {
        if self.wait_time > 0.0 {
            self.wait_time -= delta;
            return None;
        }

        let target = *self.target.get_or_insert(*position);
        let to_target = target - *position;

        if to_target.length() <= self.config.arrival_epsilon {
            self.wait_time = self.config.min_wait + self.config.extra_wait * rng.gen::<f32>();
            self.target = Some(*position + self.random_offset(rng));

            let was_moving = std::mem::replace(&mut self.moving, false);
            return was_moving.then_some(WanderTransition::Stopped);
        }

        let step = speed * delta;
        if to_target.length() <= step {
            *position = target;
        } else {
            *position += to_target.normalize() * step;
        }

        let was_moving = std::mem::replace(&mut self.moving, true);
        (!was_moving).then_some(WanderTransition::Started)
    }

    /// Сдвиг ±(min_offset + [0, extra_offset)) по x и y, знак случайный
    fn random_offset(&self, rng: &mut impl Rng) -> Vec3 {
        let mut axis = || {
            let raw = self.config.extra_offset * (2.0 * rng.gen::<f32>() - 1.0);
            let sign = if raw < 0.0 { -1.0 } else { 1.0 };
            raw + sign * self.config.min_offset
        };

        let x = axis();
        let y = axis();
        Vec3::new(x, y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_first_update_picks_target_and_waits() {
        let mut wander = WanderBehavior::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut position = Vec3::new(10.0, 10.0, 0.0);

        let transition = wander.update(&mut position, 48.0, 0.016, &mut rng);

        // Не двигались → Stopped не шлём
        assert_eq!(transition, None);
        assert_eq!(position, Vec3::new(10.0, 10.0, 0.0));
        assert!(wander.wait_time() >= 1.0 && wander.wait_time() < 4.0);

        let offset = wander.target().unwrap() - position;
        for axis in [offset.x, offset.y] {
            assert!(axis.abs() >= 32.0 && axis.abs() < 64.0 + 32.0, "offset = {:?}", offset);
        }
        assert_eq!(offset.z, 0.0);
    }

    #[test]
    fn test_walks_to_target_then_stops() {
        let mut wander = WanderBehavior::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut position = Vec3::ZERO;

        wander.update(&mut position, 48.0, 0.016, &mut rng);
        let target = wander.target().unwrap();

        let mut transitions = Vec::new();
        for _ in 0..2000 {
            if let Some(t) = wander.update(&mut position, 48.0, 0.05, &mut rng) {
                transitions.push(t);
            }
            if transitions.len() == 2 {
                break;
            }
        }

        assert_eq!(transitions, vec![WanderTransition::Started, WanderTransition::Stopped]);
        assert_eq!(position, target);
        assert_ne!(wander.target(), Some(target)); // уже выбран следующий
    }

    #[test]
    fn test_same_seed_same_path() {
        let run = |seed: u64| {
            let mut wander = WanderBehavior::default();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut position = Vec3::ZERO;
            for _ in 0..500 {
                wander.update(&mut position, 48.0, 0.05, &mut rng);
            }
            position
        };

        assert_eq!(run(42), run(42));
    }
}
