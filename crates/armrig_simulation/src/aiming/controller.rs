//! AimingController — держит руки актора направленными на target
//!
//! State machine:
//! ```text
//! Idle ──activate(skeleton)──▶ Active ──detach()──▶ Detached (terminal)
//! ```
//!
//! Tick (update):
//! 1. Accumulate delta, throttle до update_period (30 Hz по умолчанию)
//! 2. Target: LocalPlayer → AimInput, остальные → последний заданный
//! 3. direction = normalize(target − origin), reach offset = direction * reach_distance
//! 4. Для каждой конечности: ik::solve → override shoulder + elbow

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::AimingError;
use crate::ik::{self, JointChain};
use crate::skeleton::{BoneId, BoneOverrides, Skeleton};

/// Допуск сравнения accumulator'а с периодом (секунды)
///
/// 4 × (1/120) в f32 может дать чуть меньше 1/30.
const TICK_EPSILON: f32 = 1e-6;

/// Имена костей одной конечности
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimbBones {
    pub shoulder: String,
    pub elbow: String,
    pub hand: String,
}

impl LimbBones {
    pub fn new(shoulder: impl Into<String>, elbow: impl Into<String>, hand: impl Into<String>) -> Self {
        Self {
            shoulder: shoulder.into(),
            elbow: elbow.into(),
            hand: hand.into(),
        }
    }
}

/// Имена костей обеих рук
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmRig {
    pub right: LimbBones,
    pub left: LimbBones,
}

impl Default for ArmRig {
    fn default() -> Self {
        Self {
            right: LimbBones::new("right_shoulder", "right_elbow", "right_hand"),
            left: LimbBones::new("left_shoulder", "left_elbow", "left_hand"),
        }
    }
}

/// Параметры aiming контроллера
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimingConfig {
    /// Период между solve pass'ами (секунды)
    pub update_period: f32,
    /// Насколько руки "тянутся" в сторону target (units)
    pub reach_distance: f32,
    /// Имена костей
    pub rig: ArmRig,
}

impl Default for AimingConfig {
    fn default() -> Self {
        Self {
            update_period: 1.0 / 30.0, // 30 solve/сек независимо от FPS
            reach_distance: 15.0,
            rig: ArmRig::default(),
        }
    }
}

/// Конечность
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Limb {
    Right,
    Left,
}

/// Резолвнутая конечность: handles + resting chain
#[derive(Debug, Clone, PartialEq)]
pub struct LimbRig {
    pub limb: Limb,
    pub shoulder: BoneId,
    pub elbow: BoneId,
    pub hand: BoneId,
    /// Resting pose в local space shoulder'а (P0 = 0)
    pub chain: JointChain,
}

impl LimbRig {
    fn resolve(limb: Limb, bones: &LimbBones, skeleton: &Skeleton) -> Result<Self, AimingError> {
        let lookup = |name: &str| {
            skeleton
                .bone_id(name)
                .ok_or_else(|| AimingError::MissingBone(name.to_string()))
        };
        let resting = |bone: BoneId, name: &str| {
            skeleton
                .resting_position(bone)
                .ok_or_else(|| AimingError::MissingRestingPose(name.to_string()))
        };

        // Offsets кумулятивны только если кости реально идут цепочкой
        let child_of = |bone: BoneId, name: &str, parent: BoneId, parent_name: &str| {
            match skeleton.bone(bone).and_then(|b| b.parent) {
                Some(actual) if actual == parent => Ok(()),
                _ => Err(AimingError::BrokenChain {
                    bone: name.to_string(),
                    expected_parent: parent_name.to_string(),
                }),
            }
        };

        let shoulder = lookup(&bones.shoulder)?;
        let elbow = lookup(&bones.elbow)?;
        let hand = lookup(&bones.hand)?;

        child_of(elbow, &bones.elbow, shoulder, &bones.shoulder)?;
        child_of(hand, &bones.hand, elbow, &bones.elbow)?;

        // Shoulder = origin цепи, поэтому его собственный offset не нужен
        let chain = JointChain::from_resting_offsets(resting(elbow, &bones.elbow)?, resting(hand, &bones.hand)?);

        Ok(Self {
            limb,
            shoulder,
            elbow,
            hand,
            chain,
        })
    }
}

/// Данные Active состояния
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRig {
    /// [right, left]
    pub limbs: [LimbRig; 2],
    /// Кости, которые контроллер когда-либо override'ил (без дублей)
    pub overridden: Vec<BoneId>,
}

impl ActiveRig {
    fn remember(&mut self, bone: BoneId) {
        if !self.overridden.contains(&bone) {
            self.overridden.push(bone);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum AimingState {
    /// Resting pose ещё не снят
    #[default]
    Idle,
    /// Rig резолвнут, solve каждый tick
    Active(ActiveRig),
    /// Overrides очищены, контроллер больше ничего не пишет
    Detached,
}

/// Один записанный override (для broadcast наружу)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedOverride {
    pub bone: BoneId,
    pub rotation: Vec3,
}

/// Aiming контроллер одного актора
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AimingController {
    config: AimingConfig,
    state: AimingState,
    /// Текущий target (world coords)
    target: Vec3,
    /// Последнее валидное направление (держим, если target == origin)
    direction: Vec2,
    /// Накопленное время с последнего solve pass
    accumulated: f32,
}

impl AimingController {
    pub fn new(config: AimingConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &AimingConfig {
        &self.config
    }

    pub fn state(&self) -> &AimingState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, AimingState::Idle)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, AimingState::Active(_))
    }

    pub fn is_detached(&self) -> bool {
        matches!(self.state, AimingState::Detached)
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Задать target извне (network/AI) для НЕ-local актора
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn direction(&self) -> Vec2 {
        self.direction
    }

    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    /// Кости, которые контроллер override'ил (пусто вне Active)
    pub fn overridden_bones(&self) -> &[BoneId] {
        match &self.state {
            AimingState::Active(rig) => &rig.overridden,
            _ => &[],
        }
    }

    /// Пишет ли контроллер эту кость (shoulder/elbow любой руки, только в Active)
    pub fn owns_bone(&self, bone: BoneId) -> bool {
        match &self.state {
            AimingState::Active(rig) => rig
                .limbs
                .iter()
                .any(|limb| limb.shoulder == bone || limb.elbow == bone),
            _ => false,
        }
    }

    /// Idle → Active: снять resting pose с skeleton
    ///
    /// Повторный вызов в Active — no-op. Из Detached вернуться нельзя.
    /// Невалидный период или разорванная цепь костей → Err, state остаётся Idle.
    pub fn activate(&mut self, skeleton: &Skeleton) -> Result<(), AimingError> {
        match self.state {
            AimingState::Active(_) => return Ok(()),
            AimingState::Detached => return Err(AimingError::AlreadyDetached),
            AimingState::Idle => {}
        }

        let period = self.config.update_period;
        if !(period.is_finite() && period > 0.0) {
            return Err(AimingError::InvalidUpdatePeriod(period));
        }

        let right = LimbRig::resolve(Limb::Right, &self.config.rig.right, skeleton)?;
        let left = LimbRig::resolve(Limb::Left, &self.config.rig.left, skeleton)?;

        self.state = AimingState::Active(ActiveRig {
            limbs: [right, left],
            overridden: Vec::with_capacity(4),
        });
        self.accumulated = 0.0;

        Ok(())
    }

    /// Throttle: true если накопился полный период
    ///
    /// Accumulator уменьшается по модулю периода (не обнуляется),
    /// чтобы не терять время при переменном FPS.
    pub fn advance(&mut self, delta: f32) -> bool {
        let period = self.config.update_period;
        self.accumulated += delta;

        if self.accumulated + TICK_EPSILON < period {
            return false;
        }

        let remainder = self.accumulated % period;
        self.accumulated = if period - remainder <= TICK_EPSILON {
            0.0
        } else {
            remainder
        };

        true
    }

    /// Per-frame update
    ///
    /// `input_target` = Some только для LocalPlayer (курсор).
    /// Возвращает записанные overrides, если в этот frame был solve pass.
    pub fn update(
        &mut self,
        delta: f32,
        origin: Vec3,
        input_target: Option<Vec3>,
        overrides: &mut BoneOverrides,
    ) -> Option<Vec<AppliedOverride>> {
        if !self.is_active() {
            return None;
        }

        if !self.advance(delta) {
            return None;
        }

        if let Some(target) = input_target {
            self.target = target;
        }

        // target == origin → normalize не определён, держим прошлое направление
        if let Some(direction) = (self.target - origin).truncate().try_normalize() {
            self.direction = direction;
        }

        let reach_offset = self.direction * self.config.reach_distance;

        let AimingState::Active(rig) = &mut self.state else {
            return None;
        };

        let mut applied = Vec::with_capacity(4);

        for index in 0..rig.limbs.len() {
            let limb = &rig.limbs[index];
            let (shoulder, elbow) = (limb.shoulder, limb.elbow);

            let target_point = limb.chain.origin() + reach_offset;
            let result = ik::solve(&limb.chain, target_point);

            for (bone, rotation) in [
                (shoulder, result.origin_rotation()),
                (elbow, result.middle_rotation()),
            ] {
                overrides.override_rotation(bone, rotation);
                rig.remember(bone);
                applied.push(AppliedOverride { bone, rotation });
            }
        }

        Some(applied)
    }

    /// Active → Detached: очистить все overrides этого контроллера
    ///
    /// Возвращает очищенные кости (каждую ровно один раз).
    /// Повторный detach возвращает пустой список.
    pub fn detach(&mut self, overrides: &mut BoneOverrides) -> Vec<BoneId> {
        let previous = std::mem::replace(&mut self.state, AimingState::Detached);

        let AimingState::Active(rig) = previous else {
            return Vec::new();
        };

        for bone in &rig.overridden {
            overrides.clear(*bone);
        }

        rig.overridden
    }
}
