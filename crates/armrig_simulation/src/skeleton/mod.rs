//! Skeleton boundary — данные, которые предоставляет host (editor/renderer)
//!
//! ECS ответственность:
//! - Skeleton: resting offsets костей + name → BoneId lookup (read-only после spawn)
//! - BoneOverrides: rotation overrides на текущий tick (пишет aiming/remote mirror)
//!
//! Host ответственность:
//! - Заполнить Skeleton при spawn (из asset'а модели)
//! - Читать BoneOverrides при сборке pose (override заменяет animated rotation)
//!
//! Правило: один writer на кость (aiming controller ИЛИ remote mirror).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable handle кости (индекс в Skeleton::bones)
///
/// Резолвится по имени один раз при инициализации контроллера.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub struct BoneId(pub u32);

impl BoneId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Одна кость resting pose
#[derive(Debug, Clone, Reflect)]
pub struct SkeletonBone {
    pub name: String,
    /// Parent кость (None = root)
    pub parent: Option<BoneId>,
    /// Resting offset относительно parent (local space)
    pub resting_offset: Vec3,
}

/// Resting skeleton entity (host-provided)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
#[require(BoneOverrides)]
pub struct Skeleton {
    bones: Vec<SkeletonBone>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Добавить кость, вернуть её handle
    ///
    /// Builder-стиль для spawn кода и тестов:
    /// ```ignore
    /// let mut skeleton = Skeleton::new();
    /// let shoulder = skeleton.add_bone("right_shoulder", None, Vec3::ZERO);
    /// skeleton.add_bone("right_elbow", Some(shoulder), Vec3::new(0.0, -10.0, 0.0));
    /// ```
    pub fn add_bone(&mut self, name: impl Into<String>, parent: Option<BoneId>, resting_offset: Vec3) -> BoneId {
        let id = BoneId(self.bones.len() as u32);
        self.bones.push(SkeletonBone {
            name: name.into(),
            parent,
            resting_offset,
        });
        id
    }

    /// Типовой skeleton с двумя руками (headless runs, тесты)
    ///
    /// torso → {right,left}_shoulder → _elbow → _hand.
    /// Левая рука — зеркало правой по x.
    pub fn with_arms(upper_arm: Vec3, forearm: Vec3) -> Self {
        let mirror = Vec3::new(-1.0, 1.0, 1.0);
        let mut skeleton = Self::new();
        let torso = skeleton.add_bone("torso", None, Vec3::ZERO);

        for (side, sign) in [("right", Vec3::ONE), ("left", mirror)] {
            let shoulder = skeleton.add_bone(format!("{side}_shoulder"), Some(torso), Vec3::new(4.0, 8.0, 0.0) * sign);
            let elbow = skeleton.add_bone(format!("{side}_elbow"), Some(shoulder), upper_arm * sign);
            skeleton.add_bone(format!("{side}_hand"), Some(elbow), forearm * sign);
        }

        skeleton
    }

    /// name → handle (None = такой кости нет в модели)
    pub fn bone_id(&self, name: &str) -> Option<BoneId> {
        self.bones
            .iter()
            .position(|bone| bone.name == name)
            .map(|index| BoneId(index as u32))
    }

    /// Resting offset кости относительно parent
    pub fn resting_position(&self, bone: BoneId) -> Option<Vec3> {
        self.bones.get(bone.index()).map(|b| b.resting_offset)
    }

    pub fn bone(&self, bone: BoneId) -> Option<&SkeletonBone> {
        self.bones.get(bone.index())
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }
}

/// Rotation overrides на текущий tick
///
/// Override живёт пока его не перезапишут или не очистят явно.
/// Rotation — euler (x, y, z) в радианах; planar IK пишет только z.
#[derive(Component, Debug, Clone, Default)]
pub struct BoneOverrides {
    rotations: HashMap<BoneId, Vec3>,
}

impl BoneOverrides {
    pub fn override_rotation(&mut self, bone: BoneId, rotation: Vec3) {
        self.rotations.insert(bone, rotation);
    }

    /// Убрать override (кость возвращается к animated pose)
    ///
    /// Возвращает true если override был.
    pub fn clear(&mut self, bone: BoneId) -> bool {
        self.rotations.remove(&bone).is_some()
    }

    pub fn get(&self, bone: BoneId) -> Option<Vec3> {
        self.rotations.get(&bone).copied()
    }

    pub fn contains(&self, bone: BoneId) -> bool {
        self.rotations.contains_key(&bone)
    }

    pub fn len(&self) -> usize {
        self.rotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotations.is_empty()
    }
}
