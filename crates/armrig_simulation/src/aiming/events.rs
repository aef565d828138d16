//! Aiming events
//!
//! Architecture:
//! - Outgoing (ECS → observers): BoneOverrideEvent, BoneClearOverrideEvent
//!   (network layer зеркалит позу рук local player'а на remote клиенты)
//! - Incoming (observers → ECS): DetachAimingIntent, AimTargetChanged,
//!   RemotePoseEvent, ManualBoneOverrideIntent
//!
//! Один strongly-typed event на каждый вид сообщения: payload проверяется компилятором.

use bevy::prelude::*;
use crate::skeleton::BoneId;

/// Event: aiming записал override кости (ECS → observers)
///
/// Отправляется ТОЛЬКО для LocalPlayer (remote observers узнают позу игрока).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct BoneOverrideEvent {
    /// Чья кость
    pub entity: Entity,
    /// Какая кость
    pub bone: BoneId,
    /// Новая rotation (euler, радианы; planar IK → только z)
    pub rotation: Vec3,
}

/// Event: override кости очищен (ECS → observers)
///
/// Отправляется на detach для каждой кости, которую контроллер когда-либо трогал.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoneClearOverrideEvent {
    pub entity: Entity,
    pub bone: BoneId,
}

/// Intent: отключить aiming контроллер (Active → Detached)
///
/// Все overrides контроллера очищаются, на каждый — BoneClearOverrideEvent.
#[derive(Event, Debug, Clone, Copy)]
pub struct DetachAimingIntent {
    pub entity: Entity,
}

/// Event: target для НЕ-local актора (network traffic или AI)
///
/// LocalPlayer игнорирует (его target = AimInput).
#[derive(Event, Debug, Clone, Copy)]
pub struct AimTargetChanged {
    pub entity: Entity,
    /// Target в world coords
    pub target: Vec3,
}

/// Поза, пришедшая от remote клиента (network → ECS)
///
/// Применяется напрямую к BoneOverrides remote актора.
/// Network layer декодирует его из своего протокола и резолвит entity.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum RemotePoseEvent {
    /// Remote игрок повернул кость
    Override {
        entity: Entity,
        bone: BoneId,
        rotation: Vec3,
    },

    /// Remote игрок очистил override
    Clear { entity: Entity, bone: BoneId },
}

impl RemotePoseEvent {
    pub fn entity(&self) -> Entity {
        match self {
            RemotePoseEvent::Override { entity, .. } | RemotePoseEvent::Clear { entity, .. } => *entity,
        }
    }
}

/// Intent: ручной override кости по имени (debug console)
///
/// `rotation_degrees == Vec3::ZERO` → clear override.
#[derive(Event, Debug, Clone)]
pub struct ManualBoneOverrideIntent {
    pub entity: Entity,
    pub bone_name: String,
    pub rotation_degrees: Vec3,
}
