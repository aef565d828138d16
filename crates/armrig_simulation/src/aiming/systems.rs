//! Aiming systems (ECS glue вокруг AimingController)
//!
//! Порядок в Update (SimulationSet):
//! 1. Prepare: activate_aiming_behaviors → apply_aim_targets
//! 2. Behave: update_behaviors (solve pass)
//! 3. Mirror: detach_aiming_behaviors → apply_remote_poses → apply_manual_bone_overrides

use bevy::prelude::*;

use super::events::*;
use crate::behavior::Behavior;
use crate::components::LocalPlayer;
use crate::logger::{log, log_error, log_info, log_warning};
use crate::skeleton::{BoneOverrides, Skeleton};

/// System: Idle aiming контроллеры снимают resting pose со своего Skeleton
///
/// Ошибка rig'а (нет кости, разорванная цепь, плохой период) = баг контента → Err,
/// default error handler Bevy паникует.
pub fn activate_aiming_behaviors(
    mut actors: Query<(Entity, &mut Behavior, &Skeleton)>,
) -> bevy::ecs::error::Result {
    for (entity, mut behavior, skeleton) in actors.iter_mut() {
        // Проверяем через & чтобы не дёргать change detection каждый frame
        if !behavior.as_aiming().is_some_and(|c| c.is_idle()) {
            continue;
        }

        let Some(controller) = behavior.as_aiming_mut() else {
            continue;
        };

        if let Err(err) = controller.activate(skeleton) {
            log_error(&format!("Aiming activation failed for {:?}: {}", entity, err));
            return Err(err.into());
        }

        log_info(&format!("Aiming activated for {:?}", entity));
    }

    Ok(())
}

/// System: внешний target для НЕ-local акторов (network/AI)
pub fn apply_aim_targets(
    mut events: EventReader<AimTargetChanged>,
    mut actors: Query<&mut Behavior, Without<LocalPlayer>>,
) {
    for event in events.read() {
        let Ok(mut behavior) = actors.get_mut(event.entity) else {
            // LocalPlayer или entity уже despawned
            log(&format!("AimTargetChanged ignored for {:?}", event.entity));
            continue;
        };

        if let Some(controller) = behavior.as_aiming_mut() {
            controller.set_target(event.target);
        }
    }
}

/// System: DetachAimingIntent → очистить overrides, broadcast clear
pub fn detach_aiming_behaviors(
    mut intents: EventReader<DetachAimingIntent>,
    mut actors: Query<(&mut Behavior, &mut BoneOverrides)>,
    mut clear_events: EventWriter<BoneClearOverrideEvent>,
) {
    for intent in intents.read() {
        let Ok((mut behavior, mut overrides)) = actors.get_mut(intent.entity) else {
            log_warning(&format!("DetachAimingIntent: entity {:?} has no skeleton", intent.entity));
            continue;
        };

        let Some(controller) = behavior.as_aiming_mut() else {
            log_warning(&format!("DetachAimingIntent: {:?} is not aiming", intent.entity));
            continue;
        };

        let cleared = controller.detach(&mut overrides);

        log_info(&format!(
            "Aiming detached for {:?} ({} bones cleared)",
            intent.entity,
            cleared.len()
        ));

        for bone in cleared {
            clear_events.write(BoneClearOverrideEvent {
                entity: intent.entity,
                bone,
            });
        }
    }
}

/// System: зеркалим позу, пришедшую от remote клиента
///
/// Один writer на кость: если у entity свой Active aiming контроллер,
/// remote overrides игнорируются.
pub fn apply_remote_poses(
    mut events: EventReader<RemotePoseEvent>,
    mut actors: Query<(Option<&Behavior>, &mut BoneOverrides)>,
) {
    for event in events.read() {
        let entity = event.entity();

        let Ok((behavior, mut overrides)) = actors.get_mut(entity) else {
            log_warning(&format!("RemotePoseEvent for unknown entity {:?}", entity));
            continue;
        };

        if behavior.and_then(Behavior::as_aiming).is_some_and(|c| c.is_active()) {
            log_warning(&format!(
                "RemotePoseEvent ignored: {:?} is driven by its own aiming controller",
                entity
            ));
            continue;
        }

        match *event {
            RemotePoseEvent::Override { bone, rotation, .. } => {
                overrides.override_rotation(bone, rotation);
            }
            RemotePoseEvent::Clear { bone, .. } => {
                overrides.clear(bone);
            }
        }
    }
}

/// System: debug override кости по имени (градусы → радианы)
///
/// Нулевая rotation очищает override. Кости Active aiming контроллера
/// не трогаем (один writer на кость).
pub fn apply_manual_bone_overrides(
    mut intents: EventReader<ManualBoneOverrideIntent>,
    mut actors: Query<(&Skeleton, &mut BoneOverrides, Option<&Behavior>)>,
) {
    for intent in intents.read() {
        let Ok((skeleton, mut overrides, behavior)) = actors.get_mut(intent.entity) else {
            log_warning(&format!("ManualBoneOverrideIntent: entity {:?} has no skeleton", intent.entity));
            continue;
        };

        let Some(bone) = skeleton.bone_id(&intent.bone_name) else {
            log_warning(&format!(
                "ManualBoneOverrideIntent: bone '{}' not found on {:?}",
                intent.bone_name, intent.entity
            ));
            continue;
        };

        if behavior.and_then(Behavior::as_aiming).is_some_and(|c| c.owns_bone(bone)) {
            log_warning(&format!(
                "ManualBoneOverrideIntent ignored: {} on {:?} is driven by aiming",
                intent.bone_name, intent.entity
            ));
            continue;
        }

        if intent.rotation_degrees == Vec3::ZERO {
            overrides.clear(bone);
            log_info(&format!("Manual override cleared: {} on {:?}", intent.bone_name, intent.entity));
            continue;
        }

        let degrees = intent.rotation_degrees;
        let rotation = Vec3::new(degrees.x.to_radians(), degrees.y.to_radians(), degrees.z.to_radians());
        overrides.override_rotation(bone, rotation);

        log_info(&format!(
            "Manual override: {} on {:?} = {:?}°",
            intent.bone_name, intent.entity, degrees
        ));
    }
}
