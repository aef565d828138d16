//! Behavior dispatch system

use bevy::prelude::*;

use super::{Behavior, BehaviorEvent};
use crate::aiming::BoneOverrideEvent;
use crate::components::{LocalPlayer, MovementSpeed};
use crate::input::AimInput;
use crate::skeleton::BoneOverrides;
use crate::DeterministicRng;

/// System: один tick поведения для всех акторов
///
/// Aiming:
/// - LocalPlayer → target из AimInput, overrides broadcast'ятся (BoneOverrideEvent)
/// - остальные → последний target, без broadcast
///
/// Wander: двигает Transform, шлёт BehaviorEvent на Started/Stopped.
pub fn update_behaviors(
    time: Res<Time>,
    aim_input: Res<AimInput>,
    mut rng: ResMut<DeterministicRng>,
    mut actors: Query<(
        Entity,
        &mut Behavior,
        &mut Transform,
        Option<&mut BoneOverrides>,
        Option<&MovementSpeed>,
        Has<LocalPlayer>,
    )>,
    mut override_events: EventWriter<BoneOverrideEvent>,
    mut behavior_events: EventWriter<BehaviorEvent>,
) {
    let delta = time.delta_secs();

    for (entity, mut behavior, mut transform, overrides, speed, is_local) in actors.iter_mut() {
        match &mut *behavior {
            Behavior::Aiming(controller) => {
                // Без BoneOverrides некуда писать (Skeleton их require'ит)
                let Some(mut overrides) = overrides else {
                    continue;
                };

                let input_target = is_local.then_some(aim_input.cursor_world);

                let Some(applied) =
                    controller.update(delta, transform.translation, input_target, &mut overrides)
                else {
                    continue;
                };

                // Remote observers должны знать позу рук игрока
                if is_local {
                    for applied in applied {
                        override_events.write(BoneOverrideEvent {
                            entity,
                            bone: applied.bone,
                            rotation: applied.rotation,
                        });
                    }
                }
            }

            Behavior::Wander(wander) => {
                let speed = speed.copied().unwrap_or_default().speed;

                if let Some(transition) =
                    wander.update(&mut transform.translation, speed, delta, &mut rng.rng)
                {
                    behavior_events.write(BehaviorEvent { entity, transition });
                }
            }
        }
    }
}
