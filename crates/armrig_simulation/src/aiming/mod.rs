//! Aiming domain — руки актора следят за target через 2-bone IK
//!
//! Архитектура:
//! - controller: AimingController (state machine + throttle + solve pass)
//! - events: outgoing BoneOverride/Clear, incoming intents + remote poses
//! - systems: activation, внешние targets, detach, remote mirror, manual overrides
//!
//! Сам solve pass запускается из behavior::update_behaviors (Behavior::Aiming).

use bevy::prelude::*;

pub mod controller;
pub mod error;
pub mod events;
pub mod systems;


pub use controller::*;
pub use error::AimingError;
pub use events::*;
pub use systems::*;

use crate::SimulationSet;

/// Aiming Plugin
///
/// Регистрирует события и системы вокруг solve pass'а.
pub struct AimingPlugin;

impl Plugin for AimingPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BoneOverrideEvent>()
            .add_event::<BoneClearOverrideEvent>()
            .add_event::<DetachAimingIntent>()
            .add_event::<AimTargetChanged>()
            .add_event::<RemotePoseEvent>()
            .add_event::<ManualBoneOverrideIntent>();

        app.add_systems(
            Update,
            (activate_aiming_behaviors, apply_aim_targets)
                .chain()
                .in_set(SimulationSet::Prepare),
        );

        app.add_systems(
            Update,
            (
                detach_aiming_behaviors,
                apply_remote_poses,
                apply_manual_bone_overrides,
            )
                .chain()
                .in_set(SimulationSet::Mirror),
        );
    }
}
