//! Local player marker component
//!
//! Отмечает entity, которым управляет input ЭТОЙ машины (в отличие от remote/AI).

use bevy::prelude::Component;

/// Marker component для locally-controlled entity
///
/// Акторы БЕЗ этого компонента не читают AimInput: их target приходит
/// извне (AimTargetChanged от network/AI) или не меняется вовсе.
/// Акторы С этим компонентом:
/// - берут target из AimInput (курсор в world coords)
/// - broadcast'ят BoneOverrideEvent, чтобы remote observers видели позу рук
///
/// # Possession
/// Переключение контроля между акторами:
/// ```ignore
/// commands.entity(old_actor).remove::<LocalPlayer>();
/// commands.entity(new_actor).insert(LocalPlayer);
/// ```
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LocalPlayer;
