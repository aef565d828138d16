//! Aiming precondition errors
//!
//! Все ошибки — fatal на инициализации (activate). Во время tick'а
//! контроллер ничего не проверяет: rig уже валиден.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AimingError {
    #[error("bone '{0}' not found in skeleton")]
    MissingBone(String),

    #[error("bone '{0}' has no resting pose")]
    MissingRestingPose(String),

    #[error("bone '{bone}' must be a child of '{expected_parent}'")]
    BrokenChain { bone: String, expected_parent: String },

    #[error("update period must be finite and positive, got {0}")]
    InvalidUpdatePeriod(f32),

    #[error("aiming controller is detached and cannot be re-activated")]
    AlreadyDetached,
}
