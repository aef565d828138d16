//! Analytic two-bone IK (planar)
//!
//! Содержит:
//! - JointChain (resting pose: shoulder → elbow → hand)
//! - solve (law of cosines, без итераций)
//! - forward_kinematics (обратная проверка результата, debug tooling)
//!
//! Чистая математика: никаких ECS систем, никакого state.

pub mod solver;


pub use solver::*;
