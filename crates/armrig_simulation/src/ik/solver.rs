//! Two-bone IK solver (humerus/forearm)
//!
//! Решаем треугольник origin(P0) – middle(P1) – end(P2) дважды:
//! 1. Для resting pose (как рука стоит без override)
//! 2. Для target pose (P2 заменён на target, длины костей не меняются)
//!
//! Разница углов + разница bearing (полярный угол) = delta rotation
//! для shoulder (z axis) и elbow (z axis).
//!
//! # Конвенция
//!
//! Положительный угол = CCW (как `Vec2::from_angle`). Law of cosines даёт
//! углы без знака, поэтому решение сохраняет сторону изгиба resting pose
//! (`JointChain::bend_side`): зеркальная рука сгибается зеркально.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Порог "точки совпадают" / "кость нулевой длины"
pub const IK_TOLERANCE: f32 = 1e-4;

/// Resting pose конечности: [origin, middle, end effector]
///
/// P0 — origin (shoulder), по конвенции (0, 0).
/// P1, P2 — накопленные offsets от P0.
///
/// Вырожденная цепь (P0 == P1 == P2) — валидный input, не ошибка.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct JointChain {
    pub joints: [Vec2; 3],
}

impl JointChain {
    pub fn new(origin: Vec2, middle: Vec2, end: Vec2) -> Self {
        Self {
            joints: [origin, middle, end],
        }
    }

    /// Собрать цепь из resting offsets костей (каждый относительно parent)
    ///
    /// `middle_offset` — elbow относительно shoulder,
    /// `end_offset` — hand относительно elbow. Z отбрасывается (planar IK).
    pub fn from_resting_offsets(middle_offset: Vec3, end_offset: Vec3) -> Self {
        let middle = middle_offset.truncate();
        let end = middle + end_offset.truncate();

        Self::new(Vec2::ZERO, middle, end)
    }

    pub fn origin(&self) -> Vec2 {
        self.joints[0]
    }

    pub fn middle(&self) -> Vec2 {
        self.joints[1]
    }

    pub fn end(&self) -> Vec2 {
        self.joints[2]
    }

    /// Длина forearm (|P2 − P1|)
    pub fn forearm_length(&self) -> f32 {
        self.end().distance(self.middle())
    }

    /// Длина upper arm (|P1 − P0|)
    pub fn upper_arm_length(&self) -> f32 {
        self.middle().distance(self.origin())
    }

    /// Сторона изгиба resting pose
    ///
    /// +1: elbow CCW от линии origin → end, −1: CW.
    /// Прямая (или вырожденная) цепь → +1.
    pub fn bend_side(&self) -> f32 {
        let cross = (self.end() - self.origin()).perp_dot(self.middle() - self.origin());
        if cross < -IK_TOLERANCE {
            -1.0
        } else {
            1.0
        }
    }

    /// Максимальный reach (полностью выпрямленная рука)
    pub fn reach(&self) -> f32 {
        self.forearm_length() + self.upper_arm_length()
    }
}

/// Результат solve: delta rotations (радианы) относительно resting pose
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SolveResult {
    /// Shoulder delta (вращает всю конечность)
    pub origin_delta: f32,
    /// Elbow delta (вращает forearm относительно upper arm)
    pub middle_delta: f32,
}

impl SolveResult {
    /// Rotation override для shoulder (только z axis — planar)
    pub fn origin_rotation(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.origin_delta)
    }

    /// Rotation override для elbow
    pub fn middle_rotation(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.middle_delta)
    }

    pub fn is_finite(&self) -> bool {
        self.origin_delta.is_finite() && self.middle_delta.is_finite()
    }
}

/// Interior angles треугольника, которые нужны solver'у
#[derive(Debug, Clone, Copy, Default)]
struct TriangleAngles {
    origin: f32,
    middle: f32,
}

impl TriangleAngles {
    /// `forearm` = a, `hypotenuse` = b, `upper_arm` = c
    fn solve(forearm: f32, hypotenuse: f32, upper_arm: f32) -> Self {
        Self {
            origin: law_of_cosines(upper_arm, hypotenuse, forearm),
            middle: law_of_cosines(upper_arm, forearm, hypotenuse),
        }
    }
}

/// Law of cosines: угол между сторонами `adjacent_a` и `adjacent_b`
///
/// `acos((opp² − adj_a² − adj_b²) / (−2 · adj_a · adj_b))`
///
/// Вход acos зажат в [-1, 1] (float overshoot на границе reach).
/// Сторона короче IK_TOLERANCE → угол не определён, возвращаем 0.
pub fn law_of_cosines(adjacent_a: f32, adjacent_b: f32, opposite: f32) -> f32 {
    if adjacent_a < IK_TOLERANCE || adjacent_b < IK_TOLERANCE {
        return 0.0;
    }

    let cos = (opposite * opposite - adjacent_a * adjacent_a - adjacent_b * adjacent_b)
        / (-2.0 * adjacent_a * adjacent_b);

    cos.clamp(-1.0, 1.0).acos()
}

/// Rect → polar angle в диапазоне [0, 2π)
///
/// atan2 различает все 4 квадранта, rem_euclid переносит (-π, 0) в (π, 2π).
/// Рука, висящая вниз (0, -1) → 3π/2.
pub fn polar_angle(vector: Vec2) -> f32 {
    let angle = vector.y.atan2(vector.x).rem_euclid(TAU);

    // rem_euclid(-ε) может округлиться ровно до TAU
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// Analytic two-bone IK
///
/// Возвращает delta rotations shoulder/elbow, которые приближают end effector
/// к `target` настолько, насколько позволяет геометрия.
///
/// Никогда не паникует и не возвращает NaN для конечного input:
/// - target дальше reach → рука полностью выпрямлена в сторону target
/// - target в origin → resting углы (приближение, см. DESIGN.md)
/// - кость нулевой длины → углы 0
pub fn solve(chain: &JointChain, target: Vec2) -> SolveResult {
    let origin = chain.origin();

    // Resting треугольник
    let forearm = chain.forearm_length();
    let hypotenuse = (chain.end() - origin).length();
    let upper_arm = chain.upper_arm_length();

    let resting = if upper_arm < IK_TOLERANCE {
        TriangleAngles::default()
    } else {
        TriangleAngles::solve(forearm, hypotenuse, upper_arm)
    };

    // Target треугольник (кости жёсткие: меняется только hypotenuse)
    let to_target = target - origin;
    let target_hypotenuse = to_target.length();

    let reached = if target_hypotenuse > forearm + upper_arm {
        // Unreachable: interior angle = π (а не π − resting), иначе прямая рука складывается
        TriangleAngles {
            origin: 0.0,
            middle: PI,
        }
    } else if target_hypotenuse > IK_TOLERANCE {
        TriangleAngles::solve(forearm, target_hypotenuse, upper_arm)
    } else {
        // TODO: target в shoulder — корректно только если в resting pose hand тоже у shoulder
        resting
    };

    // Bearings (абсолютные углы от origin)
    let upper_arm_bearing = if upper_arm < IK_TOLERANCE {
        0.0
    } else {
        polar_angle(chain.middle() - origin)
    };

    let resting_bearing = if hypotenuse < IK_TOLERANCE {
        upper_arm_bearing
    } else {
        polar_angle(chain.end() - origin)
    };

    let target_bearing = if target_hypotenuse < IK_TOLERANCE {
        resting_bearing
    } else {
        polar_angle(to_target)
    };

    let side = chain.bend_side();

    SolveResult {
        origin_delta: (target_bearing - resting_bearing) - side * (resting.origin - reached.origin),
        middle_delta: side * (reached.middle - resting.middle),
    }
}

/// Forward kinematics: где окажется end effector после применения `result`
///
/// Shoulder поворачивает всю конечность на origin_delta,
/// forearm дополнительно поворачивается на middle_delta вокруг elbow.
pub fn forward_kinematics(chain: &JointChain, result: SolveResult) -> Vec2 {
    let upper_arm = chain.middle() - chain.origin();
    let forearm = chain.end() - chain.middle();

    let shoulder_rotation = Vec2::from_angle(result.origin_delta);
    let forearm_rotation = Vec2::from_angle(result.origin_delta + result.middle_delta);

    chain.origin() + shoulder_rotation.rotate(upper_arm) + forearm_rotation.rotate(forearm)
}
