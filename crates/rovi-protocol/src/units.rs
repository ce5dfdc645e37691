//! 归一化系数与物理单位的换算
//!
//! 头部角度对调用方暴露为 [-1, 1] 系数，举升高度暴露为 [0, 1] 系数，
//! 内部按标定常量线性插值为弧度/毫米。换算是对称的：
//! `to_factor(to_physical(f)) ≈ f`（浮点容差内）。
//!
//! 超出合法区间的输入一律钳制到端点，不报错——调用方传入的是 UI
//! 滑杆之类的连续量，钳制比拒绝更符合使用场景。

use crate::constants::*;

/// 头部角度系数 [-1, 1] → 弧度
pub fn head_factor_to_rad(factor: f32) -> f32 {
    let f = factor.clamp(-1.0, 1.0);
    HEAD_ANGLE_MIN_RAD + (f + 1.0) * 0.5 * (HEAD_ANGLE_MAX_RAD - HEAD_ANGLE_MIN_RAD)
}

/// 弧度 → 头部角度系数 [-1, 1]
pub fn head_rad_to_factor(rad: f32) -> f32 {
    let r = rad.clamp(HEAD_ANGLE_MIN_RAD, HEAD_ANGLE_MAX_RAD);
    2.0 * (r - HEAD_ANGLE_MIN_RAD) / (HEAD_ANGLE_MAX_RAD - HEAD_ANGLE_MIN_RAD) - 1.0
}

/// 举升高度系数 [0, 1] → 毫米
pub fn lift_factor_to_mm(factor: f32) -> f32 {
    let f = factor.clamp(0.0, 1.0);
    LIFT_HEIGHT_MIN_MM + f * (LIFT_HEIGHT_MAX_MM - LIFT_HEIGHT_MIN_MM)
}

/// 毫米 → 举升高度系数 [0, 1]
pub fn lift_mm_to_factor(mm: f32) -> f32 {
    let m = mm.clamp(LIFT_HEIGHT_MIN_MM, LIFT_HEIGHT_MAX_MM);
    (m - LIFT_HEIGHT_MIN_MM) / (LIFT_HEIGHT_MAX_MM - LIFT_HEIGHT_MIN_MM)
}
