//! 协议常量定义
//!
//! 物理量程来自机器人机械标定，是系数换算（见 [`crate::units`]）的
//! 线性插值端点。

/// 客户端协议版本（握手时上报，机器人据此拒绝不兼容的客户端）
pub const CLIENT_PROTOCOL_VERSION: u32 = 3;

/// 头部俯仰最小角（弧度，约 -25°）
pub const HEAD_ANGLE_MIN_RAD: f32 = -0.44;

/// 头部俯仰最大角（弧度，约 44.5°）
pub const HEAD_ANGLE_MAX_RAD: f32 = 0.78;

/// 举升臂最低高度（毫米）
pub const LIFT_HEIGHT_MIN_MM: f32 = 32.0;

/// 举升臂最高高度（毫米）
pub const LIFT_HEIGHT_MAX_MM: f32 = 92.0;

/// 携带方块时的举升高度（毫米）
///
/// 动作失败后的纠正性举升命令在携带状态下回到此高度。
pub const LIFT_CARRY_HEIGHT_MM: f32 = 66.0;

/// 头部角度重复请求的判同容差（弧度）
pub const HEAD_ANGLE_TOLERANCE_RAD: f32 = 0.01;

/// 举升高度空操作判定容差（毫米）
pub const LIFT_TOLERANCE_MM: f32 = 2.0;

/// 背部灯位数量
pub const BACKPACK_LIGHT_COUNT: usize = 5;

/// 方块灯位数量
pub const CUBE_LIGHT_COUNT: usize = 4;
