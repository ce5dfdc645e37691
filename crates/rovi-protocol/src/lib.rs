//! # Rovi Protocol
//!
//! Rovi 机器人会话协议定义（无传输依赖）
//!
//! ## 模块
//!
//! - `ids`: 标识符类型与命令种类定义
//! - `constants`: 协议常量定义（物理量程、灯位数量）
//! - `units`: 归一化系数与物理单位的换算
//! - `flags`: 机器人状态位集
//! - `geometry`: 位姿与屏幕观测矩形
//! - `lights`: 灯光模式值
//! - `command`: 客户端 → 机器人 命令消息
//! - `event`: 机器人 → 客户端 通知消息
//!
//! ## 线格式
//!
//! 字段布局由外部契约生成（传输层通过 serde 派生编码），本 crate 只定义
//! 客户端侧的类型化消息模型。未知的消息标签在解码阶段失败并由上层丢弃，
//! 不属于协议错误。

pub mod command;
pub mod constants;
pub mod event;
pub mod flags;
pub mod geometry;
pub mod ids;
pub mod lights;
pub mod units;

// 重新导出常用类型
pub use command::*;
pub use constants::*;
pub use event::*;
pub use flags::*;
pub use geometry::*;
pub use ids::*;
pub use lights::*;
pub use units::*;

use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: u8 },

    #[error("Value out of range for field {field}: {value}")]
    OutOfRange { field: String, value: f32 },
}
