//! 会话层模块
//!
//! 本模块提供 Rovi 机器人的客户端会话核心，包括：
//! - 连接生命周期与入站消息派发（唯一断开路径）
//! - 机器人遥测影子状态与命令完成关联（按种类 FIFO）
//! - 感知对象生命周期追踪（seen / visible / dirty）
//! - 无线方块配对池状态机（RSSI 排序、按型号索引）
//! - 灯光差分批量发送（限频 + 断开前强制熄灭）
//!
//! # 调度模型
//!
//! 单线程协作式：宿主应用每帧调用一次 [`RobotSession::pump`]，
//! 所有入站处理和出站发送都发生在这条调用链上，没有内部线程，
//! 也不需要锁。所有读取到的状态都是仅在本帧内有效的快照。

mod block_pool;
mod completion;
mod config;
mod error;
pub mod hooks;
mod lights;
mod metrics;
mod objects;
mod session;
mod shadow;

pub use block_pool::{BlockConnectionState, BlockPool, BlockPoolEntry, PoolEffects};
pub use completion::{CompletionCallback, CompletionLedger};
pub use config::SessionConfig;
pub use error::SessionError;
pub use hooks::{ChannelHook, HookId, SessionHook, SessionHooks};
pub use lights::LightEngine;
pub use metrics::SessionMetrics;
pub use objects::{ObjectTracker, Observation, ObservedObject};
pub use session::{ConnectionStatus, DisconnectReason, RobotSession, SessionEvent};
pub use shadow::RobotShadow;
