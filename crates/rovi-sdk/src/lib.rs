//! # Rovi SDK
//!
//! Rovi 机器人会话协议的统一入口，重新导出各层常用类型：
//!
//! - [`protocol`]: 消息模型与单位换算
//! - [`link`]: 数据报传输通道
//! - [`session`]: 会话核心（连接管理、影子状态、感知、配对池、灯光）
//!
//! # 快速开始
//!
//! ```no_run
//! use rovi_sdk::{RobotSession, SessionConfig, UdpChannel};
//!
//! rovi_sdk::init_logging();
//!
//! let channel = UdpChannel::connect("192.168.42.1:5551").unwrap();
//! let mut session = RobotSession::new(channel, SessionConfig::default());
//! session.connect().unwrap();
//!
//! loop {
//!     session.pump();
//!     std::thread::sleep(std::time::Duration::from_millis(16));
//! }
//! ```

pub use rovi_link as link;
pub use rovi_protocol as protocol;
pub use rovi_session as session;

// 顶层便捷导出
pub use rovi_link::{Channel, LinkError, UdpChannel};
pub use rovi_protocol::{
    ActionKind, ClientMessage, FactoryId, LedColor, LightValue, ObjectFamily, ObjectId,
    ObjectType, Pose, RobotId, RobotMessage, StatusFlags,
};
pub use rovi_session::{
    BlockConnectionState, BlockPoolEntry, ChannelHook, CompletionCallback, ConnectionStatus,
    DisconnectReason, HookId, ObservedObject, RobotSession, SessionConfig, SessionError,
    SessionEvent, SessionHook, SessionMetrics,
};

/// 初始化日志（tracing + log 桥接）
///
/// 过滤级别由 `RUST_LOG` 环境变量控制，默认 `info`。重复调用是
/// 空操作（订阅者只能安装一次）。
pub fn init_logging() {
    // 把 log 门面的记录桥接进 tracing
    let _ = tracing_log::LogTracer::init();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
