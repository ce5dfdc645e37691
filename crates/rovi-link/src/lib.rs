//! # Rovi Link Layer
//!
//! 数据报传输抽象层，提供统一的双工消息通道接口。
//!
//! 消息编解码使用 serde 派生的线格式（外部契约），解码失败意味着
//! 对端发来了本客户端不认识的消息标签——这属于预期的协议版本偏差，
//! 通过 [`LinkError::is_fatal`] 归类为非致命。

use std::time::Duration;

// 重新导出 rovi-protocol 中的消息类型
pub use rovi_protocol::{ClientMessage, RobotMessage};

pub mod udp;

pub use udp::UdpChannel;

use thiserror::Error;

/// 单个数据报的最大长度（字节）
///
/// 超过此长度的消息在发送侧直接拒绝，避免依赖 IP 分片。
pub const MAX_DATAGRAM_LEN: usize = 1400;

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),
    #[error("Read timeout")]
    Timeout,
    #[error("Datagram too large: {size} bytes (max {max})")]
    OversizedDatagram { size: usize, max: usize },
    #[error("Channel closed")]
    Closed,
}

impl LinkError {
    /// 是否应视为会话致命错误
    ///
    /// 致命错误触发会话层唯一的断开路径；非致命错误（超时、解码
    /// 失败、超长报文）记日志后丢弃当前报文继续运行。
    pub fn is_fatal(&self) -> bool {
        matches!(self, LinkError::Io(_) | LinkError::Closed)
    }
}

/// 双工数据报通道
///
/// 语义约定：
/// - `send` 非阻塞，消息要么整体发出要么报错，没有部分发送。
/// - `receive` 在无数据时返回 [`LinkError::Timeout`]（超时是正常情况）。
/// - 通道本身无连接状态，会话生命周期由上层的握手/存活检测管理。
pub trait Channel {
    fn send(&mut self, msg: &ClientMessage) -> Result<(), LinkError>;
    fn receive(&mut self) -> Result<RobotMessage, LinkError>;
    fn set_receive_timeout(&mut self, _timeout: Duration) {}
    fn receive_timeout(&mut self, timeout: Duration) -> Result<RobotMessage, LinkError> {
        self.set_receive_timeout(timeout);
        self.receive()
    }
    /// 非阻塞接收：无数据返回 `Ok(None)`，其余错误原样上抛
    fn try_receive(&mut self) -> Result<Option<RobotMessage>, LinkError> {
        match self.receive() {
            Ok(msg) => Ok(Some(msg)),
            Err(LinkError::Timeout) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
