//! 会话层错误类型定义

use rovi_link::LinkError;
use rovi_protocol::ProtocolError;
use thiserror::Error;

/// 会话层错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    /// 传输层错误
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// 协议值错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 会话已处于连接/握手状态
    #[error("Session already connecting or connected")]
    AlreadyConnected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_link_error() {
        let err: SessionError = LinkError::Timeout.into();
        match err {
            SessionError::Link(LinkError::Timeout) => {},
            other => panic!("Expected Link variant, got {:?}", other),
        }
    }

    #[test]
    fn test_display() {
        let msg = format!("{}", SessionError::AlreadyConnected);
        assert!(msg.contains("already connecting"));
    }
}
