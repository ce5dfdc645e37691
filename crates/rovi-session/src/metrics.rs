//! 会话性能指标
//!
//! 计数器是普通整数而不是原子量：会话层按契约运行在单一 tick 线程
//! 上，读写天然串行。[`crate::RobotSession::metrics`] 返回值快照。

/// 会话计数器快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionMetrics {
    /// 成功解码并派发的入站消息数
    pub rx_messages: u64,
    /// 解码失败（未知标签/畸形报文）被丢弃的数据报数
    pub rx_decode_errors: u64,
    /// 成功交给通道的出站消息数
    pub tx_messages: u64,
    /// 因未连接被丢弃的出站消息数
    pub tx_dropped_not_connected: u64,
    /// 被节流抑制的出站命令数（重复头部角度、空操作举升）
    pub tx_suppressed: u64,
    /// 按 FIFO 关联并回调的完成通知数
    pub completions_resolved: u64,
    /// 无对应挂起回调、被静默吸收的完成通知数
    pub completions_orphaned: u64,
    /// 断开时被强制置失败的挂起回调数
    pub completions_force_failed: u64,
    /// 实际产生发送的灯光批量次数
    pub light_flushes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zeroed() {
        let metrics = SessionMetrics::default();
        assert_eq!(metrics.rx_messages, 0);
        assert_eq!(metrics.completions_force_failed, 0);
    }
}
