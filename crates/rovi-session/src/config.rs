//! 会话配置

use std::time::Duration;

/// 会话配置
///
/// 控制存活检测、可见性衰减、灯光限频和命令节流行为。
///
/// # Example
///
/// ```
/// use rovi_session::SessionConfig;
/// use std::time::Duration;
///
/// // 使用默认配置
/// let config = SessionConfig::default();
///
/// // 自定义存活超时
/// let config = SessionConfig {
///     liveness_timeout: Duration::from_secs(10),
///     ..SessionConfig::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// 存活超时：超过此时长没有任何入站消息则判定会话失效
    pub liveness_timeout: Duration,
    /// 可见性衰减窗口：对象最近一次观测超过此时长即移出 visible 集合
    pub visibility_window: Duration,
    /// 灯光批量发送的最小间隔
    pub light_flush_interval: Duration,
    /// 物理动作命令发出后的本地"忙"冷却时长
    pub action_cooldown: Duration,
    /// 相同头部角度请求的最小重发间隔
    pub head_rerequest_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            liveness_timeout: Duration::from_secs(5),
            visibility_window: Duration::from_millis(330),
            light_flush_interval: Duration::from_millis(100),
            action_cooldown: Duration::from_millis(250),
            head_rerequest_interval: Duration::from_millis(250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.visibility_window, Duration::from_millis(330));
        assert!(config.liveness_timeout > config.light_flush_interval);
    }
}
