//! 会话事件钩子
//!
//! 本模块提供会话事件的监听注册管理。UI/游戏层通过钩子接收连接
//! 生命周期、配对池变化等通知。
//!
//! # 设计原则
//!
//! - **显式注册/注销**：`add` 返回 [`HookId`]，注销方负责用同一个 id
//!   调 `remove`——会话层不做引用计数或自动清理。
//! - **延迟通知**：事件在消息处理期间排队，处理结束后统一分发，
//!   避免回调期间修改监听列表导致的迭代失效。
//! - **非阻塞**：回调应当快速返回；队列式消费见 [`ChannelHook`]。

use crate::session::SessionEvent;
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;

/// 会话事件回调 Trait
///
/// # 示例
///
/// ```
/// use rovi_session::hooks::SessionHook;
/// use rovi_session::SessionEvent;
///
/// struct LogHook;
///
/// impl SessionHook for LogHook {
///     fn on_event(&self, event: &SessionEvent) {
///         println!("session event: {:?}", event);
///     }
/// }
/// ```
pub trait SessionHook: Send + Sync {
    fn on_event(&self, event: &SessionEvent);
}

/// 钩子句柄（用于注销）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// 钩子管理器
#[derive(Default)]
pub struct SessionHooks {
    hooks: Vec<(HookId, Arc<dyn SessionHook>)>,
    next_id: u64,
}

impl SessionHooks {
    pub fn new() -> Self {
        Self {
            hooks: Vec::new(),
            next_id: 0,
        }
    }

    /// 注册钩子，返回用于注销的句柄
    pub fn add(&mut self, hook: Arc<dyn SessionHook>) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.hooks.push((id, hook));
        id
    }

    /// 注销钩子
    ///
    /// 返回是否找到了对应的注册项。注销一个不存在的 id 不是错误，
    /// 由调用方（会话层）记警告。
    pub fn remove(&mut self, id: HookId) -> bool {
        let before = self.hooks.len();
        self.hooks.retain(|(hook_id, _)| *hook_id != id);
        self.hooks.len() != before
    }

    /// 向所有钩子分发一个事件
    pub fn dispatch(&self, event: &SessionEvent) {
        for (_, hook) in self.hooks.iter() {
            hook.on_event(event);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

/// 队列式钩子：把事件转发进 crossbeam 通道
///
/// 适合想按帧批量消费事件而不是写回调的调用方。接收端被 drop 后
/// 转发静默失败，钩子仍需由注册方显式注销。
///
/// # 示例
///
/// ```
/// use rovi_session::hooks::{ChannelHook, SessionHooks};
/// use std::sync::Arc;
///
/// let mut hooks = SessionHooks::new();
/// let (hook, rx) = ChannelHook::new();
/// let id = hooks.add(Arc::new(hook));
///
/// // ... 会话运行期间，rx.try_iter() 逐帧取事件 ...
///
/// hooks.remove(id);
/// drop(rx);
/// ```
pub struct ChannelHook {
    tx: Sender<SessionEvent>,
}

impl ChannelHook {
    pub fn new() -> (Self, Receiver<SessionEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl SessionHook for ChannelHook {
    fn on_event(&self, event: &SessionEvent) {
        // 接收端可能已被 drop，转发失败不致命
        let _ = self.tx.try_send(event.clone());
    }
}
