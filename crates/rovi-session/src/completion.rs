//! 命令完成账本
//!
//! 协议不为命令分配唯一关联 id，完成通知只携带命令种类。同一种类
//! 允许多条命令同时在途，因此每个种类维护一个回调队列（而不是
//! 映射）：种类 K 的完成通知永远结算 K 队列中最老的一条。这是该
//! 协议下唯一安全的关联纪律。

use rovi_protocol::ActionKind;
use std::collections::HashMap;
use std::collections::VecDeque;
use tracing::trace;

/// 命令完成回调
///
/// 参数为动作是否成功。回调最多被调用一次：正常结算时携带机器人
/// 上报的结果；会话断开时账本整体清算，所有挂起回调以失败结算。
pub type CompletionCallback = Box<dyn FnOnce(bool)>;

/// 按种类 FIFO 的完成账本
#[derive(Default)]
pub struct CompletionLedger {
    queues: HashMap<ActionKind, VecDeque<CompletionCallback>>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }

    /// 登记一条在途命令的回调
    pub fn push(&mut self, kind: ActionKind, callback: CompletionCallback) {
        self.queues.entry(kind).or_default().push_back(callback);
    }

    /// 结算种类 `kind` 最老的一条挂起回调
    ///
    /// 返回是否有回调被触发。没有挂起回调的完成通知被静默吸收
    /// （机器人可能对未登记回调的命令也发完成通知）。
    pub fn resolve(&mut self, kind: ActionKind, success: bool) -> bool {
        let Some(queue) = self.queues.get_mut(&kind) else {
            return false;
        };
        let Some(callback) = queue.pop_front() else {
            return false;
        };
        trace!("Resolving completion for {:?}: success={}", kind, success);
        callback(success);
        true
    }

    /// 种类 `kind` 的挂起数量
    pub fn pending(&self, kind: ActionKind) -> usize {
        self.queues.get(&kind).map_or(0, VecDeque::len)
    }

    /// 所有种类的挂起总数
    pub fn total_pending(&self) -> usize {
        self.queues.values().map(VecDeque::len).sum()
    }

    /// 整体清算：所有挂起回调以失败结算，返回结算条数
    ///
    /// 会话断开时调用。每个种类内部仍按 FIFO 顺序触发，保证
    /// "每个回调恰好触发一次"的不变量在断开路径上同样成立。
    pub fn fail_all(&mut self) -> usize {
        let mut fired = 0;
        for (kind, queue) in self.queues.drain() {
            for callback in queue {
                trace!("Force-failing pending completion for {:?}", kind);
                callback(false);
                fired += 1;
            }
        }
        fired
    }
}
