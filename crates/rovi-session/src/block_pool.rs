//! 无线方块配对池状态机
//!
//! 与视觉感知完全平行的粗粒度子系统：按出厂硬件标识追踪每个无线
//! 配件（方块/充电座）的配对连接状态，为配对 UI 和自动连接策略
//! 提供数据。
//!
//! 状态图：
//!
//! ```text
//! Available → ConnectInProgress → Connected → DisconnectInProgress → Available | Unavailable
//!     ↕ (无线发现/失联，独立于用户操作)
//! Unavailable
//! ```
//!
//! 条目一旦创建就不再移除（物理方块可以无限次进出无线范围，
//! 失联条目保留为 Unavailable）。只有 Available 集合的成员变化
//! 会向上层发"可用数量变化"通知，避免冗余的 UI 刷新。

use rovi_protocol::{ClientMessage, FactoryId, ObjectId, ObjectType};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 配对连接状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockConnectionState {
    /// 无线范围内，可配对
    Available,
    /// 已发出连接意图，等待机器人确认
    ConnectInProgress,
    /// 配对已确认
    Connected,
    /// 已发出断开意图，等待机器人确认
    DisconnectInProgress,
    /// 无线失联
    Unavailable,
}

/// 配对池条目
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPoolEntry {
    pub object_type: ObjectType,
    pub factory_id: FactoryId,
    /// 最近一次广播的信号强度
    pub rssi: i8,
    /// 连接确认后分配的对象标识
    pub object_id: Option<ObjectId>,
    pub state: BlockConnectionState,
    /// 是否属于用户保存的配对池
    pub in_saved_pool: bool,
}

impl BlockPoolEntry {
    pub fn is_available(&self) -> bool {
        self.state == BlockConnectionState::Available
    }

    pub fn is_connected(&self) -> bool {
        self.state == BlockConnectionState::Connected
    }
}

/// 一次状态机输入产生的外部效果
///
/// 会话层据此发送配对意图消息和上抛通知。
#[derive(Debug, Default)]
pub struct PoolEffects {
    /// 需要发送的配对意图消息
    pub outbound: Option<ClientMessage>,
    /// Available 集合成员发生了变化
    pub availability_changed: bool,
    /// 指定条目的连接状态发生了变化
    pub connection_changed: Option<(FactoryId, BlockConnectionState)>,
}

/// 配对池
#[derive(Default)]
pub struct BlockPool {
    /// 规范集合（插入序，条目不删除，索引稳定）
    entries: Vec<BlockPoolEntry>,
    /// 按型号的增量索引（指向 `entries` 下标）
    by_type: HashMap<ObjectType, Vec<usize>>,
    enabled: bool,
}

impl BlockPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn index_of(&self, factory_id: &FactoryId) -> Option<usize> {
        self.entries.iter().position(|e| &e.factory_id == factory_id)
    }

    fn insert(&mut self, entry: BlockPoolEntry) -> usize {
        let object_type = entry.object_type;
        self.entries.push(entry);
        let idx = self.entries.len() - 1;
        // 索引随插入增量维护，绝不整体重建
        self.by_type.entry(object_type).or_default().push(idx);
        idx
    }

    /// 无线广播：发现（或刷新）一个配件
    pub fn on_advertisement(
        &mut self,
        factory_id: FactoryId,
        object_type: ObjectType,
        rssi: i8,
    ) -> PoolEffects {
        let mut effects = PoolEffects::default();
        match self.index_of(&factory_id) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                entry.rssi = rssi;
                if entry.state == BlockConnectionState::Unavailable {
                    entry.state = BlockConnectionState::Available;
                    effects.availability_changed = true;
                    debug!("Block {} back in range", factory_id);
                }
            },
            None => {
                debug!("Discovered block {} (type {:?}, rssi {})", factory_id, object_type, rssi);
                self.insert(BlockPoolEntry {
                    object_type,
                    factory_id,
                    rssi,
                    object_id: None,
                    state: BlockConnectionState::Available,
                    in_saved_pool: false,
                });
                effects.availability_changed = true;
            },
        }
        effects
    }

    /// 无线失联通告
    pub fn on_lost(&mut self, factory_id: &FactoryId) -> PoolEffects {
        let mut effects = PoolEffects::default();
        match self.index_of(factory_id) {
            Some(idx) => {
                let entry = &mut self.entries[idx];
                // 只有 Available ↔ Unavailable 由无线范围直接驱动；
                // 连接中的条目由连接状态消息处理
                if entry.state == BlockConnectionState::Available {
                    entry.state = BlockConnectionState::Unavailable;
                    effects.availability_changed = true;
                    debug!("Block {} out of range", factory_id);
                }
            },
            None => {
                // 未发现过的配件失联：传输顺序竞态，空操作
            },
        }
        effects
    }

    /// 配对意图：把条目推向 Connected 或推离配对池
    ///
    /// 这是一次**请求**而不是状态改变：真正的 Connected/Unavailable
    /// 确认稍后由 [`BlockPool::on_connection_state`] 应用。
    pub fn set_object_in_pool(&mut self, factory_id: &FactoryId, connect: bool) -> PoolEffects {
        let mut effects = PoolEffects::default();
        let Some(idx) = self.index_of(factory_id) else {
            warn!("Pairing intent for unknown block {}", factory_id);
            return effects;
        };

        let entry = &mut self.entries[idx];
        let was_available = entry.is_available();
        let next = if connect {
            match entry.state {
                BlockConnectionState::Available | BlockConnectionState::Unavailable => {
                    Some(BlockConnectionState::ConnectInProgress)
                },
                // 已连接/连接中：幂等，不重发意图
                _ => None,
            }
        } else {
            match entry.state {
                BlockConnectionState::Connected | BlockConnectionState::ConnectInProgress => {
                    Some(BlockConnectionState::DisconnectInProgress)
                },
                _ => None,
            }
        };

        if let Some(state) = next {
            entry.state = state;
            entry.in_saved_pool = connect;
            effects.outbound = Some(ClientMessage::SetObjectInPool {
                factory_id: factory_id.clone(),
                connect,
            });
            effects.connection_changed = Some((factory_id.clone(), state));
            effects.availability_changed = was_available != self.entries[idx].is_available();
        }
        effects
    }

    /// 连接状态确认（入站消息）
    ///
    /// 机器人可能对从未广播过的配件（保存池成员上电直连）直接给出
    /// 连接确认，此时就地创建条目。
    pub fn on_connection_state(
        &mut self,
        factory_id: FactoryId,
        object_type: ObjectType,
        object_id: Option<ObjectId>,
        connected: bool,
    ) -> PoolEffects {
        let mut effects = PoolEffects::default();
        let idx = match self.index_of(&factory_id) {
            Some(idx) => idx,
            None => self.insert(BlockPoolEntry {
                object_type,
                factory_id: factory_id.clone(),
                rssi: i8::MIN,
                object_id: None,
                state: BlockConnectionState::Unavailable,
                in_saved_pool: connected,
            }),
        };

        let entry = &mut self.entries[idx];
        let was_available = entry.is_available();
        let new_state = if connected {
            entry.object_id = object_id;
            BlockConnectionState::Connected
        } else {
            entry.object_id = None;
            // 刚断开的配件通常仍在无线范围内，等失联广播再转 Unavailable
            BlockConnectionState::Available
        };

        if entry.state != new_state {
            entry.state = new_state;
            effects.connection_changed = Some((factory_id, new_state));
        }
        effects.availability_changed = was_available != self.entries[idx].is_available();
        effects
    }

    /// 发现开关请求（幂等）
    ///
    /// 关闭不清空既有条目，只停止新的发现。
    pub fn enable(&mut self, enabled: bool, discovery_window_s: f32) -> Option<ClientMessage> {
        if self.enabled == enabled {
            debug!("Block pool discovery already {}", if enabled { "on" } else { "off" });
            return None;
        }
        self.enabled = enabled;
        Some(ClientMessage::EnableBlockPool {
            enabled,
            discovery_window_s,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 规范集合（插入序只读视图）
    pub fn entries(&self) -> &[BlockPoolEntry] {
        &self.entries
    }

    /// 按型号枚举
    ///
    /// 索引在插入时增量维护，与规范集合始终一致。
    pub fn entries_of_type(&self, object_type: ObjectType) -> impl Iterator<Item = &BlockPoolEntry> {
        self.by_type
            .get(&object_type)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&idx| &self.entries[idx])
    }

    /// 当前可用（可配对）条目数量
    pub fn available_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_available()).count()
    }

    /// 按信号强度排序的副本
    ///
    /// 稳定全序：信号降序，同信号按出厂标识升序。同信号条目在
    /// 反复重排下保持同一顺序，避免配对列表 UI 抖动。
    pub fn sorted_by_rssi(&self) -> Vec<BlockPoolEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| {
            b.rssi.cmp(&a.rssi).then_with(|| a.factory_id.cmp(&b.factory_id))
        });
        sorted
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_type.clear();
        self.enabled = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;

    fn fid(s: &str) -> FactoryId {
        FactoryId::new(s)
    }

    #[test]
    fn test_discovery_creates_available_entry() {
        let mut pool = BlockPool::new();
        let effects = pool.on_advertisement(fid("aa01"), ObjectType::LightCube1, -40);
        assert!(effects.availability_changed);
        assert_eq!(pool.available_count(), 1);
        assert_eq!(pool.entries()[0].state, BlockConnectionState::Available);

        // 重复广播只刷新信号，不再通知
        let effects = pool.on_advertisement(fid("aa01"), ObjectType::LightCube1, -35);
        assert!(!effects.availability_changed);
        assert_eq!(pool.entries()[0].rssi, -35);
        assert_eq!(pool.entries().len(), 1);
    }

    #[test]
    fn test_range_loss_and_rediscovery() {
        let mut pool = BlockPool::new();
        pool.on_advertisement(fid("aa01"), ObjectType::LightCube1, -40);

        let effects = pool.on_lost(&fid("aa01"));
        assert!(effects.availability_changed);
        assert_eq!(pool.entries()[0].state, BlockConnectionState::Unavailable);
        // 条目保留，不删除
        assert_eq!(pool.entries().len(), 1);
        assert_eq!(pool.available_count(), 0);

        let effects = pool.on_advertisement(fid("aa01"), ObjectType::LightCube1, -50);
        assert!(effects.availability_changed);
        assert_eq!(pool.available_count(), 1);

        // 未知配件失联：空操作
        let effects = pool.on_lost(&fid("zz99"));
        assert!(!effects.availability_changed);
    }

    #[test]
    fn test_pairing_request_then_confirmation() {
        let mut pool = BlockPool::new();
        pool.on_advertisement(fid("aa01"), ObjectType::LightCube1, -40);

        // 连接意图：状态转 ConnectInProgress，产生出站消息，可用数变化
        let effects = pool.set_object_in_pool(&fid("aa01"), true);
        assert!(matches!(
            effects.outbound,
            Some(ClientMessage::SetObjectInPool { connect: true, .. })
        ));
        assert!(effects.availability_changed);
        assert_eq!(pool.entries()[0].state, BlockConnectionState::ConnectInProgress);

        // 重复意图幂等：不再发消息
        let effects = pool.set_object_in_pool(&fid("aa01"), true);
        assert!(effects.outbound.is_none());

        // 机器人确认连接
        let effects = pool.on_connection_state(
            fid("aa01"),
            ObjectType::LightCube1,
            Some(ObjectId(5)),
            true,
        );
        assert_eq!(
            effects.connection_changed,
            Some((fid("aa01"), BlockConnectionState::Connected))
        );
        assert_eq!(pool.entries()[0].object_id, Some(ObjectId(5)));

        // 断开意图 → 确认后回到 Available
        let effects = pool.set_object_in_pool(&fid("aa01"), false);
        assert!(matches!(
            effects.outbound,
            Some(ClientMessage::SetObjectInPool { connect: false, .. })
        ));
        let effects =
            pool.on_connection_state(fid("aa01"), ObjectType::LightCube1, None, false);
        assert!(effects.availability_changed);
        assert_eq!(pool.entries()[0].state, BlockConnectionState::Available);
        assert_eq!(pool.entries()[0].object_id, None);
    }

    #[test]
    fn test_connection_state_for_undiscovered_block() {
        let mut pool = BlockPool::new();
        // 保存池成员上电直连：从未广播过就收到连接确认
        let effects = pool.on_connection_state(
            fid("bb02"),
            ObjectType::LightCube2,
            Some(ObjectId(9)),
            true,
        );
        assert_eq!(
            effects.connection_changed,
            Some((fid("bb02"), BlockConnectionState::Connected))
        );
        assert_eq!(pool.entries().len(), 1);
        assert!(pool.entries()[0].in_saved_pool);
    }

    #[test]
    fn test_pairing_intent_unknown_block_is_noop() {
        let mut pool = BlockPool::new();
        let effects = pool.set_object_in_pool(&fid("nope"), true);
        assert!(effects.outbound.is_none());
        assert!(!effects.availability_changed);
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut pool = BlockPool::new();
        assert!(pool.enable(true, 30.0).is_some());
        assert!(pool.enable(true, 30.0).is_none());
        assert!(pool.enable(false, 0.0).is_some());
        // 关闭不清空条目
        pool.on_advertisement(fid("aa01"), ObjectType::LightCube1, -40);
        pool.enable(false, 0.0);
        assert_eq!(pool.entries().len(), 1);
    }

    #[test]
    fn test_per_type_index_matches_canonical() {
        let mut pool = BlockPool::new();
        pool.on_advertisement(fid("a"), ObjectType::LightCube1, -40);
        pool.on_advertisement(fid("b"), ObjectType::LightCube2, -41);
        pool.on_advertisement(fid("c"), ObjectType::LightCube1, -42);

        let cube1: Vec<&str> = pool
            .entries_of_type(ObjectType::LightCube1)
            .map(|e| e.factory_id.as_str())
            .collect();
        assert_eq!(cube1, vec!["a", "c"]);

        let chargers: Vec<_> = pool.entries_of_type(ObjectType::Charger).collect();
        assert!(chargers.is_empty());

        // 索引与规范集合覆盖相同条目
        let indexed: usize = [ObjectType::LightCube1, ObjectType::LightCube2]
            .iter()
            .map(|t| pool.entries_of_type(*t).count())
            .sum();
        assert_eq!(indexed, pool.entries().len());
    }

    /// 排序是稳定全序：同信号按出厂标识，重排可复现
    #[test]
    fn test_rssi_sort_stable_with_ties() {
        let mut rng = rand::thread_rng();
        let mut ids: Vec<(&str, i8)> =
            vec![("d", -40), ("a", -40), ("c", -30), ("b", -40), ("e", -50)];

        let mut reference: Option<Vec<String>> = None;
        for _ in 0..5 {
            ids.shuffle(&mut rng);
            let mut pool = BlockPool::new();
            for (id, rssi) in &ids {
                pool.on_advertisement(fid(id), ObjectType::LightCube1, *rssi);
            }
            let order: Vec<String> = pool
                .sorted_by_rssi()
                .iter()
                .map(|e| e.factory_id.0.clone())
                .collect();
            assert_eq!(order, vec!["c", "a", "b", "d", "e"]);
            match &reference {
                Some(prev) => assert_eq!(prev, &order),
                None => reference = Some(order),
            }
        }
    }
}
