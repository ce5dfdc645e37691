//! 感知对象生命周期追踪
//!
//! 机器人报告看见过的每个物理对象都有一条记录，按三个集合分类：
//!
//! - **seen**：报告过且位姿可信的对象（插入序）
//! - **visible**：最近一次观测仍在衰减窗口内的对象 id
//! - **dirty**：收到"被挪动"通告、位姿存疑的对象
//!
//! 可见性是拉取式的派生属性：[`ObjectTracker::prune_stale_visible`]
//! 必须每个感知周期至少调用一次（由会话 pump 负责），读取时不会
//! 自动衰减。
//!
//! 感知与传输顺序之间的竞态（对未知 id 的挪动/删除通告、已删除 id
//! 的观测）一律按空操作容忍，不是错误。

use rovi_protocol::{ObjectFamily, ObjectId, ObjectType, ObservationRect, Pose};
use std::time::{Duration, Instant};
use tracing::trace;

/// 一次观测的载荷
#[derive(Debug, Clone, Copy)]
pub struct Observation {
    pub object_id: ObjectId,
    pub object_type: ObjectType,
    pub pose: Pose,
    pub rect: ObservationRect,
    /// 标记是否直接可见（false 表示位姿为推断值，不刷新可见性）
    pub markers_visible: bool,
}

/// 一个被感知过的物理对象
#[derive(Debug, Clone)]
pub struct ObservedObject {
    pub object_id: ObjectId,
    pub family: ObjectFamily,
    pub object_type: ObjectType,
    /// 最近一次上报的位姿
    pub pose: Pose,
    /// 最近一次观测的屏幕矩形
    pub rect: ObservationRect,
    pub first_observed: Instant,
    pub last_observed: Instant,
}

impl ObservedObject {
    /// 标记当前是否可见（衰减窗口内有新鲜观测）
    pub fn markers_visible(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.last_observed) < window
    }
}

/// 对象生命周期追踪器
#[derive(Default)]
pub struct ObjectTracker {
    seen: Vec<ObservedObject>,
    dirty: Vec<ObservedObject>,
    visible: Vec<ObjectId>,
}

impl ObjectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建或更新一条观测记录
    ///
    /// 返回该对象是否为首次出现。对已在 dirty 集合中的对象，
    /// 新鲜观测永远获胜：记录搬回 seen，位姿取观测值。
    pub fn observe(&mut self, obs: Observation, now: Instant) -> bool {
        let id = obs.object_id;

        // dirty 中的记录被重新观测：搬回 seen
        if let Some(pos) = self.dirty.iter().position(|o| o.object_id == id) {
            let mut entry = self.dirty.remove(pos);
            Self::refresh(&mut entry, &obs, now);
            trace!("Object {:?} re-observed, leaving dirty set", id);
            self.seen.push(entry);
        } else if let Some(entry) = self.seen.iter_mut().find(|o| o.object_id == id) {
            Self::refresh(entry, &obs, now);
        } else {
            self.seen.push(ObservedObject {
                object_id: id,
                family: obs.object_type.family(),
                object_type: obs.object_type,
                pose: obs.pose,
                rect: obs.rect,
                first_observed: now,
                last_observed: now,
            });
            if obs.markers_visible {
                self.visible.push(id);
            }
            return true;
        }

        if obs.markers_visible && !self.visible.contains(&id) {
            self.visible.push(id);
        }
        false
    }

    fn refresh(entry: &mut ObservedObject, obs: &Observation, now: Instant) {
        entry.object_type = obs.object_type;
        entry.family = obs.object_type.family();
        entry.pose = obs.pose;
        entry.rect = obs.rect;
        if obs.markers_visible {
            entry.last_observed = now;
        }
    }

    /// 挪动通告：对象从 seen 移入 dirty
    ///
    /// 幂等：已在 dirty 的对象和未知对象都是空操作。可见性不在此
    /// 处回收，由衰减窗口自然过期。
    pub fn mark_moved(&mut self, id: ObjectId) {
        if let Some(pos) = self.seen.iter().position(|o| o.object_id == id) {
            let entry = self.seen.remove(pos);
            trace!("Object {:?} reported moved, pose no longer trusted", id);
            self.dirty.push(entry);
        }
    }

    /// 删除/位姿未知通告：从所有集合中无条件移除
    pub fn remove(&mut self, id: ObjectId) {
        self.seen.retain(|o| o.object_id != id);
        self.dirty.retain(|o| o.object_id != id);
        self.visible.retain(|v| *v != id);
    }

    /// 回收可见性已衰减的对象
    ///
    /// 每个感知周期必须至少调用一次。
    pub fn prune_stale_visible(&mut self, now: Instant, window: Duration) {
        let seen = &self.seen;
        let dirty = &self.dirty;
        self.visible.retain(|id| {
            seen.iter()
                .chain(dirty.iter())
                .find(|o| o.object_id == *id)
                .is_some_and(|o| o.markers_visible(now, window))
        });
    }

    /// 位姿可信的对象（插入序只读视图）
    pub fn seen_objects(&self) -> &[ObservedObject] {
        &self.seen
    }

    /// 位姿存疑的对象（只读视图）
    pub fn dirty_objects(&self) -> &[ObservedObject] {
        &self.dirty
    }

    /// 当前可见的对象 id（只读视图）
    pub fn visible_ids(&self) -> &[ObjectId] {
        &self.visible
    }

    /// 按 id 查找（先 seen 后 dirty）
    pub fn get(&self, id: ObjectId) -> Option<&ObservedObject> {
        self.seen
            .iter()
            .chain(self.dirty.iter())
            .find(|o| o.object_id == id)
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.dirty.clear();
        self.visible.clear();
    }
}
