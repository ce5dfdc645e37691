//! 灯光差分批量发送层
//!
//! 命令调用方只改**期望**侧的灯光状态；真正的发送由限频的
//! [`LightEngine::flush`] 完成：逐灯位比较期望值与上次发送值，
//! 没有差异就什么都不发，有差异就为整组灯位组一条批量消息
//! （协议没有单灯粒度），并在交出消息的同时把期望值提交为
//! 已发送值。
//!
//! 这一层存在的全部意义，就是把原本每帧几十条的冗余灯光消息
//! 压成每个限频窗口至多一条。

use rovi_protocol::{
    BACKPACK_LIGHT_COUNT, CUBE_LIGHT_COUNT, ClientMessage, LightValue, ObjectId,
};
use smallvec::SmallVec;
use std::time::{Duration, Instant};
use tracing::trace;

/// 一个灯位的期望/已发送对
#[derive(Debug, Clone, Copy, Default)]
struct LightSlot {
    desired: LightValue,
    last_sent: LightValue,
}

impl LightSlot {
    /// 期望值与上次发送值逐字段比较
    fn is_dirty(&self) -> bool {
        self.desired != self.last_sent
    }
}

/// 一组灯位
#[derive(Debug, Clone, Copy)]
struct LightBank<const N: usize> {
    slots: [LightSlot; N],
}

impl<const N: usize> Default for LightBank<N> {
    fn default() -> Self {
        Self {
            slots: [LightSlot::default(); N],
        }
    }
}

impl<const N: usize> LightBank<N> {
    fn set(&mut self, index: usize, value: LightValue) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                slot.desired = value;
                true
            },
            None => false,
        }
    }

    fn set_all(&mut self, values: [LightValue; N]) {
        for (slot, value) in self.slots.iter_mut().zip(values) {
            slot.desired = value;
        }
    }

    fn any_dirty(&self) -> bool {
        self.slots.iter().any(LightSlot::is_dirty)
    }

    fn desired(&self) -> [LightValue; N] {
        std::array::from_fn(|i| self.slots[i].desired)
    }

    /// 期望值提交为已发送值（与组包发送同时发生）
    fn commit(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.last_sent = slot.desired;
        }
    }
}

/// 灯光引擎：背部灯 + 每个已感知方块的灯
pub struct LightEngine {
    backpack: LightBank<BACKPACK_LIGHT_COUNT>,
    /// 方块灯组，按首次感知顺序
    cubes: Vec<(ObjectId, LightBank<CUBE_LIGHT_COUNT>)>,
    last_flush: Option<Instant>,
}

impl Default for LightEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LightEngine {
    pub fn new() -> Self {
        Self {
            backpack: LightBank::default(),
            cubes: Vec::new(),
            last_flush: None,
        }
    }

    /// 设置单个背部灯位的期望值
    pub fn set_backpack_light(&mut self, index: usize, value: LightValue) -> bool {
        self.backpack.set(index, value)
    }

    /// 设置全部背部灯位的期望值
    pub fn set_backpack_lights(&mut self, values: [LightValue; BACKPACK_LIGHT_COUNT]) {
        self.backpack.set_all(values);
    }

    /// 为首次感知的方块分配灯组
    ///
    /// 幂等；方块对象的感知记录与普通对象无异，差别只在于它的
    /// 标识同时参与本层的差分。
    pub fn ensure_cube(&mut self, object_id: ObjectId) -> bool {
        if self.cubes.iter().any(|(id, _)| *id == object_id) {
            return false;
        }
        self.cubes.push((object_id, LightBank::default()));
        true
    }

    /// 设置指定方块全部灯位的期望值
    ///
    /// 返回该方块是否已有灯组（未感知过的方块是空操作）。
    pub fn set_cube_lights(
        &mut self,
        object_id: ObjectId,
        values: [LightValue; CUBE_LIGHT_COUNT],
    ) -> bool {
        match self.cubes.iter_mut().find(|(id, _)| *id == object_id) {
            Some((_, bank)) => {
                bank.set_all(values);
                true
            },
            None => false,
        }
    }

    /// 所有灯位期望值置为熄灭（配合强制 flush 用于断开前清场）
    pub fn all_off(&mut self) {
        self.backpack.set_all([LightValue::off(); BACKPACK_LIGHT_COUNT]);
        for (_, bank) in self.cubes.iter_mut() {
            bank.set_all([LightValue::off(); CUBE_LIGHT_COUNT]);
        }
    }

    /// 差分并组包
    ///
    /// 距上次 flush 不足 `interval` 且未强制时直接返回空。返回的
    /// 消息由调用方交给通道；期望值在组包的同时提交为已发送值。
    pub fn flush(
        &mut self,
        now: Instant,
        interval: Duration,
        force: bool,
    ) -> SmallVec<[ClientMessage; 4]> {
        let mut messages = SmallVec::new();

        if !force
            && let Some(last) = self.last_flush
            && now.saturating_duration_since(last) < interval
        {
            return messages;
        }
        self.last_flush = Some(now);

        if self.backpack.any_dirty() {
            messages.push(ClientMessage::SetBackpackLights {
                lights: self.backpack.desired(),
            });
            self.backpack.commit();
        }

        for (object_id, bank) in self.cubes.iter_mut() {
            if bank.any_dirty() {
                messages.push(ClientMessage::SetCubeLights {
                    object_id: *object_id,
                    lights: bank.desired(),
                });
                bank.commit();
            }
        }

        if !messages.is_empty() {
            trace!("Light flush produced {} message(s)", messages.len());
        }
        messages
    }

    pub fn reset(&mut self) {
        self.backpack = LightBank::default();
        self.cubes.clear();
        self.last_flush = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rovi_protocol::LedColor;

    const INTERVAL: Duration = Duration::from_millis(100);

    fn red() -> LightValue {
        LightValue::steady(LedColor::new(255, 0, 0))
    }

    fn green() -> LightValue {
        LightValue::steady(LedColor::new(0, 255, 0))
    }

    /// 一个窗口内 N 次修改 + flush = 恰好一条消息，内容为最终期望值
    #[test]
    fn test_batches_to_single_message() {
        let mut engine = LightEngine::new();
        let t0 = Instant::now();

        engine.set_backpack_light(0, red());
        engine.set_backpack_light(0, green());
        engine.set_backpack_light(2, red());

        let messages = engine.flush(t0, INTERVAL, false);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            ClientMessage::SetBackpackLights { lights } => {
                assert_eq!(lights[0], green()); // 只反映最终期望值
                assert_eq!(lights[1], LightValue::off());
                assert_eq!(lights[2], red());
            },
            other => panic!("unexpected message {:?}", other),
        }
    }

    /// 无差异不发送
    #[test]
    fn test_no_change_sends_nothing() {
        let mut engine = LightEngine::new();
        let t0 = Instant::now();

        engine.set_backpack_light(0, red());
        assert_eq!(engine.flush(t0, INTERVAL, false).len(), 1);

        // 同一期望值再次设置：已提交，无差异
        engine.set_backpack_light(0, red());
        let messages = engine.flush(t0 + INTERVAL, INTERVAL, false);
        assert!(messages.is_empty());
    }

    /// 限频：窗口内的第二次 flush 被抑制，窗口过后发出
    #[test]
    fn test_rate_limit_window() {
        let mut engine = LightEngine::new();
        let t0 = Instant::now();

        engine.set_backpack_light(0, red());
        assert_eq!(engine.flush(t0, INTERVAL, false).len(), 1);

        engine.set_backpack_light(0, green());
        assert!(engine.flush(t0 + Duration::from_millis(50), INTERVAL, false).is_empty());

        let messages = engine.flush(t0 + Duration::from_millis(150), INTERVAL, false);
        assert_eq!(messages.len(), 1);
    }

    /// 强制 flush 绕过限频（断开前熄灯用）
    #[test]
    fn test_force_flush_bypasses_rate_limit() {
        let mut engine = LightEngine::new();
        let t0 = Instant::now();

        engine.set_backpack_light(0, red());
        assert_eq!(engine.flush(t0, INTERVAL, false).len(), 1);

        engine.all_off();
        let messages = engine.flush(t0 + Duration::from_millis(1), INTERVAL, true);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            ClientMessage::SetBackpackLights { lights } => {
                assert!(lights.iter().all(|l| *l == LightValue::off()));
            },
            other => panic!("unexpected message {:?}", other),
        }
    }

    /// 方块灯组：每个有差异的方块各组一条消息
    #[test]
    fn test_cube_banks_flush_independently() {
        let mut engine = LightEngine::new();
        let t0 = Instant::now();

        assert!(engine.ensure_cube(ObjectId(1)));
        assert!(!engine.ensure_cube(ObjectId(1)));
        engine.ensure_cube(ObjectId(2));

        assert!(engine.set_cube_lights(ObjectId(1), [red(); CUBE_LIGHT_COUNT]));
        // 未感知过的方块：空操作
        assert!(!engine.set_cube_lights(ObjectId(9), [red(); CUBE_LIGHT_COUNT]));

        let messages = engine.flush(t0, INTERVAL, false);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            ClientMessage::SetCubeLights { object_id, lights } => {
                assert_eq!(*object_id, ObjectId(1));
                assert_eq!(lights[3], red());
            },
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_backpack_index() {
        let mut engine = LightEngine::new();
        assert!(!engine.set_backpack_light(BACKPACK_LIGHT_COUNT, red()));
    }
}
