//! 机器人状态位集
//!
//! 状态消息携带两组位掩码：物理/动作状态与游戏逻辑状态。
//! 位值是线格式契约的一部分。

/// 物理/动作状态位集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusFlags(pub u32);

impl StatusFlags {
    /// 正在沿规划路径行驶
    pub const PATHING: u32 = 1 << 0;
    /// 正在播放动画
    pub const ANIMATING: u32 = 1 << 1;
    /// 正在播放空闲动画（不计入"忙"判定）
    pub const ANIMATING_IDLE: u32 = 1 << 2;
    /// 被拿起离地
    pub const PICKED_UP: u32 = 1 << 3;
    /// 举升臂上携带方块
    pub const CARRYING_BLOCK: u32 = 1 << 4;
    /// 在充电座上
    pub const ON_CHARGER: u32 = 1 << 5;
    /// 头部已到达目标角度
    pub const HEAD_IN_POSITION: u32 = 1 << 6;
    /// 举升臂已到达目标高度
    pub const LIFT_IN_POSITION: u32 = 1 << 7;

    pub fn contains(self, bits: u32) -> bool {
        self.0 & bits != 0
    }

    pub fn is_pathing(self) -> bool {
        self.contains(Self::PATHING)
    }

    pub fn is_animating(self) -> bool {
        self.contains(Self::ANIMATING)
    }

    pub fn is_animating_idle(self) -> bool {
        self.contains(Self::ANIMATING_IDLE)
    }

    pub fn is_picked_up(self) -> bool {
        self.contains(Self::PICKED_UP)
    }

    pub fn is_carrying_block(self) -> bool {
        self.contains(Self::CARRYING_BLOCK)
    }

    pub fn is_on_charger(self) -> bool {
        self.contains(Self::ON_CHARGER)
    }
}

/// 游戏/定位逻辑状态位集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameFlags(pub u32);

impl GameFlags {
    /// 已在世界坐标系中定位
    pub const LOCALIZED: u32 = 1 << 0;
    /// 游戏回合进行中
    pub const GAME_ACTIVE: u32 = 1 << 1;

    pub fn contains(self, bits: u32) -> bool {
        self.0 & bits != 0
    }

    pub fn is_localized(self) -> bool {
        self.contains(Self::LOCALIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_flags_predicates() {
        let flags = StatusFlags(StatusFlags::PATHING | StatusFlags::CARRYING_BLOCK);
        assert!(flags.is_pathing());
        assert!(flags.is_carrying_block());
        assert!(!flags.is_picked_up());
        assert!(!flags.is_animating());
    }

    #[test]
    fn test_default_is_empty() {
        let flags = StatusFlags::default();
        assert_eq!(flags.0, 0);
        assert!(!flags.is_pathing());
    }
}
