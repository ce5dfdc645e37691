//! 客户端 → 机器人 命令消息
//!
//! 所有命令都是 fire-and-forget：发送后立即返回，带完成语义的命令
//! 稍后通过 [`crate::event::RobotMessage::ActionCompleted`] 按种类
//! FIFO 关联结果。

use crate::constants::{BACKPACK_LIGHT_COUNT, CUBE_LIGHT_COUNT};
use crate::geometry::Pose;
use crate::ids::{ActionKind, FactoryId, ObjectId};
use crate::lights::LightValue;

/// 客户端发出的消息（标签联合）
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClientMessage {
    /// 握手请求（advertise/connect 流程的客户端侧）
    ConnectRequest { client_version: u32 },
    /// 主动断开通告（尽力而为，机器人也可能先于通告失联）
    Disconnect,
    /// 轮速驱动（无完成通知）
    DriveWheels {
        left_mmps: f32,
        right_mmps: f32,
        left_accel_mmps2: f32,
        right_accel_mmps2: f32,
    },
    /// 原地转体
    TurnInPlace { angle_rad: f32, speed_rad_per_sec: f32 },
    /// 拾取指定对象
    PickUpObject { object_id: ObjectId },
    /// 将携带的对象放到地面
    PlaceObjectOnGround,
    /// 将携带的对象放到目标对象上
    PlaceOnObject { target_id: ObjectId },
    /// 推翻/滚动指定方块
    RollObject { object_id: ObjectId },
    /// 行驶到世界坐标位姿
    GotoPose { pose: Pose },
    /// 行驶到对象附近
    GotoObject {
        object_id: ObjectId,
        distance_mm: f32,
    },
    /// 设置头部俯仰角（物理弧度，系数换算在会话层完成）
    SetHeadAngle {
        angle_rad: f32,
        max_speed_rad_per_sec: f32,
        accel_rad_per_sec2: f32,
    },
    /// 设置举升高度（物理毫米）
    SetLiftHeight {
        height_mm: f32,
        max_speed_mm_per_sec: f32,
        accel_mm_per_sec2: f32,
    },
    /// 播放动画
    PlayAnimation { name: String, loops: u32 },
    /// 取消当前动作
    ///
    /// 不会丢弃本地的待完成回调：被取消动作的完成通知仍会以失败
    /// 形式正常到达。
    CancelAction,
    /// 背部灯批量设置（协议没有单灯粒度）
    SetBackpackLights {
        lights: [LightValue; BACKPACK_LIGHT_COUNT],
    },
    /// 方块灯批量设置
    SetCubeLights {
        object_id: ObjectId,
        lights: [LightValue; CUBE_LIGHT_COUNT],
    },
    /// 开关空闲自主行为
    SetIdleAnimationEnabled { enabled: bool },
    /// 开关方块配对池发现
    EnableBlockPool {
        enabled: bool,
        discovery_window_s: f32,
    },
    /// 配对意图：把指定出厂标识的方块连入/移出配对池
    SetObjectInPool {
        factory_id: FactoryId,
        connect: bool,
    },
}

impl ClientMessage {
    /// 该命令的完成关联种类（无完成语义的命令返回 `None`）
    pub fn action_kind(&self) -> Option<ActionKind> {
        match self {
            ClientMessage::TurnInPlace { .. } => Some(ActionKind::TurnInPlace),
            ClientMessage::PickUpObject { .. } => Some(ActionKind::PickUp),
            ClientMessage::PlaceObjectOnGround => Some(ActionKind::PlaceOnGround),
            ClientMessage::PlaceOnObject { .. } => Some(ActionKind::PlaceOnObject),
            ClientMessage::RollObject { .. } => Some(ActionKind::Roll),
            ClientMessage::GotoPose { .. } => Some(ActionKind::GotoPose),
            ClientMessage::GotoObject { .. } => Some(ActionKind::GotoObject),
            ClientMessage::SetHeadAngle { .. } => Some(ActionKind::SetHeadAngle),
            ClientMessage::SetLiftHeight { .. } => Some(ActionKind::SetLiftHeight),
            ClientMessage::PlayAnimation { .. } => Some(ActionKind::PlayAnimation),
            _ => None,
        }
    }

    /// 日志用的消息标签名
    pub fn tag_name(&self) -> &'static str {
        match self {
            ClientMessage::ConnectRequest { .. } => "ConnectRequest",
            ClientMessage::Disconnect => "Disconnect",
            ClientMessage::DriveWheels { .. } => "DriveWheels",
            ClientMessage::TurnInPlace { .. } => "TurnInPlace",
            ClientMessage::PickUpObject { .. } => "PickUpObject",
            ClientMessage::PlaceObjectOnGround => "PlaceObjectOnGround",
            ClientMessage::PlaceOnObject { .. } => "PlaceOnObject",
            ClientMessage::RollObject { .. } => "RollObject",
            ClientMessage::GotoPose { .. } => "GotoPose",
            ClientMessage::GotoObject { .. } => "GotoObject",
            ClientMessage::SetHeadAngle { .. } => "SetHeadAngle",
            ClientMessage::SetLiftHeight { .. } => "SetLiftHeight",
            ClientMessage::PlayAnimation { .. } => "PlayAnimation",
            ClientMessage::CancelAction => "CancelAction",
            ClientMessage::SetBackpackLights { .. } => "SetBackpackLights",
            ClientMessage::SetCubeLights { .. } => "SetCubeLights",
            ClientMessage::SetIdleAnimationEnabled { .. } => "SetIdleAnimationEnabled",
            ClientMessage::EnableBlockPool { .. } => "EnableBlockPool",
            ClientMessage::SetObjectInPool { .. } => "SetObjectInPool",
        }
    }
}
