//! 机器人 → 客户端 通知消息

use crate::flags::{GameFlags, StatusFlags};
use crate::geometry::{ObservationRect, Pose};
use crate::ids::{ActionKind, FactoryId, ObjectId, ObjectType, RobotId};

/// 周期状态消息的载荷
///
/// 机器人以固定频率广播完整遥测快照；客户端侧的影子状态整体覆盖，
/// 不做字段级增量合并。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StateUpdate {
    pub robot_id: RobotId,
    pub pose: Pose,
    /// 机身朝向角（弧度）
    pub pose_angle_rad: f32,
    /// 头部俯仰角（弧度）
    pub head_angle_rad: f32,
    /// 举升高度（毫米）
    pub lift_height_mm: f32,
    pub left_wheel_mmps: f32,
    pub right_wheel_mmps: f32,
    /// 电量（0.0 - 1.0）
    pub battery_level: f32,
    pub status: StatusFlags,
    pub game_flags: GameFlags,
    /// 当前携带的对象（线格式哨兵，见 [`ObjectId::NONE`]）
    pub carrying_object: ObjectId,
    /// 头部当前追踪的对象
    pub head_tracking_object: ObjectId,
}

impl Default for StateUpdate {
    fn default() -> Self {
        Self {
            robot_id: RobotId::default(),
            pose: Pose::identity(),
            pose_angle_rad: 0.0,
            head_angle_rad: 0.0,
            lift_height_mm: 0.0,
            left_wheel_mmps: 0.0,
            right_wheel_mmps: 0.0,
            battery_level: 0.0,
            status: StatusFlags::default(),
            game_flags: GameFlags::default(),
            carrying_object: ObjectId::NONE,
            head_tracking_object: ObjectId::NONE,
        }
    }
}

/// 机器人发来的消息（标签联合）
///
/// 会话层对该枚举做穷尽匹配：新增消息标签会成为编译期错误而不是
/// 静默丢弃。线上出现的、本客户端不认识的标签在解码阶段失败，由
/// 会话层记日志后丢弃（协议前后版本偏差是预期情况，不致命）。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RobotMessage {
    /// 握手应答
    ConnectResponse { accepted: bool, robot_id: RobotId },
    /// 周期状态快照
    State(StateUpdate),
    /// 动作完成通知（按种类 FIFO 关联）
    ActionCompleted { kind: ActionKind, success: bool },
    /// 视觉观测到对象
    ObjectObserved {
        object_id: ObjectId,
        object_type: ObjectType,
        pose: Pose,
        rect: ObservationRect,
        /// 标记是否直接可见（false 表示位置为推断值）
        markers_visible: bool,
    },
    /// 对象被挪动/位姿失信通告
    ObjectMoved { object_id: ObjectId },
    /// 对象位姿彻底未知
    ObjectPoseUnknown { object_id: ObjectId },
    /// 对象删除通告
    ObjectDeleted { object_id: ObjectId },
    /// 无线广播：发现配件（带信号强度）
    ObjectAvailable {
        factory_id: FactoryId,
        object_type: ObjectType,
        rssi: i8,
    },
    /// 无线广播：配件失联
    ObjectUnavailable { factory_id: FactoryId },
    /// 配对连接状态确认
    ObjectConnectionState {
        factory_id: FactoryId,
        object_type: ObjectType,
        /// 连接成功后分配的对象标识
        object_id: ObjectId,
        connected: bool,
    },
    /// 机器人主动关闭会话
    Goodbye,
}

impl RobotMessage {
    /// 日志用的消息标签名
    pub fn tag_name(&self) -> &'static str {
        match self {
            RobotMessage::ConnectResponse { .. } => "ConnectResponse",
            RobotMessage::State(_) => "State",
            RobotMessage::ActionCompleted { .. } => "ActionCompleted",
            RobotMessage::ObjectObserved { .. } => "ObjectObserved",
            RobotMessage::ObjectMoved { .. } => "ObjectMoved",
            RobotMessage::ObjectPoseUnknown { .. } => "ObjectPoseUnknown",
            RobotMessage::ObjectDeleted { .. } => "ObjectDeleted",
            RobotMessage::ObjectAvailable { .. } => "ObjectAvailable",
            RobotMessage::ObjectUnavailable { .. } => "ObjectUnavailable",
            RobotMessage::ObjectConnectionState { .. } => "ObjectConnectionState",
            RobotMessage::Goodbye => "Goodbye",
        }
    }
}
