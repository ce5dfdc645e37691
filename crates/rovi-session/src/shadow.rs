//! 机器人遥测影子状态
//!
//! 机器人权威遥测在客户端内存中的镜像。每个连接的机器人恰好存在
//! 一份影子；断开时整体丢弃，绝不保留部分过期字段。

use rovi_protocol::{GameFlags, ObjectId, Pose, RobotId, StateUpdate, StatusFlags};

/// 影子状态（POD 快照）
///
/// 只由会话层的消息派发路径写入；上层通过
/// [`crate::RobotSession::robot`] 读到的是仅在当前帧有效的视图。
#[derive(Debug, Clone, PartialEq)]
pub struct RobotShadow {
    pub robot_id: RobotId,
    /// 当前位姿
    pub pose: Pose,
    /// 上一帧位姿（用于增量计算）
    pub last_pose: Pose,
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
    carrying_object: ObjectId,
    head_tracking_object: ObjectId,
}

impl Default for RobotShadow {
    fn default() -> Self {
        Self {
            robot_id: RobotId::default(),
            pose: Pose::identity(),
            last_pose: Pose::identity(),
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

impl RobotShadow {
    pub fn new(robot_id: RobotId) -> Self {
        Self {
            robot_id,
            ..Self::default()
        }
    }

    /// 用一条状态消息整体覆盖影子
    pub fn apply(&mut self, update: &StateUpdate) {
        self.last_pose = self.pose;
        self.robot_id = update.robot_id;
        self.pose = update.pose;
        self.pose_angle_rad = update.pose_angle_rad;
        self.head_angle_rad = update.head_angle_rad;
        self.lift_height_mm = update.lift_height_mm;
        self.left_wheel_mmps = update.left_wheel_mmps;
        self.right_wheel_mmps = update.right_wheel_mmps;
        self.battery_level = update.battery_level;
        self.status = update.status;
        self.game_flags = update.game_flags;
        self.carrying_object = update.carrying_object;
        self.head_tracking_object = update.head_tracking_object;
    }

    /// 当前携带的对象
    ///
    /// 哨兵值在此转换，不泄漏给调用方。
    pub fn carrying_object(&self) -> Option<ObjectId> {
        self.carrying_object.option()
    }

    /// 头部当前追踪的对象
    pub fn head_tracking_object(&self) -> Option<ObjectId> {
        self.head_tracking_object.option()
    }

    pub fn is_carrying(&self) -> bool {
        self.status.is_carrying_block() || self.carrying_object().is_some()
    }
}
