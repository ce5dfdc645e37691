//! 位姿与屏幕观测矩形

use nalgebra::{UnitQuaternion, Vector3};

/// 世界坐标系中的位姿
///
/// 位置单位为毫米，姿态为单位四元数。状态消息携带上一帧与当前帧
/// 两个位姿，便于上层做增量计算。
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl Pose {
    pub fn identity() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// 便捷构造：地面平面位姿（x/y 毫米 + 朝向角）
    pub fn from_ground(x_mm: f32, y_mm: f32, angle_rad: f32) -> Self {
        Self {
            position: Vector3::new(x_mm, y_mm, 0.0),
            rotation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle_rad),
        }
    }

    /// 绕 Z 轴的朝向角（弧度）
    pub fn angle_z(&self) -> f32 {
        let (_, _, yaw) = self.rotation.euler_angles();
        yaw
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// 相机画面中的观测矩形（像素坐标）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObservationRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_from_ground_angle_roundtrip() {
        let pose = Pose::from_ground(100.0, -50.0, 1.2);
        assert!((pose.angle_z() - 1.2).abs() < 1e-5);
        assert_eq!(pose.position.x, 100.0);
        assert_eq!(pose.position.y, -50.0);
    }

    #[test]
    fn test_pose_default_is_identity() {
        let pose = Pose::default();
        assert_eq!(pose.position, Vector3::zeros());
        assert!((pose.angle_z()).abs() < 1e-6);
    }
}
