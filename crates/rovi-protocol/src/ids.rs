//! 标识符类型与命令种类定义

/// 机器人数字标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotId(pub u32);

/// 物理对象标识
///
/// 线格式中用保留值 `u32::MAX` 表示"无对象"。该哨兵值只允许出现在
/// 消息结构体内部；对外 API 一律通过 [`ObjectId::option`] 转成
/// `Option<ObjectId>`，哨兵不泄漏到公共契约。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(pub u32);

impl ObjectId {
    /// "无对象"哨兵（仅线格式内部使用）
    pub const NONE: ObjectId = ObjectId(u32::MAX);

    /// 是否为哨兵值
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// 转成公共 API 形式
    pub fn option(self) -> Option<ObjectId> {
        if self.is_none() { None } else { Some(self) }
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::NONE
    }
}

impl From<Option<ObjectId>> for ObjectId {
    fn from(value: Option<ObjectId>) -> Self {
        value.unwrap_or(ObjectId::NONE)
    }
}

/// 无线配件的出厂硬件标识（序列号）
///
/// 与视觉感知的 [`ObjectId`] 无关：一个方块在被摄像头看到之前就可以
/// 通过无线广播进入配对池。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FactoryId(pub String);

impl FactoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FactoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 对象大类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, num_enum::FromPrimitive, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ObjectFamily {
    #[default]
    Unknown = 0,
    /// 发光方块（参与灯光层）
    LightCube = 1,
    /// 充电座
    Charger = 2,
    /// 固定视觉标记
    FixedMarker = 3,
    /// 人脸
    Face = 4,
}

/// 对象具体型号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, num_enum::FromPrimitive, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ObjectType {
    #[default]
    Unknown = 0,
    LightCube1 = 1,
    LightCube2 = 2,
    LightCube3 = 3,
    Charger = 4,
    CustomMarker = 5,
}

impl ObjectType {
    /// 该型号所属的大类
    pub fn family(self) -> ObjectFamily {
        match self {
            ObjectType::LightCube1 | ObjectType::LightCube2 | ObjectType::LightCube3 => {
                ObjectFamily::LightCube
            },
            ObjectType::Charger => ObjectFamily::Charger,
            ObjectType::CustomMarker => ObjectFamily::FixedMarker,
            ObjectType::Unknown => ObjectFamily::Unknown,
        }
    }
}

/// 命令种类（完成通知的关联键）
///
/// 协议不为每条命令分配唯一关联 id，完成通知只携带命令种类。
/// 因此同种类的多条在途命令只能按 FIFO 顺序关联（见会话层的
/// 完成账本）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    PickUp,
    PlaceOnGround,
    PlaceOnObject,
    Roll,
    TurnInPlace,
    GotoPose,
    GotoObject,
    SetHeadAngle,
    SetLiftHeight,
    PlayAnimation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_id_sentinel() {
        assert!(ObjectId::NONE.is_none());
        assert_eq!(ObjectId::NONE.option(), None);
        assert_eq!(ObjectId(7).option(), Some(ObjectId(7)));
        assert_eq!(ObjectId::from(None), ObjectId::NONE);
        assert_eq!(ObjectId::from(Some(ObjectId(3))), ObjectId(3));
    }

    #[test]
    fn test_object_type_family() {
        assert_eq!(ObjectType::LightCube2.family(), ObjectFamily::LightCube);
        assert_eq!(ObjectType::Charger.family(), ObjectFamily::Charger);
        assert_eq!(ObjectType::Unknown.family(), ObjectFamily::Unknown);
    }

    #[test]
    fn test_object_type_from_primitive_unknown() {
        // 未知的型号值退化为 Unknown，而不是解码失败
        let ty = ObjectType::from(0xEEu8);
        assert_eq!(ty, ObjectType::Unknown);
    }
}
