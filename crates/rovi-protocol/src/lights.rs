//! 灯光模式值
//!
//! 一个灯位的完整模式由开/关两种颜色和四段时长描述。会话层的灯光
//! 引擎按字段逐一比较期望值与上次发送值，只有出现差异才会组包发送。

/// RGB 颜色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl LedColor {
    pub const OFF: LedColor = LedColor { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// 一个灯位的模式值
///
/// `on_ms`/`off_ms` 为 0 时表示常亮于 `on_color`（无闪烁周期）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LightValue {
    pub on_color: LedColor,
    pub off_color: LedColor,
    pub on_ms: u32,
    pub off_ms: u32,
    pub transition_on_ms: u32,
    pub transition_off_ms: u32,
}

impl LightValue {
    /// 熄灭
    pub const fn off() -> Self {
        Self {
            on_color: LedColor::OFF,
            off_color: LedColor::OFF,
            on_ms: 0,
            off_ms: 0,
            transition_on_ms: 0,
            transition_off_ms: 0,
        }
    }

    /// 常亮指定颜色
    pub const fn steady(color: LedColor) -> Self {
        Self {
            on_color: color,
            off_color: color,
            on_ms: 0,
            off_ms: 0,
            transition_on_ms: 0,
            transition_off_ms: 0,
        }
    }

    /// 双色闪烁
    pub const fn blink(on: LedColor, off: LedColor, on_ms: u32, off_ms: u32) -> Self {
        Self {
            on_color: on,
            off_color: off,
            on_ms,
            off_ms,
            transition_on_ms: 0,
            transition_off_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_value_defaults_off() {
        assert_eq!(LightValue::default(), LightValue::off());
    }

    #[test]
    fn test_steady_same_on_off_color() {
        let v = LightValue::steady(LedColor::new(0, 255, 0));
        assert_eq!(v.on_color, v.off_color);
        assert_eq!(v.on_ms, 0);
    }

    #[test]
    fn test_field_wise_equality() {
        let a = LightValue::blink(LedColor::new(255, 0, 0), LedColor::OFF, 100, 100);
        let mut b = a;
        assert_eq!(a, b);
        b.off_ms = 200;
        assert_ne!(a, b);
    }
}
