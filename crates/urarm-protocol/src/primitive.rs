//! 运动基元输入
//!
//! 运动基元（motion primitive）是外部实时控制循环按自身节拍消费的离散指令：
//! 一个基元类型标签加最多 6 个通用数值槽。

/// 基元槽数量
pub const PRIMITIVE_SLOTS: usize = 6;

/// 运动基元类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, num_enum::IntoPrimitive, num_enum::FromPrimitive,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum PrimitiveKind {
    /// 无基元（控制循环保持当前状态）
    #[default]
    None = 0,
    /// 笛卡尔相机位姿：槽 1 = pan，槽 2 = 互补 tilt，槽 3 = 高度
    MoveCam = 1,
    /// 关节空间运动：槽 1-6 = 各关节目标角度
    MoveJoints = 2,
    /// 设置当前位置为 home
    SetHome = 3,
    /// 预设位置：槽 1 = [`NamedPosition`] 编码，槽 2/3 = pan/tilt（恒为 0）
    SetPosition = 4,
}

/// 预设位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, num_enum::IntoPrimitive, num_enum::TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum NamedPosition {
    /// 长颈鹿位（相机高举）
    Giraffe = 1,
    /// 原点
    Home = 2,
}

impl NamedPosition {
    /// 按名称查找，仅接受 `"giraffe"` 和 `"home"`
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "giraffe" => Some(NamedPosition::Giraffe),
            "home" => Some(NamedPosition::Home),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NamedPosition::Giraffe => "giraffe",
            NamedPosition::Home => "home",
        }
    }
}

/// 运动基元输入
///
/// 每次派发整体写入一次，由外部实时循环异步读取。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotionPrimitiveInput {
    /// 基元类型
    pub kind: PrimitiveKind,
    /// 通用数值槽（Input_1 .. Input_6）
    pub inputs: [f64; PRIMITIVE_SLOTS],
}

impl MotionPrimitiveInput {
    /// 相机位姿基元
    ///
    /// `tilt` 必须是已经做过互补换算的值。
    pub fn move_cam(pan: f64, tilt: f64, height: f64) -> Self {
        Self {
            kind: PrimitiveKind::MoveCam,
            inputs: [pan, tilt, height, 0.0, 0.0, 0.0],
        }
    }

    /// 关节空间运动基元
    pub fn move_joints(angles: [f64; PRIMITIVE_SLOTS]) -> Self {
        Self {
            kind: PrimitiveKind::MoveJoints,
            inputs: angles,
        }
    }

    /// 设置 home 基元（无数值负载）
    pub fn set_home() -> Self {
        Self {
            kind: PrimitiveKind::SetHome,
            inputs: [0.0; PRIMITIVE_SLOTS],
        }
    }

    /// 预设位置基元，pan/tilt 槽置零
    pub fn set_position(position: NamedPosition) -> Self {
        let code: u8 = position.into();
        Self {
            kind: PrimitiveKind::SetPosition,
            inputs: [f64::from(code), 0.0, 0.0, 0.0, 0.0, 0.0],
        }
    }

    /// 基元类型的数值编码（控制循环使用浮点标签）
    pub fn kind_code(&self) -> f64 {
        let code: u8 = self.kind.into();
        f64::from(code)
    }
}
