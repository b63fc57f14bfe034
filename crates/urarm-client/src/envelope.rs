//! 安全包络校验
//!
//! 指令参数的纯数值范围检查，无副作用。所有边界均为闭区间。
//!
//! | 字段 | 下限 | 上限 |
//! |---|---|---|
//! | pan | -45° | 45° |
//! | tilt | -90° | 90° |
//! | 相机高度 | 0.1 m | 1.0 m |
//! | 关节角度（MoveJoints） | 0° | 360° |
//! | 关节编号（JointMove） | 0 | 5 |

use crate::error::CommandError;
use serde::{Deserialize, Serialize};
use std::fmt;
use urarm_protocol::{Deg, Joint, Meter};

/// 闭区间边界
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy> Bound<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// 值是否落在闭区间内
    pub fn contains(&self, value: T) -> bool {
        value >= self.min && value <= self.max
    }

    /// 边界是否有效（min <= max）
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

/// 被校验的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeField {
    Pan,
    Tilt,
    Height,
    /// 关节角度（携带关节编号）
    JointAngle(usize),
    JointId,
}

impl EnvelopeField {
    fn unit(self) -> &'static str {
        match self {
            EnvelopeField::Pan | EnvelopeField::Tilt | EnvelopeField::JointAngle(_) => "°",
            EnvelopeField::Height => " m",
            EnvelopeField::JointId => "",
        }
    }
}

impl fmt::Display for EnvelopeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeField::Pan => f.write_str("pan angle"),
            EnvelopeField::Tilt => f.write_str("tilt angle"),
            EnvelopeField::Height => f.write_str("height"),
            EnvelopeField::JointAngle(index) => write!(f, "joint {} angle", index),
            EnvelopeField::JointId => f.write_str("joint id"),
        }
    }
}

/// 越界方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Below,
    Above,
    /// NaN 或无穷大
    NotFinite,
}

/// 包络违例
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvelopeViolation {
    pub field: EnvelopeField,
    pub side: BoundSide,
    /// 被突破的边界值
    pub limit: f64,
    /// 违例的输入值
    pub value: f64,
}

impl fmt::Display for EnvelopeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = self.field.unit();
        match self.side {
            BoundSide::Below => write!(
                f,
                "{} {}{} is below minimum limit of {}{}",
                self.field, self.value, unit, self.limit, unit
            ),
            BoundSide::Above => write!(
                f,
                "{} {}{} is above maximum limit of {}{}",
                self.field, self.value, unit, self.limit, unit
            ),
            BoundSide::NotFinite => write!(f, "{} {} is not a finite number", self.field, self.value),
        }
    }
}

impl std::error::Error for EnvelopeViolation {}

impl From<EnvelopeViolation> for CommandError {
    fn from(violation: EnvelopeViolation) -> Self {
        CommandError::InvalidInput(violation.to_string())
    }
}

/// 安全包络
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyEnvelope {
    /// pan 角度（度）
    pub pan: Bound<f64>,
    /// tilt 角度（度）
    pub tilt: Bound<f64>,
    /// 相机高度（米）
    pub height: Bound<f64>,
    /// MoveJoints 关节角度（度）
    pub joint_angle: Bound<f64>,
    /// JointMove 关节编号
    pub joint_id: Bound<u8>,
}

impl Default for SafetyEnvelope {
    fn default() -> Self {
        Self {
            pan: Bound::new(-45.0, 45.0),
            tilt: Bound::new(-90.0, 90.0),
            height: Bound::new(0.1, 1.0),
            joint_angle: Bound::new(0.0, 360.0),
            joint_id: Bound::new(0, 5),
        }
    }
}

fn check_real(
    field: EnvelopeField,
    bound: &Bound<f64>,
    value: f64,
) -> Result<(), EnvelopeViolation> {
    let violation = |side, limit| EnvelopeViolation {
        field,
        side,
        limit,
        value,
    };
    if !value.is_finite() {
        return Err(violation(BoundSide::NotFinite, f64::NAN));
    }
    if value < bound.min {
        return Err(violation(BoundSide::Below, bound.min));
    }
    if value > bound.max {
        return Err(violation(BoundSide::Above, bound.max));
    }
    Ok(())
}

impl SafetyEnvelope {
    pub fn check_pan(&self, pan: Deg) -> Result<(), EnvelopeViolation> {
        check_real(EnvelopeField::Pan, &self.pan, pan.value())
    }

    pub fn check_tilt(&self, tilt: Deg) -> Result<(), EnvelopeViolation> {
        check_real(EnvelopeField::Tilt, &self.tilt, tilt.value())
    }

    pub fn check_height(&self, height: Meter) -> Result<(), EnvelopeViolation> {
        check_real(EnvelopeField::Height, &self.height, height.value())
    }

    /// 校验 MoveJoints 的六个关节角度
    ///
    /// 下限逐个关节检查；上限只对关节 0 的角度检查，但在每个关节的迭代中都会检查一次。
    /// 因此关节 1-5 超出上限不会被拒绝。
    // TODO: confirm with the controller owners whether the upper bound should apply per joint;
    // widening it would change accepted inputs.
    pub fn check_joint_angles(&self, angles: &[Deg; 6]) -> Result<(), EnvelopeViolation> {
        let first = angles[0].value();
        for (index, angle) in angles.iter().enumerate() {
            let value = angle.value();
            let field = EnvelopeField::JointAngle(index);
            if !value.is_finite() {
                return Err(EnvelopeViolation {
                    field,
                    side: BoundSide::NotFinite,
                    limit: f64::NAN,
                    value,
                });
            }
            if value < self.joint_angle.min {
                return Err(EnvelopeViolation {
                    field,
                    side: BoundSide::Below,
                    limit: self.joint_angle.min,
                    value,
                });
            }
            if first > self.joint_angle.max {
                return Err(EnvelopeViolation {
                    field: EnvelopeField::JointAngle(0),
                    side: BoundSide::Above,
                    limit: self.joint_angle.max,
                    value: first,
                });
            }
        }
        Ok(())
    }

    /// 校验关节编号并转换为 [`Joint`]
    pub fn check_joint_id(&self, joint_id: u8) -> Result<Joint, EnvelopeViolation> {
        let violation = |side, limit: u8| EnvelopeViolation {
            field: EnvelopeField::JointId,
            side,
            limit: f64::from(limit),
            value: f64::from(joint_id),
        };
        if joint_id < self.joint_id.min {
            return Err(violation(BoundSide::Below, self.joint_id.min));
        }
        if joint_id > self.joint_id.max {
            return Err(violation(BoundSide::Above, self.joint_id.max));
        }
        Joint::try_from(joint_id).map_err(|_| violation(BoundSide::Above, 5))
    }

    /// 所有边界是否有序
    pub fn is_valid(&self) -> bool {
        self.pan.is_ordered()
            && self.tilt.is_ordered()
            && self.height.is_ordered()
            && self.joint_angle.is_ordered()
            && self.joint_id.is_ordered()
    }
}
