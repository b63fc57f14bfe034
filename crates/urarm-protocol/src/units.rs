//! 强类型单位
//!
//! 使用 NewType 模式防止单位混淆：云台角度和关节角度使用 [`Deg`]，
//! 相机高度使用 [`Meter`]。
//!
//! ```rust
//! use urarm_protocol::{Deg, Meter};
//!
//! let tilt = Deg(30.0);
//! assert_eq!((Deg(90.0) - tilt).value(), 60.0);
//! assert!(Meter(0.5) < Meter(1.0));
//! ```

use std::fmt;
use std::ops::{Neg, Sub};

/// 角度（度）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deg(pub f64);

impl Deg {
    pub const ZERO: Self = Deg(0.0);

    #[inline]
    pub const fn new(value: f64) -> Self {
        Deg(value)
    }

    /// 获取原始值
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Deg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

impl Sub for Deg {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Deg(self.0 - rhs.0)
    }
}

impl Neg for Deg {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Deg(-self.0)
    }
}

/// 长度（米）
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter(pub f64);

impl Meter {
    #[inline]
    pub const fn new(value: f64) -> Self {
        Meter(value)
    }

    /// 获取原始值
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} m", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deg_ops() {
        assert_eq!(Deg(90.0) - Deg(-30.0), Deg(120.0));
        assert_eq!(-Deg(45.0), Deg(-45.0));
        assert!(Deg(-45.0) < Deg::ZERO);
    }

    #[test]
    fn test_display() {
        assert_eq!(Deg(45.0).to_string(), "45°");
        assert_eq!(Meter(0.1).to_string(), "0.1 m");
    }
}
