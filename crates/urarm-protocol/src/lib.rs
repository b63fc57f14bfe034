//! # UR Arm Protocol
//!
//! 机械臂状态数据模型与控制器文本指令（无硬件依赖）
//!
//! ## 模块
//!
//! - `mode`: 整机模式与关节模式
//! - `joint`: 关节编号与按关节对齐的数组
//! - `units`: 角度/长度单位
//! - `status`: 状态快照
//! - `primitive`: 运动基元输入
//! - `command`: 控制器文本指令
//!
//! 状态包的二进制解码不在本 crate 范围内，由外部解码器产出 [`StatusSnapshot`]。

pub mod command;
pub mod joint;
pub mod mode;
pub mod primitive;
pub mod status;
pub mod units;

// 重新导出常用类型
pub use command::{ControllerCommand, format_real};
pub use joint::{JOINT_COUNT, Joint, JointArray};
pub use mode::{JointMode, RobotMode};
pub use primitive::{MotionPrimitiveInput, NamedPosition, PRIMITIVE_SLOTS, PrimitiveKind};
pub use status::StatusSnapshot;
pub use units::{Deg, Meter};

use thiserror::Error;

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("Invalid joint id: {id} (expected 0-5)")]
    InvalidJointId { id: u8 },

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: f64 },
}
