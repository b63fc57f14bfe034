//! 机械臂模式定义
//!
//! 状态反馈中的整机模式（robot mode）与单关节模式（joint mode）。
//! 数值编码与控制器实时状态包一致，未知编码统一落到 `Unknown`。

use std::fmt;

/// 整机模式
///
/// 由状态反馈设置，本库只读。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, num_enum::FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum RobotMode {
    /// 正常运行，可接受运动指令
    Running = 0,
    /// 自由驱动（手动拖拽）
    Freedrive = 1,
    /// 空闲（已上电，未运行）
    Idle = 2,
    /// 初始化中（关节需要逐个初始化）
    Initializing = 3,
    /// 安全停止
    SecurityStopped = 4,
    /// 急停
    EmergencyStopped = 5,
    /// 致命错误
    FatalError = 6,
    /// 未上电
    NoPower = 7,
    /// 未连接
    NotConnected = 8,
    /// 关机
    Shutdown = 9,
    /// 防护停止
    SafeguardStop = 10,
    /// 未知编码
    #[default]
    Unknown = -1,
}

impl RobotMode {
    /// 模式名称（用于日志和错误信息）
    pub fn as_str(self) -> &'static str {
        match self {
            RobotMode::Running => "running",
            RobotMode::Freedrive => "freedrive",
            RobotMode::Idle => "idle",
            RobotMode::Initializing => "initializing",
            RobotMode::SecurityStopped => "security_stopped",
            RobotMode::EmergencyStopped => "emergency_stopped",
            RobotMode::FatalError => "fatal_error",
            RobotMode::NoPower => "no_power",
            RobotMode::NotConnected => "not_connected",
            RobotMode::Shutdown => "shutdown",
            RobotMode::SafeguardStop => "safeguard_stop",
            RobotMode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RobotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单关节模式
///
/// 每个关节独立上报，与整机模式相关但不等同。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, num_enum::FromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(i32)]
pub enum JointMode {
    ShuttingDown = 236,
    PartDCalibration = 237,
    Backdrive = 238,
    PowerOff = 239,
    EmergencyStopped = 240,
    CalvalInitialization = 241,
    /// 关节错误
    Error = 242,
    Freedrive = 243,
    Simulated = 244,
    NotResponding = 245,
    MotorInitialisation = 246,
    AdcCalibration = 247,
    DeadCommutation = 248,
    Bootloader = 249,
    Calibration = 250,
    Stopped = 251,
    Fault = 252,
    /// 正常运行
    Running = 253,
    /// 初始化中（需要低速转动找到零位）
    Initializing = 254,
    Idle = 255,
    /// 未知编码
    #[default]
    Unknown = -1,
}

impl JointMode {
    /// 模式名称（用于日志和错误信息）
    pub fn as_str(self) -> &'static str {
        match self {
            JointMode::ShuttingDown => "shutting_down",
            JointMode::PartDCalibration => "part_d_calibration",
            JointMode::Backdrive => "backdrive",
            JointMode::PowerOff => "power_off",
            JointMode::EmergencyStopped => "emergency_stopped",
            JointMode::CalvalInitialization => "calval_initialization",
            JointMode::Error => "error",
            JointMode::Freedrive => "freedrive",
            JointMode::Simulated => "simulated",
            JointMode::NotResponding => "not_responding",
            JointMode::MotorInitialisation => "motor_initialisation",
            JointMode::AdcCalibration => "adc_calibration",
            JointMode::DeadCommutation => "dead_commutation",
            JointMode::Bootloader => "bootloader",
            JointMode::Calibration => "calibration",
            JointMode::Stopped => "stopped",
            JointMode::Fault => "fault",
            JointMode::Running => "running",
            JointMode::Initializing => "initializing",
            JointMode::Idle => "idle",
            JointMode::Unknown => "unknown",
        }
    }
}

impl fmt::Display for JointMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_mode_from_code() {
        assert_eq!(RobotMode::from(0), RobotMode::Running);
        assert_eq!(RobotMode::from(3), RobotMode::Initializing);
        assert_eq!(RobotMode::from(7), RobotMode::NoPower);
        assert_eq!(RobotMode::from(42), RobotMode::Unknown);
        assert_eq!(RobotMode::from(-5), RobotMode::Unknown);
    }

    #[test]
    fn test_joint_mode_from_code() {
        assert_eq!(JointMode::from(253), JointMode::Running);
        assert_eq!(JointMode::from(254), JointMode::Initializing);
        assert_eq!(JointMode::from(242), JointMode::Error);
        assert_eq!(JointMode::from(0), JointMode::Unknown);
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(RobotMode::Initializing.to_string(), "initializing");
        assert_eq!(RobotMode::NoPower.to_string(), "no_power");
        assert_eq!(JointMode::Running.to_string(), "running");
        assert_eq!(format!("{}", JointMode::Error), "error");
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(RobotMode::default(), RobotMode::Unknown);
        assert_eq!(JointMode::default(), JointMode::Unknown);
    }
}
