//! 控制器文本指令
//!
//! 控制器接受以换行结尾的 ASCII 文本指令，每行一条，不回读应答。
//! 本模块只负责生成指令文本（不含换行符），写出由驱动层完成。
//!
//! 实数格式与控制器端脚本解析习惯一致：6 位有效数字、去掉多余的尾零，零写作 `0`。

use std::fmt;

/// 控制器指令
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerCommand {
    /// `power on` / `power off`
    Power { on: bool },
    /// `stopj([0,0,0,0,0,0])`：立即停止所有关节
    StopJoints,
    /// `set robotmode run`：松开抱闸，恢复运行模式
    SetRobotModeRun,
    /// `speedj_init([v0,..,v5],a,t)`：初始化模式下的关节速度指令
    SpeedInit {
        /// 各关节速度（rad/s）
        speeds: [f64; 6],
        /// 加速度（rad/s²）
        acceleration: f64,
        /// 持续时间（秒）
        duration: f64,
    },
    /// 预先制表的原始指令行
    Raw(String),
}

impl ControllerCommand {
    /// 单关节速度指令，其余关节速度为零
    pub fn speed_init_single(joint_index: usize, speed: f64, acceleration: f64, duration: f64) -> Self {
        let mut speeds = [0.0; 6];
        if let Some(slot) = speeds.get_mut(joint_index) {
            *slot = speed;
        }
        ControllerCommand::SpeedInit {
            speeds,
            acceleration,
            duration,
        }
    }
}

impl fmt::Display for ControllerCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerCommand::Power { on } => {
                write!(f, "power {}", if *on { "on" } else { "off" })
            },
            ControllerCommand::StopJoints => f.write_str("stopj([0,0,0,0,0,0])"),
            ControllerCommand::SetRobotModeRun => f.write_str("set robotmode run"),
            ControllerCommand::SpeedInit {
                speeds,
                acceleration,
                duration,
            } => {
                f.write_str("speedj_init([")?;
                for (i, speed) in speeds.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(&format_real(*speed))?;
                }
                write!(f, "],{},{})", format_real(*acceleration), format_real(*duration))
            },
            ControllerCommand::Raw(line) => f.write_str(line),
        }
    }
}

/// 有效数字位数
const SIGNIFICANT_DIGITS: i32 = 6;

/// 按 6 位有效数字格式化实数
///
/// ```rust
/// use urarm_protocol::format_real;
///
/// assert_eq!(format_real(0.0), "0");
/// assert_eq!(format_real(-0.1), "-0.1");
/// assert_eq!(format_real(0.1 / 3.0), "0.0333333");
/// assert_eq!(format_real(0.02), "0.02");
/// ```
pub fn format_real(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return if value.is_finite() { "0".to_string() } else { value.to_string() };
    }

    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (SIGNIFICANT_DIGITS - 1 - magnitude).max(0) as usize;
    let mut text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}
