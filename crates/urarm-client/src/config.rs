//! # 派发器配置
//!
//! 启动时构建一次、只读共享的配置数据：安全包络、点动参数、自动初始化指令表、
//! 状态读取重试参数。所有重试次数和间隔都在这里，不在状态机中硬编码。
//!
//! ```toml
//! [envelope]
//! pan = { min = -45.0, max = 45.0 }
//!
//! [auto_init]
//! settle_retries = 50
//! settle_interval_ms = 10
//!
//! [status_read]
//! attempts = 3
//! interval_ms = 30
//! ```

use crate::envelope::SafetyEnvelope;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use urarm_driver::RetryPolicy;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// 派发器配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// 安全包络
    pub envelope: SafetyEnvelope,
    /// 初始化模式下单关节点动
    pub jog: JogConfig,
    /// 自动初始化序列
    pub auto_init: AutoInitConfig,
    /// 状态读取重试
    pub status_read: StatusReadConfig,
    /// 相机基元换算
    pub camera: CameraConfig,
}

impl DispatcherConfig {
    /// 从 TOML 文本解析（缺省字段使用默认值）
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 保存到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 检查配置的一致性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.envelope.is_valid() {
            return Err(ConfigError::Invalid(
                "envelope bounds must satisfy min <= max".to_string(),
            ));
        }
        if self.status_read.attempts == 0 {
            return Err(ConfigError::Invalid("status_read.attempts must be > 0".to_string()));
        }
        if self.auto_init.settle_retries == 0 {
            return Err(ConfigError::Invalid("auto_init.settle_retries must be > 0".to_string()));
        }
        if self.auto_init.max_attempts_per_joint == 0 {
            return Err(ConfigError::Invalid(
                "auto_init.max_attempts_per_joint must be > 0".to_string(),
            ));
        }
        let threshold = self.auto_init.velocity_threshold;
        if threshold.is_nan() || threshold < 0.0 {
            return Err(ConfigError::Invalid(
                "auto_init.velocity_threshold must be a non-negative number".to_string(),
            ));
        }
        for command in self.auto_init.commands() {
            if command.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "auto_init commands must not be empty".to_string(),
                ));
            }
            if !is_single_ascii_line(command) {
                return Err(ConfigError::Invalid(format!(
                    "auto_init command {:?} must be a single line of printable ASCII",
                    command
                )));
            }
        }
        Ok(())
    }
}

/// 控制器每行只接受一条 ASCII 指令
fn is_single_ascii_line(command: &str) -> bool {
    command.bytes().all(|b| b.is_ascii_graphic() || b == b' ')
}

/// 单关节点动参数（JointMove）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JogConfig {
    /// 基础速度幅值（rad/s）；关节 2 取一半，关节 0/1 取三分之一
    pub base_speed: f64,
    /// 加速度（rad/s²）
    pub acceleration: f64,
    /// 持续时间（毫秒）
    pub duration_ms: u64,
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            base_speed: 0.1,
            acceleration: 0.05,
            duration_ms: 20,
        }
    }
}

impl JogConfig {
    /// 持续时间（秒）
    pub fn duration_secs(&self) -> f64 {
        Duration::from_millis(self.duration_ms).as_secs_f64()
    }
}

/// 各关节的初始化低速指令，下标为关节编号
pub const DEFAULT_JOINT_INIT_COMMANDS: [&str; 6] = [
    "speedj_init([0.05,0,0,0,0,0],0.05,0.00666667)",
    "speedj_init([0,-0.05,0,0,0,0],0.05,0.0133333)",
    "speedj_init([0,0,0.05,0,0,0],0.05,0.02)",
    "speedj_init([0,0,0,-0.1,0,0],0.05,0.0266667)",
    "speedj_init([0,0,0,0,-0.1,0],0.05,0.0333333)",
    "speedj_init([0,0,0,0,0,-0.1],0.05,0.04)",
];

/// 取消时发出的全零低速停止指令
pub const DEFAULT_INIT_STOP_COMMAND: &str = "speedj_init([0,0,0,0,0,0],0.05,0.0133333)";

/// 自动初始化参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoInitConfig {
    /// 各关节初始化指令（下标 = 关节编号）
    pub joint_commands: [String; 6],
    /// 取消后的停止指令
    pub stop_command: String,
    /// 每条初始化指令后等待速度收敛的最大轮询次数
    pub settle_retries: u32,
    /// 两次收敛轮询之间的间隔（毫秒）
    pub settle_interval_ms: u64,
    /// 收敛阈值：|速度| <= 阈值视为停止（rad/s）
    pub velocity_threshold: f64,
    /// 单个关节最多发出的初始化指令条数
    pub max_attempts_per_joint: u32,
}

impl Default for AutoInitConfig {
    fn default() -> Self {
        Self {
            joint_commands: DEFAULT_JOINT_INIT_COMMANDS.map(str::to_string),
            stop_command: DEFAULT_INIT_STOP_COMMAND.to_string(),
            settle_retries: 50,
            settle_interval_ms: 10,
            velocity_threshold: 0.03,
            max_attempts_per_joint: 100,
        }
    }
}

impl AutoInitConfig {
    pub fn settle_interval(&self) -> Duration {
        Duration::from_millis(self.settle_interval_ms)
    }

    /// 全部指令行：各关节初始化指令，然后是停止指令
    fn commands(&self) -> impl Iterator<Item = &String> {
        self.joint_commands.iter().chain(std::iter::once(&self.stop_command))
    }
}

/// 状态读取重试参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusReadConfig {
    pub attempts: u32,
    pub interval_ms: u64,
}

impl Default for StatusReadConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            interval_ms: 30,
        }
    }
}

impl StatusReadConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts, Duration::from_millis(self.interval_ms))
    }
}

/// 相机基元换算参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// tilt 互补换算基准：写入值 = zero_tilt - tilt（度）
    pub zero_tilt: f64,
    /// 长颈鹿位的固定相机高度（米）
    pub giraffe_height: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            zero_tilt: 90.0,
            giraffe_height: 1.0,
        }
    }
}
