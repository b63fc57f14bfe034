//! 客户端接口模块
//!
//! 本模块提供 UR 机械臂指令派发的核心：
//! - 安全包络校验（纯数值范围检查）
//! - 模式守卫（基于最新状态快照的谓词）
//! - 指令派发器（每个指令变体一个处理方法，穷举匹配）
//! - 关节自动初始化序列（有界重试、协作式取消）
//!
//! 状态来源、指令流和运动基元槽由 [`urarm_driver`] 提供。

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod guard;
pub mod sequencer;

// 重新导出常用类型
pub use command::ArmCommand;
pub use config::{
    AutoInitConfig, CameraConfig, ConfigError, DispatcherConfig, JogConfig, StatusReadConfig,
};
pub use dispatcher::{CommandDispatcher, jog_speed};
pub use envelope::{Bound, BoundSide, EnvelopeField, EnvelopeViolation, SafetyEnvelope};
pub use error::{CommandError, DispatchResult, ErrorKind};
pub use guard::{is_initialising, is_powered, is_running};
pub use sequencer::{AutoInitError, AutoInitReport, AutoInitSequencer};
