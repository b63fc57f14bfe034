//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use urarm_sdk::prelude::*;
//! ```

// 客户端层（推荐使用）
pub use crate::client::{
    ArmCommand, AutoInitReport, CommandDispatcher, DispatchResult, DispatcherConfig, ErrorKind,
};

// 驱动层
pub use crate::driver::{
    CancellationToken, MotionPrimitiveSlot, StatusPoller, StatusSource, status_channel,
};

// 协议层数据
pub use crate::protocol::{Deg, Joint, JointMode, Meter, RobotMode, StatusSnapshot};

// 错误类型
pub use crate::client::{CommandError, ConfigError};
pub use crate::driver::DriverError;
pub use crate::protocol::ProtocolError;

pub use crate::init_logger;
