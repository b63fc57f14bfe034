//! UR Arm SDK - Universal Robots 机械臂指令派发 SDK
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 模式枚举、状态快照、运动基元、控制器文本指令
//! - **驱动层** (`driver`): 状态轮询线程、有界重试读取、指令流、取消令牌
//! - **客户端层** (`client`): 安全包络、模式守卫、指令派发器、关节自动初始化
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use std::net::TcpStream;
//! use std::sync::Arc;
//! use urarm_sdk::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! init_logger()?;
//!
//! let (publisher, source) = status_channel(16);
//! // publisher 交给状态包解码器（StatusPoller），此处省略
//! # drop(publisher);
//! let stream = TcpStream::connect("robot-arm:30002")?;
//! let mut dispatcher = CommandDispatcher::new(
//!     Arc::new(DispatcherConfig::default()),
//!     stream,
//!     source,
//!     MotionPrimitiveSlot::new(),
//! );
//!
//! let result = dispatcher.dispatch(&ArmCommand::Power { is_on: true })?;
//! println!("{}", result);
//! # Ok(())
//! # }
//! ```

pub mod logging;
pub mod prelude;

pub use urarm_client as client;
pub use urarm_driver as driver;
pub use urarm_protocol as protocol;

pub use logging::{LoggerError, init_logger, init_logger_with};

// 客户端层（普通用户使用）- 这是推荐的入口点
pub use client::{ArmCommand, CommandDispatcher, DispatchResult, DispatcherConfig, ErrorKind};
pub use driver::DriverError;
pub use protocol::ProtocolError;
