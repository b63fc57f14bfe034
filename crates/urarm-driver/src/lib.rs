//! 驱动层模块
//!
//! 本模块提供机械臂控制核心与外部世界之间的管道：
//! - 状态反馈（后台轮询线程、ArcSwap 无锁读取、有界重试读取）
//! - 指令输出（换行分隔的文本指令流）
//! - 运动基元槽（供外部实时控制循环读取）
//! - 协作式取消令牌
//!
//! 传输方式（TCP/串口）和状态包解码均由调用方提供。

mod cancel;
mod error;
pub mod primitive;
pub mod sink;
pub mod sleep;
pub mod status;

pub use cancel::CancellationToken;
pub use error::DriverError;
pub use primitive::MotionPrimitiveSlot;
pub use sink::CommandSink;
pub use sleep::{NoopSleeper, RetryPolicy, Sleeper, SpinSleeper};
pub use status::{
    ChannelStatusSource, SnapshotDecoder, StatusPoller, StatusPublisher, StatusSource, StatusWatch,
    read_status, status_channel,
};
