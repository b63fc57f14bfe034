//! 驱动层错误类型定义

use thiserror::Error;
use urarm_protocol::ProtocolError;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 指令输出流 IO 错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 协议数据错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 在重试上限内未读到状态
    #[error("No status received after {attempts} attempts")]
    StatusTimeout { attempts: u32 },

    /// 状态通道已关闭（发布端退出）
    #[error("Status channel closed")]
    ChannelClosed,

    /// 信号处理器安装失败
    #[error("Signal handler error: {0}")]
    Signal(String),
}

impl DriverError {
    /// 是否为状态读取超时
    pub fn is_status_timeout(&self) -> bool {
        matches!(self, DriverError::StatusTimeout { .. })
    }
}
