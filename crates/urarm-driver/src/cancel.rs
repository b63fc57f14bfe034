//! 协作式取消令牌
//!
//! 初始化序列等长时间操作在固定检查点（循环头部）轮询取消标志，
//! 从不被抢占。令牌显式传入调用方，而不是进程级全局变量，
//! 测试可以确定性地模拟取消。

use crate::DriverError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;

/// 取消令牌
///
/// 克隆后共享同一个标志，可在任意线程设置。
///
/// # 示例
///
/// ```rust
/// use urarm_driver::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
///
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    inner: Arc<AtomicBool>,
}

impl CancellationToken {
    /// 创建未取消的令牌
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置取消标志
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::Release);
    }

    /// 是否已取消
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    /// 清除取消标志（开始新的一轮操作前调用）
    pub fn reset(&self) {
        self.inner.store(false, Ordering::Release);
    }

    /// 安装 Ctrl-C 处理器，收到中断信号时设置取消标志
    ///
    /// 每个进程只能安装一次，重复安装返回 [`DriverError::Signal`]。
    pub fn install_ctrlc_handler(&self) -> Result<(), DriverError> {
        let token = self.clone();
        ctrlc::set_handler(move || {
            warn!("Interrupt received, cancelling current operation");
            token.cancel();
        })
        .map_err(|e| DriverError::Signal(e.to_string()))
    }
}
