//! 休眠抽象
//!
//! 所有轮询间隔都经由 [`Sleeper`]，生产环境使用 `spin_sleep` 获得亚毫秒精度，
//! 测试注入 [`NoopSleeper`] 之类的快速时钟。

use std::time::Duration;

/// 休眠器
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// 基于 `spin_sleep` 的精确休眠（默认）
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinSleeper;

impl Sleeper for SpinSleeper {
    #[inline]
    fn sleep(&self, duration: Duration) {
        spin_sleep::sleep(duration);
    }
}

/// 不休眠（测试用快速时钟）
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSleeper;

impl Sleeper for NoopSleeper {
    #[inline]
    fn sleep(&self, _duration: Duration) {}
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

/// 重试策略：最多尝试 `attempts` 次，两次尝试之间休眠 `interval`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl RetryPolicy {
    pub const fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(30))
    }
}
