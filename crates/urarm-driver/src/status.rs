//! 状态反馈
//!
//! 状态快照的来源与分发：
//!
//! ```text
//! SnapshotDecoder (外部：状态包解码)
//!     ↓ StatusPoller 后台线程
//! StatusPublisher ──→ ArcSwap 最新快照（StatusWatch，无锁读取）
//!     ↓ crossbeam 有界通道（满时丢弃最旧）
//! ChannelStatusSource (StatusSource 实现，读取时排空到最新)
//!     ↓ read_status()：有界重试
//! 派发器 / 初始化序列
//! ```
//!
//! 快照总是整体替换，读取方不会看到部分更新或乱序的快照。

use crate::cancel::CancellationToken;
use crate::sleep::{RetryPolicy, Sleeper};
use crate::DriverError;
use arc_swap::ArcSwapOption;
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use std::sync::{Arc, Weak};
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{error, trace, warn};
use urarm_protocol::StatusSnapshot;

/// 状态快照来源
///
/// 拉取式接口：每次调用返回自上次调用以来最新的快照，没有新数据时返回 `None`。
/// 实现方负责排空缓冲区中更早的快照。
pub trait StatusSource {
    fn try_next(&mut self) -> Result<Option<StatusSnapshot>, DriverError>;
}

impl<S: StatusSource + ?Sized> StatusSource for &mut S {
    fn try_next(&mut self) -> Result<Option<StatusSnapshot>, DriverError> {
        (**self).try_next()
    }
}

impl<S: StatusSource + ?Sized> StatusSource for Box<S> {
    fn try_next(&mut self) -> Result<Option<StatusSnapshot>, DriverError> {
        (**self).try_next()
    }
}

/// 读取一个新的状态快照（有界重试）
///
/// 最多尝试 `policy.attempts` 次，两次尝试之间休眠 `policy.interval`。
/// 重试耗尽仍无数据时返回 [`DriverError::StatusTimeout`]，调用方不得忽略。
pub fn read_status<S, Z>(
    source: &mut S,
    policy: &RetryPolicy,
    sleeper: &Z,
) -> Result<StatusSnapshot, DriverError>
where
    S: StatusSource + ?Sized,
    Z: Sleeper + ?Sized,
{
    for attempt in 0..policy.attempts {
        if let Some(status) = source.try_next()? {
            trace!("Status received on attempt {}", attempt + 1);
            return Ok(status);
        }
        if attempt + 1 < policy.attempts {
            sleeper.sleep(policy.interval);
        }
    }

    error!("Failed to read status after {} attempts", policy.attempts);
    Err(DriverError::StatusTimeout {
        attempts: policy.attempts,
    })
}

/// 创建状态通道
///
/// `capacity` 为通道中最多缓存的快照数，满时丢弃最旧的快照。
pub fn status_channel(capacity: usize) -> (StatusPublisher, ChannelStatusSource) {
    let (tx, rx) = crossbeam_channel::bounded(capacity.max(1));
    let latest = Arc::new(ArcSwapOption::empty());
    let alive = Arc::new(());
    let publisher = StatusPublisher {
        tx,
        overflow: rx.clone(),
        source_alive: Arc::downgrade(&alive),
        latest: latest.clone(),
    };
    let source = ChannelStatusSource {
        rx,
        latest,
        _alive: alive,
    };
    (publisher, source)
}

/// 状态发布端（单写者）
#[derive(Debug, Clone)]
pub struct StatusPublisher {
    tx: Sender<StatusSnapshot>,
    /// 用于在通道满时弹出最旧的快照
    overflow: Receiver<StatusSnapshot>,
    /// 发布端自身持有接收端克隆，需要单独跟踪读取端是否存活
    source_alive: Weak<()>,
    latest: Arc<ArcSwapOption<StatusSnapshot>>,
}

impl StatusPublisher {
    /// 发布一个新快照
    ///
    /// 数值非有限的快照会被拒绝（[`DriverError::Protocol`]），不会覆盖最新快照。
    pub fn publish(&self, status: StatusSnapshot) -> Result<(), DriverError> {
        if self.source_alive.strong_count() == 0 {
            return Err(DriverError::ChannelClosed);
        }
        status.validate()?;
        self.latest.store(Some(Arc::new(status)));

        let mut pending = status;
        loop {
            match self.tx.try_send(pending) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(returned)) => {
                    // 丢弃最旧的快照，读取方只关心最新值
                    let _ = self.overflow.try_recv();
                    pending = returned;
                },
                Err(TrySendError::Disconnected(_)) => return Err(DriverError::ChannelClosed),
            }
        }
    }

    /// 获取最新快照的只读视图
    pub fn watch(&self) -> StatusWatch {
        StatusWatch {
            latest: self.latest.clone(),
        }
    }
}

/// 最新快照的无锁只读视图（监控、UI 使用）
#[derive(Debug, Clone)]
pub struct StatusWatch {
    latest: Arc<ArcSwapOption<StatusSnapshot>>,
}

impl StatusWatch {
    /// 最近一次发布的快照
    ///
    /// - 无锁读取（ArcSwap::load）
    pub fn latest(&self) -> Option<StatusSnapshot> {
        self.latest.load().as_deref().copied()
    }
}

/// 基于 crossbeam 通道的状态来源
#[derive(Debug)]
pub struct ChannelStatusSource {
    rx: Receiver<StatusSnapshot>,
    latest: Arc<ArcSwapOption<StatusSnapshot>>,
    _alive: Arc<()>,
}

impl ChannelStatusSource {
    /// 获取最新快照的只读视图
    pub fn watch(&self) -> StatusWatch {
        StatusWatch {
            latest: self.latest.clone(),
        }
    }
}

impl StatusSource for ChannelStatusSource {
    fn try_next(&mut self) -> Result<Option<StatusSnapshot>, DriverError> {
        // 排空缓冲区，只保留最新的快照
        let mut newest = None;
        loop {
            match self.rx.try_recv() {
                Ok(status) => newest = Some(status),
                Err(TryRecvError::Empty) => return Ok(newest),
                Err(TryRecvError::Disconnected) => {
                    return match newest {
                        Some(status) => Ok(Some(status)),
                        None => Err(DriverError::ChannelClosed),
                    };
                },
            }
        }
    }
}

/// 状态包解码器（外部协作方）
///
/// 从状态流中阻塞读取并解码下一个快照；流暂时无数据时返回 `None`。
pub trait SnapshotDecoder: Send {
    fn next_snapshot(&mut self) -> Result<Option<StatusSnapshot>, DriverError>;
}

impl<F> SnapshotDecoder for F
where
    F: FnMut() -> Result<Option<StatusSnapshot>, DriverError> + Send,
{
    fn next_snapshot(&mut self) -> Result<Option<StatusSnapshot>, DriverError> {
        self()
    }
}

/// 后台状态轮询线程
///
/// 持续从解码器拉取快照并发布。解码器报错或发布端通道关闭时线程退出。
/// Drop 时通知线程退出并等待其结束。
#[derive(Debug)]
pub struct StatusPoller {
    stop: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl StatusPoller {
    /// 启动轮询线程
    ///
    /// `idle_interval` 为解码器无数据时的休眠间隔。
    pub fn spawn<D>(
        mut decoder: D,
        publisher: StatusPublisher,
        idle_interval: Duration,
    ) -> Result<Self, DriverError>
    where
        D: SnapshotDecoder + 'static,
    {
        let stop = CancellationToken::new();
        let thread_stop = stop.clone();

        let handle = std::thread::Builder::new()
            .name("urarm-status".to_string())
            .spawn(move || {
                while !thread_stop.is_cancelled() {
                    match decoder.next_snapshot() {
                        Ok(Some(status)) => match publisher.publish(status) {
                            Ok(()) => {},
                            Err(DriverError::ChannelClosed) => {
                                warn!("Status channel closed, poller exiting");
                                break;
                            },
                            Err(e) => warn!("Dropping invalid status snapshot: {}", e),
                        },
                        Ok(None) => spin_sleep::sleep(idle_interval),
                        Err(e) => {
                            error!("Status decoder error: {}", e);
                            break;
                        },
                    }
                }
            })?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    /// 轮询线程是否仍在运行
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 停止轮询线程并等待其退出
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.cancel();
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            error!("Status poller thread panicked");
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleep::NoopSleeper;
    use std::cell::Cell;
    use urarm_protocol::{Joint, JointMode, RobotMode};

    fn running() -> StatusSnapshot {
        StatusSnapshot::uniform(RobotMode::Running, JointMode::Running)
    }

    struct EmptySource {
        calls: u32,
    }

    impl StatusSource for EmptySource {
        fn try_next(&mut self) -> Result<Option<StatusSnapshot>, DriverError> {
            self.calls += 1;
            Ok(None)
        }
    }

    struct CountingSleeper {
        count: Cell<u32>,
    }

    impl Sleeper for CountingSleeper {
        fn sleep(&self, _duration: Duration) {
            self.count.set(self.count.get() + 1);
        }
    }

    #[test]
    fn test_read_status_exhausts_retries() {
        let mut source = EmptySource { calls: 0 };
        let sleeper = CountingSleeper { count: Cell::new(0) };
        let policy = RetryPolicy::new(3, Duration::from_millis(30));

        let err = read_status(&mut source, &policy, &sleeper).unwrap_err();
        assert!(matches!(err, DriverError::StatusTimeout { attempts: 3 }));
        assert_eq!(source.calls, 3);
        assert_eq!(sleeper.count.get(), 2);
    }

    #[test]
    fn test_read_status_returns_first_available() {
        let (publisher, mut source) = status_channel(4);
        publisher.publish(running()).unwrap();

        let status = read_status(&mut source, &RetryPolicy::default(), &NoopSleeper).unwrap();
        assert_eq!(status.robot_mode, RobotMode::Running);
    }

    #[test]
    fn test_channel_source_drains_to_newest() {
        let (publisher, mut source) = status_channel(8);
        for i in 0..5 {
            let status = running().with_joint_velocity(Joint::Base, i as f64);
            publisher.publish(status).unwrap();
        }

        let newest = source.try_next().unwrap().unwrap();
        assert_eq!(newest.joint_velocity(Joint::Base), 4.0);
        assert!(source.try_next().unwrap().is_none());
    }

    #[test]
    fn test_publisher_drops_oldest_when_full() {
        let (publisher, mut source) = status_channel(2);
        for i in 0..10 {
            let status = running().with_joint_velocity(Joint::Elbow, i as f64);
            publisher.publish(status).unwrap();
        }

        let newest = source.try_next().unwrap().unwrap();
        assert_eq!(newest.joint_velocity(Joint::Elbow), 9.0);
    }

    #[test]
    fn test_publisher_rejects_nan() {
        let (publisher, mut source) = status_channel(2);
        let bad = running().with_joint_velocity(Joint::Wrist3, f64::NAN);

        assert!(matches!(publisher.publish(bad), Err(DriverError::Protocol(_))));
        assert!(publisher.watch().latest().is_none());
        assert!(source.try_next().unwrap().is_none());
    }

    #[test]
    fn test_watch_sees_latest() {
        let (publisher, source) = status_channel(2);
        let watch = source.watch();
        assert!(watch.latest().is_none());

        publisher.publish(running()).unwrap();
        assert_eq!(watch.latest().map(|s| s.robot_mode), Some(RobotMode::Running));
    }

    #[test]
    fn test_closed_channel() {
        let (publisher, mut source) = status_channel(2);
        drop(publisher);
        assert!(matches!(source.try_next(), Err(DriverError::ChannelClosed)));
    }

    #[test]
    fn test_publish_after_source_dropped() {
        let (publisher, source) = status_channel(2);
        drop(source);
        assert!(matches!(publisher.publish(running()), Err(DriverError::ChannelClosed)));
    }

    #[test]
    fn test_poller_publishes_decoded_snapshots() {
        let (publisher, mut source) = status_channel(16);
        let mut remaining = 3;
        let decoder = move || -> Result<Option<StatusSnapshot>, DriverError> {
            if remaining == 0 {
                return Ok(None);
            }
            remaining -= 1;
            Ok(Some(running()))
        };

        let poller = StatusPoller::spawn(decoder, publisher, Duration::from_millis(1)).unwrap();
        let policy = RetryPolicy::new(200, Duration::from_millis(5));
        let status = read_status(&mut source, &policy, &crate::sleep::SpinSleeper).unwrap();
        assert_eq!(status.robot_mode, RobotMode::Running);
        assert!(poller.is_running());
        poller.stop();
    }

    #[test]
    fn test_poller_exits_on_decoder_error() {
        let (publisher, _source) = status_channel(2);
        let decoder = || -> Result<Option<StatusSnapshot>, DriverError> {
            Err(DriverError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "stream closed",
            )))
        };

        let poller = StatusPoller::spawn(decoder, publisher, Duration::from_millis(1)).unwrap();
        for _ in 0..200 {
            if !poller.is_running() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!poller.is_running());
    }
}
