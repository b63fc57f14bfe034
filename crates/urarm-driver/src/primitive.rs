//! 运动基元槽
//!
//! 派发器写入、外部实时控制循环按自身节拍读取的共享槽。
//! 写入方从不等待消费方；每次写入整体替换并递增序号，
//! 读取方通过序号判断是否有新的基元。

use arc_swap::ArcSwap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use urarm_protocol::MotionPrimitiveInput;

#[derive(Debug)]
struct SlotInner {
    input: ArcSwap<MotionPrimitiveInput>,
    sequence: AtomicU64,
}

/// 运动基元槽（克隆共享同一个槽）
#[derive(Debug, Clone)]
pub struct MotionPrimitiveSlot {
    inner: Arc<SlotInner>,
}

impl Default for MotionPrimitiveSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionPrimitiveSlot {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(SlotInner {
                input: ArcSwap::from_pointee(MotionPrimitiveInput::default()),
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// 覆盖写入新的基元，返回写入序号（从 1 开始）
    pub fn write(&self, input: MotionPrimitiveInput) -> u64 {
        self.inner.input.store(Arc::new(input));
        self.inner.sequence.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// 读取当前基元
    ///
    /// - 无锁读取（ArcSwap::load）
    pub fn read(&self) -> MotionPrimitiveInput {
        **self.inner.input.load()
    }

    /// 读取当前基元及其写入序号（0 表示从未写入）
    pub fn read_with_sequence(&self) -> (MotionPrimitiveInput, u64) {
        let sequence = self.inner.sequence.load(Ordering::Acquire);
        (self.read(), sequence)
    }

    /// 已写入次数
    pub fn sequence(&self) -> u64 {
        self.inner.sequence.load(Ordering::Acquire)
    }
}
