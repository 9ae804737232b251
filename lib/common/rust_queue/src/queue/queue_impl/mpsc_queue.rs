use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::queue::SegQueue;

use crate::queue::queue::{DefaultQueueConfig, Queue};

/// 无界无锁队列
///
/// 基于 crossbeam 的 `SegQueue` 实现，入队只做一次 CAS，不会阻塞生产者。
/// 回调线程可以直接在 SDK 回调里入队。
pub struct MpscQueue<T> {
    inner: SegQueue<T>,
    config: DefaultQueueConfig,
    /// 是否已经发出过积压告警，回落到阈值以下后复位
    backlog_warned: AtomicBool,
}

impl<T> MpscQueue<T> {
    pub fn new() -> Self {
        Self::new_with_config(DefaultQueueConfig::default())
    }

    pub fn new_with_config(config: DefaultQueueConfig) -> Self {
        Self {
            inner: SegQueue::new(),
            config,
            backlog_warned: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    fn check_backlog(&self) {
        let warn_depth = self.config.warn_depth;
        if warn_depth == 0 {
            return;
        }

        let depth = self.inner.len();
        if depth >= warn_depth {
            if !self.backlog_warned.swap(true, Ordering::Relaxed) {
                tracing::warn!("queue {} backlog reached {} messages", self.config.name, depth);
            }
        } else if depth < warn_depth / 2 {
            self.backlog_warned.store(false, Ordering::Relaxed);
        }
    }
}

impl<T: Send> Queue<T> for MpscQueue<T> {
    fn enqueue(&self, item: T) {
        self.inner.push(item);
        self.check_backlog();
    }

    fn try_dequeue(&self) -> Option<T> {
        self.inner.pop()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> Default for MpscQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
