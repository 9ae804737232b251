use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// 一次性退出信号
///
/// 工作线程和宿主线程都在它上面做有界等待。触发后不可复位。
#[derive(Debug, Clone, Default)]
pub struct ExitSignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    triggered: Mutex<bool>,
    condvar: Condvar,
}

impl ExitSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// 触发退出，任意线程可调用，重复调用无副作用
    ///
    /// 返回本次调用是否真正触发了退出。
    pub fn trigger(&self) -> bool {
        let mut triggered = self.inner.triggered.lock();
        if *triggered {
            return false;
        }
        *triggered = true;
        self.inner.condvar.notify_all();
        true
    }

    pub fn is_triggered(&self) -> bool {
        *self.inner.triggered.lock()
    }

    /// 最多等待 `timeout`，期间触发退出则提前返回 true
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut triggered = self.inner.triggered.lock();
        if !*triggered {
            // 虚假唤醒时直接返回，调用方的循环会重新等待
            self.inner.condvar.wait_for(&mut triggered, timeout);
        }
        *triggered
    }
}
