use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};

use crate::envelope::RequestKind;

const OPEN: u8 = 0;

/// 查询准入闸门
///
/// 柜台同一时刻只允许一个查询在途。闸门记录在途查询的类型：
/// - 工作线程发送查询前 `try_close`，闸门关闭
/// - 宿主线程处理完该查询的最后一段应答后 `release`，闸门重新打开
///
/// `release` 使用 Release 语义、`is_open` 使用 Acquire 语义，
/// 工作线程看到闸门打开时，上一个查询的应答一定已经处理完毕。
#[derive(Debug, Default)]
pub struct AdmissionGate {
    outstanding: AtomicU8,
    request_id: AtomicI32, // 在途查询的请求编号
}

impl AdmissionGate {
    pub fn new() -> Self {
        Self {
            outstanding: AtomicU8::new(OPEN),
            request_id: AtomicI32::new(0),
        }
    }

    pub fn is_open(&self) -> bool {
        self.outstanding.load(Ordering::Acquire) == OPEN
    }

    /// 打开 → 关闭，记录在途查询类型；闸门已关闭时返回 false
    pub fn try_close(&self, kind: RequestKind) -> bool {
        self.outstanding
            .compare_exchange(OPEN, kind.code(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// 同 [`AdmissionGate::try_close`]，并记录在途查询的请求编号
    ///
    /// 编号先于类型写入，看到类型的线程一定能读到对应编号。
    pub fn try_close_for(&self, kind: RequestKind, request_id: i32) -> bool {
        if !self.is_open() {
            return false;
        }
        self.request_id.store(request_id, Ordering::Relaxed);
        self.try_close(kind)
    }

    /// 仅当在途查询正是 `kind` 时重新打开
    pub fn release(&self, kind: RequestKind) -> bool {
        self.outstanding
            .compare_exchange(kind.code(), OPEN, Ordering::Release, Ordering::Relaxed)
            .is_ok()
    }

    /// 无条件打开
    pub fn open(&self) {
        self.outstanding.store(OPEN, Ordering::Release);
    }

    /// 当前在途查询及其请求编号
    pub fn in_flight(&self) -> Option<(RequestKind, i32)> {
        let kind = self.outstanding()?;
        Some((kind, self.request_id.load(Ordering::Relaxed)))
    }

    /// 当前在途查询
    pub fn outstanding(&self) -> Option<RequestKind> {
        match self.outstanding.load(Ordering::Acquire) {
            OPEN => None,
            code => match RequestKind::from_code(code) {
                Some(kind) => Some(kind),
                None => panic!("admission gate holds invalid request code {}", code),
            },
        }
    }
}
