//! 请求 / 应答调度
//!
//! 两条队列加一个准入闸门：
//! - 请求队列：宿主线程入队查询，工作线程按节拍取出发送
//! - 应答队列：SDK 回调线程入队，宿主线程在 `join` 里取出处理
//!
//! 工作线程只有闸门打开时才取下一个查询，闸门在宿主线程处理完
//! 该查询的最后一段应答（或柜台对该请求编号的错误应答）后才重新打开，
//! 所以任意时刻至多一个查询在途。

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use rust_queue::queue::queue::{DefaultQueueConfig, Queue};
use rust_queue::queue::queue_impl::mpsc_queue::MpscQueue;

use crate::envelope::{Request, RequestKind, RequestPayload, Response};
use crate::error::{RequestError, Result};
use crate::exit_signal::ExitSignal;
use crate::gate::AdmissionGate;
use crate::sdk::TraderApi;

// 工作线程和宿主线程共享的部分
#[derive(Clone)]
struct Shared {
    requests: Arc<MpscQueue<Request>>,
    responses: Arc<MpscQueue<Response>>,
    gate: Arc<AdmissionGate>,
}

impl Shared {
    fn dispatch_next(&self, api: &dyn TraderApi) -> Option<RequestKind> {
        if !self.gate.is_open() {
            if !self.requests.is_empty() {
                tracing::trace!(
                    "{:?} in flight, {} request(s) deferred",
                    self.gate.outstanding(),
                    self.requests.len()
                );
            }
            return None;
        }

        let request = self.requests.try_dequeue()?;
        let kind = request.kind();
        // 只有工作线程关闭闸门，刚确认过打开，这里失败说明有第二个发送方
        if !self.gate.try_close_for(kind, request.request_id) {
            panic!("admission gate closed by another sender while dispatching {}", kind);
        }

        let rc = send(api, &request);
        match RequestError::check(rc, kind.request_name()) {
            Ok(()) => tracing::debug!("dispatched {} request_id={}", kind, request.request_id),
            Err(error) => {
                tracing::warn!("{} (request_id = {})", error, request.request_id);
                // 结果流不会再来，交给宿主线程打开闸门
                self.responses
                    .enqueue(Response::request_failed(kind, error, request.request_id));
            }
        }
        Some(kind)
    }
}

fn send(api: &dyn TraderApi, request: &Request) -> i32 {
    let request_id = request.request_id;
    match &request.payload {
        RequestPayload::QryOrder(req) => api.req_qry_order(req, request_id),
        RequestPayload::QryTrade(req) => api.req_qry_trade(req, request_id),
        RequestPayload::QryTradingAccount(req) => api.req_qry_trading_account(req, request_id),
        RequestPayload::QryInvestorPosition(req) => api.req_qry_investor_position(req, request_id),
        RequestPayload::QryInvestorPositionDetail(req) => api.req_qry_investor_position_detail(req, request_id),
        RequestPayload::QryDepthMarketData(req) => api.req_qry_depth_market_data(req, request_id),
    }
}

pub struct Dispatcher {
    shared: Shared,
    exit: ExitSignal,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let requests = MpscQueue::new_with_config(DefaultQueueConfig::new().with_name("ctp-requests"));
        let responses = MpscQueue::new_with_config(DefaultQueueConfig::new().with_name("ctp-responses"));
        Self {
            shared: Shared {
                requests: Arc::new(requests),
                responses: Arc::new(responses),
                gate: Arc::new(AdmissionGate::new()),
            },
            exit: ExitSignal::new(),
            worker: Mutex::new(None),
        }
    }

    /// 查询入队，立即返回
    pub fn submit(&self, request: Request) {
        tracing::trace!("submit {} request_id={}", request.kind(), request.request_id);
        self.shared.requests.enqueue(request);
    }

    pub fn pending_requests(&self) -> usize {
        self.shared.requests.len()
    }

    /// 回调适配器往这里写
    pub fn responses(&self) -> Arc<MpscQueue<Response>> {
        Arc::clone(&self.shared.responses)
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.shared.gate
    }

    pub fn exit_signal(&self) -> &ExitSignal {
        &self.exit
    }

    /// 工作线程的一拍：闸门打开时发送一个查询
    ///
    /// 返回本拍发送的查询类型，发送失败也算发送过。
    pub fn dispatch_next(&self, api: &dyn TraderApi) -> Option<RequestKind> {
        self.shared.dispatch_next(api)
    }

    /// 启动工作线程，每 `tick` 最多发送一个查询，直到退出信号触发
    pub fn spawn_worker(&self, api: Arc<dyn TraderApi>, tick: Duration) -> Result<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            tracing::warn!("worker thread already running");
            return Ok(());
        }

        let shared = self.shared.clone();
        let exit = self.exit.clone();
        let handle = thread::Builder::new()
            .name("ctp-worker".to_string())
            .spawn(move || {
                tracing::debug!("worker thread started, tick = {:?}", tick);
                while !exit.wait_timeout(tick) {
                    shared.dispatch_next(api.as_ref());
                }
                tracing::debug!("worker thread exit");
            })?;
        *worker = Some(handle);
        Ok(())
    }

    /// 按到达顺序取出全部应答交给 `f`
    ///
    /// `f` 处理完一个查询的最后一段应答后再打开闸门，
    /// 工作线程看到闸门打开时宿主已经处理完上一个查询。
    pub fn drain<F: FnMut(Response)>(&self, mut f: F) -> usize {
        let gate = &self.shared.gate;
        self.shared.responses.drain(|response| {
            let terminal = response.terminal_request_kind().or_else(|| match gate.in_flight() {
                // 查询被柜台以错误应答拒绝
                Some((kind, request_id)) if response.is_error_for(request_id) => Some(kind),
                _ => None,
            });
            f(response);
            if let Some(kind) = terminal {
                if gate.release(kind) {
                    tracing::trace!("{} finished, gate open", kind);
                } else {
                    tracing::warn!("unexpected end of {} while {:?} in flight", kind, gate.outstanding());
                }
            }
        })
    }

    /// 等待工作线程结束，可重复调用
    pub fn join_worker(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
    }

    pub fn shutdown(&self) {
        self.exit.trigger();
        self.join_worker();
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use ctp_types::{QryInvestorPosition, QryOrder};

    use super::*;
    use crate::envelope::ResponsePayload;

    fn position_query(request_id: i32) -> Request {
        Request::new(RequestPayload::QryInvestorPosition(QryInvestorPosition::default()), request_id)
    }

    #[test]
    fn test_drain_releases_gate_after_handler() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.gate().try_close(RequestKind::QueryInvestorPosition));

        let responses = dispatcher.responses();
        responses.enqueue(Response::reply(ResponsePayload::RspQryInvestorPosition(None), None, 1, false));
        responses.enqueue(Response::reply(ResponsePayload::RspQryInvestorPosition(None), None, 1, true));

        let mut gate_open_seen = Vec::new();
        let drained = dispatcher.drain(|_| gate_open_seen.push(dispatcher.gate().is_open()));

        assert_eq!(drained, 2);
        // 处理最后一段时闸门仍关闭
        assert_eq!(gate_open_seen, vec![false, false]);
        assert!(dispatcher.gate().is_open());
    }

    #[test]
    fn test_terminal_of_other_kind_keeps_gate_closed() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.gate().try_close(RequestKind::QueryOrder));

        dispatcher
            .responses()
            .enqueue(Response::reply(ResponsePayload::RspQryTrade(None), None, 1, true));
        dispatcher.drain(|_| {});

        assert_eq!(dispatcher.gate().outstanding(), Some(RequestKind::QueryOrder));
    }

    #[test]
    fn test_error_reply_for_in_flight_request_opens_gate() {
        let dispatcher = Dispatcher::new();
        assert!(dispatcher.gate().try_close_for(RequestKind::QueryOrder, 5));

        let responses = dispatcher.responses();
        // 其他请求编号的错误应答不影响闸门
        responses.enqueue(Response::reply(ResponsePayload::TdError, None, 4, true));
        dispatcher.drain(|_| {});
        assert_eq!(dispatcher.gate().outstanding(), Some(RequestKind::QueryOrder));

        responses.enqueue(Response::reply(ResponsePayload::TdError, None, 5, true));
        dispatcher.drain(|_| {});
        assert!(dispatcher.gate().is_open());
    }

    #[test]
    fn test_submit_counts_pending() {
        let dispatcher = Dispatcher::new();
        dispatcher.submit(position_query(1));
        dispatcher.submit(Request::new(RequestPayload::QryOrder(QryOrder::default()), 2));
        assert_eq!(dispatcher.pending_requests(), 2);
    }

    #[test]
    fn test_shutdown_without_worker() {
        let dispatcher = Dispatcher::new();
        dispatcher.shutdown();
        dispatcher.shutdown();
        assert!(dispatcher.exit_signal().is_triggered());
    }
}
