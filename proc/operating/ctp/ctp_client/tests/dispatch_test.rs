//! 查询调度场景
//!
//! 直接驱动 `Dispatcher`：
//! 1. 连续三个持仓查询，只发出一个，其余等待
//! 2. 每收到一个查询的最后一段结果，下一个查询才发出
//! 3. SDK 拒绝发送时闸门仍能重新打开

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{MockTraderApi, Recorder};
use ctp_client::dispatcher::Dispatcher;
use ctp_client::spi::TraderSpiAdapter;
use ctp_client::{Request, RequestError, RequestKind, RequestPayload, ResponsePayload, TraderSpi};
use ctp_types::{InvestorPosition, QryInvestorPosition, QryOrder, QryTrade, RspInfo};

fn position_query(request_id: i32) -> Request {
    Request::new(RequestPayload::QryInvestorPosition(QryInvestorPosition::default()), request_id)
}

fn setup() -> (Dispatcher, Arc<Recorder>, MockTraderApi, TraderSpiAdapter) {
    let dispatcher = Dispatcher::new();
    let recorder = Recorder::new();
    let api = MockTraderApi::new(Arc::clone(&recorder));
    let spi = TraderSpiAdapter::new(dispatcher.responses(), 16);
    (dispatcher, recorder, api, spi)
}

#[cfg(test)]
mod one_query_in_flight {
    use super::*;

    #[test]
    fn scenario_back_to_back_position_queries() {
        // Feature: 查询准入
        // Scenario: 宿主连续发出三个持仓查询
        let (dispatcher, recorder, api, spi) = setup();
        for request_id in 1..=3 {
            dispatcher.submit(position_query(request_id));
        }

        // 第一拍发出第一个，闸门关闭
        assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryInvestorPosition));
        assert_eq!(dispatcher.gate().outstanding(), Some(RequestKind::QueryInvestorPosition));

        // 之后几拍都不发送，请求留在队列里
        assert_eq!(dispatcher.dispatch_next(&api), None);
        assert_eq!(dispatcher.dispatch_next(&api), None);
        assert_eq!(dispatcher.pending_requests(), 2);
        assert_eq!(recorder.queries(), vec![(RequestKind::QueryInvestorPosition, 1)]);

        let position = InvestorPosition {
            instrument_id: "rb2410".to_string(),
            position: 2,
            ..Default::default()
        };

        for request_id in 1..=3 {
            // 中间段不打开闸门
            spi.on_rsp_qry_investor_position(Some(&position), None, request_id, false);
            assert_eq!(dispatcher.drain(|_| {}), 1);
            assert!(!dispatcher.gate().is_open());
            assert_eq!(dispatcher.dispatch_next(&api), None);

            // 最后一段处理完，闸门打开
            spi.on_rsp_qry_investor_position(Some(&position), None, request_id, true);
            assert_eq!(dispatcher.drain(|_| {}), 1);
            assert!(dispatcher.gate().is_open());

            if request_id < 3 {
                assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryInvestorPosition));
            }
        }

        assert_eq!(
            recorder.queries(),
            vec![
                (RequestKind::QueryInvestorPosition, 1),
                (RequestKind::QueryInvestorPosition, 2),
                (RequestKind::QueryInvestorPosition, 3),
            ]
        );
        assert_eq!(dispatcher.pending_requests(), 0);
        assert_eq!(dispatcher.dispatch_next(&api), None);
    }

    #[test]
    fn scenario_mixed_queries_keep_submission_order() {
        let (dispatcher, recorder, api, spi) = setup();
        dispatcher.submit(Request::new(RequestPayload::QryOrder(QryOrder::default()), 10));
        dispatcher.submit(Request::new(RequestPayload::QryTrade(QryTrade::default()), 11));
        dispatcher.submit(position_query(12));

        assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryOrder));
        spi.on_rsp_qry_order(None, None, 10, true);
        dispatcher.drain(|_| {});

        assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryTrade));
        spi.on_rsp_qry_trade(None, None, 11, true);
        dispatcher.drain(|_| {});

        assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryInvestorPosition));

        let kinds: Vec<_> = recorder.queries().into_iter().map(|(kind, _)| kind).collect();
        assert_eq!(
            kinds,
            vec![RequestKind::QueryOrder, RequestKind::QueryTrade, RequestKind::QueryInvestorPosition]
        );
    }

    #[test]
    fn scenario_stray_terminal_response_does_not_open_gate() {
        let (dispatcher, _recorder, api, spi) = setup();
        dispatcher.submit(position_query(1));
        dispatcher.dispatch_next(&api);

        // 别的查询的结束应答
        spi.on_rsp_qry_trade(None, None, 99, true);
        dispatcher.drain(|_| {});
        assert_eq!(dispatcher.gate().outstanding(), Some(RequestKind::QueryInvestorPosition));
    }
}

#[cfg(test)]
mod send_failures {
    use super::*;

    #[test]
    fn scenario_rejected_query_reopens_gate_after_drain() {
        // Feature: 发送失败
        // Scenario: 柜台限频，查询被 SDK 拒绝
        let (dispatcher, recorder, api, _spi) = setup();
        recorder.push_query_rc(-3);
        dispatcher.submit(position_query(1));
        dispatcher.submit(position_query(2));

        assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryInvestorPosition));
        // 失败通知处理前闸门保持关闭
        assert_eq!(dispatcher.dispatch_next(&api), None);

        let mut failures = Vec::new();
        dispatcher.drain(|response| {
            if let ResponsePayload::RequestFailed { kind, error } = response.payload {
                failures.push((kind, error, response.request_id));
            }
        });

        assert_eq!(
            failures,
            vec![(
                RequestKind::QueryInvestorPosition,
                RequestError::TooFrequent {
                    request: "TraderApi::ReqQryInvestorPosition"
                },
                1
            )]
        );
        assert!(dispatcher.gate().is_open());

        // 失败的查询不会自动重发，下一个照常发出
        assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryInvestorPosition));
        assert_eq!(
            recorder.queries(),
            vec![(RequestKind::QueryInvestorPosition, 1), (RequestKind::QueryInvestorPosition, 2)]
        );
    }

    #[test]
    fn scenario_query_rejected_by_error_reply_reopens_gate() {
        // Feature: 柜台拒绝查询
        // Scenario: 交易登录完成前发出的持仓查询收到 OnRspError
        let (dispatcher, recorder, api, spi) = setup();
        dispatcher.submit(position_query(1));
        dispatcher.submit(position_query(2));
        assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryInvestorPosition));

        let info = RspInfo::new(3, "not logged in");
        spi.on_rsp_error(Some(&info), 1, true);

        let mut errors = Vec::new();
        dispatcher.drain(|response| {
            if let ResponsePayload::TdError = response.payload {
                errors.push((response.request_id, response.rsp_info.error_id));
            }
        });

        // 宿主收到错误，闸门打开，下一个查询照常发出
        assert_eq!(errors, vec![(1, 3)]);
        assert!(dispatcher.gate().is_open());
        assert_eq!(dispatcher.dispatch_next(&api), Some(RequestKind::QueryInvestorPosition));
        assert_eq!(dispatcher.pending_requests(), 0);
        assert_eq!(
            recorder.queries(),
            vec![(RequestKind::QueryInvestorPosition, 1), (RequestKind::QueryInvestorPosition, 2)]
        );
    }

    #[test]
    fn scenario_error_reply_for_other_request_keeps_gate_closed() {
        let (dispatcher, _recorder, api, spi) = setup();
        dispatcher.submit(position_query(1));
        dispatcher.dispatch_next(&api);

        // 下单等非查询请求的错误应答
        spi.on_rsp_error(Some(&RspInfo::new(22, "duplicate order ref")), 77, true);
        dispatcher.drain(|_| {});
        assert_eq!(dispatcher.gate().outstanding(), Some(RequestKind::QueryInvestorPosition));
    }

    #[test]
    fn scenario_return_codes_map_to_error_categories() {
        let (dispatcher, recorder, api, _spi) = setup();
        for rc in [-1, -2, -3, -9] {
            recorder.push_query_rc(rc);
        }
        for request_id in 1..=4 {
            dispatcher.submit(Request::new(RequestPayload::QryOrder(QryOrder::default()), request_id));
        }

        let mut errors = Vec::new();
        for _ in 0..4 {
            dispatcher.dispatch_next(&api);
            dispatcher.drain(|response| {
                if let ResponsePayload::RequestFailed { error, .. } = response.payload {
                    errors.push(error);
                }
            });
        }

        let request = "TraderApi::ReqQryOrder";
        assert_eq!(
            errors,
            vec![
                RequestError::Network { request },
                RequestError::QueueFull { request },
                RequestError::TooFrequent { request },
                RequestError::Unknown { rc: -9, request },
            ]
        );
        assert_eq!(errors.iter().filter(|e| e.is_retryable()).count(), 3);
        assert_eq!(errors[0].to_string(), "TraderApi::ReqQryOrder: send failed, network error");
    }
}

#[cfg(test)]
mod worker_thread {
    use super::*;
    use crate::common::wait_until;

    #[test]
    fn scenario_worker_dispatches_in_order_as_results_arrive() {
        let _ = tracing_subscriber::fmt::try_init();

        let dispatcher = Dispatcher::new();
        let recorder = Recorder::new();
        recorder.set_auto_reply(true);
        let api = Arc::new(MockTraderApi::new(Arc::clone(&recorder)));
        api_register_spi(&api, &dispatcher);

        for request_id in 1..=3 {
            dispatcher.submit(position_query(request_id));
        }
        dispatcher.spawn_worker(api.clone(), Duration::from_millis(2)).unwrap();

        let mut finished = Vec::new();
        let done = wait_until(Duration::from_secs(5), || {
            dispatcher.drain(|response| {
                if response.terminal_request_kind().is_some() {
                    finished.push(response.request_id);
                }
            });
            finished.len() == 3
        });

        dispatcher.shutdown();
        dispatcher.shutdown();

        assert!(done, "only {:?} finished", finished);
        assert_eq!(finished, vec![1, 2, 3]);
        assert_eq!(recorder.queries().len(), 3);
    }

    fn api_register_spi(api: &Arc<MockTraderApi>, dispatcher: &Dispatcher) {
        use ctp_client::TraderApi;
        api.register_spi(Arc::new(TraderSpiAdapter::new(dispatcher.responses(), 16)));
    }
}
