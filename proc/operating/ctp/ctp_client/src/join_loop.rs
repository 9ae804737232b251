use std::time::{Duration, Instant};

use chrono::Local;

use crate::bar::BarAggregator;
use crate::client::CtpClient;
use crate::envelope::{Response, ResponsePayload};
use crate::error::Result;
use crate::handler::CtpHandler;

/// 宿主线程主循环
///
/// 每次 `poll` 取空应答队列，逐个交给处理器，然后检查是否到了空闲回调的时间。
/// K 线聚合状态只在这里读写。
pub struct JoinLoop {
    bars: BarAggregator,
    idle_interval: Duration,
    last_idle: Instant,
}

impl JoinLoop {
    pub fn new(idle_interval: Duration) -> Self {
        Self {
            bars: BarAggregator::new(),
            idle_interval,
            last_idle: Instant::now(),
        }
    }

    /// 处理当前已到达的全部应答，返回处理条数
    pub fn poll<H: CtpHandler + ?Sized>(&mut self, client: &CtpClient, handler: &mut H) -> usize {
        let bars = &mut self.bars;
        let drained = client.dispatcher().drain(|response| {
            let kind = response.kind();
            if let Err(e) = route(bars, client, handler, response) {
                tracing::error!("handler failed on {:?}: {}", kind, e);
            }
        });

        if self.last_idle.elapsed() >= self.idle_interval {
            self.last_idle = Instant::now();
            if let Err(e) = handler.on_idle(client, Local::now()) {
                tracing::error!("handler failed on idle: {}", e);
            }
        }
        drained
    }

    /// 轮询直到退出信号触发
    pub fn run<H: CtpHandler + ?Sized>(&mut self, client: &CtpClient, handler: &mut H, poll_interval: Duration) {
        let exit = client.dispatcher().exit_signal().clone();
        loop {
            self.poll(client, handler);
            if exit.wait_timeout(poll_interval) {
                break;
            }
        }
    }

    pub fn bars(&self) -> &BarAggregator {
        &self.bars
    }
}

fn route<H: CtpHandler + ?Sized>(
    bars: &mut BarAggregator,
    client: &CtpClient,
    handler: &mut H,
    response: Response,
) -> Result<()> {
    let Response {
        payload,
        rsp_info,
        request_id,
        is_last,
    } = response;

    match payload {
        ResponsePayload::MdFrontConnected => handler.on_md_front_connected(client),
        ResponsePayload::MdFrontDisconnected { reason } => handler.on_md_front_disconnected(client, reason),
        ResponsePayload::MdUserLogin(login) => handler.on_md_user_login(client, login.as_ref(), &rsp_info),
        ResponsePayload::MdUserLogout(logout) => handler.on_md_user_logout(client, logout.as_ref(), &rsp_info),
        ResponsePayload::SubMarketData(instrument) => {
            handler.on_subscribe_market_data(client, instrument.as_ref(), &rsp_info)
        }
        ResponsePayload::UnSubMarketData(instrument) => {
            handler.on_unsubscribe_market_data(client, instrument.as_ref(), &rsp_info)
        }
        ResponsePayload::RtnMarketData(data) => {
            handler.on_rtn_market_data(client, &data)?;
            let update = bars.on_market_data(&data);
            handler.on_tick(client, &update.tick)?;
            if let Some(closed) = &update.closed {
                handler.on_1min(client, closed)?;
            }
            handler.on_1min_tick(client, &update.current)
        }
        ResponsePayload::MdError => handler.on_md_error(client, &rsp_info, request_id, is_last),

        ResponsePayload::TdFrontConnected => handler.on_td_front_connected(client),
        ResponsePayload::TdFrontDisconnected { reason } => handler.on_td_front_disconnected(client, reason),
        ResponsePayload::TdUserLogin(login) => handler.on_td_user_login(client, login.as_ref(), &rsp_info),
        ResponsePayload::TdUserLogout(logout) => handler.on_td_user_logout(client, logout.as_ref(), &rsp_info),
        ResponsePayload::SettlementInfoConfirm(confirm) => {
            handler.on_settlement_info_confirm(client, confirm.as_ref(), &rsp_info)
        }
        ResponsePayload::RspOrderInsert(order) => handler.on_rsp_order_insert(client, order.as_ref(), &rsp_info),
        ResponsePayload::RspOrderAction(action) => handler.on_rsp_order_action(client, action.as_ref(), &rsp_info),
        ResponsePayload::ErrRtnOrderInsert(order) => handler.on_err_rtn_order_insert(client, order.as_ref(), &rsp_info),
        ResponsePayload::ErrRtnOrderAction(action) => {
            handler.on_err_rtn_order_action(client, action.as_ref(), &rsp_info)
        }
        ResponsePayload::RtnOrder(order) => handler.on_rtn_order(client, &order),
        ResponsePayload::RtnTrade(trade) => handler.on_rtn_trade(client, &trade),
        ResponsePayload::TdError => handler.on_td_error(client, &rsp_info, request_id, is_last),

        ResponsePayload::RspQryOrder(order) => handler.on_rsp_order(client, order.as_ref(), &rsp_info, request_id, is_last),
        ResponsePayload::RspQryTrade(trade) => handler.on_rsp_trade(client, trade.as_ref(), &rsp_info, request_id, is_last),
        ResponsePayload::RspQryTradingAccount(account) => {
            handler.on_rsp_account(client, account.as_ref(), &rsp_info, request_id, is_last)
        }
        ResponsePayload::RspQryInvestorPosition(position) => {
            handler.on_rsp_investor_position(client, position.as_ref(), &rsp_info, request_id, is_last)
        }
        ResponsePayload::RspQryInvestorPositionDetail(detail) => {
            handler.on_rsp_investor_position_detail(client, detail.as_ref(), &rsp_info, request_id, is_last)
        }
        ResponsePayload::RspQryDepthMarketData(data) => {
            handler.on_rsp_market_data(client, data.as_ref(), &rsp_info, request_id, is_last)
        }

        ResponsePayload::RequestFailed { kind, error } => handler.on_request_error(client, kind, &error, request_id),
    }
}
