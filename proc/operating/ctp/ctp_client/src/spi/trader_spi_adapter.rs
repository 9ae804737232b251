use std::sync::Arc;

use ctp_types::{
    DepthMarketData, InputOrder, InputOrderAction, InvestorPosition, InvestorPositionDetail,
    Order, OrderAction, RspInfo, RspUserLogin, SettlementInfoConfirm, Trade, TradingAccount,
    UserLogout,
};
use rust_queue::queue::queue::Queue;
use rust_queue::queue::queue_impl::mpsc_queue::MpscQueue;

use crate::envelope::{Response, ResponsePayload};
use crate::sdk::TraderSpi;

/// 交易回调 → 应答队列
pub struct TraderSpiAdapter {
    responses: Arc<MpscQueue<Response>>,
    /// 行情快照查询无数据且无错误时补上的错误码
    missing_payload_error_id: i32,
}

impl TraderSpiAdapter {
    pub fn new(responses: Arc<MpscQueue<Response>>, missing_payload_error_id: i32) -> Self {
        Self {
            responses,
            missing_payload_error_id,
        }
    }

    fn push(&self, response: Response) {
        tracing::trace!("td callback {:?} request_id={} is_last={}", response.kind(), response.request_id, response.is_last);
        self.responses.enqueue(response);
    }
}

impl TraderSpi for TraderSpiAdapter {
    fn on_front_connected(&self) {
        self.push(Response::event(ResponsePayload::TdFrontConnected));
    }

    fn on_front_disconnected(&self, reason: i32) {
        self.push(Response::event(ResponsePayload::TdFrontDisconnected { reason }));
    }

    fn on_rsp_user_login(&self, login: Option<&RspUserLogin>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(ResponsePayload::TdUserLogin(login.cloned()), rsp_info, request_id, is_last));
    }

    fn on_rsp_user_logout(&self, logout: Option<&UserLogout>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(ResponsePayload::TdUserLogout(logout.cloned()), rsp_info, request_id, is_last));
    }

    fn on_rsp_settlement_info_confirm(
        &self,
        confirm: Option<&SettlementInfoConfirm>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    ) {
        self.push(Response::reply(
            ResponsePayload::SettlementInfoConfirm(confirm.cloned()),
            rsp_info,
            request_id,
            is_last,
        ));
    }

    fn on_rsp_order_insert(&self, order: Option<&InputOrder>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(ResponsePayload::RspOrderInsert(order.cloned()), rsp_info, request_id, is_last));
    }

    fn on_rsp_order_action(
        &self,
        action: Option<&InputOrderAction>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    ) {
        self.push(Response::reply(ResponsePayload::RspOrderAction(action.cloned()), rsp_info, request_id, is_last));
    }

    fn on_err_rtn_order_insert(&self, order: Option<&InputOrder>, rsp_info: Option<&RspInfo>) {
        let request_id = order.map_or(0, |o| o.request_id);
        self.push(Response::reply(ResponsePayload::ErrRtnOrderInsert(order.cloned()), rsp_info, request_id, true));
    }

    fn on_err_rtn_order_action(&self, action: Option<&OrderAction>, rsp_info: Option<&RspInfo>) {
        self.push(Response::reply(ResponsePayload::ErrRtnOrderAction(action.cloned()), rsp_info, 0, true));
    }

    fn on_rtn_order(&self, order: &Order) {
        let mut response = Response::event(ResponsePayload::RtnOrder(order.clone()));
        response.request_id = order.request_id;
        self.push(response);
    }

    fn on_rtn_trade(&self, trade: &Trade) {
        self.push(Response::event(ResponsePayload::RtnTrade(trade.clone())));
    }

    fn on_rsp_error(&self, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(ResponsePayload::TdError, rsp_info, request_id, is_last));
    }

    fn on_rsp_qry_order(&self, order: Option<&Order>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(ResponsePayload::RspQryOrder(order.cloned()), rsp_info, request_id, is_last));
    }

    fn on_rsp_qry_trade(&self, trade: Option<&Trade>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(ResponsePayload::RspQryTrade(trade.cloned()), rsp_info, request_id, is_last));
    }

    fn on_rsp_qry_trading_account(
        &self,
        account: Option<&TradingAccount>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    ) {
        self.push(Response::reply(
            ResponsePayload::RspQryTradingAccount(account.cloned()),
            rsp_info,
            request_id,
            is_last,
        ));
    }

    fn on_rsp_qry_investor_position(
        &self,
        position: Option<&InvestorPosition>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    ) {
        self.push(Response::reply(
            ResponsePayload::RspQryInvestorPosition(position.cloned()),
            rsp_info,
            request_id,
            is_last,
        ));
    }

    fn on_rsp_qry_investor_position_detail(
        &self,
        detail: Option<&InvestorPositionDetail>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    ) {
        self.push(Response::reply(
            ResponsePayload::RspQryInvestorPositionDetail(detail.cloned()),
            rsp_info,
            request_id,
            is_last,
        ));
    }

    fn on_rsp_qry_depth_market_data(
        &self,
        data: Option<&DepthMarketData>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    ) {
        let mut response = Response::reply(
            ResponsePayload::RspQryDepthMarketData(data.cloned()),
            rsp_info,
            request_id,
            is_last,
        );
        // 合约不存在时柜台既不给数据也不给错误码
        if data.is_none() && response.rsp_info.error_id == 0 {
            response.rsp_info.error_id = self.missing_payload_error_id;
        }
        self.push(response);
    }
}
