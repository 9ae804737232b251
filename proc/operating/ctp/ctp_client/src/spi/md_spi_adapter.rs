use std::sync::Arc;

use ctp_types::{DepthMarketData, RspInfo, RspUserLogin, SpecificInstrument, UserLogout};
use rust_queue::queue::queue::Queue;
use rust_queue::queue::queue_impl::mpsc_queue::MpscQueue;

use crate::envelope::{Response, ResponsePayload};
use crate::sdk::MdSpi;

/// 行情回调 → 应答队列
pub struct MdSpiAdapter {
    responses: Arc<MpscQueue<Response>>,
}

impl MdSpiAdapter {
    pub fn new(responses: Arc<MpscQueue<Response>>) -> Self {
        Self { responses }
    }

    fn push(&self, response: Response) {
        tracing::trace!("md callback {:?}", response.kind());
        self.responses.enqueue(response);
    }
}

impl MdSpi for MdSpiAdapter {
    fn on_front_connected(&self) {
        self.push(Response::event(ResponsePayload::MdFrontConnected));
    }

    fn on_front_disconnected(&self, reason: i32) {
        self.push(Response::event(ResponsePayload::MdFrontDisconnected { reason }));
    }

    fn on_rsp_user_login(&self, login: Option<&RspUserLogin>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(
            ResponsePayload::MdUserLogin(login.cloned()),
            rsp_info,
            request_id,
            is_last,
        ));
    }

    fn on_rsp_user_logout(&self, logout: Option<&UserLogout>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(
            ResponsePayload::MdUserLogout(logout.cloned()),
            rsp_info,
            request_id,
            is_last,
        ));
    }

    fn on_rsp_sub_market_data(
        &self,
        instrument: Option<&SpecificInstrument>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    ) {
        self.push(Response::reply(
            ResponsePayload::SubMarketData(instrument.cloned()),
            rsp_info,
            request_id,
            is_last,
        ));
    }

    fn on_rsp_unsub_market_data(
        &self,
        instrument: Option<&SpecificInstrument>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    ) {
        self.push(Response::reply(
            ResponsePayload::UnSubMarketData(instrument.cloned()),
            rsp_info,
            request_id,
            is_last,
        ));
    }

    fn on_rtn_depth_market_data(&self, data: &DepthMarketData) {
        self.push(Response::event(ResponsePayload::RtnMarketData(data.clone())));
    }

    fn on_rsp_error(&self, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) {
        self.push(Response::reply(ResponsePayload::MdError, rsp_info, request_id, is_last));
    }
}
