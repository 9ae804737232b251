//! 测试用 SDK 替身
//!
//! 记录所有调用，查询返回码可以按次预设。打开自动应答后，
//! 每个被接受的查询会立即在调用线程上回调一段 `is_last = true` 的空结果。

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use ctp_client::{
    CtpClient, CtpHandler, MdApi, MdSpi, RequestError, RequestKind, ResumeType, Result, SdkProvider,
    TraderApi, TraderSpi,
};
use ctp_client::bar::{M1Bar, TickBar};
use ctp_types::{
    DepthMarketData, InputOrder, InputOrderAction, QryDepthMarketData, QryInvestorPosition,
    QryInvestorPositionDetail, QryOrder, QryTrade, QryTradingAccount, ReqUserLogin, RspInfo,
    SettlementInfoConfirm,
};
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    MdRegisterFront(String),
    MdInit,
    MdLogin(ReqUserLogin),
    Subscribe(Vec<String>),
    Unsubscribe(Vec<String>),
    TdRegisterFront(String),
    SubscribePrivateTopic(ResumeType),
    SubscribePublicTopic(ResumeType),
    TdInit,
    TdLogin(ReqUserLogin),
    SettlementConfirm(SettlementInfoConfirm),
    OrderInsert(InputOrder),
    OrderAction(InputOrderAction),
    Query { kind: RequestKind, request_id: i32 },
}

#[derive(Default)]
pub struct Recorder {
    calls: Mutex<Vec<Call>>,
    query_rcs: Mutex<VecDeque<i32>>,
    login_rc: Mutex<i32>,
    auto_reply: Mutex<bool>,
    flow_paths: Mutex<Vec<PathBuf>>,
    md_spi: Mutex<Option<Arc<dyn MdSpi>>>,
    td_spi: Mutex<Option<Arc<dyn TraderSpi>>>,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn queries(&self) -> Vec<(RequestKind, i32)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                Call::Query { kind, request_id } => Some((*kind, *request_id)),
                _ => None,
            })
            .collect()
    }

    /// 下一个查询的返回码，按入栈顺序消费，用完后返回 0
    pub fn push_query_rc(&self, rc: i32) {
        self.query_rcs.lock().push_back(rc);
    }

    pub fn set_login_rc(&self, rc: i32) {
        *self.login_rc.lock() = rc;
    }

    pub fn set_auto_reply(&self, enabled: bool) {
        *self.auto_reply.lock() = enabled;
    }

    pub fn flow_paths(&self) -> Vec<PathBuf> {
        self.flow_paths.lock().clone()
    }

    pub fn md_spi(&self) -> Arc<dyn MdSpi> {
        self.md_spi.lock().clone().expect("md spi not registered")
    }

    pub fn td_spi(&self) -> Arc<dyn TraderSpi> {
        self.td_spi.lock().clone().expect("td spi not registered")
    }

    fn query(&self, kind: RequestKind, request_id: i32) -> i32 {
        self.record(Call::Query { kind, request_id });
        let rc = self.query_rcs.lock().pop_front().unwrap_or(0);
        if rc == 0 && *self.auto_reply.lock() {
            self.reply_empty(kind, request_id);
        }
        rc
    }

    fn reply_empty(&self, kind: RequestKind, request_id: i32) {
        let spi = self.td_spi();
        match kind {
            RequestKind::QueryOrder => spi.on_rsp_qry_order(None, None, request_id, true),
            RequestKind::QueryTrade => spi.on_rsp_qry_trade(None, None, request_id, true),
            RequestKind::QueryTradingAccount => spi.on_rsp_qry_trading_account(None, None, request_id, true),
            RequestKind::QueryInvestorPosition => spi.on_rsp_qry_investor_position(None, None, request_id, true),
            RequestKind::QueryInvestorPositionDetail => {
                spi.on_rsp_qry_investor_position_detail(None, None, request_id, true)
            }
            RequestKind::QueryMarketData => spi.on_rsp_qry_depth_market_data(None, None, request_id, true),
        }
    }
}

pub struct MockMdApi {
    recorder: Arc<Recorder>,
}

impl MdApi for MockMdApi {
    fn register_spi(&self, spi: Arc<dyn MdSpi>) {
        *self.recorder.md_spi.lock() = Some(spi);
    }

    fn register_front(&self, address: &str) {
        self.recorder.record(Call::MdRegisterFront(address.to_string()));
    }

    fn init(&self) {
        self.recorder.record(Call::MdInit);
    }

    fn req_user_login(&self, req: &ReqUserLogin, _request_id: i32) -> i32 {
        self.recorder.record(Call::MdLogin(req.clone()));
        *self.recorder.login_rc.lock()
    }

    fn subscribe_market_data(&self, instrument_ids: &[String]) -> i32 {
        self.recorder.record(Call::Subscribe(instrument_ids.to_vec()));
        0
    }

    fn unsubscribe_market_data(&self, instrument_ids: &[String]) -> i32 {
        self.recorder.record(Call::Unsubscribe(instrument_ids.to_vec()));
        0
    }
}

pub struct MockTraderApi {
    recorder: Arc<Recorder>,
}

impl MockTraderApi {
    pub fn new(recorder: Arc<Recorder>) -> Self {
        Self { recorder }
    }
}

impl TraderApi for MockTraderApi {
    fn register_spi(&self, spi: Arc<dyn TraderSpi>) {
        *self.recorder.td_spi.lock() = Some(spi);
    }

    fn register_front(&self, address: &str) {
        self.recorder.record(Call::TdRegisterFront(address.to_string()));
    }

    fn subscribe_private_topic(&self, resume: ResumeType) {
        self.recorder.record(Call::SubscribePrivateTopic(resume));
    }

    fn subscribe_public_topic(&self, resume: ResumeType) {
        self.recorder.record(Call::SubscribePublicTopic(resume));
    }

    fn init(&self) {
        self.recorder.record(Call::TdInit);
    }

    fn req_user_login(&self, req: &ReqUserLogin, _request_id: i32) -> i32 {
        self.recorder.record(Call::TdLogin(req.clone()));
        *self.recorder.login_rc.lock()
    }

    fn req_settlement_info_confirm(&self, req: &SettlementInfoConfirm, _request_id: i32) -> i32 {
        self.recorder.record(Call::SettlementConfirm(req.clone()));
        0
    }

    fn req_order_insert(&self, req: &InputOrder, _request_id: i32) -> i32 {
        self.recorder.record(Call::OrderInsert(req.clone()));
        0
    }

    fn req_order_action(&self, req: &InputOrderAction, _request_id: i32) -> i32 {
        self.recorder.record(Call::OrderAction(req.clone()));
        0
    }

    fn req_qry_order(&self, _req: &QryOrder, request_id: i32) -> i32 {
        self.recorder.query(RequestKind::QueryOrder, request_id)
    }

    fn req_qry_trade(&self, _req: &QryTrade, request_id: i32) -> i32 {
        self.recorder.query(RequestKind::QueryTrade, request_id)
    }

    fn req_qry_trading_account(&self, _req: &QryTradingAccount, request_id: i32) -> i32 {
        self.recorder.query(RequestKind::QueryTradingAccount, request_id)
    }

    fn req_qry_investor_position(&self, _req: &QryInvestorPosition, request_id: i32) -> i32 {
        self.recorder.query(RequestKind::QueryInvestorPosition, request_id)
    }

    fn req_qry_investor_position_detail(&self, _req: &QryInvestorPositionDetail, request_id: i32) -> i32 {
        self.recorder.query(RequestKind::QueryInvestorPositionDetail, request_id)
    }

    fn req_qry_depth_market_data(&self, _req: &QryDepthMarketData, request_id: i32) -> i32 {
        self.recorder.query(RequestKind::QueryMarketData, request_id)
    }
}

pub struct MockProvider {
    recorder: Arc<Recorder>,
}

impl MockProvider {
    pub fn new(recorder: Arc<Recorder>) -> Arc<Self> {
        Arc::new(Self { recorder })
    }
}

impl SdkProvider for MockProvider {
    fn create_md_api(&self, flow_path: &Path) -> Arc<dyn MdApi> {
        self.recorder.flow_paths.lock().push(flow_path.to_path_buf());
        Arc::new(MockMdApi {
            recorder: Arc::clone(&self.recorder),
        })
    }

    fn create_trader_api(&self, flow_path: &Path) -> Arc<dyn TraderApi> {
        self.recorder.flow_paths.lock().push(flow_path.to_path_buf());
        Arc::new(MockTraderApi::new(Arc::clone(&self.recorder)))
    }

    fn api_version(&self) -> (String, String) {
        ("mock-md 1.0".to_string(), "mock-td 1.0".to_string())
    }
}

/// 记录收到的事件，其余走默认行为
#[derive(Default)]
pub struct RecordingHandler {
    pub ticks: Vec<TickBar>,
    pub closed_bars: Vec<M1Bar>,
    pub bar_snapshots: Vec<M1Bar>,
    pub positions: Vec<(i32, bool)>,
    pub market_data: Vec<(i32, RspInfo)>,
    pub request_errors: Vec<(RequestKind, RequestError, i32)>,
    pub idle_ticks: usize,
}

impl CtpHandler for RecordingHandler {
    fn on_tick(&mut self, _client: &CtpClient, tick: &TickBar) -> Result<()> {
        self.ticks.push(tick.clone());
        Ok(())
    }

    fn on_1min(&mut self, _client: &CtpClient, bar: &M1Bar) -> Result<()> {
        self.closed_bars.push(bar.clone());
        Ok(())
    }

    fn on_1min_tick(&mut self, _client: &CtpClient, bar: &M1Bar) -> Result<()> {
        self.bar_snapshots.push(bar.clone());
        Ok(())
    }

    fn on_rsp_investor_position(
        &mut self,
        _client: &CtpClient,
        _position: Option<&ctp_types::InvestorPosition>,
        _rsp_info: &RspInfo,
        request_id: i32,
        is_last: bool,
    ) -> Result<()> {
        self.positions.push((request_id, is_last));
        Ok(())
    }

    fn on_rsp_market_data(
        &mut self,
        _client: &CtpClient,
        _data: Option<&DepthMarketData>,
        rsp_info: &RspInfo,
        request_id: i32,
        _is_last: bool,
    ) -> Result<()> {
        self.market_data.push((request_id, rsp_info.clone()));
        Ok(())
    }

    fn on_request_error(
        &mut self,
        _client: &CtpClient,
        kind: RequestKind,
        error: &RequestError,
        request_id: i32,
    ) -> Result<()> {
        self.request_errors.push((kind, error.clone(), request_id));
        Ok(())
    }

    fn on_idle(&mut self, _client: &CtpClient, _now: chrono::DateTime<chrono::Local>) -> Result<()> {
        self.idle_ticks += 1;
        Ok(())
    }
}

/// 轮询直到条件满足或超时
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

pub fn depth(instrument: &str, time: &str, price: f64, volume: i32) -> DepthMarketData {
    DepthMarketData {
        trading_day: "20240801".to_string(),
        action_day: "20240801".to_string(),
        instrument_id: instrument.to_string(),
        update_time: time.to_string(),
        last_price: price,
        volume,
        turnover: volume as f64 * price * 10.0,
        open_interest: 12000.0,
        ..Default::default()
    }
}
