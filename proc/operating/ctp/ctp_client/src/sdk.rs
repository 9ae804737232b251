//! 柜台 SDK 边界
//!
//! SDK 本身是外部组件，这里只描述它的异步回调接口。
//! 厂商 FFI 封装或测试替身实现这些 trait 即可接入客户端。
//!
//! 所有发送类方法返回 SDK 的原始返回码，0 表示已发送，
//! 翻译见 [`crate::error::RequestError::check`]。

use std::path::Path;
use std::sync::Arc;

use ctp_types::{
    DepthMarketData, InputOrder, InputOrderAction, InvestorPosition, InvestorPositionDetail,
    Order, OrderAction, QryDepthMarketData, QryInvestorPosition, QryInvestorPositionDetail,
    QryOrder, QryTrade, QryTradingAccount, ReqUserLogin, RspInfo, RspUserLogin,
    SettlementInfoConfirm, SpecificInstrument, Trade, TradingAccount, UserLogout,
};

/// 私有流 / 公共流的重传方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeType {
    /// 从本交易日开始重传
    Restart,
    /// 从上次收到的位置续传
    Resume,
    /// 只传登录后的内容
    Quick,
}

/// 行情回调，在 SDK 自己的线程上调用
pub trait MdSpi: Send + Sync {
    fn on_front_connected(&self);

    fn on_front_disconnected(&self, reason: i32);

    fn on_rsp_user_login(&self, login: Option<&RspUserLogin>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);

    fn on_rsp_user_logout(&self, logout: Option<&UserLogout>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);

    fn on_rsp_sub_market_data(
        &self,
        instrument: Option<&SpecificInstrument>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    );

    fn on_rsp_unsub_market_data(
        &self,
        instrument: Option<&SpecificInstrument>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    );

    fn on_rtn_depth_market_data(&self, data: &DepthMarketData);

    fn on_rsp_error(&self, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);
}

/// 交易回调，在 SDK 自己的线程上调用
pub trait TraderSpi: Send + Sync {
    fn on_front_connected(&self);

    fn on_front_disconnected(&self, reason: i32);

    fn on_rsp_user_login(&self, login: Option<&RspUserLogin>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);

    fn on_rsp_user_logout(&self, logout: Option<&UserLogout>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);

    fn on_rsp_settlement_info_confirm(
        &self,
        confirm: Option<&SettlementInfoConfirm>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    );

    fn on_rsp_order_insert(&self, order: Option<&InputOrder>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);

    fn on_rsp_order_action(
        &self,
        action: Option<&InputOrderAction>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    );

    fn on_err_rtn_order_insert(&self, order: Option<&InputOrder>, rsp_info: Option<&RspInfo>);

    fn on_err_rtn_order_action(&self, action: Option<&OrderAction>, rsp_info: Option<&RspInfo>);

    fn on_rtn_order(&self, order: &Order);

    fn on_rtn_trade(&self, trade: &Trade);

    fn on_rsp_error(&self, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);

    fn on_rsp_qry_order(&self, order: Option<&Order>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);

    fn on_rsp_qry_trade(&self, trade: Option<&Trade>, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool);

    fn on_rsp_qry_trading_account(
        &self,
        account: Option<&TradingAccount>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_investor_position(
        &self,
        position: Option<&InvestorPosition>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_investor_position_detail(
        &self,
        detail: Option<&InvestorPositionDetail>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_depth_market_data(
        &self,
        data: Option<&DepthMarketData>,
        rsp_info: Option<&RspInfo>,
        request_id: i32,
        is_last: bool,
    );
}

/// 行情引擎
pub trait MdApi: Send + Sync {
    fn register_spi(&self, spi: Arc<dyn MdSpi>);

    fn register_front(&self, address: &str);

    /// 启动引擎，之后回调开始到达
    fn init(&self);

    fn req_user_login(&self, req: &ReqUserLogin, request_id: i32) -> i32;

    fn subscribe_market_data(&self, instrument_ids: &[String]) -> i32;

    fn unsubscribe_market_data(&self, instrument_ids: &[String]) -> i32;

    fn release(&self) {}
}

/// 交易引擎
pub trait TraderApi: Send + Sync {
    fn register_spi(&self, spi: Arc<dyn TraderSpi>);

    fn register_front(&self, address: &str);

    fn subscribe_private_topic(&self, resume: ResumeType);

    fn subscribe_public_topic(&self, resume: ResumeType);

    fn init(&self);

    fn req_user_login(&self, req: &ReqUserLogin, request_id: i32) -> i32;

    fn req_settlement_info_confirm(&self, req: &SettlementInfoConfirm, request_id: i32) -> i32;

    fn req_order_insert(&self, req: &InputOrder, request_id: i32) -> i32;

    fn req_order_action(&self, req: &InputOrderAction, request_id: i32) -> i32;

    fn req_qry_order(&self, req: &QryOrder, request_id: i32) -> i32;

    fn req_qry_trade(&self, req: &QryTrade, request_id: i32) -> i32;

    fn req_qry_trading_account(&self, req: &QryTradingAccount, request_id: i32) -> i32;

    fn req_qry_investor_position(&self, req: &QryInvestorPosition, request_id: i32) -> i32;

    fn req_qry_investor_position_detail(&self, req: &QryInvestorPositionDetail, request_id: i32) -> i32;

    fn req_qry_depth_market_data(&self, req: &QryDepthMarketData, request_id: i32) -> i32;

    fn release(&self) {}
}

/// 引擎工厂
pub trait SdkProvider: Send + Sync {
    /// `flow_path` 为该引擎的流文件目录，调用前已创建
    fn create_md_api(&self, flow_path: &Path) -> Arc<dyn MdApi>;

    fn create_trader_api(&self, flow_path: &Path) -> Arc<dyn TraderApi>;

    /// (行情版本, 交易版本)
    fn api_version(&self) -> (String, String);
}
