//! 请求 / 应答信封
//!
//! 请求信封只承载查询类请求，由宿主线程入队、工作线程发送。
//! 应答信封承载 SDK 的全部回调事件，由回调线程入队、宿主线程消费。
//! 信封里的 SDK 数据都是回调当时拷贝出来的快照，SDK 回调返回后其缓冲区会被复用。

use std::fmt;

use ctp_types::{
    DepthMarketData, InputOrder, InputOrderAction, InvestorPosition, InvestorPositionDetail,
    Order, OrderAction, QryDepthMarketData, QryInvestorPosition, QryInvestorPositionDetail,
    QryOrder, QryTrade, QryTradingAccount, RspInfo, RspUserLogin, SettlementInfoConfirm,
    SpecificInstrument, Trade, TradingAccount, UserLogout,
};

use crate::error::RequestError;

/// 查询请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RequestKind {
    QueryOrder = 1,
    QueryTrade = 2,
    QueryTradingAccount = 3,
    QueryInvestorPosition = 4,
    QueryInvestorPositionDetail = 5,
    QueryMarketData = 6,
}

impl RequestKind {
    pub const ALL: [RequestKind; 6] = [
        RequestKind::QueryOrder,
        RequestKind::QueryTrade,
        RequestKind::QueryTradingAccount,
        RequestKind::QueryInvestorPosition,
        RequestKind::QueryInvestorPositionDetail,
        RequestKind::QueryMarketData,
    ];

    /// 非零编码，0 留给准入闸门表示空闲
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(RequestKind::QueryOrder),
            2 => Some(RequestKind::QueryTrade),
            3 => Some(RequestKind::QueryTradingAccount),
            4 => Some(RequestKind::QueryInvestorPosition),
            5 => Some(RequestKind::QueryInvestorPositionDetail),
            6 => Some(RequestKind::QueryMarketData),
            _ => None,
        }
    }

    /// SDK 方法名，用于错误信息
    pub fn request_name(self) -> &'static str {
        match self {
            RequestKind::QueryOrder => "TraderApi::ReqQryOrder",
            RequestKind::QueryTrade => "TraderApi::ReqQryTrade",
            RequestKind::QueryTradingAccount => "TraderApi::ReqQryTradingAccount",
            RequestKind::QueryInvestorPosition => "TraderApi::ReqQryInvestorPosition",
            RequestKind::QueryInvestorPositionDetail => "TraderApi::ReqQryInvestorPositionDetail",
            RequestKind::QueryMarketData => "TraderApi::ReqQryDepthMarketData",
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.request_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestPayload {
    QryOrder(QryOrder),
    QryTrade(QryTrade),
    QryTradingAccount(QryTradingAccount),
    QryInvestorPosition(QryInvestorPosition),
    QryInvestorPositionDetail(QryInvestorPositionDetail),
    QryDepthMarketData(QryDepthMarketData),
}

/// 查询请求信封
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub payload: RequestPayload,
    /// 宿主指定的请求号，应答中原样带回
    pub request_id: i32,
}

impl Request {
    pub fn new(payload: RequestPayload, request_id: i32) -> Self {
        Self { payload, request_id }
    }

    pub fn kind(&self) -> RequestKind {
        match self.payload {
            RequestPayload::QryOrder(_) => RequestKind::QueryOrder,
            RequestPayload::QryTrade(_) => RequestKind::QueryTrade,
            RequestPayload::QryTradingAccount(_) => RequestKind::QueryTradingAccount,
            RequestPayload::QryInvestorPosition(_) => RequestKind::QueryInvestorPosition,
            RequestPayload::QryInvestorPositionDetail(_) => RequestKind::QueryInvestorPositionDetail,
            RequestPayload::QryDepthMarketData(_) => RequestKind::QueryMarketData,
        }
    }
}

/// 回调事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    MdFrontConnected,
    MdFrontDisconnected,
    MdUserLogin,
    MdUserLogout,
    SubMarketData,
    UnSubMarketData,
    RtnMarketData,
    MdError,

    TdFrontConnected,
    TdFrontDisconnected,
    TdUserLogin,
    TdUserLogout,
    SettlementInfoConfirm,
    RspOrderInsert,
    RspOrderAction,
    ErrRtnOrderInsert,
    ErrRtnOrderAction,
    RtnOrder,
    RtnTrade,
    TdError,
    RspQryOrder,
    RspQryTrade,
    RspQryTradingAccount,
    RspQryInvestorPosition,
    RspQryInvestorPositionDetail,
    RspQryDepthMarketData,

    /// 工作线程发送查询失败
    RequestFailed,
}

impl ResponseKind {
    /// 查询结果流对应的请求类型
    pub fn query_kind(self) -> Option<RequestKind> {
        match self {
            ResponseKind::RspQryOrder => Some(RequestKind::QueryOrder),
            ResponseKind::RspQryTrade => Some(RequestKind::QueryTrade),
            ResponseKind::RspQryTradingAccount => Some(RequestKind::QueryTradingAccount),
            ResponseKind::RspQryInvestorPosition => Some(RequestKind::QueryInvestorPosition),
            ResponseKind::RspQryInvestorPositionDetail => Some(RequestKind::QueryInvestorPositionDetail),
            ResponseKind::RspQryDepthMarketData => Some(RequestKind::QueryMarketData),
            _ => None,
        }
    }
}

/// 回调数据快照，每个类型只有一种数据
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePayload {
    MdFrontConnected,
    MdFrontDisconnected { reason: i32 },
    MdUserLogin(Option<RspUserLogin>),
    MdUserLogout(Option<UserLogout>),
    SubMarketData(Option<SpecificInstrument>),
    UnSubMarketData(Option<SpecificInstrument>),
    RtnMarketData(DepthMarketData),
    MdError,

    TdFrontConnected,
    TdFrontDisconnected { reason: i32 },
    TdUserLogin(Option<RspUserLogin>),
    TdUserLogout(Option<UserLogout>),
    SettlementInfoConfirm(Option<SettlementInfoConfirm>),
    RspOrderInsert(Option<InputOrder>),
    RspOrderAction(Option<InputOrderAction>),
    ErrRtnOrderInsert(Option<InputOrder>),
    ErrRtnOrderAction(Option<OrderAction>),
    RtnOrder(Order),
    RtnTrade(Trade),
    TdError,
    RspQryOrder(Option<Order>),
    RspQryTrade(Option<Trade>),
    RspQryTradingAccount(Option<TradingAccount>),
    RspQryInvestorPosition(Option<InvestorPosition>),
    RspQryInvestorPositionDetail(Option<InvestorPositionDetail>),
    RspQryDepthMarketData(Option<DepthMarketData>),

    RequestFailed { kind: RequestKind, error: RequestError },
}

/// 应答信封
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub payload: ResponsePayload,
    /// 始终存在，`error_id == 0` 表示没有错误
    pub rsp_info: RspInfo,
    pub request_id: i32,
    /// 多段查询结果的最后一段
    pub is_last: bool,
}

impl Response {
    /// 不带应答信息的推送事件
    pub fn event(payload: ResponsePayload) -> Self {
        Self {
            payload,
            rsp_info: RspInfo::default(),
            request_id: 0,
            is_last: true,
        }
    }

    /// 请求的应答，拷贝 SDK 传入的应答信息
    pub fn reply(payload: ResponsePayload, rsp_info: Option<&RspInfo>, request_id: i32, is_last: bool) -> Self {
        Self {
            payload,
            rsp_info: rsp_info.cloned().unwrap_or_default(),
            request_id,
            is_last,
        }
    }

    /// 查询在工作线程发送失败，结果流不会再到达
    pub fn request_failed(kind: RequestKind, error: RequestError, request_id: i32) -> Self {
        let rsp_info = RspInfo::new(error.rc(), error.to_string());
        Self {
            payload: ResponsePayload::RequestFailed { kind, error },
            rsp_info,
            request_id,
            is_last: true,
        }
    }

    pub fn kind(&self) -> ResponseKind {
        match &self.payload {
            ResponsePayload::MdFrontConnected => ResponseKind::MdFrontConnected,
            ResponsePayload::MdFrontDisconnected { .. } => ResponseKind::MdFrontDisconnected,
            ResponsePayload::MdUserLogin(_) => ResponseKind::MdUserLogin,
            ResponsePayload::MdUserLogout(_) => ResponseKind::MdUserLogout,
            ResponsePayload::SubMarketData(_) => ResponseKind::SubMarketData,
            ResponsePayload::UnSubMarketData(_) => ResponseKind::UnSubMarketData,
            ResponsePayload::RtnMarketData(_) => ResponseKind::RtnMarketData,
            ResponsePayload::MdError => ResponseKind::MdError,
            ResponsePayload::TdFrontConnected => ResponseKind::TdFrontConnected,
            ResponsePayload::TdFrontDisconnected { .. } => ResponseKind::TdFrontDisconnected,
            ResponsePayload::TdUserLogin(_) => ResponseKind::TdUserLogin,
            ResponsePayload::TdUserLogout(_) => ResponseKind::TdUserLogout,
            ResponsePayload::SettlementInfoConfirm(_) => ResponseKind::SettlementInfoConfirm,
            ResponsePayload::RspOrderInsert(_) => ResponseKind::RspOrderInsert,
            ResponsePayload::RspOrderAction(_) => ResponseKind::RspOrderAction,
            ResponsePayload::ErrRtnOrderInsert(_) => ResponseKind::ErrRtnOrderInsert,
            ResponsePayload::ErrRtnOrderAction(_) => ResponseKind::ErrRtnOrderAction,
            ResponsePayload::RtnOrder(_) => ResponseKind::RtnOrder,
            ResponsePayload::RtnTrade(_) => ResponseKind::RtnTrade,
            ResponsePayload::TdError => ResponseKind::TdError,
            ResponsePayload::RspQryOrder(_) => ResponseKind::RspQryOrder,
            ResponsePayload::RspQryTrade(_) => ResponseKind::RspQryTrade,
            ResponsePayload::RspQryTradingAccount(_) => ResponseKind::RspQryTradingAccount,
            ResponsePayload::RspQryInvestorPosition(_) => ResponseKind::RspQryInvestorPosition,
            ResponsePayload::RspQryInvestorPositionDetail(_) => ResponseKind::RspQryInvestorPositionDetail,
            ResponsePayload::RspQryDepthMarketData(_) => ResponseKind::RspQryDepthMarketData,
            ResponsePayload::RequestFailed { .. } => ResponseKind::RequestFailed,
        }
    }

    /// 若该应答结束了某类查询，返回该查询类型
    ///
    /// 查询结果流的最后一段，或者发送失败的通知，都会结束对应查询。
    pub fn terminal_request_kind(&self) -> Option<RequestKind> {
        match &self.payload {
            ResponsePayload::RequestFailed { kind, .. } => Some(*kind),
            _ if self.is_last => self.kind().query_kind(),
            _ => None,
        }
    }

    /// 是否为 `request_id` 对应查询的错误应答
    ///
    /// 柜台用 OnRspError 拒绝查询时不会再有结果流，这一条就是该查询的结束。
    pub fn is_error_for(&self, request_id: i32) -> bool {
        matches!(self.payload, ResponsePayload::TdError) && self.is_last && self.request_id == request_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_kind_codes_roundtrip() {
        for kind in RequestKind::ALL {
            assert_ne!(kind.code(), 0);
            assert_eq!(RequestKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(RequestKind::from_code(0), None);
        assert_eq!(RequestKind::from_code(7), None);
    }

    #[test]
    fn test_request_kind_from_payload() {
        let request = Request::new(RequestPayload::QryInvestorPosition(QryInvestorPosition::default()), 7);
        assert_eq!(request.kind(), RequestKind::QueryInvestorPosition);
        assert_eq!(request.request_id, 7);
    }

    #[test]
    fn test_terminal_only_on_last_query_segment() {
        let partial = Response::reply(ResponsePayload::RspQryOrder(Some(Order::default())), None, 1, false);
        assert_eq!(partial.terminal_request_kind(), None);

        let last = Response::reply(ResponsePayload::RspQryOrder(None), None, 1, true);
        assert_eq!(last.terminal_request_kind(), Some(RequestKind::QueryOrder));

        // 非查询类应答即使 is_last 也不结束查询
        let login = Response::reply(ResponsePayload::TdUserLogin(None), None, 0, true);
        assert_eq!(login.terminal_request_kind(), None);
    }

    #[test]
    fn test_request_failed_carries_error() {
        let error = RequestError::TooFrequent { request: RequestKind::QueryTrade.request_name() };
        let response = Response::request_failed(RequestKind::QueryTrade, error.clone(), 3);

        assert_eq!(response.kind(), ResponseKind::RequestFailed);
        assert_eq!(response.rsp_info.error_id, -3);
        assert_eq!(response.terminal_request_kind(), Some(RequestKind::QueryTrade));
        assert!(matches!(response.payload, ResponsePayload::RequestFailed { error: e, .. } if e == error));
    }

    #[test]
    fn test_error_reply_matches_request_id() {
        let info = RspInfo::new(3, "not logged in");
        let error = Response::reply(ResponsePayload::TdError, Some(&info), 8, true);
        assert!(error.is_error_for(8));
        assert!(!error.is_error_for(9));
        assert_eq!(error.terminal_request_kind(), None);

        let partial = Response::reply(ResponsePayload::TdError, Some(&info), 8, false);
        assert!(!partial.is_error_for(8));
        let md_error = Response::reply(ResponsePayload::MdError, Some(&info), 8, true);
        assert!(!md_error.is_error_for(8));
    }

    #[test]
    fn test_reply_copies_rsp_info() {
        let info = RspInfo::new(3, "invalid login");
        let response = Response::reply(ResponsePayload::MdUserLogin(None), Some(&info), 0, true);
        assert_eq!(response.rsp_info, info);

        let event = Response::event(ResponsePayload::MdFrontConnected);
        assert!(!event.rsp_info.is_error());
        assert!(event.is_last);
    }
}
