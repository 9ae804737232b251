//! SDK 结构体对应的数据载体
//!
//! SDK 的字符数组字段统一映射为 `String`，价格和资金为 `f64`，手数为 `i32`。

use crate::enums::{
    ContingentCondition, Direction, HedgeFlag, OffsetFlag, OrderActionFlag, OrderActionStatus,
    OrderPriceType, OrderStatus, OrderSubmitStatus, TimeCondition, VolumeCondition,
};

/// 响应信息，`error_id == 0` 表示成功
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RspInfo {
    pub error_id: i32,
    pub error_msg: String,
}

impl RspInfo {
    pub fn new(error_id: i32, error_msg: impl Into<String>) -> Self {
        Self { error_id, error_msg: error_msg.into() }
    }

    pub fn is_error(&self) -> bool {
        self.error_id != 0
    }
}

// ---------------------------------------------------------------------------
// 会话
// ---------------------------------------------------------------------------

/// 登录请求
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReqUserLogin {
    pub broker_id: String,
    pub user_id: String,
    pub password: String,
}

/// 登录应答
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RspUserLogin {
    pub trading_day: String,
    pub login_time: String,
    pub broker_id: String,
    pub user_id: String,
    pub system_name: String,
    pub front_id: i32,
    pub session_id: i32,
    pub max_order_ref: String,
}

/// 登出
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserLogout {
    pub broker_id: String,
    pub user_id: String,
}

/// 结算单确认
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettlementInfoConfirm {
    pub broker_id: String,
    pub investor_id: String,
    pub confirm_date: String,
    pub confirm_time: String,
}

// ---------------------------------------------------------------------------
// 行情
// ---------------------------------------------------------------------------

/// 订阅 / 退订应答中的合约
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecificInstrument {
    pub instrument_id: String,
}

/// 深度行情
///
/// `volume` 与 `turnover` 是交易日内的累计值，不是单笔增量。
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DepthMarketData {
    pub trading_day: String,
    pub action_day: String,
    pub instrument_id: String,
    pub exchange_id: String,
    /// HH:MM:SS
    pub update_time: String,
    pub update_millisec: i32,
    pub last_price: f64,
    pub pre_settlement_price: f64,
    pub pre_close_price: f64,
    pub open_price: f64,
    pub highest_price: f64,
    pub lowest_price: f64,
    pub volume: i32,
    pub turnover: f64,
    pub open_interest: f64,
    pub upper_limit_price: f64,
    pub lower_limit_price: f64,
    pub bid_price1: f64,
    pub bid_volume1: i32,
    pub ask_price1: f64,
    pub ask_volume1: i32,
    pub average_price: f64,
}

// ---------------------------------------------------------------------------
// 报单 / 成交
// ---------------------------------------------------------------------------

/// 报单录入请求
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputOrder {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub order_ref: String,
    pub direction: Direction,
    pub offset_flag: OffsetFlag,
    pub hedge_flag: HedgeFlag,
    pub order_price_type: OrderPriceType,
    pub limit_price: f64,
    pub volume_total_original: i32,
    pub time_condition: TimeCondition,
    pub volume_condition: VolumeCondition,
    pub min_volume: i32,
    pub contingent_condition: ContingentCondition,
    pub stop_price: f64,
    pub is_auto_suspend: bool,
    pub user_force_close: bool,
    pub request_id: i32,
}

/// 报单操作请求（撤单 / 改单）
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputOrderAction {
    pub broker_id: String,
    pub investor_id: String,
    pub order_ref: String,
    pub front_id: i32,
    pub session_id: i32,
    pub exchange_id: String,
    pub order_sys_id: String,
    pub instrument_id: String,
    pub action_flag: OrderActionFlag,
    pub limit_price: f64,
    pub volume_change: i32,
    pub request_id: i32,
}

/// 交易所返回的报单操作
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrderAction {
    pub broker_id: String,
    pub investor_id: String,
    pub order_ref: String,
    pub exchange_id: String,
    pub order_sys_id: String,
    pub instrument_id: String,
    pub action_flag: OrderActionFlag,
    pub action_date: String,
    pub action_time: String,
    pub order_action_status: OrderActionStatus,
    pub status_msg: String,
}

/// 报单
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Order {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub order_ref: String,
    pub exchange_id: String,
    pub order_sys_id: String,
    pub front_id: i32,
    pub session_id: i32,
    pub direction: Direction,
    pub offset_flag: OffsetFlag,
    pub limit_price: f64,
    pub volume_total_original: i32,
    pub volume_traded: i32,
    pub volume_total: i32,
    pub order_status: OrderStatus,
    pub order_submit_status: OrderSubmitStatus,
    pub insert_date: String,
    pub insert_time: String,
    pub status_msg: String,
    pub request_id: i32,
}

/// 成交
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trade {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub order_ref: String,
    pub exchange_id: String,
    pub trade_id: String,
    pub order_sys_id: String,
    pub direction: Direction,
    pub offset_flag: OffsetFlag,
    pub price: f64,
    pub volume: i32,
    pub trade_date: String,
    pub trade_time: String,
}

// ---------------------------------------------------------------------------
// 资金 / 持仓
// ---------------------------------------------------------------------------

/// 资金账户
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TradingAccount {
    pub broker_id: String,
    pub account_id: String,
    pub pre_balance: f64,
    pub deposit: f64,
    pub withdraw: f64,
    pub frozen_margin: f64,
    pub frozen_commission: f64,
    pub curr_margin: f64,
    pub commission: f64,
    pub close_profit: f64,
    pub position_profit: f64,
    pub balance: f64,
    pub available: f64,
    pub trading_day: String,
    pub currency_id: String,
}

/// 持仓汇总
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvestorPosition {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    /// 多空方向，SDK 字符编码
    pub posi_direction: u8,
    pub hedge_flag: HedgeFlag,
    pub yd_position: i32,
    pub position: i32,
    pub today_position: i32,
    pub long_frozen: i32,
    pub short_frozen: i32,
    pub open_cost: f64,
    pub position_cost: f64,
    pub use_margin: f64,
    pub close_profit: f64,
    pub position_profit: f64,
    pub trading_day: String,
}

/// 持仓明细
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InvestorPositionDetail {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub exchange_id: String,
    pub hedge_flag: HedgeFlag,
    pub direction: Direction,
    pub open_date: String,
    pub trade_id: String,
    pub volume: i32,
    pub open_price: f64,
    pub trading_day: String,
    pub close_volume: i32,
    pub margin: f64,
}

// ---------------------------------------------------------------------------
// 查询请求
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QryOrder {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QryTrade {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QryTradingAccount {
    pub broker_id: String,
    pub investor_id: String,
    pub currency_id: String,
}

/// 持仓查询，`instrument_id` 为空表示查询全部持仓
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QryInvestorPosition {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QryInvestorPositionDetail {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QryDepthMarketData {
    pub instrument_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsp_info_default_is_success() {
        let info = RspInfo::default();
        assert!(!info.is_error());
        assert!(RspInfo::new(16, "no data").is_error());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_input_order_serializes_enums_as_snake_case() {
        let order = InputOrder {
            instrument_id: "rb2410".to_string(),
            direction: Direction::Sell,
            offset_flag: OffsetFlag::CloseToday,
            ..Default::default()
        };

        let value = serde_json::to_value(&order).unwrap();
        assert_eq!(value["direction"], "sell");
        assert_eq!(value["offset_flag"], "close_today");
        assert_eq!(value["time_condition"], "gfd");
    }
}
