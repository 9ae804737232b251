//! 宿主回调
//!
//! 所有方法都在调用 [`CtpClient::join`] 的线程上执行。
//! 默认实现即内置行为：前置连上后自动登录，行情登录后订阅配置的合约，
//! 交易登录后确认结算单，其余事件写日志。宿主只覆盖关心的方法。
//!
//! 方法返回错误不会中断主循环，只会记一条 `error!` 日志。

use chrono::{DateTime, Local};
use ctp_types::{
    DepthMarketData, InputOrder, InputOrderAction, InvestorPosition, InvestorPositionDetail,
    Order, OrderAction, RspInfo, RspUserLogin, SettlementInfoConfirm, SpecificInstrument, Trade,
    TradingAccount, UserLogout,
};

use crate::bar::{M1Bar, TickBar};
use crate::client::CtpClient;
use crate::envelope::RequestKind;
use crate::error::{RequestError, Result};

#[allow(unused_variables)]
pub trait CtpHandler {
    // ---------------- 行情 ----------------

    fn on_md_front_connected(&mut self, client: &CtpClient) -> Result<()> {
        tracing::info!("market data front connected");
        client.md_login()
    }

    fn on_md_front_disconnected(&mut self, client: &CtpClient, reason: i32) -> Result<()> {
        tracing::warn!("market data front disconnected, reason = {:#x}", reason);
        Ok(())
    }

    fn on_md_user_login(&mut self, client: &CtpClient, login: Option<&RspUserLogin>, rsp_info: &RspInfo) -> Result<()> {
        if rsp_info.is_error() {
            tracing::warn!("market data login failed: {} {}", rsp_info.error_id, rsp_info.error_msg);
            return Ok(());
        }
        tracing::info!("market data user login");
        let instrument_ids = client.instrument_ids();
        if instrument_ids.is_empty() {
            return Ok(());
        }
        client.subscribe_market_data(&instrument_ids)
    }

    fn on_md_user_logout(&mut self, client: &CtpClient, logout: Option<&UserLogout>, rsp_info: &RspInfo) -> Result<()> {
        tracing::warn!("market data user logout");
        Ok(())
    }

    fn on_subscribe_market_data(
        &mut self,
        client: &CtpClient,
        instrument: Option<&SpecificInstrument>,
        rsp_info: &RspInfo,
    ) -> Result<()> {
        match instrument {
            Some(instrument) if !rsp_info.is_error() => {
                tracing::info!("market data subscribed {}", instrument.instrument_id)
            }
            _ => tracing::warn!("subscribe market data failed: {} {}", rsp_info.error_id, rsp_info.error_msg),
        }
        Ok(())
    }

    fn on_unsubscribe_market_data(
        &mut self,
        client: &CtpClient,
        instrument: Option<&SpecificInstrument>,
        rsp_info: &RspInfo,
    ) -> Result<()> {
        if let Some(instrument) = instrument {
            tracing::info!("market data unsubscribed {}", instrument.instrument_id);
        }
        Ok(())
    }

    fn on_rtn_market_data(&mut self, client: &CtpClient, data: &DepthMarketData) -> Result<()> {
        Ok(())
    }

    fn on_tick(&mut self, client: &CtpClient, tick: &TickBar) -> Result<()> {
        Ok(())
    }

    /// 上一分钟的 K 线，在下一分钟第一笔行情到达时回调
    fn on_1min(&mut self, client: &CtpClient, bar: &M1Bar) -> Result<()> {
        Ok(())
    }

    /// 每笔行情都会带来当前分钟 K 线的快照
    fn on_1min_tick(&mut self, client: &CtpClient, bar: &M1Bar) -> Result<()> {
        Ok(())
    }

    fn on_md_error(&mut self, client: &CtpClient, rsp_info: &RspInfo, request_id: i32, is_last: bool) -> Result<()> {
        tracing::warn!("market data error: {} {}", rsp_info.error_id, rsp_info.error_msg);
        Ok(())
    }

    // ---------------- 交易 ----------------

    fn on_td_front_connected(&mut self, client: &CtpClient) -> Result<()> {
        tracing::info!("trader front connected");
        client.td_login()
    }

    fn on_td_front_disconnected(&mut self, client: &CtpClient, reason: i32) -> Result<()> {
        tracing::warn!("trader front disconnected, reason = {:#x}", reason);
        Ok(())
    }

    fn on_td_user_login(&mut self, client: &CtpClient, login: Option<&RspUserLogin>, rsp_info: &RspInfo) -> Result<()> {
        if rsp_info.is_error() {
            tracing::warn!("trader login failed: {} {}", rsp_info.error_id, rsp_info.error_msg);
            return Ok(());
        }
        tracing::info!("trader user login");
        client.confirm_settlement_info()
    }

    fn on_td_user_logout(&mut self, client: &CtpClient, logout: Option<&UserLogout>, rsp_info: &RspInfo) -> Result<()> {
        tracing::warn!("trader user logout");
        Ok(())
    }

    fn on_settlement_info_confirm(
        &mut self,
        client: &CtpClient,
        confirm: Option<&SettlementInfoConfirm>,
        rsp_info: &RspInfo,
    ) -> Result<()> {
        if rsp_info.is_error() {
            tracing::warn!("settlement info confirm failed: {} {}", rsp_info.error_id, rsp_info.error_msg);
        } else {
            tracing::info!("settlement info confirmed");
        }
        Ok(())
    }

    fn on_rsp_order_insert(&mut self, client: &CtpClient, order: Option<&InputOrder>, rsp_info: &RspInfo) -> Result<()> {
        if rsp_info.is_error() {
            tracing::warn!("order insert rejected: {} {}", rsp_info.error_id, rsp_info.error_msg);
        }
        Ok(())
    }

    fn on_rsp_order_action(
        &mut self,
        client: &CtpClient,
        action: Option<&InputOrderAction>,
        rsp_info: &RspInfo,
    ) -> Result<()> {
        if rsp_info.is_error() {
            tracing::warn!("order action rejected: {} {}", rsp_info.error_id, rsp_info.error_msg);
        }
        Ok(())
    }

    fn on_err_rtn_order_insert(&mut self, client: &CtpClient, order: Option<&InputOrder>, rsp_info: &RspInfo) -> Result<()> {
        tracing::warn!("order insert error: {} {}", rsp_info.error_id, rsp_info.error_msg);
        Ok(())
    }

    fn on_err_rtn_order_action(&mut self, client: &CtpClient, action: Option<&OrderAction>, rsp_info: &RspInfo) -> Result<()> {
        tracing::warn!("order action error: {} {}", rsp_info.error_id, rsp_info.error_msg);
        Ok(())
    }

    fn on_rtn_order(&mut self, client: &CtpClient, order: &Order) -> Result<()> {
        Ok(())
    }

    fn on_rtn_trade(&mut self, client: &CtpClient, trade: &Trade) -> Result<()> {
        Ok(())
    }

    fn on_td_error(&mut self, client: &CtpClient, rsp_info: &RspInfo, request_id: i32, is_last: bool) -> Result<()> {
        tracing::warn!("trader error: {} {}", rsp_info.error_id, rsp_info.error_msg);
        Ok(())
    }

    // ---------------- 查询结果 ----------------
    // 多段结果逐段回调，`is_last` 为 true 的一段之后下一个查询才会发出

    fn on_rsp_order(
        &mut self,
        client: &CtpClient,
        order: Option<&Order>,
        rsp_info: &RspInfo,
        request_id: i32,
        is_last: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn on_rsp_trade(
        &mut self,
        client: &CtpClient,
        trade: Option<&Trade>,
        rsp_info: &RspInfo,
        request_id: i32,
        is_last: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn on_rsp_account(
        &mut self,
        client: &CtpClient,
        account: Option<&TradingAccount>,
        rsp_info: &RspInfo,
        request_id: i32,
        is_last: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn on_rsp_investor_position(
        &mut self,
        client: &CtpClient,
        position: Option<&InvestorPosition>,
        rsp_info: &RspInfo,
        request_id: i32,
        is_last: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn on_rsp_investor_position_detail(
        &mut self,
        client: &CtpClient,
        detail: Option<&InvestorPositionDetail>,
        rsp_info: &RspInfo,
        request_id: i32,
        is_last: bool,
    ) -> Result<()> {
        Ok(())
    }

    fn on_rsp_market_data(
        &mut self,
        client: &CtpClient,
        data: Option<&DepthMarketData>,
        rsp_info: &RspInfo,
        request_id: i32,
        is_last: bool,
    ) -> Result<()> {
        Ok(())
    }

    /// 查询在工作线程上发送失败，不会再有结果到达，也不会自动重发
    fn on_request_error(&mut self, client: &CtpClient, kind: RequestKind, error: &RequestError, request_id: i32) -> Result<()> {
        tracing::warn!("{} (request_id = {})", error, request_id);
        Ok(())
    }

    /// 每隔 `idle_interval_ms` 回调一次
    fn on_idle(&mut self, client: &CtpClient, now: DateTime<Local>) -> Result<()> {
        Ok(())
    }
}

/// 只使用内置行为的处理器
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHandler;

impl CtpHandler for DefaultHandler {}
