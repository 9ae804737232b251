//! 客户端门面
//!
//! 宿主的全部操作都从这里进入：
//! - 登录、订阅、报单、撤单直接调用 SDK，返回值同步翻译成 [`RequestError`]
//! - 六类查询只入队，由工作线程按准入闸门逐个发送
//! - [`CtpClient::join`] 在调用线程上运行主循环，处理器回调都在这个线程执行

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ctp_types::{
    Direction, InputOrder, InputOrderAction, OffsetFlag, Order, OrderActionFlag, QryDepthMarketData,
    QryInvestorPosition, QryInvestorPositionDetail, QryOrder, QryTrade, QryTradingAccount,
    ReqUserLogin, SettlementInfoConfirm,
};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::dispatcher::Dispatcher;
use crate::envelope::{Request, RequestPayload};
use crate::error::{ClientError, RequestError, Result};
use crate::handler::CtpHandler;
use crate::join_loop::JoinLoop;
use crate::options::OrderOptions;
use crate::sdk::{MdApi, ResumeType, SdkProvider, TraderApi};
use crate::spi::{MdSpiAdapter, TraderSpiAdapter};

pub struct CtpClient {
    provider: Arc<dyn SdkProvider>,
    /// `init` 之后只读
    config: RwLock<ClientConfig>,
    initialized: AtomicBool,
    md_api: OnceCell<Arc<dyn MdApi>>,
    td_api: OnceCell<Arc<dyn TraderApi>>,
    dispatcher: Dispatcher,
}

impl CtpClient {
    pub fn new(
        provider: Arc<dyn SdkProvider>,
        md_address: impl Into<String>,
        td_address: impl Into<String>,
        broker_id: impl Into<String>,
        user_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::with_config(
            provider,
            ClientConfig::new(md_address, td_address, broker_id, user_id, password),
        )
    }

    pub fn with_config(provider: Arc<dyn SdkProvider>, config: ClientConfig) -> Self {
        Self {
            provider,
            config: RwLock::new(config),
            initialized: AtomicBool::new(false),
            md_api: OnceCell::new(),
            td_api: OnceCell::new(),
            dispatcher: Dispatcher::new(),
        }
    }

    // ---------------- 配置 ----------------

    pub fn config(&self) -> ClientConfig {
        self.config.read().clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    fn update_config(&self, action: &'static str, f: impl FnOnce(&mut ClientConfig)) -> Result<()> {
        let mut config = self.config.write();
        if self.is_initialized() {
            return Err(ClientError::AlreadyInitialized(action));
        }
        f(&mut *config);
        Ok(())
    }

    pub fn flow_path(&self) -> String {
        self.config.read().flow_path.clone()
    }

    pub fn set_flow_path(&self, flow_path: impl Into<String>) -> Result<()> {
        let flow_path = flow_path.into();
        self.update_config("set flow path", |c| c.flow_path = flow_path)
    }

    pub fn md_address(&self) -> String {
        self.config.read().md_address.clone()
    }

    pub fn set_md_address(&self, address: impl Into<String>) -> Result<()> {
        let address = address.into();
        self.update_config("set md address", |c| c.md_address = address)
    }

    pub fn td_address(&self) -> String {
        self.config.read().td_address.clone()
    }

    pub fn set_td_address(&self, address: impl Into<String>) -> Result<()> {
        let address = address.into();
        self.update_config("set td address", |c| c.td_address = address)
    }

    pub fn broker_id(&self) -> String {
        self.config.read().broker_id.clone()
    }

    pub fn set_broker_id(&self, broker_id: impl Into<String>) -> Result<()> {
        let broker_id = broker_id.into();
        self.update_config("set broker id", |c| c.broker_id = broker_id)
    }

    pub fn user_id(&self) -> String {
        self.config.read().user_id.clone()
    }

    pub fn set_user_id(&self, user_id: impl Into<String>) -> Result<()> {
        let user_id = user_id.into();
        self.update_config("set user id", |c| c.user_id = user_id)
    }

    pub fn password(&self) -> String {
        self.config.read().password.clone()
    }

    pub fn set_password(&self, password: impl Into<String>) -> Result<()> {
        let password = password.into();
        self.update_config("set password", |c| c.password = password)
    }

    pub fn instrument_ids(&self) -> Vec<String> {
        self.config.read().instrument_ids.clone()
    }

    pub fn set_instrument_ids<I, S>(&self, ids: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        self.update_config("set instrument ids", |c| c.instrument_ids = ids)
    }

    /// (行情版本, 交易版本)
    pub fn api_version(&self) -> (String, String) {
        self.provider.api_version()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    // ---------------- 生命周期 ----------------

    /// 创建流文件目录，启动已配置地址的引擎和工作线程
    ///
    /// 成功后配置冻结，再次调用返回 [`ClientError::AlreadyInitialized`]。
    pub fn init(&self) -> Result<()> {
        let config = {
            // 与 setter 互斥，先冻结再取快照
            let config = self.config.write();
            if self.initialized.swap(true, Ordering::AcqRel) {
                return Err(ClientError::AlreadyInitialized("init"));
            }
            config.clone()
        };

        let (md_flow, td_flow) = match prepare_flow_dirs(&config) {
            Ok(dirs) => dirs,
            Err(e) => {
                // 未启动任何引擎，允许修改配置后重试
                self.initialized.store(false, Ordering::Release);
                return Err(e);
            }
        };
        let root = config.flow_root();

        if !config.md_address.is_empty() {
            self.start_md(&config, md_flow);
        }
        if !config.td_address.is_empty() {
            self.start_td(&config, td_flow)?;
        }

        let (md_version, td_version) = self.api_version();
        tracing::info!(
            "ctp client initialized, md api {}, td api {}, flow path {}",
            md_version,
            td_version,
            root.display()
        );
        Ok(())
    }

    fn start_md(&self, config: &ClientConfig, flow: PathBuf) {
        let api = self.provider.create_md_api(&flow);
        api.register_spi(Arc::new(MdSpiAdapter::new(self.dispatcher.responses())));
        api.register_front(&config.md_address);
        if self.md_api.set(Arc::clone(&api)).is_err() {
            tracing::warn!("market data engine already created");
            return;
        }
        api.init();
        tracing::info!("market data engine started, front {}", config.md_address);
    }

    fn start_td(&self, config: &ClientConfig, flow: PathBuf) -> Result<()> {
        let api = self.provider.create_trader_api(&flow);
        api.register_spi(Arc::new(TraderSpiAdapter::new(
            self.dispatcher.responses(),
            config.missing_payload_error_id,
        )));
        api.register_front(&config.td_address);
        api.subscribe_private_topic(ResumeType::Quick);
        api.subscribe_public_topic(ResumeType::Quick);
        if self.td_api.set(Arc::clone(&api)).is_err() {
            tracing::warn!("trader engine already created");
            return Ok(());
        }
        api.init();
        self.dispatcher.spawn_worker(Arc::clone(&api), config.worker_tick())?;
        tracing::info!("trader engine started, front {}", config.td_address);
        Ok(())
    }

    /// 在当前线程运行主循环，直到 [`CtpClient::exit`] 被调用
    ///
    /// 返回前等待工作线程结束。
    pub fn join<H: CtpHandler + ?Sized>(&self, handler: &mut H) -> Result<()> {
        let config = self.config();
        let mut join_loop = JoinLoop::new(config.idle_interval());
        join_loop.run(self, handler, config.drain_poll());
        self.dispatcher.join_worker();
        tracing::info!("ctp client joined");
        Ok(())
    }

    /// 通知主循环和工作线程退出，任意线程可调用，可重复调用
    pub fn exit(&self) {
        if self.dispatcher.exit_signal().trigger() {
            tracing::info!("ctp client exit requested");
        }
    }

    /// Ctrl+C 触发退出，安装失败只记日志
    pub fn install_ctrlc_handler(&self) -> bool {
        let exit = self.dispatcher.exit_signal().clone();
        match ctrlc::set_handler(move || {
            tracing::warn!("received interrupt signal");
            exit.trigger();
        }) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("failed to set Ctrl-C handler: {}, exit via code only", e);
                false
            }
        }
    }

    fn md(&self) -> Result<&Arc<dyn MdApi>> {
        self.md_api.get().ok_or(ClientError::EngineUnavailable("market data"))
    }

    fn td(&self) -> Result<&Arc<dyn TraderApi>> {
        self.td_api.get().ok_or(ClientError::EngineUnavailable("trader"))
    }

    // ---------------- 行情 ----------------

    fn login_request(&self) -> ReqUserLogin {
        let config = self.config.read();
        ReqUserLogin {
            broker_id: config.broker_id.clone(),
            user_id: config.user_id.clone(),
            password: config.password.clone(),
        }
    }

    pub fn md_login(&self) -> Result<()> {
        let rc = self.md()?.req_user_login(&self.login_request(), 0);
        RequestError::check(rc, "MdApi::ReqUserLogin")?;
        Ok(())
    }

    pub fn subscribe_market_data(&self, instrument_ids: &[String]) -> Result<()> {
        let rc = self.md()?.subscribe_market_data(instrument_ids);
        RequestError::check(rc, "MdApi::SubscribeMarketData")?;
        Ok(())
    }

    pub fn unsubscribe_market_data(&self, instrument_ids: &[String]) -> Result<()> {
        let rc = self.md()?.unsubscribe_market_data(instrument_ids);
        RequestError::check(rc, "MdApi::UnSubscribeMarketData")?;
        Ok(())
    }

    // ---------------- 交易 ----------------

    pub fn td_login(&self) -> Result<()> {
        let rc = self.td()?.req_user_login(&self.login_request(), 0);
        RequestError::check(rc, "TraderApi::ReqUserLogin")?;
        Ok(())
    }

    pub fn confirm_settlement_info(&self) -> Result<()> {
        let req = {
            let config = self.config.read();
            SettlementInfoConfirm {
                broker_id: config.broker_id.clone(),
                investor_id: config.user_id.clone(),
                ..Default::default()
            }
        };
        let rc = self.td()?.req_settlement_info_confirm(&req, 0);
        RequestError::check(rc, "TraderApi::ReqSettlementInfoConfirm")?;
        Ok(())
    }

    /// 查询入队，交易引擎未启动时直接报错
    fn submit_query(&self, payload: RequestPayload, request_id: i32) -> Result<()> {
        self.td()?;
        self.dispatcher.submit(Request::new(payload, request_id));
        Ok(())
    }

    fn account(&self) -> (String, String) {
        let config = self.config.read();
        (config.broker_id.clone(), config.user_id.clone())
    }

    pub fn query_order(&self, request_id: i32) -> Result<()> {
        let (broker_id, investor_id) = self.account();
        let req = QryOrder {
            broker_id,
            investor_id,
            ..Default::default()
        };
        self.submit_query(RequestPayload::QryOrder(req), request_id)
    }

    pub fn query_trade(&self, request_id: i32) -> Result<()> {
        let (broker_id, investor_id) = self.account();
        let req = QryTrade {
            broker_id,
            investor_id,
            ..Default::default()
        };
        self.submit_query(RequestPayload::QryTrade(req), request_id)
    }

    pub fn query_trading_account(&self, request_id: i32) -> Result<()> {
        let (broker_id, investor_id) = self.account();
        let req = QryTradingAccount {
            broker_id,
            investor_id,
            currency_id: self.config.read().currency_id.clone(),
        };
        self.submit_query(RequestPayload::QryTradingAccount(req), request_id)
    }

    /// 不指定合约，返回全部持仓
    pub fn query_investor_position(&self, request_id: i32) -> Result<()> {
        let (broker_id, investor_id) = self.account();
        let req = QryInvestorPosition {
            broker_id,
            investor_id,
            ..Default::default()
        };
        self.submit_query(RequestPayload::QryInvestorPosition(req), request_id)
    }

    pub fn query_investor_position_detail(&self, request_id: i32) -> Result<()> {
        let (broker_id, investor_id) = self.account();
        let req = QryInvestorPositionDetail {
            broker_id,
            investor_id,
            ..Default::default()
        };
        self.submit_query(RequestPayload::QryInvestorPositionDetail(req), request_id)
    }

    pub fn query_market_data(&self, instrument_id: impl Into<String>, request_id: i32) -> Result<()> {
        let req = QryDepthMarketData {
            instrument_id: instrument_id.into(),
        };
        self.submit_query(RequestPayload::QryDepthMarketData(req), request_id)
    }

    pub fn insert_order(
        &self,
        instrument_id: impl Into<String>,
        direction: Direction,
        offset_flag: OffsetFlag,
        price: f64,
        volume: i32,
        options: &OrderOptions,
    ) -> Result<()> {
        let (broker_id, investor_id) = self.account();
        let req = InputOrder {
            broker_id,
            investor_id,
            instrument_id: instrument_id.into(),
            order_ref: String::new(),
            direction,
            offset_flag,
            hedge_flag: options.hedge_flag,
            order_price_type: options.order_price_type,
            limit_price: price,
            volume_total_original: volume,
            time_condition: options.time_condition,
            volume_condition: options.volume_condition,
            min_volume: options.min_volume,
            contingent_condition: options.contingent_condition,
            stop_price: options.stop_price,
            is_auto_suspend: options.is_auto_suspend,
            user_force_close: options.user_force_close,
            request_id: options.request_id,
        };
        let rc = self.td()?.req_order_insert(&req, options.request_id);
        RequestError::check(rc, "TraderApi::ReqOrderInsert")?;
        tracing::debug!(
            "order insert {} {:?} {:?} {}@{} request_id={}",
            req.instrument_id,
            direction,
            offset_flag,
            volume,
            price,
            options.request_id
        );
        Ok(())
    }

    /// 可选参数以键值表给出，见 [`OrderOptions::from_map`]
    pub fn insert_order_with_map(
        &self,
        instrument_id: impl Into<String>,
        direction: Direction,
        offset_flag: OffsetFlag,
        price: f64,
        volume: i32,
        options: &HashMap<String, Value>,
    ) -> Result<()> {
        let options = OrderOptions::from_map(options)?;
        self.insert_order(instrument_id, direction, offset_flag, price, volume, &options)
    }

    /// 对已有报单发起撤单或改单
    pub fn order_action(
        &self,
        order: &Order,
        action_flag: OrderActionFlag,
        price: f64,
        volume_change: i32,
        request_id: i32,
    ) -> Result<()> {
        let req = InputOrderAction {
            broker_id: order.broker_id.clone(),
            investor_id: order.investor_id.clone(),
            order_ref: order.order_ref.clone(),
            front_id: order.front_id,
            session_id: order.session_id,
            exchange_id: order.exchange_id.clone(),
            order_sys_id: order.order_sys_id.clone(),
            instrument_id: order.instrument_id.clone(),
            action_flag,
            limit_price: price,
            volume_change,
            request_id,
        };
        let rc = self.td()?.req_order_action(&req, request_id);
        RequestError::check(rc, "TraderApi::ReqOrderAction")?;
        Ok(())
    }

    pub fn delete_order(&self, order: &Order, request_id: i32) -> Result<()> {
        self.order_action(order, OrderActionFlag::Delete, 0.0, 0, request_id)
    }

    pub fn modify_order(&self, order: &Order, price: f64, volume_change: i32, request_id: i32) -> Result<()> {
        self.order_action(order, OrderActionFlag::Modify, price, volume_change, request_id)
    }
}

fn prepare_flow_dirs(config: &ClientConfig) -> Result<(PathBuf, PathBuf)> {
    config.validate()?;
    let root = config.flow_root();
    let md_flow = root.join("md");
    let td_flow = root.join("td");
    if !config.md_address.is_empty() {
        fs::create_dir_all(&md_flow)?;
    }
    if !config.td_address.is_empty() {
        fs::create_dir_all(&td_flow)?;
    }
    Ok((md_flow, td_flow))
}

impl Drop for CtpClient {
    fn drop(&mut self) {
        self.dispatcher.shutdown();
        if let Some(api) = self.md_api.get() {
            api.release();
        }
        if let Some(api) = self.td_api.get() {
            api.release();
        }
    }
}
