//! 客户端配置
//!
//! 可以从 YAML 文件加载，也可以用 `with_*` 方法逐项构造。

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// 查询结果为空且没有错误码时补上的错误码（柜台的"无数据"）
pub const DEFAULT_MISSING_PAYLOAD_ERROR_ID: i32 = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// 行情前置地址，为空则不启动行情引擎
    #[serde(default)]
    pub md_address: String,

    /// 交易前置地址，为空则不启动交易引擎
    #[serde(default)]
    pub td_address: String,

    #[serde(default)]
    pub broker_id: String,

    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub password: String,

    /// 流文件根目录，为空时使用系统临时目录下的 `ctp`
    #[serde(default)]
    pub flow_path: String,

    /// 行情登录成功后自动订阅的合约
    #[serde(default)]
    pub instrument_ids: Vec<String>,

    /// 工作线程轮询间隔（毫秒），也是查询请求的最小发送间隔
    #[serde(default = "default_worker_tick_ms")]
    pub worker_tick_ms: u64,

    /// 宿主线程取回调的轮询间隔（毫秒）
    #[serde(default = "default_drain_poll_ms")]
    pub drain_poll_ms: u64,

    /// `on_idle` 的触发间隔（毫秒）
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,

    /// 行情快照查询无数据时补上的错误码，不同版本 SDK 可能不同
    #[serde(default = "default_missing_payload_error_id")]
    pub missing_payload_error_id: i32,

    /// 资金查询使用的币种
    #[serde(default = "default_currency_id")]
    pub currency_id: String,
}

fn default_worker_tick_ms() -> u64 {
    1100
}

fn default_drain_poll_ms() -> u64 {
    10
}

fn default_idle_interval_ms() -> u64 {
    1000
}

fn default_missing_payload_error_id() -> i32 {
    DEFAULT_MISSING_PAYLOAD_ERROR_ID
}

fn default_currency_id() -> String {
    "CNY".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            md_address: String::new(),
            td_address: String::new(),
            broker_id: String::new(),
            user_id: String::new(),
            password: String::new(),
            flow_path: String::new(),
            instrument_ids: Vec::new(),
            worker_tick_ms: default_worker_tick_ms(),
            drain_poll_ms: default_drain_poll_ms(),
            idle_interval_ms: default_idle_interval_ms(),
            missing_payload_error_id: default_missing_payload_error_id(),
            currency_id: default_currency_id(),
        }
    }
}

impl ClientConfig {
    pub fn new(
        md_address: impl Into<String>,
        td_address: impl Into<String>,
        broker_id: impl Into<String>,
        user_id: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            md_address: md_address.into(),
            td_address: td_address.into(),
            broker_id: broker_id.into(),
            user_id: user_id.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// 从 YAML 文件加载
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: ClientConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("loaded client config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_tick_ms == 0 {
            return Err(ClientError::Config("worker_tick_ms must be greater than 0".to_string()));
        }
        if self.drain_poll_ms == 0 {
            return Err(ClientError::Config("drain_poll_ms must be greater than 0".to_string()));
        }
        if self.md_address.is_empty() && self.td_address.is_empty() {
            tracing::warn!("neither md_address nor td_address is configured");
        }
        Ok(())
    }

    pub fn with_flow_path(mut self, flow_path: impl Into<String>) -> Self {
        self.flow_path = flow_path.into();
        self
    }

    pub fn with_instrument_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.instrument_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_worker_tick(mut self, ms: u64) -> Self {
        self.worker_tick_ms = ms;
        self
    }

    pub fn with_drain_poll(mut self, ms: u64) -> Self {
        self.drain_poll_ms = ms;
        self
    }

    pub fn with_idle_interval(mut self, ms: u64) -> Self {
        self.idle_interval_ms = ms;
        self
    }

    pub fn with_missing_payload_error_id(mut self, error_id: i32) -> Self {
        self.missing_payload_error_id = error_id;
        self
    }

    pub fn with_currency_id(mut self, currency_id: impl Into<String>) -> Self {
        self.currency_id = currency_id.into();
        self
    }

    pub fn worker_tick(&self) -> Duration {
        Duration::from_millis(self.worker_tick_ms)
    }

    pub fn drain_poll(&self) -> Duration {
        Duration::from_millis(self.drain_poll_ms)
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    /// 流文件根目录，未配置时落到系统临时目录
    pub fn flow_root(&self) -> PathBuf {
        if self.flow_path.is_empty() {
            std::env::temp_dir().join("ctp")
        } else {
            PathBuf::from(&self.flow_path)
        }
    }
}
