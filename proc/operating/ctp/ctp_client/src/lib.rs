//! 期货柜台 SDK 的线程安全客户端
//!
//! SDK 的行情、交易两个引擎都在自己的线程上回调。本 crate 负责：
//! - 把回调数据拷贝成 [`Response`] 放进无锁队列，宿主在 [`CtpClient::join`] 的线程上统一处理
//! - 查询请求入队，由工作线程在准入闸门控制下逐个发送，保证至多一个查询在途
//! - 由行情快照合成 tick 和 1 分钟 K 线
//!
//! ```ignore
//! ctp_client::logging::init_tracing(tracing::Level::INFO);
//! let client = CtpClient::with_config(provider, ClientConfig::load_from_file("ctp.yaml")?);
//! client.init()?;
//! client.install_ctrlc_handler();
//! client.join(&mut MyHandler::default())?;
//! ```

pub mod bar;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod exit_signal;
pub mod gate;
pub mod handler;
pub mod join_loop;
pub mod logging;
pub mod options;
pub mod sdk;
pub mod spi;

pub use bar::{BarAggregator, BarUpdate, M1Bar, TickBar};
pub use client::CtpClient;
pub use config::ClientConfig;
pub use envelope::{Request, RequestKind, RequestPayload, Response, ResponseKind, ResponsePayload};
pub use error::{ClientError, RequestError, Result};
pub use exit_signal::ExitSignal;
pub use gate::AdmissionGate;
pub use handler::{CtpHandler, DefaultHandler};
pub use options::OrderOptions;
pub use sdk::{MdApi, MdSpi, ResumeType, SdkProvider, TraderApi, TraderSpi};
