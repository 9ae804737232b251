//! 错误类型定义

use thiserror::Error;

/// SDK 请求发送失败
///
/// 行情和交易两个引擎共用同一套错误，宿主可以按原因分支处理。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// 因网络原因发送失败
    #[error("{request}: send failed, network error")]
    Network { request: &'static str },

    /// 未处理请求队列总数量超限
    #[error("{request}: send failed, request queue is full")]
    QueueFull { request: &'static str },

    /// 每秒发送请求数量超限
    #[error("{request}: send failed, too many requests per second")]
    TooFrequent { request: &'static str },

    #[error("{request}: send failed, unknown return code {rc}")]
    Unknown { rc: i32, request: &'static str },
}

impl RequestError {
    /// 按 SDK 返回码翻译，0 表示发送成功
    pub fn check(rc: i32, request: &'static str) -> std::result::Result<(), RequestError> {
        match rc {
            0 => Ok(()),
            -1 => Err(RequestError::Network { request }),
            -2 => Err(RequestError::QueueFull { request }),
            -3 => Err(RequestError::TooFrequent { request }),
            rc => Err(RequestError::Unknown { rc, request }),
        }
    }

    /// 网络、排队、限频三类失败稍后重发即可
    pub fn is_retryable(&self) -> bool {
        !matches!(self, RequestError::Unknown { .. })
    }

    pub fn request(&self) -> &'static str {
        match self {
            RequestError::Network { request }
            | RequestError::QueueFull { request }
            | RequestError::TooFrequent { request }
            | RequestError::Unknown { request, .. } => request,
        }
    }

    /// SDK 原始返回码
    pub fn rc(&self) -> i32 {
        match self {
            RequestError::Network { .. } => -1,
            RequestError::QueueFull { .. } => -2,
            RequestError::TooFrequent { .. } => -3,
            RequestError::Unknown { rc, .. } => *rc,
        }
    }
}

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Request(#[from] RequestError),

    /// 引擎启动后配置只读
    #[error("client already initialized, cannot {0}")]
    AlreadyInitialized(&'static str),

    #[error("{0} engine is not running")]
    EngineUnavailable(&'static str),

    #[error("invalid order option {key}: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ClientError {
    /// 是否为可重试的发送失败
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Request(e) if e.is_retryable())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;
