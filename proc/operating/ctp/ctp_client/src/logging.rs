//! 日志初始化

use tracing_subscriber::EnvFilter;

/// 初始化 tracing，输出到 stderr
///
/// 默认只输出 `default_level` 及以上级别，`RUST_LOG` 可以覆盖。
/// 重复调用不会报错，已经有全局 subscriber 时直接返回。
pub fn init_tracing(default_level: tracing::Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_ascii_lowercase()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .try_init();
}
