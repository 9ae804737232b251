//! SDK 回调适配器
//!
//! 回调线程上只做两件事：拷贝 SDK 数据、入队。业务逻辑全部在宿主线程执行。

pub mod md_spi_adapter;
pub mod trader_spi_adapter;

pub use md_spi_adapter::MdSpiAdapter;
pub use trader_spi_adapter::TraderSpiAdapter;
