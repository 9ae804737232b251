//! 由行情快照合成 tick 与 1 分钟 K 线

pub mod bar_aggregator;
pub mod bar_types;

pub use bar_aggregator::BarAggregator;
pub use bar_types::{BarUpdate, M1Bar, TickBar};
