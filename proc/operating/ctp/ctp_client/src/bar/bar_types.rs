use serde::{Deserialize, Serialize};

// 单笔行情，成交量和成交额同时给出累计值和本笔增量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickBar {
    pub instrument_id: String,
    pub trading_day: String,
    pub action_day: String,
    pub update_time: String,   // HH:MM:SS.mmm
    pub price: f64,
    pub volume: i32,           // 当日累计成交量
    pub volume_delta: i32,     // 本笔成交量
    pub turnover: f64,         // 当日累计成交额
    pub turnover_delta: f64,   // 本笔成交额
    pub position: f64,         // 持仓量
}

// 1 分钟 K 线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct M1Bar {
    pub instrument_id: String,
    pub trading_day: String,
    pub action_day: String,
    pub update_time: String,   // HH:MM，分钟开始
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i32,           // 本分钟成交量
    pub turnover: f64,         // 本分钟成交额
    pub position: f64,         // 最后一笔的持仓量
    pub tick_volume: i32,      // 最后一笔的累计成交量
    pub tick_turnover: f64,    // 最后一笔的累计成交额
}

impl M1Bar {
    /// 以分钟内第一笔行情开一根新 K 线
    pub fn open_with(tick: &TickBar, minute: &str) -> Self {
        Self {
            instrument_id: tick.instrument_id.clone(),
            trading_day: tick.trading_day.clone(),
            action_day: tick.action_day.clone(),
            update_time: minute.to_string(),
            open: tick.price,
            high: tick.price,
            low: tick.price,
            close: tick.price,
            volume: tick.volume_delta,
            turnover: tick.turnover_delta,
            position: tick.position,
            tick_volume: tick.volume,
            tick_turnover: tick.turnover,
        }
    }

    pub fn update(&mut self, tick: &TickBar) {
        self.high = self.high.max(tick.price);
        self.low = self.low.min(tick.price);
        self.close = tick.price;
        self.volume += tick.volume_delta;
        self.turnover += tick.turnover_delta;
        self.position = tick.position;
        self.tick_volume = tick.volume;
        self.tick_turnover = tick.turnover;
    }
}

/// 一笔行情带来的全部 K 线变化
#[derive(Debug, Clone, PartialEq)]
pub struct BarUpdate {
    pub tick: TickBar,
    /// 跨分钟时上一分钟已完成的 K 线
    pub closed: Option<M1Bar>,
    /// 当前分钟的 K 线快照
    pub current: M1Bar,
}
