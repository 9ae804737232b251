use std::collections::HashMap;

use ctp_types::DepthMarketData;

use crate::bar::bar_types::{BarUpdate, M1Bar, TickBar};

// 单个合约的聚合状态
#[derive(Debug, Default)]
struct InstrumentBarState {
    trading_day: String,
    last_volume: i32,      // 上一笔累计成交量，基准
    last_turnover: f64,    // 上一笔累计成交额，基准
    current: Option<M1Bar>,
}

/// 按合约聚合 1 分钟 K 线
///
/// 行情只给当日累计成交量 / 成交额，单笔增量 = 本笔累计 - 上一笔累计。
/// 每个交易日基准从 0 开始，累计值回落或交易日变化时基准重置。
/// 只在宿主线程上使用，不需要加锁。
#[derive(Debug, Default)]
pub struct BarAggregator {
    states: HashMap<String, InstrumentBarState>,
}

impl BarAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_market_data(&mut self, data: &DepthMarketData) -> BarUpdate {
        let state = self.states.entry(data.instrument_id.clone()).or_default();

        if state.trading_day != data.trading_day {
            state.trading_day = data.trading_day.clone();
            state.last_volume = 0;
            state.last_turnover = 0.0;
        }

        let volume_delta = if data.volume >= state.last_volume {
            data.volume - state.last_volume
        } else {
            data.volume
        };
        let turnover_delta = if data.turnover >= state.last_turnover {
            data.turnover - state.last_turnover
        } else {
            data.turnover
        };
        state.last_volume = data.volume;
        state.last_turnover = data.turnover;

        let tick = TickBar {
            instrument_id: data.instrument_id.clone(),
            trading_day: data.trading_day.clone(),
            action_day: data.action_day.clone(),
            update_time: format!("{}.{:03}", data.update_time, data.update_millisec),
            price: data.last_price,
            volume: data.volume,
            volume_delta,
            turnover: data.turnover,
            turnover_delta,
            position: data.open_interest,
        };

        let minute = minute_of(&data.update_time);
        // 迟到的上一分钟行情并入当前 K 线，不回滚
        let same_minute = matches!(
            &state.current,
            Some(bar) if bar.trading_day == tick.trading_day
                && (bar.update_time == minute || is_late(&bar.update_time, minute))
        );
        let closed = if same_minute {
            if let Some(bar) = state.current.as_mut() {
                bar.update(&tick);
            }
            None
        } else {
            state.current.replace(M1Bar::open_with(&tick, minute))
        };

        let current = state
            .current
            .clone()
            .unwrap_or_else(|| M1Bar::open_with(&tick, minute));

        BarUpdate { tick, closed, current }
    }

    /// 合约当前分钟的 K 线
    pub fn current(&self, instrument_id: &str) -> Option<&M1Bar> {
        self.states.get(instrument_id).and_then(|state| state.current.as_ref())
    }

    pub fn instrument_count(&self) -> usize {
        self.states.len()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

// HH:MM:SS → HH:MM
fn minute_of(update_time: &str) -> &str {
    update_time.get(..5).unwrap_or(update_time)
}

// 迟到容忍的分钟数，超过视为新的时段（夜盘跨零点、午休后开盘）
const LATE_WINDOW_MINUTES: u32 = 10;
const MINUTES_PER_DAY: u32 = 24 * 60;

// HH:MM → 当天第几分钟
fn minute_index(minute: &str) -> Option<u32> {
    let (hour, min) = minute.split_once(':')?;
    let hour: u32 = hour.parse().ok()?;
    let min: u32 = min.parse().ok()?;
    (hour < 24 && min < 60).then_some(hour * 60 + min)
}

// tick 的分钟早于当前 K 线的分钟，且在容忍范围内
fn is_late(bar_minute: &str, tick_minute: &str) -> bool {
    match (minute_index(bar_minute), minute_index(tick_minute)) {
        (Some(bar), Some(tick)) => {
            let behind = (bar + MINUTES_PER_DAY - tick) % MINUTES_PER_DAY;
            behind > 0 && behind <= LATE_WINDOW_MINUTES
        }
        _ => false,
    }
}
