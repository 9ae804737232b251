//! 报单可选参数

use std::collections::HashMap;

use ctp_types::{ContingentCondition, HedgeFlag, OrderPriceType, TimeCondition, VolumeCondition};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ClientError, Result};

/// 报单的可选字段，未指定的取默认值：限价、投机、当日有效、任意数量、立即触发
#[derive(Debug, Clone, PartialEq)]
pub struct OrderOptions {
    pub order_price_type: OrderPriceType,
    pub hedge_flag: HedgeFlag,
    pub time_condition: TimeCondition,
    pub volume_condition: VolumeCondition,
    pub contingent_condition: ContingentCondition,
    pub min_volume: i32,
    /// 条件单的触发价
    pub stop_price: f64,
    pub is_auto_suspend: bool,
    pub user_force_close: bool,
    pub request_id: i32,
}

impl Default for OrderOptions {
    fn default() -> Self {
        Self {
            order_price_type: OrderPriceType::default(),
            hedge_flag: HedgeFlag::default(),
            time_condition: TimeCondition::default(),
            volume_condition: VolumeCondition::default(),
            contingent_condition: ContingentCondition::default(),
            min_volume: 1,
            stop_price: 0.0,
            is_auto_suspend: false,
            user_force_close: false,
            request_id: 0,
        }
    }
}

impl OrderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值表解析
    ///
    /// 枚举取值既可以是 snake_case 名称（如 `"ioc"`、`"best_price"`），
    /// 也可以是整数序号。不认识的键忽略。
    pub fn from_map(map: &HashMap<String, Value>) -> Result<Self> {
        let mut options = Self::default();
        for (key, value) in map {
            match key.as_str() {
                "order_price_type" => options.order_price_type = parse_enum(key, value, OrderPriceType::from_ordinal)?,
                "hedge_flag" => options.hedge_flag = parse_enum(key, value, HedgeFlag::from_ordinal)?,
                "time_condition" => options.time_condition = parse_enum(key, value, TimeCondition::from_ordinal)?,
                "volume_condition" => options.volume_condition = parse_enum(key, value, VolumeCondition::from_ordinal)?,
                "contingent_condition" => {
                    options.contingent_condition = parse_enum(key, value, ContingentCondition::from_ordinal)?
                }
                "min_volume" => options.min_volume = parse_i32(key, value)?,
                "request_id" => options.request_id = parse_i32(key, value)?,
                "stop_price" => options.stop_price = parse_f64(key, value)?,
                "is_auto_suspend" => options.is_auto_suspend = parse_bool(key, value)?,
                "user_force_close" => options.user_force_close = parse_bool(key, value)?,
                _ => tracing::debug!("ignore unknown order option {}", key),
            }
        }
        Ok(options)
    }

    pub fn with_order_price_type(mut self, order_price_type: OrderPriceType) -> Self {
        self.order_price_type = order_price_type;
        self
    }

    pub fn with_hedge_flag(mut self, hedge_flag: HedgeFlag) -> Self {
        self.hedge_flag = hedge_flag;
        self
    }

    pub fn with_time_condition(mut self, time_condition: TimeCondition) -> Self {
        self.time_condition = time_condition;
        self
    }

    pub fn with_volume_condition(mut self, volume_condition: VolumeCondition) -> Self {
        self.volume_condition = volume_condition;
        self
    }

    pub fn with_contingent_condition(mut self, contingent_condition: ContingentCondition, stop_price: f64) -> Self {
        self.contingent_condition = contingent_condition;
        self.stop_price = stop_price;
        self
    }

    pub fn with_min_volume(mut self, min_volume: i32) -> Self {
        self.min_volume = min_volume;
        self
    }

    pub fn with_request_id(mut self, request_id: i32) -> Self {
        self.request_id = request_id;
        self
    }
}

fn invalid(key: &str, reason: impl Into<String>) -> ClientError {
    ClientError::InvalidOption {
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn parse_enum<E: DeserializeOwned>(key: &str, value: &Value, from_ordinal: fn(i64) -> Option<E>) -> Result<E> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(from_ordinal)
            .ok_or_else(|| invalid(key, format!("unknown ordinal {}", n))),
        Value::String(_) => serde_json::from_value(value.clone()).map_err(|e| invalid(key, e.to_string())),
        other => Err(invalid(key, format!("expected name or ordinal, got {}", other))),
    }
}

fn parse_i32(key: &str, value: &Value) -> Result<i32> {
    value
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid(key, format!("expected integer, got {}", value)))
}

fn parse_f64(key: &str, value: &Value) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| invalid(key, format!("expected number, got {}", value)))
}

fn parse_bool(key: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| invalid(key, format!("expected bool, got {}", value)))
}
