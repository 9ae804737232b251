//! 报单相关枚举
//!
//! 每个枚举同时带两套编码：
//! - 序号（ordinal）：宿主侧使用的整数取值，与枚举声明顺序一致
//! - SDK 字符编码（ftdc code）：写进 SDK 请求结构体的单字节取值

macro_rules! ftdc_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $ordinal:literal => $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $ordinal, )+
        }

        impl $name {
            /// 全部取值，按序号排列
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn from_ordinal(ordinal: i64) -> Option<Self> {
                match ordinal {
                    $( $ordinal => Some($name::$variant), )+
                    _ => None,
                }
            }

            pub fn ordinal(self) -> u8 {
                self as u8
            }

            pub fn ftdc_code(self) -> u8 {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            pub fn from_ftdc_code(code: u8) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

ftdc_enum! {
    /// 买卖方向
    pub enum Direction {
        Buy = 0 => b'0',
        Sell = 1 => b'1',
    }
}

ftdc_enum! {
    /// 开平标志
    pub enum OffsetFlag {
        Open = 0 => b'0',
        Close = 1 => b'1',
        ForceClose = 2 => b'2',
        /// 平今
        CloseToday = 3 => b'3',
        /// 平昨
        CloseYesterday = 4 => b'4',
        ForceOff = 5 => b'5',
        LocalForceClose = 6 => b'6',
    }
}

ftdc_enum! {
    /// 报单价格条件
    pub enum OrderPriceType {
        AnyPrice = 0 => b'1',
        LimitPrice = 1 => b'2',
        BestPrice = 2 => b'3',
        LastPrice = 3 => b'4',
        LastPricePlusOneTick = 4 => b'5',
        LastPricePlusTwoTicks = 5 => b'6',
        LastPricePlusThreeTicks = 6 => b'7',
        AskPrice1 = 7 => b'8',
        AskPrice1PlusOneTick = 8 => b'9',
        AskPrice1PlusTwoTicks = 9 => b'A',
        AskPrice1PlusThreeTicks = 10 => b'B',
        BidPrice1 = 11 => b'C',
        BidPrice1PlusOneTick = 12 => b'D',
        BidPrice1PlusTwoTicks = 13 => b'E',
        BidPrice1PlusThreeTicks = 14 => b'F',
        FiveLevelPrice = 15 => b'G',
    }
}

ftdc_enum! {
    /// 投机套保标志
    pub enum HedgeFlag {
        Speculation = 0 => b'1',
        Arbitrage = 1 => b'2',
        Hedge = 2 => b'3',
        MarketMaker = 3 => b'5',
    }
}

ftdc_enum! {
    /// 有效期类型
    pub enum TimeCondition {
        /// 立即完成，否则撤销
        Ioc = 0 => b'1',
        /// 本节有效
        Gfs = 1 => b'2',
        /// 当日有效
        Gfd = 2 => b'3',
        /// 指定日期前有效
        Gtd = 3 => b'4',
        /// 撤销前有效
        Gtc = 4 => b'5',
        /// 集合竞价有效
        Gfa = 5 => b'6',
    }
}

ftdc_enum! {
    /// 成交量类型
    pub enum VolumeCondition {
        AnyVolume = 0 => b'1',
        MinVolume = 1 => b'2',
        CompleteVolume = 2 => b'3',
    }
}

ftdc_enum! {
    /// 触发条件
    pub enum ContingentCondition {
        Immediately = 0 => b'1',
        Touch = 1 => b'2',
        TouchProfit = 2 => b'3',
        /// 预埋单
        ParkedOrder = 3 => b'4',
        LastPriceGreaterThanStopPrice = 4 => b'5',
        LastPriceGreaterEqualStopPrice = 5 => b'6',
        LastPriceLesserThanStopPrice = 6 => b'7',
        LastPriceLesserEqualStopPrice = 7 => b'8',
        AskPriceGreaterThanStopPrice = 8 => b'9',
        AskPriceGreaterEqualStopPrice = 9 => b'A',
        AskPriceLesserThanStopPrice = 10 => b'B',
        AskPriceLesserEqualStopPrice = 11 => b'C',
        BidPriceGreaterThanStopPrice = 12 => b'D',
        BidPriceGreaterEqualStopPrice = 13 => b'E',
        BidPriceLesserThanStopPrice = 14 => b'F',
        BidPriceLesserEqualStopPrice = 15 => b'H',
    }
}

ftdc_enum! {
    /// 操作标志
    pub enum OrderActionFlag {
        Delete = 0 => b'0',
        Modify = 1 => b'3',
    }
}

ftdc_enum! {
    /// 报单状态
    pub enum OrderStatus {
        AllTraded = 0 => b'0',
        PartTradedQueueing = 1 => b'1',
        PartTradedNotQueueing = 2 => b'2',
        NoTradeQueueing = 3 => b'3',
        NoTradeNotQueueing = 4 => b'4',
        Canceled = 5 => b'5',
        Unknown = 6 => b'a',
        NotTouched = 7 => b'b',
        Touched = 8 => b'c',
    }
}

ftdc_enum! {
    /// 报单提交状态
    pub enum OrderSubmitStatus {
        InsertSubmitted = 0 => b'0',
        CancelSubmitted = 1 => b'1',
        ModifySubmitted = 2 => b'2',
        Accepted = 3 => b'3',
        InsertRejected = 4 => b'4',
        CancelRejected = 5 => b'5',
        ModifyRejected = 6 => b'6',
    }
}

ftdc_enum! {
    /// 报单操作状态
    pub enum OrderActionStatus {
        Submitted = 0 => b'a',
        Accepted = 1 => b'b',
        Rejected = 2 => b'c',
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::Buy
    }
}

impl Default for OffsetFlag {
    fn default() -> Self {
        Self::Open
    }
}

impl Default for OrderActionFlag {
    fn default() -> Self {
        Self::Delete
    }
}

impl Default for OrderActionStatus {
    fn default() -> Self {
        Self::Submitted
    }
}

impl Default for OrderPriceType {
    fn default() -> Self {
        Self::LimitPrice
    }
}

impl Default for HedgeFlag {
    fn default() -> Self {
        Self::Speculation
    }
}

impl Default for TimeCondition {
    fn default() -> Self {
        Self::Gfd
    }
}

impl Default for VolumeCondition {
    fn default() -> Self {
        Self::AnyVolume
    }
}

impl Default for ContingentCondition {
    fn default() -> Self {
        Self::Immediately
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl Default for OrderSubmitStatus {
    fn default() -> Self {
        Self::InsertSubmitted
    }
}

impl OrderStatus {
    /// 是否已经离开交易所队列，不会再有新的成交
    pub fn is_finished(self) -> bool {
        matches!(self, OrderStatus::AllTraded | OrderStatus::Canceled | OrderStatus::PartTradedNotQueueing | OrderStatus::NoTradeNotQueueing)
    }
}
