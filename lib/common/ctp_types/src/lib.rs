//! 期货柜台 SDK 的数据载体
//!
//! 只包含纯数据结构和报单枚举，不含任何业务逻辑。
//! 字段只保留宿主侧会用到的部分，结构体与 SDK 原生结构体之间的逐字段转换由 FFI 层负责。

pub mod enums;
pub mod fields;

pub use enums::{
    ContingentCondition, Direction, HedgeFlag, OffsetFlag, OrderActionFlag, OrderActionStatus,
    OrderPriceType, OrderStatus, OrderSubmitStatus, TimeCondition, VolumeCondition,
};
pub use fields::{
    DepthMarketData, InputOrder, InputOrderAction, InvestorPosition, InvestorPositionDetail,
    Order, OrderAction, QryDepthMarketData, QryInvestorPosition, QryInvestorPositionDetail,
    QryOrder, QryTrade, QryTradingAccount, ReqUserLogin, RspInfo, RspUserLogin,
    SettlementInfoConfirm, SpecificInstrument, Trade, TradingAccount, UserLogout,
};
