//! External collaborators: market data, charts, notifications, execution and
//! signal sinks.

pub mod chart;
pub mod execution;
pub mod market_data;
pub mod notify;
pub mod sink;

pub use chart::{ChartRenderer, NoopChartRenderer};
pub use execution::{ExecutionError, LoggingTradeExecutor, TradeExecutor};
pub use market_data::{
    CandleSource, FeedConnector, FeedSession, JsonFileConnector, JsonFileSession,
    MarketDataError, ReconnectingFeed,
};
pub use notify::{notification_message, should_notify, Notifier, NotifierSet, NotifyError, TracingNotifier};
pub use sink::{InMemorySignalBoard, SignalSink};
