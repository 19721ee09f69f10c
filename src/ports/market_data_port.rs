//! Market data access port.
//!
//! The indicator/chart core never touches a transport; it consumes ordered
//! bar sequences produced by an implementation of this trait (REST polling,
//! WebSocket push, or file replay all look the same from here).

use crate::domain::bar::Bar;
use crate::domain::error::FinchartError;

pub trait MarketDataPort {
    /// At most `limit` most-recent bars for a symbol/interval pair,
    /// ascending by time.
    fn fetch_bars(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Bar>, FinchartError>;

    fn list_symbols(&self) -> Result<Vec<String>, FinchartError>;

    /// First/last bar time (epoch ms) and bar count, or `None` when the
    /// symbol has no stored data.
    fn data_range(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Option<(i64, i64, usize)>, FinchartError>;
}
