//! OHLCV bar representation.

use serde::{Deserialize, Serialize};

/// One OHLCV sample.
///
/// `time` is epoch milliseconds and must be non-decreasing across a
/// sequence. Numeric fields are not validated here: a non-finite or
/// negative value is the feeder's responsibility and propagates NaN
/// through downstream arithmetic rather than being coerced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// close > open
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// close < open
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }
}
