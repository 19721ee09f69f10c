#![allow(dead_code)]

use finchart::domain::error::FinchartError;
use finchart::ports::market_data_port::MarketDataPort;
use std::collections::HashMap;

pub use finchart::domain::bar::Bar;

pub const MINUTE_MS: i64 = 60_000;
pub const BASE_TIME: i64 = 1_700_000_000_000;

pub struct MockMarketDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockMarketDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl MarketDataPort for MockMarketDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        _interval: &str,
        limit: usize,
    ) -> Result<Vec<Bar>, FinchartError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(FinchartError::Data {
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(symbol).cloned().unwrap_or_default();
        if bars.len() > limit {
            bars.drain(..bars.len() - limit);
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, FinchartError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
        _interval: &str,
    ) -> Result<Option<(i64, i64, usize)>, FinchartError> {
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => Ok(Some((
                bars[0].time,
                bars[bars.len() - 1].time,
                bars.len(),
            ))),
            _ => Ok(None),
        }
    }
}

pub fn make_bar(i: usize, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
    Bar {
        time: BASE_TIME + i as i64 * MINUTE_MS,
        open,
        high,
        low,
        close,
        volume,
    }
}

/// close = start + i, high = close + 1, low = close - 1, constant volume.
pub fn rising_bars(n: usize, start: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| {
            let close = start + i as f64;
            make_bar(i, close, close + 1.0, close - 1.0, close, 1000.0)
        })
        .collect()
}

/// Constant OHLC at `price`.
pub fn flat_bars(n: usize, price: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| make_bar(i, price, price, price, price, 1000.0))
        .collect()
}
