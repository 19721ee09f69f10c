//! CSV file bar-replay adapter.
//!
//! Serves `{SYMBOL}_{interval}.csv` files from a base directory with the
//! column layout `time,open,high,low,close,volume` (`time` in epoch
//! milliseconds). Rows are sorted ascending by time and truncated to the
//! requested tail.

use crate::domain::bar::Bar;
use crate::domain::error::FinchartError;
use crate::ports::market_data_port::MarketDataPort;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, interval: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", symbol, interval))
    }

    fn read_all(&self, symbol: &str, interval: &str) -> Result<Vec<Bar>, FinchartError> {
        let path = self.csv_path(symbol, interval);
        let content = fs::read_to_string(&path).map_err(|e| FinchartError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| FinchartError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let field = |idx: usize, name: &str| {
                record
                    .get(idx)
                    .ok_or_else(|| FinchartError::Data {
                        reason: format!("missing {} column", name),
                    })
                    .map(str::trim)
            };

            let time: i64 = field(0, "time")?.parse().map_err(|e| FinchartError::Data {
                reason: format!("invalid time value: {}", e),
            })?;
            let open: f64 = field(1, "open")?.parse().map_err(|e| FinchartError::Data {
                reason: format!("invalid open value: {}", e),
            })?;
            let high: f64 = field(2, "high")?.parse().map_err(|e| FinchartError::Data {
                reason: format!("invalid high value: {}", e),
            })?;
            let low: f64 = field(3, "low")?.parse().map_err(|e| FinchartError::Data {
                reason: format!("invalid low value: {}", e),
            })?;
            let close: f64 = field(4, "close")?.parse().map_err(|e| FinchartError::Data {
                reason: format!("invalid close value: {}", e),
            })?;
            let volume: f64 = field(5, "volume")?
                .parse()
                .map_err(|e| FinchartError::Data {
                    reason: format!("invalid volume value: {}", e),
                })?;

            bars.push(Bar {
                time,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.time);
        Ok(bars)
    }
}

impl MarketDataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Bar>, FinchartError> {
        let mut bars = self.read_all(symbol, interval)?;
        if bars.len() > limit {
            bars.drain(..bars.len() - limit);
        }
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, FinchartError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| FinchartError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FinchartError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(stem) = name_str.strip_suffix(".csv") {
                if let Some((symbol, _interval)) = stem.rsplit_once('_') {
                    if !symbol.is_empty() {
                        symbols.push(symbol.to_string());
                    }
                }
            }
        }

        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn data_range(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Option<(i64, i64, usize)>, FinchartError> {
        let bars = self.read_all(symbol, interval)?;
        Ok(match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Some((first.time, last.time, bars.len())),
            _ => None,
        })
    }
}
