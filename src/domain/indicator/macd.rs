//! MACD (Moving Average Convergence Divergence).
//!
//! Line = EMA(fast) - EMA(slow); both component EMAs are seeded with the raw
//! first value, so the line is defined from index 0.
//!
//! Signal = EMA(signal_period) of the line, computed over a zero-filled copy
//! of the line and then re-masked by the line's own nullity. Today the line
//! is never null and the mask passes everything through; the construction is
//! kept so a variant whose line has a warmup gap keeps the same signal
//! semantics. Histogram = line - signal.
//!
//! Default parameters: fast=12, slow=26, signal=9.

use crate::domain::indicator::ema::ema;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_period: usize) -> MacdSeries {
    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let line: Vec<Option<f64>> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| Some(f - s))
        .collect();

    let zero_filled: Vec<f64> = line.iter().map(|v| v.unwrap_or(0.0)).collect();
    let signal_raw = ema(&zero_filled, signal_period);

    let signal: Vec<Option<f64>> = line
        .iter()
        .zip(&signal_raw)
        .map(|(l, &s)| l.map(|_| s))
        .collect();

    let histogram: Vec<Option<f64>> = line
        .iter()
        .zip(&signal)
        .map(|(l, s)| match (l, s) {
            (Some(l), Some(s)) => Some(l - s),
            _ => None,
        })
        .collect();

    MacdSeries {
        line,
        signal,
        histogram,
    }
}

pub fn macd_default(closes: &[f64]) -> MacdSeries {
    macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
