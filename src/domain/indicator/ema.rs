//! Exponential Moving Average.
//!
//! k = 2/(n+1), seeded with the raw first value (NOT an SMA of the first n
//! samples), then EMA[i] = values[i]*k + EMA[i-1]*(1-k).
//!
//! Defined for every index from 0; no warmup gap. Empty input yields empty
//! output.

pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut prev = values[0];
    out.push(prev);

    for &v in &values[1..] {
        prev = v * k + prev * (1.0 - k);
        out.push(prev);
    }

    out
}
