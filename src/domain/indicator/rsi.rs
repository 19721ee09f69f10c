//! Relative Strength Index with Wilder smoothing.
//!
//! First average gain/loss: unweighted mean of up/down moves over the first
//! n price changes. First RSI lands at index n; Wilder smoothing after:
//! avg = (prev_avg * (n-1) + current) / n.
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss); avg_loss == 0 yields 100
//! (defined, not an error). Inputs of length <= n carry no values at all.

pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 || values.len() <= period {
        return vec![None; values.len()];
    }

    let mut out = vec![None; values.len()];

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let diff = values[i] - values[i - 1];
        if diff > 0.0 {
            avg_gain += diff;
        } else {
            avg_loss += -diff;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    out[period] = Some(rsi_value(avg_gain, avg_loss));

    for i in period + 1..values.len() {
        let diff = values[i] - values[i - 1];
        let up = diff.max(0.0);
        let down = (-diff).max(0.0);

        avg_gain = (avg_gain * (period as f64 - 1.0) + up) / period as f64;
        avg_loss = (avg_loss * (period as f64 - 1.0) + down) / period as f64;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }

    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
