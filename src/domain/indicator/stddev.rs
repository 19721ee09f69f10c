//! Rolling standard deviation.
//!
//! Population standard deviation (divide by n, not n-1) over the trailing
//! n-sample window, evaluated against a precomputed per-index mean series
//! aligned to the input (normally the SMA at the same period). Indices with
//! insufficient history or a missing mean carry no value.

pub fn stddev(values: &[f64], period: usize, means: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if period == 0 || i + 1 < period {
            out.push(None);
            continue;
        }

        let mean = match means.get(i).copied().flatten() {
            Some(m) => m,
            None => {
                out.push(None);
                continue;
            }
        };

        let window = &values[i + 1 - period..=i];
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;

        out.push(Some(variance.sqrt()));
    }

    out
}
