//! Derived indicator set for a bar window.
//!
//! Everything is recomputed wholesale from the input sequence on every call;
//! no incremental state survives between calls. Each output series is
//! index-aligned with the input and uses `None` where the window has
//! insufficient history, never as an error marker. Total for every input,
//! including the empty sequence.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stddev;

use crate::domain::bar::Bar;
use crate::domain::pattern::{detect_patterns, PatternHint};
use serde::Serialize;

pub const MA_FAST_PERIOD: usize = 7;
pub const MA_SLOW_PERIOD: usize = 25;
pub const EMA_PERIOD: usize = 20;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_WIDTH: f64 = 2.0;
pub const RSI_PERIOD: usize = 14;
pub const LEVEL_WINDOW: usize = 80;

/// Full derived indicator state for one bar window.
///
/// Serializes with `None` as JSON null so consumers keep the aligned
/// nullable-array shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub ma7: Vec<Option<f64>>,
    pub ma25: Vec<Option<f64>>,
    pub ema20: Vec<Option<f64>>,
    pub boll_mid: Vec<Option<f64>>,
    pub boll_upper: Vec<Option<f64>>,
    pub boll_lower: Vec<Option<f64>>,
    pub rsi14: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_hist: Vec<Option<f64>>,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    pub hints: Vec<PatternHint>,
}

pub fn compute_indicators(bars: &[Bar]) -> IndicatorSet {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let ma7 = sma::sma(&closes, MA_FAST_PERIOD);
    let ma25 = sma::sma(&closes, MA_SLOW_PERIOD);
    let ema20: Vec<Option<f64>> = ema::ema(&closes, EMA_PERIOD).into_iter().map(Some).collect();

    let boll_mid = sma::sma(&closes, BOLLINGER_PERIOD);
    let boll_std = stddev::stddev(&closes, BOLLINGER_PERIOD, &boll_mid);
    let boll_upper: Vec<Option<f64>> = boll_mid
        .iter()
        .zip(&boll_std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m + BOLLINGER_WIDTH * s),
            _ => None,
        })
        .collect();
    let boll_lower: Vec<Option<f64>> = boll_mid
        .iter()
        .zip(&boll_std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - BOLLINGER_WIDTH * s),
            _ => None,
        })
        .collect();

    let rsi14 = rsi::rsi(&closes, RSI_PERIOD);
    let macd_series = macd::macd_default(&closes);

    let (support, resistance) = support_resistance(bars);
    let hints = detect_patterns(bars, support, resistance);

    IndicatorSet {
        ma7,
        ma25,
        ema20,
        boll_mid,
        boll_upper,
        boll_lower,
        rsi14,
        macd: macd_series.line,
        macd_signal: macd_series.signal,
        macd_hist: macd_series.histogram,
        support,
        resistance,
        hints,
    }
}

/// Support = lowest low, resistance = highest high, both over the trailing
/// [`LEVEL_WINDOW`] bars (or the whole window when shorter).
pub fn support_resistance(bars: &[Bar]) -> (Option<f64>, Option<f64>) {
    let window = if bars.len() > LEVEL_WINDOW {
        &bars[bars.len() - LEVEL_WINDOW..]
    } else {
        bars
    };

    if window.is_empty() {
        return (None, None);
    }

    let support = window.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let resistance = window
        .iter()
        .map(|b| b.high)
        .fold(f64::NEG_INFINITY, f64::max);

    (Some(support), Some(resistance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn make_bar(i: usize, close: f64) -> Bar {
        Bar {
            time: 1_700_000_000_000 + i as i64 * 60_000,
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000.0,
        }
    }

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| make_bar(i, c))
            .collect()
    }

    #[test]
    fn all_series_match_input_length() {
        for n in [0usize, 1, 5, 14, 19, 25, 26, 80, 120] {
            let bars = make_bars(&vec![100.0; n]);
            let set = compute_indicators(&bars);

            assert_eq!(set.ma7.len(), n);
            assert_eq!(set.ma25.len(), n);
            assert_eq!(set.ema20.len(), n);
            assert_eq!(set.boll_mid.len(), n);
            assert_eq!(set.boll_upper.len(), n);
            assert_eq!(set.boll_lower.len(), n);
            assert_eq!(set.rsi14.len(), n);
            assert_eq!(set.macd.len(), n);
            assert_eq!(set.macd_signal.len(), n);
            assert_eq!(set.macd_hist.len(), n);
        }
    }

    #[test]
    fn empty_input_degrades_to_empty_set() {
        let set = compute_indicators(&[]);

        assert!(set.ma7.is_empty());
        assert_eq!(set.support, None);
        assert_eq!(set.resistance, None);
        assert!(set.hints.is_empty());
    }

    #[test]
    fn warmup_prefixes() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let set = compute_indicators(&make_bars(&closes));

        assert_eq!(set.ma7[5], None);
        assert!(set.ma7[6].is_some());
        assert_eq!(set.ma25[23], None);
        assert!(set.ma25[24].is_some());
        assert_eq!(set.boll_mid[18], None);
        assert!(set.boll_mid[19].is_some());
        assert_eq!(set.rsi14[13], None);
        assert!(set.rsi14[14].is_some());
        // EMA and MACD have no warmup gap.
        assert!(set.ema20[0].is_some());
        assert!(set.macd[0].is_some());
    }

    #[test]
    fn bollinger_bands_bracket_the_mid() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + (i % 5) as f64).collect();
        let set = compute_indicators(&make_bars(&closes));

        for i in 19..25 {
            let mid = set.boll_mid[i].unwrap();
            let upper = set.boll_upper[i].unwrap();
            let lower = set.boll_lower[i].unwrap();
            assert!(upper >= mid);
            assert!(lower <= mid);
            // Bands are symmetric around the mid.
            assert_relative_eq!(upper - mid, mid - lower, epsilon = 1e-9);
        }
    }

    #[test]
    fn bollinger_null_propagates() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let set = compute_indicators(&make_bars(&closes));

        for i in 0..10 {
            assert_eq!(set.boll_upper[i], None);
            assert_eq!(set.boll_lower[i], None);
        }
    }

    #[test]
    fn support_resistance_over_short_window() {
        let bars = vec![
            Bar {
                time: 0,
                open: 15.0,
                high: 20.0,
                low: 10.0,
                close: 15.0,
                volume: 1.0,
            },
            Bar {
                time: 1,
                open: 15.0,
                high: 30.0,
                low: 5.0,
                close: 15.0,
                volume: 1.0,
            },
        ];

        let (support, resistance) = support_resistance(&bars);
        assert_eq!(support, Some(5.0));
        assert_eq!(resistance, Some(30.0));
    }

    #[test]
    fn support_resistance_uses_trailing_80_bars() {
        // A deep low outside the trailing window must not count.
        let mut bars = vec![Bar {
            time: 0,
            open: 100.0,
            high: 100.0,
            low: 1.0,
            close: 100.0,
            volume: 1.0,
        }];
        bars.extend((1..=LEVEL_WINDOW).map(|i| make_bar(i, 100.0)));

        let (support, resistance) = support_resistance(&bars);
        assert_eq!(support, Some(99.0));
        assert_eq!(resistance, Some(101.0));
    }

    #[test]
    fn macd_histogram_identity() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + (i % 7) as f64).collect();
        let set = compute_indicators(&make_bars(&closes));

        for i in 0..40 {
            let expected = set.macd[i].unwrap() - set.macd_signal[i].unwrap();
            assert_relative_eq!(set.macd_hist[i].unwrap(), expected);
        }
    }
}
