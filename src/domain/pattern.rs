//! Candlestick pattern hints over the tail of a bar window.
//!
//! Detection order is fixed: trend, then engulfing, then breakout/retest;
//! the result is truncated to [`MAX_HINTS`]. Trend predicates are non-strict
//! on both sides, so a perfectly flat six-bar window reports both an uptrend
//! and a downtrend; that ambiguity is deliberate and preserved.

use crate::domain::bar::Bar;
use serde::Serialize;
use std::fmt;

pub const MAX_HINTS: usize = 4;

const TREND_WINDOW: usize = 6;
const BREAKOUT_TOLERANCE: f64 = 0.995;
const RETEST_TOLERANCE: f64 = 1.005;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternHint {
    Uptrend,
    Downtrend,
    BullishEngulfing,
    BearishEngulfing,
    ResistanceBreakoutTest,
    SupportRetest,
}

impl fmt::Display for PatternHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternHint::Uptrend => "uptrend",
            PatternHint::Downtrend => "downtrend",
            PatternHint::BullishEngulfing => "bullish_engulfing",
            PatternHint::BearishEngulfing => "bearish_engulfing",
            PatternHint::ResistanceBreakoutTest => "resistance_breakout_test",
            PatternHint::SupportRetest => "support_retest",
        };
        f.write_str(name)
    }
}

/// Evaluate all hint predicates against the tail of `bars`.
///
/// `support`/`resistance` are the aggregator's trailing-window levels; a
/// missing resistance defaults to +inf (breakout test can never fire) and a
/// missing support defaults to 0 (retest can never fire on positive closes).
pub fn detect_patterns(
    bars: &[Bar],
    support: Option<f64>,
    resistance: Option<f64>,
) -> Vec<PatternHint> {
    let mut hints = Vec::new();

    if bars.len() >= TREND_WINDOW {
        let tail = &bars[bars.len() - TREND_WINDOW..];

        if tail
            .windows(2)
            .all(|w| w[1].high >= w[0].high && w[1].low >= w[0].low)
        {
            hints.push(PatternHint::Uptrend);
        }
        if tail
            .windows(2)
            .all(|w| w[1].high <= w[0].high && w[1].low <= w[0].low)
        {
            hints.push(PatternHint::Downtrend);
        }
    }

    if bars.len() >= 2 {
        let c1 = &bars[bars.len() - 2];
        let c2 = &bars[bars.len() - 1];

        if c1.is_bearish() && c2.is_bullish() && c2.open <= c1.close && c2.close >= c1.open {
            hints.push(PatternHint::BullishEngulfing);
        }
        if c1.is_bullish() && c2.is_bearish() && c2.open >= c1.close && c2.close <= c1.open {
            hints.push(PatternHint::BearishEngulfing);
        }

        if c2.close > resistance.unwrap_or(f64::INFINITY) * BREAKOUT_TOLERANCE {
            hints.push(PatternHint::ResistanceBreakoutTest);
        }
        if c2.close < support.unwrap_or(0.0) * RETEST_TOLERANCE {
            hints.push(PatternHint::SupportRetest);
        }
    }

    hints.truncate(MAX_HINTS);
    hints
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            time: 0,
            open,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    fn trending_bars(n: usize, step: f64) -> Vec<Bar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64 * step;
                bar(base, base + 1.0, base - 1.0, base + step / 2.0)
            })
            .collect()
    }

    #[test]
    fn uptrend_on_rising_highs_and_lows() {
        let hints = detect_patterns(&trending_bars(6, 1.0), None, None);
        assert!(hints.contains(&PatternHint::Uptrend));
        assert!(!hints.contains(&PatternHint::Downtrend));
    }

    #[test]
    fn downtrend_on_falling_highs_and_lows() {
        let hints = detect_patterns(&trending_bars(6, -1.0), None, None);
        assert!(hints.contains(&PatternHint::Downtrend));
        assert!(!hints.contains(&PatternHint::Uptrend));
    }

    #[test]
    fn flat_window_reports_both_trends() {
        let bars: Vec<Bar> = (0..6).map(|_| bar(100.0, 101.0, 99.0, 100.0)).collect();
        let hints = detect_patterns(&bars, None, None);

        assert_eq!(hints[0], PatternHint::Uptrend);
        assert_eq!(hints[1], PatternHint::Downtrend);
    }

    #[test]
    fn no_trend_hints_below_six_bars() {
        let hints = detect_patterns(&trending_bars(5, 1.0), None, None);
        assert!(!hints.contains(&PatternHint::Uptrend));
        assert!(!hints.contains(&PatternHint::Downtrend));
    }

    #[test]
    fn bullish_engulfing_fixture() {
        let bars = vec![bar(10.0, 10.5, 7.5, 8.0), bar(7.0, 11.5, 6.5, 11.0)];
        let hints = detect_patterns(&bars, None, None);
        assert!(hints.contains(&PatternHint::BullishEngulfing));
    }

    #[test]
    fn bearish_engulfing_fixture() {
        let bars = vec![bar(8.0, 10.5, 7.5, 10.0), bar(11.0, 11.5, 6.5, 7.0)];
        let hints = detect_patterns(&bars, None, None);
        assert!(hints.contains(&PatternHint::BearishEngulfing));
    }

    #[test]
    fn engulfing_requires_body_cover() {
        // c2 body does not reach down to c1 close.
        let bars = vec![bar(10.0, 10.5, 7.5, 8.0), bar(9.0, 11.5, 8.5, 11.0)];
        let hints = detect_patterns(&bars, None, None);
        assert!(!hints.contains(&PatternHint::BullishEngulfing));
    }

    #[test]
    fn breakout_test_near_resistance() {
        let bars = vec![bar(100.0, 101.0, 99.0, 100.0), bar(100.0, 120.0, 99.0, 119.5)];
        let hints = detect_patterns(&bars, Some(90.0), Some(120.0));
        assert!(hints.contains(&PatternHint::ResistanceBreakoutTest));
    }

    #[test]
    fn breakout_never_fires_without_resistance() {
        let bars = vec![bar(100.0, 101.0, 99.0, 100.0), bar(100.0, 120.0, 99.0, 119.5)];
        let hints = detect_patterns(&bars, None, None);
        assert!(!hints.contains(&PatternHint::ResistanceBreakoutTest));
    }

    #[test]
    fn support_retest_near_support() {
        let bars = vec![bar(100.0, 101.0, 99.0, 100.0), bar(100.0, 101.0, 89.0, 90.2)];
        let hints = detect_patterns(&bars, Some(90.0), Some(120.0));
        assert!(hints.contains(&PatternHint::SupportRetest));
    }

    #[test]
    fn retest_never_fires_without_support() {
        let bars = vec![bar(100.0, 101.0, 99.0, 100.0), bar(100.0, 101.0, 89.0, 90.2)];
        let hints = detect_patterns(&bars, None, None);
        assert!(!hints.contains(&PatternHint::SupportRetest));
    }

    #[test]
    fn hints_capped_at_four() {
        // Flat high/low window (both trends) + bullish engulfing close +
        // both level proximities = five candidates; the cap keeps four.
        let mut bars: Vec<Bar> = (0..4).map(|_| bar(100.0, 101.0, 99.0, 100.0)).collect();
        bars.push(bar(100.5, 101.0, 99.0, 100.0));
        bars.push(bar(99.5, 101.0, 99.0, 100.5));

        let hints = detect_patterns(&bars, Some(100.6), Some(100.0));
        assert_eq!(hints.len(), MAX_HINTS);
        assert_eq!(
            hints,
            vec![
                PatternHint::Uptrend,
                PatternHint::Downtrend,
                PatternHint::BullishEngulfing,
                PatternHint::ResistanceBreakoutTest,
            ]
        );
    }

    #[test]
    fn single_bar_yields_nothing() {
        let hints = detect_patterns(&[bar(10.0, 11.0, 9.0, 10.5)], Some(9.0), Some(11.0));
        assert!(hints.is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(detect_patterns(&[], None, None).is_empty());
    }

    #[test]
    fn display_names_are_snake_case() {
        assert_eq!(PatternHint::BullishEngulfing.to_string(), "bullish_engulfing");
        assert_eq!(
            PatternHint::ResistanceBreakoutTest.to_string(),
            "resistance_breakout_test"
        );
    }
}
