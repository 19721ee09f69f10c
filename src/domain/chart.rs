//! Chart geometry for a bar window and its indicator set.
//!
//! Pure mapping from price/volume space onto pixel space: candle bodies and
//! wicks, OHLC ticks, a close-price line path, indicator overlay paths, a
//! volume sub-panel, and horizontal reference levels. Recomputed wholesale
//! on every call; identical inputs produce byte-identical output.

use crate::domain::bar::Bar;
use crate::domain::error::FinchartError;
use crate::domain::indicator::IndicatorSet;
use std::fmt;
use std::str::FromStr;

/// Floor for the price range so a flat window never divides by zero.
pub const PRICE_RANGE_EPSILON: f64 = 1e-9;

const BODY_WIDTH_FRACTION: f64 = 0.58;
const MIN_BODY_WIDTH: f64 = 2.0;
const MIN_BODY_HEIGHT: f64 = 1.5;
const VOLUME_PANEL_FRACTION: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    Candlestick,
    Line,
    Bar,
}

impl FromStr for ChartStyle {
    type Err = FinchartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "candlestick" => Ok(ChartStyle::Candlestick),
            "line" => Ok(ChartStyle::Line),
            "bar" => Ok(ChartStyle::Bar),
            _ => Err(FinchartError::InvalidChartStyle { value: s.into() }),
        }
    }
}

impl fmt::Display for ChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartStyle::Candlestick => "candlestick",
            ChartStyle::Line => "line",
            ChartStyle::Bar => "bar",
        };
        f.write_str(name)
    }
}

/// Style, overlay toggles, and manual reference levels for one render.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub style: ChartStyle,
    pub show_volume: bool,
    pub show_ma7: bool,
    pub show_ma25: bool,
    pub show_ema20: bool,
    pub show_bollinger: bool,
    pub show_support_resistance: bool,
    pub manual_support: Option<f64>,
    pub manual_resistance: Option<f64>,
    pub manual_growth_target: Option<f64>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            style: ChartStyle::Candlestick,
            show_volume: true,
            show_ma7: false,
            show_ma25: false,
            show_ema20: false,
            show_bollinger: false,
            show_support_resistance: false,
            manual_support: None,
            manual_resistance: None,
            manual_growth_target: None,
        }
    }
}

/// Canvas dimensions. The plot area is the canvas minus padding on every
/// side; the volume panel, when shown, reserves the bottom fifth of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
            padding: 40.0,
        }
    }
}

impl ChartLayout {
    fn plot_width(&self) -> f64 {
        self.width - 2.0 * self.padding
    }

    fn plot_height(&self) -> f64 {
        self.height - 2.0 * self.padding
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandleShape {
    pub x: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub body_width: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub bullish: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcTick {
    pub x: f64,
    pub y_high: f64,
    pub y_low: f64,
    pub y_open: f64,
    pub y_close: f64,
    pub half_width: f64,
    pub bullish: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeBar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub bullish: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKind {
    Ma7,
    Ma25,
    Ema20,
    BollUpper,
    BollMid,
    BollLower,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySeries {
    pub kind: OverlayKind,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelKind {
    Support,
    Resistance,
    ManualSupport,
    ManualResistance,
    GrowthTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LevelLine {
    pub kind: LevelKind,
    pub price: f64,
    pub y: f64,
}

/// Drawable output of one render call. Owned by the caller; never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub style: ChartStyle,
    pub candles: Vec<CandleShape>,
    pub ticks: Vec<OhlcTick>,
    pub close_path: Option<String>,
    pub overlays: Vec<OverlaySeries>,
    pub volume: Vec<VolumeBar>,
    pub levels: Vec<LevelLine>,
}

/// Pixel-space scale for one bar window.
struct PriceScale {
    max_high: f64,
    price_range: f64,
    top: f64,
    price_height: f64,
    left: f64,
    step: f64,
}

impl PriceScale {
    fn new(bars: &[Bar], config: &ChartConfig, layout: &ChartLayout) -> Self {
        let max_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let min_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);

        let price_height = if config.show_volume {
            layout.plot_height() * (1.0 - VOLUME_PANEL_FRACTION)
        } else {
            layout.plot_height()
        };

        Self {
            max_high,
            price_range: (max_high - min_low).max(PRICE_RANGE_EPSILON),
            top: layout.padding,
            price_height,
            left: layout.padding,
            step: layout.plot_width() / bars.len() as f64,
        }
    }

    fn y(&self, price: f64) -> f64 {
        self.top + ((self.max_high - price) / self.price_range) * self.price_height
    }

    fn x(&self, index: usize) -> f64 {
        self.left + index as f64 * self.step + self.step / 2.0
    }

    fn body_width(&self) -> f64 {
        (self.step * BODY_WIDTH_FRACTION).max(MIN_BODY_WIDTH)
    }
}

/// Map a bar window and its indicators onto drawable geometry.
///
/// Returns `None` for an empty window: the caller supplies its own
/// empty-state placeholder.
pub fn render_chart(
    bars: &[Bar],
    indicators: &IndicatorSet,
    config: &ChartConfig,
    layout: &ChartLayout,
) -> Option<ChartGeometry> {
    if bars.is_empty() {
        return None;
    }

    let scale = PriceScale::new(bars, config, layout);

    let candles = if config.style == ChartStyle::Candlestick {
        bars.iter()
            .enumerate()
            .map(|(i, b)| candle_shape(i, b, &scale))
            .collect()
    } else {
        Vec::new()
    };

    let ticks = if config.style == ChartStyle::Bar {
        bars.iter()
            .enumerate()
            .map(|(i, b)| OhlcTick {
                x: scale.x(i),
                y_high: scale.y(b.high),
                y_low: scale.y(b.low),
                y_open: scale.y(b.open),
                y_close: scale.y(b.close),
                half_width: scale.body_width() / 2.0,
                bullish: b.close >= b.open,
            })
            .collect()
    } else {
        Vec::new()
    };

    let close_path = if config.style == ChartStyle::Line {
        let closes: Vec<Option<f64>> = bars.iter().map(|b| Some(b.close)).collect();
        series_path(&closes, &scale)
    } else {
        None
    };

    let mut overlays = Vec::new();
    if config.show_ma7 {
        push_overlay(&mut overlays, OverlayKind::Ma7, &indicators.ma7, &scale);
    }
    if config.show_ma25 {
        push_overlay(&mut overlays, OverlayKind::Ma25, &indicators.ma25, &scale);
    }
    if config.show_ema20 {
        push_overlay(&mut overlays, OverlayKind::Ema20, &indicators.ema20, &scale);
    }
    if config.show_bollinger {
        push_overlay(&mut overlays, OverlayKind::BollUpper, &indicators.boll_upper, &scale);
        push_overlay(&mut overlays, OverlayKind::BollMid, &indicators.boll_mid, &scale);
        push_overlay(&mut overlays, OverlayKind::BollLower, &indicators.boll_lower, &scale);
    }

    let volume = if config.show_volume {
        volume_bars(bars, &scale, layout)
    } else {
        Vec::new()
    };

    let mut levels = Vec::new();
    if config.show_support_resistance {
        push_level(&mut levels, LevelKind::Support, indicators.support, &scale);
        push_level(&mut levels, LevelKind::Resistance, indicators.resistance, &scale);
    }
    push_level(&mut levels, LevelKind::ManualSupport, config.manual_support, &scale);
    push_level(&mut levels, LevelKind::ManualResistance, config.manual_resistance, &scale);
    push_level(&mut levels, LevelKind::GrowthTarget, config.manual_growth_target, &scale);

    Some(ChartGeometry {
        style: config.style,
        candles,
        ticks,
        close_path,
        overlays,
        volume,
        levels,
    })
}

fn candle_shape(index: usize, bar: &Bar, scale: &PriceScale) -> CandleShape {
    let body_top = scale.y(bar.open.max(bar.close));
    let body_bottom = scale.y(bar.open.min(bar.close));

    CandleShape {
        x: scale.x(index),
        body_top,
        body_height: (body_bottom - body_top).max(MIN_BODY_HEIGHT),
        body_width: scale.body_width(),
        wick_top: scale.y(bar.high),
        wick_bottom: scale.y(bar.low),
        bullish: bar.close >= bar.open,
    }
}

/// Build an SVG-style path through an aligned series.
///
/// Null and non-finite entries are skipped without emitting a point: one
/// `M` for the first plottable point, `L` for every later one, and no
/// interpolation across gaps. `None` when nothing is plottable.
fn series_path(values: &[Option<f64>], scale: &PriceScale) -> Option<String> {
    let mut path = String::new();

    for (i, value) in values.iter().enumerate() {
        let v = match value {
            Some(v) if v.is_finite() => *v,
            _ => continue,
        };

        let command = if path.is_empty() { 'M' } else { 'L' };
        path.push_str(&format!(
            "{}{:.2} {:.2} ",
            command,
            scale.x(i),
            scale.y(v)
        ));
    }

    if path.is_empty() {
        None
    } else {
        path.truncate(path.len() - 1);
        Some(path)
    }
}

fn push_overlay(
    overlays: &mut Vec<OverlaySeries>,
    kind: OverlayKind,
    values: &[Option<f64>],
    scale: &PriceScale,
) {
    if let Some(path) = series_path(values, scale) {
        overlays.push(OverlaySeries { kind, path });
    }
}

fn push_level(levels: &mut Vec<LevelLine>, kind: LevelKind, price: Option<f64>, scale: &PriceScale) {
    if let Some(price) = price {
        if price.is_finite() {
            levels.push(LevelLine {
                kind,
                price,
                y: scale.y(price),
            });
        }
    }
}

fn volume_bars(bars: &[Bar], scale: &PriceScale, layout: &ChartLayout) -> Vec<VolumeBar> {
    let max_volume = bars.iter().map(|b| b.volume).fold(0.0_f64, f64::max);
    if max_volume <= 0.0 {
        return Vec::new();
    }

    let panel_height = layout.plot_height() * VOLUME_PANEL_FRACTION;
    let panel_bottom = layout.padding + layout.plot_height();
    let width = scale.body_width();

    bars.iter()
        .enumerate()
        .map(|(i, b)| {
            let height = (b.volume / max_volume) * panel_height;
            VolumeBar {
                x: scale.x(i),
                y: panel_bottom - height,
                width,
                height,
                bullish: b.close >= b.open,
            }
        })
        .collect()
}
