//! SVG document rendering for chart geometry.

use crate::domain::chart::{ChartGeometry, ChartLayout, LevelKind, OverlayKind};

const BULL_COLOR: &str = "#26a69a";
const BEAR_COLOR: &str = "#ef5350";

fn overlay_color(kind: OverlayKind) -> &'static str {
    match kind {
        OverlayKind::Ma7 => "#f0b90b",
        OverlayKind::Ma25 => "#e056fd",
        OverlayKind::Ema20 => "#3498db",
        OverlayKind::BollUpper | OverlayKind::BollMid | OverlayKind::BollLower => "#95a5a6",
    }
}

fn level_color(kind: LevelKind) -> &'static str {
    match kind {
        LevelKind::Support | LevelKind::ManualSupport => BULL_COLOR,
        LevelKind::Resistance | LevelKind::ManualResistance => BEAR_COLOR,
        LevelKind::GrowthTarget => "#f0b90b",
    }
}

/// Serialize one render's geometry into a standalone SVG document.
///
/// `None` geometry (empty bar window) yields a plain placeholder string
/// instead of markup.
pub fn format_chart_svg(geometry: Option<&ChartGeometry>, layout: &ChartLayout) -> String {
    let Some(geo) = geometry else {
        return "No chart data available.".to_string();
    };

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}">"#,
        w = layout.width,
        h = layout.height
    );
    svg.push('\n');
    svg.push_str(&format!(
        r##"<rect width="{:.0}" height="{:.0}" fill="#131722"/>"##,
        layout.width, layout.height
    ));
    svg.push('\n');

    for bar in &geo.volume {
        svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" opacity="0.35"/>"#,
            bar.x - bar.width / 2.0,
            bar.y,
            bar.width,
            bar.height,
            color_for(bar.bullish)
        ));
        svg.push('\n');
    }

    for candle in &geo.candles {
        let color = color_for(candle.bullish);
        svg.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{}" stroke-width="1"/>"#,
            candle.wick_top,
            candle.wick_bottom,
            color,
            x = candle.x
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            candle.x - candle.body_width / 2.0,
            candle.body_top,
            candle.body_width,
            candle.body_height,
            color
        ));
        svg.push('\n');
    }

    for tick in &geo.ticks {
        let color = color_for(tick.bullish);
        svg.push_str(&format!(
            r#"<line x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{}" stroke-width="1"/>"#,
            tick.y_high,
            tick.y_low,
            color,
            x = tick.x
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="1"/>"#,
            tick.x - tick.half_width,
            tick.x,
            color,
            y = tick.y_open
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="1"/>"#,
            tick.x,
            tick.x + tick.half_width,
            color,
            y = tick.y_close
        ));
        svg.push('\n');
    }

    if let Some(path) = &geo.close_path {
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="1.5"/>"#,
            path, BULL_COLOR
        ));
        svg.push('\n');
    }

    for overlay in &geo.overlays {
        svg.push_str(&format!(
            r#"<path d="{}" fill="none" stroke="{}" stroke-width="1"/>"#,
            overlay.path,
            overlay_color(overlay.kind)
        ));
        svg.push('\n');
    }

    for level in &geo.levels {
        svg.push_str(&format!(
            r#"<line x1="{:.2}" y1="{y:.2}" x2="{:.2}" y2="{y:.2}" stroke="{}" stroke-width="1" stroke-dasharray="4 3"/>"#,
            layout.padding,
            layout.width - layout.padding,
            level_color(level.kind),
            y = level.y
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    svg
}

fn color_for(bullish: bool) -> &'static str {
    if bullish { BULL_COLOR } else { BEAR_COLOR }
}
