// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Inline SVG chart renderers
//!
//! Each renderer is a pure function from points to markup with its own layout
//! constants. Shared rules:
//!
//! - no points renders nothing
//! - every scale denominator is floored at 1
//! - negative values are drawn at 0 but their labels show the real value with
//!   a visible "negative" note
//! - non-finite input is refused with [`ReportError::ChartUnavailable`]

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::format::{escape_html, truncate_label, NumberFormat, ValueKind};
use crate::error::{ReportError, Result};

const PALETTE: &[&str] = &[
    "#2563eb", "#059669", "#f59e0b", "#dc2626", "#7c3aed", "#0891b2", "#db2777", "#65a30d",
];

// ============================================================================
// Chart Types
// ============================================================================

/// One data point; `min`/`max` are only read by the forecast band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            min: None,
            max: None,
        }
    }

    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    ForecastBand,
    Pie,
}

impl ChartKind {
    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::ForecastBand => "forecast band",
            ChartKind::Pie => "pie",
        }
    }
}

/// Presentation settings shared by every renderer
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub number_format: NumberFormat,
    pub value_kind: ValueKind,
    /// Bar labels are cut past this many characters
    pub label_chars: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            number_format: NumberFormat::default(),
            value_kind: ValueKind::Count,
            label_chars: 18,
        }
    }
}

impl ChartStyle {
    pub fn with_kind(&self, value_kind: ValueKind) -> Self {
        Self {
            value_kind,
            ..self.clone()
        }
    }

    /// Formatted value, annotated when the source value was negative
    fn value_text(&self, value: f64) -> String {
        let text = self.number_format.value(value, self.value_kind);
        if value < 0.0 {
            format!("{} (negative)", text)
        } else {
            text
        }
    }
}

/// A chart to render: kind, caption, data and how its values read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub points: Vec<ChartPoint>,
    pub value_kind: ValueKind,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, title: impl Into<String>, points: Vec<ChartPoint>) -> Self {
        Self {
            kind,
            title: title.into(),
            points,
            value_kind: ValueKind::Count,
        }
    }

    pub fn with_value_kind(mut self, value_kind: ValueKind) -> Self {
        self.value_kind = value_kind;
        self
    }

    /// Render with `style`, using this chart's own value kind
    pub fn render(&self, style: &ChartStyle) -> Result<String> {
        let style = style.with_kind(self.value_kind);
        match self.kind {
            ChartKind::Bar => render_bar_chart(&self.points, &style),
            ChartKind::Line => render_line_chart(&self.points, &style),
            ChartKind::ForecastBand => render_forecast_chart(&self.points, &style),
            ChartKind::Pie => render_pie_chart(&self.points, &style),
        }
    }
}

// ============================================================================
// Shared helpers
// ============================================================================

fn ensure_finite(kind: ChartKind, points: &[ChartPoint]) -> Result<()> {
    for point in points {
        let values = [Some(point.value), point.min, point.max];
        if values.iter().flatten().any(|v| !v.is_finite()) {
            return Err(ReportError::ChartUnavailable {
                chart: kind.name().to_string(),
                reason: format!("non-finite value for '{}'", point.label),
            });
        }
    }
    Ok(())
}

/// Denominator that is never zero or negative
fn floor_denominator(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        1.0
    }
}

fn clamp(value: f64) -> f64 {
    value.max(0.0)
}

fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

fn svg_open(out: &mut String, class: &str, width: u32, height: u32) {
    let _ = write!(
        out,
        r#"<svg class="chart {}" xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}" role="img">"#,
        class, width, height, width, height
    );
}

/// Every `step`-th label is printed so long series stay readable
fn label_step(count: usize, max_labels: usize) -> usize {
    count.div_ceil(max_labels.max(1)).max(1)
}

// ============================================================================
// Bar Chart
// ============================================================================

const BAR_CHART_WIDTH: u32 = 640;
const BAR_LABEL_WIDTH: u32 = 150;
const BAR_VALUE_WIDTH: u32 = 90;
const BAR_PADDING: u32 = 10;
const BAR_ROW_HEIGHT: u32 = 28;
const BAR_THICKNESS: u32 = 18;

/// Length of the bar drawn for the largest value
pub const BAR_MAX_WIDTH: f64 = (BAR_CHART_WIDTH - BAR_LABEL_WIDTH - BAR_VALUE_WIDTH - 2 * BAR_PADDING) as f64;

/// Horizontal bars, one row per point, length proportional to value / max
pub fn render_bar_chart(points: &[ChartPoint], style: &ChartStyle) -> Result<String> {
    if points.is_empty() {
        return Ok(String::new());
    }
    ensure_finite(ChartKind::Bar, points)?;

    let max = floor_denominator(points.iter().map(|p| clamp(p.value)).fold(0.0, f64::max));
    let height = BAR_PADDING * 2 + BAR_ROW_HEIGHT * points.len() as u32;
    let bar_x = BAR_PADDING + BAR_LABEL_WIDTH;

    let mut svg = String::new();
    svg_open(&mut svg, "bar-chart", BAR_CHART_WIDTH, height);

    for (i, point) in points.iter().enumerate() {
        let row_y = BAR_PADDING + BAR_ROW_HEIGHT * i as u32;
        let bar_y = row_y + (BAR_ROW_HEIGHT - BAR_THICKNESS) / 2;
        let text_y = row_y + BAR_ROW_HEIGHT / 2 + 4;
        let width = clamp(point.value) / max * BAR_MAX_WIDTH;
        let label = escape_html(&truncate_label(&point.label, style.label_chars));
        let value = escape_html(&style.value_text(point.value));

        let _ = write!(
            svg,
            r#"<text class="bar-label" x="{}" y="{}" text-anchor="end">{}</text>"#,
            bar_x - 6,
            text_y,
            label
        );
        let _ = write!(
            svg,
            r#"<rect class="bar" x="{}" y="{}" width="{:.1}" height="{}" rx="3" fill="{}"><title>{}: {}</title></rect>"#,
            bar_x,
            bar_y,
            width,
            BAR_THICKNESS,
            color_for(i),
            escape_html(&point.label),
            value
        );
        let value_class = if point.value < 0.0 { "bar-value negative-note" } else { "bar-value" };
        let _ = write!(
            svg,
            r#"<text class="{}" x="{:.1}" y="{}">{}</text>"#,
            value_class,
            bar_x as f64 + width + 6.0,
            text_y,
            value
        );
    }

    svg.push_str("</svg>");
    Ok(svg)
}

// ============================================================================
// Line Chart
// ============================================================================

const LINE_WIDTH: u32 = 640;
const LINE_HEIGHT: u32 = 260;
const LINE_PAD_LEFT: f64 = 64.0;
const LINE_PAD_RIGHT: f64 = 16.0;
const LINE_PAD_TOP: f64 = 18.0;
const LINE_PAD_BOTTOM: f64 = 36.0;
const LINE_MAX_X_LABELS: usize = 12;

struct LineFrame {
    plot_width: f64,
    plot_height: f64,
}

impl LineFrame {
    fn new() -> Self {
        Self {
            plot_width: LINE_WIDTH as f64 - LINE_PAD_LEFT - LINE_PAD_RIGHT,
            plot_height: LINE_HEIGHT as f64 - LINE_PAD_TOP - LINE_PAD_BOTTOM,
        }
    }

    fn x(&self, index: usize, count: usize) -> f64 {
        if count <= 1 {
            LINE_PAD_LEFT + self.plot_width / 2.0
        } else {
            LINE_PAD_LEFT + index as f64 * self.plot_width / (count - 1) as f64
        }
    }

    /// `fraction` is 0 at the bottom axis and 1 at the top
    fn y(&self, fraction: f64) -> f64 {
        LINE_PAD_TOP + (1.0 - fraction) * self.plot_height
    }

    fn baseline(&self) -> f64 {
        self.y(0.0)
    }
}

fn write_x_labels(svg: &mut String, frame: &LineFrame, points: &[ChartPoint]) {
    let step = label_step(points.len(), LINE_MAX_X_LABELS);
    for (i, point) in points.iter().enumerate().step_by(step) {
        let _ = write!(
            svg,
            r#"<text class="axis-label" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            frame.x(i, points.len()),
            LINE_HEIGHT as f64 - 12.0,
            escape_html(&truncate_label(&point.label, 10))
        );
    }
}

fn write_y_label(svg: &mut String, y: f64, text: &str) {
    let _ = write!(
        svg,
        r#"<text class="axis-label" x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
        LINE_PAD_LEFT - 8.0,
        y + 4.0,
        escape_html(text)
    );
}

fn join_points(coords: &[(f64, f64)]) -> String {
    coords
        .iter()
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Time series polyline with an area fill and per-point markers
pub fn render_line_chart(points: &[ChartPoint], style: &ChartStyle) -> Result<String> {
    if points.is_empty() {
        return Ok(String::new());
    }
    ensure_finite(ChartKind::Line, points)?;

    let frame = LineFrame::new();
    let values: Vec<f64> = points.iter().map(|p| clamp(p.value)).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(0.0, f64::max);
    let range = floor_denominator(max - min);

    let coords: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (frame.x(i, points.len()), frame.y((v - min) / range)))
        .collect();

    let mut svg = String::new();
    svg_open(&mut svg, "line-chart", LINE_WIDTH, LINE_HEIGHT);

    let _ = write!(
        svg,
        r##"<line class="axis" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#d1d5db"/>"##,
        LINE_PAD_LEFT,
        frame.baseline(),
        LINE_WIDTH as f64 - LINE_PAD_RIGHT,
        frame.baseline()
    );
    write_y_label(&mut svg, frame.y(1.0), &style.number_format.value(max, style.value_kind));
    write_y_label(&mut svg, frame.baseline(), &style.number_format.value(min, style.value_kind));

    let (first_x, _) = coords[0];
    let (last_x, _) = coords[coords.len() - 1];
    let mut area = coords.clone();
    area.push((last_x, frame.baseline()));
    area.push((first_x, frame.baseline()));
    let _ = write!(
        svg,
        r##"<polygon class="area" points="{}" fill="#2563eb" fill-opacity="0.15"/>"##,
        join_points(&area)
    );
    let _ = write!(
        svg,
        r##"<polyline class="line" points="{}" fill="none" stroke="#2563eb" stroke-width="2"/>"##,
        join_points(&coords)
    );

    for (point, (x, y)) in points.iter().zip(&coords) {
        let value = escape_html(&style.value_text(point.value));
        let _ = write!(
            svg,
            r##"<circle class="marker" cx="{:.1}" cy="{:.1}" r="3.5" fill="#2563eb"><title>{}: {}</title></circle>"##,
            x,
            y,
            escape_html(&point.label),
            value
        );
        if point.value < 0.0 {
            let _ = write!(
                svg,
                r#"<text class="negative-note" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
                x,
                y - 8.0,
                value
            );
        }
    }

    write_x_labels(&mut svg, &frame, points);
    svg.push_str("</svg>");
    Ok(svg)
}

// ============================================================================
// Forecast Band Chart
// ============================================================================

/// Central forecast line inside a shaded min/max band.
///
/// A missing bound falls back to the point value, which collapses the band to
/// zero width at that point.
pub fn render_forecast_chart(points: &[ChartPoint], style: &ChartStyle) -> Result<String> {
    if points.is_empty() {
        return Ok(String::new());
    }
    ensure_finite(ChartKind::ForecastBand, points)?;

    let frame = LineFrame::new();
    let bands: Vec<(f64, f64, f64)> = points
        .iter()
        .map(|p| {
            let lo = p.min.unwrap_or(p.value);
            let hi = p.max.unwrap_or(p.value);
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            (clamp(lo), clamp(p.value), clamp(hi))
        })
        .collect();
    let top = floor_denominator(
        bands
            .iter()
            .map(|(_, v, hi)| v.max(*hi))
            .fold(0.0, f64::max),
    );

    let count = points.len();
    let upper: Vec<(f64, f64)> = bands
        .iter()
        .enumerate()
        .map(|(i, (_, _, hi))| (frame.x(i, count), frame.y(hi / top)))
        .collect();
    let lower: Vec<(f64, f64)> = bands
        .iter()
        .enumerate()
        .rev()
        .map(|(i, (lo, _, _))| (frame.x(i, count), frame.y(lo / top)))
        .collect();
    let center: Vec<(f64, f64)> = bands
        .iter()
        .enumerate()
        .map(|(i, (_, v, _))| (frame.x(i, count), frame.y(v / top)))
        .collect();

    let mut svg = String::new();
    svg_open(&mut svg, "forecast-chart", LINE_WIDTH, LINE_HEIGHT);

    let _ = write!(
        svg,
        r##"<line class="axis" x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#d1d5db"/>"##,
        LINE_PAD_LEFT,
        frame.baseline(),
        LINE_WIDTH as f64 - LINE_PAD_RIGHT,
        frame.baseline()
    );
    write_y_label(&mut svg, frame.y(1.0), &style.number_format.value(top, style.value_kind));
    write_y_label(&mut svg, frame.baseline(), &style.number_format.value(0.0, style.value_kind));

    let mut band = upper;
    band.extend(lower);
    let _ = write!(
        svg,
        r##"<polygon class="confidence-band" points="{}" fill="#7c3aed" fill-opacity="0.18"/>"##,
        join_points(&band)
    );
    let _ = write!(
        svg,
        r##"<polyline class="forecast-line" points="{}" fill="none" stroke="#7c3aed" stroke-width="2" stroke-dasharray="6 3"/>"##,
        join_points(&center)
    );

    for ((point, (x, y)), (_, plotted, _)) in points.iter().zip(&center).zip(&bands) {
        let value = escape_html(&style.value_text(point.value));
        let _ = write!(
            svg,
            r##"<circle class="marker" cx="{:.1}" cy="{:.1}" r="3.5" fill="#7c3aed" data-plotted="{}"><title>{}: {}</title></circle>"##,
            x,
            y,
            escape_html(&style.number_format.value(*plotted, style.value_kind)),
            escape_html(&point.label),
            value
        );
        let class = if point.value < 0.0 { "point-value negative-note" } else { "point-value" };
        let _ = write!(
            svg,
            r#"<text class="{}" x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            class,
            x,
            y - 8.0,
            value
        );
    }

    write_x_labels(&mut svg, &frame, points);
    svg.push_str("</svg>");
    Ok(svg)
}

// ============================================================================
// Pie Chart
// ============================================================================

const PIE_WIDTH: u32 = 480;
const PIE_HEIGHT: u32 = 260;
const PIE_CENTER: (f64, f64) = (130.0, 130.0);
const PIE_RADIUS: f64 = 110.0;
const PIE_LEGEND_X: f64 = 270.0;

/// Angular extent of one category, in degrees clockwise from 12 o'clock
#[derive(Debug, Clone, PartialEq)]
pub struct PieSector {
    pub label: String,
    pub value: f64,
    /// Share of the total, 0..=100
    pub percent: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSector {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Cumulative sectors: each starts where the previous one ended. Sweeps add
/// up to 360 whenever the (clamped) total is positive.
pub fn pie_sectors(points: &[ChartPoint]) -> Vec<PieSector> {
    let total: f64 = points.iter().map(|p| clamp(p.value)).sum();
    let denominator = floor_denominator(total);
    let last_positive = points.iter().rposition(|p| clamp(p.value) > 0.0);

    let mut start = 0.0;
    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let share = clamp(point.value) / denominator;
            let mut end = start + share * 360.0;
            if Some(i) == last_positive {
                end = 360.0;
            }
            let sector = PieSector {
                label: point.label.clone(),
                value: point.value,
                percent: share * 100.0,
                start_angle: start,
                end_angle: end,
            };
            start = end;
            sector
        })
        .collect()
}

fn polar(angle_deg: f64) -> (f64, f64) {
    let radians = (angle_deg - 90.0).to_radians();
    (
        PIE_CENTER.0 + PIE_RADIUS * radians.cos(),
        PIE_CENTER.1 + PIE_RADIUS * radians.sin(),
    )
}

fn sector_color(label: &str, index: usize) -> &'static str {
    match label.to_lowercase().as_str() {
        "good" => "#16a34a",
        "warning" => "#f59e0b",
        "critical" => "#dc2626",
        _ => color_for(index),
    }
}

/// One filled sector per category plus a legend; zero categories get a 0°
/// sector that is not drawn but still listed
pub fn render_pie_chart(points: &[ChartPoint], style: &ChartStyle) -> Result<String> {
    if points.is_empty() {
        return Ok(String::new());
    }
    ensure_finite(ChartKind::Pie, points)?;

    let sectors = pie_sectors(points);
    let legend_height = 24 + 22 * points.len() as u32;
    let height = PIE_HEIGHT.max(legend_height);

    let mut svg = String::new();
    svg_open(&mut svg, "pie-chart", PIE_WIDTH, height);

    if sectors.iter().all(|s| s.sweep() <= 0.0) {
        let _ = write!(
            svg,
            r##"<circle class="pie-empty" cx="{}" cy="{}" r="{}" fill="#f3f4f6" stroke="#d1d5db"/>"##,
            PIE_CENTER.0, PIE_CENTER.1, PIE_RADIUS
        );
    }

    for (i, sector) in sectors.iter().enumerate() {
        let sweep = sector.sweep();
        let color = sector_color(&sector.label, i);
        let title = format!(
            "{}: {} ({})",
            sector.label,
            style.value_text(sector.value),
            style.number_format.percent(sector.percent)
        );

        if sweep <= 0.0 {
            continue;
        }
        if sweep >= 359.999 {
            let _ = write!(
                svg,
                r#"<circle class="slice" cx="{}" cy="{}" r="{}" fill="{}"><title>{}</title></circle>"#,
                PIE_CENTER.0,
                PIE_CENTER.1,
                PIE_RADIUS,
                color,
                escape_html(&title)
            );
            continue;
        }

        let (x1, y1) = polar(sector.start_angle);
        let (x2, y2) = polar(sector.end_angle);
        let large_arc = if sweep > 180.0 { 1 } else { 0 };
        let _ = write!(
            svg,
            r#"<path class="slice" d="M {:.2},{:.2} L {:.2},{:.2} A {:.2},{:.2} 0 {},1 {:.2},{:.2} Z" fill="{}"><title>{}</title></path>"#,
            PIE_CENTER.0,
            PIE_CENTER.1,
            x1,
            y1,
            PIE_RADIUS,
            PIE_RADIUS,
            large_arc,
            x2,
            y2,
            color,
            escape_html(&title)
        );
    }

    for (i, sector) in sectors.iter().enumerate() {
        let y = 24.0 + 22.0 * i as f64;
        let class = if sector.value < 0.0 { "legend-label negative-note" } else { "legend-label" };
        let _ = write!(
            svg,
            r#"<rect x="{}" y="{:.1}" width="12" height="12" fill="{}"/><text class="{}" x="{}" y="{:.1}">{}: {} ({})</text>"#,
            PIE_LEGEND_X,
            y - 10.0,
            sector_color(&sector.label, i),
            class,
            PIE_LEGEND_X + 18.0,
            y,
            escape_html(&truncate_label(&sector.label, style.label_chars)),
            escape_html(&style.value_text(sector.value)),
            escape_html(&style.number_format.percent(sector.percent))
        );
    }

    svg.push_str("</svg>");
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_denominator() {
        assert_eq!(floor_denominator(0.0), 1.0);
        assert_eq!(floor_denominator(-3.0), 1.0);
        assert_eq!(floor_denominator(40.0), 40.0);
    }

    #[test]
    fn test_label_step() {
        assert_eq!(label_step(24, 12), 2);
        assert_eq!(label_step(5, 12), 1);
        assert_eq!(label_step(0, 12), 1);
    }

    #[test]
    fn test_single_point_line_is_centered() {
        let svg = render_line_chart(&[ChartPoint::new("9", 100.0)], &ChartStyle::default()).unwrap();
        assert!(svg.contains("<polyline"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_full_pie_uses_circle() {
        let svg = render_pie_chart(&[ChartPoint::new("cash", 5.0)], &ChartStyle::default()).unwrap();
        assert!(svg.contains(r#"<circle class="slice""#));
        assert!(!svg.contains("<path"));
    }
}
