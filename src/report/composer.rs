// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Printable document composition
//!
//! Blocks are always emitted in the same order:
//! header, key metrics, narrative sections, action items, charts, detail
//! tables, footer. A block whose data is missing is left out entirely.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::charts::{ChartKind, ChartPoint, ChartSpec, ChartStyle};
use super::format::{escape_html, slugify, NumberFormat, ValueKind};
use super::normalize::normalize;
use super::sections::{parse_sections, ParseOptions, ParsedSections, SectionKeywords};
use crate::config::ReportConfig;
use crate::models::{AnalyticsPayload, StockStatus};

// ============================================================================
// Document Types
// ============================================================================

/// A composed report, ready to hand to a print host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedDocument {
    /// `report_<entity>_<YYYY_MM_DD>`, also used as the HTML `<title>`
    pub file_stem: String,
    pub html: String,
}

impl RenderedDocument {
    /// Name the user is offered when saving the printout
    pub fn pdf_file_name(&self) -> String {
        format!("{}.pdf", self.file_stem)
    }
}

/// A detail table with preformatted cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Raw cell values for spreadsheet export
    pub raw_rows: Vec<Vec<String>>,
}

/// One row of the key-metrics table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub kind: ValueKind,
}

/// Everything the composer lays out, already computed
pub struct ComposeInput<'a> {
    pub payload: &'a AnalyticsPayload,
    pub normalized_text: &'a str,
    pub sections: &'a ParsedSections,
    pub charts: &'a [ChartSpec],
    pub tables: &'a [ReportTable],
}

// ============================================================================
// Metric Catalogue
// ============================================================================

/// Metrics the backend is known to send, in display order
pub const KNOWN_METRICS: &[(&str, &str, ValueKind)] = &[
    ("total_revenue", "Total revenue", ValueKind::Currency),
    ("total_orders", "Orders", ValueKind::Count),
    ("avg_order_value", "Average order value", ValueKind::Currency),
    ("total_customers", "Customers", ValueKind::Count),
    ("new_customers", "New customers", ValueKind::Count),
    ("avg_rating", "Average rating", ValueKind::Decimal),
    ("total_reviews", "Reviews", ValueKind::Count),
    ("low_stock_items", "Low-stock items", ValueKind::Count),
];

/// Label and kind for a metric key, guessing for keys outside the catalogue
pub fn describe_metric(key: &str) -> (String, ValueKind) {
    if let Some((_, label, kind)) = KNOWN_METRICS.iter().find(|(k, _, _)| *k == key) {
        return (label.to_string(), *kind);
    }

    let words: Vec<String> = key
        .split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();
    let has_word = |candidates: &[&str]| words.iter().any(|w| candidates.contains(&w.as_str()));

    let kind = if has_word(&["revenue", "amount", "spent", "cost", "price", "sales", "value"]) {
        ValueKind::Currency
    } else if has_word(&["percent", "pct", "rate", "ratio", "share"]) {
        ValueKind::Percent
    } else if has_word(&["avg", "average", "rating", "mean"]) {
        ValueKind::Decimal
    } else {
        ValueKind::Count
    };

    let mut label = words.join(" ");
    if let Some(first) = label.get(0..1) {
        label = format!("{}{}", first.to_uppercase(), &label[1..]);
    }
    (label, kind)
}

/// Known metrics first in catalogue order, then the rest alphabetically
pub fn metric_rows(metrics: &std::collections::BTreeMap<String, f64>) -> Vec<MetricRow> {
    let mut rows: Vec<MetricRow> = KNOWN_METRICS
        .iter()
        .filter_map(|(key, label, kind)| {
            metrics.get(*key).map(|value| MetricRow {
                key: key.to_string(),
                label: label.to_string(),
                value: *value,
                kind: *kind,
            })
        })
        .collect();

    for (key, value) in metrics {
        if KNOWN_METRICS.iter().any(|(k, _, _)| k == key) {
            continue;
        }
        let (label, kind) = describe_metric(key);
        rows.push(MetricRow {
            key: key.clone(),
            label,
            value: *value,
            kind,
        });
    }
    rows
}

/// Report date from the payload, today when missing or unparseable
pub fn report_date(raw: Option<&str>) -> NaiveDate {
    raw.map(str::trim)
        .and_then(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(s.get(0..10).unwrap_or(s), "%Y-%m-%d"))
                .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
                .ok()
        })
        .unwrap_or_else(|| Local::now().date_naive())
}

/// `report_<entity>_<YYYY_MM_DD>`
pub fn file_stem(entity: &str, date: NaiveDate) -> String {
    format!("report_{}_{}", slugify(entity), date.format("%Y_%m_%d"))
}

// ============================================================================
// Composer
// ============================================================================

/// Builds printable documents from analytics payloads
pub struct ReportComposer {
    config: ReportConfig,
}

impl ReportComposer {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub(crate) fn number_format(&self) -> &NumberFormat {
        &self.config.number_format
    }

    pub(crate) fn chart_style(&self) -> ChartStyle {
        ChartStyle {
            number_format: self.config.number_format.clone(),
            value_kind: ValueKind::Count,
            label_chars: self.config.bar_label_chars,
        }
    }

    /// Normalize narrative, parse sections, build charts and tables, compose
    pub fn build(&self, payload: &AnalyticsPayload) -> RenderedDocument {
        let narrative = payload.narrative_text.as_deref().unwrap_or_default();
        let normalized = normalize(narrative);
        let sections = parse_sections(
            narrative,
            &SectionKeywords::single_branch(),
            &ParseOptions::from(&self.config),
        );
        let charts = self.charts_for(payload);
        let tables = self.tables_for(payload);

        self.compose(&ComposeInput {
            payload,
            normalized_text: &normalized,
            sections: &sections,
            charts: &charts,
            tables: &tables,
        })
    }

    /// Lay out precomputed parts in the fixed block order
    pub fn compose(&self, input: &ComposeInput<'_>) -> RenderedDocument {
        let payload = input.payload;
        let entity = payload.branch_label();
        let date = report_date(payload.report_date.as_deref());
        let stem = file_stem(entity, date);

        let mut html = String::new();
        html.push_str(&self.document_head(&stem));
        html.push_str(&self.header_block("Business Report", entity, date));

        let metrics = metric_rows(&payload.summary_metrics);
        if metrics.is_empty() {
            log::debug!("No summary metrics, skipping key metrics");
        } else {
            html.push_str(&self.metrics_block(&metrics));
        }

        html.push_str(&self.narrative_block(input.sections, input.normalized_text));

        let actions: Vec<String> = payload
            .recommendations
            .iter()
            .map(|r| normalize(r))
            .filter(|r| !r.is_empty())
            .collect();
        if !actions.is_empty() {
            html.push_str(&list_block("Action Items", "section-action", &actions));
        }

        html.push_str(&self.charts_block(input.charts));
        html.push_str(&tables_block(input.tables));
        html.push_str(&self.footer_block());

        RenderedDocument {
            file_stem: stem,
            html,
        }
    }

    // ------------------------------------------------------------------------
    // Data preparation
    // ------------------------------------------------------------------------

    /// Charts for every dataset present, in report order
    pub fn charts_for(&self, payload: &AnalyticsPayload) -> Vec<ChartSpec> {
        let series = &payload.raw_series;
        let mut charts = Vec::new();

        let hourly: Vec<ChartPoint> = series
            .revenue_by_hour
            .iter()
            .enumerate()
            .map(|(i, h)| {
                let label = match h.hour {
                    Some(hour) => format!("{:02}h", hour as i64),
                    None => format!("#{}", i + 1),
                };
                ChartPoint::new(label, h.revenue.unwrap_or(0.0))
            })
            .collect();
        push_chart(&mut charts, ChartKind::Line, "Revenue by Hour", hourly, ValueKind::Currency);

        let products: Vec<ChartPoint> = series
            .top_products
            .iter()
            .map(|p| ChartPoint::new(name_or(&p.name, "Unnamed product"), p.revenue.unwrap_or(0.0)))
            .collect();
        push_chart(&mut charts, ChartKind::Bar, "Top Products by Revenue", products, ValueKind::Currency);

        let customers: Vec<ChartPoint> = series
            .top_customers
            .iter()
            .map(|c| ChartPoint::new(name_or(&c.name, "Guest"), c.total_spent.unwrap_or(0.0)))
            .collect();
        push_chart(&mut charts, ChartKind::Bar, "Top Customers by Spend", customers, ValueKind::Currency);

        let forecast: Vec<ChartPoint> = series
            .forecast
            .iter()
            .enumerate()
            .map(|(i, f)| {
                let label = f.label.clone().unwrap_or_else(|| format!("+{}", i + 1));
                ChartPoint::new(label, f.value.unwrap_or(0.0)).with_range(f.min, f.max)
            })
            .collect();
        push_chart(&mut charts, ChartKind::ForecastBand, "Revenue Forecast", forecast, ValueKind::Currency);

        if !series.inventory_alerts.is_empty() {
            let statuses = [StockStatus::Good, StockStatus::Warning, StockStatus::Critical];
            let inventory: Vec<ChartPoint> = statuses
                .iter()
                .map(|status| {
                    let count = series
                        .inventory_alerts
                        .iter()
                        .filter(|a| a.stock_status() == *status)
                        .count();
                    ChartPoint::new(status.label(), count as f64)
                })
                .collect();
            push_chart(&mut charts, ChartKind::Pie, "Inventory Status", inventory, ValueKind::Count);
        }

        let mut reviews: Vec<(&String, &f64)> = series.review_distribution.iter().collect();
        reviews.sort_by(|a, b| b.0.cmp(a.0));
        let reviews: Vec<ChartPoint> = reviews
            .into_iter()
            .map(|(rating, count)| ChartPoint::new(format!("{}★", rating), *count))
            .collect();
        push_chart(&mut charts, ChartKind::Pie, "Review Distribution", reviews, ValueKind::Count);

        let payments: Vec<ChartPoint> = series
            .payment_methods
            .iter()
            .map(|p| ChartPoint::new(name_or(&p.method, "Other"), p.count.unwrap_or(0.0)))
            .collect();
        push_chart(&mut charts, ChartKind::Pie, "Payment Methods", payments, ValueKind::Count);

        charts
    }

    /// Detail tables for every dataset present, in report order
    pub fn tables_for(&self, payload: &AnalyticsPayload) -> Vec<ReportTable> {
        let fmt = self.number_format();
        let series = &payload.raw_series;
        let mut tables = Vec::new();

        let mut products = TableBuilder::new("Top Products", &["Product", "Quantity sold", "Revenue"]);
        for p in &series.top_products {
            let qty = p.quantity_sold.unwrap_or(0.0);
            let revenue = p.revenue.unwrap_or(0.0);
            products.row(
                vec![name_or(&p.name, "Unnamed product"), fmt.integer(qty), fmt.currency(revenue)],
                vec![name_or(&p.name, ""), raw(qty), raw(revenue)],
            );
        }
        products.push_into(&mut tables);

        let mut customers = TableBuilder::new("Top Customers", &["Customer", "Orders", "Total spent"]);
        for c in &series.top_customers {
            let orders = c.order_count.unwrap_or(0.0);
            let spent = c.total_spent.unwrap_or(0.0);
            customers.row(
                vec![name_or(&c.name, "Guest"), fmt.integer(orders), fmt.currency(spent)],
                vec![name_or(&c.name, ""), raw(orders), raw(spent)],
            );
        }
        customers.push_into(&mut tables);

        let mut inventory = TableBuilder::new(
            "Inventory Alerts",
            &["Ingredient", "Current stock", "Minimum stock", "Unit", "Status"],
        );
        for a in &series.inventory_alerts {
            let current = a.current_stock.unwrap_or(0.0);
            let min = a.min_stock.unwrap_or(0.0);
            let unit = a.unit.clone().unwrap_or_default();
            let status = a.stock_status().label().to_string();
            inventory.row(
                vec![
                    name_or(&a.ingredient_name, "Unnamed ingredient"),
                    fmt.decimal(current, 1),
                    fmt.decimal(min, 1),
                    unit.clone(),
                    status.clone(),
                ],
                vec![name_or(&a.ingredient_name, ""), raw(current), raw(min), unit, status],
            );
        }
        inventory.push_into(&mut tables);

        let payment_total: f64 = series
            .payment_methods
            .iter()
            .map(|p| p.count.unwrap_or(0.0).max(0.0))
            .sum();
        let mut payments = TableBuilder::new("Payment Methods", &["Method", "Transactions", "Amount", "Share"]);
        for p in &series.payment_methods {
            let count = p.count.unwrap_or(0.0);
            let amount = p.amount.unwrap_or(0.0);
            let share = count.max(0.0) / if payment_total > 0.0 { payment_total } else { 1.0 } * 100.0;
            payments.row(
                vec![
                    name_or(&p.method, "Other"),
                    fmt.integer(count),
                    fmt.currency(amount),
                    fmt.percent(share),
                ],
                vec![name_or(&p.method, ""), raw(count), raw(amount), raw(share)],
            );
        }
        payments.push_into(&mut tables);

        let mut forecast = TableBuilder::new("Revenue Forecast", &["Date", "Forecast", "Low", "High"]);
        for (i, f) in series.forecast.iter().enumerate() {
            let value = f.value.unwrap_or(0.0);
            let lo = f.min.unwrap_or(value);
            let hi = f.max.unwrap_or(value);
            let label = f.label.clone().unwrap_or_else(|| format!("+{}", i + 1));
            forecast.row(
                vec![label.clone(), fmt.currency(value), fmt.currency(lo), fmt.currency(hi)],
                vec![label, raw(value), raw(lo), raw(hi)],
            );
        }
        forecast.push_into(&mut tables);

        let review_total: f64 = series.review_distribution.values().map(|v| v.max(0.0)).sum();
        let mut reviews = TableBuilder::new("Review Distribution", &["Rating", "Reviews", "Share"]);
        let mut ratings: Vec<(&String, &f64)> = series.review_distribution.iter().collect();
        ratings.sort_by(|a, b| b.0.cmp(a.0));
        for (rating, count) in ratings {
            let share = count.max(0.0) / if review_total > 0.0 { review_total } else { 1.0 } * 100.0;
            reviews.row(
                vec![format!("{}★", rating), fmt.integer(*count), fmt.percent(share)],
                vec![rating.clone(), raw(*count), raw(share)],
            );
        }
        reviews.push_into(&mut tables);

        tables
    }

    // ------------------------------------------------------------------------
    // Blocks
    // ------------------------------------------------------------------------

    pub(crate) fn document_head(&self, title: &str) -> String {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!("<title>{}</title>\n", escape_html(title)));
        html.push_str("<style>\n");
        html.push_str("@page { size: A4; margin: 14mm; }\n");
        html.push_str("body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 32px; color: #333; }\n");
        html.push_str("h1 { color: #6f4e37; border-bottom: 2px solid #6f4e37; padding-bottom: 10px; margin-bottom: 4px; }\n");
        html.push_str("h2 { color: #1f2937; margin-top: 28px; }\n");
        html.push_str("h3 { color: #374151; margin: 12px 0 6px; }\n");
        html.push_str(".report-meta { color: #6b7280; margin: 0 0 16px; }\n");
        html.push_str("table { border-collapse: collapse; width: 100%; margin: 12px 0 20px; }\n");
        html.push_str("th, td { border: 1px solid #e5e7eb; padding: 8px 10px; text-align: left; }\n");
        html.push_str("td.num { text-align: right; font-variant-numeric: tabular-nums; }\n");
        html.push_str("th { background: #f3f4f6; font-weight: 600; }\n");
        html.push_str("tr:nth-child(even) { background: #f9fafb; }\n");
        html.push_str(".metric-card { display: inline-block; background: #f3f4f6; padding: 16px; margin: 8px 8px 8px 0; border-radius: 8px; min-width: 150px; }\n");
        html.push_str(".metric-value { font-size: 24px; font-weight: bold; color: #6f4e37; }\n");
        html.push_str(".metric-label { color: #6b7280; margin-top: 5px; }\n");
        html.push_str(".section { border-left: 4px solid #9ca3af; padding: 4px 12px; margin: 12px 0; }\n");
        html.push_str(".section-positive { border-color: #059669; }\n");
        html.push_str(".section-negative { border-color: #dc2626; }\n");
        html.push_str(".section-action { border-color: #2563eb; }\n");
        html.push_str(".narrative p { margin: 6px 0; line-height: 1.5; }\n");
        html.push_str(".chart-block { page-break-inside: avoid; margin: 16px 0; }\n");
        html.push_str(".chart-unavailable p { color: #9ca3af; font-style: italic; }\n");
        html.push_str(".chart text { font-size: 11px; fill: #374151; }\n");
        html.push_str(".chart .negative-note { fill: #dc2626; font-weight: 600; }\n");
        html.push_str(".footer { margin-top: 40px; color: #9ca3af; font-size: 12px; border-top: 1px solid #e5e7eb; padding-top: 8px; }\n");
        html.push_str("@media print { body { margin: 0; } h2 { page-break-after: avoid; } }\n");
        html.push_str("</style>\n</head>\n<body>\n");
        html
    }

    pub(crate) fn header_block(&self, heading: &str, entity: &str, date: NaiveDate) -> String {
        format!(
            "<header class=\"report-header\">\n<h1>{} - {}</h1>\n<p class=\"report-meta\">{} | Report date: {}</p>\n</header>\n",
            escape_html(&self.config.company_name),
            escape_html(heading),
            escape_html(entity),
            date.format("%d/%m/%Y")
        )
    }

    pub(crate) fn footer_block(&self) -> String {
        format!(
            "<div class=\"footer\">Generated by {} reporting on {}</div>\n</body>\n</html>",
            escape_html(&self.config.company_name),
            Local::now().format("%d/%m/%Y %H:%M")
        )
    }

    fn metrics_block(&self, metrics: &[MetricRow]) -> String {
        let fmt = self.number_format();
        let mut html = String::from("<section class=\"key-metrics\">\n<h2>Key Metrics</h2>\n<div>\n");
        for metric in metrics.iter().filter(|m| m.kind == ValueKind::Currency).take(3) {
            html.push_str(&metric_card(&metric.label, &fmt.value(metric.value, metric.kind)));
        }
        html.push_str("</div>\n<table class=\"metrics\">\n<tr><th>Metric</th><th>Value</th></tr>\n");
        for metric in metrics {
            html.push_str(&format!(
                "<tr><td>{}</td><td class=\"num\">{}</td></tr>\n",
                escape_html(&metric.label),
                escape_html(&fmt.value(metric.value, metric.kind))
            ));
        }
        html.push_str("</table>\n</section>\n");
        html
    }

    /// Parsed sections, or the whole normalized text when no heading was found
    pub(crate) fn narrative_block(&self, sections: &ParsedSections, normalized_text: &str) -> String {
        if !sections.is_empty() {
            let mut html = String::from("<section class=\"narrative\">\n<h2>Analysis</h2>\n");
            for section in sections.non_empty() {
                html.push_str(&list_block(
                    section.label.title(),
                    section.label.css_class(),
                    &section.lines,
                ));
            }
            html.push_str("</section>\n");
            return html;
        }

        if normalized_text.trim().is_empty() {
            return String::new();
        }

        let mut html = String::from("<section class=\"narrative\">\n<h2>Analysis</h2>\n");
        for paragraph in normalized_text.split("\n\n") {
            let lines: Vec<String> = paragraph.lines().map(escape_html).collect();
            html.push_str(&format!("<p>{}</p>\n", lines.join("<br>")));
        }
        html.push_str("</section>\n");
        html
    }

    pub(crate) fn charts_block(&self, charts: &[ChartSpec]) -> String {
        let style = self.chart_style();
        let blocks: Vec<String> = charts
            .iter()
            .filter(|chart| !chart.points.is_empty())
            .map(|chart| match chart.render(&style) {
                Ok(svg) => format!(
                    "<div class=\"chart-block\">\n<h3>{}</h3>\n{}\n</div>\n",
                    escape_html(&chart.title),
                    svg
                ),
                Err(e) => {
                    log::warn!("{}", e);
                    format!(
                        "<div class=\"chart-block chart-unavailable\">\n<h3>{}</h3>\n<p>Chart unavailable</p>\n</div>\n",
                        escape_html(&chart.title)
                    )
                }
            })
            .collect();

        if blocks.is_empty() {
            return String::new();
        }
        format!("<section class=\"charts\">\n<h2>Charts</h2>\n{}</section>\n", blocks.concat())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn push_chart(
    charts: &mut Vec<ChartSpec>,
    kind: ChartKind,
    title: &str,
    points: Vec<ChartPoint>,
    value_kind: ValueKind,
) {
    if points.is_empty() {
        log::debug!("No data for chart '{}'", title);
        return;
    }
    charts.push(ChartSpec::new(kind, title, points).with_value_kind(value_kind));
}

fn name_or(name: &Option<String>, fallback: &str) -> String {
    name.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn raw(value: f64) -> String {
    value.to_string()
}

struct TableBuilder {
    table: ReportTable,
}

impl TableBuilder {
    fn new(title: &str, headers: &[&str]) -> Self {
        Self {
            table: ReportTable {
                title: title.to_string(),
                headers: headers.iter().map(|h| h.to_string()).collect(),
                rows: Vec::new(),
                raw_rows: Vec::new(),
            },
        }
    }

    fn row(&mut self, cells: Vec<String>, raw_cells: Vec<String>) {
        self.table.rows.push(cells);
        self.table.raw_rows.push(raw_cells);
    }

    fn push_into(self, tables: &mut Vec<ReportTable>) {
        if self.table.rows.is_empty() {
            log::debug!("No rows for table '{}'", self.table.title);
        } else {
            tables.push(self.table);
        }
    }
}

fn metric_card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric-card\"><div class=\"metric-value\">{}</div><div class=\"metric-label\">{}</div></div>\n",
        escape_html(value),
        escape_html(label)
    )
}

pub(crate) fn list_block(title: &str, class: &str, items: &[String]) -> String {
    let mut html = format!(
        "<div class=\"section {}\">\n<h3>{}</h3>\n<ul>\n",
        class,
        escape_html(title)
    );
    for item in items {
        html.push_str(&format!("<li>{}</li>\n", escape_html(item)));
    }
    html.push_str("</ul>\n</div>\n");
    html
}

pub(crate) fn tables_block(tables: &[ReportTable]) -> String {
    let tables: Vec<&ReportTable> = tables.iter().filter(|t| !t.rows.is_empty()).collect();
    if tables.is_empty() {
        return String::new();
    }

    let mut html = String::from("<section class=\"details\">\n<h2>Details</h2>\n");
    for table in tables {
        html.push_str(&format!("<h3>{}</h3>\n<table>\n<tr>", escape_html(&table.title)));
        for header in &table.headers {
            html.push_str(&format!("<th>{}</th>", escape_html(header)));
        }
        html.push_str("</tr>\n");
        for row in &table.rows {
            html.push_str("<tr>");
            for (i, cell) in row.iter().enumerate() {
                let class = if i == 0 { "" } else { " class=\"num\"" };
                html.push_str(&format!("<td{}>{}</td>", class, escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</table>\n");
    }
    html.push_str("</section>\n");
    html
}
