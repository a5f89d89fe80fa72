// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Report generation module
//!
//! Produces finished reports in HTML, CSV or JSON from analytics payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::composer::{
    file_stem, metric_rows, report_date, MetricRow, RenderedDocument, ReportComposer, ReportTable,
};
use super::normalize::normalize;
use super::sections::{parse_sections, ParseOptions, ParsedSections, SectionKeywords};
use crate::config::ReportConfig;
use crate::error::Result;
use crate::models::{AnalyticsPayload, ComparisonPayload};

// ============================================================================
// Report Types
// ============================================================================

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Report type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// One branch, or the whole chain, on one date
    Branch,
    /// Several branches side by side
    Comparison,
}

/// Payload a report is generated from
#[derive(Debug, Clone, Copy)]
pub enum ReportSource<'a> {
    Branch(&'a AnalyticsPayload),
    Comparison(&'a ComparisonPayload),
}

impl ReportSource<'_> {
    pub fn kind(&self) -> ReportKind {
        match self {
            ReportSource::Branch(_) => ReportKind::Branch,
            ReportSource::Comparison(_) => ReportKind::Comparison,
        }
    }
}

/// Generated report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report ID
    pub id: Uuid,
    /// Report type
    pub kind: ReportKind,
    /// Report format
    pub format: ReportFormat,
    /// Generated at
    pub generated_at: DateTime<Utc>,
    /// Report title
    pub title: String,
    /// `report_<entity>_<YYYY_MM_DD>` plus the format's extension
    pub filename: String,
    pub content: String,
    /// Content size in bytes
    pub size_bytes: usize,
}

/// Machine-readable body of a JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub title: String,
    pub entity: String,
    pub report_date: String,
    pub metrics: Vec<MetricRow>,
    pub sections: ParsedSections,
    pub recommendations: Vec<String>,
    pub tables: Vec<ReportTable>,
}

// ============================================================================
// Report Generator
// ============================================================================

/// Report generator
pub struct ReportGenerator {
    composer: ReportComposer,
}

impl ReportGenerator {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            composer: ReportComposer::new(config),
        }
    }

    pub fn composer(&self) -> &ReportComposer {
        &self.composer
    }

    /// Printable document for the HTML path and the print host
    pub fn document(&self, source: ReportSource<'_>) -> RenderedDocument {
        match source {
            ReportSource::Branch(payload) => self.composer.build(payload),
            ReportSource::Comparison(payload) => self.composer.build_comparison(payload),
        }
    }

    /// Generate a report in the requested format
    pub fn generate(&self, source: ReportSource<'_>, format: ReportFormat) -> Result<Report> {
        let data = self.report_data(source);
        let content = match format {
            ReportFormat::Html => self.document(source).html,
            ReportFormat::Csv => self.generate_csv(&data),
            ReportFormat::Json => serde_json::to_string_pretty(&data)?,
        };

        let date = chrono::NaiveDate::parse_from_str(&data.report_date, "%Y-%m-%d")
            .unwrap_or_else(|_| chrono::Local::now().date_naive());
        let entity = match source {
            ReportSource::Branch(_) => data.entity.as_str(),
            ReportSource::Comparison(_) => "comparison",
        };
        let filename = format!("{}.{}", file_stem(entity, date), format.extension());

        log::info!("Generated {} report {} ({} bytes)", format.extension(), filename, content.len());

        Ok(Report {
            id: Uuid::new_v4(),
            kind: source.kind(),
            format,
            generated_at: Utc::now(),
            title: data.title,
            filename,
            size_bytes: content.len(),
            content,
        })
    }

    /// Everything a report shows, without layout
    pub fn report_data(&self, source: ReportSource<'_>) -> ReportData {
        let options = ParseOptions::from(self.composer.config());
        match source {
            ReportSource::Branch(payload) => {
                let narrative = payload.narrative_text.as_deref().unwrap_or_default();
                let date = report_date(payload.report_date.as_deref());
                ReportData {
                    title: format!("Business Report - {}", payload.branch_label()),
                    entity: payload.branch_label().to_string(),
                    report_date: date.format("%Y-%m-%d").to_string(),
                    metrics: metric_rows(&payload.summary_metrics),
                    sections: parse_sections(narrative, &SectionKeywords::single_branch(), &options),
                    recommendations: payload
                        .recommendations
                        .iter()
                        .map(|r| normalize(r))
                        .filter(|r| !r.is_empty())
                        .collect(),
                    tables: self.composer.tables_for(payload),
                }
            }
            ReportSource::Comparison(payload) => {
                let narrative = payload.narrative_text.as_deref().unwrap_or_default();
                let date = report_date(payload.report_date.as_deref());
                ReportData {
                    title: "Branch Comparison".to_string(),
                    entity: format!("{} branches", payload.branches.len()),
                    report_date: date.format("%Y-%m-%d").to_string(),
                    metrics: Vec::new(),
                    sections: parse_sections(narrative, &SectionKeywords::comparison(), &options),
                    recommendations: Vec::new(),
                    tables: self
                        .composer
                        .branch_table(&payload.branches)
                        .into_iter()
                        .collect(),
                }
            }
        }
    }

    /// Generate CSV report with raw, unformatted numbers
    fn generate_csv(&self, data: &ReportData) -> String {
        let mut csv = String::new();

        csv.push_str(&format!("{}\n", csv_field(&data.title)));
        csv.push_str(&format!("Report date,{}\n", data.report_date));

        if !data.metrics.is_empty() {
            csv.push_str("\nKey Metrics\n");
            csv.push_str("Metric,Value\n");
            for metric in &data.metrics {
                csv.push_str(&format!("{},{}\n", csv_field(&metric.label), metric.value));
            }
        }

        for table in &data.tables {
            csv.push_str(&format!("\n{}\n", csv_field(&table.title)));
            csv.push_str(&csv_row(&table.headers));
            for row in &table.raw_rows {
                csv.push_str(&csv_row(row));
            }
        }

        csv
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}

/// Quote a CSV field when it contains a separator, quote or newline
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn csv_row(cells: &[String]) -> String {
    let fields: Vec<String> = cells.iter().map(|c| csv_field(c)).collect();
    format!("{}\n", fields.join(","))
}
