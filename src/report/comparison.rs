// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Multi-branch comparison report

use super::charts::{ChartKind, ChartPoint, ChartSpec};
use super::composer::{
    file_stem, metric_rows, report_date, tables_block, RenderedDocument, ReportComposer, ReportTable,
};
use super::format::ValueKind;
use super::normalize::normalize;
use super::sections::{parse_sections, ParseOptions, ParsedSections, SectionKeywords};
use crate::models::{BranchSummary, ComparisonPayload};

/// Label used for a branch without a name
const UNNAMED_BRANCH: &str = "Unnamed branch";

impl ReportComposer {
    /// Compose a report comparing the branches of one payload
    pub fn build_comparison(&self, payload: &ComparisonPayload) -> RenderedDocument {
        let narrative = payload.narrative_text.as_deref().unwrap_or_default();
        let normalized = normalize(narrative);
        let sections = parse_sections(
            narrative,
            &SectionKeywords::comparison(),
            &ParseOptions::from(self.config()),
        );

        let date = report_date(payload.report_date.as_deref());
        let stem = file_stem("comparison", date);

        let mut html = self.document_head(&stem);
        html.push_str(&self.header_block(
            "Branch Comparison",
            &format!("{} branches", payload.branches.len()),
            date,
        ));

        if let Some(table) = self.branch_table(&payload.branches) {
            let block = tables_block(std::slice::from_ref(&table));
            html.push_str(&block.replacen("<h2>Details</h2>", "<h2>Key Metrics by Branch</h2>", 1));
        } else {
            log::debug!("No branches in comparison payload");
        }

        html.push_str(&self.charts_block(&self.comparison_charts(&payload.branches)));
        html.push_str(&self.comparison_narrative(&sections, &normalized));
        html.push_str(&self.footer_block());

        RenderedDocument {
            file_stem: stem,
            html,
        }
    }

    /// One row per branch, one column per metric any branch reported
    pub fn branch_table(&self, branches: &[BranchSummary]) -> Option<ReportTable> {
        if branches.is_empty() {
            return None;
        }

        let mut union = std::collections::BTreeMap::new();
        for branch in branches {
            for key in branch.summary_metrics.keys() {
                union.insert(key.clone(), 0.0);
            }
        }
        let columns = metric_rows(&union);

        let mut headers = vec!["Branch".to_string()];
        headers.extend(columns.iter().map(|c| c.label.clone()));

        let fmt = &self.config().number_format;
        let mut rows = Vec::new();
        let mut raw_rows = Vec::new();
        for branch in branches {
            let name = branch_name(branch);
            let mut row = vec![name.clone()];
            let mut raw_row = vec![name];
            for column in &columns {
                match branch.summary_metrics.get(&column.key) {
                    Some(value) => {
                        row.push(fmt.value(*value, column.kind));
                        raw_row.push(value.to_string());
                    }
                    None => {
                        row.push("-".to_string());
                        raw_row.push(String::new());
                    }
                }
            }
            rows.push(row);
            raw_rows.push(raw_row);
        }

        Some(ReportTable {
            title: "Branches".to_string(),
            headers,
            rows,
            raw_rows,
        })
    }

    /// Revenue and order bars by branch
    pub fn comparison_charts(&self, branches: &[BranchSummary]) -> Vec<ChartSpec> {
        if branches.is_empty() {
            return Vec::new();
        }

        let bars = |key: &str| -> Vec<ChartPoint> {
            branches
                .iter()
                .map(|b| ChartPoint::new(branch_name(b), b.metric(key)))
                .collect()
        };

        let reported = |key: &str| branches.iter().any(|b| b.summary_metrics.contains_key(key));

        let mut charts = Vec::new();
        if reported("total_revenue") {
            charts.push(
                ChartSpec::new(ChartKind::Bar, "Revenue by Branch", bars("total_revenue"))
                    .with_value_kind(ValueKind::Currency),
            );
        }
        if reported("total_orders") {
            charts.push(ChartSpec::new(ChartKind::Bar, "Orders by Branch", bars("total_orders")));
        }
        charts
    }

    fn comparison_narrative(&self, sections: &ParsedSections, normalized: &str) -> String {
        self.narrative_block(sections, normalized)
            .replacen("<h2>Analysis</h2>", "<h2>Comparison Analysis</h2>", 1)
    }
}

fn branch_name(branch: &BranchSummary) -> String {
    branch
        .branch_label
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNNAMED_BRANCH)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;

    fn branch(name: &str, revenue: f64) -> BranchSummary {
        let mut summary = BranchSummary {
            branch_label: Some(name.to_string()),
            ..Default::default()
        };
        summary.summary_metrics.insert("total_revenue".to_string(), revenue);
        summary
    }

    #[test]
    fn test_branch_table_marks_missing_metrics() {
        let composer = ReportComposer::new(ReportConfig::default());
        let mut second = branch("District 3", 900_000.0);
        second.summary_metrics.insert("total_orders".to_string(), 42.0);

        let table = composer
            .branch_table(&[branch("District 1", 1_250_000.0), second])
            .unwrap();
        assert_eq!(table.headers, vec!["Branch", "Total revenue", "Orders"]);
        assert_eq!(table.rows[0], vec!["District 1", "1.250.000 ₫", "-"]);
        assert_eq!(table.rows[1][2], "42");
    }

    #[test]
    fn test_comparison_document() {
        let composer = ReportComposer::new(ReportConfig::default());
        let payload = ComparisonPayload {
            report_date: Some("2024-05-01".to_string()),
            narrative_text: Some("## Comparison\nDistrict 1 outsold District 3 by a wide margin".to_string()),
            branches: vec![branch("District 1", 1_250_000.0), branch("District 3", 900_000.0)],
        };

        let doc = composer.build_comparison(&payload);
        assert_eq!(doc.file_stem, "report_comparison_2024_05_01");
        assert!(doc.html.contains("Key Metrics by Branch"));
        assert!(doc.html.contains("Revenue by Branch"));
        assert!(doc.html.contains("outsold District 3"));
        assert!(!doc.html.contains("Orders by Branch"));
    }

    #[test]
    fn test_unreported_revenue_has_no_chart() {
        let composer = ReportComposer::new(ReportConfig::default());
        let mut orders_only = BranchSummary {
            branch_label: Some("District 1".to_string()),
            ..Default::default()
        };
        orders_only.summary_metrics.insert("total_orders".to_string(), 42.0);

        let charts = composer.comparison_charts(std::slice::from_ref(&orders_only));
        let titles: Vec<&str> = charts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Orders by Branch"]);

        let doc = composer.build_comparison(&ComparisonPayload {
            branches: vec![orders_only],
            ..Default::default()
        });
        assert!(!doc.html.contains("Revenue by Branch"));
        assert!(doc.html.contains("Orders by Branch"));
    }

    #[test]
    fn test_empty_comparison_has_no_blocks() {
        let composer = ReportComposer::new(ReportConfig::default());
        let doc = composer.build_comparison(&ComparisonPayload::default());
        assert!(!doc.html.contains("<table"));
        assert!(!doc.html.contains("<svg"));
        assert!(doc.html.contains("class=\"footer\""));
    }
}
