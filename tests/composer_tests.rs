//! Tests for document composition and report generation

use cafereport::config::ReportConfig;
use cafereport::models::AnalyticsPayload;
use cafereport::report::{
    ChartKind, ChartPoint, ChartSpec, ComposeInput, ParsedSections, ReportComposer,
    ReportFormat, ReportGenerator, ReportSource,
};

fn composer() -> ReportComposer {
    ReportComposer::new(ReportConfig::default())
}

fn full_payload() -> AnalyticsPayload {
    serde_json::from_value(serde_json::json!({
        "branchLabel": "District 1",
        "reportDate": "2024-05-01",
        "narrativeText": "## Summary\n- **Revenue** reached a weekly high (ID: 17)\n## Recommendations\n- Add a second barista for the morning rush",
        "summaryMetrics": {
            "total_orders": 120,
            "total_revenue": 1250000,
            "avg_rating": 4.56,
            "refund_amount": "35000"
        },
        "recommendations": ["Reorder oat milk before Friday", "  "],
        "rawSeries": {
            "revenueByHour": [{"hour": 7, "revenue": 150000}, {"hour": 8, "revenue": 420000}],
            "topProducts": [
                {"name": "Espresso", "quantitySold": 40, "revenue": 1200000},
                {"name": "Latte", "quantitySold": 0, "revenue": 0}
            ],
            "topCustomers": [{"name": "Anh", "orderCount": 3, "totalSpent": 210000}],
            "inventoryAlerts": [
                {"ingredientName": "Milk", "currentStock": 2, "minStock": 10, "unit": "l"},
                {"ingredientName": "Beans", "currentStock": 30, "minStock": 10, "unit": "kg"}
            ],
            "reviewDistribution": {"5": 30, "4": 12, "1": 2},
            "forecast": [{"date": "2024-05-02", "predicted": 1300000, "lower": 1100000, "upper": 1500000}],
            "paymentMethods": [{"method": "cash", "count": 70, "amount": 800000}]
        }
    }))
    .unwrap()
}

// ============================================================================
// Block Layout Tests
// ============================================================================

mod layout_tests {
    use super::*;

    #[test]
    fn test_empty_payload_has_header_and_footer_only() {
        let payload: AnalyticsPayload = serde_json::from_str("{}").unwrap();
        let doc = composer().build(&payload);

        assert!(doc.html.contains("report-header"));
        assert!(doc.html.contains("class=\"footer\""));
        assert!(!doc.html.contains("<svg"));
        assert!(!doc.html.contains("<table"));
        assert!(!doc.html.contains("Chart unavailable"));
        assert!(!doc.html.contains("Key Metrics"));
        assert!(!doc.html.contains("Analysis"));
        assert!(!doc.html.contains("Action Items"));
    }

    #[test]
    fn test_blocks_follow_fixed_order() {
        let doc = composer().build(&full_payload());
        let html = &doc.html;

        let order = [
            "report-header",
            "Key Metrics",
            "<h2>Analysis</h2>",
            "Action Items",
            "<h2>Charts</h2>",
            "<h2>Details</h2>",
            "class=\"footer\"",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|marker| html.find(marker).unwrap_or_else(|| panic!("missing {}", marker)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "blocks out of order: {:?}", positions);
    }

    #[test]
    fn test_chart_order() {
        let doc = composer().build(&full_payload());
        let titles = [
            "Revenue by Hour",
            "Top Products by Revenue",
            "Top Customers by Spend",
            "Revenue Forecast",
            "Inventory Status",
            "Review Distribution",
            "Payment Methods",
        ];
        let positions: Vec<usize> = titles
            .iter()
            .map(|t| doc.html.find(&format!("<h3>{}</h3>\n<svg", t)).unwrap_or_else(|| panic!("missing {}", t)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_file_stem_and_title() {
        let doc = composer().build(&full_payload());
        assert_eq!(doc.file_stem, "report_district_1_2024_05_01");
        assert_eq!(doc.pdf_file_name(), "report_district_1_2024_05_01.pdf");
        assert!(doc.html.contains("<title>report_district_1_2024_05_01</title>"));
    }
}

// ============================================================================
// Content Tests
// ============================================================================

mod content_tests {
    use super::*;

    #[test]
    fn test_metrics_use_locale_format() {
        let doc = composer().build(&full_payload());
        assert!(doc.html.contains("1.250.000"));
        assert!(doc.html.contains("1.250.000 ₫"));
        assert!(doc.html.contains(">4,6<"));
        assert!(doc.html.contains("Refund amount"));
        assert!(doc.html.contains("35.000 ₫"));
    }

    #[test]
    fn test_known_metrics_come_first() {
        let doc = composer().build(&full_payload());
        let revenue = doc.html.find("<td>Total revenue</td>").unwrap();
        let orders = doc.html.find("<td>Orders</td>").unwrap();
        let rating = doc.html.find("<td>Average rating</td>").unwrap();
        let refund = doc.html.find("<td>Refund amount</td>").unwrap();
        assert!(revenue < orders && orders < rating && rating < refund);
    }

    #[test]
    fn test_narrative_is_cleaned_and_sectioned() {
        let doc = composer().build(&full_payload());
        assert!(doc.html.contains("<li>Revenue reached a weekly high</li>"));
        assert!(doc.html.contains("<li>Add a second barista for the morning rush</li>"));
        assert!(!doc.html.contains("ID: 17"));
        assert!(!doc.html.contains("**"));
    }

    #[test]
    fn test_blank_recommendations_are_dropped() {
        let doc = composer().build(&full_payload());
        let actions = doc.html.split("Action Items").nth(1).unwrap();
        let actions = &actions[..actions.find("</ul>").unwrap()];
        assert_eq!(actions.matches("<li>").count(), 1);
    }

    #[test]
    fn test_numbered_markdown_headings_keep_structure() {
        let payload = AnalyticsPayload {
            narrative_text: Some(
                "## 1. Key Strengths\n- Latte remained the best seller with 30 cups\n## 2. Main Weaknesses\n- Risk of stockouts remains high".to_string(),
            ),
            ..Default::default()
        };
        let doc = composer().build(&payload);
        assert!(doc.html.contains("<h3>Strengths</h3>"));
        assert!(doc.html.contains("<h3>Weaknesses</h3>"));
        assert!(doc.html.contains("<li>Risk of stockouts remains high</li>"));
        assert!(!doc.html.contains("<h3>Issues &amp; Anomalies</h3>"));
    }

    #[test]
    fn test_headerless_narrative_falls_back_to_text() {
        let payload = AnalyticsPayload {
            narrative_text: Some("Sales were steady all day.\n\nNo incidents were reported.".to_string()),
            ..Default::default()
        };
        let doc = composer().build(&payload);
        assert!(doc.html.contains("<h2>Analysis</h2>"));
        assert!(doc.html.contains("<p>Sales were steady all day.</p>"));
    }

    #[test]
    fn test_inventory_pie_groups_statuses() {
        let charts = composer().charts_for(&full_payload());
        let inventory = charts.iter().find(|c| c.title == "Inventory Status").unwrap();
        let values: Vec<(&str, f64)> = inventory
            .points
            .iter()
            .map(|p| (p.label.as_str(), p.value))
            .collect();
        assert_eq!(values, vec![("good", 1.0), ("warning", 0.0), ("critical", 1.0)]);
    }

    #[test]
    fn test_failed_chart_becomes_placeholder() {
        let payload = AnalyticsPayload::default();
        let normalized = String::new();
        let sections = ParsedSections::default();
        let charts = vec![
            ChartSpec::new(ChartKind::Bar, "Broken", vec![ChartPoint::new("x", f64::NAN)]),
            ChartSpec::new(ChartKind::Bar, "Working", vec![ChartPoint::new("y", 3.0)]),
        ];

        let doc = composer().compose(&ComposeInput {
            payload: &payload,
            normalized_text: &normalized,
            sections: &sections,
            charts: &charts,
            tables: &[],
        });
        assert!(doc.html.contains("Chart unavailable"));
        assert!(doc.html.contains("<h3>Working</h3>\n<svg"));
    }

    #[test]
    fn test_text_is_escaped() {
        let payload = AnalyticsPayload {
            branch_label: Some("<script>alert(1)</script>".to_string()),
            ..Default::default()
        };
        let doc = composer().build(&payload);
        assert!(!doc.html.contains("<script>"));
        assert!(doc.html.contains("&lt;script&gt;"));
    }
}

// ============================================================================
// Generator Tests
// ============================================================================

mod generator_tests {
    use super::*;

    #[test]
    fn test_all_formats_share_file_stem() {
        let generator = ReportGenerator::default();
        let payload = full_payload();
        for (format, ext) in [
            (ReportFormat::Html, "html"),
            (ReportFormat::Csv, "csv"),
            (ReportFormat::Json, "json"),
        ] {
            let report = generator.generate(ReportSource::Branch(&payload), format).unwrap();
            assert_eq!(report.filename, format!("report_district_1_2024_05_01.{}", ext));
            assert!(report.size_bytes > 0);
        }
    }

    #[test]
    fn test_csv_contains_detail_tables() {
        let generator = ReportGenerator::default();
        let report = generator
            .generate(ReportSource::Branch(&full_payload()), ReportFormat::Csv)
            .unwrap();
        assert!(report.content.contains("Top Products\nProduct,Quantity sold,Revenue\nEspresso,40,1200000\n"));
        assert!(report.content.contains("Inventory Alerts"));
        assert!(report.content.contains("Milk,2,10,l,critical"));
    }
}
