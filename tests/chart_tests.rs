//! Tests for the inline SVG chart renderers

use cafereport::error::ReportError;
use cafereport::report::{
    pie_sectors, render_bar_chart, render_forecast_chart, render_line_chart, render_pie_chart,
    ChartKind, ChartPoint, ChartSpec, ChartStyle,
};

fn style() -> ChartStyle {
    ChartStyle::default()
}

// ============================================================================
// Empty Input Tests
// ============================================================================

mod empty_chart_tests {
    use super::*;

    #[test]
    fn test_every_renderer_returns_empty_markup() {
        assert_eq!(render_bar_chart(&[], &style()).unwrap(), "");
        assert_eq!(render_line_chart(&[], &style()).unwrap(), "");
        assert_eq!(render_forecast_chart(&[], &style()).unwrap(), "");
        assert_eq!(render_pie_chart(&[], &style()).unwrap(), "");
    }

    #[test]
    fn test_all_zero_series_have_no_nan() {
        let zeros = vec![ChartPoint::new("a", 0.0), ChartPoint::new("b", 0.0)];
        for kind in [ChartKind::Bar, ChartKind::Line, ChartKind::ForecastBand, ChartKind::Pie] {
            let svg = ChartSpec::new(kind, "zeros", zeros.clone()).render(&style()).unwrap();
            assert!(svg.starts_with("<svg"), "{} chart missing", kind.name());
            assert!(!svg.contains("NaN"), "{} chart has NaN", kind.name());
        }
    }
}

// ============================================================================
// Bar Chart Tests
// ============================================================================

mod bar_chart_tests {
    use super::*;

    #[test]
    fn test_bar_lengths_are_relative_to_max() {
        let points = vec![ChartPoint::new("Espresso", 40.0), ChartPoint::new("Latte", 0.0)];
        let svg = render_bar_chart(&points, &style()).unwrap();

        assert!(svg.contains(r#"width="380.0""#));
        assert!(svg.contains(r#"width="0.0""#));
        assert!(svg.contains(">Espresso<"));
        assert!(svg.contains(">40<"));
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let points = vec![ChartPoint::new("Caramel Macchiato Extra Large Iced", 10.0)];
        let svg = render_bar_chart(&points, &style()).unwrap();
        assert!(svg.contains("…"));
        // full name kept in the tooltip
        assert!(svg.contains("<title>Caramel Macchiato Extra Large Iced: 10</title>"));
    }

    #[test]
    fn test_negative_bar_is_clamped_and_annotated() {
        let points = vec![ChartPoint::new("Refunds", -5.0), ChartPoint::new("Sales", 10.0)];
        let svg = render_bar_chart(&points, &style()).unwrap();
        assert!(svg.contains(r#"width="0.0""#));
        assert!(svg.contains("-5 (negative)"));
    }

    #[test]
    fn test_labels_are_escaped() {
        let points = vec![ChartPoint::new("<b>Tea & Co</b>", 1.0)];
        let svg = render_bar_chart(&points, &style()).unwrap();
        assert!(svg.contains("&lt;b&gt;Tea &amp; Co"));
        assert!(!svg.contains("<b>"));
    }
}

// ============================================================================
// Line and Forecast Chart Tests
// ============================================================================

mod line_chart_tests {
    use super::*;

    #[test]
    fn test_line_has_area_markers_and_labels() {
        let points: Vec<ChartPoint> = (7..=10)
            .map(|h| ChartPoint::new(format!("{:02}h", h), (h * 1000) as f64))
            .collect();
        let svg = render_line_chart(&points, &style()).unwrap();
        assert!(svg.contains(r#"class="area""#));
        assert!(svg.contains(r#"class="line""#));
        assert_eq!(svg.matches(r#"class="marker""#).count(), 4);
        assert!(svg.contains(">07h<"));
        assert!(svg.contains(">10h<"));
    }

    #[test]
    fn test_flat_line_does_not_divide_by_zero() {
        let points = vec![ChartPoint::new("a", 5.0), ChartPoint::new("b", 5.0)];
        let svg = render_line_chart(&points, &style()).unwrap();
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_negative_forecast_is_drawn_at_zero() {
        let points = vec![ChartPoint::new("Mon", -15.0).with_range(Some(-20.0), Some(-5.0))];
        let svg = render_forecast_chart(&points, &style()).unwrap();
        assert!(svg.contains(r#"data-plotted="0""#));
        assert!(svg.contains("-15"));
        assert!(svg.contains("negative"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_missing_bounds_give_zero_width_band() {
        let points = vec![ChartPoint::new("Mon", 100.0), ChartPoint::new("Tue", 200.0)];
        let svg = render_forecast_chart(&points, &style()).unwrap();
        assert!(svg.contains(r#"class="confidence-band""#));
        assert!(svg.contains(r#"class="forecast-line""#));
    }

    #[test]
    fn test_non_finite_value_is_unavailable() {
        let points = vec![ChartPoint::new("a", f64::NAN)];
        let err = render_line_chart(&points, &style()).unwrap_err();
        assert!(matches!(err, ReportError::ChartUnavailable { .. }));

        let points = vec![ChartPoint::new("a", 1.0).with_range(None, Some(f64::INFINITY))];
        assert!(render_forecast_chart(&points, &style()).is_err());
    }
}

// ============================================================================
// Pie Chart Tests
// ============================================================================

mod pie_chart_tests {
    use super::*;

    fn inventory() -> Vec<ChartPoint> {
        vec![
            ChartPoint::new("good", 3.0),
            ChartPoint::new("warning", 0.0),
            ChartPoint::new("critical", 1.0),
        ]
    }

    #[test]
    fn test_sweeps_sum_to_full_circle() {
        let sectors = pie_sectors(&inventory());
        let total: f64 = sectors.iter().map(|s| s.sweep()).sum();
        assert!((total - 360.0).abs() < 1e-9);
        assert_eq!(sectors[0].sweep(), 270.0);
        assert_eq!(sectors[1].sweep(), 0.0);
        assert_eq!(sectors[2].end_angle, 360.0);
    }

    #[test]
    fn test_zero_sector_is_listed_but_not_drawn() {
        let svg = render_pie_chart(&inventory(), &style()).unwrap();
        assert_eq!(svg.matches(r#"class="slice""#).count(), 2);
        assert!(svg.contains("warning: 0"));
    }

    #[test]
    fn test_all_zero_pie_draws_placeholder() {
        let points = vec![ChartPoint::new("cash", 0.0), ChartPoint::new("card", 0.0)];
        let sectors = pie_sectors(&points);
        assert!(sectors.iter().all(|s| s.sweep() == 0.0));

        let svg = render_pie_chart(&points, &style()).unwrap();
        assert!(svg.contains("pie-empty"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_negative_category_counts_as_zero() {
        let points = vec![ChartPoint::new("cash", -2.0), ChartPoint::new("card", 2.0)];
        let sectors = pie_sectors(&points);
        assert_eq!(sectors[0].sweep(), 0.0);
        assert_eq!(sectors[1].sweep(), 360.0);
        let svg = render_pie_chart(&points, &style()).unwrap();
        assert!(svg.contains("-2 (negative)"));
    }
}
