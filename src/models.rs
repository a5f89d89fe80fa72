// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Analytics payload models
//!
//! The reporting backend's schema moves faster than this crate, so every field
//! is optional on the wire. Missing numbers read as 0 and missing groups read
//! as empty; the composer decides what to leave out.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Lenient field helpers
// ============================================================================

/// Reads a number that may arrive as a JSON number, a numeric string or null.
fn number_from_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_number_map<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| {
            let n = number_from_value(&v).unwrap_or(0.0);
            (k, n)
        })
        .collect())
}

// ============================================================================
// Single-branch payload
// ============================================================================

/// Analytics payload for one branch (or the whole chain) on one report date
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsPayload {
    #[serde(alias = "branchLabel", alias = "branch_name", deserialize_with = "lenient_string")]
    pub branch_label: Option<String>,

    #[serde(alias = "reportDate", deserialize_with = "lenient_string")]
    pub report_date: Option<String>,

    #[serde(alias = "narrativeText", alias = "analysis", deserialize_with = "lenient_string")]
    pub narrative_text: Option<String>,

    #[serde(alias = "summaryMetrics", alias = "summary", deserialize_with = "lenient_number_map")]
    pub summary_metrics: BTreeMap<String, f64>,

    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,

    #[serde(alias = "rawSeries", alias = "raw_data", deserialize_with = "null_as_default")]
    pub raw_series: RawSeries,
}

impl AnalyticsPayload {
    /// Branch label, or the chain-wide label when absent
    pub fn branch_label(&self) -> &str {
        self.branch_label
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("All branches")
    }

    /// Metric value, 0 when absent
    pub fn metric(&self, key: &str) -> f64 {
        self.summary_metrics.get(key).copied().unwrap_or(0.0)
    }
}

/// Named datasets attached to a payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawSeries {
    #[serde(alias = "revenueByHour", deserialize_with = "null_as_default")]
    pub revenue_by_hour: Vec<HourlyRevenue>,

    #[serde(alias = "topProducts", deserialize_with = "null_as_default")]
    pub top_products: Vec<ProductStat>,

    #[serde(alias = "topCustomers", deserialize_with = "null_as_default")]
    pub top_customers: Vec<CustomerStat>,

    #[serde(alias = "inventoryAlerts", deserialize_with = "null_as_default")]
    pub inventory_alerts: Vec<InventoryAlert>,

    /// Star rating ("1".."5") to review count
    #[serde(alias = "reviewDistribution", deserialize_with = "lenient_number_map")]
    pub review_distribution: BTreeMap<String, f64>,

    #[serde(alias = "forecastSeries", deserialize_with = "null_as_default")]
    pub forecast: Vec<ForecastPoint>,

    #[serde(alias = "paymentMethods", deserialize_with = "null_as_default")]
    pub payment_methods: Vec<PaymentStat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyRevenue {
    #[serde(deserialize_with = "lenient_number")]
    pub hour: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub revenue: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductStat {
    #[serde(alias = "productName", deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(alias = "quantitySold", deserialize_with = "lenient_number")]
    pub quantity_sold: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub revenue: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerStat {
    #[serde(alias = "customerName", deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(alias = "orderCount", deserialize_with = "lenient_number")]
    pub order_count: Option<f64>,
    #[serde(alias = "totalSpent", deserialize_with = "lenient_number")]
    pub total_spent: Option<f64>,
}

/// Stock level of one ingredient
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryAlert {
    #[serde(alias = "ingredientName", alias = "name", deserialize_with = "lenient_string")]
    pub ingredient_name: Option<String>,
    #[serde(alias = "currentStock", deserialize_with = "lenient_number")]
    pub current_stock: Option<f64>,
    #[serde(alias = "minStock", deserialize_with = "lenient_number")]
    pub min_stock: Option<f64>,
    #[serde(deserialize_with = "lenient_string")]
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

/// Coarse stock status used for the inventory pie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Good,
    Warning,
    Critical,
}

impl StockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::Good => "good",
            StockStatus::Warning => "warning",
            StockStatus::Critical => "critical",
        }
    }
}

impl InventoryAlert {
    /// Explicit status when the backend sent one, otherwise derived from the
    /// stock levels: at or below half the minimum is critical, at or below
    /// the minimum is a warning.
    pub fn stock_status(&self) -> StockStatus {
        match self.status.as_deref().map(|s| s.trim().to_lowercase()) {
            Some(s) if s == "critical" || s == "out" || s == "out_of_stock" => StockStatus::Critical,
            Some(s) if s == "warning" || s == "low" || s == "low_stock" => StockStatus::Warning,
            Some(s) if s == "good" || s == "ok" || s == "normal" => StockStatus::Good,
            _ => {
                let current = self.current_stock.unwrap_or(0.0);
                let min = self.min_stock.unwrap_or(0.0);
                if current <= min / 2.0 {
                    StockStatus::Critical
                } else if current <= min {
                    StockStatus::Warning
                } else {
                    StockStatus::Good
                }
            }
        }
    }
}

/// One step of the revenue forecast with an optional confidence interval
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastPoint {
    #[serde(alias = "date", deserialize_with = "lenient_string")]
    pub label: Option<String>,
    #[serde(alias = "predicted", deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(alias = "lower", alias = "lowerBound", deserialize_with = "lenient_number")]
    pub min: Option<f64>,
    #[serde(alias = "upper", alias = "upperBound", deserialize_with = "lenient_number")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentStat {
    #[serde(alias = "paymentMethod", deserialize_with = "lenient_string")]
    pub method: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub count: Option<f64>,
    #[serde(alias = "total", deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
}

// ============================================================================
// Multi-branch payload
// ============================================================================

/// Payload for a report comparing several branches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonPayload {
    #[serde(alias = "reportDate", deserialize_with = "lenient_string")]
    pub report_date: Option<String>,

    #[serde(alias = "narrativeText", alias = "analysis", deserialize_with = "lenient_string")]
    pub narrative_text: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub branches: Vec<BranchSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchSummary {
    #[serde(alias = "branchLabel", alias = "branch_name", deserialize_with = "lenient_string")]
    pub branch_label: Option<String>,

    #[serde(alias = "summaryMetrics", alias = "summary", deserialize_with = "lenient_number_map")]
    pub summary_metrics: BTreeMap<String, f64>,
}

impl BranchSummary {
    pub fn metric(&self, key: &str) -> f64 {
        self.summary_metrics.get(key).copied().unwrap_or(0.0)
    }
}
