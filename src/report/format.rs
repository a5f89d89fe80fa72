// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Locale-fixed number formatting and HTML helpers
//!
//! Every number that reaches a report goes through one [`NumberFormat`], so a
//! metric card, a table cell and a chart label never disagree on separators.

use serde::{Deserialize, Serialize};

/// How a value should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Rounded integer with the currency suffix
    Currency,
    /// Rounded integer
    Count,
    /// One decimal place
    Decimal,
    /// One decimal place with a percent sign
    Percent,
}

/// Separators and currency suffix used across a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    pub thousands_separator: String,
    pub decimal_separator: String,
    pub currency_suffix: String,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            currency_suffix: "₫".to_string(),
        }
    }
}

impl NumberFormat {
    /// Rounded integer with thousands separators: `1250000` -> `1.250.000`
    pub fn integer(&self, value: f64) -> String {
        if !value.is_finite() {
            return "-".to_string();
        }
        let rounded = value.round();
        if rounded == 0.0 {
            return "0".to_string();
        }
        let digits = format!("{:.0}", rounded.abs());
        let grouped = self.group(&digits);
        if rounded < 0.0 {
            format!("-{}", grouped)
        } else {
            grouped
        }
    }

    /// Fixed decimal places: `4.5` -> `4,5`
    pub fn decimal(&self, value: f64, places: usize) -> String {
        if !value.is_finite() {
            return "-".to_string();
        }
        let text = format!("{:.*}", places, value.abs());
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (text.clone(), None),
        };
        let is_zero = text.chars().all(|c| c == '0' || c == '.');
        let mut out = String::new();
        if value < 0.0 && !is_zero {
            out.push('-');
        }
        out.push_str(&self.group(&int_part));
        if let Some(frac) = frac_part {
            out.push_str(&self.decimal_separator);
            out.push_str(&frac);
        }
        out
    }

    /// Integer amount with the currency suffix: `1.250.000 ₫`
    pub fn currency(&self, value: f64) -> String {
        if self.currency_suffix.is_empty() {
            self.integer(value)
        } else {
            format!("{} {}", self.integer(value), self.currency_suffix)
        }
    }

    pub fn percent(&self, value: f64) -> String {
        format!("{}%", self.decimal(value, 1))
    }

    pub fn value(&self, value: f64, kind: ValueKind) -> String {
        match kind {
            ValueKind::Currency => self.currency(value),
            ValueKind::Count => self.integer(value),
            ValueKind::Decimal => self.decimal(value, 1),
            ValueKind::Percent => self.percent(value),
        }
    }

    fn group(&self, digits: &str) -> String {
        let len = digits.len();
        let mut out = String::with_capacity(len + len / 3 * self.thousands_separator.len());
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                out.push_str(&self.thousands_separator);
            }
            out.push(ch);
        }
        out
    }
}

/// Escape text for HTML element and attribute content
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Cut a label to `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        return label.to_string();
    }
    let keep = max_chars.saturating_sub(1);
    let mut out: String = label.chars().take(keep).collect();
    out.push('…');
    out
}

/// File-name friendly form of an entity label: `District 1 / Q1` -> `district_1_q1`
pub fn slugify(label: &str) -> String {
    let mut out = String::new();
    let mut pending_sep = false;
    for ch in label.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    if out.is_empty() {
        "report".to_string()
    } else {
        out
    }
}
