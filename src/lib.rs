// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! cafe-report - Library
//!
//! Turns analytics payloads from a coffee-chain backend into printable
//! business reports.
//!
//! ## Pipeline
//!
//! - **normalize** - strips markdown and database references from narrative text
//! - **sections** - folds the cleaned text into labeled sections
//! - **charts** - renders raw series as inline SVG
//! - **composer** - lays out one printable HTML document
//! - **surface** - hands the document to a print host
//!
//! ```rust,ignore
//! use cafereport::{AnalyticsPayload, ReportComposer, ReportConfig};
//!
//! let payload: AnalyticsPayload = serde_json::from_str(&json)?;
//! let document = ReportComposer::new(ReportConfig::default()).build(&payload);
//! std::fs::write(format!("{}.html", document.file_stem), document.html)?;
//! ```

pub mod cli;
pub mod colors;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod report;

// Re-export commonly used items
pub use cli::{Cli, Commands, ConfigCommands};
pub use config::ReportConfig;
pub use error::{ReportError, Result};
pub use models::{
    AnalyticsPayload, BranchSummary, ComparisonPayload, CustomerStat, ForecastPoint,
    HourlyRevenue, InventoryAlert, PaymentStat, ProductStat, RawSeries, StockStatus,
};
pub use report::{
    export_to_printable, normalize, parse_sections, BrowserHost, ChartPoint, ChartSpec, FileHost,
    NumberFormat, PrintHost, RenderedDocument, Report, ReportComposer, ReportFormat,
    ReportGenerator, SectionKeywords, SectionLabel,
};
