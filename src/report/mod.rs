// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Report pipeline
//!
//! Narrative text flows through [`normalize`] and [`sections`]; raw series
//! become SVG through [`charts`]; [`composer`] lays everything out as one
//! printable HTML document and [`surface`] hands it to a print host.

pub mod charts;
pub mod comparison;
pub mod composer;
pub mod format;
pub mod generator;
pub mod normalize;
pub mod sections;
pub mod surface;

pub use charts::{
    pie_sectors, render_bar_chart, render_forecast_chart, render_line_chart, render_pie_chart,
    ChartKind, ChartPoint, ChartSpec, ChartStyle, PieSector,
};
pub use composer::{ComposeInput, RenderedDocument, ReportComposer, ReportTable};
pub use format::{NumberFormat, ValueKind};
pub use generator::{Report, ReportFormat, ReportGenerator, ReportKind, ReportSource};
pub use normalize::normalize;
pub use sections::{
    classify_line, parse_sections, LineKind, ParseOptions, ParsedSection, ParsedSections,
    SectionKeywords, SectionLabel,
};
pub use surface::{export_to_printable, BrowserHost, FileHost, PrintHost};
