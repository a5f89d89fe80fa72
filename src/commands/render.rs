// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Report rendering commands

use anyhow::{Context, Result};
use colored::*;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::colors::Status;
use crate::config::ReportConfig;
use crate::error::ReportError;
use crate::models::{AnalyticsPayload, ComparisonPayload};
use crate::report::{
    export_to_printable, BrowserHost, FileHost, PrintHost, ReportFormat, ReportGenerator,
    ReportSource,
};

/// Read a file, or stdin when `source` is `-`
pub fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

/// Parse a payload as YAML or JSON depending on the file extension
pub fn parse_payload<T: DeserializeOwned>(source: &str, text: &str) -> crate::error::Result<T> {
    let is_yaml = Path::new(source)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(text).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| ReportError::InvalidPayload(format!("{}: {}", source, e)))
}

/// Render a payload file to disk, or open it for printing
pub fn render_report(
    payload: &str,
    comparison: bool,
    format: ReportFormat,
    output: Option<PathBuf>,
    print: bool,
    no_open: bool,
) -> Result<()> {
    let config = ReportConfig::load()?;
    let dir = output.unwrap_or_else(|| config.output_dir());
    let settle_delay = Duration::from_millis(config.settle_delay_ms);
    let browser = config.browser.clone();
    let generator = ReportGenerator::new(config);

    let text = read_input(payload)?;
    let branch: AnalyticsPayload;
    let multi: ComparisonPayload;
    let source = if comparison {
        multi = parse_payload(payload, &text)?;
        ReportSource::Comparison(&multi)
    } else {
        branch = parse_payload(payload, &text)?;
        ReportSource::Branch(&branch)
    };

    if print {
        let document = generator.document(source);
        let mut host: Box<dyn PrintHost> = if no_open {
            Box::new(FileHost::new(&dir))
        } else {
            Box::new(BrowserHost::new(&dir, browser))
        };

        match export_to_printable(&document, host.as_mut(), settle_delay) {
            Ok(()) => {
                println!(
                    "{} Sent {} to print",
                    Status::ok(),
                    document.pdf_file_name().cyan()
                );
                Ok(())
            }
            Err(e @ ReportError::SurfaceBlocked(_)) => Err(e.into()),
            Err(e) => Err(e).context("Failed to export report"),
        }
    } else {
        let report = generator.generate(source, format)?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        let path = dir.join(&report.filename);
        std::fs::write(&path, &report.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        println!(
            "{} Wrote {} ({} bytes)",
            Status::ok(),
            path.display().to_string().cyan(),
            report.size_bytes.to_string().yellow()
        );
        Ok(())
    }
}
