// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Narrative inspection commands

use anyhow::Result;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use super::render::read_input;
use crate::colors::{Status, StyledText};
use crate::config::ReportConfig;
use crate::report::{normalize, parse_sections, ParseOptions, SectionKeywords};

#[derive(Tabled)]
struct SectionRow {
    #[tabled(rename = "Section")]
    section: String,
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Line")]
    line: String,
}

/// Print cleaned-up narrative text
pub fn normalize_text(input: &str) -> Result<()> {
    let text = read_input(input)?;
    println!("{}", normalize(&text));
    Ok(())
}

/// Show which lines land in which section
pub fn show_sections(input: &str, comparison: bool) -> Result<()> {
    let config = ReportConfig::load()?;
    let text = read_input(input)?;
    let keywords = if comparison {
        SectionKeywords::comparison()
    } else {
        SectionKeywords::single_branch()
    };

    let parsed = parse_sections(&text, &keywords, &ParseOptions::from(&config));

    if parsed.is_empty() {
        println!("{} No section headings found.", Status::warn());
        return Ok(());
    }

    let rows: Vec<SectionRow> = parsed
        .non_empty()
        .flat_map(|section| {
            section.lines.iter().enumerate().map(move |(i, line)| SectionRow {
                section: section.label.title().to_string(),
                index: i + 1,
                line: line.clone(),
            })
        })
        .collect();

    let table = Table::new(rows).with(TableStyle::ascii_rounded()).to_string();
    println!("{}", table);

    let found = parsed.non_empty().count();
    println!(
        "\n{} {} of {} sections filled",
        Status::summary(),
        found.to_string().count(),
        keywords.labels().len()
    );
    if parsed.discarded_preamble > 0 {
        println!(
            "{} {} line(s) before the first heading were skipped",
            Status::info(),
            parsed.discarded_preamble
        );
    }
    Ok(())
}
