// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Configuration commands

use anyhow::{Context, Result};
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::colors::{Status, StyledText};
use crate::config::{ReportConfig, CONFIG_KEYS};

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Show all settings
pub fn config_show() -> Result<()> {
    let config = ReportConfig::load()?;

    let rows = CONFIG_KEYS
        .iter()
        .map(|key| -> Result<SettingRow> {
            Ok(SettingRow {
                key: key.to_string(),
                value: config.get(key)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let table = Table::new(rows).with(TableStyle::ascii_rounded()).to_string();
    println!("{}", table);
    Ok(())
}

/// Print the config file path
pub fn config_path() -> Result<()> {
    println!("{}", ReportConfig::config_path()?.display());
    Ok(())
}

/// Change one setting and save
pub fn config_set(key: &str, value: &str) -> Result<()> {
    let mut config = ReportConfig::load()?;
    config.set(key, value)?;
    config.save().context("Failed to save config")?;
    println!("{} {} = {}", Status::ok(), key.header(), config.get(key)?.path());
    Ok(())
}

/// Restore defaults
pub fn config_reset() -> Result<()> {
    ReportConfig::default()
        .save()
        .context("Failed to save config")?;
    println!("{} Settings restored to defaults", Status::ok());
    Ok(())
}
