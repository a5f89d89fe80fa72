// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Error types for cafe-report

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(
        "Could not open a print window: {0}. Allow pop-ups for reports or set a browser with `cafe-report config set browser <command>`"
    )]
    SurfaceBlocked(String),

    #[error("Chart unavailable ({chart}): {reason}")]
    ChartUnavailable { chart: String, reason: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Unknown config key: {0}")]
    UnknownConfigKey(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidConfigValue { key: String, value: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
