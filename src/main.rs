// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! cafe-report - Main entry point
//!
//! Renders printable business reports from analytics payloads.

mod cli;
mod colors;
mod commands;
mod config;
mod error;
mod models;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, ConfigCommands};
use env_logger::Env;

fn setup_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        // ====================================================================
        // Render Commands
        // ====================================================================
        Commands::Render {
            payload,
            comparison,
            format,
            output,
            print,
            no_open,
        } => commands::render_report(&payload, comparison, format, output, print, no_open),

        // ====================================================================
        // Inspect Commands
        // ====================================================================
        Commands::Normalize { input } => commands::normalize_text(&input),
        Commands::Sections { input, comparison } => commands::show_sections(&input, comparison),

        // ====================================================================
        // Config Commands
        // ====================================================================
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config_show(),
            ConfigCommands::Path => commands::config_path(),
            ConfigCommands::Set { key, value } => commands::config_set(&key, &value),
            ConfigCommands::Reset => commands::config_reset(),
        },
    }
}
