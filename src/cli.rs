// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! CLI argument definitions using clap derive macros

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::report::ReportFormat;

/// cafe-report - Printable business reports from analytics payloads
#[derive(Parser)]
#[command(name = "cafe-report")]
#[command(author = "Nervosys")]
#[command(version)]
#[command(about = "Render printable business reports from analytics payloads", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    // ============================================================================
    // Render Commands
    // ============================================================================
    /// Render a report from a payload file
    Render {
        /// Payload file (.json, .yaml, .yml) or - for JSON on stdin
        payload: String,

        /// Treat the payload as a multi-branch comparison
        #[arg(long)]
        comparison: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "html")]
        format: ReportFormat,

        /// Output directory (default: configured output_dir or current directory)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Open the report in a browser and print it
        #[arg(long, conflicts_with = "format")]
        print: bool,

        /// With --print, write the self-printing file without launching a browser
        #[arg(long, requires = "print")]
        no_open: bool,
    },

    // ============================================================================
    // Inspect Commands
    // ============================================================================
    /// Print narrative text after cleanup
    Normalize {
        /// Text file, or - for stdin
        input: String,
    },

    /// Show the sections detected in narrative text
    Sections {
        /// Text file, or - for stdin
        input: String,

        /// Use the comparison section set
        #[arg(long)]
        comparison: bool,
    },

    // ============================================================================
    // Config Commands
    // ============================================================================
    /// Show or change report settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show all settings
    Show,

    /// Print the config file location
    Path,

    /// Change one setting
    Set {
        /// Setting name (see `config show`)
        key: String,

        /// New value (empty string clears optional settings)
        value: String,
    },

    /// Restore default settings
    Reset,
}
