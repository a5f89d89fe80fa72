// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Console styling for cafe-report
//!
//! Every command reports through the same short tags: `[OK]` when a report
//! or config file is written, `[!]` when a narrative has no sections, `[i]`
//! and `[=]` for notes and totals. Errors are left to `main`, which prints
//! them once on exit.

use colored::{ColoredString, Colorize};

/// Line prefixes for command output
pub struct Status;

impl Status {
    /// Report, HTML copy or config written: `[OK]` in green
    pub fn ok() -> ColoredString {
        "[OK]".green()
    }

    /// `[i]` in cyan
    pub fn info() -> ColoredString {
        "[i]".cyan()
    }

    /// Nothing to show, such as a narrative without headings: `[!]` in yellow
    pub fn warn() -> ColoredString {
        "[!]".yellow()
    }

    /// Closing tally, like sections filled: `[=]` in blue
    pub fn summary() -> ColoredString {
        "[=]".blue()
    }
}

/// Styling for config keys, file paths and counts
pub trait StyledText {
    /// Config keys and table labels (magenta bold)
    fn header(&self) -> ColoredString;
    /// File paths and config values (cyan)
    fn path(&self) -> ColoredString;
    /// Line and section counts (yellow)
    fn count(&self) -> ColoredString;
}

impl StyledText for str {
    fn header(&self) -> ColoredString {
        self.magenta().bold()
    }

    fn path(&self) -> ColoredString {
        self.cyan()
    }

    fn count(&self) -> ColoredString {
        self.yellow()
    }
}

impl StyledText for String {
    fn header(&self) -> ColoredString {
        self.as_str().header()
    }

    fn path(&self) -> ColoredString {
        self.as_str().path()
    }

    fn count(&self) -> ColoredString {
        self.as_str().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_indicators() {
        colored::control::set_override(false);
        assert_eq!(Status::ok().to_string(), "[OK]");
        assert_eq!(Status::warn().to_string(), "[!]");
        assert_eq!(Status::summary().to_string(), "[=]");
    }

    #[test]
    fn test_styled_text_keeps_content() {
        colored::control::set_override(false);
        assert_eq!("company_name".header().to_string(), "company_name");
        assert_eq!("reports/day.html".path().to_string(), "reports/day.html");
        assert_eq!(String::from("6").count().to_string(), "6");
    }
}
