// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Narrative text cleanup
//!
//! AI-generated analysis arrives as loose markdown sprinkled with database
//! references such as `(ID: 42)`. [`normalize`] turns it into plain lines that
//! can be shown in a report or fed to the section parser.

use once_cell::sync::Lazy;
use regex::Regex;

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*|__|\*|`").unwrap());

static LEADING_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:#{1,6}\s*|[-+•]\s+|\d{1,3}[.)]\s+)").unwrap());

static ID_ANNOTATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:\(\s*id\s*[:#]?\s*\d+\s*\)|\bid\s*[:#]?\s*\d+\b)").unwrap()
});

static HORIZONTAL_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{a0}]+").unwrap());

/// Clean up narrative text. Idempotent and infallible.
pub fn normalize(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = true;

    for raw in text.lines() {
        let Some(line) = normalize_line(raw) else {
            continue;
        };

        if line.is_empty() {
            if !previous_blank {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            lines.push(line);
            previous_blank = false;
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Rewrite one line to a fixed point. `None` means the line held nothing but
/// ID references and should disappear entirely.
fn normalize_line(raw: &str) -> Option<String> {
    let mut current = raw.to_string();
    let mut stripped_id = false;

    loop {
        let mut next = EMPHASIS.replace_all(&current, "").into_owned();
        next = LEADING_MARKER.replace(&next, "").into_owned();

        let without_ids = ID_ANNOTATION.replace_all(&next, "");
        if without_ids != next {
            stripped_id = true;
            next = without_ids.into_owned();
        }

        next = HORIZONTAL_SPACE.replace_all(&next, " ").trim().to_string();

        if next == current {
            break;
        }
        current = next;
    }

    if stripped_id && !current.chars().any(char::is_alphanumeric) {
        return None;
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_markdown() {
        let input = "## Summary\n**Revenue** grew by *12%*\n- first point\n2. second point";
        assert_eq!(
            normalize(input),
            "Summary\nRevenue grew by 12%\nfirst point\nsecond point"
        );
    }

    #[test]
    fn test_strips_id_annotations() {
        assert_eq!(normalize("Latte (ID: 12) sold well"), "Latte sold well");
        assert_eq!(normalize("Customer Anh id#7"), "Customer Anh");
        assert_eq!(normalize("Milk stock low (id 3)."), "Milk stock low.");
        assert_eq!(normalize("Top item\n(ID: 5)\nnext"), "Top item\nnext");
    }

    #[test]
    fn test_keeps_words_containing_id() {
        assert_eq!(normalize("Paid 5 invoices, valid 10 days"), "Paid 5 invoices, valid 10 days");
    }

    #[test]
    fn test_collapses_whitespace_and_blank_lines() {
        let input = "\n\nfirst   line\t here\n\n\n\nsecond\n\n";
        assert_eq!(normalize(input), "first line here\n\nsecond");
    }

    #[test]
    fn test_nested_markers_reach_fixed_point() {
        let input = "- - *- nested bullet*";
        let once = normalize(input);
        assert_eq!(once, "nested bullet");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\n \n\t\n"), "");
    }
}
