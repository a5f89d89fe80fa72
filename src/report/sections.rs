// Copyright (c) 2024-2026 Nervosys LLC
// SPDX-License-Identifier: AGPL-3.0-only
//! Narrative section parser
//!
//! Splits free-form analysis text into labeled sections. Every line is
//! classified on its own as a header, content or noise by [`classify_line`];
//! [`parse_sections`] then folds the classified lines into sections in
//! document order.
//!
//! Parsing runs on the raw narrative so heading markers are still visible.
//! A header must contain one of its section's keywords, be short, and look
//! like a heading: a markdown `#`, a trailing colon, a line wrapped in
//! emphasis, a short numbered phrase (`1.`, `II.`), or a bare keyword phrase
//! of a few words. Content lines are cleaned with [`normalize`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::normalize::normalize;
use crate::config::ReportConfig;

static HEADING_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?P<hash>#{1,6}\s*)?(?P<num>(?:\d{1,2}|[IVX]{1,4})[.)]\s+)?").unwrap()
});

static BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+•]|\d{1,2}[.)])\s+").unwrap());

static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*|__|\*|`").unwrap());

/// Words an unmarked heading may have ("Key strengths", "Đề xuất")
const BARE_HEADING_MAX_WORDS: usize = 3;
/// Words a heading marked only by a numeral may have
const NUMBERED_HEADING_MAX_WORDS: usize = 5;
/// Words any heading may have
const HEADING_MAX_WORDS: usize = 10;

// ============================================================================
// Section Labels
// ============================================================================

/// Section of a narrative analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLabel {
    Summary,
    Strengths,
    Weaknesses,
    Issues,
    Recommendations,
    Overview,
    BranchEvaluation,
    Comparison,
    Conclusion,
}

impl SectionLabel {
    /// Heading shown in the report
    pub fn title(&self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Strengths => "Strengths",
            Self::Weaknesses => "Weaknesses",
            Self::Issues => "Issues & Anomalies",
            Self::Recommendations => "Recommendations",
            Self::Overview => "Overview",
            Self::BranchEvaluation => "Branch Evaluation",
            Self::Comparison => "Comparison",
            Self::Conclusion => "Conclusion",
        }
    }

    /// CSS modifier used by the composer for colored section borders
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Strengths => "section-positive",
            Self::Weaknesses | Self::Issues => "section-negative",
            Self::Recommendations | Self::Conclusion => "section-action",
            _ => "section-neutral",
        }
    }
}

impl std::fmt::Display for SectionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}

// ============================================================================
// Keyword Sets
// ============================================================================

/// Keywords for one section, stored lowercase
#[derive(Debug, Clone)]
pub struct SectionMatcher {
    pub label: SectionLabel,
    pub keywords: Vec<String>,
}

impl SectionMatcher {
    fn find_keyword(&self, lower: &str) -> Option<&str> {
        self.keywords
            .iter()
            .map(String::as_str)
            .find(|kw| lower.contains(kw))
    }
}

/// Ordered list of section matchers; the first match wins
#[derive(Debug, Clone)]
pub struct SectionKeywords {
    matchers: Vec<SectionMatcher>,
}

impl SectionKeywords {
    pub fn new(entries: &[(SectionLabel, &[&str])]) -> Self {
        let matchers = entries
            .iter()
            .map(|(label, keywords)| SectionMatcher {
                label: *label,
                keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { matchers }
    }

    /// Sections of a single-branch daily analysis
    pub fn single_branch() -> Self {
        Self::new(&[
            (
                SectionLabel::Summary,
                &["summary", "overview", "tóm tắt", "tổng quan", "tổng kết"],
            ),
            (SectionLabel::Strengths, &["strength", "điểm mạnh", "ưu điểm"]),
            (
                SectionLabel::Weaknesses,
                &["weakness", "điểm yếu", "hạn chế", "nhược điểm"],
            ),
            (
                SectionLabel::Issues,
                &["issue", "problem", "anomal", "risk", "vấn đề", "bất thường", "rủi ro"],
            ),
            (
                SectionLabel::Recommendations,
                &["recommend", "suggestion", "action plan", "khuyến nghị", "đề xuất", "giải pháp"],
            ),
        ])
    }

    /// Sections of a multi-branch comparison analysis
    pub fn comparison() -> Self {
        Self::new(&[
            (SectionLabel::Overview, &["overview", "summary", "tổng quan", "tóm tắt"]),
            (
                SectionLabel::BranchEvaluation,
                &["evaluation", "per branch", "each branch", "đánh giá", "từng chi nhánh"],
            ),
            (SectionLabel::Comparison, &["comparison", "compare", "so sánh"]),
            (
                SectionLabel::Recommendations,
                &["recommend", "suggestion", "khuyến nghị", "đề xuất", "giải pháp"],
            ),
            (SectionLabel::Conclusion, &["conclusion", "kết luận"]),
        ])
    }

    pub fn labels(&self) -> Vec<SectionLabel> {
        self.matchers.iter().map(|m| m.label).collect()
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Tunables for section parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Content lines shorter than this are noise
    pub min_line_len: usize,
    /// Items kept per section
    pub max_items: usize,
    /// Longest line that may still be a heading
    pub max_header_len: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            min_line_len: 10,
            max_items: 6,
            max_header_len: 60,
        }
    }
}

impl From<&ReportConfig> for ParseOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            min_line_len: config.min_line_len,
            max_items: config.max_items_per_section,
            max_header_len: config.max_header_len,
        }
    }
}

/// Classification of a single narrative line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Header(SectionLabel),
    Content(String),
    Noise,
}

/// Lines collected for one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSection {
    pub label: SectionLabel,
    pub lines: Vec<String>,
}

/// All sections of one narrative, in keyword-set order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedSections {
    pub sections: Vec<ParsedSection>,
    /// Content lines seen before the first heading
    pub discarded_preamble: usize,
}

impl ParsedSections {
    pub fn get(&self, label: SectionLabel) -> &[String] {
        self.sections
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.lines.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.lines.is_empty())
    }

    /// Sections that collected at least one line
    pub fn non_empty(&self) -> impl Iterator<Item = &ParsedSection> {
        self.sections.iter().filter(|s| !s.lines.is_empty())
    }
}

/// Classify one line against the keyword set
pub fn classify_line(line: &str, keywords: &SectionKeywords, options: &ParseOptions) -> LineKind {
    if line.trim().is_empty() {
        return LineKind::Noise;
    }

    if let Some(label) = match_heading(line, keywords, options) {
        return LineKind::Header(label);
    }

    let content = BULLET.replace(line, "");
    let content = normalize(&content);
    if content.chars().count() < options.min_line_len {
        LineKind::Noise
    } else {
        LineKind::Content(content)
    }
}

fn match_heading(
    line: &str,
    keywords: &SectionKeywords,
    options: &ParseOptions,
) -> Option<SectionLabel> {
    let caps = HEADING_PREFIX.captures(line)?;
    let has_hash = caps.name("hash").is_some();
    let has_numeral = caps.name("num").is_some();
    let prefix_len = caps.get(0).map_or(0, |m| m.end());

    let marked = line[prefix_len..].trim();
    let emphasized = ["**", "__"].iter().any(|mark| {
        let inner = marked.trim_end_matches(':');
        inner.starts_with(mark) && inner.ends_with(mark)
    });

    let rest = EMPHASIS.replace_all(marked, "");
    let rest = rest.trim();
    let ends_with_colon = rest.ends_with(':');
    let core = rest.trim_end_matches(':').trim();

    let words = core.split_whitespace().count();
    if core.is_empty() || core.chars().count() > options.max_header_len || words > HEADING_MAX_WORDS {
        return None;
    }

    let phrase = !core.contains(['.', ',', '!', '?', ';', ':']);
    let looks_like_heading = has_hash
        || ends_with_colon
        || emphasized
        || (has_numeral && phrase && words <= NUMBERED_HEADING_MAX_WORDS)
        || (phrase && words <= BARE_HEADING_MAX_WORDS);
    if !looks_like_heading {
        return None;
    }

    let lower = core.to_lowercase();
    keywords
        .matchers
        .iter()
        .find_map(|matcher| matcher.find_keyword(&lower).map(|_| matcher.label))
}

/// Fold raw narrative text into sections.
///
/// Lines before the first recognized heading are dropped; sections never
/// exceed `options.max_items` lines. Never fails: text without headings
/// yields every section empty.
pub fn parse_sections(text: &str, keywords: &SectionKeywords, options: &ParseOptions) -> ParsedSections {
    let mut parsed = ParsedSections {
        sections: keywords
            .labels()
            .into_iter()
            .map(|label| ParsedSection {
                label,
                lines: Vec::new(),
            })
            .collect(),
        discarded_preamble: 0,
    };

    let mut current: Option<usize> = None;
    let mut overflow = 0usize;

    for line in text.lines() {
        match classify_line(line, keywords, options) {
            LineKind::Header(label) => {
                current = parsed.sections.iter().position(|s| s.label == label);
            }
            LineKind::Content(content) => match current {
                Some(idx) => {
                    let section = &mut parsed.sections[idx];
                    if section.lines.len() < options.max_items {
                        section.lines.push(content);
                    } else {
                        overflow += 1;
                    }
                }
                None => parsed.discarded_preamble += 1,
            },
            LineKind::Noise => {}
        }
    }

    if parsed.discarded_preamble > 0 {
        log::debug!(
            "Dropped {} narrative line(s) before the first section heading",
            parsed.discarded_preamble
        );
    }
    if overflow > 0 {
        log::debug!("Dropped {} narrative line(s) over the per-section cap", overflow);
    }

    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(line: &str) -> LineKind {
        classify_line(line, &SectionKeywords::single_branch(), &ParseOptions::default())
    }

    #[test]
    fn test_heading_forms() {
        assert_eq!(classify("1. Summary"), LineKind::Header(SectionLabel::Summary));
        assert_eq!(classify("## Strengths"), LineKind::Header(SectionLabel::Strengths));
        assert_eq!(classify("**Điểm yếu:**"), LineKind::Header(SectionLabel::Weaknesses));
        assert_eq!(classify("II. Issues found"), LineKind::Header(SectionLabel::Issues));
        assert_eq!(
            classify("Recommendations"),
            LineKind::Header(SectionLabel::Recommendations)
        );
    }

    #[test]
    fn test_sentences_with_keywords_are_content() {
        assert_eq!(
            classify("We recommend adding a second barista, especially at 8am."),
            LineKind::Content("We recommend adding a second barista, especially at 8am.".to_string())
        );
        assert_eq!(
            classify("- The main strength was the morning rush"),
            LineKind::Content("The main strength was the morning rush".to_string())
        );
    }

    #[test]
    fn test_keyword_need_not_lead_heading() {
        assert_eq!(classify("## 1. Key Strengths"), LineKind::Header(SectionLabel::Strengths));
        assert_eq!(classify("2. Main Weaknesses"), LineKind::Header(SectionLabel::Weaknesses));
        assert_eq!(classify("**Our Recommendations**"), LineKind::Header(SectionLabel::Recommendations));
        assert_eq!(classify("Key strengths"), LineKind::Header(SectionLabel::Strengths));
    }

    #[test]
    fn test_short_sentence_with_keyword_is_content() {
        assert_eq!(
            classify("Risk of stockouts remains high"),
            LineKind::Content("Risk of stockouts remains high".to_string())
        );
        assert_eq!(
            classify("1. Recommend restocking oat milk before Friday"),
            LineKind::Content("Recommend restocking oat milk before Friday".to_string())
        );
    }

    #[test]
    fn test_content_is_normalized() {
        assert_eq!(
            classify("- **Latte** (ID: 4) sold 30 cups"),
            LineKind::Content("Latte sold 30 cups".to_string())
        );
        assert_eq!(classify("(ID: 12)"), LineKind::Noise);
    }

    #[test]
    fn test_short_lines_are_noise() {
        assert_eq!(classify("- ok"), LineKind::Noise);
        assert_eq!(classify("   "), LineKind::Noise);
    }
}
