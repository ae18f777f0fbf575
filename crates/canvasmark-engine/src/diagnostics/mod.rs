//! Structural diagnostics for pagination markers.
//!
//! A single forward pass over the document collects every isolated marker
//! line, pairs `no-break-start`/`no-break-end` regions with a stack, bounds
//! nesting depth, and flags marker tokens that share a line with other text.
//! Problems are returned as data, never as errors.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::markers::{
    MARKER_ID_PATTERN, MarkerCondition, MarkerId, ParsedMarker, describe_marker, parse_marker,
    split_lines,
};

/// Concurrent open no-break regions beyond this depth are flagged.
pub const MAX_NO_BREAK_DEPTH: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    MissingEnd,
    MissingStart,
    NestingViolation,
    InlineUsage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// One reported problem, anchored to a 1-based line number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub line: usize,
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_id: Option<MarkerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<MarkerCondition>,
}

/// One successfully parsed marker line, with any issues attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerEntry {
    /// 1-based line number.
    pub line: usize,
    /// The trimmed marker line text.
    pub text: String,
    pub marker: ParsedMarker,
    /// For paired no-break markers, the line of the matching counterpart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paired_line: Option<usize>,
    pub issues: Vec<Issue>,
}

/// The full diagnostics report for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Marker entries in document order.
    pub entries: Vec<MarkerEntry>,
    /// Issues for marker tokens embedded in prose lines.
    pub inline_issues: Vec<Issue>,
    pub has_error: bool,
}

fn inline_marker_regex() -> &'static Regex {
    static INLINE_MARKER: OnceLock<Regex> = OnceLock::new();
    INLINE_MARKER.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)\{{\{{\s*(?:{MARKER_ID_PATTERN})(?::[a-zA-Z0-9_-]+)?\s*\}}\}}"
        ))
        .expect("invalid inline marker regex")
    })
}

fn attach_issue(entry: &mut MarkerEntry, kind: IssueKind, message: &str) {
    entry.issues.push(Issue {
        line: entry.line,
        kind,
        severity: IssueSeverity::Error,
        message: message.to_string(),
        marker_id: Some(entry.marker.id),
        condition: entry.marker.condition,
    });
}

/// Analyze the full document text in one forward pass.
///
/// Pairing is forward-only: an end marker can only close the most recently
/// opened region before it. A region opened beyond [`MAX_NO_BREAK_DEPTH`] is
/// flagged at its opening but stays on the stack, so its matching end still
/// pairs with it.
pub fn analyze(content: &str) -> Diagnostics {
    let mut entries: Vec<MarkerEntry> = Vec::new();
    let mut inline_issues: Vec<Issue> = Vec::new();
    // Indices into `entries` for currently open no-break regions.
    let mut open_regions: Vec<usize> = Vec::new();

    for (index, raw) in split_lines(content).enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();

        if let Some(marker) = parse_marker(trimmed) {
            let entry_index = entries.len();
            entries.push(MarkerEntry {
                line,
                text: trimmed.to_string(),
                marker,
                paired_line: None,
                issues: Vec::new(),
            });

            match marker.id {
                MarkerId::NoBreakStart => {
                    open_regions.push(entry_index);
                    if open_regions.len() > MAX_NO_BREAK_DEPTH {
                        attach_issue(
                            &mut entries[entry_index],
                            IssueKind::NestingViolation,
                            "No-break regions must not be nested more than 2 levels deep.",
                        );
                    }
                }
                MarkerId::NoBreakEnd => match open_regions.pop() {
                    Some(start_index) => {
                        let start_line = entries[start_index].line;
                        entries[start_index].paired_line = Some(line);
                        entries[entry_index].paired_line = Some(start_line);
                    }
                    None => attach_issue(
                        &mut entries[entry_index],
                        IssueKind::MissingStart,
                        "Unmatched {{no-break-end}}; add the corresponding start marker.",
                    ),
                },
                _ => {}
            }
            continue;
        }

        if !trimmed.is_empty() && inline_marker_regex().is_match(raw) {
            inline_issues.push(Issue {
                line,
                kind: IssueKind::InlineUsage,
                severity: IssueSeverity::Error,
                message: "Pagination markers must occupy their own line; remove the other text \
                          on this line."
                    .to_string(),
                marker_id: None,
                condition: None,
            });
        }
    }

    // Unclosed regions, innermost first.
    while let Some(start_index) = open_regions.pop() {
        attach_issue(
            &mut entries[start_index],
            IssueKind::MissingEnd,
            "Missing {{no-break-end}}; add the corresponding end marker.",
        );
    }

    let has_error = entries
        .iter()
        .flat_map(|entry| entry.issues.iter())
        .chain(inline_issues.iter())
        .any(|issue| issue.severity == IssueSeverity::Error);

    Diagnostics {
        entries,
        inline_issues,
        has_error,
    }
}

/// One-line summary for a marker entry, as shown in the diagnostics panel.
pub fn summarize_entry(entry: &MarkerEntry) -> String {
    let label = describe_marker(&entry.marker);
    match entry.paired_line {
        Some(paired) => format!("{label} (paired with line {paired})"),
        None => label,
    }
}
