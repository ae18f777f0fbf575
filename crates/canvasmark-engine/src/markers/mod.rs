//! Pagination marker grammar and registry.
//!
//! Markers are double-brace tokens (`{{page-break}}`, `{{no-break-start}}`, …)
//! that occupy a line of their own and express pagination intent to the
//! export pipeline. This module owns the fixed catalogue of marker kinds and
//! the parse/serialize primitives; structural validation lives in
//! [`crate::diagnostics`].

pub mod options;

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::blocks::is_placeholder_line;

/// The eight fixed marker kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerId {
    PageBreak,
    SectionBreak,
    NoBreakStart,
    NoBreakEnd,
    KeepWithNext,
    KeepWithPrevious,
    PageTop,
    PageBottom,
}

impl MarkerId {
    pub const ALL: [MarkerId; 8] = [
        MarkerId::PageBreak,
        MarkerId::SectionBreak,
        MarkerId::NoBreakStart,
        MarkerId::NoBreakEnd,
        MarkerId::KeepWithNext,
        MarkerId::KeepWithPrevious,
        MarkerId::PageTop,
        MarkerId::PageBottom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerId::PageBreak => "page-break",
            MarkerId::SectionBreak => "section-break",
            MarkerId::NoBreakStart => "no-break-start",
            MarkerId::NoBreakEnd => "no-break-end",
            MarkerId::KeepWithNext => "keep-with-next",
            MarkerId::KeepWithPrevious => "keep-with-previous",
            MarkerId::PageTop => "page-top",
            MarkerId::PageBottom => "page-bottom",
        }
    }

    /// Look up a marker id from its token text, case-insensitively.
    pub fn parse_str(text: &str) -> Option<MarkerId> {
        let lowered = text.to_ascii_lowercase();
        MarkerId::ALL.into_iter().find(|id| id.as_str() == lowered)
    }

    pub fn definition(&self) -> &'static MarkerDefinition {
        // MARKERS is laid out in ALL order.
        match self {
            MarkerId::PageBreak => &MARKERS[0],
            MarkerId::SectionBreak => &MARKERS[1],
            MarkerId::NoBreakStart => &MARKERS[2],
            MarkerId::NoBreakEnd => &MARKERS[3],
            MarkerId::KeepWithNext => &MARKERS[4],
            MarkerId::KeepWithPrevious => &MARKERS[5],
            MarkerId::PageTop => &MARKERS[6],
            MarkerId::PageBottom => &MARKERS[7],
        }
    }
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Odd/even page alignment, meaningful only for `page-break`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerCondition {
    Odd,
    Even,
}

impl MarkerCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerCondition::Odd => "odd",
            MarkerCondition::Even => "even",
        }
    }

    pub fn parse_str(text: &str) -> Option<MarkerCondition> {
        match text.to_ascii_lowercase().as_str() {
            "odd" => Some(MarkerCondition::Odd),
            "even" => Some(MarkerCondition::Even),
            _ => None,
        }
    }
}

impl fmt::Display for MarkerCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Catalogue entry describing one marker kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDefinition {
    pub id: MarkerId,
    pub label: &'static str,
    pub description: &'static str,
    /// Whether the marker accepts an odd/even alignment condition.
    pub allow_condition: bool,
}

/// The static marker catalogue, in menu order.
pub static MARKERS: [MarkerDefinition; 8] = [
    MarkerDefinition {
        id: MarkerId::PageBreak,
        label: "Page break",
        description: "Force a break to a new page or image; supports odd/even alignment.",
        allow_condition: true,
    },
    MarkerDefinition {
        id: MarkerId::SectionBreak,
        label: "Section break",
        description: "Prefer splitting exported images here; page behaviour is configurable for PDF.",
        allow_condition: false,
    },
    MarkerDefinition {
        id: MarkerId::NoBreakStart,
        label: "No-break region (start)",
        description: "Pairs with the end marker; the wrapped content must not be split.",
        allow_condition: false,
    },
    MarkerDefinition {
        id: MarkerId::NoBreakEnd,
        label: "No-break region (end)",
        description: "Pairs with the start marker; the wrapped content must not be split.",
        allow_condition: false,
    },
    MarkerDefinition {
        id: MarkerId::KeepWithNext,
        label: "Keep with next",
        description: "Keep the current block on the same page or image as the next one.",
        allow_condition: false,
    },
    MarkerDefinition {
        id: MarkerId::KeepWithPrevious,
        label: "Keep with previous",
        description: "Keep the current block on the same page or image as the previous one.",
        allow_condition: false,
    },
    MarkerDefinition {
        id: MarkerId::PageTop,
        label: "Prefer page top",
        description: "Try to place the following block at the top of a page or image.",
        allow_condition: false,
    },
    MarkerDefinition {
        id: MarkerId::PageBottom,
        label: "Prefer page bottom",
        description: "Try to place the following block at the bottom of a page or image.",
        allow_condition: false,
    },
];

/// The result of successfully parsing one marker line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedMarker {
    pub id: MarkerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<MarkerCondition>,
}

pub(crate) const MARKER_ID_PATTERN: &str = "page-break|section-break|no-break-start|no-break-end|\
                                            keep-with-next|keep-with-previous|page-top|page-bottom";

fn marker_line_regex() -> &'static Regex {
    static MARKER_LINE: OnceLock<Regex> = OnceLock::new();
    MARKER_LINE.get_or_init(|| {
        Regex::new(&format!(
            r"(?i)^\s*\{{\{{\s*({MARKER_ID_PATTERN})(?::([a-zA-Z0-9_-]+))?\s*\}}\}}\s*$"
        ))
        .expect("invalid marker line regex")
    })
}

/// Serialize a marker back to its token line: `{{id}}` or `{{id:condition}}`.
pub fn build_marker_line(id: MarkerId, condition: Option<MarkerCondition>) -> String {
    match condition {
        Some(condition) => format!("{{{{{id}:{condition}}}}}"),
        None => format!("{{{{{id}}}}}"),
    }
}

/// Parse one line as a marker token.
///
/// The id is case-insensitive and whitespace inside the braces or around the
/// token is tolerated. A condition on a marker that disallows conditions, or
/// a condition other than `odd`/`even`, is silently dropped rather than
/// failing the parse.
pub fn parse_marker(text: &str) -> Option<ParsedMarker> {
    let captures = marker_line_regex().captures(text)?;
    let id = MarkerId::parse_str(&captures[1])?;

    let condition = captures
        .get(2)
        .filter(|_| id.definition().allow_condition)
        .and_then(|raw| MarkerCondition::parse_str(raw.as_str()));

    Some(ParsedMarker { id, condition })
}

/// Human-readable label for a parsed marker, including its condition.
pub fn describe_marker(marker: &ParsedMarker) -> String {
    let definition = marker.id.definition();
    match marker.condition {
        Some(condition) => format!("{} ({} pages)", definition.label, condition),
        None => definition.label.to_string(),
    }
}

/// Whether a line is exactly one marker token (ignoring surrounding
/// whitespace). Placeholder lines are never markers, even before the marker
/// grammar gets a look at them.
pub fn is_marker_line(line: &str) -> bool {
    if is_placeholder_line(line) {
        return false;
    }
    marker_line_regex().is_match(line)
}

/// Split document text on line boundaries, accepting both LF and CRLF.
pub(crate) fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Remove every isolated marker line from the document (export
/// preprocessing). Placeholder lines and prose are kept verbatim.
pub fn strip_markers(content: &str) -> String {
    split_lines(content)
        .filter(|line| !is_marker_line(line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_build_marker_line_with_optional_condition() {
        assert_eq!(build_marker_line(MarkerId::PageBreak, None), "{{page-break}}");
        assert_eq!(
            build_marker_line(MarkerId::PageBreak, Some(MarkerCondition::Odd)),
            "{{page-break:odd}}"
        );
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_case() {
        assert_eq!(
            parse_marker("{{ page-break }}"),
            Some(ParsedMarker {
                id: MarkerId::PageBreak,
                condition: None
            })
        );
        assert_eq!(
            parse_marker(" {{page-break:even}} "),
            Some(ParsedMarker {
                id: MarkerId::PageBreak,
                condition: Some(MarkerCondition::Even)
            })
        );
        assert_eq!(
            parse_marker("{{KEEP-WITH-NEXT}}"),
            Some(ParsedMarker {
                id: MarkerId::KeepWithNext,
                condition: None
            })
        );
    }

    #[test]
    fn test_parse_rejects_unknown_ids() {
        assert_eq!(parse_marker("{{unknown}}"), None);
        assert_eq!(parse_marker("{{page break}}"), None);
        assert_eq!(parse_marker("plain text"), None);
    }

    #[rstest]
    #[case("{{page-break:upside-down}}")]
    #[case("{{section-break:odd}}")]
    #[case("{{no-break-start:even}}")]
    fn test_invalid_or_disallowed_condition_is_dropped(#[case] line: &str) {
        let parsed = parse_marker(line).unwrap();
        assert_eq!(parsed.condition, None);
    }

    #[test]
    fn test_serialize_parse_round_trip() {
        for id in MarkerId::ALL {
            let conditions: &[Option<MarkerCondition>] = if id.definition().allow_condition {
                &[None, Some(MarkerCondition::Odd), Some(MarkerCondition::Even)]
            } else {
                &[None]
            };
            for &condition in conditions {
                let line = build_marker_line(id, condition);
                assert_eq!(parse_marker(&line), Some(ParsedMarker { id, condition }));
                if condition.is_none() {
                    assert!(!line.contains(':'));
                }
            }
        }
    }

    #[test]
    fn test_describe_marker_includes_condition() {
        let plain = ParsedMarker {
            id: MarkerId::SectionBreak,
            condition: None,
        };
        assert_eq!(describe_marker(&plain), "Section break");

        let odd = ParsedMarker {
            id: MarkerId::PageBreak,
            condition: Some(MarkerCondition::Odd),
        };
        assert_eq!(describe_marker(&odd), "Page break (odd pages)");
    }

    #[test]
    fn test_placeholder_lines_are_never_markers() {
        assert!(is_marker_line("{{page-break}}"));
        assert!(!is_marker_line("{{drawnix:block-1}}"));
        assert!(!is_marker_line("{{ drawnix:block-1 }}"));
    }

    #[test]
    fn test_strip_markers_keeps_regular_content() {
        let content = [
            "# Title",
            "",
            "{{page-break}}",
            "Body text",
            "{{ drawnix:block-1 }}",
            "{{ keep-with-next }}",
            "More text",
        ]
        .join("\n");

        assert_eq!(
            strip_markers(&content),
            ["# Title", "", "Body text", "{{ drawnix:block-1 }}", "More text"].join("\n")
        );
    }
}
