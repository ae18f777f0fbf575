//! Flattened insert-menu catalogue for the editing surface.
//!
//! Conditioned markers are expanded into one option per variant so the menu
//! layer can present a flat list and round-trip a selection through a plain
//! string value.

use super::{MARKERS, MarkerCondition, MarkerId, ParsedMarker, parse_marker};

/// One selectable menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerOption {
    pub id: MarkerId,
    pub condition: Option<MarkerCondition>,
    pub label: String,
    pub description: String,
}

impl MarkerOption {
    /// Stable string value for menu round-tripping: `id` or `id:condition`.
    pub fn value(&self) -> String {
        match self.condition {
            Some(condition) => format!("{}:{}", self.id, condition),
            None => self.id.to_string(),
        }
    }
}

/// Expand the marker catalogue into menu options. Markers that accept a
/// condition contribute a plain variant plus one per alignment.
pub fn marker_options() -> Vec<MarkerOption> {
    let mut options = Vec::new();

    for definition in &MARKERS {
        if definition.allow_condition {
            options.push(MarkerOption {
                id: definition.id,
                condition: None,
                label: format!("{} (plain)", definition.label),
                description: definition.description.to_string(),
            });
            options.push(MarkerOption {
                id: definition.id,
                condition: Some(MarkerCondition::Odd),
                label: format!("{} (odd-page alignment)", definition.label),
                description: format!("{} Aligned to odd pages.", definition.description),
            });
            options.push(MarkerOption {
                id: definition.id,
                condition: Some(MarkerCondition::Even),
                label: format!("{} (even-page alignment)", definition.label),
                description: format!("{} Aligned to even pages.", definition.description),
            });
        } else {
            options.push(MarkerOption {
                id: definition.id,
                condition: None,
                label: definition.label.to_string(),
                description: definition.description.to_string(),
            });
        }
    }

    options
}

/// Parse an option value produced by [`MarkerOption::value`] back into a
/// marker. Reuses the line grammar by wrapping the value in braces.
pub fn parse_option_value(value: &str) -> Option<ParsedMarker> {
    parse_marker(&format!("{{{{{value}}}}}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_options_expand_conditioned_markers() {
        let options = marker_options();
        // 8 kinds, page-break contributing two extra alignment variants.
        assert_eq!(options.len(), 10);

        let page_break_variants: Vec<_> = options
            .iter()
            .filter(|option| option.id == MarkerId::PageBreak)
            .collect();
        assert_eq!(page_break_variants.len(), 3);
        assert_eq!(page_break_variants[1].condition, Some(MarkerCondition::Odd));
        assert_eq!(page_break_variants[2].condition, Some(MarkerCondition::Even));
    }

    #[test]
    fn test_option_value_round_trip() {
        for option in marker_options() {
            let parsed = parse_option_value(&option.value()).unwrap();
            assert_eq!(parsed.id, option.id);
            assert_eq!(parsed.condition, option.condition);
        }
    }

    #[test]
    fn test_parse_option_value_rejects_garbage() {
        assert_eq!(parse_option_value("not-a-marker"), None);
        assert_eq!(parse_option_value(""), None);
    }
}
