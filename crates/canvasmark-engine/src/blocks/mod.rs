//! Drawnix block placeholders.
//!
//! Embedded whiteboard blocks live in the document as single-line
//! `{{drawnix:<blockId>}}` tokens. This module recognizes and serializes
//! those tokens and renders them to export markup from the document's block
//! table. Placeholder classification takes precedence over the pagination
//! marker grammar.

mod render;
mod snapshot;

pub use render::{inject_blocks, render_block_html};
pub use snapshot::{
    BlockKind, BlockMeta, BlockSize, BlockSnapshot, CanvasData, Point, Stroke, empty_snapshot,
};

use std::sync::OnceLock;

use regex::Regex;

/// Token prefix identifying a block placeholder.
pub const PLACEHOLDER_TOKEN: &str = "drawnix";

fn placeholder_line_regex() -> &'static Regex {
    static PLACEHOLDER_LINE: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_LINE.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*\{{\{{\s*{PLACEHOLDER_TOKEN}:([a-zA-Z0-9_-]+)\s*\}}\}}\s*$"
        ))
        .expect("invalid placeholder line regex")
    })
}

/// Build the placeholder line for a block id.
pub fn build_placeholder(block_id: &str) -> String {
    format!("{{{{{PLACEHOLDER_TOKEN}:{block_id}}}}}")
}

/// Extract the block id from an isolated placeholder line.
pub fn extract_placeholder_id(text: &str) -> Option<&str> {
    placeholder_line_regex()
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str())
}

/// Whether a line is exactly one placeholder token (ignoring surrounding
/// whitespace).
pub fn is_placeholder_line(line: &str) -> bool {
    placeholder_line_regex().is_match(line)
}
