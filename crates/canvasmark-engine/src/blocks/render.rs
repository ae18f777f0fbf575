//! Rendering placeholders to export markup.
//!
//! Rendering never fails: a missing block or an absent preview degrades to a
//! fallback `<figure>` whose state class tells the export theme what
//! happened.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use super::{BlockSnapshot, PLACEHOLDER_TOKEN};

// Figure width never drops below this, so fallback text stays legible.
const MIN_FIGURE_WIDTH: u32 = 120;

fn escape(value: &str) -> String {
    html_escape::encode_quoted_attribute(value).into_owned()
}

fn size_style(block: &BlockSnapshot) -> String {
    if block.size.width == 0 {
        return String::new();
    }
    let width = block.size.width.max(MIN_FIGURE_WIDTH);
    format!(r#" style="max-width:{width}px""#)
}

/// Render one block reference to an HTML fragment.
///
/// Three states, all valid markup: `missing` (no snapshot for the id),
/// `empty` (snapshot without a rendered preview), and ready (preview embedded
/// verbatim). User-supplied text is escaped before insertion; the preview
/// data URL is trusted output of the canvas renderer and embedded as-is.
pub fn render_block_html(block_id: &str, block: Option<&BlockSnapshot>) -> String {
    let escaped_id = escape(block_id);

    let Some(block) = block else {
        return format!(
            r#"<figure class="canvasmark-drawnix canvasmark-drawnix--missing" data-block-id="{escaped_id}"><div class="canvasmark-drawnix__fallback">Missing drawnix block ({escaped_id}). Check the project package or re-insert the block.</div></figure>"#
        );
    };

    let style = size_style(block);
    let description = block
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());
    let caption = description
        .map(|text| {
            format!(
                r#"<figcaption class="canvasmark-drawnix__caption">{}</figcaption>"#,
                escape(text)
            )
        })
        .unwrap_or_default();

    if let Some(preview) = &block.preview {
        let alt = match description {
            Some(text) => escape(text),
            None => escape(&format!("Drawnix canvas block {block_id}")),
        };
        return format!(
            r#"<figure class="canvasmark-drawnix" data-block-id="{escaped_id}"{style}><img src="{preview}" alt="{alt}" loading="lazy" decoding="async" />{caption}</figure>"#
        );
    }

    format!(
        r#"<figure class="canvasmark-drawnix canvasmark-drawnix--empty" data-block-id="{escaped_id}"{style}><div class="canvasmark-drawnix__fallback">Drawnix block ({escaped_id}) has no preview yet; the next export will fill it in.</div>{caption}</figure>"#
    )
}

fn placeholder_global_regex() -> &'static Regex {
    static PLACEHOLDER_GLOBAL: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_GLOBAL.get_or_init(|| {
        // Horizontal whitespace only, so the match never swallows adjacent
        // blank lines.
        Regex::new(&format!(
            r"(?m)^[ \t]*\{{\{{[ \t]*{PLACEHOLDER_TOKEN}:([a-zA-Z0-9_-]+)[ \t]*\}}\}}[ \t]*$"
        ))
        .expect("invalid placeholder substitution regex")
    })
}

/// Replace every isolated placeholder line with its rendered markup in one
/// non-overlapping pass. Text without placeholders comes back unchanged.
pub fn inject_blocks(content: &str, blocks: &BTreeMap<String, BlockSnapshot>) -> String {
    placeholder_global_regex()
        .replace_all(content, |captures: &regex::Captures<'_>| {
            let block_id = &captures[1];
            render_block_html(block_id, blocks.get(block_id))
        })
        .into_owned()
}
