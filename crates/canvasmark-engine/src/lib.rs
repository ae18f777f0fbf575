pub mod blocks;
pub mod diagnostics;
pub mod document;
pub mod markers;

// Re-export key types for easier usage
pub use blocks::{
    BlockSnapshot, build_placeholder, extract_placeholder_id, inject_blocks, render_block_html,
};
pub use diagnostics::{Diagnostics, Issue, IssueKind, IssueSeverity, MarkerEntry, analyze};
pub use document::{
    DocumentModel, DocumentPackage, DocumentStore, PackageError, build_package, parse_package,
    serialize_package,
};
pub use markers::{MarkerCondition, MarkerId, ParsedMarker, build_marker_line, parse_marker};
