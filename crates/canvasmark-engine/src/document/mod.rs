//! The authoritative document model and its mutation discipline.
//!
//! [`DocumentStore`] is the single writable resource in the engine: the
//! editing surface mutates it through the enumerated operations, everything
//! else (diagnostics, rendering, export) reads it. Content is replaced
//! wholesale on every edit; derived statistics are recomputed from the full
//! current string.

mod meta;
mod package;
mod store;

pub use meta::derive_meta;
pub use package::{
    DocumentPackage, PackageError, PackageMeta, SCHEMA_VERSION, build_package, parse_package,
    serialize_package,
};
pub use store::{DocumentState, DocumentStore, SubscriptionId, ThemePatch};

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blocks::BlockSnapshot;

pub const DEFAULT_EDITOR_THEME: &str = "aurora";
pub const DEFAULT_EXPORT_THEME: &str = "classic";

const DEFAULT_TITLE: &str = "Untitled document";
const DEFAULT_CONTENT: &str =
    "# Welcome to CanvasMark\n\nStart writing, or import a project package from the File menu.";

/// Theme identifiers for the editing surface and the export pipeline.
/// Stylesheet content lives with the theming collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentThemes {
    pub editor: String,
    pub export: String,
}

impl Default for DocumentThemes {
    fn default() -> Self {
        Self {
            editor: DEFAULT_EDITOR_THEME.to_string(),
            export: DEFAULT_EXPORT_THEME.to_string(),
        }
    }
}

/// Binary-ish side data carried alongside the content string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentAssets {
    pub images: BTreeMap<String, String>,
    pub previews: BTreeMap<String, String>,
    pub externals: Vec<String>,
}

/// Derived statistics, a pure function of the content and block table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub last_saved_at: Option<DateTime<Utc>>,
    pub word_count: usize,
    pub paragraph_count: usize,
    pub block_count: usize,
}

/// The in-memory document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentModel {
    pub id: String,
    pub title: String,
    /// The single authoritative markdown string.
    pub content: String,
    pub themes: DocumentThemes,
    pub assets: DocumentAssets,
    pub blocks: BTreeMap<String, BlockSnapshot>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentModel {
    /// Freshly initialized default document.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            content: DEFAULT_CONTENT.to_string(),
            themes: DocumentThemes::default(),
            assets: DocumentAssets::default(),
            blocks: BTreeMap::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new()
    }
}
