//! Persisted document packages.
//!
//! A package is the in-memory exchange shape between the engine and the
//! external file I/O collaborator. Parsing is the one boundary where failure
//! surfaces upward; everything else in the engine returns data instead of
//! errors.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use super::{DocumentAssets, DocumentModel};
use crate::blocks::BlockSnapshot;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    #[error("invalid document package: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMeta {
    pub document_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentPackage {
    pub meta: PackageMeta,
    pub content: String,
    pub blocks: BTreeMap<String, BlockSnapshot>,
    pub assets: DocumentAssets,
}

/// Snapshot the current model into a package.
pub fn build_package(document: &DocumentModel) -> DocumentPackage {
    DocumentPackage {
        meta: PackageMeta {
            document_id: document.id.clone(),
            title: document.title.clone(),
            created_at: document.created_at,
            updated_at: document.updated_at,
            schema_version: SCHEMA_VERSION,
        },
        content: document.content.clone(),
        blocks: document.blocks.clone(),
        assets: document.assets.clone(),
    }
}

pub fn serialize_package(pkg: &DocumentPackage) -> Result<String, PackageError> {
    Ok(serde_json::to_string_pretty(pkg)?)
}

pub fn parse_package(data: &str) -> Result<DocumentPackage, PackageError> {
    let pkg: DocumentPackage = serde_json::from_str(data)?;
    debug!(
        "parsed package for document {} ({} blocks)",
        pkg.meta.document_id,
        pkg.blocks.len()
    );
    Ok(pkg)
}
