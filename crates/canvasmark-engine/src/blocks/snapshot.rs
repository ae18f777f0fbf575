//! Persisted state of one embedded whiteboard block.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANVAS_WIDTH: u32 = 960;
pub const DEFAULT_CANVAS_HEIGHT: u32 = 540;

/// Tag identifying the block editor that owns the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Drawnix,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One freehand stroke on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    pub size: f64,
    pub points: Vec<Point>,
}

/// Raw canvas payload, opaque to everything but the drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasData {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub strokes: Vec<Stroke>,
}

impl CanvasData {
    pub fn empty() -> Self {
        Self {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            background: "#ffffff".to_string(),
            strokes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlockSize {
    pub width: u32,
    pub height: u32,
    pub zoom: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

/// Snapshot of one embedded block as stored in the document's block table
/// and in persisted packages. Ids are generated by the block editor and
/// stable across edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSnapshot {
    pub block_id: String,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub data: Option<CanvasData>,
    pub preview: Option<String>,
    pub size: BlockSize,
    pub meta: BlockMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Fresh snapshot for a newly inserted block: default canvas size, no
/// payload, no preview.
pub fn empty_snapshot(block_id: &str) -> BlockSnapshot {
    BlockSnapshot {
        block_id: block_id.to_string(),
        kind: BlockKind::Drawnix,
        data: None,
        preview: None,
        size: BlockSize {
            width: DEFAULT_CANVAS_WIDTH,
            height: DEFAULT_CANVAS_HEIGHT,
            zoom: 1.0,
        },
        meta: BlockMeta {
            author: None,
            updated_at: Some(Utc::now()),
            read_only: None,
        },
        description: Some("Drawnix canvas block".to_string()),
    }
}
