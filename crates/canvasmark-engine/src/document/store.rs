//! The document state store.
//!
//! An explicit state owner replacing ambient global state: mutations go
//! through the methods below, each running to completion and notifying
//! subscribers exactly once after the new state has settled. Readers only
//! ever observe settled states.

use chrono::Utc;
use log::debug;

use super::package::DocumentPackage;
use super::{DocumentMeta, DocumentModel, DocumentThemes, derive_meta};
use crate::blocks::BlockSnapshot;

/// Handle returned by [`DocumentStore::subscribe`].
pub type SubscriptionId = u64;

/// Partial theme update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemePatch {
    pub editor: Option<String>,
    pub export: Option<String>,
}

/// One settled store state, as observed by readers and subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentState {
    pub document: DocumentModel,
    pub meta: DocumentMeta,
    pub dirty: bool,
}

impl DocumentState {
    fn initial() -> Self {
        let document = DocumentModel::new();
        let meta = derive_meta(&document.content, 0, None);
        Self {
            document,
            meta,
            dirty: false,
        }
    }
}

type Listener = Box<dyn Fn(&DocumentState)>;

/// The single writable resource of the engine.
pub struct DocumentStore {
    state: DocumentState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: SubscriptionId,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self {
            state: DocumentState::initial(),
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &DocumentState {
        &self.state
    }

    pub fn document(&self) -> &DocumentModel {
        &self.state.document
    }

    pub fn meta(&self) -> &DocumentMeta {
        &self.state.meta
    }

    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    /// Register a listener called after every settled mutation.
    pub fn subscribe(&mut self, listener: impl Fn(&DocumentState) + 'static) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    fn refresh_meta(&mut self) {
        self.state.meta = derive_meta(
            &self.state.document.content,
            self.state.document.blocks.len(),
            self.state.meta.last_saved_at,
        );
    }

    fn touch(&mut self) {
        self.state.document.updated_at = Utc::now();
        self.state.dirty = true;
    }

    /// Replace the content wholesale and recompute derived statistics.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.state.document.content = content.into();
        self.touch();
        self.refresh_meta();
        self.notify();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.state.document.title = title.into();
        self.touch();
        self.notify();
    }

    /// Shallow-merge the given theme fields; counts are unaffected.
    pub fn set_themes(&mut self, patch: ThemePatch) {
        if let Some(editor) = patch.editor {
            self.state.document.themes.editor = editor;
        }
        if let Some(export) = patch.export {
            self.state.document.themes.export = export;
        }
        self.touch();
        self.notify();
    }

    /// Insert or overwrite a block snapshot, keyed by its id.
    pub fn register_block(&mut self, snapshot: BlockSnapshot) {
        self.state
            .document
            .blocks
            .insert(snapshot.block_id.clone(), snapshot);
        self.touch();
        self.refresh_meta();
        self.notify();
    }

    /// Apply `updater` to the snapshot for `block_id`. An absent id is a
    /// defined no-op: nothing changes and nobody is notified.
    pub fn update_block(&mut self, block_id: &str, updater: impl FnOnce(&mut BlockSnapshot)) {
        let Some(snapshot) = self.state.document.blocks.get_mut(block_id) else {
            return;
        };
        updater(snapshot);
        self.touch();
        self.refresh_meta();
        self.notify();
    }

    pub fn remove_block(&mut self, block_id: &str) {
        self.state.document.blocks.remove(block_id);
        self.touch();
        self.refresh_meta();
        self.notify();
    }

    /// Clear the dirty flag and stamp the save time. Content and blocks are
    /// untouched.
    pub fn mark_saved(&mut self) {
        self.state.meta.last_saved_at = Some(Utc::now());
        self.state.dirty = false;
        self.notify();
    }

    /// Replace the whole model with a fresh default document.
    pub fn new_document(&mut self) {
        debug!("replacing document with a fresh default");
        self.state = DocumentState::initial();
        self.notify();
    }

    /// Replace the whole model from an externally supplied package.
    pub fn load_from_package(&mut self, pkg: DocumentPackage) {
        debug!(
            "loading document {} from package (schema v{})",
            pkg.meta.document_id, pkg.meta.schema_version
        );
        let document = DocumentModel {
            id: pkg.meta.document_id,
            title: pkg.meta.title,
            content: pkg.content,
            themes: DocumentThemes::default(),
            assets: pkg.assets,
            blocks: pkg.blocks,
            created_at: pkg.meta.created_at,
            updated_at: pkg.meta.updated_at,
        };
        let meta = derive_meta(
            &document.content,
            document.blocks.len(),
            Some(pkg.meta.updated_at),
        );
        self.state = DocumentState {
            document,
            meta,
            dirty: false,
        };
        self.notify();
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}
