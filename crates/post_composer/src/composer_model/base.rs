// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::{
    html, ComposerConfig, ComposerUpdate, Document, DocumentError,
    FormatState, HtmlParseError, MediaList, MenuState, MenuStateUpdate,
};

/// A rich text composer for journal and thread posts.
#[derive(Clone, Debug)]
pub struct ComposerModel {
    pub(crate) document: Document,

    /// Selection anchor (UTF-16 code unit offset). May exceed the document
    /// length; it is clamped on use.
    pub(crate) selection_start: usize,

    /// Selection focus (UTF-16 code unit offset).
    pub(crate) selection_end: usize,

    /// Typing attributes for the next insertion.
    pub(crate) format: FormatState,

    /// Media added during this session, in insertion order. Always holds
    /// exactly the media referenced by `document`.
    pub(crate) media: MediaList,

    pub(crate) config: ComposerConfig,

    pub(crate) undo_stack: Vec<Snapshot>,
    pub(crate) redo_stack: Vec<Snapshot>,
}

/// Everything an undo step restores.
#[derive(Clone, Debug)]
pub(crate) struct Snapshot {
    document: Document,
    selection_start: usize,
    selection_end: usize,
    format: FormatState,
    media: MediaList,
}

impl ComposerModel {
    pub fn new() -> Self {
        Self::with_config(ComposerConfig::default())
    }

    pub fn with_config(config: ComposerConfig) -> Self {
        Self {
            document: Document::new(),
            selection_start: 0,
            selection_end: 0,
            format: FormatState::default(),
            media: MediaList::new(),
            config,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Create a model pre-populated with a serialized post body.
    pub fn from_html(html: &str) -> Result<Self, HtmlParseError> {
        let mut model = Self::new();
        model.load_document(html::parse(html)?);
        Ok(model)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    pub fn format_state(&self) -> &FormatState {
        &self.format
    }

    /// Media inserted during this session, in insertion order.
    pub fn media(&self) -> &MediaList {
        &self.media
    }

    /// The document length in UTF-16 code units.
    pub fn text_len(&self) -> usize {
        self.document.len()
    }

    /// Whether the selection is a range (start != end).
    pub fn has_selection(&self) -> bool {
        self.sel_start() != self.sel_end()
    }

    /// Selection start, ensuring start <= end and clamped to the document.
    pub(crate) fn sel_start(&self) -> usize {
        self.selection_start
            .min(self.selection_end)
            .min(self.text_len())
    }

    /// Selection end, ensuring start <= end and clamped to the document.
    pub(crate) fn sel_end(&self) -> usize {
        self.selection_start
            .max(self.selection_end)
            .min(self.text_len())
    }

    pub(crate) fn set_cursor(&mut self, offset: usize) {
        self.selection_start = offset;
        self.selection_end = offset;
    }

    /// Typing attributes derived from the content under the caret, or
    /// `None` on an empty last line where there is nothing to read.
    pub(crate) fn format_at_cursor(&self) -> Option<FormatState> {
        match self.document.style_at(self.sel_start()) {
            Ok(style) => style.as_ref().map(FormatState::from_style),
            Err(_) => None,
        }
    }

    pub(crate) fn snapshot(&self) -> Snapshot {
        Snapshot {
            document: self.document.clone(),
            selection_start: self.selection_start,
            selection_end: self.selection_end,
            format: self.format.clone(),
            media: self.media.clone(),
        }
    }

    /// Restore `snapshot`, returning the state it replaced.
    pub(crate) fn restore(&mut self, snapshot: Snapshot) -> Snapshot {
        let current = self.snapshot();
        self.document = snapshot.document;
        self.selection_start = snapshot.selection_start;
        self.selection_end = snapshot.selection_end;
        self.format = snapshot.format;
        self.media = snapshot.media;
        current
    }

    /// Run one editing operation as a unit.
    ///
    /// On success the previous state goes onto the undo stack and the redo
    /// stack is cleared. On failure the model is rolled back and the
    /// update is a no-op.
    pub(crate) fn apply(
        &mut self,
        op: &'static str,
        edit: impl FnOnce(&mut Self) -> Result<(), DocumentError>,
    ) -> ComposerUpdate {
        let before = self.snapshot();
        match edit(self) {
            Ok(()) => {
                self.undo_stack.push(before);
                self.redo_stack.clear();
                tracing::trace!(
                    target: "post_composer::composer",
                    op,
                    len = self.text_len(),
                    "applied"
                );
                self.create_update_replace_all()
            }
            Err(err) => {
                self.restore(before);
                tracing::warn!(
                    target: "post_composer::composer",
                    op,
                    error = %err,
                    "edit rejected"
                );
                ComposerUpdate::keep()
            }
        }
    }

    /// Replace the whole content, resetting selection and history.
    pub(crate) fn load_document(&mut self, document: Document) {
        self.document = document;
        self.media = self.document.media();
        self.set_cursor(0);
        self.format = self.format_at_cursor().unwrap_or_default();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Bring the media list back in line with the document after content
    /// was removed or restored.
    pub(crate) fn sync_media(&mut self) {
        let present = self.document.media();
        self.media.retain(|m| present.contains(m.url()));
        for reference in present.iter() {
            self.media.push(reference.clone());
        }
    }

    /// Compute the current [`MenuState`].
    pub(crate) fn compute_menu_state(&self) -> MenuState {
        MenuState::Update(MenuStateUpdate {
            action_states: self.compute_action_states(),
        })
    }

    /// Build a full [`ComposerUpdate`] with the new HTML and states.
    pub(crate) fn create_update_replace_all(&self) -> ComposerUpdate {
        ComposerUpdate::replace_all(
            self.get_content_as_html(),
            self.selection_start,
            self.selection_end,
            self.compute_menu_state(),
        )
    }

    /// Build a selection-only [`ComposerUpdate`].
    pub(crate) fn create_update_selection(&self) -> ComposerUpdate {
        ComposerUpdate::update_selection(
            self.selection_start,
            self.selection_end,
            self.compute_menu_state(),
        )
    }
}

impl Default for ComposerModel {
    fn default() -> Self {
        Self::new()
    }
}
