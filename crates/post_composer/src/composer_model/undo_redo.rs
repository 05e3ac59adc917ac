// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Undo / Redo using whole-model snapshots.
//!
//! Before each successful editing operation the previous document,
//! selection, typing attributes and media list are pushed onto the undo
//! stack. Post bodies are small, so a snapshot is a plain clone.

use super::ComposerModel;
use crate::ComposerUpdate;

impl ComposerModel {
    /// Undo the last editing operation.
    pub fn undo(&mut self) -> ComposerUpdate {
        if let Some(snapshot) = self.undo_stack.pop() {
            let current = self.restore(snapshot);
            self.redo_stack.push(current);
            self.create_update_replace_all()
        } else {
            ComposerUpdate::keep()
        }
    }

    /// Redo a previously undone operation.
    pub fn redo(&mut self) -> ComposerUpdate {
        if let Some(snapshot) = self.redo_stack.pop() {
            let current = self.restore(snapshot);
            self.undo_stack.push(current);
            self.create_update_replace_all()
        } else {
            ComposerUpdate::keep()
        }
    }
}
