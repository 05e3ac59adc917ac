// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Selection management.

use super::ComposerModel;
use crate::{ComposerUpdate, FormatState};

impl ComposerModel {
    /// Set the selection/cursor position (UTF-16 code unit offsets).
    ///
    /// When the selection moves, the typing attributes are re-read from
    /// the content under the caret so the toolbar reflects it. Selecting
    /// the current position again keeps attributes toggled with a
    /// collapsed cursor.
    pub fn select(&mut self, start: usize, end: usize) -> ComposerUpdate {
        let moved = (start, end) != (self.selection_start, self.selection_end);
        self.selection_start = start;
        self.selection_end = end;
        if moved {
            self.format = self.format_at_cursor().unwrap_or_default();
        }
        self.create_update_selection()
    }

    /// Get the current selection as (start, end) UTF-16 offsets.
    pub fn get_selection(&self) -> (usize, usize) {
        (self.selection_start, self.selection_end)
    }

    /// Typing attributes a caret at `offset` would pick up, without moving
    /// the selection.
    pub fn format_at(&self, offset: usize) -> FormatState {
        match self.document.style_at(offset) {
            Ok(Some(style)) => FormatState::from_style(&style),
            Ok(None) | Err(_) => FormatState::default(),
        }
    }
}
