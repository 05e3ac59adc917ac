// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Image insertion at the caret.

use super::ComposerModel;
use crate::{ComposerUpdate, MediaReference};

impl ComposerModel {
    /// Replace the selection with an image on a line of its own.
    ///
    /// The caret lands at the start of the line after the image and the
    /// reference is appended to the session media list.
    pub fn insert_image(
        &mut self,
        reference: MediaReference,
    ) -> ComposerUpdate {
        let start = self.sel_start();
        let end = self.sel_end();
        self.apply("insert_image", |model| {
            model.document.delete_range(start..end)?;
            let cursor =
                model.document.insert_image(start, reference.clone())?;
            model.media.push(reference);
            model.sync_media();
            model.set_cursor(cursor);
            model.format = model.format_at_cursor().unwrap_or_default();
            Ok(())
        })
    }
}
