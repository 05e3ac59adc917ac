// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Block operations: bullet lists and quotes.
//!
//! A block kind applies to whole lines. Toggling one rewrites every line
//! touched by the selection immediately, so the forced quote attributes are
//! in the document as soon as the toggle happens, not only once text is
//! typed.

use super::ComposerModel;
use crate::{ComposerUpdate, FormatToggle};

impl ComposerModel {
    fn toggle_block(&mut self, toggle: FormatToggle) -> ComposerUpdate {
        let start = self.sel_start();
        let end = self.sel_end();
        let next = self.format.clone().toggled(toggle, &self.config);
        self.apply("block", move |model| {
            model.document.set_block_for_lines(start..end, next.block())?;
            tracing::debug!(
                target: "post_composer::composer",
                start,
                end,
                block = %next.block(),
                "set block"
            );
            model.format = next;
            Ok(())
        })
    }

    /// Toggle a bulleted list on the selected lines.
    pub fn bullet_list(&mut self) -> ComposerUpdate {
        self.toggle_block(FormatToggle::BulletList)
    }

    /// Toggle quote on the selected lines.
    pub fn quote(&mut self) -> ComposerUpdate {
        self.toggle_block(FormatToggle::Quote)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BlockKind, ComposerModel, Foreground};

    fn new_model() -> ComposerModel {
        ComposerModel::new()
    }

    fn model_with_text(text: &str) -> ComposerModel {
        let mut m = ComposerModel::new();
        m.replace_text(text);
        m
    }

    fn html(m: &ComposerModel) -> String {
        m.get_content_as_html()
    }

    fn blocks(m: &ComposerModel) -> Vec<BlockKind> {
        m.document().lines().iter().map(|l| l.block).collect()
    }

    #[test]
    fn quoting_a_line_forces_italic_and_tint() {
        let mut model = model_with_text("wise words");
        model.quote();
        let style = model.document().runs()[0].style().clone();
        assert!(style.italic);
        assert_eq!(style.foreground, Foreground::Muted);
        assert_eq!(style.indent, 1);
        assert_eq!(
            html(&model),
            "<blockquote><em>wise words</em></blockquote>"
        );
    }

    #[test]
    fn unquoting_restores_plain_text() {
        let mut model = model_with_text("wise words");
        model.quote();
        model.quote();
        assert_eq!(html(&model), "<p>wise words</p>");
        assert!(!model.document().runs()[0].style().italic);
    }

    #[test]
    fn unquoting_keeps_italic_from_before_the_quote() {
        let mut model = new_model();
        model.italic();
        model.replace_text("hi");
        model.select(0, 2);
        model.quote();
        assert_eq!(html(&model), "<blockquote><em>hi</em></blockquote>");
        model.quote();
        assert_eq!(html(&model), "<p><em>hi</em></p>");
        assert!(model.format_state().italic());
        assert!(model.document().runs()[0].style().italic);
    }

    #[test]
    fn bullet_replaces_quote() {
        let mut model = model_with_text("item");
        model.quote();
        model.bullet_list();
        assert_eq!(blocks(&model), vec![BlockKind::BulletItem]);
        assert_eq!(html(&model), "<ul><li>item</li></ul>");
        assert!(!model.format_state().italic());
    }

    #[test]
    fn block_toggle_applies_to_every_selected_line() {
        let mut model = model_with_text("one\ntwo\nthree");
        model.select(1, 5);
        model.bullet_list();
        assert_eq!(
            blocks(&model),
            vec![
                BlockKind::BulletItem,
                BlockKind::BulletItem,
                BlockKind::Normal
            ]
        );
    }

    #[test]
    fn quote_on_an_empty_composer_only_changes_the_state() {
        let mut model = new_model();
        model.quote();
        assert_eq!(model.text_len(), 0);
        assert_eq!(model.format_state().block(), BlockKind::Quote);
        model.replace_text("typed");
        assert_eq!(html(&model), "<blockquote><em>typed</em></blockquote>");
    }
}
