// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Text editing operations: replace_text, backspace, delete, enter.

use unicode_segmentation::UnicodeSegmentation;

use super::ComposerModel;
use crate::document::{utf16_len, OBJECT_REPLACEMENT};
use crate::{BlockKind, ComposerUpdate, FormatState, NewlineOutcome};

impl ComposerModel {
    /// Replace the current selection with `new_text`.
    ///
    /// A lone `"\n"` is treated as pressing enter.
    pub fn replace_text(&mut self, new_text: &str) -> ComposerUpdate {
        if new_text == "\n" {
            return self.enter();
        }
        let start = self.sel_start();
        let end = self.sel_end();
        self.replace_text_in(new_text, start, end)
    }

    /// Replace a specific range [start, end) with `new_text`, styled with
    /// the current typing attributes.
    pub fn replace_text_in(
        &mut self,
        new_text: &str,
        start: usize,
        end: usize,
    ) -> ComposerUpdate {
        self.apply("replace_text", |model| {
            model.document.delete_range(start..end)?;
            let cursor =
                model.document.insert_text(start, new_text, &model.format)?;
            model.set_cursor(cursor);
            model.sync_media();
            Ok(())
        })
    }

    /// Delete backward from the cursor (backspace).
    ///
    /// At the start of a quoted or bulleted line this removes the block
    /// instead of joining the line with the previous one.
    pub fn backspace(&mut self) -> ComposerUpdate {
        let start = self.sel_start();
        let end = self.sel_end();
        if start != end {
            return self.delete_in(start, end);
        }
        if self.at_start_of_block_line(start) {
            return self.apply("clear_block", |model| {
                model.document.set_line_block(start, BlockKind::Normal)?;
                model.format =
                    model.format.clone().with_block(BlockKind::Normal);
                Ok(())
            });
        }
        match self.previous_grapheme_boundary(start) {
            Some(previous) => {
                let (from, to) = self.widen_over_image(previous, start);
                self.delete_in(from, to)
            }
            None => ComposerUpdate::keep(),
        }
    }

    /// Delete forward from the cursor (delete key).
    pub fn delete(&mut self) -> ComposerUpdate {
        let start = self.sel_start();
        let end = self.sel_end();
        if start != end {
            return self.delete_in(start, end);
        }
        match self.next_grapheme_boundary(start) {
            Some(next) => {
                let (from, to) = self.widen_over_image(start, next);
                self.delete_in(from, to)
            }
            None => ComposerUpdate::keep(),
        }
    }

    /// Delete a specific range [start, end).
    pub fn delete_in(&mut self, start: usize, end: usize) -> ComposerUpdate {
        self.apply("delete", |model| {
            model.document.delete_range(start..end)?;
            let removed = end - start;
            // Adjust the selection if it was inside the deleted range
            if model.selection_start > start {
                model.selection_start = model
                    .selection_start
                    .saturating_sub(removed)
                    .max(start);
            }
            if model.selection_end > start {
                model.selection_end =
                    model.selection_end.saturating_sub(removed).max(start);
            }
            if let Some(format) = model.format_at_cursor() {
                model.format = format;
            }
            model.sync_media();
            Ok(())
        })
    }

    /// Insert a line break (enter key), following the block rules of the
    /// current typing attributes.
    pub fn enter(&mut self) -> ComposerUpdate {
        let start = self.sel_start();
        let end = self.sel_end();
        self.apply("enter", |model| {
            model.document.delete_range(start..end)?;
            let line = model.document.line_range(start)?;
            let block = model.document.line_block(start)?;
            if start == line.start
                && !line.is_empty()
                && block != BlockKind::Normal
            {
                // Open a normal line above and leave this one as it is.
                model.document.insert_text(
                    start,
                    "\n",
                    &FormatState::default(),
                )?;
                model.document.set_line_block(start + 1, block)?;
                model.set_cursor(start + 1);
                return Ok(());
            }
            let line_empty = line.is_empty();
            match model.format.clone().on_newline(line_empty) {
                NewlineOutcome::Break { next } => {
                    model.document.insert_text(start, "\n", &model.format)?;
                    model.document.set_line_block(start + 1, next.block())?;
                    model.format = next;
                    model.set_cursor(start + 1);
                }
                NewlineOutcome::ExitBlock { next } => {
                    model.document.set_line_block(start, next.block())?;
                    tracing::debug!(
                        target: "post_composer::composer",
                        offset = start,
                        "empty line left its block"
                    );
                    model.format = next;
                    model.set_cursor(start);
                }
            }
            model.sync_media();
            Ok(())
        })
    }

    /// Removing the break between an image and a non-empty line takes the
    /// image with it, so the two never end up on one line.
    fn widen_over_image(&self, start: usize, end: usize) -> (usize, usize) {
        if end != start + 1 || self.document.char_at(start) != Some('\n') {
            return (start, end);
        }
        let before =
            start.checked_sub(1).and_then(|o| self.document.char_at(o));
        match (before, self.document.char_at(end)) {
            (Some(OBJECT_REPLACEMENT), Some(c)) if c != '\n' => {
                (start - 1, end)
            }
            (Some(c), Some(OBJECT_REPLACEMENT)) if c != '\n' => {
                (start, end + 1)
            }
            _ => (start, end),
        }
    }

    fn at_start_of_block_line(&self, offset: usize) -> bool {
        let Ok(line) = self.document.line_range(offset) else {
            return false;
        };
        let block = self
            .document
            .line_block(offset)
            .unwrap_or(BlockKind::Normal);
        offset == line.start
            && (block != BlockKind::Normal
                || self.format.block() != BlockKind::Normal)
    }

    /// UTF-16 offsets of every grapheme boundary in the document.
    fn grapheme_boundaries(&self) -> Vec<usize> {
        let text = self.document.text();
        let mut boundaries = vec![0];
        let mut pos = 0;
        for grapheme in text.graphemes(true) {
            pos += utf16_len(grapheme);
            boundaries.push(pos);
        }
        boundaries
    }

    fn previous_grapheme_boundary(&self, offset: usize) -> Option<usize> {
        self.grapheme_boundaries()
            .into_iter()
            .rev()
            .find(|&b| b < offset)
    }

    fn next_grapheme_boundary(&self, offset: usize) -> Option<usize> {
        self.grapheme_boundaries().into_iter().find(|&b| b > offset)
    }
}

#[cfg(test)]
mod tests {
    use speculoos::prelude::*;

    use crate::{BlockKind, ComposerModel, MediaReference};

    fn image(name: &str) -> MediaReference {
        MediaReference::parse_image(&format!("https://cdn.example.com/{name}"))
            .unwrap()
    }

    fn new_model() -> ComposerModel {
        ComposerModel::new()
    }

    fn model_with_text(text: &str) -> ComposerModel {
        let mut m = ComposerModel::new();
        m.replace_text(text);
        m
    }

    fn plain(m: &ComposerModel) -> String {
        m.get_content_as_plain_text()
    }

    fn blocks(m: &ComposerModel) -> Vec<BlockKind> {
        m.document().lines().iter().map(|l| l.block).collect()
    }

    // ===================================================================
    // Character insertion
    // ===================================================================

    #[test]
    fn typing_a_character_into_an_empty_box_appends_it() {
        let mut model = new_model();
        model.replace_text("v");
        assert_eq!(plain(&model), "v");
        assert_eq!(model.get_selection(), (1, 1));
    }

    #[test]
    fn typing_a_character_in_the_middle_inserts_it() {
        let mut model = model_with_text("abc");
        model.select(0, 0);
        model.replace_text("Z");
        assert_eq!(plain(&model), "Zabc");
        assert_eq!(model.get_selection(), (1, 1));
    }

    #[test]
    fn replacing_a_backwards_selection_with_a_character() {
        let mut model = model_with_text("abcdefghi");
        model.select(6, 3);
        model.replace_text("Z");
        assert_eq!(plain(&model), "abcZghi");
    }

    #[test]
    fn replacing_an_explicit_text_range_works() {
        let mut model = model_with_text("0123456789");
        model.replace_text_in("654", 4, 7);
        assert_eq!(plain(&model), "0123654789");
    }

    #[test]
    fn typing_grows_length_by_utf16_units() {
        let mut model = model_with_text("ab");
        let before = model.text_len();
        model.replace_text("\u{1F469}\u{1F3FF}");
        assert_that(&model.text_len()).is_equal_to(before + 4);
    }

    // ===================================================================
    // Deletion
    // ===================================================================

    #[test]
    fn backspacing_a_character() {
        let mut model = model_with_text("abc");
        model.backspace();
        assert_eq!(plain(&model), "ab");
        assert_eq!(model.get_selection(), (2, 2));
    }

    #[test]
    fn backspacing_at_the_start_does_nothing() {
        let mut model = model_with_text("abc");
        model.select(0, 0);
        let update = model.backspace();
        assert!(update.is_keep());
        assert_eq!(plain(&model), "abc");
    }

    #[test]
    fn backspacing_removes_a_whole_grapheme() {
        let emoji = "\u{1F469}\u{1F3FF}\u{200D}\u{1F680}";
        let mut model = model_with_text(&format!("a{emoji}"));
        model.backspace();
        assert_eq!(plain(&model), "a");
    }

    #[test]
    fn deleting_forward_removes_a_whole_grapheme() {
        let mut model = model_with_text("\u{1F4A9}b");
        model.select(0, 0);
        model.delete();
        assert_eq!(plain(&model), "b");
        assert_eq!(model.get_selection(), (0, 0));
    }

    #[test]
    fn deleting_at_the_end_does_nothing() {
        let mut model = model_with_text("abc");
        assert!(model.delete().is_keep());
    }

    #[test]
    fn deleting_a_range_moves_the_cursor() {
        let mut model = model_with_text("abcdef");
        model.delete_in(1, 3);
        assert_eq!(plain(&model), "adef");
        assert_eq!(model.get_selection(), (4, 4));
    }

    #[test]
    fn backspacing_at_the_start_of_a_bullet_removes_the_bullet() {
        let mut model = model_with_text("one\n");
        model.bullet_list();
        model.replace_text("two");
        model.select(4, 4);
        model.backspace();
        assert_eq!(plain(&model), "one\ntwo");
        assert_eq!(blocks(&model), vec![BlockKind::Normal, BlockKind::Normal]);
    }

    #[test]
    fn backspacing_the_break_after_an_image_removes_the_image() {
        let mut model = new_model();
        model.insert_image(image("a.jpg"));
        model.replace_text("abc");
        model.select(2, 2);
        model.backspace();
        assert_eq!(plain(&model), "abc");
        assert_eq!(model.get_content_as_html(), "<p>abc</p>");
        assert_eq!(model.get_selection(), (0, 0));
    }

    #[test]
    fn deleting_the_break_before_an_image_removes_the_image() {
        let mut model = model_with_text("abc");
        model.insert_image(image("a.jpg"));
        model.select(3, 3);
        model.delete();
        assert_eq!(plain(&model), "abc\n");
        assert!(model.serialize().media_urls.is_empty());
    }

    #[test]
    fn backspacing_an_empty_line_after_an_image_keeps_the_image() {
        let mut model = new_model();
        model.insert_image(image("a.jpg"));
        model.enter();
        model.replace_text("abc");
        model.select(3, 3);
        model.backspace();
        assert_eq!(plain(&model), "\u{FFFC}\nabc");
        assert!(model.document().lines()[0].is_image());
    }

    #[test]
    fn typing_just_after_an_image_starts_on_the_next_line() {
        let mut model = new_model();
        model.insert_image(image("a.jpg"));
        model.select(1, 1);
        model.replace_text("x");
        assert_eq!(plain(&model), "\u{FFFC}\nx");
        assert_eq!(model.get_selection(), (3, 3));
    }

    #[test]
    fn typing_just_before_an_image_keeps_it_on_its_own_line() {
        let mut model = new_model();
        model.insert_image(image("a.jpg"));
        model.select(0, 0);
        model.replace_text("x");
        model.replace_text("y");
        assert_eq!(plain(&model), "xy\n\u{FFFC}\n");
        assert_eq!(model.get_selection(), (2, 2));
    }

    // ===================================================================
    // Enter
    // ===================================================================

    #[test]
    fn enter_in_normal_text_splits_the_line() {
        let mut model = model_with_text("abcd");
        model.select(2, 2);
        model.enter();
        assert_eq!(plain(&model), "ab\ncd");
        assert_eq!(model.get_selection(), (3, 3));
    }

    #[test]
    fn enter_replaces_the_selection() {
        let mut model = model_with_text("abcd");
        model.select(1, 3);
        model.enter();
        assert_eq!(plain(&model), "a\nd");
    }

    #[test]
    fn newline_text_is_treated_as_enter() {
        let mut model = new_model();
        model.quote();
        model.replace_text("\n");
        assert_eq!(model.text_len(), 0);
        assert_eq!(model.format_state().block(), BlockKind::Normal);
    }

    #[test]
    fn enter_in_a_quote_completes_the_quote_line() {
        let mut model = new_model();
        model.quote();
        model.replace_text("wise");
        model.enter();
        assert_eq!(plain(&model), "wise\n");
        assert_eq!(blocks(&model), vec![BlockKind::Quote, BlockKind::Normal]);
        let state = model.format_state();
        assert_eq!(state.block(), BlockKind::Normal);
        assert!(!state.italic());
        assert_eq!(state.style().indent, 0);
    }

    #[test]
    fn enter_at_the_start_of_a_quote_line_opens_a_line_above() {
        let mut model = new_model();
        model.quote();
        model.replace_text("wise");
        model.select(0, 0);
        model.enter();
        assert_eq!(plain(&model), "\nwise");
        assert_eq!(blocks(&model), vec![BlockKind::Normal, BlockKind::Quote]);
        assert_eq!(model.get_selection(), (1, 1));
        assert_eq!(model.format_state().block(), BlockKind::Quote);
        assert_eq!(
            model.get_content_as_html(),
            "<p></p><blockquote><em>wise</em></blockquote>"
        );
    }

    #[test]
    fn enter_at_the_start_of_a_bullet_keeps_the_item() {
        let mut model = new_model();
        model.bullet_list();
        model.replace_text("milk");
        model.select(0, 0);
        model.enter();
        assert_eq!(plain(&model), "\nmilk");
        assert_eq!(
            blocks(&model),
            vec![BlockKind::Normal, BlockKind::BulletItem]
        );
    }

    #[test]
    fn enter_on_an_empty_quote_exits_without_a_newline() {
        let mut model = model_with_text("abc\n");
        let before = model.text_len();
        model.quote();
        model.enter();
        assert_eq!(model.text_len(), before);
        assert_eq!(model.format_state().block(), BlockKind::Normal);
    }

    #[test]
    fn enter_in_a_bullet_continues_the_list() {
        let mut model = new_model();
        model.bullet_list();
        model.replace_text("milk");
        model.enter();
        model.replace_text("eggs");
        assert_eq!(plain(&model), "milk\neggs");
        assert_eq!(
            blocks(&model),
            vec![BlockKind::BulletItem, BlockKind::BulletItem]
        );
    }

    #[test]
    fn enter_on_an_empty_bullet_ends_the_list() {
        let mut model = new_model();
        model.bullet_list();
        model.replace_text("milk");
        model.enter();
        model.enter();
        model.replace_text("done");
        assert_eq!(plain(&model), "milk\ndone");
        assert_eq!(
            blocks(&model),
            vec![BlockKind::BulletItem, BlockKind::Normal]
        );
    }

    #[test]
    fn enter_on_an_empty_middle_bullet_line_clears_it() {
        let mut model = new_model();
        model.bullet_list();
        model.replace_text("a\n\nb");
        model.select(2, 2);
        model.enter();
        assert_eq!(plain(&model), "a\n\nb");
        assert_eq!(
            blocks(&model),
            vec![
                BlockKind::BulletItem,
                BlockKind::Normal,
                BlockKind::BulletItem
            ]
        );
    }
}
