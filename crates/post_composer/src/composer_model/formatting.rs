// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inline formatting: bold, italic, underline, heading.
//!
//! Quoted text ignores inline toggles: the quote supplies its own emphasis
//! and tint, so quoted runs are never restyled here.

use super::ComposerModel;
use crate::{ComposerConfig, ComposerUpdate, FormatToggle, Style};

impl ComposerModel {
    /// Toggle an inline format on the current selection.
    ///
    /// - **Collapsed cursor**: only the typing attributes change; the next
    ///   inserted text picks them up.
    /// - **Range selection**: the format is removed when every selected run
    ///   already has it, and applied to the whole range otherwise.
    fn toggle_inline_format(
        &mut self,
        toggle: FormatToggle,
    ) -> ComposerUpdate {
        let start = self.sel_start();
        let end = self.sel_end();

        if start == end {
            self.format = self.format.clone().toggled(toggle, &self.config);
            return self.create_update_selection();
        }

        let active = self.is_inline_active_in(toggle, start, end);
        let config = self.config.clone();
        self.apply("format", move |model| {
            model.document.restyle(start..end, |style| {
                if !style.is_quote() {
                    set_inline(style, toggle, !active, &config);
                }
            })?;
            if model.format.is_active(toggle) == active {
                model.format = model.format.clone().toggled(toggle, &config);
            }
            Ok(())
        })
    }

    /// Whether every unquoted run in `[start, end)` has `toggle` applied.
    pub(crate) fn is_inline_active_in(
        &self,
        toggle: FormatToggle,
        start: usize,
        end: usize,
    ) -> bool {
        self.document.all_text_in(start..end, |style| {
            style.is_quote() || has_inline(style, toggle)
        })
    }

    /// Toggle bold.
    pub fn bold(&mut self) -> ComposerUpdate {
        self.toggle_inline_format(FormatToggle::Bold)
    }

    /// Toggle italic.
    pub fn italic(&mut self) -> ComposerUpdate {
        self.toggle_inline_format(FormatToggle::Italic)
    }

    /// Toggle underline.
    pub fn underline(&mut self) -> ComposerUpdate {
        self.toggle_inline_format(FormatToggle::Underline)
    }

    /// Toggle the heading size, using the configured heading level.
    pub fn heading(&mut self) -> ComposerUpdate {
        self.toggle_inline_format(FormatToggle::Heading)
    }
}

fn has_inline(style: &Style, toggle: FormatToggle) -> bool {
    match toggle {
        FormatToggle::Bold => style.bold,
        FormatToggle::Italic => style.italic,
        FormatToggle::Underline => style.underline,
        FormatToggle::Heading => style.heading.is_some(),
        FormatToggle::BulletList | FormatToggle::Quote => false,
    }
}

fn set_inline(
    style: &mut Style,
    toggle: FormatToggle,
    on: bool,
    config: &ComposerConfig,
) {
    match toggle {
        FormatToggle::Bold => style.bold = on,
        FormatToggle::Italic => style.italic = on,
        FormatToggle::Underline => style.underline = on,
        FormatToggle::Heading => {
            style.heading = on.then_some(config.heading_level)
        }
        FormatToggle::BulletList | FormatToggle::Quote => {}
    }
}

#[cfg(test)]
mod tests {
    use crate::{ComposerConfig, ComposerModel, HeadingLevel};

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

    // ===================================================================
    // Collapsed cursor
    // ===================================================================

    #[test]
    fn bold_with_a_cursor_applies_to_typed_text() {
        let mut model = new_model();
        model.bold();
        model.replace_text("hello");
        assert_eq!(html(&model), "<p><strong>hello</strong></p>");
    }

    #[test]
    fn toggling_twice_with_a_cursor_types_plain_text() {
        let mut model = model_with_text("a");
        model.italic();
        model.italic();
        model.replace_text("b");
        assert_eq!(html(&model), "<p>ab</p>");
    }

    #[test]
    fn toggling_with_a_cursor_does_not_create_undo_entry() {
        let mut model = model_with_text("a");
        let undo_len = model.undo_stack.len();
        model.underline();
        assert_eq!(model.undo_stack.len(), undo_len);
    }

    #[test]
    fn formats_nest_in_fixed_order() {
        let mut model = new_model();
        model.underline();
        model.italic();
        model.bold();
        model.heading();
        model.replace_text("x");
        assert_eq!(
            html(&model),
            "<p><h3><strong><em><u>x</u></em></strong></h3></p>"
        );
    }

    #[test]
    fn heading_uses_the_configured_level() {
        let mut model = ComposerModel::with_config(ComposerConfig {
            heading_level: HeadingLevel::new(2).unwrap(),
            ..ComposerConfig::default()
        });
        model.heading();
        model.replace_text("Title");
        assert_eq!(html(&model), "<p><h2>Title</h2></p>");
    }

    // ===================================================================
    // Range selection
    // ===================================================================

    #[test]
    fn bold_on_a_range_formats_it() {
        let mut model = model_with_text("hello world");
        model.select(0, 5);
        model.bold();
        assert_eq!(html(&model), "<p><strong>hello</strong> world</p>");
        assert!(model.format_state().bold());
    }

    #[test]
    fn bold_on_a_fully_bold_range_removes_it() {
        let mut model = model_with_text("hello world");
        model.select(0, 5);
        model.bold();
        model.bold();
        assert_eq!(html(&model), "<p>hello world</p>");
        assert!(!model.format_state().bold());
    }

    #[test]
    fn bold_on_a_partly_bold_range_extends_it() {
        let mut model = model_with_text("hello world");
        model.select(0, 3);
        model.bold();
        model.select(0, 11);
        model.bold();
        assert_eq!(html(&model), "<p><strong>hello world</strong></p>");
    }

    #[test]
    fn inline_formats_skip_quoted_text() {
        let mut model = model_with_text("plain\n");
        model.quote();
        model.replace_text("wise");
        model.select(0, 10);
        model.underline();
        assert_eq!(
            html(&model),
            "<p><u>plain</u></p><blockquote><em>wise</em></blockquote>"
        );
        assert!(model.document().runs().iter().all(|r| {
            !r.style().is_quote() || !r.style().underline
        }));
    }
}
