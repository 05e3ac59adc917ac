// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Content access: loading and serializing the post body.

use super::ComposerModel;
use crate::{
    html, BlockKind, ComposerUpdate, Document, HtmlParseError,
    InlineRunKind, SerializedPost,
};

impl ComposerModel {
    /// Replace the content with a parsed HTML post body.
    ///
    /// Unparseable input leaves the model untouched.
    pub fn set_content_from_html(&mut self, html: &str) -> ComposerUpdate {
        self.set_content_with(html::parse(html))
    }

    /// Replace the content with Markdown, converted through HTML.
    pub fn set_content_from_markdown(
        &mut self,
        markdown: &str,
    ) -> ComposerUpdate {
        self.set_content_with(html::parse_markdown(markdown))
    }

    fn set_content_with(
        &mut self,
        parsed: Result<Document, HtmlParseError>,
    ) -> ComposerUpdate {
        match parsed {
            Ok(document) => {
                self.load_document(document);
                self.create_update_replace_all()
            }
            Err(err) => {
                tracing::warn!(
                    target: "post_composer::composer",
                    error = %err,
                    "could not load content"
                );
                ComposerUpdate::keep()
            }
        }
    }

    /// Remove all content. Undoable.
    pub fn clear(&mut self) -> ComposerUpdate {
        self.apply("clear", |model| {
            model.document = Document::new();
            model.set_cursor(0);
            model.format = Default::default();
            model.sync_media();
            Ok(())
        })
    }

    /// Return the HTML post body.
    pub fn get_content_as_html(&self) -> String {
        self.serialize().html
    }

    /// Return the post body together with the media it references.
    pub fn serialize(&self) -> SerializedPost {
        html::serialize(&self.document, &self.config)
    }

    /// Return plain text (all formatting stripped).
    ///
    /// Images appear as U+FFFC so offsets match the document.
    pub fn get_content_as_plain_text(&self) -> String {
        self.document.text()
    }

    /// Return a debug tree representation of the document.
    pub fn to_tree(&self) -> String {
        let sel_start = self.selection_start;
        let sel_end = self.selection_end;
        let mut out = format!("sel: ({sel_start},{sel_end})\n");

        for line in self.document.lines() {
            if line.is_image() {
                for run in &line.runs {
                    if let InlineRunKind::Image(reference) = &run.kind {
                        out.push_str(&format!(
                            "├─ img({})\n",
                            reference.url()
                        ));
                    }
                }
                continue;
            }
            let tag = match line.block {
                BlockKind::Normal => "p",
                BlockKind::BulletItem => "li",
                BlockKind::Quote => "blockquote",
            };
            out.push_str(&format!("├─ {tag}\n"));
            let count = line.runs.len();
            for (i, run) in line.runs.iter().enumerate() {
                let InlineRunKind::Text { text, style } = &run.kind else {
                    continue;
                };
                let attributes = style.describe();
                let attributes = if attributes.is_empty() {
                    String::new()
                } else {
                    format!(" [{}]", attributes.join(", "))
                };
                let display_text = annotate_selection(
                    text,
                    run.start,
                    sel_start,
                    sel_end,
                    i + 1 == count,
                );
                out.push_str(&format!("│  \"{display_text}\"{attributes}\n"));
            }
            if line.runs.is_empty()
                && sel_start == sel_end
                && sel_start == line.start
            {
                out.push_str("│  |\n");
            }
        }

        out
    }
}

/// Insert `|` (cursor) or `{…}` (range selection) markers into a text run.
///
/// `run_offset` is the UTF-16 offset at which this run starts. A cursor at
/// the end of the run is only drawn for the last run of a line; otherwise
/// the next run draws it.
fn annotate_selection(
    text: &str,
    run_offset: usize,
    sel_start: usize,
    sel_end: usize,
    last_in_line: bool,
) -> String {
    let (start, end) = (sel_start.min(sel_end), sel_start.max(sel_end));
    let collapsed = start == end;
    let mut result = String::new();
    let mut pos = run_offset;
    for ch in text.chars() {
        if pos == start {
            result.push(if collapsed { '|' } else { '{' });
        }
        result.push(ch);
        pos += ch.len_utf16();
        if pos == end && !collapsed {
            result.push('}');
        }
    }
    if collapsed && pos == start && last_in_line {
        result.push('|');
    }
    result
}
