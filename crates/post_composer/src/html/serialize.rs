// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Conversion from a [`Document`] to the HTML post body.
//!
//! Lines are grouped into consecutive blocks of the same kind:
//! - `Normal`     → `<p>…</p>`, lines joined with `<br />`
//! - `BulletItem` → `<ul><li>…</li></ul>` per line, or one `<ul>` when
//!   [`ComposerConfig::merge_adjacent_list_items`] is set
//! - `Quote`      → `<blockquote><em>…</em></blockquote>`
//!
//! Images always sit in a paragraph of their own, even when the document
//! has them mid-line.

use serde::Serialize;

use crate::{
    BlockKind, ComposerConfig, Document, InlineRun, InlineRunKind,
    LineProjection, MediaReference,
};

/// The transport form of a post body.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SerializedPost {
    pub html: String,
    /// URLs of every image in the body, deduplicated, in document order.
    pub media_urls: Vec<String>,
}

enum Item<'a> {
    Line {
        block: BlockKind,
        runs: Vec<&'a InlineRun>,
    },
    Image(&'a MediaReference),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BlockWrapper {
    None,
    Paragraph,
    Quote,
    UnorderedList,
}

impl BlockWrapper {
    fn for_block(block: BlockKind) -> Self {
        match block {
            BlockKind::Normal => Self::Paragraph,
            BlockKind::Quote => Self::Quote,
            BlockKind::BulletItem => Self::UnorderedList,
        }
    }
}

/// Serialize `document` to HTML. Never fails.
pub fn serialize(
    document: &Document,
    config: &ComposerConfig,
) -> SerializedPost {
    let lines = document.lines();
    let mut html = String::new();
    let mut media_urls: Vec<String> = Vec::new();
    let mut wrapper = BlockWrapper::None;

    for item in items(&lines) {
        match item {
            Item::Image(reference) => {
                close_wrapper(&mut html, wrapper);
                wrapper = BlockWrapper::None;
                let url = reference.url().as_str();
                html.push_str(&format!(
                    "<p><img src=\"{}\" /></p>",
                    html_escape::encode_double_quoted_attribute(url)
                ));
                if !media_urls.iter().any(|u| u == url) {
                    media_urls.push(url.to_owned());
                }
            }
            Item::Line { block, runs } => {
                let next = BlockWrapper::for_block(block);
                if next == wrapper && continues(wrapper, config) {
                    push_separator(&mut html, wrapper);
                } else {
                    close_wrapper(&mut html, wrapper);
                    open_wrapper(&mut html, next);
                    wrapper = next;
                }
                push_runs(&mut html, &runs);
            }
        }
    }
    close_wrapper(&mut html, wrapper);

    tracing::debug!(
        target: "post_composer::html",
        html_len = html.len(),
        media = media_urls.len(),
        "serialized post body"
    );
    SerializedPost { html, media_urls }
}

/// Split lines into serializable items, isolating images and dropping the
/// trailing empty line.
fn items(lines: &[LineProjection]) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let count = lines.len();
    for (i, line) in lines.iter().enumerate() {
        if i + 1 == count && line.is_empty() {
            break;
        }
        let mut pending = Vec::new();
        let mut had_image = false;
        for run in &line.runs {
            match &run.kind {
                InlineRunKind::Image(reference) => {
                    if !pending.is_empty() {
                        items.push(Item::Line {
                            block: line.block,
                            runs: std::mem::take(&mut pending),
                        });
                    }
                    items.push(Item::Image(reference));
                    had_image = true;
                }
                InlineRunKind::Text { .. } => pending.push(run),
            }
        }
        if !pending.is_empty() || !had_image {
            items.push(Item::Line {
                block: line.block,
                runs: pending,
            });
        }
    }
    items
}

fn continues(wrapper: BlockWrapper, config: &ComposerConfig) -> bool {
    match wrapper {
        BlockWrapper::Paragraph | BlockWrapper::Quote => true,
        BlockWrapper::UnorderedList => config.merge_adjacent_list_items,
        BlockWrapper::None => false,
    }
}

fn push_separator(html: &mut String, wrapper: BlockWrapper) {
    match wrapper {
        BlockWrapper::Paragraph | BlockWrapper::Quote => {
            html.push_str("<br />")
        }
        BlockWrapper::UnorderedList => html.push_str("</li><li>"),
        BlockWrapper::None => {}
    }
}

fn open_wrapper(html: &mut String, wrapper: BlockWrapper) {
    match wrapper {
        BlockWrapper::Paragraph => html.push_str("<p>"),
        BlockWrapper::Quote => html.push_str("<blockquote><em>"),
        BlockWrapper::UnorderedList => html.push_str("<ul><li>"),
        BlockWrapper::None => {}
    }
}

fn close_wrapper(html: &mut String, wrapper: BlockWrapper) {
    match wrapper {
        BlockWrapper::Paragraph => html.push_str("</p>"),
        BlockWrapper::Quote => html.push_str("</em></blockquote>"),
        BlockWrapper::UnorderedList => html.push_str("</li></ul>"),
        BlockWrapper::None => {}
    }
}

/// Emit the text runs of one line, reusing inline tags shared with the
/// previous run.
fn push_runs(html: &mut String, runs: &[&InlineRun]) {
    let mut open_tags: Vec<&'static str> = Vec::new();
    for run in runs {
        let InlineRunKind::Text { text, style } = &run.kind else {
            continue;
        };
        let desired = style.inline_tags();
        let shared = open_tags
            .iter()
            .zip(&desired)
            .take_while(|(open, wanted)| open == wanted)
            .count();
        while open_tags.len() > shared {
            if let Some(tag) = open_tags.pop() {
                html.push_str(&format!("</{tag}>"));
            }
        }
        for tag in &desired[shared..] {
            html.push_str(&format!("<{tag}>"));
            open_tags.push(*tag);
        }
        html.push_str(&html_escape::encode_text(text));
    }
    while let Some(tag) = open_tags.pop() {
        html.push_str(&format!("</{tag}>"));
    }
}
