// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Line projection over the run list.
//!
//! The run list is flat, but most consumers (serialization, block
//! formatting, debug dumps) think in lines. A [`LineProjection`] groups the
//! content of one line together with its block kind, without the
//! terminating newline.

use std::ops::Range;

use super::{utf16_len, Document, RunKind};
use crate::{BlockKind, DocumentError, MediaReference, Style};

/// A piece of a line with uniform content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineRun {
    pub start: usize,
    pub end: usize,
    pub kind: InlineRunKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InlineRunKind {
    Text { text: String, style: Style },
    Image(MediaReference),
}

/// One line of the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineProjection {
    /// Offset of the first unit of the line.
    pub start: usize,
    /// Offset of the terminating newline, or the document length for the
    /// last line.
    pub end: usize,
    pub block: BlockKind,
    pub runs: Vec<InlineRun>,
}

impl LineProjection {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_image(&self) -> bool {
        self.runs
            .iter()
            .any(|run| matches!(run.kind, InlineRunKind::Image(_)))
    }
}

struct LineBuilder {
    start: usize,
    block: Option<BlockKind>,
    runs: Vec<InlineRun>,
}

impl LineBuilder {
    fn new(start: usize) -> Self {
        Self {
            start,
            block: None,
            runs: Vec::new(),
        }
    }

    fn note_block(&mut self, block: BlockKind) {
        self.block.get_or_insert(block);
    }

    fn finish(self, end: usize) -> LineProjection {
        LineProjection {
            start: self.start,
            end,
            block: self.block.unwrap_or_default(),
            runs: self.runs,
        }
    }
}

impl Document {
    /// Every line of the document, including an empty last line.
    pub fn lines(&self) -> Vec<LineProjection> {
        let mut lines = Vec::new();
        let mut current = LineBuilder::new(0);
        let mut pos = 0;
        for run in &self.runs {
            match &run.kind {
                RunKind::Image(reference) => {
                    current.runs.push(InlineRun {
                        start: pos,
                        end: pos + 1,
                        kind: InlineRunKind::Image(reference.clone()),
                    });
                    pos += 1;
                }
                RunKind::Text(text) => {
                    for (i, segment) in text.split('\n').enumerate() {
                        if i > 0 {
                            current.note_block(run.style.block);
                            let finished = std::mem::replace(
                                &mut current,
                                LineBuilder::new(pos + 1),
                            );
                            lines.push(finished.finish(pos));
                            pos += 1;
                        }
                        if segment.is_empty() {
                            continue;
                        }
                        let len = utf16_len(segment);
                        current.note_block(run.style.block);
                        current.runs.push(InlineRun {
                            start: pos,
                            end: pos + len,
                            kind: InlineRunKind::Text {
                                text: segment.to_owned(),
                                style: run.style.clone(),
                            },
                        });
                        pos += len;
                    }
                }
            }
        }
        lines.push(current.finish(pos));
        lines
    }

    /// Offsets of every newline, ascending.
    pub(crate) fn newline_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::new();
        let mut pos = 0;
        for run in &self.runs {
            match &run.kind {
                RunKind::Image(_) => pos += 1,
                RunKind::Text(text) => {
                    for ch in text.chars() {
                        if ch == '\n' {
                            offsets.push(pos);
                        }
                        pos += ch.len_utf16();
                    }
                }
            }
        }
        offsets
    }

    /// The line containing `offset`, excluding its terminating newline.
    ///
    /// An offset just after a newline belongs to the following line.
    pub fn line_range(
        &self,
        offset: usize,
    ) -> Result<Range<usize>, DocumentError> {
        self.locate(offset)?;
        let newlines = self.newline_offsets();
        let start = newlines
            .iter()
            .rev()
            .find(|&&n| n < offset)
            .map_or(0, |n| n + 1);
        let end = newlines
            .iter()
            .find(|&&n| n >= offset)
            .copied()
            .unwrap_or_else(|| self.len());
        Ok(start..end)
    }

    /// Block kind of the line containing `offset`.
    ///
    /// Taken from the first text unit of the line (its newline, for an
    /// empty line). An empty last line reads as normal.
    pub fn line_block(
        &self,
        offset: usize,
    ) -> Result<BlockKind, DocumentError> {
        let line = self.line_range(offset)?;
        let end = (line.end + 1).min(self.len());
        let mut pos = 0;
        for run in &self.runs {
            let run_end = pos + run.len();
            if run_end > line.start && pos < end {
                if let RunKind::Text(_) = run.kind {
                    return Ok(run.style.block);
                }
            }
            if pos >= end {
                break;
            }
            pos = run_end;
        }
        Ok(BlockKind::Normal)
    }

    /// Whether the line containing `offset` has no content.
    pub fn line_is_empty(&self, offset: usize) -> Result<bool, DocumentError> {
        self.line_range(offset).map(|line| line.is_empty())
    }
}
