// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The post body: an ordered sequence of styled text and image runs.
//!
//! Lines are separated by `'\n'` characters stored inside text runs. A
//! newline belongs to the line it terminates, so the block kind of an empty
//! line lives on its newline. An image run is one code unit long (it stands
//! for U+FFFC) and always sits on a line of its own.
//!
//! Invariants kept after every mutation:
//!
//! 1. No text run is empty.
//! 2. No two adjacent text runs share the same [`Style`].
//! 3. Every text run of a line carries the same [`BlockKind`].
//! 4. Image runs carry the default style.
//! 5. A line holding an image holds nothing else.

mod lines;
mod utf16;

use std::ops::Range;

pub use lines::{InlineRun, InlineRunKind, LineProjection};
pub(crate) use utf16::utf16_len;

use self::utf16::byte_index;
use crate::{
    BlockKind, DocumentError, FormatState, MediaList, MediaReference, Style,
};

/// Character an image run stands for in plain text.
pub(crate) const OBJECT_REPLACEMENT: char = '\u{FFFC}';

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunKind {
    Text(String),
    Image(MediaReference),
}

/// A contiguous span of content sharing one [`Style`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    kind: RunKind,
    style: Style,
}

impl Run {
    pub fn text(text: impl Into<String>, style: Style) -> Self {
        Self {
            kind: RunKind::Text(text.into()),
            style,
        }
    }

    pub fn image(reference: MediaReference) -> Self {
        Self {
            kind: RunKind::Image(reference),
            style: Style::default(),
        }
    }

    pub fn kind(&self) -> &RunKind {
        &self.kind
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            RunKind::Text(text) => Some(text),
            RunKind::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&MediaReference> {
        match &self.kind {
            RunKind::Text(_) => None,
            RunKind::Image(reference) => Some(reference),
        }
    }

    /// Length in UTF-16 code units. Images are one unit long.
    pub fn len(&self) -> usize {
        match &self.kind {
            RunKind::Text(text) => utf16_len(text),
            RunKind::Image(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    runs: Vec<Run>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from raw runs, merging and dropping as needed.
    pub(crate) fn from_runs(runs: Vec<Run>) -> Self {
        let mut document = Self { runs };
        document.normalize();
        document
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.runs.iter().map(Run::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Plain text, with U+FFFC standing in for each image.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for run in &self.runs {
            match &run.kind {
                RunKind::Text(t) => text.push_str(t),
                RunKind::Image(_) => text.push(OBJECT_REPLACEMENT),
            }
        }
        text
    }

    /// Media referenced by the document, in document order.
    pub fn media(&self) -> MediaList {
        self.runs.iter().filter_map(Run::as_image).cloned().collect()
    }

    /// Insert `text` at `at`, styled from `format`, and return the offset
    /// just past it.
    ///
    /// Every line the inserted text touches takes the block kind of
    /// `format`. Text never joins an image line: typed just after an image
    /// it moves to the start of the next line, and typed just before one
    /// it gets a line break of its own.
    pub fn insert_text(
        &mut self,
        at: usize,
        text: &str,
        format: &FormatState,
    ) -> Result<usize, DocumentError> {
        self.locate(at)?;
        if text.is_empty() {
            return Ok(at);
        }
        let mut at = at;
        if !text.starts_with('\n') && self.follows_image(at) {
            if self.char_at(at) != Some('\n') {
                self.insert_run(at, Run::text("\n", Style::default()))?;
            }
            at += 1;
        }
        let mut inserted = text.to_owned();
        if !text.ends_with('\n') && self.char_at(at) == Some(OBJECT_REPLACEMENT)
        {
            inserted.push('\n');
        }
        self.insert_run(at, Run::text(inserted, format.style()))?;
        self.normalize();
        let end = at + utf16_len(text);
        self.set_block_for_lines(at..end, format.block())?;
        tracing::trace!(
            target: "post_composer::document",
            at,
            len = end - at,
            block = %format.block(),
            "inserted text"
        );
        self.check_invariants();
        Ok(end)
    }

    /// Insert an image at `at` on a line of its own.
    ///
    /// A line break is added before the image unless `at` is at the start
    /// of a line, and after it unless a line break already follows. The
    /// image line uses the default paragraph style whatever block it was
    /// inserted into. Returns the offset just past the image line, i.e. the
    /// start of the line following the image.
    pub fn insert_image(
        &mut self,
        at: usize,
        reference: MediaReference,
    ) -> Result<usize, DocumentError> {
        self.locate(at)?;
        let line = self.line_range(at)?;
        let mut pos = at;
        if at > line.start {
            let block = self.line_block(at)?;
            let style = Style::default().with_block(block);
            self.insert_run(pos, Run::text("\n", style))?;
            pos += 1;
        }
        tracing::debug!(
            target: "post_composer::document",
            at = pos,
            url = %reference.url(),
            "inserting image"
        );
        self.insert_run(pos, Run::image(reference))?;
        pos += 1;
        if self.char_at(pos) == Some('\n') {
            self.restyle(pos..pos + 1, |style| *style = Style::default())?;
        } else {
            self.insert_run(pos, Run::text("\n", Style::default()))?;
        }
        self.normalize();
        self.check_invariants();
        Ok(pos + 1)
    }

    /// Remove the content in `range`.
    ///
    /// When a line break is removed, the joined line keeps the block kind
    /// of the line the deletion started in, unless that whole line went
    /// away, in which case the surviving tail keeps its own.
    pub fn delete_range(
        &mut self,
        range: Range<usize>,
    ) -> Result<(), DocumentError> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let start_line = self.line_range(range.start)?;
        let block = if range.start > start_line.start {
            self.line_block(range.start)?
        } else {
            self.line_block(range.end)?
        };

        let first = self.split_at(range.start)?;
        let last = self.split_at(range.end)?;
        let joined_lines = self.runs.drain(first..last).any(|run| {
            run.as_text().is_some_and(|text| text.contains('\n'))
        });
        self.normalize();
        if joined_lines {
            self.set_line_block(range.start, block)?;
            self.separate_image_at(range.start)?;
        }
        tracing::trace!(
            target: "post_composer::document",
            start = range.start,
            end = range.end,
            joined_lines,
            "deleted range"
        );
        self.check_invariants();
        Ok(())
    }

    /// Put back a line break where a deletion joined an image with other
    /// content at `at`.
    fn separate_image_at(&mut self, at: usize) -> Result<(), DocumentError> {
        let before = at.checked_sub(1).and_then(|o| self.char_at(o));
        match (before, self.char_at(at)) {
            (Some(OBJECT_REPLACEMENT), Some(c)) if c != '\n' => {
                self.insert_run(at, Run::text("\n", Style::default()))?;
            }
            (Some(c), Some(OBJECT_REPLACEMENT)) if c != '\n' => {
                let block = self.line_block(at - 1)?;
                let style = Style::default().with_block(block);
                self.insert_run(at, Run::text("\n", style))?;
                self.set_line_block(at + 1, BlockKind::Normal)?;
            }
            _ => return Ok(()),
        }
        tracing::debug!(
            target: "post_composer::document",
            at,
            "moved image back onto its own line"
        );
        self.normalize();
        Ok(())
    }

    /// Whether the unit just before `offset` is an image.
    fn follows_image(&self, offset: usize) -> bool {
        offset
            .checked_sub(1)
            .is_some_and(|o| self.char_at(o) == Some(OBJECT_REPLACEMENT))
    }

    /// Style of the content under a caret at `offset`.
    ///
    /// This is the unit immediately before `offset` on the same line, or
    /// the first unit of the line when the caret is at its start. `None`
    /// for an empty last line.
    pub fn style_at(
        &self,
        offset: usize,
    ) -> Result<Option<Style>, DocumentError> {
        let line = self.line_range(offset)?;
        let unit = if offset > line.start {
            offset - 1
        } else if line.start < self.len() {
            line.start
        } else {
            return Ok(None);
        };
        Ok(self.run_at_unit(unit).map(|run| run.style.clone()))
    }

    /// Set the block kind of the line containing `offset`.
    pub fn set_line_block(
        &mut self,
        offset: usize,
        block: BlockKind,
    ) -> Result<(), DocumentError> {
        let line = self.line_range(offset)?;
        let end = if line.end < self.len() {
            line.end + 1
        } else {
            line.end
        };
        self.restyle(line.start..end, |style| style.set_block(block))
    }

    /// Set the block kind of every line overlapping `range`, including the
    /// line containing `range.end`.
    pub(crate) fn set_block_for_lines(
        &mut self,
        range: Range<usize>,
        block: BlockKind,
    ) -> Result<(), DocumentError> {
        self.check_range(&range)?;
        let mut line = self.line_range(range.start)?;
        loop {
            self.set_line_block(line.start, block)?;
            if line.end >= self.len() || line.end + 1 > range.end {
                return Ok(());
            }
            line = self.line_range(line.end + 1)?;
        }
    }

    /// Apply `change` to the style of every text run in `range`.
    pub(crate) fn restyle(
        &mut self,
        range: Range<usize>,
        mut change: impl FnMut(&mut Style),
    ) -> Result<(), DocumentError> {
        self.check_range(&range)?;
        if range.is_empty() {
            return Ok(());
        }
        let first = self.split_at(range.start)?;
        let last = self.split_at(range.end)?;
        for run in &mut self.runs[first..last] {
            if let RunKind::Text(_) = run.kind {
                change(&mut run.style);
            }
        }
        self.normalize();
        Ok(())
    }

    /// Whether every text run in `range` satisfies `predicate`. An empty
    /// range or one with no text is never fully formatted.
    pub(crate) fn all_text_in(
        &self,
        range: Range<usize>,
        predicate: impl Fn(&Style) -> bool,
    ) -> bool {
        let mut pos = 0;
        let mut seen_text = false;
        for run in &self.runs {
            let end = pos + run.len();
            if end > range.start && pos < range.end && run.as_text().is_some()
            {
                if !predicate(&run.style) {
                    return false;
                }
                seen_text = true;
            }
            pos = end;
        }
        seen_text
    }

    /// The character starting at `offset`, with U+FFFC for an image.
    pub(crate) fn char_at(&self, offset: usize) -> Option<char> {
        let mut pos = 0;
        for run in &self.runs {
            let len = run.len();
            if offset < pos + len {
                return match &run.kind {
                    RunKind::Image(_) => Some(OBJECT_REPLACEMENT),
                    RunKind::Text(text) => byte_index(text, offset - pos)
                        .and_then(|byte| text[byte..].chars().next()),
                };
            }
            pos += len;
        }
        None
    }

    fn run_at_unit(&self, unit: usize) -> Option<&Run> {
        let mut pos = 0;
        for run in &self.runs {
            let len = run.len();
            if unit < pos + len {
                return Some(run);
            }
            pos += len;
        }
        None
    }

    /// Find the run containing `offset` and the offset within it. An
    /// offset at the very end maps to `(runs.len(), 0)`.
    fn locate(&self, offset: usize) -> Result<(usize, usize), DocumentError> {
        let mut pos = 0;
        for (index, run) in self.runs.iter().enumerate() {
            let len = run.len();
            if offset < pos + len {
                let inner = offset - pos;
                if let RunKind::Text(text) = &run.kind {
                    if byte_index(text, inner).is_none() {
                        return Err(DocumentError::NotCharBoundary { offset });
                    }
                }
                return Ok((index, inner));
            }
            pos += len;
        }
        if offset == pos {
            Ok((self.runs.len(), 0))
        } else {
            Err(DocumentError::OutOfRange { offset, len: pos })
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), DocumentError> {
        if range.start > range.end {
            return Err(DocumentError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        self.locate(range.end)?;
        self.locate(range.start)?;
        Ok(())
    }

    /// Make sure a run boundary exists at `offset` and return the index of
    /// the run starting there.
    fn split_at(&mut self, offset: usize) -> Result<usize, DocumentError> {
        let (index, inner) = self.locate(offset)?;
        if inner == 0 {
            return Ok(index);
        }
        let style = self.runs[index].style.clone();
        match &mut self.runs[index].kind {
            RunKind::Text(text) => {
                let byte = byte_index(text, inner)
                    .ok_or(DocumentError::NotCharBoundary { offset })?;
                let tail = text.split_off(byte);
                self.runs.insert(index + 1, Run::text(tail, style));
                Ok(index + 1)
            }
            RunKind::Image(_) => Ok(index),
        }
    }

    fn insert_run(&mut self, at: usize, run: Run) -> Result<(), DocumentError> {
        let index = self.split_at(at)?;
        self.runs.insert(index, run);
        Ok(())
    }

    /// Drop empty text runs and merge neighbours with identical styles.
    fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in std::mem::take(&mut self.runs) {
            if run.is_empty() {
                continue;
            }
            if let (Some(last), RunKind::Text(text)) =
                (merged.last_mut(), &run.kind)
            {
                if last.style == run.style {
                    if let RunKind::Text(last_text) = &mut last.kind {
                        last_text.push_str(text);
                        continue;
                    }
                }
            }
            merged.push(run);
        }
        self.runs = merged;
    }

    #[cfg(feature = "assert-invariants")]
    fn check_invariants(&self) {
        for pair in self.runs.windows(2) {
            assert!(
                !(pair[0].as_text().is_some()
                    && pair[1].as_text().is_some()
                    && pair[0].style == pair[1].style),
                "adjacent runs with equal styles were not merged"
            );
        }
        for run in &self.runs {
            assert!(!run.is_empty(), "empty run left in document");
            if run.as_image().is_some() {
                assert_eq!(run.style, Style::default(), "styled image run");
            }
        }
        for line in self.lines() {
            if line.is_image() {
                assert_eq!(line.runs.len(), 1, "image shares its line");
            }
            for inline in &line.runs {
                if let InlineRunKind::Text { style, .. } = &inline.kind {
                    assert_eq!(style.block, line.block, "mixed block kinds");
                }
            }
        }
    }

    #[cfg(not(feature = "assert-invariants"))]
    fn check_invariants(&self) {}
}
