// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;

/// Failure of a [`crate::Document`] operation.
///
/// Offsets are never clamped by the document; callers clamp first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("offset {offset} is out of range for a document of length {len}")]
    OutOfRange { offset: usize, len: usize },
    #[error("range {start}..{end} is reversed")]
    InvalidRange { start: usize, end: usize },
    #[error("offset {offset} falls inside a surrogate pair")]
    NotCharBoundary { offset: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("upload failed: {0}")]
    Failed(String),
    #[error("upload was cancelled")]
    Cancelled,
    #[error("uploader returned an invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to parse HTML: {}", .parse_errors.join("; "))]
pub struct HtmlParseError {
    pub parse_errors: Vec<String>,
}

impl HtmlParseError {
    pub fn new(parse_errors: Vec<String>) -> Self {
        Self { parse_errors }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the compose session was cancelled")]
    Cancelled,
    #[error("image load {0} is not pending in this session")]
    UnknownImageLoad(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("heading level must be between 1 and 6, got {0}")]
pub struct InvalidHeadingLevel(pub u8);
