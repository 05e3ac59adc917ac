// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Model code for the journal / thread post composer.
//!
//! The crate is split the same way the editing flow is:
//!
//! - [`Document`]: ordered text and image runs making up one post body.
//! - [`FormatState`]: the typing attributes, with pure transitions for
//!   toolbar toggles, newlines and selection changes.
//! - [`ComposerModel`]: an editing session tying a document, a cursor and a
//!   format state together.
//! - [`html`]: the post body serializer and its parser.
//! - [`ComposeSession`]: image loading, cancellation and the submission
//!   payload handed to the backend.
//!
//! All offsets are UTF-16 code units, consistent with platform text APIs.

mod composer_model;
mod composer_update;
mod config;
mod document;
mod error;
mod format_state;
pub mod html;
mod media;
mod session;
mod style;
mod upload;

pub use crate::composer_model::ComposerModel;
pub use crate::composer_update::{
    ActionState, ComposerAction, ComposerUpdate, MenuState, MenuStateUpdate,
    ReplaceAll, Selection, TextUpdate,
};
pub use crate::config::ComposerConfig;
pub use crate::document::{
    Document, InlineRun, InlineRunKind, LineProjection, Run, RunKind,
};
pub use crate::error::{
    DocumentError, HtmlParseError, InvalidHeadingLevel, SessionError,
    UploadError,
};
pub use crate::format_state::{FormatState, FormatToggle, NewlineOutcome};
pub use crate::html::SerializedPost;
pub use crate::media::{MediaKind, MediaList, MediaReference};
pub use crate::session::{
    Audience, CancellationToken, ComposeSession, ImageLoad, PostSubmission,
};
pub use crate::style::{BlockKind, Foreground, HeadingLevel, Style};
pub use crate::upload::{upload_images, MediaUploader};
