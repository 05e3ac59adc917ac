// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The editing session of one post body.
//!
//! [`ComposerModel`] ties a [`crate::Document`], a selection and a
//! [`crate::FormatState`] together. Every operation either succeeds as a
//! whole, pushing one undo entry, or leaves the model untouched.

mod base;
mod block_ops;
mod content_access;
mod formatting;
mod images;
mod selection;
mod state_query;
mod text_ops;
mod undo_redo;

pub use base::ComposerModel;
