// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use serde::{Deserialize, Serialize};

use crate::HeadingLevel;

/// Settings shared by the composer and the serializer.
///
/// Hosts usually ship this as JSON next to their theme; missing keys fall
/// back to [`ComposerConfig::default`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Font size of body text, in points.
    pub body_font_size: f32,
    /// Font size of heading text, in points.
    pub heading_font_size: f32,
    /// Level used when the heading toggle is switched on.
    pub heading_level: HeadingLevel,
    /// Paragraph indent per indent level, in points.
    pub quote_indent: f32,
    /// Serialize consecutive bullet lines as one `<ul>` instead of one
    /// `<ul>` per line.
    pub merge_adjacent_list_items: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            body_font_size: 17.0,
            heading_font_size: 22.0,
            heading_level: HeadingLevel::default(),
            quote_indent: 16.0,
            merge_adjacent_list_items: false,
        }
    }
}
