// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Run attributes.
//!
//! Inline attributes (bold, italic, underline, heading) are character level.
//! The block kind and the attributes it implies (quote tint and indent) are
//! line level: every run of a line carries the same [`BlockKind`].

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{ComposerConfig, InvalidHeadingLevel};

/// Line-level formatting category.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    #[default]
    Normal,
    BulletItem,
    Quote,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Foreground {
    #[default]
    Default,
    /// The muted tint used for quoted lines.
    Muted,
}

/// An HTML heading level, `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub fn new(level: u8) -> Result<Self, InvalidHeadingLevel> {
        if (1..=6).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InvalidHeadingLevel(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub(crate) fn tag(self) -> &'static str {
        match self.0 {
            1 => "h1",
            2 => "h2",
            3 => "h3",
            4 => "h4",
            5 => "h5",
            _ => "h6",
        }
    }

    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h1" => Some(Self(1)),
            "h2" => Some(Self(2)),
            "h3" => Some(Self(3)),
            "h4" => Some(Self(4)),
            "h5" => Some(Self(5)),
            "h6" => Some(Self(6)),
            _ => None,
        }
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// The attribute set of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub heading: Option<HeadingLevel>,
    pub block: BlockKind,
    pub foreground: Foreground,
    /// Paragraph indent level. Quoted lines sit one level in.
    pub indent: u8,
    // Italic as it was before quoting forced it on.
    pub(crate) italic_before_quote: bool,
}

impl Style {
    /// Change the block kind, applying the attributes it forces.
    ///
    /// Entering [`BlockKind::Quote`] forces italic, the muted tint and one
    /// indent level. Leaving it resets the tint and indent and gives the
    /// text back the italic it had before it was quoted.
    pub fn set_block(&mut self, block: BlockKind) {
        if self.block == block {
            return;
        }
        if self.block == BlockKind::Quote {
            self.italic = std::mem::take(&mut self.italic_before_quote);
            self.foreground = Foreground::Default;
            self.indent = 0;
        }
        if block == BlockKind::Quote {
            self.italic_before_quote = self.italic;
            self.italic = true;
            self.foreground = Foreground::Muted;
            self.indent = 1;
        }
        self.block = block;
    }

    pub fn with_block(mut self, block: BlockKind) -> Self {
        self.set_block(block);
        self
    }

    pub fn is_quote(&self) -> bool {
        self.block == BlockKind::Quote
    }

    pub fn font_size(&self, config: &ComposerConfig) -> f32 {
        if self.heading.is_some() {
            config.heading_font_size
        } else {
            config.body_font_size
        }
    }

    pub fn indent_width(&self, config: &ComposerConfig) -> f32 {
        f32::from(self.indent) * config.quote_indent
    }

    /// Inline tags wrapping text of this style, outermost first.
    ///
    /// Quoted text carries none: the quote wrapper supplies its own
    /// emphasis.
    pub(crate) fn inline_tags(&self) -> Vec<&'static str> {
        let mut tags = Vec::new();
        if self.is_quote() {
            return tags;
        }
        if let Some(level) = self.heading {
            tags.push(level.tag());
        }
        if self.bold {
            tags.push("strong");
        }
        if self.italic {
            tags.push("em");
        }
        if self.underline {
            tags.push("u");
        }
        tags
    }

    /// Short attribute names, used by debug dumps.
    pub(crate) fn describe(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Some(level) = self.heading {
            names.push(level.tag().to_owned());
        }
        if self.bold {
            names.push("bold".to_owned());
        }
        if self.italic {
            names.push("italic".to_owned());
        }
        if self.underline {
            names.push("underline".to_owned());
        }
        if self.foreground != Foreground::Default {
            names.push(self.foreground.to_string());
        }
        names
    }
}
