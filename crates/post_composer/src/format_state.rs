// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Typing attributes and their transitions.
//!
//! [`FormatState`] is a plain value. Every transition consumes the current
//! state and returns the next one, so the composer can compute a candidate
//! state, inspect it, and only then commit it alongside a document change.

use strum_macros::{Display, EnumIter};

use crate::{BlockKind, ComposerConfig, HeadingLevel, Style};

/// A toolbar formatting toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FormatToggle {
    Bold,
    Italic,
    Underline,
    Heading,
    BulletList,
    Quote,
}

/// The style applied to the next inserted content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormatState {
    bold: bool,
    italic: bool,
    underline: bool,
    heading: Option<HeadingLevel>,
    block: BlockKind,
    // Italic as it was before quoting forced it on.
    italic_before_quote: bool,
}

/// What pressing enter does.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NewlineOutcome {
    /// Insert a line break. The new line starts with `next`.
    Break { next: FormatState },
    /// Insert nothing. The current, empty, line leaves its block and takes
    /// `next`.
    ExitBlock { next: FormatState },
}

impl NewlineOutcome {
    pub fn next(&self) -> &FormatState {
        match self {
            Self::Break { next } | Self::ExitBlock { next } => next,
        }
    }
}

impl FormatState {
    /// Derive the typing attributes from the style under the caret.
    pub fn from_style(style: &Style) -> Self {
        Self {
            bold: style.bold,
            italic: style.italic,
            underline: style.underline,
            heading: style.heading,
            block: style.block,
            italic_before_quote: style.italic_before_quote,
        }
    }

    pub fn bold(&self) -> bool {
        self.bold
    }

    pub fn italic(&self) -> bool {
        self.italic
    }

    pub fn underline(&self) -> bool {
        self.underline
    }

    pub fn heading(&self) -> Option<HeadingLevel> {
        self.heading
    }

    pub fn block(&self) -> BlockKind {
        self.block
    }

    pub fn is_active(&self, toggle: FormatToggle) -> bool {
        match toggle {
            FormatToggle::Bold => self.bold,
            FormatToggle::Italic => self.italic,
            FormatToggle::Underline => self.underline,
            FormatToggle::Heading => self.heading.is_some(),
            FormatToggle::BulletList => self.block == BlockKind::BulletItem,
            FormatToggle::Quote => self.block == BlockKind::Quote,
        }
    }

    /// Flip one toggle.
    ///
    /// Italic cannot be changed while quoted. The two block toggles replace
    /// each other; switching one off returns the line to normal.
    pub fn toggled(
        mut self,
        toggle: FormatToggle,
        config: &ComposerConfig,
    ) -> Self {
        match toggle {
            FormatToggle::Bold => self.bold = !self.bold,
            FormatToggle::Italic => {
                if self.block != BlockKind::Quote {
                    self.italic = !self.italic;
                }
            }
            FormatToggle::Underline => self.underline = !self.underline,
            FormatToggle::Heading => {
                self.heading = match self.heading {
                    Some(_) => None,
                    None => Some(config.heading_level),
                }
            }
            FormatToggle::BulletList => {
                let block = if self.block == BlockKind::BulletItem {
                    BlockKind::Normal
                } else {
                    BlockKind::BulletItem
                };
                self = self.with_block(block);
            }
            FormatToggle::Quote => {
                let block = if self.block == BlockKind::Quote {
                    BlockKind::Normal
                } else {
                    BlockKind::Quote
                };
                self = self.with_block(block);
            }
        }
        tracing::trace!(
            target: "post_composer::format",
            %toggle,
            active = self.is_active(toggle),
            "toggled"
        );
        self
    }

    /// Move to `block`, applying the italic rules of quoting.
    pub fn with_block(mut self, block: BlockKind) -> Self {
        if self.block == block {
            return self;
        }
        if self.block == BlockKind::Quote {
            self.italic = self.italic_before_quote;
            self.italic_before_quote = false;
        }
        if block == BlockKind::Quote {
            self.italic_before_quote = self.italic;
            self.italic = true;
        }
        self.block = block;
        self
    }

    /// Resolve what pressing enter does on a line that is `line_empty` or
    /// not.
    ///
    /// An empty quoted or bulleted line exits its block without adding a
    /// line. A non-empty quoted line is completed as a quote and the next
    /// line starts normal. A non-empty bulleted line continues the list.
    pub fn on_newline(self, line_empty: bool) -> NewlineOutcome {
        let outcome = match (self.block, line_empty) {
            (BlockKind::Quote | BlockKind::BulletItem, true) => {
                NewlineOutcome::ExitBlock {
                    next: self.with_block(BlockKind::Normal),
                }
            }
            (BlockKind::Quote, false) => NewlineOutcome::Break {
                next: self.with_block(BlockKind::Normal),
            },
            _ => NewlineOutcome::Break { next: self },
        };
        tracing::trace!(
            target: "post_composer::format",
            line_empty,
            next_block = %outcome.next().block,
            exits = matches!(outcome, NewlineOutcome::ExitBlock { .. }),
            "newline"
        );
        outcome
    }

    /// The concrete run style for content typed now.
    pub fn style(&self) -> Style {
        let italic = if self.block == BlockKind::Quote {
            self.italic_before_quote
        } else {
            self.italic
        };
        Style {
            bold: self.bold,
            italic,
            underline: self.underline,
            heading: self.heading,
            ..Style::default()
        }
        .with_block(self.block)
    }

    pub fn font_size(&self, config: &ComposerConfig) -> f32 {
        self.style().font_size(config)
    }
}
