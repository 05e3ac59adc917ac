// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! State queries: action_states for toolbar button states.

use std::collections::HashMap;

use strum::IntoEnumIterator;

use super::ComposerModel;
use crate::{ActionState, BlockKind, ComposerAction, FormatToggle};

impl ComposerModel {
    /// Get the current action states for all toolbar buttons.
    pub fn action_states(&self) -> HashMap<ComposerAction, ActionState> {
        self.compute_action_states()
    }

    /// Compute action states for all toolbar actions.
    ///
    /// Inline actions are disabled inside a quote, which ignores them.
    pub(crate) fn compute_action_states(
        &self,
    ) -> HashMap<ComposerAction, ActionState> {
        let quoted = self.format.block() == BlockKind::Quote;
        ComposerAction::iter()
            .map(|action| {
                let state = match action {
                    ComposerAction::Bold => {
                        self.inline_state(FormatToggle::Bold, quoted)
                    }
                    ComposerAction::Italic => {
                        self.inline_state(FormatToggle::Italic, quoted)
                    }
                    ComposerAction::Underline => {
                        self.inline_state(FormatToggle::Underline, quoted)
                    }
                    ComposerAction::Heading => {
                        self.inline_state(FormatToggle::Heading, quoted)
                    }
                    ComposerAction::BulletList => reversed_if(
                        self.format.block() == BlockKind::BulletItem,
                    ),
                    ComposerAction::Quote => reversed_if(quoted),
                    ComposerAction::InsertImage => ActionState::Enabled,
                    ComposerAction::Undo => {
                        enabled_if(!self.undo_stack.is_empty())
                    }
                    ComposerAction::Redo => {
                        enabled_if(!self.redo_stack.is_empty())
                    }
                };
                (action, state)
            })
            .collect()
    }

    fn inline_state(&self, toggle: FormatToggle, quoted: bool) -> ActionState {
        if quoted {
            return ActionState::Disabled;
        }
        let active = if self.has_selection() {
            self.is_inline_active_in(toggle, self.sel_start(), self.sel_end())
        } else {
            self.format.is_active(toggle)
        };
        reversed_if(active)
    }
}

fn reversed_if(active: bool) -> ActionState {
    if active {
        ActionState::Reversed
    } else {
        ActionState::Enabled
    }
}

fn enabled_if(enabled: bool) -> ActionState {
    if enabled {
        ActionState::Enabled
    } else {
        ActionState::Disabled
    }
}
