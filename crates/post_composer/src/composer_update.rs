// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::HashMap;

use strum_macros::{Display, EnumIter};

/// A toolbar action the host renders a button for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ComposerAction {
    Bold,
    Italic,
    Underline,
    Heading,
    BulletList,
    Quote,
    InsertImage,
    Undo,
    Redo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionState {
    Enabled,
    /// The action is active under the caret; pressing it switches it off.
    Reversed,
    Disabled,
}

/// Result of a composer operation, telling the host what to redraw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComposerUpdate {
    pub text_update: TextUpdate,
    pub menu_state: MenuState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextUpdate {
    Keep,
    ReplaceAll(ReplaceAll),
    Select(Selection),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplaceAll {
    pub replacement_html: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuState {
    Keep,
    Update(MenuStateUpdate),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuStateUpdate {
    pub action_states: HashMap<ComposerAction, ActionState>,
}

impl ComposerUpdate {
    pub fn keep() -> Self {
        Self {
            text_update: TextUpdate::Keep,
            menu_state: MenuState::Keep,
        }
    }

    pub fn replace_all(
        replacement_html: String,
        start: usize,
        end: usize,
        menu_state: MenuState,
    ) -> Self {
        Self {
            text_update: TextUpdate::ReplaceAll(ReplaceAll {
                replacement_html,
                start,
                end,
            }),
            menu_state,
        }
    }

    pub fn update_selection(
        start: usize,
        end: usize,
        menu_state: MenuState,
    ) -> Self {
        Self {
            text_update: TextUpdate::Select(Selection { start, end }),
            menu_state,
        }
    }

    pub fn is_keep(&self) -> bool {
        self.text_update == TextUpdate::Keep
            && self.menu_state == MenuState::Keep
    }
}
