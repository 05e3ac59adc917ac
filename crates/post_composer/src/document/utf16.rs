// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// Length of `s` in UTF-16 code units.
pub(crate) fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Byte index in `s` of the UTF-16 `offset`.
///
/// `None` when the offset lands inside a surrogate pair or past the end.
pub(crate) fn byte_index(s: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (index, ch) in s.char_indices() {
        if units == offset {
            return Some(index);
        }
        units += ch.len_utf16();
        if units > offset {
            return None;
        }
    }
    (units == offset).then_some(s.len())
}
