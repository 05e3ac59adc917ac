// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Conversion between documents and the HTML post body.

mod parser;
mod serialize;

pub use parser::{parse, parse_markdown};
pub use serialize::{serialize, SerializedPost};
