// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use serde::{Deserialize, Serialize};
use strum_macros::Display;
use url::Url;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
}

/// A resolved media URL embedded in a post.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaReference {
    url: Url,
    kind: MediaKind,
}

impl MediaReference {
    pub fn image(url: Url) -> Self {
        Self {
            url,
            kind: MediaKind::Image,
        }
    }

    pub fn parse_image(url: &str) -> Result<Self, url::ParseError> {
        Url::parse(url).map(Self::image)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }
}

/// Ordered media references, deduplicated by URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MediaList {
    items: Vec<MediaReference>,
}

impl MediaList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `reference` unless its URL is already listed.
    /// Returns whether it was added.
    pub fn push(&mut self, reference: MediaReference) -> bool {
        if self.contains(reference.url()) {
            return false;
        }
        self.items.push(reference);
        true
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.items.iter().any(|item| item.url() == url)
    }

    /// Keep only the references for which `keep` returns true, in order.
    pub fn retain(&mut self, keep: impl FnMut(&MediaReference) -> bool) {
        self.items.retain(keep);
    }

    pub fn iter(&self) -> impl Iterator<Item = &MediaReference> {
        self.items.iter()
    }

    pub fn urls(&self) -> Vec<String> {
        self.items.iter().map(|m| m.url().to_string()).collect()
    }

    pub fn kinds(&self) -> Vec<MediaKind> {
        self.items.iter().map(MediaReference::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<MediaReference> for MediaList {
    fn from_iter<T: IntoIterator<Item = MediaReference>>(iter: T) -> Self {
        let mut list = Self::new();
        for reference in iter {
            list.push(reference);
        }
        list
    }
}
