// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The media upload seam.
//!
//! The composer never talks to a backend itself. Hosts hand in a
//! [`MediaUploader`] and get [`MediaReference`]s back.

use std::future::Future;

use futures_util::stream::{FuturesUnordered, StreamExt};
use url::Url;

use crate::{CancellationToken, MediaReference, UploadError};

/// Uploads raw image bytes and resolves to the URL they are served from.
pub trait MediaUploader {
    fn upload(
        &self,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<Url, UploadError>>;
}

/// Upload every image concurrently.
///
/// References come back in completion order. Failed uploads are logged and
/// skipped; once `token` is cancelled no further results are collected.
pub async fn upload_images<U: MediaUploader>(
    uploader: &U,
    images: Vec<Vec<u8>>,
    token: &CancellationToken,
) -> Vec<MediaReference> {
    let mut uploads: FuturesUnordered<_> = images
        .into_iter()
        .enumerate()
        .map(|(index, bytes)| async move {
            (index, uploader.upload(bytes).await)
        })
        .collect();

    let mut references = Vec::new();
    while let Some((index, result)) = uploads.next().await {
        if token.is_cancelled() {
            tracing::debug!(
                target: "post_composer::upload",
                remaining = uploads.len(),
                "upload batch cancelled"
            );
            break;
        }
        match result {
            Ok(url) => references.push(MediaReference::image(url)),
            Err(err) => tracing::warn!(
                target: "post_composer::upload",
                index,
                error = %err,
                "skipping image that failed to upload"
            ),
        }
    }
    references
}
