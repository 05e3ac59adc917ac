// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A compose session: one composer, the post metadata around it and the
//! image loads still in flight.
//!
//! Image loads complete independently. Each one re-enters the session
//! through [`ComposeSession::finish_image_load`] and is inserted at the
//! caret, so images land in completion order rather than pick order. Once
//! the session is cancelled (or dropped) late completions are discarded.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{
    ComposerConfig, ComposerModel, ComposerUpdate, MediaKind,
    MediaReference, MediaUploader, SessionError, UploadError,
};

/// Shared flag telling outstanding work that its session is gone.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Who can read the post.
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
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Public,
    Friends,
    Private,
}

/// Ticket for one image load started in a session.
#[derive(Clone, Debug)]
pub struct ImageLoad {
    id: u64,
    token: CancellationToken,
}

impl ImageLoad {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Upload the image bytes for this load.
    ///
    /// Returns [`UploadError::Cancelled`] if the session went away before
    /// or during the upload.
    pub async fn upload<U: MediaUploader>(
        &self,
        uploader: &U,
        bytes: Vec<u8>,
    ) -> Result<MediaReference, UploadError> {
        if self.is_cancelled() {
            return Err(UploadError::Cancelled);
        }
        let url = uploader.upload(bytes).await?;
        if self.is_cancelled() {
            return Err(UploadError::Cancelled);
        }
        Ok(MediaReference::image(url))
    }
}

/// The payload handed to the post-creation backend.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PostSubmission {
    pub title: String,
    pub html_body: String,
    pub audience: Audience,
    pub media_urls: Vec<String>,
    pub media_types: Vec<MediaKind>,
    /// The post this one replies to, for thread replies.
    pub parent_reference: Option<String>,
}

pub struct ComposeSession {
    composer: ComposerModel,
    title: String,
    audience: Audience,
    parent_reference: Option<String>,
    token: CancellationToken,
    next_load_id: u64,
    pending_loads: HashSet<u64>,
}

impl ComposeSession {
    pub fn new(config: ComposerConfig) -> Self {
        Self {
            composer: ComposerModel::with_config(config),
            title: String::new(),
            audience: Audience::default(),
            parent_reference: None,
            token: CancellationToken::new(),
            next_load_id: 0,
            pending_loads: HashSet::new(),
        }
    }

    /// A session composing a reply in the thread of `parent`.
    pub fn reply_to(
        parent: impl Into<String>,
        config: ComposerConfig,
    ) -> Self {
        let mut session = Self::new(config);
        session.parent_reference = Some(parent.into());
        session
    }

    pub fn composer(&self) -> &ComposerModel {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut ComposerModel {
        &mut self.composer
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn audience(&self) -> Audience {
        self.audience
    }

    pub fn set_audience(&mut self, audience: Audience) {
        self.audience = audience;
    }

    pub fn parent_reference(&self) -> Option<&str> {
        self.parent_reference.as_deref()
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn pending_image_loads(&self) -> usize {
        self.pending_loads.len()
    }

    /// Start tracking a new image load.
    pub fn begin_image_load(&mut self) -> ImageLoad {
        let id = self.next_load_id;
        self.next_load_id += 1;
        self.pending_loads.insert(id);
        tracing::trace!(
            target: "post_composer::session",
            id,
            "image load started"
        );
        ImageLoad {
            id,
            token: self.token.clone(),
        }
    }

    /// Insert the image of a completed load at the caret.
    pub fn finish_image_load(
        &mut self,
        load: &ImageLoad,
        reference: MediaReference,
    ) -> Result<ComposerUpdate, SessionError> {
        if self.is_cancelled() {
            tracing::debug!(
                target: "post_composer::session",
                id = load.id,
                "dropping image completion for a cancelled session"
            );
            return Err(SessionError::Cancelled);
        }
        if !load.token.same_as(&self.token)
            || !self.pending_loads.remove(&load.id)
        {
            tracing::debug!(
                target: "post_composer::session",
                id = load.id,
                "dropping completion of an unknown image load"
            );
            return Err(SessionError::UnknownImageLoad(load.id));
        }
        Ok(self.composer.insert_image(reference))
    }

    /// Stop tracking a load that failed or was given up on.
    pub fn abandon_image_load(&mut self, load: &ImageLoad) {
        if load.token.same_as(&self.token) {
            self.pending_loads.remove(&load.id);
        }
    }

    /// Cancel the session. Outstanding loads observe the cancellation
    /// through their tickets and their completions are rejected.
    pub fn cancel(&mut self) {
        self.token.cancel();
        self.pending_loads.clear();
        tracing::debug!(target: "post_composer::session", "session cancelled");
    }

    /// Serialize the post and end the session.
    pub fn submit(mut self) -> PostSubmission {
        if !self.pending_loads.is_empty() {
            tracing::warn!(
                target: "post_composer::session",
                pending = self.pending_loads.len(),
                "submitting with image loads still in flight"
            );
        }
        let post = self.composer.serialize();
        let media_types = self.composer.media().kinds();
        PostSubmission {
            title: std::mem::take(&mut self.title),
            html_body: post.html,
            audience: self.audience,
            media_urls: post.media_urls,
            media_types,
            parent_reference: self.parent_reference.take(),
        }
    }
}

impl Default for ComposeSession {
    fn default() -> Self {
        Self::new(ComposerConfig::default())
    }
}

impl Drop for ComposeSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::{Audience, ComposeSession};
    use crate::upload::tests::NamingUploader;
    use crate::{
        ComposerConfig, MediaKind, MediaReference, SessionError, UploadError,
    };

    fn image(name: &str) -> MediaReference {
        MediaReference::parse_image(&format!("https://cdn.example.com/{name}"))
            .unwrap()
    }

    #[test]
    fn images_are_inserted_in_completion_order() {
        let mut session = ComposeSession::default();
        let first = session.begin_image_load();
        let second = session.begin_image_load();
        session.finish_image_load(&second, image("b.jpg")).unwrap();
        session.finish_image_load(&first, image("a.jpg")).unwrap();
        assert_eq!(
            session.composer().serialize().media_urls,
            vec![
                "https://cdn.example.com/b.jpg",
                "https://cdn.example.com/a.jpg"
            ]
        );
        assert_eq!(session.pending_image_loads(), 0);
    }

    #[test]
    fn completions_after_cancel_are_dropped() {
        let mut session = ComposeSession::default();
        let load = session.begin_image_load();
        session.cancel();
        assert!(load.is_cancelled());
        let result = session.finish_image_load(&load, image("a.jpg"));
        assert_eq!(result, Err(SessionError::Cancelled));
        assert!(session.composer().document().is_empty());
    }

    #[test]
    fn a_load_completes_only_once() {
        let mut session = ComposeSession::default();
        let load = session.begin_image_load();
        session.finish_image_load(&load, image("a.jpg")).unwrap();
        let again = session.finish_image_load(&load, image("a.jpg"));
        assert_eq!(again, Err(SessionError::UnknownImageLoad(load.id())));
    }

    #[test]
    fn tickets_from_another_session_are_rejected() {
        let mut other = ComposeSession::default();
        let foreign = other.begin_image_load();
        let mut session = ComposeSession::default();
        let _own = session.begin_image_load();
        let result = session.finish_image_load(&foreign, image("a.jpg"));
        assert_eq!(result, Err(SessionError::UnknownImageLoad(0)));
    }

    #[test]
    fn abandoned_loads_are_no_longer_pending() {
        let mut session = ComposeSession::default();
        let load = session.begin_image_load();
        session.abandon_image_load(&load);
        assert_eq!(session.pending_image_loads(), 0);
    }

    #[test]
    fn dropping_the_session_cancels_its_loads() {
        let mut session = ComposeSession::default();
        let load = session.begin_image_load();
        drop(session);
        assert!(load.is_cancelled());
        let result =
            pollster::block_on(load.upload(&NamingUploader, b"a.jpg".to_vec()));
        assert_eq!(result, Err(UploadError::Cancelled));
    }

    #[test]
    fn uploaded_image_is_inserted() {
        let mut session = ComposeSession::default();
        session.composer_mut().replace_text("Look");
        let load = session.begin_image_load();
        let reference =
            pollster::block_on(load.upload(&NamingUploader, b"a.jpg".to_vec()))
                .unwrap();
        session.finish_image_load(&load, reference).unwrap();
        assert_eq!(
            session.composer().get_content_as_html(),
            r#"<p>Look</p><p><img src="https://cdn.example.com/a.jpg" /></p>"#
        );
    }

    #[test]
    fn submit_produces_the_payload() {
        let mut session =
            ComposeSession::reply_to("post-42", ComposerConfig::default());
        session.set_title("Monday");
        session.set_audience(Audience::Friends);
        session.composer_mut().replace_text("Dear diary\n");
        session.composer_mut().quote();
        session.composer_mut().replace_text("Something wise");
        let load = session.begin_image_load();
        session.composer_mut().select(0, 0);
        session.finish_image_load(&load, image("a.jpg")).unwrap();

        let submission = session.submit();
        assert_eq!(submission.title, "Monday");
        assert_eq!(submission.audience, Audience::Friends);
        assert_eq!(submission.parent_reference.as_deref(), Some("post-42"));
        assert_eq!(
            submission.html_body,
            concat!(
                r#"<p><img src="https://cdn.example.com/a.jpg" /></p>"#,
                "<p>Dear diary</p>",
                "<blockquote><em>Something wise</em></blockquote>"
            )
        );
        assert_eq!(
            submission.media_urls,
            vec!["https://cdn.example.com/a.jpg"]
        );
        assert_eq!(submission.media_types, vec![MediaKind::Image]);
    }

    #[test]
    fn submission_serializes_to_json() {
        let session = ComposeSession::default();
        let json = serde_json::to_value(session.submit()).unwrap();
        assert_eq!(json["audience"], "public");
        assert_eq!(json["html_body"], "");
        assert!(json["parent_reference"].is_null());
    }
}
