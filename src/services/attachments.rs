// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Orphaned image detection for saved snippets and posts.
//!
//! An uploaded image is orphaned once the body it was attached to no longer
//! references it. Removing the blob is the storage provider's job; this
//! module only decides which attachment records are no longer in use.

use crate::models::Image;

/// The uploads a save or delete may reconcile: one uploader's images
/// under one slug.
///
/// Slugs are only unique per owner, so the uploader is always part of the
/// scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentScope {
    pub user_id: String,
    pub url_name: String,
}

impl AttachmentScope {
    /// Scope of an existing snippet or post: its stored author and slug.
    pub fn stored(author_id: &str, url_name: &str) -> Self {
        Self {
            user_id: author_id.to_string(),
            url_name: url_name.to_string(),
        }
    }

    /// Scope of a save. Updates reconcile the stored resource's uploads and
    /// ignore the slug in the request; creates use the caller and the
    /// requested slug.
    pub fn for_save(
        stored: Option<(&str, &str)>,
        caller_id: &str,
        requested_url_name: &str,
    ) -> Self {
        match stored {
            Some((author_id, url_name)) => Self::stored(author_id, url_name),
            None => Self::stored(caller_id, requested_url_name),
        }
    }
}

/// Attachments whose storage key no longer appears in a markdown body.
pub fn orphaned_in_markdown(attached: Vec<Image>, body: &str) -> Vec<Image> {
    attached
        .into_iter()
        .filter(|image| !body.contains(&image.key))
        .collect()
}

/// Attachments not referenced by any image URL found in a document tree.
///
/// An image counts as referenced if a URL equals its public URL or contains
/// its storage key (CDN variants of the same blob).
pub fn orphaned_in_document(attached: Vec<Image>, image_urls: &[String]) -> Vec<Image> {
    attached
        .into_iter()
        .filter(|image| {
            !image_urls
                .iter()
                .any(|url| *url == image.url || url.contains(&image.key))
        })
        .collect()
}
