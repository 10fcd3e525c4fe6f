// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Uploaded image attachment record.

use serde::{Deserialize, Serialize};

/// Metadata for an uploaded image. The blob itself lives in external storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Image ID (also used as document ID)
    pub id: String,
    /// Blob storage key
    pub key: String,
    /// Public URL the editor embeds
    pub url: String,
    /// `url_name` of the snippet or post the image was uploaded for
    pub attached_url_name: String,
    /// Uploader's user ID
    pub user_id: String,
}
