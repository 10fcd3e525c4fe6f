// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Long-form post model.

use crate::models::DocumentNode;
use serde::{Deserialize, Serialize};

/// Post stored in Firestore. The body is the editor's rich-text tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Post ID (also used as document ID)
    pub id: String,
    /// Slug that uploaded images are attached to
    pub url_name: String,
    /// Author's user ID
    pub user_id: String,
    /// Projects the post is filed under
    #[serde(default)]
    pub project_ids: Vec<String>,
    pub title: String,
    #[serde(default)]
    pub body: Vec<DocumentNode>,
    /// Hyperlinks found in the body when it was last saved
    #[serde(default)]
    pub links: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// "public" or "private"
    #[serde(default = "default_privacy")]
    pub privacy: String,
    pub created_at: String,
    pub updated_at: String,
}

fn default_privacy() -> String {
    "public".to_string()
}
