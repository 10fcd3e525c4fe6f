// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snippet model: a short note or a saved resource inside a project.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// What a snippet holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum SnippetKind {
    /// Markdown note; requires a body
    #[default]
    Snippet,
    /// Saved link; requires a URL
    Resource,
}

/// Snippet stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Snippet {
    /// Snippet ID (also used as document ID)
    pub id: String,
    /// Slug that uploaded images are attached to
    pub url_name: String,
    pub project_id: String,
    /// Author's user ID
    pub user_id: String,
    #[serde(rename = "type", default)]
    pub kind: SnippetKind,
    /// Markdown body
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// User IDs that liked the snippet
    #[serde(default)]
    pub likes: Vec<String>,
    /// Posts this snippet has been linked into
    #[serde(default)]
    pub linked_posts: Vec<String>,
    pub created_at: String,
}

impl Snippet {
    /// Whether the snippet has been linked into at least one post.
    pub fn is_linked(&self) -> bool {
        !self.linked_posts.is_empty()
    }

    /// Case-insensitive match against body and URL.
    pub fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.body.to_lowercase().contains(&needle) || self.url.to_lowercase().contains(&needle)
    }
}
