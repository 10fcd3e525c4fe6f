// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project model and its access rule.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A project groups snippets and posts under one owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Project {
    /// Project ID (also used as document ID)
    pub id: String,
    /// Owner's user ID
    pub user_id: String,
    /// Users allowed to write to the project besides the owner
    #[serde(default)]
    pub collaborators: Vec<String>,
    pub name: String,
    /// URL slug, unique per owner
    pub url_name: String,
    #[serde(default)]
    pub description: String,
    /// Tags that have been used on this project's snippets
    #[serde(default)]
    pub available_tags: Vec<String>,
    /// Whether the owner shows this project on their profile
    #[serde(default)]
    pub featured: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    /// Whether `user_id` may write to this project: the owner or a listed collaborator.
    pub fn has_permission(&self, user_id: &str) -> bool {
        self.user_id == user_id || self.collaborators.iter().any(|c| c == user_id)
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    /// Append tags not yet known to the project, returning the ones added.
    pub fn merge_tags(&mut self, tags: &[String]) -> Vec<String> {
        let mut added = Vec::new();
        for tag in tags {
            if !self.available_tags.contains(tag) && !added.contains(tag) {
                added.push(tag.clone());
            }
        }
        self.available_tags.extend(added.iter().cloned());
        added
    }
}
