// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod document;
pub mod image;
pub mod post;
pub mod project;
pub mod snippet;
pub mod user;

pub use activity::{ActivityRecord, DateFrequencyMap, WeeklyBucket};
pub use document::DocumentNode;
pub use image::Image;
pub use post::Post;
pub use project::Project;
pub use snippet::{Snippet, SnippetKind};
pub use user::User;
