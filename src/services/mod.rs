// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod attachments;
pub mod document;
pub mod permission;
pub mod rollup;

pub use activity::{bucket_by_day, window, window_ending};
pub use attachments::AttachmentScope;
pub use document::{extract_urls, DocumentError, ExtractedUrls};
pub use permission::{require_project_owner, require_project_permission};
pub use rollup::{rollup_by_week, ParentRef, RelatedCollection, WeekNumbering};
