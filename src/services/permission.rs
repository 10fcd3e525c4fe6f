// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authorization gates for project mutations.
//!
//! Every write to a project's snippets or posts goes through
//! `require_project_permission` first.

use crate::error::{AppError, Result};
use crate::models::Project;

/// Fail with `Forbidden` unless `user_id` owns or collaborates on `project`.
pub fn require_project_permission(project: &Project, user_id: &str) -> Result<()> {
    if project.has_permission(user_id) {
        return Ok(());
    }

    tracing::warn!(
        project_id = %project.id,
        user_id,
        "Blocked write to project without permission"
    );
    Err(AppError::Forbidden(
        "You do not have permission to edit this project".to_string(),
    ))
}

/// Fail with `Forbidden` unless `user_id` owns `project`.
pub fn require_project_owner(project: &Project, user_id: &str) -> Result<()> {
    if project.is_owner(user_id) {
        return Ok(());
    }

    tracing::warn!(
        project_id = %project.id,
        user_id,
        "Blocked owner-only action on project"
    );
    Err(AppError::Forbidden(
        "Only the project owner can do this".to_string(),
    ))
}
