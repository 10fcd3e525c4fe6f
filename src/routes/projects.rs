// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Project routes (require authentication).

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::permission::require_project_owner;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/projects/delete", post(delete_project))
}

#[derive(Debug, Deserialize)]
pub struct DeleteProjectRequest {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteProjectResponse {
    pub message: String,
    pub deleted_snippets: usize,
}

/// Delete a project and its snippets. Owner only; collaborators cannot.
async fn delete_project(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<DeleteProjectRequest>,
) -> Result<Json<DeleteProjectResponse>> {
    if req.id.is_empty() {
        return Err(AppError::NotAcceptable(
            "No project ID found in request".to_string(),
        ));
    }

    let project = state
        .db
        .get_project(&req.id)
        .await?
        .ok_or_else(|| AppError::NotAcceptable("No project found with given ID".to_string()))?;

    require_project_owner(&project, &user.user_id)?;

    tracing::info!(project_id = %project.id, user_id = %user.user_id, "Deleting project");
    let deleted_snippets = state.db.delete_project(&project.id).await?;

    Ok(Json(DeleteProjectResponse {
        message: "Project successfully deleted.".to_string(),
        deleted_snippets,
    }))
}
