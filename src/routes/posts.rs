// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Post save route.
//!
//! Saving a post re-reads its rich-text body: hyperlinks are stored on the
//! post and image attachments no longer embedded are removed.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{DocumentNode, Post};
use crate::services::attachments::{orphaned_in_document, AttachmentScope};
use crate::services::document::extract_urls;
use crate::services::permission::require_project_permission;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{extract::State, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use validator::Validate;

/// Post routes (require authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/posts", post(save_post))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SavePostRequest {
    /// Existing post to update
    pub id: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub url_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 500))]
    pub title: String,
    #[serde(default)]
    pub body: Vec<DocumentNode>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub project_ids: Vec<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub tags: Vec<String>,
    pub privacy: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SavePostResponse {
    pub message: String,
    pub id: String,
    pub links: Vec<String>,
}

/// Remove repeated entries, keeping first-seen order.
fn dedup_in_order(values: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// Create or update a post.
async fn save_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SavePostRequest>,
) -> Result<Json<SavePostResponse>> {
    if req.url_name.is_empty() || req.title.is_empty() {
        return Err(AppError::NotAcceptable(
            "Post urlName and title are required".to_string(),
        ));
    }
    req.validate()?;

    if let Some(privacy) = req.privacy.as_deref() {
        if privacy != "public" && privacy != "private" {
            return Err(AppError::BadRequest(
                "Privacy must be 'public' or 'private'".to_string(),
            ));
        }
    }

    let urls = extract_urls(&req.body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let existing = match req.id.as_deref().filter(|id| !id.is_empty()) {
        Some(id) => {
            let post = state.db.get_post(id).await?.ok_or_else(|| {
                AppError::NotAcceptable("No post found with given ID".to_string())
            })?;
            if post.user_id != user.user_id {
                return Err(AppError::Forbidden(
                    "Only the author can edit this post".to_string(),
                ));
            }
            Some(post)
        }
        None => None,
    };

    // Every project the post is filed under must accept writes from this user.
    for project_id in &req.project_ids {
        let project = state.db.get_project(project_id).await?.ok_or_else(|| {
            AppError::NotAcceptable(format!("No project found with ID {}", project_id))
        })?;
        require_project_permission(&project, &user.user_id)?;
    }

    let scope = AttachmentScope::for_save(
        existing
            .as_ref()
            .map(|p| (p.user_id.as_str(), p.url_name.as_str())),
        &user.user_id,
        &req.url_name,
    );
    let attached = state.db.get_attached_images(&scope).await?;
    let orphans = orphaned_in_document(attached, &urls.images);
    state.db.delete_images(&orphans).await?;

    let now = format_utc_rfc3339(chrono::Utc::now());
    let links = dedup_in_order(urls.links);

    let post = match existing {
        Some(mut post) => {
            post.title = req.title;
            post.body = req.body;
            post.project_ids = req.project_ids;
            post.tags = req.tags;
            post.links = links;
            if let Some(privacy) = req.privacy {
                post.privacy = privacy;
            }
            post.updated_at = now;
            post
        }
        None => Post {
            id: uuid::Uuid::new_v4().to_string(),
            url_name: req.url_name,
            user_id: user.user_id.clone(),
            project_ids: req.project_ids,
            title: req.title,
            body: req.body,
            links,
            tags: req.tags,
            privacy: req.privacy.unwrap_or_else(|| "public".to_string()),
            created_at: now.clone(),
            updated_at: now,
        },
    };

    state.db.upsert_post(&post).await?;

    tracing::info!(
        post_id = %post.id,
        user_id = %user.user_id,
        links = post.links.len(),
        orphaned_images = orphans.len(),
        "Post saved"
    );

    Ok(Json(SavePostResponse {
        message: "Post successfully saved.".to_string(),
        id: post.id,
        links: post.links,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_in_order() {
        let values = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(dedup_in_order(values), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_request_parses_editor_body() {
        let req: SavePostRequest = serde_json::from_str(
            r#"{"url_name": "hello", "title": "Hello",
                "body": [{"type": "p", "children": [{"text": "hi"}]}]}"#,
        )
        .unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.body.len(), 1);
        assert!(req.project_ids.is_empty());
    }
}
